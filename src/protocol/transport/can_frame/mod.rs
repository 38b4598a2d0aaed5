//! In-memory representation of a bus frame and its mapping to [`Message`].
//!
//! Identifier layout (11-bit standard id):
//!
//! ```text
//! 10 ........ 4   3 .. 2   1 ..... 0
//!   priority      sender   recipient
//! ```
//!
//! Data is always eight bytes: the command followed by the seven body bytes.
//! Arbitration on the identifier means a lower priority value wins the bus.
use embedded_can::{ExtendedId, Frame, Id, StandardId};

use crate::core::{Message, BODY_LEN};
use crate::error::{CanMappingError, DecodeError};
use crate::infra::codec::table::CommandTable;
use crate::protocol::transport::{MAX_CAN_NODE, MAX_CAN_PRIORITY};

/// Classic CAN payload length.
pub const CAN_DATA_LEN: usize = 8;

const PRIORITY_SHIFT: u16 = 4;
const SENDER_SHIFT: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw frame as exchanged with the CAN controller.
pub struct CanFrame {
    /// Standard 11-bit identifier.
    pub id: u16,
    /// Payload buffer. Classic CAN frames always provide eight bytes.
    pub data: [u8; CAN_DATA_LEN],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Build the bus frame carrying `message`.
    ///
    /// Fails when a routing field does not fit its identifier bits; the
    /// message must therefore be resolved (no [`INFERRED`](crate::core::INFERRED)
    /// priority) before it reaches the bus.
    pub fn from_message(message: &Message) -> Result<Self, CanMappingError> {
        if message.priority > MAX_CAN_PRIORITY {
            return Err(CanMappingError::PriorityOutOfRange {
                priority: message.priority,
            });
        }
        if message.sender > MAX_CAN_NODE {
            return Err(CanMappingError::SenderOutOfRange {
                sender: message.sender,
            });
        }
        if message.recipient > MAX_CAN_NODE {
            return Err(CanMappingError::RecipientOutOfRange {
                recipient: message.recipient,
            });
        }

        let id = ((message.priority as u16) << PRIORITY_SHIFT)
            | ((message.sender as u16) << SENDER_SHIFT)
            | message.recipient as u16;

        let mut data = [0u8; CAN_DATA_LEN];
        data[0] = message.command;
        data[1..].copy_from_slice(&message.body);

        Ok(Self {
            id,
            data,
            len: CAN_DATA_LEN,
        })
    }

    /// Rebuild the message carried by this frame. `body_size` always comes from
    /// the command table, so an unknown command is rejected.
    pub fn to_message(&self, table: &CommandTable<'_>) -> Result<Message, DecodeError> {
        if self.len != CAN_DATA_LEN {
            return Err(DecodeError::MalformedFrame {
                expected: CAN_DATA_LEN,
                actual: self.len,
            });
        }

        let mut body = [0u8; BODY_LEN];
        body.copy_from_slice(&self.data[1..]);

        let mut message = Message::new(self.data[0])
            .with_route(self.sender(), self.recipient())
            .with_priority(self.priority());
        message.body = body;

        table.resolve(&mut message)?;
        Ok(message)
    }

    /// Seven-bit priority field.
    #[inline]
    pub fn priority(&self) -> u8 {
        ((self.id >> PRIORITY_SHIFT) as u8) & MAX_CAN_PRIORITY
    }

    /// Two-bit sender field.
    #[inline]
    pub fn sender(&self) -> u8 {
        ((self.id >> SENDER_SHIFT) as u8) & MAX_CAN_NODE
    }

    /// Two-bit recipient field.
    #[inline]
    pub fn recipient(&self) -> u8 {
        (self.id as u8) & MAX_CAN_NODE
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let Id::Standard(id) = id.into() else {
            return None;
        };
        if data.len() > CAN_DATA_LEN {
            return None;
        }
        let mut buffer = [0u8; CAN_DATA_LEN];
        buffer[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id.as_raw(),
            data: buffer,
            len: data.len(),
        })
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        false
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        match StandardId::new(self.id) {
            Some(id) => Id::Standard(id),
            // Only reachable when `id` was written directly with more than 11 bits.
            None => Id::Extended(ExtendedId::new(self.id as u32).unwrap_or(ExtendedId::ZERO)),
        }
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        &self.data[..self.len.min(CAN_DATA_LEN)]
    }
}
