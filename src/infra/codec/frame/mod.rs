//! Fixed-width wire encoding of a [`Message`].
//!
//! Byte layout shared by both variants:
//!
//! ```text
//! 0         1       2          3        4 ..= 10
//! priority  sender  recipient  command  body[0..7]
//! ```
//!
//! The extended layout appends `body_size` (byte 11) and `is_ack` (byte 12).
//! There is no length prefix, no checksum and no negotiation: both ends of a
//! link must be built with the same [`FrameLayout`].
use crate::core::{
    Frame, Message, BODY_LEN, COMPACT_FRAME_LEN, EXTENDED_FRAME_LEN, HEADER_LEN, INFERRED,
};
use crate::error::DecodeError;
use crate::infra::codec::table::CommandTable;

const PRIORITY: usize = 0;
const SENDER: usize = 1;
const RECIPIENT: usize = 2;
const COMMAND: usize = 3;
const BODY_SIZE: usize = HEADER_LEN + BODY_LEN;
const IS_ACK: usize = BODY_SIZE + 1;

//==================================================================================FRAME_LAYOUT
/// Deployment variant of the wire frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameLayout {
    /// 11 bytes: header and body only. `body_size` is always inferred on decode.
    Compact,
    /// 13 bytes: header, body, `body_size`, `is_ack`.
    #[default]
    Extended,
}

impl FrameLayout {
    /// Width W of every frame in this layout.
    pub const fn frame_len(self) -> usize {
        match self {
            FrameLayout::Compact => COMPACT_FRAME_LEN,
            FrameLayout::Extended => EXTENDED_FRAME_LEN,
        }
    }
}

//==================================================================================FRAME_CODEC
/// Encoder/decoder for one layout, resolving inferred fields against a command table.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec<'t> {
    table: CommandTable<'t>,
    layout: FrameLayout,
}

impl<'t> FrameCodec<'t> {
    pub const fn new(table: CommandTable<'t>, layout: FrameLayout) -> Self {
        Self { table, layout }
    }

    #[inline]
    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    #[inline]
    pub fn table(&self) -> CommandTable<'t> {
        self.table
    }

    /// Width W expected by [`decode`](Self::decode) and produced by [`encode`](Self::encode).
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.layout.frame_len()
    }

    /// Lay `message` out on the wire. Total: every field is one byte wide and the
    /// body is a fixed array, so any value is representable.
    pub fn encode(&self, message: &Message) -> Frame {
        let mut frame = Frame::new();
        let data = &mut frame.data;

        data[PRIORITY] = message.priority;
        data[SENDER] = message.sender;
        data[RECIPIENT] = message.recipient;
        data[COMMAND] = message.command;
        data[HEADER_LEN..BODY_SIZE].copy_from_slice(&message.body);

        if self.layout == FrameLayout::Extended {
            data[BODY_SIZE] = message.body_size;
            data[IS_ACK] = u8::from(message.is_ack);
        }

        frame.len = self.frame_len();
        frame
    }

    /// Rebuild a message from exactly W bytes, then resolve inferred fields.
    ///
    /// Returns [`DecodeError::MalformedFrame`] on any other length and
    /// [`DecodeError::UnknownCommand`] when a field must be inferred for a command
    /// absent from the table. No partial message is produced on error.
    pub fn decode(&self, bytes: &[u8]) -> Result<Message, DecodeError> {
        let expected = self.frame_len();
        if bytes.len() != expected {
            return Err(DecodeError::MalformedFrame {
                expected,
                actual: bytes.len(),
            });
        }

        let mut body = [0u8; BODY_LEN];
        body.copy_from_slice(&bytes[HEADER_LEN..BODY_SIZE]);

        let (body_size, is_ack) = match self.layout {
            FrameLayout::Compact => (INFERRED, false),
            FrameLayout::Extended => (bytes[BODY_SIZE], bytes[IS_ACK] != 0),
        };

        let mut message = Message {
            priority: bytes[PRIORITY],
            sender: bytes[SENDER],
            recipient: bytes[RECIPIENT],
            command: bytes[COMMAND],
            body_size,
            body,
            is_ack,
        };

        self.table.resolve(&mut message)?;
        Ok(message)
    }
}
