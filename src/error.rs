//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (frame decoding, queue
//! backpressure, CAN identifier mapping, delivery to a transport).
use thiserror_no_std::Error;

//================================================================================CODEC_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures while turning received bytes into a [`Message`](crate::core::Message).
pub enum DecodeError {
    /// Input length differs from the fixed frame width of the layout.
    #[error("Malformed frame: expected {expected} bytes, got {actual}")]
    MalformedFrame { expected: usize, actual: usize },
    /// A field asks to be inferred but the command has no table entry.
    #[error("Unknown command {command}: no defaults to infer from")]
    UnknownCommand { command: u8 },
}

//================================================================================QUEUE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Bounded queue outcomes that are not a successful transfer.
pub enum QueueError {
    /// Producer-side backpressure: every usable slot is taken.
    #[error("Queue full")]
    Full,
    /// Consumer-side "nothing to do".
    #[error("Queue empty")]
    Empty,
    /// A ring needs at least two slots (one is always kept free).
    #[error("Invalid queue capacity {capacity}: at least 2 slots required")]
    InvalidCapacity { capacity: usize },
}

//================================================================================CAN_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A message field does not fit the 11-bit CAN identifier layout.
pub enum CanMappingError {
    /// Priority is limited to 7 bits.
    #[error("Priority {priority} does not fit the CAN identifier")]
    PriorityOutOfRange { priority: u8 },
    /// Sender is limited to 2 bits.
    #[error("Sender {sender} does not fit the CAN identifier")]
    SenderOutOfRange { sender: u8 },
    /// Recipient is limited to 2 bits.
    #[error("Recipient {recipient} does not fit the CAN identifier")]
    RecipientOutOfRange { recipient: u8 },
}

//================================================================================ROUTER_ERRORS
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Why an interrupt handler discarded an inbound frame.
pub enum DropReason {
    /// The frame could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The outbound queue had no free slot.
    #[error("Outbound queue full")]
    QueueFull,
}

#[derive(Error, Debug)]
/// Errors raised while handing a message to an outbound transport.
pub enum DeliveryError<E: core::fmt::Debug> {
    /// The message cannot be represented on the target transport. Never retried.
    #[error(transparent)]
    Mapping(#[from] CanMappingError),
    /// The transport refused or failed the transmission.
    #[error("Transport error: {0:?}")]
    Transport(E),
    /// The transport did not complete the transmission in time. Retried like
    /// a transport error.
    #[error("Transmission not completed within {timeout_ms} ms")]
    Timeout { timeout_ms: u32 },
}
