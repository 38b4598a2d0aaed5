//! Stateless transforms between [`Message`](crate::core::Message) and its
//! fixed-width wire encoding, plus the command table used to resolve
//! inferred fields.
pub mod frame;
pub mod table;

pub use frame::{FrameCodec, FrameLayout};
pub use table::CommandTable;
