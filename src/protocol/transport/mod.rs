//! Transport layer: CAN frame representation and the hardware abstraction
//! traits (CAN bus, serial link, indicator, timer) the bridge is generic over.
//!
//! ## Timing and sizing constants
//!
//! Defaults used by [`BridgeConfig`](crate::protocol::bridge::BridgeConfig)
//! when the firmware does not override them.

pub mod can_frame;
pub mod traits;

/// Slots per direction queue. One slot stays free, so 31 messages fit.
///
/// At 115200 baud an extended frame takes a little over 1 ms on the wire,
/// which leaves roughly 30 ms of CAN burst absorbed before drops start.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// How long the activity indicator stays on after the last forwarded message (ms).
///
/// Short enough that a quiet link is visibly dark, long enough for a single
/// message to produce a visible blink.
pub const LED_ON_DURATION_MS: u32 = 20;

/// Transmissions attempted per message before it is dropped.
pub const DEFAULT_TX_ATTEMPTS: u8 = 3;

/// Pause between two transmission attempts of the same message (ms).
pub const DEFAULT_TX_RETRY_DELAY_MS: u32 = 5;

/// Deadline for a single transmission attempt (ms).
///
/// A driver that never completes (CAN controller stuck in bus-off, UART DMA
/// that never signals) counts as a failed attempt once this expires, so the
/// worker keeps draining its queue.
///
/// A classic CAN frame takes well under 1 ms at 500 kbit/s and an extended
/// serial frame about 1.1 ms at 115200 baud; 100 ms leaves room for
/// arbitration losses and controller retransmissions.
pub const DEFAULT_TX_TIMEOUT_MS: u32 = 100;

/// Largest priority representable in the 7-bit field of the CAN identifier.
pub const MAX_CAN_PRIORITY: u8 = 0x7F;

/// Largest sender or recipient representable in the 2-bit fields of the CAN identifier.
pub const MAX_CAN_NODE: u8 = 0x03;
