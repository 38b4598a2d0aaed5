//! Diagnostic counters shared by the interrupt handlers and the workers.
use portable_atomic::{AtomicU32, Ordering};

use crate::error::{DecodeError, DropReason};

/// Monotonic event counters. Each counter wraps on overflow.
#[derive(Debug, Default)]
pub struct BridgeStats {
    forwarded: AtomicU32,
    queue_full_drops: AtomicU32,
    malformed_frames: AtomicU32,
    unknown_commands: AtomicU32,
    tx_failures: AtomicU32,
}

/// Point-in-time copy of [`BridgeStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsSnapshot {
    /// Messages handed to the outbound transport successfully.
    pub forwarded: u32,
    /// Decoded messages discarded because the outbound queue was full.
    pub queue_full_drops: u32,
    /// Frames discarded for having the wrong length.
    pub malformed_frames: u32,
    /// Frames discarded because their command could not be resolved.
    pub unknown_commands: u32,
    /// Messages dropped after the transmit policy gave up.
    pub tx_failures: u32,
}

impl BridgeStats {
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU32::new(0),
            queue_full_drops: AtomicU32::new(0),
            malformed_frames: AtomicU32::new(0),
            unknown_commands: AtomicU32::new(0),
            tx_failures: AtomicU32::new(0),
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            forwarded: self.forwarded.load(Ordering::Relaxed),
            queue_full_drops: self.queue_full_drops.load(Ordering::Relaxed),
            malformed_frames: self.malformed_frames.load(Ordering::Relaxed),
            unknown_commands: self.unknown_commands.load(Ordering::Relaxed),
            tx_failures: self.tx_failures.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_tx_failure(&self) {
        self.tx_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_drop(&self, reason: DropReason) {
        let counter = match reason {
            DropReason::QueueFull => &self.queue_full_drops,
            DropReason::Decode(DecodeError::MalformedFrame { .. }) => &self.malformed_frames,
            DropReason::Decode(DecodeError::UnknownCommand { .. }) => &self.unknown_commands,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
