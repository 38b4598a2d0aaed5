//! Interrupt-side entry points. Each handler decodes one frame from its
//! transport and enqueues the message for the opposite transport's worker.
//!
//! Handlers never block and never retry: a frame that cannot be decoded or
//! queued is dropped and counted.
use crate::core::Message;
use crate::error::DropReason;
use crate::infra::codec::frame::FrameCodec;
use crate::infra::codec::table::CommandTable;
use crate::infra::queue::Producer;
use crate::protocol::bridge::stats::BridgeStats;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::serial_link::SerialRx;

/// Result of handling one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxOutcome {
    /// The message is waiting in the outbound queue.
    Enqueued,
    /// The frame was discarded.
    Dropped(DropReason),
}

impl RxOutcome {
    pub fn is_enqueued(&self) -> bool {
        matches!(self, RxOutcome::Enqueued)
    }
}

fn push<const N: usize>(
    producer: &mut Producer<'_, Message, N>,
    stats: &BridgeStats,
    message: Message,
) -> RxOutcome {
    match producer.enqueue(message) {
        Ok(()) => RxOutcome::Enqueued,
        Err(_) => reject(stats, DropReason::QueueFull),
    }
}

fn reject(stats: &BridgeStats, reason: DropReason) -> RxOutcome {
    #[cfg(feature = "defmt")]
    defmt::warn!("Inbound frame dropped: {}", reason);
    stats.record_drop(reason);
    RxOutcome::Dropped(reason)
}

//==================================================================================UART_RX
/// Receive-complete handler of the serial link. Feeds the CAN-bound queue.
pub struct UartRxHandler<'a, 't, const N: usize> {
    codec: FrameCodec<'t>,
    producer: Producer<'a, Message, N>,
    stats: &'a BridgeStats,
}

impl<'a, 't, const N: usize> UartRxHandler<'a, 't, N> {
    pub(crate) fn new(
        codec: FrameCodec<'t>,
        producer: Producer<'a, Message, N>,
        stats: &'a BridgeStats,
    ) -> Self {
        Self {
            codec,
            producer,
            stats,
        }
    }

    /// Byte count to arm each receive with.
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.codec.frame_len()
    }

    /// Handle `frame`, the bytes of one completed receive, then re-arm `rx`.
    /// The link is re-armed whatever the outcome so reception never stalls.
    pub fn on_receive_complete<R: SerialRx>(&mut self, frame: &[u8], rx: &mut R) -> RxOutcome {
        let outcome = match self.codec.decode(frame) {
            Ok(message) => push(&mut self.producer, self.stats, message),
            Err(err) => reject(self.stats, err.into()),
        };
        rx.rearm_receive();
        outcome
    }

    /// Messages waiting for the CAN worker.
    #[inline]
    pub fn pending(&self) -> usize {
        self.producer.len()
    }
}

//==================================================================================CAN_RX
/// Receive handler of the CAN controller. Feeds the UART-bound queue.
pub struct CanRxHandler<'a, 't, const N: usize> {
    table: CommandTable<'t>,
    producer: Producer<'a, Message, N>,
    stats: &'a BridgeStats,
}

impl<'a, 't, const N: usize> CanRxHandler<'a, 't, N> {
    pub(crate) fn new(
        table: CommandTable<'t>,
        producer: Producer<'a, Message, N>,
        stats: &'a BridgeStats,
    ) -> Self {
        Self {
            table,
            producer,
            stats,
        }
    }

    /// Handle one received frame. The controller keeps receiving on its own,
    /// so there is nothing to re-arm.
    pub fn on_frame(&mut self, frame: &CanFrame) -> RxOutcome {
        match frame.to_message(&self.table) {
            Ok(message) => push(&mut self.producer, self.stats, message),
            Err(err) => reject(self.stats, err.into()),
        }
    }

    /// Messages waiting for the UART worker.
    #[inline]
    pub fn pending(&self) -> usize {
        self.producer.len()
    }
}
