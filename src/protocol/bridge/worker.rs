//! Outbound workers: one per queue, each waiting for the next message,
//! handing it to its transport and pulsing the notifier on success.
use futures_util::future::{select, Either};
use futures_util::{pin_mut, Future};

use crate::core::Message;
use crate::error::DeliveryError;
use crate::infra::codec::frame::FrameCodec;
use crate::infra::queue::Consumer;
use crate::protocol::bridge::notifier::NotifyHandle;
use crate::protocol::bridge::stats::BridgeStats;
use crate::protocol::bridge::TxPolicy;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::{
    bridge_timer::BridgeTimer, can_bus::CanBus, serial_link::SerialTx,
};

/// Destination of a worker: turns a message into a transport transmission.
pub trait MessageSink {
    type TransportError: core::fmt::Debug;
    /// Transmit `message` once. Completes when the transport accepted it.
    fn deliver<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> impl Future<Output = Result<(), DeliveryError<Self::TransportError>>> + 'a;
}

//==================================================================================SINKS
/// Serial link sink: re-encodes with the bridge codec.
pub struct UartSink<'t, S> {
    codec: FrameCodec<'t>,
    serial: S,
}

impl<'t, S: SerialTx> UartSink<'t, S> {
    pub fn new(codec: FrameCodec<'t>, serial: S) -> Self {
        Self { codec, serial }
    }
}

impl<S: SerialTx> MessageSink for UartSink<'_, S> {
    type TransportError = S::Error;

    async fn deliver<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> Result<(), DeliveryError<Self::TransportError>> {
        let frame = self.codec.encode(message);
        self.serial
            .transmit(frame.as_slice())
            .await
            .map_err(DeliveryError::Transport)
    }
}

/// CAN bus sink: maps the message onto a standard frame.
pub struct CanSink<C> {
    bus: C,
}

impl<C: CanBus> CanSink<C> {
    pub fn new(bus: C) -> Self {
        Self { bus }
    }
}

impl<C: CanBus> MessageSink for CanSink<C> {
    type TransportError = C::Error;

    async fn deliver<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> Result<(), DeliveryError<Self::TransportError>> {
        let frame = CanFrame::from_message(message)?;
        self.bus
            .send(&frame)
            .await
            .map_err(DeliveryError::Transport)
    }
}

//==================================================================================WORKER
/// Task draining one queue into one sink, one message per wake, FIFO.
pub struct OutboundWorker<'a, K, T, const N: usize> {
    consumer: Consumer<'a, Message, N>,
    sink: K,
    timer: T,
    policy: TxPolicy,
    notify: NotifyHandle<'a>,
    stats: &'a BridgeStats,
}

impl<'a, K, T, const N: usize> OutboundWorker<'a, K, T, N>
where
    K: MessageSink,
    T: BridgeTimer,
{
    pub(crate) fn new(
        consumer: Consumer<'a, Message, N>,
        sink: K,
        timer: T,
        policy: TxPolicy,
        notify: NotifyHandle<'a>,
        stats: &'a BridgeStats,
    ) -> Self {
        Self {
            consumer,
            sink,
            timer,
            policy,
            notify,
            stats,
        }
    }

    /// Messages still queued for this worker.
    #[inline]
    pub fn pending(&self) -> usize {
        self.consumer.len()
    }

    /// Wait for the next message and forward it.
    ///
    /// Each attempt is bounded by `tx_timeout_ms`. Transport errors and
    /// timeouts are retried according to the [`TxPolicy`]; a message that
    /// cannot be mapped onto the transport is dropped at once. Either way the
    /// error is returned and counted, and the queue moves on.
    pub async fn step(&mut self) -> Result<(), DeliveryError<K::TransportError>> {
        let message = self.consumer.next().await;
        self.forward(&message).await
    }

    /// Run forever, one [`step`](Self::step) after the other.
    pub async fn run(mut self) {
        loop {
            // Failures are already counted and logged by `forward`.
            let _ = self.step().await;
        }
    }

    async fn forward(&mut self, message: &Message) -> Result<(), DeliveryError<K::TransportError>> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = self.deliver_within_deadline(message).await;
            match result {
                Ok(()) => {
                    self.stats.record_forwarded();
                    self.notify.pulse();
                    return Ok(());
                }
                Err(_err @ (DeliveryError::Transport(_) | DeliveryError::Timeout { .. }))
                    if attempt < max_attempts =>
                {
                    #[cfg(feature = "defmt")]
                    defmt::debug!(
                        "Transmit attempt {}/{} failed: {}",
                        attempt,
                        max_attempts,
                        defmt::Debug2Format(&_err)
                    );
                    self.timer.delay_ms(self.policy.retry_delay_ms).await;
                    attempt += 1;
                }
                Err(err) => {
                    #[cfg(feature = "defmt")]
                    defmt::error!(
                        "Dropping command {} after {} attempt(s): {}",
                        message.command,
                        attempt,
                        defmt::Debug2Format(&err)
                    );
                    self.stats.record_tx_failure();
                    return Err(err);
                }
            }
        }
    }

    /// One transmission, raced against the attempt deadline.
    async fn deliver_within_deadline(
        &mut self,
        message: &Message,
    ) -> Result<(), DeliveryError<K::TransportError>> {
        let timeout_ms = self.policy.tx_timeout_ms;
        if timeout_ms == 0 {
            return self.sink.deliver(message).await;
        }

        let delivery = self.sink.deliver(message);
        let deadline = self.timer.delay_ms(timeout_ms);
        pin_mut!(delivery);
        pin_mut!(deadline);

        match select(delivery, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(DeliveryError::Timeout { timeout_ms }),
        }
    }
}
