//! Bidirectional CAN ⇄ UART router.
//!
//! A [`Bridge`] owns the two direction queues, the notifier signal and the
//! counters. It is built once at startup (typically in a `StaticCell`) and
//! [`split`](Bridge::split) into the pieces that run in their own context:
//!
//! * [`UartRxHandler`] / [`CanRxHandler`]: called from the receive interrupts;
//! * two [`OutboundWorker`]s: async tasks transmitting on CAN and UART;
//! * [`Notifier`]: async task owning the activity indicator.
//!
//! ```text
//! UART rx irq ──decode──▶ [uart_to_can] ──▶ can_worker  ──▶ CAN bus
//! CAN rx irq  ──decode──▶ [can_to_uart] ──▶ uart_worker ──▶ UART tx
//!                                             │ on success
//!                                             ▼
//!                                          notifier ──▶ indicator
//! ```
pub mod inbound;
pub mod notifier;
pub mod stats;
pub mod worker;

pub use inbound::{CanRxHandler, RxOutcome, UartRxHandler};
pub use notifier::{IndicatorState, Notifier, NotifyHandle, NotifySignal};
pub use stats::{BridgeStats, StatsSnapshot};
pub use worker::{CanSink, MessageSink, OutboundWorker, UartSink};

use futures_util::future::join3;

use crate::core::Message;
use crate::infra::codec::frame::{FrameCodec, FrameLayout};
use crate::infra::codec::table::CommandTable;
use crate::infra::queue::BoundedQueue;
use crate::protocol::transport::traits::{
    bridge_timer::BridgeTimer, can_bus::CanBus, indicator::Indicator, serial_link::SerialTx,
};
use crate::protocol::transport::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_TX_ATTEMPTS, DEFAULT_TX_RETRY_DELAY_MS,
    DEFAULT_TX_TIMEOUT_MS, LED_ON_DURATION_MS,
};

//==================================================================================CONFIG
/// Bounded retry applied by the workers to transport errors and timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxPolicy {
    /// Total transmissions tried per message. `0` behaves like `1`.
    pub max_attempts: u8,
    /// Delay between two attempts (ms).
    pub retry_delay_ms: u32,
    /// Deadline of each attempt (ms). `0` waits for the transport indefinitely.
    pub tx_timeout_ms: u32,
}

impl TxPolicy {
    pub const fn new() -> Self {
        Self {
            max_attempts: DEFAULT_TX_ATTEMPTS,
            retry_delay_ms: DEFAULT_TX_RETRY_DELAY_MS,
            tx_timeout_ms: DEFAULT_TX_TIMEOUT_MS,
        }
    }

    /// Single attempt, drop on the first failure.
    pub const fn once() -> Self {
        Self {
            max_attempts: 1,
            retry_delay_ms: 0,
            tx_timeout_ms: DEFAULT_TX_TIMEOUT_MS,
        }
    }

    pub const fn with_max_attempts(mut self, max_attempts: u8) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub const fn with_retry_delay_ms(mut self, retry_delay_ms: u32) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    pub const fn with_tx_timeout_ms(mut self, tx_timeout_ms: u32) -> Self {
        self.tx_timeout_ms = tx_timeout_ms;
        self
    }
}

impl Default for TxPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Deployment settings of a [`Bridge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    /// Frame layout spoken on the serial link.
    pub layout: FrameLayout,
    /// Indicator hold time after the last forwarded message (ms).
    pub indicator_hold_ms: u32,
    pub tx_policy: TxPolicy,
}

impl BridgeConfig {
    pub const fn new() -> Self {
        Self {
            layout: FrameLayout::Extended,
            indicator_hold_ms: LED_ON_DURATION_MS,
            tx_policy: TxPolicy::new(),
        }
    }

    pub const fn with_layout(mut self, layout: FrameLayout) -> Self {
        self.layout = layout;
        self
    }

    pub const fn with_indicator_hold_ms(mut self, indicator_hold_ms: u32) -> Self {
        self.indicator_hold_ms = indicator_hold_ms;
        self
    }

    pub const fn with_tx_policy(mut self, tx_policy: TxPolicy) -> Self {
        self.tx_policy = tx_policy;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================BRIDGE
/// Bridge with the default queue depth.
pub type DefaultBridge<'t> = Bridge<'t, DEFAULT_QUEUE_CAPACITY>;

/// Router context: both queues, the notifier signal and the counters.
pub struct Bridge<'t, const N: usize> {
    codec: FrameCodec<'t>,
    config: BridgeConfig,
    uart_to_can: BoundedQueue<Message, N>,
    can_to_uart: BoundedQueue<Message, N>,
    signal: NotifySignal,
    stats: BridgeStats,
}

impl<'t, const N: usize> Bridge<'t, N> {
    /// Empty bridge resolving inferred fields against `table`.
    pub const fn new(table: CommandTable<'t>, config: BridgeConfig) -> Self {
        Self {
            codec: FrameCodec::new(table, config.layout),
            config,
            uart_to_can: BoundedQueue::new(),
            can_to_uart: BoundedQueue::new(),
            signal: NotifySignal::new(),
            stats: BridgeStats::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    #[inline]
    pub fn codec(&self) -> FrameCodec<'t> {
        self.codec
    }

    #[inline]
    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    /// Hand out the interrupt handlers and the tasks, wired to the
    /// given transports. Each queue gets exactly one producer and one consumer.
    pub fn split<'a, S, C, I, T>(
        &'a mut self,
        serial_tx: S,
        can_bus: C,
        indicator: I,
        timer: T,
    ) -> BridgeParts<'a, 't, N, S, C, I, T>
    where
        S: SerialTx,
        C: CanBus,
        I: Indicator,
        T: BridgeTimer,
    {
        let Self {
            codec,
            config,
            uart_to_can,
            can_to_uart,
            signal,
            stats,
        } = self;
        let codec = *codec;
        let signal: &'a NotifySignal = signal;
        let stats: &'a BridgeStats = stats;

        let (to_can, from_uart) = uart_to_can.split();
        let (to_uart, from_can) = can_to_uart.split();

        BridgeParts {
            uart_rx: UartRxHandler::new(codec, to_can, stats),
            can_rx: CanRxHandler::new(codec.table(), to_uart, stats),
            can_worker: OutboundWorker::new(
                from_uart,
                CanSink::new(can_bus),
                timer.clone(),
                config.tx_policy,
                NotifyHandle::new(signal),
                stats,
            ),
            uart_worker: OutboundWorker::new(
                from_can,
                UartSink::new(codec, serial_tx),
                timer.clone(),
                config.tx_policy,
                NotifyHandle::new(signal),
                stats,
            ),
            notifier: Notifier::new(signal, indicator, timer, config.indicator_hold_ms),
            stats,
        }
    }
}

/// Pieces returned by [`Bridge::split`].
pub struct BridgeParts<'a, 't, const N: usize, S, C, I, T> {
    pub uart_rx: UartRxHandler<'a, 't, N>,
    pub can_rx: CanRxHandler<'a, 't, N>,
    /// Drains the UART-to-CAN queue.
    pub can_worker: OutboundWorker<'a, CanSink<C>, T, N>,
    /// Drains the CAN-to-UART queue.
    pub uart_worker: OutboundWorker<'a, UartSink<'t, S>, T, N>,
    pub notifier: Notifier<'a, I, T>,
    pub stats: &'a BridgeStats,
}

/// Drive both workers and the notifier from a single task. Never returns.
pub async fn run_bridge<'a, A, B, I, T, const N: usize>(
    can_worker: OutboundWorker<'a, A, T, N>,
    uart_worker: OutboundWorker<'a, B, T, N>,
    notifier: Notifier<'a, I, T>,
) where
    A: MessageSink,
    B: MessageSink,
    I: Indicator,
    T: BridgeTimer,
{
    join3(can_worker.run(), uart_worker.run(), notifier.run()).await;
}
