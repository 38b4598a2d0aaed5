//! Asynchronous timer abstraction providing the delays used by the notifier
//! hold time and the transmit retry policy.

/// Timer trait abstraction. Cloned once per task that needs delays.
pub trait BridgeTimer: Clone {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}

/// [`BridgeTimer`] backed by the embassy time driver.
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTimer;

#[cfg(feature = "embassy-time")]
impl BridgeTimer for EmbassyTimer {
    async fn delay_ms(&mut self, millis: u32) {
        embassy_time::Timer::after_millis(millis as u64).await;
    }
}
