//! Activity indicator driver.
//!
//! `OFF -> ON -> OFF`: a pulse switches the indicator on and starts a hold
//! period. A pulse received during the hold earns another full hold once the
//! current one ends, so a burst of traffic keeps the indicator lit instead of
//! flickering.
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

use crate::protocol::transport::traits::{bridge_timer::BridgeTimer, indicator::Indicator};

/// Signal shared between the workers and the notifier.
pub type NotifySignal = Signal<CriticalSectionRawMutex, ()>;

/// Cheap handle used by workers to request a pulse. Never blocks.
#[derive(Clone, Copy)]
pub struct NotifyHandle<'a> {
    signal: &'a NotifySignal,
}

impl<'a> NotifyHandle<'a> {
    pub fn new(signal: &'a NotifySignal) -> Self {
        Self { signal }
    }

    /// Request a pulse. Pulses arriving before the notifier consumes the
    /// previous one merge into it.
    pub fn pulse(&self) {
        self.signal.signal(());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorState {
    Off,
    On,
}

/// Task owning the indicator.
pub struct Notifier<'a, I, T> {
    signal: &'a NotifySignal,
    indicator: I,
    timer: T,
    hold_ms: u32,
    state: IndicatorState,
}

impl<'a, I: Indicator, T: BridgeTimer> Notifier<'a, I, T> {
    pub fn new(signal: &'a NotifySignal, indicator: I, timer: T, hold_ms: u32) -> Self {
        Self {
            signal,
            indicator,
            timer,
            hold_ms,
            state: IndicatorState::Off,
        }
    }

    #[inline]
    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// One full pulse: wait for a signal, light up, hold until a whole hold
    /// period passes without a new signal, then switch off.
    ///
    /// A pulse raised during a hold is only looked at once that hold has run
    /// out, and then starts a fresh one. The indicator therefore stays lit
    /// between `hold_ms` and `2 * hold_ms` after the last pulse.
    pub async fn cycle(&mut self) {
        self.signal.wait().await;
        self.switch(IndicatorState::On);

        loop {
            self.timer.delay_ms(self.hold_ms).await;
            if self.signal.try_take().is_none() {
                break;
            }
        }

        self.switch(IndicatorState::Off);
    }

    /// Force the indicator off, then cycle forever.
    pub async fn run(mut self) {
        self.indicator.deactivate();
        self.state = IndicatorState::Off;
        loop {
            self.cycle().await;
        }
    }

    fn switch(&mut self, state: IndicatorState) {
        #[cfg(feature = "defmt")]
        defmt::trace!("Indicator {} -> {}", self.state, state);
        match state {
            IndicatorState::On => self.indicator.activate(),
            IndicatorState::Off => self.indicator.deactivate(),
        }
        self.state = state;
    }
}
