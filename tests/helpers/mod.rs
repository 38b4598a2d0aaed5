//! Test doubles simulating the serial link, CAN bus, indicator and timer
//! during integration tests.
use satbridge::protocol::transport::{
    can_frame::CanFrame,
    traits::{
        bridge_timer::BridgeTimer,
        can_bus::CanBus,
        indicator::Indicator,
        serial_link::{SerialRx, SerialTx},
    },
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
/// Error reported by mocks when a failure was injected.
pub struct InjectedFailure;

#[allow(dead_code)]
/// Shared countdown of transmissions that must fail before one succeeds.
#[derive(Clone, Default)]
pub struct FailureBudget(Arc<AtomicUsize>);

#[allow(dead_code)]
impl FailureBudget {
    /// Make the next `count` transmissions fail.
    pub fn fail_next(&self, count: usize) {
        self.0.store(count, Ordering::SeqCst);
    }

    fn consume(&self) -> bool {
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

#[allow(dead_code)]
/// Transmit half of a simulated UART. Every accepted frame shows up on the
/// paired receiver as an owned byte vector.
pub struct MockSerial {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    failures: FailureBudget,
    attempts: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let serial = Self {
            tx,
            failures: FailureBudget::default(),
            attempts: Arc::new(AtomicUsize::new(0)),
        };
        (serial, rx)
    }

    pub fn failures(&self) -> FailureBudget {
        self.failures.clone()
    }

    /// Shared count of `transmit` calls, failed ones included.
    pub fn attempts(&self) -> Arc<AtomicUsize> {
        self.attempts.clone()
    }
}

impl SerialTx for MockSerial {
    type Error = InjectedFailure;

    async fn transmit<'a>(&'a mut self, bytes: &'a [u8]) -> Result<(), Self::Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failures.consume() {
            return Err(InjectedFailure);
        }
        self.tx.send(bytes.to_vec()).map_err(|_| InjectedFailure)
    }
}

#[derive(Debug, Default)]
#[allow(dead_code)]
/// Receive half of a simulated UART: only counts re-arm requests.
pub struct MockSerialRx {
    pub rearmed: usize,
}

impl SerialRx for MockSerialRx {
    fn rearm_receive(&mut self) {
        self.rearmed += 1;
    }
}

#[allow(dead_code)]
/// Simulated CAN transmitter forwarding frames to the host side.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    failures: FailureBudget,
    stalls: FailureBudget,
}

#[allow(dead_code)]
impl MockCanBus {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CanFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let bus = Self {
            tx,
            failures: FailureBudget::default(),
            stalls: FailureBudget::default(),
        };
        (bus, rx)
    }

    pub fn failures(&self) -> FailureBudget {
        self.failures.clone()
    }

    /// Sends taken from this budget never complete.
    pub fn stalls(&self) -> FailureBudget {
        self.stalls.clone()
    }
}

impl CanBus for MockCanBus {
    type Error = InjectedFailure;

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        if self.stalls.consume() {
            core::future::pending::<()>().await;
        }
        if self.failures.consume() {
            return Err(InjectedFailure);
        }
        self.tx.send(*frame).map_err(|_| InjectedFailure)
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Indicator recording every switch: `true` for on, `false` for off.
pub struct MockIndicator {
    events: Arc<Mutex<Vec<bool>>>,
}

#[allow(dead_code)]
impl MockIndicator {
    pub fn events(&self) -> Vec<bool> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn is_on(&self) -> bool {
        self.events().last().copied().unwrap_or(false)
    }

    fn record(&self, on: bool) {
        if let Ok(mut events) = self.events.lock() {
            events.push(on);
        }
    }
}

impl Indicator for MockIndicator {
    fn activate(&mut self) {
        self.record(true);
    }

    fn deactivate(&mut self) {
        self.record(false);
    }
}

#[derive(Clone)]
#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive delays in tests.
pub struct MockTimer;

impl BridgeTimer for MockTimer {
    async fn delay_ms<'a>(&'a mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}
