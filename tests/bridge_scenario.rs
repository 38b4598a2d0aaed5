//! End-to-end router scenarios: a frame enters through one interrupt handler,
//! the opposite worker transmits it, and the indicator reports the activity.
mod helpers;

use helpers::{MockCanBus, MockIndicator, MockSerial, MockSerialRx, MockTimer};
use satbridge::core::{Message, INFERRED};
use satbridge::error::{CanMappingError, DeliveryError, DropReason};
use satbridge::protocol::bridge::{run_bridge, Bridge, BridgeConfig, RxOutcome, TxPolicy};
use satbridge::protocol::catalog::{builtin_table, CmdId, NodeId};
use static_cell::StaticCell;
use std::sync::atomic::Ordering;
use tokio::time::{sleep, timeout, Duration};

const STEP_TIMEOUT: Duration = Duration::from_secs(1);

static LIVE_BRIDGE: StaticCell<Bridge<'static, 8>> = StaticCell::new();

fn power_request() -> Message {
    Message::new(CmdId::PwrSetSubsystemPower.id())
        .with_priority(7)
        .with_route(NodeId::Cdh.id(), NodeId::Pwr.id())
        .with_body(&[3, 1])
}

#[tokio::test]
/// The CAN worker is parked on an empty queue when the UART frame arrives;
/// it wakes, sends exactly that message and the indicator goes OFF -> ON -> OFF.
async fn test_uart_frame_reaches_can_bus() {
    let bridge = LIVE_BRIDGE.init(Bridge::new(
        builtin_table(),
        BridgeConfig::new().with_indicator_hold_ms(50),
    ));
    let codec = bridge.codec();
    let (serial, _uart_out) = MockSerial::new();
    let (bus, mut can_out) = MockCanBus::new();
    let indicator = MockIndicator::default();

    let parts = bridge.split(serial, bus, indicator.clone(), MockTimer);
    let stats = parts.stats;
    let mut uart_rx = parts.uart_rx;
    let mut rx = MockSerialRx::default();

    let message = power_request();
    let frame = codec.encode(&message);

    let scenario = async {
        // Let the worker block on the empty queue first.
        sleep(Duration::from_millis(10)).await;
        assert_eq!(indicator.events(), vec![false]);

        let outcome = uart_rx.on_receive_complete(frame.as_slice(), &mut rx);
        assert_eq!(outcome, RxOutcome::Enqueued);

        let sent = timeout(STEP_TIMEOUT, can_out.recv())
            .await
            .expect("worker should wake up")
            .expect("bus stays open");

        sleep(Duration::from_millis(10)).await;
        assert!(indicator.is_on());

        sleep(Duration::from_millis(120)).await;
        sent
    };

    let sent = tokio::select! {
        _ = run_bridge(parts.can_worker, parts.uart_worker, parts.notifier) => {
            unreachable!("bridge tasks never return")
        }
        sent = scenario => sent,
    };

    assert_eq!(sent.priority(), 7);
    assert_eq!(sent.sender(), NodeId::Cdh.id());
    assert_eq!(sent.recipient(), NodeId::Pwr.id());
    assert_eq!(sent.data, [CmdId::PwrSetSubsystemPower.id(), 3, 1, 0, 0, 0, 0, 0]);
    assert_eq!(sent.to_message(&builtin_table()), Ok(message));

    assert_eq!(indicator.events(), vec![false, true, false]);
    assert_eq!(rx.rearmed, 1);
    assert_eq!(stats.snapshot().forwarded, 1);
}

#[tokio::test]
/// UART -> CAN -> UART gives back the exact bytes that came in.
async fn test_round_trip_is_byte_identical() {
    let mut bridge: Bridge<'static, 4> = Bridge::new(builtin_table(), BridgeConfig::new());
    let codec = bridge.codec();
    let (serial, mut uart_out) = MockSerial::new();
    let (bus, mut can_out) = MockCanBus::new();

    let parts = bridge.split(serial, bus, MockIndicator::default(), MockTimer);
    let (mut uart_rx, mut can_rx) = (parts.uart_rx, parts.can_rx);
    let (mut can_worker, mut uart_worker) = (parts.can_worker, parts.uart_worker);
    let mut rx = MockSerialRx::default();

    let original = codec.encode(
        &Message::new(CmdId::AdcsSetOperatingMode.id())
            .with_priority(15)
            .with_route(NodeId::Cdh.id(), NodeId::Adcs.id())
            .with_body(&[2]),
    );

    assert!(uart_rx.on_receive_complete(original.as_slice(), &mut rx).is_enqueued());
    timeout(STEP_TIMEOUT, can_worker.step())
        .await
        .expect("message queued")
        .expect("bus accepts");
    let on_bus = can_out.recv().await.expect("bus stays open");

    assert!(can_rx.on_frame(&on_bus).is_enqueued());
    timeout(STEP_TIMEOUT, uart_worker.step())
        .await
        .expect("message queued")
        .expect("serial accepts");
    let echoed = uart_out.recv().await.expect("serial stays open");

    assert_eq!(echoed, original.as_slice());
}

#[tokio::test]
/// Inferred priority and body size are filled in before the message hits the bus.
async fn test_inferred_fields_resolved_before_bus() {
    let mut bridge: Bridge<'static, 4> = Bridge::new(builtin_table(), BridgeConfig::new());
    let (serial, _uart_out) = MockSerial::new();
    let (bus, mut can_out) = MockCanBus::new();

    let parts = bridge.split(serial, bus, MockIndicator::default(), MockTimer);
    let mut uart_rx = parts.uart_rx;
    let mut can_worker = parts.can_worker;
    let mut rx = MockSerialRx::default();

    let command = CmdId::CdhSetRtc;
    let mut frame = [0u8; 13];
    frame[0] = INFERRED;
    frame[1] = NodeId::Pld.id();
    frame[2] = NodeId::Cdh.id();
    frame[3] = command.id();
    frame[11] = INFERRED;

    assert!(uart_rx.on_receive_complete(&frame, &mut rx).is_enqueued());
    timeout(STEP_TIMEOUT, can_worker.step())
        .await
        .expect("message queued")
        .expect("bus accepts");

    let on_bus = can_out.recv().await.expect("bus stays open");
    assert_eq!(on_bus.priority(), command.config().priority);
    assert_eq!(on_bus.sender(), NodeId::Pld.id());
}

#[tokio::test]
/// Transient transport errors are retried and the message still goes through.
async fn test_worker_retries_transient_failures() {
    let config = BridgeConfig::new().with_tx_policy(TxPolicy::new().with_retry_delay_ms(1));
    let mut bridge: Bridge<'static, 4> = Bridge::new(builtin_table(), config);
    let (serial, mut uart_out) = MockSerial::new();
    let attempts = serial.attempts();
    serial.failures().fail_next(2);
    let (bus, _can_out) = MockCanBus::new();

    let parts = bridge.split(serial, bus, MockIndicator::default(), MockTimer);
    let stats = parts.stats;
    let mut can_rx = parts.can_rx;
    let mut uart_worker = parts.uart_worker;

    let frame = satbridge::protocol::transport::can_frame::CanFrame::from_message(&power_request())
        .expect("fields fit");
    assert!(can_rx.on_frame(&frame).is_enqueued());

    timeout(STEP_TIMEOUT, uart_worker.step())
        .await
        .expect("message queued")
        .expect("third attempt succeeds");

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert!(uart_out.recv().await.is_some());
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.forwarded, 1);
    assert_eq!(snapshot.tx_failures, 0);
}

#[tokio::test]
/// After the last attempt the message is dropped and the worker moves on.
async fn test_worker_drops_after_last_attempt() {
    let config = BridgeConfig::new().with_tx_policy(TxPolicy::new().with_retry_delay_ms(1));
    let mut bridge: Bridge<'static, 4> = Bridge::new(builtin_table(), config);
    let (serial, mut uart_out) = MockSerial::new();
    let attempts = serial.attempts();
    serial.failures().fail_next(3);
    let (bus, _can_out) = MockCanBus::new();

    let parts = bridge.split(serial, bus, MockIndicator::default(), MockTimer);
    let stats = parts.stats;
    let mut can_rx = parts.can_rx;
    let mut uart_worker = parts.uart_worker;

    let first = power_request();
    let second = power_request().with_body(&[4, 0]);
    for message in [first, second] {
        let frame = satbridge::protocol::transport::can_frame::CanFrame::from_message(&message)
            .expect("fields fit");
        assert!(can_rx.on_frame(&frame).is_enqueued());
    }

    let result = timeout(STEP_TIMEOUT, uart_worker.step())
        .await
        .expect("message queued");
    assert!(matches!(result, Err(DeliveryError::Transport(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    timeout(STEP_TIMEOUT, uart_worker.step())
        .await
        .expect("message queued")
        .expect("failures used up");
    let delivered = uart_out.recv().await.expect("serial stays open");
    assert_eq!(&delivered[4..6], &[4, 0]);

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.tx_failures, 1);
    assert_eq!(snapshot.forwarded, 1);
}

#[tokio::test]
/// A message whose route does not fit the CAN identifier fails once, without retries.
async fn test_unmappable_message_is_not_retried() {
    let mut bridge: Bridge<'static, 4> = Bridge::new(builtin_table(), BridgeConfig::new());
    let codec = bridge.codec();
    let (serial, _uart_out) = MockSerial::new();
    let (bus, mut can_out) = MockCanBus::new();

    let parts = bridge.split(serial, bus, MockIndicator::default(), MockTimer);
    let stats = parts.stats;
    let mut uart_rx = parts.uart_rx;
    let mut can_worker = parts.can_worker;
    let mut rx = MockSerialRx::default();

    let stray = power_request().with_route(9, NodeId::Pwr.id());
    assert!(uart_rx
        .on_receive_complete(codec.encode(&stray).as_slice(), &mut rx)
        .is_enqueued());

    let result = timeout(STEP_TIMEOUT, can_worker.step())
        .await
        .expect("message queued");
    assert!(matches!(
        result,
        Err(DeliveryError::Mapping(CanMappingError::SenderOutOfRange { sender: 9 }))
    ));
    assert!(can_out.try_recv().is_err());
    assert_eq!(stats.snapshot().tx_failures, 1);
}

#[tokio::test]
/// A bus that never completes a send costs one deadline per attempt; the message is
/// dropped and the one behind it is still delivered.
async fn test_stalled_transmit_times_out() {
    let policy = TxPolicy::new()
        .with_max_attempts(2)
        .with_retry_delay_ms(1)
        .with_tx_timeout_ms(20);
    let mut bridge: Bridge<'static, 4> =
        Bridge::new(builtin_table(), BridgeConfig::new().with_tx_policy(policy));
    let codec = bridge.codec();
    let (serial, _uart_out) = MockSerial::new();
    let (bus, mut can_out) = MockCanBus::new();
    bus.stalls().fail_next(2);

    let parts = bridge.split(serial, bus, MockIndicator::default(), MockTimer);
    let stats = parts.stats;
    let mut uart_rx = parts.uart_rx;
    let mut can_worker = parts.can_worker;
    let mut rx = MockSerialRx::default();

    for tag in [1, 2] {
        let message = power_request().with_body(&[tag, 0]);
        assert!(uart_rx
            .on_receive_complete(codec.encode(&message).as_slice(), &mut rx)
            .is_enqueued());
    }

    let result = timeout(STEP_TIMEOUT, can_worker.step())
        .await
        .expect("stalled send is abandoned");
    assert!(matches!(result, Err(DeliveryError::Timeout { timeout_ms: 20 })));
    assert_eq!(stats.snapshot().tx_failures, 1);
    assert!(can_out.try_recv().is_err());

    timeout(STEP_TIMEOUT, can_worker.step())
        .await
        .expect("second message queued")
        .expect("bus recovered");
    let on_bus = can_out.recv().await.expect("bus stays open");
    let delivered = on_bus.to_message(&builtin_table()).expect("known command");
    assert_eq!(delivered.body[0], 2);

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.forwarded, 1);
    assert_eq!(snapshot.tx_failures, 1);
}

#[tokio::test]
/// With no worker draining, the newest frame is dropped and the oldest survive in order.
async fn test_queue_full_drops_newest() {
    let mut bridge: Bridge<'static, 4> = Bridge::new(builtin_table(), BridgeConfig::new());
    let codec = bridge.codec();
    let (serial, _uart_out) = MockSerial::new();
    let (bus, mut can_out) = MockCanBus::new();

    let parts = bridge.split(serial, bus, MockIndicator::default(), MockTimer);
    let stats = parts.stats;
    let mut uart_rx = parts.uart_rx;
    let mut can_worker = parts.can_worker;
    let mut rx = MockSerialRx::default();

    let outcomes: Vec<RxOutcome> = (1..=4u8)
        .map(|tag| {
            let frame = codec.encode(&power_request().with_body(&[tag, 0]));
            uart_rx.on_receive_complete(frame.as_slice(), &mut rx)
        })
        .collect();

    assert_eq!(
        outcomes,
        vec![
            RxOutcome::Enqueued,
            RxOutcome::Enqueued,
            RxOutcome::Enqueued,
            RxOutcome::Dropped(DropReason::QueueFull),
        ]
    );
    assert_eq!(rx.rearmed, 4);
    assert_eq!(stats.snapshot().queue_full_drops, 1);

    for expected in 1..=3u8 {
        timeout(STEP_TIMEOUT, can_worker.step())
            .await
            .expect("message queued")
            .expect("bus accepts");
        let frame = can_out.recv().await.expect("bus stays open");
        assert_eq!(frame.data[1], expected);
    }
    assert_eq!(can_worker.pending(), 0);
}

#[tokio::test]
/// Malformed and unknown frames are counted and never reach a queue.
async fn test_bad_frames_are_counted() {
    let mut bridge: Bridge<'static, 4> = Bridge::new(builtin_table(), BridgeConfig::new());
    let (serial, _uart_out) = MockSerial::new();
    let (bus, _can_out) = MockCanBus::new();

    let parts = bridge.split(serial, bus, MockIndicator::default(), MockTimer);
    let stats = parts.stats;
    let mut uart_rx = parts.uart_rx;
    let mut rx = MockSerialRx::default();

    let mut unknown = [0u8; 13];
    unknown[0] = INFERRED;
    unknown[3] = 200;

    assert!(!uart_rx.on_receive_complete(&[1, 2, 3], &mut rx).is_enqueued());
    assert!(!uart_rx.on_receive_complete(&unknown, &mut rx).is_enqueued());

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.malformed_frames, 1);
    assert_eq!(snapshot.unknown_commands, 1);
    assert_eq!(uart_rx.pending(), 0);
    assert_eq!(rx.rearmed, 2);
}
