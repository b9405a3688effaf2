#![cfg(feature = "runtime")]

use embassy_futures::{block_on, join::join};
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
use embassy_time::{Instant, Timer};
use multitap::{
    runtime::{run_recognizer, RecognizerInput, RuntimeEvent},
    EventType, GestureState, InputSample, NoRequireFailures, PointerPoint, RecognizerHost,
    RecordingSink, SiblingsPending, TapRecognizer, TimerFired,
};

fn sample_now(event_type: EventType, delta_time: u64) -> InputSample {
    InputSample::single(
        event_type,
        Instant::now().as_millis(),
        delta_time,
        0.0,
        PointerPoint::new(40.0, 40.0),
    )
}

fn drain(events: &Channel<NoopRawMutex, RuntimeEvent, 16>) -> Vec<RuntimeEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_receive() {
        out.push(event);
    }
    out
}

fn run_script(
    host: &dyn RecognizerHost,
    script: impl core::future::Future<Output = ()>,
    inputs: &Channel<NoopRawMutex, RecognizerInput, 8>,
    events: &Channel<NoopRawMutex, RuntimeEvent, 16>,
) -> RecordingSink {
    let mut recognizer = TapRecognizer::default();
    let mut sink = RecordingSink::new();
    block_on(join(
        run_recognizer(
            &mut recognizer,
            host,
            &mut sink,
            inputs.receiver(),
            events.sender(),
        ),
        script,
    ));
    sink
}

#[test]
fn quiet_input_trips_fail_safe() {
    let inputs = Channel::<NoopRawMutex, RecognizerInput, 8>::new();
    let events = Channel::<NoopRawMutex, RuntimeEvent, 16>::new();

    let script = async {
        inputs
            .send(RecognizerInput::Sample(sample_now(EventType::START, 0)))
            .await;
        Timer::after_millis(320).await;
        inputs.send(RecognizerInput::Shutdown).await;
    };
    let sink = run_script(&NoRequireFailures, script, &inputs, &events);

    let published = drain(&events);
    assert_eq!(published.len(), 2, "unexpected events: {published:?}");
    assert_eq!(published[0].state, GestureState::Began);
    assert_eq!(published[1].state, GestureState::Failed);
    assert_eq!(published[1].fired, Some(TimerFired::FailSafe));
    assert!(sink.events.is_empty());
}

#[test]
fn recognized_tap_is_emitted_immediately() {
    let inputs = Channel::<NoopRawMutex, RecognizerInput, 8>::new();
    let events = Channel::<NoopRawMutex, RuntimeEvent, 16>::new();

    let script = async {
        inputs
            .send(RecognizerInput::Sample(sample_now(EventType::START, 0)))
            .await;
        Timer::after_millis(40).await;
        inputs
            .send(RecognizerInput::Sample(sample_now(EventType::END, 40)))
            .await;
        inputs.send(RecognizerInput::Shutdown).await;
    };
    let sink = run_script(&NoRequireFailures, script, &inputs, &events);

    let published = drain(&events);
    assert_eq!(published.last().map(|e| e.state), Some(GestureState::Recognized));
    assert_eq!(sink.events.len(), 1);
    assert_eq!(sink.events[0].0, "tap");
    assert_eq!(sink.events[0].1.tap_count, 1);
}

#[test]
fn deferred_commit_emits_after_delay() {
    let inputs = Channel::<NoopRawMutex, RecognizerInput, 8>::new();
    let events = Channel::<NoopRawMutex, RuntimeEvent, 16>::new();

    let script = async {
        inputs
            .send(RecognizerInput::Sample(sample_now(EventType::START, 0)))
            .await;
        Timer::after_millis(40).await;
        inputs
            .send(RecognizerInput::Sample(sample_now(EventType::END, 40)))
            .await;
        Timer::after_millis(400).await;
        inputs.send(RecognizerInput::Shutdown).await;
    };
    let sink = run_script(&SiblingsPending, script, &inputs, &events);

    let published = drain(&events);
    let commit = published
        .iter()
        .find(|event| event.fired == Some(TimerFired::Commit))
        .expect("deferred commit should fire");
    assert_eq!(commit.state, GestureState::Recognized);
    assert_eq!(sink.events.len(), 1);
}
