use crate::channel::EventChannel;

use models::Event;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// **VALUE**: Verifies listeners are called in registration order.
///
/// **WHY THIS MATTERS**: Hosts often register a logging listener first and a
/// handler second. Reordering would log after side effects already happened.
///
/// **BUG THIS CATCHES**: Would catch the registry switching to an unordered map.
#[test]
fn given_multiple_listeners_when_dispatching_then_called_in_order() {
    // GIVEN: Two listeners appending to a shared log
    let channel = EventChannel::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let first_calls = Arc::clone(&calls);
    let second_calls = Arc::clone(&calls);
    channel.register(Arc::new(move |_: &Event| first_calls.lock().unwrap().push("first")));
    channel.register(Arc::new(move |_: &Event| second_calls.lock().unwrap().push("second")));

    // WHEN: Receiving one event
    let event = channel.receive(r#"{"type":"exit_requested"}"#);

    // THEN: Both ran, in order
    assert_eq!(event, Some(Event::ExitRequested));
    assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn given_same_listener_registered_twice_when_dispatching_then_called_once() {
    let channel = EventChannel::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let listener: Arc<dyn crate::channel::EventListener> = Arc::new(move |_: &Event| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let first = channel.register(Arc::clone(&listener));
    let second = channel.register(listener);
    channel.receive(r#"{"type":"exit_requested"}"#);

    assert_eq!(first, second);
    assert_eq!(channel.listener_count(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn given_unregistered_listener_when_dispatching_then_not_called() {
    let channel = EventChannel::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let id = channel.register(Arc::new(move |_: &Event| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    assert!(channel.unregister(id));
    assert!(!channel.unregister(id));
    channel.receive(r#"{"type":"exit_requested"}"#);

    assert_eq!(count.load(Ordering::SeqCst), 0);
}

/// **VALUE**: Verifies malformed messages never reach listeners.
///
/// **BUG THIS CATCHES**: Would catch a decode failure being turned into a default
/// event (e.g. an empty telemetry) that listeners then act on.
#[test]
fn given_malformed_messages_when_received_then_dropped() {
    // GIVEN: A listener counting calls
    let channel = EventChannel::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    channel.register(Arc::new(move |_: &Event| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    // WHEN: Receiving garbage and incomplete messages
    let inputs = [
        "not json",
        r#"{"type":"unknown_kind"}"#,
        r#"{"type":"credentials_expired"}"#,
        r#"{"type":"credentials_expired","requestId":"  "}"#,
        r#"{"name":"content_loaded"}"#,
    ];

    // THEN: None is delivered
    for raw in inputs {
        assert!(channel.receive(raw).is_none(), "{raw}");
    }
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn given_listener_unregistering_itself_when_dispatching_then_no_deadlock() {
    let channel = Arc::new(EventChannel::new());
    let id_slot = Arc::new(Mutex::new(None));
    let inner_channel = Arc::clone(&channel);
    let inner_slot = Arc::clone(&id_slot);

    let id = channel.register(Arc::new(move |_: &Event| {
        if let Some(id) = *inner_slot.lock().unwrap() {
            inner_channel.unregister(id);
        }
    }));
    *id_slot.lock().unwrap() = Some(id);

    channel.receive(r#"{"type":"exit_requested"}"#);

    assert_eq!(channel.listener_count(), 0);
}
