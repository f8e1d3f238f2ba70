// Unit tests for ReturnIntentSlot

use crate::session::ReturnIntentSlot;

use models::ReturnIntentBuilder;

use std::time::Duration;

fn intent(path: &str, auto_start: bool) -> models::ReturnIntent {
    ReturnIntentBuilder::default()
        .with_return_path(path)
        .with_auto_start_capture(auto_start)
        .build()
        .expect("valid intent")
}

/// **VALUE**: Verifies an intent can be read exactly once.
///
/// **WHY THIS MATTERS**: A second read would auto-start the camera again on
/// every visit to the capture page.
///
/// **BUG THIS CATCHES**: Would catch `take` cloning instead of removing.
#[test]
fn given_recorded_intent_when_taken_twice_then_second_read_is_empty() {
    // GIVEN
    let slot = ReturnIntentSlot::new(Duration::from_secs(300));
    slot.record(intent("/", true));

    // WHEN
    let first = slot.take();
    let second = slot.take();

    // THEN
    assert_eq!(first, Some(intent("/", true)));
    assert!(second.is_none());
    assert!(!slot.is_occupied());
}

/// **VALUE**: Verifies expired intents read as absent and are removed.
///
/// **BUG THIS CATCHES**: Would catch a stale intent from an abandoned login
/// auto-starting the camera much later.
#[test]
fn given_expired_intent_when_taken_then_none_and_slot_emptied() {
    let slot = ReturnIntentSlot::new(Duration::ZERO);
    slot.record(intent("/", true));

    assert!(slot.take().is_none());
    assert!(!slot.is_occupied());
}

#[test]
fn given_second_record_when_taken_then_latest_wins() {
    let slot = ReturnIntentSlot::new(Duration::from_secs(300));
    slot.record(intent("/about/", false));
    slot.record(intent("/", true));

    assert_eq!(slot.take(), Some(intent("/", true)));
}

/// **VALUE**: Verifies clones share storage, so clearing on logout is seen everywhere.
#[test]
fn given_cloned_slot_when_cleared_then_original_is_empty() {
    let slot = ReturnIntentSlot::new(Duration::from_secs(300));
    let clone = slot.clone();
    slot.record(intent("/", true));

    clone.clear();

    assert!(!slot.is_occupied());
}

#[test]
fn given_auto_start_intent_when_peeked_then_still_stored() {
    let slot = ReturnIntentSlot::new(Duration::from_secs(300));
    slot.record(intent("/", true));

    assert!(slot.pending_auto_start());
    assert!(slot.pending_auto_start());
    assert!(slot.take().is_some());
    assert!(!slot.pending_auto_start());
}

#[test]
fn given_expired_intent_when_peeked_then_no_auto_start() {
    let slot = ReturnIntentSlot::new(Duration::ZERO);
    slot.record(intent("/", true));

    assert!(!slot.pending_auto_start());
}
