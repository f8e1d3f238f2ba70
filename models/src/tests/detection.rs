use crate::{DetectionResult, ModelError};

/// **VALUE**: Verifies the confidence string format used on the result card.
///
/// **WHY THIS MATTERS**: The server returns a fraction; users see a percentage
/// with exactly one decimal. `0.87 * 100.0` is not exactly 87.0 in binary
/// floating point, so the formatting must round rather than print raw digits.
///
/// **BUG THIS CATCHES**: Would catch printing `87.00000000000001%` or `87%`.
#[test]
fn given_happy_087_when_formatting_confidence_then_returns_87_0_percent() {
    // GIVEN: The classifier output from the happy-path scenario
    let result = DetectionResult::new("happy", 0.87).unwrap();

    // WHEN/THEN: Display string and raw label
    assert_eq!(result.confidence_display(), "87.0%");
    assert_eq!(result.mood(), "happy");
    assert_eq!(result.mood_label(), "Happy");
    assert_eq!(result.mood_emoji(), "😊");
}

#[test]
fn given_edge_confidences_when_formatting_then_rounds_to_one_decimal() {
    assert_eq!(DetectionResult::new("sad", 0.0).unwrap().confidence_display(), "0.0%");
    assert_eq!(DetectionResult::new("sad", 1.0).unwrap().confidence_display(), "100.0%");
    assert_eq!(DetectionResult::new("sad", 0.12345).unwrap().confidence_display(), "12.3%");
}

/// **VALUE**: Verifies out-of-range confidences are rejected.
///
/// **BUG THIS CATCHES**: Would catch a server bug (percent instead of fraction)
/// rendering as "8700.0%".
#[test]
fn given_out_of_range_confidence_when_building_then_returns_validation_error() {
    for bad in [-0.1, 1.01, 87.0, f64::NAN, f64::INFINITY] {
        let result = DetectionResult::new("happy", bad);
        match result {
            Err(ModelError::Validation { message, .. }) => {
                assert!(message.contains("Confidence"), "unexpected message: {message}");
            }
            Ok(_) => panic!("confidence {bad} should be rejected"),
        }
    }
}

#[test]
fn given_empty_mood_when_building_then_returns_validation_error() {
    let result = DetectionResult::new("   ", 0.5);

    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

#[test]
fn given_unknown_mood_when_looking_up_emoji_then_uses_default() {
    let result = DetectionResult::new("bewildered", 0.5).unwrap();

    assert_eq!(result.mood_emoji(), "😊");
    assert_eq!(result.mood_label(), "Bewildered");
}
