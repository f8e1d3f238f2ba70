//! Mood classification result.

use crate::error::model_error::ModelError;

use common::ErrorLocation;

use std::panic::Location;

use serde::Serialize;

/// Emoji shown next to each mood label the classifier can return.
const MOOD_EMOJIS: &[(&str, &str)] = &[
    ("happy", "😊"),
    ("sad", "😢"),
    ("angry", "😠"),
    ("neutral", "😐"),
    ("surprised", "😲"),
    ("fear", "😨"),
    ("disgust", "🤢"),
    ("excited", "🤩"),
    ("confident", "😎"),
    ("motivated", "💪"),
    ("dancing", "💃"),
    ("romantic", "😍"),
    ("peaceful", "😌"),
    ("energetic", "⚡"),
    ("melancholic", "🥺"),
    ("playful", "😜"),
];

const DEFAULT_MOOD_EMOJI: &str = "😊";

/// A single mood classification. Transient: displayed, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    mood: String,
    confidence: f64,
}

impl DetectionResult {
    /// Build a validated result.
    ///
    /// The mood label is kept byte-for-byte as the server sent it so that the
    /// playlist request uses exactly the same label.
    #[track_caller]
    pub fn new(mood: impl Into<String>, confidence: f64) -> Result<Self, ModelError> {
        let mood = mood.into();

        if mood.trim().is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Mood label cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(ModelError::Validation {
                message: format!("Confidence must be within [0, 1], got {confidence}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self { mood, confidence })
    }

    pub fn mood(&self) -> &str {
        &self.mood
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Confidence as a percentage with one decimal, e.g. `0.87` -> `"87.0%"`.
    pub fn confidence_display(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    /// Mood with its first character upper-cased.
    pub fn mood_label(&self) -> String {
        let mut chars = self.mood.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn mood_emoji(&self) -> &'static str {
        MOOD_EMOJIS
            .iter()
            .find(|(mood, _)| *mood == self.mood)
            .map(|(_, emoji)| *emoji)
            .unwrap_or(DEFAULT_MOOD_EMOJI)
    }
}
