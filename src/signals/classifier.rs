//! Composite score to light label
//!
//! Five ordered lights from strong red to strong green. The band edges come
//! from configuration; the classifier itself has a single code path.

use crate::config::SignalBands;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Advisory light, ordered from most bearish to most bullish
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalLabel {
    RedStrong,
    RedWeak,
    Neutral,
    GreenWeak,
    GreenStrong,
}

impl SignalLabel {
    pub const ALL: [SignalLabel; 5] = [
        SignalLabel::RedStrong,
        SignalLabel::RedWeak,
        SignalLabel::Neutral,
        SignalLabel::GreenWeak,
        SignalLabel::GreenStrong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalLabel::RedStrong => "red_strong",
            SignalLabel::RedWeak => "red_weak",
            SignalLabel::Neutral => "neutral",
            SignalLabel::GreenWeak => "green_weak",
            SignalLabel::GreenStrong => "green_strong",
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == SignalLabel::Neutral
    }

    /// Marker colour used by chart renderers
    pub fn color(&self) -> &'static str {
        match self {
            SignalLabel::RedStrong => "#B00000",
            SignalLabel::RedWeak => "salmon",
            SignalLabel::Neutral => "gold",
            SignalLabel::GreenWeak => "lightgreen",
            SignalLabel::GreenStrong => "#008000",
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SignalClassifier {
    bands: SignalBands,
}

impl SignalClassifier {
    pub fn new(bands: SignalBands) -> Self {
        Self { bands }
    }

    /// Classify a composite score; undefined or NaN stays undefined
    pub fn classify(&self, composite: Option<f64>) -> Option<SignalLabel> {
        let score = composite.filter(|s| !s.is_nan())?;
        let bands = &self.bands;

        let label = if score >= bands.green_strong {
            SignalLabel::GreenStrong
        } else if score >= bands.green_weak {
            SignalLabel::GreenWeak
        } else if score > bands.red_weak {
            SignalLabel::Neutral
        } else if score > bands.red_strong {
            SignalLabel::RedWeak
        } else {
            SignalLabel::RedStrong
        };

        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_bands() {
        let classifier = SignalClassifier::new(SignalBands::balanced());
        assert_eq!(classifier.classify(Some(0.5)), Some(SignalLabel::GreenStrong));
        assert_eq!(classifier.classify(Some(0.49)), Some(SignalLabel::GreenWeak));
        assert_eq!(classifier.classify(Some(0.2)), Some(SignalLabel::GreenWeak));
        assert_eq!(classifier.classify(Some(0.19)), Some(SignalLabel::Neutral));
        assert_eq!(classifier.classify(Some(-0.49)), Some(SignalLabel::Neutral));
        assert_eq!(classifier.classify(Some(-0.5)), Some(SignalLabel::RedWeak));
        assert_eq!(classifier.classify(Some(-0.69)), Some(SignalLabel::RedWeak));
        assert_eq!(classifier.classify(Some(-0.7)), Some(SignalLabel::RedStrong));
    }

    #[test]
    fn test_standard_bands() {
        let classifier = SignalClassifier::new(SignalBands::standard());
        assert_eq!(classifier.classify(Some(0.8)), Some(SignalLabel::GreenStrong));
        assert_eq!(classifier.classify(Some(-0.4)), Some(SignalLabel::RedWeak));
        assert_eq!(classifier.classify(Some(-0.39)), Some(SignalLabel::Neutral));
        assert_eq!(classifier.classify(Some(-0.8)), Some(SignalLabel::RedStrong));
    }

    #[test]
    fn test_infinite_scores_land_in_outer_bands() {
        let classifier = SignalClassifier::new(SignalBands::wide());
        assert_eq!(classifier.classify(Some(f64::INFINITY)), Some(SignalLabel::GreenStrong));
        assert_eq!(classifier.classify(Some(f64::NEG_INFINITY)), Some(SignalLabel::RedStrong));
    }

    #[test]
    fn test_undefined_composite() {
        let classifier = SignalClassifier::new(SignalBands::balanced());
        assert_eq!(classifier.classify(None), None);
        assert_eq!(classifier.classify(Some(f64::NAN)), None);
    }

    #[test]
    fn test_label_ordering() {
        assert!(SignalLabel::RedStrong < SignalLabel::RedWeak);
        assert!(SignalLabel::Neutral < SignalLabel::GreenWeak);
        assert_eq!(SignalLabel::GreenWeak.to_string(), "green_weak");
    }
}
