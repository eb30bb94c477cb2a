//! Fatigue suppression
//!
//! A fourth consecutive weak light of the same colour is downgraded to
//! neutral unless the composite score keeps moving further in that colour's
//! direction. Runs are matched against the labels as classified, so one
//! downgrade never hides or creates another run.

use super::classifier::SignalLabel;
use super::composite::DailyRecord;
use log::debug;

const RUN_LENGTH: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct FatigueSuppressor;

impl FatigueSuppressor {
    pub fn new() -> Self {
        Self
    }

    /// Indices whose label should become neutral. Single forward pass, no lookahead.
    pub fn find_suppressed(&self, labels: &[Option<SignalLabel>], scores: &[Option<f64>]) -> Vec<usize> {
        let len = labels.len().min(scores.len());
        let mut suppressed = Vec::new();

        for i in (RUN_LENGTH - 1)..len {
            let start = i + 1 - RUN_LENGTH;
            let window = &labels[start..=i];

            let Some(first) = window[0] else {
                continue;
            };
            if !window.iter().all(|label| *label == Some(first)) {
                continue;
            }

            let Some(current) = scores[i] else {
                continue;
            };
            let Some(previous) = scores[start..i].iter().copied().collect::<Option<Vec<f64>>>() else {
                continue;
            };

            let fatigued = match first {
                SignalLabel::RedWeak => {
                    let min = previous.iter().copied().fold(f64::INFINITY, f64::min);
                    current >= min
                }
                SignalLabel::GreenWeak => {
                    let max = previous.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    current <= max
                }
                _ => false,
            };

            if fatigued {
                debug!("Fatigue at index {}: {} run downgraded to neutral", i, first);
                suppressed.push(i);
            }
        }

        suppressed
    }

    /// Downgrade fatigued labels in place and return how many changed
    pub fn apply(&self, records: &mut [DailyRecord]) -> usize {
        let labels: Vec<Option<SignalLabel>> = records.iter().map(|r| r.signal_label).collect();
        let scores: Vec<Option<f64>> = records.iter().map(|r| r.composite_score).collect();

        let suppressed = self.find_suppressed(&labels, &scores);
        for &i in &suppressed {
            records[i].signal_label = Some(SignalLabel::Neutral);
            records[i].suppressed = true;
        }

        suppressed.len()
    }
}
