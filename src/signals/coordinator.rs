//! Signal Coordinator
//!
//! Runs the daily pipeline in its fixed order: composite scoring over the
//! dense calendar, light classification, then the single fatigue pass.

use super::classifier::{SignalClassifier, SignalLabel};
use super::composite::{CompositeScorer, DailyRecord};
use super::fatigue::FatigueSuppressor;
use crate::config::SignalConfig;
use crate::market_data::InputTables;
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts describing one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_days: usize,
    pub trading_days: usize,
    pub scored_days: usize,
    pub suppressed: usize,
    pub label_counts: BTreeMap<SignalLabel, usize>,
}

impl RunSummary {
    pub fn from_records(records: &[DailyRecord]) -> Self {
        let mut label_counts = BTreeMap::new();
        for label in records.iter().filter_map(|r| r.signal_label) {
            *label_counts.entry(label).or_insert(0) += 1;
        }

        Self {
            total_days: records.len(),
            trading_days: records.iter().filter(|r| r.market_price.is_some()).count(),
            scored_days: records.iter().filter(|r| r.composite_score.is_some()).count(),
            suppressed: records.iter().filter(|r| r.suppressed).count(),
            label_counts,
        }
    }

    pub fn count(&self, label: SignalLabel) -> usize {
        self.label_counts.get(&label).copied().unwrap_or(0)
    }
}

/// Output table plus its summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalReport {
    pub records: Vec<DailyRecord>,
    pub summary: RunSummary,
}

pub struct SignalCoordinator {
    config: SignalConfig,
    scorer: CompositeScorer,
    classifier: SignalClassifier,
    suppressor: FatigueSuppressor,
}

impl SignalCoordinator {
    /// Create coordinator with validated configuration
    pub fn with_config(config: SignalConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            scorer: CompositeScorer::new(&config),
            classifier: SignalClassifier::new(config.signal_bands),
            suppressor: FatigueSuppressor::new(),
            config,
        })
    }

    /// Build, classify and smooth the daily table
    pub fn run(&self, inputs: &InputTables) -> SignalReport {
        let mut records = self.scorer.build_records(inputs);

        for record in records.iter_mut() {
            record.signal_label = self.classifier.classify(record.composite_score);
        }

        // every label must be final before the fatigue window reads it
        if self.config.fatigue.enabled {
            let suppressed = self.suppressor.apply(&mut records);
            info!("Fatigue pass downgraded {} labels to neutral", suppressed);
        }

        let summary = RunSummary::from_records(&records);
        info!(
            "Signal run {} to {}: {} days, {} trading, {} scored",
            self.config.calendar.start_date,
            self.config.calendar.end_date,
            summary.total_days,
            summary.trading_days,
            summary.scored_days
        );
        for label in SignalLabel::ALL {
            info!("  {:<12} {}", label.as_str(), summary.count(label));
        }

        SignalReport { records, summary }
    }
}
