//! Premium/discount scoring
//!
//! Two independent strategies turn the rate history into a bounded score:
//! fixed cut points on the day's rate, or bands on a trailing z-score with a
//! reinforcement rule that lifts long sub-positive stretches.

use crate::config::{PremiumConfig, RollingZScoreConfig, StaticThresholdConfig};
use crate::stats;
use log::{debug, warn};

/// Common interface for premium scoring strategies
pub trait PremiumStrategy {
    /// Score a rate series in trading-day order, one output per input
    fn score_series(&self, rates: &[Option<f64>]) -> Vec<Option<f64>>;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}

/// Build the strategy selected by configuration
pub fn strategy_from_config(config: &PremiumConfig) -> Box<dyn PremiumStrategy> {
    match config {
        PremiumConfig::StaticThreshold(config) => Box::new(StaticThresholdScorer::new(config.clone())),
        PremiumConfig::RollingZScore(config) => Box::new(RollingZScoreScorer::new(config.clone())),
    }
}

/// Step function over fixed, ascending cut points
#[derive(Debug, Clone)]
pub struct StaticThresholdScorer {
    config: StaticThresholdConfig,
}

impl StaticThresholdScorer {
    pub fn new(config: StaticThresholdConfig) -> Self {
        Self { config }
    }

    /// Score one rate; a rate exactly on a cut point takes that cut point's score
    pub fn score(&self, rate: f64) -> f64 {
        self.config
            .cut_points
            .iter()
            .find(|cut| rate <= cut.upper_bound)
            .map(|cut| cut.score)
            .unwrap_or(self.config.above_score)
    }
}

impl PremiumStrategy for StaticThresholdScorer {
    fn score_series(&self, rates: &[Option<f64>]) -> Vec<Option<f64>> {
        rates.iter().map(|rate| rate.map(|r| self.score(r))).collect()
    }

    fn name(&self) -> &'static str {
        "static_threshold"
    }
}

/// Run-length accumulator for the reinforcement rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReinforcementState {
    /// Consecutive scored days below the weak positive score
    pub count: usize,
    /// Index of the last day that scored at least the weak positive score
    pub last_positive_index: Option<usize>,
}

/// Trailing z-score bands with reinforcement
#[derive(Debug, Clone)]
pub struct RollingZScoreScorer {
    config: RollingZScoreConfig,
}

impl RollingZScoreScorer {
    pub fn new(config: RollingZScoreConfig) -> Self {
        Self { config }
    }

    /// Map a z-score onto the five premium levels before reinforcement
    pub fn band_score(&self, z: f64) -> f64 {
        let bands = &self.config.bands;
        if z <= -bands.strong_edge {
            bands.strong_score
        } else if z <= -bands.weak_edge {
            bands.weak_score
        } else if z >= bands.strong_edge {
            -bands.strong_score
        } else if z >= bands.weak_edge {
            -bands.weak_score
        } else {
            0.0
        }
    }

    /// Trailing z-score for each position. Undefined rates are not observations.
    pub fn zscores(&self, rates: &[Option<f64>]) -> Vec<Option<f64>> {
        let observed: Vec<f64> = rates.iter().flatten().copied().collect();
        let observed_z = match stats::rolling_zscores(&observed, self.config.window) {
            Ok(z) => z,
            Err(e) => {
                warn!("Rolling z-score unavailable: {}", e);
                return vec![None; rates.len()];
            }
        };

        let mut observed_z = observed_z.into_iter();
        rates
            .iter()
            .map(|rate| match rate {
                Some(_) => observed_z.next().flatten(),
                None => None,
            })
            .collect()
    }

    /// Apply bands and reinforcement to an already computed z-score series
    pub fn score_zscores(&self, zscores: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut state = ReinforcementState::default();
        zscores
            .iter()
            .enumerate()
            .map(|(index, z)| z.map(|z| self.reinforce(&mut state, index, z)))
            .collect()
    }

    fn reinforce(&self, state: &mut ReinforcementState, index: usize, z: f64) -> f64 {
        let weak_score = self.config.bands.weak_score;
        let rule = &self.config.reinforcement;
        let raw = self.band_score(z);

        if raw >= weak_score {
            state.count = 0;
            state.last_positive_index = Some(index);
            return raw;
        }

        state.count += 1;
        if state.count >= rule.threshold && (rule.tolerance_low..=rule.tolerance_high).contains(&z) {
            debug!(
                "Reinforcing premium score at index {} after {} sub-positive days (z = {:.3}, last positive {:?})",
                index, state.count, z, state.last_positive_index
            );
            state.count = 0;
            state.last_positive_index = Some(index);
            return weak_score;
        }

        raw
    }
}

impl PremiumStrategy for RollingZScoreScorer {
    fn score_series(&self, rates: &[Option<f64>]) -> Vec<Option<f64>> {
        self.score_zscores(&self.zscores(rates))
    }

    fn name(&self) -> &'static str {
        "rolling_z_score"
    }
}
