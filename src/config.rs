use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    pub calendar: CalendarConfig,
    pub premium: PremiumConfig,
    #[serde(default)]
    pub sentiment_weights: SentimentWeights,
    pub volatility: VolatilityConfig,
    pub composite_weights: CompositeWeights,
    pub signal_bands: SignalBands,
    #[serde(default)]
    pub fatigue: FatigueConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
}

/// Premium/discount scoring strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PremiumConfig {
    StaticThreshold(StaticThresholdConfig),
    RollingZScore(RollingZScoreConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticThresholdConfig {
    /// Ascending cut points; the first with `rate <= upper_bound` wins
    pub cut_points: Vec<CutPoint>,
    /// Score for rates above the last cut point
    pub above_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutPoint {
    pub upper_bound: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingZScoreConfig {
    /// Number of trailing rate observations, current one included
    pub window: usize,
    #[serde(default)]
    pub bands: ZScoreBands,
    pub reinforcement: ReinforcementConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ZScoreBands {
    #[serde(default = "default_strong_edge")]
    pub strong_edge: f64,
    #[serde(default = "default_weak_edge")]
    pub weak_edge: f64,
    #[serde(default = "default_strong_score")]
    pub strong_score: f64,
    #[serde(default = "default_weak_score")]
    pub weak_score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReinforcementConfig {
    /// Consecutive sub-positive days before the score is forced up
    pub threshold: usize,
    pub tolerance_low: f64,
    pub tolerance_high: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SentimentWeights {
    pub cnyes: f64,
    pub mega: f64,
    pub ptt: f64,
}

/// VIX scoring shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum VolatilityConfig {
    /// Descending floors, `vix >= floor` first match wins
    Graded {
        steps: Vec<VolatilityStep>,
        floor_score: f64,
    },
    /// `vix > upper` scores 1, `vix < lower` scores -1, otherwise 0
    TriLevel { upper: f64, lower: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityStep {
    pub floor: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeWeights {
    /// `None` when the premium scorer's output is already on the composite scale
    #[serde(default)]
    pub premium: Option<f64>,
    pub volatility: f64,
}

/// Composite score boundaries for the five lights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalBands {
    pub green_strong: f64,
    pub green_weak: f64,
    pub red_weak: f64,
    pub red_strong: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FatigueConfig {
    #[serde(default = "default_fatigue_enabled")]
    pub enabled: bool,
}

impl Default for SentimentWeights {
    fn default() -> Self {
        Self {
            cnyes: 0.1,
            mega: 0.1,
            ptt: 0.1,
        }
    }
}

impl Default for ZScoreBands {
    fn default() -> Self {
        Self {
            strong_edge: default_strong_edge(),
            weak_edge: default_weak_edge(),
            strong_score: default_strong_score(),
            weak_score: default_weak_score(),
        }
    }
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            enabled: default_fatigue_enabled(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
        }
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}
fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 31).unwrap_or(NaiveDate::MIN)
}
fn default_strong_edge() -> f64 {
    1.2
}
fn default_weak_edge() -> f64 {
    0.3
}
fn default_strong_score() -> f64 {
    0.5
}
fn default_weak_score() -> f64 {
    0.25
}
fn default_fatigue_enabled() -> bool {
    true
}

impl StaticThresholdConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cut_points.is_empty() {
            return Err(anyhow!("Static premium strategy needs at least one cut point"));
        }
        if let Some(cut) = self
            .cut_points
            .iter()
            .find(|cut| !cut.upper_bound.is_finite() || !cut.score.is_finite())
        {
            return Err(anyhow!(
                "Static premium cut point must be finite, got bound {} score {}",
                cut.upper_bound,
                cut.score
            ));
        }
        if !self.above_score.is_finite() {
            return Err(anyhow!("Static premium above score must be finite"));
        }
        if self
            .cut_points
            .windows(2)
            .any(|pair| pair[0].upper_bound >= pair[1].upper_bound)
        {
            return Err(anyhow!(
                "Static premium cut points must be strictly ascending"
            ));
        }
        Ok(())
    }
}

impl Default for StaticThresholdConfig {
    fn default() -> Self {
        Self {
            cut_points: vec![
                CutPoint { upper_bound: -0.49, score: 0.5 },
                CutPoint { upper_bound: -0.16, score: 0.25 },
                CutPoint { upper_bound: 0.09, score: 0.0 },
                CutPoint { upper_bound: 0.38, score: -0.25 },
            ],
            above_score: -0.5,
        }
    }
}

impl RollingZScoreConfig {
    pub fn new(window: usize, threshold: usize, tolerance_low: f64, tolerance_high: f64) -> Self {
        Self {
            window,
            bands: ZScoreBands::default(),
            reinforcement: ReinforcementConfig {
                threshold,
                tolerance_low,
                tolerance_high,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window < 2 {
            return Err(anyhow!(
                "Rolling z-score window must be at least 2, got {}",
                self.window
            ));
        }
        if self.reinforcement.threshold == 0 {
            return Err(anyhow!("Reinforcement threshold must be positive"));
        }
        if self.reinforcement.tolerance_low > self.reinforcement.tolerance_high {
            return Err(anyhow!(
                "Reinforcement tolerance band is inverted: [{}, {}]",
                self.reinforcement.tolerance_low,
                self.reinforcement.tolerance_high
            ));
        }
        if !(0.0 <= self.bands.weak_edge && self.bands.weak_edge < self.bands.strong_edge) {
            return Err(anyhow!(
                "Z-score edges must satisfy 0 <= weak < strong, got weak {} strong {}",
                self.bands.weak_edge,
                self.bands.strong_edge
            ));
        }
        Ok(())
    }
}

impl VolatilityConfig {
    pub fn graded() -> Self {
        VolatilityConfig::Graded {
            steps: vec![
                VolatilityStep { floor: 30.0, score: 1.0 },
                VolatilityStep { floor: 25.0, score: 0.5 },
                VolatilityStep { floor: 20.0, score: 0.0 },
                VolatilityStep { floor: 15.0, score: -0.5 },
            ],
            floor_score: -1.0,
        }
    }

    pub fn tri_level() -> Self {
        VolatilityConfig::TriLevel {
            upper: 22.72,
            lower: 17.12,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            VolatilityConfig::Graded { steps, floor_score } => {
                if steps
                    .iter()
                    .any(|step| !step.floor.is_finite() || !step.score.is_finite())
                    || !floor_score.is_finite()
                {
                    return Err(anyhow!("Graded VIX floors and scores must be finite"));
                }
                if steps.windows(2).any(|pair| pair[0].floor <= pair[1].floor) {
                    return Err(anyhow!("Graded VIX floors must be strictly descending"));
                }
            }
            VolatilityConfig::TriLevel { upper, lower } => {
                if !upper.is_finite() || !lower.is_finite() {
                    return Err(anyhow!("Tri-level VIX bounds must be finite"));
                }
                if lower > upper {
                    return Err(anyhow!(
                        "Tri-level VIX lower bound {} exceeds upper bound {}",
                        lower,
                        upper
                    ));
                }
            }
        }
        Ok(())
    }
}

impl SignalBands {
    /// 0.8 / 0.2 / -0.4 / -0.8
    pub fn standard() -> Self {
        Self {
            green_strong: 0.8,
            green_weak: 0.2,
            red_weak: -0.4,
            red_strong: -0.8,
        }
    }

    /// 0.5 / 0.2 / -0.5 / -0.7
    pub fn balanced() -> Self {
        Self {
            green_strong: 0.5,
            green_weak: 0.2,
            red_weak: -0.5,
            red_strong: -0.7,
        }
    }

    /// 0.8 / 0.1 / -0.3 / -0.8
    pub fn wide() -> Self {
        Self {
            green_strong: 0.8,
            green_weak: 0.1,
            red_weak: -0.3,
            red_strong: -0.8,
        }
    }

    /// Bands must be finite and strictly ordered so they partition the line
    pub fn validate(&self) -> Result<()> {
        let edges = [self.red_strong, self.red_weak, self.green_weak, self.green_strong];
        if edges.iter().any(|edge| !edge.is_finite()) {
            return Err(anyhow!("Signal band edges must be finite: {:?}", self));
        }
        if !edges.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(anyhow!(
                "Signal bands must satisfy red_strong < red_weak < green_weak < green_strong, got {:?}",
                self
            ));
        }
        Ok(())
    }
}

impl SignalConfig {
    /// Static premium thresholds, tri-level VIX, standard bands
    pub fn static_threshold() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            premium: PremiumConfig::StaticThreshold(StaticThresholdConfig::default()),
            sentiment_weights: SentimentWeights::default(),
            volatility: VolatilityConfig::tri_level(),
            composite_weights: CompositeWeights {
                premium: None,
                volatility: 0.2,
            },
            signal_bands: SignalBands::standard(),
            fatigue: FatigueConfig { enabled: false },
        }
    }

    /// 30-observation z-score with 30-day reinforcement, graded VIX, balanced bands
    pub fn rolling_30() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            premium: PremiumConfig::RollingZScore(RollingZScoreConfig::new(30, 30, -0.3, 0.3)),
            sentiment_weights: SentimentWeights::default(),
            volatility: VolatilityConfig::graded(),
            composite_weights: CompositeWeights {
                premium: None,
                volatility: 0.2,
            },
            signal_bands: SignalBands::balanced(),
            fatigue: FatigueConfig { enabled: true },
        }
    }

    /// 60-observation z-score with 120-day reinforcement, weighted premium, wide bands
    pub fn rolling_60() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            premium: PremiumConfig::RollingZScore(RollingZScoreConfig::new(60, 120, -0.5, 0.3)),
            sentiment_weights: SentimentWeights::default(),
            volatility: VolatilityConfig::tri_level(),
            composite_weights: CompositeWeights {
                premium: Some(0.5),
                volatility: 0.2,
            },
            signal_bands: SignalBands::wide(),
            fatigue: FatigueConfig { enabled: false },
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = match fs::read_to_string(path) {
            Ok(config_str) => {
                info!("Loaded signal configuration from {}", path.display());
                serde_json::from_str::<SignalConfig>(&config_str)
                    .with_context(|| format!("Invalid signal configuration in {}", path.display()))?
            }
            Err(e) => {
                warn!(
                    "Could not read {} ({}), using default configuration",
                    path.display(),
                    e
                );
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.calendar.start_date > self.calendar.end_date {
            return Err(anyhow!(
                "Calendar start {} is after end {}",
                self.calendar.start_date,
                self.calendar.end_date
            ));
        }

        match &self.premium {
            PremiumConfig::StaticThreshold(config) => config.validate()?,
            PremiumConfig::RollingZScore(config) => config.validate()?,
        }
        self.volatility.validate()?;
        self.signal_bands.validate()?;

        let weights = [
            self.sentiment_weights.cnyes,
            self.sentiment_weights.mega,
            self.sentiment_weights.ptt,
            self.composite_weights.volatility,
            self.composite_weights.premium.unwrap_or(1.0),
        ];
        if weights.iter().any(|weight| !weight.is_finite()) {
            return Err(anyhow!("All weights must be finite"));
        }

        Ok(())
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self::rolling_30()
    }
}
