use crate::config::VolatilityConfig;

/// Maps a VIX close onto a discrete risk score
#[derive(Debug, Clone)]
pub struct VolatilityClassifier {
    config: VolatilityConfig,
}

impl VolatilityClassifier {
    pub fn new(config: VolatilityConfig) -> Self {
        Self { config }
    }

    /// Classify a VIX reading; undefined or non-finite input stays undefined
    pub fn classify(&self, vix: Option<f64>) -> Option<f64> {
        let vix = vix.filter(|v| v.is_finite())?;

        let score = match &self.config {
            VolatilityConfig::Graded { steps, floor_score } => steps
                .iter()
                .find(|step| vix >= step.floor)
                .map(|step| step.score)
                .unwrap_or(*floor_score),
            VolatilityConfig::TriLevel { upper, lower } => {
                if vix > *upper {
                    1.0
                } else if vix < *lower {
                    -1.0
                } else {
                    0.0
                }
            }
        };

        Some(score)
    }
}
