use crate::config::SentimentWeights;
use crate::market_data::SentimentEntry;

/// Weighted sum of the per-source sentiment codes
#[derive(Debug, Clone)]
pub struct SentimentAggregator {
    weights: SentimentWeights,
}

impl SentimentAggregator {
    pub fn new(weights: SentimentWeights) -> Self {
        Self { weights }
    }

    /// Aggregate one day's codes. A missing source contributes zero, so the
    /// result is always defined.
    pub fn aggregate(&self, cnyes: Option<f64>, mega: Option<f64>, ptt: Option<f64>) -> f64 {
        cnyes.unwrap_or(0.0) * self.weights.cnyes
            + mega.unwrap_or(0.0) * self.weights.mega
            + ptt.unwrap_or(0.0) * self.weights.ptt
    }

    pub fn score_entry(&self, entry: Option<&SentimentEntry>) -> f64 {
        match entry {
            Some(entry) => self.aggregate(entry.cnyes, entry.mega, entry.ptt),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sources_present() {
        let aggregator = SentimentAggregator::new(SentimentWeights::default());
        let score = aggregator.aggregate(Some(1.0), Some(-1.0), Some(1.0));
        assert!((score - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_missing_sources_contribute_zero() {
        let aggregator = SentimentAggregator::new(SentimentWeights {
            cnyes: 0.2,
            mega: 0.3,
            ptt: 0.5,
        });
        assert_eq!(aggregator.aggregate(None, None, None), 0.0);
        assert!((aggregator.aggregate(None, Some(1.0), None) - 0.3).abs() < 1e-12);
        assert!((aggregator.aggregate(Some(-1.0), None, Some(1.0)) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_absent_entry_scores_zero() {
        let aggregator = SentimentAggregator::new(SentimentWeights::default());
        assert_eq!(aggregator.score_entry(None), 0.0);
    }
}
