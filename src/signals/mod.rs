//! Signal Generation Module
//!
//! Daily light pipeline for a single ETF: premium/discount, sentiment and VIX
//! component scores, their weighted composite, the five-level light and the
//! fatigue pass that smooths long weak runs.

pub mod classifier;
pub mod composite;
pub mod coordinator;
pub mod fatigue;
pub mod premium;
pub mod sentiment;
pub mod volatility;

// Re-export core types for easy access
pub use classifier::{SignalClassifier, SignalLabel};
pub use composite::{CompositeScorer, DailyRecord};
pub use coordinator::{RunSummary, SignalCoordinator, SignalReport};
pub use fatigue::FatigueSuppressor;
pub use premium::{PremiumStrategy, RollingZScoreScorer, StaticThresholdScorer};
pub use sentiment::SentimentAggregator;
pub use volatility::VolatilityClassifier;
