//! Calendar alignment and composite scoring
//!
//! Joins the rate, sentiment and VIX tables onto a dense daily calendar and
//! sums the weighted component scores for each date.

use super::classifier::SignalLabel;
use super::premium::{PremiumStrategy, strategy_from_config};
use super::sentiment::SentimentAggregator;
use super::volatility::VolatilityClassifier;
use crate::config::{CompositeWeights, SignalConfig};
use crate::market_data::{InputTables, RateQuote};
use crate::rate::{parse_rate, parse_value};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One calendar day of the output table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub market_price: Option<f64>,
    pub premium_discount_rate: Option<f64>,
    pub premium_score: Option<f64>,
    pub sentiment_score: f64,
    pub volatility_value: Option<f64>,
    pub volatility_score: Option<f64>,
    pub composite_score: Option<f64>,
    pub signal_label: Option<SignalLabel>,
    /// Label was downgraded by the fatigue pass
    #[serde(default)]
    pub suppressed: bool,
}

impl DailyRecord {
    /// A day with no data from any source
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            market_price: None,
            premium_discount_rate: None,
            premium_score: None,
            sentiment_score: 0.0,
            volatility_value: None,
            volatility_score: None,
            composite_score: None,
            signal_label: None,
            suppressed: false,
        }
    }
}

/// Every date from `start` to `end`, both inclusive
pub fn calendar(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|date| *date <= end).collect()
}

#[derive(Debug, Clone, Copy)]
struct ScoredQuote {
    market_price: Option<f64>,
    rate: Option<f64>,
    premium_score: Option<f64>,
}

pub struct CompositeScorer {
    start_date: NaiveDate,
    end_date: NaiveDate,
    premium: Box<dyn PremiumStrategy>,
    sentiment: SentimentAggregator,
    volatility: VolatilityClassifier,
    weights: CompositeWeights,
}

impl CompositeScorer {
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            start_date: config.calendar.start_date,
            end_date: config.calendar.end_date,
            premium: strategy_from_config(&config.premium),
            sentiment: SentimentAggregator::new(config.sentiment_weights),
            volatility: VolatilityClassifier::new(config.volatility.clone()),
            weights: config.composite_weights,
        }
    }

    /// Weighted sum of the components; undefined if premium or volatility is
    pub fn combine(&self, premium_score: Option<f64>, sentiment_score: f64, volatility_score: Option<f64>) -> Option<f64> {
        let premium = premium_score?;
        let volatility = volatility_score?;

        let premium_part = match self.weights.premium {
            Some(weight) => premium * weight,
            None => premium,
        };

        Some(premium_part + sentiment_score + volatility * self.weights.volatility)
    }

    /// Build the dense daily table with scores filled in and labels left empty
    pub fn build_records(&self, inputs: &InputTables) -> Vec<DailyRecord> {
        let quotes = self.score_rate_history(&inputs.rates);
        let sentiment = index_by_date(&inputs.sentiment, |entry| entry.date, "sentiment");
        let volatility = index_by_date(&inputs.volatility, |quote| quote.date, "volatility");

        calendar(self.start_date, self.end_date)
            .into_iter()
            .map(|date| {
                let mut record = DailyRecord::empty(date);

                if let Some(quote) = quotes.get(&date) {
                    record.market_price = quote.market_price;
                    record.premium_discount_rate = quote.rate;
                    record.premium_score = quote.premium_score;
                }

                record.sentiment_score = self.sentiment.score_entry(sentiment.get(&date).copied());

                record.volatility_value = volatility
                    .get(&date)
                    .and_then(|quote| parse_value(quote.close.as_ref()));
                record.volatility_score = self.volatility.classify(record.volatility_value);

                record.composite_score =
                    self.combine(record.premium_score, record.sentiment_score, record.volatility_score);
                record
            })
            .collect()
    }

    /// Score the whole rate history in date order. Quotes outside the
    /// calendar still feed the rolling window.
    fn score_rate_history(&self, rates: &[RateQuote]) -> BTreeMap<NaiveDate, ScoredQuote> {
        let by_date = index_by_date(rates, |quote| quote.date, "rate");

        let parsed: Vec<Option<f64>> = by_date
            .values()
            .map(|quote| parse_rate(quote.premium_discount_rate.as_ref()))
            .collect();
        let scores = self.premium.score_series(&parsed);

        debug!(
            "Scored {} of {} rate quotes with {}",
            scores.iter().flatten().count(),
            parsed.len(),
            self.premium.name()
        );

        by_date
            .iter()
            .zip(parsed.iter().zip(scores.iter()))
            .map(|((date, quote), (&rate, &premium_score))| {
                let scored = ScoredQuote {
                    market_price: parse_value(quote.market_price.as_ref()),
                    rate,
                    premium_score,
                };
                (*date, scored)
            })
            .collect()
    }
}

/// Index rows by date in ascending order; a repeated date keeps the last row
fn index_by_date<'a, T>(
    rows: &'a [T],
    date_of: impl Fn(&T) -> NaiveDate,
    table: &str,
) -> BTreeMap<NaiveDate, &'a T> {
    let mut indexed = BTreeMap::new();
    let mut duplicates = 0;

    for row in rows {
        if indexed.insert(date_of(row), row).is_some() {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        warn!("{} duplicate dates in {} table, keeping the last row for each", duplicates, table);
    }

    indexed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarConfig;
    use crate::market_data::{SentimentEntry, VolatilityQuote};
    use crate::rate::RawQuote;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn static_config(start: u32, end: u32) -> SignalConfig {
        let mut config = SignalConfig::static_threshold();
        config.calendar = CalendarConfig {
            start_date: date(start),
            end_date: date(end),
        };
        config
    }

    fn quote(day: u32, price: f64, rate: &str) -> RateQuote {
        RateQuote {
            date: date(day),
            market_price: Some(RawQuote::from(price)),
            premium_discount_rate: Some(RawQuote::from(rate)),
        }
    }

    fn vix(day: u32, close: f64) -> VolatilityQuote {
        VolatilityQuote {
            date: date(day),
            close: Some(RawQuote::from(close)),
        }
    }

    #[test]
    fn test_calendar_is_dense_and_inclusive() {
        let days = calendar(date(1), date(31));
        assert_eq!(days.len(), 31);
        assert_eq!(days[0], date(1));
        assert_eq!(days[30], date(31));
        assert!(calendar(date(2), date(1)).is_empty());
    }

    #[test]
    fn test_combine_folded_and_weighted_premium() {
        let mut config = static_config(1, 1);
        let folded = CompositeScorer::new(&config);
        assert_eq!(folded.combine(Some(0.5), 0.1, Some(1.0)), Some(0.5 + 0.1 + 0.2));

        config.composite_weights.premium = Some(0.5);
        let weighted = CompositeScorer::new(&config);
        assert_eq!(weighted.combine(Some(0.5), 0.1, Some(1.0)), Some(0.25 + 0.1 + 0.2));
    }

    #[test]
    fn test_combine_never_treats_missing_as_zero() {
        let scorer = CompositeScorer::new(&static_config(1, 1));
        assert_eq!(scorer.combine(None, 0.3, Some(1.0)), None);
        assert_eq!(scorer.combine(Some(0.5), 0.3, None), None);
    }

    #[test]
    fn test_records_cover_non_trading_days() {
        let scorer = CompositeScorer::new(&static_config(1, 5));
        let inputs = InputTables::new(
            vec![quote(1, 30.0, "-0.60%"), quote(4, 30.5, "0.10%")],
            vec![SentimentEntry { date: date(2), cnyes: Some(1.0), mega: None, ptt: Some(1.0) }],
            vec![vix(1, 25.0), vix(4, 15.0)],
        );

        let records = scorer.build_records(&inputs);
        assert_eq!(records.len(), 5);

        assert_eq!(records[0].premium_score, Some(0.5));
        assert_eq!(records[0].volatility_score, Some(1.0));
        assert!((records[0].composite_score.unwrap() - 0.7).abs() < 1e-12);

        // weekend-like gap: no quote, sentiment only
        assert_eq!(records[1].market_price, None);
        assert!((records[1].sentiment_score - 0.2).abs() < 1e-12);
        assert_eq!(records[1].composite_score, None);

        assert_eq!(records[2].sentiment_score, 0.0);
        assert_eq!(records[3].premium_score, Some(-0.25));
        assert_eq!(records[3].volatility_score, Some(-1.0));
        assert!(records.iter().all(|r| r.signal_label.is_none()));
    }

    #[test]
    fn test_unparseable_inputs_propagate_undefined() {
        let scorer = CompositeScorer::new(&static_config(1, 1));
        let inputs = InputTables::new(
            vec![quote(1, 30.0, "n/a")],
            vec![],
            vec![VolatilityQuote { date: date(1), close: Some(RawQuote::from("closed")) }],
        );

        let records = scorer.build_records(&inputs);
        assert_eq!(records[0].market_price, Some(30.0));
        assert_eq!(records[0].premium_discount_rate, None);
        assert_eq!(records[0].premium_score, None);
        assert_eq!(records[0].volatility_value, None);
        assert_eq!(records[0].composite_score, None);
    }

    #[test]
    fn test_duplicate_dates_keep_last_row() {
        let scorer = CompositeScorer::new(&static_config(1, 1));
        let inputs = InputTables::new(
            vec![quote(1, 30.0, "0.50%"), quote(1, 31.0, "-0.60%")],
            vec![],
            vec![vix(1, 20.0)],
        );

        let records = scorer.build_records(&inputs);
        assert_eq!(records[0].market_price, Some(31.0));
        assert_eq!(records[0].premium_score, Some(0.5));
    }

    #[test]
    fn test_rolling_history_before_calendar_feeds_window() {
        let mut config = SignalConfig::rolling_30();
        config.premium = crate::config::PremiumConfig::RollingZScore(
            crate::config::RollingZScoreConfig::new(3, 30, -0.3, 0.3),
        );
        config.calendar = CalendarConfig {
            start_date: date(3),
            end_date: date(3),
        };
        let scorer = CompositeScorer::new(&config);
        let inputs = InputTables::new(
            vec![quote(3, 30.0, "0.30%"), quote(1, 30.0, "0.10%"), quote(2, 30.0, "0.20%")],
            vec![],
            vec![],
        );

        let records = scorer.build_records(&inputs);
        assert_eq!(records.len(), 1);
        // window [0.1, 0.2, 0.3] gives z = 1.0
        assert_eq!(records[0].premium_score, Some(-0.25));
    }
}
