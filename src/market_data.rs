use crate::rate::RawQuote;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One trading day of the premium/discount quote table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub date: NaiveDate,
    #[serde(default)]
    pub market_price: Option<RawQuote>,
    #[serde(default)]
    pub premium_discount_rate: Option<RawQuote>,
}

/// Categorical sentiment codes per source for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub cnyes: Option<f64>,
    #[serde(default)]
    pub mega: Option<f64>,
    #[serde(default)]
    pub ptt: Option<f64>,
}

/// Daily close of the volatility index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityQuote {
    pub date: NaiveDate,
    #[serde(default)]
    pub close: Option<RawQuote>,
}

/// The three upstream tables a run is built from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputTables {
    pub rates: Vec<RateQuote>,
    pub sentiment: Vec<SentimentEntry>,
    pub volatility: Vec<VolatilityQuote>,
}

impl InputTables {
    pub fn new(
        rates: Vec<RateQuote>,
        sentiment: Vec<SentimentEntry>,
        volatility: Vec<VolatilityQuote>,
    ) -> Self {
        Self {
            rates,
            sentiment,
            volatility,
        }
    }

    /// Load each table from a JSON array file
    pub fn load<P: AsRef<Path>>(rates_path: P, sentiment_path: P, volatility_path: P) -> Result<Self> {
        let tables = Self::new(
            load_table(rates_path)?,
            load_table(sentiment_path)?,
            load_table(volatility_path)?,
        );

        info!(
            "Loaded {} rate quotes, {} sentiment entries, {} VIX closes",
            tables.rates.len(),
            tables.sentiment.len(),
            tables.volatility.len()
        );

        Ok(tables)
    }
}

fn load_table<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}
