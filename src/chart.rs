//! Chart-ready projection of the daily table
//!
//! Renderers draw a continuous price line and one marker per non-neutral
//! light on a trading day. Nothing here draws; it only shapes the data.

use crate::rate::format_rate;
use crate::signals::{DailyRecord, SignalLabel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMarker {
    pub date: NaiveDate,
    pub price: f64,
    pub label: SignalLabel,
    pub color: String,
    pub size: u32,
    pub composite_score: Option<f64>,
    pub premium_discount_rate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub price_line: Vec<PricePoint>,
    pub markers: Vec<SignalMarker>,
}

impl ChartData {
    pub fn from_records(records: &[DailyRecord]) -> Self {
        let price_line = records
            .iter()
            .map(|r| PricePoint {
                date: r.date,
                price: r.market_price,
            })
            .collect();

        let markers = records
            .iter()
            .filter_map(|r| {
                let label = r.signal_label.filter(|label| !label.is_neutral())?;
                let price = r.market_price?;
                Some(SignalMarker {
                    date: r.date,
                    price,
                    label,
                    color: label.color().to_string(),
                    size: if label == SignalLabel::GreenStrong { 12 } else { 8 },
                    composite_score: r.composite_score,
                    premium_discount_rate: r.premium_discount_rate.map(format_rate),
                })
            })
            .collect();

        Self { price_line, markers }
    }

    /// Markers grouped per light, in label order
    pub fn markers_for(&self, label: SignalLabel) -> Vec<&SignalMarker> {
        self.markers.iter().filter(|m| m.label == label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, price: Option<f64>, label: Option<SignalLabel>) -> DailyRecord {
        let mut record = DailyRecord::empty(NaiveDate::from_ymd_opt(2024, 1, day).unwrap());
        record.market_price = price;
        record.signal_label = label;
        record.composite_score = label.map(|_| 0.3);
        record.premium_discount_rate = price.map(|_| -0.2);
        record
    }

    #[test]
    fn test_markers_skip_neutral_undefined_and_priceless() {
        let records = vec![
            record(1, Some(10.0), Some(SignalLabel::GreenWeak)),
            record(2, Some(10.1), Some(SignalLabel::Neutral)),
            record(3, Some(10.2), None),
            record(4, None, Some(SignalLabel::RedWeak)),
            record(5, Some(10.3), Some(SignalLabel::GreenStrong)),
        ];

        let chart = ChartData::from_records(&records);
        assert_eq!(chart.price_line.len(), 5);
        assert_eq!(chart.markers.len(), 2);
        assert_eq!(chart.markers[0].color, "lightgreen");
        assert_eq!(chart.markers[0].premium_discount_rate.as_deref(), Some("-0.20%"));
        assert_eq!(chart.markers[0].composite_score, Some(0.3));
        assert_eq!(chart.markers[1].size, 12);
        assert_eq!(chart.markers_for(SignalLabel::GreenStrong).len(), 1);
    }
}
