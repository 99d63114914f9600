//! BMI trend summary over a series of readings

use serde::Serialize;

use super::bmi::{classify_bmi, BmiCategory};
use crate::units::round_to;

/// Summary of how BMI moved across a set of readings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiTrend {
    pub count: usize,
    pub first_id: i64,
    pub first_timestamp: String,
    pub first_bmi: f64,
    pub latest_id: i64,
    pub latest_timestamp: String,
    pub latest_bmi: f64,
    /// latest_bmi - first_bmi, rounded to 2 decimal places
    pub change: f64,
    pub min_bmi: f64,
    pub max_bmi: f64,
    pub latest_category: BmiCategory,
}

/// Build a trend from `(timestamp, id, bmi)` readings in any order.
///
/// Timestamps are ISO 8601 strings and compare lexically; readings sharing a
/// timestamp are ordered by id, so the later insert is the latest. Returns
/// `None` for an empty series.
pub fn bmi_trend<'a, I>(readings: I) -> Option<BmiTrend>
where
    I: IntoIterator<Item = (&'a str, i64, f64)>,
{
    let mut sorted: Vec<(&str, i64, f64)> = readings.into_iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(&b.1)));

    let (first_ts, first_id, first_bmi) = *sorted.first()?;
    let (latest_ts, latest_id, latest_bmi) = *sorted.last()?;

    let min_bmi = sorted.iter().map(|(_, _, bmi)| *bmi).fold(f64::INFINITY, f64::min);
    let max_bmi = sorted.iter().map(|(_, _, bmi)| *bmi).fold(f64::NEG_INFINITY, f64::max);

    Some(BmiTrend {
        count: sorted.len(),
        first_id,
        first_timestamp: first_ts.to_string(),
        first_bmi,
        latest_id,
        latest_timestamp: latest_ts.to_string(),
        latest_bmi,
        change: round_to(latest_bmi - first_bmi, 2),
        min_bmi,
        max_bmi,
        latest_category: classify_bmi(latest_bmi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series_has_no_trend() {
        assert_eq!(bmi_trend(Vec::<(&str, i64, f64)>::new()), None);
    }

    #[test]
    fn test_trend_orders_by_timestamp() {
        let readings = vec![
            ("2025-03-01", 3, 26.4),
            ("2025-01-01", 1, 28.0),
            ("2025-02-01", 2, 27.1),
        ];
        let trend = bmi_trend(readings).unwrap();

        assert_eq!(trend.count, 3);
        assert_eq!(trend.first_timestamp, "2025-01-01");
        assert_eq!(trend.latest_timestamp, "2025-03-01");
        assert_eq!(trend.change, -1.6);
        assert_eq!(trend.min_bmi, 26.4);
        assert_eq!(trend.max_bmi, 28.0);
        assert_eq!(trend.latest_category, BmiCategory::Overweight);
    }

    #[test]
    fn test_single_reading() {
        let trend = bmi_trend(vec![("2025-01-01", 7, 22.0)]).unwrap();
        assert_eq!(trend.change, 0.0);
        assert_eq!(trend.first_id, 7);
        assert_eq!(trend.latest_id, 7);
        assert_eq!(trend.latest_category, BmiCategory::Normal);
    }

    #[test]
    fn test_same_timestamp_ordered_by_id() {
        // Newest-first input, as the entry listing returns it
        let readings = vec![
            ("2025-01-01", 12, 24.7),
            ("2025-01-01", 11, 30.9),
        ];
        let trend = bmi_trend(readings).unwrap();

        assert_eq!(trend.first_id, 11);
        assert_eq!(trend.first_bmi, 30.9);
        assert_eq!(trend.latest_id, 12);
        assert_eq!(trend.latest_bmi, 24.7);
        assert_eq!(trend.latest_category, BmiCategory::Normal);
    }
}
