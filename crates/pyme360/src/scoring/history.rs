//! Synthetic score trends for charting.
//!
//! None of these points come from stored history: they are generated on read
//! from the current score so dashboards have a series to draw.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::options::TrendGranularity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub label: String,
    pub score: u16,
}

const CREDIT_POINTS: u32 = 6;
const CREDIT_START_RATIO: f64 = 0.92;
const CREDIT_VARIATION: [i32; 2] = [-2, 3];

const TRUST_MONTHS: u32 = 12;
const TRUST_OSCILLATION: [i32; 3] = [0, 1, -1];
const TRUST_QUARTERS: u32 = 4;

/// Six monthly credit points ending at `as_of`'s month with the current score.
pub(crate) fn credit_trend(current: u16, as_of: NaiveDate) -> Vec<TrendPoint> {
    let current = i32::from(current);
    let start = (f64::from(current) * CREDIT_START_RATIO).round() as i32;
    let last = CREDIT_POINTS - 1;

    (0..CREDIT_POINTS)
        .filter_map(|index| {
            let date = month_start(as_of, last - index)?;
            let score = if index == last {
                current
            } else {
                let ramp = interpolate(start, current, index, last);
                let variation = if index == 0 {
                    0
                } else {
                    CREDIT_VARIATION[(index as usize - 1) % CREDIT_VARIATION.len()]
                };
                ramp + variation
            };
            Some(TrendPoint {
                label: date.format("%b %Y").to_string(),
                date,
                score: score.clamp(300, 850) as u16,
            })
        })
        .collect()
}

pub(crate) fn trust_trend(
    current: u8,
    as_of: NaiveDate,
    granularity: TrendGranularity,
) -> Vec<TrendPoint> {
    match granularity {
        TrendGranularity::Monthly => trust_monthly(current, as_of),
        TrendGranularity::Quarterly => trust_quarterly(current, as_of),
    }
}

fn trust_monthly(current: u8, as_of: NaiveDate) -> Vec<TrendPoint> {
    let current = i32::from(current);
    let drop = ((f64::from(current) * 0.10).round() as i32).max(3);
    let start = (current - drop).max(0);
    let last = TRUST_MONTHS - 1;

    (0..TRUST_MONTHS)
        .filter_map(|index| {
            let date = month_start(as_of, last - index)?;
            let score = if index == last {
                current
            } else {
                interpolate(start, current, index, last)
                    + TRUST_OSCILLATION[index as usize % TRUST_OSCILLATION.len()]
            };
            Some(TrendPoint {
                label: date.format("%b %Y").to_string(),
                date,
                score: score.clamp(0, 100) as u16,
            })
        })
        .collect()
}

/// The four quarters preceding `as_of`'s quarter, oldest first, each trailing
/// the current score by three points per quarter.
fn trust_quarterly(current: u8, as_of: NaiveDate) -> Vec<TrendPoint> {
    let current = i32::from(current);
    let floor = current.min(50);
    let quarter_start_month = (as_of.month0() / 3) * 3 + 1;
    let Some(current_quarter) = NaiveDate::from_ymd_opt(as_of.year(), quarter_start_month, 1)
    else {
        return Vec::new();
    };

    (1..=TRUST_QUARTERS)
        .rev()
        .filter_map(|back| {
            let date = current_quarter.checked_sub_months(Months::new(3 * back))?;
            let score = (current - 3 * back as i32).max(floor);
            Some(TrendPoint {
                label: format!("{}-Q{}", date.year(), date.month0() / 3 + 1),
                date,
                score: score.clamp(0, 100) as u16,
            })
        })
        .collect()
}

fn month_start(as_of: NaiveDate, months_back: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(as_of.year(), as_of.month(), 1)?
        .checked_sub_months(Months::new(months_back))
}

fn interpolate(start: i32, end: i32, index: u32, last: u32) -> i32 {
    let progress = f64::from(index) / f64::from(last);
    (f64::from(start) + f64::from(end - start) * progress).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    #[test]
    fn credit_trend_ends_at_current_score() {
        let trend = credit_trend(817, as_of());
        assert_eq!(trend.len(), 6);
        assert_eq!(trend[0].label, "May 2026");
        assert_eq!(trend[0].score, 752);
        let last = trend.last().expect("points");
        assert_eq!(last.label, "Oct 2026");
        assert_eq!(last.score, 817);
        assert!(trend.iter().all(|point| (300..=850).contains(&point.score)));
    }

    #[test]
    fn credit_trend_stays_in_band_near_floor() {
        let trend = credit_trend(300, as_of());
        assert!(trend.iter().all(|point| point.score >= 300));
    }

    #[test]
    fn monthly_trust_trend_has_twelve_points() {
        let trend = trust_trend(80, as_of(), TrendGranularity::Monthly);
        assert_eq!(trend.len(), 12);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2025, 11, 1).expect("valid"));
        assert_eq!(trend[0].score, 72);
        assert_eq!(trend[11].score, 80);
        assert!(trend.windows(2).all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn quarterly_trust_trend_precedes_current_quarter() {
        let trend = trust_trend(80, as_of(), TrendGranularity::Quarterly);
        let labels: Vec<&str> = trend.iter().map(|point| point.label.as_str()).collect();
        assert_eq!(labels, vec!["2025-Q4", "2026-Q1", "2026-Q2", "2026-Q3"]);
        let scores: Vec<u16> = trend.iter().map(|point| point.score).collect();
        assert_eq!(scores, vec![68, 71, 74, 77]);
    }

    #[test]
    fn quarterly_trend_never_exceeds_low_current_scores() {
        let trend = trust_trend(40, as_of(), TrendGranularity::Quarterly);
        assert!(trend.iter().all(|point| point.score <= 40));
    }
}
