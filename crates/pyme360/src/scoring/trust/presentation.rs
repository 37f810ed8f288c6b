//! Fixed illustrative metric and detail rows shown for dimensions that were
//! not reused from a stored score.

use chrono::{Datelike, NaiveDate};
use serde_json::{json, Value};

use super::TrustDimension;

pub(crate) fn default_metrics(dimension: TrustDimension) -> Vec<Value> {
    let rows: [(&str, f64, f64); 3] = match dimension {
        TrustDimension::Sustainability => [
            ("Energy Efficiency", 76.0, 68.0),
            ("Waste Management", 82.0, 70.0),
            ("Sustainable Materials", 75.0, 72.0),
        ],
        TrustDimension::TaxCompliance => [
            ("Returns Filed", 100.0, 85.0),
            ("Taxes Paid", 98.0, 80.0),
            ("Tax Audits", 85.0, 75.0),
        ],
        TrustDimension::LaborPractices => [
            ("Staff Turnover", 12.0, 18.0),
            ("Training Hours", 45.0, 35.0),
            ("Workplace Incidents", 2.0, 5.0),
        ],
        TrustDimension::FinancialStability => [
            ("Revenue Consistency", 5.8, 8.2),
            ("Debt to Equity", 0.65, 0.75),
            ("Cash Reserves", 2.6, 2.0),
        ],
        TrustDimension::PaymentPunctuality => [
            ("On-time Payments", 97.8, 88.5),
            ("Average Days to Pay", 28.4, 35.0),
            ("Payment Incidents", 0.5, 2.1),
        ],
        TrustDimension::Innovation => [
            ("R&D Investment", 3.5, 2.8),
            ("New Products", 6.0, 5.0),
            ("Technology Adoption", 72.0, 65.0),
        ],
    };

    rows.iter()
        .map(|(metric, value, industry)| {
            json!({ "metric": metric, "value": value, "industry": industry })
        })
        .collect()
}

pub(crate) fn default_details(dimension: TrustDimension, as_of: NaiveDate) -> Vec<Value> {
    let year = as_of.year();
    match dimension {
        TrustDimension::Sustainability => vec![
            initiative("Energy Consumption Reduction", "In progress", "Medium"),
            initiative("Material Recycling", "Implemented", "High"),
            initiative("Sustainable Materials Sourcing", "Planned", "High"),
        ],
        TrustDimension::TaxCompliance => vec![
            json!({ "year": year - 1, "filed_on_time": true, "paid_on_time": true, "audit": "Passed" }),
            json!({ "year": year - 2, "filed_on_time": true, "paid_on_time": true, "audit": "Not applicable" }),
            json!({ "year": year - 3, "filed_on_time": true, "paid_on_time": true, "audit": "Not applicable" }),
        ],
        TrustDimension::LaborPractices => vec![
            initiative("Wellbeing Program", "Implemented", "High"),
            initiative("Flexible Work", "In progress", "Medium"),
            initiative("Continuous Training", "Implemented", "High"),
        ],
        TrustDimension::FinancialStability => vec![
            json!({ "period": "Last 12 months", "annual_growth": "Stable", "volatility": "Low" }),
            json!({ "period": "Last 36 months", "annual_growth": "Positive", "volatility": "Medium" }),
        ],
        TrustDimension::PaymentPunctuality => vec![
            json!({ "year": year - 1, "on_time_pct": 98, "average_days": 28, "incidents": 1 }),
            json!({ "year": year - 2, "on_time_pct": 97, "average_days": 29, "incidents": 2 }),
            json!({ "year": year - 3, "on_time_pct": 95, "average_days": 32, "incidents": 3 }),
        ],
        TrustDimension::Innovation => vec![
            launch("Digital Platform", "In progress", year, 4, "High"),
            launch("Process Automation", "Implemented", year, 2, "Medium"),
            launch("Product Refresh", "Planned", year + 1, 1, "High"),
        ],
    }
}

fn initiative(name: &str, status: &str, impact: &str) -> Value {
    json!({ "initiative": name, "status": status, "impact": impact })
}

fn launch(name: &str, status: &str, year: i32, quarter: u8, impact: &str) -> Value {
    json!({
        "initiative": name,
        "status": status,
        "launch": format!("{year}-Q{quarter}"),
        "impact": impact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_stamped_rows_follow_as_of() {
        let as_of = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");
        let rows = default_details(TrustDimension::TaxCompliance, as_of);
        assert_eq!(rows[0]["year"], json!(2025));
        assert_eq!(rows[2]["year"], json!(2023));
    }

    #[test]
    fn every_dimension_has_three_metrics() {
        for dimension in TrustDimension::ALL {
            assert_eq!(default_metrics(dimension).len(), 3, "{dimension:?}");
        }
    }
}
