//! Opportunity records and display enrichment
//!
//! Raw records arrive with Salesforce field names and any field may be null.
//! Enrichment never fails: missing data degrades to placeholder values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::format::{format_currency, format_number, format_short_date, to_fixed};
use crate::lenient;

/// Opportunity record as supplied by the data source
///
/// Fields of the wrong type decode as missing rather than rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOpportunity {
    #[serde(rename = "Id", default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(rename = "Name", default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(rename = "StageName", default, deserialize_with = "lenient::text")]
    pub stage_name: Option<String>,
    #[serde(rename = "Amount", default, deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
    #[serde(rename = "CloseDate", default, deserialize_with = "lenient::date")]
    pub close_date: Option<NaiveDate>,
    /// Precomputed lead score, nominally 0-100 but not clamped at source
    #[serde(rename = "Opportunity_Score__c", default, deserialize_with = "lenient::number")]
    pub score: Option<f64>,
    /// "Hot", "Warm" or "Cold"; compared exactly, never normalized
    #[serde(rename = "Score_Category__c", default, deserialize_with = "lenient::text")]
    pub score_category: Option<String>,
}

/// Opportunity record with presentation fields derived from the raw record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOpportunity {
    #[serde(flatten)]
    pub raw: RawOpportunity,
    pub record_url: String,
    pub formatted_amount: String,
    pub formatted_close_date: String,
    pub score_display: String,
    pub score_bar_style: String,
    pub category_badge_class: String,
}

/// Score bar color tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColor {
    Green,
    Orange,
    Red,
}

impl BarColor {
    /// Pick the tier for an (unclamped) score; boundaries belong to the higher tier
    pub fn for_score(score: f64) -> Self {
        if score >= constants::HOT_SCORE_THRESHOLD {
            BarColor::Green
        } else if score >= constants::WARM_SCORE_THRESHOLD {
            BarColor::Orange
        } else {
            BarColor::Red
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            BarColor::Green => constants::BAR_COLOR_GREEN,
            BarColor::Orange => constants::BAR_COLOR_ORANGE,
            BarColor::Red => constants::BAR_COLOR_RED,
        }
    }
}

impl RawOpportunity {
    /// Score with null treated as zero, unclamped
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }

    /// Score clamped to the displayable 0-100 range
    pub fn score_percent(&self) -> f64 {
        self.score_or_zero().clamp(constants::SCORE_MIN, constants::SCORE_MAX)
    }

    /// Whether the record's category equals `label` exactly
    pub fn is_category(&self, label: &str) -> bool {
        self.score_category.as_deref() == Some(label)
    }

    pub fn record_url(&self) -> String {
        format!("{}{}{}", constants::RECORD_URL_PREFIX, self.id, constants::RECORD_URL_SUFFIX)
    }

    pub fn bar_color(&self) -> BarColor {
        BarColor::for_score(self.score_or_zero())
    }

    fn badge_class(&self) -> String {
        // Empty categories fall back too
        let category = self
            .score_category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(constants::DEFAULT_BADGE_CATEGORY);
        format!("{} badge-{}", constants::BADGE_BASE_CLASS, category.to_lowercase())
    }
}

/// Derive the display fields for a raw record
pub fn enrich(raw: RawOpportunity) -> DisplayOpportunity {
    let score_percent = raw.score_percent();

    DisplayOpportunity {
        record_url: raw.record_url(),
        formatted_amount: raw
            .amount
            .map(format_currency)
            .unwrap_or_else(|| constants::PLACEHOLDER.to_string()),
        formatted_close_date: raw
            .close_date
            .map(format_short_date)
            .unwrap_or_else(|| constants::PLACEHOLDER.to_string()),
        score_display: to_fixed(score_percent, 1),
        score_bar_style: format!(
            "width: {}%; background-color: {}",
            format_number(score_percent),
            raw.bar_color().hex()
        ),
        category_badge_class: raw.badge_class(),
        raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opp(id: &str, score: Option<f64>, category: Option<&str>) -> RawOpportunity {
        RawOpportunity {
            id: id.to_string(),
            score,
            score_category: category.map(|c| c.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_bar_color_thresholds() {
        assert_eq!(BarColor::for_score(70.0), BarColor::Green);
        assert_eq!(BarColor::for_score(69.9), BarColor::Orange);
        assert_eq!(BarColor::for_score(40.0), BarColor::Orange);
        assert_eq!(BarColor::for_score(39.9), BarColor::Red);
        assert_eq!(opp("1", None, None).bar_color(), BarColor::Red);
    }

    #[test]
    fn test_enrich_full_record() {
        let raw = RawOpportunity {
            id: "006A000001".to_string(),
            name: Some("Acme Renewal".to_string()),
            stage_name: Some("Negotiation".to_string()),
            amount: Some(1234.5),
            close_date: NaiveDate::from_ymd_opt(2026, 3, 7),
            score: Some(72.5),
            score_category: Some("Hot".to_string()),
        };

        let display = enrich(raw.clone());
        assert_eq!(display.raw, raw);
        assert_eq!(display.record_url, "/lightning/r/Opportunity/006A000001/view");
        assert_eq!(display.formatted_amount, "$1,234.50");
        assert_eq!(display.formatted_close_date, "3/7/2026");
        assert_eq!(display.score_display, "72.5");
        assert_eq!(display.score_bar_style, "width: 72.5%; background-color: #2e844a");
        assert_eq!(display.category_badge_class, "slds-badge badge-hot");
    }

    #[test]
    fn test_enrich_missing_fields_use_placeholders() {
        let display = enrich(opp("1", None, None));
        assert_eq!(display.formatted_amount, "-");
        assert_eq!(display.formatted_close_date, "-");
        assert_eq!(display.score_display, "0.0");
        assert_eq!(display.score_bar_style, "width: 0%; background-color: #c23934");
        assert_eq!(display.category_badge_class, "slds-badge badge-cold");
    }

    #[test]
    fn test_enrich_clamps_display_but_keeps_raw_score() {
        let display = enrich(opp("1", Some(140.0), Some("Hot")));
        assert_eq!(display.score_display, "100.0");
        assert_eq!(display.score_bar_style, "width: 100%; background-color: #2e844a");
        assert_eq!(display.raw.score, Some(140.0));

        let display = enrich(opp("2", Some(-12.0), Some("Cold")));
        assert_eq!(display.score_display, "0.0");
        assert_eq!(display.score_bar_style, "width: 0%; background-color: #c23934");
        assert_eq!(display.raw.score, Some(-12.0));
    }

    #[test]
    fn test_badge_class_lowercases_without_normalizing() {
        assert_eq!(enrich(opp("1", None, Some("Warm"))).category_badge_class, "slds-badge badge-warm");
        assert_eq!(enrich(opp("1", None, Some("HOT"))).category_badge_class, "slds-badge badge-hot");
        assert_eq!(enrich(opp("1", None, Some("Lukewarm"))).category_badge_class, "slds-badge badge-lukewarm");
        assert_eq!(enrich(opp("1", None, Some(""))).category_badge_class, "slds-badge badge-cold");
    }

    #[test]
    fn test_deserialize_salesforce_fields() {
        let json = r#"{
            "Id": "006B",
            "Name": "Globex",
            "StageName": "Prospecting",
            "Amount": 5000,
            "CloseDate": "2026-06-30",
            "Opportunity_Score__c": 41.25,
            "Score_Category__c": "Warm"
        }"#;

        let raw: RawOpportunity = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id, "006B");
        assert_eq!(raw.amount, Some(5000.0));
        assert_eq!(raw.close_date, NaiveDate::from_ymd_opt(2026, 6, 30));
        assert_eq!(raw.score, Some(41.25));
        assert!(raw.is_category("Warm"));
        assert!(!raw.is_category("warm"));
    }

    #[test]
    fn test_deserialize_nulls_and_missing_fields() {
        let raw: RawOpportunity = serde_json::from_str(r#"{"Id": "1", "Amount": null}"#).unwrap();
        assert_eq!(raw.amount, None);
        assert_eq!(raw.close_date, None);
        assert_eq!(raw.score_category, None);
    }

    #[test]
    fn test_deserialize_numeric_id() {
        let raw: RawOpportunity =
            serde_json::from_str(r#"{"Id": 1, "Score_Category__c": "Hot", "Opportunity_Score__c": 80}"#).unwrap();
        assert_eq!(raw.id, "1");
        assert_eq!(raw.score, Some(80.0));
        assert_eq!(enrich(raw).record_url, "/lightning/r/Opportunity/1/view");
    }

    #[test]
    fn test_deserialize_malformed_fields_fall_back_to_placeholders() {
        let raw: RawOpportunity = serde_json::from_str(
            r#"{
                "Id": "006C",
                "Name": 42,
                "Amount": "not a number",
                "CloseDate": "sometime soon",
                "Opportunity_Score__c": {"value": 90},
                "Score_Category__c": ["Hot"]
            }"#,
        )
        .unwrap();

        assert_eq!(raw.name.as_deref(), Some("42"));
        assert_eq!(raw.amount, None);
        assert_eq!(raw.close_date, None);
        assert_eq!(raw.score, None);
        assert_eq!(raw.score_category, None);

        let display = enrich(raw);
        assert_eq!(display.formatted_amount, "-");
        assert_eq!(display.formatted_close_date, "-");
        assert_eq!(display.category_badge_class, "slds-badge badge-cold");
    }

    #[test]
    fn test_deserialize_timestamp_close_date_and_numeric_strings() {
        let raw: RawOpportunity =
            serde_json::from_str(r#"{"Id": "b", "CloseDate": "2026-03-07T00:00:00.000Z", "Amount": "2500.75"}"#)
                .unwrap();
        assert_eq!(raw.close_date, NaiveDate::from_ymd_opt(2026, 3, 7));
        assert_eq!(raw.amount, Some(2500.75));
    }

    #[test]
    fn test_display_serializes_flat() {
        let display = enrich(opp("7", Some(50.0), Some("Warm")));
        let value = serde_json::to_value(&display).unwrap();
        assert_eq!(value["Id"], "7");
        assert_eq!(value["Score_Category__c"], "Warm");
        assert_eq!(value["scoreDisplay"], "50.0");
        assert_eq!(value["recordUrl"], "/lightning/r/Opportunity/7/view");
    }
}
