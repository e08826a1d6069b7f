//! Consumer dashboard: products verified from farm QR payloads, and feedback on them.
//!
//! Verified products and feedback live in two separate stores under their own
//! namespaces. Feedback keeps only the ten newest entries.

use crate::csv::{CsvField, MISSING};
use crate::error::{FarmError, Result};
use crate::model::{labeled_enum, Record, StatusCounts, StoreConfig, Thresholds};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

labeled_enum! {
    pub enum VerificationStatus {
        #[default]
        Verified => "Verified",
    }
}

labeled_enum! {
    pub enum FeedbackStatus {
        #[default]
        Submitted => "Submitted",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedProduct {
    pub id: String,
    pub batch_id: String,
    pub name: String,
    pub qty: String,
    /// Kept as scanned; farm payloads are not guaranteed to carry ISO dates.
    pub harvest_date: String,
    pub location: String,
    pub status: VerificationStatus,
    pub verified_at: DateTime<Utc>,
    /// The payload exactly as it was scanned.
    pub raw: Value,
}

/// A scanned payload, normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifiedDraft {
    pub batch_id: String,
    pub name: String,
    pub qty: String,
    pub harvest_date: String,
    pub location: String,
    pub raw: Value,
}

impl VerifiedDraft {
    /// Parses a QR payload such as the farmer dashboard produces.
    ///
    /// `batchId` is mandatory. `qty`, `harvestDate` and `location` also accept
    /// `quantity`, `harvest` and `farmLocation`; whatever is absent is rendered
    /// as `—`, and a missing name falls back to the batch id.
    pub fn from_payload(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FarmError::InvalidPayload("empty payload".to_string()));
        }
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| FarmError::InvalidPayload(e.to_string()))?;
        if !value.is_object() {
            return Err(FarmError::InvalidPayload(
                "expected a JSON object".to_string(),
            ));
        }

        let batch_id = field(&value, &["batchId"])
            .ok_or_else(|| FarmError::InvalidPayload("missing batchId".to_string()))?;
        let name = field(&value, &["name"]).unwrap_or_else(|| batch_id.clone());
        let or_missing = |keys: &[&str]| field(&value, keys).unwrap_or_else(|| MISSING.to_string());

        Ok(Self {
            qty: or_missing(&["qty", "quantity"]),
            harvest_date: or_missing(&["harvestDate", "harvest"]),
            location: or_missing(&["location", "farmLocation"]),
            batch_id,
            name,
            raw: value.clone(),
        })
    }
}

/// First of `keys` holding a non-empty string or a number.
fn field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedStats {
    pub verified: usize,
}

impl Record for VerifiedProduct {
    type Draft = VerifiedDraft;
    /// Verified products are immutable once scanned.
    type Patch = ();
    type Status = VerificationStatus;
    type Stats = VerifiedStats;

    const CSV_HEADER: &'static [&'static str] = &[
        "ID",
        "Batch ID",
        "Name",
        "Quantity",
        "Harvest Date",
        "Location",
        "Status",
        "Verified At",
    ];

    fn config() -> StoreConfig {
        StoreConfig::new("farmchainx_consumer", "verified-products", "V", 1000)
    }

    fn from_draft(id: String, draft: VerifiedDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            batch_id: draft.batch_id,
            name: draft.name,
            qty: draft.qty,
            harvest_date: draft.harvest_date,
            location: draft.location,
            status: VerificationStatus::default(),
            verified_at: now,
            raw: draft.raw,
        }
    }

    fn apply(&mut self, _patch: ()) {}

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> VerificationStatus {
        self.status
    }

    fn set_status(&mut self, status: VerificationStatus) {
        self.status = status;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.verified_at
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("batch id", self.batch_id.as_str()), ("name", self.name.as_str())]
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.batch_id.as_str()]
    }

    fn csv_row(&self) -> Vec<CsvField> {
        vec![
            CsvField::plain(&self.id),
            CsvField::plain(&self.batch_id),
            CsvField::text(&self.name),
            CsvField::text(&self.qty),
            CsvField::plain(&self.harvest_date),
            CsvField::text(&self.location),
            CsvField::plain(self.status),
            CsvField::plain(self.verified_at.to_rfc3339()),
        ]
    }

    fn aggregate(records: &[Self], _now: DateTime<Utc>, _thresholds: &Thresholds) -> VerifiedStats {
        VerifiedStats {
            verified: records.len(),
        }
    }

    fn seed(_now: DateTime<Utc>) -> Vec<Self> {
        Vec::new()
    }

    fn created_entry(&self) -> String {
        format!("Verified {}.", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    /// Id of the verified product being rated.
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
    pub status: FeedbackStatus,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackDraft {
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackStats {
    pub count: usize,
    /// `None` until some feedback exists.
    pub average_rating: Option<f64>,
}

impl Record for Feedback {
    type Draft = FeedbackDraft;
    type Patch = ();
    type Status = FeedbackStatus;
    type Stats = FeedbackStats;

    const CSV_HEADER: &'static [&'static str] = &["ID", "Product", "Rating", "Comment", "Date"];

    fn config() -> StoreConfig {
        StoreConfig::new("farmchainx_consumer_feedback", "consumer-feedback", "F", 1000)
            .with_record_capacity(10)
    }

    fn validate_draft(draft: &FeedbackDraft) -> Result<()> {
        if (1..=5).contains(&draft.rating) {
            Ok(())
        } else {
            Err(FarmError::ValidationFailed("rating".to_string()))
        }
    }

    fn from_draft(id: String, draft: FeedbackDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            product_id: draft.product_id.trim().to_string(),
            rating: draft.rating,
            comment: draft.comment.trim().to_string(),
            status: FeedbackStatus::default(),
            date: now,
        }
    }

    fn apply(&mut self, _patch: ()) {}

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> FeedbackStatus {
        self.status
    }

    fn set_status(&mut self, status: FeedbackStatus) {
        self.status = status;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.date
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("product id", self.product_id.as_str())]
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.product_id.as_str(),
            self.comment.as_str(),
        ]
    }

    fn csv_row(&self) -> Vec<CsvField> {
        vec![
            CsvField::plain(&self.id),
            CsvField::plain(&self.product_id),
            CsvField::plain(self.rating),
            CsvField::text(&self.comment),
            CsvField::plain(self.date.to_rfc3339()),
        ]
    }

    fn aggregate(records: &[Self], _now: DateTime<Utc>, _thresholds: &Thresholds) -> FeedbackStats {
        let counts = StatusCounts::tally(records);
        let average_rating = (counts.total > 0).then(|| {
            let sum: u32 = records.iter().map(|f| u32::from(f.rating)).sum();
            f64::from(sum) / counts.total as f64
        });
        FeedbackStats {
            count: counts.total,
            average_rating,
        }
    }

    fn seed(_now: DateTime<Utc>) -> Vec<Self> {
        Vec::new()
    }

    fn created_entry(&self) -> String {
        format!("Feedback submitted for {}.", self.product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn payload_with_canonical_fields() {
        let draft = VerifiedDraft::from_payload(
            r#"{"batchId":"C101","name":"Sweet Corn","qty":"200 kg","harvestDate":"2025-11-01","location":"Block A"}"#,
        )
        .unwrap();
        assert_eq!(draft.batch_id, "C101");
        assert_eq!(draft.name, "Sweet Corn");
        assert_eq!(draft.qty, "200 kg");
        assert_eq!(draft.harvest_date, "2025-11-01");
        assert_eq!(draft.location, "Block A");
        assert_eq!(draft.raw["batchId"], "C101");
    }

    #[test]
    fn payload_aliases_and_defaults() {
        let draft = VerifiedDraft::from_payload(
            r#"{"batchId":"C7","quantity":40,"harvest":"last week","farmLocation":"Plot 9"}"#,
        )
        .unwrap();
        assert_eq!(draft.name, "C7");
        assert_eq!(draft.qty, "40");
        assert_eq!(draft.harvest_date, "last week");
        assert_eq!(draft.location, "Plot 9");

        let bare = VerifiedDraft::from_payload(r#"{"batchId":"C8"}"#).unwrap();
        assert_eq!(bare.qty, MISSING);
        assert_eq!(bare.harvest_date, MISSING);
        assert_eq!(bare.location, MISSING);
    }

    #[test]
    fn payload_errors() {
        for raw in ["", "not json", "[1,2]", r#"{"name":"x"}"#, r#"{"batchId":""}"#] {
            assert!(
                matches!(VerifiedDraft::from_payload(raw), Err(FarmError::InvalidPayload(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn rating_must_be_one_to_five() {
        let draft = |rating| FeedbackDraft {
            product_id: "V1001".into(),
            rating,
            comment: String::new(),
        };
        assert!(Feedback::validate_draft(&draft(1)).is_ok());
        assert!(Feedback::validate_draft(&draft(5)).is_ok());
        assert!(Feedback::validate_draft(&draft(0)).is_err());
        assert!(Feedback::validate_draft(&draft(6)).is_err());
    }

    #[test]
    fn average_rating() {
        let empty = Feedback::aggregate(&[], now(), &Thresholds::default());
        assert_eq!(empty.count, 0);
        assert_eq!(empty.average_rating, None);

        let entries: Vec<_> = [5, 4, 3]
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Feedback::from_draft(
                    format!("F{}", i),
                    FeedbackDraft {
                        product_id: "V1001".into(),
                        rating: *r,
                        comment: String::new(),
                    },
                    now(),
                )
            })
            .collect();
        let stats = Feedback::aggregate(&entries, now(), &Thresholds::default());
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average_rating, Some(4.0));
    }

    #[test]
    fn feedback_store_is_capped() {
        assert_eq!(Feedback::config().record_capacity, Some(10));
        assert_eq!(VerifiedProduct::config().record_capacity, None);
    }
}
