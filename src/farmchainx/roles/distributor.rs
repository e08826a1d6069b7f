//! Distributor dashboard: shipments moving batches from farms to shops.

use crate::csv::CsvField;
use crate::derived;
use crate::model::{labeled_enum, Record, StatusCounts, StoreConfig, Thresholds};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

labeled_enum! {
    pub enum ShipmentStatus {
        #[default]
        InTransit => "In Transit",
        Delivered => "Delivered",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    /// The farmer's crop batch id, e.g. `C101`.
    pub batch_id: String,
    pub crop_name: String,
    pub origin: String,
    pub destination: String,
    pub vehicle_no: String,
    pub driver_name: String,
    pub expected_date: Option<NaiveDate>,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Shipment {
    pub fn is_delayed(&self, now: DateTime<Utc>) -> bool {
        derived::is_delayed(
            self.status == ShipmentStatus::InTransit,
            self.expected_date,
            now,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShipmentDraft {
    pub batch_id: String,
    pub crop_name: String,
    pub origin: String,
    pub destination: String,
    pub vehicle_no: String,
    pub driver_name: String,
    pub expected_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct ShipmentPatch {
    pub batch_id: Option<String>,
    pub crop_name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub vehicle_no: Option<String>,
    pub driver_name: Option<String>,
    pub expected_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentStats {
    pub total: usize,
    pub in_transit: usize,
    pub delivered: usize,
    pub delayed: usize,
    pub by_status: StatusCounts<ShipmentStatus>,
}

fn set_trimmed(field: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *field = v.trim().to_string();
    }
}

impl Record for Shipment {
    type Draft = ShipmentDraft;
    type Patch = ShipmentPatch;
    type Status = ShipmentStatus;
    type Stats = ShipmentStats;

    const CSV_HEADER: &'static [&'static str] = &[
        "ID",
        "Batch ID",
        "Crop Name",
        "Origin",
        "Destination",
        "Vehicle",
        "Driver",
        "Expected Date",
        "Status",
    ];

    fn config() -> StoreConfig {
        StoreConfig::new("farmchainx_distributor", "shipments-manifest", "S", 1000)
    }

    fn from_draft(id: String, draft: ShipmentDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            batch_id: draft.batch_id.trim().to_string(),
            crop_name: draft.crop_name.trim().to_string(),
            origin: draft.origin.trim().to_string(),
            destination: draft.destination.trim().to_string(),
            vehicle_no: draft.vehicle_no.trim().to_string(),
            driver_name: draft.driver_name.trim().to_string(),
            expected_date: draft.expected_date,
            status: ShipmentStatus::default(),
            created_at: now,
        }
    }

    fn apply(&mut self, patch: ShipmentPatch) {
        set_trimmed(&mut self.batch_id, patch.batch_id);
        set_trimmed(&mut self.crop_name, patch.crop_name);
        set_trimmed(&mut self.origin, patch.origin);
        set_trimmed(&mut self.destination, patch.destination);
        set_trimmed(&mut self.vehicle_no, patch.vehicle_no);
        set_trimmed(&mut self.driver_name, patch.driver_name);
        if patch.expected_date.is_some() {
            self.expected_date = patch.expected_date;
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ShipmentStatus {
        self.status
    }

    fn set_status(&mut self, status: ShipmentStatus) {
        self.status = status;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("batch id", self.batch_id.as_str()),
            ("crop name", self.crop_name.as_str()),
            ("origin", self.origin.as_str()),
            ("destination", self.destination.as_str()),
        ]
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.crop_name.as_str(),
            self.batch_id.as_str(),
        ]
    }

    fn csv_row(&self) -> Vec<CsvField> {
        vec![
            CsvField::plain(&self.id),
            CsvField::plain(&self.batch_id),
            CsvField::text(&self.crop_name),
            CsvField::text(&self.origin),
            CsvField::text(&self.destination),
            CsvField::text(&self.vehicle_no),
            CsvField::text(&self.driver_name),
            CsvField::optional(self.expected_date),
            CsvField::plain(self.status),
        ]
    }

    fn aggregate(records: &[Self], now: DateTime<Utc>, _thresholds: &Thresholds) -> ShipmentStats {
        let by_status = StatusCounts::tally(records);
        ShipmentStats {
            total: by_status.total,
            in_transit: by_status.get(ShipmentStatus::InTransit),
            delivered: by_status.get(ShipmentStatus::Delivered),
            delayed: records.iter().filter(|s| s.is_delayed(now)).count(),
            by_status,
        }
    }

    fn seed(now: DateTime<Utc>) -> Vec<Self> {
        vec![
            Shipment {
                id: "S1001".to_string(),
                batch_id: "C101".to_string(),
                crop_name: "Tomatoes".to_string(),
                origin: "Farmer Rajesh".to_string(),
                destination: "Retailer Suresh".to_string(),
                vehicle_no: "AP09 XY 1234".to_string(),
                driver_name: "Vikram".to_string(),
                expected_date: NaiveDate::from_ymd_opt(2025, 11, 12),
                status: ShipmentStatus::InTransit,
                created_at: now,
            },
            Shipment {
                id: "S1002".to_string(),
                batch_id: "C102".to_string(),
                crop_name: "Groundnut".to_string(),
                origin: "Farmer Ramesh".to_string(),
                destination: "Retailer Ravi".to_string(),
                vehicle_no: "TS08 ZY 8765".to_string(),
                driver_name: "Arun".to_string(),
                expected_date: NaiveDate::from_ymd_opt(2025, 11, 8),
                status: ShipmentStatus::Delivered,
                created_at: now,
            },
        ]
    }

    fn created_entry(&self) -> String {
        format!("Shipment {} created.", self.id)
    }

    fn updated_entry(&self) -> String {
        format!("Shipment {} updated.", self.id)
    }

    fn deleted_entry(&self) -> String {
        format!("Shipment {} removed.", self.id)
    }

    fn status_entry(&self) -> String {
        format!("Shipment {} marked {}.", self.id, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn shipment(status: ShipmentStatus, expected: &str) -> Shipment {
        let mut s = Shipment::from_draft(
            "S1".into(),
            ShipmentDraft {
                batch_id: "C101".into(),
                crop_name: "Tomatoes".into(),
                origin: "A".into(),
                destination: "B".into(),
                expected_date: expected.parse().ok(),
                ..ShipmentDraft::default()
            },
            at(2025, 11, 1),
        );
        s.status = status;
        s
    }

    #[test]
    fn in_transit_past_expected_is_delayed() {
        let now = at(2025, 11, 10);
        assert!(shipment(ShipmentStatus::InTransit, "2025-11-05").is_delayed(now));
        assert!(!shipment(ShipmentStatus::InTransit, "2025-11-15").is_delayed(now));
    }

    #[test]
    fn delivered_is_never_delayed() {
        let now = at(2025, 11, 10);
        assert!(!shipment(ShipmentStatus::Delivered, "2025-11-05").is_delayed(now));
    }

    #[test]
    fn aggregate_counts_delays() {
        let seed = Shipment::seed(at(2025, 11, 1));
        let stats = Shipment::aggregate(&seed, at(2025, 11, 13), &Thresholds::default());
        assert_eq!(stats.total, 2);
        assert_eq!(stats.in_transit, 1);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.delayed, 1);

        let early = Shipment::aggregate(&seed, at(2025, 11, 10), &Thresholds::default());
        assert_eq!(early.delayed, 0);
    }

    #[test]
    fn csv_quotes_place_names() {
        let seed = Shipment::seed(at(2025, 11, 1));
        let row = seed[0].csv_row();
        assert_eq!(row[3], CsvField::text("Farmer Rajesh"));
        assert_eq!(row[7], CsvField::plain("2025-11-12"));
    }
}
