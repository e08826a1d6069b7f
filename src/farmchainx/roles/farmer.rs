//! Farmer dashboard: crop batches registered at harvest.

use crate::csv::CsvField;
use crate::model::{labeled_enum, Grade, Record, StatusCounts, StoreConfig, Thresholds};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

labeled_enum! {
    pub enum CropStatus {
        #[default]
        Pending => "Pending",
        InTransit => "In Transit",
        Approved => "Approved",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: String,
    pub name: String,
    pub description: String,
    pub crop_type: String,
    /// Free text such as `200 kg`.
    pub quantity: String,
    pub quality: Grade,
    pub harvest_date: Option<NaiveDate>,
    pub farm_location: String,
    pub status: CropStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CropDraft {
    pub name: String,
    pub description: String,
    pub crop_type: String,
    pub quantity: String,
    pub quality: Grade,
    pub harvest_date: Option<NaiveDate>,
    pub farm_location: String,
}

#[derive(Debug, Clone, Default)]
pub struct CropPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub crop_type: Option<String>,
    pub quantity: Option<String>,
    pub quality: Option<Grade>,
    pub harvest_date: Option<NaiveDate>,
    pub farm_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropStats {
    pub active_crops: usize,
    pub batches_in_transit: usize,
    pub pending_inspections: usize,
    pub completed_shipments: usize,
    pub by_status: StatusCounts<CropStatus>,
}

/// Bare numbers are taken as kilograms.
fn normalize_quantity(raw: &str) -> String {
    let raw = raw.trim();
    if !raw.is_empty() && raw.parse::<f64>().is_ok() {
        format!("{} kg", raw)
    } else {
        raw.to_string()
    }
}

impl Record for Crop {
    type Draft = CropDraft;
    type Patch = CropPatch;
    type Status = CropStatus;
    type Stats = CropStats;

    const CSV_HEADER: &'static [&'static str] = &[
        "ID",
        "Name",
        "Type",
        "Quantity",
        "Quality",
        "Harvest Date",
        "Location",
        "Status",
        "Created At",
    ];

    fn config() -> StoreConfig {
        StoreConfig::new("farmchainx_farmer", "crops", "C", 1000)
    }

    fn from_draft(id: String, draft: CropDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            description: draft.description.trim().to_string(),
            crop_type: draft.crop_type.trim().to_string(),
            quantity: normalize_quantity(&draft.quantity),
            quality: draft.quality,
            harvest_date: draft.harvest_date,
            farm_location: draft.farm_location.trim().to_string(),
            status: CropStatus::default(),
            created_at: now,
        }
    }

    fn apply(&mut self, patch: CropPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(crop_type) = patch.crop_type {
            self.crop_type = crop_type.trim().to_string();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = normalize_quantity(&quantity);
        }
        if let Some(quality) = patch.quality {
            self.quality = quality;
        }
        if patch.harvest_date.is_some() {
            self.harvest_date = patch.harvest_date;
        }
        if let Some(location) = patch.farm_location {
            self.farm_location = location.trim().to_string();
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> CropStatus {
        self.status
    }

    fn set_status(&mut self, status: CropStatus) {
        self.status = status;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("quantity", self.quantity.as_str())]
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.crop_type.as_str()]
    }

    fn csv_row(&self) -> Vec<CsvField> {
        vec![
            CsvField::plain(&self.id),
            CsvField::text(&self.name),
            CsvField::text(&self.crop_type),
            CsvField::text(&self.quantity),
            CsvField::plain(self.quality),
            CsvField::optional(self.harvest_date),
            CsvField::text(&self.farm_location),
            CsvField::plain(self.status),
            CsvField::plain(self.created_at.to_rfc3339()),
        ]
    }

    fn aggregate(records: &[Self], _now: DateTime<Utc>, _thresholds: &Thresholds) -> CropStats {
        let by_status = StatusCounts::tally(records);
        CropStats {
            active_crops: by_status.total,
            batches_in_transit: by_status.get(CropStatus::InTransit),
            pending_inspections: by_status.get(CropStatus::Pending),
            completed_shipments: by_status.get(CropStatus::Approved),
            by_status,
        }
    }

    fn seed(now: DateTime<Utc>) -> Vec<Self> {
        let crop = |id: &str,
                    name: &str,
                    description: &str,
                    crop_type: &str,
                    quantity: &str,
                    quality: Grade,
                    harvest: &str,
                    location: &str,
                    status: CropStatus| Crop {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            crop_type: crop_type.to_string(),
            quantity: quantity.to_string(),
            quality,
            harvest_date: harvest.parse().ok(),
            farm_location: location.to_string(),
            status,
            created_at: now,
        };
        vec![
            crop(
                "C101",
                "Sweet Corn",
                "Yellow sweet corn batch",
                "Vegetable",
                "200 kg",
                Grade::A,
                "2025-11-01",
                "Block A",
                CropStatus::Pending,
            ),
            crop(
                "C102",
                "Groundnut",
                "Drying groundnut batch",
                "Legume",
                "500 kg",
                Grade::B,
                "2025-10-25",
                "Block C",
                CropStatus::Approved,
            ),
            crop(
                "C103",
                "Onions",
                "Red onions",
                "Vegetable",
                "300 kg",
                Grade::A,
                "2025-10-28",
                "Block B",
                CropStatus::InTransit,
            ),
        ]
    }

    fn seed_log(_now: DateTime<Utc>) -> Vec<String> {
        vec![
            "Shipment for Groundnut dispatched.".to_string(),
            "New crop 'Sweet Corn' registered.".to_string(),
            "Inspection scheduled for Onions".to_string(),
        ]
    }

    fn created_entry(&self) -> String {
        format!("New crop '{}' added.", self.name)
    }

    fn updated_entry(&self) -> String {
        format!("Batch {} updated.", self.id)
    }

    fn deleted_entry(&self) -> String {
        format!("Batch {} removed.", self.id)
    }

    fn status_entry(&self) -> String {
        format!("Batch {} marked {}.", self.id, self.status)
    }
}
