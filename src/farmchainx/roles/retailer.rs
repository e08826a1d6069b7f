//! Retailer dashboard: shop inventory, expiry tracking and sales.

use crate::csv::CsvField;
use crate::derived;
use crate::error::{FarmError, Result};
use crate::model::{labeled_enum, Grade, Record, StatusCounts, StoreConfig, Thresholds};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

labeled_enum! {
    pub enum StockStatus {
        #[default]
        InStock => "In Stock",
        LowStock => "Low Stock",
        SoldOut => "Sold Out",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    /// Kilograms on hand.
    pub quantity: u32,
    /// Price per kilogram.
    pub price: f64,
    pub quality: Grade,
    pub received_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: StockStatus,
    pub created_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn is_expiring_soon(&self, now: DateTime<Utc>, window_days: i64) -> bool {
        derived::is_expiring_soon(self.expiry_date, now, window_days)
    }

    pub fn is_low_stock(&self, threshold: u32) -> bool {
        derived::is_low_stock(self.quantity, threshold)
    }

    pub fn sale_value(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

#[derive(Debug, Clone, Default)]
pub struct InventoryDraft {
    pub name: String,
    pub item_type: String,
    pub quantity: Option<u32>,
    pub price: Option<f64>,
    pub quality: Grade,
    pub received_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub item_type: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<f64>,
    pub quality: Option<Grade>,
    pub received_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryStats {
    pub in_stock: usize,
    pub low_stock: usize,
    pub sold_out: usize,
    pub expiring_soon: usize,
    /// Value of everything sold out, quantity × price.
    pub total_sales: f64,
    pub by_status: StatusCounts<StockStatus>,
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

impl Record for InventoryItem {
    type Draft = InventoryDraft;
    type Patch = InventoryPatch;
    type Status = StockStatus;
    type Stats = InventoryStats;

    const CSV_HEADER: &'static [&'static str] = &[
        "ID", "Name", "Type", "Quantity", "Price/kg", "Quality", "Received", "Expiry", "Status",
    ];

    fn config() -> StoreConfig {
        StoreConfig::new("farmchainx_retailer", "retailer-stock-report", "R", 100)
    }

    fn validate_draft(draft: &InventoryDraft) -> Result<()> {
        if draft.quantity.is_none() {
            return Err(FarmError::ValidationFailed("quantity".to_string()));
        }
        match draft.price {
            Some(p) if valid_price(p) => Ok(()),
            _ => Err(FarmError::ValidationFailed("price".to_string())),
        }
    }

    fn validate_patch(patch: &InventoryPatch) -> Result<()> {
        match patch.price {
            Some(p) if !valid_price(p) => Err(FarmError::ValidationFailed("price".to_string())),
            _ => Ok(()),
        }
    }

    fn from_draft(id: String, draft: InventoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            item_type: draft.item_type.trim().to_string(),
            quantity: draft.quantity.unwrap_or_default(),
            price: draft.price.unwrap_or_default(),
            quality: draft.quality,
            received_date: draft.received_date,
            expiry_date: draft.expiry_date,
            status: StockStatus::default(),
            created_at: now,
        }
    }

    fn apply(&mut self, patch: InventoryPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(item_type) = patch.item_type {
            self.item_type = item_type.trim().to_string();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quality) = patch.quality {
            self.quality = quality;
        }
        if patch.received_date.is_some() {
            self.received_date = patch.received_date;
        }
        if patch.expiry_date.is_some() {
            self.expiry_date = patch.expiry_date;
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> StockStatus {
        self.status
    }

    fn set_status(&mut self, status: StockStatus) {
        self.status = status;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str())]
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.item_type.as_str()]
    }

    fn csv_row(&self) -> Vec<CsvField> {
        vec![
            CsvField::plain(&self.id),
            CsvField::text(&self.name),
            CsvField::text(&self.item_type),
            CsvField::plain(self.quantity),
            CsvField::plain(self.price),
            CsvField::plain(self.quality),
            CsvField::optional(self.received_date),
            CsvField::optional(self.expiry_date),
            CsvField::plain(self.status),
        ]
    }

    fn aggregate(records: &[Self], now: DateTime<Utc>, thresholds: &Thresholds) -> InventoryStats {
        let by_status = StatusCounts::tally(records);
        InventoryStats {
            in_stock: by_status.get(StockStatus::InStock),
            low_stock: records
                .iter()
                .filter(|i| i.is_low_stock(thresholds.low_stock_below))
                .count(),
            sold_out: by_status.get(StockStatus::SoldOut),
            expiring_soon: records
                .iter()
                .filter(|i| i.is_expiring_soon(now, thresholds.expiry_window_days))
                .count(),
            total_sales: records
                .iter()
                .filter(|i| i.status == StockStatus::SoldOut)
                .map(InventoryItem::sale_value)
                .sum(),
            by_status,
        }
    }

    fn seed(now: DateTime<Utc>) -> Vec<Self> {
        vec![
            InventoryItem {
                id: "R101".to_string(),
                name: "Tomatoes".to_string(),
                item_type: "Vegetable".to_string(),
                quantity: 120,
                price: 25.0,
                quality: Grade::A,
                received_date: NaiveDate::from_ymd_opt(2025, 11, 5),
                expiry_date: NaiveDate::from_ymd_opt(2025, 11, 15),
                status: StockStatus::InStock,
                created_at: now,
            },
            InventoryItem {
                id: "R102".to_string(),
                name: "Bananas".to_string(),
                item_type: "Fruit".to_string(),
                quantity: 80,
                price: 30.0,
                quality: Grade::A,
                received_date: NaiveDate::from_ymd_opt(2025, 11, 3),
                expiry_date: NaiveDate::from_ymd_opt(2025, 11, 9),
                status: StockStatus::LowStock,
                created_at: now,
            },
        ]
    }

    fn created_entry(&self) -> String {
        format!("{} added to inventory.", self.name)
    }

    fn updated_entry(&self) -> String {
        format!("{} updated.", self.name)
    }

    fn deleted_entry(&self) -> String {
        format!("{} deleted.", self.id)
    }

    fn status_entry(&self) -> String {
        format!("{} marked {}.", self.name, self.status)
    }
}
