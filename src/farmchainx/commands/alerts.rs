//! Alert reports for the distributor and retailer dashboards.
//!
//! Each flagged record becomes a warning; a clean report is a single success
//! message.

use crate::commands::{CmdMessage, CmdResult};
use crate::record_store::RecordStore;
use crate::roles::distributor::Shipment;
use crate::roles::retailer::{InventoryItem, StockStatus};
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};

pub fn delayed_shipments<S: KeyValueStore>(
    store: &RecordStore<Shipment, S>,
    now: DateTime<Utc>,
) -> CmdResult {
    let mut result = CmdResult::default();
    for shipment in store.records().iter().filter(|s| s.is_delayed(now)) {
        let expected = shipment
            .expected_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        result.add_message(CmdMessage::warning(format!(
            "Shipment {} ({}) to {} is delayed, expected {}",
            shipment.id, shipment.crop_name, shipment.destination, expected
        )));
    }

    match result.messages.len() {
        0 => result.add_message(CmdMessage::success("No delayed shipments.")),
        n => result.add_message(CmdMessage::info(format!("{} shipment(s) are delayed.", n))),
    }
    result
}

/// Items expiring within the configured window, then items below the low-stock threshold.
/// Sold-out items are skipped for low stock.
pub fn inventory<S: KeyValueStore>(
    store: &RecordStore<InventoryItem, S>,
    now: DateTime<Utc>,
) -> CmdResult {
    let thresholds = *store.thresholds();
    let mut result = CmdResult::default();

    let expiring: Vec<_> = store
        .records()
        .iter()
        .filter(|i| i.is_expiring_soon(now, thresholds.expiry_window_days))
        .collect();
    for item in &expiring {
        let expiry = item.expiry_date.map(|d| d.to_string()).unwrap_or_default();
        result.add_message(CmdMessage::warning(format!(
            "{} {} expires on {}",
            item.id, item.name, expiry
        )));
    }

    let low: Vec<_> = store
        .records()
        .iter()
        .filter(|i| i.status != StockStatus::SoldOut && i.is_low_stock(thresholds.low_stock_below))
        .collect();
    for item in &low {
        result.add_message(CmdMessage::warning(format!(
            "{} {} is low on stock ({} kg)",
            item.id, item.name, item.quantity
        )));
    }

    if expiring.is_empty() && low.is_empty() {
        result.add_message(CmdMessage::success("No products expiring soon or low on stock."));
    } else {
        result.add_message(CmdMessage::info(format!(
            "{} product(s) expiring within {} days, {} low on stock.",
            expiring.len(),
            thresholds.expiry_window_days,
            low.len()
        )));
    }
    result
}
