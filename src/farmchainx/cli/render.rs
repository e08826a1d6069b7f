//! # Rendering
//!
//! Turns records, aggregates and [`CmdResult`](farmchainx::commands::CmdResult)
//! messages into terminal text. Renderers return `String`s; only
//! [`print_messages`] writes to stdout directly.
//!
//! Layout math (widths, truncation, padding) is Unicode-aware so crop and place
//! names with wide characters keep the columns aligned.

use chrono::{DateTime, Utc};
use colored::Colorize;
use farmchainx::commands::{CmdMessage, MessageLevel};
use farmchainx::config::{FarmchainxConfig, KEYS};
use farmchainx::model::{Labeled, Record, Thresholds};
use farmchainx::roles::admin::{User, UserStats};
use farmchainx::roles::consumer::{Feedback, FeedbackStats, VerifiedProduct, VerifiedStats};
use farmchainx::roles::distributor::{Shipment, ShipmentStats};
use farmchainx::roles::farmer::{Crop, CropStats};
use farmchainx::roles::retailer::{InventoryItem, InventoryStats, StockStatus};
use std::fmt::Write;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 7;
const STATUS_WIDTH: usize = 12;

/// How a record shows up as one line of `list` output.
pub trait ListRow: Record {
    fn title(&self) -> String;

    /// A condition worth highlighting, such as a delay or near expiry.
    fn flag(&self, _now: DateTime<Utc>, _thresholds: &Thresholds) -> Option<&'static str> {
        None
    }
}

impl ListRow for Crop {
    fn title(&self) -> String {
        format!("{} · {} · {}", self.name, self.quantity, self.quality)
    }
}

impl ListRow for Shipment {
    fn title(&self) -> String {
        format!(
            "{} {} {} → {}",
            self.batch_id, self.crop_name, self.origin, self.destination
        )
    }

    fn flag(&self, now: DateTime<Utc>, _thresholds: &Thresholds) -> Option<&'static str> {
        self.is_delayed(now).then_some("delayed")
    }
}

impl ListRow for InventoryItem {
    fn title(&self) -> String {
        format!("{} · {} kg @ {:.2}", self.name, self.quantity, self.price)
    }

    fn flag(&self, now: DateTime<Utc>, thresholds: &Thresholds) -> Option<&'static str> {
        if self.is_expiring_soon(now, thresholds.expiry_window_days) {
            Some("expiring")
        } else if self.status != StockStatus::SoldOut && self.is_low_stock(thresholds.low_stock_below)
        {
            Some("low stock")
        } else {
            None
        }
    }
}

impl ListRow for VerifiedProduct {
    fn title(&self) -> String {
        format!("{} ({}) · {} · {}", self.name, self.batch_id, self.qty, self.location)
    }
}

impl ListRow for Feedback {
    fn title(&self) -> String {
        let stars = "★".repeat(usize::from(self.rating));
        if self.comment.is_empty() {
            format!("{} {}", self.product_id, stars)
        } else {
            format!("{} {} {}", self.product_id, stars, self.comment)
        }
    }
}

impl ListRow for User {
    fn title(&self) -> String {
        format!("{} <{}> {}", self.name, self.email, self.role)
    }
}

/// Labelled numbers for `stats` output.
pub trait StatLines {
    fn lines(&self) -> Vec<(&'static str, String)>;
}

impl StatLines for CropStats {
    fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Active crops", self.active_crops.to_string()),
            ("Batches in transit", self.batches_in_transit.to_string()),
            ("Pending inspections", self.pending_inspections.to_string()),
            ("Completed shipments", self.completed_shipments.to_string()),
        ]
    }
}

impl StatLines for ShipmentStats {
    fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total shipments", self.total.to_string()),
            ("In transit", self.in_transit.to_string()),
            ("Delivered", self.delivered.to_string()),
            ("Delayed", self.delayed.to_string()),
        ]
    }
}

impl StatLines for InventoryStats {
    fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("In stock", self.in_stock.to_string()),
            ("Low stock", self.low_stock.to_string()),
            ("Sold out", self.sold_out.to_string()),
            ("Expiring soon", self.expiring_soon.to_string()),
            ("Total sales", format!("{:.2}", self.total_sales)),
        ]
    }
}

impl StatLines for VerifiedStats {
    fn lines(&self) -> Vec<(&'static str, String)> {
        vec![("Verified products", self.verified.to_string())]
    }
}

impl StatLines for FeedbackStats {
    fn lines(&self) -> Vec<(&'static str, String)> {
        let average = self
            .average_rating
            .map_or_else(|| "—".to_string(), |avg| format!("{:.1}", avg));
        vec![
            ("Feedback entries", self.count.to_string()),
            ("Average rating", average),
        ]
    }
}

impl StatLines for UserStats {
    fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total users", self.total_users.to_string()),
            ("Farmers", self.farmers.to_string()),
            ("Distributors", self.distributors.to_string()),
            ("Retailers", self.retailers.to_string()),
            ("Consumers", self.consumers.to_string()),
            ("Admins", self.admins.to_string()),
            ("Pending approvals", self.pending_approvals.to_string()),
        ]
    }
}

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn render_list<R: ListRow>(
    rows: &[&R],
    now: DateTime<Utc>,
    thresholds: &Thresholds,
    empty_message: &str,
) -> String {
    if rows.is_empty() {
        return format!("{}\n", empty_message);
    }

    let mut out = String::new();
    for record in rows {
        let id = format!("{:<width$}", record.id(), width = ID_WIDTH);
        let status = format!("{:<width$}", record.status().label(), width = STATUS_WIDTH);
        let flag = record
            .flag(now, thresholds)
            .map(|f| format!(" [{}]", f))
            .unwrap_or_default();

        let fixed_width = 2 + ID_WIDTH + 1 + STATUS_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title = truncate_to_width(&record.title(), available.saturating_sub(flag.width()));
        let padding = available.saturating_sub(title.width() + flag.width());

        let _ = writeln!(
            out,
            "  {} {}{}{}{}{}",
            id.yellow(),
            title,
            flag.red(),
            " ".repeat(padding),
            status,
            format_time_ago(record.created_at(), now).dimmed()
        );
    }
    out
}

pub fn render_stats<T: StatLines>(stats: &T) -> String {
    let mut out = String::new();
    for (label, value) in stats.lines() {
        let _ = writeln!(out, "{:<22}{}", label, value.bold());
    }
    out
}

pub fn render_log(entries: &[String]) -> String {
    if entries.is_empty() {
        return "No recent activity.\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "  {}", entry);
    }
    out
}

pub fn render_config(config: &FarmchainxConfig) -> String {
    let mut out = String::new();
    for key in KEYS {
        if let Some(value) = config.get(key) {
            let _ = writeln!(out, "{} = {}", key, value);
        }
    }
    out
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);

    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    // Singular units get an extra space so "1 day  ago" lines up with "2 days ago".
    let time_str = time_str
        .replace("hour ago", "hour  ago")
        .replace("minute ago", "minute  ago")
        .replace("second ago", "second  ago")
        .replace("day ago", "day  ago")
        .replace("week ago", "week  ago")
        .replace("month ago", "month  ago")
        .replace("year ago", "year  ago");

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap()
    }

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn truncates_to_display_width() {
        assert_eq!(truncate_to_width("Sweet Corn", 20), "Sweet Corn");
        assert_eq!(truncate_to_width("Sweet Corn", 6), "Sweet…");
        assert_eq!(truncate_to_width("玉米玉米玉米", 5), "玉米…");
    }

    #[test]
    fn time_ago_is_right_aligned() {
        let s = format_time_ago(now() - Duration::days(2), now());
        assert_eq!(s.width(), TIME_WIDTH);
        assert!(s.ends_with("2 days ago"));
    }

    #[test]
    fn list_lines_fit_the_line_width() {
        plain();
        let crops = Crop::seed(now());
        let rows: Vec<&Crop> = crops.iter().collect();
        let out = render_list(&rows, now(), &Thresholds::default(), "No crops.");

        assert_eq!(out.lines().count(), crops.len());
        for line in out.lines() {
            assert_eq!(line.width(), LINE_WIDTH);
        }
        assert!(out.contains("C101"));
    }

    #[test]
    fn empty_list_shows_message() {
        let rows: Vec<&User> = Vec::new();
        assert_eq!(
            render_list(&rows, now(), &Thresholds::default(), "No users."),
            "No users.\n"
        );
    }

    #[test]
    fn delayed_shipments_are_flagged() {
        plain();
        let later = now() + Duration::days(30);
        let shipments = Shipment::seed(now());
        let rows: Vec<&Shipment> = shipments.iter().collect();
        let out = render_list(&rows, later, &Thresholds::default(), "");
        assert!(out.contains("[delayed]"));
    }

    #[test]
    fn stats_are_labelled() {
        plain();
        let stats = Feedback::aggregate(&[], now(), &Thresholds::default());
        let out = render_stats(&stats);
        assert!(out.contains("Feedback entries"));
        assert!(out.contains("Average rating"));
        assert!(out.contains('—'));
    }

    #[test]
    fn config_lists_every_key() {
        let out = render_config(&FarmchainxConfig::default());
        assert!(out.contains("low-stock-threshold = 100"));
        assert!(out.contains("expiry-window-days = 3"));
    }

    #[test]
    fn log_renders_entries_in_order() {
        let out = render_log(&["second".to_string(), "first".to_string()]);
        assert_eq!(out, "  second\n  first\n");
        assert_eq!(render_log(&[]), "No recent activity.\n");
    }
}
