//! # Core Types
//!
//! The five dashboards share one storage engine. What differs between them (field
//! sets, id scheme, statuses, search fields, CSV layout, aggregates) is described
//! by implementing [`Record`] for the role's entity type.
//!
//! Statuses and other closed vocabularies are declared with the `labeled_enum!`
//! macro so their serialized form, display form, and parse form are the same
//! human label (`"In Transit"`, `"Grade A"`).

use crate::csv::CsvField;
use crate::error::{FarmError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Declares a closed enum whose variants serialize, display and parse as fixed labels.
///
/// Parsing is case-insensitive and treats `-` and `_` as spaces, so `in-transit`
/// on a command line resolves to `In Transit`.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $crate::model::Labeled for $name {
            fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            fn all() -> &'static [Self] {
                &[ $( $name::$variant ),+ ]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::model::Labeled::label(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::FarmError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                $crate::model::parse_label(s)
            }
        }
    };
}

pub(crate) use labeled_enum;

/// A closed vocabulary with one human label per variant.
pub trait Labeled: Sized + Copy + 'static {
    fn label(&self) -> &'static str;
    fn all() -> &'static [Self];
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase()
}

pub(crate) fn parse_label<T: Labeled>(s: &str) -> Result<T> {
    let wanted = normalize_label(s);
    T::all()
        .iter()
        .copied()
        .find(|v| normalize_label(v.label()) == wanted)
        .ok_or_else(|| FarmError::InvalidStatus(s.trim().to_string()))
}

/// The status vocabulary of a record type. `Default` is the status given on creation.
pub trait StatusValue:
    Labeled
    + Eq
    + Default
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = FarmError>
    + Serialize
    + DeserializeOwned
{
}

impl<T> StatusValue for T where
    T: Labeled
        + Eq
        + Default
        + fmt::Debug
        + fmt::Display
        + FromStr<Err = FarmError>
        + Serialize
        + DeserializeOwned
{
}

labeled_enum! {
    /// Produce quality grade, shared by farm batches and shop inventory.
    pub enum Grade {
        #[default]
        A => "Grade A",
        B => "Grade B",
        C => "Grade C",
    }
}

labeled_enum! {
    /// The participant roles of the supply chain, one dashboard each.
    pub enum Role {
        #[default]
        Farmer => "farmer",
        Distributor => "distributor",
        Retailer => "retailer",
        Consumer => "consumer",
        Admin => "admin",
    }
}

/// Per-role storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key prefix isolating this store's persisted data.
    pub namespace: String,
    /// Human name, used for export file names.
    pub label: &'static str,
    pub id_prefix: &'static str,
    /// New ids count up from `id_base + collection size`.
    pub id_base: u64,
    pub log_capacity: usize,
    /// When set, creation drops the oldest records beyond this many.
    pub record_capacity: Option<usize>,
    /// Prefix update-log entries with the time of the mutation.
    pub timestamp_log: bool,
}

impl StoreConfig {
    pub fn new(namespace: &str, label: &'static str, id_prefix: &'static str, id_base: u64) -> Self {
        Self {
            namespace: namespace.to_string(),
            label,
            id_prefix,
            id_base,
            log_capacity: 8,
            record_capacity: None,
            timestamp_log: false,
        }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn with_record_capacity(mut self, capacity: usize) -> Self {
        self.record_capacity = Some(capacity);
        self
    }

    pub fn with_timestamped_log(mut self) -> Self {
        self.timestamp_log = true;
        self
    }

    pub fn records_key(&self) -> String {
        format!("{}_records_v1", self.namespace)
    }

    pub fn log_key(&self) -> String {
        format!("{}_log_v1", self.namespace)
    }

    pub fn seq_key(&self) -> String {
        format!("{}_seq_v1", self.namespace)
    }
}

/// Thresholds for the derived "low stock" and "expiring soon" views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Quantities strictly below this count as low stock.
    pub low_stock_below: u32,
    pub expiry_window_days: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_stock_below: 100,
            expiry_window_days: 3,
        }
    }
}

/// A domain entity owned by a [`RecordStore`](crate::record_store::RecordStore).
pub trait Record: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned {
    /// Caller-supplied fields for creation.
    type Draft;
    /// Partial update; `None` leaves a field unchanged.
    type Patch;
    type Status: StatusValue;
    type Stats;

    const CSV_HEADER: &'static [&'static str];

    fn config() -> StoreConfig;

    fn from_draft(id: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Checks draft fields that cannot be expressed as required text.
    fn validate_draft(_draft: &Self::Draft) -> Result<()> {
        Ok(())
    }

    /// Checks patch fields the same way `validate_draft` checks drafts.
    fn validate_patch(_patch: &Self::Patch) -> Result<()> {
        Ok(())
    }

    fn apply(&mut self, patch: Self::Patch);

    fn id(&self) -> &str;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    fn created_at(&self) -> DateTime<Utc>;

    /// Text fields that must be non-blank, as `(field name, value)`.
    fn required_fields(&self) -> Vec<(&'static str, &str)>;

    /// Fields matched by free-text queries. The status label is always searched too.
    fn searchable_fields(&self) -> Vec<&str>;

    fn csv_row(&self) -> Vec<CsvField>;

    fn aggregate(records: &[Self], now: DateTime<Utc>, thresholds: &Thresholds) -> Self::Stats;

    fn seed(now: DateTime<Utc>) -> Vec<Self>;

    fn seed_log(_now: DateTime<Utc>) -> Vec<String> {
        Vec::new()
    }

    fn created_entry(&self) -> String;

    fn updated_entry(&self) -> String {
        format!("{} updated.", self.id())
    }

    fn deleted_entry(&self) -> String {
        format!("{} removed.", self.id())
    }

    fn status_entry(&self) -> String {
        format!("{} marked {}.", self.id(), self.status())
    }
}

/// Record counts per status, in the vocabulary's declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCounts<S: StatusValue> {
    pub total: usize,
    counts: Vec<(S, usize)>,
}

impl<S: StatusValue> StatusCounts<S> {
    pub fn tally<R: Record<Status = S>>(records: &[R]) -> Self {
        let counts = S::all()
            .iter()
            .map(|s| (*s, records.iter().filter(|r| r.status() == *s).count()))
            .collect();
        Self {
            total: records.len(),
            counts,
        }
    }

    pub fn get(&self, status: S) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, usize)> + '_ {
        self.counts.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_roundtrip_through_serde() {
        let json = serde_json::to_string(&Grade::B).unwrap();
        assert_eq!(json, "\"Grade B\"");
        let parsed: Grade = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Grade::B);
    }

    #[test]
    fn parsing_is_lenient_about_case_and_separators() {
        assert_eq!("grade-a".parse::<Grade>().unwrap(), Grade::A);
        assert_eq!("GRADE_C".parse::<Grade>().unwrap(), Grade::C);
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!(matches!(
            "Grade Z".parse::<Grade>(),
            Err(FarmError::InvalidStatus(s)) if s == "Grade Z"
        ));
    }

    #[test]
    fn default_variant_is_first_marked() {
        assert_eq!(Grade::default(), Grade::A);
        assert_eq!(Role::default(), Role::Farmer);
    }

    #[test]
    fn storage_keys_follow_namespace() {
        let config = StoreConfig::new("farmchainx_farmer", "crops", "C", 1000);
        assert_eq!(config.records_key(), "farmchainx_farmer_records_v1");
        assert_eq!(config.log_key(), "farmchainx_farmer_log_v1");
        assert_eq!(config.seq_key(), "farmchainx_farmer_seq_v1");

        let moved = config.with_namespace("test");
        assert_eq!(moved.records_key(), "test_records_v1");
    }
}
