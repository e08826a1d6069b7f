//! Admin dashboard: portal users and their approval.
//!
//! A user's status is derived from its `approved` flag, so approving a user is
//! an ordinary status change. The admin log is timestamped and keeps 30 lines.

use crate::csv::CsvField;
use crate::model::{labeled_enum, Labeled, Record, Role, StatusCounts, StoreConfig, Thresholds};
use crate::update_log::stamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

labeled_enum! {
    pub enum UserStatus {
        #[default]
        Pending => "Pending",
        Approved => "Approved",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub approved: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub total_users: usize,
    pub farmers: usize,
    pub distributors: usize,
    pub retailers: usize,
    pub consumers: usize,
    pub admins: usize,
    pub pending_approvals: usize,
}

impl Record for User {
    type Draft = UserDraft;
    type Patch = UserPatch;
    type Status = UserStatus;
    type Stats = UserStats;

    const CSV_HEADER: &'static [&'static str] =
        &["ID", "Name", "Email", "Role", "Approved", "Created At"];

    fn config() -> StoreConfig {
        StoreConfig::new("farmchainx_admin", "farmchainx-users", "U", 1000)
            .with_log_capacity(30)
            .with_timestamped_log()
    }

    fn from_draft(id: String, draft: UserDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            role: draft.role,
            approved: false,
            created_at: now,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            self.email = email.trim().to_string();
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(approved) = patch.approved {
            self.approved = approved;
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> UserStatus {
        if self.approved {
            UserStatus::Approved
        } else {
            UserStatus::Pending
        }
    }

    fn set_status(&mut self, status: UserStatus) {
        self.approved = status == UserStatus::Approved;
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("name", self.name.as_str()), ("email", self.email.as_str())]
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.name.as_str(),
            self.email.as_str(),
            self.role.label(),
        ]
    }

    fn csv_row(&self) -> Vec<CsvField> {
        vec![
            CsvField::plain(&self.id),
            CsvField::text(&self.name),
            CsvField::text(&self.email),
            CsvField::plain(self.role),
            CsvField::plain(if self.approved { "Yes" } else { "No" }),
            CsvField::plain(self.created_at.to_rfc3339()),
        ]
    }

    fn aggregate(records: &[Self], _now: DateTime<Utc>, _thresholds: &Thresholds) -> UserStats {
        let with_role = |role: Role| records.iter().filter(|u| u.role == role).count();
        let by_status = StatusCounts::tally(records);
        UserStats {
            total_users: by_status.total,
            farmers: with_role(Role::Farmer),
            distributors: with_role(Role::Distributor),
            retailers: with_role(Role::Retailer),
            consumers: with_role(Role::Consumer),
            admins: with_role(Role::Admin),
            pending_approvals: by_status.get(UserStatus::Pending),
        }
    }

    fn seed(now: DateTime<Utc>) -> Vec<Self> {
        let user = |id: &str, name: &str, email: &str, role: Role, approved: bool| User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            approved,
            created_at: now,
        };
        vec![
            user("U1001", "Rajesh Farmer", "rajesh@example.com", Role::Farmer, true),
            user(
                "U1002",
                "Suresh Distributor",
                "suresh@example.com",
                Role::Distributor,
                true,
            ),
            user("U1003", "Ravi Retailer", "ravi@example.com", Role::Retailer, false),
        ]
    }

    fn seed_log(now: DateTime<Utc>) -> Vec<String> {
        vec![
            stamp(now, "System initialized."),
            stamp(now, "Sample users loaded."),
        ]
    }

    fn created_entry(&self) -> String {
        format!("New user {} added", self.email)
    }

    fn updated_entry(&self) -> String {
        format!("User {} updated", self.email)
    }

    fn deleted_entry(&self) -> String {
        format!("User {} deleted", self.email)
    }

    fn status_entry(&self) -> String {
        match self.status() {
            UserStatus::Approved => format!("User {} approved", self.email),
            UserStatus::Pending => format!("User {} set to pending", self.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_store::RecordStore;
    use crate::store::memory::MemStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 9, 30, 0).unwrap()
    }

    #[test]
    fn seed_stats() {
        let stats = User::aggregate(&User::seed(now()), now(), &Thresholds::default());
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.farmers, 1);
        assert_eq!(stats.distributors, 1);
        assert_eq!(stats.retailers, 1);
        assert_eq!(stats.admins, 0);
        assert_eq!(stats.pending_approvals, 1);
    }

    #[test]
    fn approving_through_the_store() {
        let storage = MemStore::new();
        let mut store: RecordStore<User, _> =
            RecordStore::open_at(&storage, User::config(), now());

        store.select("U1003").unwrap();
        let user = store
            .set_status_at(None, UserStatus::Approved, now())
            .unwrap();
        assert!(user.approved);
        assert_eq!(
            store.log().entries()[0],
            "2025-11-10 09:30:00 — User ravi@example.com approved"
        );
        assert_eq!(store.aggregate_at(now()).pending_approvals, 0);
    }

    #[test]
    fn new_users_start_pending() {
        let storage = MemStore::new();
        let mut store: RecordStore<User, _> =
            RecordStore::open_at(&storage, User::config(), now());

        let user = store
            .create_at(
                UserDraft {
                    name: "Meena".into(),
                    email: "meena@example.com".into(),
                    role: Role::Consumer,
                },
                now(),
            )
            .unwrap();
        assert_eq!(user.id, "U1004");
        assert!(!user.approved);
        assert_eq!(store.query("consumer").count(), 1);
        assert_eq!(store.query("pending").count(), 2);
    }

    #[test]
    fn seed_log_is_timestamped() {
        let log = User::seed_log(now());
        assert_eq!(log[0], "2025-11-10 09:30:00 — System initialized.");
    }

    #[test]
    fn csv_renders_approval_as_yes_no() {
        let users = User::seed(now());
        assert_eq!(users[0].csv_row()[4], CsvField::plain("Yes"));
        assert_eq!(users[2].csv_row()[4], CsvField::plain("No"));
    }
}
