//! # API Facade
//!
//! [`FarmchainxApi`] is the single entry point for UI clients. It holds the
//! storage backend and the loaded configuration, opens a [`RecordStore`] per
//! role on demand, and forwards composite actions to the command layer.
//!
//! ## Generic Over KeyValueStore
//!
//! - Production: `FarmchainxApi<FileStore>`
//! - Testing: `FarmchainxApi<MemStore>`
//!
//! Stores opened through the API borrow its backend, so several roles can be
//! open at once (the consumer dashboard needs its products and its feedback
//! side by side).

use crate::commands::{self, config::ConfigAction, CmdResult};
use crate::config::FarmchainxConfig;
use crate::error::Result;
use crate::model::Record;
use crate::record_store::RecordStore;
use crate::roles::admin::User;
use crate::roles::consumer::{Feedback, VerifiedProduct};
use crate::roles::distributor::Shipment;
use crate::roles::farmer::Crop;
use crate::roles::retailer::InventoryItem;
use crate::store::KeyValueStore;
use std::path::{Path, PathBuf};

pub struct FarmchainxApi<S: KeyValueStore> {
    storage: S,
    config: FarmchainxConfig,
    data_dir: PathBuf,
}

impl<S: KeyValueStore> FarmchainxApi<S> {
    pub fn new(storage: S, config: FarmchainxConfig, data_dir: PathBuf) -> Self {
        Self {
            storage,
            config,
            data_dir,
        }
    }

    pub fn config(&self) -> &FarmchainxConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Opens the store for `R` with the configured thresholds.
    pub fn open<R: Record>(&self) -> RecordStore<R, &S> {
        RecordStore::open(&self.storage).with_thresholds(self.config.thresholds())
    }

    pub fn farmer(&self) -> RecordStore<Crop, &S> {
        self.open()
    }

    pub fn distributor(&self) -> RecordStore<Shipment, &S> {
        self.open()
    }

    pub fn retailer(&self) -> RecordStore<InventoryItem, &S> {
        self.open()
    }

    pub fn verified_products(&self) -> RecordStore<VerifiedProduct, &S> {
        self.open()
    }

    pub fn feedback(&self) -> RecordStore<Feedback, &S> {
        self.open()
    }

    pub fn admin(&self) -> RecordStore<User, &S> {
        self.open()
    }

    /// Shows or changes configuration on disk. Changes apply to stores opened
    /// by the next `FarmchainxApi`.
    pub fn configure(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.data_dir, action)
    }
}
