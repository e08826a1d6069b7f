//! # Command Layer
//!
//! Composite actions built on top of [`RecordStore`](crate::record_store::RecordStore):
//! writing exports to disk, alert reports, QR payloads, verification and
//! configuration. Plain CRUD goes straight to the store; commands exist where an
//! action spans more than one store call or touches the filesystem.
//!
//! Commands never print, prompt or exit. They return a [`CmdResult`] and the UI
//! decides how to render it.
//!
//! ## Command Modules
//!
//! - [`export`]: Write a CSV export to a file
//! - [`alerts`]: Delayed shipments, expiring and low-stock inventory
//! - [`qr`]: Build the QR payload for a crop batch
//! - [`verify`]: Verify scanned payloads and record feedback
//! - [`config`]: Show and change configuration

use crate::config::FarmchainxConfig;
use serde::Serialize;
use std::path::PathBuf;

pub mod alerts;
pub mod config;
pub mod export;
pub mod qr;
pub mod verify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
    /// Files written by the command.
    pub paths: Vec<PathBuf>,
    pub config: Option<FarmchainxConfig>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_config(mut self, config: FarmchainxConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn count(&self, level: MessageLevel) -> usize {
        self.messages.iter().filter(|m| m.level == level).count()
    }
}
