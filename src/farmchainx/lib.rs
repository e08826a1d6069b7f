//! # FarmChainX Architecture
//!
//! FarmChainX keeps the records of a small agricultural supply chain: farmers
//! register crop batches, distributors ship them, retailers stock them, consumers
//! verify what they bought, and an admin manages the people involved. Each role
//! has its own independent collection, persisted locally.
//!
//! The five collections differ only in their fields, so there is one storage
//! engine, [`record_store::RecordStore`], and one [`model::Record`] implementation
//! per role.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, prints, exits                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Opens role stores on a shared backend with config        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)  ·  RecordStore (record_store.rs) │
//! │  - Export files, alerts, QR, verification                   │
//! │  - CRUD, selection, query, aggregate, CSV                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - KeyValueStore trait                                      │
//! │  - FileStore (production), MemStore (testing)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! Everything from `api.rs` inward takes plain arguments and returns plain
//! types. It never writes to stdout or stderr and never exits the process.
//! Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Time
//!
//! Operations that stamp or compare against the current time come in pairs:
//! `create` uses `Utc::now()`, `create_at` takes `now` explicitly. Tests use the
//! `_at` forms.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`record_store`]: The generic record engine
//! - [`model`]: `Record` trait, store configuration, shared enums
//! - [`roles`]: One record type per dashboard
//! - [`commands`]: Composite actions returning `CmdResult`
//! - [`csv`]: CSV rendering
//! - [`derived`]: Delay, expiry and stock views
//! - [`update_log`]: Bounded mutation log
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Configuration file
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod csv;
pub mod derived;
pub mod error;
pub mod model;
pub mod record_store;
pub mod roles;
pub mod store;
pub mod update_log;
