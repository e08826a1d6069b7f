//! # CLI Layer
//!
//! The terminal client for the five dashboards. Parsing lives in `setup`,
//! dispatch in `commands`, and output formatting in `render`.
//!
//! ```text
//! farmchainx <role> <subcommand> [args]
//!
//! farmchainx farmer add "Sweet Corn" --quantity 200 --type Vegetable
//! farmchainx farmer qr C1004 | farmchainx consumer verify -
//! farmchainx retailer alerts
//! ```

mod commands;
mod render;
pub mod setup;

pub use commands::run;
