//! Record types for each dashboard.

pub mod admin;
pub mod consumer;
pub mod distributor;
pub mod farmer;
pub mod retailer;
