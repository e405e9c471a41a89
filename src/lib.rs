//! gasprice-admin: moderation back office for GasPrice NG
//!
//! This library provides the core components for:
//! - Price deviation classification of user-submitted fuel prices
//! - Narrative annotation of suspicious submissions
//! - The moderator review queue (approve/reject)
//! - Station and user management over the managed backend
//! - CSV report export by region and date range
//! - Notification broadcast and an audit trail
//! - Logging and metrics

pub mod audit;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod moderation;
pub mod notifications;
pub mod pagination;
pub mod region;
pub mod report;
pub mod stations;
pub mod telemetry;
pub mod users;
