//! CLI interface for gasprice-admin
//!
//! Provides subcommands for:
//! - `classify`: Check one price against an average
//! - `queue`: Review submissions awaiting moderation
//! - `decide`: Approve or reject a submission
//! - `report`: Export a pricing report
//! - `stations`: List, add and map stations
//! - `users`: List, inspect and moderate accounts
//! - `notify`: Broadcast a push notification
//! - `config`: Show configuration

mod classify;
mod notify;
mod queue;
mod report;
mod stations;
mod users;

pub use classify::ClassifyArgs;
pub use notify::NotifyArgs;
pub use queue::{DecideArgs, QueueArgs};
pub use report::ReportArgs;
pub use stations::{StationCommand, StationsArgs};
pub use users::{UserCommand, UsersArgs};

use crate::audit::{AuditLog, TracingAuditLog};
use crate::backend::{AdminStore, InMemoryStore, PostgrestClient, PostgrestConfig};
use crate::config::{Config, API_KEY_ENV};
use crate::moderation::{build_annotator, ModerationQueue, PriceModerator};
use crate::notifications::LogBroadcaster;
use crate::report::ReportGenerator;
use crate::stations::StationService;
use crate::users::UserService;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "gasprice-admin")]
#[command(about = "Moderation back office for GasPrice NG fuel price submissions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Use the built-in sample dataset instead of the backend
    #[arg(long)]
    pub offline: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a submitted price against the average price
    Classify(ClassifyArgs),
    /// Show one page of the moderation queue
    Queue(QueueArgs),
    /// Approve or reject a price submission
    Decide(DecideArgs),
    /// Generate a pricing report
    Report(ReportArgs),
    /// Manage fuel stations
    Stations(StationsArgs),
    /// Manage user accounts
    Users(UsersArgs),
    /// Broadcast a push notification
    Notify(NotifyArgs),
    /// Show configuration
    Config,
}

/// Services wired from configuration
pub struct Context {
    config: Config,
    offline: bool,
    audit: Arc<dyn AuditLog>,
}

impl Context {
    pub fn new(config: Config, offline: bool) -> Self {
        Self {
            config,
            offline,
            audit: Arc::new(TracingAuditLog),
        }
    }

    fn actor(&self) -> &str {
        &self.config.moderation.actor
    }

    /// The backend store, or the sample dataset when offline
    pub fn store(&self) -> anyhow::Result<Arc<dyn AdminStore>> {
        if self.offline {
            tracing::info!("Using offline sample dataset");
            return Ok(Arc::new(InMemoryStore::demo()));
        }

        let backend = &self.config.backend;
        if backend.api_key.is_empty() {
            anyhow::bail!(
                "no API key configured; set backend.api_key or {} (or pass --offline)",
                API_KEY_ENV
            );
        }
        let client = PostgrestClient::new(PostgrestConfig {
            base_url: backend.url.clone(),
            api_key: backend.api_key.clone(),
            timeout: Duration::from_secs(backend.timeout_secs),
        })?;
        Ok(Arc::new(client))
    }

    pub fn moderator(&self) -> anyhow::Result<PriceModerator> {
        let annotator = build_annotator(&self.config.annotator)?;
        Ok(PriceModerator::with_default_threshold(
            annotator,
            self.config.moderation.deviation_threshold,
        ))
    }

    pub fn moderation_queue(&self) -> anyhow::Result<ModerationQueue> {
        Ok(ModerationQueue::new(
            self.store()?,
            self.audit.clone(),
            self.actor(),
            self.config.moderation.page_size,
            self.config.moderation.deviation_threshold,
        ))
    }

    pub fn report_generator(&self) -> anyhow::Result<ReportGenerator> {
        Ok(ReportGenerator::new(
            self.store()?,
            self.audit.clone(),
            self.actor(),
            self.config.reports.output_dir.clone(),
        ))
    }

    pub fn station_service(&self) -> anyhow::Result<StationService> {
        Ok(StationService::new(
            self.store()?,
            self.audit.clone(),
            self.actor(),
            self.config.moderation.page_size,
        ))
    }

    pub fn user_service(&self) -> anyhow::Result<UserService> {
        Ok(UserService::new(
            self.store()?,
            self.audit.clone(),
            self.actor(),
            self.config.moderation.page_size,
        ))
    }

    pub fn broadcaster(&self) -> LogBroadcaster {
        LogBroadcaster::new(self.audit.clone(), self.actor())
    }
}
