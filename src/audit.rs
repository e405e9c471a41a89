//! Audit trail of moderator actions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Kind of action recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Login,
    ApprovePrice,
    RejectPrice,
    EditStation,
    CreateStation,
    SuspendUser,
    ApproveUser,
    GenerateReport,
    SendNotification,
}

/// How prominently an entry is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Notice,
    Critical,
}

impl AuditAction {
    pub fn severity(self) -> Severity {
        match self {
            AuditAction::Login | AuditAction::ApprovePrice | AuditAction::ApproveUser => {
                Severity::Info
            }
            AuditAction::EditStation
            | AuditAction::CreateStation
            | AuditAction::GenerateReport
            | AuditAction::SendNotification => Severity::Notice,
            AuditAction::RejectPrice | AuditAction::SuspendUser => Severity::Critical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Login => "LOGIN",
            AuditAction::ApprovePrice => "APPROVE_PRICE",
            AuditAction::RejectPrice => "REJECT_PRICE",
            AuditAction::EditStation => "EDIT_STATION",
            AuditAction::CreateStation => "CREATE_STATION",
            AuditAction::SuspendUser => "SUSPEND_USER",
            AuditAction::ApproveUser => "APPROVE_USER",
            AuditAction::GenerateReport => "GENERATE_REPORT",
            AuditAction::SendNotification => "SEND_NOTIFICATION",
        }
    }
}

/// A single audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    /// Operator email, or "system"
    pub actor: String,
    pub action: AuditAction,
    pub details: String,
}

impl AuditEntry {
    pub fn new(actor: impl Into<String>, action: AuditAction, details: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            actor: actor.into(),
            action,
            details: details.into(),
        }
    }
}

/// Sink for audit entries
pub trait AuditLog: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

/// Emits audit entries as structured tracing events
#[derive(Debug, Default)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, entry: AuditEntry) {
        let action = entry.action.as_str();
        match entry.action.severity() {
            Severity::Critical => tracing::warn!(
                target: "audit",
                actor = %entry.actor,
                action,
                details = %entry.details,
                "Audit"
            ),
            _ => tracing::info!(
                target: "audit",
                actor = %entry.actor,
                action,
                details = %entry.details,
                "Audit"
            ),
        }
    }
}

/// Keeps entries in memory, newest last
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(&self, entry: AuditEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}
