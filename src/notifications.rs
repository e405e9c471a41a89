//! Push notification broadcast

use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::error::ValidationError;
use crate::telemetry::{increment_counter, CounterMetric};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Audience of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    #[default]
    All,
    Android,
    Ios,
    LagosUsers,
    AbujaUsers,
}

impl Segment {
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::All => "all",
            Segment::Android => "android",
            Segment::Ios => "ios",
            Segment::LagosUsers => "lagos-users",
            Segment::AbujaUsers => "abuja-users",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Segment::All => "All Users",
            Segment::Android => "Android Users",
            Segment::Ios => "iOS Users",
            Segment::LagosUsers => "Users in Lagos",
            Segment::AbujaUsers => "Users in Abuja",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Segment::All),
            "android" => Ok(Segment::Android),
            "ios" => Ok(Segment::Ios),
            "lagos-users" => Ok(Segment::LagosUsers),
            "abuja-users" => Ok(Segment::AbujaUsers),
            _ => Err(ValidationError::Unrecognized {
                field: "segment",
                value: s.to_string(),
            }),
        }
    }
}

/// A composed notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub segment: Segment,
    pub title: String,
    pub message: String,
}

impl NotificationDraft {
    /// Build a draft; title and message must not be blank
    pub fn new(
        segment: Segment,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        let message = message.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::Blank("title"));
        }
        if message.is_empty() {
            return Err(ValidationError::Blank("message"));
        }
        Ok(Self {
            segment,
            title,
            message,
        })
    }
}

/// Delivers notifications to a segment
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Send the draft and return a confirmation for the operator
    async fn broadcast(&self, draft: &NotificationDraft) -> anyhow::Result<String>;
}

/// Records the notification in the log; delivery happens elsewhere
pub struct LogBroadcaster {
    audit: Arc<dyn AuditLog>,
    actor: String,
}

impl LogBroadcaster {
    pub fn new(audit: Arc<dyn AuditLog>, actor: impl Into<String>) -> Self {
        Self {
            audit,
            actor: actor.into(),
        }
    }
}

#[async_trait]
impl Broadcaster for LogBroadcaster {
    async fn broadcast(&self, draft: &NotificationDraft) -> anyhow::Result<String> {
        tracing::info!(
            segment = %draft.segment,
            title = %draft.title,
            message = %draft.message,
            "Broadcasting notification"
        );
        increment_counter(CounterMetric::NotificationsSent);
        self.audit.record(AuditEntry::new(
            &self.actor,
            AuditAction::SendNotification,
            format!("Sent \"{}\" to {}", draft.title, draft.segment.label()),
        ));

        Ok(format!(
            "Your message has been broadcast to the \"{}\" segment.",
            draft.segment
        ))
    }
}
