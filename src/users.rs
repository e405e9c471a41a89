//! User accounts

use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::backend::AdminStore;
use crate::error::{AdminError, ValidationError};
use crate::pagination::{Page, PageRequest};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Number of recent reports shown on a user's detail view
pub const RECENT_REPORTS_LIMIT: u32 = 10;

/// Dashboard role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserRole {
    Admin,
    Moderator,
    #[serde(rename = "Data Analyst")]
    DataAnalyst,
    #[default]
    User,
}

/// Account moderation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
    #[serde(rename = "Pending Approval")]
    PendingApproval,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountStatus::Active => f.write_str("Active"),
            AccountStatus::Suspended => f.write_str("Suspended"),
            AccountStatus::PendingApproval => f.write_str("Pending Approval"),
        }
    }
}

/// Profile row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Name for display, falling back to the email and then "Anonymous"
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Anonymous")
    }
}

/// A price submitted by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPriceReport {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub price: Option<Decimal>,
    pub station_name: String,
}

/// Profile plus sign-in provider and recent activity
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    pub profile: UserProfile,
    /// Auth provider, "unknown" when the auth service has no record
    pub provider: String,
    pub recent_reports: Vec<UserPriceReport>,
}

/// Next status for a moderation action, if the transition is allowed
fn transition(
    action: &'static str,
    from: AccountStatus,
    to: AccountStatus,
) -> Result<AccountStatus, ValidationError> {
    let allowed = match to {
        AccountStatus::Suspended => from != AccountStatus::Suspended,
        AccountStatus::Active => from == AccountStatus::PendingApproval,
        AccountStatus::PendingApproval => false,
    };
    if allowed {
        Ok(to)
    } else {
        Err(ValidationError::InvalidTransition {
            action,
            from: from.to_string(),
        })
    }
}

/// User management operations
pub struct UserService {
    store: Arc<dyn AdminStore>,
    audit: Arc<dyn AuditLog>,
    actor: String,
    page_size: u32,
}

impl UserService {
    pub fn new(
        store: Arc<dyn AdminStore>,
        audit: Arc<dyn AuditLog>,
        actor: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            store,
            audit,
            actor: actor.into(),
            page_size,
        }
    }

    pub async fn list(&self, page: u32) -> Result<Page<UserProfile>, AdminError> {
        let request = PageRequest::new(page, self.page_size)?;
        let listing = self
            .store
            .list_users(request.limit(), request.offset())
            .await?;
        Ok(Page::new(listing.rows, listing.total, request))
    }

    /// Profile, provider and up to ten recent reports
    ///
    /// A failure loading the reports is logged and shown as no activity.
    pub async fn detail(&self, id: Uuid) -> Result<UserDetail, AdminError> {
        let (profile, reports) = tokio::join!(
            self.store.user_profile(id),
            self.store.user_reports(id, RECENT_REPORTS_LIMIT)
        );

        let profile = match profile? {
            Some(profile) => profile,
            None => return Err(AdminError::NotFound(format!("user {}", id))),
        };

        let provider = match self.store.auth_provider(id).await {
            Ok(provider) => provider.unwrap_or_else(|| "unknown".to_string()),
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "Could not fetch auth provider");
                "unknown".to_string()
            }
        };

        let recent_reports = reports.unwrap_or_else(|e| {
            tracing::warn!(user_id = %id, error = %e, "Could not fetch user reports");
            vec![]
        });

        Ok(UserDetail {
            profile,
            provider,
            recent_reports,
        })
    }

    pub async fn suspend(&self, id: Uuid) -> Result<UserProfile, AdminError> {
        self.change_status(
            id,
            "suspend",
            AccountStatus::Suspended,
            AuditAction::SuspendUser,
        )
        .await
    }

    pub async fn approve(&self, id: Uuid) -> Result<UserProfile, AdminError> {
        self.change_status(
            id,
            "approve",
            AccountStatus::Active,
            AuditAction::ApproveUser,
        )
        .await
    }

    async fn change_status(
        &self,
        id: Uuid,
        verb: &'static str,
        to: AccountStatus,
        action: AuditAction,
    ) -> Result<UserProfile, AdminError> {
        let mut profile = self
            .store
            .user_profile(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("user {}", id)))?;

        let status = transition(verb, profile.status, to)?;
        self.store.set_account_status(id, status).await?;
        profile.status = status;

        self.audit.record(AuditEntry::new(
            &self.actor,
            action,
            format!("{} user {}", capitalize(verb), profile.display_name()),
        ));
        Ok(profile)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
