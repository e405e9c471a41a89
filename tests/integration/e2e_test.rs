//! End-to-end integration tests over the sample dataset

use chrono::{Days, Utc};
use gasprice_admin::audit::{AuditAction, MemoryAuditLog};
use gasprice_admin::backend::{InMemoryStore, SubmissionStatus};
use gasprice_admin::config::{AnnotatorMode, Config};
use gasprice_admin::error::{AdminError, ReportError, ValidationError};
use gasprice_admin::moderation::{Decision, ModerationQueue};
use gasprice_admin::notifications::{Broadcaster, LogBroadcaster, NotificationDraft, Segment};
use gasprice_admin::region::Region;
use gasprice_admin::report::{ExportFormat, ReportCriteria, ReportGenerator};
use gasprice_admin::stations::{NewStation, StationService, DEFAULT_ZOOM, NIGERIA_CENTER};
use gasprice_admin::users::{AccountStatus, UserService};
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

const ACTOR: &str = "admin@example.com";

#[test]
fn test_config_example_parses() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.moderation.deviation_threshold, dec!(0.5));
    assert_eq!(config.moderation.page_size, 10);
    assert_eq!(config.annotator.mode, AnnotatorMode::Template);
    assert!(config.telemetry.metrics_port.is_none());
}

#[tokio::test]
async fn test_review_pending_queue() {
    let store = Arc::new(InMemoryStore::demo());
    let audit = Arc::new(MemoryAuditLog::new());
    let queue = ModerationQueue::new(store.clone(), audit.clone(), ACTOR, 10, dec!(0.5));

    let page = queue.page(SubmissionStatus::Pending, 1).await.unwrap();
    assert_eq!(page.total, 3);
    let flagged: Vec<i64> = page
        .items
        .iter()
        .filter(|i| i.is_suspicious())
        .map(|i| i.submission.id)
        .collect();
    assert_eq!(flagged, vec![5822, 5824]);

    for id in flagged {
        queue.decide(id, Decision::Reject).await.unwrap();
    }
    queue.decide(5823, Decision::Approve).await.unwrap();
    assert!(queue.decide(5822, Decision::Approve).await.is_err());

    let page = queue.page(SubmissionStatus::Pending, 1).await.unwrap();
    assert_eq!(page.total, 0);
    let approved = queue.page(SubmissionStatus::Approved, 1).await.unwrap();
    assert_eq!(approved.total, 3);

    let actions: Vec<AuditAction> = audit.entries().iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::RejectPrice,
            AuditAction::RejectPrice,
            AuditAction::ApprovePrice
        ]
    );
}

#[tokio::test]
async fn test_generate_csv_report() {
    let dir = tempfile::tempdir().unwrap();
    let audit = Arc::new(MemoryAuditLog::new());
    let generator = ReportGenerator::new(
        Arc::new(InMemoryStore::demo()),
        audit.clone(),
        ACTOR,
        dir.path(),
    );

    let today = Utc::now().date_naive();
    let from = today.checked_sub_days(Days::new(7)).unwrap();
    let lagos = Region::State("Lagos");
    let criteria = ReportCriteria::new(lagos, from, today, ExportFormat::Csv).unwrap();

    let report = generator.generate(&criteria).await.unwrap();
    assert_eq!(report.rows, 3);
    assert_eq!(
        report.path.file_name().and_then(|n| n.to_str()),
        Some(format!("FYND_FUEL_Report_Lagos_{}_to_{}.csv", from, today).as_str())
    );

    let body = std::fs::read_to_string(&report.path).unwrap();
    let mut lines = body.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Submitted At,Station Name,"));
    assert_eq!(lines.count(), 3);
    assert!(body.contains("\"Oando, Lekki Phase 1\""));
    assert!(!body.contains("Maitama"));

    assert_eq!(audit.entries()[0].action, AuditAction::GenerateReport);
}

#[tokio::test]
async fn test_report_edge_cases() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ReportGenerator::new(
        Arc::new(InMemoryStore::demo()),
        Arc::new(MemoryAuditLog::new()),
        ACTOR,
        dir.path(),
    );
    let today = Utc::now().date_naive();

    let kano = Region::State("Kano");
    let empty = ReportCriteria::new(kano, today, today, ExportFormat::Csv).unwrap();
    assert!(matches!(
        generator.generate(&empty).await,
        Err(ReportError::NoData)
    ));

    let pdf = ReportCriteria::new(Region::All, today, today, ExportFormat::Pdf).unwrap();
    let err = generator.generate(&pdf).await.unwrap_err();
    assert_eq!(err.to_string(), "PDF export is not yet implemented");

    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_station_map_and_registration() {
    let audit = Arc::new(MemoryAuditLog::new());
    let service = StationService::new(Arc::new(InMemoryStore::demo()), audit.clone(), ACTOR, 10);

    let map = service.map().await.unwrap();
    assert_eq!(map.center, NIGERIA_CENTER);
    assert_eq!(map.zoom, DEFAULT_ZOOM);
    assert_eq!(map.markers.len(), 5);
    assert!(map.markers.iter().all(|m| m.title != "AP, Bodija"));

    let created = service
        .add(NewStation {
            name: "  Ardova, Garki  ".to_string(),
            address: Some("".to_string()),
            state: " abuja ".to_string(),
            metadata: Some("24/7 service".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(created.name, "Ardova, Garki");
    assert_eq!(created.state, "Abuja");
    assert!(created.address.is_none());

    let page = service.list(1).await.unwrap();
    assert_eq!(page.total, 7);
    assert_eq!(audit.entries()[0].action, AuditAction::CreateStation);

    let err = service
        .add(NewStation {
            name: "Somewhere".to_string(),
            address: None,
            state: "Atlantis".to_string(),
            metadata: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdminError::Validation(ValidationError::UnknownState(_))
    ));
}

#[tokio::test]
async fn test_user_management() {
    let audit = Arc::new(MemoryAuditLog::new());
    let service = UserService::new(Arc::new(InMemoryStore::demo()), audit.clone(), ACTOR, 2);

    let first = service.list(1).await.unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.total_pages(), 3);
    assert_eq!(first.items[0].display_name(), "John Doe");

    let detail = service.detail(Uuid::from_u128(4)).await.unwrap();
    assert_eq!(detail.provider, "google");

    let approved = service.approve(Uuid::from_u128(5)).await.unwrap();
    assert_eq!(approved.status, AccountStatus::Active);
    assert!(service.approve(Uuid::from_u128(5)).await.is_err());

    let suspended = service.suspend(Uuid::from_u128(2)).await.unwrap();
    assert_eq!(suspended.status, AccountStatus::Suspended);

    let missing = service.detail(Uuid::from_u128(99)).await.unwrap_err();
    assert!(matches!(missing, AdminError::NotFound(_)));

    let actions: Vec<AuditAction> = audit.entries().iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::ApproveUser, AuditAction::SuspendUser]
    );
}

#[tokio::test]
async fn test_broadcast_notification() {
    let audit = Arc::new(MemoryAuditLog::new());
    let broadcaster = LogBroadcaster::new(audit.clone(), ACTOR);
    let draft = NotificationDraft::new(
        "abuja-users".parse::<Segment>().unwrap(),
        "Scarcity Update",
        "Queues reported along Ahmadu Bello Way.",
    )
    .unwrap();

    let message = broadcaster.broadcast(&draft).await.unwrap();
    assert_eq!(
        message,
        "Your message has been broadcast to the \"abuja-users\" segment."
    );
    assert_eq!(audit.entries()[0].action, AuditAction::SendNotification);
}
