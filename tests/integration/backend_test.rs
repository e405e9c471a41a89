//! HTTP-level tests against mocked backend and annotation services

use chrono::NaiveDate;
use gasprice_admin::audit::MemoryAuditLog;
use gasprice_admin::backend::{AdminStore, PostgrestClient, PostgrestConfig, SubmissionStatus};
use gasprice_admin::error::{AdminError, BackendError};
use gasprice_admin::moderation::{
    Decision, FlagPriceInput, HttpAnnotator, ModerationQueue, PriceModerator,
};
use gasprice_admin::region::Region;
use gasprice_admin::report::{ExportFormat, ReportCriteria};
use gasprice_admin::users::UserService;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "service-key";

fn client(server: &MockServer) -> PostgrestClient {
    PostgrestClient::new(PostgrestConfig {
        base_url: format!("{}/", server.uri()),
        api_key: KEY.to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn submission_json(id: i64, price: u32, total: u64) -> serde_json::Value {
    json!({
        "id": id,
        "station_name": "NNPC, Maitama",
        "user_name": null,
        "user_avatar": null,
        "fuel_type": "PMS",
        "submitted_price": price,
        "average_price": 720,
        "status": "Pending",
        "created_at": "2024-07-29T14:30:15Z",
        "total_count": total
    })
}

#[tokio::test]
async fn test_moderation_queue_calls_rpc() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_price_submissions_for_moderation"))
        .and(header("apikey", KEY))
        .and(header("authorization", "Bearer service-key"))
        .and(body_json(json!({
            "_status_filter": "Pending",
            "_limit": 10,
            "_offset": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            submission_json(5822, 1090, 12),
            submission_json(5823, 725, 12)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let queue = ModerationQueue::new(
        Arc::new(client(&server)),
        Arc::new(MemoryAuditLog::new()),
        "admin@example.com",
        10,
        dec!(0.5),
    );
    let page = queue.page(SubmissionStatus::Pending, 2).await.unwrap();

    assert_eq!(page.total, 12);
    assert_eq!(page.items.len(), 2);
    assert!(page.items[0].is_suspicious());
    assert!(!page.items[1].is_suspicious());
    assert_eq!(page.summary(), "Showing 11-12 of 12");
}

#[tokio::test]
async fn test_decision_patches_status() {
    let server = MockServer::start().await;
    let updated = json!([{ "id": 5824, "status": "Rejected" }]);
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/price_reports"))
        .and(query_param("id", "eq.5824"))
        .and(query_param("status", "eq.Pending"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!({ "status": "Rejected" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    let audit = Arc::new(MemoryAuditLog::new());
    let queue = ModerationQueue::new(
        Arc::new(client(&server)),
        audit.clone(),
        "admin@example.com",
        10,
        dec!(0.5),
    );
    let message = queue.decide(5824, Decision::Reject).await.unwrap();
    assert_eq!(message, "Submission has been Rejected.");
    assert_eq!(audit.entries().len(), 1);
}

#[tokio::test]
async fn test_decision_on_decided_submission_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/price_reports"))
        .and(query_param("status", "eq.Pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let audit = Arc::new(MemoryAuditLog::new());
    let queue = ModerationQueue::new(
        Arc::new(client(&server)),
        audit.clone(),
        "admin@example.com",
        10,
        dec!(0.5),
    );
    let err = queue.decide(5824, Decision::Approve).await.unwrap_err();
    assert!(matches!(err, AdminError::NotFound(_)));
    assert!(audit.entries().is_empty());
}

#[tokio::test]
async fn test_error_status_surfaces_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad api key"))
        .mount(&server)
        .await;

    let err = client(&server)
        .moderation_queue(SubmissionStatus::Pending, 10, 0)
        .await
        .unwrap_err();
    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad api key");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_list_stations_reads_content_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/stations"))
        .and(header("Prefer", "count=exact"))
        .and(query_param("order", "name.asc"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", "0-0/42")
                .set_body_json(json!([{
                    "id": 1,
                    "name": "TotalEnergies, Ikeja",
                    "address": "Obafemi Awolowo Way",
                    "state": "Lagos",
                    "status": "Active",
                    "submissions": 1205,
                    "latitude": 6.6018,
                    "longitude": 3.3515
                }])),
        )
        .mount(&server)
        .await;

    let listing = client(&server).list_stations(10, 0).await.unwrap();
    assert_eq!(listing.total, 42);
    assert_eq!(listing.rows[0].name, "TotalEnergies, Ikeja");
}

#[tokio::test]
async fn test_state_report_filters_inner_join() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/price_reports"))
        .and(query_param("stations.state", "eq.Lagos"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "created_at": "2024-07-15T09:00:00+00:00",
            "price": 715,
            "fuel_type": "PMS",
            "stations": {"name": "Mobil, VI", "address": null, "state": "Lagos"},
            "profiles": {"full_name": "Fatima Bello", "email": "fatima@example.com"}
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let criteria = ReportCriteria::new(
        Region::State("Lagos"),
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
        ExportFormat::Csv,
    )
    .unwrap();
    let rows = client(&server).report_rows(&criteria).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].stations.as_ref().and_then(|s| s.state.as_deref()),
        Some("Lagos")
    );
}

#[tokio::test]
async fn test_user_detail_without_auth_record() {
    let server = MockServer::start().await;
    let id = Uuid::from_u128(7);

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": id,
            "full_name": "Musa Ibrahim",
            "email": "musa@example.com",
            "role": "Data Analyst",
            "status": "Suspended",
            "created_at": "2023-11-20T08:00:00Z"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/price_reports"))
        .and(query_param("user_id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/auth/v1/admin/users/{}", id)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = UserService::new(
        Arc::new(client(&server)),
        Arc::new(MemoryAuditLog::new()),
        "admin@example.com",
        10,
    );
    let detail = service.detail(id).await.unwrap();
    assert_eq!(detail.profile.display_name(), "Musa Ibrahim");
    assert_eq!(detail.provider, "unknown");
    assert!(detail.recent_reports.is_empty());

    let err = service.approve(id).await.unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
}

#[tokio::test]
async fn test_http_annotator_appends_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/annotate"))
        .and(body_partial_json(json!({
            "isSuspicious": true,
            "reason": "Price deviates by 50.14% from the average price."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "  Far above nearby stations.  "
        })))
        .expect(1)
        .mount(&server)
        .await;

    let annotator =
        HttpAnnotator::new(format!("{}/annotate", server.uri()), Duration::from_secs(2)).unwrap();
    let moderator = PriceModerator::new(Box::new(annotator));
    let result = moderator
        .flag(&FlagPriceInput::new(dec!(1081), dec!(720), None))
        .await
        .unwrap();

    assert!(result.is_suspicious);
    assert_eq!(
        result.reason.as_deref(),
        Some("Price deviates by 50.14% from the average price. Far above nearby stations.")
    );
}

#[tokio::test]
async fn test_http_annotator_failure_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let annotator =
        HttpAnnotator::new(format!("{}/annotate", server.uri()), Duration::from_secs(2)).unwrap();
    let moderator = PriceModerator::new(Box::new(annotator));
    let result = moderator
        .flag(&FlagPriceInput::new(dec!(1081), dec!(720), None))
        .await
        .unwrap();

    assert!(result.is_suspicious);
    assert_eq!(
        result.reason.as_deref(),
        Some("Price deviates by 50.14% from the average price.")
    );
}

#[tokio::test]
async fn test_http_annotator_not_called_for_normal_prices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "" })))
        .expect(0)
        .mount(&server)
        .await;

    let annotator =
        HttpAnnotator::new(format!("{}/annotate", server.uri()), Duration::from_secs(2)).unwrap();
    let moderator = PriceModerator::new(Box::new(annotator));
    let result = moderator
        .flag(&FlagPriceInput::new(dec!(725), dec!(720), None))
        .await
        .unwrap();
    assert!(!result.is_suspicious);
    assert!(result.reason.is_none());
}
