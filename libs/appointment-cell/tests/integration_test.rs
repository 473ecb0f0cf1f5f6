use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::{appointment_routes, billing_routes};
use appointment_cell::services::{AppointmentService, ScheduleBoard};
use shared_gateway::GatewayContext;
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn context_for(server: &MockServer) -> Arc<GatewayContext> {
    let config = TestConfig::with_backend(server.uri()).to_app_config();
    Arc::new(GatewayContext::new(config).unwrap())
}

fn create_test_app(ctx: Arc<GatewayContext>) -> Router {
    appointment_routes(ctx)
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn mount_day(server: &MockServer, doctor_id: i64, date: &str, slots: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/appointment/getAppointmentByDoctorId"))
        .and(body_json(json!({
            "AppointmentDate": format!("{}T00:00:00", date),
            "DoctorId": doctor_id
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::doctor_day_response(doctor_id, slots)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_board_aggregates_doctor_day() {
    let mock_server = MockServer::start().await;
    mount_day(
        &mock_server,
        1,
        "2025-03-03",
        vec![
            MockBackendResponses::available_slot("09:00", "09:30"),
            MockBackendResponses::booked_slot("09:30", "10:00", 11, "Scheduled"),
            MockBackendResponses::available_slot("10:00", "10:30"),
        ],
    )
    .await;

    let app = create_test_app(context_for(&mock_server));
    let request = Request::builder()
        .uri("/board?doctor_id=1&date=2025-03-03")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let board = read_json(response).await;
    assert_eq!(board["rows"].as_array().unwrap().len(), 3);
    assert_eq!(board["stats"]["booked"], 1);
    assert_eq!(board["stats"]["total"], 3);
    assert_eq!(board["rows"][1]["tokenNo"], "T11");
    assert_eq!(board["rows"][1]["isTeleconsult"], true);
    assert_eq!(board["rows"][0]["billing"], "N/A");
    assert_eq!(board["doctorInfo"]["doctorName"], "Dr. John Smith");
    assert_eq!(board["current"], true);
}

#[tokio::test]
async fn test_current_board_tracks_last_selection() {
    let mock_server = MockServer::start().await;
    mount_day(
        &mock_server,
        2,
        "2025-03-04",
        vec![MockBackendResponses::booked_slot("11:00", "11:30", 21, "Completed")],
    )
    .await;

    let app = create_test_app(context_for(&mock_server));
    let current = || Request::builder().uri("/board/current").body(Body::empty()).unwrap();

    let response = app.clone().oneshot(current()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let load = Request::builder()
        .uri("/board?doctor_id=2&date=2025-03-04")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(load).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(current()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;
    assert_eq!(json["selection"]["doctorId"], 2);
    assert_eq!(json["selection"]["date"], "2025-03-04");
    assert_eq!(json["board"]["stats"]["booked"], 1);
}

#[tokio::test]
async fn test_board_empty_body_gives_empty_grid() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/appointment/getAppointmentByDoctorId"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let app = create_test_app(context_for(&mock_server));
    let request = Request::builder()
        .uri("/board?doctor_id=4&date=2025-03-03")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let board = read_json(response).await;
    assert_eq!(board["rows"], json!([]));
    assert_eq!(board["stats"]["total"], 0);
    assert_eq!(board["doctorInfo"], Value::Null);
}

#[tokio::test]
async fn test_board_backend_failure_is_bad_gateway() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/appointment/getAppointmentByDoctorId"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let app = create_test_app(context_for(&mock_server));
    let request = Request::builder()
        .uri("/board?doctor_id=1&date=2025-03-03")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(read_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_book_forwards_resolved_payload() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/appointment/book"))
        .and(body_partial_json(json!({
            "APP_doctor_id": 1,
            "APP_branch_id": 1,
            "APP_status": "Booked",
            "APP_end_time": "10:30:00",
            "APP_notes": "Consultation appointment"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "appointmentId": 99 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(context_for(&mock_server));
    let body = json!({
        "APP_doctor_id": 1,
        "APP_date": "2025-03-03",
        "APP_start_time": "10:00:00",
        "PAT_firstname": "Sarah",
        "PAT_lastname": "Johnson",
        "PAT_area": "Harbour",
        "PAT_mobile_number": "5552345678"
    });
    let request = Request::builder()
        .method("POST")
        .uri("/book")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = read_json(response).await;
    assert_eq!(json["appointment"]["appointmentId"], 99);
    assert_eq!(json["notification"]["severity"], "success");
}

#[tokio::test]
async fn test_book_invalid_form_never_reaches_backend() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/appointment/book"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(context_for(&mock_server));
    let body = json!({
        "APP_doctor_id": 1,
        "APP_date": "2025-03-03",
        "APP_start_time": "10:00:00",
        "PAT_firstname": "Sarah",
        "PAT_lastname": "",
        "PAT_area": "Harbour",
        "PAT_mobile_number": "555-234"
    });
    let request = Request::builder()
        .method("POST")
        .uri("/book")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = read_json(response).await;
    assert_eq!(json["fields"]["PAT_lastname"], "Last name is required");
    assert_eq!(json["fields"]["PAT_mobile_number"], "Mobile number must be 10 digits");
}

#[tokio::test]
async fn test_billing_summary() {
    let app = billing_routes();
    let body = json!({
        "items": [
            { "particular": "Consultation", "quantity": 1, "rate": 500.0, "discount": 50.0 },
            { "particular": "Dressing", "quantity": 2, "rate": 100.0 }
        ],
        "amountPaid": 400.0
    });
    let request = Request::builder()
        .method("POST")
        .uri("/summary")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let summary = read_json(response).await;
    assert_eq!(summary["total"], 650.0);
    assert_eq!(summary["discount"], 50.0);
    assert_eq!(summary["dueAmount"], 250.0);
}

#[tokio::test]
async fn test_schedule_board_drops_superseded_refresh() {
    let mock_server = MockServer::start().await;
    mount_day(
        &mock_server,
        1,
        "2025-03-03",
        vec![MockBackendResponses::booked_slot("09:00", "09:30", 7, "Scheduled")],
    )
    .await;

    let ctx = context_for(&mock_server);
    let service = AppointmentService::new(ctx);
    let board = ScheduleBoard::new();
    let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();

    let stale = board.select(1, monday);
    let (_, applied) = board.refresh(&service, 1, monday).await.unwrap();
    assert!(applied);
    assert_eq!(board.current().unwrap().stats.booked, 1);

    let late = service.fetch_board(1, monday).await.unwrap();
    assert!(!board.apply(&stale, late));
}
