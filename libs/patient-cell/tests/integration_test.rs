use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::router::patient_routes;
use shared_gateway::GatewayContext;
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn create_test_app(server: &MockServer) -> Router {
    let config = TestConfig::with_backend(server.uri()).to_app_config();
    patient_routes(Arc::new(GatewayContext::new(config).unwrap()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn registration_form() -> Value {
    json!({
        "firstName": "Sarah",
        "lastName": "Johnson",
        "dateOfBirth": "1991-04-12",
        "gender": "Female",
        "mobileNumber": "5552345678",
        "email": "sarah.j@example.com",
        "address": "12 Harbour Road",
        "bloodGroup": "A+",
        "maritalStatus": "Married",
        "isFirstVisit": true
    })
}

#[tokio::test]
async fn test_list_patients_applies_search() {
    let mock_server = MockServer::start().await;
    let mut other = MockBackendResponses::patient("PT001");
    other["firstName"] = json!("John");
    other["lastName"] = json!("Smith");
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [other, MockBackendResponses::patient("PT002")]
        })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let (status, json) = send(&app, "GET", "/?search=johnson&blood_group=A%2B", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["patients"][0]["id"], "PT002");

    let (_, json) = send(&app, "GET", "/", None).await;
    assert_eq!(json["total"], 2);
}

#[tokio::test]
async fn test_get_missing_patient_is_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients/PT404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let (status, _) = send(&app, "GET", "/PT404", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_patient_unwraps_envelope() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients/PT002"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": MockBackendResponses::patient("PT002") })),
        )
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let (status, json) = send(&app, "GET", "/PT002", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["firstName"], "Sarah");
    assert_eq!(json["dateOfBirth"], "1991-04-12");
}

#[tokio::test]
async fn test_register_patient_forwards_form() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/patients"))
        .and(body_partial_json(json!({
            "firstName": "Sarah",
            "mobileNumber": "5552345678",
            "isFirstVisit": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(MockBackendResponses::patient("PT010")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let (status, json) = send(&app, "POST", "/", Some(registration_form())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["patient"]["id"], "PT010");
    assert_eq!(json["notification"]["message"], "Patient registered successfully!");
}

#[tokio::test]
async fn test_invalid_registration_never_reaches_backend() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut form = registration_form();
    form["mobileNumber"] = json!("12345");
    form["bloodGroup"] = json!("");

    let app = create_test_app(&mock_server);
    let (status, json) = send(&app, "POST", "/", Some(form)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["fields"]["mobileNumber"], "Enter a valid 10-digit mobile number");
    assert_eq!(json["fields"]["bloodGroup"], "Blood group is required");
}

#[tokio::test]
async fn test_update_failure_is_bad_gateway() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/patients/PT002"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let (status, json) = send(&app, "PUT", "/PT002", Some(registration_form())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_delete_patient() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/patients/PT002"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(&mock_server);
    let (status, json) = send(&app, "DELETE", "/PT002", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deleted"], "PT002");
    assert_eq!(json["notification"]["severity"], "success");
}
