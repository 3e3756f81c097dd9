use bienestar_common::{AvailabilityStore, StoreError};
use bienestar_config::FirestoreConfig;
use bienestar_firestore::auth::TokenProvider;
use bienestar_firestore::{FirestoreClient, FirestoreError, FirestoreStore};
use chrono::NaiveDate;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RUN_QUERY_PATH: &str = "/v1/projects/demo/databases/(default)/documents:runQuery";

fn config_for(server: &MockServer) -> FirestoreConfig {
    FirestoreConfig {
        project_id: Some("demo".to_string()),
        base_url: format!("{}/v1", server.uri()),
        ..FirestoreConfig::default()
    }
}

fn store_for(server: &MockServer) -> FirestoreStore {
    let config = config_for(server);
    let client = FirestoreClient::new(&config, TokenProvider::anonymous()).unwrap();
    FirestoreStore::new(client, &config, "America/Bogota".parse().unwrap())
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

fn document(collection: &str, id: &str, fields: Value) -> Value {
    json!({
        "document": {
            "name": format!("projects/demo/databases/(default)/documents/{}/{}", collection, id),
            "fields": fields,
            "createTime": "2024-05-01T10:00:00Z",
            "updateTime": "2024-05-01T10:00:00Z"
        },
        "readTime": "2024-06-01T00:00:00Z"
    })
}

async fn mount_collection(server: &MockServer, collection: &str, items: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .and(body_partial_json(json!({
            "structuredQuery": { "from": [{ "collectionId": collection }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(items)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_working_windows_match_calendar_day_in_zone() {
    let server = MockServer::start().await;
    mount_collection(
        &server,
        "schedules",
        vec![
            // Local midnight in Bogota, stored as UTC
            document(
                "schedules",
                "w1",
                json!({
                    "specialistId": { "stringValue": "S1" },
                    "date": { "timestampValue": "2024-06-10T05:00:00Z" },
                    "startTime": { "stringValue": "08:00" },
                    "endTime": { "stringValue": "10:00" }
                }),
            ),
            document(
                "schedules",
                "w2",
                json!({
                    "specialistId": { "stringValue": "S1" },
                    "date": { "stringValue": "2024-06-11" },
                    "startTime": { "stringValue": "14:00" },
                    "endTime": { "stringValue": "16:00" }
                }),
            ),
            // Missing endTime: skipped, not fatal
            document(
                "schedules",
                "broken",
                json!({
                    "specialistId": { "stringValue": "S1" },
                    "date": { "stringValue": "2024-06-10" },
                    "startTime": { "stringValue": "12:00" }
                }),
            ),
            // progress-only element
            json!({ "readTime": "2024-06-01T00:00:00Z" }),
        ],
    )
    .await;

    let store = store_for(&server);
    let windows = store.working_windows("S1", june(10)).await.unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].id, "w1");
    assert_eq!(windows[0].start_time, "08:00");

    let range = store
        .working_windows_between("S1", june(10), june(11))
        .await
        .unwrap();
    assert_eq!(range.len(), 2);
}

#[tokio::test]
async fn test_booked_times_are_read_from_appointments() {
    let server = MockServer::start().await;
    mount_collection(
        &server,
        "appointments",
        vec![
            document(
                "appointments",
                "apt1",
                json!({
                    "specialistId": { "stringValue": "S1" },
                    "date": { "timestampValue": "2024-06-10T15:00:00Z" },
                    "time": { "stringValue": "10:00 a.m." },
                    "status": { "stringValue": "pendiente" }
                }),
            ),
            document(
                "appointments",
                "apt2",
                json!({
                    "specialistId": { "stringValue": "S1" },
                    "date": { "timestampValue": "2024-06-12T15:00:00Z" },
                    "time": { "stringValue": "11:00" }
                }),
            ),
        ],
    )
    .await;

    let store = store_for(&server);
    let booked = store.booked_times("S1", june(10)).await.unwrap();
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0].appointment_id, "apt1");
    assert_eq!(booked[0].time, "10:00 a.m.");
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend overloaded"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.booked_times("S1", june(10)).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn test_permission_denied_is_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.working_windows("S1", june(10)).await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));
    assert!(err.to_string().contains("403"));
}

#[test]
fn test_missing_project_id_is_config_error() {
    let config = FirestoreConfig::default();
    let result = FirestoreClient::new(&config, TokenProvider::anonymous());
    assert!(matches!(result, Err(FirestoreError::ConfigError(_))));
}

#[test]
fn test_documents_url_targets_configured_database() {
    let config = FirestoreConfig {
        project_id: Some("demo".to_string()),
        database_id: "clinic".to_string(),
        base_url: "http://localhost:8080/v1/".to_string(),
        ..FirestoreConfig::default()
    };
    let client = FirestoreClient::new(&config, TokenProvider::anonymous()).unwrap();
    assert_eq!(
        client.documents_url(),
        "http://localhost:8080/v1/projects/demo/databases/clinic/documents"
    );
}
