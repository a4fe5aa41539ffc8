use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param, header, body_partial_json};

use patient_cell::{Gender, NewPatient, PatientService, Priority};
use shared_utils::test_utils::{TestConfig, MockSupabaseResponses};

async fn setup() -> (MockServer, PatientService) {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_mock_server(&mock_server.uri()).to_app_config();
    (mock_server, PatientService::new(&config))
}

#[tokio::test]
async fn test_phone_exists_matches_normalised_number() {
    let (mock_server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("phone_number", "eq.6362805484"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "phone_number": "6362805484" }])))
        .mount(&mock_server)
        .await;

    assert!(service.phone_exists("whatsapp:+916362805484", "token").await.unwrap());
}

#[tokio::test]
async fn test_phone_exists_false_when_no_rows() {
    let (mock_server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    assert!(!service.phone_exists("9999999999", "token").await.unwrap());
    assert!(service.get_by_phone("9999999999", "token").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_by_phone_decodes_patient() {
    let (mock_server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("phone_number", "eq.6362805484"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_response("6362805484", "Asha Rao", "High")
        ])))
        .mount(&mock_server)
        .await;

    let found = service.get_by_phone("+91 636 280 5484", "token").await.unwrap();
    let patient = assert_matches!(found, Some(patient) => patient);
    assert_eq!(patient.name, "Asha Rao");
    assert_eq!(patient.priority, Priority::High);
    assert_eq!(patient.gender, Gender::Female);
    assert_eq!(patient.preferred_language(), "English");
}

#[tokio::test]
async fn test_insert_defaults_language_and_normalises_phone() {
    let (mock_server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!({
            "phone_number": "6362805484",
            "language": "English",
            "priority": "Medium",
            "gender": "Male"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::patient_response("6362805484", "Ravi Kumar", "Medium")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let patient = service.insert(NewPatient {
        name: "Ravi Kumar".into(),
        age: 41,
        gender: Gender::Male,
        disease: "diabetes".into(),
        phone_number: "whatsapp:+916362805484".into(),
        language: None,
        priority: Priority::Medium,
    }, "token").await.unwrap();

    assert_eq!(patient.phone_number, "6362805484");
}

#[tokio::test]
async fn test_priority_summary_counts_labels() {
    let (mock_server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_response("1111111111", "A", "High"),
            MockSupabaseResponses::patient_response("2222222222", "B", "Low"),
            MockSupabaseResponses::patient_response("3333333333", "C", "High"),
        ])))
        .mount(&mock_server)
        .await;

    let summary = service.priority_summary("token").await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.high, 2);
    assert_eq!(summary.medium, 0);
    assert_eq!(summary.low, 1);
}

#[tokio::test]
async fn test_lookup_surfaces_upstream_errors() {
    let (mock_server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            MockSupabaseResponses::error_response("JWT expired", "PGRST301"),
        ))
        .mount(&mock_server)
        .await;

    let result = service.get_by_phone("6362805484", "stale-token").await;
    assert_matches!(result, Err(e) if e.to_string().starts_with("Authentication error"));
}
