//! End-to-end test against a bound listener with the bundled classifier

use api::{create_router, AppState};
use inference_engine::InferenceEngine;
use std::sync::Arc;

const BUNDLED_MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/diabetes.json");

async fn spawn_server() -> String {
    let engine = InferenceEngine::load(BUNDLED_MODEL).expect("bundled artifact loads");
    let app = create_router(Arc::new(AppState::new(engine)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn submit_form_renders_result_and_summary() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/assess", base))
        .form(&[
            ("gender", "Male"),
            ("age", "67"),
            ("hypertension", "Yes"),
            ("smoking_history", "Not current"),
            ("heart_disease", "Yes"),
            ("bmi", "33.1"),
            ("hba1c", "7.5"),
            ("blood_glucose", "250"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Result: POSITIVE (Consult a Doctor)"));
    assert!(html.contains("<tr><td>Smoking History</td><td>Not current</td></tr>"));
    assert!(html.contains("<tr><td>Blood Glucose Level</td><td>250.0</td></tr>"));
}

#[tokio::test]
async fn predict_endpoint_uses_bundled_model() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let json: serde_json::Value = client
        .post(format!("{}/api/v1/predict", base))
        .json(&serde_json::json!({
            "gender": "Female",
            "age": "45",
            "hypertension": "Yes",
            "smoking_history": "Former",
            "heart_disease": "No",
            "bmi": "27.5",
            "hba1c": "6.1",
            "blood_glucose": "140.0"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(json["result"], "NEGATIVE");
    assert_eq!(json["advice"], "No Indication Detected");

    let health: serde_json::Value = client
        .get(format!("{}/api/v1/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["components"]["inference"]["backend"], "tree_ensemble");
    assert_eq!(health["metrics"]["assessment_count"], 1);
}
