use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::{
    read_json_body, router_with_sources, rule, FixedCatalog, FixedDirectory, UnreachableCatalog,
    UnreachableDirectory,
};

fn recommendation_request(body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/v1/recomendaciones")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).unwrap(),
        ))
        .unwrap()
}

fn advice_topics(payload: &Value) -> Vec<String> {
    payload["patient_advice"]
        .as_array()
        .expect("advice array")
        .iter()
        .map(|entry| entry["topic"].as_str().expect("topic string").to_string())
        .collect()
}

#[tokio::test]
async fn recommendation_route_degrades_when_catalog_is_unreachable() {
    let router = router_with_sources(UnreachableCatalog, FixedDirectory(Vec::new()));

    let body = json!({
        "name": "Rosa",
        "profile": {
            "age": 56,
            "biological_sex": "female",
            "weight_kg": 130.0,
            "height_cm": 200.0,
            "risk_factors": {"smoker": "yes"}
        }
    });
    let response = router
        .oneshot(recommendation_request(&body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["catalog_available"], false);
    assert_eq!(payload["bmi_label"], "Obesidad Grado I");
    assert!(payload["interventions"]["groups"]
        .as_array()
        .expect("groups array")
        .is_empty());
    // The fixed guidance still comes through on a catalog outage.
    assert!(advice_topics(&payload).contains(&"Dejar de fumar".to_string()));
}

#[tokio::test]
async fn recommendation_route_renormalizes_the_submitted_profile() {
    let router = router_with_sources(FixedCatalog(Vec::new()), FixedDirectory(Vec::new()));

    // A pregnancy-planning answer on a male profile is cleared before any
    // rule sees it, so the folic-acid guidance must not fire.
    let body = json!({
        "name": "Martín",
        "profile": {
            "age": 44,
            "biological_sex": "male",
            "weight_kg": 60.0,
            "height_cm": 165.0,
            "risk_factors": {"smoker": "no", "pregnancy_planned": "yes"}
        }
    });
    let response = router
        .oneshot(recommendation_request(&body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["catalog_available"], true);
    let topics = advice_topics(&payload);
    assert!(!topics.contains(&"Ácido fólico".to_string()));
    assert!(!topics.contains(&"Dejar de fumar".to_string()));
}

#[tokio::test]
async fn recommendation_route_matches_catalog_rules() {
    let router = router_with_sources(
        FixedCatalog(vec![rule("Mamografía", "Cáncer", "edad >= 50")]),
        FixedDirectory(Vec::new()),
    );

    let body = json!({
        "name": "Rosa",
        "profile": {
            "age": 56,
            "biological_sex": "female",
            "weight_kg": 70.0,
            "height_cm": 170.0
        }
    });
    let response = router
        .oneshot(recommendation_request(&body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["catalog_available"], true);
    let groups = payload["interventions"]["groups"]
        .as_array()
        .expect("groups array");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["category"], "Cáncer");
    assert_eq!(groups[0]["rules"][0]["name"], "Mamografía");
}

#[tokio::test]
async fn institutions_route_lists_facilities_for_a_study() {
    let router = router_with_sources(
        FixedCatalog(Vec::new()),
        FixedDirectory(vec![
            "Hospital Regional".to_string(),
            "Centro Gastro".to_string(),
        ]),
    );

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/instituciones/Colonoscopia")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["study"], "Colonoscopia");
    assert_eq!(payload["directory_available"], true);
    assert_eq!(
        payload["facilities"],
        json!(["Hospital Regional", "Centro Gastro"])
    );
}

#[tokio::test]
async fn institutions_route_degrades_when_directory_is_unreachable() {
    let router = router_with_sources(FixedCatalog(Vec::new()), UnreachableDirectory);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/instituciones/Colonoscopia")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["directory_available"], false);
    assert!(payload["facilities"]
        .as_array()
        .expect("facilities array")
        .is_empty());
}
