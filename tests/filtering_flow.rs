//! Filter-entry flow tests: submission, redirect with the encoded token,
//! and the round trip back through the listing endpoint.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use url::form_urlencoded;

use mitre_catalog::record::Record;
use mitre_catalog::render::ContextRenderer;
use mitre_catalog::routes::passthrough_wrapper;
use mitre_catalog::store::MemoryStore;
use mitre_catalog::{attack, AppState};

fn app() -> Router {
    let store = MemoryStore::new();
    store.insert(
        "attack",
        "technique",
        Record::new("T1566", "Phishing")
            .with_field("description", "Adversaries may send phishing messages"),
    );
    store.insert(
        "attack",
        "technique",
        Record::new("T1059", "Command and Scripting Interpreter")
            .with_field("description", "Abuse of command interpreters"),
    );

    let composed = attack::compose(passthrough_wrapper()).expect("attack routes must compose");
    let state = AppState::new(Arc::new(store), Arc::new(ContextRenderer), false);
    composed.router.with_state(state)
}

fn encode_query(pairs: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn submitted_criteria_survive_the_redirect_round_trip() {
    let app = app();
    let criteria = json!([{"field": "name", "op": "contains", "value": "phish"}]);

    // Submit via GET: shareable filter links.
    let uri = format!(
        "/attack/technique/filter/?{}",
        encode_query(&[("q", &criteria.to_string())])
    );
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("/attack/technique/?q="));

    // Follow the redirect: the token decodes back to the same criteria and
    // narrows the listing.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(location.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let context = &body["context"];
    assert_eq!(context["is_filtered"], true);
    let records = context["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["mitre_id"], "T1566");

    // The token in the redirect URL is the exact encoding of the criteria.
    let token = location.strip_prefix("/attack/technique/?q=").unwrap();
    let decoded: Value = serde_json::from_str(
        &form_urlencoded::parse(format!("q={token}").as_bytes())
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap(),
    )
    .unwrap();
    assert_eq!(decoded, criteria);
}

#[tokio::test]
async fn a_single_condition_object_is_accepted_without_array_brackets() {
    let app = app();
    let criteria = json!({"field": "name", "op": "contains", "value": "phish"});
    let uri = format!(
        "/attack/technique/?{}",
        encode_query(&[("q", &criteria.to_string())])
    );
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let records = body["context"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["mitre_id"], "T1566");
}

#[tokio::test]
async fn post_submission_behaves_like_get() {
    let app = app();
    let criteria = json!([{"field": "mitre_id", "op": "exact", "value": "T1059"}]);
    let body = encode_query(&[("q", &criteria.to_string())]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/attack/technique/filter/")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with("/attack/technique/?q="));
}

#[tokio::test]
async fn empty_criteria_redirect_to_a_clean_listing_url() {
    let app = app();
    let uri = format!(
        "/attack/technique/filter/?{}",
        encode_query(&[("q", "[]")])
    );
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/attack/technique/"
    );
}

#[tokio::test]
async fn invalid_submissions_rerender_the_form_with_errors() {
    let app = app();

    // Malformed JSON.
    let uri = format!(
        "/attack/technique/filter/?{}",
        encode_query(&[("q", "{not json")])
    );
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    let errors = body["context"]["form_errors"]["q"].as_array().unwrap();
    assert!(errors[0].as_str().unwrap().contains("malformed"));

    // Well-formed JSON, but a field the entity does not support.
    let criteria = json!([{"field": "collection", "op": "exact", "value": "ics"}]);
    let uri = format!(
        "/attack/technique/filter/?{}",
        encode_query(&[("q", &criteria.to_string())])
    );
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    let errors = body["context"]["form_errors"]["q"].as_array().unwrap();
    assert!(errors[0].as_str().unwrap().contains("collection"));
}

#[tokio::test]
async fn the_bare_filter_page_renders_the_schemas() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/attack/technique/filter/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let context = &body["context"];
    assert_eq!(context["title"], "Filter Techniques");
    assert_eq!(context["is_filtered"], false);
    assert!(context["form_errors"].as_object().unwrap().is_empty());

    // The tactic option exists but is flagged hidden for the flat form.
    let options = context["filtering_options_schema"].as_array().unwrap();
    let tactic = options.iter().find(|o| o["field"] == "tactic").unwrap();
    assert_eq!(tactic["hidden"], true);
}
