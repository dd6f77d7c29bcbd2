//! Drives the assembled router with in-memory requests: token issuance,
//! voice routing branches, SMS auto-reply and the dial-form prefill.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use dialbridge_backend::app;
use dialbridge_config::{AppConfig, ServerConfig, TwilioConfig, TwilioCredentials};
use dialbridge_twilio::token::Claims;
use dialbridge_twilio::CLIENT_IDENTITY;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tower::ServiceExt;

const ACCOUNT_SID: &str = "AC00000000000000000000000000000000";
const AUTH_TOKEN: &str = "test-auth-token";
const PHONE_NUMBER: &str = "+15550001111";
const APP_SID: &str = "AP11111111111111111111111111111111";

fn test_config(app_sid: Option<&str>) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        twilio: Some(TwilioConfig {
            account_sid: Some(ACCOUNT_SID.to_string()),
            auth_token: Some(AUTH_TOKEN.to_string()),
            phone_number: Some(PHONE_NUMBER.to_string()),
            app_sid: app_sid.map(str::to_string),
            ..Default::default()
        }),
        logging: None,
    }
}

fn test_app(app_sid: Option<&str>) -> Router {
    let credentials = TwilioCredentials::from_config(&test_config(app_sid))
        .expect("test config is complete");
    app(Some(Arc::new(credentials)))
}

fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = serde_urlencoded::to_string(fields).expect("encode form");
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("build request")
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn index_prefills_the_number_from_the_query() {
    let response = test_app(Some(APP_SID))
        .oneshot(
            Request::builder()
                .uri("/?number=%2B15551234567")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains(r#"value="+15551234567""#));
}

#[tokio::test]
async fn token_endpoint_returns_a_decodable_voice_token() {
    let response = test_app(Some(APP_SID))
        .oneshot(
            Request::builder()
                .uri("/token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json body");
    let token = body["token"].as_str().expect("token field");
    assert!(!token.is_empty());

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(AUTH_TOKEN.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .expect("decodable token");
    assert_eq!(decoded.claims.grants.identity, CLIENT_IDENTITY);
    assert_eq!(decoded.claims.grants.voice.outgoing.application_sid, APP_SID);
    assert!(decoded.claims.grants.voice.incoming.allow);
}

#[tokio::test]
async fn token_endpoint_reports_a_structured_error_without_app_sid() {
    let response = test_app(None)
        .oneshot(
            Request::builder()
                .uri("/token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json body");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn voice_webhook_with_to_dials_the_number_with_our_caller_id() {
    let response = test_app(Some(APP_SID))
        .oneshot(form_request("/voice", &[("To", "+15551234567")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/xml")
    );
    let twiml = body_string(response).await;
    assert!(twiml.contains("<Number>+15551234567</Number>"));
    assert!(twiml.contains(&format!(r#"callerId="{}""#, PHONE_NUMBER)));
}

#[tokio::test]
async fn voice_webhook_without_to_dials_the_browser_client() {
    let response = test_app(Some(APP_SID))
        .oneshot(form_request("/voice", &[("From", "+15557654321")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let twiml = body_string(response).await;
    assert!(twiml.contains(&format!("<Client>{}</Client>", CLIENT_IDENTITY)));
}

#[tokio::test]
async fn sms_webhook_reply_is_identical_for_any_body() {
    let with_body = test_app(Some(APP_SID))
        .oneshot(form_request(
            "/sms",
            &[("From", "+15557654321"), ("Body", "Hello")],
        ))
        .await
        .unwrap();
    let empty_body = test_app(Some(APP_SID))
        .oneshot(form_request(
            "/sms",
            &[("From", "+15557654321"), ("Body", "")],
        ))
        .await
        .unwrap();

    assert_eq!(with_body.status(), StatusCode::OK);
    assert_eq!(empty_body.status(), StatusCode::OK);

    let first = body_string(with_body).await;
    let second = body_string(empty_body).await;
    assert!(first.contains("<Message>"));
    assert_eq!(first, second);
}

#[tokio::test]
async fn rest_routes_answer_503_in_degraded_mode() {
    let response = app(None)
        .oneshot(
            Request::builder()
                .uri("/logs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
