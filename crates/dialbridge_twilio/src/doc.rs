// --- File: crates/dialbridge_twilio/src/doc.rs ---

// Only compile this module if the 'openapi' feature is enabled
#![cfg(feature = "openapi")]
// Allow dead code for the dummy functions used by the macros
#![allow(dead_code)]

use utoipa::OpenApi;

use crate::handlers::{
    DisconnectRequest, DisconnectResponse, ErrorResponse, PlaceCallRequest, PlaceCallResponse,
    SendSmsRequest, SendSmsResponse, TokenResponse,
};

#[utoipa::path(
    get,
    path = "/token",
    responses(
        (status = 200, description = "Voice access token for the browser softphone", body = TokenResponse),
        (status = 500, description = "Twilio section or TwiML App SID not configured", body = ErrorResponse)
    ),
    tag = "Twilio"
)]
fn doc_issue_token() {
    // Never executed, anchor for the macro.
}

#[utoipa::path(
    post,
    path = "/voice",
    responses(
        (status = 200, description = "TwiML routing instructions for one call leg", content_type = "text/xml", body = String)
    ),
    tag = "Twilio"
)]
fn doc_route_voice() {}

#[utoipa::path(
    post,
    path = "/sms",
    responses(
        (status = 200, description = "TwiML auto-reply", content_type = "text/xml", body = String)
    ),
    tag = "Twilio"
)]
fn doc_reply_sms() {}

#[utoipa::path(
    post,
    path = "/call",
    request_body = PlaceCallRequest,
    responses(
        (status = 200, description = "Outbound call placed", body = PlaceCallResponse),
        (status = 502, description = "Twilio API error", body = ErrorResponse),
        (status = 503, description = "Twilio client disabled", body = ErrorResponse)
    ),
    tag = "Twilio"
)]
fn doc_place_call() {}

#[utoipa::path(
    post,
    path = "/sms/send",
    request_body = SendSmsRequest,
    responses(
        (status = 200, description = "SMS sent", body = SendSmsResponse),
        (status = 502, description = "Twilio API error", body = ErrorResponse),
        (status = 503, description = "Twilio client disabled", body = ErrorResponse)
    ),
    tag = "Twilio"
)]
fn doc_send_sms() {}

#[utoipa::path(
    post,
    path = "/call/disconnect",
    request_body = DisconnectRequest,
    responses(
        (status = 200, description = "Call completed", body = DisconnectResponse),
        (status = 400, description = "Missing call SID", body = ErrorResponse)
    ),
    tag = "Twilio"
)]
fn doc_disconnect_call() {}

// Define the OpenAPI documentation structure for this crate
#[derive(OpenApi)]
#[openapi(
    paths(
        doc_issue_token,
        doc_route_voice,
        doc_reply_sms,
        doc_place_call,
        doc_send_sms,
        doc_disconnect_call
    ),
    components(schemas(
        TokenResponse,
        ErrorResponse,
        PlaceCallRequest,
        PlaceCallResponse,
        SendSmsRequest,
        SendSmsResponse,
        DisconnectRequest,
        DisconnectResponse
    )),
    tags(
        (name = "Twilio", description = "Browser softphone gateway endpoints")
    )
)]
pub struct TwilioApiDoc;
