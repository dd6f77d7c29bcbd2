// --- File: crates/dialbridge_twilio/src/handlers.rs ---
use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use dialbridge_config::TwilioCredentials;

use crate::error::TwilioError;
use crate::rest;
use crate::token::{generate_voice_token, CLIENT_IDENTITY};
use crate::twiml::{Dial, MessagingResponse, VoiceResponse};

/// Fixed auto-reply sent for every inbound SMS, whatever its content.
pub const SMS_AUTO_REPLY: &str =
    "Thank you for your message. A BTM Properties representative will be with you shortly.";

// State for the Twilio handlers
#[derive(Clone)]
pub struct TwilioState {
    /// Validated at startup. `None` means startup validation failed: webhook
    /// routes degrade to a spoken notice and REST-backed routes answer 503.
    pub credentials: Option<Arc<TwilioCredentials>>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResponse {
    pub token: String,
    pub identity: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub error: String,
}

type JsonError = (StatusCode, Json<ErrorResponse>);

fn error_json(status: StatusCode, message: impl Into<String>) -> JsonError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn require_credentials(state: &TwilioState) -> Result<&TwilioCredentials, JsonError> {
    state.credentials.as_deref().ok_or_else(|| {
        error_json(
            StatusCode::SERVICE_UNAVAILABLE,
            "Twilio client is not configured.",
        )
    })
}

fn rest_error(err: TwilioError) -> JsonError {
    let status = match &err {
        TwilioError::RequestError(_) | TwilioError::ApiError { .. } => StatusCode::BAD_GATEWAY,
        TwilioError::ConfigError(_) | TwilioError::InternalError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error!("Twilio request failed: {err}");
    (status, Json(ErrorResponse { error: err.to_string() }))
}

fn xml(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/xml")], body).into_response()
}

// --- /token ---

/// Issues a voice access token for the browser softphone.
///
/// Fails with a structured 500 when the TwiML App SID (or the whole Twilio
/// section) is missing; never panics into the framework.
#[axum::debug_handler]
pub async fn issue_token(
    State(state): State<Arc<TwilioState>>,
) -> Result<Json<TokenResponse>, JsonError> {
    let Some(credentials) = state.credentials.as_deref() else {
        error!("token requested but the Twilio client is disabled");
        return Err(error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Voice application not configured.",
        ));
    };
    if credentials.app_sid.is_none() {
        error!("token requested but twilio.app_sid (TWILIO_APP_SID) is not set");
        return Err(error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Voice application not configured.",
        ));
    }

    match generate_voice_token(credentials) {
        Ok(token) => Ok(Json(TokenResponse {
            token,
            identity: CLIENT_IDENTITY.to_string(),
        })),
        Err(err) => {
            error!("failed to generate access token: {err}");
            Err(error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate token",
            ))
        }
    }
}

// --- /voice ---

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VoiceWebhook {
    #[serde(rename = "To")]
    pub to: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
}

/// Answers Twilio's voice webhook with routing instructions for one call leg.
#[axum::debug_handler]
pub async fn route_voice(
    State(state): State<Arc<TwilioState>>,
    Form(webhook): Form<VoiceWebhook>,
) -> Response {
    let Some(credentials) = state.credentials.as_deref() else {
        warn!("voice webhook received but the Twilio client is disabled");
        let twiml = VoiceResponse::new()
            .say("This phone system is not configured yet. Please contact your administrator.");
        return xml(twiml.to_xml());
    };

    info!(
        "voice webhook: CallSid={} To={} From={}",
        webhook.call_sid.as_deref().unwrap_or("<none>"),
        webhook.to.as_deref().unwrap_or("<none>"),
        webhook.from.as_deref().unwrap_or("<none>"),
    );

    xml(build_voice_twiml(&webhook, &credentials.phone_number).to_xml())
}

/// Routing rule: a webhook carrying a usable `To` is a browser-originated
/// outbound call; anything else is an inbound call for the softphone client.
/// A `To` digit-equal to our own number is the number's voice webhook firing
/// for an inbound leg and routes to the client as well.
pub fn build_voice_twiml(webhook: &VoiceWebhook, caller_id: &str) -> VoiceResponse {
    let to_raw = webhook.to.as_deref().map(str::trim).unwrap_or("");

    if let Some(client_name) = to_raw.strip_prefix("client:") {
        let dial = Dial::new().caller_id(caller_id).client(client_name);
        return VoiceResponse::new().dial(dial);
    }

    let to_digits = digits(to_raw);
    if to_digits.is_empty() || to_digits == digits(caller_id) {
        // Inbound: ring the registered browser client, showing the real
        // caller where we have one.
        let display = webhook
            .from
            .as_deref()
            .map(str::trim)
            .filter(|from| !from.is_empty())
            .unwrap_or(caller_id);
        let dial = Dial::new().caller_id(display).client(CLIENT_IDENTITY);
        VoiceResponse::new().dial(dial)
    } else {
        // Outbound from the browser: dial the raw number, present our number.
        let dial = Dial::new().caller_id(caller_id).number(to_raw);
        VoiceResponse::new().dial(dial)
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

// --- /sms ---

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SmsWebhook {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
}

/// Answers Twilio's inbound-SMS webhook with the fixed auto-reply.
#[axum::debug_handler]
pub async fn reply_sms(
    State(_state): State<Arc<TwilioState>>,
    Form(webhook): Form<SmsWebhook>,
) -> Response {
    info!(
        "Incoming SMS from {}: {}",
        webhook.from.as_deref().unwrap_or("<unknown>"),
        webhook.body.as_deref().unwrap_or("")
    );

    let twiml = MessagingResponse::new().message(SMS_AUTO_REPLY);
    xml(twiml.to_xml())
}

// --- /call ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlaceCallRequest {
    pub number: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PlaceCallResponse {
    pub sid: String,
    pub status: Option<String>,
    pub message: String,
}

/// Places an outbound call over the REST API, pointing Twilio back at our
/// /voice webhook for routing once the callee answers.
#[axum::debug_handler]
pub async fn place_call(
    State(state): State<Arc<TwilioState>>,
    Json(request): Json<PlaceCallRequest>,
) -> Result<Json<PlaceCallResponse>, JsonError> {
    let credentials = require_credentials(&state)?;
    let Some(service_url) = credentials.service_url.as_deref() else {
        return Err(error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            "twilio.service_url is not configured; cannot build the voice webhook URL.",
        ));
    };

    let voice_url = format!("{}/voice", service_url.trim_end_matches('/'));
    info!("Placing call to {} via {}", request.number, voice_url);

    match rest::place_call(credentials, &request.number, &voice_url).await {
        Ok(call) => Ok(Json(PlaceCallResponse {
            message: format!("Calling {}...", request.number),
            sid: call.sid,
            status: call.status,
        })),
        Err(err) => Err(rest_error(err)),
    }
}

// --- /sms/send ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendSmsRequest {
    pub to: String,
    pub message: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendSmsResponse {
    pub success: bool,
    pub message: String,
}

/// Sends an outbound SMS from the configured number.
#[axum::debug_handler]
pub async fn send_sms(
    State(state): State<Arc<TwilioState>>,
    Json(request): Json<SendSmsRequest>,
) -> Result<Json<SendSmsResponse>, JsonError> {
    let credentials = require_credentials(&state)?;

    info!("Sending SMS to {}: {}", request.to, request.message);
    match rest::send_message(credentials, &request.to, &request.message).await {
        Ok(_) => Ok(Json(SendSmsResponse {
            success: true,
            message: "SMS sent successfully".to_string(),
        })),
        Err(err) => Err(rest_error(err)),
    }
}

// --- /call/disconnect ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DisconnectRequest {
    pub call_sid: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DisconnectResponse {
    pub success: bool,
    pub call_sid: String,
    pub status: Option<String>,
}

/// Completes a live call. A call Twilio no longer knows about counts as
/// already completed.
#[axum::debug_handler]
pub async fn disconnect_call(
    State(state): State<Arc<TwilioState>>,
    Json(request): Json<DisconnectRequest>,
) -> Result<Json<DisconnectResponse>, JsonError> {
    let credentials = require_credentials(&state)?;

    let call_sid = request.call_sid.trim();
    if call_sid.is_empty() {
        return Err(error_json(
            StatusCode::BAD_REQUEST,
            "Parameter \"call_sid\" is required.",
        ));
    }

    match rest::complete_call(credentials, call_sid).await {
        Ok(call) => Ok(Json(DisconnectResponse {
            success: true,
            call_sid: call.sid,
            status: call.status,
        })),
        Err(TwilioError::ApiError { status_code: 404, .. }) => Ok(Json(DisconnectResponse {
            success: true,
            call_sid: call_sid.to_string(),
            status: Some("completed".to_string()),
        })),
        Err(err) => Err(rest_error(err)),
    }
}

// --- /logs ---

/// Returns the most recent calls and messages on the account.
#[axum::debug_handler]
pub async fn activity_logs(
    State(state): State<Arc<TwilioState>>,
) -> Result<Json<rest::ActivityLog>, JsonError> {
    let credentials = require_credentials(&state)?;
    match rest::recent_activity(credentials).await {
        Ok(log) => Ok(Json(log)),
        Err(err) => Err(rest_error(err)),
    }
}
