// --- File: crates/dialbridge_twilio/src/routes.rs ---
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    activity_logs, disconnect_call, issue_token, place_call, reply_sms, route_voice, send_sms,
    TwilioState,
};
use dialbridge_config::TwilioCredentials;

/// Creates a router containing all routes for the Twilio gateway.
///
/// `credentials` is the startup-validated client; pass `None` to serve in
/// degraded mode (webhooks answer, REST-backed routes return 503).
pub fn routes(credentials: Option<Arc<TwilioCredentials>>) -> Router {
    let state = Arc::new(TwilioState { credentials });

    Router::new()
        .route("/token", get(issue_token))
        .route("/voice", post(route_voice))
        .route("/sms", post(reply_sms))
        .route("/call", post(place_call))
        .route("/sms/send", post(send_sms))
        .route("/call/disconnect", post(disconnect_call))
        .route("/logs", get(activity_logs))
        .with_state(state)
}
