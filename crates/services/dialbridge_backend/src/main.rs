// File: services/dialbridge_backend/src/main.rs
use dialbridge_backend::app;
use dialbridge_config::{load_config, TwilioCredentials};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));

    // Keep the guard alive or buffered file output is dropped on exit
    let _log_guard = dialbridge_common::logging::init(config.logging.as_ref());

    let credentials = match TwilioCredentials::from_config(&config) {
        Ok(credentials) => {
            info!("Twilio client initialized successfully.");
            Some(Arc::new(credentials))
        }
        Err(err) => {
            // Serve anyway: webhooks degrade, REST routes answer 503.
            error!("{err}; Twilio client disabled");
            None
        }
    };
    if let Some(credentials) = credentials.as_deref() {
        if credentials.app_sid.is_none() {
            error!("twilio.app_sid (TWILIO_APP_SID) is not set; voice token issuance disabled");
        }
    }

    let app = app(credentials);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
