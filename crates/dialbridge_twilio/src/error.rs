// --- File: crates/dialbridge_twilio/src/error.rs ---
use thiserror::Error;

/// Twilio-specific error types.
#[derive(Error, Debug)]
pub enum TwilioError {
    /// Error occurred during a Twilio API request
    #[error("Twilio API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Twilio API
    #[error("Twilio API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Missing or incomplete Twilio configuration
    #[error("Twilio configuration missing or incomplete: {0}")]
    ConfigError(String),

    /// Internal processing error
    #[error("Internal processing error: {0}")]
    InternalError(String),
}
