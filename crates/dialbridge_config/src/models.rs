// --- File: crates/dialbridge_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Path of the local log file. Console output is always on.
    pub file: Option<String>,
}

// --- Twilio Config ---
// Raw section as loaded from file/env. Every field is optional here so a
// partially configured process can still start; `TwilioCredentials` is the
// validated form handlers actually work with.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,  // TWILIO_ACCOUNT_SID
    pub auth_token: Option<String>,   // TWILIO_AUTH_TOKEN
    pub phone_number: Option<String>, // TWILIO_PHONE_NUMBER, E.164
    // The app SID is crucial for the softphone: the TwiML App in the Twilio
    // Console must point its Voice URL at this gateway's /voice route.
    pub app_sid: Option<String>, // TWILIO_APP_SID
    /// Public base URL of this gateway, used to build webhook callback URLs
    /// for calls placed over the REST API.
    pub service_url: Option<String>,
    pub token_ttl_secs: Option<i64>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub twilio: Option<TwilioConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// Default lifetime of issued access tokens.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Raised when required Twilio fields are absent. Carries the complete list
/// so operators fix everything in one pass instead of one field per restart.
#[derive(Debug, Clone, Error)]
#[error("missing required Twilio configuration: {}", .missing.join(", "))]
pub struct MissingTwilioConfig {
    pub missing: Vec<&'static str>,
}

/// Validated Twilio credentials, built once at startup and shared read-only
/// with every request handler.
#[derive(Debug, Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub phone_number: String,
    /// Optional: without it the gateway serves webhooks but refuses to issue
    /// voice tokens.
    pub app_sid: Option<String>,
    pub service_url: Option<String>,
    pub token_ttl_secs: i64,
}

impl TwilioCredentials {
    /// Checks all required fields together and reports every missing one.
    pub fn from_config(config: &AppConfig) -> Result<Self, MissingTwilioConfig> {
        let section = config.twilio.clone().unwrap_or_default();

        let mut missing = Vec::new();
        let account_sid = required(&section.account_sid, "twilio.account_sid", &mut missing);
        let auth_token = required(&section.auth_token, "twilio.auth_token", &mut missing);
        let phone_number = required(&section.phone_number, "twilio.phone_number", &mut missing);

        if !missing.is_empty() {
            return Err(MissingTwilioConfig { missing });
        }

        Ok(TwilioCredentials {
            account_sid,
            auth_token,
            phone_number,
            app_sid: section
                .app_sid
                .filter(|value| !value.trim().is_empty()),
            service_url: section
                .service_url
                .filter(|value| !value.trim().is_empty()),
            token_ttl_secs: section.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        })
    }
}

fn required(
    field: &Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> String {
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(twilio: Option<TwilioConfig>) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            twilio,
            logging: None,
        }
    }

    #[test]
    fn validation_reports_every_missing_field_at_once() {
        let err = TwilioCredentials::from_config(&config_with(None)).unwrap_err();
        assert_eq!(
            err.missing,
            vec![
                "twilio.account_sid",
                "twilio.auth_token",
                "twilio.phone_number"
            ]
        );
        assert!(err.to_string().contains("twilio.auth_token"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = TwilioCredentials::from_config(&config_with(Some(TwilioConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("   ".to_string()),
            ..Default::default()
        })))
        .unwrap_err();
        assert_eq!(
            err.missing,
            vec!["twilio.auth_token", "twilio.phone_number"]
        );
    }

    #[test]
    fn complete_section_validates_with_optional_app_sid() {
        let creds = TwilioCredentials::from_config(&config_with(Some(TwilioConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("secret".to_string()),
            phone_number: Some("+15550001111".to_string()),
            app_sid: Some("".to_string()),
            ..Default::default()
        })))
        .unwrap();

        assert_eq!(creds.account_sid, "AC123");
        assert_eq!(creds.app_sid, None);
        assert_eq!(creds.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
    }
}
