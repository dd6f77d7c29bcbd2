// --- File: crates/dialbridge_twilio/src/token.rs ---
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TwilioError;
use dialbridge_config::TwilioCredentials;

/// Identity of the browser softphone endpoint.
///
/// The same string goes into token grants and into inbound-call routing;
/// if the two ever diverge, Twilio delivers inbound calls to a client name
/// nobody registered and they ring into the void.
pub const CLIENT_IDENTITY: &str = "btm_properties_user";

#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingGrant {
    pub application_sid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IncomingGrant {
    pub allow: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceGrant {
    pub outgoing: OutgoingGrant,
    pub incoming: IncomingGrant,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Grants {
    pub identity: String,
    pub voice: VoiceGrant,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Twilio Account SID
    pub iss: String, // Signing key SID
    pub exp: usize,  // Expiration timestamp (Unix epoch seconds)
    pub jti: String, // Unique identifier for the token
    pub grants: Grants,
}

/// Generates a short-lived Twilio voice access token for the fixed client
/// identity, granting outbound calls through the configured TwiML App and
/// inbound call delivery.
pub fn generate_voice_token(credentials: &TwilioCredentials) -> Result<String, TwilioError> {
    let app_sid = credentials.app_sid.as_deref().ok_or_else(|| {
        TwilioError::ConfigError("twilio.app_sid (TWILIO_APP_SID) is not set".to_string())
    })?;

    let now_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| TwilioError::InternalError(format!("system clock error: {err}")))?
        .as_secs();
    let jti = format!("{}-{}", credentials.account_sid, now_secs);

    let expiration =
        (Utc::now() + Duration::seconds(credentials.token_ttl_secs)).timestamp() as usize;

    let claims = Claims {
        sub: credentials.account_sid.clone(),
        iss: credentials.account_sid.clone(),
        exp: expiration,
        jti,
        grants: Grants {
            identity: CLIENT_IDENTITY.to_string(),
            voice: VoiceGrant {
                outgoing: OutgoingGrant {
                    application_sid: app_sid.to_string(),
                },
                incoming: IncomingGrant { allow: true },
            },
        },
    };

    // Standard Twilio JWT headers for access tokens
    let mut header = Header::new(Algorithm::HS256);
    header.cty = Some("twilio-fpa;v=1".to_string());
    header.typ = Some("JWT".to_string());

    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(credentials.auth_token.as_ref()),
    )
    .map_err(|err| TwilioError::InternalError(format!("failed to sign access token: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn credentials(app_sid: Option<&str>) -> TwilioCredentials {
        TwilioCredentials {
            account_sid: "AC00000000000000000000000000000000".to_string(),
            auth_token: "super-secret".to_string(),
            phone_number: "+15550001111".to_string(),
            app_sid: app_sid.map(str::to_string),
            service_url: None,
            token_ttl_secs: 3600,
        }
    }

    #[test]
    fn token_carries_identity_and_both_voice_grants() {
        let creds = credentials(Some("AP11111111111111111111111111111111"));
        let token = generate_voice_token(&creds).unwrap();
        assert!(!token.is_empty());

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(creds.auth_token.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        let claims = decoded.claims;
        assert_eq!(claims.sub, creds.account_sid);
        assert_eq!(claims.grants.identity, CLIENT_IDENTITY);
        assert_eq!(
            claims.grants.voice.outgoing.application_sid,
            "AP11111111111111111111111111111111"
        );
        assert!(claims.grants.voice.incoming.allow);
        assert!(claims.jti.starts_with(&creds.account_sid));
    }

    #[test]
    fn missing_app_sid_is_a_config_error() {
        let err = generate_voice_token(&credentials(None)).unwrap_err();
        assert!(matches!(err, TwilioError::ConfigError(_)));
    }
}
