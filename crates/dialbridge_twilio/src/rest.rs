// --- File: crates/dialbridge_twilio/src/rest.rs ---
//! Thin wrappers over the Twilio 2010-04-01 REST API: sending SMS, placing
//! and completing calls, and listing recent activity. All requests go over
//! the shared HTTP client with basic auth (account SID / auth token).

use dialbridge_common::HTTP_CLIENT;
use dialbridge_config::TwilioCredentials;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::TwilioError;

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// How many records the activity log pulls per resource.
const LOG_PAGE_SIZE: &str = "20";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CallRecord {
    pub sid: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
    pub direction: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageRecord {
    pub sid: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
    pub direction: Option<String>,
    pub date_created: Option<String>,
    pub date_updated: Option<String>,
    pub body: Option<String>,
}

/// Recent calls and messages, newest first, as Twilio returns them.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ActivityLog {
    pub calls: Vec<CallRecord>,
    pub messages: Vec<MessageRecord>,
}

#[derive(Debug, Deserialize)]
struct CallPage {
    calls: Vec<CallRecord>,
}

#[derive(Debug, Deserialize)]
struct MessagePage {
    messages: Vec<MessageRecord>,
}

/// Sends an outbound SMS from the configured number.
pub async fn send_message(
    credentials: &TwilioCredentials,
    to: &str,
    body: &str,
) -> Result<MessageRecord, TwilioError> {
    let url = format!(
        "{API_BASE}/Accounts/{}/Messages.json",
        credentials.account_sid
    );
    let params = [
        ("To", to),
        ("From", credentials.phone_number.as_str()),
        ("Body", body),
    ];
    let response = HTTP_CLIENT
        .post(&url)
        .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
        .form(&params)
        .send()
        .await?;
    read_json(response).await
}

/// Places an outbound call from the configured number; `voice_url` is the
/// webhook Twilio fetches for routing instructions once the call connects.
pub async fn place_call(
    credentials: &TwilioCredentials,
    to: &str,
    voice_url: &str,
) -> Result<CallRecord, TwilioError> {
    let url = format!("{API_BASE}/Accounts/{}/Calls.json", credentials.account_sid);
    let params = [
        ("To", to),
        ("From", credentials.phone_number.as_str()),
        ("Url", voice_url),
    ];
    let response = HTTP_CLIENT
        .post(&url)
        .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
        .form(&params)
        .send()
        .await?;
    read_json(response).await
}

/// Ends a live call by updating its status to `completed`.
pub async fn complete_call(
    credentials: &TwilioCredentials,
    call_sid: &str,
) -> Result<CallRecord, TwilioError> {
    let url = format!(
        "{API_BASE}/Accounts/{}/Calls/{}.json",
        credentials.account_sid, call_sid
    );
    let params = [("Status", "completed")];
    let response = HTTP_CLIENT
        .post(&url)
        .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
        .form(&params)
        .send()
        .await?;
    read_json(response).await
}

/// Fetches the most recent calls and messages, both pages in parallel.
pub async fn recent_activity(
    credentials: &TwilioCredentials,
) -> Result<ActivityLog, TwilioError> {
    let calls_url = format!("{API_BASE}/Accounts/{}/Calls.json", credentials.account_sid);
    let messages_url = format!(
        "{API_BASE}/Accounts/{}/Messages.json",
        credentials.account_sid
    );

    let (calls, messages) = tokio::try_join!(
        list::<CallPage>(credentials, &calls_url),
        list::<MessagePage>(credentials, &messages_url),
    )?;

    Ok(ActivityLog {
        calls: calls.calls,
        messages: messages.messages,
    })
}

async fn list<T: DeserializeOwned>(
    credentials: &TwilioCredentials,
    url: &str,
) -> Result<T, TwilioError> {
    let response = HTTP_CLIENT
        .get(url)
        .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
        .query(&[("PageSize", LOG_PAGE_SIZE)])
        .send()
        .await?;
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TwilioError> {
    let status = response.status();
    if !status.is_success() {
        // Bubble up the Twilio JSON error so callers can debug
        let body = response.text().await.unwrap_or_default();
        error!("Twilio returned {}: {}", status, body);
        return Err(TwilioError::ApiError {
            status_code: status.as_u16(),
            message: body,
        });
    }
    Ok(response.json::<T>().await?)
}
