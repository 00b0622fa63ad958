use reqwest::header;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlackApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("slack returned non-success status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("slack api error: {0}")]
    Api(String),
    #[error("invalid json from slack: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Slack Web API access scoped to the calls this bot makes.
#[derive(Clone, Debug)]
pub struct SlackClient {
    api_base: String,
    oauth_token: String,
}

impl SlackClient {
    pub fn new(api_base: &str, oauth_token: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            oauth_token: oauth_token.to_string(),
        }
    }

    /// Fetches the raw `team.accessLogs` body. Blocking; run it off the async
    /// executor. One attempt only.
    pub fn fetch_access_logs(&self) -> Result<Value, SlackApiError> {
        let client = reqwest::blocking::Client::new();
        let url = format!("{}/team.accessLogs", self.api_base);

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static("last-login-bot/0.1"));

        let resp = client
            .get(&url)
            .headers(headers)
            .bearer_auth(&self.oauth_token)
            .send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(SlackApiError::Status { status: status.as_u16(), body });
        }

        let payload: Value = serde_json::from_str(&body)?;
        if payload.get("ok").and_then(Value::as_bool) != Some(true) {
            let error = payload
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(SlackApiError::Api(error.to_string()));
        }
        Ok(payload)
    }
}
