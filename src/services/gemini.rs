use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::{
    models::gemini::{GenerateContentRequest, GenerateContentResponse},
    utils::redacted,
};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("API Error: {status} - {details}")]
    Api { status: u16, details: String },
    #[error("request error: {0}")]
    Request(reqwest::Error),
    #[error("json error: {0}")]
    Decode(reqwest::Error),
    #[error("API response contained no candidates")]
    NoCandidates,
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// POST the payload and return `candidates[0]` untouched.
pub async fn generate_content(
    http: &reqwest::Client,
    url: Url,
    body: &GenerateContentRequest,
) -> Result<Value, RelayError> {
    let target = redacted(&url);
    info!("Calling model API at {}", target);

    let res = http
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(RelayError::Request)?;

    let status = res.status();
    if !status.is_success() {
        let raw = res.text().await.map_err(RelayError::Request)?;
        let details = error_details(raw);
        error!("API error response from {}: {} {}", target, status, details);
        return Err(RelayError::Api {
            status: status.as_u16(),
            details,
        });
    }

    let data = res
        .json::<GenerateContentResponse>()
        .await
        .map_err(RelayError::Decode)?;
    let candidate = data
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or(RelayError::NoCandidates)?;

    info!("Model API call successful");
    Ok(candidate)
}

/// Error bodies that parse as JSON are re-serialized compactly; a bare JSON
/// string and non-JSON text are kept as text.
fn error_details(raw: String) -> String {
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::String(s)) => s,
        Ok(v) => v.to_string(),
        Err(_) => raw,
    }
}
