use reqwest::Response;
use thiserror::Error;

/// Failure of a single call against the hosted backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend unreachable: {0}")]
    Transport(String),

    #[error("backend call timed out")]
    Timeout,

    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected backend payload: {0}")]
    Decode(String),

    #[error("refusing request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Decode(e.to_string())
    }
}

/// Passes 2xx responses through; turns anything else into `Rejected`,
/// pulling the backend's own message out of a JSON body when there is one.
pub async fn check_response(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await?;
    let message = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| String::from_utf8_lossy(&body).to_string());
    Err(GatewayError::Rejected { status: status.as_u16(), message })
}
