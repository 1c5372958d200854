use reqwest::StatusCode;
use thiserror::Error;

/// Why a live fetch did not produce a record.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network unreachable, DNS failure, transport timeout, or a broken body read.
    /// The request URL is stripped: its query string carries the API key.
    #[error("Ошибка сети: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx response from the provider.
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: StatusCode, message: String },

    /// 2xx response that is not JSON or lacks a required field.
    #[error("Некорректный ответ сервера: {0}")]
    MalformedPayload(String),
}

impl FetchError {
    /// Build an `HttpStatus` error, preferring the provider-supplied message.
    pub fn http_status(status: StatusCode, provider_message: Option<String>) -> Self {
        let message = provider_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                format!(
                    "Ошибка {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });

        FetchError::HttpStatus { status, message }
    }

    /// The single string shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::HttpStatus { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.without_url())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::MalformedPayload(e.to_string())
    }
}
