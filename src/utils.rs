// src/utils.rs
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    NetworkFailure(String),
    ProtocolFailure(String),
    CooldownActive { remaining_secs: u64 },
    PollInFlight,
    WidgetInactive,
    ClipboardDenied(String),
    UnknownCopyField(String),
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkFailure(e) => write!(f, "Network failure: {}", e),
            Self::ProtocolFailure(e) => write!(f, "Protocol failure: {}", e),
            Self::CooldownActive { remaining_secs } => {
                write!(f, "Please wait {} seconds before refreshing again", remaining_secs)
            }
            Self::PollInFlight => write!(f, "A status check is already in progress"),
            Self::WidgetInactive => write!(f, "The status widget is not active"),
            Self::ClipboardDenied(e) => write!(f, "Could not write to clipboard: {}", e),
            Self::UnknownCopyField(field) => write!(f, "Unknown copy field: {}", field),
        }
    }
}

impl std::error::Error for StatusError {}

impl ResponseError for StatusError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CooldownActive { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::PollInFlight => StatusCode::CONFLICT,
            Self::WidgetInactive => StatusCode::SERVICE_UNAVAILABLE,
            Self::UnknownCopyField(_) => StatusCode::BAD_REQUEST,
            Self::NetworkFailure(_) | Self::ProtocolFailure(_) => StatusCode::BAD_GATEWAY,
            Self::ClipboardDenied(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::CooldownActive { remaining_secs } => json!({
                "error": self.to_string(),
                "remaining_secs": remaining_secs,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Whole seconds left, rounded up so a pending 0.2s still reads as 1.
pub fn ceil_secs(remaining: Duration) -> u64 {
    let millis = remaining.as_millis();
    let secs = millis / 1000 + u128::from(millis % 1000 != 0);
    u64::try_from(secs).unwrap_or(u64::MAX)
}
