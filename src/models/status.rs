// src/models/status.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical view of the server, replaced wholesale on every completed poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub online: bool,
    pub player_count: u32,
    pub max_players: u32,
    pub version: Option<String>,
    pub motd: Option<String>,
    /// Only ever set while `online` is true.
    pub ping_ms: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl StatusRecord {
    /// Record shown before the first poll completes.
    pub fn initial(max_players: u32) -> Self {
        Self {
            online: false,
            player_count: 0,
            max_players,
            version: None,
            motd: None,
            ping_ms: None,
            last_updated: None,
        }
    }

    /// Synthetic record used when no endpoint produced a usable answer.
    pub fn offline(max_players: u32, at: DateTime<Utc>) -> Self {
        Self {
            last_updated: Some(at),
            ..Self::initial(max_players)
        }
    }

    pub fn summary(&self) -> String {
        if self.online {
            format!("Server online {}/{}", self.player_count, self.max_players)
        } else {
            "Server offline".to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollerState {
    pub is_loading: bool,
    pub cooldown_remaining_seconds: u64,
    pub last_manual_refresh_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollTrigger {
    Auto,
    Manual,
}

impl PollTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

/// One status API variant, e.g. the bedrock or java flavour of the same service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub label: String,
    pub base_url: String,
}

impl Endpoint {
    pub fn new(label: impl Into<String>, base_url: impl AsRef<str>) -> Self {
        Self {
            label: label.into(),
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, address: &str, port: &str) -> String {
        format!("{}/{}:{}", self.base_url, address, port)
    }
}
