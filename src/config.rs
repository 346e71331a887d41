use std::env;
use std::time::Duration;
use lazy_static::lazy_static;
use crate::models::status::Endpoint;

lazy_static! {
    static ref DEFAULT_ENDPOINTS: Vec<Endpoint> = vec![
        Endpoint::new("java", "https://api.mcsrvstat.us/3"),
        Endpoint::new("bedrock", "https://api.mcsrvstat.us/bedrock/3"),
    ];
}

/// Identity of the Minecraft server the widget advertises.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub address: String,
    pub port: String,
    pub max_players: u32,
}

impl ServerConfig {
    /// `address:port`, the string players paste into the client.
    pub fn full_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Golden SMP".to_string(),
            address: "play.golden-smp.xyz".to_string(),
            port: "25777".to_string(),
            max_players: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,

    // Poller tuning
    pub endpoints: Vec<Endpoint>,
    pub refresh_interval_secs: u64,
    pub cooldown_secs: u64,
    pub request_timeout_secs: u64,

    // Widget affordances
    pub copied_flag_secs: u64,
    pub toast_capacity: usize,

    // Local surface
    pub bind_address: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            endpoints: DEFAULT_ENDPOINTS.clone(),
            refresh_interval_secs: 30,
            cooldown_secs: 5,
            request_timeout_secs: 10,
            copied_flag_secs: 2,
            toast_capacity: 32,
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                name: env::var("SERVER_NAME").unwrap_or(defaults.server.name),
                address: env::var("SERVER_ADDRESS").unwrap_or(defaults.server.address),
                port: env::var("SERVER_PORT").unwrap_or(defaults.server.port),
                max_players: parse_var::<u32>("SERVER_MAX_PLAYERS")
                    .unwrap_or(defaults.server.max_players),
            },

            endpoints: env::var("STATUS_ENDPOINTS")
                .ok()
                .map(|raw| parse_endpoints(&raw))
                .filter(|endpoints| !endpoints.is_empty())
                .unwrap_or(defaults.endpoints),

            refresh_interval_secs: parse_var::<u64>("REFRESH_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.refresh_interval_secs),

            cooldown_secs: parse_var::<u64>("COOLDOWN_SECS")
                .unwrap_or(defaults.cooldown_secs),

            request_timeout_secs: parse_var::<u64>("REQUEST_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.request_timeout_secs),

            copied_flag_secs: parse_var::<u64>("COPIED_FLAG_SECS")
                .unwrap_or(defaults.copied_flag_secs),

            toast_capacity: parse_var::<usize>("TOAST_CAPACITY")
                .filter(|cap| *cap > 0)
                .unwrap_or(defaults.toast_capacity),

            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),

            port: parse_var::<u16>("PORT").unwrap_or(defaults.port),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn cooldown_window(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn copied_flag_window(&self) -> Duration {
        Duration::from_secs(self.copied_flag_secs)
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Parses an ordered `label=url,label=url` list. Entries without a label
/// are named after their position.
pub fn parse_endpoints(raw: &str) -> Vec<Endpoint> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .filter_map(|(i, entry)| {
            let (label, url) = match entry.split_once('=') {
                Some((label, url)) => (label.trim().to_string(), url.trim()),
                None => (format!("endpoint-{}", i + 1), entry),
            };
            if url.is_empty() {
                return None;
            }
            Some(Endpoint::new(label, url))
        })
        .collect()
}
