// src/poller/normalize.rs
use serde_json::Value;

/// Fields pulled out of one status API response. `None` from [`normalize`]
/// means the body could not tell us whether the server is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedStatus {
    pub online: bool,
    pub player_count: u32,
    pub max_players: Option<u32>,
    pub version: Option<String>,
    pub motd: Option<String>,
}

pub fn normalize(body: &Value) -> Option<NormalizedStatus> {
    let online = online_flag(body)?;

    let player_count = first_count(body, &[&["players", "online"], &["players_online"], &["online_players"]])
        .unwrap_or(0);
    let max_players = first_count(body, &[&["players", "max"], &["players_max"], &["max_players"]]);

    Some(NormalizedStatus {
        online,
        player_count,
        max_players,
        version: version(body),
        motd: motd(body),
    })
}

fn online_flag(body: &Value) -> Option<bool> {
    if let Some(online) = body.get("online").and_then(Value::as_bool) {
        return Some(online);
    }

    match body.get("status").and_then(Value::as_str) {
        Some(s) if s.eq_ignore_ascii_case("online") => Some(true),
        Some(s) if s.eq_ignore_ascii_case("offline") => Some(false),
        _ => None,
    }
}

fn lookup<'a>(body: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(body, |node, key| node.get(key))
}

fn first_count(body: &Value, paths: &[&[&str]]) -> Option<u32> {
    paths
        .iter()
        .find_map(|path| lookup(body, path).filter(|v| !v.is_null()))
        .map(|v| v.as_u64().map(|n| u32::try_from(n).unwrap_or(u32::MAX)).unwrap_or(0))
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn text_or_first_line(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => non_empty(s),
        Value::Array(lines) => lines.first().and_then(Value::as_str).and_then(non_empty),
        _ => None,
    }
}

fn version(body: &Value) -> Option<String> {
    if let Some(v) = body.get("version").and_then(Value::as_str) {
        return non_empty(v);
    }
    lookup(body, &["version", "name"])
        .or_else(|| lookup(body, &["protocol", "name"]))
        .and_then(Value::as_str)
        .and_then(non_empty)
}

fn motd(body: &Value) -> Option<String> {
    let candidates = [
        lookup(body, &["motd", "clean"]),
        lookup(body, &["motd", "raw"]),
        body.get("motd"),
        body.get("description"),
        lookup(body, &["description", "text"]),
    ];

    candidates.into_iter().flatten().find_map(text_or_first_line)
}
