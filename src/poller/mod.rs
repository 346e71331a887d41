// src/poller/mod.rs
pub mod fetcher;
pub mod normalize;
pub mod scheduler;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;
use crate::config::Config;
use crate::models::notification::Notification;
use crate::models::status::{Endpoint, PollTrigger, PollerState, StatusRecord};
use crate::notify::Notifier;
use crate::utils::{ceil_secs, StatusError};
use self::fetcher::StatusFetcher;
use self::normalize::{normalize, NormalizedStatus};

#[derive(Default)]
struct ManualRefresh {
    last_at: Option<Instant>,
    last_at_wall: Option<DateTime<Utc>>,
}

/// Clears the in-flight flag however the poll ends, including panics and
/// dropped futures.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct StatusPoller {
    address: String,
    port: String,
    default_max_players: u32,
    endpoints: Vec<Endpoint>,
    cooldown_window: Duration,

    fetcher: Arc<dyn StatusFetcher>,
    notifier: Arc<dyn Notifier>,

    record: RwLock<StatusRecord>,
    in_flight: AtomicBool,
    active: AtomicBool,
    manual: Mutex<ManualRefresh>,
}

impl StatusPoller {
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn StatusFetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            address: config.server.address.clone(),
            port: config.server.port.clone(),
            default_max_players: config.server.max_players,
            endpoints: config.endpoints.clone(),
            cooldown_window: config.cooldown_window(),
            fetcher,
            notifier,
            record: RwLock::new(StatusRecord::initial(config.server.max_players)),
            in_flight: AtomicBool::new(false),
            active: AtomicBool::new(true),
            manual: Mutex::new(ManualRefresh::default()),
        }
    }

    pub fn current(&self) -> StatusRecord {
        self.record.read().clone()
    }

    pub fn state(&self) -> PollerState {
        let manual = self.manual.lock();
        PollerState {
            is_loading: self.in_flight.load(Ordering::Acquire),
            cooldown_remaining_seconds: self.cooldown_remaining(&manual).map(ceil_secs).unwrap_or(0),
            last_manual_refresh_at: manual.last_at_wall,
        }
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::Release);
    }

    /// Later completions are discarded; a poll already in flight is left to finish.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn cooldown_remaining(&self, manual: &ManualRefresh) -> Option<Duration> {
        let last = manual.last_at?;
        let remaining = self.cooldown_window.saturating_sub(last.elapsed());
        (!remaining.is_zero()).then_some(remaining)
    }

    fn begin_manual(&self) -> Result<InFlightGuard<'_>, StatusError> {
        let mut manual = self.manual.lock();

        if let Some(remaining) = self.cooldown_remaining(&manual) {
            let remaining_secs = ceil_secs(remaining);
            drop(manual);
            debug!("Manual refresh rejected, {}s of cooldown left", remaining_secs);
            self.notifier.notify(Notification::info(
                "Please wait",
                format!("You can refresh again in {} seconds.", remaining_secs),
            ));
            return Err(StatusError::CooldownActive { remaining_secs });
        }

        let guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            debug!("Manual refresh rejected, a poll is already in flight");
            StatusError::PollInFlight
        })?;

        manual.last_at = Some(Instant::now());
        manual.last_at_wall = Some(Utc::now());
        Ok(guard)
    }

    fn begin_auto(&self) -> Result<InFlightGuard<'_>, StatusError> {
        InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            debug!("Auto refresh skipped, a poll is already in flight");
            StatusError::PollInFlight
        })
    }

    /// Runs one poll. Only rejected triggers return `Err`, including any
    /// trigger after deactivation; an accepted poll
    /// always yields a record, offline if no endpoint answered usefully.
    pub async fn poll(&self, trigger: PollTrigger) -> Result<StatusRecord, StatusError> {
        if !self.is_active() {
            debug!("Widget inactive, rejecting {} poll", trigger.as_str());
            return Err(StatusError::WidgetInactive);
        }

        let _guard = match trigger {
            PollTrigger::Manual => self.begin_manual()?,
            PollTrigger::Auto => self.begin_auto()?,
        };

        debug!("Starting {} poll for {}:{}", trigger.as_str(), self.address, self.port);

        let accepted = self.query_endpoints().await;
        let now = Utc::now();

        let record = match &accepted {
            Some((status, rtt)) => self.build_record(status, *rtt, now),
            None => StatusRecord::offline(self.default_max_players, now),
        };

        if !self.is_active() {
            debug!("Widget inactive, discarding {} poll result", trigger.as_str());
            return Ok(record);
        }

        *self.record.write() = record.clone();

        if accepted.is_none() {
            error!("All {} status endpoints failed for {}:{}", self.endpoints.len(), self.address, self.port);
            self.notifier.notify(Notification::destructive(
                "Connection failed",
                "Could not reach the server status service. Showing the server as offline.",
            ));
        } else if trigger == PollTrigger::Manual {
            self.notifier.notify(Notification::success("Status refreshed", record.summary()));
        }

        info!("{} ({} poll)", record.summary(), trigger.as_str());
        Ok(record)
    }

    async fn query_endpoints(&self) -> Option<(NormalizedStatus, Duration)> {
        for endpoint in &self.endpoints {
            let url = endpoint.url_for(&self.address, &self.port);
            let dispatched = Instant::now();

            match self.fetcher.fetch(&url).await {
                Ok(body) => {
                    let rtt = dispatched.elapsed();
                    match normalize(&body) {
                        Some(status) => {
                            debug!("Accepted {} endpoint after {}ms", endpoint.label, rtt.as_millis());
                            return Some((status, rtt));
                        }
                        None => warn!("{} endpoint returned a body without an online flag", endpoint.label),
                    }
                }
                Err(e) => warn!("{} endpoint failed: {}", endpoint.label, e),
            }
        }
        None
    }

    fn build_record(&self, status: &NormalizedStatus, rtt: Duration, now: DateTime<Utc>) -> StatusRecord {
        StatusRecord {
            online: status.online,
            player_count: status.player_count,
            max_players: status.max_players.unwrap_or(self.default_max_players),
            version: status.version.clone(),
            motd: status.motd.clone(),
            ping_ms: status
                .online
                .then(|| u64::try_from(rtt.as_millis()).unwrap_or(u64::MAX)),
            last_updated: Some(now),
        }
    }
}
