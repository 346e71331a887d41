// src/widget.rs
use std::sync::Arc;
use std::time::Duration;
use log::{info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use crate::clipboard::{ClipboardCopyHelper, CopiedFlags, CopyField};
use crate::config::{Config, ServerConfig};
use crate::models::notification::Notification;
use crate::models::status::{PollTrigger, PollerState, StatusRecord};
use crate::notify::ToastFeed;
use crate::poller::scheduler::AutoRefresh;
use crate::poller::StatusPoller;
use crate::utils::StatusError;

#[derive(Debug, Clone, Serialize)]
pub struct ServerIdentity {
    pub name: String,
    pub address: String,
    pub port: String,
}

impl From<&ServerConfig> for ServerIdentity {
    fn from(server: &ServerConfig) -> Self {
        Self {
            name: server.name.clone(),
            address: server.address.clone(),
            port: server.port.clone(),
        }
    }
}

/// Everything the page needs to render the status card.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetView {
    pub server: ServerIdentity,
    pub record: StatusRecord,
    pub state: PollerState,
    pub copied: CopiedFlags,
}

pub struct StatusWidget {
    server: ServerConfig,
    refresh_interval: Duration,
    poller: Arc<StatusPoller>,
    clipboard: ClipboardCopyHelper,
    toasts: Arc<ToastFeed>,
    auto_refresh: Mutex<Option<AutoRefresh>>,
}

impl StatusWidget {
    pub fn new(
        config: &Config,
        poller: Arc<StatusPoller>,
        clipboard: ClipboardCopyHelper,
        toasts: Arc<ToastFeed>,
    ) -> Self {
        Self {
            server: config.server.clone(),
            refresh_interval: config.refresh_interval(),
            poller,
            clipboard,
            toasts,
            auto_refresh: Mutex::new(None),
        }
    }

    /// Activates the poller and starts the auto refresh timer. Mounting an
    /// already mounted widget is a no-op.
    pub fn mount(&self) {
        let mut auto_refresh = self.auto_refresh.lock();
        if auto_refresh.is_some() {
            return;
        }
        info!("Mounting status widget for {}", self.server.full_address());
        self.poller.activate();
        *auto_refresh = Some(AutoRefresh::start(self.poller.clone(), self.refresh_interval));
    }

    pub fn unmount(&self) {
        if let Some(auto_refresh) = self.auto_refresh.lock().take() {
            info!("Unmounting status widget for {}", self.server.full_address());
            if auto_refresh.is_finished() {
                warn!("Auto refresh task had already exited before unmount");
            }
            auto_refresh.stop();
            self.poller.deactivate();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.auto_refresh.lock().is_some()
    }

    pub async fn refresh(&self) -> Result<StatusRecord, StatusError> {
        self.poller.poll(PollTrigger::Manual).await
    }

    pub fn copy(&self, field: CopyField) -> Result<String, StatusError> {
        self.clipboard.copy(field)
    }

    pub fn drain_toasts(&self) -> Vec<Notification> {
        self.toasts.drain()
    }

    pub fn view(&self) -> WidgetView {
        self.clipboard.clear_expired();
        WidgetView {
            server: ServerIdentity::from(&self.server),
            record: self.poller.current(),
            state: self.poller.state(),
            copied: self.clipboard.flags(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use crate::clipboard::tests::MemoryClipboard;
    use crate::poller::tests::{test_config, ScriptedFetcher};

    pub(crate) fn test_widget(fetcher: Arc<ScriptedFetcher>) -> StatusWidget {
        let config = test_config();
        let toasts = Arc::new(ToastFeed::new(config.toast_capacity));
        let poller = Arc::new(StatusPoller::new(&config, fetcher, toasts.clone()));
        let clipboard = ClipboardCopyHelper::new(
            config.server.clone(),
            Arc::new(MemoryClipboard::default()),
            toasts.clone(),
            config.copied_flag_window(),
        );
        StatusWidget::new(&config, poller, clipboard, toasts)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_polls_and_unmount_stops() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            ("/bedrock/", Ok(json!({ "online": true, "players": { "online": 4, "max": 20 } }))),
        ]));
        let widget = test_widget(fetcher.clone());

        let initial = widget.view();
        assert!(!initial.record.online);
        assert_eq!(initial.record.max_players, 50);
        assert_eq!(initial.server.address, "play.example.test");

        widget.mount();
        widget.mount();
        settle().await;
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(widget.view().record.player_count, 4);

        widget.unmount();
        assert!(!widget.is_mounted());
        tokio::time::advance(Duration::from_secs(300)).await;
        settle().await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_reports_cooldown_and_copied_flags() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            ("/bedrock/", Ok(json!({ "online": true }))),
        ]));
        let widget = test_widget(fetcher);

        widget.refresh().await.unwrap();
        widget.copy(CopyField::Full).unwrap();

        let view = widget.view();
        assert_eq!(view.state.cooldown_remaining_seconds, 5);
        assert!(view.state.last_manual_refresh_at.is_some());
        assert!(view.copied.full);

        let titles: Vec<_> = widget.drain_toasts().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Status refreshed", "Server Address Copied!"]);
    }
}
