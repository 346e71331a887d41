// src/poller/scheduler.rs
use std::sync::Arc;
use std::time::Duration;
use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use crate::models::status::PollTrigger;
use super::StatusPoller;

/// Recurring `poll(Auto)` timer. Fires once immediately, then every
/// `interval`; ticks that land while a poll is in flight are skipped.
pub struct AutoRefresh {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutoRefresh {
    pub fn start(poller: Arc<StatusPoller>, interval: Duration) -> Self {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        info!("Starting auto refresh every {}s", interval.as_secs());

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Auto refresh cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        // Polls run detached so cancelling the timer never cuts one short.
                        let poller = poller.clone();
                        tokio::spawn(async move {
                            if let Err(e) = poller.poll(PollTrigger::Auto).await {
                                debug!("Auto refresh tick skipped: {}", e);
                            }
                        });
                    }
                }
            }
        });

        Self { cancel_token, handle }
    }

    pub fn stop(&self) {
        info!("Stopping auto refresh");
        self.cancel_token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::notify::ToastFeed;
    use crate::poller::tests::{test_config, ScriptedFetcher};

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_at_start_and_on_interval() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            ("/bedrock/", Ok(json!({ "online": true }))),
        ]));
        let poller = Arc::new(StatusPoller::new(
            &test_config(),
            fetcher.clone(),
            Arc::new(ToastFeed::new(8)),
        ));

        let refresh = AutoRefresh::start(poller.clone(), Duration::from_secs(30));
        settle().await;
        assert_eq!(fetcher.calls(), 1);
        assert!(poller.current().online);

        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(fetcher.calls(), 2);

        refresh.stop();
        settle().await;
        assert!(refresh.is_finished());

        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_poll_skips_ticks_without_backlog() {
        let fetcher = Arc::new(
            ScriptedFetcher::new(vec![("/bedrock/", Ok(json!({ "online": true })))])
                .with_latency(Duration::from_secs(45)),
        );
        let poller = Arc::new(StatusPoller::new(
            &test_config(),
            fetcher.clone(),
            Arc::new(ToastFeed::new(8)),
        ));

        let _refresh = AutoRefresh::start(poller.clone(), Duration::from_secs(30));
        settle().await;
        assert_eq!(fetcher.calls(), 1);

        // The 30s tick lands mid-poll and must not issue a second request.
        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(fetcher.calls(), 1);
        assert!(poller.state().is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let fetcher = Arc::new(ScriptedFetcher::new(vec![
            ("/bedrock/", Ok(json!({ "online": true }))),
        ]));
        let poller = Arc::new(StatusPoller::new(
            &test_config(),
            fetcher.clone(),
            Arc::new(ToastFeed::new(8)),
        ));

        drop(AutoRefresh::start(poller, Duration::from_secs(30)));
        settle().await;
        tokio::time::advance(Duration::from_secs(90)).await;
        settle().await;
        assert!(fetcher.calls() <= 1);
    }
}
