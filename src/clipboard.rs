// src/clipboard.rs
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use dashmap::DashMap;
use log::{debug, warn};
use serde::Serialize;
use tokio::time::Instant;
use crate::config::ServerConfig;
use crate::models::notification::Notification;
use crate::notify::Notifier;
use crate::utils::StatusError;

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// Platform clipboard. A fresh handle per write keeps nothing platform
/// specific alive between copies.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        arboard::Clipboard::new()
            .and_then(|mut cb| cb.set_text(text.to_string()))
            .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyField {
    Address,
    Port,
    Full,
}

impl CopyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Port => "port",
            Self::Full => "full",
        }
    }
}

impl FromStr for CopyField {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "address" => Ok(Self::Address),
            "port" => Ok(Self::Port),
            "full" => Ok(Self::Full),
            other => Err(StatusError::UnknownCopyField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopiedFlags {
    pub address: bool,
    pub port: bool,
    pub full: bool,
}

pub struct ClipboardCopyHelper {
    server: ServerConfig,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    flag_window: Duration,
    copied_at: DashMap<CopyField, Instant>,
}

impl ClipboardCopyHelper {
    pub fn new(
        server: ServerConfig,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
        flag_window: Duration,
    ) -> Self {
        Self {
            server,
            clipboard,
            notifier,
            flag_window,
            copied_at: DashMap::new(),
        }
    }

    pub fn text_for(&self, field: CopyField) -> String {
        match field {
            CopyField::Address => self.server.address.clone(),
            CopyField::Port => self.server.port.clone(),
            CopyField::Full => self.server.full_address(),
        }
    }

    pub fn copy(&self, field: CopyField) -> Result<String, StatusError> {
        let text = self.text_for(field);

        match self.clipboard.write_text(&text) {
            Ok(()) => {
                debug!("Copied {} to clipboard: {}", field.as_str(), text);
                self.copied_at.insert(field, Instant::now());
                self.notifier.notify(Notification::success(
                    "Server Address Copied!",
                    "The server address has been copied to your clipboard.",
                ));
                Ok(text)
            }
            Err(e) => {
                warn!("Clipboard write failed for {}: {}", field.as_str(), e);
                self.notifier.notify(Notification::destructive(
                    "Failed to copy",
                    "Could not copy server address to clipboard.",
                ));
                Err(StatusError::ClipboardDenied(e))
            }
        }
    }

    /// True for `flag_window` after a successful copy of `field`.
    pub fn is_copied(&self, field: CopyField) -> bool {
        self.copied_at
            .get(&field)
            .map(|at| at.elapsed() < self.flag_window)
            .unwrap_or(false)
    }

    pub fn flags(&self) -> CopiedFlags {
        CopiedFlags {
            address: self.is_copied(CopyField::Address),
            port: self.is_copied(CopyField::Port),
            full: self.is_copied(CopyField::Full),
        }
    }

    /// Drops expired entries so the map only holds live flags.
    pub fn clear_expired(&self) {
        self.copied_at.retain(|_, at| at.elapsed() < self.flag_window);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use crate::models::notification::Severity;
    use crate::notify::ToastFeed;

    #[derive(Default)]
    pub(crate) struct MemoryClipboard {
        pub(crate) contents: Mutex<Option<String>>,
        pub(crate) deny: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&self, text: &str) -> Result<(), String> {
            if self.deny {
                return Err("permission denied".to_string());
            }
            *self.contents.lock() = Some(text.to_string());
            Ok(())
        }
    }

    fn server() -> ServerConfig {
        ServerConfig {
            name: "Example".to_string(),
            address: "play.example.test".to_string(),
            port: "19132".to_string(),
            max_players: 20,
        }
    }

    fn helper(clipboard: Arc<MemoryClipboard>) -> (ClipboardCopyHelper, Arc<ToastFeed>) {
        let toasts = Arc::new(ToastFeed::new(8));
        let helper = ClipboardCopyHelper::new(server(), clipboard, toasts.clone(), Duration::from_secs(2));
        (helper, toasts)
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_full_address_and_flag_reverts() {
        let clipboard = Arc::new(MemoryClipboard::default());
        let (helper, toasts) = helper(clipboard.clone());

        let copied = helper.copy(CopyField::Full).unwrap();
        assert_eq!(copied, "play.example.test:19132");
        assert_eq!(clipboard.contents.lock().as_deref(), Some("play.example.test:19132"));
        assert!(helper.is_copied(CopyField::Full));
        assert!(!helper.is_copied(CopyField::Address));
        assert_eq!(toasts.drain()[0].severity, Severity::Success);

        tokio::time::advance(Duration::from_millis(1_900)).await;
        assert!(helper.flags().full);

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!helper.flags().full);

        helper.clear_expired();
        assert!(helper.copied_at.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_fields_individually() {
        let clipboard = Arc::new(MemoryClipboard::default());
        let (helper, _) = helper(clipboard.clone());

        helper.copy(CopyField::Port).unwrap();
        assert_eq!(clipboard.contents.lock().as_deref(), Some("19132"));
        helper.copy(CopyField::Address).unwrap();
        assert_eq!(clipboard.contents.lock().as_deref(), Some("play.example.test"));
        assert_eq!(
            helper.flags(),
            CopiedFlags { address: true, port: true, full: false }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_clipboard_is_reported() {
        let clipboard = Arc::new(MemoryClipboard { deny: true, ..Default::default() });
        let (helper, toasts) = helper(clipboard);

        let err = helper.copy(CopyField::Full).unwrap_err();
        assert!(matches!(err, StatusError::ClipboardDenied(_)));
        assert!(!helper.is_copied(CopyField::Full));

        let toasts = toasts.drain();
        assert_eq!(toasts[0].title, "Failed to copy");
        assert_eq!(toasts[0].severity, Severity::Destructive);
    }

    #[test]
    fn test_copy_field_from_str() {
        assert_eq!("ADDRESS".parse::<CopyField>().unwrap(), CopyField::Address);
        assert_eq!("full".parse::<CopyField>().unwrap(), CopyField::Full);
        assert!(matches!(
            "motd".parse::<CopyField>(),
            Err(StatusError::UnknownCopyField(_))
        ));
    }
}
