// src/notify.rs
use std::collections::VecDeque;
use log::{info, warn};
use parking_lot::Mutex;
use crate::models::notification::{Notification, Severity};

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Bounded toast buffer the page drains. Every toast is also logged.
pub struct ToastFeed {
    pending: Mutex<VecDeque<Notification>>,
    capacity: usize,
}

impl ToastFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    pub fn drain(&self) -> Vec<Notification> {
        self.pending.lock().drain(..).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }
}

impl Notifier for ToastFeed {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Destructive => warn!("{}: {}", notification.title, notification.description),
            _ => info!("{}: {}", notification.title, notification.description),
        }

        let mut pending = self.pending.lock();
        if pending.len() >= self.capacity {
            pending.pop_front();
        }
        pending.push_back(notification);
    }
}
