use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::{Notification, NotificationError};

/// Transport that hands notifications to users (websocket, mail, push, ...)
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Writes every notification to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn deliver(&self, notification: Notification) -> Result<(), NotificationError> {
        info!(
            recipient = ?notification.recipient,
            target = ?notification.target,
            "{}: {}",
            notification.title,
            notification.text
        );
        Ok(())
    }
}

/// Discards notifications; used when notifications are disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    async fn deliver(&self, _notification: Notification) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// Keeps delivered notifications in memory for inspection
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    delivered: Arc<Mutex<Vec<Notification>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.delivered.lock().await.clear();
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn deliver(&self, notification: Notification) -> Result<(), NotificationError> {
        self.delivered.lock().await.push(notification);
        Ok(())
    }
}
