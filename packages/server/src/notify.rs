use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Push event sent to connected live-update subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    ArticleUpdated { id: Uuid, message: String },
    AttachmentAdded { id: Uuid, message: String },
}

impl LiveEvent {
    pub fn article_updated(id: Uuid) -> Self {
        Self::ArticleUpdated {
            id,
            message: "Article updated".into(),
        }
    }

    pub fn attachment_added(id: Uuid, originalname: &str) -> Self {
        Self::AttachmentAdded {
            id,
            message: format!("Attachment '{originalname}' added"),
        }
    }
}

/// Registry of connected live-update subscribers.
///
/// Delivery is best-effort and at-most-once: subscribers that are gone by
/// send time are skipped and evicted, nothing is queued or retried. A client
/// that misses an event converges on its next ordinary fetch.
#[derive(Default)]
pub struct Notifier {
    subscribers: DashMap<Uuid, mpsc::UnboundedSender<String>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber, returning its id and the receiving end.
    pub fn subscribe(&self) -> (Uuid, mpsc::UnboundedReceiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, tx);
        debug!(
            "live subscriber {id} connected ({} total)",
            self.subscribers.len()
        );
        (id, rx)
    }

    pub fn unsubscribe(&self, id: Uuid) {
        self.subscribers.remove(&id);
        debug!(
            "live subscriber {id} disconnected ({} total)",
            self.subscribers.len()
        );
    }

    /// Serialize `event` once and push it to every connected subscriber.
    /// Subscribers whose channel has closed are dropped from the registry.
    pub fn broadcast(&self, event: &LiveEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("failed to serialize live event: {e}");
                return;
            }
        };
        self.subscribers
            .retain(|_, tx| tx.send(payload.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
