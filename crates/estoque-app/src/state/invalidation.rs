//! # View Invalidation
//!
//! Tells the presentation layer which views hold stale data after a write.
//!
//! ```text
//! upsert_sale commits
//!      │
//!      ▼
//! publish(Products) ──► subscriber: refetch product list (stock changed)
//! publish(Sales)    ──► subscriber: refetch sale list
//! ```
//!
//! Events are only published after a commit. A failed write publishes
//! nothing.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Default channel capacity. Lagging subscribers drop the oldest events.
const DEFAULT_CAPACITY: usize = 64;

/// A view whose data may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewTag {
    Products,
    Sales,
}

impl ViewTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewTag::Products => "products",
            ViewTag::Sales => "sales",
        }
    }
}

impl std::fmt::Display for ViewTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broadcasts [`ViewTag`]s to every subscriber.
///
/// Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct ViewInvalidator {
    sender: broadcast::Sender<ViewTag>,
}

impl Default for ViewInvalidator {
    fn default() -> Self {
        ViewInvalidator::new(DEFAULT_CAPACITY)
    }
}

impl ViewInvalidator {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        ViewInvalidator { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewTag> {
        self.sender.subscribe()
    }

    /// Publishes one invalidation. Returns how many subscribers got it.
    pub fn publish(&self, tag: ViewTag) -> usize {
        match self.sender.send(tag) {
            Ok(receivers) => {
                debug!(view = %tag, receivers, "View invalidated");
                receivers
            }
            Err(_) => {
                debug!(view = %tag, "View invalidated with no subscribers");
                0
            }
        }
    }

    /// Publishes several invalidations, in order.
    pub fn publish_all(&self, tags: &[ViewTag]) {
        for tag in tags {
            self.publish(*tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let views = ViewInvalidator::default();
        let mut first = views.subscribe();
        let mut second = views.subscribe();

        views.publish_all(&[ViewTag::Products, ViewTag::Sales]);

        for rx in [&mut first, &mut second] {
            assert_eq!(rx.recv().await.unwrap(), ViewTag::Products);
            assert_eq!(rx.recv().await.unwrap(), ViewTag::Sales);
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let views = ViewInvalidator::new(4);
        assert_eq!(views.publish(ViewTag::Sales), 0);

        let _rx = views.subscribe();
        assert_eq!(views.publish(ViewTag::Sales), 1);
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(ViewTag::Products.to_string(), "products");
        assert_eq!(serde_json::to_string(&ViewTag::Sales).unwrap(), "\"sales\"");
    }
}
