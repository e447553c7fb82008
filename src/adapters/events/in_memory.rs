//! In-memory event bus.
//!
//! Captures every published envelope in order so tests and local tooling can
//! inspect what the handlers emitted. Nothing is delivered anywhere else.

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// Capturing in-process publisher.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// let handler = FreezeMembershipHandler::new(members, bus.clone());
/// handler.handle(cmd).await?;
/// assert!(bus.has_event("membership.frozen.v1"));
/// ```
#[derive(Default)]
pub struct InMemoryEventBus {
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// All published events, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Events whose aggregate is `aggregate_id` (a member id).
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .collect()
    }

    pub fn clear(&self) {
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.event_type == event_type)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let mut published = self.published.write().map_err(|_| {
            DomainError::new(ErrorCode::InternalError, "Event bus lock poisoned")
        })?;
        tracing::debug!(event_type = %event.event_type, aggregate_id = %event.aggregate_id, "event captured");
        published.push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EventId, Timestamp};
    use serde_json::json;

    fn envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope {
            event_id: EventId::new(),
            event_type: event_type.to_string(),
            schema_version: 1,
            aggregate_id: aggregate_id.to_string(),
            aggregate_type: "Member".to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({}),
            metadata: Default::default(),
        }
    }

    #[tokio::test]
    async fn captures_events_in_order() {
        let bus = InMemoryEventBus::new();

        bus.publish(envelope("membership.enrolled.v1", "m-1")).await.unwrap();
        bus.publish(envelope("membership.frozen.v1", "m-1")).await.unwrap();

        let types: Vec<_> = bus
            .published_events()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(types, vec!["membership.enrolled.v1", "membership.frozen.v1"]);
    }

    #[tokio::test]
    async fn filters_by_type_and_aggregate() {
        let bus = InMemoryEventBus::new();
        bus.publish_all(vec![
            envelope("membership.enrolled.v1", "m-1"),
            envelope("membership.enrolled.v1", "m-2"),
            envelope("membership.cancelled.v1", "m-1"),
        ])
        .await
        .unwrap();

        assert_eq!(bus.events_of_type("membership.enrolled.v1").len(), 2);
        assert_eq!(bus.events_for_aggregate("m-1").len(), 2);
        assert!(bus.has_event("membership.cancelled.v1"));
        assert!(!bus.has_event("membership.renewed.v1"));
    }

    #[tokio::test]
    async fn clear_resets_capture() {
        let bus = InMemoryEventBus::new();
        bus.publish(envelope("membership.enrolled.v1", "m-1")).await.unwrap();

        bus.clear();

        assert_eq!(bus.event_count(), 0);
    }
}
