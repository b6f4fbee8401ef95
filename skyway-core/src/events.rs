use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::{BoxError, CoreError, CoreResult};

/// A message announcing a committed state change to other services.
pub trait IntegrationEvent: Serialize + DeserializeOwned + Send + Sync {
    const TOPIC: &'static str;

    /// Partition key, normally the aggregate id.
    fn key(&self) -> String;
}

/// Wire wrapper around every integration event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub message_id: Uuid,
    pub topic: String,
    pub key: String,
    pub occurred_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    pub fn wrap<E: IntegrationEvent>(event: &E) -> Result<Self, serde_json::Error> {
        Ok(Self {
            message_id: Uuid::new_v4(),
            topic: E::TOPIC.to_string(),
            key: event.key(),
            occurred_at: Utc::now(),
            payload: serde_json::to_value(event)?,
        })
    }

    /// Decode the payload as `E`, or `None` if the envelope carries another topic.
    pub fn open<E: IntegrationEvent>(&self) -> Option<Result<E, serde_json::Error>> {
        (self.topic == E::TOPIC).then(|| serde_json::from_value(self.payload.clone()))
    }
}

/// Broker-facing side of event publication.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_message(&self, envelope: &EventEnvelope) -> Result<(), BoxError>;
}

/// Wrap `event` and hand it to `publisher`; broker failures become `Internal`.
pub async fn publish<E: IntegrationEvent>(
    publisher: &dyn EventPublisher,
    event: &E,
) -> CoreResult<EventEnvelope> {
    let envelope = EventEnvelope::wrap(event).map_err(CoreError::internal)?;
    publisher.publish_message(&envelope).await?;
    Ok(envelope)
}

/// Keeps published envelopes in memory.
///
/// Serves as the publisher when no broker is configured, and lets tests
/// assert on what a handler emitted.
#[derive(Debug, Default)]
pub struct InMemoryPublisher {
    published: Mutex<Vec<EventEnvelope>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<EventEnvelope> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }

    pub fn published_on(&self, topic: &str) -> Vec<EventEnvelope> {
        self.published()
            .into_iter()
            .filter(|envelope| envelope.topic == topic)
            .collect()
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish_message(&self, envelope: &EventEnvelope) -> Result<(), BoxError> {
        tracing::info!(
            "Published {} message {} (key {})",
            envelope.topic,
            envelope.message_id,
            envelope.key
        );
        self.published
            .lock()
            .map_err(|_| "publisher state poisoned")?
            .push(envelope.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct SeatReleased {
        flight_id: i64,
        seat_number: String,
    }

    impl IntegrationEvent for SeatReleased {
        const TOPIC: &'static str = "test.seat_released";
        fn key(&self) -> String {
            self.flight_id.to_string()
        }
    }

    struct Offline;

    #[async_trait]
    impl EventPublisher for Offline {
        async fn publish_message(&self, _envelope: &EventEnvelope) -> Result<(), BoxError> {
            Err("broker unavailable".into())
        }
    }

    #[tokio::test]
    async fn test_publish_records_envelope() {
        let publisher = InMemoryPublisher::new();
        let event = SeatReleased {
            flight_id: 7,
            seat_number: "12A".into(),
        };

        let envelope = publish(&publisher, &event).await.unwrap();

        assert_eq!(envelope.key, "7");
        assert_eq!(publisher.published_on("test.seat_released").len(), 1);
        let decoded: SeatReleased = envelope.open().unwrap().unwrap();
        assert_eq!(decoded, event);
    }

    #[tokio::test]
    async fn test_broker_failure_is_internal() {
        let event = SeatReleased {
            flight_id: 1,
            seat_number: "1C".into(),
        };
        let err = publish(&Offline, &event).await.unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[test]
    fn test_open_ignores_other_topics() {
        let envelope = EventEnvelope {
            message_id: Uuid::new_v4(),
            topic: "other".into(),
            key: "1".into(),
            occurred_at: Utc::now(),
            payload: serde_json::json!({}),
        };
        assert!(envelope.open::<SeatReleased>().is_none());
    }
}
