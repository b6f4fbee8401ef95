use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Message};
use skyway_core::{CoreError, CoreResult, EventEnvelope};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

const INITIAL_BACKOFF: Duration = Duration::from_millis(200);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Subscribes to integration topics and feeds decoded envelopes to a handler.
///
/// Offsets are stored only once a message is settled, so a message whose
/// handler keeps failing with an internal error is never committed past.
pub struct EventConsumer {
    consumer: StreamConsumer,
}

impl EventConsumer {
    pub fn new(brokers: &str, group_id: &str, topics: &[&str]) -> Result<Self, rdkafka::error::KafkaError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set("enable.auto.offset.store", "false")
            .set("auto.offset.reset", "earliest")
            .create()?;

        consumer.subscribe(topics)?;
        info!("Consumer {} subscribed to {:?}", group_id, topics);
        Ok(Self { consumer })
    }

    /// Receive forever.
    ///
    /// Internal handler failures are retried with backoff until they succeed.
    /// Unreadable payloads and any other handler failure are logged and the
    /// message is skipped, since redelivery would fail the same way.
    pub async fn run<F, Fut>(self, handler: F)
    where
        F: Fn(EventEnvelope) -> Fut,
        Fut: Future<Output = CoreResult<()>>,
    {
        loop {
            let message = match self.consumer.recv().await {
                Ok(m) => m,
                Err(e) => {
                    error!("Kafka error: {}", e);
                    continue;
                }
            };

            match read(&message) {
                Ok(envelope) => deliver(&handler, envelope, INITIAL_BACKOFF).await,
                Err(e) => error!("Skipping unreadable message on {}: {}", message.topic(), e),
            }

            if let Err(e) = self.consumer.store_offset_from_message(&message) {
                error!("Failed to store offset on {}: {}", message.topic(), e);
            }
        }
    }
}

fn read(message: &BorrowedMessage<'_>) -> Result<EventEnvelope, String> {
    match message.payload_view::<str>() {
        None => Err("empty payload".to_string()),
        Some(payload) => payload.map_err(|e| e.to_string()).and_then(decode),
    }
}

fn decode(payload: &str) -> Result<EventEnvelope, String> {
    serde_json::from_str(payload).map_err(|e| e.to_string())
}

/// Only internal failures can succeed on a later attempt.
fn is_transient(error: &CoreError) -> bool {
    matches!(error, CoreError::Internal(_))
}

/// Hand `envelope` to `handler` until it settles.
async fn deliver<F, Fut>(handler: &F, envelope: EventEnvelope, initial_backoff: Duration)
where
    F: Fn(EventEnvelope) -> Fut,
    Fut: Future<Output = CoreResult<()>>,
{
    let message_id = envelope.message_id;
    let mut backoff = initial_backoff;
    loop {
        match handler(envelope.clone()).await {
            Ok(()) => return,
            Err(e) if is_transient(&e) => {
                warn!("Message {} failed, retrying in {:?}: {}", message_id, backoff, e);
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
            Err(e) => {
                error!("Dropping message {}: {}", message_id, e);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyway_shared::contracts::UserCreated;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn envelope() -> EventEnvelope {
        EventEnvelope::wrap(&UserCreated {
            id: 4,
            name: "Ada Lovelace".into(),
            passport_number: "P1234567".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_decode_reads_published_envelope() {
        let envelope = envelope();
        let wire = serde_json::to_string(&envelope).unwrap();

        let decoded = decode(&wire).unwrap();

        assert_eq!(decoded, envelope);
        assert!(decode("{\"not\":\"an envelope\"}").is_err());
    }

    #[tokio::test]
    async fn test_internal_failures_are_retried_until_handled() {
        let attempts = AtomicUsize::new(0);
        let handler = |_: EventEnvelope| {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(CoreError::internal("database timed out"))
                } else {
                    Ok(())
                }
            }
        };

        deliver(&handler, envelope(), Duration::from_millis(1)).await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_failures_are_not_retried() {
        let attempts = AtomicUsize::new(0);
        let handler = |_: EventEnvelope| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(CoreError::invalid("payload", "missing id")) }
        };

        deliver(&handler, envelope(), Duration::from_millis(1)).await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
