//! Reactions to integration events published by other services.

use skyway_core::{CoreError, CoreResult, EventEnvelope, Mediator};
use skyway_shared::contracts::UserCreated;

use crate::features::CreatePassenger;

/// Topics this service subscribes to.
pub const TOPICS: &[&str] = &[<UserCreated as skyway_core::IntegrationEvent>::TOPIC];

/// Route one consumed envelope.
///
/// Delivery is at-least-once, so a passenger that already exists for the
/// user is treated as a redelivery and acknowledged.
pub async fn handle_envelope(mediator: &Mediator, envelope: &EventEnvelope) -> CoreResult<()> {
    let Some(decoded) = envelope.open::<UserCreated>() else {
        tracing::debug!("Ignoring message {} on {}", envelope.message_id, envelope.topic);
        return Ok(());
    };
    // A payload that does not decode never will, so it is not retried.
    let user = decoded.map_err(|e| CoreError::invalid("payload", e.to_string()))?;

    let request = CreatePassenger {
        user_id: Some(user.id),
        name: Some(user.name),
        passport_number: Some(user.passport_number),
        age: None,
        passenger_type: None,
    };
    match mediator.send(request).await {
        Ok(passenger) => {
            tracing::info!("Passenger {} created from user {}", passenger.id, user.id);
            Ok(())
        }
        Err(CoreError::Conflict(_)) => {
            tracing::info!(
                "Skipping redelivered message {}: passenger for user {} exists",
                envelope.message_id,
                user.id
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Harness;
    use skyway_core::InMemoryPublisher;
    use skyway_shared::contracts::FlightCreated;

    fn user_created(id: i64) -> EventEnvelope {
        EventEnvelope::wrap(&UserCreated {
            id,
            name: "Ada Lovelace".into(),
            passport_number: "P1234567".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_user_created_creates_one_passenger_even_when_redelivered() {
        let harness = Harness::new();
        let envelope = user_created(12);

        handle_envelope(&harness.mediator, &envelope).await.unwrap();
        handle_envelope(&harness.mediator, &envelope).await.unwrap();

        assert_eq!(harness.repository.count().await, 1);
    }

    #[tokio::test]
    async fn test_other_topics_are_ignored() {
        let harness = Harness::new();
        let publisher = InMemoryPublisher::new();
        let flight = FlightCreated {
            id: 1,
            flight_number: "SK100".into(),
            price: 100.0,
            flight_status: "FLYING".into(),
            flight_date: chrono::Utc::now(),
            departure_date: chrono::Utc::now(),
            departure_airport_id: 1,
            aircraft_id: 1,
            arrive_date: chrono::Utc::now(),
            arrive_airport_id: 2,
            duration_minutes: 60,
        };
        let envelope = skyway_core::publish(&publisher, &flight).await.unwrap();

        handle_envelope(&harness.mediator, &envelope).await.unwrap();

        assert_eq!(harness.repository.count().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_permanent_failure() {
        let harness = Harness::new();
        let mut envelope = user_created(1);
        envelope.payload = serde_json::json!({ "id": "not-a-number" });

        let err = handle_envelope(&harness.mediator, &envelope).await.unwrap_err();

        assert!(matches!(err, CoreError::ValidationFailed(_)));
        assert_eq!(harness.repository.count().await, 0);
    }
}
