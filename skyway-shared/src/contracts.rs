//! Integration events exchanged between services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyway_core::IntegrationEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightCreated {
    pub id: i64,
    pub flight_number: String,
    pub price: f64,
    pub flight_status: String,
    pub flight_date: DateTime<Utc>,
    pub departure_date: DateTime<Utc>,
    pub departure_airport_id: i64,
    pub aircraft_id: i64,
    pub arrive_date: DateTime<Utc>,
    pub arrive_airport_id: i64,
    pub duration_minutes: i32,
}

impl IntegrationEvent for FlightCreated {
    const TOPIC: &'static str = "flight.created";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreated {
    pub id: i64,
    pub name: String,
    pub passport_number: String,
}

impl IntegrationEvent for UserCreated {
    const TOPIC: &'static str = "identity.user_created";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyway_core::EventEnvelope;

    #[test]
    fn test_user_created_wire_format() {
        let event = UserCreated {
            id: 3,
            name: "Ada".into(),
            passport_number: "X1234567".into(),
        };
        let envelope = EventEnvelope::wrap(&event).unwrap();
        assert_eq!(envelope.topic, "identity.user_created");
        assert_eq!(envelope.payload["passportNumber"], "X1234567");
    }
}
