use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyway_shared::contracts::FlightCreated;
use std::fmt;
use std::str::FromStr;

/// Operational status of a flight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Unknown,
    Flying,
    Delay,
    Canceled,
    Completed,
}

impl FlightStatus {
    pub const NAMES: &'static [&'static str] = &["UNKNOWN", "FLYING", "DELAY", "CANCELED", "COMPLETED"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Unknown => "UNKNOWN",
            FlightStatus::Flying => "FLYING",
            FlightStatus::Delay => "DELAY",
            FlightStatus::Canceled => "CANCELED",
            FlightStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNKNOWN" => Ok(FlightStatus::Unknown),
            "FLYING" => Ok(FlightStatus::Flying),
            "DELAY" => Ok(FlightStatus::Delay),
            "CANCELED" => Ok(FlightStatus::Canceled),
            "COMPLETED" => Ok(FlightStatus::Completed),
            other => Err(format!("unknown flight status: {other}")),
        }
    }
}

/// A stored flight
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub id: i64,
    pub flight_number: String,
    pub price: f64,
    pub flight_status: FlightStatus,
    pub flight_date: DateTime<Utc>,
    pub departure_date: DateTime<Utc>,
    pub departure_airport_id: i64,
    pub aircraft_id: i64,
    pub arrive_date: DateTime<Utc>,
    pub arrive_airport_id: i64,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

/// A flight that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewFlight {
    pub flight_number: String,
    pub price: f64,
    pub flight_status: FlightStatus,
    pub flight_date: DateTime<Utc>,
    pub departure_date: DateTime<Utc>,
    pub departure_airport_id: i64,
    pub aircraft_id: i64,
    pub arrive_date: DateTime<Utc>,
    pub arrive_airport_id: i64,
    pub duration_minutes: i32,
}

impl NewFlight {
    pub fn into_flight(self, id: i64, created_at: DateTime<Utc>) -> Flight {
        Flight {
            id,
            flight_number: self.flight_number,
            price: self.price,
            flight_status: self.flight_status,
            flight_date: self.flight_date,
            departure_date: self.departure_date,
            departure_airport_id: self.departure_airport_id,
            aircraft_id: self.aircraft_id,
            arrive_date: self.arrive_date,
            arrive_airport_id: self.arrive_airport_id,
            duration_minutes: self.duration_minutes,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDto {
    pub id: i64,
    pub flight_number: String,
    pub price: f64,
    pub flight_status: FlightStatus,
    pub flight_date: DateTime<Utc>,
    pub departure_date: DateTime<Utc>,
    pub departure_airport_id: i64,
    pub aircraft_id: i64,
    pub arrive_date: DateTime<Utc>,
    pub arrive_airport_id: i64,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Flight> for FlightDto {
    fn from(flight: Flight) -> Self {
        Self {
            id: flight.id,
            flight_number: flight.flight_number,
            price: flight.price,
            flight_status: flight.flight_status,
            flight_date: flight.flight_date,
            departure_date: flight.departure_date,
            departure_airport_id: flight.departure_airport_id,
            aircraft_id: flight.aircraft_id,
            arrive_date: flight.arrive_date,
            arrive_airport_id: flight.arrive_airport_id,
            duration_minutes: flight.duration_minutes,
            created_at: flight.created_at,
        }
    }
}

impl From<&Flight> for FlightCreated {
    fn from(flight: &Flight) -> Self {
        Self {
            id: flight.id,
            flight_number: flight.flight_number.clone(),
            price: flight.price,
            flight_status: flight.flight_status.to_string(),
            flight_date: flight.flight_date,
            departure_date: flight.departure_date,
            departure_airport_id: flight.departure_airport_id,
            aircraft_id: flight.aircraft_id,
            arrive_date: flight.arrive_date,
            arrive_airport_id: flight.arrive_airport_id,
            duration_minutes: flight.duration_minutes,
        }
    }
}
