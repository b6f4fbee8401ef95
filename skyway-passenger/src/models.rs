use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassengerType {
    #[default]
    Unknown,
    Male,
    Female,
    Baby,
}

impl PassengerType {
    pub const NAMES: &'static [&'static str] = &["UNKNOWN", "MALE", "FEMALE", "BABY"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PassengerType::Unknown => "UNKNOWN",
            PassengerType::Male => "MALE",
            PassengerType::Female => "FEMALE",
            PassengerType::Baby => "BABY",
        }
    }
}

impl fmt::Display for PassengerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassengerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNKNOWN" => Ok(PassengerType::Unknown),
            "MALE" => Ok(PassengerType::Male),
            "FEMALE" => Ok(PassengerType::Female),
            "BABY" => Ok(PassengerType::Baby),
            other => Err(format!("unknown passenger type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub passport_number: String,
    pub age: i32,
    pub passenger_type: PassengerType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPassenger {
    pub user_id: i64,
    pub name: String,
    pub passport_number: String,
    pub age: i32,
    pub passenger_type: PassengerType,
}

impl NewPassenger {
    pub fn into_passenger(self, id: i64, created_at: DateTime<Utc>) -> Passenger {
        Passenger {
            id,
            user_id: self.user_id,
            name: self.name,
            passport_number: self.passport_number,
            age: self.age,
            passenger_type: self.passenger_type,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDto {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub passport_number: String,
    pub age: i32,
    pub passenger_type: PassengerType,
    pub created_at: DateTime<Utc>,
}

impl From<Passenger> for PassengerDto {
    fn from(p: Passenger) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            name: p.name,
            passport_number: p.passport_number,
            age: p.age,
            passenger_type: p.passenger_type,
            created_at: p.created_at,
        }
    }
}
