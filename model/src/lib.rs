//! Types shared between the medikeep server and the web frontend.
//!
//! Everything here crosses the wire as JSON. Times of day (dose timings) are
//! serialized as `HH:MM:SS`, timestamps as RFC 3339.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, as returned by the API. The password never leaves the
/// server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

/// Payload for registering a new user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Payload for logging in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// An established session: the bearer token plus the user it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// One scheduled time of day at which a medication is to be taken.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationTiming {
    pub timing_id: i64,
    pub medication_id: i64,
    pub take_time: NaiveTime,
}

/// A medication owned by a user, including its dose timings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub medication_id: i64,
    pub user_id: i64,
    pub name: String,
    pub dosage: String,
    #[serde(default)]
    pub is_as_needed: bool,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub timings: Vec<MedicationTiming>,
}

/// Payload for creating a medication together with its dose timings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationCreate {
    pub name: String,
    pub dosage: String,
    #[serde(default)]
    pub is_as_needed: bool,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub timings: Vec<NaiveTime>,
}

/// Payload for recording that a dose was taken. A missing `taken_at` means
/// "now", resolved on the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRecordCreate {
    pub medication_id: i64,
    #[serde(default)]
    pub timing_id: Option<i64>,
    #[serde(default)]
    pub taken_at: Option<DateTime<Utc>>,
}

/// A recorded intake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub record_id: i64,
    pub user_id: i64,
    pub medication_id: i64,
    pub timing_id: Option<i64>,
    pub taken_at: DateTime<Utc>,
}
