use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Raw submission from the public booking form. Every field arrives as a
/// string; a missing field deserializes to an empty one so the validator
/// can treat "absent" and "blank" the same way.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_date: String,
    pub event_type: String,
    pub location: String,
    pub budget: String,
    pub message: String,
}

/// A validated, normalized booking ready for insertion. The repository
/// assigns the id and created_at.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_date: NaiveDate,
    pub event_type: EventType,
    pub location: String,
    pub budget: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_date: NaiveDate,
    pub event_type: EventType,
    pub location: String,
    pub budget: String,
    pub message: String,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    Wedding,
    Commercial,
    #[serde(rename = "Pre-Wedding")]
    PreWedding,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Wedding => "Wedding",
            EventType::Commercial => "Commercial",
            EventType::PreWedding => "Pre-Wedding",
            EventType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Wedding" => Some(EventType::Wedding),
            "Commercial" => Some(EventType::Commercial),
            "Pre-Wedding" => Some(EventType::PreWedding),
            "Other" => Some(EventType::Other),
            _ => None,
        }
    }
}
