pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{BookingStatus, NewBooking};

/// A booking that already holds a date: pending and confirmed both block,
/// completed events release the slot.
#[derive(Debug, Clone)]
pub struct ConflictingBooking {
    pub id: String,
    pub status: BookingStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    /// The storage layer's uniqueness guard caught a concurrent booking for
    /// the same date after the conflict read saw it free.
    #[error("date already taken")]
    DateTaken,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_conflicting(&self, date: NaiveDate) -> anyhow::Result<Vec<ConflictingBooking>>;

    /// Insert with a fresh id and status "pending"; returns the id.
    async fn insert(&self, booking: &NewBooking) -> Result<String, InsertError>;
}
