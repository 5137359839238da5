use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Booking, BookingStatus, NewBooking};

use super::{BookingRepository, ConflictingBooking, InsertError};

pub struct SqliteBookingRepository {
    db: Arc<Mutex<Connection>>,
}

impl SqliteBookingRepository {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn find_conflicting(&self, date: NaiveDate) -> anyhow::Result<Vec<ConflictingBooking>> {
        let db = self.db.lock().unwrap();
        let rows = queries::find_conflicting_bookings(&db, &date)?;
        Ok(rows
            .into_iter()
            .map(|(id, status)| ConflictingBooking { id, status })
            .collect())
    }

    async fn insert(&self, new: &NewBooking) -> Result<String, InsertError> {
        let booking = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            event_date: new.event_date,
            event_type: new.event_type,
            location: new.location.clone(),
            budget: new.budget.clone(),
            message: new.message.clone(),
            status: BookingStatus::Pending,
            created_at: Utc::now().naive_utc(),
        };

        let db = self.db.lock().unwrap();
        match queries::create_booking(&db, &booking) {
            Ok(()) => Ok(booking.id),
            Err(e) if is_unique_violation(&e) => Err(InsertError::DateTaken),
            Err(e) => Err(InsertError::Other(e)),
        }
    }
}

// The partial unique index on bookings(event_date) surfaces as a
// constraint violation when two open bookings race for the same date.
fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_repo() -> SqliteBookingRepository {
        let conn = db::init_db(":memory:").unwrap();
        SqliteBookingRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_booking(event_date: &str) -> NewBooking {
        NewBooking {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            event_date: date(event_date),
            event_type: crate::models::EventType::Wedding,
            location: "Kolkata".to_string(),
            budget: "₹50,000 – ₹1,00,000".to_string(),
            message: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_pending_status() {
        let repo = setup_repo();
        let id = repo.insert(&new_booking("2030-06-15")).await.unwrap();
        assert!(!id.is_empty());

        let conflicts = repo.find_conflicting(date("2030-06-15")).await.unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, id);
        assert_eq!(conflicts[0].status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_free_date_has_no_conflicts() {
        let repo = setup_repo();
        repo.insert(&new_booking("2030-06-15")).await.unwrap();

        let conflicts = repo.find_conflicting(date("2030-06-16")).await.unwrap();
        assert!(conflicts.is_empty());
    }

    #[tokio::test]
    async fn test_double_insert_same_date_is_date_taken() {
        let repo = setup_repo();
        repo.insert(&new_booking("2030-06-15")).await.unwrap();

        let err = repo.insert(&new_booking("2030-06-15")).await.unwrap_err();
        assert!(matches!(err, InsertError::DateTaken));
    }
}
