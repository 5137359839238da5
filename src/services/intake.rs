use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use crate::models::{BookingRequest, EventType, NewBooking};
use crate::services::repository::InsertError;
use crate::services::validation;
use crate::state::AppState;

const ACCEPTED_MESSAGE: &str = "Booking request received! We'll confirm your date within 24 hours.";
const ACCEPTED_UNPERSISTED_MESSAGE: &str =
    "Booking request received! We'll be in touch within 24 hours.";

/// Every way a submission can end, carrying the client-facing strings.
/// `IntoResponse` maps each outcome onto the uniform envelope:
/// `{success, message, booking_id}` on acceptance, `{success, errors}`
/// otherwise.
#[derive(Debug)]
pub enum IntakeOutcome {
    Accepted { booking_id: String, message: String },
    Invalid { errors: Vec<String> },
    Conflict { error: String },
    Unavailable { error: String },
    Failed { error: String },
}

impl IntakeOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            IntakeOutcome::Accepted { .. } => StatusCode::CREATED,
            IntakeOutcome::Invalid { .. } => StatusCode::BAD_REQUEST,
            IntakeOutcome::Conflict { .. } => StatusCode::CONFLICT,
            IntakeOutcome::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            IntakeOutcome::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IntakeOutcome {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            IntakeOutcome::Accepted {
                booking_id,
                message,
            } => serde_json::json!({
                "success": true,
                "message": message,
                "booking_id": booking_id,
            }),
            IntakeOutcome::Invalid { errors } => {
                serde_json::json!({ "success": false, "errors": errors })
            }
            IntakeOutcome::Conflict { error }
            | IntakeOutcome::Unavailable { error }
            | IntakeOutcome::Failed { error } => {
                serde_json::json!({ "success": false, "errors": [error] })
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Admit or reject one booking submission. Stops at the first failing
/// stage; the insert is the only state-changing step.
pub async fn submit_booking(state: &AppState, request: BookingRequest) -> IntakeOutcome {
    // 1. Structural validation, all violations collected
    let errors = validation::validate_request(&request);
    if !errors.is_empty() {
        state.logs.debug(
            "intake",
            format!("rejected submission: {}", errors.join("; ")),
        );
        return IntakeOutcome::Invalid { errors };
    }

    // 2. The date must parse and lie strictly in the future
    let event_date = match validation::check_future_date(&request.event_date, Utc::now().date_naive())
    {
        Ok(date) => date,
        Err(error) => {
            state.logs.debug(
                "intake",
                format!("rejected date {:?}: {error}", request.event_date),
            );
            return IntakeOutcome::Invalid {
                errors: vec![error],
            };
        }
    };

    // Guaranteed by step 1; kept as a guard so a refactor there cannot
    // push an unparsed event type past this point.
    let Some(event_type) = EventType::parse(&request.event_type) else {
        return IntakeOutcome::Invalid {
            errors: vec![validation::EVENT_TYPE_ERROR.to_string()],
        };
    };

    // 3. No store configured: accept-and-log by default, fail closed in
    //    strict mode
    let Some(repo) = state.repo.as_deref() else {
        if state.config.strict_intake {
            state.logs.warn(
                "intake",
                format!("rejected booking for {event_date}: no store configured (strict mode)"),
            );
            return IntakeOutcome::Unavailable {
                error: "Booking service is temporarily unavailable. Please try again later."
                    .to_string(),
            };
        }

        let booking_id = format!("RIG-{}", Utc::now().timestamp_millis());
        state.logs.info(
            "intake",
            format!(
                "accepted unpersisted booking {booking_id}: {} <{}> {} | {} {} at {} | budget {} | {:?}",
                request.name.trim(),
                request.email.trim().to_lowercase(),
                request.phone.trim(),
                event_type.as_str(),
                event_date,
                request.location,
                request.budget,
                request.message.trim(),
            ),
        );
        return IntakeOutcome::Accepted {
            booking_id,
            message: ACCEPTED_UNPERSISTED_MESSAGE.to_string(),
        };
    };

    // 4. Date conflict check: any non-completed booking holds the slot
    match repo.find_conflicting(event_date).await {
        Ok(conflicts) if !conflicts.is_empty() => {
            state.logs.info(
                "intake",
                format!("date {event_date} already held, rejecting"),
            );
            return IntakeOutcome::Conflict {
                error: date_taken_error(event_date),
            };
        }
        Ok(_) => {}
        Err(e) => {
            state.logs.error(
                "intake",
                format!("conflict check for {event_date} failed: {e:#}"),
            );
            return IntakeOutcome::Failed {
                error: "Server error. Please try again later.".to_string(),
            };
        }
    }

    // 5. Insert the normalized booking; the storage-level uniqueness guard
    //    backstops a submission that raced past the conflict read
    let new_booking = NewBooking {
        name: request.name.trim().to_string(),
        email: request.email.trim().to_lowercase(),
        phone: request.phone.trim().to_string(),
        event_date,
        event_type,
        location: request.location,
        budget: request.budget,
        message: request.message.trim().to_string(),
    };

    match repo.insert(&new_booking).await {
        Ok(booking_id) => {
            state.logs.info(
                "intake",
                format!("accepted booking {booking_id} for {event_date}"),
            );
            IntakeOutcome::Accepted {
                booking_id,
                message: ACCEPTED_MESSAGE.to_string(),
            }
        }
        Err(InsertError::DateTaken) => {
            state.logs.info(
                "intake",
                format!("date {event_date} taken during insert, rejecting"),
            );
            IntakeOutcome::Conflict {
                error: date_taken_error(event_date),
            }
        }
        Err(InsertError::Other(e)) => {
            state.logs.error(
                "intake",
                format!("booking insert for {event_date} failed: {e:#}"),
            );
            IntakeOutcome::Failed {
                error: "Failed to save booking. Please try again.".to_string(),
            }
        }
    }
}

// Names the date but never the booking holding it.
fn date_taken_error(date: chrono::NaiveDate) -> String {
    format!(
        "Date {} is unavailable — we already have a confirmed booking. Please choose another date.",
        date.format("%Y-%m-%d")
    )
}
