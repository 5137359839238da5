use chrono::NaiveDate;

use crate::models::{BookingRequest, EventType};

pub const EVENT_TYPE_ERROR: &str = "Event type must be Wedding, Commercial, Pre-Wedding, or Other";

/// Structural field checks. Every violation is collected, in field order,
/// so the form can show all problems at once.
pub fn validate_request(req: &BookingRequest) -> Vec<String> {
    let mut errors = vec![];

    if req.name.trim().chars().count() < 2 {
        errors.push("Name is required (min 2 chars)".to_string());
    }
    if !is_valid_email(&req.email) {
        errors.push("Valid email is required".to_string());
    }
    if req.phone.trim().chars().count() < 10 {
        errors.push("Valid phone number is required".to_string());
    }
    if req.event_date.is_empty() {
        errors.push("Event date is required".to_string());
    }
    if EventType::parse(&req.event_type).is_none() {
        errors.push(EVENT_TYPE_ERROR.to_string());
    }
    if req.location.is_empty() {
        errors.push("Location is required".to_string());
    }
    if req.budget.is_empty() {
        errors.push("Budget range is required".to_string());
    }

    errors
}

/// Runs after the structural checks pass: the date must parse and lie
/// strictly after `today`.
pub fn check_future_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| "Event date must be a valid date (YYYY-MM-DD)".to_string())?;

    if date <= today {
        return Err("Event date must be in the future".to_string());
    }
    Ok(date)
}

// Accepts local@domain.tld shapes: no whitespace, exactly one @ with a
// non-empty local part, and a dot in the domain with at least one
// character on each side.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
