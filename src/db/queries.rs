use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, EventType, PackageCategory, PricingPackage, SiteContent};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn now_string() -> String {
    Utc::now().naive_utc().format(TS_FORMAT).to_string()
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, name, email, phone, event_date, event_type, location, budget, message, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            booking.name,
            booking.email,
            booking.phone,
            booking.event_date.format("%Y-%m-%d").to_string(),
            booking.event_type.as_str(),
            booking.location,
            booking.budget,
            booking.message,
            booking.status.as_str(),
            booking.created_at.format(TS_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn find_conflicting_bookings(
    conn: &Connection,
    date: &NaiveDate,
) -> anyhow::Result<Vec<(String, BookingStatus)>> {
    let mut stmt = conn.prepare(
        "SELECT id, status FROM bookings WHERE event_date = ?1 AND status != 'completed'",
    )?;

    let rows = stmt.query_map(params![date.format("%Y-%m-%d").to_string()], |row| {
        let id: String = row.get(0)?;
        let status: String = row.get(1)?;
        Ok((id, status))
    })?;

    let mut conflicts = vec![];
    for row in rows {
        let (id, status) = row?;
        conflicts.push((id, BookingStatus::parse(&status).unwrap_or(BookingStatus::Pending)));
    }
    Ok(conflicts)
}

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            "SELECT id, name, email, phone, event_date, event_type, location, budget, message, status, created_at \
             FROM bookings WHERE status = ?1 ORDER BY created_at DESC LIMIT ?2"
                .to_string(),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            "SELECT id, name, email, phone, event_date, event_type, location, budget, message, status, created_at \
             FROM bookings ORDER BY created_at DESC LIMIT ?1"
                .to_string(),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, name, email, phone, event_date, event_type, location, budget, message, status, created_at \
         FROM bookings WHERE id = ?1",
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: &BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub struct BookingStats {
    pub pending: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub total: i64,
}

pub fn get_booking_stats(conn: &Connection) -> anyhow::Result<BookingStats> {
    let mut stats = BookingStats {
        pending: 0,
        confirmed: 0,
        completed: 0,
        total: 0,
    };

    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM bookings GROUP BY status")?;
    let rows = stmt.query_map([], |row| {
        let status: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        Ok((status, count))
    })?;

    for row in rows {
        let (status, count) = row?;
        match status.as_str() {
            "pending" => stats.pending = count,
            "confirmed" => stats.confirmed = count,
            "completed" => stats.completed = count,
            _ => {}
        }
        stats.total += count;
    }
    Ok(stats)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let email: String = row.get(2)?;
    let phone: String = row.get(3)?;
    let event_date_str: String = row.get(4)?;
    let event_type_str: String = row.get(5)?;
    let location: String = row.get(6)?;
    let budget: String = row.get(7)?;
    let message: String = row.get(8)?;
    let status_str: String = row.get(9)?;
    let created_at_str: String = row.get(10)?;

    let event_date = NaiveDate::parse_from_str(&event_date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| Utc::now().date_naive());
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TS_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        name,
        email,
        phone,
        event_date,
        event_type: EventType::parse(&event_type_str).unwrap_or(EventType::Other),
        location,
        budget,
        message,
        status: BookingStatus::parse(&status_str).unwrap_or(BookingStatus::Pending),
        created_at,
    })
}

// ── Site content ──

pub fn get_site_content(conn: &Connection) -> anyhow::Result<Vec<SiteContent>> {
    let mut stmt =
        conn.prepare("SELECT key, value, updated_at FROM site_content ORDER BY key ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(SiteContent {
            key: row.get(0)?,
            value: row.get(1)?,
            updated_at: row.get(2)?,
        })
    })?;

    let mut content = vec![];
    for row in rows {
        content.push(row?);
    }
    Ok(content)
}

pub fn upsert_site_content(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO site_content (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           updated_at = excluded.updated_at",
        params![key, value, now_string()],
    )?;
    Ok(())
}

// ── Pricing packages ──

pub fn create_package(conn: &Connection, package: &PricingPackage) -> anyhow::Result<()> {
    let features_json = serde_json::to_string(&package.features)?;
    conn.execute(
        "INSERT INTO packages (id, title, price, description, category, features, is_team_package, sort_order, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            package.id,
            package.title,
            package.price,
            package.description,
            package.category.as_str(),
            features_json,
            package.is_team_package as i32,
            package.sort_order,
            package.created_at,
            package.updated_at,
        ],
    )?;
    Ok(())
}

pub fn save_package(conn: &Connection, package: &PricingPackage) -> anyhow::Result<bool> {
    let features_json = serde_json::to_string(&package.features)?;
    let count = conn.execute(
        "UPDATE packages SET title = ?1, price = ?2, description = ?3, category = ?4,
           features = ?5, is_team_package = ?6, sort_order = ?7, updated_at = ?8
         WHERE id = ?9",
        params![
            package.title,
            package.price,
            package.description,
            package.category.as_str(),
            features_json,
            package.is_team_package as i32,
            package.sort_order,
            now_string(),
            package.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn list_packages(conn: &Connection) -> anyhow::Result<Vec<PricingPackage>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, price, description, category, features, is_team_package, sort_order, created_at, updated_at
         FROM packages ORDER BY sort_order ASC, created_at ASC",
    )?;
    let rows = stmt.query_map([], |row| Ok(parse_package_row(row)))?;

    let mut packages = vec![];
    for row in rows {
        packages.push(row??);
    }
    Ok(packages)
}

pub fn get_package_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<PricingPackage>> {
    let result = conn.query_row(
        "SELECT id, title, price, description, category, features, is_team_package, sort_order, created_at, updated_at
         FROM packages WHERE id = ?1",
        params![id],
        |row| Ok(parse_package_row(row)),
    );

    match result {
        Ok(package) => Ok(Some(package?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_package(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM packages WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_package_row(row: &rusqlite::Row) -> anyhow::Result<PricingPackage> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let price: i64 = row.get(2)?;
    let description: Option<String> = row.get(3)?;
    let category_str: String = row.get(4)?;
    let features_json: String = row.get(5)?;
    let is_team_package: bool = row.get::<_, i32>(6)? != 0;
    let sort_order: i64 = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    let features: Vec<String> = serde_json::from_str(&features_json).unwrap_or_default();

    Ok(PricingPackage {
        id,
        title,
        price,
        description,
        category: PackageCategory::parse(&category_str).unwrap_or(PackageCategory::Freelancer),
        features,
        is_team_package,
        sort_order,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_booking(id: &str, event_date: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            event_date: date(event_date),
            event_type: EventType::Wedding,
            location: "Kolkata".to_string(),
            budget: "₹25,000 – ₹50,000".to_string(),
            message: String::new(),
            status,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_create_and_fetch_booking() {
        let conn = setup_db();
        let booking = make_booking("bk-1", "2030-06-15", BookingStatus::Pending);
        create_booking(&conn, &booking).unwrap();

        let loaded = get_booking_by_id(&conn, "bk-1").unwrap().unwrap();
        assert_eq!(loaded.name, "Asha");
        assert_eq!(loaded.event_date, date("2030-06-15"));
        assert_eq!(loaded.event_type, EventType::Wedding);
        assert_eq!(loaded.status, BookingStatus::Pending);
    }

    #[test]
    fn test_find_conflicting_skips_completed() {
        let conn = setup_db();
        create_booking(&conn, &make_booking("bk-1", "2030-06-15", BookingStatus::Completed)).unwrap();

        let conflicts = find_conflicting_bookings(&conn, &date("2030-06-15")).unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_find_conflicting_sees_pending_and_confirmed() {
        let conn = setup_db();
        create_booking(&conn, &make_booking("bk-1", "2030-06-15", BookingStatus::Pending)).unwrap();
        create_booking(&conn, &make_booking("bk-2", "2030-06-16", BookingStatus::Confirmed)).unwrap();

        let conflicts = find_conflicting_bookings(&conn, &date("2030-06-15")).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].0, "bk-1");
        assert_eq!(conflicts[0].1, BookingStatus::Pending);

        let conflicts = find_conflicting_bookings(&conn, &date("2030-06-16")).unwrap();
        assert_eq!(conflicts.len(), 1);

        let conflicts = find_conflicting_bookings(&conn, &date("2030-06-17")).unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_unique_index_rejects_second_open_booking() {
        let conn = setup_db();
        create_booking(&conn, &make_booking("bk-1", "2030-06-15", BookingStatus::Pending)).unwrap();

        let err = create_booking(&conn, &make_booking("bk-2", "2030-06-15", BookingStatus::Confirmed))
            .unwrap_err();
        let sqlite_err = err.downcast_ref::<rusqlite::Error>().unwrap();
        assert!(matches!(
            sqlite_err,
            rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
        ));
    }

    #[test]
    fn test_unique_index_allows_reuse_after_completed() {
        let conn = setup_db();
        create_booking(&conn, &make_booking("bk-1", "2030-06-15", BookingStatus::Completed)).unwrap();
        create_booking(&conn, &make_booking("bk-2", "2030-06-15", BookingStatus::Pending)).unwrap();

        let all = get_all_bookings(&conn, None, 50).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_update_status_and_stats() {
        let conn = setup_db();
        create_booking(&conn, &make_booking("bk-1", "2030-06-15", BookingStatus::Pending)).unwrap();
        create_booking(&conn, &make_booking("bk-2", "2030-06-16", BookingStatus::Pending)).unwrap();

        assert!(update_booking_status(&conn, "bk-1", &BookingStatus::Confirmed).unwrap());
        assert!(!update_booking_status(&conn, "missing", &BookingStatus::Confirmed).unwrap());

        let stats = get_booking_stats(&conn).unwrap();
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.confirmed, 1);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.total, 2);
    }

    #[test]
    fn test_delete_booking() {
        let conn = setup_db();
        create_booking(&conn, &make_booking("bk-1", "2030-06-15", BookingStatus::Pending)).unwrap();

        assert!(delete_booking(&conn, "bk-1").unwrap());
        assert!(!delete_booking(&conn, "bk-1").unwrap());
        assert!(get_booking_by_id(&conn, "bk-1").unwrap().is_none());
    }

    #[test]
    fn test_status_filter_and_order() {
        let conn = setup_db();
        let mut early = make_booking("bk-1", "2030-06-15", BookingStatus::Pending);
        early.created_at = NaiveDateTime::parse_from_str("2030-01-01 10:00:00", TS_FORMAT).unwrap();
        let mut late = make_booking("bk-2", "2030-06-16", BookingStatus::Pending);
        late.created_at = NaiveDateTime::parse_from_str("2030-01-02 10:00:00", TS_FORMAT).unwrap();
        create_booking(&conn, &early).unwrap();
        create_booking(&conn, &late).unwrap();

        let listed = get_all_bookings(&conn, Some("pending"), 50).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "bk-2");

        let none = get_all_bookings(&conn, Some("completed"), 50).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_site_content_upsert_overwrites() {
        let conn = setup_db();
        upsert_site_content(&conn, "hero_title", "Moments that last").unwrap();
        upsert_site_content(&conn, "hero_title", "Frames forever").unwrap();
        upsert_site_content(&conn, "about_text", "We tell wedding stories").unwrap();

        let content = get_site_content(&conn).unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0].key, "about_text");
        assert_eq!(content[1].key, "hero_title");
        assert_eq!(content[1].value, "Frames forever");
    }

    #[test]
    fn test_package_round_trip() {
        let conn = setup_db();
        let package = PricingPackage {
            id: "pkg-1".to_string(),
            title: "Silver".to_string(),
            price: 45000,
            description: Some("One-day coverage".to_string()),
            category: PackageCategory::Freelancer,
            features: vec!["8 hours".to_string(), "300 edited photos".to_string()],
            is_team_package: false,
            sort_order: 1,
            created_at: now_string(),
            updated_at: now_string(),
        };
        create_package(&conn, &package).unwrap();

        let loaded = get_package_by_id(&conn, "pkg-1").unwrap().unwrap();
        assert_eq!(loaded.title, "Silver");
        assert_eq!(loaded.features.len(), 2);
        assert_eq!(loaded.category, PackageCategory::Freelancer);

        let mut updated = loaded.clone();
        updated.price = 50000;
        assert!(save_package(&conn, &updated).unwrap());
        let reloaded = get_package_by_id(&conn, "pkg-1").unwrap().unwrap();
        assert_eq!(reloaded.price, 50000);

        assert!(delete_package(&conn, "pkg-1").unwrap());
        assert!(get_package_by_id(&conn, "pkg-1").unwrap().is_none());
    }
}
