use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{authorize, Role};
use crate::db::queries;
use crate::errors::AppError;
use crate::logbuf::LogEntry;
use crate::models::{BookingStatus, PackageCategory, PricingPackage, SiteContent};
use crate::state::AppState;

/// The data routes need a live store; the log-buffer routes below do not.
fn db_handle(state: &AppState) -> Result<&Mutex<Connection>, AppError> {
    state.db.as_deref().ok_or(AppError::StorageUnconfigured)
}

fn now_string() -> String {
    Utc::now().naive_utc().format("%Y-%m-%d %H:%M:%S").to_string()
}

// ── Bookings ──

// GET /api/admin/stats
#[derive(Serialize)]
pub struct StatsResponse {
    pending: i64,
    confirmed: i64,
    completed: i64,
    total: i64,
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let stats = {
        let db = db_handle(&state)?.lock().unwrap();
        queries::get_booking_stats(&db)?
    };

    Ok(Json(StatsResponse {
        pending: stats.pending,
        confirmed: stats.confirmed,
        completed: stats.completed,
        total: stats.total,
    }))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    name: String,
    email: String,
    phone: String,
    event_date: String,
    event_type: String,
    location: String,
    budget: String,
    message: String,
    status: String,
    created_at: String,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let limit = query.limit.unwrap_or(50);
    let status_filter = query.status.as_deref();

    let bookings = {
        let db = db_handle(&state)?.lock().unwrap();
        queries::get_all_bookings(&db, status_filter, limit)?
    };

    let response: Vec<BookingResponse> = bookings
        .into_iter()
        .map(|b| BookingResponse {
            id: b.id,
            name: b.name,
            email: b.email,
            phone: b.phone,
            event_date: b.event_date.format("%Y-%m-%d").to_string(),
            event_type: b.event_type.as_str().to_string(),
            location: b.location,
            budget: b.budget,
            message: b.message,
            status: b.status.as_str().to_string(),
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/bookings/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let identity = authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let status = BookingStatus::parse(&body.status).ok_or_else(|| {
        AppError::BadRequest("status must be pending, confirmed, or completed".to_string())
    })?;

    let updated = {
        let db = db_handle(&state)?.lock().unwrap();
        queries::update_booking_status(&db, &id, &status)?
    };

    if !updated {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    state.logs.info(
        "admin",
        format!(
            "{} set booking {id} to {}",
            identity.subject,
            status.as_str()
        ),
    );
    Ok(Json(serde_json::json!({"ok": true})))
}

// POST /api/admin/bookings/:id/delete
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let identity = authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let deleted = {
        let db = db_handle(&state)?.lock().unwrap();
        queries::delete_booking(&db, &id)?
    };

    if !deleted {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    state
        .logs
        .info("admin", format!("{} deleted booking {id}", identity.subject));
    Ok(Json(serde_json::json!({"ok": true})))
}

// ── Site content ──

// GET /api/admin/content
pub async fn get_content(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<SiteContent>>, AppError> {
    authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let content = {
        let db = db_handle(&state)?.lock().unwrap();
        queries::get_site_content(&db)?
    };
    Ok(Json(content))
}

// POST /api/admin/content
#[derive(Deserialize)]
pub struct UpdateContentRequest {
    pub key: String,
    pub value: String,
}

pub async fn update_content(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateContentRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let identity = authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let key = body.key.trim();
    if key.is_empty() {
        return Err(AppError::BadRequest("key is required".to_string()));
    }

    {
        let db = db_handle(&state)?.lock().unwrap();
        queries::upsert_site_content(&db, key, &body.value)?;
    }

    state
        .logs
        .info("admin", format!("{} updated content {key}", identity.subject));
    Ok(Json(serde_json::json!({"ok": true})))
}

// ── Pricing packages ──

// GET /api/admin/packages
pub async fn get_packages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<PricingPackage>>, AppError> {
    authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let packages = {
        let db = db_handle(&state)?.lock().unwrap();
        queries::list_packages(&db)?
    };
    Ok(Json(packages))
}

// POST /api/admin/packages
#[derive(Deserialize)]
pub struct CreatePackageRequest {
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub sort_order: i64,
}

pub async fn create_package(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreatePackageRequest>,
) -> Result<Json<PricingPackage>, AppError> {
    let identity = authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }
    let category = PackageCategory::parse(&body.category).ok_or_else(|| {
        AppError::BadRequest("category must be Freelancer or Team".to_string())
    })?;

    let now = now_string();
    let package = PricingPackage {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        price: body.price,
        description: body.description,
        category,
        features: body.features,
        is_team_package: category == PackageCategory::Team,
        sort_order: body.sort_order,
        created_at: now.clone(),
        updated_at: now,
    };

    {
        let db = db_handle(&state)?.lock().unwrap();
        queries::create_package(&db, &package)?;
    }

    state.logs.info(
        "admin",
        format!(
            "{} created package {} ({})",
            identity.subject, package.title, package.id
        ),
    );
    Ok(Json(package))
}

// POST /api/admin/packages/:id
#[derive(Deserialize)]
pub struct UpdatePackageRequest {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub features: Option<Vec<String>>,
    pub sort_order: Option<i64>,
}

pub async fn update_package(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdatePackageRequest>,
) -> Result<Json<PricingPackage>, AppError> {
    let identity = authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let db = db_handle(&state)?;
    let mut package = {
        let db = db.lock().unwrap();
        queries::get_package_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound(format!("package {id}")))?;

    if let Some(title) = body.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        package.title = title;
    }
    if let Some(price) = body.price {
        package.price = price;
    }
    if let Some(description) = body.description {
        package.description = Some(description);
    }
    if let Some(category) = body.category {
        package.category = PackageCategory::parse(&category).ok_or_else(|| {
            AppError::BadRequest("category must be Freelancer or Team".to_string())
        })?;
        package.is_team_package = package.category == PackageCategory::Team;
    }
    if let Some(features) = body.features {
        package.features = features;
    }
    if let Some(sort_order) = body.sort_order {
        package.sort_order = sort_order;
    }

    let saved = {
        let db = db.lock().unwrap();
        queries::save_package(&db, &package)?;
        queries::get_package_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound(format!("package {id}")))?;

    state
        .logs
        .info("admin", format!("{} updated package {id}", identity.subject));
    Ok(Json(saved))
}

// POST /api/admin/packages/:id/delete
pub async fn delete_package(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let identity = authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let deleted = {
        let db = db_handle(&state)?.lock().unwrap();
        queries::delete_package(&db, &id)?
    };

    if !deleted {
        return Err(AppError::NotFound(format!("package {id}")));
    }

    state
        .logs
        .info("admin", format!("{} deleted package {id}", identity.subject));
    Ok(Json(serde_json::json!({"ok": true})))
}

// ── Log buffer ──

// GET /api/admin/logs
#[derive(Deserialize)]
pub struct LogsQuery {
    pub level: Option<String>,
}

pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<LogEntry>>, AppError> {
    authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    let entries = match query.level.as_deref() {
        Some(level) if level.eq_ignore_ascii_case("error") => state.logs.errors_only(),
        _ => state.logs.all(),
    };
    Ok(Json(entries))
}

// POST /api/admin/logs/clear
pub async fn clear_logs(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let identity = authorize(&headers, state.identity.as_ref(), Role::Admin)?;

    state.logs.clear();
    tracing::info!(subject = %identity.subject, "log buffer cleared");
    Ok(Json(serde_json::json!({"ok": true})))
}

// ── Public read ──

// GET /api/packages
//
// Unauthenticated; the pricing page reads this.
pub async fn public_packages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PricingPackage>>, AppError> {
    let packages = {
        let db = db_handle(&state)?.lock().unwrap();
        queries::list_packages(&db)?
    };
    Ok(Json(packages))
}
