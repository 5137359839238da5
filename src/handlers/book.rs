use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::BookingRequest;
use crate::services::intake;
use crate::state::AppState;

// POST /api/book
//
// The one public write endpoint. Bodies that fail to deserialize still get
// the uniform envelope rather than axum's default rejection text.
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            state
                .logs
                .debug("intake", format!("rejected malformed body: {rejection}"));
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "errors": ["Invalid request body"],
                })),
            )
                .into_response();
        }
    };

    intake::submit_booking(&state, request)
        .await
        .into_response()
}
