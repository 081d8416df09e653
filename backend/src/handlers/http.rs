//! The single HTTP endpoint this service exposes : a
//! thin adapter over `Cache::get_rating_changes`, wrapping the result in
//! Codeforces' `{status, comment?, result?}` envelope.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::models::RatingChange;
use crate::services::cache::Cache;

#[derive(Serialize)]
struct ApiResponse<T: Serialize> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
}

/// `GET /api/contest.ratingChanges?contestId=<int>`.
///
/// Any other method, or a missing/non-integer `contestId`, gets a
/// `FAILED` envelope with HTTP 400 rather than a framework-level 404/405 —
/// the exact envelope and status strings are part of the public wire
/// contract, not an implementation detail.
pub async fn rating_changes(
    method: Method,
    State(cache): State<Arc<Cache>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if method != Method::GET {
        return failed(
            StatusCode::BAD_REQUEST,
            "Methods other than GET are not supported",
        );
    }

    let contest_id = match params.get("contestId").and_then(|v| v.parse::<i64>().ok()) {
        Some(id) => id,
        None => {
            return failed(
                StatusCode::BAD_REQUEST,
                "contestId: Field should contain long integer value",
            );
        }
    };

    let result = cache.get_rating_changes(contest_id);
    ok(result)
}

fn ok(result: Vec<RatingChange>) -> Response {
    let body = ApiResponse {
        status: "OK",
        comment: None,
        result: Some(result),
    };
    json_response(StatusCode::OK, &body)
}

fn failed(status: StatusCode, comment: &str) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        status: "FAILED",
        comment: Some(comment.to_string()),
        result: None,
    };
    json_response(status, &body)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [("content-type", "application/json")],
            bytes,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn healthz() -> &'static str {
    "OK"
}
