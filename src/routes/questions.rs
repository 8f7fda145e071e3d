//! Category and question retrieval endpoints
//!
//! - `GET /api/categories` - distinct category labels (order unspecified)
//! - `GET /api/questions/{category}` - questions whose category matches exactly
//!
//! An unknown category is not an error: it yields `200 []`. Store failures are
//! logged and reported as `500 {"error": "Server Error."}`; the store is never
//! retried here.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use super::json_response;
use crate::server::AppState;
use crate::types::HubError;

/// Generic failure body; `detail` is only filled in dev mode
#[derive(Debug, Serialize)]
struct ServerErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

/// List every distinct category
pub async fn list_categories(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match state.store.distinct_categories().await {
        Ok(categories) => {
            debug!(count = categories.len(), "Listed categories");
            json_response(StatusCode::OK, &categories)
        }
        Err(e) => server_error(&state, "list_categories", e),
    }
}

/// List the questions of one category
pub async fn list_questions_by_category(
    state: Arc<AppState>,
    category: &str,
) -> Response<Full<Bytes>> {
    match state.store.find_by_category(category).await {
        Ok(questions) => {
            debug!(category = category, count = questions.len(), "Listed questions");
            json_response(StatusCode::OK, &questions)
        }
        Err(e) => server_error(&state, "list_questions_by_category", e),
    }
}

/// Decode the `{category}` path segment.
///
/// Percent-escapes are decoded (`AI%2FML` is `AI/ML`); no trimming or case
/// folding is applied.
pub fn parse_category_segment(raw: &str) -> Result<String, HubError> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|e| HubError::BadRequest(format!("Invalid category encoding: {}", e)))
}

fn server_error(state: &AppState, operation: &str, err: HubError) -> Response<Full<Bytes>> {
    error!(operation = operation, error = %err, "Request failed");

    let detail = if state.args.dev_mode {
        Some(err.to_string())
    } else {
        None
    };

    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ServerErrorBody {
            error: "Server Error.",
            detail,
        },
    )
}
