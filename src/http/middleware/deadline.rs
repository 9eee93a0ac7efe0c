//! Whole-request deadline.
//!
//! Each upstream fetch has its own timeout; this bounds the sum of them. An
//! exceeded deadline is an upstream failure, so it is rendered as a
//! [`RelayError`] and reaches `present_errors` like any other 500.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;
use tokio::time;

use crate::error::RelayError;
use crate::http::server::AppState;

pub async fn deadline(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let limit = Duration::from_secs(state.config.timeouts.deadline_secs);
    let target = request.uri().to_string();

    match time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => RelayError::upstream(
            target,
            format!("no response within {}s", limit.as_secs()),
        )
        .into_response(),
    }
}
