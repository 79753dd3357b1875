//! Response helpers shared by controllers.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::Result;

/// Returns a JSON response.
///
/// # Errors
///
/// Currently this function doesn't return any error. this is for feature
/// functionality
pub fn json<T: Serialize>(t: T) -> Result<Response> {
    Ok(Json(t).into_response())
}
