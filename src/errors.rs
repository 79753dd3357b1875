//! # Application Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    ai::{ScorerInitError, SemanticSearchError},
    ontology::{
        repositories::StoreError,
        service::OntologyServiceError,
        traversal::UnknownCategory,
    },
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("semantic search is not configured")]
    ScorerNotConfigured,

    #[error("semantic scorer unavailable: {0}")]
    ScorerUnavailable(String),

    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),

    #[error("cannot parse `{1}`: {0}")]
    YAMLFile(#[source] serde_yaml::Error, String),

    #[error(transparent)]
    Tera(#[from] tera::Error),

    #[error(transparent)]
    JSON(#[from] serde_json::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    ScorerInit(#[from] ScorerInitError),
}

impl Error {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ScorerNotConfigured => StatusCode::NOT_IMPLEMENTED,
            Self::ScorerUnavailable(_) | Self::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::ScorerNotConfigured => "scorer_not_configured",
            Self::ScorerUnavailable(_) => "scorer_unavailable",
            Self::StoreUnavailable(_) => "store_unavailable",
            _ => "internal_server_error",
        }
    }
}

impl From<OntologyServiceError> for Error {
    fn from(err: OntologyServiceError) -> Self {
        match err {
            OntologyServiceError::NotFound { iri } => Self::NotFound(format!("class `{iri}`")),
            OntologyServiceError::InvalidIri(err) => Self::Message(err.to_string()),
            OntologyServiceError::Store(err) => Self::StoreUnavailable(err),
        }
    }
}

impl From<SemanticSearchError> for Error {
    fn from(err: SemanticSearchError) -> Self {
        match err {
            SemanticSearchError::Store(err) => Self::StoreUnavailable(err),
            SemanticSearchError::ScorerUnavailable(err) => Self::ScorerUnavailable(err.to_string()),
        }
    }
}

impl From<UnknownCategory> for Error {
    fn from(err: UnknownCategory) -> Self {
        Self::BadRequest(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorDetail {
    error: &'static str,
    description: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(err.msg = %self, err.detail = ?self, "controller_error");
        } else {
            tracing::debug!(err.msg = %self, "controller_rejected");
        }
        let body = ErrorDetail {
            error: self.kind(),
            description: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
