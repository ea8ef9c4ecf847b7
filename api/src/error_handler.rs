use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use keyword_pipeline::PipelineError;
use query_history::HistoryError;
use thiserror::Error;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let envelope =
            ApiResponse::error(self.error_code(), self.to_string(), Vec::new());
        envelope.into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        let (status, code) = match &err {
            HistoryError::MissingUserId => (StatusCode::BAD_REQUEST, "MISSING_USER_ID"),
            HistoryError::InvalidSuffix { .. } | HistoryError::Decode(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "HISTORY_DECODE_ERROR")
            }
            HistoryError::Config(_) | HistoryError::Mongo(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "HISTORY_STORE_ERROR")
            }
        };
        AppError::Http {
            status,
            code,
            message: err.to_string(),
        }
    }
}

/// Upstream model failures are 502s; the caller did nothing wrong.
impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::History(e) => e.into(),
            PipelineError::Llm(e) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "UPSTREAM_LLM_ERROR",
                message: e.to_string(),
            },
            e @ PipelineError::DimensionMismatch { .. } => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "EMBEDDING_SHAPE_MISMATCH",
                message: e.to_string(),
            },
            PipelineError::InvalidInput(msg) => AppError::BadRequest(msg),
            e @ (PipelineError::Io(_) | PipelineError::Json(_)) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "INTERNAL_ERROR",
                message: e.to_string(),
            },
        }
    }
}
