use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use archive_payment_engine::{CaptureFlowError, CatalogApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Invalid request. {0}")]
    ValidationError(String),
    #[error("Payment processing error. {0}")]
    PaymentProviderError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PaymentProviderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<CaptureFlowError> for ServerError {
    fn from(e: CaptureFlowError) -> Self {
        match e {
            CaptureFlowError::ItemNotFound(_) => Self::NoRecordFound(e.to_string()),
            CaptureFlowError::ItemUnavailable(_)
            | CaptureFlowError::FeeMismatch { .. }
            | CaptureFlowError::CapturedAmountMismatch { .. }
            | CaptureFlowError::OrderNotCompleted(_, _)
            | CaptureFlowError::MissingCapturedAmount(_) => Self::ValidationError(e.to_string()),
            CaptureFlowError::ProviderError(p) => Self::PaymentProviderError(p.to_string()),
            CaptureFlowError::DatabaseError(d) => Self::BackendError(format!("Database error: {d}")),
            CaptureFlowError::CatalogError(c) => c.into(),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(d) => Self::BackendError(format!("Database error: {d}")),
            CatalogApiError::QueryError(q) => Self::ValidationError(q),
        }
    }
}
