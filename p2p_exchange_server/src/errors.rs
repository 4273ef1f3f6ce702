use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::error;
use p2p_exchange_engine::ExchangeFlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error. {0}")]
    CouldNotDeserializePayload(String),
    #[error("Invalid request. {0}")]
    InvalidRequest(String),
    #[error("A session_id is required")]
    MissingSessionId,
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CouldNotDeserializePayload(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingSessionId => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<ExchangeFlowError> for ServerError {
    fn from(e: ExchangeFlowError) -> Self {
        match e {
            ExchangeFlowError::AmountTooSmall { .. } |
            ExchangeFlowError::InvalidCard(_) |
            ExchangeFlowError::UnsupportedCurrency(_) |
            ExchangeFlowError::BelowCurrencyMinimum { .. } => Self::InvalidRequest(e.to_string()),
            ExchangeFlowError::NoMatchingOrder { .. } |
            ExchangeFlowError::OrderNotFound(_) |
            ExchangeFlowError::SessionNotFound(_) |
            ExchangeFlowError::UserNotFound(_) |
            ExchangeFlowError::WalletNotFound { .. } => Self::NoRecordFound(e.to_string()),
            ExchangeFlowError::SellerCardUnavailable(_) | ExchangeFlowError::DatabaseError(_) => {
                error!("💻️ Backend failure. {e}");
                Self::BackendError(e.to_string())
            },
        }
    }
}
