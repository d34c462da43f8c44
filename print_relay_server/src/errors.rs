use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use print_relay_engine::{AuthError, LatestOrderError, PollerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Missing authorization code.")]
    MissingAuthorizationCode,
    #[error("OAuth failed. {0}")]
    TokenExchangeFailed(String),
    #[error("Already running.")]
    PollerAlreadyRunning,
    #[error("Not running.")]
    PollerNotRunning,
    #[error("The polling interval must be greater than zero.")]
    InvalidPollInterval,
    #[error("No access token or merchant ID found. Please authorize first.")]
    NotAuthorized,
    #[error("Access token expired. Refreshed. Please try again.")]
    AccessTokenExpired,
    #[error("Access token expired and could not be refreshed. Please authorize again.")]
    AccessTokenRevoked,
    #[error("Unable to read the token store. {0}")]
    TokenStoreUnavailable(String),
    #[error("Error fetching latest order. {0}")]
    ProviderError(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingAuthorizationCode => StatusCode::BAD_REQUEST,
            Self::TokenExchangeFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PollerAlreadyRunning => StatusCode::BAD_REQUEST,
            Self::PollerNotRunning => StatusCode::BAD_REQUEST,
            Self::InvalidPollInterval => StatusCode::BAD_REQUEST,
            Self::NotAuthorized => StatusCode::BAD_REQUEST,
            Self::AccessTokenExpired => StatusCode::UNAUTHORIZED,
            Self::AccessTokenRevoked => StatusCode::UNAUTHORIZED,
            Self::TokenStoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ProviderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<PollerError> for ServerError {
    fn from(e: PollerError) -> Self {
        match e {
            PollerError::AlreadyRunning => Self::PollerAlreadyRunning,
            PollerError::NotRunning => Self::PollerNotRunning,
            PollerError::InvalidInterval => Self::InvalidPollInterval,
        }
    }
}

impl From<LatestOrderError> for ServerError {
    fn from(e: LatestOrderError) -> Self {
        match e {
            LatestOrderError::NoCredentials => Self::NotAuthorized,
            LatestOrderError::TokenStore(e) => Self::TokenStoreUnavailable(e.to_string()),
            LatestOrderError::Unauthorized { refreshed: true } => Self::AccessTokenExpired,
            LatestOrderError::Unauthorized { refreshed: false } => Self::AccessTokenRevoked,
            LatestOrderError::Provider(e) => Self::ProviderError(e.to_string()),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(e: AuthError) -> Self {
        Self::TokenExchangeFailed(e.to_string())
    }
}
