use axum::http::StatusCode;
use thiserror::Error;

pub const SUBMISSION_MESSAGE: &str = "Please connect your wallet and enter liters!";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Please install MetaMask!")]
    MissingProvider,
    #[error("wallet connection failed: {0}")]
    Declined(String),
    #[error("wallet provider returned no accounts")]
    NoAccounts,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Please connect your wallet and enter liters!")]
    InvalidSubmission,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
