use serde::ser::SerializeStruct;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not a valid prompt file: {0}")]
    InvalidDocumentShape(String),
    #[error("normalization failed: {0}")]
    Normalization(String),
    #[error("failed to parse JSON: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("no editable prompt object for {0}")]
    NoEditableTarget(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("api key and model must be configured")]
    CredentialsMissing,
    #[error("provider auth failed")]
    ProviderAuth,
    #[error("provider rate limited")]
    ProviderRateLimited,
    #[error("provider timeout")]
    ProviderTimeout,
    #[error("provider invalid response: {0}")]
    ProviderInvalidResponse(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AppError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidDocumentShape(_) => "INVALID_DOCUMENT_SHAPE",
            Self::Normalization(_) => "NORMALIZATION_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Io(_) => "FILE_READ_ERROR",
            Self::NoEditableTarget(_) => "NO_EDITABLE_TARGET",
            Self::Database(_) => "DATABASE_ERROR",
            Self::CredentialsMissing => "CREDENTIALS_MISSING",
            Self::ProviderAuth => "PROVIDER_AUTH",
            Self::ProviderRateLimited => "PROVIDER_RATE_LIMITED",
            Self::ProviderTimeout => "PROVIDER_TIMEOUT",
            Self::ProviderInvalidResponse(_) => "PROVIDER_INVALID_RESPONSE",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderRateLimited | Self::ProviderTimeout | Self::Network(_)
        )
    }

    /// True for failures of the AI round trip itself (transport, auth, or
    /// unusable model output).
    pub fn is_generation_transport(&self) -> bool {
        matches!(
            self,
            Self::ProviderAuth
                | Self::ProviderRateLimited
                | Self::ProviderTimeout
                | Self::ProviderInvalidResponse(_)
                | Self::Network(_)
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        Self::Database(value.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Self::Database(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
