use thiserror::Error;

/// Failures raised by a [`BarStore`](crate::domain::ports::BarStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The write would leave two live records with the same `placeId`.
    #[error("Unique constraint violated for placeId '{place_id}'")]
    UniqueViolation { place_id: String },

    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum BarError {
    #[error("A bar with placeId '{place_id}' already exists")]
    Conflict { place_id: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl BarError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        BarError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        BarError::Validation {
            message: message.into(),
        }
    }
}

impl From<StoreError> for BarError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { place_id } => BarError::Conflict { place_id },
            other => BarError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BarError>;
