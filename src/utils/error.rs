use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Product not found: {id}")]
    ProductNotFound { id: String },
}

impl CartError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::IoError(e) => format!("Could not access a file: {}", e),
            CartError::SerializationError(e) => format!("Data is not valid JSON: {}", e),
            CartError::ConfigError { message } => message.clone(),
            CartError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
            CartError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            CartError::MissingConfigError { field } => {
                format!("Setting '{}' is required", field)
            }
            CartError::StorageError { message } => format!("Could not save the cart: {}", message),
            CartError::ProductNotFound { id } => format!("No product with id '{}'", id),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CartError::IoError(_) | CartError::StorageError { .. } => {
                "Check that the data directory exists and is writable"
            }
            CartError::SerializationError(_) => "Fix or remove the malformed JSON file",
            CartError::ConfigError { .. }
            | CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. } => {
                "Review the configuration file against cart.example.toml"
            }
            CartError::ProductNotFound { .. } => "Run `storefront-cart products` to list valid ids",
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
