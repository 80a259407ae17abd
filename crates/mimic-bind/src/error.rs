use thiserror::Error;

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, BindError>;

/// Errors that can occur while validating or encoding bindings.
#[derive(Debug, Error, PartialEq)]
pub enum BindError {
    /// Parameter name is blank.
    #[error("parameter name must not be empty")]
    EmptyParamName,

    /// No element with the given id exists in the document.
    #[error("no element with id '{0}' in the document")]
    ElementNotFound(String),

    /// Gradient bounds are NaN or infinite.
    #[error("gradient bounds must be finite numbers, got min={min} max={max}")]
    NonFiniteBounds { min: f64, max: f64 },
}
