use crate::error::SchemaError;

/// Result type alias for document loading
pub type SchemaResult<T> = Result<T, SchemaError>;
