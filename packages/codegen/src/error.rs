use ditto_schema::RefError;
use thiserror::Error;

/// Errors that make a generation run unusable. Any of these aborts the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    #[error(transparent)]
    Reference(#[from] RefError),

    #[error("Namespace import of '{specifier}' is already bound to '{existing}', cannot also bind '{attempted}'")]
    DuplicateNamespaceImport {
        specifier: String,
        existing: String,
        attempted: String,
    },

    #[error("Default import of '{specifier}' is already bound to '{existing}', cannot also bind '{attempted}'")]
    DuplicateDefaultImport {
        specifier: String,
        existing: String,
        attempted: String,
    },
}

pub type CodegenResult<T> = Result<T, StructuralError>;
