use thiserror::Error;

/// Errors raised while loading a page document
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broken component references found in the tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefError {
    #[error("Component '{id}' is referenced{} but missing from componentIndexes", parent_suffix(.parent))]
    Dangling { id: String, parent: Option<String> },

    #[error("Component '{id}' contains itself")]
    Cycle { id: String },
}

impl RefError {
    /// Id of the component the error is about
    pub fn id(&self) -> &str {
        match self {
            RefError::Dangling { id, .. } | RefError::Cycle { id } => id,
        }
    }

    /// Attach the referencing component to a dangling ref
    pub fn with_parent(self, parent: Option<String>) -> Self {
        match self {
            RefError::Dangling { id, .. } => RefError::Dangling { id, parent },
            other => other,
        }
    }
}

fn parent_suffix(parent: &Option<String>) -> String {
    match parent {
        Some(parent) => format!(" by '{}'", parent),
        None => String::new(),
    }
}
