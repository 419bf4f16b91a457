use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder emitted wherever a prop could not be compiled
pub const PROP_PLACEHOLDER: &str = "/* TODO(generator): unable to resolve prop */";

pub fn action_placeholder(action_id: &str) -> String {
    format!("/* TODO(generator): unable to resolve action {} */", action_id)
}

/// Kind of degraded condition met during generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    UnresolvedFunctionProp,
    UnmatchedTemplatePath,
    InvalidTemplatePath,
    UnresolvedTemplateValue,
    UnknownRepeatPropRef,
    ValueTypeMismatch,
    UnresolvedAction,
    UnresolvedEvent,
    UnsupportedReplacement,
    UnsupportedTemplate,
}

impl WarningKind {
    pub fn code(&self) -> &'static str {
        match self {
            WarningKind::UnresolvedFunctionProp => "unresolved-function-prop",
            WarningKind::UnmatchedTemplatePath => "unmatched-template-path",
            WarningKind::InvalidTemplatePath => "invalid-template-path",
            WarningKind::UnresolvedTemplateValue => "unresolved-template-value",
            WarningKind::UnknownRepeatPropRef => "unknown-repeat-prop-ref",
            WarningKind::ValueTypeMismatch => "value-type-mismatch",
            WarningKind::UnresolvedAction => "unresolved-action",
            WarningKind::UnresolvedEvent => "unresolved-event",
            WarningKind::UnsupportedReplacement => "unsupported-replacement",
            WarningKind::UnsupportedTemplate => "unsupported-template",
        }
    }
}

/// A recoverable problem. Generation continued with a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,

    /// Human-readable message
    pub message: String,

    /// Component the problem was found on
    pub component_id: Option<String>,

    /// Prop the problem was found on
    pub prop_name: Option<String>,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            component_id: None,
            prop_name: None,
        }
    }

    pub fn with_component(mut self, id: impl Into<String>) -> Self {
        self.component_id = Some(id.into());
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>) -> Self {
        self.prop_name = Some(name.into());
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)?;
        match (&self.component_id, &self.prop_name) {
            (Some(id), Some(prop)) => write!(f, " ({}.{})", id, prop),
            (Some(id), None) => write!(f, " ({})", id),
            _ => Ok(()),
        }
    }
}
