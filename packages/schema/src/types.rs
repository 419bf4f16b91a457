use crate::error::RefError;
use crate::result::SchemaResult;
use crate::value::PropValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

pub type ComponentId = String;
pub type ActionId = String;
pub type HandlerId = String;
pub type EventId = String;

/// Root of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub child: ComponentRef,
    #[serde(default)]
    pub component_indexes: IndexMap<ComponentId, ComponentNode>,
    #[serde(default)]
    pub props: IndexMap<ComponentId, IndexMap<String, PropsEntry>>,
    #[serde(default)]
    pub actions: IndexMap<ActionId, Action>,
    #[serde(default)]
    pub events: IndexMap<EventId, PageEvent>,
    #[serde(default)]
    pub handlers: IndexMap<HandlerId, Vec<ActionId>>,
    #[serde(default)]
    pub http_services: IndexMap<String, HttpService>,
    #[serde(default)]
    pub storage: IndexMap<String, Value>,
    #[serde(default)]
    pub query: IndexMap<String, String>,
}

impl PageDocument {
    pub fn from_json(source: &str) -> SchemaResult<Self> {
        let mut document: PageDocument = serde_json::from_str(source)?;
        document.normalize();
        Ok(document)
    }

    pub fn load(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Fill in prop names that the editor left implicit in the map key
    fn normalize(&mut self) {
        for entries in self.props.values_mut() {
            for (key, entry) in entries.iter_mut() {
                if entry.name.is_empty() {
                    entry.name = key.clone();
                }
            }
        }
    }

    pub fn component(&self, id: &str) -> Option<&ComponentNode> {
        self.component_indexes.get(id)
    }

    /// Resolve a non-text ref to the node it renders, following a component
    /// replacement to its target
    pub fn resolve(&self, component_ref: &ComponentRef) -> Result<&ComponentNode, RefError> {
        let id = match &component_ref.replacement {
            Some(replacement) if replacement.kind == ReplacementKind::Component => &replacement.target,
            _ => &component_ref.current,
        };
        self.component(id).ok_or_else(|| RefError::Dangling {
            id: id.clone(),
            parent: None,
        })
    }

    /// Props of a component in declared order
    pub fn props_of<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a PropsEntry> + 'a {
        self.props.get(id).into_iter().flat_map(|entries| entries.values())
    }

    pub fn prop(&self, id: &str, name: &str) -> Option<&PropsEntry> {
        self.props_of(id).find(|entry| entry.name == name)
    }
}

/// One node of the component tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub id: ComponentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub import_path: String,
    #[serde(default)]
    pub import_type: ImportType,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub feature: ComponentFeature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ComponentId>,
    #[serde(default)]
    pub children: Vec<ComponentRef>,
}

impl ComponentNode {
    /// Plain HTML elements carry no package and need no import
    pub fn is_intrinsic(&self) -> bool {
        self.package_name.trim().is_empty()
    }

    pub fn is_transparent(&self) -> bool {
        self.feature == ComponentFeature::Transparent
    }

    /// PascalCase component kind without member dots (`Input.Search` → `InputSearch`)
    pub fn kind(&self) -> String {
        self.name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportType {
    Default,
    #[default]
    #[serde(alias = "object")]
    Named,
    #[serde(alias = "*")]
    Namespace,
}

/// Structural classifier used by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentFeature {
    Root,
    Container,
    Slot,
    #[default]
    Solid,
    Transparent,
    BlackBox,
    WithSlots,
    #[serde(other)]
    Other,
}

/// Pointer from a tree position to a node, or an inline text leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    pub current: String,
    #[serde(default)]
    pub is_text: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<Replacement>,
}

impl ComponentRef {
    pub fn node(id: impl Into<String>) -> Self {
        Self {
            current: id.into(),
            is_text: false,
            config_name: None,
            replacement: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            current: text.into(),
            is_text: true,
            config_name: None,
            replacement: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    #[serde(rename = "type")]
    pub kind: ReplacementKind,
    #[serde(rename = "ref")]
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplacementKind {
    Variable,
    Component,
    Module,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueSource {
    #[default]
    EditorInput,
    State,
    UserInput,
    Computed,
    Handler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Function,
}

impl ValueType {
    /// Best guess when the document does not declare a type
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
            Value::Null | Value::String(_) => ValueType::String,
        }
    }
}

/// Schema entry of one prop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPropsEntry", into = "RawPropsEntry")]
pub struct PropsEntry {
    pub name: String,
    pub value: PropValue,
    pub value_source: ValueSource,
    pub value_type: ValueType,
    pub template_key_paths_reg: Vec<TemplateKeyPath>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPropsEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    value_source: ValueSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_type: Option<ValueType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    template_key_paths_reg: Vec<TemplateKeyPath>,
}

impl From<RawPropsEntry> for PropsEntry {
    fn from(raw: RawPropsEntry) -> Self {
        let value_type = raw.value_type.unwrap_or_else(|| ValueType::infer(&raw.value));
        Self {
            name: raw.name,
            value: PropValue::from_json(raw.value, value_type),
            value_source: raw.value_source,
            value_type,
            template_key_paths_reg: raw.template_key_paths_reg,
        }
    }
}

impl From<PropsEntry> for RawPropsEntry {
    fn from(entry: PropsEntry) -> Self {
        Self {
            name: entry.name,
            value: entry.value.to_json(),
            value_source: entry.value_source,
            value_type: Some(entry.value_type),
            template_key_paths_reg: entry.template_key_paths_reg,
        }
    }
}

/// A regex-declared location inside a prop value that is rendered as markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateKeyPath {
    pub path: String,
    #[serde(rename = "type", default)]
    pub template_type: TemplateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_type: Option<RepeatType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_prop_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_index_in_args: Option<usize>,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateType {
    #[default]
    Object,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepeatType {
    List,
    Table,
}

/// An action referenced from handlers, events and handler-bound props
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: ActionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    /// Decode the variant-specific payload
    pub fn kind(&self) -> Result<ActionKind, serde_json::Error> {
        let payload = self.payload.clone();
        Ok(match self.action_type {
            ActionType::StateTransition => ActionKind::StateTransition(serde_json::from_value(payload)?),
            ActionType::HttpRequest => ActionKind::HttpRequest(serde_json::from_value(payload)?),
            ActionType::ExternalPageOpen => ActionKind::ExternalPageOpen(serde_json::from_value(payload)?),
            ActionType::OpenLayer => ActionKind::OpenLayer(serde_json::from_value(payload)?),
            ActionType::CloseLayer => ActionKind::CloseLayer(serde_json::from_value(payload)?),
            ActionType::PageRedirection => ActionKind::PageRedirection(serde_json::from_value(payload)?),
            ActionType::VisibilityToggle => ActionKind::VisibilityToggle(serde_json::from_value(payload)?),
            ActionType::DataConversion => ActionKind::DataConversion(serde_json::from_value(payload)?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    StateTransition,
    HttpRequest,
    ExternalPageOpen,
    OpenLayer,
    CloseLayer,
    PageRedirection,
    VisibilityToggle,
    DataConversion,
}

/// Decoded action payloads
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    StateTransition(StateTransitionPayload),
    HttpRequest(HttpRequestPayload),
    ExternalPageOpen(LinkPayload),
    OpenLayer(TargetPayload),
    CloseLayer(TargetPayload),
    PageRedirection(LinkPayload),
    VisibilityToggle(TargetPayload),
    DataConversion(DataConversionPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTransitionPayload {
    pub target: ComponentId,
    #[serde(default)]
    pub props: IndexMap<String, TransitionProp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionProp {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HttpRequestPayload {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub headers: Option<IndexMap<String, Value>>,
    #[serde(default)]
    pub params: Option<IndexMap<String, Value>>,
    #[serde(default)]
    pub query: Option<IndexMap<String, Value>>,
    #[serde(default)]
    pub data: Option<IndexMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPayload {
    pub href: String,
    #[serde(default)]
    pub target: LinkTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkTarget {
    #[serde(rename = "_blank")]
    Blank,
    #[default]
    #[serde(rename = "_self")]
    SameWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPayload {
    pub target: ComponentId,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataConversionPayload {
    #[serde(default)]
    pub code: Option<String>,
}

/// Lifecycle, periodic or component event binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEvent {
    pub id: EventId,
    pub trigger: EventTrigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<ComponentId>,
    #[serde(default)]
    pub action_list: Vec<ActionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTrigger {
    OnClick,
    OnDoubleClick,
    OnContextmenu,
    OnMouseEnter,
    OnMouseLeave,
    OnScroll,
    OnBlur,
    OnChange,
    OnPressEnter,
    OnFinish,
    OnCancel,
    OnOk,
    Interval,
    Onload,
    Onunload,
    OnMount,
    OnUnmount,
}

impl EventTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTrigger::OnClick => "onClick",
            EventTrigger::OnDoubleClick => "onDoubleClick",
            EventTrigger::OnContextmenu => "onContextmenu",
            EventTrigger::OnMouseEnter => "onMouseEnter",
            EventTrigger::OnMouseLeave => "onMouseLeave",
            EventTrigger::OnScroll => "onScroll",
            EventTrigger::OnBlur => "onBlur",
            EventTrigger::OnChange => "onChange",
            EventTrigger::OnPressEnter => "onPressEnter",
            EventTrigger::OnFinish => "onFinish",
            EventTrigger::OnCancel => "onCancel",
            EventTrigger::OnOk => "onOk",
            EventTrigger::Interval => "interval",
            EventTrigger::Onload => "onload",
            EventTrigger::Onunload => "onunload",
            EventTrigger::OnMount => "onMount",
            EventTrigger::OnUnmount => "onUnmount",
        }
    }

    /// Page-level triggers that become effects instead of element attributes
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            EventTrigger::Interval
                | EventTrigger::Onload
                | EventTrigger::Onunload
                | EventTrigger::OnMount
                | EventTrigger::OnUnmount
        )
    }
}

/// Named request template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpService {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Options,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests of this method carry a body
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete)
    }
}
