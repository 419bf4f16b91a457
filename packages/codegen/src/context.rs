use crate::diagnostic::Warning;
use crate::dialect::Dialect;
use crate::hooks::HookRequest;
use crate::imports::ImportRegistry;
use crate::symbols::SymbolAllocator;
use ditto_schema::{ActionId, ComponentId, PageDocument};
use indexmap::{IndexMap, IndexSet};
use tracing::warn;

/// Where the actions of a deferred handler come from
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerSource {
    /// A prop whose value names a handler or an action
    Prop(String),
    /// Component events bound to the same trigger
    Events(Vec<ActionId>),
}

/// A handler whose body is lowered once the walk is complete
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredHandler {
    pub name: String,
    pub component_id: ComponentId,
    pub trigger: String,
    pub source: HandlerSource,
}

/// All state of one generation run.
///
/// Created fresh by every call to `generate_page_code` and threaded through
/// the walk by `&mut`.
pub struct GenerationContext<'a> {
    pub doc: &'a PageDocument,
    pub dialect: &'a dyn Dialect,
    pub symbols: SymbolAllocator,
    pub imports: ImportRegistry,
    pub hooks: Vec<HookRequest>,
    pub warnings: Vec<Warning>,

    /// (component, prop) → symbol the prop is bound to
    pub bindings: IndexMap<(ComponentId, String), String>,
    /// Symbols whose value changes between renders
    pub reactive: IndexSet<String>,
    /// Promoted props the node does not declare, emitted as extra attributes
    pub injected: IndexMap<ComponentId, Vec<(String, String)>>,
    /// component → state controlling whether it is rendered
    pub visibility: IndexMap<ComponentId, String>,
    /// component → states fed by its change event
    pub change_states: IndexMap<ComponentId, Vec<String>>,
    /// memo name → owning component
    pub memo_owners: IndexMap<String, ComponentId>,
    pub deferred_handlers: Vec<DeferredHandler>,
    /// Component events already attached to a rendered element
    pub attached_events: IndexSet<String>,
    /// Ids on the current walk path
    pub path: Vec<ComponentId>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(doc: &'a PageDocument, dialect: &'a dyn Dialect) -> Self {
        Self {
            doc,
            dialect,
            symbols: SymbolAllocator::with_reserved(dialect.reserved_names()),
            imports: ImportRegistry::new(),
            hooks: Vec::new(),
            warnings: Vec::new(),
            bindings: IndexMap::new(),
            reactive: IndexSet::new(),
            injected: IndexMap::new(),
            visibility: IndexMap::new(),
            change_states: IndexMap::new(),
            memo_owners: IndexMap::new(),
            deferred_handlers: Vec::new(),
            attached_events: IndexSet::new(),
            path: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: Warning) {
        warn!(kind = warning.kind.code(), "{}", warning);
        self.warnings.push(warning);
    }

    pub fn binding(&self, component_id: &str, prop: &str) -> Option<&String> {
        self.bindings.get(&(component_id.to_string(), prop.to_string()))
    }

    pub fn bind(&mut self, component_id: &str, prop: &str, symbol: &str, reactive: bool) {
        self.bindings
            .insert((component_id.to_string(), prop.to_string()), symbol.to_string());
        if reactive {
            self.reactive.insert(symbol.to_string());
        }
    }

    pub fn push_hook(&mut self, hook: HookRequest) -> usize {
        self.hooks.push(hook);
        self.hooks.len() - 1
    }
}

/// Line writer for the assembled module, with block re-indentation
pub struct CodeWriter {
    buffer: String,
    indent_level: usize,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    pub fn add_line(&mut self, text: &str) {
        if text.is_empty() {
            self.buffer.push('\n');
            return;
        }
        self.buffer.push_str(&"  ".repeat(self.indent_level));
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Write flat lines, restoring their nesting relative to the current level
    pub fn add_block(&mut self, lines: &[String]) {
        for line in reindent(lines, 0) {
            self.add_line(&line);
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn get_output(&self) -> String {
        self.buffer.clone()
    }

    pub fn into_output(self) -> String {
        self.buffer
    }
}

/// Re-indent flat generated lines by two spaces per nesting level.
///
/// Nesting follows bracket balance outside strings and comments, plus JSX
/// element open/close lines.
pub fn reindent(lines: &[String], base: usize) -> Vec<String> {
    let mut depth = base;
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.push(String::new());
            continue;
        }

        match jsx_shape(trimmed) {
            Some(JsxShape::Open) => {
                out.push(indented(trimmed, depth));
                depth += 1;
            }
            Some(JsxShape::Close) => {
                depth = depth.saturating_sub(1).max(base);
                out.push(indented(trimmed, depth));
            }
            Some(JsxShape::Leaf) => out.push(indented(trimmed, depth)),
            None => {
                let starts_closed = trimmed.starts_with(&[')', ']', '}'][..]);
                if starts_closed {
                    depth = depth.saturating_sub(1).max(base);
                }
                out.push(indented(trimmed, depth));
                let net = bracket_balance(trimmed) + i32::from(starts_closed);
                if net > 0 {
                    depth += 1;
                }
            }
        }
    }
    out
}

enum JsxShape {
    Open,
    Close,
    Leaf,
}

fn jsx_shape(line: &str) -> Option<JsxShape> {
    if !line.starts_with('<') {
        return None;
    }
    if line.starts_with("<!--") {
        Some(JsxShape::Leaf)
    } else if line.starts_with("</") {
        Some(JsxShape::Close)
    } else if line.ends_with("/>") {
        Some(JsxShape::Leaf)
    } else if line.ends_with('>') {
        Some(JsxShape::Open)
    } else {
        Some(JsxShape::Leaf)
    }
}

fn indented(text: &str, depth: usize) -> String {
    format!("{}{}", "  ".repeat(depth), text)
}

fn bracket_balance(line: &str) -> i32 {
    let mut balance = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '/' if chars.peek() == Some(&'/') => break,
            '(' | '[' | '{' => balance += 1,
            ')' | ']' | '}' => balance -= 1,
            _ => {}
        }
    }
    balance
}
