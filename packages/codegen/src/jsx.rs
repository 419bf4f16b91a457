use crate::context::{DeferredHandler, GenerationContext, HandlerSource};
use crate::diagnostic::{Warning, WarningKind, PROP_PLACEHOLDER};
use crate::dialect::{Dialect, ReactDialect};
use crate::error::CodegenResult;
use crate::literal::quote;
use crate::props::{bind_reactive_props, compile_prop};
use ditto_schema::{ActionId, ComponentNode, ComponentRef, RefError, ReplacementKind};
use indexmap::IndexMap;
use tracing::debug;

/// A tag with pre-compiled attribute fragments
#[derive(Debug, Clone, PartialEq)]
pub struct TsxNode {
    pub tag: String,
    pub props: Vec<String>,
    pub children: Vec<TsxChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TsxChild {
    Node(TsxNode),
    Lines(Vec<String>),
}

impl TsxNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_props(mut self, props: &[&str]) -> Self {
        self.props.extend(props.iter().map(|p| p.to_string()));
        self
    }

    pub fn with_child(mut self, child: TsxNode) -> Self {
        self.children.push(TsxChild::Node(child));
        self
    }

    pub fn render(&self, dialect: &dyn Dialect) -> Vec<String> {
        let mut body = Vec::new();
        for child in &self.children {
            match child {
                TsxChild::Node(node) => body.extend(node.render(dialect)),
                TsxChild::Lines(lines) => body.extend(lines.iter().cloned()),
            }
        }

        if body.is_empty() {
            return vec![dialect.self_closing_tag(&self.tag, &self.props)];
        }

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(dialect.open_tag(&self.tag, &self.props));
        lines.extend(body);
        lines.push(dialect.close_tag(&self.tag));
        lines
    }
}

/// Render a tag description as React JSX lines
pub fn render_tsx(node: &TsxNode) -> Vec<String> {
    node.render(&ReactDialect)
}

/// Emit the markup for a tree position, collecting hooks and imports into
/// the context on the way.
pub fn emit_node(component_ref: &ComponentRef, ctx: &mut GenerationContext) -> CodegenResult<Vec<String>> {
    emit_ref(component_ref, None, ctx)
}

pub fn emit_ref(
    component_ref: &ComponentRef,
    parent: Option<&ComponentNode>,
    ctx: &mut GenerationContext,
) -> CodegenResult<Vec<String>> {
    if component_ref.is_text {
        return Ok(text_child(&component_ref.current, ctx.dialect).into_iter().collect());
    }

    if let Some(replacement) = &component_ref.replacement {
        match replacement.kind {
            ReplacementKind::Variable => return Ok(vec![ctx.dialect.expression_child(&replacement.target)]),
            ReplacementKind::Module => {
                let mut warning = Warning::new(
                    WarningKind::UnsupportedReplacement,
                    format!("Module replacement '{}' cannot be inlined", replacement.target),
                );
                if let Some(parent) = parent {
                    warning = warning.with_component(&parent.id);
                }
                ctx.warn(warning);
                return Ok(vec![ctx.dialect.comment_child(PROP_PLACEHOLDER)]);
            }
            ReplacementKind::Component => {}
        }
    }

    let doc = ctx.doc;
    let node = doc
        .resolve(component_ref)
        .map_err(|err| err.with_parent(parent.map(|p| p.id.clone())))?;

    if ctx.path.contains(&node.id) {
        return Err(RefError::Cycle { id: node.id.clone() }.into());
    }

    ctx.path.push(node.id.clone());
    let result = emit_element(node, ctx);
    ctx.path.pop();
    let lines = result?;

    match ctx.visibility.get(&node.id) {
        Some(visible) if !lines.is_empty() => {
            let mut wrapped = Vec::with_capacity(lines.len() + 2);
            wrapped.push(ctx.dialect.conditional_open(visible));
            wrapped.extend(lines);
            wrapped.push(ctx.dialect.conditional_close());
            Ok(wrapped)
        }
        _ => Ok(lines),
    }
}

fn emit_element(node: &ComponentNode, ctx: &mut GenerationContext) -> CodegenResult<Vec<String>> {
    debug!(component = %node.id, name = %node.name, "Emitting node");

    if node.is_transparent() {
        let mut lines = Vec::new();
        for child in &node.children {
            lines.extend(emit_ref(child, Some(node), ctx)?);
        }
        return Ok(lines);
    }

    let tag = if node.is_intrinsic() {
        node.name.clone()
    } else {
        let local = ctx.imports.bind_component(
            &node.package_name,
            &node.import_path,
            node.import_type,
            &node.name,
            &mut ctx.symbols,
        )?;
        match node.name.split_once('.') {
            Some((_, member)) => format!("{}.{}", local, member),
            None => local,
        }
    };

    bind_reactive_props(node, ctx);

    let doc = ctx.doc;
    let mut element = TsxNode::new(tag);
    let mut prop_children = Vec::new();
    for entry in doc.props_of(&node.id) {
        let compiled = compile_prop(entry, node, ctx)?;
        element.props.extend(compiled.fragments);
        for hook in compiled.side_effects {
            ctx.push_hook(hook);
        }
        prop_children.extend(compiled.child);
    }

    if let Some(injected) = ctx.injected.get(&node.id).cloned() {
        for (prop, state) in injected {
            element.props.push(ctx.dialect.expr_attribute(&prop, &state));
        }
    }
    element.props.extend(attach_events(node, ctx));

    for child in &node.children {
        element.children.push(TsxChild::Lines(emit_ref(child, Some(node), ctx)?));
    }
    if node.children.is_empty() && !prop_children.is_empty() {
        element.children.push(TsxChild::Lines(prop_children));
    }

    Ok(element.render(ctx.dialect))
}

/// Handler attributes for component events that the node does not already
/// declare as props. Events sharing a trigger share one handler.
fn attach_events(node: &ComponentNode, ctx: &mut GenerationContext) -> Vec<String> {
    let doc = ctx.doc;
    let mut grouped: IndexMap<&'static str, Vec<ActionId>> = IndexMap::new();

    for event in doc.events.values() {
        if event.component_id.as_deref() != Some(node.id.as_str()) || event.trigger.is_lifecycle() {
            continue;
        }
        ctx.attached_events.insert(event.id.clone());

        let trigger = event.trigger.as_str();
        if doc.prop(&node.id, trigger).is_some() {
            ctx.warn(
                Warning::new(
                    WarningKind::UnresolvedEvent,
                    format!("Event '{}' is shadowed by the '{}' prop", event.id, trigger),
                )
                .with_component(&node.id)
                .with_prop(trigger),
            );
            continue;
        }
        grouped
            .entry(trigger)
            .or_default()
            .extend(event.action_list.iter().cloned());
    }

    let mut fragments = Vec::with_capacity(grouped.len());
    for (trigger, actions) in grouped {
        let name = match ctx.binding(&node.id, trigger).cloned() {
            Some(name) => name,
            None => {
                let name = ctx.symbols.allocate_handler(trigger, &node.kind());
                ctx.bind(&node.id, trigger, &name, false);
                ctx.deferred_handlers.push(DeferredHandler {
                    name: name.clone(),
                    component_id: node.id.clone(),
                    trigger: trigger.to_string(),
                    source: HandlerSource::Events(actions),
                });
                name
            }
        };
        fragments.push(ctx.dialect.expr_attribute(trigger, &name));
    }
    fragments
}

/// A text leaf as a markup child. Empty text emits nothing. Text the markup
/// would interpret or collapse, such as brackets or surrounding whitespace,
/// becomes a string expression so the line stays balanced.
pub fn text_child(text: &str, dialect: &dyn Dialect) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let needs_expression = text.trim() != text || text.contains(|c: char| "{}<>()[]\n\r".contains(c));
    if needs_expression {
        Some(dialect.expression_child(&quote(text)))
    } else {
        Some(text.to_string())
    }
}
