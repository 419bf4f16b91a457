//! Compilation of one prop entry into JSX attribute source plus the
//! declarations it needs.

use crate::context::{DeferredHandler, GenerationContext, HandlerSource};
use crate::diagnostic::{Warning, WarningKind, PROP_PLACEHOLDER};
use crate::dialect::{Dialect, Site};
use crate::error::CodegenResult;
use crate::hooks::{
    rename_identifiers, scan_dependencies, AssignmentHook, HookRequest, MemoHook, RefHook, Scope, StateHook,
};
use crate::jsx::{emit_ref, text_child};
use crate::literal::{render_inline, render_literal, render_scalar, wrap};
use crate::symbols::{decapitalize, prop_hint, sanitize, SymbolKind};
use ditto_schema::{
    ComponentNode, EventTrigger, Literal, PropValue, PropsEntry, RepeatType, TemplateKeyPath, TemplateType,
    ValueSource, ValueType,
};
use regex::Regex;
use tracing::debug;

/// Source produced for one prop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledProp {
    /// Attribute fragments in emission order (`title="按钮"`)
    pub fragments: Vec<String>,
    pub side_effects: Vec<HookRequest>,
    /// Element child replacing a `children` attribute
    pub child: Option<String>,
}

enum AttrValue {
    Text(String),
    Expr(String),
}

pub fn compile_prop(
    entry: &PropsEntry,
    node: &ComponentNode,
    ctx: &mut GenerationContext,
) -> CodegenResult<CompiledProp> {
    debug!(component = %node.id, prop = %entry.name, source = ?entry.value_source, "Compiling prop");

    if entry.name == "ref" {
        return Ok(compile_ref(node, ctx));
    }

    match entry.value_source {
        ValueSource::Handler => return Ok(compile_handler(entry, node, ctx)),
        ValueSource::UserInput => return Ok(compile_user_input(entry, node, ctx)),
        _ => {}
    }

    // Promoted by an action, or already compiled on an earlier visit
    if let Some(symbol) = ctx.binding(&node.id, &entry.name).cloned() {
        return Ok(finish(&entry.name, AttrValue::Expr(symbol), node, ctx, Vec::new()));
    }

    match entry.value_source {
        ValueSource::State => {
            let (name, hook) = new_state(entry, node, ctx);
            Ok(finish(&entry.name, AttrValue::Expr(name), node, ctx, vec![hook]))
        }
        ValueSource::Computed => Ok(compile_computed(entry, node, ctx)),
        _ => compile_editor_input(entry, node, ctx),
    }
}

/// Allocate state for every `state` and `userInput` prop of a node before its
/// props are compiled, so that change handlers and memos see all setters.
pub fn bind_reactive_props(node: &ComponentNode, ctx: &mut GenerationContext) {
    let doc = ctx.doc;
    for entry in doc.props_of(&node.id) {
        if entry.name == "ref" || !matches!(entry.value_source, ValueSource::State | ValueSource::UserInput) {
            continue;
        }
        let name = match ctx.binding(&node.id, &entry.name).cloned() {
            Some(name) => name,
            None => {
                let (name, hook) = new_state(entry, node, ctx);
                ctx.push_hook(hook);
                name
            }
        };
        if entry.value_source == ValueSource::UserInput {
            record_change_state(ctx, &node.id, &name);
        }
    }
}

fn new_state(entry: &PropsEntry, node: &ComponentNode, ctx: &mut GenerationContext) -> (String, HookRequest) {
    let name = ctx
        .symbols
        .allocate(SymbolKind::State, &prop_hint(&node.kind(), &entry.name));
    ctx.bind(&node.id, &entry.name, &name, true);
    let hook = StateHook::new(name.clone(), Some(entry.value.clone()), entry.value_type);
    (name, HookRequest::State(hook))
}

fn record_change_state(ctx: &mut GenerationContext, component_id: &str, state: &str) {
    let states = ctx.change_states.entry(component_id.to_string()).or_default();
    if !states.iter().any(|known| known == state) {
        states.push(state.to_string());
    }
}

/// State writes fed by a change event argument
pub fn change_assignments(dialect: &dyn Dialect, states: &[String], arg: &str, site: Site) -> Vec<String> {
    let value = format!("{arg}?.target?.value ?? {arg}", arg = arg);
    states
        .iter()
        .map(|state| dialect.assign_state(state, &value, site))
        .collect()
}

fn has_change_handler(node: &ComponentNode, ctx: &GenerationContext) -> bool {
    ctx.doc.prop(&node.id, "onChange").is_some()
        || ctx.doc.events.values().any(|event| {
            event.trigger == EventTrigger::OnChange && event.component_id.as_deref() == Some(node.id.as_str())
        })
}

fn compile_ref(node: &ComponentNode, ctx: &mut GenerationContext) -> CompiledProp {
    let mut side_effects = Vec::new();
    let name = match ctx.binding(&node.id, "ref").cloned() {
        Some(name) => name,
        None => {
            let name = ctx.symbols.allocate(SymbolKind::Ref, &decapitalize(&node.kind()));
            ctx.bind(&node.id, "ref", &name, false);
            side_effects.push(HookRequest::Ref(RefHook::new(name.clone(), "any", Some(PropValue::null()))));
            name
        }
    };
    CompiledProp {
        fragments: vec![ctx.dialect.expr_attribute("ref", &name)],
        side_effects,
        child: None,
    }
}

fn compile_handler(entry: &PropsEntry, node: &ComponentNode, ctx: &mut GenerationContext) -> CompiledProp {
    let target = match &entry.value {
        PropValue::Literal(Literal::String(id)) | PropValue::FunctionSource(id) if !id.trim().is_empty() => {
            id.trim().to_string()
        }
        other => {
            ctx.warn(
                Warning::new(
                    WarningKind::UnresolvedAction,
                    format!("Handler prop holds {} instead of a handler or action id", other.kind_name()),
                )
                .with_component(&node.id)
                .with_prop(&entry.name),
            );
            let placeholder = format!("() => {{ {} }}", PROP_PLACEHOLDER);
            return finish(&entry.name, AttrValue::Expr(placeholder), node, ctx, Vec::new());
        }
    };

    let name = ctx.symbols.allocate_handler(&entry.name, &node.kind());
    ctx.deferred_handlers.push(DeferredHandler {
        name: name.clone(),
        component_id: node.id.clone(),
        trigger: entry.name.clone(),
        source: HandlerSource::Prop(target),
    });
    finish(&entry.name, AttrValue::Expr(name), node, ctx, Vec::new())
}

fn compile_user_input(entry: &PropsEntry, node: &ComponentNode, ctx: &mut GenerationContext) -> CompiledProp {
    let mut side_effects = Vec::new();
    let name = match ctx.binding(&node.id, &entry.name).cloned() {
        Some(name) => name,
        None => {
            let (name, hook) = new_state(entry, node, ctx);
            side_effects.push(hook);
            name
        }
    };
    record_change_state(ctx, &node.id, &name);

    let mut compiled = finish(&entry.name, AttrValue::Expr(name), node, ctx, side_effects);

    let first_input = ctx
        .doc
        .props_of(&node.id)
        .find(|e| e.value_source == ValueSource::UserInput && e.name != "ref")
        .map(|e| e.name == entry.name)
        .unwrap_or(true);
    if first_input && !has_change_handler(node, ctx) {
        let states = ctx.change_states.get(&node.id).cloned().unwrap_or_default();
        let calls = change_assignments(ctx.dialect, &states, "e", Site::Markup);
        let wrapper = match calls.as_slice() {
            [single] => format!("(e: any) => {}", single.trim_end_matches(';')),
            many => format!("(e: any) => {{ {} }}", many.join(" ")),
        };
        compiled.fragments.push(ctx.dialect.expr_attribute("onChange", &wrapper));
    }
    compiled
}

fn compile_computed(entry: &PropsEntry, node: &ComponentNode, ctx: &mut GenerationContext) -> CompiledProp {
    let name = ctx
        .symbols
        .allocate(SymbolKind::Constant, &prop_hint(&node.kind(), &entry.name));
    ctx.bind(&node.id, &entry.name, &name, true);
    ctx.memo_owners.insert(name.clone(), node.id.clone());

    let hook = MemoHook::new(Some(name.clone()), memo_body(&entry.value), Vec::new());
    finish(&entry.name, AttrValue::Expr(name), node, ctx, vec![HookRequest::Memo(hook)])
}

/// Body of a memo computing a prop: the expression of a parameterless arrow,
/// or the value itself
fn memo_body(value: &PropValue) -> Vec<String> {
    let source = match value {
        PropValue::FunctionSource(source) | PropValue::Literal(Literal::String(source)) => source.trim(),
        PropValue::Object(_) | PropValue::Array(_) => return wrap("return ", render_literal(value), ";"),
        other => return render_literal(other),
    };

    let arrow_body = source
        .strip_prefix("()")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix("=>"))
        .map(str::trim);

    match arrow_body {
        Some(body) if body.starts_with('{') && body.ends_with('}') => body[1..body.len() - 1]
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        Some(body) => vec![body.to_string()],
        None => source.lines().map(|line| line.trim().to_string()).collect(),
    }
}

fn compile_editor_input(
    entry: &PropsEntry,
    node: &ComponentNode,
    ctx: &mut GenerationContext,
) -> CodegenResult<CompiledProp> {
    if !entry.template_key_paths_reg.is_empty() {
        if let Some(compiled) = compile_template(entry, node, ctx)? {
            return Ok(compiled);
        }
    }

    if entry.value_type == ValueType::Function {
        return Ok(compile_function(entry, node, ctx));
    }

    if !entry.value.matches_type(entry.value_type) {
        ctx.warn(
            Warning::new(
                WarningKind::ValueTypeMismatch,
                format!(
                    "Declared {:?} but the value is {}",
                    entry.value_type,
                    entry.value.kind_name()
                ),
            )
            .with_component(&node.id)
            .with_prop(&entry.name),
        );
    }

    let mut side_effects = Vec::new();
    let value = match &entry.value {
        PropValue::Literal(Literal::String(text)) => AttrValue::Text(text.clone()),
        PropValue::Literal(literal) => AttrValue::Expr(render_scalar(literal)),
        PropValue::FunctionSource(source) => AttrValue::Expr(source.trim().to_string()),
        container if container.is_empty_container() => AttrValue::Expr(render_inline(container)),
        container => {
            let name = hoist(entry, node, ctx, render_literal(container), Scope::Module, &mut side_effects);
            AttrValue::Expr(name)
        }
    };
    Ok(finish(&entry.name, value, node, ctx, side_effects))
}

fn compile_function(entry: &PropsEntry, node: &ComponentNode, ctx: &mut GenerationContext) -> CompiledProp {
    let mut side_effects = Vec::new();
    let expr = match &entry.value {
        PropValue::FunctionSource(source) if !source.trim().is_empty() => {
            if source.trim().contains('\n') {
                let lines = render_literal(&entry.value);
                hoist(entry, node, ctx, lines, Scope::Component, &mut side_effects)
            } else {
                source.trim().to_string()
            }
        }
        other => {
            ctx.warn(
                Warning::new(
                    WarningKind::UnresolvedFunctionProp,
                    format!("Function prop has no source and no template match ({})", other.kind_name()),
                )
                .with_component(&node.id)
                .with_prop(&entry.name),
            );
            format!("() => {{ {} }}", PROP_PLACEHOLDER)
        }
    };

    let states = match entry.name.as_str() {
        "onChange" => ctx.change_states.get(&node.id).cloned().unwrap_or_default(),
        _ => Vec::new(),
    };
    let expr = if states.is_empty() {
        expr
    } else {
        let calls = change_assignments(ctx.dialect, &states, "args[0]", Site::Markup);
        format!("(...args: any[]) => {{ {} ({})(...args); }}", calls.join(" "), expr)
    };
    finish(&entry.name, AttrValue::Expr(expr), node, ctx, side_effects)
}

/// Declare a constant for a prop value and bind the prop to it
fn hoist(
    entry: &PropsEntry,
    node: &ComponentNode,
    ctx: &mut GenerationContext,
    value: Vec<String>,
    scope: Scope,
    side_effects: &mut Vec<HookRequest>,
) -> String {
    let name = ctx
        .symbols
        .allocate(SymbolKind::Constant, &prop_hint(&node.kind(), &entry.name));
    ctx.bind(&node.id, &entry.name, &name, false);
    side_effects.push(HookRequest::Assignment(AssignmentHook::new(name.clone(), value, scope)));
    name
}

fn finish(
    name: &str,
    value: AttrValue,
    node: &ComponentNode,
    ctx: &GenerationContext,
    side_effects: Vec<HookRequest>,
) -> CompiledProp {
    if name == "children" && node.children.is_empty() {
        let child = match value {
            AttrValue::Text(text) => text_child(&text, ctx.dialect),
            AttrValue::Expr(expr) => Some(ctx.dialect.expression_child(&expr)),
        };
        return CompiledProp {
            fragments: Vec::new(),
            side_effects,
            child,
        };
    }

    let fragment = match value {
        AttrValue::Text(text) => ctx.dialect.text_attribute(name, &text),
        AttrValue::Expr(expr) => ctx.dialect.expr_attribute(name, &expr),
    };
    CompiledProp {
        fragments: vec![fragment],
        side_effects,
        child: None,
    }
}

struct TemplateRule<'r> {
    spec: &'r TemplateKeyPath,
    matcher: Regex,
    matched: bool,
}

/// Render a prop value whose template key paths mark markup positions.
/// Returns `None` when no rule matches anywhere in the value.
fn compile_template(
    entry: &PropsEntry,
    node: &ComponentNode,
    ctx: &mut GenerationContext,
) -> CodegenResult<Option<CompiledProp>> {
    let mut rules = Vec::with_capacity(entry.template_key_paths_reg.len());
    for spec in &entry.template_key_paths_reg {
        match Regex::new(&spec.path) {
            Ok(matcher) => rules.push(TemplateRule { spec, matcher, matched: false }),
            Err(err) => ctx.warn(
                Warning::new(
                    WarningKind::InvalidTemplatePath,
                    format!("Template path '{}' is not a valid pattern: {}", spec.path, err),
                )
                .with_component(&node.id)
                .with_prop(&entry.name),
            ),
        }

        if let Some(reference) = &spec.repeat_prop_ref {
            if ctx.doc.prop(&node.id, reference).is_none() {
                ctx.warn(
                    Warning::new(
                        WarningKind::UnknownRepeatPropRef,
                        format!("Repeat source '{}' is not a prop of this component", reference),
                    )
                    .with_component(&node.id)
                    .with_prop(&entry.name),
                );
            }
        }
    }

    let mut walk = TemplateWalk { rules };
    let lines = walk.render_value(&entry.value, "", None, node, ctx)?;

    for rule in walk.rules.iter().filter(|rule| !rule.matched) {
        ctx.warn(
            Warning::new(
                WarningKind::UnmatchedTemplatePath,
                format!("Template path '{}' matched nothing", rule.spec.path),
            )
            .with_component(&node.id)
            .with_prop(&entry.name),
        );
    }

    if !walk.rules.iter().any(|rule| rule.matched) {
        return Ok(None);
    }

    let mut side_effects = Vec::new();
    let name = hoist(entry, node, ctx, lines, Scope::Component, &mut side_effects);
    Ok(Some(finish(&entry.name, AttrValue::Expr(name), node, ctx, side_effects)))
}

struct TemplateWalk<'r> {
    rules: Vec<TemplateRule<'r>>,
}

impl<'r> TemplateWalk<'r> {
    fn render_value(
        &mut self,
        value: &PropValue,
        path: &str,
        parent: Option<&PropValue>,
        node: &ComponentNode,
        ctx: &mut GenerationContext,
    ) -> CodegenResult<Vec<String>> {
        if let Some(rule) = self.rules.iter_mut().find(|rule| rule.matcher.is_match(path)) {
            rule.matched = true;
            let spec = rule.spec;
            debug!(path = %path, pattern = %spec.path, "Template path matched");
            return render_match(spec, value, parent, node, ctx);
        }

        match value {
            PropValue::Object(entries) if !entries.is_empty() => {
                let mut lines = vec!["{".to_string()];
                let last = entries.len() - 1;
                for (i, (key, entry)) in entries.iter().enumerate() {
                    let child_path = if path.is_empty() { key.clone() } else { format!("{}.{}", path, key) };
                    let inner = self.render_value(entry, &child_path, Some(value), node, ctx)?;
                    let prefix = format!("{}: ", crate::literal::render_key(key));
                    lines.extend(wrap(&prefix, inner, if i < last { "," } else { "" }));
                }
                lines.push("}".to_string());
                Ok(lines)
            }
            PropValue::Array(items) if !items.is_empty() => {
                let mut lines = vec!["[".to_string()];
                let last = items.len() - 1;
                for (i, item) in items.iter().enumerate() {
                    let child_path = format!("{}[{}]", path, i);
                    let inner = self.render_value(item, &child_path, Some(value), node, ctx)?;
                    lines.extend(wrap("", inner, if i < last { "," } else { "" }));
                }
                lines.push("]".to_string());
                Ok(lines)
            }
            other => Ok(render_literal(other)),
        }
    }
}

fn render_match(
    spec: &TemplateKeyPath,
    value: &PropValue,
    parent: Option<&PropValue>,
    node: &ComponentNode,
    ctx: &mut GenerationContext,
) -> CodegenResult<Vec<String>> {
    let placeholder = || match spec.template_type {
        TemplateType::Object => vec![format!("null {}", PROP_PLACEHOLDER)],
        TemplateType::Function => vec![format!("() => null {}", PROP_PLACEHOLDER)],
    };

    if !ctx.dialect.inline_markup() {
        ctx.warn(
            Warning::new(
                WarningKind::UnsupportedTemplate,
                format!(
                    "Template at '{}' needs markup inside script code, which {} cannot express",
                    spec.path,
                    ctx.dialect.name()
                ),
            )
            .with_component(&node.id),
        );
        return Ok(placeholder());
    }

    let refs = match value.as_component_refs() {
        Some(refs) if !refs.is_empty() => refs,
        _ => {
            ctx.warn(
                Warning::new(
                    WarningKind::UnresolvedTemplateValue,
                    format!("Template at '{}' holds {} instead of components", spec.path, value.kind_name()),
                )
                .with_component(&node.id),
            );
            return Ok(placeholder());
        }
    };

    let mut jsx = Vec::new();
    for component_ref in &refs {
        jsx.extend(emit_ref(component_ref, Some(node), ctx)?);
    }
    if jsx.len() > 1 && refs.len() > 1 {
        jsx.insert(0, ctx.dialect.fragment_open());
        jsx.push(ctx.dialect.fragment_close());
    }
    if jsx.is_empty() {
        jsx.push("null".to_string());
    }

    let mut lines = Vec::new();
    match spec.template_type {
        TemplateType::Object => {
            lines.push("(".to_string());
            lines.extend(jsx);
            lines.push(")".to_string());
        }
        TemplateType::Function => {
            lines.push("(...args: any[]) => {".to_string());
            lines.extend(repeat_bindings(spec, parent));
            lines.push("return (".to_string());
            lines.extend(jsx);
            lines.push(");".to_string());
            lines.push("}".to_string());
        }
    }
    Ok(lines)
}

/// Bindings giving a per-row or per-item renderer access to its arguments
fn repeat_bindings(spec: &TemplateKeyPath, parent: Option<&PropValue>) -> Vec<String> {
    let repeat = match spec.repeat_type {
        Some(repeat) => repeat,
        None => return Vec::new(),
    };

    let (item, default_index) = match repeat {
        RepeatType::Table => ("record", 1),
        RepeatType::List => ("item", 0),
    };
    let item_index = spec.item_index_in_args.unwrap_or(default_index);

    let mut lines = vec![format!("const {} = args[{}];", item, item_index)];
    if let Some(index_key) = &spec.index_key {
        lines.push(format!("const {} = args[{}];", sanitize(index_key), item_index + 1));
    }
    if repeat == RepeatType::Table {
        if let Some(column_key) = &spec.column_key {
            let column = parent
                .and_then(|column| column.get("key").or_else(|| column.get("dataIndex")))
                .map(render_inline)
                .unwrap_or_else(|| "undefined".to_string());
            lines.push(format!("const {} = {};", sanitize(column_key), column));
        }
    }
    lines
}

/// Rewrite memo bodies against the bindings of their component and collect
/// their dependencies. Runs after the walk, once every binding exists.
pub fn finalize_memos(ctx: &mut GenerationContext) {
    let GenerationContext {
        hooks,
        bindings,
        reactive,
        memo_owners,
        ..
    } = ctx;

    for hook in hooks.iter_mut() {
        let memo = match hook {
            HookRequest::Memo(memo) => memo,
            _ => continue,
        };
        let own = memo.name.clone();
        if let Some(owner) = own.as_ref().and_then(|name| memo_owners.get(name)) {
            let rename = |ident: &str| -> Option<String> {
                if reactive.contains(ident) {
                    return None;
                }
                bindings
                    .get(&(owner.clone(), ident.to_string()))
                    .filter(|symbol| reactive.contains(*symbol) && Some(*symbol) != own.as_ref())
                    .cloned()
            };
            memo.body = memo.body.iter().map(|line| rename_identifiers(line, &rename)).collect();
        }
        memo.deps = scan_dependencies(&memo.body, reactive, own.as_deref());
    }
}
