//! Lowering of page actions into handler bodies and lifecycle effects.

use crate::context::{GenerationContext, HandlerSource};
use crate::diagnostic::{action_placeholder, Warning, WarningKind};
use crate::dialect::Site;
use crate::hooks::{awaits, Cleanup, EffectHook, HandlerHook, HookRequest, StateHook};
use crate::literal::{quote, render_inline};
use crate::props::change_assignments;
use crate::symbols::{decapitalize, prop_hint, SymbolKind};
use ditto_schema::{
    Action, ActionKind, EventTrigger, HttpRequestPayload, LinkTarget, PageDocument, PropValue, TargetPayload,
    ValueType,
};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Allocate the state that actions write to, before the tree is walked.
///
/// Visibility toggles get a `<kind>Visible` flag, layer actions promote the
/// target's `open` (or `visible`) prop and state transitions promote every
/// prop they set.
pub fn prescan(ctx: &mut GenerationContext) {
    let doc = ctx.doc;
    for action in doc.actions.values() {
        let kind = match action.kind() {
            Ok(kind) => kind,
            Err(err) => {
                ctx.warn(Warning::new(
                    WarningKind::UnresolvedAction,
                    format!("Action '{}' has a malformed payload: {}", action.id, err),
                ));
                continue;
            }
        };

        match kind {
            ActionKind::VisibilityToggle(TargetPayload { target }) => {
                if ctx.visibility.contains_key(&target) {
                    continue;
                }
                let node = match doc.component(&target) {
                    Some(node) => node,
                    None => {
                        missing_target(ctx, action, &target);
                        continue;
                    }
                };
                let name = ctx
                    .symbols
                    .allocate(SymbolKind::State, &format!("{}Visible", decapitalize(&node.kind())));
                ctx.reactive.insert(name.clone());
                ctx.push_hook(HookRequest::State(StateHook::new(
                    name.clone(),
                    Some(PropValue::bool(true)),
                    ValueType::Boolean,
                )));
                ctx.visibility.insert(target, name);
            }
            ActionKind::OpenLayer(TargetPayload { target }) | ActionKind::CloseLayer(TargetPayload { target }) => {
                let prop = layer_prop(doc, &target);
                promote(ctx, action, &target, prop, Some(PropValue::bool(false)), ValueType::Boolean);
            }
            ActionKind::StateTransition(payload) => {
                for transition in payload.props.values() {
                    let value_type = ValueType::infer(&transition.value);
                    promote(ctx, action, &payload.target, &transition.name, None, value_type);
                }
            }
            _ => {}
        }
    }
}

/// Prop controlling whether a layer is open
fn layer_prop(doc: &PageDocument, target: &str) -> &'static str {
    if doc.prop(target, "open").is_none() && doc.prop(target, "visible").is_some() {
        "visible"
    } else {
        "open"
    }
}

/// Turn a component prop into state. Props the node does not declare are
/// injected as attributes when the node is emitted.
fn promote(
    ctx: &mut GenerationContext,
    action: &Action,
    target: &str,
    prop: &str,
    fallback: Option<PropValue>,
    fallback_type: ValueType,
) {
    if ctx.binding(target, prop).is_some() {
        return;
    }
    let doc = ctx.doc;
    let node = match doc.component(target) {
        Some(node) => node,
        None => {
            missing_target(ctx, action, target);
            return;
        }
    };

    let name = ctx.symbols.allocate(SymbolKind::State, &prop_hint(&node.kind(), prop));
    ctx.bind(target, prop, &name, true);
    debug!(component = %target, prop = %prop, state = %name, "Promoting prop to state");

    let hook = match doc.prop(target, prop) {
        Some(entry) => StateHook::new(name.clone(), Some(entry.value.clone()), entry.value_type),
        None => {
            ctx.injected
                .entry(target.to_string())
                .or_default()
                .push((prop.to_string(), name.clone()));
            StateHook::new(name, fallback, fallback_type)
        }
    };
    ctx.push_hook(HookRequest::State(hook));
}

fn missing_target(ctx: &mut GenerationContext, action: &Action, target: &str) {
    ctx.warn(
        Warning::new(
            WarningKind::UnresolvedAction,
            format!("Action '{}' targets missing component '{}'", action.id, target),
        )
        .with_component(target),
    );
}

fn unresolved(ctx: &mut GenerationContext, id: &str, reason: String) -> Vec<String> {
    ctx.warn(Warning::new(WarningKind::UnresolvedAction, reason));
    vec![action_placeholder(id)]
}

/// Statements performing a list of actions in order
pub fn lower_actions(action_ids: &[String], ctx: &mut GenerationContext) -> Vec<String> {
    let doc = ctx.doc;
    let mut lines = Vec::new();
    for id in action_ids {
        let action = match doc.actions.get(id) {
            Some(action) => action,
            None => {
                lines.extend(unresolved(ctx, id, format!("Action '{}' is not defined", id)));
                continue;
            }
        };
        match action.kind() {
            Ok(kind) => lines.extend(lower_action(id, &kind, ctx)),
            // reported by the prescan
            Err(_) => lines.push(action_placeholder(id)),
        }
    }
    lines
}

fn lower_action(id: &str, kind: &ActionKind, ctx: &mut GenerationContext) -> Vec<String> {
    match kind {
        ActionKind::StateTransition(payload) => {
            let mut lines = Vec::with_capacity(payload.props.len());
            for transition in payload.props.values() {
                match ctx.binding(&payload.target, &transition.name).cloned() {
                    Some(state) => lines.push(ctx.dialect.assign_state(
                        &state,
                        &render_inline(&PropValue::from(transition.value.clone())),
                        Site::Script,
                    )),
                    None => lines.extend(unresolved(
                        ctx,
                        id,
                        format!("Action '{}' sets '{}' on an unknown component", id, transition.name),
                    )),
                }
            }
            lines
        }
        ActionKind::VisibilityToggle(TargetPayload { target }) => match ctx.visibility.get(target).cloned() {
            Some(state) => vec![ctx.dialect.toggle_state(&state)],
            None => unresolved(ctx, id, format!("Action '{}' toggles an unknown component", id)),
        },
        ActionKind::OpenLayer(TargetPayload { target }) | ActionKind::CloseLayer(TargetPayload { target }) => {
            let open = matches!(kind, ActionKind::OpenLayer(_));
            let prop = layer_prop(ctx.doc, target);
            match ctx.binding(target, prop).cloned() {
                Some(state) => vec![ctx.dialect.assign_state(&state, &open.to_string(), Site::Script)],
                None => unresolved(ctx, id, format!("Action '{}' targets an unknown layer", id)),
            }
        }
        ActionKind::HttpRequest(payload) => lower_request(id, payload, ctx),
        ActionKind::ExternalPageOpen(link) => vec![format!("window.open({}, '_blank');", quote(&link.href))],
        ActionKind::PageRedirection(link) => match link.target {
            LinkTarget::Blank => vec![format!("window.open({}, '_blank');", quote(&link.href))],
            LinkTarget::SameWindow => vec![format!("window.location.href = {};", quote(&link.href))],
        },
        ActionKind::DataConversion(conversion) => match conversion.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.lines().map(|line| line.trim().to_string()).collect(),
            _ => unresolved(ctx, id, format!("Action '{}' has no conversion code", id)),
        },
    }
}

fn lower_request(id: &str, payload: &HttpRequestPayload, ctx: &mut GenerationContext) -> Vec<String> {
    let doc = ctx.doc;
    let service = payload.service.as_deref().and_then(|key| {
        doc.http_services
            .get(key)
            .or_else(|| doc.http_services.values().find(|s| s.id == key || s.name == key))
    });
    let service = match service {
        Some(service) => service,
        None => return unresolved(ctx, id, format!("Action '{}' uses an unknown HTTP service", id)),
    };

    let mut search: IndexMap<String, Value> = IndexMap::new();
    for map in [&payload.params, &payload.query].into_iter().flatten() {
        search.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let url = if search.is_empty() {
        quote(&service.url)
    } else {
        format!(
            "{} + '?' + new URLSearchParams({}).toString()",
            quote(&service.url),
            render_inline(&object_of(&search))
        )
    };

    let mut options = vec![format!("method: '{}'", service.method.as_str())];
    if let Some(headers) = payload.headers.as_ref().filter(|h| !h.is_empty()) {
        options.push(format!("headers: {}", render_inline(&object_of(headers))));
    }
    if let Some(data) = payload.data.as_ref().filter(|d| !d.is_empty()) {
        if service.method.has_body() {
            options.push(format!("body: JSON.stringify({})", render_inline(&object_of(data))));
        }
    }

    let mut lines = vec![format!("await fetch({}, {{", url)];
    let last = options.len() - 1;
    for (i, option) in options.into_iter().enumerate() {
        lines.push(if i < last { format!("{},", option) } else { option });
    }
    lines.push("});".to_string());
    lines
}

fn object_of(map: &IndexMap<String, Value>) -> PropValue {
    PropValue::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), PropValue::from(value.clone())))
            .collect(),
    )
}

/// Lower the bodies of all handlers deferred during the walk
pub fn finalize_handlers(ctx: &mut GenerationContext) {
    let deferred = std::mem::take(&mut ctx.deferred_handlers);
    for handler in deferred {
        let mut body = Vec::new();
        if handler.trigger == "onChange" {
            if let Some(states) = ctx.change_states.get(&handler.component_id) {
                body.extend(change_assignments(ctx.dialect, states, "args[0]", Site::Script));
            }
        }

        let action_ids = match &handler.source {
            HandlerSource::Events(ids) => ids.clone(),
            HandlerSource::Prop(id) => match ctx.doc.handlers.get(id) {
                Some(ids) => ids.clone(),
                None => vec![id.clone()],
            },
        };
        body.extend(lower_actions(&action_ids, ctx));
        debug!(handler = %handler.name, statements = body.len(), "Lowered handler");
        ctx.push_hook(HookRequest::Handler(HandlerHook::new(handler.name, body)));
    }
}

/// Turn lifecycle events into effects and report events that could not be
/// attached to any rendered component
pub fn finalize_events(ctx: &mut GenerationContext) {
    let doc = ctx.doc;
    for event in doc.events.values() {
        if event.trigger.is_lifecycle() {
            let body = lower_actions(&event.action_list, ctx);
            let effect = lifecycle_effect(event.trigger, body, event.interval);
            ctx.push_hook(HookRequest::Effect(effect));
            continue;
        }

        let reason = match &event.component_id {
            None => format!("Event '{}' ({}) is not bound to a component", event.id, event.trigger.as_str()),
            Some(id) if !ctx.attached_events.contains(&event.id) => {
                format!("Event '{}' targets component '{}' which is not rendered", event.id, id)
            }
            Some(_) => continue,
        };
        ctx.warn(Warning::new(WarningKind::UnresolvedEvent, reason));
    }
}

fn lifecycle_effect(trigger: EventTrigger, body: Vec<String>, interval: Option<u64>) -> EffectHook {
    let is_async = awaits(&body);
    let run = |body: Vec<String>| -> Vec<String> {
        if !is_async {
            return body;
        }
        let mut lines = vec!["(async () => {".to_string()];
        lines.extend(body);
        lines.push("})();".to_string());
        lines
    };

    match trigger {
        EventTrigger::Interval => {
            let asyncness = if is_async { "async " } else { "" };
            let mut lines = vec![format!("const timer = setInterval({}() => {{", asyncness)];
            lines.extend(body);
            lines.push(format!("}}, {});", interval.unwrap_or(DEFAULT_INTERVAL_MS)));
            EffectHook::new(lines, Some(Vec::new())).with_cleanup(Cleanup::Call("clearInterval(timer)".to_string()))
        }
        EventTrigger::Onunload | EventTrigger::OnUnmount => {
            EffectHook::new(Vec::new(), Some(Vec::new())).with_cleanup(Cleanup::Block(run(body)))
        }
        _ => EffectHook::new(run(body), Some(Vec::new())),
    }
}
