use crate::context::CodeWriter;
use crate::hooks::{memo_statements, rename_identifiers, Cleanup, EffectHook, HookRequest, MemoHook, RefHook, StateHook};
use crate::literal::{quote, wrap};
use crate::symbols::decapitalize;
use ditto_schema::ImportType;

/// Where a generated statement or expression ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    /// Script code: hooks, handlers, effects
    Script,
    /// Expressions embedded in markup attributes
    Markup,
}

/// Rendered sections of a page, laid out by [`Dialect::write_page`]
#[derive(Debug, Clone, Copy)]
pub struct PageParts<'p> {
    pub component_name: &'p str,
    pub imports: &'p [String],
    pub module_scope: &'p [String],
    pub hooks: &'p [String],
    pub markup: &'p [String],
}

/// Framework-specific rendering primitives.
///
/// The tree walk and the hook collection are framework independent; every
/// piece of target syntax they produce goes through this trait.
pub trait Dialect {
    fn name(&self) -> &'static str;

    /// Import every generated page carries: (module, kind, binding)
    fn base_import(&self) -> Option<(&'static str, ImportType, &'static str)>;

    /// Framework bindings generated symbols must not shadow
    fn reserved_names(&self) -> &'static [&'static str];

    /// Module the hook primitives are imported from
    fn hook_module(&self) -> &'static str;

    /// Every hook primitive, in import order
    fn primitive_order(&self) -> &'static [&'static str];

    /// Primitives the declaration of one hook calls
    fn primitives_of(&self, hook: &HookRequest) -> Vec<&'static str>;

    fn state_declaration(&self, hook: &StateHook, initial: Vec<String>) -> Vec<String>;
    fn ref_declaration(&self, hook: &RefHook, initial: Vec<String>) -> Vec<String>;
    fn memo_declaration(&self, hook: &MemoHook) -> Vec<String>;
    fn effect_declaration(&self, hook: &EffectHook) -> Vec<String>;

    /// Statement storing a new value in a state
    fn assign_state(&self, state: &str, value: &str, site: Site) -> String;

    /// Statement flipping a boolean state, from handler code
    fn toggle_state(&self, state: &str) -> String;

    /// Attribute with a plain string value
    fn text_attribute(&self, name: &str, text: &str) -> String;

    /// Attribute bound to an expression
    fn expr_attribute(&self, name: &str, expr: &str) -> String;

    /// Whether markup may appear inside script expressions
    fn inline_markup(&self) -> bool;

    fn open_tag(&self, tag: &str, props: &[String]) -> String;
    fn self_closing_tag(&self, tag: &str, props: &[String]) -> String;
    fn close_tag(&self, tag: &str) -> String;

    /// An expression placed as a child of an element
    fn expression_child(&self, expr: &str) -> String;
    fn comment_child(&self, text: &str) -> String;

    /// Opening and closing lines of a conditionally rendered block
    fn conditional_open(&self, condition: &str) -> String;
    fn conditional_close(&self) -> String;

    fn fragment_open(&self) -> String;
    fn fragment_close(&self) -> String;

    /// Lay out the sections of a page as one source file
    fn write_page(&self, writer: &mut CodeWriter, page: &PageParts);
}

fn self_closing(tag: &str, props: &[String]) -> String {
    if props.is_empty() {
        format!("<{} />", tag)
    } else {
        format!("<{} {} />", tag, props.join(" "))
    }
}

/// React with TypeScript
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactDialect;

impl ReactDialect {
    fn setter(state: &str) -> String {
        crate::symbols::setter_name(state)
    }
}

impl Dialect for ReactDialect {
    fn name(&self) -> &'static str {
        "react"
    }

    fn base_import(&self) -> Option<(&'static str, ImportType, &'static str)> {
        Some(("react", ImportType::Default, "React"))
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        &["React", "useState", "useEffect", "useMemo", "useRef", "useCallback"]
    }

    fn hook_module(&self) -> &'static str {
        "react"
    }

    fn primitive_order(&self) -> &'static [&'static str] {
        &["useState", "useRef", "useMemo", "useEffect"]
    }

    fn primitives_of(&self, hook: &HookRequest) -> Vec<&'static str> {
        match hook {
            HookRequest::State(_) => vec!["useState"],
            HookRequest::Ref(_) => vec!["useRef"],
            HookRequest::Memo(_) => vec!["useMemo"],
            HookRequest::Effect(_) => vec!["useEffect"],
            HookRequest::Assignment(_) | HookRequest::Handler(_) => Vec::new(),
        }
    }

    fn state_declaration(&self, hook: &StateHook, initial: Vec<String>) -> Vec<String> {
        let prefix = format!("const [{}, {}] = useState<{}>(", hook.name, hook.setter, hook.ts_type);
        wrap(&prefix, initial, ");")
    }

    fn ref_declaration(&self, hook: &RefHook, initial: Vec<String>) -> Vec<String> {
        wrap(&format!("const {} = useRef<{}>(", hook.name, hook.ts_type), initial, ");")
    }

    fn memo_declaration(&self, hook: &MemoHook) -> Vec<String> {
        let header = match &hook.name {
            Some(name) => format!("const {} = useMemo(() => {{", name),
            None => "useMemo(() => {".to_string(),
        };
        let mut lines = vec![header];
        lines.extend(memo_statements(&hook.body));
        lines.push(format!("}}, [{}]);", hook.deps.join(", ")));
        lines
    }

    fn effect_declaration(&self, hook: &EffectHook) -> Vec<String> {
        let mut lines = vec!["useEffect(() => {".to_string()];
        lines.extend(hook.body.iter().cloned());
        match &hook.cleanup {
            Some(Cleanup::Call(call)) => lines.push(format!("return () => {};", call)),
            Some(Cleanup::Block(block)) => {
                lines.push("return () => {".to_string());
                lines.extend(block.iter().cloned());
                lines.push("};".to_string());
            }
            None => {}
        }
        lines.push(match &hook.deps {
            Some(deps) => format!("}}, [{}]);", deps.join(", ")),
            None => "});".to_string(),
        });
        lines
    }

    fn assign_state(&self, state: &str, value: &str, _site: Site) -> String {
        format!("{}({});", Self::setter(state), value)
    }

    fn toggle_state(&self, state: &str) -> String {
        format!("{}((visible) => !visible);", Self::setter(state))
    }

    fn text_attribute(&self, name: &str, text: &str) -> String {
        if text.contains('"') || text.contains('\n') {
            format!("{}={{{}}}", name, quote(text))
        } else {
            format!("{}=\"{}\"", name, text)
        }
    }

    fn expr_attribute(&self, name: &str, expr: &str) -> String {
        format!("{}={{{}}}", name, expr)
    }

    fn inline_markup(&self) -> bool {
        true
    }

    fn open_tag(&self, tag: &str, props: &[String]) -> String {
        format!("<{} {}>", tag, props.join(" "))
    }

    fn self_closing_tag(&self, tag: &str, props: &[String]) -> String {
        self_closing(tag, props)
    }

    fn close_tag(&self, tag: &str) -> String {
        format!("</{}>", tag)
    }

    fn expression_child(&self, expr: &str) -> String {
        format!("{{{}}}", expr)
    }

    fn comment_child(&self, text: &str) -> String {
        format!("{{{}}}", text)
    }

    fn conditional_open(&self, condition: &str) -> String {
        format!("{{{} && (", condition)
    }

    fn conditional_close(&self) -> String {
        ")}".to_string()
    }

    fn fragment_open(&self) -> String {
        "<>".to_string()
    }

    fn fragment_close(&self) -> String {
        "</>".to_string()
    }

    fn write_page(&self, writer: &mut CodeWriter, page: &PageParts) {
        for line in page.imports {
            writer.add_line(line);
        }
        writer.blank_line();

        if !page.module_scope.is_empty() {
            writer.add_block(page.module_scope);
            writer.blank_line();
        }

        writer.add_line(&format!("export default function {}() {{", page.component_name));
        writer.indent();
        if !page.hooks.is_empty() {
            writer.add_block(page.hooks);
            writer.blank_line();
        }
        writer.add_line("return (");
        writer.indent();
        writer.add_block(page.markup);
        writer.dedent();
        writer.add_line(");");
        writer.dedent();
        writer.add_line("}");
    }
}

/// Vue single-file component with `<script setup>` and TypeScript
#[derive(Debug, Clone, Copy, Default)]
pub struct VueDialect;

impl VueDialect {
    /// Reads of reactive values in script code go through `.value`
    fn unwrap_reads(line: &str, reactive: &[String]) -> String {
        rename_identifiers(line, |ident| {
            reactive
                .iter()
                .any(|name| name == ident)
                .then(|| format!("{}.value", ident))
        })
    }

    fn register_cleanup(cleanup: &Cleanup, hook: &str) -> Vec<String> {
        match cleanup {
            Cleanup::Call(call) => vec![format!("{}(() => {});", hook, call)],
            Cleanup::Block(block) => {
                let mut lines = vec![format!("{}(() => {{", hook)];
                lines.extend(block.iter().cloned());
                lines.push("});".to_string());
                lines
            }
        }
    }

    /// Attribute values sit inside double quotes
    fn attribute_value(expr: &str) -> String {
        expr.replace('"', "&quot;")
    }
}

impl Dialect for VueDialect {
    fn name(&self) -> &'static str {
        "vue"
    }

    fn base_import(&self) -> Option<(&'static str, ImportType, &'static str)> {
        None
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        &["ref", "computed", "watch", "watchEffect", "onMounted", "onUnmounted"]
    }

    fn hook_module(&self) -> &'static str {
        "vue"
    }

    fn primitive_order(&self) -> &'static [&'static str] {
        &["ref", "computed", "watch", "watchEffect", "onMounted", "onUnmounted"]
    }

    fn primitives_of(&self, hook: &HookRequest) -> Vec<&'static str> {
        match hook {
            HookRequest::State(_) | HookRequest::Ref(_) => vec!["ref"],
            HookRequest::Memo(_) => vec!["computed"],
            HookRequest::Effect(effect) => match &effect.deps {
                Some(deps) if deps.is_empty() => {
                    let mut used = Vec::new();
                    if !effect.body.is_empty() {
                        used.push("onMounted");
                    }
                    if effect.cleanup.is_some() {
                        used.push("onUnmounted");
                    }
                    used
                }
                Some(_) => vec!["watch"],
                None => vec!["watchEffect"],
            },
            HookRequest::Assignment(_) | HookRequest::Handler(_) => Vec::new(),
        }
    }

    fn state_declaration(&self, hook: &StateHook, initial: Vec<String>) -> Vec<String> {
        wrap(&format!("const {} = ref<{}>(", hook.name, hook.ts_type), initial, ");")
    }

    fn ref_declaration(&self, hook: &RefHook, initial: Vec<String>) -> Vec<String> {
        wrap(&format!("const {} = ref<{}>(", hook.name, hook.ts_type), initial, ");")
    }

    fn memo_declaration(&self, hook: &MemoHook) -> Vec<String> {
        let header = match &hook.name {
            Some(name) => format!("const {} = computed(() => {{", name),
            None => "computed(() => {".to_string(),
        };
        let mut lines = vec![header];
        lines.extend(
            memo_statements(&hook.body)
                .iter()
                .map(|line| Self::unwrap_reads(line, &hook.deps)),
        );
        lines.push("});".to_string());
        lines
    }

    fn effect_declaration(&self, hook: &EffectHook) -> Vec<String> {
        match &hook.deps {
            // Runs once: mounted, with teardown on unmount
            Some(deps) if deps.is_empty() => {
                if hook.body.is_empty() {
                    return hook
                        .cleanup
                        .as_ref()
                        .map(|cleanup| Self::register_cleanup(cleanup, "onUnmounted"))
                        .unwrap_or_default();
                }
                let mut lines = vec!["onMounted(() => {".to_string()];
                lines.extend(hook.body.iter().cloned());
                if let Some(cleanup) = &hook.cleanup {
                    lines.extend(Self::register_cleanup(cleanup, "onUnmounted"));
                }
                lines.push("});".to_string());
                lines
            }
            Some(deps) => {
                let params = if hook.cleanup.is_some() { "(_value, _previous, onCleanup)" } else { "()" };
                let mut lines = vec![format!("watch([{}], {} => {{", deps.join(", "), params)];
                lines.extend(hook.body.iter().cloned());
                if let Some(cleanup) = &hook.cleanup {
                    lines.extend(Self::register_cleanup(cleanup, "onCleanup"));
                }
                lines.push("}, { immediate: true });".to_string());
                lines
            }
            None => {
                let params = if hook.cleanup.is_some() { "(onCleanup)" } else { "()" };
                let mut lines = vec![format!("watchEffect({} => {{", params)];
                lines.extend(hook.body.iter().cloned());
                if let Some(cleanup) = &hook.cleanup {
                    lines.extend(Self::register_cleanup(cleanup, "onCleanup"));
                }
                lines.push("});".to_string());
                lines
            }
        }
    }

    fn assign_state(&self, state: &str, value: &str, site: Site) -> String {
        match site {
            Site::Script => format!("{}.value = {};", state, value),
            // templates unwrap refs, and the compiler rewrites the assignment
            Site::Markup => format!("{} = {};", state, value),
        }
    }

    fn toggle_state(&self, state: &str) -> String {
        format!("{0}.value = !{0}.value;", state)
    }

    fn text_attribute(&self, name: &str, text: &str) -> String {
        if text.contains('"') || text.contains('\n') {
            self.expr_attribute(name, &quote(text))
        } else {
            format!("{}=\"{}\"", name, text)
        }
    }

    fn expr_attribute(&self, name: &str, expr: &str) -> String {
        let value = Self::attribute_value(expr);
        match name.strip_prefix("on") {
            Some(event) if event.starts_with(|c: char| c.is_ascii_uppercase()) => {
                format!("@{}=\"{}\"", decapitalize(event), value)
            }
            _ => format!(":{}=\"{}\"", name, value),
        }
    }

    fn inline_markup(&self) -> bool {
        false
    }

    fn open_tag(&self, tag: &str, props: &[String]) -> String {
        if props.is_empty() {
            format!("<{}>", tag)
        } else {
            format!("<{} {}>", tag, props.join(" "))
        }
    }

    fn self_closing_tag(&self, tag: &str, props: &[String]) -> String {
        self_closing(tag, props)
    }

    fn close_tag(&self, tag: &str) -> String {
        format!("</{}>", tag)
    }

    fn expression_child(&self, expr: &str) -> String {
        format!("{{{{ {} }}}}", expr)
    }

    fn comment_child(&self, text: &str) -> String {
        let text = text.trim().trim_start_matches("/*").trim_end_matches("*/").trim();
        format!("<!-- {} -->", text)
    }

    fn conditional_open(&self, condition: &str) -> String {
        format!("<template v-if=\"{}\">", Self::attribute_value(condition))
    }

    fn conditional_close(&self) -> String {
        "</template>".to_string()
    }

    fn fragment_open(&self) -> String {
        "<template>".to_string()
    }

    fn fragment_close(&self) -> String {
        "</template>".to_string()
    }

    fn write_page(&self, writer: &mut CodeWriter, page: &PageParts) {
        writer.add_line("<template>");
        writer.indent();
        writer.add_block(page.markup);
        writer.dedent();
        writer.add_line("</template>");
        writer.blank_line();

        writer.add_line("<script lang=\"ts\" setup>");
        let mut first = true;
        for section in [page.imports, page.module_scope, page.hooks] {
            if section.is_empty() {
                continue;
            }
            if !first {
                writer.blank_line();
            }
            writer.add_block(section);
            first = false;
        }
        writer.add_line("</script>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ditto_schema::{PropValue, ValueType};

    #[test]
    fn test_tags() {
        let props = vec!["title=\"按钮\"".to_string()];
        assert_eq!(ReactDialect.open_tag("div", &[]), "<div >");
        assert_eq!(ReactDialect.open_tag("Card", &props), "<Card title=\"按钮\">");
        assert_eq!(ReactDialect.self_closing_tag("div", &[]), "<div />");
        assert_eq!(ReactDialect.self_closing_tag("Button", &props), "<Button title=\"按钮\" />");
        assert_eq!(ReactDialect.close_tag("Input.Search"), "</Input.Search>");
        assert_eq!(VueDialect.open_tag("div", &[]), "<div>");
    }

    #[test]
    fn test_conditional_block() {
        assert_eq!(ReactDialect.conditional_open("modalVisible"), "{modalVisible && (");
        assert_eq!(ReactDialect.conditional_close(), ")}");
        assert_eq!(VueDialect.conditional_open("modalVisible"), "<template v-if=\"modalVisible\">");
        assert_eq!(VueDialect.conditional_close(), "</template>");
    }

    #[test]
    fn test_names() {
        assert_eq!(ReactDialect.name(), "react");
        assert_eq!(VueDialect.name(), "vue");
        assert!(ReactDialect.base_import().is_some());
        assert!(VueDialect.base_import().is_none());
    }

    #[test]
    fn test_attributes() {
        assert_eq!(ReactDialect.text_attribute("title", "Save"), "title=\"Save\"");
        assert_eq!(ReactDialect.text_attribute("title", "say \"hi\""), "title={'say \"hi\"'}");
        assert_eq!(ReactDialect.expr_attribute("onClick", "handleClick"), "onClick={handleClick}");

        assert_eq!(VueDialect.text_attribute("title", "Save"), "title=\"Save\"");
        assert_eq!(VueDialect.text_attribute("title", "say \"hi\""), ":title=\"'say &quot;hi&quot;'\"");
        assert_eq!(VueDialect.expr_attribute("count", "3"), ":count=\"3\"");
        assert_eq!(VueDialect.expr_attribute("onClick", "handleClick"), "@click=\"handleClick\"");
        assert_eq!(VueDialect.expr_attribute("onPressEnter", "submit"), "@pressEnter=\"submit\"");
        assert_eq!(VueDialect.expr_attribute("once", "true"), ":once=\"true\"");
    }

    #[test]
    fn test_state_writes() {
        assert_eq!(ReactDialect.assign_state("modalOpen", "true", Site::Script), "setModalOpen(true);");
        assert_eq!(ReactDialect.toggle_state("tipVisible"), "setTipVisible((visible) => !visible);");
        assert_eq!(VueDialect.assign_state("modalOpen", "true", Site::Script), "modalOpen.value = true;");
        assert_eq!(VueDialect.assign_state("modalOpen", "true", Site::Markup), "modalOpen = true;");
        assert_eq!(VueDialect.toggle_state("tipVisible"), "tipVisible.value = !tipVisible.value;");
    }

    #[test]
    fn test_vue_children() {
        assert_eq!(VueDialect.expression_child("record.name"), "{{ record.name }}");
        assert_eq!(
            VueDialect.comment_child("/* TODO(generator): unable to resolve prop */"),
            "<!-- TODO(generator): unable to resolve prop -->"
        );
    }

    #[test]
    fn test_vue_declarations() {
        let state = StateHook::new("count", Some(PropValue::from(serde_json::json!(1))), ValueType::Number);
        assert_eq!(
            VueDialect.state_declaration(&state, vec!["1".into()]),
            vec!["const count = ref<number>(1);"]
        );

        let memo = MemoHook::new(
            Some("total".into()),
            vec!["({ count, price: count * price })".into()],
            vec!["count".into(), "price".into()],
        );
        assert_eq!(
            VueDialect.memo_declaration(&memo),
            vec![
                "const total = computed(() => {",
                "return ({ count: count.value, price: count.value * price.value });",
                "});",
            ]
        );
    }

    #[test]
    fn test_vue_lifecycle_effects() {
        let poll = EffectHook::new(vec!["const timer = setInterval(tick, 1000);".into()], Some(vec![]))
            .with_cleanup(Cleanup::Call("clearInterval(timer)".into()));
        assert_eq!(
            VueDialect.effect_declaration(&poll),
            vec![
                "onMounted(() => {",
                "const timer = setInterval(tick, 1000);",
                "onUnmounted(() => clearInterval(timer));",
                "});",
            ]
        );
        assert_eq!(
            VueDialect.primitives_of(&HookRequest::Effect(poll)),
            vec!["onMounted", "onUnmounted"]
        );

        let leave = EffectHook::new(vec![], Some(vec![])).with_cleanup(Cleanup::Block(vec!["save();".into()]));
        assert_eq!(
            VueDialect.effect_declaration(&leave),
            vec!["onUnmounted(() => {", "save();", "});"]
        );

        let watcher = EffectHook::new(vec!["load(page.value);".into()], Some(vec!["page".into()]));
        assert_eq!(
            VueDialect.effect_declaration(&watcher),
            vec!["watch([page], () => {", "load(page.value);", "}, { immediate: true });"]
        );
    }
}
