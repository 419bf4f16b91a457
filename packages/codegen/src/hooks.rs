use crate::dialect::Dialect;
use crate::literal::{render_literal, ts_type, wrap};
use crate::symbols::setter_name;
use ditto_schema::{PropValue, ValueType};
use indexmap::IndexSet;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Module,
    Component,
}

/// A declaration requested while compiling props or lowering actions
#[derive(Debug, Clone, PartialEq)]
pub enum HookRequest {
    Assignment(AssignmentHook),
    State(StateHook),
    Ref(RefHook),
    Memo(MemoHook),
    Effect(EffectHook),
    Handler(HandlerHook),
}

impl HookRequest {
    /// Declaration group. Component-scope constants come last: hoisted
    /// templates and callbacks read the state, memos and handlers above them.
    fn group(&self) -> usize {
        match self {
            HookRequest::Assignment(a) if a.scope == Scope::Module => 0,
            HookRequest::State(_) => 1,
            HookRequest::Ref(_) => 2,
            HookRequest::Memo(_) => 3,
            HookRequest::Effect(_) => 4,
            HookRequest::Handler(_) => 5,
            HookRequest::Assignment(_) => 6,
        }
    }
}

/// `const name = <value>;`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentHook {
    pub name: String,
    pub value: Vec<String>,
    pub scope: Scope,
}

impl AssignmentHook {
    pub fn new(name: impl Into<String>, value: Vec<String>, scope: Scope) -> Self {
        Self { name: name.into(), value, scope }
    }

    pub fn literal(name: impl Into<String>, value: &PropValue, scope: Scope) -> Self {
        Self::new(name, render_literal(value), scope)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateHook {
    pub name: String,
    pub setter: String,
    pub ts_type: String,
    pub initial: Option<PropValue>,
}

impl StateHook {
    pub fn new(name: impl Into<String>, initial: Option<PropValue>, value_type: ValueType) -> Self {
        let name = name.into();
        let ts_type = match &initial {
            Some(value) => ts_type(value_type, value),
            None => ts_type(value_type, &PropValue::null()),
        };
        Self {
            setter: setter_name(&name),
            name,
            ts_type,
            initial,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefHook {
    pub name: String,
    pub ts_type: String,
    pub initial: Option<PropValue>,
}

impl RefHook {
    pub fn new(name: impl Into<String>, ts_type: impl Into<String>, initial: Option<PropValue>) -> Self {
        Self {
            name: name.into(),
            ts_type: ts_type.into(),
            initial,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoHook {
    pub name: Option<String>,
    pub body: Vec<String>,
    pub deps: Vec<String>,
}

impl MemoHook {
    pub fn new(name: Option<String>, body: Vec<String>, deps: Vec<String>) -> Self {
        Self { name, body, deps }
    }
}

/// Teardown of an effect
#[derive(Debug, Clone, PartialEq)]
pub enum Cleanup {
    /// A single call, e.g. `clearInterval(timer)`
    Call(String),
    Block(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectHook {
    pub body: Vec<String>,
    /// `None` runs on every render, `Some(vec![])` only on mount
    pub deps: Option<Vec<String>>,
    pub cleanup: Option<Cleanup>,
}

impl EffectHook {
    pub fn new(body: Vec<String>, deps: Option<Vec<String>>) -> Self {
        Self { body, deps, cleanup: None }
    }

    pub fn with_cleanup(mut self, cleanup: Cleanup) -> Self {
        self.cleanup = Some(cleanup);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerHook {
    pub name: String,
    pub body: Vec<String>,
}

impl HandlerHook {
    pub fn new(name: impl Into<String>, body: Vec<String>) -> Self {
        Self { name: name.into(), body }
    }

    pub fn is_async(&self) -> bool {
        awaits(&self.body)
    }
}

pub fn awaits(body: &[String]) -> bool {
    body.iter()
        .any(|line| identifiers(line).iter().any(|ident| ident == "await"))
}

/// Renders collected hook requests in declaration order
pub struct HookEmitter<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> HookEmitter<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Component-scope declarations: state, refs, memos, effects, handlers
    /// and finally component-scope constants. Insertion order is kept inside
    /// a group.
    pub fn render(&self, hooks: &[HookRequest]) -> Vec<String> {
        let mut ordered: Vec<&HookRequest> = hooks
            .iter()
            .filter(|hook| !matches!(hook, HookRequest::Assignment(a) if a.scope == Scope::Module))
            .collect();
        ordered.sort_by_key(|hook| hook.group());

        ordered.into_iter().flat_map(|hook| self.render_hook(hook)).collect()
    }

    /// Module-scope constants, placed above the component
    pub fn render_module_scope(&self, hooks: &[HookRequest]) -> Vec<String> {
        hooks
            .iter()
            .filter_map(|hook| match hook {
                HookRequest::Assignment(a) if a.scope == Scope::Module => Some(self.render_assignment(a)),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn render_hook(&self, hook: &HookRequest) -> Vec<String> {
        match hook {
            HookRequest::Assignment(a) => self.render_assignment(a),
            HookRequest::State(s) => self.dialect.state_declaration(s, initial_lines(&s.initial)),
            HookRequest::Ref(r) => self.dialect.ref_declaration(r, initial_lines(&r.initial)),
            HookRequest::Memo(m) => self.dialect.memo_declaration(m),
            HookRequest::Effect(e) => self.dialect.effect_declaration(e),
            HookRequest::Handler(h) => self.render_handler(h),
        }
    }

    fn render_assignment(&self, hook: &AssignmentHook) -> Vec<String> {
        wrap(&format!("const {} = ", hook.name), hook.value.clone(), ";")
    }

    fn render_handler(&self, hook: &HandlerHook) -> Vec<String> {
        let asyncness = if hook.is_async() { "async " } else { "" };
        let mut lines = vec![format!("const {} = {}(...args: any[]) => {{", hook.name, asyncness)];
        lines.extend(hook.body.iter().cloned());
        lines.push("};".to_string());
        lines
    }

    /// Hook primitives used by a set of requests, in import order
    pub fn used_primitives(&self, hooks: &[HookRequest]) -> Vec<&'static str> {
        let used: IndexSet<&'static str> = hooks.iter().flat_map(|hook| self.dialect.primitives_of(hook)).collect();
        self.dialect
            .primitive_order()
            .iter()
            .copied()
            .filter(|primitive| used.contains(primitive))
            .collect()
    }
}

fn initial_lines(initial: &Option<PropValue>) -> Vec<String> {
    initial.as_ref().map(render_literal).unwrap_or_default()
}

/// Memo body as statements: a lone expression becomes the return value
pub fn memo_statements(body: &[String]) -> Vec<String> {
    match body {
        [expr] if !expr.trim_start().starts_with("return") => {
            vec![format!("return {};", expr.trim().trim_end_matches(';'))]
        }
        body => body.to_vec(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Ident(&'a str),
    Punct(char),
    Space(&'a str),
    /// String and number literals, trailing comments
    Verbatim(&'a str),
}

/// Role of an identifier in its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Read as a variable
    Free,
    /// Property name after `.` or `?.`
    Member,
    /// Object literal key before `:`
    Key,
    /// `{ name }` standing for `{ name: name }`
    Shorthand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    Paren,
    Square,
    Object,
    Block,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn offset(chars: &mut Peekable<CharIndices>, len: usize) -> usize {
    chars.peek().map_or(len, |(i, _)| *i)
}

fn lex(line: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            while matches!(chars.peek(), Some((_, n)) if n.is_whitespace()) {
                chars.next();
            }
            pieces.push(Piece::Space(&line[start..offset(&mut chars, line.len())]));
        } else if is_ident_start(c) {
            while matches!(chars.peek(), Some((_, n)) if is_ident_char(*n)) {
                chars.next();
            }
            pieces.push(Piece::Ident(&line[start..offset(&mut chars, line.len())]));
        } else if c.is_ascii_digit() {
            while matches!(chars.peek(), Some((_, n)) if n.is_ascii_alphanumeric() || *n == '.' || *n == '_') {
                chars.next();
            }
            pieces.push(Piece::Verbatim(&line[start..offset(&mut chars, line.len())]));
        } else if matches!(c, '\'' | '"' | '`') {
            let mut escaped = false;
            for (_, n) in chars.by_ref() {
                if escaped {
                    escaped = false;
                } else if n == '\\' {
                    escaped = true;
                } else if n == c {
                    break;
                }
            }
            pieces.push(Piece::Verbatim(&line[start..offset(&mut chars, line.len())]));
        } else if c == '/' && matches!(chars.peek(), Some((_, '/'))) {
            pieces.push(Piece::Verbatim(&line[start..]));
            break;
        } else {
            pieces.push(Piece::Punct(c));
        }
    }
    pieces
}

/// Whether a `{` following `prev` opens an object literal rather than a block
fn opens_object(prev: Option<Piece>) -> bool {
    match prev {
        Some(Piece::Ident(word)) => word == "return",
        Some(Piece::Punct(c)) => matches!(c, '(' | '[' | ',' | ':' | '=' | '?' | '!' | '&' | '|'),
        _ => false,
    }
}

/// Classify every identifier piece. Brackets opened on earlier lines are not
/// seen, so a key at line start is recognized by the `:` after it alone.
fn roles(pieces: &[Piece]) -> Vec<Option<Role>> {
    let significant: Vec<usize> = pieces
        .iter()
        .enumerate()
        .filter(|(_, piece)| !matches!(piece, Piece::Space(_)))
        .map(|(i, _)| i)
        .collect();
    let at = |pos: Option<usize>| pos.and_then(|p| significant.get(p)).map(|&i| pieces[i]);

    let mut roles = vec![None; pieces.len()];
    let mut stack: Vec<Nesting> = Vec::new();
    for (pos, &index) in significant.iter().enumerate() {
        let prev = at(pos.checked_sub(1));
        match pieces[index] {
            Piece::Punct('(') => stack.push(Nesting::Paren),
            Piece::Punct('[') => stack.push(Nesting::Square),
            Piece::Punct('{') => stack.push(if opens_object(prev) { Nesting::Object } else { Nesting::Block }),
            Piece::Punct(')' | ']' | '}') => {
                stack.pop();
            }
            Piece::Ident(_) => {
                let before_prev = at(pos.checked_sub(2));
                let next = at(Some(pos + 1));
                let top = stack.last().copied();

                let member = prev == Some(Piece::Punct('.')) && before_prev != Some(Piece::Punct('.'));
                let key = next == Some(Piece::Punct(':'))
                    && match prev {
                        None | Some(Piece::Punct('{')) => true,
                        Some(Piece::Punct(',')) => !matches!(top, Some(Nesting::Paren | Nesting::Square)),
                        _ => false,
                    };
                let shorthand = top == Some(Nesting::Object)
                    && matches!(prev, Some(Piece::Punct('{' | ',')))
                    && matches!(next, Some(Piece::Punct('}' | ',')));

                roles[index] = Some(if member {
                    Role::Member
                } else if key {
                    Role::Key
                } else if shorthand {
                    Role::Shorthand
                } else {
                    Role::Free
                });
            }
            _ => {}
        }
    }
    roles
}

/// Identifier tokens of a line, skipping string contents and comments
pub fn identifiers(line: &str) -> Vec<String> {
    lex(line)
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Ident(ident) => Some(ident.to_string()),
            _ => None,
        })
        .collect()
}

/// Identifiers of a line read as variables: no member names, no object keys
pub fn free_identifiers(line: &str) -> Vec<String> {
    let pieces = lex(line);
    let roles = roles(&pieces);
    pieces
        .into_iter()
        .zip(roles)
        .filter_map(|(piece, role)| match (piece, role) {
            (Piece::Ident(ident), Some(Role::Free | Role::Shorthand)) => Some(ident.to_string()),
            _ => None,
        })
        .collect()
}

/// Replace free identifiers of a line. Member names, object keys and string
/// contents are left alone; a renamed shorthand property keeps its key.
pub fn rename_identifiers(line: &str, rename: impl Fn(&str) -> Option<String>) -> String {
    let pieces = lex(line);
    let roles = roles(&pieces);
    let mut out = String::with_capacity(line.len());

    for (piece, role) in pieces.into_iter().zip(roles) {
        match (piece, role) {
            (Piece::Ident(ident), Some(Role::Free)) => match rename(ident) {
                Some(renamed) => out.push_str(&renamed),
                None => out.push_str(ident),
            },
            (Piece::Ident(ident), Some(Role::Shorthand)) => {
                out.push_str(ident);
                if let Some(renamed) = rename(ident) {
                    out.push_str(": ");
                    out.push_str(&renamed);
                }
            }
            (Piece::Punct(c), _) => out.push(c),
            (Piece::Ident(text) | Piece::Space(text) | Piece::Verbatim(text), _) => out.push_str(text),
        }
    }
    out
}

/// Reactive names a memo body reads, first-seen order, without `own`
pub fn scan_dependencies(body: &[String], reactive: &IndexSet<String>, own: Option<&str>) -> Vec<String> {
    let mut deps: IndexSet<String> = IndexSet::new();
    for line in body {
        for ident in free_identifiers(line) {
            if reactive.contains(&ident) && Some(ident.as_str()) != own {
                deps.insert(ident);
            }
        }
    }
    deps.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{ReactDialect, VueDialect};
    use serde_json::json;

    fn emitter() -> HookEmitter<'static> {
        HookEmitter::new(&ReactDialect)
    }

    #[test]
    fn test_state_hook() {
        let hook = StateHook::new("testValue", Some(PropValue::bool(true)), ValueType::Boolean);
        assert_eq!(
            emitter().render(&[HookRequest::State(hook)]),
            vec!["const [testValue, setTestValue] = useState<boolean>(true);"]
        );

        let hook = StateHook::new("testValue", Some(PropValue::string("hello world")), ValueType::String);
        assert_eq!(
            emitter().render(&[HookRequest::State(hook)]),
            vec!["const [testValue, setTestValue] = useState<string>('hello world');"]
        );
    }

    #[test]
    fn test_state_hook_without_initial_value() {
        let hook = StateHook::new("open", None, ValueType::Boolean);
        assert_eq!(
            emitter().render(&[HookRequest::State(hook)]),
            vec!["const [open, setOpen] = useState<boolean>();"]
        );
    }

    #[test]
    fn test_multi_line_state_initial() {
        let value = PropValue::from(json!({ "page": 1, "size": 10 }));
        let hook = StateHook::new("pager", Some(value), ValueType::Object);
        assert_eq!(
            emitter().render(&[HookRequest::State(hook)]),
            vec![
                "const [pager, setPager] = useState<{ page: number; size: number }>({",
                "page: 1,",
                "size: 10",
                "});",
            ]
        );
    }

    #[test]
    fn test_ref_hook() {
        let hook = RefHook::new("testRef", "string", Some(PropValue::string("1")));
        assert_eq!(
            emitter().render(&[HookRequest::Ref(hook)]),
            vec!["const testRef = useRef<string>('1');"]
        );
    }

    #[test]
    fn test_memo_hook() {
        let hook = MemoHook::new(
            None,
            vec!["handleChanging(state1, state2)".to_string()],
            vec!["state1".to_string(), "state2".to_string()],
        );
        assert_eq!(
            emitter().render(&[HookRequest::Memo(hook)]),
            vec!["useMemo(() => {", "return handleChanging(state1, state2);", "}, [state1, state2]);"]
        );
    }

    #[test]
    fn test_named_memo_keeps_explicit_return() {
        let hook = MemoHook::new(Some("total".into()), vec!["return a + b;".into()], vec![]);
        assert_eq!(
            emitter().render(&[HookRequest::Memo(hook)]),
            vec!["const total = useMemo(() => {", "return a + b;", "}, []);"]
        );
    }

    #[test]
    fn test_effect_deps_distinguish_empty_from_unset() {
        let body = vec!["console.log(value);".to_string()];

        let with_deps = EffectHook::new(body.clone(), Some(vec!["value".into()]));
        let empty = EffectHook::new(body.clone(), Some(vec![]));
        let unset = EffectHook::new(body, None);

        assert_eq!(
            emitter().render(&[HookRequest::Effect(with_deps)]),
            vec!["useEffect(() => {", "console.log(value);", "}, [value]);"]
        );
        assert_eq!(
            emitter().render(&[HookRequest::Effect(empty)]),
            vec!["useEffect(() => {", "console.log(value);", "}, []);"]
        );
        assert_eq!(
            emitter().render(&[HookRequest::Effect(unset)]),
            vec!["useEffect(() => {", "console.log(value);", "});"]
        );
    }

    #[test]
    fn test_handler_becomes_async_when_awaiting() {
        let sync = HandlerHook::new("handleClickingOfButton1", vec!["setOpen(true);".into()]);
        let remote = HandlerHook::new("handleClickingOfButton2", vec!["await fetch('/api');".into()]);
        let quoted = HandlerHook::new("handleClickingOfButton3", vec!["alert('await');".into()]);

        assert_eq!(
            emitter().render(&[HookRequest::Handler(sync)])[0],
            "const handleClickingOfButton1 = (...args: any[]) => {"
        );
        assert_eq!(
            emitter().render(&[HookRequest::Handler(remote)])[0],
            "const handleClickingOfButton2 = async (...args: any[]) => {"
        );
        assert!(!quoted.is_async());
    }

    #[test]
    fn test_groups_are_ordered_regardless_of_insertion() {
        let hooks = vec![
            HookRequest::Effect(EffectHook::new(vec!["load();".into()], Some(vec![]))),
            HookRequest::Memo(MemoHook::new(Some("total".into()), vec!["a + b".into()], vec![])),
            HookRequest::Ref(RefHook::new("formRef", "any", Some(PropValue::null()))),
            HookRequest::State(StateHook::new("a", Some(PropValue::from(json!(1))), ValueType::Number)),
            HookRequest::Assignment(AssignmentHook::literal("columns", &PropValue::from(json!([])), Scope::Component)),
            HookRequest::Handler(HandlerHook::new("handleClickingOfButton1", vec!["load();".into()])),
            HookRequest::State(StateHook::new("b", Some(PropValue::from(json!(2))), ValueType::Number)),
        ];

        let lines = emitter().render(&hooks);
        assert_eq!(
            lines,
            vec![
                "const [a, setA] = useState<number>(1);",
                "const [b, setB] = useState<number>(2);",
                "const formRef = useRef<any>(null);",
                "const total = useMemo(() => {",
                "return a + b;",
                "}, []);",
                "useEffect(() => {",
                "load();",
                "}, []);",
                "const handleClickingOfButton1 = (...args: any[]) => {",
                "load();",
                "};",
                "const columns = [];",
            ]
        );
        assert_eq!(emitter().render(&hooks), lines);
    }

    #[test]
    fn test_effect_cleanup() {
        let poll = EffectHook::new(vec!["const timer = setInterval(tick, 1000);".into()], Some(vec![]))
            .with_cleanup(Cleanup::Call("clearInterval(timer)".into()));
        assert_eq!(
            emitter().render(&[HookRequest::Effect(poll)]),
            vec![
                "useEffect(() => {",
                "const timer = setInterval(tick, 1000);",
                "return () => clearInterval(timer);",
                "}, []);",
            ]
        );

        let leave = EffectHook::new(vec![], Some(vec![])).with_cleanup(Cleanup::Block(vec!["save();".into()]));
        assert_eq!(
            emitter().render(&[HookRequest::Effect(leave)]),
            vec!["useEffect(() => {", "return () => {", "save();", "};", "}, []);"]
        );
    }

    #[test]
    fn test_module_scope_assignments_render_separately() {
        let hooks = vec![
            HookRequest::Assignment(AssignmentHook::literal("options", &PropValue::from(json!(["a"])), Scope::Module)),
            HookRequest::State(StateHook::new("a", Some(PropValue::from(json!(1))), ValueType::Number)),
        ];
        assert_eq!(emitter().render_module_scope(&hooks), vec!["const options = [", "'a'", "];"]);
        assert_eq!(emitter().render(&hooks), vec!["const [a, setA] = useState<number>(1);"]);
    }

    #[test]
    fn test_used_primitives() {
        let hooks = vec![
            HookRequest::Effect(EffectHook::new(vec![], None)),
            HookRequest::State(StateHook::new("a", None, ValueType::Number)),
        ];
        assert_eq!(emitter().used_primitives(&hooks), vec!["useState", "useEffect"]);

        let vue = HookEmitter::new(&VueDialect);
        let mounted = EffectHook::new(vec!["load();".into()], Some(vec![]));
        let hooks = vec![
            HookRequest::Effect(mounted),
            HookRequest::Ref(RefHook::new("formRef", "any", None)),
            HookRequest::Memo(MemoHook::new(Some("total".into()), vec!["a".into()], vec![])),
        ];
        assert_eq!(vue.used_primitives(&hooks), vec!["ref", "computed", "onMounted"]);
    }

    #[test]
    fn test_identifier_scan() {
        assert_eq!(
            identifiers("count * 2 + props.total // price"),
            vec!["count", "props", "total"]
        );
        assert_eq!(identifiers("'count' + other"), vec!["other"]);
        assert_eq!(identifiers("a1 + 1e3"), vec!["a1"]);
    }

    #[test]
    fn test_rename_identifiers_skips_members_and_strings() {
        let rename = |ident: &str| (ident == "count").then(|| "inputCount".to_string());
        assert_eq!(
            rename_identifiers("count * 2 + data.count + 'count' + [...count]", rename),
            "inputCount * 2 + data.count + 'count' + [...inputCount]"
        );
    }

    #[test]
    fn test_rename_keeps_object_keys() {
        let rename = |ident: &str| (ident == "current").then(|| "tableCurrent".to_string());
        assert_eq!(
            rename_identifiers("return ({ current: current, pageSize: 10 });", rename),
            "return ({ current: tableCurrent, pageSize: 10 });"
        );
        assert_eq!(rename_identifiers("current: current,", rename), "current: tableCurrent,");
        assert_eq!(rename_identifiers("f({ page: 1, current: 2 })", rename), "f({ page: 1, current: 2 })");
    }

    #[test]
    fn test_rename_expands_shorthand_properties() {
        let rename = |ident: &str| (ident == "current").then(|| "tableCurrent".to_string());
        assert_eq!(
            rename_identifiers("return { current, pageSize: 10 };", rename),
            "return { current: tableCurrent, pageSize: 10 };"
        );
        assert_eq!(rename_identifiers("({ ...rest, current })", rename), "({ ...rest, current: tableCurrent })");
    }

    #[test]
    fn test_rename_outside_object_literals() {
        let rename = |ident: &str| (ident == "current").then(|| "tableCurrent".to_string());
        assert_eq!(rename_identifiers("if (ok) { current }", rename), "if (ok) { tableCurrent }");
        assert_eq!(rename_identifiers("ok ? current : 0", rename), "ok ? tableCurrent : 0");
        assert_eq!(rename_identifiers("list?.current + f(a, current)", rename), "list?.current + f(a, tableCurrent)");
    }

    #[test]
    fn test_free_identifiers_skip_keys_and_members() {
        assert_eq!(
            free_identifiers("({ current: page, size: data.size })"),
            vec!["page", "data"]
        );
        assert_eq!(free_identifiers("({ page })"), vec!["page"]);
    }

    #[test]
    fn test_dependency_scan_over_includes_and_skips_self() {
        let reactive: IndexSet<String> = ["count", "total", "price"].iter().map(|s| s.to_string()).collect();
        let body = vec!["count * price + count".to_string(), "total".to_string()];
        assert_eq!(scan_dependencies(&body, &reactive, Some("total")), vec!["count", "price"]);
    }
}
