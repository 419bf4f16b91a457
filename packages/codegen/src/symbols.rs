use indexmap::{IndexMap, IndexSet};

/// Names that generated code must never bind itself. Framework bindings are
/// added per dialect.
const RESERVED: &[&str] = &[
    "args",
    // JavaScript keywords and literals
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "undefined", "var", "void", "while", "with", "yield",
];

/// Words that qualify the verb of a trigger rather than being the verb
const TRIGGER_QUALIFIERS: &[&str] = &["Double", "Mouse", "Context", "Key"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    State,
    Ref,
    Handler,
    Constant,
}

/// Hands out collision-free identifiers for one generation run
#[derive(Debug, Clone)]
pub struct SymbolAllocator {
    taken: IndexSet<String>,
    handler_counts: IndexMap<String, usize>,
}

impl Default for SymbolAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolAllocator {
    pub fn new() -> Self {
        Self {
            taken: RESERVED.iter().map(|name| name.to_string()).collect(),
            handler_counts: IndexMap::new(),
        }
    }

    pub fn with_reserved(names: &[&str]) -> Self {
        let mut allocator = Self::new();
        allocator.taken.extend(names.iter().map(|name| name.to_string()));
        allocator
    }

    /// Mark an externally chosen identifier as taken. Returns false if it
    /// already was.
    pub fn reserve(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_string())
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Allocate a fresh identifier of the given kind.
    ///
    /// For `State` the setter (`set<Name>`) is reserved alongside the name.
    /// For `Handler` the hint is used as the handler name itself; use
    /// [`SymbolAllocator::allocate_handler`] to synthesize one from a trigger.
    pub fn allocate(&mut self, kind: SymbolKind, hint: &str) -> String {
        let base = sanitize(hint);
        match kind {
            SymbolKind::State => {
                let name = self.first_free(&base, |allocator, candidate| {
                    !allocator.is_taken(&setter_name(candidate))
                });
                self.taken.insert(setter_name(&name));
                self.taken.insert(name.clone());
                name
            }
            SymbolKind::Ref => self.claim(&format!("{}Ref", base)),
            SymbolKind::Handler | SymbolKind::Constant => self.claim(&base),
        }
    }

    /// Synthesize `handle<Verb>Of<Kind><N>` for an interaction on a component
    pub fn allocate_handler(&mut self, trigger: &str, component_kind: &str) -> String {
        let kind = sanitize(component_kind);
        let base = if component_kind.trim().is_empty() {
            format!("handle{}", trigger_verb(trigger))
        } else {
            format!("handle{}Of{}", trigger_verb(trigger), capitalize(&kind))
        };

        let mut index = self.handler_counts.get(&base).copied().unwrap_or(0);
        loop {
            index += 1;
            let candidate = format!("{}{}", base, index);
            if !self.is_taken(&candidate) {
                self.handler_counts.insert(base, index);
                self.taken.insert(candidate.clone());
                return candidate;
            }
        }
    }

    fn claim(&mut self, base: &str) -> String {
        let name = self.first_free(base, |_, _| true);
        self.taken.insert(name.clone());
        name
    }

    fn first_free(&self, base: &str, extra: impl Fn(&Self, &str) -> bool) -> String {
        if !self.is_taken(base) && extra(self, base) {
            return base.to_string();
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{}{}", base, suffix);
            if !self.is_taken(&candidate) && extra(self, &candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

pub fn setter_name(state: &str) -> String {
    format!("set{}", capitalize(state))
}

/// Camel-case hint for a symbol owned by a component prop (`Button` + `title` → `buttonTitle`)
pub fn prop_hint(component_kind: &str, prop: &str) -> String {
    format!("{}{}", decapitalize(component_kind), capitalize(&sanitize(prop)))
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Turn an arbitrary hint into a camel-case identifier
pub fn sanitize(hint: &str) -> String {
    if is_identifier(hint) {
        return hint.to_string();
    }

    let mut out = String::with_capacity(hint.len());
    let mut upper_next = false;
    for c in hint.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            if upper_next && !out.is_empty() {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }

    if out.is_empty() {
        return "value".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn decapitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `onClick` → `Clicking`, `onPressEnter` → `PressingEnter`, `onDoubleClick` → `DoubleClicking`
fn trigger_verb(trigger: &str) -> String {
    let trimmed = trigger.strip_prefix("on").unwrap_or(trigger);
    let words = split_words(&capitalize(&sanitize(trimmed)));
    if words.is_empty() {
        return "Event".to_string();
    }

    let verb_at = if words.len() > 1 && TRIGGER_QUALIFIERS.contains(&words[0].as_str()) {
        1
    } else {
        0
    };

    words
        .iter()
        .enumerate()
        .map(|(i, word)| if i == verb_at { gerund(word) } else { word.clone() })
        .collect()
}

fn split_words(text: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for c in text.chars() {
        match words.last_mut() {
            Some(word) if !c.is_ascii_uppercase() => word.push(c),
            _ => words.push(capitalize(&c.to_string())),
        }
    }
    words
}

fn gerund(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let is_vowel = |c: char| "aeiou".contains(c);

    if lower.ends_with('e') && !lower.ends_with("ee") && chars.len() > 2 {
        return format!("{}ing", &word[..word.len() - 1]);
    }

    // Short consonant-vowel-consonant words double the last letter (Blur → Blurring)
    if chars.len() >= 3 && chars.len() <= 4 {
        let n = chars.len();
        let (a, b, c) = (chars[n - 3], chars[n - 2], chars[n - 1]);
        if !is_vowel(a) && is_vowel(b) && !is_vowel(c) && !"wxy".contains(c) {
            return format!("{}{}ing", word, c);
        }
    }

    format!("{}ing", word)
}
