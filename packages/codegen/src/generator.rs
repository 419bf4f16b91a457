use crate::actions;
use crate::context::{reindent, CodeWriter, GenerationContext};
use crate::diagnostic::Warning;
use crate::dialect::{Dialect, PageParts, ReactDialect, VueDialect};
use crate::error::{CodegenResult, StructuralError};
use crate::hooks::HookEmitter;
use crate::jsx::emit_node;
use crate::props::finalize_memos;
use crate::symbols::{capitalize, sanitize};
use ditto_schema::{ComponentId, ComponentRef, ImportType, PageDocument};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, instrument};

static REACT: ReactDialect = ReactDialect;
static VUE: VueDialect = VueDialect;

/// Target framework of the generated module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// React function component in TSX
    #[default]
    React,
    /// Vue single-file component with `<script setup>`
    Vue,
}

impl Framework {
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            Framework::React => &REACT,
            Framework::Vue => &VUE,
        }
    }

    /// Extension of generated files
    pub fn extension(&self) -> &'static str {
        match self {
            Framework::React => "tsx",
            Framework::Vue => "vue",
        }
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "react" => Ok(Framework::React),
            "vue" => Ok(Framework::Vue),
            other => Err(format!("unknown framework '{}', expected react or vue", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    /// Emit only the markup of the root, without imports or hooks
    pub simple: bool,
    /// Component to generate from instead of the document root
    pub root: Option<ComponentId>,
    pub component_name: String,
    pub framework: Framework,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            simple: false,
            root: None,
            component_name: "Page".to_string(),
            framework: Framework::React,
        }
    }
}

impl GenerationOptions {
    pub fn simple() -> Self {
        Self {
            simple: true,
            ..Self::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<ComponentId>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = name.into();
        self
    }

    pub fn with_framework(mut self, framework: Framework) -> Self {
        self.framework = framework;
        self
    }
}

/// Outcome of one generation run. `page_code` is `None` whenever `errors`
/// is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub page_code: Option<String>,
    pub errors: Vec<StructuralError>,
    pub warnings: Vec<Warning>,
}

impl GenerationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn failed(errors: Vec<StructuralError>, warnings: Vec<Warning>) -> Self {
        Self {
            page_code: None,
            errors,
            warnings,
        }
    }
}

/// Generate the source of a page component from its document
#[instrument(skip(doc, options), fields(page = %doc.name, simple = options.simple))]
pub fn generate_page_code(doc: &PageDocument, options: &GenerationOptions) -> GenerationResult {
    let dialect = options.framework.dialect();
    info!(framework = dialect.name(), "Generating page code");

    let ref_errors = doc.validate();
    if !ref_errors.is_empty() {
        info!(errors = ref_errors.len(), "Document has dangling or cyclic references");
        let errors = ref_errors.into_iter().map(StructuralError::from).collect();
        return GenerationResult::failed(errors, Vec::new());
    }

    let mut ctx = GenerationContext::new(doc, dialect);
    let outcome = run(&mut ctx, options);
    let warnings = std::mem::take(&mut ctx.warnings);

    match outcome {
        Ok(code) => {
            info!(bytes = code.len(), warnings = warnings.len(), "Page code generated");
            GenerationResult {
                page_code: Some(code),
                errors: Vec::new(),
                warnings,
            }
        }
        Err(err) => {
            info!(error = %err, "Page code generation aborted");
            GenerationResult::failed(vec![err], warnings)
        }
    }
}

fn run(ctx: &mut GenerationContext, options: &GenerationOptions) -> CodegenResult<String> {
    let dialect = ctx.dialect;
    if let Some((module, import_type, binding)) = dialect.base_import() {
        ctx.imports.add_import(module, import_type, &[binding])?;
        ctx.symbols.reserve(binding);
    }
    // keeps framework imports ahead of component imports
    ctx.imports.add_import(dialect.hook_module(), ImportType::Named, &[])?;

    actions::prescan(ctx);

    let root = match &options.root {
        Some(id) => ComponentRef::node(id.clone()),
        None => ctx.doc.child.clone(),
    };
    let markup = emit_node(&root, ctx)?;

    actions::finalize_handlers(ctx);
    actions::finalize_events(ctx);
    finalize_memos(ctx);

    if options.simple {
        return Ok(reindent(&markup, 0).join("\n"));
    }

    let emitter = HookEmitter::new(dialect);
    let primitives = emitter.used_primitives(&ctx.hooks);
    ctx.imports
        .add_import(dialect.hook_module(), ImportType::Named, &primitives)?;

    let component_name = component_name(&options.component_name);
    let imports = ctx.imports.render();
    let module_scope = emitter.render_module_scope(&ctx.hooks);
    let hooks = emitter.render(&ctx.hooks);

    let mut writer = CodeWriter::new();
    dialect.write_page(
        &mut writer,
        &PageParts {
            component_name: &component_name,
            imports: &imports,
            module_scope: &module_scope,
            hooks: &hooks,
            markup: &markup,
        },
    );
    Ok(writer.into_output())
}

/// PascalCase identifier for the exported component
fn component_name(name: &str) -> String {
    let name = capitalize(&sanitize(name));
    if name.starts_with('_') {
        format!("Page{}", name)
    } else {
        name
    }
}
