use crate::error::{CodegenResult, StructuralError};
use crate::symbols::{SymbolAllocator, SymbolKind};
use ditto_schema::ImportType;
use indexmap::{IndexMap, IndexSet};

/// Collects the import statements of one generated module.
///
/// Statements are grouped by module specifier in first-seen order, then by
/// import kind in first-seen order, with names deduplicated.
#[derive(Debug, Clone, Default)]
pub struct ImportRegistry {
    modules: IndexMap<String, IndexMap<ImportType, IndexSet<String>>>,
    /// local binding → (specifier, import kind, imported name)
    bindings: IndexMap<String, (String, ImportType, String)>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_import(&mut self, specifier: &str, import_type: ImportType, names: &[&str]) -> CodegenResult<()> {
        let names: Vec<&str> = names.iter().copied().filter(|name| !name.is_empty()).collect();

        if import_type != ImportType::Named {
            let existing = self
                .modules
                .get(specifier)
                .and_then(|kinds| kinds.get(&import_type))
                .and_then(|bound| bound.first())
                .map(|name| name.as_str());
            let mut bound = existing;
            for name in &names {
                match bound {
                    Some(current) if current != *name => {
                        return Err(exclusive_conflict(import_type, specifier, current, name));
                    }
                    _ => bound = Some(*name),
                }
            }
        }

        let entry = self
            .modules
            .entry(specifier.to_string())
            .or_default()
            .entry(import_type)
            .or_default();
        for name in names {
            entry.insert(name.to_string());
        }
        Ok(())
    }

    /// Register the import a component needs and return its local binding.
    ///
    /// Only the root of a member name is imported (`Input.Search` binds
    /// `Input`). A binding already used for a different module is aliased
    /// through the allocator.
    pub fn bind_component(
        &mut self,
        package: &str,
        sub_path: &str,
        import_type: ImportType,
        name: &str,
        symbols: &mut SymbolAllocator,
    ) -> CodegenResult<String> {
        let specifier = module_specifier(package, sub_path);
        let imported = name.split('.').next().unwrap_or(name).to_string();
        let key = (specifier.clone(), import_type, imported.clone());

        if let Some((local, _)) = self.bindings.iter().find(|(_, bound)| **bound == key) {
            return Ok(local.clone());
        }

        let local = if self.bindings.contains_key(&imported) || symbols.is_taken(&imported) {
            symbols.allocate(SymbolKind::Constant, &imported)
        } else {
            symbols.reserve(&imported);
            imported.clone()
        };

        let statement_name = match import_type {
            ImportType::Named if local != imported => format!("{} as {}", imported, local),
            _ => local.clone(),
        };
        self.add_import(&specifier, import_type, &[statement_name.as_str()])?;
        self.bindings.insert(local.clone(), key);
        Ok(local)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (specifier, kinds) in &self.modules {
            for (import_type, names) in kinds {
                if names.is_empty() {
                    continue;
                }
                let names: Vec<&str> = names.iter().map(|name| name.as_str()).collect();
                let line = match import_type {
                    ImportType::Default => format!("import {} from '{}';", names[0], specifier),
                    ImportType::Named => format!("import {{ {} }} from '{}';", names.join(", "), specifier),
                    ImportType::Namespace => format!("import * as {} from '{}';", names[0], specifier),
                };
                lines.push(line);
            }
        }
        lines
    }
}

fn exclusive_conflict(import_type: ImportType, specifier: &str, existing: &str, attempted: &str) -> StructuralError {
    let (specifier, existing, attempted) = (specifier.to_string(), existing.to_string(), attempted.to_string());
    match import_type {
        ImportType::Namespace => StructuralError::DuplicateNamespaceImport { specifier, existing, attempted },
        _ => StructuralError::DuplicateDefaultImport { specifier, existing, attempted },
    }
}

/// Join a package and an optional sub-path into a module specifier
pub fn module_specifier(package: &str, sub_path: &str) -> String {
    let package = package.trim();
    let sub_path = sub_path.trim();
    let joined = if sub_path.is_empty() || sub_path == "/" {
        package.to_string()
    } else {
        format!("{}/{}", package, sub_path)
    };

    let mut out = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}
