//! # Ditto page code generation
//!
//! Turns a [`PageDocument`](ditto_schema::PageDocument) into the TypeScript
//! source of a page component: a React function component in TSX, or a Vue
//! single-file component.
//!
//! ```ignore
//! let doc = PageDocument::load("pages/index.ditto")?;
//! let result = generate_page_code(&doc, &GenerationOptions::default());
//! ```

pub mod actions;
pub mod context;
pub mod diagnostic;
pub mod dialect;
pub mod error;
pub mod generator;
pub mod hooks;
pub mod imports;
pub mod jsx;
pub mod literal;
pub mod props;
pub mod symbols;

pub use context::{CodeWriter, GenerationContext};
pub use diagnostic::{Warning, WarningKind, PROP_PLACEHOLDER};
pub use dialect::{Dialect, PageParts, ReactDialect, Site, VueDialect};
pub use error::{CodegenResult, StructuralError};
pub use generator::{generate_page_code, Framework, GenerationOptions, GenerationResult};
pub use hooks::{HookEmitter, HookRequest};
pub use imports::ImportRegistry;
pub use jsx::{render_tsx, TsxNode};
pub use symbols::{SymbolAllocator, SymbolKind};

#[cfg(test)]
mod tests;
