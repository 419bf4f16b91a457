//! # Ditto page schema
//!
//! The declarative document a page is persisted as: the component tree,
//! per-component props, actions, events and handlers. The editor produces and
//! validates these documents; code generation only reads them.

pub mod error;
pub mod result;
pub mod types;
pub mod validate;
pub mod value;
pub mod visitor;

pub use error::*;
pub use result::*;
pub use types::*;
pub use value::{Literal, PropValue};
pub use visitor::*;
