//! rbsgen generates RBS type signatures for methods that Rails-style class
//! macros define implicitly: `cattr_*`/`mattr_*` accessors,
//! `class_attribute` storage, `delegate` forwarding, and concern inclusion
//! (including members injected through `included do ... end` blocks and
//! `ClassMethods` companion modules).
//!
//! Nothing is executed. Source files are parsed with the tree-sitter Ruby
//! grammar, macro arguments are reduced symbolically, mixins are resolved
//! against a read-only index of the project's module graph, and delegated
//! methods are typed from a declared-signature table.
//!
//! # Architecture
//!
//! - `syntax`: tree-sitter front end, owned argument fragments, comment index
//! - `eval`: symbolic evaluation of macro arguments
//! - `scan`: per-scope macro invocation index
//! - `model`: module-graph oracle (`ModuleIndex`, `ProjectIndex`)
//! - `sig`: signature table and delegate type resolution
//! - `decl`: declarations, mixin resolution, building, rendering
//! - `gen`: document assembly and canonical formatting
//! - `batch` / `cli`: file discovery, output writing, command surface

pub mod batch;
pub mod cli;
pub mod decl;
pub mod errors;
pub mod eval;
pub mod gen;
pub mod model;
pub mod namespace;
pub mod scan;
pub mod sig;
pub mod syntax;

pub use errors::{Error, Result};
pub use gen::Generator;
pub use model::{ModuleIndex, ModuleKind, ProjectIndex, SourceFile};
pub use namespace::Namespace;
pub use sig::{SignatureLookup, SignatureTable};
