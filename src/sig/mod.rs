//! Declared-interface database.
//!
//! Delegation rendering needs to know what the forward target returns and
//! what the forwarded method returns on that type. Those questions go to a
//! [`SignatureLookup`], a read-only view over a signature table keyed by
//! qualified type name and method name. [`SignatureTable`] is the concrete
//! store, loadable from YAML so a project can ship the signatures its
//! delegates forward to. Every miss is an empty result, never an error;
//! the database is expected to be incomplete on any given run.

pub mod searcher;

pub use searcher::MethodSearcher;

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{Error, Result};

/// A return type: a qualified name plus one level of optional wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub optional: bool,
}

impl TypeRef {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.strip_suffix('?') {
            Some(name) => TypeRef { name: name.trim_end().to_string(), optional: true },
            None => TypeRef { name: trimmed.to_string(), optional: false },
        }
    }

    pub fn untyped() -> Self {
        TypeRef { name: "untyped".into(), optional: false }
    }

    pub fn is_untyped(&self) -> bool {
        self.name == "untyped"
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name, if self.optional { "?" } else { "" })
    }
}

/// One declared method signature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawMethodType")]
pub struct MethodType {
    pub params: Vec<String>,
    pub ret: TypeRef,
}

impl std::fmt::Display for MethodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) -> {}", self.params.join(", "), self.ret)
    }
}

#[derive(Deserialize)]
struct RawMethodType {
    #[serde(default)]
    params: Vec<String>,
    returns: String,
}

impl From<RawMethodType> for MethodType {
    fn from(raw: RawMethodType) -> Self {
        MethodType { params: raw.params, ret: TypeRef::parse(&raw.returns) }
    }
}

/// Read-only signature lookup. Absent types and absent methods both yield
/// an empty list.
pub trait SignatureLookup {
    fn method_types(&self, type_name: &str, method: &str) -> Vec<MethodType>;
}

/// In-memory signature database: type name → method name → signatures.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct SignatureTable {
    types: HashMap<String, HashMap<String, Vec<MethodType>>>,
}

impl SignatureTable {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::read(path.display().to_string(), source))?;
        Self::from_yaml(&text).map_err(|source| Error::SignatureTable {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

impl SignatureLookup for SignatureTable {
    fn method_types(&self, type_name: &str, method: &str) -> Vec<MethodType> {
        self.types
            .get(type_name)
            .and_then(|methods| methods.get(method))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_optional_returns() {
        assert_eq!(TypeRef::parse("::String?"), TypeRef { name: "::String".into(), optional: true });
        assert_eq!(TypeRef::parse("untyped"), TypeRef::untyped());
    }

    #[test]
    fn loads_yaml_tables() {
        let table = SignatureTable::from_yaml(
            "\"::Foo\":\n  bar:\n    - returns: \"::String\"\n    - params: [\"::Integer\"]\n      returns: \"::String?\"\n",
        )
        .unwrap();
        let types = table.method_types("::Foo", "bar");
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].to_string(), "() -> ::String");
        assert_eq!(types[1].to_string(), "(::Integer) -> ::String?");
        assert!(table.method_types("::Foo", "missing").is_empty());
        assert!(table.method_types("::Missing", "bar").is_empty());
    }
}
