//! Symbolic evaluation of macro argument fragments.
//!
//! Nothing is executed: a fragment either reduces to a literal [`Value`],
//! passes through as [`Value::Opaque`] (calls, blocks, identifiers; the
//! caller may inspect the raw fragment but must not assume structure), or
//! hits the hard-error arm for grammar outside the supported subset. The
//! evaluator is total over the lowered AST; the distinction between "not
//! literally resolvable" (a value) and "unsupported" (an error) is what the
//! declaration builder's per-invocation guard relies on.

use crate::errors::{Error, Result};
use crate::namespace::Namespace;
use crate::syntax::{Expr, Node};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Sym(String),
    Namespace(Namespace),
    Array(Vec<Value>),
    Hash(Vec<(Value, Value)>),
    /// The unevaluated fragment itself.
    Opaque(Node),
}

impl Value {
    /// Ruby truthiness: everything except `nil` and `false`.
    pub fn truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Value::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    pub fn as_sym(&self) -> Option<&str> {
        match self {
            Value::Sym(name) => Some(name),
            _ => None,
        }
    }

    /// Symbol or string content; how option values like `to:` and `prefix:`
    /// are read.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::Sym(name) | Value::Str(name) => Some(name),
            _ => None,
        }
    }
}

/// Reduces one fragment.
pub fn eval(node: &Node) -> Result<Value> {
    match &node.expr {
        Expr::Nil => Ok(Value::Nil),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Int(i) => Ok(Value::Int(*i)),
        Expr::Float(f) => Ok(Value::Float(*f)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Sym(s) => Ok(Value::Sym(s.clone())),
        Expr::Array(items) => items.iter().map(eval).collect::<Result<Vec<_>>>().map(Value::Array),
        Expr::Hash(pairs) => {
            let mut entries: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                let key = eval(key)?;
                let value = eval(value)?;
                // Key-unique, later entry wins.
                if let Some(existing) = entries.iter_mut().find(|(k, _)| *k == key) {
                    existing.1 = value;
                } else {
                    entries.push((key, value));
                }
            }
            Ok(Value::Hash(entries))
        }
        Expr::Const { path, absolute } => {
            Ok(Value::Namespace(Namespace::new(path.clone(), *absolute)))
        }
        Expr::Opaque { .. } => Ok(Value::Opaque(node.clone())),
        Expr::Unknown { kind, .. } => {
            Err(Error::UnsupportedFragment { kind: kind.clone(), line: node.span.line })
        }
    }
}

pub fn eval_args(nodes: &[Node]) -> Result<Vec<Value>> {
    nodes.iter().map(eval).collect()
}

/// Splits a flattened argument list into positional values plus the trailing
/// options mapping. A list without a trailing hash yields an empty map.
pub fn args_with_options(nodes: &[Node]) -> Result<(Vec<Value>, Options)> {
    let mut values = eval_args(nodes)?;
    let options = match values.last() {
        Some(Value::Hash(_)) => {
            let Some(Value::Hash(pairs)) = values.pop() else { unreachable!() };
            Options::from_pairs(pairs)
        }
        _ => Options::default(),
    };
    Ok((values, options))
}

/// An evaluated trailing-keyword map. Keys are symbol (or string) names;
/// entries with other key types are not addressable by the macros handled
/// here and are discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    entries: Vec<(String, Value)>,
}

impl Options {
    pub fn from_pairs(pairs: Vec<(Value, Value)>) -> Self {
        let entries = pairs
            .into_iter()
            .filter_map(|(key, value)| key.as_name().map(|name| (name.to_string(), value)))
            .collect();
        Options { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Truthiness of an entry, falling back when absent.
    pub fn flag(&self, name: &str, default: bool) -> bool {
        self.get(name).map(Value::truthy).unwrap_or(default)
    }

    /// Inserts or overwrites an entry. Used by the builder to apply
    /// macro-variant defaults before constructing declarations.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| k == name) {
            existing.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }
}
