//! Typed declarations derived from macro invocations.
//!
//! Declarations are short-lived: the builder produces them from one or more
//! macro calls and the renderer consumes them immediately. Option flags
//! mirror the keyword arguments the macros accept, with builder-applied
//! overrides for the read-only/write-only accessor variants layered on top.

pub mod builder;
pub mod include;
pub mod types;

pub use builder::DeclarationBuilder;
pub use include::{Include, ScanCache};

use crate::eval::{Options, Value};
use crate::namespace::Namespace;

#[derive(Debug, Clone)]
pub enum Declaration {
    AttributeAccessor(AttributeAccessor),
    ClassAttribute(ClassAttribute),
    Delegate(Delegate),
    Include(IncludeDecl),
}

impl Declaration {
    pub fn public(&self) -> bool {
        match self {
            Declaration::AttributeAccessor(decl) => decl.public(),
            Declaration::ClassAttribute(decl) => decl.public(),
            Declaration::Delegate(decl) => decl.public(),
            Declaration::Include(decl) => !decl.private,
        }
    }
}

/// A member created by `cattr_*`/`mattr_*` accessor macros.
#[derive(Debug, Clone)]
pub struct AttributeAccessor {
    pub name: String,
    pub options: Options,
}

impl AttributeAccessor {
    pub fn type_decl(&self) -> String {
        declared_type(&self.options)
    }

    pub fn singleton_reader(&self) -> bool {
        self.options.flag("singleton_reader", true)
    }

    pub fn singleton_writer(&self) -> bool {
        self.options.flag("singleton_writer", true)
    }

    pub fn instance_accessor(&self) -> bool {
        self.options.flag("instance_accessor", true)
    }

    pub fn instance_reader(&self) -> bool {
        self.options.flag("instance_reader", self.instance_accessor())
    }

    pub fn instance_writer(&self) -> bool {
        self.options.flag("instance_writer", self.instance_accessor())
    }

    pub fn public(&self) -> bool {
        !self.options.flag("private", false)
    }
}

/// A member created by `class_attribute`.
#[derive(Debug, Clone)]
pub struct ClassAttribute {
    pub name: String,
    pub options: Options,
}

impl ClassAttribute {
    pub fn type_decl(&self) -> String {
        declared_type(&self.options)
    }

    pub fn instance_accessor(&self) -> bool {
        self.options.flag("instance_accessor", true)
    }

    pub fn instance_reader(&self) -> bool {
        self.options.flag("instance_reader", self.instance_accessor())
    }

    pub fn instance_writer(&self) -> bool {
        self.options.flag("instance_writer", self.instance_accessor())
    }

    pub fn instance_predicate(&self) -> bool {
        self.options.flag("instance_predicate", true)
    }

    pub fn public(&self) -> bool {
        !self.options.flag("private", false)
    }
}

/// A forwarded method created by `delegate`.
#[derive(Debug, Clone)]
pub struct Delegate {
    pub namespace: Namespace,
    pub method: String,
    pub options: Options,
}

impl Delegate {
    pub fn to(&self) -> Option<&str> {
        self.options.get("to").and_then(Value::as_name)
    }

    /// The rendered name honors `prefix: true` (target-derived) and
    /// explicit string/symbol prefixes.
    pub fn method_name(&self) -> String {
        match self.options.get("prefix") {
            Some(Value::Bool(true)) => {
                format!("{}_{}", self.to().unwrap_or_default(), self.method)
            }
            Some(value) => match value.as_name() {
                Some(prefix) => format!("{prefix}_{}", self.method),
                None => self.method.clone(),
            },
            None => self.method.clone(),
        }
    }

    pub fn public(&self) -> bool {
        !self.options.flag("private", false)
    }
}

/// A mixin inclusion worth declaring: either authored inside a deferred
/// block (the consumer would otherwise never see it) or a concern whose
/// `ClassMethods` companion must be extended.
#[derive(Debug, Clone)]
pub struct IncludeDecl {
    pub module_name: Namespace,
    pub deferred_origin: bool,
    pub concern: bool,
    pub class_methods: bool,
    pub private: bool,
}

/// Type precedence: trailing `#:` hint, then a type guessed from a literal
/// default, then the generic marker.
fn declared_type(options: &Options) -> String {
    if let Some(Value::Str(comment)) = options.get("trailing_comment") {
        if let Some(hint) = comment.strip_prefix("#:") {
            return hint.trim().to_string();
        }
    }
    match options.get("default") {
        Some(value) if value.truthy() => types::guess_type(value),
        _ => "untyped".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: Vec<(Value, Value)>) -> Options {
        Options::from_pairs(pairs)
    }

    #[test]
    fn trailing_hint_beats_default_literal() {
        let mut opts = options(vec![(Value::Sym("default".into()), Value::Int(42))]);
        opts.set("trailing_comment", Value::Str("#: ::String".into()));
        let accessor = AttributeAccessor { name: "x".into(), options: opts };
        assert_eq!(accessor.type_decl(), "::String");
    }

    #[test]
    fn default_literal_beats_generic_marker() {
        let opts = options(vec![(Value::Sym("default".into()), Value::Int(42))]);
        let accessor = AttributeAccessor { name: "x".into(), options: opts };
        assert_eq!(accessor.type_decl(), "::Integer");

        let accessor = AttributeAccessor { name: "x".into(), options: Options::default() };
        assert_eq!(accessor.type_decl(), "untyped");
    }

    #[test]
    fn non_hint_trailing_comment_is_ignored() {
        let mut opts = Options::default();
        opts.set("trailing_comment", Value::Str("# not a hint".into()));
        let accessor = AttributeAccessor { name: "x".into(), options: opts };
        assert_eq!(accessor.type_decl(), "untyped");
    }

    #[test]
    fn delegate_prefix_forms() {
        let base = options(vec![(Value::Sym("to".into()), Value::Sym("bar".into()))]);
        let ns = Namespace::parse("::Foo");

        let plain = Delegate { namespace: ns.clone(), method: "size".into(), options: base.clone() };
        assert_eq!(plain.method_name(), "size");

        let mut with_true = base.clone();
        with_true.set("prefix", Value::Bool(true));
        let prefixed = Delegate { namespace: ns.clone(), method: "size".into(), options: with_true };
        assert_eq!(prefixed.method_name(), "bar_size");

        let mut with_name = base;
        with_name.set("prefix", Value::Sym("inner".into()));
        let named = Delegate { namespace: ns, method: "size".into(), options: with_name };
        assert_eq!(named.method_name(), "inner_size");
    }
}
