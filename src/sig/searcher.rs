//! Type inference for delegated calls.
//!
//! A `delegate :size, to: :bar` inside `Foo` forwards `size` to whatever
//! `Foo#bar` returns. The searcher chases that one hop through the
//! signature table: look up the target's signatures on the enclosing type,
//! collect the distinct return types (unwrapping one optional level), and
//! union the forwarded method's signatures across them. Anything the table
//! cannot answer degrades to the generic fallback signature.

use crate::namespace::Namespace;
use crate::sig::SignatureLookup;

/// The fallback when the table has no answer, or the target is typed as
/// fully generic.
pub const UNTYPED_SIGNATURE: &str = "() -> untyped";

pub struct MethodSearcher<'a> {
    table: &'a dyn SignatureLookup,
}

impl<'a> MethodSearcher<'a> {
    pub fn new(table: &'a dyn SignatureLookup) -> Self {
        MethodSearcher { table }
    }

    /// Signatures for `method` as forwarded from `namespace` via `target`.
    /// First-discovery order, de-duplicated, never empty.
    pub fn method_types_for(
        &self,
        namespace: &Namespace,
        target: &str,
        method: &str,
    ) -> Vec<String> {
        let target_types = self.table.method_types(&namespace.to_string(), target);

        // A fully generic target makes every forwarded signature moot.
        if target_types.iter().any(|t| t.ret.is_untyped()) {
            return vec![UNTYPED_SIGNATURE.to_string()];
        }

        let mut return_names: Vec<&str> = Vec::new();
        for method_type in &target_types {
            if !return_names.contains(&method_type.ret.name.as_str()) {
                return_names.push(&method_type.ret.name);
            }
        }

        let mut signatures: Vec<String> = Vec::new();
        for name in return_names {
            for method_type in self.table.method_types(name, method) {
                let rendered = method_type.to_string();
                if !signatures.contains(&rendered) {
                    signatures.push(rendered);
                }
            }
        }

        if signatures.is_empty() {
            signatures.push(UNTYPED_SIGNATURE.to_string());
        }
        signatures
    }
}
