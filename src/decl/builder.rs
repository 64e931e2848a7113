//! Declaration builder.
//!
//! Turns a scope's macro invocations into declarations, recursing through
//! included mixins, then partitions by visibility and renders. Two pieces
//! of state are scoped to a single `build` call and never outlive it: the
//! set of already-processed mixin identities (the cycle guard that makes
//! mutual inclusion terminate) and the re-scan cache.
//!
//! Every invocation is processed under a guard: an internal error is logged
//! with its scope and macro kind and the invocation is dropped. One
//! malformed call never aborts the rest of the file.

use std::collections::HashSet;

use tracing::warn;

use crate::decl::include::{Include, ScanCache};
use crate::decl::{
    AttributeAccessor, ClassAttribute, Declaration, Delegate, IncludeDecl,
};
use crate::errors::Result;
use crate::eval::{self, Value};
use crate::model::ModuleIndex;
use crate::namespace::Namespace;
use crate::scan::{MacroCall, MacroKind};
use crate::sig::{MethodSearcher, SignatureLookup};

pub struct DeclarationBuilder<'a> {
    modules: &'a dyn ModuleIndex,
    searcher: MethodSearcher<'a>,
}

impl<'a> DeclarationBuilder<'a> {
    pub fn new(modules: &'a dyn ModuleIndex, signatures: &'a dyn SignatureLookup) -> Self {
        DeclarationBuilder { modules, searcher: MethodSearcher::new(signatures) }
    }

    /// Builds and renders a scope's declarations, split into public and
    /// private texts in source order.
    pub fn build(&self, namespace: &Namespace, calls: &[MacroCall]) -> (Vec<String>, Vec<String>) {
        let mut seen = HashSet::new();
        let mut cache = ScanCache::default();
        let declarations = self.build_calls(namespace, calls, &mut seen, &mut cache);
        let (public, private): (Vec<Declaration>, Vec<Declaration>) =
            declarations.into_iter().partition(Declaration::public);
        (
            public.iter().map(|d| self.render(d)).collect(),
            private.iter().map(|d| self.render(d)).collect(),
        )
    }

    fn build_calls(
        &self,
        namespace: &Namespace,
        calls: &[MacroCall],
        seen: &mut HashSet<String>,
        cache: &mut ScanCache,
    ) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        for call in calls {
            if let Err(error) = self.build_call(namespace, call, seen, cache, &mut declarations) {
                warn!(
                    scope = %namespace,
                    kind = call.kind.name(),
                    line = call.line,
                    %error,
                    "skipping macro call",
                );
            }
        }
        declarations
    }

    fn build_call(
        &self,
        namespace: &Namespace,
        call: &MacroCall,
        seen: &mut HashSet<String>,
        cache: &mut ScanCache,
        out: &mut Vec<Declaration>,
    ) -> Result<()> {
        match call.kind {
            MacroKind::ClassAttribute => self.build_class_attribute(call, out),
            MacroKind::Delegate => self.build_delegate(namespace, call, out),
            MacroKind::Include => self.build_include(namespace, call, seen, cache, out),
            MacroKind::CattrAccessor
            | MacroKind::MattrAccessor
            | MacroKind::CattrReader
            | MacroKind::MattrReader
            | MacroKind::CattrWriter
            | MacroKind::MattrWriter => self.build_attribute_accessor(call, out),
        }
    }

    fn build_attribute_accessor(&self, call: &MacroCall, out: &mut Vec<Declaration>) -> Result<()> {
        let (names, mut options) = eval::args_with_options(&call.args)?;
        match call.kind {
            MacroKind::CattrWriter | MacroKind::MattrWriter => {
                options.set("singleton_reader", Value::Bool(false));
                options.set("instance_reader", Value::Bool(false));
            }
            MacroKind::CattrReader | MacroKind::MattrReader => {
                options.set("singleton_writer", Value::Bool(false));
                options.set("instance_writer", Value::Bool(false));
            }
            _ => {}
        }
        self.attach_call_options(call, &mut options);
        for name in attribute_names(&names, call) {
            out.push(Declaration::AttributeAccessor(AttributeAccessor {
                name,
                options: options.clone(),
            }));
        }
        Ok(())
    }

    fn build_class_attribute(&self, call: &MacroCall, out: &mut Vec<Declaration>) -> Result<()> {
        let (names, mut options) = eval::args_with_options(&call.args)?;
        self.attach_call_options(call, &mut options);
        for name in attribute_names(&names, call) {
            out.push(Declaration::ClassAttribute(ClassAttribute {
                name,
                options: options.clone(),
            }));
        }
        Ok(())
    }

    fn build_delegate(
        &self,
        namespace: &Namespace,
        call: &MacroCall,
        out: &mut Vec<Declaration>,
    ) -> Result<()> {
        let (names, mut options) = eval::args_with_options(&call.args)?;
        if call.private {
            options.set("private", Value::Bool(true));
        }
        for name in attribute_names(&names, call) {
            out.push(Declaration::Delegate(Delegate {
                namespace: namespace.clone(),
                method: name,
                options: options.clone(),
            }));
        }
        Ok(())
    }

    fn build_include(
        &self,
        namespace: &Namespace,
        call: &MacroCall,
        seen: &mut HashSet<String>,
        cache: &mut ScanCache,
        out: &mut Vec<Declaration>,
    ) -> Result<()> {
        let values = eval::eval_args(&call.args)?;
        for value in values {
            let Some(module_path) = value.as_namespace() else {
                // Recoverable per item; siblings in the same call proceed.
                warn!(scope = %namespace, line = call.line, "include argument is not a module path");
                continue;
            };
            let include =
                Include::new(namespace.clone(), module_path.clone(), call.private, call.included);
            let Some(resolved) = include.module_name(self.modules) else {
                warn!(scope = %namespace, module = %module_path, "cannot resolve included module");
                continue;
            };
            // Cycle guard: each resolved identity contributes once per
            // top-level build call.
            if !seen.insert(resolved.to_string()) {
                continue;
            }

            let name = resolved.to_string();
            let concern = self.modules.is_concern(&name);
            let class_methods = self.modules.has_class_methods(&name);
            if include.deferred_origin() || (concern && class_methods) {
                out.push(Declaration::Include(IncludeDecl {
                    module_name: resolved.clone(),
                    deferred_origin: include.deferred_origin(),
                    concern,
                    class_methods,
                    private: include.private(),
                }));
            }

            let nested = include.nested_includes(&resolved, self.modules, cache);
            out.extend(self.build_calls(namespace, &nested, seen, cache));
            let deferred = include.block_calls(&resolved, self.modules, cache);
            out.extend(self.build_calls(namespace, &deferred, seen, cache));
        }
        Ok(())
    }

    fn attach_call_options(&self, call: &MacroCall, options: &mut crate::eval::Options) {
        if call.private {
            options.set("private", Value::Bool(true));
        }
        options.set("included", Value::Bool(call.included));
        if let Some(comment) = &call.trailing_comment {
            options.set("trailing_comment", Value::Str(comment.clone()));
        }
    }

    fn render(&self, declaration: &Declaration) -> String {
        match declaration {
            Declaration::AttributeAccessor(decl) => render_attribute_accessor(decl),
            Declaration::ClassAttribute(decl) => render_class_attribute(decl),
            Declaration::Delegate(decl) => self.render_delegate(decl),
            Declaration::Include(decl) => render_include(decl),
        }
    }

    fn render_delegate(&self, decl: &Delegate) -> String {
        let signatures = self.searcher.method_types_for(
            &decl.namespace,
            decl.to().unwrap_or_default(),
            &decl.method,
        );
        format!("def {}: {}", decl.method_name(), signatures.join(" | "))
    }
}

/// Positional arguments name the generated members; anything that is not a
/// symbol or string cannot name one and is dropped with a log line.
fn attribute_names(values: &[Value], call: &MacroCall) -> Vec<String> {
    let mut names = Vec::new();
    for value in values {
        match value.as_name() {
            Some(name) => names.push(name.to_string()),
            None => {
                warn!(kind = call.kind.name(), line = call.line, "argument does not name a member");
            }
        }
    }
    names
}

fn render_attribute_accessor(decl: &AttributeAccessor) -> String {
    let name = &decl.name;
    let ty = decl.type_decl();
    let mut methods = Vec::new();
    if decl.singleton_reader() {
        methods.push(format!("def self.{name}: () -> ({ty})"));
    }
    if decl.singleton_writer() {
        methods.push(format!("def self.{name}=: ({ty}) -> ({ty})"));
    }
    if decl.instance_reader() {
        methods.push(format!("def {name}: () -> ({ty})"));
    }
    if decl.instance_writer() {
        methods.push(format!("def {name}=: ({ty}) -> ({ty})"));
    }
    methods.join("\n")
}

fn render_class_attribute(decl: &ClassAttribute) -> String {
    let name = &decl.name;
    let ty = decl.type_decl();
    let mut methods = Vec::new();
    methods.push(format!("def self.{name}: () -> ({ty})"));
    methods.push(format!("def self.{name}=: ({ty}) -> ({ty})"));
    if decl.instance_predicate() {
        methods.push(format!("def self.{name}?: () -> bool"));
    }
    if decl.instance_reader() {
        methods.push(format!("def {name}: () -> ({ty})"));
    }
    if decl.instance_writer() {
        methods.push(format!("def {name}=: ({ty}) -> ({ty})"));
    }
    if decl.instance_predicate() && decl.instance_reader() {
        methods.push(format!("def {name}?: () -> bool"));
    }
    methods.join("\n")
}

fn render_include(decl: &IncludeDecl) -> String {
    if decl.deferred_origin {
        let mut lines = vec![format!("include {}", decl.module_name)];
        if decl.concern && decl.class_methods {
            lines.push(format!("extend {}::ClassMethods", decl.module_name));
        }
        lines.join("\n")
    } else {
        // Fresh-from-source includes are only declared for their
        // class-level extension; the instance-level include is already
        // visible in the source itself.
        format!("extend {}::ClassMethods", decl.module_name)
    }
}
