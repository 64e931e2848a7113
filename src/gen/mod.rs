//! Signature document assembly.
//!
//! The generator is the per-file entry point: scan the source, build each
//! scope's declarations, wrap them in scope headers that mirror the
//! original nesting (classes keep their superclass), partition by
//! visibility, and run the result through the canonical formatter. A file
//! whose scopes all come up empty produces nothing at all.

pub mod format;

use std::path::Path;

use crate::decl::DeclarationBuilder;
use crate::errors::{Error, Result};
use crate::model::{ModuleIndex, ModuleKind};
use crate::namespace::Namespace;
use crate::scan::{self, MacroCall};
use crate::sig::SignatureLookup;

pub struct Generator<'a> {
    modules: &'a dyn ModuleIndex,
    builder: DeclarationBuilder<'a>,
}

impl<'a> Generator<'a> {
    pub fn new(modules: &'a dyn ModuleIndex, signatures: &'a dyn SignatureLookup) -> Self {
        Generator { modules, builder: DeclarationBuilder::new(modules, signatures) }
    }

    pub fn generate_file(&self, path: &Path) -> Result<Option<String>> {
        let source = std::fs::read_to_string(path)
            .map_err(|source| Error::read(path.display().to_string(), source))?;
        self.generate(&source)
    }

    /// Synthesizes the signature document for one file's source, or `None`
    /// when there is nothing to emit.
    pub fn generate(&self, source: &str) -> Result<Option<String>> {
        let index = scan::scan(source)?;
        let mut sections = Vec::new();

        for scope in index.scopes() {
            // Deferred invocations belong to whichever scope eventually
            // includes the mixin, not to the mixin's own document.
            let calls: Vec<MacroCall> = index
                .calls_for(scope)
                .iter()
                .filter(|call| !call.included)
                .cloned()
                .collect();
            if calls.is_empty() {
                continue;
            }
            let (public, private) = self.builder.build(scope, &calls);
            if public.is_empty() && private.is_empty() {
                continue;
            }
            sections.push(self.render_scope(scope, &public, &private));
        }

        if sections.is_empty() {
            return Ok(None);
        }
        Ok(Some(format::format(&sections.join("\n"))))
    }

    fn render_scope(&self, scope: &Namespace, public: &[String], private: &[String]) -> String {
        let mut lines: Vec<String> = vec!["# resolve-type-names: false".into(), String::new()];

        for ancestor in scope.ancestry() {
            lines.push(self.header(&ancestor));
        }
        for declaration in public {
            lines.push(declaration.clone());
        }
        if !private.is_empty() {
            lines.push(String::new());
            lines.push("private".into());
            lines.push(String::new());
            for declaration in private {
                lines.push(declaration.clone());
            }
        }
        for _ in scope.segments() {
            lines.push("end".into());
        }
        lines.join("\n")
    }

    /// A header line mirroring the original definition. Names the index has
    /// never seen render as modules; that only affects the wrapper, never
    /// the members inside it.
    fn header(&self, namespace: &Namespace) -> String {
        match self.modules.kind_of(&namespace.to_string()) {
            Some(ModuleKind::Class { superclass }) => format!(
                "class {} < {}",
                namespace,
                superclass.unwrap_or_else(|| "::Object".to_string())
            ),
            Some(ModuleKind::Module) | None => format!("module {namespace}"),
        }
    }
}
