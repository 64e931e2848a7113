//! Module oracle.
//!
//! Mixin resolution and header rendering need to ask questions about the
//! project's module graph: does a qualified name exist, is it a concern,
//! does it expose a `ClassMethods` companion, what is a class's superclass,
//! and where is its source (for recursive re-scanning). [`ModuleIndex`] is
//! that narrow read-only capability; [`ProjectIndex`] implements it from a
//! one-shot scan of the input directories, so tests can build fixtures
//! through the exact same type.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;
use tree_sitter::Node as TsNode;
use walkdir::WalkDir;

use crate::errors::Result;
use crate::namespace::Namespace;
use crate::syntax::{self, ast, Expr};

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleKind {
    /// Superclass is the resolved absolute name, when one was declared.
    Class { superclass: Option<String> },
    Module,
}

/// Source text of the file a module was defined in, for re-scanning.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: Arc<str>,
}

/// Read-only questions the synthesis pipeline asks about the module graph.
pub trait ModuleIndex {
    fn exists(&self, name: &str) -> bool;

    /// Whether the module implements the deferred-inclusion protocol
    /// (`extend ActiveSupport::Concern` in its body).
    fn is_concern(&self, name: &str) -> bool;

    fn kind_of(&self, name: &str) -> Option<ModuleKind>;

    fn source_of(&self, name: &str) -> Option<SourceFile>;

    /// Whether the companion class-level extension module exists.
    fn has_class_methods(&self, name: &str) -> bool {
        self.exists(&format!("{name}::ClassMethods"))
    }
}

#[derive(Debug, Default)]
pub struct ProjectIndex {
    records: HashMap<String, Record>,
}

#[derive(Debug)]
struct Record {
    class: bool,
    concern: bool,
    /// Superclass as written, plus the namespace it was written in;
    /// resolution happens lazily against the finished index.
    superclass: Option<(Namespace, Namespace)>,
    source: Option<SourceFile>,
}

impl ProjectIndex {
    /// Builds the index over every `.rb` file under the given directories.
    /// Unreadable or unparseable files are logged and skipped; discovery
    /// order is sorted for determinism.
    pub fn scan_dirs(dirs: &[PathBuf]) -> Self {
        let mut index = ProjectIndex::default();
        for dir in dirs {
            for entry in WalkDir::new(dir).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(error) => {
                        warn!(%error, "skipping unreadable directory entry");
                        continue;
                    }
                };
                let path = entry.path();
                if !entry.file_type().is_file() || path.extension().map(|e| e != "rb").unwrap_or(true) {
                    continue;
                }
                let source = match std::fs::read_to_string(path) {
                    Ok(source) => source,
                    Err(error) => {
                        warn!(path = %path.display(), %error, "skipping unreadable file");
                        continue;
                    }
                };
                if let Err(error) = index.add_file(path, &source) {
                    warn!(path = %path.display(), %error, "skipping unparseable file");
                }
            }
        }
        index
    }

    /// Records every class/module definition in one file.
    pub fn add_file(&mut self, path: impl AsRef<Path>, source: &str) -> Result<()> {
        let tree = syntax::parse(source)?;
        let file = SourceFile {
            path: path.as_ref().to_path_buf(),
            text: Arc::from(source),
        };
        self.collect(tree.root_node(), source, &Namespace::root(), &file);
        Ok(())
    }

    fn collect(&mut self, node: TsNode, source: &str, context: &Namespace, file: &SourceFile) {
        let mut cursor = node.walk();
        let children: Vec<TsNode> = node.named_children(&mut cursor).collect();
        for child in children {
            self.collect_child(child, source, context, file);
        }
    }

    fn collect_child(&mut self, child: TsNode, source: &str, context: &Namespace, file: &SourceFile) {
        match child.kind() {
            "class" | "module" => self.definition(child, source, context, file),
            "method" | "singleton_method" => {}
            "call" => {
                if let Some(argument) = concern_extend_argument(child, source) {
                    if argument == "ActiveSupport::Concern" {
                        self.mark_concern(context);
                    }
                }
            }
            "body_statement" | "begin" | "then" | "else" | "if" | "unless" | "elsif"
            | "case" | "when" => self.collect(child, source, context, file),
            _ => {}
        }
    }

    fn definition(&mut self, node: TsNode, source: &str, context: &Namespace, file: &SourceFile) {
        let Some(name) = node.child_by_field_name("name") else { return };
        let lowered = ast::lower(name, source);
        let Expr::Const { path, absolute } = lowered.expr else { return };
        let qualified = context + &Namespace::new(path, absolute);

        let is_class = node.kind() == "class";
        let superclass = node
            .child_by_field_name("superclass")
            .and_then(|sup| sup.named_child(0))
            .and_then(|expr| match ast::lower(expr, source).expr {
                Expr::Const { path, absolute } => {
                    Some((Namespace::new(path, absolute), qualified.parent()))
                }
                _ => None,
            });

        let record = self.records.entry(qualified.to_string()).or_insert(Record {
            class: false,
            concern: false,
            superclass: None,
            source: None,
        });
        record.class |= is_class;
        if record.superclass.is_none() {
            record.superclass = superclass;
        }
        if record.source.is_none() {
            record.source = Some(file.clone());
        }

        match node.child_by_field_name("body") {
            Some(body) => self.collect(body, source, &qualified, file),
            None => {
                let mut cursor = node.walk();
                let children: Vec<TsNode> = node.named_children(&mut cursor).collect();
                for child in children {
                    if child.id() == name.id() || child.kind() == "superclass" {
                        continue;
                    }
                    self.collect_child(child, source, &qualified, file);
                }
            }
        }
    }

    fn mark_concern(&mut self, namespace: &Namespace) {
        if let Some(record) = self.records.get_mut(&namespace.to_string()) {
            record.concern = true;
        }
    }

    fn resolve(&self, written: &Namespace, context: &Namespace) -> String {
        let mut scope = context.clone();
        loop {
            let candidate = &scope + written;
            if self.records.contains_key(&candidate.to_string()) {
                return candidate.to_string();
            }
            if scope.is_root() {
                break;
            }
            scope = scope.parent();
        }
        if written.is_absolute() {
            written.to_string()
        } else {
            format!("::{written}")
        }
    }
}

/// `extend X` written directly in a module body, returning X as written.
fn concern_extend_argument(call: TsNode, source: &str) -> Option<String> {
    if call.child_by_field_name("receiver").is_some() {
        return None;
    }
    let method = call.child_by_field_name("method")?;
    if method.utf8_text(source.as_bytes()).ok()? != "extend" {
        return None;
    }
    let arguments = call.child_by_field_name("arguments")?;
    let first = arguments.named_child(0)?;
    match ast::lower(first, source).expr {
        Expr::Const { path, .. } => Some(path.join("::")),
        _ => None,
    }
}

impl ModuleIndex for ProjectIndex {
    fn exists(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    fn is_concern(&self, name: &str) -> bool {
        self.records.get(name).map(|r| r.concern).unwrap_or(false)
    }

    fn kind_of(&self, name: &str) -> Option<ModuleKind> {
        let record = self.records.get(name)?;
        if record.class {
            let superclass = record
                .superclass
                .as_ref()
                .map(|(written, context)| self.resolve(written, context));
            Some(ModuleKind::Class { superclass })
        } else {
            Some(ModuleKind::Module)
        }
    }

    fn source_of(&self, name: &str) -> Option<SourceFile> {
        self.records.get(name).and_then(|r| r.source.clone())
    }
}
