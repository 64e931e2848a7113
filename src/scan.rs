//! Macro scanner.
//!
//! One pass over a file's syntax tree produces a per-scope, insertion-ordered
//! index of recognized macro invocations. The walk is scope-aware: class and
//! module definitions push a namespace segment and reset visibility, method
//! bodies are skipped entirely (calls inside them define nothing), and the
//! `included do ... end` callback of the concern protocol is entered with a
//! deferred flag that tags every invocation captured inside it. The flag
//! lives in an explicit traversal context threaded through the walk, so the
//! scanner holds no state between calls.

use std::collections::HashMap;

use tree_sitter::Node as TsNode;

use crate::errors::Result;
use crate::namespace::Namespace;
use crate::syntax::{self, ast, CommentIndex, Expr, Node};

/// The closed set of member-defining macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    ClassAttribute,
    Delegate,
    CattrAccessor,
    MattrAccessor,
    CattrReader,
    MattrReader,
    CattrWriter,
    MattrWriter,
    Include,
}

impl MacroKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "class_attribute" => Some(MacroKind::ClassAttribute),
            "delegate" => Some(MacroKind::Delegate),
            "cattr_accessor" => Some(MacroKind::CattrAccessor),
            "mattr_accessor" => Some(MacroKind::MattrAccessor),
            "cattr_reader" => Some(MacroKind::CattrReader),
            "mattr_reader" => Some(MacroKind::MattrReader),
            "cattr_writer" => Some(MacroKind::CattrWriter),
            "mattr_writer" => Some(MacroKind::MattrWriter),
            "include" => Some(MacroKind::Include),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MacroKind::ClassAttribute => "class_attribute",
            MacroKind::Delegate => "delegate",
            MacroKind::CattrAccessor => "cattr_accessor",
            MacroKind::MattrAccessor => "mattr_accessor",
            MacroKind::CattrReader => "cattr_reader",
            MacroKind::MattrReader => "mattr_reader",
            MacroKind::CattrWriter => "cattr_writer",
            MacroKind::MattrWriter => "mattr_writer",
            MacroKind::Include => "include",
        }
    }
}

/// One recognized macro invocation, recorded before interpretation.
/// Visibility and the deferred flag are fixed here and never recomputed.
#[derive(Debug, Clone)]
pub struct MacroCall {
    pub kind: MacroKind,
    pub args: Vec<Node>,
    pub private: bool,
    pub included: bool,
    pub trailing_comment: Option<String>,
    pub line: usize,
}

/// Per-scope invocation index. Scope order is first-seen order; call order
/// within a scope is source order. Both determine output order.
#[derive(Debug, Default)]
pub struct ScanIndex {
    order: Vec<Namespace>,
    calls: HashMap<Namespace, Vec<MacroCall>>,
}

impl ScanIndex {
    fn push(&mut self, namespace: &Namespace, call: MacroCall) {
        if !self.calls.contains_key(namespace) {
            self.order.push(namespace.clone());
        }
        self.calls.entry(namespace.clone()).or_default().push(call);
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Namespace> {
        self.order.iter()
    }

    pub fn calls_for(&self, namespace: &Namespace) -> &[MacroCall] {
        self.calls.get(namespace).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Scans one file's source text.
pub fn scan(source: &str) -> Result<ScanIndex> {
    let tree = syntax::parse(source)?;
    let comments = CommentIndex::build(&tree, source);
    let mut index = ScanIndex::default();
    let mut ctx = WalkCtx {
        namespace: Namespace::root(),
        private: false,
        deferred: false,
    };
    let mut scanner = Walk { source, comments: &comments, index: &mut index };
    scanner.body(tree.root_node(), &mut ctx);
    Ok(index)
}

/// Traversal context. `private` mutates across siblings within one body
/// (a bare `private` marker applies to everything after it); `deferred` is
/// saved and restored around `included` blocks, so nested blocks cannot
/// toggle it back off early.
struct WalkCtx {
    namespace: Namespace,
    private: bool,
    deferred: bool,
}

struct Walk<'a> {
    source: &'a str,
    comments: &'a CommentIndex,
    index: &'a mut ScanIndex,
}

impl Walk<'_> {
    fn body(&mut self, node: TsNode, ctx: &mut WalkCtx) {
        let mut cursor = node.walk();
        let children: Vec<TsNode> = node.named_children(&mut cursor).collect();
        for child in children {
            self.statement(child, ctx);
        }
    }

    fn statement(&mut self, node: TsNode, ctx: &mut WalkCtx) {
        match node.kind() {
            "class" | "module" => self.scope(node, ctx),
            // Calls inside method bodies are not member-defining.
            "method" | "singleton_method" | "singleton_class" => {}
            "identifier" => match self.text(node).as_str() {
                "private" => ctx.private = true,
                "public" => ctx.private = false,
                _ => {}
            },
            "call" => self.call(node, ctx),
            // Structural nodes are traversed transparently; visibility
            // markers inside them apply to the enclosing scope.
            "body_statement" | "begin" | "then" | "else" | "if" | "unless" | "elsif"
            | "case" | "when" | "while" | "until" | "do_block" | "block" => {
                self.body(node, ctx);
            }
            _ => {}
        }
    }

    fn scope(&mut self, node: TsNode, ctx: &WalkCtx) {
        let Some(name) = node.child_by_field_name("name") else { return };
        let lowered = ast::lower(name, self.source);
        let Expr::Const { path, absolute } = lowered.expr else { return };
        let written = Namespace::new(path, absolute);
        let mut inner = WalkCtx {
            namespace: &ctx.namespace + &written,
            private: false,
            deferred: ctx.deferred,
        };
        match node.child_by_field_name("body") {
            Some(body) => self.body(body, &mut inner),
            None => {
                let mut cursor = node.walk();
                let children: Vec<TsNode> = node.named_children(&mut cursor).collect();
                for child in children {
                    if child.id() == name.id() || child.kind() == "superclass" {
                        continue;
                    }
                    self.statement(child, &mut inner);
                }
            }
        }
    }

    fn call(&mut self, node: TsNode, ctx: &mut WalkCtx) {
        let receiver = node.child_by_field_name("receiver");
        let block = node.child_by_field_name("block");
        let arguments = node.child_by_field_name("arguments");
        let name = node
            .child_by_field_name("method")
            .map(|m| self.text(m))
            .unwrap_or_default();

        if receiver.is_none() {
            // The deferred-inclusion callback: enter the block with the
            // deferred flag raised for everything inside it.
            if name == "included" && arguments.is_none() {
                if let Some(block) = block {
                    let was_deferred = ctx.deferred;
                    ctx.deferred = true;
                    self.body(block, ctx);
                    ctx.deferred = was_deferred;
                    return;
                }
            }

            if let Some(kind) = MacroKind::from_name(&name) {
                let line = node.end_position().row + 1;
                self.index.push(
                    &ctx.namespace,
                    MacroCall {
                        kind,
                        args: ast::lower_args(arguments, self.source),
                        private: ctx.private,
                        included: ctx.deferred,
                        trailing_comment: self.comments.trailing(line).map(str::to_string),
                        line,
                    },
                );
                return;
            }

            // `private`/`public` written as argumentless calls.
            if block.is_none() && arguments.is_none() {
                match name.as_str() {
                    "private" => ctx.private = true,
                    "public" => ctx.private = false,
                    _ => {}
                }
            }
        }

        // Arbitrary blocks at class level still define members in the
        // enclosing scope.
        if let Some(block) = block {
            self.body(block, ctx);
        }
    }

    fn text(&self, node: TsNode) -> String {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default().to_string()
    }
}
