//! Owned argument-fragment AST.
//!
//! Macro invocations are recorded before they are interpreted, so their
//! argument lists must outlive the borrowed tree-sitter tree. `lower`
//! converts the CST argument nodes into this owned form once, at scan time.
//!
//! The grammar is bounded deliberately: literals, arrays, hashes and
//! constant paths lower to structured variants; calls, bare identifiers,
//! lambdas and blocks lower to [`Expr::Opaque`] (inspectable, not
//! evaluable); everything else lowers to [`Expr::Unknown`], the evaluator's
//! hard-error arm.

use tree_sitter::Node as TsNode;

/// Byte span plus the 1-based line the fragment ends on. The line feeds the
/// trailing-comment lookup and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Span {
    pub fn of(node: &TsNode) -> Self {
        Span {
            start: node.start_byte(),
            end: node.end_byte(),
            line: node.end_position().row + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub expr: Expr,
    pub span: Span,
}

impl Node {
    pub fn new(expr: Expr, span: Span) -> Self {
        Node { expr, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Sym(String),
    Array(Vec<Node>),
    Hash(Vec<(Node, Node)>),
    /// A constant path: `Foo`, `Foo::Bar`, `::Foo`.
    Const { path: Vec<String>, absolute: bool },
    /// A non-literal construct the evaluator passes through unevaluated.
    Opaque { kind: String, text: String },
    /// Grammar outside the supported subset; evaluating it is an error.
    Unknown { kind: String, text: String },
}

/// Lowers the children of an `argument_list` (or any slice of argument
/// nodes). Ruby allows bare keyword arguments only in trailing position;
/// all `pair` nodes are folded into a single trailing hash, matching the
/// shape produced by an explicit brace hash.
pub fn lower_args(args: Option<TsNode>, source: &str) -> Vec<Node> {
    let Some(list) = args else { return Vec::new() };

    let mut cursor = list.walk();
    let mut lowered = Vec::new();
    let mut pairs = Vec::new();
    let mut pair_span = Span::default();

    for child in list.named_children(&mut cursor) {
        if child.kind() == "pair" {
            if pairs.is_empty() {
                pair_span = Span::of(&child);
            }
            pair_span.end = child.end_byte();
            pair_span.line = child.end_position().row + 1;
            pairs.push(lower_pair(child, source));
        } else {
            lowered.push(lower(child, source));
        }
    }

    if !pairs.is_empty() {
        lowered.push(Node::new(Expr::Hash(pairs), pair_span));
    }
    lowered
}

/// Lowers one CST node into an owned fragment. Total: every node kind maps
/// to some variant, and the unknown arm is an explicit value rather than a
/// failure.
pub fn lower(node: TsNode, source: &str) -> Node {
    let span = Span::of(&node);
    let expr = lower_expr(node, source);
    Node::new(expr, span)
}

fn lower_expr(node: TsNode, source: &str) -> Expr {
    match node.kind() {
        "nil" => Expr::Nil,
        "true" => Expr::Bool(true),
        "false" => Expr::Bool(false),
        "integer" => lower_integer(&node_text(node, source)),
        "float" => node_text(node, source)
            .replace('_', "")
            .parse::<f64>()
            .map(Expr::Float)
            .unwrap_or_else(|_| unknown(node, source)),
        "string" => lower_string(node, source),
        "simple_symbol" => {
            let text = node_text(node, source);
            Expr::Sym(text.trim_start_matches(':').to_string())
        }
        "delimited_symbol" => match literal_content(node, source) {
            Some(content) => Expr::Sym(content),
            None => opaque(node, source),
        },
        "array" => {
            let mut cursor = node.walk();
            let items = node
                .named_children(&mut cursor)
                .map(|c| lower(c, source))
                .collect();
            Expr::Array(items)
        }
        "hash" => lower_hash(node, source),
        "constant" => Expr::Const { path: vec![node_text(node, source)], absolute: false },
        "scope_resolution" => match const_path(node, source) {
            Some((path, absolute)) => Expr::Const { path, absolute },
            None => opaque(node, source),
        },
        "unary" => lower_unary(node, source),
        "parenthesized_statements" => {
            let mut cursor = node.walk();
            let mut inner = node.named_children(&mut cursor);
            match (inner.next(), inner.next()) {
                (Some(only), None) => lower_expr(only, source),
                _ => opaque(node, source),
            }
        }
        // Inspectable but not evaluable: calls, references, callables.
        "call" | "identifier" | "lambda" | "block" | "do_block" | "block_argument"
        | "method" => opaque(node, source),
        _ => unknown(node, source),
    }
}

fn lower_pair(pair: TsNode, source: &str) -> (Node, Node) {
    let key = pair
        .child_by_field_name("key")
        .map(|k| {
            if k.kind() == "hash_key_symbol" {
                Node::new(Expr::Sym(node_text(k, source)), Span::of(&k))
            } else {
                lower(k, source)
            }
        })
        .unwrap_or_else(|| Node::new(Expr::Nil, Span::of(&pair)));
    let value = pair
        .child_by_field_name("value")
        .map(|v| lower(v, source))
        .unwrap_or_else(|| Node::new(Expr::Nil, Span::of(&pair)));
    (key, value)
}

fn lower_hash(node: TsNode, source: &str) -> Expr {
    let mut cursor = node.walk();
    let mut pairs = Vec::new();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "pair" {
            pairs.push(lower_pair(child, source));
        } else {
            // Splats and other non-pair entries make the hash non-literal.
            return opaque(node, source);
        }
    }
    Expr::Hash(pairs)
}

fn lower_integer(text: &str) -> Expr {
    let cleaned = text.replace('_', "");
    let (digits, radix) = match cleaned.get(..2) {
        Some("0x") | Some("0X") => (&cleaned[2..], 16),
        Some("0b") | Some("0B") => (&cleaned[2..], 2),
        Some("0o") | Some("0O") => (&cleaned[2..], 8),
        _ => (cleaned.as_str(), 10),
    };
    match i64::from_str_radix(digits, radix) {
        Ok(value) => Expr::Int(value),
        Err(_) => Expr::Unknown { kind: "integer".into(), text: text.to_string() },
    }
}

fn lower_unary(node: TsNode, source: &str) -> Expr {
    let text = node_text(node, source);
    let operand = node.named_child(0);
    match (text.starts_with('-'), operand.map(|o| lower_expr(o, source))) {
        (true, Some(Expr::Int(value))) => Expr::Int(-value),
        (true, Some(Expr::Float(value))) => Expr::Float(-value),
        _ => unknown(node, source),
    }
}

fn lower_string(node: TsNode, source: &str) -> Expr {
    match literal_content(node, source) {
        Some(content) => Expr::Str(content),
        // Interpolation makes the value run-time dependent.
        None => opaque(node, source),
    }
}

/// Concatenates `string_content`/`escape_sequence` children; `None` when the
/// literal contains interpolation or other dynamic parts.
fn literal_content(node: TsNode, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let mut content = String::new();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "string_content" => content.push_str(&node_text(child, source)),
            "escape_sequence" => content.push_str(&unescape(&node_text(child, source))),
            _ => return None,
        }
    }
    Some(content)
}

fn unescape(sequence: &str) -> String {
    match sequence {
        "\\n" => "\n".to_string(),
        "\\t" => "\t".to_string(),
        "\\r" => "\r".to_string(),
        "\\\\" => "\\".to_string(),
        "\\\"" => "\"".to_string(),
        "\\'" => "'".to_string(),
        "\\0" => "\0".to_string(),
        other => other.trim_start_matches('\\').to_string(),
    }
}

/// Flattens a `scope_resolution` chain into path segments. `None` when the
/// leftmost scope is an arbitrary expression rather than a constant.
fn const_path(node: TsNode, source: &str) -> Option<(Vec<String>, bool)> {
    let name = node.child_by_field_name("name")?;
    let segment = node_text(name, source);
    match node.child_by_field_name("scope") {
        None => Some((vec![segment], true)),
        Some(scope) => match scope.kind() {
            "constant" => Some((vec![node_text(scope, source), segment], false)),
            "scope_resolution" => {
                let (mut path, absolute) = const_path(scope, source)?;
                path.push(segment);
                Some((path, absolute))
            }
            _ => None,
        },
    }
}

fn opaque(node: TsNode, source: &str) -> Expr {
    Expr::Opaque { kind: node.kind().to_string(), text: node_text(node, source) }
}

fn unknown(node: TsNode, source: &str) -> Expr {
    Expr::Unknown { kind: node.kind().to_string(), text: node_text(node, source) }
}

fn node_text(node: TsNode, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or_default().to_string()
}
