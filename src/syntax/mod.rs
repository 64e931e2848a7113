//! Host-language front end.
//!
//! rbsgen does not implement a Ruby parser. Parsing is delegated to the
//! tree-sitter Ruby grammar; this module owns everything downstream of that
//! boundary: lowering argument fragments out of the borrowed syntax tree
//! into an owned AST ([`ast`]), and the side-channel comment index used for
//! trailing type hints ([`comments`]).

pub mod ast;
pub mod comments;

pub use ast::{Expr, Node, Span};
pub use comments::CommentIndex;

use crate::errors::{Error, Result};
use tree_sitter::Tree;

/// Parses Ruby source text into a tree-sitter tree.
///
/// Partial syntax errors are tolerated: tree-sitter produces a best-effort
/// tree and the scanner simply does not match inside error nodes. Only a
/// wholesale parser failure raises.
pub fn parse(source: &str) -> Result<Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_ruby::LANGUAGE.into())
        .map_err(|_| Error::Parse)?;
    parser.parse(source, None).ok_or(Error::Parse)
}
