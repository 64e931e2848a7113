//! Side-channel comment index.
//!
//! Comments never reach the macro scanner through the statement walk; they
//! are collected in a separate pass over the same tree and classified by
//! line: a comment sharing its line with code is *trailing* (the position
//! type hints occupy, `cattr_accessor :name #: String`), a comment that is
//! the first thing on its line is *standalone*.

use std::collections::HashMap;

use tree_sitter::{Node, Tree};

#[derive(Debug, Default)]
pub struct CommentIndex {
    trailing: HashMap<usize, String>,
    standalone: HashMap<usize, String>,
}

impl CommentIndex {
    pub fn build(tree: &Tree, source: &str) -> Self {
        let lines: Vec<&str> = source.lines().collect();
        let mut index = CommentIndex::default();
        collect(tree.root_node(), source, &lines, &mut index);
        index
    }

    /// The trailing comment on a 1-based source line, if any.
    pub fn trailing(&self, line: usize) -> Option<&str> {
        self.trailing.get(&line).map(String::as_str)
    }

    pub fn standalone(&self, line: usize) -> Option<&str> {
        self.standalone.get(&line).map(String::as_str)
    }
}

fn collect(node: Node, source: &str, lines: &[&str], index: &mut CommentIndex) {
    if node.kind() == "comment" {
        let row = node.start_position().row;
        let column = node.start_position().column;
        let text = node
            .utf8_text(source.as_bytes())
            .unwrap_or_default()
            .trim_end()
            .to_string();
        let has_code_before = lines
            .get(row)
            .map(|line| line[..column.min(line.len())].trim().is_empty())
            == Some(false);
        if has_code_before {
            index.trailing.insert(row + 1, text);
        } else {
            index.standalone.insert(row + 1, text);
        }
        return;
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect(child, source, lines, index);
        }
    }
}
