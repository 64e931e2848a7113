//! Canonical signature formatting.
//!
//! The assembly pass concatenates header lines, declaration chunks and
//! footers without worrying about layout; this pass owns layout. Rules:
//! two-space indentation derived from `class`/`module`/`end` nesting, blank
//! runs collapsed to a single blank line, exactly one trailing newline.
//! The pass is idempotent: formatting already-formatted text is a no-op.

pub fn format(document: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut depth: usize = 0;
    let mut last_blank = true;

    for raw in document.lines() {
        let line = raw.trim();
        if line.is_empty() {
            if !last_blank {
                lines.push(String::new());
                last_blank = true;
            }
            continue;
        }
        if line == "end" {
            depth = depth.saturating_sub(1);
        }
        lines.push(format!("{}{}", "  ".repeat(depth), line));
        last_blank = false;
        if line.starts_with("class ") || line.starts_with("module ") {
            depth += 1;
        }
    }

    while lines.last().map(|l| l.is_empty()) == Some(true) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
