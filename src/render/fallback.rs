//! YAML-like rendering for services without a dedicated template.
//!
//! Output rules, with `pad` being two spaces per nesting level:
//!
//! - scalar entry: `{pad}{key}: {value}`
//! - nested entry: `{pad}{key}: ` followed by its children one level deeper
//! - scalar item: `{pad}- {value} `
//! - nested item: `{pad}- ` followed by its children one level deeper

use crate::model::NormalizedNode;

const INDENT_WIDTH: usize = 2;

/// Render a normalized tree as an indented text block.
///
/// Lines are joined with `\n` and there is no trailing newline.
pub fn render_fallback(node: &NormalizedNode) -> String {
    let mut lines = Vec::new();
    match node {
        NormalizedNode::Scalar(s) => lines.push(s.to_string()),
        NormalizedNode::Sequence(items) => write_items(items, 0, &mut lines),
        NormalizedNode::Mapping(entries) => write_entries(entries, 0, &mut lines),
    }
    lines.join("\n")
}

fn write_entries(entries: &[(String, NormalizedNode)], depth: usize, lines: &mut Vec<String>) {
    let pad = " ".repeat(depth * INDENT_WIDTH);
    for (key, value) in entries {
        match value {
            NormalizedNode::Scalar(s) => lines.push(format!("{}{}: {}", pad, key, s)),
            NormalizedNode::Sequence(items) => {
                lines.push(format!("{}{}: ", pad, key));
                write_items(items, depth + 1, lines);
            }
            NormalizedNode::Mapping(children) => {
                lines.push(format!("{}{}: ", pad, key));
                write_entries(children, depth + 1, lines);
            }
        }
    }
}

fn write_items(items: &[NormalizedNode], depth: usize, lines: &mut Vec<String>) {
    let pad = " ".repeat(depth * INDENT_WIDTH);
    for item in items {
        match item {
            NormalizedNode::Scalar(s) => lines.push(format!("{}- {} ", pad, s)),
            NormalizedNode::Sequence(nested) => {
                lines.push(format!("{}- ", pad));
                write_items(nested, depth + 1, lines);
            }
            NormalizedNode::Mapping(children) => {
                lines.push(format!("{}- ", pad));
                write_entries(children, depth + 1, lines);
            }
        }
    }
}
