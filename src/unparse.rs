//! Canonical-text rendering of tree nodes.
//!
//! The validator embeds unparsed nodes in its diagnostics; the CLI exposes
//! the same rendering through `--unparse`. Identifiers that are not plain
//! barewords are single-quoted, values render as JSON.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Modifiers, Node, NodeKind};

static BAREWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z_]+$").expect("static pattern compiles"));

/// Render a whole tree, descending into definition bodies.
pub fn unparse(tree: &[Node]) -> String {
    tree.iter().map(|node| render(node, 0, true)).collect()
}

/// Render one node. In non-recursive mode a definition's body becomes the
/// literal placeholder `{ ... }`.
pub fn unparse_node(node: &Node, recursive: bool) -> String {
    render(node, 0, recursive)
}

fn render(node: &Node, indent: usize, recursive: bool) -> String {
    let mut out = " ".repeat(indent);
    out.push_str(&render_qualifiers(&node.qualifiers));
    match &node.kind {
        NodeKind::Declaration {
            typename,
            varname,
            value,
        } => {
            out.push_str(&render_identifier(typename));
            out.push(' ');
            out.push_str(&render_identifier(varname));
            out.push_str(&render_modifiers(&node.modifiers));
            if let Some(value) = value {
                out.push('=');
                out.push_str(&value.to_string());
            }
            if let Some(description) = &node.description {
                out.push_str(&format!(" \"{description}\""));
            }
            out.push_str(";\n");
        }
        NodeKind::Definition { name, contents } => {
            out.push_str(&render_identifier(name));
            out.push_str(&render_modifiers(&node.modifiers));
            if let Some(description) = &node.description {
                out.push_str(&format!(" \"{description}\""));
            }
            if recursive {
                out.push_str(" {\n");
                for child in contents {
                    out.push_str(&render(child, indent + 2, true));
                }
                out.push_str(&" ".repeat(indent));
                out.push_str("}\n");
            } else {
                out.push_str(" { ... }");
            }
        }
    }
    out
}

fn render_identifier(id: &str) -> String {
    if BAREWORD.is_match(id) {
        id.to_string()
    } else {
        format!("'{id}'")
    }
}

fn render_qualifiers(qualifiers: &[String]) -> String {
    let mut out = String::new();
    for qualifier in qualifiers {
        out.push_str(&render_identifier(qualifier));
        out.push(' ');
    }
    out
}

fn render_modifiers(modifiers: &Modifiers) -> String {
    if modifiers.is_empty() {
        return String::new();
    }
    let entries: Vec<String> = modifiers
        .iter()
        .map(|(key, value)| format!("{}={}", render_identifier(key), value))
        .collect();
    format!("({})", entries.join(","))
}
