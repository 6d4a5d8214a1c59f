//! Tree traversal utilities and reusable predicates.

use crate::ast::{Node, NodeKind};
use crate::rules::matchers::match_identifier;
use crate::validate::MatchTable;

/// Depth-first pre-order traversal: `f` sees every node, definitions are
/// descended into, declarations are leaves.
pub fn visit<'a, F>(tree: &'a [Node], f: &mut F)
where
    F: FnMut(&'a Node),
{
    for node in tree {
        f(node);
        if let NodeKind::Definition { contents, .. } = &node.kind {
            visit(contents, f);
        }
    }
}

/// Collect, in visit order, every node satisfying `predicate`.
pub fn flatten<'a>(tree: &'a [Node], mut predicate: impl FnMut(&Node) -> bool) -> Vec<&'a Node> {
    let mut nodes = Vec::new();
    visit(tree, &mut |node| {
        if predicate(node) {
            nodes.push(node);
        }
    });
    nodes
}

pub fn is_definition(node: &Node) -> bool {
    node.is_definition()
}

/// Predicate testing the rule a node matched (per `table`) against a
/// pattern with [`match_identifier`] semantics. Unmatched nodes and
/// uncompilable patterns test false.
pub fn matches_rule<'t>(table: &'t MatchTable, pattern: &'t str) -> impl Fn(&Node) -> bool + 't {
    move |node| {
        table
            .rule_for(node)
            .is_some_and(|rule| match_identifier(rule, pattern).unwrap_or(false))
    }
}

/// Predicate testing exact qualifier membership.
pub fn has_qualifier(name: &str) -> impl Fn(&Node) -> bool + '_ {
    move |node| node.qualifiers.iter().any(|qualifier| qualifier == name)
}
