//! Structural validator.
//!
//! Checks a content tree against a rule tree: every content node must match
//! some rule group, every group must see a match count inside its
//! cardinality bounds, and matched definitions recurse into their contents.
//! Soft violations accumulate as human-readable issues; fatally
//! misconfigured rule trees abort with a [`RuleError`].
//!
//! Matching never mutates either tree. The rule a node matched and its
//! match ordinal are recorded in the returned [`MatchTable`], keyed by node
//! id.

use std::collections::HashMap;

use serde_json::Value;

use crate::ast::{Node, NodeId, NodeKind};
use crate::errors::RuleError;
use crate::rules::index::{index_rules, RuleGroup};
use crate::rules::matchers::{
    match_identifier, match_modifiers, match_qualifiers, match_value,
};
use crate::unparse::unparse_node;

/// Which rule a content node matched, and how many matches the rule's group
/// had seen before this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub rule: String,
    pub ordinal: usize,
}

/// Match annotations for one validation run, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTable(HashMap<NodeId, MatchInfo>);

impl MatchTable {
    pub fn get(&self, id: NodeId) -> Option<&MatchInfo> {
        self.0.get(&id)
    }

    /// Name of the rule `node` matched, if any.
    pub fn rule_for(&self, node: &Node) -> Option<&str> {
        self.get(node.id).map(|info| info.rule.as_str())
    }

    /// Match ordinal of `node` within its rule group, if it matched.
    pub fn ordinal_for(&self, node: &Node) -> Option<usize> {
        self.get(node.id).map(|info| info.ordinal)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MatchInfo)> {
        self.0.iter().map(|(id, info)| (*id, info))
    }

    fn insert(&mut self, id: NodeId, info: MatchInfo) {
        self.0.insert(id, info);
    }
}

/// Everything one validation run produced.
#[derive(Debug, Clone, Default)]
pub struct Validation {
    /// Human-readable issues in discovery order; empty means conformant.
    pub issues: Vec<String>,
    pub matches: MatchTable,
}

impl Validation {
    pub fn is_conformant(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate `tree` against `rules`.
///
/// Both trees are read-only; identical inputs always produce identical
/// issues and identical match annotations.
pub fn process(tree: &[Node], rules: &[Node]) -> Result<Validation, RuleError> {
    let mut validation = Validation::default();
    check_level(tree, rules, &mut validation)?;
    Ok(validation)
}

/// Validate one level of the content tree against one rule sequence.
///
/// `rules` is the effective rule set for this level: a definition's own
/// nested rules when descending normally, or the caller's full rule set
/// when a recursive group re-applies it.
fn check_level(tree: &[Node], rules: &[Node], out: &mut Validation) -> Result<(), RuleError> {
    let index = index_rules(rules)?;
    let mut groups = index.groups;
    out.issues.extend(index.issues);

    for node in tree {
        let mut reasons = Vec::new();
        let mut matched = false;
        // Groups are attempted in first-appearance order, candidates in
        // rule-tree order; the first success wins and there is no
        // backtracking afterwards.
        for (rulename, group) in groups.iter_mut() {
            let context = if group.recursive { Some(rules) } else { None };
            let mut hit = false;
            for rule in &group.candidates {
                if try_match(node, rule, rulename, context, out, &mut reasons)? {
                    hit = true;
                    break;
                }
            }
            if hit {
                out.matches.insert(
                    node.id,
                    MatchInfo {
                        rule: rulename.clone(),
                        ordinal: group.count,
                    },
                );
                tracing::debug!(rule = %rulename, ordinal = group.count, "node matched");
                group.count += 1;
                matched = true;
                break;
            }
        }
        if !matched {
            out.issues.push(unmatched_issue(node, &reasons));
            tracing::debug!(reasons = reasons.len(), "node unmatched");
        }
    }

    for (rulename, group) in &groups {
        if group.count < group.min {
            out.issues.push(format!(
                "Expected at least {} matches for rule {} but found {}",
                group.min, rulename, group.count
            ));
        }
        if let Some(max) = group.max {
            if group.count > max {
                out.issues.push(format!(
                    "Expected at most {} matches for rule {} but found {}",
                    max, rulename, group.count
                ));
            }
        }
    }
    Ok(())
}

/// Attempt one candidate rule. A discriminant mismatch is a silent
/// non-match; everything else records its rejection reason.
fn try_match(
    node: &Node,
    rule: &Node,
    rulename: &str,
    context: Option<&[Node]>,
    out: &mut Validation,
    reasons: &mut Vec<String>,
) -> Result<bool, RuleError> {
    match (&node.kind, &rule.kind) {
        (
            NodeKind::Declaration {
                typename,
                varname,
                value,
            },
            NodeKind::Declaration {
                typename: typename_pattern,
                varname: varname_pattern,
                value: value_pattern,
            },
        ) => match_declaration(
            node,
            rule,
            rulename,
            (typename, varname, value.as_ref()),
            (typename_pattern, varname_pattern, value_pattern.as_ref()),
            reasons,
        ),
        (
            NodeKind::Definition { name, contents },
            NodeKind::Definition {
                name: name_pattern,
                contents: rule_contents,
            },
        ) => match_definition(
            node,
            rule,
            rulename,
            (name, contents),
            (name_pattern, rule_contents),
            context,
            out,
            reasons,
        ),
        _ => Ok(false),
    }
}

fn match_declaration(
    node: &Node,
    rule: &Node,
    rulename: &str,
    (typename, varname, value): (&str, &str, Option<&Value>),
    (typename_pattern, varname_pattern, value_pattern): (&str, &str, Option<&Value>),
    reasons: &mut Vec<String>,
) -> Result<bool, RuleError> {
    if !match_identifier(typename, typename_pattern)? {
        reasons.push(format!(
            "Type name {typename} didn't match name pattern {typename_pattern} for rule {rulename}"
        ));
        return Ok(false);
    }
    if !match_identifier(varname, varname_pattern)? {
        reasons.push(format!(
            "Variable name {varname} didn't match name pattern {varname_pattern} for rule {rulename}"
        ));
        return Ok(false);
    }
    if !match_value(value, value_pattern)? {
        reasons.push(format!(
            "Assigned value {} didn't match value pattern {} for rule {rulename}",
            display_value(value),
            display_value(value_pattern)
        ));
        return Ok(false);
    }
    if !match_modifiers(&node.modifiers, &rule.modifiers)? {
        reasons.push(format!(
            "Modifiers didn't match the set of allowed modifiers for rule {rulename}"
        ));
        return Ok(false);
    }
    if !match_qualifiers(&node.qualifiers, &rule.qualifiers, reasons)? {
        reasons.push(qualifier_reason(node, rule, rulename));
        return Ok(false);
    }
    Ok(true)
}

#[allow(clippy::too_many_arguments)]
fn match_definition(
    node: &Node,
    rule: &Node,
    rulename: &str,
    (name, contents): (&str, &[Node]),
    (name_pattern, rule_contents): (&str, &[Node]),
    context: Option<&[Node]>,
    out: &mut Validation,
    reasons: &mut Vec<String>,
) -> Result<bool, RuleError> {
    if !match_identifier(name, name_pattern)? {
        reasons.push(format!(
            "Name {name} didn't match name pattern {name_pattern} for rule {rulename}"
        ));
        return Ok(false);
    }
    if !match_qualifiers(&node.qualifiers, &rule.qualifiers, reasons)? {
        reasons.push(qualifier_reason(node, rule, rulename));
        return Ok(false);
    }
    if !match_modifiers(&node.modifiers, &rule.modifiers)? {
        reasons.push(format!(
            "Modifiers didn't match the set of allowed modifiers for rule {rulename}"
        ));
        return Ok(false);
    }
    // The definition itself has matched; nested issues are reported but do
    // not undo the match or its cardinality accounting.
    let nested_rules = context.unwrap_or(rule_contents);
    check_level(contents, nested_rules, out)?;
    Ok(true)
}

fn qualifier_reason(node: &Node, rule: &Node, rulename: &str) -> String {
    format!(
        "Qualifiers [{}] didn't match the set of allowed qualifiers [{}] for rule {rulename}",
        node.qualifiers.join(", "),
        rule.qualifiers.join(", ")
    )
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "none".to_string(),
    }
}

fn unmatched_issue(node: &Node, reasons: &[String]) -> String {
    let location = match &node.location {
        Some(location) => format!(
            "Line {}, column {}",
            location.start.line, location.start.column
        ),
        None => "Unknown location".to_string(),
    };
    let file = node
        .file
        .as_deref()
        .map(|file| format!(" of {file}"))
        .unwrap_or_default();
    let element = unparse_node(node, true);
    let element = element.trim_end();
    if reasons.is_empty() {
        format!("{location}{file}: Unable to find a matching rule for element: {element}")
    } else {
        format!(
            "{location}{file}: Unable to find a matching rule for element: {element} because\n  {}",
            reasons.join("\n  ")
        )
    }
}
