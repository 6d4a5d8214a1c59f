//! Rule indexer.
//!
//! Collects the rule nodes of one tree level into [`RuleGroup`]s keyed by
//! the logical name their descriptors derive. Groups iterate in
//! first-appearance order over the rule sequence — the order in which the
//! validator attempts them is part of the contract, not an accident of the
//! container.
//!
//! All rule-derived data lives here, in a table on the side; the rule tree
//! itself is never touched and stays shareable.

use indexmap::IndexMap;

use crate::ast::Node;
use crate::errors::RuleError;
use crate::rules::descriptor::parse_descriptor;
use crate::unparse::unparse_node;

/// All candidate rules sharing one derived name, plus the group's
/// cardinality accounting.
#[derive(Debug)]
pub struct RuleGroup<'r> {
    /// Raw descriptor text; every member of the group must spell it
    /// identically.
    pub descriptor: String,
    pub recursive: bool,
    pub min: usize,
    pub max: Option<usize>,
    /// Candidate alternatives in rule-tree order.
    pub candidates: Vec<&'r Node>,
    /// Successful matches so far; also the next match ordinal.
    pub count: usize,
}

/// Result of indexing one rule sequence.
#[derive(Debug, Default)]
pub struct RuleIndex<'r> {
    pub groups: IndexMap<String, RuleGroup<'r>>,
    /// Soft issues found while indexing (rules with no descriptor).
    pub issues: Vec<String>,
}

/// Group `rules` by derived rule name.
///
/// A malformed descriptor or a descriptor-text mismatch within a group is a
/// fatal error. A rule with no description at all is excluded from matching
/// and reported as a soft issue.
pub fn index_rules(rules: &[Node]) -> Result<RuleIndex<'_>, RuleError> {
    let mut index = RuleIndex::default();
    for rule in rules {
        let Some(descriptor_text) = rule.description.as_deref() else {
            index.issues.push(format!(
                "Rule without a rule name: {}",
                unparse_node(rule, false).trim_end()
            ));
            continue;
        };
        let descriptor = parse_descriptor(descriptor_text)?;

        if let Some(group) = index.groups.get_mut(&descriptor.name) {
            if group.descriptor != descriptor_text {
                return Err(RuleError::CardinalityMismatch {
                    name: descriptor.name,
                    existing: group.descriptor.clone(),
                    found: descriptor_text.to_string(),
                });
            }
            group.candidates.push(rule);
        } else {
            index.groups.insert(
                descriptor.name.clone(),
                RuleGroup {
                    descriptor: descriptor_text.to_string(),
                    recursive: descriptor.recursive,
                    min: descriptor.min,
                    max: descriptor.max,
                    candidates: vec![rule],
                    count: 0,
                },
            );
        }
    }
    tracing::debug!(groups = index.groups.len(), "indexed rule level");
    Ok(index)
}
