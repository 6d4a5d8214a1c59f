//! Cardinality descriptor parser.
//!
//! A rule node's description string encodes the rule's logical name and its
//! repetition bounds: `realvar` (exactly one), `realvar?` (at most one),
//! `realvar*` (any number), `realvar+` (at least one). A leading `^` flags
//! the rule recursive.

use pest::Parser;
use pest_derive::Parser;

use crate::errors::RuleError;

#[derive(Parser)]
#[grammar = "rules/descriptor.pest"]
struct DescriptorParser;

/// Parsed form of a rule descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Whether matched definitions validate their contents against the
    /// full rule set of the enclosing level instead of the rule's own body.
    pub recursive: bool,
    pub name: String,
    pub min: usize,
    /// `None` means unbounded.
    pub max: Option<usize>,
}

/// Parse a descriptor string. Fails with the fatal
/// [`RuleError::DescriptorSyntax`] on malformed text.
pub fn parse_descriptor(text: &str) -> Result<RuleDescriptor, RuleError> {
    let mut pairs = DescriptorParser::parse(Rule::descriptor, text)
        .map_err(|_| RuleError::DescriptorSyntax {
            text: text.to_string(),
        })?;
    let descriptor = pairs.next().expect("pest: descriptor rule always present");

    let mut recursive = false;
    let mut name = String::new();
    let mut cardinality = None;
    for part in descriptor.into_inner() {
        match part.as_rule() {
            Rule::recursion => recursive = true,
            Rule::rulename => name = part.as_str().to_string(),
            Rule::cardinality => cardinality = Some(part.as_str().to_string()),
            Rule::EOI => {}
            rule => unreachable!("unexpected rule {rule:?} in descriptor"),
        }
    }

    let (min, max) = match cardinality.as_deref() {
        None => (1, Some(1)),
        Some("?") => (0, Some(1)),
        Some("*") => (0, None),
        Some("+") => (1, None),
        Some(other) => unreachable!("unexpected cardinality suffix {other:?}"),
    };
    Ok(RuleDescriptor {
        recursive,
        name,
        min,
        max,
    })
}
