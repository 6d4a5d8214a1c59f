//! Fatal configuration errors.
//!
//! These abort a validation run immediately, in contrast with the soft
//! issues the validator accumulates (see [`crate::validate`]). They always
//! indicate a broken *rule* tree, never broken content.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum RuleError {
    /// The rule's description is not a valid cardinality descriptor
    /// (`'^'? name ('*' | '+' | '?')?`).
    #[error("unable to parse rule descriptor '{text}'")]
    #[diagnostic(code(denada::rules::descriptor_syntax))]
    DescriptorSyntax { text: String },

    /// Two rules derive the same rule name but spell their descriptors
    /// differently; the group's cardinality would be ambiguous.
    #[error("rule {name} has mismatched cardinality: '{existing}' vs. '{found}'")]
    #[diagnostic(code(denada::rules::cardinality_mismatch))]
    CardinalityMismatch {
        name: String,
        existing: String,
        found: String,
    },

    /// A value pattern was a JSON object that does not compile as a schema.
    #[error("invalid schema in value pattern: {detail}")]
    #[diagnostic(code(denada::rules::invalid_schema))]
    InvalidSchema { detail: String },

    /// A `/…/` identifier pattern that does not compile as a regex.
    #[error("invalid identifier pattern '{pattern}': {detail}")]
    #[diagnostic(code(denada::rules::invalid_pattern))]
    InvalidPattern { pattern: String, detail: String },
}
