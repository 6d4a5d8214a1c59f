//! Rule machinery: descriptor parsing, pattern matchers, and the rule
//! indexer the structural validator is built on.

pub mod descriptor;
pub mod index;
pub mod matchers;

pub use descriptor::{parse_descriptor, RuleDescriptor};
pub use index::{index_rules, RuleGroup, RuleIndex};
pub use matchers::{match_identifier, match_modifiers, match_qualifiers, match_value};
