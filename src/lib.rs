pub use crate::ast::{Location, Modifiers, Node, NodeId, NodeKind, Position};
pub use crate::errors::RuleError;
pub use crate::syntax::{parse, parse_file, parse_named, ParseError};
pub use crate::unparse::{unparse, unparse_node};
pub use crate::validate::{process, MatchInfo, MatchTable, Validation};

pub mod ast;
pub mod cli;
pub mod errors;
pub mod query;
pub mod rules;
pub mod syntax;
pub mod unparse;
pub mod validate;
