//! Parse failure contract.
//!
//! Every syntax error carries the failing position (line, column, byte
//! offset) and the source name, and renders as a labeled miette diagnostic
//! against the original text.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::ast::Position;

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("syntax error on line {line} (column {column}) of {source_name}: {message}")]
    #[diagnostic(code(denada::parse::syntax))]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        offset: usize,
        source_name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("invalid {literal_type} literal '{text}' on line {line} of {source_name}")]
    #[diagnostic(code(denada::parse::invalid_literal))]
    InvalidLiteral {
        literal_type: String,
        text: String,
        line: usize,
        column: usize,
        offset: usize,
        source_name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid literal")]
        span: SourceSpan,
    },

    #[error("could not read {path}")]
    #[diagnostic(code(denada::parse::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Position of the failing token, when the error is tied to the text.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Syntax {
                line,
                column,
                offset,
                ..
            }
            | ParseError::InvalidLiteral {
                line,
                column,
                offset,
                ..
            } => Some(Position {
                line: *line,
                column: *column,
                offset: *offset,
            }),
            ParseError::Io { .. } => None,
        }
    }

    /// Name of the source the error was raised against.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            ParseError::Syntax { source_name, .. }
            | ParseError::InvalidLiteral { source_name, .. } => Some(source_name),
            ParseError::Io { path, .. } => Some(path),
        }
    }
}
