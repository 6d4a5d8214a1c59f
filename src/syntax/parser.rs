//! Denada text parser.
//!
//! Converts source text into the tree model. Purely syntactic: rule
//! descriptors in description strings are left untouched here and only
//! interpreted by the validator.

use std::fs;
use std::path::Path;

use miette::NamedSource;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde_json::Value;

use crate::ast::{Location, Modifiers, Node, NodeId, NodeKind, Position};
use crate::syntax::ParseError;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct DenadaParser;

/// Parse denada source text into a tree.
pub fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    TreeBuilder::new(source, None).build(source)
}

/// Parse denada source text, recording `name` as the originating file of
/// every produced node (and of any error).
pub fn parse_named(source: &str, name: &str) -> Result<Vec<Node>, ParseError> {
    TreeBuilder::new(source, Some(name)).build(source)
}

/// Read and parse a file from disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Node>, ParseError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_named(&source, &path.display().to_string())
}

struct TreeBuilder {
    source_name: String,
    source: String,
    file: Option<String>,
    next_id: u32,
}

impl TreeBuilder {
    fn new(source: &str, file: Option<&str>) -> Self {
        Self {
            source_name: file.unwrap_or("<input>").to_string(),
            source: source.to_string(),
            file: file.map(String::from),
            next_id: 0,
        }
    }

    fn build(mut self, source: &str) -> Result<Vec<Node>, ParseError> {
        let mut pairs = DenadaParser::parse(Rule::file, source)
            .map_err(|e| self.syntax_error(e))?;
        let file_pair = pairs.next().expect("pest: file rule always present");
        file_pair
            .into_inner()
            .filter(|p| p.as_rule() != Rule::EOI)
            .map(|p| self.build_item(p))
            .collect()
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn build_item(&mut self, pair: Pair<Rule>) -> Result<Node, ParseError> {
        match pair.as_rule() {
            Rule::declaration => self.build_declaration(pair),
            Rule::definition => self.build_definition(pair),
            rule => unreachable!("item can only be a declaration or definition, got {rule:?}"),
        }
    }

    /// `qual* typename varname (mods)? (= value)? "desc"? ;` — the final two
    /// identifiers are the typename and varname, the rest are qualifiers.
    fn build_declaration(&mut self, pair: Pair<Rule>) -> Result<Node, ParseError> {
        let id = self.fresh_id();
        let location = location_of(&pair);
        let mut identifiers = Vec::new();
        let mut modifiers = Modifiers::new();
        let mut value = None;
        let mut description = None;

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::identifier => identifiers.push(identifier_text(&part)),
                Rule::modifiers => modifiers = self.build_modifiers(part)?,
                Rule::assignment => {
                    let inner = part.into_inner().next().expect("assignment has a value");
                    value = Some(self.build_value(inner)?);
                }
                Rule::description => description = Some(self.string_text(part)?),
                rule => unreachable!("unexpected rule {rule:?} in declaration"),
            }
        }

        let varname = identifiers.pop().expect("grammar requires two identifiers");
        let typename = identifiers.pop().expect("grammar requires two identifiers");
        Ok(Node {
            id,
            qualifiers: identifiers,
            modifiers,
            description,
            location: Some(location),
            file: self.file.clone(),
            kind: NodeKind::Declaration {
                typename,
                varname,
                value,
            },
        })
    }

    /// `qual* name (mods)? "desc"? { contents }` — the final identifier is
    /// the definition name.
    fn build_definition(&mut self, pair: Pair<Rule>) -> Result<Node, ParseError> {
        let id = self.fresh_id();
        let location = location_of(&pair);
        let mut identifiers = Vec::new();
        let mut modifiers = Modifiers::new();
        let mut description = None;
        let mut contents = Vec::new();

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::identifier => identifiers.push(identifier_text(&part)),
                Rule::modifiers => modifiers = self.build_modifiers(part)?,
                Rule::description => description = Some(self.string_text(part)?),
                Rule::block => {
                    contents = part
                        .into_inner()
                        .map(|p| self.build_item(p))
                        .collect::<Result<_, _>>()?;
                }
                rule => unreachable!("unexpected rule {rule:?} in definition"),
            }
        }

        let name = identifiers.pop().expect("grammar requires a name");
        Ok(Node {
            id,
            qualifiers: identifiers,
            modifiers,
            description,
            location: Some(location),
            file: self.file.clone(),
            kind: NodeKind::Definition { name, contents },
        })
    }

    fn build_modifiers(&mut self, pair: Pair<Rule>) -> Result<Modifiers, ParseError> {
        let mut modifiers = Modifiers::new();
        for modification in pair.into_inner() {
            let mut inner = modification.into_inner();
            let key = identifier_text(&inner.next().expect("modification has a key"));
            let value = self.build_value(inner.next().expect("modification has a value"))?;
            modifiers.insert(key, value);
        }
        Ok(modifiers)
    }

    fn build_value(&mut self, pair: Pair<Rule>) -> Result<Value, ParseError> {
        let pair = match pair.as_rule() {
            Rule::value => pair.into_inner().next().expect("value has one alternative"),
            _ => pair,
        };
        match pair.as_rule() {
            Rule::null => Ok(Value::Null),
            Rule::boolean => Ok(Value::Bool(pair.as_str() == "true")),
            Rule::number => self.build_number(pair),
            Rule::string => Ok(Value::String(self.unescape(&pair)?)),
            Rule::array => pair
                .into_inner()
                .map(|p| self.build_value(p))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Rule::object => {
                let mut object = serde_json::Map::new();
                for member in pair.into_inner() {
                    let mut inner = member.into_inner();
                    let key = self.unescape(&inner.next().expect("member has a key"))?;
                    let value = self.build_value(inner.next().expect("member has a value"))?;
                    object.insert(key, value);
                }
                Ok(Value::Object(object))
            }
            rule => unreachable!("unexpected rule {rule:?} in value"),
        }
    }

    fn build_number(&mut self, pair: Pair<Rule>) -> Result<Value, ParseError> {
        let text = pair.as_str();
        // Integers stay integers so literal equality against rule patterns
        // behaves the way the source reads.
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::from(n));
        }
        let n = text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .ok_or_else(|| self.literal_error("number", &pair))?;
        Ok(Value::Number(n))
    }

    fn string_text(&mut self, pair: Pair<Rule>) -> Result<String, ParseError> {
        let inner = pair.into_inner().next().expect("description has a string");
        self.unescape(&inner)
    }

    /// Strip surrounding double quotes and resolve JSON escapes.
    fn unescape(&mut self, pair: &Pair<Rule>) -> Result<String, ParseError> {
        let raw = pair.as_str();
        let inner = &raw[1..raw.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('/') => out.push('/'),
                Some('b') => out.push('\u{0008}'),
                Some('f') => out.push('\u{000C}'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('u') => {
                    let code: String = chars.by_ref().take(4).collect();
                    let ch = u32::from_str_radix(&code, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| self.literal_error("string", pair))?;
                    out.push(ch);
                }
                _ => return Err(self.literal_error("string", pair)),
            }
        }
        Ok(out)
    }

    fn literal_error(&self, literal_type: &str, pair: &Pair<Rule>) -> ParseError {
        let start = pair.as_span().start_pos();
        let (line, column) = start.line_col();
        ParseError::InvalidLiteral {
            literal_type: literal_type.to_string(),
            text: pair.as_str().to_string(),
            line,
            column,
            offset: start.pos(),
            source_name: self.source_name.clone(),
            src: NamedSource::new(self.source_name.clone(), self.source.clone()),
            span: (pair.as_span().start()..pair.as_span().end()).into(),
        }
    }

    fn syntax_error(&self, error: pest::error::Error<Rule>) -> ParseError {
        let (line, column) = match error.line_col {
            pest::error::LineColLocation::Pos((line, column)) => (line, column),
            pest::error::LineColLocation::Span((line, column), _) => (line, column),
        };
        let (start, end) = match error.location {
            pest::error::InputLocation::Pos(p) => (p, p),
            pest::error::InputLocation::Span((s, e)) => (s, e),
        };
        ParseError::Syntax {
            message: error.variant.message().into_owned(),
            line,
            column,
            offset: start,
            source_name: self.source_name.clone(),
            src: NamedSource::new(self.source_name.clone(), self.source.clone()),
            span: (start..end.max(start)).into(),
        }
    }
}

/// The text of an identifier, with single quotes stripped when present.
fn identifier_text(pair: &Pair<Rule>) -> String {
    let inner = pair
        .clone()
        .into_inner()
        .next()
        .expect("identifier has one alternative");
    match inner.as_rule() {
        Rule::bareword => inner.as_str().to_string(),
        Rule::quoted => {
            let raw = inner.as_str();
            raw[1..raw.len() - 1].to_string()
        }
        rule => unreachable!("unexpected rule {rule:?} in identifier"),
    }
}

fn location_of(pair: &Pair<Rule>) -> Location {
    let span = pair.as_span();
    let (start_line, start_column) = span.start_pos().line_col();
    let (end_line, end_column) = span.end_pos().line_col();
    Location {
        start: Position {
            line: start_line,
            column: start_column,
            offset: span.start(),
        },
        end: Position {
            line: end_line,
            column: end_column,
            offset: span.end(),
        },
    }
}
