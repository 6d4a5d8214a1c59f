//! Pattern matchers.
//!
//! Pure predicates comparing actual identifiers, values, modifier maps and
//! qualifier lists against the patterns a rule carries. All of them return
//! `Result<bool, RuleError>`: a mismatch is `Ok(false)`, the `Err` branch is
//! reserved for fatally misconfigured patterns (bad regex, bad schema).

use regex::Regex;
use serde_json::Value;

use crate::ast::{value_type_name, Modifiers};
use crate::errors::RuleError;

/// Match an identifier (typename, varname, definition name, modifier key)
/// against a pattern.
///
/// `_` matches any identifier; `/…/` is tested as an unanchored regular
/// expression; anything else requires exact equality.
pub fn match_identifier(id: &str, pattern: &str) -> Result<bool, RuleError> {
    if pattern == "_" {
        return Ok(true);
    }
    if pattern.len() >= 2 && pattern.starts_with('/') && pattern.ends_with('/') {
        let re = Regex::new(&pattern[1..pattern.len() - 1]).map_err(|e| {
            RuleError::InvalidPattern {
                pattern: pattern.to_string(),
                detail: e.to_string(),
            }
        })?;
        return Ok(re.is_match(id));
    }
    Ok(pattern == id)
}

/// Match a declaration value against a rule's value pattern.
///
/// Precedence, highest first:
/// 1. an object pattern is a JSON Schema the value must satisfy;
/// 2. a `$type` string pattern matches the value's JSON type name, with
///    `$_` matching anything and `$a|b` matching either name;
/// 3. any other string pattern applied to a string value behaves as
///    [`match_identifier`];
/// 4. everything else is literal equality, with an absent pattern matching
///    only an absent value.
///
/// A string-form pattern applied to a non-string value fails closed.
pub fn match_value(value: Option<&Value>, pattern: Option<&Value>) -> Result<bool, RuleError> {
    let Some(pattern) = pattern else {
        return Ok(value.is_none());
    };
    match pattern {
        Value::Object(_) => {
            let validator =
                jsonschema::validator_for(pattern).map_err(|e| RuleError::InvalidSchema {
                    detail: e.to_string(),
                })?;
            Ok(value.is_some_and(|v| validator.is_valid(v)))
        }
        Value::String(p) => match p.strip_prefix('$') {
            Some("_") => Ok(true),
            Some(type_pattern) => {
                let Some(value) = value else {
                    return Ok(false);
                };
                let actual = value_type_name(value);
                Ok(type_pattern.split('|').any(|t| t == actual))
            }
            None => match value {
                Some(Value::String(s)) => match_identifier(s, p),
                _ => Ok(false),
            },
        },
        literal => Ok(value == Some(literal)),
    }
}

/// Every modifier on the actual node must be allowed by at least one
/// pattern entry (key via [`match_identifier`], value via [`match_value`]).
/// Pattern entries nothing matched against are not an error.
pub fn match_modifiers(actual: &Modifiers, patterns: &Modifiers) -> Result<bool, RuleError> {
    'modifier: for (key, value) in actual {
        for (pattern_key, pattern_value) in patterns {
            if match_identifier(key, pattern_key)?
                && match_value(Some(value), Some(pattern_value))?
            {
                continue 'modifier;
            }
        }
        return Ok(false);
    }
    Ok(true)
}

/// Match a qualifier list against a list of qualifier patterns.
///
/// A trailing `?` marks a pattern optional. Every actual qualifier must
/// match some pattern, and every non-optional pattern must be matched at
/// least once; a missed required pattern records its reason. Order is
/// irrelevant on both sides.
pub fn match_qualifiers(
    actual: &[String],
    patterns: &[String],
    reasons: &mut Vec<String>,
) -> Result<bool, RuleError> {
    struct QualifierPattern<'p> {
        text: &'p str,
        required: bool,
        hits: usize,
    }

    let mut entries: Vec<QualifierPattern> = patterns
        .iter()
        .map(|p| match p.strip_suffix('?') {
            Some(stripped) => QualifierPattern {
                text: stripped,
                required: false,
                hits: 0,
            },
            None => QualifierPattern {
                text: p,
                required: true,
                hits: 0,
            },
        })
        .collect();

    'qualifier: for qualifier in actual {
        for entry in entries.iter_mut() {
            if match_identifier(qualifier, entry.text)? {
                entry.hits += 1;
                continue 'qualifier;
            }
        }
        return Ok(false);
    }

    for entry in &entries {
        if entry.required && entry.hits == 0 {
            reasons.push(format!("missing required qualifier {}", entry.text));
            return Ok(false);
        }
    }
    Ok(true)
}
