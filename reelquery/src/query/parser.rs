use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::{FieldPredicate, Operator, ParsedQuery, PredicateValue};
use crate::errors::QueryError;

/// `identifier:value`, where value is a quoted string, a bracketed list, or a
/// bare run of non-whitespace. Alternatives are tried in that order. A bracket
/// list never spans whitespace, so an unclosed `[` cannot swallow later tokens.
const FIELD_TOKEN_PATTERN: &str = r#"([A-Za-z0-9_]+):("[^"]*"|\[[^\]\s]+\]|\S+)"#;

/// Longest leading decimal number: sign, digits, optional fraction and exponent.
const NUMERIC_PREFIX_PATTERN: &str = r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?";

static FIELD_TOKEN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(FIELD_TOKEN_PATTERN));

static NUMERIC_PREFIX: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(NUMERIC_PREFIX_PATTERN));

const OPERATOR_CHARS: [char; 4] = ['>', '<', '=', '!'];

/// Why a scanned token was left in the free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyField,
    EmptyValue,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyField => f.write_str("empty field"),
            SkipReason::EmptyValue => f.write_str("empty value"),
        }
    }
}

/// Per-token result of scanning a query.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenOutcome {
    Parsed(FieldPredicate),
    Skipped {
        raw: String,
        span: Range<usize>,
        reason: SkipReason,
    },
}

/// Split a raw query into free text and field predicates.
///
/// Never fails: malformed tokens stay in the free text, and if the scanner
/// itself is unavailable the whole input is treated as plain text.
///
/// ```
/// use reelquery::query::{Operator, PredicateValue, parse_query};
///
/// let parsed = parse_query("love actor:mammootty year:>2020");
/// assert_eq!(parsed.text_query, "love");
/// assert!(parsed.has_field_targeting);
/// assert_eq!(parsed.field_queries[0].field, "actor");
/// assert_eq!(parsed.field_queries[1].operator, Operator::Gt);
/// assert_eq!(parsed.field_queries[1].value, PredicateValue::Number(2020.0));
/// ```
pub fn parse_query(input: &str) -> ParsedQuery {
    if input.trim().is_empty() {
        return ParsedQuery::default();
    }
    parse_with_scanner(input, FIELD_TOKEN.as_ref())
}

/// Scan a query and report what happened to every `field:value` token, in
/// input order.
pub fn parse_query_outcomes(input: &str) -> Result<Vec<TokenOutcome>, QueryError> {
    let scanner = FIELD_TOKEN.as_ref().map_err(|err| QueryError::Scanner(err.clone()))?;
    Ok(scan(scanner, input))
}

fn parse_with_scanner(input: &str, scanner: Result<&Regex, &regex::Error>) -> ParsedQuery {
    match scanner {
        Ok(scanner) => assemble(input, scan(scanner, input)),
        Err(err) => {
            log::warn!("query scanner unavailable, falling back to text search: {err}");
            ParsedQuery::plain_text(input)
        }
    }
}

fn scan(scanner: &Regex, input: &str) -> Vec<TokenOutcome> {
    scanner
        .captures_iter(input)
        .filter_map(|captures| {
            let full = captures.get(0)?;
            let field = captures.get(1).map_or("", |m| m.as_str());
            let value = captures.get(2).map_or("", |m| m.as_str());
            Some(classify_token(field, value, full.as_str(), full.range()))
        })
        .collect()
}

fn classify_token(field: &str, value: &str, raw: &str, span: Range<usize>) -> TokenOutcome {
    match classify_value(field, value) {
        Ok((operator, value)) => TokenOutcome::Parsed(FieldPredicate {
            field: field.to_lowercase(),
            operator,
            value,
            raw: raw.to_string(),
            span,
        }),
        Err(reason) => TokenOutcome::Skipped {
            raw: raw.to_string(),
            span,
            reason,
        },
    }
}

/// Quoted, then wildcard, then operator prefix, then bare equality.
fn classify_value(field: &str, value: &str) -> Result<(Operator, PredicateValue), SkipReason> {
    if field.is_empty() {
        return Err(SkipReason::EmptyField);
    }

    let (operator, value) = if let Some(inner) = dequote(value) {
        (Operator::Eq, PredicateValue::Text(inner.to_string()))
    } else if let Some(stem) = value.strip_suffix('*') {
        (Operator::Contains, PredicateValue::Text(stem.to_string()))
    } else if value.starts_with(OPERATOR_CHARS) {
        let split = value.find(|ch: char| !OPERATOR_CHARS.contains(&ch)).unwrap_or(value.len());
        let (run, rest) = value.split_at(split);
        (Operator::from_run(run), parse_operand(rest))
    } else {
        (Operator::Eq, PredicateValue::Text(value.to_string()))
    };

    if value.is_empty() {
        return Err(SkipReason::EmptyValue);
    }
    Ok((operator, value))
}

fn dequote(value: &str) -> Option<&str> {
    value.strip_prefix('"')?.strip_suffix('"')
}

/// Numeric when the operand starts with a finite decimal number (`2020abc`
/// reads as 2020), text otherwise.
fn parse_operand(text: &str) -> PredicateValue {
    match leading_number(text) {
        Some(number) => PredicateValue::Number(number),
        None => PredicateValue::Text(text.to_string()),
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let prefix = match NUMERIC_PREFIX.as_ref() {
        Ok(pattern) => pattern.find(text)?.as_str(),
        Err(err) => {
            log::warn!("numeric prefix scanner unavailable, parsing whole operand: {err}");
            text
        }
    };
    prefix.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Collect parsed predicates and cut their exact spans out of the input.
fn assemble(input: &str, outcomes: Vec<TokenOutcome>) -> ParsedQuery {
    let mut field_queries = Vec::new();
    let mut residual = String::with_capacity(input.len());
    let mut cursor = 0;

    for outcome in outcomes {
        match outcome {
            TokenOutcome::Parsed(predicate) => {
                residual.push_str(&input[cursor..predicate.span.start]);
                cursor = predicate.span.end;
                field_queries.push(predicate);
            }
            TokenOutcome::Skipped { raw, reason, .. } => {
                log::debug!("skipping field token {raw:?}: {reason}");
            }
        }
    }
    residual.push_str(&input[cursor..]);

    let text_query = residual.split_whitespace().collect::<Vec<_>>().join(" ");
    ParsedQuery::from_parts(text_query, field_queries)
}
