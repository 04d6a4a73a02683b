//! # Field-targeted query language
//!
//! A search box query mixes free text with inline `field:value` filters:
//!
//! | Token                       | Operator   | Value                  |
//! |-----------------------------|------------|------------------------|
//! | `actor:mammootty`           | `=`        | `"mammootty"`          |
//! | `director:"anurag kashyap"` | `=`        | `"anurag kashyap"`     |
//! | `actor:fahadh*`             | `CONTAINS` | `"fahadh"`             |
//! | `year:>2020`                | `>`        | `2020` (number)        |
//! | `rating:!=A`                | `!=`       | `"A"`                  |
//! | `genre:[action,drama]`      | `=`        | `"[action,drama]"`     |
//!
//! [`parse_query`] splits the input into the residual free text and the list
//! of [`FieldPredicate`]s. Field names are kept as typed (lowercased); mapping
//! them onto index fields goes through an [`AliasTable`] afterwards.

mod parser;

use std::fmt;
use std::ops::Range;

use serde::{Serialize, Serializer};

use crate::aliases::AliasTable;

pub use parser::{SkipReason, TokenOutcome, parse_query, parse_query_outcomes};

/// Comparison applied between a field and its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Contains,
    Gt,
    Lt,
    Gte,
    Lte,
    Ne,
    /// Any other run of `><=!` characters, kept verbatim (`==`, `<>`, `!`).
    Other(String),
}

impl Operator {
    /// Map a leading run of operator characters onto an operator.
    pub fn from_run(run: &str) -> Self {
        match run {
            "=" => Operator::Eq,
            ">" => Operator::Gt,
            "<" => Operator::Lt,
            ">=" => Operator::Gte,
            "<=" => Operator::Lte,
            "!=" => Operator::Ne,
            other => Operator::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Contains => "CONTAINS",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Ne => "!=",
            Operator::Other(run) => run.as_str(),
        }
    }

    /// Ordering comparisons that only make sense against numbers.
    pub fn is_ordering(&self) -> bool {
        matches!(self, Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Typed predicate value: numeric when the text parsed as a finite float.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredicateValue {
    Number(f64),
    Text(String),
}

impl PredicateValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PredicateValue::Number(value) => Some(*value),
            PredicateValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PredicateValue::Number(_) => None,
            PredicateValue::Text(value) => Some(value.as_str()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PredicateValue::Text(value) if value.is_empty())
    }
}

impl fmt::Display for PredicateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateValue::Number(value) => f.write_str(&format_numeric(*value)),
            PredicateValue::Text(value) => f.write_str(value),
        }
    }
}

/// A single `field:value` filter extracted from a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPredicate {
    /// Field token as typed, lowercased. Not alias-resolved.
    pub field: String,
    pub operator: Operator,
    pub value: PredicateValue,
    /// Exact substring matched in the input.
    pub raw: String,
    /// Byte range of `raw` within the input.
    #[serde(skip)]
    pub span: Range<usize>,
}

/// A predicate paired with the canonical index field its token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedPredicate<'a> {
    pub canonical_field: &'a str,
    #[serde(flatten)]
    pub predicate: &'a FieldPredicate,
}

/// Result of parsing a query string.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParsedQuery {
    /// Input with every extracted token removed and whitespace collapsed.
    pub text_query: String,
    pub field_queries: Vec<FieldPredicate>,
    pub has_field_targeting: bool,
}

impl ParsedQuery {
    /// Plain text search over the trimmed input, with no field predicates.
    pub fn plain_text(input: &str) -> Self {
        Self {
            text_query: input.trim().to_string(),
            field_queries: Vec::new(),
            has_field_targeting: false,
        }
    }

    pub(crate) fn from_parts(text_query: String, field_queries: Vec<FieldPredicate>) -> Self {
        let has_field_targeting = !field_queries.is_empty();
        Self {
            text_query,
            field_queries,
            has_field_targeting,
        }
    }

    /// Whether neither free text nor predicates were supplied.
    pub fn is_empty(&self) -> bool {
        self.text_query.is_empty() && self.field_queries.is_empty()
    }

    /// Pair each predicate with its canonical field, preserving order.
    pub fn resolved<'a>(&'a self, aliases: &'a AliasTable) -> Vec<ResolvedPredicate<'a>> {
        self.field_queries
            .iter()
            .map(|predicate| ResolvedPredicate {
                canonical_field: aliases.resolve(&predicate.field),
                predicate,
            })
            .collect()
    }
}

pub(crate) fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_runs_map_to_named_operators() {
        assert_eq!(Operator::from_run(">"), Operator::Gt);
        assert_eq!(Operator::from_run(">="), Operator::Gte);
        assert_eq!(Operator::from_run("<="), Operator::Lte);
        assert_eq!(Operator::from_run("!="), Operator::Ne);
        assert_eq!(Operator::from_run("="), Operator::Eq);
        assert_eq!(Operator::from_run("<>"), Operator::Other("<>".to_string()));
        assert_eq!(Operator::from_run("==").as_str(), "==");
    }

    #[test]
    fn operator_serializes_as_its_symbol() {
        let json = serde_json::to_string(&[Operator::Contains, Operator::Gte]).expect("serialize");
        assert_eq!(json, r#"["CONTAINS",">="]"#);
    }

    #[test]
    fn predicate_value_serializes_untagged() {
        let json = serde_json::to_string(&[
            PredicateValue::Number(2020.0),
            PredicateValue::Text("malayalam".to_string()),
        ])
        .expect("serialize");
        assert_eq!(json, r#"[2020.0,"malayalam"]"#);
    }

    #[test]
    fn numeric_values_display_without_trailing_zero() {
        assert_eq!(PredicateValue::Number(8.0).to_string(), "8");
        assert_eq!(PredicateValue::Number(7.5).to_string(), "7.5");
    }

    #[test]
    fn resolved_pairs_predicates_with_canonical_fields() {
        let parsed = parse_query("lang:hindi mystery:yes");
        let aliases = AliasTable::builtin();
        let resolved = parsed.resolved(&aliases);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].canonical_field, "language");
        assert_eq!(resolved[0].predicate.field, "lang");
        assert_eq!(resolved[1].canonical_field, "mystery");
    }

    #[test]
    fn resolved_predicate_json_flattens_the_predicate() {
        let parsed = parse_query("cast:mohanlal");
        let aliases = AliasTable::builtin();
        let json = serde_json::to_value(parsed.resolved(&aliases)).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!([{
                "canonical_field": "imdb_actors",
                "field": "cast",
                "operator": "=",
                "value": "mohanlal",
                "raw": "cast:mohanlal"
            }])
        );
    }
}
