//! # Index filter expressions
//!
//! Renders alias-resolved predicates into the request shape of the film
//! search index: a free-text `q` plus a `filter_by` expression.
//!
//! | Condition                         | Clause                   |
//! |-----------------------------------|--------------------------|
//! | `FilterCondition::equals`         | `language:=malayalam`    |
//! | `FilterCondition::not_equals`     | `rating:!=A`             |
//! | `FilterCondition::compare`        | `year:>2020`             |
//! | `FilterCondition::contains`       | `imdb_actors:fahadh*`    |
//! | `FilterCondition::and`            | `(a && b)`               |
//!
//! Values containing whitespace or filter syntax characters are wrapped in
//! backticks (see [`escape_filter_value`]). Bracketed lists such as
//! `[action,drama]` are passed through untouched so the index reads them as
//! a list.

use serde::Serialize;

use crate::aliases::AliasTable;
use crate::filters::build_condition;
use crate::query::{ParsedQuery, PredicateValue, format_numeric};

const MATCH_ALL: &str = "*";
const CONJUNCTION: &str = " && ";

/// Numeric ordering used by [`FilterCondition::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparison {
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Comparison {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::Gte => ">=",
            Comparison::Lte => "<=",
        }
    }
}

/// A composable filter condition for the search index.
///
/// ```
/// use reelquery::search::{Comparison, FilterCondition};
///
/// let condition = FilterCondition::and([
///     FilterCondition::equals("language", "malayalam"),
///     FilterCondition::compare("year", Comparison::Gt, 2020.0),
/// ]);
/// assert_eq!(condition.to_filter_clause(), "(language:=malayalam && year:>2020)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Equals {
        field: String,
        value: PredicateValue,
    },
    NotEquals {
        field: String,
        value: PredicateValue,
    },
    Compare {
        field: String,
        comparison: Comparison,
        value: f64,
    },
    Contains {
        field: String,
        value: String,
    },
    And(Vec<FilterCondition>),
}

impl FilterCondition {
    #[inline]
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            field: field.into(),
            value: PredicateValue::Text(value.into()),
        }
    }

    #[inline]
    pub fn not_equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotEquals {
            field: field.into(),
            value: PredicateValue::Text(value.into()),
        }
    }

    #[inline]
    pub fn compare(field: impl Into<String>, comparison: Comparison, value: f64) -> Self {
        Self::Compare {
            field: field.into(),
            comparison,
            value,
        }
    }

    #[inline]
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Combine conditions with AND logic.
    #[inline]
    pub fn and(conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        Self::And(conditions.into_iter().collect())
    }

    /// Convert this condition to a `filter_by` clause.
    pub fn to_filter_clause(&self) -> String {
        match self {
            Self::Equals { field, value } => format!("{}:={}", field, render_value(value)),
            Self::NotEquals { field, value } => format!("{}:!={}", field, render_value(value)),
            Self::Compare {
                field,
                comparison,
                value,
            } => format!("{}:{}{}", field, comparison.as_str(), format_numeric(*value)),
            Self::Contains { field, value } => format!("{}:{}*", field, escape_filter_value(value)),
            Self::And(conditions) => {
                let clauses: Vec<String> = conditions
                    .iter()
                    .map(|c| c.to_filter_clause())
                    .filter(|s| !s.is_empty())
                    .collect();
                match clauses.len() {
                    0 => String::new(),
                    1 => clauses.into_iter().next().unwrap_or_default(),
                    _ => format!("({})", clauses.join(CONJUNCTION)),
                }
            }
        }
    }
}

/// A predicate that could not be mapped onto a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedPredicate {
    pub raw: String,
    pub reason: String,
}

/// Search request parameters for the film index.
///
/// ```
/// use reelquery::aliases::AliasTable;
/// use reelquery::query::parse_query;
/// use reelquery::search::SearchParams;
///
/// let aliases = AliasTable::builtin();
/// let params = SearchParams::from_parsed(&parse_query("love cast:mammootty score:>7.5"), &aliases);
/// assert_eq!(params.build_q(), "love");
/// assert_eq!(
///     params.build_filter().as_deref(),
///     Some("imdb_actors:=mammootty && imdb_rating:>7.5")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    /// Filter conditions. All conditions are ANDed at top level.
    pub conditions: Vec<FilterCondition>,
    /// Free-text search query.
    pub text_query: Option<String>,
    /// Predicates dropped while mapping, in input order.
    pub rejected: Vec<RejectedPredicate>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a parsed query onto index parameters, resolving field aliases.
    ///
    /// Predicates that cannot be expressed as filters are recorded in
    /// `rejected`; the remaining predicates and the free text still apply.
    pub fn from_parsed(parsed: &ParsedQuery, aliases: &AliasTable) -> Self {
        let mut params = Self::new();
        if !parsed.text_query.is_empty() {
            params = params.with_text_query(parsed.text_query.as_str());
        }

        for resolved in parsed.resolved(aliases) {
            match build_condition(&resolved) {
                Ok(condition) => params.conditions.push(condition),
                Err(err) => {
                    log::debug!("dropping predicate {:?}: {err}", resolved.predicate.raw);
                    params.rejected.push(RejectedPredicate {
                        raw: resolved.predicate.raw.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        params
    }

    /// Add a single filter condition (leaf or composed).
    #[inline]
    pub fn with_condition(mut self, condition: FilterCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add multiple filter conditions.
    #[inline]
    pub fn with_conditions(mut self, conditions: impl IntoIterator<Item = FilterCondition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Set the free-text search query.
    #[inline]
    pub fn with_text_query(mut self, query: impl Into<String>) -> Self {
        self.text_query = Some(query.into());
        self
    }

    /// Free-text component; `*` matches every document.
    pub fn build_q(&self) -> String {
        match self.text_query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => MATCH_ALL.to_string(),
        }
    }

    /// Conjunction of all filter conditions, or `None` when unfiltered.
    pub fn build_filter(&self) -> Option<String> {
        let clauses: Vec<String> = self
            .conditions
            .iter()
            .map(FilterCondition::to_filter_clause)
            .filter(|clause| !clause.is_empty())
            .collect();
        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(CONJUNCTION))
        }
    }
}

/// Escape a string value for a `filter_by` clause.
///
/// # Examples
///
/// ```
/// use reelquery::search::escape_filter_value;
///
/// assert_eq!(escape_filter_value("malayalam"), "malayalam");
/// assert_eq!(escape_filter_value("anurag kashyap"), "`anurag kashyap`");
/// assert_eq!(escape_filter_value("a`b c"), "`ab c`");
/// assert_eq!(escape_filter_value("[action,drama]"), "[action,drama]");
/// ```
pub fn escape_filter_value(value: &str) -> String {
    if value.starts_with('[') && value.ends_with(']') {
        return value.to_string();
    }

    let cleaned: String = value.chars().filter(|ch| *ch != '`').collect();
    let needs_quoting = cleaned.chars().any(|ch| {
        ch.is_whitespace() || matches!(ch, ',' | '(' | ')' | '[' | ']' | '&' | '|' | ':' | '=' | '<' | '>' | '!')
    });
    if needs_quoting {
        format!("`{}`", cleaned)
    } else {
        cleaned
    }
}

fn render_value(value: &PredicateValue) -> String {
    match value {
        PredicateValue::Number(number) => format_numeric(*number),
        PredicateValue::Text(text) => escape_filter_value(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_query;

    fn params_for(input: &str) -> SearchParams {
        SearchParams::from_parsed(&parse_query(input), &AliasTable::builtin())
    }

    #[test]
    fn equality_clause_uses_exact_match() {
        assert_eq!(
            FilterCondition::equals("language", "malayalam").to_filter_clause(),
            "language:=malayalam"
        );
    }

    #[test]
    fn equality_clause_quotes_values_with_spaces() {
        assert_eq!(
            FilterCondition::equals("imdb_directors", "anurag kashyap").to_filter_clause(),
            "imdb_directors:=`anurag kashyap`"
        );
    }

    #[test]
    fn numeric_equality_drops_trailing_zero() {
        let condition = FilterCondition::Equals {
            field: "year".to_string(),
            value: PredicateValue::Number(2023.0),
        };
        assert_eq!(condition.to_filter_clause(), "year:=2023");
    }

    #[test]
    fn comparison_clause_renders_operator() {
        assert_eq!(
            FilterCondition::compare("imdb_rating", Comparison::Gte, 7.5).to_filter_clause(),
            "imdb_rating:>=7.5"
        );
        assert_eq!(
            FilterCondition::compare("modification_count", Comparison::Lt, 5.0).to_filter_clause(),
            "modification_count:<5"
        );
    }

    #[test]
    fn not_equals_and_contains_clauses() {
        assert_eq!(FilterCondition::not_equals("rating", "A").to_filter_clause(), "rating:!=A");
        assert_eq!(
            FilterCondition::contains("imdb_actors", "fahadh").to_filter_clause(),
            "imdb_actors:fahadh*"
        );
    }

    #[test]
    fn and_with_single_condition_simplifies() {
        let condition = FilterCondition::and([FilterCondition::equals("rating", "U")]);
        assert_eq!(condition.to_filter_clause(), "rating:=U");
    }

    #[test]
    fn and_empty_returns_empty() {
        assert_eq!(FilterCondition::and(Vec::new()).to_filter_clause(), "");
    }

    #[test]
    fn nested_and_is_parenthesised() {
        let condition = FilterCondition::and([
            FilterCondition::equals("rating", "U"),
            FilterCondition::and([
                FilterCondition::equals("imdb_genres", "comedy"),
                FilterCondition::compare("year", Comparison::Gt, 2000.0),
            ]),
        ]);
        assert_eq!(
            condition.to_filter_clause(),
            "(rating:=U && (imdb_genres:=comedy && year:>2000))"
        );
    }

    #[test]
    fn empty_params_match_everything() {
        let params = SearchParams::new();
        assert_eq!(params.build_q(), "*");
        assert_eq!(params.build_filter(), None);
    }

    #[test]
    fn builder_methods_compose() {
        let params = SearchParams::new()
            .with_text_query("  ")
            .with_condition(FilterCondition::equals("rating", "U"))
            .with_conditions([FilterCondition::equals("imdb_genres", "comedy")]);
        assert_eq!(params.build_q(), "*");
        assert_eq!(params.build_filter().as_deref(), Some("rating:=U && imdb_genres:=comedy"));
    }

    #[test]
    fn from_parsed_resolves_aliases() {
        let params = params_for("lang:hindi year:2023 actor:fahadh*");
        assert_eq!(params.build_q(), "*");
        assert_eq!(
            params.build_filter().as_deref(),
            Some("language:=hindi && year:=2023 && imdb_actors:fahadh*")
        );
        assert!(params.rejected.is_empty());
    }

    #[test]
    fn from_parsed_keeps_free_text() {
        let params = params_for(r#"love director:"anurag kashyap""#);
        assert_eq!(params.build_q(), "love");
        assert_eq!(
            params.build_filter().as_deref(),
            Some("imdb_directors:=`anurag kashyap`")
        );
    }

    #[test]
    fn from_parsed_passes_unknown_fields_through() {
        let params = params_for("imdb_votes:>1000");
        assert_eq!(params.build_filter().as_deref(), Some("imdb_votes:>1000"));
    }

    #[test]
    fn from_parsed_rejects_unmappable_predicates_without_failing() {
        let params = params_for("year:>recent rating:<>A genre:drama");
        assert_eq!(params.build_filter().as_deref(), Some("imdb_genres:=drama"));
        assert_eq!(params.rejected.len(), 2);
        assert_eq!(params.rejected[0].raw, "year:>recent");
        assert_eq!(params.rejected[1].raw, "rating:<>A");
        assert!(params.rejected[1].reason.contains("unsupported operator"));
    }

    #[test]
    fn bracket_lists_pass_through() {
        let params = params_for("genre:[action,drama]");
        assert_eq!(params.build_filter().as_deref(), Some("imdb_genres:=[action,drama]"));
    }
}
