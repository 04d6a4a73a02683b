//! Builders that turn a single resolved predicate into a filter condition.

use crate::errors::QueryError;
use crate::query::{Operator, PredicateValue, ResolvedPredicate};
use crate::search::{Comparison, FilterCondition};

/// Builds the filter matching the predicate's operator, on its canonical field.
pub fn build_condition(resolved: &ResolvedPredicate<'_>) -> Result<FilterCondition, QueryError> {
    let target_field = resolved.canonical_field;
    let predicate = resolved.predicate;
    match &predicate.operator {
        Operator::Eq => Ok(FilterCondition::Equals {
            field: target_field.to_string(),
            value: predicate.value.clone(),
        }),
        Operator::Ne => Ok(FilterCondition::NotEquals {
            field: target_field.to_string(),
            value: predicate.value.clone(),
        }),
        Operator::Contains => build_contains_filter(&predicate.value, target_field),
        Operator::Gt => build_comparison_filter(&predicate.value, Comparison::Gt, target_field),
        Operator::Lt => build_comparison_filter(&predicate.value, Comparison::Lt, target_field),
        Operator::Gte => build_comparison_filter(&predicate.value, Comparison::Gte, target_field),
        Operator::Lte => build_comparison_filter(&predicate.value, Comparison::Lte, target_field),
        Operator::Other(run) => Err(QueryError::UnsupportedOperator {
            field: target_field.to_string(),
            operator: run.clone(),
        }),
    }
}

/// Builds a numeric comparison; ordering against text is rejected.
pub fn build_comparison_filter(
    value: &PredicateValue,
    comparison: Comparison,
    target_field: &str,
) -> Result<FilterCondition, QueryError> {
    let numeric = value.as_number().ok_or_else(|| QueryError::InvalidRequest {
        message: format!(
            "Comparison {} on {} requires a numeric value, got {}",
            comparison.as_str(),
            target_field,
            value
        ),
    })?;
    Ok(FilterCondition::Compare {
        field: target_field.to_string(),
        comparison,
        value: numeric,
    })
}

/// Builds a prefix filter for `CONTAINS` predicates
pub fn build_contains_filter(value: &PredicateValue, target_field: &str) -> Result<FilterCondition, QueryError> {
    let text = value.to_string();
    if text.is_empty() {
        return Err(QueryError::InvalidRequest {
            message: format!("Contains filter on {} requires a value", target_field),
        });
    }
    Ok(FilterCondition::Contains {
        field: target_field.to_string(),
        value: text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::AliasTable;
    use crate::query::parse_query;

    fn build_first(input: &str) -> Result<FilterCondition, QueryError> {
        let parsed = parse_query(input);
        let aliases = AliasTable::builtin();
        let resolved = parsed.resolved(&aliases);
        build_condition(&resolved[0])
    }

    #[test]
    fn equality_targets_canonical_field() {
        let condition = build_first("movie:premam").expect("maps");
        assert_eq!(condition, FilterCondition::equals("name", "premam"));
    }

    #[test]
    fn comparison_requires_number() {
        let condition = build_first("mods:>=5").expect("maps");
        assert_eq!(condition, FilterCondition::compare("modification_count", Comparison::Gte, 5.0));

        let err = build_first("mods:>=many").expect_err("text cannot be ordered");
        match err {
            QueryError::InvalidRequest { message } => {
                assert!(message.contains("modification_count"));
                assert!(message.contains("many"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn not_equals_keeps_typed_value() {
        let condition = build_first("score:!=5").expect("maps");
        assert_eq!(
            condition,
            FilterCondition::NotEquals {
                field: "imdb_rating".to_string(),
                value: PredicateValue::Number(5.0),
            }
        );
    }

    #[test]
    fn contains_builds_prefix_filter() {
        let condition = build_first("cast:fahadh*").expect("maps");
        assert_eq!(condition, FilterCondition::contains("imdb_actors", "fahadh"));
    }

    #[test]
    fn contains_rejects_empty_value() {
        let err = build_contains_filter(&PredicateValue::Text(String::new()), "name").expect_err("empty");
        assert!(matches!(err, QueryError::InvalidRequest { .. }));
    }

    #[test]
    fn unknown_operator_run_is_unsupported() {
        let err = build_first("year:=>2000").expect_err("no filter form");
        match err {
            QueryError::UnsupportedOperator { field, operator } => {
                assert_eq!(field, "year");
                assert_eq!(operator, "=>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
