use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use reelquery::query::{PredicateValue, TokenOutcome, parse_query, parse_query_outcomes};
use reelquery::{AliasTable, QueryError};
use serde::Serialize;

use super::join_query;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, create_table, placeholder};

#[derive(Args)]
pub struct ParseArgs {
    /// Query text, e.g. `love actor:mammootty year:>2020`
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub query: Vec<String>,

    /// Also list tokens that looked like filters but were left in the text
    #[arg(long)]
    pub show_skipped: bool,
}

#[derive(Debug, Serialize)]
pub struct PredicateRow {
    pub field: String,
    pub canonical_field: String,
    pub known_field: bool,
    pub operator: String,
    pub value: PredicateValue,
    pub raw: String,
}

#[derive(Debug, Serialize)]
pub struct SkippedRow {
    pub raw: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub input: String,
    pub text_query: String,
    pub has_field_targeting: bool,
    pub predicates: Vec<PredicateRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedRow>,
    /// Set when skipped tokens were requested but could not be listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanner_error: Option<String>,
}

pub fn build_parse_report(input: &str, aliases: &AliasTable, show_skipped: bool) -> ParseReport {
    let parsed = parse_query(input);
    let predicates = parsed
        .resolved(aliases)
        .into_iter()
        .map(|resolved| PredicateRow {
            field: resolved.predicate.field.clone(),
            canonical_field: resolved.canonical_field.to_string(),
            known_field: aliases.is_known(&resolved.predicate.field),
            operator: resolved.predicate.operator.to_string(),
            value: resolved.predicate.value.clone(),
            raw: resolved.predicate.raw.clone(),
        })
        .collect();

    let (skipped, scanner_error) = if show_skipped {
        skipped_rows(parse_query_outcomes(input))
    } else {
        (Vec::new(), None)
    };

    ParseReport {
        input: input.to_string(),
        text_query: parsed.text_query,
        has_field_targeting: parsed.has_field_targeting,
        predicates,
        skipped,
        scanner_error,
    }
}

fn skipped_rows(outcomes: Result<Vec<TokenOutcome>, QueryError>) -> (Vec<SkippedRow>, Option<String>) {
    match outcomes {
        Ok(outcomes) => {
            let rows = outcomes
                .into_iter()
                .filter_map(|outcome| match outcome {
                    TokenOutcome::Skipped { raw, reason, .. } => Some(SkippedRow {
                        raw,
                        reason: reason.to_string(),
                    }),
                    TokenOutcome::Parsed(_) => None,
                })
                .collect();
            (rows, None)
        }
        Err(err) => {
            log::warn!("cannot list skipped tokens: {err}");
            (Vec::new(), Some(err.to_string()))
        }
    }
}

impl TableDisplay for ParseReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options, &["Field", "Index field", "Operator", "Value", "Raw"]);
        let text = if self.text_query.is_empty() {
            placeholder(options)
        } else {
            self.text_query.clone()
        };
        table.add_row(vec![
            Cell::new("(text)"),
            Cell::new(placeholder(options)),
            Cell::new(placeholder(options)),
            Cell::new(text),
            Cell::new(placeholder(options)),
        ]);
        for row in &self.predicates {
            let canonical = if row.known_field {
                row.canonical_field.clone()
            } else {
                format!("{} (unmapped)", row.canonical_field)
            };
            let value = match &row.value {
                PredicateValue::Number(_) => format!("{} (number)", row.value),
                PredicateValue::Text(text) => text.clone(),
            };
            table.add_row(vec![
                Cell::new(&row.field),
                Cell::new(canonical),
                Cell::new(&row.operator),
                Cell::new(value),
                Cell::new(&row.raw),
            ]);
        }
        for row in &self.skipped {
            table.add_row(vec![
                Cell::new("(skipped)"),
                Cell::new(placeholder(options)),
                Cell::new(placeholder(options)),
                Cell::new(&row.reason),
                Cell::new(&row.raw),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let mut parts = vec![format!("text={:?}", self.text_query)];
        parts.extend(
            self.predicates
                .iter()
                .map(|row| format!("{}{}{}", row.canonical_field, row.operator, row.value)),
        );
        parts.join(" ")
    }
}

pub fn handle_parse(args: ParseArgs, aliases: &AliasTable, output: &OutputManager) -> Result<()> {
    let input = join_query(&args.query);
    let report = build_parse_report(&input, aliases, args.show_skipped);
    output.heading("Parsed query");
    output.display(&report)?;
    if let Some(err) = &report.scanner_error {
        output.warning(&format!("skipped tokens unavailable: {err}"));
    }
    Ok(())
}
