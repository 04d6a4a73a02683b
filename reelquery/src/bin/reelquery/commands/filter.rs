use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use reelquery::search::RejectedPredicate;
use reelquery::{AliasTable, SearchParams, parse_query};
use serde::Serialize;

use super::join_query;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, create_table, placeholder};

#[derive(Args)]
pub struct FilterArgs {
    /// Query text, e.g. `lang:hindi year:2023`
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub query: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FilterReport {
    pub q: String,
    pub filter_by: Option<String>,
    pub rejected: Vec<RejectedPredicate>,
}

pub fn build_filter_report(input: &str, aliases: &AliasTable) -> FilterReport {
    let params = SearchParams::from_parsed(&parse_query(input), aliases);
    FilterReport {
        q: params.build_q(),
        filter_by: params.build_filter(),
        rejected: params.rejected,
    }
}

impl TableDisplay for FilterReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options, &["Parameter", "Value"]);
        table.add_row(vec![Cell::new("q"), Cell::new(&self.q)]);
        table.add_row(vec![
            Cell::new("filter_by"),
            Cell::new(self.filter_by.clone().unwrap_or_else(|| placeholder(options))),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        match &self.filter_by {
            Some(filter) => format!("q={} filter_by={}", self.q, filter),
            None => format!("q={}", self.q),
        }
    }
}

pub fn handle_filter(args: FilterArgs, aliases: &AliasTable, output: &OutputManager) -> Result<()> {
    let input = join_query(&args.query);
    let report = build_filter_report(&input, aliases);
    output.heading("Search parameters");
    output.display(&report)?;
    for rejected in &report.rejected {
        output.warning(&format!("ignored {}: {}", rejected.raw, rejected.reason));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_renders_query_and_filter() {
        let report = build_filter_report("love actor:mammootty year:>2020", &AliasTable::builtin());
        assert_eq!(report.q, "love");
        assert_eq!(report.filter_by.as_deref(), Some("imdb_actors:=mammootty && year:>2020"));
        assert!(report.rejected.is_empty());
        assert_eq!(
            report.to_compact(),
            "q=love filter_by=imdb_actors:=mammootty && year:>2020"
        );
    }

    #[test]
    fn report_collects_rejected_predicates() {
        let report = build_filter_report("year:>soon", &AliasTable::builtin());
        assert_eq!(report.q, "*");
        assert_eq!(report.filter_by, None);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.to_compact(), "q=*");
    }
}
