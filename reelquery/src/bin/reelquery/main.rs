mod commands;
mod output;
mod theme;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reelquery::AliasTable;

use commands::{
    fields::handle_fields,
    filter::{FilterArgs, handle_filter},
    parse::{ParseArgs, handle_parse},
};
use output::{GlobalOptions, OutputFormat, OutputManager};

#[derive(Parser)]
#[command(name = "reelquery")]
#[command(version)]
#[command(
    about = "Inspect field-targeted film search queries",
    long_about = r#"Parse search box queries such as `love actor:mammootty year:>2020`
into free text and field filters, and show how they map onto the film index.

Commands:
  parse     Split a query into text and field predicates
  fields    List searchable fields and their shorthands
  filter    Render the q / filter_by parameters for the search index
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// TOML alias file to use instead of the built-in film fields
    #[arg(long, env = "REELQUERY_ALIASES", global = true)]
    aliases: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a query into free text and field predicates
    Parse(ParseArgs),

    /// List canonical fields, their shorthands and facets
    Fields,

    /// Render search index parameters for a query
    Filter(FilterArgs),
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        no_color: cli.no_color,
    });

    if let Err(err) = execute(cli, &output) {
        output.error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn execute(cli: Cli, output: &OutputManager) -> Result<()> {
    let aliases = load_aliases(cli.aliases.as_deref())?;

    match cli.command {
        Commands::Parse(args) => handle_parse(args, &aliases, output)?,
        Commands::Fields => handle_fields(&aliases, output)?,
        Commands::Filter(args) => handle_filter(args, &aliases, output)?,
    }

    Ok(())
}

fn load_aliases(path: Option<&std::path::Path>) -> Result<AliasTable> {
    match path {
        Some(path) => {
            log::debug!("loading aliases from {}", path.display());
            AliasTable::from_path(path).with_context(|| format!("Failed to load aliases from {}", path.display()))
        }
        None => Ok(AliasTable::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_subcommand_collects_query_words() {
        let cli = Cli::try_parse_from(["reelquery", "--output", "json", "parse", "love", "year:>2020"])
            .expect("arguments should parse");
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Parse(args) => assert_eq!(commands::join_query(&args.query), "love year:>2020"),
            _ => panic!("expected parse subcommand"),
        }
    }

    #[test]
    fn builtin_aliases_are_used_without_a_path() {
        let aliases = load_aliases(None).expect("builtin table");
        assert_eq!(aliases, AliasTable::builtin());
    }

    #[test]
    fn missing_alias_file_is_reported_with_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.toml");
        let err = load_aliases(Some(path.as_path())).expect_err("file is missing");
        assert!(format!("{err:#}").contains("missing.toml"));
    }
}
