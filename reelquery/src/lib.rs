//! Search query language for the film certification catalogue.
//!
//! A query such as `love actor:mammootty year:>2020` is split into free text
//! (`love`) and typed field predicates ([`query::parse_query`]). Predicate
//! field names are user shorthand; an [`aliases::AliasTable`] maps them onto
//! canonical index fields, and [`search::SearchParams`] renders the result as
//! a `q` / `filter_by` pair for the search index.
//!
//! ```
//! use reelquery::{AliasTable, SearchParams, parse_query};
//!
//! let aliases = AliasTable::builtin();
//! let parsed = parse_query("lang:hindi year:2023");
//! let params = SearchParams::from_parsed(&parsed, &aliases);
//! assert_eq!(params.build_q(), "*");
//! assert_eq!(params.build_filter().as_deref(), Some("language:=hindi && year:=2023"));
//! ```

pub mod aliases;
pub mod errors;
pub mod filters;
pub mod query;
pub mod search;

pub use aliases::AliasTable;
pub use errors::*;
pub use query::{FieldPredicate, Operator, ParsedQuery, PredicateValue, parse_query};
pub use search::{FilterCondition, SearchParams};
