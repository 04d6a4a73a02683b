//! # Field Alias Table
//!
//! Maps the shorthand field names users type into a query (`lang`, `cast`,
//! `score`) onto the canonical field names of the search index (`language`,
//! `imdb_actors`, `imdb_rating`). Several shorthands may point at the same
//! canonical field.
//!
//! Lookups are case-insensitive. Unknown tokens resolve to themselves so that
//! free-form field queries reach the index untouched.
//!
//! ```
//! use reelquery::aliases::AliasTable;
//!
//! let table = AliasTable::builtin();
//! assert_eq!(table.resolve("LANG"), "language");
//! assert_eq!(table.resolve("nonexistent_field"), "nonexistent_field");
//! ```
//!
//! Tables are plain values: build one explicitly and hand it to whatever maps
//! parsed predicates onto the index. Alternate tables can be loaded from TOML:
//!
//! ```toml
//! extend_builtin = false
//! facetable = ["name"]
//!
//! [aliases]
//! flick = "name"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{QueryError, ValidationError, ValidationIssue};

/// Shorthand to canonical field pairs of the film catalogue index.
pub const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("name", "name"),
    ("title", "name"),
    ("film", "name"),
    ("movie", "name"),
    ("language", "language"),
    ("lang", "language"),
    ("year", "year"),
    ("date", "year"),
    ("rating", "rating"),
    ("cert", "rating"),
    // IMDB fields
    ("genre", "imdb_genres"),
    ("genres", "imdb_genres"),
    ("director", "imdb_directors"),
    ("directors", "imdb_directors"),
    ("actor", "imdb_actors"),
    ("actors", "imdb_actors"),
    ("cast", "imdb_actors"),
    ("country", "imdb_countries"),
    ("countries", "imdb_countries"),
    ("imdb", "imdb_rating"),
    ("score", "imdb_rating"),
    // Censorship fields
    ("mods", "modification_count"),
    ("modifications", "modification_count"),
    ("cuts", "modification_count"),
    ("action", "ai_actions"),
    ("actions", "ai_actions"),
    ("censor", "ai_actions"),
    ("content", "ai_content_types"),
    ("tag", "ai_content_types"),
    // Analytics and discovery fields
    ("popularity", "popularity_score"),
    ("popular", "popularity_score"),
    ("clicks", "click_count"),
    ("poster", "has_poster"),
    ("certified", "cert_date_timestamp"),
    ("cert_date", "cert_date_timestamp"),
    ("released", "imdb_release_date"),
    ("release_date", "imdb_release_date"),
];

/// Canonical fields the index exposes as facets.
pub const FACETABLE_FIELDS: &[&str] = &[
    "language",
    "imdb_genres",
    "imdb_directors",
    "imdb_actors",
    "imdb_countries",
    "ai_actions",
    "ai_content_types",
    "rating",
    "year",
    "modification_count",
    "imdb_rating",
    "imdb_votes",
    "popularity_score",
    "click_count",
    "has_poster",
    "cert_date_timestamp",
    "imdb_release_date",
];

/// Read-only mapping from shorthand field tokens to canonical index fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
    facetable: Vec<String>,
}

/// On-disk layout of an alias file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AliasConfig {
    #[serde(default = "default_extend_builtin")]
    extend_builtin: bool,
    #[serde(default)]
    facetable: Vec<String>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

fn default_extend_builtin() -> bool {
    true
}

impl AliasTable {
    /// Empty table: every token resolves to itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// The film catalogue table with its facetable field list.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (shorthand, canonical) in BUILTIN_ALIASES {
            table.aliases.insert((*shorthand).to_string(), (*canonical).to_string());
        }
        table.facetable = FACETABLE_FIELDS.iter().map(|field| (*field).to_string()).collect();
        table
    }

    /// Add or replace a mapping while building a table from trusted input.
    ///
    /// The shorthand is lowercased. Use [`AliasTable::insert`] for input that
    /// needs validating.
    pub fn with_alias(mut self, shorthand: impl AsRef<str>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(shorthand.as_ref().to_lowercase(), canonical.into());
        self
    }

    /// Mark a canonical field as facetable.
    pub fn with_facet(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.facetable.contains(&field) {
            self.facetable.push(field);
        }
        self
    }

    /// Validate and add a mapping, returning the canonical name it replaced.
    pub fn insert(&mut self, shorthand: &str, canonical: &str) -> Result<Option<String>, ValidationError> {
        if let Some(issue) = validate_entry(shorthand, canonical).into_iter().next() {
            return Err(ValidationError::new([issue]));
        }
        Ok(self
            .aliases
            .insert(shorthand.to_lowercase(), canonical.trim().to_string()))
    }

    /// Resolve a user-typed field token to its canonical name.
    ///
    /// Total over all strings: unknown tokens come back unchanged, in their
    /// original case.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.aliases
            .get(&token.to_lowercase())
            .map(String::as_str)
            .unwrap_or(token)
    }

    /// Whether the token has an entry in the table (case-insensitive).
    pub fn is_known(&self, token: &str) -> bool {
        self.aliases.contains_key(&token.to_lowercase())
    }

    /// Every canonical field the table maps to, sorted and deduplicated.
    pub fn canonical_fields(&self) -> Vec<&str> {
        self.aliases
            .values()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Shorthands that resolve to `canonical`, excluding the canonical name itself.
    pub fn aliases_for(&self, canonical: &str) -> Vec<&str> {
        self.aliases
            .iter()
            .filter(|(shorthand, target)| target.as_str() == canonical && shorthand.as_str() != canonical)
            .map(|(shorthand, _)| shorthand.as_str())
            .collect()
    }

    pub fn is_facetable(&self, canonical: &str) -> bool {
        self.facetable.iter().any(|field| field == canonical)
    }

    pub fn facetable_fields(&self) -> &[String] {
        &self.facetable
    }

    /// Iterate `(shorthand, canonical)` pairs in shorthand order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Parse an alias table from TOML.
    ///
    /// Unless `extend_builtin = false`, entries are layered over the built-in
    /// table. All invalid entries are reported together.
    pub fn from_toml_str(source: &str) -> Result<Self, QueryError> {
        let config: AliasConfig = toml::from_str(source)?;

        let mut issues = Vec::new();
        for (shorthand, canonical) in &config.aliases {
            issues.extend(validate_entry(shorthand, canonical));
        }
        for (index, field) in config.facetable.iter().enumerate() {
            if field.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    format!("facetable[{index}]"),
                    "empty",
                    "facetable field names must not be empty",
                ));
            }
        }
        let error = ValidationError::new(issues);
        if !error.is_empty() {
            return Err(error.into());
        }

        let base = if config.extend_builtin { Self::builtin() } else { Self::new() };
        let table = config
            .aliases
            .into_iter()
            .fold(base, |table, (shorthand, canonical)| {
                table.with_alias(shorthand, canonical.trim())
            });
        Ok(config
            .facetable
            .into_iter()
            .fold(table, |table, field| table.with_facet(field.trim())))
    }

    /// Read and parse an alias file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| QueryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

/// Shorthands must be producible by the query scanner: ASCII word characters only.
fn validate_entry(shorthand: &str, canonical: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if shorthand.is_empty() {
        issues.push(ValidationIssue::new("<empty>", "empty", "shorthand must not be empty"));
    } else if !shorthand.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        issues.push(ValidationIssue::new(
            shorthand,
            "invalid_shorthand",
            "shorthand may only contain ASCII letters, digits and underscores",
        ));
    }
    if canonical.trim().is_empty() {
        issues.push(ValidationIssue::new(
            shorthand,
            "empty_canonical",
            "canonical field name must not be empty",
        ));
    }
    issues
}
