pub mod fields;
pub mod filter;
pub mod parse;

/// Rejoin query words split by the shell.
pub fn join_query(words: &[String]) -> String {
    words.join(" ")
}
