//! Predicate to filter mapping
//!
//! Converts alias-resolved predicates into [`FilterCondition`](crate::search::FilterCondition)s.

pub mod normalizers;

pub use normalizers::*;
