//! Pure version-string ordering
//!
//! Catalog entries are identified by dot/dash-delimited numeric strings of
//! arbitrary arity ("11.13.4", "11.13.4.1", "11-13-4"). [`ordering`]
//! defines the total order the rest of the crate sorts by.

pub mod ordering;
