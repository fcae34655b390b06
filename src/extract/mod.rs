//! Answer and provenance extraction from agent traces.

pub mod sql;
pub mod trace;

pub use sql::extract_sql_query;
pub use trace::{classify, interpret, Interpretation, NO_COMPLETION_PREFIX};
