//! Condition compiler: structured conditions in, Solr select query out.
//!
//! See [`condition`] for the input shape, [`compiler`] for fragment
//! generation and assembly, and [`options`] for paging/sort/highlight.

pub mod compiler;
pub mod condition;
pub mod options;

pub use compiler::{
    build_clause, compile, ClauseOutcome, CompiledClause, CompiledQuery, FilterQuery, MATCH_ALL,
};
pub use condition::{Condition, ConditionSet, OpKind};
pub use options::{HighlightConfig, HighlightSpec, SearchOptions, SortOrder, SortSpec};
