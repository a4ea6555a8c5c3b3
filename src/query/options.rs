//! Per-request search options: field selection, paging, sort, highlighting.
//!
//! Plain data, no fluent builder surface. Fill in the fields you need and
//! pass the struct to [`compile`](crate::query::compile) or the client.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One sort directive. Order in the options list is significant: the first
/// entry is the primary sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Highlight request as supplied by the caller. Tags default to
/// `<b>`/`</b>` when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpec {
    /// Fields to highlight. Empty set means highlighting is off.
    pub fields: Vec<String>,
    /// Opening tag wrapped around matches.
    pub pre_tag: Option<String>,
    /// Closing tag wrapped around matches.
    pub post_tag: Option<String>,
}

impl HighlightSpec {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    /// Shorthand: a comma-separated string is accepted as a field list.
    pub fn from_csv(fields: &str) -> Self {
        Self::new(
            fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Resolve into the compiled form, defaulting the tags. `None` when no
    /// fields were named.
    pub fn resolve(&self) -> Option<HighlightConfig> {
        if self.fields.is_empty() {
            return None;
        }
        Some(HighlightConfig {
            fields: self.fields.clone(),
            pre_tag: self.pre_tag.clone().unwrap_or_else(|| "<b>".to_string()),
            post_tag: self.post_tag.clone().unwrap_or_else(|| "</b>".to_string()),
        })
    }
}

/// Highlight configuration after defaulting, carried on the compiled query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightConfig {
    pub fields: Vec<String>,
    pub pre_tag: String,
    pub post_tag: String,
}

/// All per-request options next to the condition tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Fields to fetch; `None` means the engine default (all fields).
    pub fields: Option<Vec<String>>,
    /// Paging start (Solr `start`).
    pub offset: Option<u64>,
    /// Row count (Solr `rows`).
    pub limit: Option<u64>,
    /// Sort directives, primary key first.
    pub sort: Vec<SortSpec>,
    /// Optional highlight request.
    pub highlight: Option<HighlightSpec>,
    /// Document attribute correlating hits with highlight fragments.
    /// Defaults to `"id"` at the client when unset.
    pub primary_key: Option<String>,
}
