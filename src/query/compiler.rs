// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Condition compiler - turns a [`ConditionSet`] into a Solr select query.
//!
//! # Lucene fragment shapes
//!
//! ```text
//! field:value              - equality
//! field:[ v TO * ]         - >= (inclusive bound)
//! field:{ v TO * }         - >  (exclusive bound)
//! field:[ v1 TO v2 ]       - between
//! field:( a OR b OR c )    - in / or-like group
//! field:*value*            - like (contains)
//! NOT field:...            - negated clause (field prefixed, fragment kept)
//! ```
//!
//! The first clause produced becomes the main query and carries relevance
//! scoring; every later clause becomes an independently named filter query,
//! so a multi-predicate request still scores on its first predicate while
//! all predicates constrain the result set. That ordering is part of the
//! contract: callers that want untouched scoring must put a filter-style
//! predicate first.

use serde_json::Value;
use tracing::debug;

use crate::error::SolrError;
use crate::query::condition::{Condition, ConditionSet, OpKind};
use crate::query::options::{HighlightConfig, SearchOptions, SortSpec};

/// Main query used when the tree produced no clause at all. Keeps every
/// compiled query syntactically valid.
pub const MATCH_ALL: &str = "*:*";

/// Field name plus the Lucene fragment assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledClause {
    pub field: String,
    pub fragment: String,
}

impl CompiledClause {
    fn new(field: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            fragment: fragment.into(),
        }
    }

    /// `field:fragment` rendering used for both main and filter queries.
    pub fn render(&self) -> String {
        format!("{}:{}", self.field, self.fragment)
    }
}

/// Result of building one clause. `Omit` is the deliberate "optional
/// predicate" short-circuit for a missing second operand: not an error, and
/// distinct from a clause with an empty fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseOutcome {
    Clause(CompiledClause),
    Omit,
}

/// One named filter query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    /// Clause field plus the zero-based position in the filter list.
    pub name: String,
    /// Full `field:fragment` query string.
    pub query: String,
}

/// Compiler output handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub main_query: String,
    pub filter_queries: Vec<FilterQuery>,
    pub fields: Option<Vec<String>>,
    pub start: Option<u64>,
    pub rows: Option<u64>,
    pub sort: Vec<SortSpec>,
    pub highlight: Option<HighlightConfig>,
}

impl CompiledQuery {
    /// Pre-built query string pass-through: the string becomes the main
    /// query verbatim, no filters, no options.
    pub fn raw(query: impl Into<String>) -> Self {
        Self {
            main_query: query.into(),
            filter_queries: Vec::new(),
            fields: None,
            start: None,
            rows: None,
            sort: Vec::new(),
            highlight: None,
        }
    }

    /// Overlay per-request options onto the compiled query.
    pub fn with_options(mut self, options: &SearchOptions) -> Self {
        self.fields = options.fields.clone();
        self.start = options.offset;
        self.rows = options.limit;
        self.sort = options.sort.clone();
        self.highlight = options.highlight.as_ref().and_then(|h| h.resolve());
        self
    }

    /// Render the Solr `select` parameter list. The transport appends `wt`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("q".to_string(), self.main_query.clone())];
        for fq in &self.filter_queries {
            params.push(("fq".to_string(), fq.query.clone()));
        }
        if let Some(fields) = &self.fields {
            params.push(("fl".to_string(), fields.join(",")));
        }
        if let Some(start) = self.start {
            params.push(("start".to_string(), start.to_string()));
        }
        if let Some(rows) = self.rows {
            params.push(("rows".to_string(), rows.to_string()));
        }
        if !self.sort.is_empty() {
            let sort = self
                .sort
                .iter()
                .map(|s| format!("{} {}", s.field, s.order.as_param()))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("sort".to_string(), sort));
        }
        if let Some(hl) = &self.highlight {
            params.push(("hl".to_string(), "on".to_string()));
            params.push(("hl.fl".to_string(), hl.fields.join(",")));
            params.push(("hl.simple.pre".to_string(), hl.pre_tag.clone()));
            params.push(("hl.simple.post".to_string(), hl.post_tag.clone()));
        }
        params
    }
}

/// Compile a condition set plus options into a Solr select query.
///
/// Entries compile in order; each yields zero or one clause. The first
/// clause is the main query (`*:*` when none), the rest are filter queries
/// named `{field}{index}` with a zero-based index over the filter list.
pub fn compile(
    conditions: &ConditionSet,
    options: &SearchOptions,
) -> Result<CompiledQuery, SolrError> {
    let mut clauses = Vec::new();
    for condition in conditions {
        match build_clause(condition)? {
            ClauseOutcome::Clause(clause) => clauses.push(clause),
            ClauseOutcome::Omit => {}
        }
    }

    let mut iter = clauses.into_iter();
    let main_query = match iter.next() {
        Some(clause) => clause.render(),
        None => MATCH_ALL.to_string(),
    };
    let filter_queries: Vec<FilterQuery> = iter
        .enumerate()
        .map(|(index, clause)| FilterQuery {
            name: format!("{}{}", clause.field, index),
            query: clause.render(),
        })
        .collect();

    debug!(
        main = %main_query,
        filters = filter_queries.len(),
        "compiled condition set"
    );

    Ok(CompiledQuery {
        main_query,
        filter_queries,
        fields: None,
        start: None,
        rows: None,
        sort: Vec::new(),
        highlight: None,
    }
    .with_options(options))
}

/// Build the clause for a single condition entry.
pub fn build_clause(condition: &Condition) -> Result<ClauseOutcome, SolrError> {
    match condition {
        // A null-valued leaf drops out like a missing second operand would.
        Condition::Leaf { value: Value::Null, .. } => Ok(ClauseOutcome::Omit),
        Condition::Leaf { field, value } => {
            let fragment = render_scalar(value)?;
            Ok(ClauseOutcome::Clause(CompiledClause::new(field, fragment)))
        }
        Condition::Operator { op, operands } => build_operator_clause(*op, operands),
    }
}

fn build_operator_clause(op: OpKind, operands: &[Value]) -> Result<ClauseOutcome, SolrError> {
    let field = field_operand(op, operands)?;

    // Missing or null second operand drops the whole clause. This is the
    // "optional predicate" convention: callers can thread optional filter
    // values straight through without pruning the tree first.
    let value = match present(operands.get(1)) {
        Some(value) => value,
        None => return Ok(ClauseOutcome::Omit),
    };

    let clause = match op {
        OpKind::Eq => CompiledClause::new(field, render_scalar(value)?),
        OpKind::Gte => CompiledClause::new(field, format!("[ {} TO * ]", render_scalar(value)?)),
        OpKind::Lte => CompiledClause::new(field, format!("[ * TO {} ]", render_scalar(value)?)),
        OpKind::Gt => CompiledClause::new(field, format!("{{ {} TO * }}", render_scalar(value)?)),
        OpKind::Lt => CompiledClause::new(field, format!("{{ * TO {} }}", render_scalar(value)?)),
        OpKind::Ne => {
            // Sequence value OR-joins like `in`; the fragment itself is not
            // negated, the field is.
            let fragment = match value {
                Value::Array(items) => or_group(items)?,
                scalar => render_scalar(scalar)?,
            };
            CompiledClause::new(negate(field), fragment)
        }
        OpKind::Between | OpKind::NotBetween => {
            let upper = present(operands.get(2)).ok_or_else(|| SolrError::MissingOperand {
                operator: op.as_str().to_string(),
                required: op.required_operands(),
            })?;
            let fragment = format!("[ {} TO {} ]", render_scalar(value)?, render_scalar(upper)?);
            let field = if op == OpKind::NotBetween {
                negate(field)
            } else {
                field.to_string()
            };
            CompiledClause::new(field, fragment)
        }
        OpKind::In | OpKind::NotIn | OpKind::OrLike | OpKind::OrNotLike => {
            let fragment = match value {
                Value::Array(items) => or_group(items)?,
                scalar => format!("( {} )", render_scalar(scalar)?),
            };
            let field = if op == OpKind::NotIn || op == OpKind::OrNotLike {
                negate(field)
            } else {
                field.to_string()
            };
            CompiledClause::new(field, fragment)
        }
        OpKind::Like => CompiledClause::new(field, format!("*{}*", render_scalar(value)?)),
        OpKind::NotLike => {
            CompiledClause::new(negate(field), format!("*{}*", render_scalar(value)?))
        }
        OpKind::Not => CompiledClause::new(negate(field), render_scalar(value)?),
    };
    Ok(ClauseOutcome::Clause(clause))
}

/// First operand must be the field name, as a string.
fn field_operand<'a>(op: OpKind, operands: &'a [Value]) -> Result<&'a str, SolrError> {
    let field = operands.first().ok_or_else(|| SolrError::MissingOperand {
        operator: op.as_str().to_string(),
        required: op.required_operands(),
    })?;
    field.as_str().ok_or_else(|| SolrError::InvalidValueType {
        clause: field.to_string(),
    })
}

/// Treat JSON null the same as an absent operand.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn negate(field: &str) -> String {
    format!("NOT {field}")
}

/// Render one scalar into fragment text.
///
/// Strings render verbatim, with the empty string as the literal token `""`
/// so an exact empty-value match stays distinguishable from an absent
/// clause. Null never reaches here (handled by the omission rule).
fn render_scalar(value: &Value) -> Result<String, SolrError> {
    match value {
        Value::String(s) if s.is_empty() => Ok("\"\"".to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(SolrError::InvalidValueType {
            clause: other.to_string(),
        }),
    }
}

/// `( a OR b OR c )` over a sequence of scalars.
fn or_group(items: &[Value]) -> Result<String, SolrError> {
    let parts = items
        .iter()
        .map(render_scalar)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("( {} )", parts.join(" OR ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::options::{HighlightSpec, SortSpec};
    use serde_json::json;

    fn compile_tree(tree: serde_json::Value) -> Result<CompiledQuery, SolrError> {
        let set = ConditionSet::from_value(&tree)?;
        compile(&set, &SearchOptions::default())
    }

    fn fragment_of(condition: Condition) -> String {
        match build_clause(&condition).unwrap() {
            ClauseOutcome::Clause(c) => c.fragment,
            ClauseOutcome::Omit => panic!("expected a clause, got Omit"),
        }
    }

    // ── fragment builders ──────────────────────────────────────────────

    #[test]
    fn test_eq_renders_bare_value() {
        let clause = fragment_of(Condition::op(OpKind::Eq, vec![json!("status"), json!("open")]));
        assert_eq!(clause, "open");
    }

    #[test]
    fn test_half_bounded_ranges() {
        let gte = Condition::op(OpKind::Gte, vec![json!("age"), json!(18)]);
        assert_eq!(fragment_of(gte), "[ 18 TO * ]");
        let lte = Condition::op(OpKind::Lte, vec![json!("age"), json!(65)]);
        assert_eq!(fragment_of(lte), "[ * TO 65 ]");
        let gt = Condition::op(OpKind::Gt, vec![json!("age"), json!(18)]);
        assert_eq!(fragment_of(gt), "{ 18 TO * }");
        let lt = Condition::op(OpKind::Lt, vec![json!("age"), json!(65)]);
        assert_eq!(fragment_of(lt), "{ * TO 65 }");
    }

    #[test]
    fn test_between() {
        let compiled = compile_tree(json!([["between", "price", 1, 10]])).unwrap();
        assert_eq!(compiled.main_query, "price:[ 1 TO 10 ]");
    }

    #[test]
    fn test_not_between_negates_field_not_fragment() {
        let compiled = compile_tree(json!([["not between", "price", 1, 10]])).unwrap();
        assert_eq!(compiled.main_query, "NOT price:[ 1 TO 10 ]");
    }

    #[test]
    fn test_between_missing_upper_bound_is_error() {
        let err = compile_tree(json!([["between", "price", 1]])).unwrap_err();
        assert!(
            matches!(err, SolrError::MissingOperand { ref operator, required: 3 } if operator == "between"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_in_with_sequence() {
        let compiled = compile_tree(json!([["in", "tag", ["a", "b", "c"]]])).unwrap();
        assert_eq!(compiled.main_query, "tag:( a OR b OR c )");
    }

    #[test]
    fn test_in_with_bare_scalar() {
        let compiled = compile_tree(json!([["in", "tag", "x"]])).unwrap();
        assert_eq!(compiled.main_query, "tag:( x )");
    }

    #[test]
    fn test_not_in() {
        let compiled = compile_tree(json!([["not in", "tag", ["a", "b"]]])).unwrap();
        assert_eq!(compiled.main_query, "NOT tag:( a OR b )");
    }

    #[test]
    fn test_like_wraps_in_wildcards() {
        let compiled = compile_tree(json!([["like", "title", "foo"]])).unwrap();
        assert_eq!(compiled.main_query, "title:*foo*");
    }

    #[test]
    fn test_not_like() {
        let compiled = compile_tree(json!([["not like", "title", "foo"]])).unwrap();
        assert_eq!(compiled.main_query, "NOT title:*foo*");
    }

    #[test]
    fn test_or_like_joins_like_in() {
        let compiled = compile_tree(json!([["or like", "title", ["foo", "bar"]]])).unwrap();
        assert_eq!(compiled.main_query, "title:( foo OR bar )");
        let compiled = compile_tree(json!([["or not like", "title", "foo"]])).unwrap();
        assert_eq!(compiled.main_query, "NOT title:( foo )");
    }

    #[test]
    fn test_ne_scalar_and_sequence() {
        let compiled = compile_tree(json!([["!=", "status", "closed"]])).unwrap();
        assert_eq!(compiled.main_query, "NOT status:closed");
        let compiled = compile_tree(json!([["<>", "status", ["a", "b"]]])).unwrap();
        assert_eq!(compiled.main_query, "NOT status:( a OR b )");
    }

    #[test]
    fn test_not_operator() {
        let compiled = compile_tree(json!([["not", "deleted", true]])).unwrap();
        assert_eq!(compiled.main_query, "NOT deleted:true");
    }

    #[test]
    fn test_empty_string_renders_quoted_token() {
        let compiled = compile_tree(json!([{"remark": ""}])).unwrap();
        assert_eq!(compiled.main_query, "remark:\"\"");
        let compiled = compile_tree(json!([["=", "remark", ""]])).unwrap();
        assert_eq!(compiled.main_query, "remark:\"\"");
    }

    // ── operand validation ─────────────────────────────────────────────

    #[test]
    fn test_missing_field_operand_is_error() {
        let err = compile_tree(json!([["="]])).unwrap_err();
        assert!(matches!(err, SolrError::MissingOperand { required: 2, .. }));
    }

    #[test]
    fn test_missing_second_operand_omits_clause() {
        let compiled = compile_tree(json!([["=", "status"]])).unwrap();
        assert_eq!(compiled.main_query, MATCH_ALL);
        assert!(compiled.filter_queries.is_empty());
    }

    #[test]
    fn test_null_second_operand_omits_clause() {
        for op in ["=", "in", "like", "between", "not", ">="] {
            let compiled = compile_tree(json!([[op, "status", null]])).unwrap();
            assert_eq!(compiled.main_query, MATCH_ALL, "operator {op}");
        }
    }

    #[test]
    fn test_null_leaf_omits_clause() {
        let compiled = compile_tree(json!([{"status": null}])).unwrap();
        assert_eq!(compiled.main_query, MATCH_ALL);
        assert!(compiled.filter_queries.is_empty());

        // A null leaf in first position promotes the next clause, same as
        // an operator entry missing its value.
        let compiled = compile_tree(json!([
            {"status": null},
            {"name": "Alice"},
        ]))
        .unwrap();
        assert_eq!(compiled.main_query, "name:Alice");
        assert!(compiled.filter_queries.is_empty());

        let outcome = build_clause(&Condition::leaf("status", Value::Null)).unwrap();
        assert_eq!(outcome, ClauseOutcome::Omit);
    }

    #[test]
    fn test_omit_is_distinct_from_empty_clause() {
        let omitted = build_clause(&Condition::op(OpKind::Eq, vec![json!("f")])).unwrap();
        assert_eq!(omitted, ClauseOutcome::Omit);
        let empty = build_clause(&Condition::leaf("f", "")).unwrap();
        assert_eq!(
            empty,
            ClauseOutcome::Clause(CompiledClause::new("f", "\"\""))
        );
    }

    #[test]
    fn test_object_value_in_group_position_is_error() {
        let err = compile_tree(json!([["in", "tag", {"bad": 1}]])).unwrap_err();
        assert!(matches!(err, SolrError::InvalidValueType { .. }));
    }

    #[test]
    fn test_nested_array_in_group_is_error() {
        let err = compile_tree(json!([["in", "tag", [["nested"]]]])).unwrap_err();
        assert!(matches!(err, SolrError::InvalidValueType { .. }));
    }

    #[test]
    fn test_non_string_field_is_error() {
        let err = compile_tree(json!([["=", 42, "x"]])).unwrap_err();
        assert!(matches!(err, SolrError::InvalidValueType { .. }));
    }

    #[test]
    fn test_array_value_on_like_is_error() {
        let err = compile_tree(json!([["like", "title", ["a", "b"]]])).unwrap_err();
        assert!(matches!(err, SolrError::InvalidValueType { .. }));
    }

    // ── assembly ───────────────────────────────────────────────────────

    #[test]
    fn test_empty_tree_compiles_to_match_all() {
        let compiled = compile_tree(json!([])).unwrap();
        assert_eq!(compiled.main_query, MATCH_ALL);
        assert!(compiled.filter_queries.is_empty());
    }

    #[test]
    fn test_first_clause_is_main_rest_are_filters() {
        let compiled = compile_tree(json!([
            {"name": "Alice"},
            [">=", "age", 18],
            ["like", "city", "York"],
        ]))
        .unwrap();
        assert_eq!(compiled.main_query, "name:Alice");
        assert_eq!(compiled.filter_queries.len(), 2);
        assert_eq!(compiled.filter_queries[0].name, "age0");
        assert_eq!(compiled.filter_queries[0].query, "age:[ 18 TO * ]");
        assert_eq!(compiled.filter_queries[1].name, "city1");
        assert_eq!(compiled.filter_queries[1].query, "city:*York*");
    }

    #[test]
    fn test_omitted_first_clause_promotes_next() {
        let compiled = compile_tree(json!([
            ["=", "status"],
            {"name": "Alice"},
            [">", "age", 21],
        ]))
        .unwrap();
        assert_eq!(compiled.main_query, "name:Alice");
        assert_eq!(compiled.filter_queries.len(), 1);
        assert_eq!(compiled.filter_queries[0].name, "age0");
    }

    #[test]
    fn test_negated_field_participates_in_filter_name() {
        let compiled = compile_tree(json!([
            {"name": "Alice"},
            ["not in", "tag", ["a"]],
        ]))
        .unwrap();
        assert_eq!(compiled.filter_queries[0].name, "NOT tag0");
        assert_eq!(compiled.filter_queries[0].query, "NOT tag:( a )");
    }

    #[test]
    fn test_duplicate_fields_keep_unique_names() {
        let compiled = compile_tree(json!([
            [">=", "age", 18],
            ["<=", "age", 65],
            ["!=", "age", 40],
        ]))
        .unwrap();
        assert_eq!(compiled.main_query, "age:[ 18 TO * ]");
        assert_eq!(compiled.filter_queries[0].name, "age0");
        assert_eq!(compiled.filter_queries[1].name, "NOT age1");
    }

    // ── options and wire params ────────────────────────────────────────

    #[test]
    fn test_options_applied_verbatim() {
        let options = SearchOptions {
            fields: Some(vec!["id".to_string(), "name".to_string()]),
            offset: Some(20),
            limit: Some(10),
            sort: vec![SortSpec::desc("score"), SortSpec::asc("id")],
            ..Default::default()
        };
        let set = ConditionSet::from_value(&json!([{"name": "Alice"}])).unwrap();
        let compiled = compile(&set, &options).unwrap();
        assert_eq!(compiled.start, Some(20));
        assert_eq!(compiled.rows, Some(10));
        assert_eq!(compiled.sort.len(), 2);

        let params = compiled.to_params();
        assert!(params.contains(&("q".to_string(), "name:Alice".to_string())));
        assert!(params.contains(&("fl".to_string(), "id,name".to_string())));
        assert!(params.contains(&("start".to_string(), "20".to_string())));
        assert!(params.contains(&("rows".to_string(), "10".to_string())));
        assert!(params.contains(&("sort".to_string(), "score desc,id asc".to_string())));
    }

    #[test]
    fn test_highlight_params() {
        let options = SearchOptions {
            highlight: Some(HighlightSpec::from_csv("title,body")),
            ..Default::default()
        };
        let compiled = compile(&ConditionSet::new(), &options).unwrap();
        let params = compiled.to_params();
        assert!(params.contains(&("hl".to_string(), "on".to_string())));
        assert!(params.contains(&("hl.fl".to_string(), "title,body".to_string())));
        assert!(params.contains(&("hl.simple.pre".to_string(), "<b>".to_string())));
        assert!(params.contains(&("hl.simple.post".to_string(), "</b>".to_string())));
    }

    #[test]
    fn test_empty_highlight_spec_produces_no_config() {
        let options = SearchOptions {
            highlight: Some(HighlightSpec::default()),
            ..Default::default()
        };
        let compiled = compile(&ConditionSet::new(), &options).unwrap();
        assert!(compiled.highlight.is_none());
    }

    #[test]
    fn test_filter_queries_render_as_repeated_fq() {
        let compiled = compile_tree(json!([
            {"a": 1},
            {"b": 2},
            {"c": 3},
        ]))
        .unwrap();
        let fq: Vec<_> = compiled
            .to_params()
            .into_iter()
            .filter(|(k, _)| k == "fq")
            .map(|(_, v)| v)
            .collect();
        assert_eq!(fq, vec!["b:2", "c:3"]);
    }

    #[test]
    fn test_raw_query_passes_through() {
        let compiled = CompiledQuery::raw("name:Alice AND age:[ 18 TO * ]");
        assert_eq!(compiled.main_query, "name:Alice AND age:[ 18 TO * ]");
        assert!(compiled.filter_queries.is_empty());
    }
}
