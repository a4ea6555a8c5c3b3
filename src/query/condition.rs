// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Condition tree - the structured input to the compiler.
//!
//! A condition set is an ordered sequence of entries, each one of:
//!
//! ```text
//! Leaf     { field: value }            - shorthand equality
//! Operator [ op, field, operand... ]   - explicit operator form
//! ```
//!
//! The shape of each entry is decided once, here, at parse time. The
//! compiler never re-inspects raw JSON to figure out what an entry is.

use serde_json::Value;

use crate::error::SolrError;

/// Supported operator set. Closed: anything else is [`SolrError::UnknownOperator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// `=`
    Eq,
    /// `!=`, `<>`
    Ne,
    /// `<`, `lt`
    Lt,
    /// `<=`, `lte`
    Lte,
    /// `>`, `gt`
    Gt,
    /// `>=`, `gte`
    Gte,
    /// `between`
    Between,
    /// `not between`
    NotBetween,
    /// `in`
    In,
    /// `not in`
    NotIn,
    /// `like`
    Like,
    /// `not like`
    NotLike,
    /// `or like`
    OrLike,
    /// `or not like`
    OrNotLike,
    /// `not`
    Not,
}

impl OpKind {
    /// Parse operator text. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(text: &str) -> Result<Self, SolrError> {
        let normalized = text.trim().to_lowercase();
        let op = match normalized.as_str() {
            "=" => OpKind::Eq,
            "!=" | "<>" => OpKind::Ne,
            "<" | "lt" => OpKind::Lt,
            "<=" | "lte" => OpKind::Lte,
            ">" | "gt" => OpKind::Gt,
            ">=" | "gte" => OpKind::Gte,
            "between" => OpKind::Between,
            "not between" => OpKind::NotBetween,
            "in" => OpKind::In,
            "not in" => OpKind::NotIn,
            "like" => OpKind::Like,
            "not like" => OpKind::NotLike,
            "or like" => OpKind::OrLike,
            "or not like" => OpKind::OrNotLike,
            "not" => OpKind::Not,
            _ => {
                return Err(SolrError::UnknownOperator {
                    operator: normalized,
                })
            }
        };
        Ok(op)
    }

    /// Canonical operator text, used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Eq => "=",
            OpKind::Ne => "!=",
            OpKind::Lt => "<",
            OpKind::Lte => "<=",
            OpKind::Gt => ">",
            OpKind::Gte => ">=",
            OpKind::Between => "between",
            OpKind::NotBetween => "not between",
            OpKind::In => "in",
            OpKind::NotIn => "not in",
            OpKind::Like => "like",
            OpKind::NotLike => "not like",
            OpKind::OrLike => "or like",
            OpKind::OrNotLike => "or not like",
            OpKind::Not => "not",
        }
    }

    /// Operand count the operator names: field plus value(s).
    pub fn required_operands(&self) -> usize {
        match self {
            OpKind::Between | OpKind::NotBetween => 3,
            _ => 2,
        }
    }
}

/// One condition entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Shorthand equality: `field: value`.
    Leaf { field: String, value: Value },
    /// Operator form. `operands[0]` is the field name.
    Operator { op: OpKind, operands: Vec<Value> },
}

impl Condition {
    /// Shorthand equality entry.
    pub fn leaf(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Leaf {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Operator-form entry. `operands[0]` must be the field name.
    pub fn op(op: OpKind, operands: Vec<Value>) -> Self {
        Condition::Operator { op, operands }
    }
}

/// Ordered set of conditions. Insertion order is compile order: the first
/// clause-producing entry becomes the main query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    entries: Vec<Condition>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: Condition) {
        self.entries.push(condition);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.entries.iter()
    }

    /// Parse a condition set from JSON.
    ///
    /// Two container shapes are accepted, mirroring how application code
    /// builds them:
    ///
    /// - An object: each key/value pair becomes an entry. An array value is
    ///   an operator-form entry (the object key is ignored, the field comes
    ///   from the array); any other value is a shorthand leaf on the key.
    /// - An array: each element is either an operator array
    ///   `[op, field, value...]` or a one-element object `{field: value}`.
    ///
    /// Known permissive behaviors, preserved deliberately:
    /// - A multi-key object element takes its *first* key/value pair and
    ///   ignores the rest.
    /// - Empty arrays and empty objects are skipped entirely.
    pub fn from_value(value: &Value) -> Result<Self, SolrError> {
        let mut set = ConditionSet::new();
        match value {
            Value::Object(map) => {
                for (key, entry) in map {
                    match entry {
                        Value::Array(items) => {
                            if let Some(condition) = parse_operator_entry(items)? {
                                set.push(condition);
                            }
                        }
                        Value::Object(inner) => {
                            // First key wins; see module docs.
                            if let Some((field, v)) = inner.iter().next() {
                                set.push(Condition::leaf(field.clone(), v.clone()));
                            }
                        }
                        other => set.push(Condition::leaf(key.clone(), other.clone())),
                    }
                }
            }
            Value::Array(entries) => {
                for entry in entries {
                    match entry {
                        Value::Array(items) => {
                            if let Some(condition) = parse_operator_entry(items)? {
                                set.push(condition);
                            }
                        }
                        Value::Object(inner) => {
                            if let Some((field, v)) = inner.iter().next() {
                                set.push(Condition::leaf(field.clone(), v.clone()));
                            }
                        }
                        other => {
                            return Err(SolrError::InvalidValueType {
                                clause: other.to_string(),
                            })
                        }
                    }
                }
            }
            Value::Null => {}
            other => {
                return Err(SolrError::InvalidValueType {
                    clause: other.to_string(),
                })
            }
        }
        Ok(set)
    }
}

impl From<Vec<Condition>> for ConditionSet {
    fn from(entries: Vec<Condition>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Parse `[op, field, operand...]`. Empty arrays are skipped (returns `None`).
fn parse_operator_entry(items: &[Value]) -> Result<Option<Condition>, SolrError> {
    let Some(head) = items.first() else {
        return Ok(None);
    };
    let op_text = head.as_str().ok_or_else(|| SolrError::InvalidValueType {
        clause: head.to_string(),
    })?;
    let op = OpKind::parse(op_text)?;
    Ok(Some(Condition::Operator {
        op,
        operands: items[1..].to_vec(),
    }))
}
