// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Response mapper - raw engine reply in, normalized result out.
//!
//! Expected envelope:
//!
//! ```text
//! {
//!   "response": {
//!     "numFound": 12, "start": 0, "maxScore": 1.3,
//!     "docs": [ {"id": 42, "title": "foo bar"}, ... ]
//!   },
//!   "highlighting": { "42": { "title": ["<b>foo</b>"] } }
//! }
//! ```
//!
//! `maxScore` and the whole `highlighting` block are optional engine
//! features; their absence is never an error. A non-200 status or a body
//! without `response.docs` is fatal for the request.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SolrError;

/// Raw reply from the transport, before any decoding.
#[derive(Debug, Clone)]
pub struct EngineResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl EngineResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Body rendered as text for error reporting.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One search hit: an ordered field/value mapping.
pub type Document = Map<String, Value>;

/// Normalized search outcome. Constructed once per request, immutable after.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct NormalizedResult {
    /// Total hits for the query (`numFound`), not the page size.
    pub count: u64,
    /// Paging start offset echoed by the engine.
    pub start: u64,
    /// Best relevance score; absent when scoring was disabled.
    pub max_score: Option<f64>,
    /// Hits for this page, highlight fragments already overlaid.
    pub docs: Vec<Document>,
}

/// Status-check and JSON-decode only; no shape normalization. This is the
/// raw pass-through used when the caller wants the engine envelope as-is.
pub fn decode(response: &EngineResponse) -> Result<Value, SolrError> {
    if response.status != 200 {
        return Err(SolrError::EngineResponse {
            status: response.status,
            body: response.body_text(),
        });
    }
    serde_json::from_slice(&response.body)
        .map_err(|e| SolrError::MalformedResponse(e.to_string()))
}

/// Map a raw engine reply into a [`NormalizedResult`].
///
/// `highlight_requested` must reflect whether the compiled query asked for
/// highlighting; the merge only runs when it did and the engine actually
/// returned a highlighting block. `primary_key` is the field correlating a
/// hit with its fragment set, supplied per call.
pub fn map(
    response: &EngineResponse,
    highlight_requested: bool,
    primary_key: &str,
) -> Result<NormalizedResult, SolrError> {
    let decoded = decode(response)?;

    let envelope = decoded
        .get("response")
        .and_then(Value::as_object)
        .ok_or_else(|| SolrError::MalformedResponse("missing 'response' object".to_string()))?;
    let raw_docs = envelope
        .get("docs")
        .and_then(Value::as_array)
        .ok_or_else(|| SolrError::MalformedResponse("missing 'response.docs' array".to_string()))?;

    let count = envelope.get("numFound").and_then(Value::as_u64).unwrap_or(0);
    let start = envelope.get("start").and_then(Value::as_u64).unwrap_or(0);
    let max_score = envelope.get("maxScore").and_then(Value::as_f64);

    let mut docs = Vec::with_capacity(raw_docs.len());
    for raw in raw_docs {
        let doc = raw.as_object().cloned().ok_or_else(|| {
            SolrError::MalformedResponse("document is not an object".to_string())
        })?;
        docs.push(doc);
    }

    if highlight_requested {
        if let Some(highlighting) = decoded.get("highlighting").and_then(Value::as_object) {
            for doc in &mut docs {
                overlay_highlights(doc, highlighting, primary_key)?;
            }
        }
    }

    debug!(count, start, docs = docs.len(), "mapped engine response");

    Ok(NormalizedResult {
        count,
        start,
        max_score,
        docs,
    })
}

/// Replace field values with their highlight fragments, keyed by the
/// document's primary-key value. One fragment replaces the value with a
/// string; several replace it with the full ordered sequence so multi-valued
/// fields are never truncated. Documents absent from the block pass through
/// unchanged.
fn overlay_highlights(
    doc: &mut Document,
    highlighting: &Map<String, Value>,
    primary_key: &str,
) -> Result<(), SolrError> {
    let key_value = doc
        .get(primary_key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| SolrError::MissingPrimaryKey {
            field: primary_key.to_string(),
        })?;
    // Numeric keys appear in the highlighting block under their decimal
    // rendering, so "42" matches id 42.
    let key = match key_value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let Some(entry) = highlighting.get(&key).and_then(Value::as_object) else {
        return Ok(());
    };

    for (field, fragments) in entry {
        let Some(fragments) = fragments.as_array() else {
            continue;
        };
        match fragments.len() {
            0 => {}
            1 => {
                doc.insert(field.clone(), fragments[0].clone());
            }
            _ => {
                doc.insert(field.clone(), Value::Array(fragments.clone()));
            }
        }
    }
    Ok(())
}
