// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Thin orchestrating client: compile → execute → map.
//!
//! The client holds the transport and the connection config and wires the
//! two pure halves together per request. It adds no query semantics of its
//! own; everything interesting happens in [`crate::query`] and
//! [`crate::response`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SolrConfig;
use crate::error::SolrError;
use crate::metrics::{self, StageTimer};
use crate::query::{compile, CompiledQuery, ConditionSet, SearchOptions};
use crate::response::{self, Document, EngineResponse, NormalizedResult};
use crate::transport::{HttpTransport, SearchTransport};

/// Primary-key field assumed when the options don't name one.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Client for one Solr core.
///
/// Cheap to clone; safe to share across tasks. All state is request-scoped
/// apart from the transport's connection pool.
#[derive(Clone)]
pub struct SolrClient {
    transport: Arc<dyn SearchTransport>,
}

impl SolrClient {
    /// Connect over HTTP using the given config.
    pub fn new(config: &SolrConfig) -> Result<Self, SolrError> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(config)?),
        })
    }

    /// Use a caller-supplied transport. This is the seam tests use to run
    /// the full pipeline against canned engine replies.
    pub fn with_transport(transport: Arc<dyn SearchTransport>) -> Self {
        Self { transport }
    }

    /// Compile, execute, and normalize one search request.
    pub async fn search(
        &self,
        conditions: &ConditionSet,
        options: &SearchOptions,
    ) -> Result<NormalizedResult, SolrError> {
        let compiled = {
            let _timer = StageTimer::new("compile");
            compile(conditions, options).inspect_err(|e| {
                metrics::record_query(e.outcome_label());
            })?
        };
        self.run(compiled, options).await
    }

    /// Like [`search`](Self::search) but forces a single row and returns the
    /// first document, if any.
    pub async fn search_one(
        &self,
        conditions: &ConditionSet,
        options: &SearchOptions,
    ) -> Result<Option<Document>, SolrError> {
        let mut options = options.clone();
        options.offset = Some(0);
        options.limit = Some(1);
        let result = self.search(conditions, &options).await?;
        Ok(result.docs.into_iter().next())
    }

    /// Run a pre-built query string verbatim, bypassing the compiler. The
    /// result is still normalized.
    pub async fn search_raw(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<NormalizedResult, SolrError> {
        let compiled = CompiledQuery::raw(query).with_options(options);
        self.run(compiled, options).await
    }

    /// Compile and execute, but skip normalization: returns the decoded
    /// engine envelope as-is after the status check.
    pub async fn search_decoded(
        &self,
        conditions: &ConditionSet,
        options: &SearchOptions,
    ) -> Result<Value, SolrError> {
        let compiled = {
            let _timer = StageTimer::new("compile");
            compile(conditions, options)?
        };
        let response = self.execute(&compiled).await?;
        let decoded = {
            let _timer = StageTimer::new("map");
            response::decode(&response)
        };
        self.finish(decoded, None)
    }

    async fn run(
        &self,
        compiled: CompiledQuery,
        options: &SearchOptions,
    ) -> Result<NormalizedResult, SolrError> {
        metrics::record_filter_clauses(compiled.filter_queries.len());
        let highlight_requested = compiled.highlight.is_some();
        let primary_key = options
            .primary_key
            .as_deref()
            .unwrap_or(DEFAULT_PRIMARY_KEY);

        let response = self.execute(&compiled).await?;

        let mapped = {
            let _timer = StageTimer::new("map");
            response::map(&response, highlight_requested, primary_key)
        };
        let count = mapped.as_ref().ok().map(|r| r.count);
        self.finish(mapped, count)
    }

    async fn execute(&self, compiled: &CompiledQuery) -> Result<EngineResponse, SolrError> {
        debug!(
            q = %compiled.main_query,
            filters = compiled.filter_queries.len(),
            "executing search"
        );
        let _timer = StageTimer::new("execute");
        self.transport.execute(compiled).await.inspect_err(|e| {
            warn!(error = %e, "search transport failed");
            metrics::record_query(e.outcome_label());
        })
    }

    fn finish<T>(
        &self,
        outcome: Result<T, SolrError>,
        count: Option<u64>,
    ) -> Result<T, SolrError> {
        match &outcome {
            Ok(_) => {
                metrics::record_query("success");
                if let Some(count) = count {
                    metrics::record_result_count(count);
                    info!(count, "search complete");
                }
            }
            Err(e) => {
                warn!(error = %e, "search failed");
                metrics::record_query(e.outcome_label());
            }
        }
        outcome
    }
}
