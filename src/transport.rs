// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Transport seam between the compiler and the mapper.
//!
//! The transport owns wire serialization and nothing else. A non-2xx engine
//! reply is NOT a transport error: the raw status and body come back in the
//! [`EngineResponse`] and the mapper performs the status check. Transport
//! errors are connection-level failures only (refused, timeout, DNS).
//!
//! Timeout and concurrency policy live here, not in the compiler or mapper;
//! both of those are pure transforms safe to call from any task.

use async_trait::async_trait;
use tracing::debug;

use crate::config::SolrConfig;
use crate::error::SolrError;
use crate::query::CompiledQuery;
use crate::response::EngineResponse;

/// Executes a compiled query against an engine and returns the raw reply.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn execute(&self, query: &CompiledQuery) -> Result<EngineResponse, SolrError>;
}

/// HTTP transport for a real Solr core: GET `{core_url}/select` with the
/// compiled parameter list plus the configured response writer.
pub struct HttpTransport {
    http: reqwest::Client,
    select_url: String,
    wt: String,
}

impl HttpTransport {
    pub fn new(config: &SolrConfig) -> Result<Self, SolrError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SolrError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            select_url: format!("{}/select", config.core_url()),
            wt: config.wt.clone(),
        })
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn execute(&self, query: &CompiledQuery) -> Result<EngineResponse, SolrError> {
        let mut params = query.to_params();
        params.push(("wt".to_string(), self.wt.clone()));

        debug!(url = %self.select_url, q = %query.main_query, "solr select");

        let response = self
            .http
            .get(&self.select_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SolrError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| SolrError::Transport(e.to_string()))?
            .to_vec();

        Ok(EngineResponse::new(status, body))
    }
}
