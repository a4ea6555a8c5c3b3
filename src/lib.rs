//! # solr-bridge
//!
//! A translation layer between structured application conditions and the
//! query syntax of a Lucene/Solr-style search engine, plus the inverse
//! mapping of the engine's JSON response back into an application-friendly
//! result shape.
//!
//! ## Architecture
//!
//! ```text
//! condition tree + options
//!         │
//!         ▼
//! ┌──────────────────────────────────────────────┐
//! │            Condition Compiler                │
//! │  • operator dispatch (=, between, in, like…) │
//! │  • range / wildcard / OR-group fragments     │
//! │  • main query + named filter-query fan-out   │
//! └──────────────────────────────────────────────┘
//!         │ CompiledQuery
//!         ▼
//! ┌──────────────────────────────────────────────┐
//! │            Transport (HTTP GET /select)      │
//! └──────────────────────────────────────────────┘
//!         │ EngineResponse {status, body}
//!         ▼
//! ┌──────────────────────────────────────────────┐
//! │            Response Mapper                   │
//! │  • status check + envelope decode            │
//! │  • count / start / maxScore normalization    │
//! │  • highlight overlay keyed by primary key    │
//! └──────────────────────────────────────────────┘
//!         │
//!         ▼
//! NormalizedResult {count, start, max_score, docs}
//! ```
//!
//! Compiler and mapper are pure, synchronous, stateless transforms: no
//! shared mutable state, safe to call concurrently from any task. All I/O
//! sits behind the [`SearchTransport`] trait.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use solr_bridge::{ConditionSet, SearchOptions, SolrClient, SolrConfig, SortSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), solr_bridge::SolrError> {
//!     let config = SolrConfig::new("localhost", "products");
//!     let client = SolrClient::new(&config)?;
//!
//!     let conditions = ConditionSet::from_value(&json!([
//!         {"category": "book"},
//!         ["between", "price", 10, 100],
//!         ["like", "title", "rust"],
//!     ]))?;
//!
//!     let options = SearchOptions {
//!         limit: Some(20),
//!         sort: vec![SortSpec::desc("price")],
//!         ..Default::default()
//!     };
//!
//!     let result = client.search(&conditions, &options).await?;
//!     println!("{} hits, showing {}", result.count, result.docs.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`query`]: condition tree, operator dispatch, compiled query
//! - [`response`]: envelope decoding, normalization, highlight merge
//! - [`transport`]: the HTTP collaborator behind the [`SearchTransport`] seam
//! - [`client`]: compile → execute → map orchestration
//! - [`config`]: per-core connection settings

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod query;
pub mod response;
pub mod transport;

pub use client::{SolrClient, DEFAULT_PRIMARY_KEY};
pub use config::SolrConfig;
pub use error::SolrError;
pub use query::{
    compile, ClauseOutcome, CompiledClause, CompiledQuery, Condition, ConditionSet, FilterQuery,
    HighlightConfig, HighlightSpec, OpKind, SearchOptions, SortOrder, SortSpec, MATCH_ALL,
};
pub use response::{Document, EngineResponse, NormalizedResult};
pub use transport::{HttpTransport, SearchTransport};
