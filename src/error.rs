//! Error taxonomy for the bridge.
//!
//! Every variant is terminal for the current request: nothing here is
//! retried internally. A clause missing its second operand is the one
//! deliberate non-error short-circuit and never reaches this enum (see
//! [`ClauseOutcome::Omit`](crate::query::ClauseOutcome)).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolrError {
    /// Operator text not in the supported set.
    #[error("Found unknown operator in query: {operator}")]
    UnknownOperator { operator: String },

    /// A required operand is absent (field name, or the second range bound
    /// of a `between`).
    #[error("Operator '{operator}' requires {required} operands")]
    MissingOperand { operator: String, required: usize },

    /// Value is neither a scalar nor a sequence of scalars where one is
    /// required.
    #[error("Value formatted incorrectly, must be scalar or sequence: {clause}")]
    InvalidValueType { clause: String },

    /// Non-200 reply from the engine. Carries the raw body for diagnosis.
    #[error("Solr response error: status {status}, body: {body}")]
    EngineResponse { status: u16, body: String },

    /// Body was not decodable JSON or lacked the `response.docs` envelope.
    #[error("Malformed engine response: {0}")]
    MalformedResponse(String),

    /// A document lacked the primary-key field during highlight merge.
    #[error("Document is missing primary key field '{field}'")]
    MissingPrimaryKey { field: String },

    /// Invalid connection configuration.
    #[error("Invalid solr configuration: {0}")]
    Config(String),

    /// Connection-level transport failure (timeout, refused, DNS). A non-2xx
    /// engine reply is NOT a transport error; the mapper owns that check.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SolrError {
    /// Short label for metrics, one per variant.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            SolrError::UnknownOperator { .. } => "unknown_operator",
            SolrError::MissingOperand { .. } => "missing_operand",
            SolrError::InvalidValueType { .. } => "invalid_value_type",
            SolrError::EngineResponse { .. } => "engine_error",
            SolrError::MalformedResponse(_) => "malformed_response",
            SolrError::MissingPrimaryKey { .. } => "missing_primary_key",
            SolrError::Config(_) => "config",
            SolrError::Transport(_) => "transport",
        }
    }
}
