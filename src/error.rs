use thiserror::Error;

/// Fatal outcomes of normalizing a single fixture or building a fetch
/// request. Rate-limit truncation is deliberately not here: a truncated
/// page set is a valid partial result, reported via `PageSet::truncated`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no {namespace} lookup entry for code {code}")]
    LookupKeyMissing { namespace: &'static str, code: i64 },

    #[error("no {entity} entry matching {condition}")]
    FieldMissing {
        entity: &'static str,
        condition: String,
    },

    #[error("invalid combination of fixture query parameters")]
    InvalidParameterCombination,

    #[error("search returned no result for \"{query}\"")]
    SearchNoResult { query: String },
}

impl PipelineError {
    pub fn field_missing(entity: &'static str, condition: impl Into<String>) -> Self {
        Self::FieldMissing {
            entity,
            condition: condition.into(),
        }
    }
}
