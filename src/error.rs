use thiserror::Error;

/// Why a raw tabular row was rejected at the ingest boundary.
///
/// Rejection never propagates out of batch ingestion; bad rows are
/// dropped with a warning so downstream analysis sees clean data only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("unparseable date `{0}`")]
    InvalidDate(String),
    #[error("unknown attempt result `{0}`")]
    InvalidResult(String),
    #[error("catalog row has empty id")]
    EmptyProblemId,
}
