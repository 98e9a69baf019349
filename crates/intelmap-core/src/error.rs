use thiserror::Error;

/// The outcomes of an import that are shown to the user.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("not an intelligence report: expected IR number + OP name header")]
    NotRecognised,

    #[error("no intel entries found in {report_id}")]
    NoEntries { report_id: String },
}

/// Failure from a coordinate resolver. Always absorbed by the orchestrator.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("could not parse response: {0}")]
    Parse(String),

    #[error("lookup timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}
