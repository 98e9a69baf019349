use intelmap_core::ResolveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GeoError> for ResolveError {
    fn from(e: GeoError) -> Self {
        match e {
            #[cfg(feature = "http")]
            GeoError::Http(e) if e.is_timeout() => ResolveError::Timeout,
            #[cfg(feature = "http")]
            GeoError::Http(e) => ResolveError::Http(e.to_string()),
            GeoError::Server { status, body } => ResolveError::Server { status, body },
            GeoError::Json(e) => ResolveError::Parse(e.to_string()),
            GeoError::Io(e) => ResolveError::Other(e.to_string()),
        }
    }
}
