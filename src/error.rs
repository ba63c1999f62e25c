use reqwest::StatusCode;

/// Failures surfaced to callers of the sync and weather clients.
///
/// Malformed *stored* data never appears here — corrupt storage slots are
/// purged and treated as absent. Only remote interactions and response
/// decoding produce errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}
