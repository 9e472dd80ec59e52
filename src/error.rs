// src/error.rs
use thiserror::Error;

/// Faults the subscriber can hit. All of them are reported to the GUI and
/// logged; none of them terminate the process.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("websocket stream error: {0}")]
    Stream(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("malformed feed message: {0}")]
    Parse(#[from] serde_json::Error),
}
