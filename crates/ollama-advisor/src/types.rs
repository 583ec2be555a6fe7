use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
}

/// One NDJSON fragment of a generate stream.
///
/// Fields the driver does not consume (timings, context) are simply
/// ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: String,
    /// Marks the final chunk; nothing after it is read.
    #[serde(default)]
    pub done: bool,
    /// In-stream failure report; the server may emit this instead of
    /// a response fragment.
    #[serde(default)]
    pub error: Option<String>,
}
