use thiserror::Error;

#[derive(Debug, Error)]
pub enum OllamaError {
    /// Transport-level failure: connect, TLS, mid-stream cutoff.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status from the server.
    #[error("server returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// A stream fragment that was not valid generate JSON.
    #[error("unparseable generate fragment: {source}\n  line: {line}")]
    Parse {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server reported an error inside the stream.
    #[error("generate stream failed: {0}")]
    Stream(String),

    /// The model produced no text at all.
    #[error("empty response from model")]
    Empty,
}
