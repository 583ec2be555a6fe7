use async_trait::async_trait;
use thiserror::Error;

/// Failure surfaced by an advisory backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached at all (connect failure,
    /// transport timeout).
    #[error("advisory backend unreachable: {0}")]
    Unreachable(String),

    /// The backend was reached but produced no usable advisory text.
    #[error("advisory backend failed: {0}")]
    Backend(String),
}

/// The single seam to a language model.
///
/// Implementations return raw advisory text; interpreting it is the
/// advisory agent's job.
#[async_trait]
pub trait AdvisoryBackend: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Canned backend for dry runs and tests.
#[derive(Debug, Clone)]
pub struct StaticBackend {
    response: String,
}

impl StaticBackend {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl AdvisoryBackend for StaticBackend {
    async fn invoke(&self, _prompt: &str) -> Result<String, BackendError> {
        Ok(self.response.clone())
    }
}
