use async_trait::async_trait;
use futures::StreamExt;

use acequia_core::backend::{AdvisoryBackend, BackendError};

use crate::error::OllamaError;
use crate::types::{GenerateChunk, GenerateRequest};

// ─── Client ──────────────────────────────────────────────────────────────────

/// Client for one Ollama-compatible generate endpoint.
#[derive(Debug, Clone)]
pub struct OllamaAdvisor {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaAdvisor {
    /// `endpoint` is the server base URL (no trailing `/api`);
    /// `model` names a pulled model, e.g. `qwen3:8b`.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            endpoint,
            model: model.into(),
        }
    }

    /// Run one prompt to completion and return the text accumulated
    /// up to the final (`done`) chunk.
    pub async fn generate(&self, prompt: &str) -> Result<String, OllamaError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
        };
        let url = format!("{}/api/generate", self.endpoint);
        tracing::debug!(url = %url, model = %self.model, "sending generate request");

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut text = String::new();
        let mut done = false;

        'read: while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
            while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=newline).collect();
                if consume_line(&line, &mut text)? {
                    done = true;
                    break 'read;
                }
            }
        }
        // Servers answering a single object send no trailing newline.
        if !done && !buffer.is_empty() {
            consume_line(&buffer, &mut text)?;
        }

        if text.trim().is_empty() {
            return Err(OllamaError::Empty);
        }
        tracing::debug!(chars = text.len(), "generate stream complete");
        Ok(text)
    }
}

/// Parse one NDJSON line and fold its fragment into `text`. Returns
/// true for the final (`done`) chunk of the stream.
fn consume_line(line: &[u8], text: &mut String) -> Result<bool, OllamaError> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    if line.is_empty() {
        return Ok(false);
    }
    let chunk: GenerateChunk = serde_json::from_str(line).map_err(|e| OllamaError::Parse {
        line: line.to_string(),
        source: e,
    })?;
    if let Some(message) = chunk.error {
        return Err(OllamaError::Stream(message));
    }
    text.push_str(&chunk.response);
    Ok(chunk.done)
}

// ─── Backend seam ────────────────────────────────────────────────────────────

#[async_trait]
impl AdvisoryBackend for OllamaAdvisor {
    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        self.generate(prompt).await.map_err(|e| match &e {
            OllamaError::Http(source) if source.is_connect() || source.is_timeout() => {
                BackendError::Unreachable(e.to_string())
            }
            _ => BackendError::Backend(e.to_string()),
        })
    }
}
