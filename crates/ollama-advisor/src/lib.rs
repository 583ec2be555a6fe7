//! Ollama driver for the acequia advisory seam.
//!
//! Speaks the `/api/generate` wire protocol: one POST per prompt, a
//! stream of newline-delimited JSON fragments back, concatenated into
//! the final advisory text.
//!
//! ```text
//!   prompt ──▶ POST {endpoint}/api/generate  {"model", "prompt"}
//!                       │
//!              {"response": "…", "done": false}
//!              {"response": "…", "done": false}
//!              {"response": "",  "done": true}
//!                       ▼
//!              concatenated advisory text
//! ```
//!
//! The driver is thin on purpose: no retries, no session state, no
//! interpretation of the text. Whether the reply is a usable command
//! is decided upstream by the advisory agent.

mod client;
mod error;
mod types;

pub use client::OllamaAdvisor;
pub use error::OllamaError;
pub use types::{GenerateChunk, GenerateRequest};
