use thiserror::Error;

/// Errors surfaced by the core crate.
///
/// Pipeline agents never return these from `run`; faults inside a
/// cycle are encoded in the output types. These variants belong to
/// the configuration and journal edges.
#[derive(Debug, Error)]
pub enum AcequiaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config not found at {}", .0.display())]
    ConfigNotFound(std::path::PathBuf),
}

pub type Result<T> = std::result::Result<T, AcequiaError>;
