use thiserror::Error;

/// Library-level error type. All variants are load-time concerns; the
/// per-call matching pipeline is infallible by design.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid category configuration: {0}")]
    CategoryConfig(String),

    #[error("failed to read category configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse category configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
