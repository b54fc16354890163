use thiserror::Error;

/// Failures raised by the persistence collaborator. The form controller never
/// surfaces these directly; they go through `form::classify` first.
#[derive(Debug, Error)]
pub enum Error {
  #[error("storage quota exceeded")]
  QuotaExceeded,
  #[error("network failure: {0}")]
  Network(String),
  #[error("invalid item: {0}")]
  Validation(String),
  #[error("storage failure: {0}")]
  Storage(String),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  Json(#[from] serde_json::Error),
  #[error("{0}")]
  Other(String),
}
