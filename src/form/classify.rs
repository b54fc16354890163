use crate::{error::Error, form::messages};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Quota,
  Network,
  Validation,
  Storage,
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
  pub kind: ErrorKind,
  pub message: String,
}

/// The single point translating store failures into the fixed user-facing
/// message set. Matched in priority order: quota, network, validation,
/// storage; anything else falls back to a generic retry message. Validation
/// failures keep the store-supplied message, every other kind uses its fixed
/// string.
pub fn classify(err: &Error) -> ClassifiedError {
  match err {
    Error::QuotaExceeded => {
      ClassifiedError { kind: ErrorKind::Quota, message: messages::QUOTA_EXCEEDED.to_string() }
    },
    Error::Network(_) => {
      ClassifiedError { kind: ErrorKind::Network, message: messages::NETWORK_FAILURE.to_string() }
    },
    Error::Validation(message) => ClassifiedError { kind: ErrorKind::Validation, message: message.clone() },
    Error::Storage(_) | Error::Io(_) | Error::Json(_) => {
      ClassifiedError { kind: ErrorKind::Storage, message: messages::STORAGE_FAILURE.to_string() }
    },
    Error::Other(_) => ClassifiedError { kind: ErrorKind::Unknown, message: messages::UNKNOWN_FAILURE.to_string() },
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_classify_quota() {
    let classified = classify(&Error::QuotaExceeded);
    assert_eq!(classified.kind, ErrorKind::Quota);
    assert_eq!(classified.message, messages::QUOTA_EXCEEDED);
  }

  #[test]
  fn test_classify_network() {
    let classified = classify(&Error::Network("connection reset".to_string()));
    assert_eq!(classified.kind, ErrorKind::Network);
    assert_eq!(classified.message, messages::NETWORK_FAILURE);
  }

  #[test]
  fn test_classify_validation_passes_message_through() {
    let classified = classify(&Error::Validation("item name must not be empty".to_string()));
    assert_eq!(classified.kind, ErrorKind::Validation);
    assert_eq!(classified.message, "item name must not be empty");
  }

  #[test]
  fn test_classify_storage_covers_io_and_json() {
    let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
    assert_eq!(classify(&io_err).kind, ErrorKind::Storage);
    assert_eq!(classify(&io_err).message, messages::STORAGE_FAILURE);

    let json_err = Error::Json(serde_json::from_str::<Vec<String>>("not json").unwrap_err());
    assert_eq!(classify(&json_err).kind, ErrorKind::Storage);

    let storage_err = Error::Storage("write failed".to_string());
    assert_eq!(classify(&storage_err).kind, ErrorKind::Storage);
  }

  #[test]
  fn test_classify_falls_back_to_unknown() {
    let classified = classify(&Error::Other("boom".to_string()));
    assert_eq!(classified.kind, ErrorKind::Unknown);
    assert_eq!(classified.message, messages::UNKNOWN_FAILURE);
  }
}
