use std::path::PathBuf;

use thiserror::Error;
use wfr_dsl::SyntaxError;

/// Errors that can occur when assembling a step registry.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// Two steps share a name.
  #[error("step already registered: {name}")]
  AlreadyExists { name: String },

  /// IO error when reading a source document.
  #[error("failed to read {}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A source document does not parse.
  #[error("{}: {source}", .path.display())]
  Syntax {
    path: PathBuf,
    #[source]
    source: SyntaxError,
  },

  /// A source document exceeds the configured size limit.
  #[error("{} is {size} bytes, limit is {limit}", .path.display())]
  TooLarge { path: PathBuf, size: u64, limit: u64 },
}
