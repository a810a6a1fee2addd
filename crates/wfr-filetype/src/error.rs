use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FiletypeError {
  #[error("filetype already registered: {name}")]
  AlreadyRegistered { name: String },

  #[error("failed to list {}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
