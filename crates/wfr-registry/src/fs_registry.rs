use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use wfr_config::{Document, Step, WorkflowDef};

use crate::error::RegistryError;
use crate::registry::{MemoryStepRegistry, StepRegistry};

/// Default upper bound on the size of a single source document.
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;

/// File extension of workflow source documents.
const SOURCE_EXT: &str = "wfr";

/// Read and parse one source document, refusing files above `max_bytes`.
pub async fn load_document(path: &Path, max_bytes: u64) -> Result<Document, RegistryError> {
  let io_err = |source| RegistryError::Io {
    path: path.to_path_buf(),
    source,
  };

  let size = fs::metadata(path).await.map_err(io_err)?.len();
  if size > max_bytes {
    return Err(RegistryError::TooLarge {
      path: path.to_path_buf(),
      size,
      limit: max_bytes,
    });
  }

  let source = fs::read_to_string(path).await.map_err(io_err)?;
  wfr_dsl::parse(&source).map_err(|source| RegistryError::Syntax {
    path: path.to_path_buf(),
    source,
  })
}

/// Filesystem-backed registry.
///
/// Steps and workflows are collected from `.wfr` source documents:
/// ```text
/// {root}/
/// ├── align.wfr
/// └── copy.wfr
/// ```
/// Files are read in name order so registration order is reproducible.
#[derive(Debug, Clone, Default)]
pub struct FsStepRegistry {
  steps: MemoryStepRegistry,
  workflows: Vec<WorkflowDef>,
}

impl FsStepRegistry {
  /// Load every `.wfr` document directly inside `root`.
  pub async fn open(root: impl AsRef<Path>, max_bytes: u64) -> Result<Self, RegistryError> {
    let root = root.as_ref();
    let io_err = |source| RegistryError::Io {
      path: root.to_path_buf(),
      source,
    };

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(root).await.map_err(io_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
      let path = entry.path();
      if path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXT) {
        paths.push(path);
      }
    }
    paths.sort();

    Self::from_files(&paths, max_bytes).await
  }

  /// Load the given source documents, in order.
  pub async fn from_files(paths: &[PathBuf], max_bytes: u64) -> Result<Self, RegistryError> {
    let mut registry = Self::default();
    for path in paths {
      let document = load_document(path, max_bytes).await?;
      debug!(
        path = %path.display(),
        steps = document.steps().count(),
        workflows = document.workflows().count(),
        "loaded document"
      );
      registry.add_document(document)?;
    }
    Ok(registry)
  }

  /// Register the steps of `document` and keep its workflows.
  pub fn add_document(&mut self, document: Document) -> Result<(), RegistryError> {
    self.steps.register_document(&document)?;
    self.workflows.extend(document.workflows().cloned());
    Ok(())
  }

  /// Workflow definitions found in the loaded documents, in load order.
  pub fn workflows(&self) -> &[WorkflowDef] {
    &self.workflows
  }

  /// Find a workflow definition by name.
  pub fn workflow(&self, name: &str) -> Option<&WorkflowDef> {
    self.workflows.iter().find(|w| w.name == name)
  }
}

impl StepRegistry for FsStepRegistry {
  fn get(&self, name: &str) -> Option<&Step> {
    self.steps.get(name)
  }

  fn names(&self) -> Vec<&str> {
    self.steps.names()
  }
}
