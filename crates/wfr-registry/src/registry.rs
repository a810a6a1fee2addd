use std::collections::HashSet;

use indexmap::IndexMap;
use wfr_config::{Document, Step};

use crate::error::RegistryError;

/// Read-only step lookup used during workflow resolution.
pub trait StepRegistry: Send + Sync {
  /// Get a step by name.
  fn get(&self, name: &str) -> Option<&Step>;

  /// Names of all registered steps, in registration order.
  fn names(&self) -> Vec<&str>;
}

impl<T: StepRegistry + ?Sized> StepRegistry for &T {
  fn get(&self, name: &str) -> Option<&Step> {
    (**self).get(name)
  }

  fn names(&self) -> Vec<&str> {
    (**self).names()
  }
}

/// In-memory registry keeping steps in registration order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStepRegistry {
  steps: IndexMap<String, Step>,
}

impl MemoryStepRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a step. Step names must be unique.
  pub fn register(&mut self, step: Step) -> Result<(), RegistryError> {
    if self.steps.contains_key(&step.name) {
      return Err(RegistryError::AlreadyExists { name: step.name });
    }
    self.steps.insert(step.name.clone(), step);
    Ok(())
  }

  /// Register every step of a parsed document.
  ///
  /// Either every step is registered or none is: a name already present, or
  /// repeated within the document, rejects the whole document.
  pub fn register_document(&mut self, document: &Document) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for step in document.steps() {
      if self.steps.contains_key(&step.name) || !seen.insert(step.name.as_str()) {
        return Err(RegistryError::AlreadyExists {
          name: step.name.clone(),
        });
      }
    }

    for step in document.steps() {
      self.steps.insert(step.name.clone(), step.clone());
    }
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
}

impl StepRegistry for MemoryStepRegistry {
  fn get(&self, name: &str) -> Option<&Step> {
    self.steps.get(name)
  }

  fn names(&self) -> Vec<&str> {
    self.steps.keys().map(String::as_str).collect()
  }
}
