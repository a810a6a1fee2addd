use serde::{Deserialize, Serialize};

use crate::step::Step;
use crate::workflow::WorkflowDef;

/// A single top-level paragraph of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Definition {
  Step(Step),
  Workflow(WorkflowDef),
}

/// Every definition of one source document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
  pub definitions: Vec<Definition>,
}

impl Document {
  pub fn steps(&self) -> impl Iterator<Item = &Step> {
    self.definitions.iter().filter_map(|d| match d {
      Definition::Step(step) => Some(step),
      Definition::Workflow(_) => None,
    })
  }

  pub fn workflows(&self) -> impl Iterator<Item = &WorkflowDef> {
    self.definitions.iter().filter_map(|d| match d {
      Definition::Workflow(workflow) => Some(workflow),
      Definition::Step(_) => None,
    })
  }

  /// Find a workflow definition by name.
  pub fn workflow(&self, name: &str) -> Option<&WorkflowDef> {
    self.workflows().find(|w| w.name == name)
  }
}
