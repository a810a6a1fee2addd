use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  /// The dependency graph is not acyclic. Steps are listed in data-flow
  /// order, starting with the earliest activated one.
  #[error("cycle detected in workflow graph: {}", .steps.join(" -> "))]
  Cycle { steps: Vec<String> },

  /// A connection touched a step that was never activated.
  #[error("step '{step}' is not active in workflow")]
  StepNotActive { step: String },
}
