use thiserror::Error;
use wfr_config::{Connection, Direction, PortRef};
use wfr_workflow::GraphError;

/// Errors that can occur during workflow resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// A connection names a step the registry does not know.
  #[error("step '{step}' not found in registry (connection `{connection}`)")]
  StepNotFound { step: String, connection: Connection },

  /// A connection names a port the step does not declare. Strict mode only.
  #[error("step '{}' has no {direction} port '{}' (connection `{connection}`)", .port.step, .port.port)]
  UnknownPort {
    port: PortRef,
    direction: Direction,
    connection: Connection,
  },

  /// The graph rejected a connection.
  #[error("invalid graph: {0}")]
  Graph(#[from] GraphError),
}
