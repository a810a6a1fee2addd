use std::process::ExitStatus;

use thiserror::Error;
use wfr_config::PortRef;
use wfr_workflow::GraphError;

/// Errors that can occur while planning or running a workflow.
#[derive(Debug, Error)]
pub enum RunError {
  /// The workflow graph cannot be ordered.
  #[error(transparent)]
  Graph(#[from] GraphError),

  /// A workflow input has no source file.
  #[error("no source bound to workflow input '{port}'")]
  MissingSource { port: PortRef },

  /// A connection reads from a port its step does not declare.
  #[error("'{port}' is not a declared output")]
  UndeclaredOutput { port: PortRef },

  /// Preparing the job's output directory failed.
  #[error("failed to prepare step '{step}'")]
  Io {
    step: String,
    #[source]
    source: std::io::Error,
  },

  /// The step's program could not be started.
  #[error("failed to launch '{program}' for step '{step}'")]
  Spawn {
    step: String,
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The step's program exited unsuccessfully.
  #[error("step '{step}' failed ({status}): {stderr}")]
  JobFailed {
    step: String,
    status: ExitStatus,
    stderr: String,
  },

  /// Execution was cancelled.
  #[error("run cancelled")]
  Cancelled,
}
