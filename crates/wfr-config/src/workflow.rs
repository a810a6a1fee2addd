use std::fmt;

use serde::{Deserialize, Serialize};

/// A port on a named step, e.g. `copy_1.dest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRef {
  pub step: String,
  pub port: String,
}

impl PortRef {
  pub fn new(step: impl Into<String>, port: impl Into<String>) -> Self {
    Self {
      step: step.into(),
      port: port.into(),
    }
  }
}

impl fmt::Display for PortRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.step, self.port)
  }
}

/// A directed link from a producer's output port to a consumer's input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
  pub from: PortRef,
  pub to: PortRef,
}

impl Connection {
  pub fn new(
    from_step: impl Into<String>,
    from_port: impl Into<String>,
    to_step: impl Into<String>,
    to_port: impl Into<String>,
  ) -> Self {
    Self {
      from: PortRef::new(from_step, from_port),
      to: PortRef::new(to_step, to_port),
    }
  }
}

impl fmt::Display for Connection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} {} -> {} {}",
      self.from.step, self.from.port, self.to.step, self.to.port
    )
  }
}

/// An unresolved workflow: a name plus connections in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDef {
  pub name: String,
  #[serde(default)]
  pub connections: Vec<Connection>,
}

impl WorkflowDef {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      connections: Vec::new(),
    }
  }

  /// Append a connection, builder style.
  pub fn connect(mut self, connection: Connection) -> Self {
    self.connections.push(connection);
    self
  }
}

impl fmt::Display for WorkflowDef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "workflow {}", self.name)?;
    for connection in &self.connections {
      write!(f, "\n  {}", connection)?;
    }
    Ok(())
  }
}
