use std::fmt;

use serde::{Deserialize, Serialize};

use crate::argument::Argument;
use crate::connector::Connector;

/// One external program invocation: a unique name, the program to run and
/// its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
  pub name: String,
  pub program: String,
  #[serde(default)]
  pub args: Vec<Argument>,
}

impl Step {
  pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      program: program.into(),
      args: Vec::new(),
    }
  }

  /// Append an argument, builder style.
  pub fn arg(mut self, arg: Argument) -> Self {
    self.args.push(arg);
    self
  }

  /// Input connectors across all arguments, in argument order.
  pub fn inputs(&self) -> impl Iterator<Item = &Connector> {
    self.connectors().filter(|c| c.is_input())
  }

  /// Output connectors across all arguments, in argument order.
  pub fn outputs(&self) -> impl Iterator<Item = &Connector> {
    self.connectors().filter(|c| c.is_output())
  }

  pub fn input(&self, name: &str) -> Option<&Connector> {
    self.inputs().find(|c| c.name == name)
  }

  pub fn output(&self, name: &str) -> Option<&Connector> {
    self.outputs().find(|c| c.name == name)
  }

  fn connectors(&self) -> impl Iterator<Item = &Connector> {
    self.args.iter().flat_map(Argument::connectors)
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "step {}", self.name)?;
    write!(f, "  {}", self.program)?;
    for arg in &self.args {
      write!(f, "\n  {}", arg)?;
    }
    Ok(())
  }
}
