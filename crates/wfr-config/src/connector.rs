use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a connector consumes or produces an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
  Input,
  Output,
}

impl Direction {
  /// The DSL keyword for this direction.
  pub fn keyword(self) -> &'static str {
    match self {
      Direction::Input => "input",
      Direction::Output => "output",
    }
  }

  /// Look up a direction by its DSL keyword.
  pub fn from_keyword(keyword: &str) -> Option<Self> {
    match keyword {
      "input" => Some(Direction::Input),
      "output" => Some(Direction::Output),
      _ => None,
    }
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.keyword())
  }
}

/// A named, extension-tagged port on a step.
///
/// The extension tag is opaque here; binding it to concrete files is the
/// job of the filetype layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connector {
  pub name: String,
  pub ext: String,
  pub direction: Direction,
}

impl Connector {
  pub fn input(name: impl Into<String>, ext: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ext: ext.into(),
      direction: Direction::Input,
    }
  }

  pub fn output(name: impl Into<String>, ext: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ext: ext.into(),
      direction: Direction::Output,
    }
  }

  pub fn is_input(&self) -> bool {
    self.direction == Direction::Input
  }

  pub fn is_output(&self) -> bool {
    self.direction == Direction::Output
  }
}

impl fmt::Display for Connector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{ {} {} {} }}", self.direction, self.name, self.ext)
  }
}
