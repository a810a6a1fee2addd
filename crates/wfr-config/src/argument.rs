use std::fmt;

use serde::{Deserialize, Serialize};

use crate::connector::Connector;

/// A single argument value: either a literal token or a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Connector(Connector),
  Token(String),
}

impl Value {
  pub fn token(token: impl Into<String>) -> Self {
    Value::Token(token.into())
  }

  /// The connector carried by this value, if any.
  pub fn connector(&self) -> Option<&Connector> {
    match self {
      Value::Connector(connector) => Some(connector),
      Value::Token(_) => None,
    }
  }
}

impl From<Connector> for Value {
  fn from(connector: Connector) -> Self {
    Value::Connector(connector)
  }
}

impl From<&str> for Value {
  fn from(token: &str) -> Self {
    Value::Token(token.to_string())
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Connector(connector) => write!(f, "{connector}"),
      Value::Token(token) => f.write_str(token),
    }
  }
}

/// One argument line of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Argument {
  /// A single unnamed value.
  Positional { value: Value },
  /// A flag (starting with `-`) followed by zero or more values.
  Optional { flag: String, values: Vec<Value> },
}

impl Argument {
  pub fn positional(value: impl Into<Value>) -> Self {
    Argument::Positional {
      value: value.into(),
    }
  }

  pub fn optional(flag: impl Into<String>, values: Vec<Value>) -> Self {
    Argument::Optional {
      flag: flag.into(),
      values,
    }
  }

  /// All values of this argument, in order. The flag itself is not a value.
  pub fn values(&self) -> &[Value] {
    match self {
      Argument::Positional { value } => std::slice::from_ref(value),
      Argument::Optional { values, .. } => values,
    }
  }

  /// Connectors among this argument's values, in order.
  pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
    self.values().iter().filter_map(Value::connector)
  }
}

impl fmt::Display for Argument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Argument::Positional { value } => write!(f, "{value}"),
      Argument::Optional { flag, values } => {
        f.write_str(flag)?;
        for value in values {
          write!(f, " {}", value)?;
        }
        Ok(())
      }
    }
  }
}
