use thiserror::Error;

/// The grammar rule a line violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
  #[error("connector must start with '{{ '")]
  ConnectorOpen,

  #[error("invalid connector type '{0}', expected 'input' or 'output'")]
  ConnectorKeyword(String),

  #[error("connector name cannot be empty")]
  EmptyConnectorName,

  #[error("connector ext cannot be empty")]
  EmptyConnectorExt,

  #[error("connector must end with ' }}'")]
  ConnectorClose,

  #[error("only one positional argument per line")]
  ExtraPositional,

  #[error("optional argument flags must start with '-'")]
  FlagPrefix,

  #[error("{what} cannot be empty")]
  EmptyHeader { what: &'static str },

  #[error("{what} must appear by itself")]
  NotStandalone { what: &'static str },

  #[error("step is missing its program line")]
  MissingProgram,

  #[error("connection needs five tokens: from_step from_port -> to_step to_port")]
  IncompleteConnection,

  #[error("too many tokens in connection")]
  ExtraConnectionTokens,

  #[error("expected '->' between connection ports, found '{0}'")]
  Arrow(String),

  #[error("invalid keyword '{0}', expected 'step' or 'workflow'")]
  Keyword(String),
}

/// A grammar violation located in the source document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}: `{text}`")]
pub struct SyntaxError {
  /// 1-based line number in the source document.
  pub line: usize,
  /// The offending line after comment stripping.
  pub text: String,
  pub kind: SyntaxErrorKind,
}

impl SyntaxError {
  pub fn new(line: usize, text: impl Into<String>, kind: SyntaxErrorKind) -> Self {
    Self {
      line,
      text: text.into(),
      kind,
    }
  }
}
