//! Recursive-descent parsers for each grammar rule.
//!
//! Line-level parsers (`parse_connector`, `parse_*_argument`) report only the
//! rule that failed; paragraph-level parsers attach the line it failed on.

use tracing::debug;
use wfr_config::{
  Argument, Connection, Connector, Definition, Direction, Document, Step, Value, WorkflowDef,
};

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::lexer::{Line, next_token, preprocess};
use crate::paragraph::split_paragraphs;

const ARROW: &str = "->";

/// Parse `{ input|output NAME EXT }` from the start of `line`.
///
/// Returns the connector and whatever text follows the closing brace.
pub fn parse_connector(line: &str) -> Result<(Connector, &str), SyntaxErrorKind> {
  let (open, rest) = next_token(line);
  if open != "{" {
    return Err(SyntaxErrorKind::ConnectorOpen);
  }

  let (keyword, rest) = next_token(rest);
  let direction = Direction::from_keyword(keyword)
    .ok_or_else(|| SyntaxErrorKind::ConnectorKeyword(keyword.to_string()))?;

  let (name, rest) = next_token(rest);
  if name.is_empty() {
    return Err(SyntaxErrorKind::EmptyConnectorName);
  }

  let (ext, rest) = next_token(rest);
  if ext.is_empty() {
    return Err(SyntaxErrorKind::EmptyConnectorExt);
  }

  let (close, rest) = next_token(rest);
  if close != "}" {
    return Err(SyntaxErrorKind::ConnectorClose);
  }

  let connector = Connector {
    name: name.to_string(),
    ext: ext.to_string(),
    direction,
  };
  Ok((connector, rest))
}

/// Parse one value: a connector if the text opens with `{`, else a token.
pub fn parse_argument_value(line: &str) -> Result<(Value, &str), SyntaxErrorKind> {
  if line.starts_with('{') {
    let (connector, rest) = parse_connector(line)?;
    Ok((Value::Connector(connector), rest))
  } else {
    let (token, rest) = next_token(line);
    Ok((Value::token(token), rest))
  }
}

pub fn parse_positional_argument(line: &str) -> Result<Argument, SyntaxErrorKind> {
  let (value, rest) = parse_argument_value(line)?;
  if !rest.is_empty() {
    return Err(SyntaxErrorKind::ExtraPositional);
  }
  Ok(Argument::Positional { value })
}

pub fn parse_optional_argument(line: &str) -> Result<Argument, SyntaxErrorKind> {
  let (flag, mut rest) = next_token(line);
  if !flag.starts_with('-') {
    return Err(SyntaxErrorKind::FlagPrefix);
  }

  let mut values = Vec::new();
  while !rest.is_empty() {
    let (value, remaining) = parse_argument_value(rest)?;
    values.push(value);
    rest = remaining;
  }

  Ok(Argument::Optional {
    flag: flag.to_string(),
    values,
  })
}

/// Read a header line that must hold exactly one token.
fn parse_header<'a>(line: &Line<'a>, what: &'static str) -> Result<&'a str, SyntaxError> {
  let (token, rest) = next_token(line.text);
  if token.is_empty() {
    return Err(locate(line, SyntaxErrorKind::EmptyHeader { what }));
  }
  if !rest.is_empty() {
    return Err(locate(line, SyntaxErrorKind::NotStandalone { what }));
  }
  Ok(token)
}

fn locate(line: &Line<'_>, kind: SyntaxErrorKind) -> SyntaxError {
  SyntaxError::new(line.number, line.text, kind)
}

/// Parse a step paragraph whose first line holds only the step name.
pub fn parse_step(lines: &[Line<'_>]) -> Result<Step, SyntaxError> {
  let Some((header, body)) = lines.split_first() else {
    return Err(SyntaxError::new(
      0,
      "",
      SyntaxErrorKind::EmptyHeader { what: "step name" },
    ));
  };
  let name = parse_header(header, "step name")?;

  let Some((program_line, arg_lines)) = body.split_first() else {
    return Err(locate(header, SyntaxErrorKind::MissingProgram));
  };
  let program = parse_header(program_line, "program")?;

  let mut step = Step::new(name, program);
  for line in arg_lines {
    let arg = if line.text.starts_with('-') {
      parse_optional_argument(line.text)
    } else {
      parse_positional_argument(line.text)
    };
    step.args.push(arg.map_err(|kind| locate(line, kind))?);
  }
  Ok(step)
}

fn parse_connection(line: &Line<'_>) -> Result<Connection, SyntaxError> {
  let (from_step, rest) = next_token(line.text);
  let (from_port, rest) = next_token(rest);
  let (arrow, rest) = next_token(rest);
  let (to_step, rest) = next_token(rest);
  let (to_port, rest) = next_token(rest);

  if to_port.is_empty() {
    return Err(locate(line, SyntaxErrorKind::IncompleteConnection));
  }
  if !rest.is_empty() {
    return Err(locate(line, SyntaxErrorKind::ExtraConnectionTokens));
  }
  if arrow != ARROW {
    return Err(locate(line, SyntaxErrorKind::Arrow(arrow.to_string())));
  }

  Ok(Connection::new(from_step, from_port, to_step, to_port))
}

/// Parse a workflow paragraph whose first line holds only the workflow name.
pub fn parse_workflow(lines: &[Line<'_>]) -> Result<WorkflowDef, SyntaxError> {
  let Some((header, body)) = lines.split_first() else {
    return Err(SyntaxError::new(
      0,
      "",
      SyntaxErrorKind::EmptyHeader {
        what: "workflow name",
      },
    ));
  };
  let name = parse_header(header, "workflow name")?;

  let mut workflow = WorkflowDef::new(name);
  for line in body {
    workflow.connections.push(parse_connection(line)?);
  }
  Ok(workflow)
}

/// Dispatch a paragraph on its leading keyword.
pub fn parse_paragraph(lines: &[Line<'_>]) -> Result<Definition, SyntaxError> {
  let Some((first, rest)) = lines.split_first() else {
    return Err(SyntaxError::new(0, "", SyntaxErrorKind::Keyword(String::new())));
  };

  let (keyword, header) = next_token(first.text);
  // The sub-parsers see the header line without its keyword.
  let mut stripped = Vec::with_capacity(lines.len());
  stripped.push(Line::new(first.number, header));
  stripped.extend_from_slice(rest);

  match keyword {
    "step" => parse_step(&stripped).map(Definition::Step),
    "workflow" => parse_workflow(&stripped).map(Definition::Workflow),
    other => Err(locate(first, SyntaxErrorKind::Keyword(other.to_string()))),
  }
}

/// Parse a complete document.
pub fn parse(source: &str) -> Result<Document, SyntaxError> {
  let lines = preprocess(source);
  let mut document = Document::default();

  for paragraph in split_paragraphs(lines) {
    document.definitions.push(parse_paragraph(&paragraph)?);
  }

  debug!(
    definitions = document.definitions.len(),
    steps = document.steps().count(),
    workflows = document.workflows().count(),
    "parsed document"
  );
  Ok(document)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lines<'a>(texts: &[&'a str]) -> Vec<Line<'a>> {
    texts
      .iter()
      .enumerate()
      .map(|(idx, text)| Line::new(idx + 1, *text))
      .collect()
  }

  fn blast_step() -> Step {
    Step::new("blastn-mydb", "blastn")
      .arg(Argument::optional(
        "-query",
        vec![Connector::input("seqs", "fasta").into()],
      ))
      .arg(Argument::optional("-db", vec![Value::token("myblastdb")]))
      .arg(Argument::optional(
        "-out",
        vec![Connector::output("result", "tsv").into()],
      ))
  }

  #[test]
  fn test_parse_connector() {
    assert_eq!(
      parse_connector("{ input a b }"),
      Ok((Connector::input("a", "b"), ""))
    );
    assert_eq!(
      parse_connector("{ output 1 . } g-- -f"),
      Ok((Connector::output("1", "."), "g-- -f"))
    );
  }

  #[test]
  fn test_parse_connector_errors() {
    assert_eq!(
      parse_connector("{input a b}"),
      Err(SyntaxErrorKind::ConnectorOpen)
    );
    assert_eq!(
      parse_connector("{ inout a b }"),
      Err(SyntaxErrorKind::ConnectorKeyword("inout".to_string()))
    );
    assert_eq!(
      parse_connector("{ input"),
      Err(SyntaxErrorKind::EmptyConnectorName)
    );
    assert_eq!(
      parse_connector("{ input a"),
      Err(SyntaxErrorKind::EmptyConnectorExt)
    );
    assert_eq!(
      parse_connector("{ input a b"),
      Err(SyntaxErrorKind::ConnectorClose)
    );
    assert_eq!(
      parse_connector("{ input a b c }"),
      Err(SyntaxErrorKind::ConnectorClose)
    );
  }

  #[test]
  fn test_parse_argument_value() {
    assert_eq!(
      parse_argument_value("great.txt { input a b }"),
      Ok((Value::token("great.txt"), "{ input a b }"))
    );
    assert_eq!(
      parse_argument_value("{ input a b } great.txt"),
      Ok((Connector::input("a", "b").into(), "great.txt"))
    );
  }

  #[test]
  fn test_parse_positional_argument() {
    assert_eq!(
      parse_positional_argument("myfile.txt"),
      Ok(Argument::positional("myfile.txt"))
    );
    assert_eq!(
      parse_positional_argument("{ input a b }"),
      Ok(Argument::positional(Connector::input("a", "b")))
    );
    assert_eq!(
      parse_positional_argument("myfile.txt b"),
      Err(SyntaxErrorKind::ExtraPositional)
    );
    assert_eq!(
      parse_positional_argument("{ output a b } c"),
      Err(SyntaxErrorKind::ExtraPositional)
    );
  }

  #[test]
  fn test_parse_optional_argument() {
    assert_eq!(
      parse_optional_argument("-b"),
      Ok(Argument::optional("-b", vec![]))
    );
    assert_eq!(
      parse_optional_argument("--hello there c"),
      Ok(Argument::optional(
        "--hello",
        vec![Value::token("there"), Value::token("c")]
      ))
    );
    assert_eq!(
      parse_optional_argument("-i { input a b } x { output c d }"),
      Ok(Argument::optional(
        "-i",
        vec![
          Connector::input("a", "b").into(),
          Value::token("x"),
          Connector::output("c", "d").into(),
        ]
      ))
    );
    assert_eq!(
      parse_optional_argument("b c"),
      Err(SyntaxErrorKind::FlagPrefix)
    );
  }

  #[test]
  fn test_parse_step() {
    let p = lines(&[
      "blastn-mydb",
      "blastn",
      "-query { input seqs fasta }",
      "-db myblastdb",
      "-out { output result tsv }",
    ]);
    assert_eq!(parse_step(&p), Ok(blast_step()));
  }

  #[test]
  fn test_parse_step_header_errors() {
    let err = parse_step(&lines(&["a b", "prog"])).unwrap_err();
    assert_eq!(
      err.kind,
      SyntaxErrorKind::NotStandalone { what: "step name" }
    );
    assert_eq!(err.line, 1);

    let err = parse_step(&lines(&["a", "prog extra"])).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::NotStandalone { what: "program" });
    assert_eq!(err.line, 2);

    let err = parse_step(&lines(&["a"])).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::MissingProgram);

    let err = parse_step(&lines(&["", "prog"])).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::EmptyHeader { what: "step name" });
  }

  #[test]
  fn test_parse_step_argument_error_is_located() {
    let p = lines(&["a", "prog", "-x 1", "one two"]);
    let err = parse_step(&p).unwrap_err();

    assert_eq!(err.line, 4);
    assert_eq!(err.text, "one two");
    assert_eq!(err.kind, SyntaxErrorKind::ExtraPositional);
  }

  #[test]
  fn test_parse_workflow() {
    let p = lines(&[
      "double_copy",
      "copy_1 dest -> copy_2 source",
      "copy_2 dest -> copy_3 source",
    ]);
    assert_eq!(
      parse_workflow(&p),
      Ok(
        WorkflowDef::new("double_copy")
          .connect(Connection::new("copy_1", "dest", "copy_2", "source"))
          .connect(Connection::new("copy_2", "dest", "copy_3", "source"))
      )
    );
  }

  #[test]
  fn test_parse_workflow_token_count() {
    let err = parse_workflow(&lines(&["w", "a out -> b in extra"])).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::ExtraConnectionTokens);

    let err = parse_workflow(&lines(&["w", "a out -> b"])).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::IncompleteConnection);

    let err = parse_workflow(&lines(&["w", "a out => b in"])).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::Arrow("=>".to_string()));
  }

  #[test]
  fn test_parse_paragraph() {
    let p = lines(&[
      "step blastn-mydb",
      "blastn",
      "-query { input seqs fasta }",
      "-db myblastdb",
      "-out { output result tsv }",
    ]);
    assert_eq!(parse_paragraph(&p), Ok(Definition::Step(blast_step())));
  }

  #[test]
  fn test_parse_paragraph_unknown_keyword() {
    let err = parse_paragraph(&lines(&["configure blastn_genes", "-evalue 1e-3"])).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::Keyword("configure".to_string()));
    assert_eq!(err.line, 1);
  }

  #[test]
  fn test_parse() {
    let source = "step a\nb\n--c d ef\ng\n\nstep h\nijk.py\n{ input m n }\n";

    let document = parse(source).unwrap();
    assert_eq!(
      document.definitions,
      vec![
        Definition::Step(
          Step::new("a", "b")
            .arg(Argument::optional(
              "--c",
              vec![Value::token("d"), Value::token("ef")]
            ))
            .arg(Argument::positional("g"))
        ),
        Definition::Step(
          Step::new("h", "ijk.py").arg(Argument::positional(Connector::input("m", "n")))
        ),
      ]
    );
  }

  #[test]
  fn test_parse_aborts_whole_document() {
    let source = "step a\nb\n\nstep c\nd\n{input x y}\n\nworkflow w\na o -> c x\n";

    let err = parse(source).unwrap_err();
    assert_eq!(err.line, 6);
    assert_eq!(err.kind, SyntaxErrorKind::ConnectorOpen);
    assert_eq!(
      err.to_string(),
      "line 6: connector must start with '{ ': `{input x y}`"
    );
  }

  #[test]
  fn test_step_round_trip() {
    let step = blast_step();

    let document = parse(&step.to_string()).unwrap();
    assert_eq!(document.definitions, vec![Definition::Step(step)]);
  }

  #[test]
  fn test_workflow_round_trip() {
    let workflow = WorkflowDef::new("w")
      .connect(Connection::new("a", "out", "b", "in"))
      .connect(Connection::new("b", "out", "c", "in"));

    let document = parse(&workflow.to_string()).unwrap();
    assert_eq!(document.workflow("w"), Some(&workflow));
  }
}
