/// A preprocessed source line with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
  pub number: usize,
  pub text: &'a str,
}

impl<'a> Line<'a> {
  pub fn new(number: usize, text: &'a str) -> Self {
    Self { number, text }
  }

  pub fn is_blank(&self) -> bool {
    self.text.is_empty()
  }
}

impl AsRef<str> for Line<'_> {
  fn as_ref(&self) -> &str {
    self.text
  }
}

/// Split off the first whitespace-delimited token.
///
/// The split happens at the first run of whitespace only; the remainder keeps
/// its inner spacing. An empty or blank line yields `("", "")`.
pub fn next_token(line: &str) -> (&str, &str) {
  let line = line.trim_start();
  match line.find(char::is_whitespace) {
    Some(idx) => (&line[..idx], line[idx..].trim_start()),
    None => (line, ""),
  }
}

/// Drop everything from the first `#` to the end of the line.
pub fn strip_comment(line: &str) -> &str {
  match line.find('#') {
    Some(idx) => &line[..idx],
    None => line,
  }
}

/// Strip comments and surrounding whitespace from every line of `source`.
pub fn preprocess(source: &str) -> Vec<Line<'_>> {
  source
    .lines()
    .enumerate()
    .map(|(idx, line)| Line::new(idx + 1, strip_comment(line).trim()))
    .collect()
}
