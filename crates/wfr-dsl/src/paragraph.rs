/// Group lines into blank-line separated paragraphs.
///
/// Runs of blank lines collapse into one separator and no empty paragraph is
/// ever produced. A final paragraph without a trailing blank line is kept.
pub fn split_paragraphs<L: AsRef<str>>(lines: impl IntoIterator<Item = L>) -> Vec<Vec<L>> {
  let mut paragraphs = Vec::new();
  let mut current = Vec::new();

  for line in lines {
    if !line.as_ref().is_empty() {
      current.push(line);
    } else if !current.is_empty() {
      paragraphs.push(std::mem::take(&mut current));
    }
  }
  if !current.is_empty() {
    paragraphs.push(current);
  }

  paragraphs
}
