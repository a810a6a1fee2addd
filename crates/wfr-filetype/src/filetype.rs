use serde::{Deserialize, Serialize};

/// A filetype recognised by file name suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixedFiletype {
  pub name: String,
  pub suffix: String,
  #[serde(default)]
  pub alt_suffixes: Vec<String>,
}

impl SuffixedFiletype {
  pub fn new(name: impl Into<String>, suffix: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      suffix: suffix.into(),
      alt_suffixes: Vec::new(),
    }
  }

  pub fn with_alt_suffixes<S: Into<String>>(mut self, alt: impl IntoIterator<Item = S>) -> Self {
    self.alt_suffixes.extend(alt.into_iter().map(Into::into));
    self
  }

  /// The stem of `file_name` if it ends with the primary or an alternate
  /// suffix. A file that is nothing but the suffix does not match.
  pub fn matches<'a>(&self, file_name: &'a str) -> Option<&'a str> {
    std::iter::once(&self.suffix)
      .chain(&self.alt_suffixes)
      .filter_map(|suffix| file_name.strip_suffix(suffix.as_str()))
      .find(|stem| !stem.is_empty())
  }
}

/// Several suffixed filetypes that together form one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiletypeBundle {
  pub name: String,
  pub components: Vec<SuffixedFiletype>,
}

impl FiletypeBundle {
  pub fn new(name: impl Into<String>, components: Vec<SuffixedFiletype>) -> Self {
    Self {
      name: name.into(),
      components,
    }
  }

  /// Index of the first component matching `file_name`, with the stem.
  pub fn matches<'a>(&self, file_name: &'a str) -> Option<(usize, &'a str)> {
    self
      .components
      .iter()
      .enumerate()
      .find_map(|(idx, component)| component.matches(file_name).map(|stem| (idx, stem)))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filetype {
  Suffixed(SuffixedFiletype),
  Bundle(FiletypeBundle),
}

impl Filetype {
  pub fn name(&self) -> &str {
    match self {
      Filetype::Suffixed(t) => &t.name,
      Filetype::Bundle(b) => &b.name,
    }
  }
}

impl From<SuffixedFiletype> for Filetype {
  fn from(t: SuffixedFiletype) -> Self {
    Filetype::Suffixed(t)
  }
}

impl From<FiletypeBundle> for Filetype {
  fn from(b: FiletypeBundle) -> Self {
    Filetype::Bundle(b)
  }
}
