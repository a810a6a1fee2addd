use indexmap::IndexMap;

use crate::error::FiletypeError;
use crate::filetype::Filetype;

/// Filetypes by name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct FiletypeRegistry {
  types: IndexMap<String, Filetype>,
}

impl FiletypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, filetype: impl Into<Filetype>) -> Result<(), FiletypeError> {
    let filetype = filetype.into();
    let name = filetype.name().to_string();
    if self.types.contains_key(&name) {
      return Err(FiletypeError::AlreadyRegistered { name });
    }
    self.types.insert(name, filetype);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Filetype> {
    self.types.get(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.types.keys().map(String::as_str)
  }

  /// File name suffix for an artifact tagged `tag`.
  ///
  /// A registered suffixed filetype supplies its primary suffix; any other
  /// tag is used as a plain extension.
  pub fn output_suffix(&self, tag: &str) -> String {
    match self.types.get(tag) {
      Some(Filetype::Suffixed(t)) => t.suffix.clone(),
      _ if tag.starts_with('.') => tag.to_string(),
      _ => format!(".{tag}"),
    }
  }
}
