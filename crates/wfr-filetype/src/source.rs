use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::FiletypeError;
use crate::filetype::Filetype;

/// One gathered artifact: a shared stem and its files.
///
/// Suffixed filetypes yield one path per set; bundles yield one path per
/// component, in component order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSet {
  pub stem: String,
  pub paths: Vec<PathBuf>,
}

/// A directory holding artifacts of one filetype.
#[derive(Debug, Clone)]
pub struct FileSource {
  pub dir: PathBuf,
  pub filetype: Filetype,
}

impl FileSource {
  pub fn new(dir: impl Into<PathBuf>, filetype: impl Into<Filetype>) -> Self {
    Self {
      dir: dir.into(),
      filetype: filetype.into(),
    }
  }

  /// Gather every matching artifact in the directory, sorted by stem.
  ///
  /// Bundles only yield complete sets.
  pub async fn gather(&self) -> Result<Vec<FileSet>, FiletypeError> {
    let files = list_files(&self.dir).await?;

    let mut sets: Vec<FileSet> = match &self.filetype {
      Filetype::Suffixed(t) => files
        .iter()
        .filter_map(|(name, path)| {
          t.matches(name).map(|stem| FileSet {
            stem: stem.to_string(),
            paths: vec![path.clone()],
          })
        })
        .collect(),
      Filetype::Bundle(b) => {
        let mut slots: BTreeMap<String, Vec<Option<PathBuf>>> = BTreeMap::new();
        for (name, path) in &files {
          if let Some((idx, stem)) = b.matches(name) {
            let slot = slots
              .entry(stem.to_string())
              .or_insert_with(|| vec![None; b.components.len()]);
            slot[idx].get_or_insert_with(|| path.clone());
          }
        }
        slots
          .into_iter()
          .filter_map(|(stem, slot)| {
            let paths: Option<Vec<PathBuf>> = slot.into_iter().collect();
            paths.map(|paths| FileSet { stem, paths })
          })
          .collect()
      }
    };
    sets.sort_by(|a, b| a.stem.cmp(&b.stem));

    Ok(sets)
  }
}

/// Regular files directly inside `dir`, as (file name, path), sorted by name.
async fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, FiletypeError> {
  let io_err = |source| FiletypeError::Io {
    path: dir.to_path_buf(),
    source,
  };

  let mut files = Vec::new();
  let mut entries = fs::read_dir(dir).await.map_err(io_err)?;
  while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
    let path = entry.path();
    if !entry.file_type().await.map_err(io_err)?.is_file() {
      continue;
    }
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
      files.push((name.to_string(), path.clone()));
    }
  }
  files.sort();
  Ok(files)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::filetype::{FiletypeBundle, SuffixedFiletype};

  fn touch(dir: &Path, names: &[&str]) {
    for name in names {
      std::fs::write(dir.join(name), b"").unwrap();
    }
  }

  fn stems(sets: &[FileSet]) -> Vec<&str> {
    sets.iter().map(|s| s.stem.as_str()).collect()
  }

  #[tokio::test]
  async fn test_gather_suffixed() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &["b.fa", "a.fasta", "notes.txt", "c.fna"]);
    std::fs::create_dir(dir.path().join("d.fasta")).unwrap();

    let fasta = SuffixedFiletype::new("fasta", ".fasta").with_alt_suffixes([".fna", ".fa"]);
    let sets = FileSource::new(dir.path(), fasta).gather().await.unwrap();

    assert_eq!(stems(&sets), vec!["a", "b", "c"]);
    assert_eq!(sets[0].paths, vec![dir.path().join("a.fasta")]);
  }

  #[tokio::test]
  async fn test_gather_bundle_keeps_complete_sets() {
    let dir = tempfile::tempdir().unwrap();
    touch(
      dir.path(),
      &["s2_R1.fastq", "s1_R2.fastq", "s1_R1.fastq", "s3_R1.fastq"],
    );

    let paired = FiletypeBundle::new(
      "paired-fastq",
      vec![
        SuffixedFiletype::new("r1", "_R1.fastq"),
        SuffixedFiletype::new("r2", "_R2.fastq"),
      ],
    );
    let sets = FileSource::new(dir.path(), paired).gather().await.unwrap();

    assert_eq!(
      sets,
      vec![FileSet {
        stem: "s1".to_string(),
        paths: vec![
          dir.path().join("s1_R1.fastq"),
          dir.path().join("s1_R2.fastq"),
        ],
      }]
    );
  }

  #[tokio::test]
  async fn test_gather_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let err = FileSource::new(&missing, SuffixedFiletype::new("csv", ".csv"))
      .gather()
      .await
      .unwrap_err();
    assert!(matches!(err, FiletypeError::Io { path, .. } if path == missing));
  }
}
