//! wfr Filetype
//!
//! Binds the opaque extension tags of step connectors to files on disk.
//!
//! A [`Filetype`] is either a single suffix (with optional alternates, e.g.
//! `.fasta` / `.fa`) or a bundle of suffixes that together form one artifact
//! (e.g. paired `_R1.fastq` / `_R2.fastq` reads). A [`FileSource`] gathers
//! every artifact of one filetype from a directory.

mod error;
mod filetype;
mod registry;
mod source;

pub use error::FiletypeError;
pub use filetype::{Filetype, FiletypeBundle, SuffixedFiletype};
pub use registry::FiletypeRegistry;
pub use source::{FileSet, FileSource};
