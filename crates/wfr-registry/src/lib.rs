mod error;
mod fs_registry;
mod registry;

pub use error::RegistryError;
pub use fs_registry::{DEFAULT_MAX_BYTES, FsStepRegistry, load_document};
pub use registry::{MemoryStepRegistry, StepRegistry};
