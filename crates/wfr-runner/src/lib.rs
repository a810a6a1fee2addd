//! wfr Runner
//!
//! Executes a resolved workflow on the local machine.
//!
//! ```text
//! Workflow ──plan()──▶ [Job] ──LocalRunner::run()──▶ RunResult
//!              │
//!              ├─ order() decides the job sequence
//!              ├─ unresolved inputs are bound from `Sources`
//!              └─ outputs land in {work_dir}/{step}/{port}{suffix}
//! ```

mod error;
mod job;
mod runner;

pub use error::RunError;
pub use job::{Job, Sources, plan};
pub use runner::{JobResult, LocalRunner, RunResult, Runner};
