//! Local process execution.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;
use wfr_config::PortRef;
use wfr_filetype::FiletypeRegistry;
use wfr_workflow::Workflow;

use crate::error::RunError;
use crate::job::{Job, Sources, plan};

/// Outcome of a single job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
  pub job: Job,
  /// Process exit code, `None` when terminated by a signal.
  pub exit_code: Option<i32>,
}

/// Outcome of a complete workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
  pub run_id: String,
  pub jobs: Vec<JobResult>,
  /// Files produced at the workflow's unconsumed outputs.
  #[serde(with = "indexmap::map::serde_seq")]
  pub outputs: IndexMap<PortRef, PathBuf>,
}

/// Executes a resolved workflow.
#[async_trait]
pub trait Runner: Send + Sync {
  async fn run(
    &self,
    workflow: &Workflow,
    sources: &Sources,
    cancel: CancellationToken,
  ) -> Result<RunResult, RunError>;
}

/// Runs each job as a child process, one at a time, in workflow order.
pub struct LocalRunner {
  work_dir: PathBuf,
  filetypes: FiletypeRegistry,
}

impl LocalRunner {
  pub fn new(work_dir: impl Into<PathBuf>) -> Self {
    Self::with_filetypes(work_dir, FiletypeRegistry::new())
  }

  /// Create a runner that names outputs after the given filetypes.
  pub fn with_filetypes(work_dir: impl Into<PathBuf>, filetypes: FiletypeRegistry) -> Self {
    Self {
      work_dir: work_dir.into(),
      filetypes,
    }
  }

  pub fn work_dir(&self) -> &Path {
    &self.work_dir
  }

  #[instrument(
    name = "job_execute",
    skip_all,
    fields(run_id = %run_id, step = %job.step, program = %job.program)
  )]
  async fn execute(
    &self,
    run_id: &str,
    job: &Job,
    cancel: &CancellationToken,
  ) -> Result<ExitStatus, RunError> {
    if cancel.is_cancelled() {
      return Err(RunError::Cancelled);
    }

    for path in job.outputs.values() {
      if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
          .await
          .map_err(|source| RunError::Io {
            step: job.step.clone(),
            source,
          })?;
      }
    }

    info!(argv = ?job.argv, "job started");

    let child = Command::new(&job.program)
      .args(&job.argv)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()
      .map_err(|source| RunError::Spawn {
        step: job.step.clone(),
        program: job.program.clone(),
        source,
      })?;

    // Dropping the wait future on cancel kills the child.
    let output = tokio::select! {
      _ = cancel.cancelled() => {
        info!("job cancelled");
        return Err(RunError::Cancelled);
      }
      output = child.wait_with_output() => output.map_err(|source| RunError::Io {
        step: job.step.clone(),
        source,
      })?,
    };

    if !output.stdout.is_empty() {
      debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim_end(), "job stdout");
    }

    if !output.status.success() {
      let err = RunError::JobFailed {
        step: job.step.clone(),
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      };
      error!(error = %err, "job failed");
      return Err(err);
    }

    info!(status = %output.status, "job completed");
    Ok(output.status)
  }
}

#[async_trait]
impl Runner for LocalRunner {
  #[instrument(
    name = "workflow_run",
    skip_all,
    fields(workflow = %workflow.name)
  )]
  async fn run(
    &self,
    workflow: &Workflow,
    sources: &Sources,
    cancel: CancellationToken,
  ) -> Result<RunResult, RunError> {
    let run_id = Uuid::new_v4().to_string();
    let jobs = plan(workflow, sources, &self.work_dir, &self.filetypes)?;

    info!(run_id = %run_id, jobs = jobs.len(), "run started");

    let mut results = Vec::with_capacity(jobs.len());
    for job in jobs {
      let status = self.execute(&run_id, &job, &cancel).await?;
      results.push(JobResult {
        job,
        exit_code: status.code(),
      });
    }

    let mut outputs = IndexMap::new();
    for port in workflow.outputs() {
      let path = results
        .iter()
        .find(|r| r.job.step == port.step)
        .and_then(|r| r.job.outputs.get(&port.port));
      if let Some(path) = path {
        outputs.insert(port.clone(), path.clone());
      }
    }

    info!(run_id = %run_id, outputs = outputs.len(), "run completed");

    Ok(RunResult {
      run_id,
      jobs: results,
      outputs,
    })
  }
}
