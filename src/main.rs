use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wfr_config::PortRef;
use wfr_filetype::{FileSource, SuffixedFiletype};
use wfr_registry::{DEFAULT_MAX_BYTES, FsStepRegistry, StepRegistry};
use wfr_resolver::{Resolver, ResolverConfig, StandardResolver, TracingNotifier};
use wfr_runner::{LocalRunner, Runner, Sources};
use wfr_workflow::Workflow;

/// wfr - parse step/workflow definitions and run them as a dependency graph
#[derive(Parser)]
#[command(name = "wfr")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Directory for step outputs (default: ~/.wfr/work)
  #[arg(long, global = true)]
  work_dir: Option<PathBuf>,

  /// Largest definition file accepted, in bytes
  #[arg(long, global = true, default_value_t = DEFAULT_MAX_BYTES)]
  max_bytes: u64,

  /// Log debug output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Parse definition files and resolve their workflows
  Check {
    /// Definition files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Only resolve this workflow
    #[arg(long)]
    workflow: Option<String>,

    /// Print resolved workflows as JSON
    #[arg(long)]
    json: bool,

    /// Reject connections to undeclared ports
    #[arg(long)]
    strict: bool,
  },

  /// Resolve a workflow and execute its steps locally
  Run {
    /// Definition files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Workflow to run
    #[arg(long)]
    workflow: String,

    /// Source file for an unresolved input, as STEP.PORT=PATH
    #[arg(long = "input", value_parser = parse_binding)]
    inputs: Vec<(PortRef, PathBuf)>,

    /// Reject connections to undeclared ports
    #[arg(long)]
    strict: bool,
  },

  /// List the files in a directory that match a suffix
  Gather {
    dir: PathBuf,

    /// Primary suffix, e.g. `.fasta`
    #[arg(long)]
    suffix: String,

    /// Alternate suffixes
    #[arg(long = "alt")]
    alt: Vec<String>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let work_dir = match cli.work_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".wfr")
      .join("work"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  match cli.command {
    Some(Commands::Check {
      files,
      workflow,
      json,
      strict,
    }) => rt.block_on(check(&files, workflow.as_deref(), json, strict, cli.max_bytes)),
    Some(Commands::Run {
      files,
      workflow,
      inputs,
      strict,
    }) => rt.block_on(run(
      &files,
      &workflow,
      inputs.into_iter().collect(),
      strict,
      cli.max_bytes,
      work_dir,
    )),
    Some(Commands::Gather { dir, suffix, alt }) => rt.block_on(gather(dir, suffix, alt)),
    None => {
      println!("wfr - use --help to see available commands");
      Ok(())
    }
  }
}

async fn load(files: &[PathBuf], max_bytes: u64) -> Result<FsStepRegistry> {
  FsStepRegistry::from_files(files, max_bytes)
    .await
    .context("failed to load definitions")
}

fn resolve(registry: &FsStepRegistry, name: &str, strict: bool) -> Result<Workflow> {
  let def = registry
    .workflow(name)
    .with_context(|| format!("workflow '{name}' is not defined"))?;

  StandardResolver::with_notifier(registry, TracingNotifier)
    .config(ResolverConfig {
      strict_ports: strict,
    })
    .resolve(def)
    .with_context(|| format!("failed to resolve workflow '{name}'"))
}

async fn check(
  files: &[PathBuf],
  only: Option<&str>,
  json: bool,
  strict: bool,
  max_bytes: u64,
) -> Result<()> {
  let registry = load(files, max_bytes).await?;

  let names: Vec<String> = match only {
    Some(name) => vec![name.to_string()],
    None => registry.workflows().iter().map(|w| w.name.clone()).collect(),
  };

  let mut resolved = Vec::with_capacity(names.len());
  for name in &names {
    let workflow = resolve(&registry, name, strict)?;
    let order = execution_order(&workflow)?;
    resolved.push((workflow, order));
  }

  if json {
    let workflows: Vec<&Workflow> = resolved.iter().map(|(w, _)| w).collect();
    println!("{}", serde_json::to_string_pretty(&workflows)?);
    return Ok(());
  }

  for (workflow, order) in &resolved {
    print_summary(workflow, order);
  }
  eprintln!(
    "{} step(s), {} workflow(s) ok",
    registry.names().len(),
    resolved.len()
  );

  Ok(())
}

/// Execution order of a resolved workflow; fails on a cycle.
fn execution_order(workflow: &Workflow) -> Result<Vec<String>> {
  workflow
    .order()
    .with_context(|| format!("workflow '{}' cannot be ordered", workflow.name))
}

fn print_summary(workflow: &Workflow, order: &[String]) {
  let join = |ports: Vec<PortRef>| {
    ports
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(", ")
  };

  println!("workflow {}", workflow.name);
  println!("  order:   {}", order.join(", "));
  println!("  inputs:  {}", join(workflow.inputs()));
  println!("  outputs: {}", join(workflow.outputs()));
  for (from, to) in workflow.edges() {
    println!("  edge:    {from} -> {to}");
  }
}

async fn run(
  files: &[PathBuf],
  name: &str,
  sources: Sources,
  strict: bool,
  max_bytes: u64,
  work_dir: PathBuf,
) -> Result<()> {
  let registry = load(files, max_bytes).await?;
  let workflow = resolve(&registry, name, strict)?;

  let cancel = CancellationToken::new();
  let on_signal = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      on_signal.cancel();
    }
  });

  let runner = LocalRunner::new(&work_dir);
  let result = runner
    .run(&workflow, &sources, cancel)
    .await
    .with_context(|| format!("workflow '{name}' failed"))?;

  eprintln!("Run completed: {}", result.run_id);
  eprintln!("Steps executed: {}", result.jobs.len());
  for (port, path) in &result.outputs {
    println!("{port}\t{}", path.display());
  }

  Ok(())
}

async fn gather(dir: PathBuf, suffix: String, alt: Vec<String>) -> Result<()> {
  let filetype = SuffixedFiletype::new(suffix.clone(), suffix).with_alt_suffixes(alt);
  let sets = FileSource::new(&dir, filetype)
    .gather()
    .await
    .with_context(|| format!("failed to read {}", dir.display()))?;

  for set in sets {
    let paths: Vec<String> = set.paths.iter().map(|p| p.display().to_string()).collect();
    println!("{}\t{}", set.stem, paths.join("\t"));
  }

  Ok(())
}

/// Parse `STEP.PORT=PATH`.
fn parse_binding(raw: &str) -> Result<(PortRef, PathBuf)> {
  let Some((port, path)) = raw.split_once('=') else {
    bail!("expected STEP.PORT=PATH, got '{raw}'");
  };
  let Some((step, port)) = port.split_once('.') else {
    bail!("expected STEP.PORT before '=', got '{port}'");
  };
  if step.is_empty() || port.is_empty() || path.is_empty() {
    bail!("expected STEP.PORT=PATH, got '{raw}'");
  }

  Ok((PortRef::new(step, port), Path::new(path).to_path_buf()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_binding() {
    let (port, path) = parse_binding("copy_1.source=data/in.toml").unwrap();
    assert_eq!(port, PortRef::new("copy_1", "source"));
    assert_eq!(path, PathBuf::from("data/in.toml"));

    assert!(parse_binding("copy_1.source").is_err());
    assert!(parse_binding("copy_1=in.toml").is_err());
    assert!(parse_binding(".source=in.toml").is_err());
  }

  #[test]
  fn test_cli_parses_run() {
    let cli = Cli::try_parse_from([
      "wfr",
      "run",
      "steps.wfr",
      "--workflow",
      "double_copy",
      "--input",
      "copy_1.source=a.toml",
    ])
    .unwrap();

    match cli.command {
      Some(Commands::Run {
        workflow, inputs, ..
      }) => {
        assert_eq!(workflow, "double_copy");
        assert_eq!(inputs.len(), 1);
      }
      _ => panic!("expected run"),
    }
  }

  const LOOP: &str = "
step a
  cp
  { input i txt }
  { output o txt }

step b
  cp
  { input i txt }
  { output o txt }

workflow loop
  a o -> b i
  b o -> a i
";

  #[tokio::test]
  async fn test_check_rejects_cycle_in_every_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop.wfr");
    tokio::fs::write(&path, LOOP).await.unwrap();
    let files = [path];

    for json in [true, false] {
      let err = check(&files, None, json, false, DEFAULT_MAX_BYTES)
        .await
        .unwrap_err();
      assert_eq!(err.to_string(), "workflow 'loop' cannot be ordered");
      assert!(format!("{err:#}").contains("cycle detected"));
    }
  }
}
