use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use wfr_config::{Argument, Direction, PortRef, Step, Value};
use wfr_filetype::FiletypeRegistry;
use wfr_workflow::Workflow;

use crate::error::RunError;

/// Concrete files bound to a workflow's unresolved inputs.
pub type Sources = IndexMap<PortRef, PathBuf>;

/// One step with every connector bound to a concrete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
  pub step: String,
  pub program: String,
  /// Arguments after the program, connectors replaced by paths.
  pub argv: Vec<OsString>,
  pub inputs: IndexMap<String, PathBuf>,
  pub outputs: IndexMap<String, PathBuf>,
}

/// Bind every step of `workflow` to files, in execution order.
///
/// Outputs are placed at `{work_dir}/{step}/{port}{suffix}`, the suffix coming
/// from `filetypes`. Inputs read either their producer's output path or the
/// file bound in `sources`.
pub fn plan(
  workflow: &Workflow,
  sources: &Sources,
  work_dir: &Path,
  filetypes: &FiletypeRegistry,
) -> Result<Vec<Job>, RunError> {
  let mut produced: HashMap<PortRef, PathBuf> = HashMap::new();
  let mut jobs = Vec::new();

  for name in workflow.order()? {
    let Some(step) = workflow.step(&name) else {
      continue;
    };

    let mut outputs = IndexMap::new();
    for output in step.outputs() {
      let file_name = format!("{}{}", output.name, filetypes.output_suffix(&output.ext));
      let path = work_dir.join(&step.name).join(file_name);
      produced.insert(PortRef::new(&step.name, &output.name), path.clone());
      outputs.insert(output.name.clone(), path);
    }

    let mut inputs = IndexMap::new();
    for input in step.inputs() {
      let port = PortRef::new(&step.name, &input.name);
      let path = match workflow.producer(&port) {
        Some(producer) => produced
          .get(producer)
          .cloned()
          .ok_or_else(|| RunError::UndeclaredOutput {
            port: producer.clone(),
          })?,
        None => sources
          .get(&port)
          .cloned()
          .ok_or(RunError::MissingSource { port })?,
      };
      inputs.insert(input.name.clone(), path);
    }

    let argv = render_args(step, &inputs, &outputs);
    jobs.push(Job {
      step: step.name.clone(),
      program: step.program.clone(),
      argv,
      inputs,
      outputs,
    });
  }

  Ok(jobs)
}

fn render_args(
  step: &Step,
  inputs: &IndexMap<String, PathBuf>,
  outputs: &IndexMap<String, PathBuf>,
) -> Vec<OsString> {
  let render = |value: &Value| match value {
    Value::Token(token) => OsString::from(token),
    Value::Connector(connector) => {
      let bound = match connector.direction {
        Direction::Input => inputs.get(&connector.name),
        Direction::Output => outputs.get(&connector.name),
      };
      bound
        .map(|path| path.as_os_str().to_os_string())
        .unwrap_or_default()
    }
  };

  let mut argv = Vec::new();
  for arg in &step.args {
    match arg {
      Argument::Positional { value } => argv.push(render(value)),
      Argument::Optional { flag, values } => {
        argv.push(OsString::from(flag));
        argv.extend(values.iter().map(render));
      }
    }
  }
  argv
}

#[cfg(test)]
mod tests {
  use super::*;
  use wfr_config::Connector;
  use wfr_filetype::SuffixedFiletype;

  fn copy_step(name: &str, from_ext: &str, to_ext: &str) -> Step {
    Step::new(name, "cp")
      .arg(Argument::positional(Connector::input("source", from_ext)))
      .arg(Argument::positional(Connector::output("dest", to_ext)))
  }

  fn argv(args: &[&str]) -> Vec<OsString> {
    args.iter().map(|&arg| OsString::from(arg)).collect()
  }

  fn copy_chain() -> Workflow {
    let mut w = Workflow::new("double_copy");
    w.activate(&copy_step("copy_1", "toml", "txt"));
    w.activate(&copy_step("copy_2", "txt", "config"));
    w.connect(
      PortRef::new("copy_1", "dest"),
      PortRef::new("copy_2", "source"),
    )
    .unwrap();
    w
  }

  #[test]
  fn test_plan_binds_sources_and_upstream_outputs() {
    let work = Path::new("/work");
    let sources = Sources::from([(
      PortRef::new("copy_1", "source"),
      PathBuf::from("/data/pyproject.toml"),
    )]);

    let jobs = plan(&copy_chain(), &sources, work, &FiletypeRegistry::new()).unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].step, "copy_1");
    assert_eq!(
      jobs[0].argv,
      argv(&["/data/pyproject.toml", "/work/copy_1/dest.txt"])
    );
    assert_eq!(jobs[1].step, "copy_2");
    assert_eq!(
      jobs[1].argv,
      argv(&["/work/copy_1/dest.txt", "/work/copy_2/dest.config"])
    );
    assert_eq!(jobs[1].inputs["source"], PathBuf::from("/work/copy_1/dest.txt"));
  }

  #[test]
  fn test_plan_requires_sources() {
    let err = plan(
      &copy_chain(),
      &Sources::new(),
      Path::new("/work"),
      &FiletypeRegistry::new(),
    )
    .unwrap_err();

    assert!(matches!(
      err,
      RunError::MissingSource { port } if port == PortRef::new("copy_1", "source")
    ));
  }

  #[test]
  fn test_plan_renders_optional_arguments_with_filetype_suffix() {
    let blast = Step::new("blastn_genes", "blastn")
      .arg(Argument::optional(
        "-query",
        vec![Connector::input("seqs", "fasta").into()],
      ))
      .arg(Argument::optional("-evalue", vec![Value::token("1e-5")]))
      .arg(Argument::optional(
        "-out",
        vec![Connector::output("hits", "tsv").into()],
      ))
      .arg(Argument::optional("-html", vec![]));
    let mut w = Workflow::new("w");
    w.activate(&blast);

    let mut filetypes = FiletypeRegistry::new();
    filetypes
      .register(SuffixedFiletype::new("tsv", ".blast.tsv"))
      .unwrap();
    let sources = Sources::from([(
      PortRef::new("blastn_genes", "seqs"),
      PathBuf::from("genes.fa"),
    )]);

    let jobs = plan(&w, &sources, Path::new("out"), &filetypes).unwrap();

    assert_eq!(
      jobs[0].argv,
      argv(&[
        "-query",
        "genes.fa",
        "-evalue",
        "1e-5",
        "-out",
        "out/blastn_genes/hits.blast.tsv",
        "-html",
      ])
    );
  }

  #[test]
  fn test_plan_rejects_undeclared_producer_port() {
    let mut w = Workflow::new("w");
    w.activate(&copy_step("a", "x", "y"));
    w.activate(&copy_step("b", "y", "z"));
    w.connect(PortRef::new("a", "missing"), PortRef::new("b", "source"))
      .unwrap();
    let sources = Sources::from([(PortRef::new("a", "source"), PathBuf::from("in.x"))]);

    let err = plan(&w, &sources, Path::new("/w"), &FiletypeRegistry::new()).unwrap_err();
    assert!(matches!(err, RunError::UndeclaredOutput { .. }));
  }

  #[test]
  fn test_plan_fails_on_cycle() {
    let mut w = copy_chain();
    w.connect(
      PortRef::new("copy_2", "dest"),
      PortRef::new("copy_1", "source"),
    )
    .unwrap();

    let err = plan(&w, &Sources::new(), Path::new("/w"), &FiletypeRegistry::new()).unwrap_err();
    assert!(matches!(err, RunError::Graph(_)));
  }

  #[cfg(unix)]
  #[test]
  fn test_plan_passes_non_utf8_paths_through() {
    use std::os::unix::ffi::OsStrExt;

    let raw = std::ffi::OsStr::from_bytes(b"/data/in\xff.toml");
    let sources = Sources::from([(PortRef::new("copy_1", "source"), PathBuf::from(raw))]);

    let jobs = plan(&copy_chain(), &sources, Path::new("/work"), &FiletypeRegistry::new()).unwrap();

    assert_eq!(jobs[0].argv[0], raw.to_os_string());
  }
}
