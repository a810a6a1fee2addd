use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::trace;
use wfr_config::{PortRef, Step};

use crate::error::GraphError;
use crate::graph::{Dag, topological_order};

/// A resolved workflow graph.
///
/// The only authoritative state is `connections_in`, the reverse edge map
/// from each consumer input port to its producer port (`None` while the input
/// is unresolved). Everything else is derived per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
  pub name: String,
  /// Active steps in activation order.
  steps: IndexMap<String, Step>,
  #[serde(with = "indexmap::map::serde_seq")]
  connections_in: IndexMap<PortRef, Option<PortRef>>,
}

impl Workflow {
  /// Create an empty workflow with no active steps.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      steps: IndexMap::new(),
      connections_in: IndexMap::new(),
    }
  }

  /// Add `step` to the graph and seed each of its inputs as unresolved.
  ///
  /// Returns `false` without touching the graph if a step with the same name
  /// is already active.
  pub fn activate(&mut self, step: &Step) -> bool {
    if self.steps.contains_key(&step.name) {
      return false;
    }
    for input in step.inputs() {
      self
        .connections_in
        .insert(PortRef::new(&step.name, &input.name), None);
    }
    self.steps.insert(step.name.clone(), step.clone());
    true
  }

  /// Bind the input port `to` to the producer port `from`.
  ///
  /// Both steps must already be active. A previous binding of `to` is
  /// replaced and returned.
  pub fn connect(&mut self, from: PortRef, to: PortRef) -> Result<Option<PortRef>, GraphError> {
    for step in [&from.step, &to.step] {
      if !self.steps.contains_key(step) {
        return Err(GraphError::StepNotActive { step: step.clone() });
      }
    }
    Ok(self.connections_in.insert(to, Some(from)).flatten())
  }

  pub fn is_active(&self, step: &str) -> bool {
    self.steps.contains_key(step)
  }

  /// Get an active step by name.
  pub fn step(&self, name: &str) -> Option<&Step> {
    self.steps.get(name)
  }

  /// Active steps in activation order.
  pub fn steps(&self) -> impl Iterator<Item = &Step> {
    self.steps.values()
  }

  /// The reverse edge map: consumer input port to producer port.
  pub fn connections_in(&self) -> &IndexMap<PortRef, Option<PortRef>> {
    &self.connections_in
  }

  /// The producer bound to an input port, if it is resolved.
  pub fn producer(&self, input: &PortRef) -> Option<&PortRef> {
    self.connections_in.get(input).and_then(Option::as_ref)
  }

  /// Input ports with no producer: the workflow's external inputs.
  pub fn inputs(&self) -> Vec<PortRef> {
    self
      .connections_in
      .iter()
      .filter(|(_, producer)| producer.is_none())
      .map(|(input, _)| input.clone())
      .collect()
  }

  /// Fan-out lists: each producer port mapped to the inputs it feeds.
  ///
  /// Every declared output of every active step appears, fed or not.
  pub fn connections_out(&self) -> IndexMap<PortRef, Vec<PortRef>> {
    let mut out: IndexMap<PortRef, Vec<PortRef>> = IndexMap::new();
    for step in self.steps.values() {
      for output in step.outputs() {
        out.insert(PortRef::new(&step.name, &output.name), Vec::new());
      }
    }
    for (input, producer) in &self.connections_in {
      if let Some(producer) = producer {
        out.entry(producer.clone()).or_default().push(input.clone());
      }
    }
    out
  }

  /// Producer ports nothing consumes: the workflow's terminal artifacts.
  pub fn outputs(&self) -> Vec<PortRef> {
    self
      .connections_out()
      .into_iter()
      .filter(|(_, consumers)| consumers.is_empty())
      .map(|(output, _)| output)
      .collect()
  }

  /// Each active step mapped to the set of steps it depends on.
  pub fn dag(&self) -> Dag {
    let mut dag: Dag = self
      .steps
      .keys()
      .map(|name| (name.clone(), IndexSet::new()))
      .collect();

    for (input, producer) in &self.connections_in {
      if let Some(producer) = producer {
        trace!(consumer = %input, producer = %producer, "dag edge");
        dag
          .entry(input.step.clone())
          .or_default()
          .insert(producer.step.clone());
      }
    }
    dag
  }

  /// Steps in execution order, ties broken by activation order.
  pub fn order(&self) -> Result<Vec<String>, GraphError> {
    topological_order(&self.dag())
  }

  /// One `(producer_step, consumer_step)` pair per resolved connection.
  pub fn edges(&self) -> Vec<(String, String)> {
    self
      .connections_in
      .iter()
      .filter_map(|(input, producer)| {
        producer
          .as_ref()
          .map(|producer| (producer.step.clone(), input.step.clone()))
      })
      .collect()
  }
}
