use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};

use crate::error::GraphError;

/// Adjacency map from each step to the steps it depends on.
///
/// Iteration order is step activation order, which [`topological_order`]
/// uses to break ties.
pub type Dag = IndexMap<String, IndexSet<String>>;

/// Linearize `dag` so every step follows all of its dependencies.
///
/// Among the steps that are ready at any point, the one that comes first in
/// `dag` is emitted first. Dependencies that are not keys of `dag` are
/// ignored.
pub fn topological_order(dag: &Dag) -> Result<Vec<String>, GraphError> {
  let mut pending: Vec<usize> = vec![0; dag.len()];
  let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); dag.len()];

  for (idx, deps) in dag.values().enumerate() {
    for dep in deps {
      if let Some(dep_idx) = dag.get_index_of(dep) {
        dependents[dep_idx].push(idx);
        pending[idx] += 1;
      }
    }
  }

  let mut ready: BTreeSet<usize> = (0..dag.len()).filter(|&idx| pending[idx] == 0).collect();
  let mut order = Vec::with_capacity(dag.len());

  while let Some(idx) = ready.pop_first() {
    order.push(idx);
    for &dependent in &dependents[idx] {
      pending[dependent] -= 1;
      if pending[dependent] == 0 {
        ready.insert(dependent);
      }
    }
  }

  if order.len() < dag.len() {
    return Err(GraphError::Cycle {
      steps: find_cycle(dag, &pending),
    });
  }

  Ok(
    order
      .into_iter()
      .filter_map(|idx| dag.get_index(idx).map(|(name, _)| name.clone()))
      .collect(),
  )
}

/// Walk dependency edges among the steps that were never emitted until a
/// step repeats.
///
/// Every unemitted step still waits on another unemitted step, so the walk
/// always closes a cycle.
fn find_cycle(dag: &Dag, pending: &[usize]) -> Vec<String> {
  let stuck = |idx: usize| pending[idx] > 0;

  let Some(start) = (0..dag.len()).find(|&idx| stuck(idx)) else {
    return Vec::new();
  };

  let mut path: Vec<usize> = Vec::new();
  let mut current = start;
  loop {
    if let Some(pos) = path.iter().position(|&idx| idx == current) {
      path.drain(..pos);
      break;
    }
    path.push(current);

    let next = dag[current]
      .iter()
      .filter_map(|dep| dag.get_index_of(dep))
      .find(|&idx| stuck(idx));
    match next {
      Some(idx) => current = idx,
      None => break,
    }
  }

  // The walk follows consumer -> producer; report producer -> consumer
  // starting from the earliest activated step.
  path.reverse();
  if let Some(min_pos) = path
    .iter()
    .enumerate()
    .min_by_key(|(_, idx)| **idx)
    .map(|(pos, _)| pos)
  {
    path.rotate_left(min_pos);
  }

  path
    .into_iter()
    .map(|idx| dag.get_index(idx).map(|(name, _)| name.clone()).unwrap_or_default())
    .collect()
}
