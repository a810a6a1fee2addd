//! wfr Workflow
//!
//! This crate provides the resolved workflow representation for wfr.
//! A resolved workflow is the port-level connection map between the active
//! steps of a workflow definition.
//!
//! Key differences from `wfr-config`:
//! - Steps are looked up and owned by the workflow
//! - Every declared input is either bound to a producer port or unresolved
//! - Graph views (`inputs`, `outputs`, `dag`, `order`, `edges`) are derived on
//!   demand from the single connection map and are never cached

mod error;
mod graph;
mod workflow;

pub use error::GraphError;
pub use graph::{Dag, topological_order};
pub use workflow::Workflow;
