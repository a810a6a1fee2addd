//! wfr Config
//!
//! This crate contains the definition types for wfr: the values produced by
//! the DSL parser before any workflow is resolved against a step registry.
//!
//! - [`Step`] describes one external program invocation and its arguments.
//! - [`Connector`] is a typed port on a step, either an input or an output.
//! - [`WorkflowDef`] is an unresolved list of port-to-port connections.
//!
//! Every type implements `Display` as DSL text, so a parsed definition can be
//! written back out and parsed again to an equal value.

mod argument;
mod connector;
mod document;
mod step;
mod workflow;

pub use argument::{Argument, Value};
pub use connector::{Connector, Direction};
pub use document::{Definition, Document};
pub use step::Step;
pub use workflow::{Connection, PortRef, WorkflowDef};
