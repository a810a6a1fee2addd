//! Resolution events and notifiers for observability.
//!
//! Events are emitted while a workflow graph is being built so callers can
//! trace how each port was bound without the resolver printing anything.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use wfr_config::PortRef;

/// Events emitted during workflow resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveEvent {
  /// A step was added to the graph with all inputs unresolved.
  StepActivated { workflow: String, step: String },

  /// An input port was bound to a producer port.
  Connected {
    workflow: String,
    from: PortRef,
    to: PortRef,
  },

  /// A later connection replaced an earlier producer of the same input.
  InputRebound {
    workflow: String,
    input: PortRef,
    previous: PortRef,
    producer: PortRef,
  },

  /// Resolution stopped at a failing connection. Earlier events describe a
  /// graph that was discarded.
  Failed { workflow: String, error: String },

  /// Resolution finished.
  Resolved {
    workflow: String,
    steps: usize,
    unresolved_inputs: usize,
  },
}

/// Trait for receiving resolution events.
pub trait ResolveNotifier: Send + Sync {
  /// Called when a resolution event occurs.
  fn notify(&self, event: ResolveEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ResolveNotifier for NoopNotifier {
  fn notify(&self, _event: ResolveEvent) {}
}

/// A notifier that turns events into `tracing` records.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl ResolveNotifier for TracingNotifier {
  fn notify(&self, event: ResolveEvent) {
    match event {
      ResolveEvent::StepActivated { workflow, step } => {
        debug!(workflow = %workflow, step = %step, "step_activated");
      }
      ResolveEvent::Connected { workflow, from, to } => {
        debug!(workflow = %workflow, from = %from, to = %to, "connected");
      }
      ResolveEvent::InputRebound {
        workflow,
        input,
        previous,
        producer,
      } => {
        warn!(
          workflow = %workflow,
          input = %input,
          previous = %previous,
          producer = %producer,
          "input_rebound"
        );
      }
      ResolveEvent::Failed { workflow, error } => {
        warn!(workflow = %workflow, error = %error, "failed");
      }
      ResolveEvent::Resolved {
        workflow,
        steps,
        unresolved_inputs,
      } => {
        debug!(workflow = %workflow, steps, unresolved_inputs, "resolved");
      }
    }
  }
}

/// A notifier that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<ResolveEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ResolveEvent>) -> Self {
    Self { sender }
  }
}

impl ResolveNotifier for ChannelNotifier {
  fn notify(&self, event: ResolveEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
