use tracing::{info, instrument};
use wfr_config::{Connection, Direction, PortRef, WorkflowDef};
use wfr_registry::StepRegistry;
use wfr_workflow::Workflow;

use crate::error::ResolveError;
use crate::events::{NoopNotifier, ResolveEvent, ResolveNotifier};

/// Resolution options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverConfig {
  /// Reject connections whose ports are not declared on their steps.
  pub strict_ports: bool,
}

/// Resolver transforms a WorkflowDef into a Workflow graph.
pub trait Resolver {
  /// Resolve a workflow definition.
  ///
  /// Connections are applied in document order:
  /// 1. Both endpoint steps are activated (looked up in the registry)
  /// 2. The target input is bound to the source output, replacing any
  ///    earlier binding of the same input
  ///
  /// The graph is only returned if every connection applies.
  fn resolve(&self, def: &WorkflowDef) -> Result<Workflow, ResolveError>;
}

/// Standard resolver implementation backed by a step registry.
pub struct StandardResolver<R: StepRegistry, N: ResolveNotifier = NoopNotifier> {
  registry: R,
  config: ResolverConfig,
  notifier: N,
}

impl<R: StepRegistry> StandardResolver<R, NoopNotifier> {
  /// Create a new resolver with the given registry and no-op notifications.
  pub fn new(registry: R) -> Self {
    Self::with_notifier(registry, NoopNotifier)
  }
}

impl<R: StepRegistry, N: ResolveNotifier> StandardResolver<R, N> {
  /// Create a new resolver with a custom notifier.
  pub fn with_notifier(registry: R, notifier: N) -> Self {
    Self {
      registry,
      config: ResolverConfig::default(),
      notifier,
    }
  }

  pub fn config(mut self, config: ResolverConfig) -> Self {
    self.config = config;
    self
  }

  pub fn registry(&self) -> &R {
    &self.registry
  }

  /// Activate a step, looking it up in the registry.
  fn activate(
    &self,
    workflow: &mut Workflow,
    step_name: &str,
    connection: &Connection,
  ) -> Result<(), ResolveError> {
    if workflow.is_active(step_name) {
      return Ok(());
    }

    let step = self
      .registry
      .get(step_name)
      .ok_or_else(|| ResolveError::StepNotFound {
        step: step_name.to_string(),
        connection: connection.clone(),
      })?;

    if workflow.activate(step) {
      self.notifier.notify(ResolveEvent::StepActivated {
        workflow: workflow.name.clone(),
        step: step.name.clone(),
      });
    }
    Ok(())
  }

  /// Check that both ports of `connection` are declared with the right direction.
  fn validate_ports(
    &self,
    workflow: &Workflow,
    connection: &Connection,
  ) -> Result<(), ResolveError> {
    let declared = |port: &PortRef, direction: Direction| {
      workflow.step(&port.step).is_some_and(|step| match direction {
        Direction::Input => step.input(&port.port).is_some(),
        Direction::Output => step.output(&port.port).is_some(),
      })
    };

    for (port, direction) in [
      (&connection.from, Direction::Output),
      (&connection.to, Direction::Input),
    ] {
      if !declared(port, direction) {
        return Err(ResolveError::UnknownPort {
          port: port.clone(),
          direction,
          connection: connection.clone(),
        });
      }
    }
    Ok(())
  }

  fn apply(&self, workflow: &mut Workflow, connection: &Connection) -> Result<(), ResolveError> {
    self.activate(workflow, &connection.from.step, connection)?;
    self.activate(workflow, &connection.to.step, connection)?;

    if self.config.strict_ports {
      self.validate_ports(workflow, connection)?;
    }

    let previous = workflow.connect(connection.from.clone(), connection.to.clone())?;
    if let Some(previous) = previous {
      self.notifier.notify(ResolveEvent::InputRebound {
        workflow: workflow.name.clone(),
        input: connection.to.clone(),
        previous,
        producer: connection.from.clone(),
      });
    }
    self.notifier.notify(ResolveEvent::Connected {
      workflow: workflow.name.clone(),
      from: connection.from.clone(),
      to: connection.to.clone(),
    });
    Ok(())
  }
}

impl<R: StepRegistry, N: ResolveNotifier> Resolver for StandardResolver<R, N> {
  #[instrument(
    name = "resolve_workflow",
    skip(self, def),
    fields(workflow = %def.name, connections = def.connections.len())
  )]
  fn resolve(&self, def: &WorkflowDef) -> Result<Workflow, ResolveError> {
    let mut workflow = Workflow::new(&def.name);
    for connection in &def.connections {
      if let Err(err) = self.apply(&mut workflow, connection) {
        self.notifier.notify(ResolveEvent::Failed {
          workflow: workflow.name.clone(),
          error: err.to_string(),
        });
        return Err(err);
      }
    }

    let steps = workflow.steps().count();
    let unresolved_inputs = workflow.inputs().len();
    info!(steps, unresolved_inputs, "workflow resolved");
    self.notifier.notify(ResolveEvent::Resolved {
      workflow: workflow.name.clone(),
      steps,
      unresolved_inputs,
    });

    Ok(workflow)
  }
}
