// Sequential workflow runner with an explicit dependency chain

mod steps;

pub use steps::{board_lifecycle, pick_card_key};

use crate::client::TrelloClient;
use crate::config::ConfigStore;
use crate::error::{TrelloError, TrelloResult};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use tracing::{error, info};

/// Future returned by a step operation.
pub type StepFuture<'a> = Pin<Box<dyn Future<Output = TrelloResult<()>> + Send + 'a>>;

type StepOp =
    Box<dyn for<'a> Fn(&'a mut ConfigStore, &'a TrelloClient) -> StepFuture<'a> + Send + Sync>;

/// One unit of the workflow: a name, an optional predecessor, and an
/// operation issuing exactly one HTTP call.
pub struct Step {
    name: &'static str,
    requires: Option<&'static str>,
    op: StepOp,
}

impl Step {
    pub fn new<F>(name: &'static str, requires: Option<&'static str>, op: F) -> Self
    where
        F: for<'a> Fn(&'a mut ConfigStore, &'a TrelloClient) -> StepFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            requires,
            op: Box::new(op),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn requires(&self) -> Option<&'static str> {
        self.requires
    }
}

/// Names of the steps that completed, in execution order.
#[derive(Debug, Clone, Default)]
pub struct WorkflowReport {
    pub completed: Vec<&'static str>,
}

/// Executes an ordered list of steps strictly sequentially.
///
/// Each step blocks on its HTTP call before the next one starts; pacing
/// between calls is handled by the [`Pacer`](crate::http::Pacer)
/// injected into the client. The first failing step aborts the rest of
/// the chain. There is no retry and no rollback: remote resources
/// created by earlier steps are NOT cleaned up on abort and must be
/// deleted out of band, and a failed delete leaves its `*Id` entry
/// dangling in the store. Re-running create steps is not idempotent —
/// it creates fresh remote resources and overwrites the stored ids.
pub struct WorkflowRunner {
    client: TrelloClient,
}

impl WorkflowRunner {
    pub fn new(client: TrelloClient) -> Self {
        Self { client }
    }

    /// Build a runner from a configuration store (credentials and
    /// optional `TrelloBaseUrl`).
    pub fn from_config(store: &ConfigStore) -> TrelloResult<Self> {
        Ok(Self::new(TrelloClient::from_config(store)?))
    }

    pub fn client(&self) -> &TrelloClient {
        &self.client
    }

    /// Run the steps in order against the shared store.
    pub async fn run(
        &self,
        steps: &[Step],
        store: &mut ConfigStore,
    ) -> TrelloResult<WorkflowReport> {
        let mut completed: HashSet<&'static str> = HashSet::new();
        let mut report = WorkflowReport::default();

        for step in steps {
            if let Some(requires) = step.requires {
                if !completed.contains(requires) {
                    return Err(TrelloError::workflow(format!(
                        "step `{}` requires `{}` to have completed first",
                        step.name, requires
                    )));
                }
            }

            info!(step = step.name, "running step");
            match (step.op)(store, &self.client).await {
                Ok(()) => {
                    completed.insert(step.name);
                    report.completed.push(step.name);
                }
                Err(e) => {
                    error!(step = step.name, error = %e, "step failed, aborting chain");
                    return Err(e);
                }
            }
        }

        info!(steps = report.completed.len(), "workflow complete");
        Ok(report)
    }

    /// Run the full nine-state board lifecycle.
    pub async fn run_board_lifecycle(&self, store: &mut ConfigStore) -> TrelloResult<WorkflowReport> {
        self.run(&board_lifecycle(), store).await
    }
}
