//! API-facing request/response models for the UI layer.
//!
//! The conversational frontend collects a direction, date, and departure
//! time from the user; these models carry that exchange across the boundary
//! and render status rows the way the chat surface presents them.

use serde::{Deserialize, Serialize};

use crate::core::task::{Direction, Owner, TaskKey, TaskSummary};
use crate::core::{MonitorService, TaskSpec};
use crate::runtime::Spawn;

/// A start-monitoring request from the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    /// Requesting owner.
    pub owner: Owner,
    /// Route to watch.
    pub direction: Direction,
    /// Travel date.
    pub date: chrono::NaiveDate,
    /// Departure time string.
    pub departure_time: String,
}

/// Outcome of a start request, shaped for direct rendering by the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StartOutcome {
    /// The monitor task is running.
    Started {
        /// Key of the new task.
        key: TaskKey,
    },
    /// The request was rejected; no state was changed.
    Rejected {
        /// User-visible rejection reason.
        reason: String,
    },
}

/// Status listing for one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    /// Active task summaries, sorted by key.
    pub tasks: Vec<TaskSummary>,
}

impl StatusReport {
    /// Render the listing as chat text.
    #[must_use]
    pub fn render(&self) -> String {
        if self.tasks.is_empty() {
            return "No active monitoring tasks.".to_string();
        }
        let mut out = String::from("Active monitoring tasks:\n");
        for task in &self.tasks {
            out.push_str(&format!(
                "- {} on {} at {}\n",
                task.direction.route_text(),
                task.date,
                task.departure_time
            ));
        }
        out
    }
}

/// Health response for the hosting platform's liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Submit a start request to the service.
pub fn start_task<S>(service: &MonitorService<S>, req: StartRequest) -> StartOutcome
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    let spec = TaskSpec::new(req.direction, req.date, req.departure_time);
    match service.start(req.owner, spec) {
        Ok(key) => StartOutcome::Started { key },
        Err(e) => StartOutcome::Rejected {
            reason: e.to_string(),
        },
    }
}

/// Build a status report for an owner.
pub fn status_report<S>(service: &MonitorService<S>, owner: Owner) -> StatusReport
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    StatusReport {
        tasks: service.status(owner),
    }
}

/// Return a health payload.
#[must_use]
pub const fn health() -> Health {
    Health { ok: true }
}
