//! Batch Runner - Bounded Fan-Out Across Registrants
//!
//! Each registrant runs on the blocking pool behind a semaphore permit, so at
//! most `max_workers` images are being decoded or written at once. A timed-out
//! registrant is abandoned, not cancelled: its task may still finish writing
//! files, which is harmless because names are deterministic.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::config::BatchConfig;
use crate::generator::{GenerationReport, PassGenerator};
use crate::registrant::{Registrant, RegistrantId};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    Completed { report: GenerationReport },
    Rejected { registrant_id: RegistrantId, reason: String },
    TimedOut { registrant_id: RegistrantId },
    Panicked { registrant_id: RegistrantId },
}

impl BatchOutcome {
    pub fn registrant_id(&self) -> RegistrantId {
        match self {
            BatchOutcome::Completed { report } => report.registrant_id,
            BatchOutcome::Rejected { registrant_id, .. }
            | BatchOutcome::TimedOut { registrant_id }
            | BatchOutcome::Panicked { registrant_id } => *registrant_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    /// Completed registrants with at least one failed or skipped pass.
    pub incomplete: usize,
    pub rejected: usize,
    pub timed_out: usize,
    pub panicked: usize,
    pub passes_generated: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let mut summary = BatchSummary {
            total: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                BatchOutcome::Completed { report } => {
                    summary.completed += 1;
                    summary.passes_generated += report.passes().count();
                    if !report.is_complete() {
                        summary.incomplete += 1;
                    }
                }
                BatchOutcome::Rejected { .. } => summary.rejected += 1,
                BatchOutcome::TimedOut { .. } => summary.timed_out += 1,
                BatchOutcome::Panicked { .. } => summary.panicked += 1,
            }
        }
        summary
    }
}

pub struct BatchRunner {
    generator: Arc<PassGenerator>,
    permits: Arc<Semaphore>,
    timeout: Option<Duration>,
}

impl BatchRunner {
    pub fn new(generator: Arc<PassGenerator>, config: &BatchConfig) -> Self {
        Self {
            generator,
            permits: Arc::new(Semaphore::new(config.max_workers.max(1))),
            timeout: config.timeout(),
        }
    }

    /// Generate for every registrant; outcomes come back in input order.
    pub async fn run(&self, registrants: Vec<Registrant>) -> Vec<BatchOutcome> {
        let run_id = Uuid::new_v4();
        let span = info_span!("batch", %run_id);
        self.run_in(registrants).instrument(span).await
    }

    async fn run_in(&self, registrants: Vec<Registrant>) -> Vec<BatchOutcome> {
        info!(count = registrants.len(), "Starting batch");

        let handles: Vec<_> = registrants
            .into_iter()
            .map(|registrant| {
                let registrant_id = registrant.id;
                let generator = Arc::clone(&self.generator);
                let permits = Arc::clone(&self.permits);
                let timeout = self.timeout;
                let handle =
                    tokio::spawn(run_one(generator, permits, timeout, registrant).in_current_span());
                (registrant_id, handle)
            })
            .collect();

        let outcomes = join_in_order(handles).await;

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(?summary, "Batch finished");
        outcomes
    }
}

/// One outcome per handle, in handle order, even when a task is lost.
async fn join_in_order(handles: Vec<(RegistrantId, JoinHandle<BatchOutcome>)>) -> Vec<BatchOutcome> {
    let mut outcomes = Vec::with_capacity(handles.len());
    for (registrant_id, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                error!(registrant = registrant_id, error = %e, "Batch task aborted");
                outcomes.push(BatchOutcome::Panicked { registrant_id });
            }
        }
    }
    outcomes
}

async fn run_one(
    generator: Arc<PassGenerator>,
    permits: Arc<Semaphore>,
    timeout: Option<Duration>,
    registrant: Registrant,
) -> BatchOutcome {
    let registrant_id = registrant.id;

    // The semaphore is never closed.
    let Ok(permit) = permits.acquire_owned().await else {
        return BatchOutcome::Rejected {
            registrant_id,
            reason: "worker pool closed".to_string(),
        };
    };

    let span = Span::current();
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        let _entered = span.enter();
        generator.generate_for_registrant(&registrant)
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(registrant = registrant_id, ?limit, "Registrant timed out, abandoning");
                return BatchOutcome::TimedOut { registrant_id };
            }
        },
        None => task.await,
    };

    match joined {
        Ok(Ok(report)) => BatchOutcome::Completed { report },
        Ok(Err(e)) => BatchOutcome::Rejected {
            registrant_id,
            reason: e.to_string(),
        },
        Err(e) => {
            error!(registrant = registrant_id, error = %e, "Generation task panicked");
            BatchOutcome::Panicked { registrant_id }
        }
    }
}
