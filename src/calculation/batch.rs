//! Batch payroll runs.
//!
//! Each employee is composed, validated and moved to `Calculated` on its
//! own. A missing input or a validation error is recorded against that
//! employee and the run carries on.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::{self, JoinSet};

use crate::config::PayrollSettings;
use crate::error::EngineError;
use crate::models::{Issue, PayrollPeriod, PayrollResult};

use super::composer::{PayrollComposer, PayrollInputs};
use super::validator::PayrollValidator;

/// What happened to one employee in a batch.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Composed, validated and moved to `Calculated`.
    Calculated(Box<PayrollResult>),
    /// Composed but left in `Draft` because validation found errors.
    Blocked {
        /// The draft result.
        result: Box<PayrollResult>,
        /// The errors that blocked it.
        errors: Vec<Issue>,
    },
    /// Composition failed.
    Failed {
        /// The employee whose payroll failed.
        employee_id: String,
        /// The period being composed.
        period: PayrollPeriod,
        /// Why it failed.
        error: EngineError,
    },
}

impl BatchOutcome {
    /// The employee this outcome belongs to.
    pub fn employee_id(&self) -> &str {
        match self {
            BatchOutcome::Calculated(result) => &result.employee_id,
            BatchOutcome::Blocked { result, .. } => &result.employee_id,
            BatchOutcome::Failed { employee_id, .. } => employee_id,
        }
    }

    /// The composed result, calculated or blocked.
    pub fn result(&self) -> Option<&PayrollResult> {
        match self {
            BatchOutcome::Calculated(result) | BatchOutcome::Blocked { result, .. } => {
                Some(result)
            }
            BatchOutcome::Failed { .. } => None,
        }
    }
}

/// Per-employee outcomes of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One outcome per input.
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    /// Number of employees moved to `Calculated`.
    pub fn calculated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::Calculated(_)))
            .count()
    }

    /// Number of employees blocked by validation errors.
    pub fn blocked_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::Blocked { .. }))
            .count()
    }

    /// Number of employees whose composition failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BatchOutcome::Failed { .. }))
            .count()
    }

    /// The results that reached `Calculated`.
    pub fn calculated(&self) -> impl Iterator<Item = &PayrollResult> {
        self.outcomes.iter().filter_map(|o| match o {
            BatchOutcome::Calculated(result) => Some(result.as_ref()),
            _ => None,
        })
    }
}

/// Runs composition and validation over many employees.
#[derive(Debug, Clone, Default)]
pub struct PayrollBatch {
    composer: PayrollComposer,
    validator: PayrollValidator,
}

impl PayrollBatch {
    /// Creates a batch runner sharing one set of settings.
    pub fn new(settings: PayrollSettings) -> Self {
        Self {
            composer: PayrollComposer::new(settings.clone()),
            validator: PayrollValidator::new(settings),
        }
    }

    /// Processes one employee.
    pub fn process(&self, inputs: &PayrollInputs) -> BatchOutcome {
        let mut result = match self.composer.compose(inputs) {
            Ok(result) => result,
            Err(error) => {
                return BatchOutcome::Failed {
                    employee_id: inputs.employee_id.clone(),
                    period: inputs.period,
                    error,
                };
            }
        };

        let report = self.validator.validate(&result, inputs);
        match result.mark_calculated(&report) {
            Ok(()) => BatchOutcome::Calculated(Box::new(result)),
            Err(EngineError::ValidationFailed { errors, .. }) => BatchOutcome::Blocked {
                result: Box::new(result),
                errors,
            },
            Err(error) => BatchOutcome::Failed {
                employee_id: inputs.employee_id.clone(),
                period: inputs.period,
                error,
            },
        }
    }

    /// Processes every input in order on the calling thread.
    pub fn run(&self, inputs: &[PayrollInputs]) -> BatchReport {
        let report = BatchReport {
            outcomes: inputs.iter().map(|i| self.process(i)).collect(),
        };
        log_completed(&report);
        report
    }

    /// Processes every input on the blocking thread pool.
    ///
    /// Outcomes are returned in input order regardless of completion order.
    /// A worker task that panics or is cancelled is recorded as a
    /// `CalculationError` failure for its employee; the other employees
    /// are unaffected.
    pub async fn run_concurrent(&self, inputs: Vec<PayrollInputs>) -> BatchReport {
        let engine = Arc::new(self.clone());
        let mut tasks = JoinSet::new();
        let mut owners: HashMap<task::Id, (usize, String, PayrollPeriod)> = HashMap::new();

        for (index, input) in inputs.into_iter().enumerate() {
            let engine = Arc::clone(&engine);
            let owner = (index, input.employee_id.clone(), input.period);
            let handle = tasks.spawn_blocking(move || engine.process(&input));
            owners.insert(handle.id(), owner);
        }

        let mut slots: Vec<Option<BatchOutcome>> = Vec::new();
        slots.resize_with(owners.len(), || None);

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, Some(outcome)),
                Err(error) => {
                    tracing::error!(task = %error.id(), error = %error, "Payroll task failed");
                    (error.id(), None)
                }
            };
            let Some((index, employee_id, period)) = owners.remove(&id) else {
                continue;
            };
            slots[index] = Some(outcome.unwrap_or_else(|| BatchOutcome::Failed {
                error: EngineError::CalculationError {
                    message: format!("Payroll task for employee '{}' did not complete", employee_id),
                },
                employee_id,
                period,
            }));
        }

        let report = BatchReport {
            outcomes: slots.into_iter().flatten().collect(),
        };
        log_completed(&report);
        report
    }
}

fn log_completed(report: &BatchReport) {
    tracing::info!(
        total = report.outcomes.len(),
        calculated = report.calculated_count(),
        blocked = report.blocked_count(),
        failed = report.failed_count(),
        "Payroll batch completed"
    );
}
