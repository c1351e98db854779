use crate::policy::{PolicyDecision, PolicyError, PolicyGate};
use crate::query::{QueryError, QueryExecutor, QueryOutput};
use crate::trace::SessionTrace;

/// What happened to one proposed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The statement was admitted (possibly with a warning) and executed.
    Executed {
        decision: PolicyDecision,
        output: QueryOutput,
    },
    /// The statement was denied; the executor was never invoked.
    Refused { decision: PolicyDecision },
    /// The statement was admitted but the engine reported an error.
    Failed {
        decision: PolicyDecision,
        error: QueryError,
    },
}

/// Applies the session control flow around the host's query capability:
/// classify the statement, refuse it on deny, forward the original text
/// unchanged on admit or warn.
pub struct GatedQuery<E> {
    gate: PolicyGate,
    executor: E,
    trace: Option<SessionTrace>,
}

impl<E: QueryExecutor> GatedQuery<E> {
    pub fn new(gate: PolicyGate, executor: E) -> Self {
        Self {
            gate,
            executor,
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: SessionTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn gate(&self) -> &PolicyGate {
        &self.gate
    }

    pub fn execute(&self, sql: &str) -> Result<QueryOutcome, PolicyError> {
        if let Some(trace) = &self.trace {
            trace.log_statement(sql);
        }

        let decision = self.gate.classify(sql)?;
        if let Some(trace) = &self.trace {
            trace.log_decision(&decision);
        }

        if !decision.action.allows_execution() {
            return Ok(QueryOutcome::Refused { decision });
        }

        match self.executor.run_query(sql) {
            Ok(output) => {
                if let Some(trace) = &self.trace {
                    trace.log_result(&output.table_text);
                }
                Ok(QueryOutcome::Executed { decision, output })
            }
            Err(error) => {
                if let Some(trace) = &self.trace {
                    trace.log_engine_error(&error.to_string());
                }
                Ok(QueryOutcome::Failed { decision, error })
            }
        }
    }
}
