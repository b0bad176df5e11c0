//! Per-request lifecycle tracking
//!
//! `Received → Validated → (DryRunComplete | Generating → Persisted → Invalidated)`,
//! with `Rejected` reachable from every non-terminal phase before `Persisted`.

use std::time::Instant;

use shared::{component_debug, ComponentId};
use uuid::Uuid;

use crate::error::{GeneratorError, GeneratorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestPhase {
    Received,
    Validated,
    DryRunComplete,
    Generating,
    Persisted,
    Invalidated,
    Rejected,
}

impl RequestPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequestPhase::DryRunComplete | RequestPhase::Invalidated | RequestPhase::Rejected
        )
    }

    pub fn can_transition_to(self, next: RequestPhase) -> bool {
        use RequestPhase::*;
        matches!(
            (self, next),
            (Received, Validated)
                | (Received, Rejected)
                | (Validated, DryRunComplete)
                | (Validated, Generating)
                | (Validated, Rejected)
                | (Generating, Persisted)
                | (Generating, Rejected)
                | (Persisted, Invalidated)
        )
    }
}

/// Lifecycle of a single `execute` call
#[derive(Debug)]
pub struct RequestState {
    pub request_id: Uuid,
    pub series: String,
    phase: RequestPhase,
    history: Vec<(RequestPhase, Instant)>,
}

impl RequestState {
    pub fn new(series: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            series: series.into(),
            phase: RequestPhase::Received,
            history: vec![(RequestPhase::Received, Instant::now())],
        }
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn advance(&mut self, next: RequestPhase) -> GeneratorResult<()> {
        if !self.phase.can_transition_to(next) {
            return Err(GeneratorError::InvalidTransition { from: self.phase, to: next });
        }

        component_debug!(
            ComponentId::Orchestrator,
            "Request {} ({}): {:?} -> {:?}",
            self.request_id,
            self.series,
            self.phase,
            next
        );
        self.phase = next;
        self.history.push((next, Instant::now()));
        Ok(())
    }

    /// Phases visited so far, oldest first
    pub fn trail(&self) -> Vec<RequestPhase> {
        self.history.iter().map(|(phase, _)| *phase).collect()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.history
            .first()
            .map(|(_, started)| started.elapsed().as_millis())
            .unwrap_or_default()
    }
}
