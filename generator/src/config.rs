//! Orchestrator tunables

use std::time::Duration;

use crate::error::{GeneratorError, GeneratorResult};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Accepted-leaf count from which generation fans out across tasks;
    /// also the chunk size handed to each task
    pub parallel_threshold: usize,

    /// Total invalidation attempts before giving up
    pub invalidation_attempts: u32,

    /// Pause between invalidation attempts
    pub invalidation_backoff: Duration,

    /// Batch attempts when the store reports uniqueness conflicts
    pub conflict_retries: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 16,
            invalidation_attempts: 3,
            invalidation_backoff: Duration::from_millis(100),
            conflict_retries: 3,
        }
    }
}

impl GeneratorConfig {
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_invalidation_attempts(mut self, attempts: u32) -> Self {
        self.invalidation_attempts = attempts;
        self
    }

    pub fn with_invalidation_backoff(mut self, backoff: Duration) -> Self {
        self.invalidation_backoff = backoff;
        self
    }

    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = retries;
        self
    }

    pub fn validate(&self) -> GeneratorResult<()> {
        if self.parallel_threshold == 0 {
            return Err(GeneratorError::config("parallel_threshold must be at least 1"));
        }
        if self.invalidation_attempts == 0 {
            return Err(GeneratorError::config("invalidation_attempts must be at least 1"));
        }
        if self.conflict_retries == 0 {
            return Err(GeneratorError::config("conflict_retries must be at least 1"));
        }
        Ok(())
    }
}
