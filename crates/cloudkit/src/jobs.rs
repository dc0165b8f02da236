//! Job queue reaper.
//!
//! Force-deletes jobs and confirms their removal. The confirmation loop
//! polls with exponential backoff and a bounded attempt count; if the
//! queue never reports the job absent the reap fails with
//! [`Error::ReapTimeout`] instead of spinning forever. Job deletion is
//! confirmed (unlike certificate deactivation) because the sibling
//! deployment subsystem reuses job ids and a half-deleted job would make
//! its next run fail.

use crate::backend::http::HttpBackend;
use crate::backend::JobBackend;
use crate::error::{Error, Result};
use crate::types::{PollConfig, ReapReport};
use std::thread;

/// Client for the job queue.
pub struct JobClient {
    backend: Box<dyn JobBackend>,
    poll: PollConfig,
}

impl JobClient {
    /// Create a client against the given control-plane endpoint.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            backend: Box::new(HttpBackend::new(endpoint)),
            poll: PollConfig::default(),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn JobBackend>) -> Self {
        Self {
            backend,
            poll: PollConfig::default(),
        }
    }

    /// Override the confirmation poll configuration.
    #[must_use]
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Force-delete a job and wait until the queue confirms it gone.
    ///
    /// A job the queue does not know is already gone; that is success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReapTimeout`] when the queue still reports the
    /// job present after the configured number of confirmation queries.
    pub fn reap(&self, job_id: &str) -> Result<()> {
        let accepted = self.backend.delete_job(job_id, true)?;
        if !accepted {
            log::debug!("the thing job {} does not exist, nothing to reap", job_id);
            return Ok(());
        }

        log::debug!("waiting the thing job {} is deleted ...", job_id);

        for attempt in 0..self.poll.max_attempts {
            if self.backend.describe_job(job_id)?.is_none() {
                log::info!("the thing job {} is deleted", job_id);
                return Ok(());
            }
            thread::sleep(self.poll.delay_for_attempt(attempt));
        }

        Err(Error::ReapTimeout {
            job_id: job_id.to_string(),
            attempts: self.poll.max_attempts,
        })
    }

    /// Reap each job independently; one failure never stops the rest.
    pub fn reap_all(&self, job_ids: &[&str]) -> ReapReport {
        let mut report = ReapReport::default();

        for &job_id in job_ids {
            match self.reap(job_id) {
                Ok(()) => report.reaped.push(job_id.to_string()),
                Err(e) => {
                    log::error!("failed to reap the thing job {}: {}", job_id, e);
                    report.failed.push((job_id.to_string(), e.to_string()));
                }
            }
        }

        report
    }
}
