//! Per-user tracking jobs
//!
//! A user is "tracking" either silently (after claiming a link) or with an
//! auto-tracking loop that prompts for a location on a fixed interval. Each
//! job carries a cancellation token derived from the shutdown token.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct TrackingJob {
    id: u64,
    token: CancellationToken,
}

/// Handle returned when a job is registered
#[derive(Debug, Clone)]
pub struct JobHandle {
    /// Job generation, used to remove only the job that finished
    pub id: u64,
    /// Cancelled when the job is stopped or the bot shuts down
    pub token: CancellationToken,
}

/// Registry of tracking jobs keyed by Telegram user id
#[derive(Default)]
pub struct AutoTrackingJobs {
    jobs: DashMap<u64, TrackingJob>,
    next_id: AtomicU64,
}

impl AutoTrackingJobs {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the user has any job
    #[must_use]
    pub fn is_tracking(&self, user_id: u64) -> bool {
        self.jobs.contains_key(&user_id)
    }

    /// Number of users with a job
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no user has a job
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Register a job unless the user already has one.
    ///
    /// The job's token is a child of `parent`, so shutting the bot down
    /// cancels every job.
    pub fn try_start(&self, user_id: u64, parent: &CancellationToken) -> Option<JobHandle> {
        let entry = self.jobs.entry(user_id);
        match entry {
            dashmap::mapref::entry::Entry::Occupied(_) => None,
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let token = parent.child_token();
                vacant.insert(TrackingJob {
                    id,
                    token: token.clone(),
                });
                debug!(user_id, job_id = id, "Tracking job started");
                Some(JobHandle { id, token })
            }
        }
    }

    /// Stop and remove the user's job. Returns whether one existed.
    pub fn stop(&self, user_id: u64) -> bool {
        match self.jobs.remove(&user_id) {
            Some((_, job)) => {
                job.token.cancel();
                debug!(user_id, job_id = job.id, "Tracking job stopped");
                true
            }
            None => false,
        }
    }

    /// Remove the job if it is still the one identified by `job_id`
    pub fn finish(&self, user_id: u64, job_id: u64) {
        if self
            .jobs
            .remove_if(&user_id, |_, job| job.id == job_id)
            .is_some()
        {
            debug!(user_id, job_id, "Tracking job finished");
        }
    }
}
