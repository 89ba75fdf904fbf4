//! Reply decisions for driver updates
//!
//! Each function here decides what the bot answers given the driver's state,
//! without touching the Bot API. Jobs are registered or stopped as part of
//! the decision so a handler only has to deliver the result.

use super::commands::{self, auto_tracking_started_text, DriverCommand};
use super::jobs::{AutoTrackingJobs, JobHandle};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Reply keyboard attached to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplyKeyboard {
    /// Leave the current keyboard alone
    Keep,
    /// One-time location button
    LocationRequest,
    /// "Stop Auto Tracking" button
    Stop,
    /// "Share Location Once" and "Start Auto Tracking"
    Idle,
    /// Remove the keyboard
    Remove,
}

/// Text plus keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reply {
    pub text: String,
    pub keyboard: ReplyKeyboard,
}

impl Reply {
    fn new(text: impl Into<String>, keyboard: ReplyKeyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, ReplyKeyboard::Keep)
    }
}

/// What the handler should do next
#[derive(Debug)]
pub(crate) enum Action {
    /// Say nothing
    Silent,
    /// Send a reply
    Send(Reply),
    /// Send a reply that opened `job`. The job is dropped if the reply fails.
    Begin {
        reply: Reply,
        job: JobHandle,
        /// Driver to prompt periodically, when auto tracking
        prompt_for: Option<String>,
    },
}

/// After a `/start` claim. Only a successful claim opens a silent job.
pub(crate) fn after_claim(
    jobs: &AutoTrackingJobs,
    shutdown: &CancellationToken,
    user_id: u64,
    claimed: bool,
) -> Action {
    if !claimed {
        return Action::Silent;
    }
    match jobs.try_start(user_id, shutdown) {
        Some(job) => Action::Begin {
            reply: Reply::new(commands::LOCATION_PIN, ReplyKeyboard::LocationRequest),
            job,
            prompt_for: None,
        },
        None => Action::Silent,
    }
}

/// Free text (not a slash command). `driver_id` is the user's bound session.
pub(crate) fn on_text(
    jobs: &AutoTrackingJobs,
    shutdown: &CancellationToken,
    user_id: u64,
    driver_id: Option<&str>,
    command: Option<&DriverCommand>,
    interval: Duration,
) -> Action {
    let Some(driver_id) = driver_id else {
        return Action::Send(Reply::plain(commands::NOT_REGISTERED));
    };

    match command {
        Some(DriverCommand::StartAutoTracking) => match jobs.try_start(user_id, shutdown) {
            Some(job) => Action::Begin {
                reply: Reply::new(auto_tracking_started_text(interval), ReplyKeyboard::Stop),
                job,
                prompt_for: Some(driver_id.to_string()),
            },
            None => Action::Send(Reply::plain(commands::ALREADY_RUNNING)),
        },
        Some(DriverCommand::StopAutoTracking) => {
            if jobs.stop(user_id) {
                Action::Send(Reply::new(commands::AUTO_TRACKING_STOPPED, ReplyKeyboard::Idle))
            } else {
                Action::Send(Reply::plain(commands::NOT_RUNNING))
            }
        }
        _ => Action::Silent,
    }
}

/// `/stop`. `deactivated` is `None` when the user has no session, otherwise
/// whether deactivating it changed a row. Any job of the user is stopped.
pub(crate) fn on_stop(jobs: &AutoTrackingJobs, user_id: u64, deactivated: Option<bool>) -> Reply {
    match deactivated {
        None => Reply::plain(commands::NOT_TRACKED),
        Some(changed) => {
            jobs.stop(user_id);
            if changed {
                Reply::new(commands::TRACKING_STOPPED, ReplyKeyboard::Remove)
            } else {
                Reply::plain(commands::STOP_FAILED)
            }
        }
    }
}

/// Send the reply of `action`.
///
/// Returns the job and driver to prompt when auto tracking should begin. A
/// job whose reply could not be sent is released again.
pub(crate) async fn deliver<F, Fut, E>(
    jobs: &AutoTrackingJobs,
    user_id: u64,
    action: Action,
    send: F,
) -> Result<Option<(JobHandle, String)>, E>
where
    F: FnOnce(Reply) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    match action {
        Action::Silent => Ok(None),
        Action::Send(reply) => send(reply).await.map(|()| None),
        Action::Begin {
            reply,
            job,
            prompt_for,
        } => {
            if let Err(e) = send(reply).await {
                jobs.finish(user_id, job.id);
                return Err(e);
            }
            Ok(prompt_for.map(|driver_id| (job, driver_id)))
        }
    }
}

/// Time stored for a location report: the edit date of a live location, else
/// the send date, never later than `now`
pub(crate) fn report_time(
    sent: DateTime<Utc>,
    edited: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    edited.unwrap_or(sent).min(now)
}
