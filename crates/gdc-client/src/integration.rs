//! Integration of staged uploads
//!
//! Triggers the platform's ETL pull for a staging directory and follows the resulting
//! asynchronous task until it finishes.
//!
//! Status handling:
//!
//! | status              | outcome                          |
//! |---------------------|----------------------------------|
//! | `OK`                | done                             |
//! | `ERROR`, `WARNING`  | `UploadFailed(status)`, no retry |
//! | anything else       | wait the poll interval, re-poll  |
//!
//! A `WARNING` blocks a clean integration just like `ERROR` does.
//!
//! The wait can be bounded with a timeout and interrupted through a [`CancellationToken`].
//! Neither affects the table above; they only decide when to stop asking.

use crate::api::endpoints;
use crate::api::transport::{Transport, TransportRequest};
use crate::api::types::{decode, PullRequest, PullResponse, TaskStatusResponse};
use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::error::{GdcError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Status of an integration task as reported by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Ok,
    Error,
    Warning,
    /// Any non-terminal value (`RUNNING`, `PREPARED`, ...)
    Pending(String),
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "OK" => TaskStatus::Ok,
            "ERROR" => TaskStatus::Error,
            "WARNING" => TaskStatus::Warning,
            other => TaskStatus::Pending(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Ok => "OK",
            TaskStatus::Error => "ERROR",
            TaskStatus::Warning => "WARNING",
            TaskStatus::Pending(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Pending(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::Error | TaskStatus::Warning)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controls how long and how often an integration task is polled
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub interval: Duration,
    /// Give up after this long; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub cancel: CancellationToken,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            timeout: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl PollOptions {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Triggers integrations for one project and waits for them
#[derive(Clone)]
pub struct IntegrationPoller {
    transport: Arc<dyn Transport>,
    project_id: String,
    options: PollOptions,
}

impl IntegrationPoller {
    pub fn new(transport: Arc<dyn Transport>, project_id: impl Into<String>) -> Self {
        Self {
            transport,
            project_id: project_id.into(),
            options: PollOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PollOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PollOptions {
        &self.options
    }

    /// Integrate the staging directory `dir_name` into the project.
    ///
    /// With `wait_for_finish == false` this returns as soon as the task is accepted.
    #[instrument(skip(self), fields(project = %self.project_id))]
    pub async fn integrate(&self, dir_name: &str, wait_for_finish: bool) -> Result<()> {
        let task_uri = self.trigger(dir_name).await?;

        if !wait_for_finish {
            info!(task_uri = %task_uri, "Integration triggered, not waiting");
            return Ok(());
        }

        self.wait_for_task(&task_uri).await
    }

    /// Start the ETL pull and return the URI of the task to poll
    pub async fn trigger(&self, dir_name: &str) -> Result<String> {
        let body = serde_json::to_value(PullRequest {
            pull_integration: dir_name.to_string(),
        })?;

        let response = self
            .transport
            .request(TransportRequest::post_json(endpoints::pull_uri(&self.project_id), body))
            .await?;

        let pull: PullResponse = decode(response, "integration trigger")?;
        debug!(task_uri = %pull.pull_task.uri, "Integration task created");
        Ok(pull.pull_task.uri)
    }

    /// Fetch the current status of an integration task
    pub async fn status(&self, task_uri: &str) -> Result<TaskStatus> {
        let response = self.transport.request(TransportRequest::get(task_uri)).await?;
        let status: TaskStatusResponse = decode(response, "task status")?;
        Ok(TaskStatus::parse(&status.task_status))
    }

    /// Poll `task_uri` until it reaches a terminal status, the timeout elapses or the
    /// cancellation token fires.
    pub async fn wait_for_task(&self, task_uri: &str) -> Result<()> {
        let started = Instant::now();
        let poll = self.poll_until_terminal(task_uri);

        let bounded = async {
            match self.options.timeout {
                Some(limit) => match tokio::time::timeout(limit, poll).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(GdcError::IntegrationTimeout {
                        task_uri: task_uri.to_string(),
                        elapsed: started.elapsed(),
                    }),
                },
                None => poll.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.options.cancel.cancelled() => {
                warn!(task_uri = %task_uri, "Integration wait cancelled");
                Err(GdcError::Cancelled(task_uri.to_string()))
            }
            outcome = bounded => outcome,
        }
    }

    async fn poll_until_terminal(&self, task_uri: &str) -> Result<()> {
        let mut polls: u32 = 0;

        loop {
            let status = self.status(task_uri).await?;
            polls += 1;
            debug!(task_uri = %task_uri, status = %status, polls, "Polled integration task");

            match status {
                TaskStatus::Ok => {
                    info!(task_uri = %task_uri, polls, "Integration finished");
                    return Ok(());
                },
                TaskStatus::Error | TaskStatus::Warning => {
                    warn!(task_uri = %task_uri, status = %status, "Integration failed");
                    return Err(GdcError::upload_failed(status.as_str()));
                },
                TaskStatus::Pending(_) => tokio::time::sleep(self.options.interval).await,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::transport::Method;
    use crate::testing::{MockTransport, PROJECT_ID, TASK_URI};
    use proptest::prelude::*;

    fn poller(mock: &Arc<MockTransport>) -> IntegrationPoller {
        IntegrationPoller::new(mock.clone(), PROJECT_ID)
    }

    #[tokio::test(start_paused = true)]
    async fn test_integrate_polls_until_ok() {
        let mock = Arc::new(MockTransport::with_statuses(&["RUNNING", "PREPARED", "OK"]));

        let started = Instant::now();
        poller(&mock).integrate("tmpdir", true).await.unwrap();

        assert_eq!(mock.count(Method::Post, "/etl/pull"), 1);
        assert_eq!(mock.count(Method::Get, TASK_URI), 3);
        // two sleeps between three polls
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert!(started.elapsed() < Duration::from_millis(1500));

        let trigger = &mock.calls()[0];
        assert_eq!(trigger.uri, "/gdc/md/p1/etl/pull");
        assert_eq!(
            trigger.body,
            crate::api::Body::Json(serde_json::json!({"pullIntegration": "tmpdir"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_integrate_fails_on_error_without_repolling() {
        let mock = Arc::new(MockTransport::with_statuses(&["RUNNING", "ERROR", "OK"]));

        let err = poller(&mock).integrate("tmpdir", true).await.unwrap_err();

        assert!(matches!(err, GdcError::UploadFailed { ref status } if status == "ERROR"));
        assert_eq!(mock.count(Method::Get, TASK_URI), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warning_is_fatal() {
        let mock = Arc::new(MockTransport::with_statuses(&["WARNING"]));

        let err = poller(&mock).integrate("tmpdir", true).await.unwrap_err();

        assert!(matches!(err, GdcError::UploadFailed { ref status } if status == "WARNING"));
        assert_eq!(mock.count(Method::Get, TASK_URI), 1);
    }

    #[tokio::test]
    async fn test_integrate_without_waiting() {
        let mock = Arc::new(MockTransport::with_statuses(&["RUNNING"]));

        poller(&mock).integrate("tmpdir", false).await.unwrap();

        assert_eq!(mock.count(Method::Post, "/etl/pull"), 1);
        assert_eq!(mock.count(Method::Get, TASK_URI), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_the_wait() {
        let mock = Arc::new(MockTransport::with_statuses(&["RUNNING"; 100]));
        let poller = poller(&mock).with_options(
            PollOptions::default().with_timeout(Some(Duration::from_millis(1200))),
        );

        let err = poller.integrate("tmpdir", true).await.unwrap_err();

        assert!(matches!(err, GdcError::IntegrationTimeout { .. }));
        // polls at t = 0, 500, 1000
        assert_eq!(mock.count(Method::Get, TASK_URI), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_the_wait() {
        let mock = Arc::new(MockTransport::with_statuses(&["RUNNING"; 100]));
        let cancel = CancellationToken::new();
        let poller =
            poller(&mock).with_options(PollOptions::default().with_cancel(cancel.clone()));

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1700)).await;
            cancel.cancel();
        });

        let err = poller.integrate("tmpdir", true).await.unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, GdcError::Cancelled(ref uri) if uri == TASK_URI));
        assert_eq!(mock.count(Method::Get, TASK_URI), 4);
    }

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let mock = Arc::new(MockTransport::with_statuses(&["OK"]));
        mock.fail_on(Method::Get, 502);

        let err = poller(&mock).integrate("tmpdir", true).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(mock.count(Method::Get, TASK_URI), 1);
    }

    #[test]
    fn test_terminal_statuses() {
        assert_eq!(TaskStatus::parse("OK"), TaskStatus::Ok);
        assert!(TaskStatus::parse("ERROR").is_failure());
        assert!(TaskStatus::parse("WARNING").is_failure());
        assert!(!TaskStatus::parse("ok").is_terminal());
        assert_eq!(TaskStatus::parse("RUNNING").to_string(), "RUNNING");
    }

    proptest! {
        #[test]
        fn unknown_statuses_are_never_terminal(raw in "[A-Za-z_]{0,12}") {
            prop_assume!(!["OK", "ERROR", "WARNING"].contains(&raw.as_str()));
            let status = TaskStatus::parse(&raw);
            prop_assert!(!status.is_terminal());
            prop_assert_eq!(status.as_str(), raw.as_str());
        }
    }
}
