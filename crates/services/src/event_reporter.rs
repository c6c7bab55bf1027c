//! Engagement event delivery.
//!
//! The controller emits through an [`EventSink`], which never blocks or fails.
//! A background pump drains the channel into an [`EventReporter`] and logs
//! delivery failures instead of propagating them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use quiz_core::Clock;
use quiz_core::model::{EngagementEvent, UserKey};
use storage::repository::{EventLogRepository, EventRecord};

use crate::error::ReportError;

/// Destination for engagement events.
#[async_trait]
pub trait EventReporter: Send + Sync {
    /// # Errors
    ///
    /// Returns `ReportError` when the event could not be delivered.
    async fn report(&self, event: &EngagementEvent) -> Result<(), ReportError>;
}

/// Appends events to the local storage log.
#[derive(Clone)]
pub struct EventLogReporter {
    clock: Clock,
    repo: Arc<dyn EventLogRepository>,
}

impl EventLogReporter {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn EventLogRepository>) -> Self {
        Self { clock, repo }
    }
}

#[async_trait]
impl EventReporter for EventLogReporter {
    async fn report(&self, event: &EngagementEvent) -> Result<(), ReportError> {
        let record = EventRecord::from_event(event, self.clock.now());
        let id = self.repo.append_event(&record).await?;
        debug!(event = event.name(), id, "logged engagement event");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectorPayload<'a> {
    event: &'a str,
    user_key: &'a str,
    data: Value,
    occurred_at: DateTime<Utc>,
}

/// Upper bound on a single collector round trip.
pub const DEFAULT_REPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts events as JSON to an HTTP collector.
///
/// Every request is bounded by a timeout so an unresponsive collector
/// cannot hold up the pump.
#[derive(Clone)]
pub struct HttpEventReporter {
    client: Client,
    endpoint: String,
    user_key: UserKey,
    clock: Clock,
    timeout: Duration,
}

impl HttpEventReporter {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, user_key: UserKey, clock: Clock) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            user_key,
            clock,
            timeout: DEFAULT_REPORT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl EventReporter for HttpEventReporter {
    async fn report(&self, event: &EngagementEvent) -> Result<(), ReportError> {
        let body = CollectorPayload {
            event: event.name(),
            user_key: self.user_key.as_str(),
            data: event.payload(),
            occurred_at: self.clock.now(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ReportError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

/// Delivers each event to every inner reporter; the first failure is
/// returned after all reporters have been tried.
#[derive(Clone, Default)]
pub struct FanOutReporter {
    reporters: Vec<Arc<dyn EventReporter>>,
}

impl FanOutReporter {
    #[must_use]
    pub fn new(reporters: Vec<Arc<dyn EventReporter>>) -> Self {
        Self { reporters }
    }

    #[must_use]
    pub fn with(mut self, reporter: Arc<dyn EventReporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

#[async_trait]
impl EventReporter for FanOutReporter {
    async fn report(&self, event: &EngagementEvent) -> Result<(), ReportError> {
        let mut first_error = None;
        for reporter in &self.reporters {
            if let Err(err) = reporter.report(event).await {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Fire-and-forget handle used by the session controller.
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: UnboundedSender<EngagementEvent>,
}

impl EventSink {
    /// Sink plus the receiving end, for callers that drive delivery themselves.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<EngagementEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue an event. A closed pipeline drops it with a warning.
    pub fn emit(&self, event: EngagementEvent) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            warn!(event = name, "event pipeline closed, dropping event");
        }
    }
}

/// Drain `rx` into `reporter` until every sink is dropped.
pub async fn run_event_pump(
    mut rx: UnboundedReceiver<EngagementEvent>,
    reporter: Arc<dyn EventReporter>,
) {
    while let Some(event) = rx.recv().await {
        if let Err(err) = reporter.report(&event).await {
            warn!(event = event.name(), error = %err, "failed to report engagement event");
        }
    }
    debug!("event pipeline drained");
}

/// Spawn the pump on the current tokio runtime.
#[must_use]
pub fn spawn_event_pump(reporter: Arc<dyn EventReporter>) -> (EventSink, JoinHandle<()>) {
    let (sink, rx) = EventSink::channel();
    let handle = tokio::spawn(run_event_pump(rx, reporter));
    (sink, handle)
}
