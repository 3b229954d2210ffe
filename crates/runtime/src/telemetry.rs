//! Fail-open stage-completion metrics.
//!
//! The sidecar is invoked only after a successful commit and its result is
//! always discarded: a metric failure is logged and dropped, never retried,
//! never surfaced. A lost data point is an acceptable, permanent loss; a
//! blocked submission is not.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use quest_core::QuestIndex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::clock;

/// Datadog v1 series endpoint, overridable for testing and proxies.
pub const DATADOG_API_URL: &str = "https://api.datadoghq.com/api/v1/series";

/// Metric name emitted for every completed quest.
pub const STAGE_METRIC: &str = "hackquest.stage_completed";

const SINK_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors a metric sink can raise. All of them stop at the sidecar.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The HTTP request itself failed (connect, timeout, TLS).
    #[error("metric request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered outside the 2xx range.
    #[error("metric endpoint answered status {status}")]
    Status { status: u16 },
}

/// Destination for stage-completion metrics.
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// Record that `team_name` completed `quest`.
    async fn record_stage_completed(
        &self,
        team_name: &str,
        quest: QuestIndex,
    ) -> Result<(), TelemetryError>;
}

#[async_trait]
impl<M: MetricSink + ?Sized> MetricSink for &M {
    async fn record_stage_completed(
        &self,
        team_name: &str,
        quest: QuestIndex,
    ) -> Result<(), TelemetryError> {
        (**self).record_stage_completed(team_name, quest).await
    }
}

#[async_trait]
impl<M: MetricSink + ?Sized> MetricSink for std::sync::Arc<M> {
    async fn record_stage_completed(
        &self,
        team_name: &str,
        quest: QuestIndex,
    ) -> Result<(), TelemetryError> {
        self.as_ref().record_stage_completed(team_name, quest).await
    }
}

/// Fail-open wrapper around any [`MetricSink`].
pub struct TelemetrySidecar<M> {
    sink: M,
}

impl<M: MetricSink> TelemetrySidecar<M> {
    /// Wrap a sink.
    pub fn new(sink: M) -> Self {
        Self { sink }
    }

    /// Notify the sink, swallowing any failure.
    pub async fn notify(&self, team_name: &str, quest: QuestIndex) {
        if let Err(err) = self.sink.record_stage_completed(team_name, quest).await {
            warn!(
                "dropping stage metric for team '{}' quest {}: {}",
                team_name,
                quest.number(),
                err
            );
        }
    }
}

#[derive(Debug, Serialize)]
struct SeriesPayload<'a> {
    series: [Series<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Series<'a> {
    metric: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    points: [(i64, u32); 1],
    tags: [String; 1],
}

fn stage_payload(quest: QuestIndex) -> SeriesPayload<'static> {
    SeriesPayload {
        series: [Series {
            metric: STAGE_METRIC,
            kind: "count",
            points: [(clock::unix_timestamp(), 1)],
            tags: [format!("stage:{}", quest.stage_tag())],
        }],
    }
}

/// Sink that POSTs count metrics to the Datadog series API.
pub struct DatadogSink {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl DatadogSink {
    /// Build a sink against the public Datadog endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, TelemetryError> {
        Self::with_api_url(DATADOG_API_URL, api_key)
    }

    /// Build a sink against an explicit endpoint.
    pub fn with_api_url(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder().timeout(SINK_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl MetricSink for DatadogSink {
    async fn record_stage_completed(
        &self,
        _team_name: &str,
        quest: QuestIndex,
    ) -> Result<(), TelemetryError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("DD-API-KEY", &self.api_key)
            .json(&stage_payload(quest))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Status {
                status: status.as_u16(),
            });
        }

        debug!("sent stage metric '{}'", quest.stage_tag());
        Ok(())
    }
}

/// Sink selected from configuration: Datadog when a key is present,
/// otherwise a no-op.
pub enum ConfiguredSink {
    /// Metrics ship to Datadog.
    Datadog(DatadogSink),
    /// Metrics are disabled.
    Disabled(NullSink),
}

#[async_trait]
impl MetricSink for ConfiguredSink {
    async fn record_stage_completed(
        &self,
        team_name: &str,
        quest: QuestIndex,
    ) -> Result<(), TelemetryError> {
        match self {
            Self::Datadog(sink) => sink.record_stage_completed(team_name, quest).await,
            Self::Disabled(sink) => sink.record_stage_completed(team_name, quest).await,
        }
    }
}

/// Sink for deployments without analytics.
pub struct NullSink;

#[async_trait]
impl MetricSink for NullSink {
    async fn record_stage_completed(
        &self,
        _team_name: &str,
        _quest: QuestIndex,
    ) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Sink that captures notifications, for tests and fixtures.
#[derive(Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<(String, QuestIndex)>>,
    failing: AtomicBool,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent notification fail (still recorded).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Notifications observed so far, in order.
    pub fn notifications(&self) -> Vec<(String, QuestIndex)> {
        self.notifications
            .lock()
            .map(|notifications| notifications.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MetricSink for RecordingSink {
    async fn record_stage_completed(
        &self,
        team_name: &str,
        quest: QuestIndex,
    ) -> Result<(), TelemetryError> {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push((team_name.to_string(), quest));
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(TelemetryError::Status { status: 503 });
        }
        Ok(())
    }
}
