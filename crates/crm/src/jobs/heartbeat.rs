//! Liveness heartbeat.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::CrmApi;
use crate::error::JobError;
use crate::jobs::Job;
use crate::sink::LogSink;

/// Heartbeat lines carry a day-first timestamp, unlike the other jobs.
const HEARTBEAT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y-%H:%M:%S";

/// Appends an alive line, then records whether the store answers.
pub struct HeartbeatJob {
    api: CrmApi,
    sink: Arc<dyn LogSink>,
}

impl HeartbeatJob {
    /// Heartbeat job writing to the given sink.
    #[must_use]
    pub fn new(api: CrmApi, sink: Arc<dyn LogSink>) -> Self {
        Self { api, sink }
    }
}

#[async_trait]
impl Job for HeartbeatJob {
    fn name(&self) -> &'static str {
        "heartbeat"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<(), JobError> {
        let timestamp = now.format(HEARTBEAT_TIMESTAMP_FORMAT);
        self.sink.append(&format!("{timestamp} CRM is alive"))?;

        // The store check is best effort; its failure is recorded in the
        // log but does not fail the heartbeat itself.
        match self.api.ping().await {
            Ok(()) => {
                self.sink
                    .append(&format!("{timestamp} query endpoint responsive"))?;
            }
            Err(err) => {
                self.sink
                    .append(&format!("{timestamp} query check failed: {err}"))?;
                tracing::warn!(error = %err, "Heartbeat store check failed");
            }
        }
        Ok(())
    }
}
