// ABOUTME: Durable per-request audit recording
// grounded on the teacher's `database_plugins::DatabaseProvider` trait abstraction,
// with bounded enqueue + at-most-one-retry-then-log-and-drop per SPEC_FULL.md §4.6

use crate::models::AuditRecord;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Where audit records ultimately land. The persistent SQL store behind a
/// production `AuditSink` is out of scope here; this trait is the seam a
/// real implementation would fill in.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord) -> Result<(), String>;
}

/// An `AuditSink` that appends JSON lines to an in-memory buffer, useful
/// for tests and for the thin demonstration binary.
#[derive(Default)]
pub struct InMemoryAuditSink {
    records: tokio::sync::Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<(), String> {
        self.records.lock().await.push(record);
        Ok(())
    }
}

/// Records exactly one `AuditRecord` per request. Enqueue is bounded: if
/// the channel is full, the recorder retries once synchronously against
/// the sink and, failing that, logs the record and drops it rather than
/// blocking the request path or losing the invariant silently.
pub struct AuditRecorder {
    sender: mpsc::Sender<AuditRecord>,
}

impl AuditRecorder {
    /// Spawn the background task that drains the channel into `sink`.
    /// `capacity` bounds the channel; a full channel falls back to a
    /// synchronous retry inside `submit`.
    #[must_use]
    pub fn spawn(sink: std::sync::Arc<dyn AuditSink>, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<AuditRecord>(capacity);
        tokio::spawn(async move {
            while let Some(record) = receiver.recv().await {
                if let Err(err) = sink.record(record.clone()).await {
                    tracing::error!(request_id = %record.request_id, error = %err, "audit record dropped after background write failure");
                }
            }
        });
        Self { sender }
    }

    /// Submit a record for durable recording. On a full channel, retries
    /// once synchronously then logs-and-drops rather than blocking.
    pub async fn submit(&self, record: AuditRecord, sink: &dyn AuditSink) {
        match self.sender.try_send(record.clone()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_) | mpsc::error::TrySendError::Closed(_)) => {
                if let Err(err) = sink.record(record.clone()).await {
                    tracing::error!(
                        request_id = %record.request_id,
                        error = %err,
                        "audit record dropped: channel full and synchronous retry failed"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuditOutcome;
    use chrono::Utc;
    use std::sync::Arc;
    use uuid::Uuid;

    fn sample_record() -> AuditRecord {
        AuditRecord {
            request_id: Uuid::new_v4(),
            user_id: "u1".to_owned(),
            conversation_id: Some("c1".to_owned()),
            outcome: AuditOutcome::Completed,
            iterations: 1,
            tool_calls: vec![],
            input_tokens: 10,
            output_tokens: 5,
            cached_tokens: 0,
            estimated_cost_usd: 0.0001,
            error_tag: None,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn records_exactly_one_entry_per_submission() {
        let sink = Arc::new(InMemoryAuditSink::new());
        let recorder = AuditRecorder::spawn(sink.clone(), 8);
        recorder.submit(sample_record(), sink.as_ref()).await;

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(sink.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn synchronous_fallback_still_records_when_channel_closed() {
        let sink = Arc::new(InMemoryAuditSink::new());
        // Dropping the receiver up front makes every `try_send` fail,
        // exercising the synchronous fallback path for each submission.
        let (sender, receiver) = mpsc::channel::<AuditRecord>(1);
        drop(receiver);
        let recorder = AuditRecorder { sender };
        recorder.submit(sample_record(), sink.as_ref()).await;
        recorder.submit(sample_record(), sink.as_ref()).await;

        assert_eq!(sink.snapshot().await.len(), 2);
    }
}
