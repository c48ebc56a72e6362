//! Delivery of queued fasts to the remote backend.
//!
//! Completed fasts are first written to the [`Outbox`], then flushed in
//! queue order. Delivery is at-least-once: an item leaves the outbox only
//! after the backend acknowledged it, and a flush stops at the first failure
//! so later fasts never overtake an earlier one.

use crate::api::RemoteSync;
use crate::db::outbox::{Outbox, FAST_COMPLETED};
use crate::libs::fast::CompletedFast;
use anyhow::Result;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncReport {
    pub delivered: usize,
    /// Record id and error of the item that stopped the flush.
    pub failed: Option<(String, String)>,
    /// Unreadable payloads removed from the queue.
    pub dropped: usize,
    /// Items still queued after the flush.
    pub remaining: usize,
}

/// Queues a completed fast for upload.
pub fn enqueue_fast(outbox: &mut Outbox, fast: &CompletedFast) -> Result<i64> {
    let payload = serde_json::to_string(fast)?;
    outbox.enqueue(FAST_COMPLETED, &fast.id, &payload)
}

/// Delivers up to `batch_size` queued items, oldest first.
pub async fn flush<R: RemoteSync>(outbox: &mut Outbox, remote: &R, batch_size: usize) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    for item in outbox.pending(batch_size.max(1))? {
        let fast: CompletedFast = match serde_json::from_str(&item.payload) {
            Ok(fast) => fast,
            Err(e) => {
                warn!(outbox_id = item.id, record_id = %item.record_id, error = %e, "dropping unreadable outbox item");
                outbox.mark_delivered(item.id)?;
                report.dropped += 1;
                continue;
            }
        };

        match remote.upsert_fast(&fast).await {
            Ok(()) => {
                outbox.mark_delivered(item.id)?;
                report.delivered += 1;
                debug!(record_id = %item.record_id, "fast delivered");
            }
            Err(e) => {
                let error = e.to_string();
                outbox.mark_failed(item.id, &error)?;
                warn!(record_id = %item.record_id, attempts = item.attempts + 1, error = %error, "fast delivery failed");
                report.failed = Some((item.record_id, error));
                break;
            }
        }
    }

    report.remaining = outbox.count()?;
    Ok(report)
}
