//! Generic lane worker: receive, heartbeat, dispatch to a [`JobProcessor`],
//! then delete/release/dead-letter based on the outcome.
//!
//! Grounded in the claim → extend-visibility-heartbeat → process →
//! ack/nack control flow of the original message processor, re-expressed
//! with an explicit [`tokio::task::JoinHandle`] abort for the heartbeat
//! instead of relying on structured cancellation a `finally` block would
//! give in a language with coroutines.

use super::{Envelope, JobProcessor, JobResult, MessageQueue};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};

pub struct Worker<P> {
    queue: Arc<dyn MessageQueue>,
    processor: Arc<P>,
}

impl<P> Worker<P>
where
    P: JobProcessor + 'static,
{
    pub fn new(queue: Arc<dyn MessageQueue>, processor: P) -> Self {
        Self { queue, processor: Arc::new(processor) }
    }

    /// Run the worker loop until the process is killed. Intended to be
    /// spawned as its own Tokio task per lane.
    pub async fn run(self) {
        let lanes = self.processor.lanes();
        let poll_interval = self.processor.poll_interval();
        let visibility_timeout = self.processor.visibility_timeout();
        let max_concurrent = self.processor.max_concurrent_jobs();
        let semaphore = Arc::new(Semaphore::new(max_concurrent));

        info!(?lanes, "worker started");

        loop {
            let mut received_any = false;

            for lane in &lanes {
                let permits_available = semaphore.available_permits();
                if permits_available == 0 {
                    continue;
                }

                let batch = match self.queue.receive(*lane, permits_available, visibility_timeout).await {
                    Ok(batch) => batch,
                    Err(e) => {
                        error!(lane = lane.as_str(), error = %e, "failed to receive from lane");
                        continue;
                    }
                };

                for receipt in batch {
                    received_any = true;
                    let permit = semaphore.clone().acquire_owned().await.expect("semaphore closed");
                    let queue = self.queue.clone();
                    let processor = self.processor.clone();
                    let lane = *lane;

                    tokio::spawn(async move {
                        handle_one(queue, processor, lane, receipt.envelope, receipt.receipt_handle, visibility_timeout)
                            .await;
                        drop(permit);
                    });
                }
            }

            if !received_any {
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
}

#[instrument(skip(queue, processor, envelope), fields(envelope_id = %envelope.id))]
async fn handle_one<P: JobProcessor + ?Sized>(
    queue: Arc<dyn MessageQueue>,
    processor: Arc<P>,
    lane: super::Lane,
    envelope: Envelope,
    receipt_handle: String,
    visibility_timeout: Duration,
) {
    let heartbeat = {
        let queue = queue.clone();
        let handle = receipt_handle.clone();
        tokio::spawn(async move {
            let interval = visibility_timeout / 3;
            loop {
                tokio::time::sleep(interval).await;
                if let Err(e) = queue.extend_visibility(lane, &handle, visibility_timeout).await {
                    warn!(error = %e, "failed to extend visibility");
                }
            }
        })
    };

    let result = processor.process(&envelope).await;
    heartbeat.abort();

    match result {
        JobResult::Success => {
            if let Err(e) = queue.delete(lane, &receipt_handle).await {
                error!(error = %e, "failed to delete completed envelope");
            }
        }
        JobResult::RetryableFailure(reason) => {
            warn!(reason = %reason, "job failed, releasing for retry");
            if let Err(e) = queue.release(lane, &receipt_handle, Duration::from_secs(30)).await {
                error!(error = %e, "failed to release envelope");
            }
        }
        JobResult::PermanentFailure(reason) => {
            if let Err(e) = queue.dead_letter(lane, &receipt_handle, &reason).await {
                error!(error = %e, "failed to dead-letter envelope");
            }
        }
    }
}
