//! Campaign daily-run driver (§4.8 "invoked by an external cron once per
//! day"). Wraps [`CampaignScheduler`] in a loop so the gateway is
//! self-contained in deployments with no operator-managed cron entry,
//! mirroring how [`super::incoming::IncomingProcessor`] and
//! [`super::outgoing::OutgoingProcessor`] wrap their lane in a standing
//! background task rather than a one-shot invocation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use wa_core::campaign::CampaignScheduler;

pub struct CampaignWorker {
    scheduler: Arc<CampaignScheduler>,
    interval: Duration,
}

impl CampaignWorker {
    pub fn new(scheduler: Arc<CampaignScheduler>, interval: Duration) -> Self {
        Self { scheduler, interval }
    }

    /// Run forever, calling [`CampaignScheduler::run_daily`] once per tick.
    /// Each tick is a no-op for campaigns with nothing due that day — the
    /// scheduler itself decides what, if anything, needs sending.
    pub async fn run(self) {
        loop {
            tokio::time::sleep(self.interval).await;
            let today = chrono::Utc::now().date_naive();
            match self.scheduler.run_daily(today).await {
                Ok(report) => info!(?report, "campaign daily run complete"),
                Err(e) => warn!(error = %e, "campaign daily run failed"),
            }
        }
    }
}
