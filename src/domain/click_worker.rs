//! Background worker draining the click queue into daily counters.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::StatsRepository;

/// Attempts per event, including the first one.
const MAX_ATTEMPTS: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// Each event increments the `(link, day)` counter. Store failures are retried
/// with jittered exponential backoff and then dropped; a lost click never
/// affects the redirect that produced it.
pub async fn run_click_worker<R>(mut rx: mpsc::Receiver<ClickEvent>, stats_repository: Arc<R>)
where
    R: StatsRepository + ?Sized,
{
    while let Some(event) = rx.recv().await {
        record_click(stats_repository.as_ref(), &event).await;
    }

    debug!("Click queue closed, worker exiting");
}

async fn record_click<R>(stats_repository: &R, event: &ClickEvent)
where
    R: StatsRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(std::time::Duration::from_millis(500))
        .map(jitter)
        .take(MAX_ATTEMPTS - 1);

    let day = event.day();
    let result = Retry::start(strategy, move || {
        stats_repository.increment_daily(&event.code, day)
    })
    .await;

    match result {
        Ok(true) => metrics::counter!("shortlink_clicks_recorded_total").increment(1),
        Ok(false) => debug!(code = %event.code, "Click for unknown code ignored"),
        Err(e) => {
            metrics::counter!("shortlink_clicks_dropped_total", "reason" => "store_error").increment(1);
            warn!(code = %event.code, error = %e, "Failed to record click");
        }
    }
}
