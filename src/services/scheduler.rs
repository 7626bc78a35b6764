use crate::models::config::TickSchedule;
use crate::services::tick::TickRunner;
use tokio::time::sleep;
use tracing::{error, info};

/// Drives the tick loop: sleep until the next fire, run one tick to
/// completion, then schedule the next. Ticks never overlap because the
/// next fire is only computed after `run_tick` resolves.
pub async fn run(schedule: &TickSchedule, runner: &TickRunner) {
    loop {
        let Some(wait) = schedule.next_wait() else {
            error!("schedule has no upcoming fire, stopping");
            return;
        };

        info!(wait_secs = wait.as_secs(), "waiting for next tick");
        sleep(wait).await;

        match runner.run_tick().await {
            Ok(summary) => info!(
                pages = summary.pages,
                lines = summary.lines,
                submitted = summary.submitted,
                skipped = summary.skipped,
                failed = summary.failed,
                "tick complete"
            ),
            Err(e) => error!(error = %e, "tick aborted"),
        }
    }
}
