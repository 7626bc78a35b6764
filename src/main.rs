use meter_reader::models::config::AppConfig;
use meter_reader::services::scheduler;
use meter_reader::services::tick::TickRunner;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A local .env is optional; deployments set the environment directly.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let runner = match TickRunner::new(&config) {
        Ok(runner) => runner,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            std::process::exit(1);
        }
    };

    info!(meter = %config.meter_name, image_url = %config.image_url, "meter reader started");
    scheduler::run(&config.schedule, &runner).await;
}
