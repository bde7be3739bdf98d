//! advisor-server binary entry point

use advisor_stock::AdvisorConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading configuration
    dotenvy::dotenv().ok();
    advisor_core::init_tracing();

    let config = AdvisorConfig::from_env()?;
    advisor_server::run_server(config).await
}
