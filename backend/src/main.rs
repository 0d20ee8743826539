use anyhow::Context;
use shared::Topic;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitebook::infrastructure::bootstrap;
use sitebook::infrastructure::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let dashboard = bootstrap::start(&config).await?;

    for topic in [Topic::ProjectsUpdated, Topic::UsersUpdated, Topic::ApplicationsUpdated] {
        dashboard.bus().subscribe(topic, |event| {
            info!(collection = %event.collection(), event_id = %event.event_id, "collection changed");
        });
    }

    info!(
        mode = ?dashboard.mode(),
        live = dashboard.is_live(),
        projects = dashboard.projects().len(),
        users = dashboard.users().len(),
        applications = dashboard.applications().len(),
        "Sitebook dashboard core running"
    );

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    info!("shutting down");
    Ok(())
}
