use crm_service::config::CrmConfig;
use crm_service::services::init_metrics;
use crm_service::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = CrmConfig::load()?;

    init_tracing(
        &config.observability.service_name,
        &config.common.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );
    init_metrics();

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
