use commerce_server::{Config, OrdersManager, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    std::fs::create_dir_all(&config.work_dir)?;
    tracing::info!(
        environment = %config.environment,
        db_path = %config.db_path().display(),
        "Commerce server starting"
    );

    let manager = OrdersManager::new(
        config.db_path(),
        config.return_window_days,
        config.max_id_attempts,
    )?;
    let open_orders = manager.list_all_orders()?.len();
    tracing::info!(open_orders, "Store opened");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    Ok(())
}
