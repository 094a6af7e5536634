use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use coolwatch::{
    api::{ApiState, spawn_api_server},
    config::read_config_file,
    sensors::SystemSensors,
    storage::{StorageBackend, sqlite::SqliteBackend},
    tasks::{CollectorTask, FanControlTask, Supervisor},
};
use tracing::{debug, info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
#[command(name = "coolwatchd")]
#[command(about = "Host telemetry and fan control daemon", long_about = None)]
struct Args {
    /// Config file
    #[arg(short)]
    file: String,

    /// Override the API bind address from the config file
    #[arg(long)]
    host: Option<std::net::IpAddr>,

    /// Override the API port from the config file
    #[arg(long)]
    port: Option<u16>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("coolwatch", LevelFilter::TRACE),
        ("coolwatchd", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = read_config_file(&args.file)?;

    let backend: Arc<dyn StorageBackend> = Arc::new(SqliteBackend::new(&config.database.path).await?);

    let mut supervisor = Supervisor::new(Duration::from_secs(config.tasks.shutdown_grace_seconds));

    if config.tasks.metrics.enabled {
        let sensors = SystemSensors::new(config.fan_control.level_read_path.clone());
        supervisor.register(CollectorTask::spawn(
            &config.tasks.metrics,
            sensors,
            backend.clone(),
        ));
    } else {
        info!("metrics collection disabled by configuration");
    }

    if config.fan_control.enabled {
        if config.fan_control.control_path.is_some() && config.fan_control.enable_path.is_some() {
            let sensors = SystemSensors::new(config.fan_control.level_read_path.clone());
            supervisor.register(FanControlTask::spawn(&config.fan_control, sensors));
        } else {
            warn!("fan control enabled but control_path/enable_path missing, not starting task");
        }
    }

    debug!("running {} background task(s)", supervisor.task_count());

    let bind_addr = SocketAddr::new(
        args.host.unwrap_or(config.api.host),
        args.port.unwrap_or(config.api.port),
    );
    spawn_api_server(bind_addr, ApiState::new(backend.clone())).await?;

    tokio::signal::ctrl_c().await?;
    info!("received shutdown signal");

    // Tasks first so nothing writes through a closing pool.
    supervisor.shutdown().await;
    if let Err(e) = backend.close().await {
        warn!("failed to close storage backend cleanly: {e}");
    }

    info!("shutdown complete");
    Ok(())
}
