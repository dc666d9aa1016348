#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use tracing::{debug, info};

mod error;
mod routes;

use error::AppError;
use logger::init_tracing;
use sitepulse::remediation::CLEAR_CACHE;
use sitepulse::{
    ClearCacheAction, Config, EventLog, HttpProbe, Monitor, RemediationDispatcher, Scheduler,
    SiteRegistry,
};

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut config = Config::from_config(None::<&std::path::Path>)?;
    config.apply_env_overrides();
    debug!("{config}");

    let monitor = build_monitor(&config)?;

    // The scheduler task runs for the lifetime of the process.
    let _scheduler = Scheduler::new(
        monitor.clone(),
        Duration::from_secs(config.monitoring.interval_seconds),
        config.monitoring.concurrency,
    )
    .spawn();

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    info!("Monitoring server running on http://{addr}");
    run_server(addr, monitor).await
}

fn build_monitor(config: &Config) -> Result<Arc<Monitor>, AppError> {
    let probe = HttpProbe::new(Duration::from_millis(config.monitoring.probe_timeout_ms))?;
    let dispatcher = RemediationDispatcher::new()
        .with_action(CLEAR_CACHE, Arc::new(ClearCacheAction::from_env()?));

    Ok(Arc::new(Monitor::new(
        Arc::new(SiteRegistry::new()),
        Arc::new(EventLog::new()),
        Arc::new(dispatcher),
        Arc::new(probe),
    )))
}

async fn run_server(addr: SocketAddr, monitor: Arc<Monitor>) -> Result<(), AppError> {
    let monitor = web::Data::from(monitor);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(monitor.clone())
            .configure(routes::routes)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
