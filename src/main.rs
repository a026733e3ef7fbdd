use actix_web::HttpServer;
use busline::{AppConfig, AppState, Database, create_app, ensure_admin};
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    let bind_address = config.server.bind_address.clone();
    let workers = config.server.workers;
    let display_url = config.server.display_url();

    let db = Database::connect(&config.database)
        .await
        .map_err(std::io::Error::other)?;

    match ensure_admin(&db, &config.admin).await {
        Ok(true) => info!(username = %config.admin.username, "Administrator bootstrapped"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "Failed to bootstrap administrator"),
    }
    match db.purge_expired_sessions(Utc::now()).await {
        Ok(purged) if purged > 0 => info!(purged, "Expired sessions removed"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Failed to purge expired sessions"),
    }

    let state = AppState::new(config, db).map_err(std::io::Error::other)?;

    info!(
        version = busline::build_info::VERSION,
        commit = busline::build_info::GIT_SHA,
        "Server running at {display_url}"
    );

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if let Some(workers) = workers {
        server = server.workers(workers);
    }
    server.bind(&bind_address)?.run().await
}
