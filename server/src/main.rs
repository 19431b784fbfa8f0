// server/src/main.rs

use actix_web::{middleware::NormalizePath, web as actix_data, App, HttpServer};
use foodgram::Store;
use foodgram_server::config::{AppConfig, LogFormat};
use foodgram_server::db::PgStore;
use foodgram_server::state::AppState;
use foodgram_server::web::configure_app_routes;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  let app_config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
  init_tracing(app_config.log_format);

  tracing::info!("Starting recipe service...");

  let store = PgStore::connect(&app_config.database_url, app_config.database_max_connections)
    .await
    .map_err(|e| {
      tracing::error!(error = %e, "Failed to connect to the database.");
      io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
    })?;
  tracing::info!("Connected to the database.");

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  let store: Arc<dyn Store> = Arc::new(store);
  let app_state = AppState::new(store, app_config);
  tracing::info!("Request workflows registered.");

  tracing::info!("Binding server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .wrap(NormalizePath::trim())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
