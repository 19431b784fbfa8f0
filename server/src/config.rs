// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "pretty" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,
  /// Absolute origin used for pagination links.
  pub app_base_url: String,
  pub page_size: u32,
  pub max_page_size: u32,
  pub log_format: LogFormat,
}

fn parse_var<T>(name: &str, default: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  env::var(name)
    .unwrap_or_else(|_| default.to_string())
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = parse_var::<u16>("SERVER_PORT", "8080")?;
    let database_url = env::var("DATABASE_URL")
      .map_err(|e| AppError::Config(format!("Missing environment variable 'DATABASE_URL': {}", e)))?;
    let database_max_connections = parse_var::<u32>("DATABASE_MAX_CONNECTIONS", "5")?;
    let app_base_url = env::var("APP_BASE_URL")
      .unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port))
      .trim_end_matches('/')
      .to_string();
    let page_size = parse_var::<u32>("PAGE_SIZE", "6")?;
    let max_page_size = parse_var::<u32>("MAX_PAGE_SIZE", "100")?;
    if page_size == 0 || max_page_size < page_size {
      return Err(AppError::Config(format!(
        "PAGE_SIZE ({}) must be positive and not exceed MAX_PAGE_SIZE ({})",
        page_size, max_page_size
      )));
    }
    let log_format = parse_var::<LogFormat>("LOG_FORMAT", "pretty")?;

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      app_base_url,
      page_size,
      max_page_size,
      log_format,
    })
  }
}
