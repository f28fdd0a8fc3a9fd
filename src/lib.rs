pub mod api;
pub mod config;
pub mod entities;
pub mod maintenance;
pub mod middleware;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Failed to bind listener: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    Database::connect(options).await
}
