use std::path::PathBuf;

use thiserror::Error;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub uploads_dir: PathBuf,
    pub cors_origins: Vec<String>,
    pub seed_defaults: bool,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl Config {
    /// Reads the configuration from the environment, loading `.env` first.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://lb_premium.db?mode=rwc".to_string());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));
        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|value| parse_origins(&value))
            .unwrap_or_else(|_| vec!["http://localhost:3000".to_string()]);
        let seed_defaults = match std::env::var("SEED_DEFAULTS") {
            Ok(value) => parse_bool(&value)
                .ok_or_else(|| ConfigError::InvalidValue("SEED_DEFAULTS", value))?,
            Err(_) => true,
        };

        Ok(Config {
            database_url,
            bind_addr,
            uploads_dir,
            cors_origins,
            seed_defaults,
        })
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.to_string())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        let origins = parse_origins(" http://a.test , ,http://b.test");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn bool_values() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
