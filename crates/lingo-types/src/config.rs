use clap::Parser;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Storage settings shared by server and CLI
#[derive(Debug, Clone, Parser)]
pub struct BackendConfig {
    #[arg(
        long,
        env = "LINGO_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/lingo.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "LINGO_DATA_DIR",
        help = "Data directory (database, secrets, configs), default is system default like ~/.local/share/lingo",
        default_value_t = default_data_dir()
    )]
    data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("lingo"))
        .unwrap_or_else(|| PathBuf::from("lingo"))
        .to_string_lossy()
        .to_string()
}

impl BackendConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/lingo.db", self.data_dir))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url().trim().is_empty() {
            return Err(ConfigError::new("Database URL must not be empty"));
        }
        let data_dir = self.data_dir();
        if data_dir.exists() && !data_dir.is_dir() {
            return Err(ConfigError::new(format!(
                "Data directory {} is not a directory",
                data_dir.display()
            )));
        }
        Ok(())
    }

    /// Creates data directory if missing
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_url() {
        let config = BackendConfig::try_parse_from(["test", "--data-dir", "/tmp/lingo-x"]).unwrap();
        assert_eq!(config.database_url(), "sqlite:///tmp/lingo-x/lingo.db");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_database_url() {
        let config = BackendConfig::try_parse_from(["test", "--database-url", " "]).unwrap();
        assert!(config.validate().is_err());
    }
}
