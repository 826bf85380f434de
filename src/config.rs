use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub appdir: Option<String>,
    #[serde(default)]
    pub dbdir: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// bcrypt work factor used when hashing new passwords.
    #[serde(alias = "bcryptcost", rename = "bcrypt_cost")]
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CorsConfig {
    /// Empty means any origin.
    #[serde(alias = "allowedorigins", rename = "allowed_origins")]
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

fn default_port() -> String {
    "5000".to_string()
}

fn default_bcrypt_cost() -> u32 {
    10
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(path, &content)
    }

    fn from_yaml(path: &str, content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&config.auth.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "bcrypt_cost must be between {} and {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }

        Ok(config)
    }

    /// `PORT` and `DATABASE_URL` from the environment take precedence
    /// over the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(std::env::var("PORT").ok(), std::env::var("DATABASE_URL").ok());
    }

    fn apply_overrides(&mut self, port: Option<String>, database_url: Option<String>) {
        if let Some(port) = port.filter(|p| !p.is_empty()) {
            self.listen.port = port;
        }
        if let Some(url) = database_url.filter(|u| !u.is_empty()) {
            self.database.sqlite = Some(SqliteConfig { filename: url });
        }
    }

    pub fn get_database_path(&self) -> Option<String> {
        if let Some(ref sqlite) = self.database.sqlite {
            return Some(sqlite.filename.clone());
        }

        if let Some(ref dbdir) = self.dbdir {
            let path = PathBuf::from(dbdir).join("movieshelf.db");
            return Some(path.to_string_lossy().to_string());
        }

        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
listen:
  address: 127.0.0.1
  port: "8080"
appdir: ./public
database:
  sqlite:
    filename: /var/lib/movieshelf/shelf.db
auth:
  bcryptcost: 12
cors:
  allowed_origins:
    - http://localhost:5500
"#;
        let config = Config::from_yaml("test.yaml", yaml).unwrap();
        assert_eq!(config.listen.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.listen.port, "8080");
        assert_eq!(config.auth.bcrypt_cost, 12);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5500"]);
        assert_eq!(
            config.get_database_path().as_deref(),
            Some("/var/lib/movieshelf/shelf.db")
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("empty.yaml", "{}").unwrap();
        assert_eq!(config.listen.port, "5000");
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert!(config.get_database_path().is_none());
    }

    #[test]
    fn test_dbdir_and_overrides() {
        let mut config = Config::from_yaml("t.yaml", "dbdir: /tmp/shelf").unwrap();
        assert_eq!(
            config.get_database_path().as_deref(),
            Some("/tmp/shelf/movieshelf.db")
        );

        config.apply_overrides(Some("9000".to_string()), Some("sqlite:x.db".to_string()));
        assert_eq!(config.listen.port, "9000");
        assert_eq!(config.get_database_path().as_deref(), Some("sqlite:x.db"));
    }

    #[test]
    fn test_bad_bcrypt_cost() {
        let err = Config::from_yaml("t.yaml", "auth:\n  bcrypt_cost: 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
