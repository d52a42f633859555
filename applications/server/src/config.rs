/// Server configuration
use crate::error::{Result, ServerError};
use foliofy_identity::CognitoConfig;
use foliofy_market_data::MarketDataConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_cognito")]
    pub cognito: CognitoConfig,

    #[serde(default = "default_cors")]
    pub cors: CorsSettings,

    #[serde(default)]
    pub market_data: MarketDataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Exact origins allowed to call the API with credentials
    #[serde(default = "default_origins")]
    pub origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `config.toml` in the working directory, which may be
    /// absent. Environment variables win over the file:
    /// `FOLIOFY_COGNITO__USER_POOL_ID` sets `cognito.user_pool_id`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path.to_path_buf())),
            None => settings
                .add_source(config::File::from(PathBuf::from("config.toml")).required(false)),
        };

        // Override with environment variables (prefixed with FOLIOFY_)
        settings = settings.add_source(
            config::Environment::with_prefix("FOLIOFY")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.origins")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cognito.user_pool_id.is_empty() {
            return Err(ServerError::Config(
                "Cognito user pool ID is required (set FOLIOFY_COGNITO__USER_POOL_ID)".to_string(),
            ));
        }

        if self.cognito.client_id.is_empty() {
            return Err(ServerError::Config(
                "Cognito client ID is required (set FOLIOFY_COGNITO__CLIENT_ID)".to_string(),
            ));
        }

        if self.cors.origins.is_empty() {
            return Err(ServerError::Config(
                "At least one CORS origin is required".to_string(),
            ));
        }

        if let Some(origin) = self.cors.origins.iter().find(|o| o.as_str() == "*") {
            return Err(ServerError::Config(format!(
                "CORS origin {:?} cannot be combined with credentials",
                origin
            )));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/foliofy.db".to_string()
}

fn default_cognito() -> CognitoConfig {
    CognitoConfig::new("ap-northeast-1", "", "")
}

fn default_cors() -> CorsSettings {
    CorsSettings {
        origins: default_origins(),
    }
}

fn default_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            cognito: default_cognito(),
            cors: default_cors(),
            market_data: MarketDataConfig::default(),
        }
    }
}
