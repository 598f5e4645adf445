use std::{
    io,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use config::{builder::DefaultState, ConfigBuilder, Environment, File, FileFormat};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "echo.toml";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BUFFER_SIZE: usize = 4096;
pub const DEFAULT_BACKLOG: i32 = 10;
pub const DEFAULT_STATIC_FILE: &str = "./www/index.html";

/// Flat settings as read from `echo.toml` and the environment
/// (`SERVER_ADDRESS`, `BUFFER_SIZE`, `BACKLOG`, `STATIC_FILE`,
/// `APP_VERSION`, `APP_SECRET`).
#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_address: SocketAddr,
    pub buffer_size: usize,
    pub backlog: i32,
    pub static_file: PathBuf,
    pub app_version: Option<String>,
    /// Path of a file holding the secret, not the secret itself.
    pub app_secret: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            buffer_size: DEFAULT_BUFFER_SIZE,
            backlog: DEFAULT_BACKLOG,
            static_file: PathBuf::from(DEFAULT_STATIC_FILE),
            app_version: None,
            app_secret: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            ::config::Config::builder()
                .add_source(File::new(CONFIG_FILE, FileFormat::Toml).required(false))
                .add_source(Environment::default()),
        )
    }

    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::from_builder(
            ::config::Config::builder().add_source(File::from_str(source, FileFormat::Toml)),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        if config.buffer_size == 0 {
            return Err(ConfigError::EmptyBuffer);
        }

        Ok(config)
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            address: self.server_address,
            buffer_size: self.buffer_size,
            backlog: self.backlog,
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.app_version.as_deref().filter(|version| !version.is_empty())
    }

    /// Reads the secret file, if one is configured.
    pub fn secret(&self) -> io::Result<Option<String>> {
        match &self.app_secret {
            Some(path) if !path.as_os_str().is_empty() => std::fs::read_to_string(path).map(Some),
            _ => Ok(None),
        }
    }
}

/// Everything the acceptor needs at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub buffer_size: usize,
    pub backlog: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Config::default().server()
    }
}
