use common::SERVER_PORT;
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

pub const CONFIG_PATH: &str = "./gomind.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't read config file: {0}")]
    Io(#[from] io::Error),
    #[error("Couldn't parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    // Host handed out by the discovery endpoint for clients to connect to
    pub advertised_host: String,
    pub log_directory: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, SERVER_PORT)),
            advertised_host: "127.0.0.1".to_string(),
            log_directory: "./logs".to_string(),
        }
    }
}

impl ServerConfig {
    // A missing file means defaults, anything else unreadable is an error
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(ServerConfig::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }
}
