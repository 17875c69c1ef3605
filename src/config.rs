use config::{Config, Environment, File};
use handle_errors::Error as CustomError;
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "CONTACT_STORE";

/// A single `host[:port]` or an ordered seed list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Hosts {
    One(String),
    Many(Vec<String>),
}

impl Hosts {
    pub fn joined(&self) -> String {
        match self {
            Hosts::One(host) => host.clone(),
            Hosts::Many(hosts) => hosts.join(","),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub host: Hosts,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub replica_set: Option<String>,
    pub database: String,
    #[serde(default = "default_contacts_collection")]
    pub contacts_collection: String,
    #[serde(default = "default_links_collection")]
    pub links_collection: String,
    #[serde(default = "default_counters_collection")]
    pub counters_collection: String,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub operation_timeout_secs: Option<u64>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_contacts_collection() -> String {
    "associatedContacts".to_string()
}

fn default_links_collection() -> String {
    "contactsLinks".to_string()
}

fn default_counters_collection() -> String {
    "counters".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Loads `.env`, then the optional `setup` file, then `CONTACT_STORE_*`
    /// environment variables (highest precedence).
    pub fn load() -> Result<Self, CustomError> {
        dotenv::dotenv().ok();
        Self::from_sources("setup")
    }

    pub fn from_sources(file_name: &str) -> Result<Self, CustomError> {
        let config = Config::builder()
            .add_source(File::with_name(file_name).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;
        let settings = config.try_deserialize::<Settings>()?;
        Ok(settings)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_secs.map(Duration::from_secs)
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}
