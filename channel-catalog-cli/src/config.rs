//! Configuration file format.
//!
//! ```toml
//! [logging]
//! log_dir = "logs"
//! level = "info"
//!
//! [backends.dvb]
//! muxes = ["11837000:H"]
//!
//! [[channel]]
//! name = "News"
//! group = "Info"
//!
//! [[service]]
//! channel = "News"
//! prio = 2
//! dvbmux = "11837000:H"
//! ```

use std::path::Path;

use channel_catalog::{ConfigEntry, ConfigSource, CHANNEL_KIND, SERVICE_KIND};
use log::warn;
use serde::Deserialize;
use thiserror::Error;

/// Errors from reading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub backends: BackendsSection,
    #[serde(default)]
    pub channel: Vec<toml::Table>,
    #[serde(default)]
    pub service: Vec<toml::Table>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoggingSection {
    pub log_dir: Option<String>,
    pub retention_days: Option<u64>,
    pub level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct BackendsSection {
    #[serde(default)]
    pub dvb: DvbSection,
    #[serde(default)]
    pub iptv: IptvSection,
    #[serde(default)]
    pub v4l: V4lSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct DvbSection {
    /// Muxes known to the DVB adapters.
    #[serde(default)]
    pub muxes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct IptvSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for IptvSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct V4lSection {
    /// Capture device paths.
    #[serde(default)]
    pub devices: Vec<String>,
}

fn default_true() -> bool {
    true
}

pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, ConfigFileError> {
    Ok(toml::from_str(contents)?)
}

impl ConfigFile {
    /// Turn the `[[channel]]` and `[[service]]` tables into catalog entries.
    pub fn to_source(&self) -> ConfigSource {
        let channels = self.channel.iter().map(|t| table_to_entry(CHANNEL_KIND, t));
        let services = self.service.iter().map(|t| table_to_entry(SERVICE_KIND, t));
        channels.chain(services).collect()
    }
}

fn table_to_entry(kind: &str, table: &toml::Table) -> ConfigEntry {
    let mut entry = ConfigEntry::new(kind);
    for (key, value) in table {
        match value_to_string(value) {
            Some(v) => entry.set(key.as_str(), v),
            None => warn!("Ignoring {} field '{}': unsupported value type", kind, key),
        }
    }
    entry
}

/// Stringify a scalar, or an array of scalars as a comma separated list.
fn value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(if *b { "1" } else { "0" }.to_string()),
        toml::Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Option<Vec<_>>>()
            .map(|items| items.join(",")),
        toml::Value::Datetime(_) | toml::Value::Table(_) => None,
    }
}
