//! IPTV services.

use std::net::IpAddr;

use channel_catalog::{BackendConfigurator, BackendError, ConfigEntry, Transport};

/// Supported encapsulations.
const MODES: [&str; 2] = ["rawudp", "rtp"];

/// Configures multicast IPTV services.
///
/// The `iptv` field selects the encapsulation (`rawudp` or `rtp`); `group`
/// and `port` are required, `interface` is optional.
#[derive(Debug, Clone)]
pub struct IptvBackend {
    enabled: bool,
}

impl IptvBackend {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for IptvBackend {
    fn default() -> Self {
        Self::new(true)
    }
}

impl BackendConfigurator for IptvBackend {
    fn name(&self) -> &str {
        "IPTV"
    }

    fn field(&self) -> &str {
        "iptv"
    }

    fn configure(
        &self,
        value: &str,
        entry: &ConfigEntry,
        transport: &mut Transport,
    ) -> Result<(), BackendError> {
        if !self.enabled {
            return Err(BackendError::Disabled(self.name().to_string()));
        }

        let mode = value.trim().to_ascii_lowercase();
        if !MODES.contains(&mode.as_str()) {
            return Err(BackendError::InvalidField {
                field: "iptv".to_string(),
                value: value.to_string(),
            });
        }

        let group: IpAddr = super::parse_field(entry, "group")?;
        if !group.is_multicast() {
            return Err(BackendError::InvalidField {
                field: "group".to_string(),
                value: group.to_string(),
            });
        }
        let port: u16 = super::parse_field(entry, "port")?;
        if port == 0 {
            return Err(BackendError::InvalidField {
                field: "port".to_string(),
                value: port.to_string(),
            });
        }

        let name = match entry.get("interface") {
            Some(iface) => format!("iptv:{}:{}:{}@{}", mode, group, port, iface),
            None => format!("iptv:{}:{}:{}", mode, group, port),
        };

        super::add_streams(entry, transport)?;
        transport.set_name(name);
        transport.set_backend(self.name());
        Ok(())
    }
}
