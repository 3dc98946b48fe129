//! DVB services.

use channel_catalog::{BackendConfigurator, BackendError, ConfigEntry, Transport};

/// Configures services carried on a DVB mux.
///
/// The entry's `dvbmux` must name a mux one of the adapters knows about. An
/// optional `service-id` selects the program inside the mux.
#[derive(Debug, Clone, Default)]
pub struct DvbBackend {
    muxes: Vec<String>,
}

impl DvbBackend {
    pub fn new(muxes: Vec<String>) -> Self {
        Self { muxes }
    }
}

impl BackendConfigurator for DvbBackend {
    fn name(&self) -> &str {
        "DVB"
    }

    fn field(&self) -> &str {
        "dvbmux"
    }

    fn configure(
        &self,
        value: &str,
        entry: &ConfigEntry,
        transport: &mut Transport,
    ) -> Result<(), BackendError> {
        if self.muxes.is_empty() {
            return Err(BackendError::NoDevice("no DVB muxes configured".to_string()));
        }
        let mux = self
            .muxes
            .iter()
            .find(|m| m.as_str() == value)
            .ok_or_else(|| BackendError::UnknownMux(value.to_string()))?;

        let name = match entry.get("service-id") {
            Some(raw) => {
                let sid = raw.trim().parse::<u16>().ok().filter(|&sid| sid != 0).ok_or_else(|| {
                    BackendError::InvalidField {
                        field: "service-id".to_string(),
                        value: raw.to_string(),
                    }
                })?;
                format!("dvb:{}/{}", mux, sid)
            }
            None => format!("dvb:{}", mux),
        };

        super::add_streams(entry, transport)?;
        transport.set_name(name);
        transport.set_backend(self.name());
        Ok(())
    }
}
