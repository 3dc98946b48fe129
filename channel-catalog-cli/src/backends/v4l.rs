//! Analog capture services.

use channel_catalog::{BackendConfigurator, BackendError, ConfigEntry, Transport};

/// Configures analog services tuned by frequency on a V4L device.
///
/// `v4lmux` holds the frequency in kHz.
#[derive(Debug, Clone, Default)]
pub struct V4lBackend {
    devices: Vec<String>,
}

impl V4lBackend {
    pub fn new(devices: Vec<String>) -> Self {
        Self { devices }
    }
}

impl BackendConfigurator for V4lBackend {
    fn name(&self) -> &str {
        "V4L"
    }

    fn field(&self) -> &str {
        "v4lmux"
    }

    fn configure(
        &self,
        value: &str,
        entry: &ConfigEntry,
        transport: &mut Transport,
    ) -> Result<(), BackendError> {
        let device = self
            .devices
            .first()
            .ok_or_else(|| BackendError::NoDevice("no V4L devices configured".to_string()))?;

        let frequency = value
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&f| f != 0)
            .ok_or_else(|| BackendError::InvalidField {
                field: "v4lmux".to_string(),
                value: value.to_string(),
            })?;

        super::add_streams(entry, transport)?;
        transport.set_name(format!("v4l:{}@{}", frequency, device));
        transport.set_backend(self.name());
        Ok(())
    }
}
