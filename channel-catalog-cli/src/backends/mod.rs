//! Capture backend configurators.
//!
//! This module provides:
//! - [`DvbBackend`]: services on a mux known to the DVB adapters
//! - [`IptvBackend`]: multicast UDP/RTP services
//! - [`V4lBackend`]: analog services on a V4L capture device
//!
//! [`from_config`] registers them in probing order: DVB, IPTV, V4L.

mod dvb;
mod iptv;
mod v4l;

pub use dvb::DvbBackend;
pub use iptv::IptvBackend;
pub use v4l::V4lBackend;

use channel_catalog::{BackendError, Bootstrap, ConfigEntry, Stream, Transport};

use crate::config::BackendsSection;

/// Build a loader with every backend registered.
pub fn from_config(section: &BackendsSection) -> Bootstrap {
    Bootstrap::new()
        .with_backend(DvbBackend::new(section.dvb.muxes.clone()))
        .with_backend(IptvBackend::new(section.iptv.enabled))
        .with_backend(V4lBackend::new(section.v4l.devices.clone()))
}

/// Add the streams listed in the entry's optional `streams` field.
fn add_streams(entry: &ConfigEntry, transport: &mut Transport) -> Result<(), BackendError> {
    if let Some(list) = entry.get("streams") {
        transport.extend_streams(Stream::parse_list(list)?);
    }
    Ok(())
}

/// Parse a required numeric field.
fn parse_field<T: std::str::FromStr>(entry: &ConfigEntry, field: &str) -> Result<T, BackendError> {
    let value = entry
        .get(field)
        .ok_or_else(|| BackendError::MissingField(field.to_string()))?;
    value.trim().parse().map_err(|_| BackendError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    })
}
