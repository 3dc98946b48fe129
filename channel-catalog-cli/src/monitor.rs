//! Transport monitoring hook.

use channel_catalog::{Channel, Transport, TransportId, TransportMonitor};
use log::info;

/// Logs every transport as it goes live.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMonitor;

impl TransportMonitor for LogMonitor {
    fn init(&mut self, id: TransportId, transport: &Transport, channel: &Channel) {
        info!(
            "Monitoring {} service \"{}\" ({:?}, prio {}) on channel \"{}\"",
            transport.backend(),
            transport.name(),
            id,
            transport.priority(),
            channel.printable_name()
        );
    }
}
