//! Transports (services) and their binding to channels.

use serde::Serialize;

use crate::channel::{Channel, ChannelId};
use crate::stream::Stream;

/// Arena identifier of a linked transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TransportId(pub(crate) usize);

/// A tunable signal source bound to a channel.
///
/// A transport is built and filled in by a backend configurator, then handed
/// to the catalog which sets its owning channel.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    name: String,
    priority: i32,
    backend: String,
    channel: Option<ChannelId>,
    streams: Vec<Stream>,
}

impl Transport {
    /// Create an unconfigured transport with the given priority.
    pub fn new(priority: i32) -> Self {
        Self {
            priority,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Priority; lower values sort first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Name of the backend that configured this transport.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn set_backend(&mut self, backend: impl Into<String>) {
        self.backend = backend.into();
    }

    /// The owning channel, once linked.
    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn add_stream(&mut self, stream: Stream) {
        self.streams.push(stream);
    }

    pub fn extend_streams(&mut self, streams: impl IntoIterator<Item = Stream>) {
        self.streams.extend(streams);
    }
}

/// Hook run when a transport is registered.
///
/// Signal and continuity monitoring live outside the catalog; this is the
/// point where they get attached.
pub trait TransportMonitor: Send {
    fn init(&mut self, id: TransportId, transport: &Transport, channel: &Channel);
}

/// Monitor that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMonitor;

impl TransportMonitor for NoopMonitor {
    fn init(&mut self, _id: TransportId, _transport: &Transport, _channel: &Channel) {}
}

/// Storage for all linked transports.
#[derive(Debug, Default)]
pub(crate) struct TransportRegistry {
    slots: Vec<Transport>,
    /// Global transport set, in registration order.
    registered: Vec<TransportId>,
}

impl TransportRegistry {
    /// Store `transport` as owned by `channel`.
    pub(crate) fn insert(&mut self, mut transport: Transport, channel: ChannelId) -> TransportId {
        let id = TransportId(self.slots.len());
        transport.channel = Some(channel);
        self.slots.push(transport);
        id
    }

    pub(crate) fn get(&self, id: TransportId) -> Option<&Transport> {
        self.slots.get(id.0)
    }

    pub(crate) fn priority(&self, id: TransportId) -> i32 {
        self.get(id).map(Transport::priority).unwrap_or_default()
    }

    pub(crate) fn mark_registered(&mut self, id: TransportId) {
        self.registered.push(id);
    }

    pub(crate) fn registered(&self) -> &[TransportId] {
        &self.registered
    }
}

/// Insert `id` into `list` keeping ascending priority.
///
/// Transports of equal priority keep their insertion order.
pub(crate) fn insert_sorted(
    list: &mut Vec<TransportId>,
    id: TransportId,
    priority: i32,
    priority_of: impl Fn(TransportId) -> i32,
) {
    let pos = list.partition_point(|&other| priority_of(other) <= priority);
    list.insert(pos, id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sorted() {
        let prios = [5, 1, 3];
        let mut list = Vec::new();
        for (i, &p) in prios.iter().enumerate() {
            insert_sorted(&mut list, TransportId(i), p, |id| prios[id.0]);
        }
        assert_eq!(list, vec![TransportId(1), TransportId(2), TransportId(0)]);
    }

    #[test]
    fn test_insert_sorted_ties_keep_order() {
        let prios = [2, 1, 2, 2];
        let mut list = Vec::new();
        for (i, &p) in prios.iter().enumerate() {
            insert_sorted(&mut list, TransportId(i), p, |id| prios[id.0]);
        }
        assert_eq!(
            list,
            vec![TransportId(1), TransportId(0), TransportId(2), TransportId(3)]
        );
    }

    #[test]
    fn test_transport_new() {
        let mut t = Transport::new(-3);
        t.set_name("iptv:239.0.0.1:1234");
        t.add_stream(Stream::ca(0x0B00, 0x1FF));

        assert_eq!(t.priority(), -3);
        assert_eq!(t.channel(), None);
        assert_eq!(t.streams().len(), 1);
    }
}
