//! Serializable read-only views of the catalog.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::channel::{Channel, ChannelId};
use crate::stream::Stream;
use crate::tag::Tag;
use crate::transport::Transport;

/// Snapshot of a whole catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub channels: Vec<ChannelSnapshot>,
    pub groups: Vec<GroupSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelSnapshot {
    pub index: u32,
    pub tag: Tag,
    pub name: String,
    pub sanitized_name: String,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teletext_rundown: Option<i32>,
    pub transports: Vec<TransportSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportSnapshot {
    pub name: String,
    pub priority: i32,
    pub backend: String,
    pub streams: Vec<Stream>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSnapshot {
    pub tag: Tag,
    pub name: String,
    pub protected: bool,
    /// Member channel names in membership order.
    pub members: Vec<String>,
}

impl From<&Transport> for TransportSnapshot {
    fn from(t: &Transport) -> Self {
        Self {
            name: t.name().to_string(),
            priority: t.priority(),
            backend: t.backend().to_string(),
            streams: t.streams().to_vec(),
        }
    }
}

impl ChannelSnapshot {
    /// Capture `channel` as currently held by `catalog`.
    pub fn capture(catalog: &Catalog, id: ChannelId) -> Option<Self> {
        let ch: &Channel = catalog.channel(id)?;
        Some(Self {
            index: ch.index(),
            tag: ch.tag(),
            name: ch.name().to_string(),
            sanitized_name: ch.sanitized_name().to_string(),
            group: catalog
                .group(ch.group())
                .map(|g| g.name().to_string())
                .unwrap_or_default(),
            teletext_rundown: ch.teletext_rundown(),
            transports: catalog.channel_transports(id).map(Into::into).collect(),
        })
    }
}

impl Catalog {
    /// Take a snapshot of every channel and group.
    pub fn snapshot(&self) -> CatalogSnapshot {
        let channels = self
            .channels()
            .filter_map(|(id, _)| ChannelSnapshot::capture(self, id))
            .collect();
        let groups = self
            .groups()
            .map(|(_, g)| GroupSnapshot {
                tag: g.tag(),
                name: g.name().to_string(),
                protected: g.is_protected(),
                members: g
                    .members()
                    .iter()
                    .filter_map(|&id| self.channel(id))
                    .map(|ch| ch.name().to_string())
                    .collect(),
            })
            .collect();
        CatalogSnapshot { channels, groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamType;
    use crate::tag::TagAllocator;

    #[test]
    fn test_snapshot_json() {
        let mut catalog = Catalog::with_tags(TagAllocator::new(10));
        let ch = catalog.get_or_create_channel("BBC One");
        let mut t = Transport::new(2);
        t.set_name("dvb:mux1");
        t.set_backend("DVB");
        t.add_stream(Stream::new(StreamType::Mpeg2Video, 0x100));
        catalog.register_transport(t, ch).unwrap();

        let snapshot = catalog.snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["channels"][0]["name"], "BBC One");
        assert_eq!(json["channels"][0]["sanitized_name"], "bbc-one");
        assert_eq!(json["channels"][0]["tag"], 11);
        assert_eq!(json["channels"][0]["group"], "Uncategorized");
        assert_eq!(json["channels"][0]["transports"][0]["priority"], 2);
        assert_eq!(json["channels"][0]["transports"][0]["streams"][0]["pid"], 256);
        assert!(json["channels"][0].get("teletext_rundown").is_none());
        assert_eq!(json["groups"][0]["members"][0], "BBC One");
        assert_eq!(json["groups"][0]["protected"], true);
    }
}
