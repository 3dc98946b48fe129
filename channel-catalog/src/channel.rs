//! Channels.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::group::GroupId;
use crate::sanitize;
use crate::tag::Tag;
use crate::transport::TransportId;

/// Arena identifier of a channel.
///
/// Channels are never removed, so the identifier doubles as the channel
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChannelId(pub(crate) u32);

impl ChannelId {
    /// The channel index this identifier refers to.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Reference to an EPG event queued on a channel.
///
/// The EPG database owns the events; the catalog only holds the queue.
pub type EpgEventId = u32;

/// A user-facing broadcast outlet.
#[derive(Debug, Clone)]
pub struct Channel {
    name: String,
    sanitized_name: String,
    index: u32,
    tag: Tag,
    pub(crate) group: GroupId,
    pub(crate) transports: Vec<TransportId>,
    pub(crate) teletext_rundown: Option<i32>,
    epg_events: VecDeque<EpgEventId>,
}

impl Channel {
    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL-safe slug of the display name.
    pub fn sanitized_name(&self) -> &str {
        &self.sanitized_name
    }

    /// Printable form of the display name, as used in log records.
    pub fn printable_name(&self) -> String {
        sanitize::to_printable(&self.name)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The group this channel is a member of.
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Bound transports, ascending by priority.
    pub fn transports(&self) -> &[TransportId] {
        &self.transports
    }

    pub fn teletext_rundown(&self) -> Option<i32> {
        self.teletext_rundown
    }

    pub fn epg_events(&self) -> &VecDeque<EpgEventId> {
        &self.epg_events
    }
}

/// Storage for all channels.
#[derive(Debug, Default)]
pub(crate) struct ChannelRegistry {
    channels: Vec<Channel>,
    by_name: HashMap<String, ChannelId>,
}

/// Key used for case-insensitive name lookups.
fn name_key(name: &str) -> String {
    name.to_lowercase()
}

impl ChannelRegistry {
    pub(crate) fn find(&self, name: &str) -> Option<ChannelId> {
        self.by_name.get(&name_key(name)).copied()
    }

    /// Allocate a new channel with the next index.
    ///
    /// The caller must place the channel in a group right away.
    pub(crate) fn create(&mut self, name: &str, tag: Tag, group: GroupId) -> ChannelId {
        let index = self.channels.len() as u32;
        let id = ChannelId(index);
        self.channels.push(Channel {
            name: name.to_string(),
            sanitized_name: sanitize::slug(name),
            index,
            tag,
            group,
            transports: Vec::new(),
            teletext_rundown: None,
            epg_events: VecDeque::new(),
        });
        self.by_name.insert(name_key(name), id);
        id
    }

    pub(crate) fn get(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: ChannelId) -> Option<&mut Channel> {
        self.channels.get_mut(id.0 as usize)
    }

    pub(crate) fn by_index(&self, index: u32) -> Option<ChannelId> {
        self.get(ChannelId(index)).map(|_| ChannelId(index))
    }

    pub(crate) fn by_tag(&self, tag: Tag) -> Option<ChannelId> {
        self.channels
            .iter()
            .find(|ch| ch.tag == tag)
            .map(|ch| ChannelId(ch.index))
    }

    /// Iterate over all channels in index order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (ChannelId, &Channel)> + '_ {
        self.channels.iter().map(|ch| (ChannelId(ch.index), ch))
    }

    pub(crate) fn len(&self) -> usize {
        self.channels.len()
    }
}
