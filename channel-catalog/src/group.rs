//! Channel groups.
//!
//! Groups partition the channels: every channel is a member of exactly one
//! group. The default group always exists and cannot be destroyed.

use std::collections::VecDeque;

use serde::Serialize;

use crate::channel::ChannelId;
use crate::tag::{Tag, TagSource};

/// Name of the protected default group.
pub const DEFAULT_GROUP_NAME: &str = "Uncategorized";

/// Arena identifier of a channel group.
///
/// Identifiers of destroyed groups are never handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(pub(crate) usize);

/// A named set of channels.
#[derive(Debug, Clone)]
pub struct ChannelGroup {
    name: String,
    tag: Tag,
    members: Vec<ChannelId>,
    protected: bool,
}

impl ChannelGroup {
    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Member channels in membership order.
    pub fn members(&self) -> &[ChannelId] {
        &self.members
    }

    /// Whether this group can be destroyed.
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    pub fn contains(&self, channel: ChannelId) -> bool {
        self.members.contains(&channel)
    }
}

/// Storage for all groups.
#[derive(Debug)]
pub(crate) struct GroupRegistry {
    slots: Vec<Option<ChannelGroup>>,
    /// Global group set, most recently created first.
    order: VecDeque<GroupId>,
    default: GroupId,
}

impl GroupRegistry {
    /// Create the registry holding only the protected default group.
    pub(crate) fn new(tags: &mut dyn TagSource) -> Self {
        let mut registry = Self {
            slots: Vec::new(),
            order: VecDeque::new(),
            default: GroupId(0),
        };
        let default = registry.create(DEFAULT_GROUP_NAME, tags.next_tag());
        if let Some(group) = registry.get_mut(default) {
            group.protected = true;
        }
        registry.default = default;
        registry
    }

    pub(crate) fn default_group(&self) -> GroupId {
        self.default
    }

    /// Exact-match lookup by name.
    pub(crate) fn find(&self, name: &str) -> Option<GroupId> {
        self.iter().find(|(_, g)| g.name == name).map(|(id, _)| id)
    }

    /// Insert a new group at the head of the group set.
    pub(crate) fn create(&mut self, name: &str, tag: Tag) -> GroupId {
        let id = GroupId(self.slots.len());
        self.slots.push(Some(ChannelGroup {
            name: name.to_string(),
            tag,
            members: Vec::new(),
            protected: false,
        }));
        self.order.push_front(id);
        id
    }

    pub(crate) fn get(&self, id: GroupId) -> Option<&ChannelGroup> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: GroupId) -> Option<&mut ChannelGroup> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub(crate) fn by_tag(&self, tag: Tag) -> Option<GroupId> {
        self.iter().find(|(_, g)| g.tag == tag).map(|(id, _)| id)
    }

    /// Iterate over the group set in set order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (GroupId, &ChannelGroup)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.get(id).map(|g| (id, g)))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Remove `channel` from the member list of `group`.
    pub(crate) fn detach(&mut self, group: GroupId, channel: ChannelId) {
        if let Some(g) = self.get_mut(group) {
            g.members.retain(|&c| c != channel);
        }
    }

    /// Append `channel` to the member list of `group`.
    pub(crate) fn attach(&mut self, group: GroupId, channel: ChannelId) {
        if let Some(g) = self.get_mut(group) {
            g.members.push(channel);
        }
    }

    /// First member of `group`, if any.
    pub(crate) fn first_member(&self, group: GroupId) -> Option<ChannelId> {
        self.get(group).and_then(|g| g.members.first().copied())
    }

    /// Drop `group` from the set and release its slot.
    pub(crate) fn remove(&mut self, group: GroupId) -> Option<ChannelGroup> {
        self.order.retain(|&id| id != group);
        self.slots.get_mut(group.0).and_then(Option::take)
    }
}
