//! The catalog aggregate.
//!
//! [`Catalog`] owns every channel, group and transport. It is a plain value:
//! share it between threads through [`SharedCatalog`] and hold the lock
//! around each call.

use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::channel::{Channel, ChannelId, ChannelRegistry};
use crate::group::{ChannelGroup, GroupId, GroupRegistry};
use crate::tag::{Tag, TagAllocator, TagSource};
use crate::transport::{
    insert_sorted, NoopMonitor, Transport, TransportId, TransportMonitor, TransportRegistry,
};

/// A catalog behind the process-wide lock.
pub type SharedCatalog = Arc<Mutex<Catalog>>;

/// In-memory catalog of channels, channel groups and transports.
pub struct Catalog {
    tags: Box<dyn TagSource>,
    groups: GroupRegistry,
    channels: ChannelRegistry,
    transports: TransportRegistry,
    monitor: Box<dyn TransportMonitor>,
}

impl Catalog {
    /// Create a catalog with a clock-seeded tag allocator.
    pub fn new() -> Self {
        Self::with_tags(TagAllocator::from_clock())
    }

    /// Create a catalog drawing tags from `tags`.
    ///
    /// The protected default group is created immediately.
    pub fn with_tags(tags: impl TagSource + 'static) -> Self {
        let mut tags: Box<dyn TagSource> = Box::new(tags);
        let groups = GroupRegistry::new(tags.as_mut());
        Self {
            tags,
            groups,
            channels: ChannelRegistry::default(),
            transports: TransportRegistry::default(),
            monitor: Box::new(NoopMonitor),
        }
    }

    /// Replace the hook run for every registered transport.
    pub fn set_monitor(&mut self, monitor: impl TransportMonitor + 'static) {
        self.monitor = Box::new(monitor);
    }

    /// Wrap the catalog in the shared lock.
    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(Mutex::new(self))
    }

    // Groups

    /// The protected default group.
    pub fn default_group(&self) -> GroupId {
        self.groups.default_group()
    }

    /// Find a group by exact name.
    pub fn find_group(&self, name: &str) -> Option<GroupId> {
        self.groups.find(name)
    }

    /// Find a group by exact name, creating it at the head of the group set
    /// if absent.
    pub fn get_or_create_group(&mut self, name: &str) -> GroupId {
        if let Some(id) = self.groups.find(name) {
            return id;
        }
        let tag = self.tags.next_tag();
        let id = self.groups.create(name, tag);
        debug!("Created channel group \"{}\" (tag {})", name, tag);
        id
    }

    pub fn group(&self, id: GroupId) -> Option<&ChannelGroup> {
        self.groups.get(id)
    }

    pub fn group_by_tag(&self, tag: Tag) -> Option<GroupId> {
        self.groups.by_tag(tag)
    }

    /// Iterate over all groups, most recently created first.
    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &ChannelGroup)> + '_ {
        self.groups.iter()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Move `channel` into `group`.
    ///
    /// The channel leaves its previous group before joining the tail of the
    /// new one, so setting the current group again only moves it to the
    /// tail. Unknown identifiers are ignored.
    pub fn set_group(&mut self, channel: ChannelId, group: GroupId) {
        if self.groups.get(group).is_none() {
            return;
        }
        let Some(ch) = self.channels.get_mut(channel) else {
            return;
        };
        self.groups.detach(ch.group, channel);
        ch.group = group;
        self.groups.attach(group, channel);
    }

    /// Destroy `group`, moving its members to the default group.
    ///
    /// Destroying the default group does nothing.
    pub fn destroy_group(&mut self, group: GroupId) {
        let default = self.groups.default_group();
        if group == default || self.groups.get(group).is_none() {
            return;
        }
        while let Some(channel) = self.groups.first_member(group) {
            self.set_group(channel, default);
        }
        if let Some(removed) = self.groups.remove(group) {
            debug!("Destroyed channel group \"{}\"", removed.name());
        }
    }

    // Channels

    /// Find a channel by display name, ignoring case.
    pub fn find_channel(&self, name: &str) -> Option<ChannelId> {
        self.channels.find(name)
    }

    /// Find a channel by display name, creating it in the default group if
    /// absent.
    pub fn get_or_create_channel(&mut self, name: &str) -> ChannelId {
        if let Some(id) = self.channels.find(name) {
            return id;
        }
        let tag = self.tags.next_tag();
        let default = self.groups.default_group();
        let id = self.channels.create(name, tag, default);
        self.groups.attach(default, id);
        id
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.channels.get(id)
    }

    pub fn channel_by_index(&self, index: u32) -> Option<ChannelId> {
        self.channels.by_index(index)
    }

    pub fn channel_by_tag(&self, tag: Tag) -> Option<ChannelId> {
        self.channels.by_tag(tag)
    }

    /// Iterate over all channels in index order.
    pub fn channels(&self) -> impl Iterator<Item = (ChannelId, &Channel)> + '_ {
        self.channels.iter()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn set_teletext_rundown(&mut self, channel: ChannelId, value: i32) {
        if let Some(ch) = self.channels.get_mut(channel) {
            ch.teletext_rundown = Some(value);
        }
    }

    // Transports

    /// Bind `transport` to `channel`, keeping the channel's transports
    /// ascending by priority.
    ///
    /// Returns `None` only if `channel` is unknown.
    pub fn link_transport(&mut self, transport: Transport, channel: ChannelId) -> Option<TransportId> {
        self.channels.get(channel)?;
        let priority = transport.priority();
        let id = self.transports.insert(transport, channel);

        let transports = &self.transports;
        let ch = self.channels.get_mut(channel)?;
        insert_sorted(&mut ch.transports, id, priority, |t| transports.priority(t));

        self.log_link(id, channel);
        Some(id)
    }

    /// Link `transport` to `channel`, start its monitoring and add it to the
    /// global transport set.
    pub fn register_transport(
        &mut self,
        transport: Transport,
        channel: ChannelId,
    ) -> Option<TransportId> {
        let id = self.link_transport(transport, channel)?;
        if let (Some(t), Some(ch)) = (self.transports.get(id), self.channels.get(channel)) {
            self.monitor.init(id, t, ch);
        }
        self.transports.mark_registered(id);
        Some(id)
    }

    pub fn transport(&self, id: TransportId) -> Option<&Transport> {
        self.transports.get(id)
    }

    /// Iterate over the global transport set in registration order.
    pub fn transports(&self) -> impl Iterator<Item = (TransportId, &Transport)> + '_ {
        self.transports
            .registered()
            .iter()
            .filter_map(move |&id| self.transports.get(id).map(|t| (id, t)))
    }

    pub fn transport_count(&self) -> usize {
        self.transports.registered().len()
    }

    /// Transports bound to `channel`, ascending by priority.
    pub fn channel_transports(&self, channel: ChannelId) -> impl Iterator<Item = &Transport> + '_ {
        self.channels
            .get(channel)
            .map(|ch| ch.transports())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&id| self.transports.get(id))
    }

    fn log_link(&self, id: TransportId, channel: ChannelId) {
        let (Some(t), Some(ch)) = (self.transports.get(id), self.channels.get(channel)) else {
            return;
        };
        debug!(
            "Added service \"{}\" for channel \"{}\"",
            t.name(),
            ch.printable_name()
        );
        for st in t.streams() {
            debug!("   Stream [{}] - pid {}", st.describe(), st.pid);
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::DEFAULT_GROUP_NAME;
    use crate::stream::{Stream, StreamType};

    fn catalog() -> Catalog {
        Catalog::with_tags(TagAllocator::new(1000))
    }

    fn transport(priority: i32) -> Transport {
        let mut t = Transport::new(priority);
        t.set_name(format!("prio-{}", priority));
        t
    }

    /// Number of groups listing `channel` as a member.
    fn memberships(catalog: &Catalog, channel: ChannelId) -> usize {
        catalog.groups().filter(|(_, g)| g.contains(channel)).count()
    }

    #[test]
    fn test_default_group_exists() {
        let catalog = catalog();
        let default = catalog.group(catalog.default_group()).unwrap();
        assert_eq!(default.name(), DEFAULT_GROUP_NAME);
        assert!(default.is_protected());
        assert_eq!(catalog.find_group(DEFAULT_GROUP_NAME), Some(catalog.default_group()));
    }

    #[test]
    fn test_channel_create_is_idempotent() {
        let mut catalog = catalog();
        let a = catalog.get_or_create_channel("News");
        let b = catalog.get_or_create_channel("NEWS");
        let c = catalog.get_or_create_channel("news");

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(catalog.channel_count(), 1);
        assert_eq!(catalog.channel(a).unwrap().name(), "News");
    }

    #[test]
    fn test_find_channel_without_create() {
        let mut catalog = catalog();
        assert_eq!(catalog.find_channel("News"), None);
        assert_eq!(catalog.channel_count(), 0);

        let id = catalog.get_or_create_channel("News");
        assert_eq!(catalog.find_channel("news"), Some(id));
    }

    #[test]
    fn test_channel_indices_are_contiguous() {
        let mut catalog = catalog();
        for name in ["A", "B", "a", "C", "b", "D"] {
            catalog.get_or_create_channel(name);
        }
        let indices: Vec<u32> = catalog.channels().map(|(_, ch)| ch.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);

        for index in 0..4 {
            let id = catalog.channel_by_index(index).unwrap();
            assert_eq!(catalog.channel(id).unwrap().index(), index);
        }
        assert_eq!(catalog.channel_by_index(4), None);
    }

    #[test]
    fn test_tags_unique_and_resolvable() {
        let mut catalog = catalog();
        let a = catalog.get_or_create_channel("A");
        let b = catalog.get_or_create_channel("B");
        let g = catalog.get_or_create_group("Sports");

        let tag_a = catalog.channel(a).unwrap().tag();
        let tag_b = catalog.channel(b).unwrap().tag();
        let tag_g = catalog.group(g).unwrap().tag();
        assert_ne!(tag_a, tag_b);

        assert_eq!(catalog.channel_by_tag(tag_a), Some(a));
        assert_eq!(catalog.channel_by_tag(tag_b), Some(b));
        assert_eq!(catalog.group_by_tag(tag_g), Some(g));
        assert_eq!(catalog.channel_by_tag(Tag(1)), None);
        assert_eq!(catalog.group_by_tag(Tag(1)), None);
    }

    #[test]
    fn test_new_channel_joins_default_group() {
        let mut catalog = catalog();
        let id = catalog.get_or_create_channel("News");
        let default = catalog.default_group();

        assert_eq!(catalog.channel(id).unwrap().group(), default);
        assert_eq!(catalog.group(default).unwrap().members(), &[id]);
    }

    #[test]
    fn test_set_group_moves_exclusively() {
        let mut catalog = catalog();
        let ch = catalog.get_or_create_channel("News");
        let sports = catalog.get_or_create_group("Sports");
        let movies = catalog.get_or_create_group("Movies");

        catalog.set_group(ch, sports);
        assert_eq!(memberships(&catalog, ch), 1);
        assert!(catalog.group(sports).unwrap().contains(ch));

        catalog.set_group(ch, movies);
        assert_eq!(memberships(&catalog, ch), 1);
        assert!(catalog.group(movies).unwrap().contains(ch));
        assert!(!catalog.group(sports).unwrap().contains(ch));
        assert_eq!(catalog.channel(ch).unwrap().group(), movies);
    }

    #[test]
    fn test_set_same_group_moves_to_tail() {
        let mut catalog = catalog();
        let a = catalog.get_or_create_channel("A");
        let b = catalog.get_or_create_channel("B");
        let default = catalog.default_group();

        catalog.set_group(a, default);
        assert_eq!(catalog.group(default).unwrap().members(), &[b, a]);
        assert_eq!(memberships(&catalog, a), 1);
    }

    #[test]
    fn test_get_or_create_group() {
        let mut catalog = catalog();
        assert_eq!(catalog.find_group("Sports"), None);
        let a = catalog.get_or_create_group("Sports");
        let b = catalog.get_or_create_group("Sports");
        let c = catalog.get_or_create_group("sports");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(catalog.group_count(), 3);
        let first = catalog.groups().next().map(|(id, _)| id);
        assert_eq!(first, Some(c));
    }

    #[test]
    fn test_destroy_default_group_is_noop() {
        let mut catalog = catalog();
        let ch = catalog.get_or_create_channel("News");
        let default = catalog.default_group();

        catalog.destroy_group(default);

        assert!(catalog.group(default).is_some());
        assert_eq!(catalog.group(default).unwrap().members(), &[ch]);
        let other = catalog.get_or_create_channel("Other");
        assert!(catalog.group(default).unwrap().contains(other));
    }

    #[test]
    fn test_destroy_group_moves_members_to_default() {
        let mut catalog = catalog();
        let a = catalog.get_or_create_channel("A");
        let b = catalog.get_or_create_channel("B");
        let sports = catalog.get_or_create_group("Sports");
        catalog.set_group(a, sports);
        catalog.set_group(b, sports);

        let tag = catalog.group(sports).unwrap().tag();
        catalog.destroy_group(sports);

        let default = catalog.default_group();
        assert!(catalog.group(sports).is_none());
        assert_eq!(catalog.find_group("Sports"), None);
        assert_eq!(catalog.group_by_tag(tag), None);
        assert_eq!(catalog.group(default).unwrap().members(), &[a, b]);
        assert_eq!(catalog.channel(a).unwrap().group(), default);
        assert_eq!(memberships(&catalog, a), 1);
        assert_eq!(memberships(&catalog, b), 1);
    }

    #[test]
    fn test_link_sorts_by_priority() {
        let mut catalog = catalog();
        let ch = catalog.get_or_create_channel("News");
        for prio in [5, 1, 3] {
            catalog.link_transport(transport(prio), ch).unwrap();
        }

        let prios: Vec<i32> = catalog.channel_transports(ch).map(Transport::priority).collect();
        assert_eq!(prios, vec![1, 3, 5]);
    }

    #[test]
    fn test_link_ties_keep_insertion_order() {
        let mut catalog = catalog();
        let ch = catalog.get_or_create_channel("News");
        let mut first = Transport::new(1);
        first.set_name("first");
        let mut second = Transport::new(1);
        second.set_name("second");

        catalog.link_transport(transport(0), ch);
        catalog.link_transport(first, ch);
        catalog.link_transport(second, ch);

        let names: Vec<&str> = catalog.channel_transports(ch).map(Transport::name).collect();
        assert_eq!(names, vec!["prio-0", "first", "second"]);
    }

    #[test]
    fn test_link_sets_owning_channel() {
        let mut catalog = catalog();
        let ch = catalog.get_or_create_channel("News");
        let mut t = transport(0);
        t.add_stream(Stream::new(StreamType::H264, 0x100));
        t.add_stream(Stream::ca(0x0B00, 0x1FF));

        let id = catalog.link_transport(t, ch).unwrap();
        assert_eq!(catalog.transport(id).unwrap().channel(), Some(ch));
        // Linking alone does not publish the transport.
        assert_eq!(catalog.transport_count(), 0);
    }

    #[test]
    fn test_link_unknown_channel() {
        let mut catalog = catalog();
        assert_eq!(catalog.link_transport(transport(0), ChannelId(3)), None);
        assert_eq!(catalog.register_transport(transport(0), ChannelId(3)), None);
        assert_eq!(catalog.transport_count(), 0);
    }

    #[test]
    fn test_register_runs_monitor() {
        struct Recorder(Arc<Mutex<Vec<(TransportId, String)>>>);

        impl TransportMonitor for Recorder {
            fn init(&mut self, id: TransportId, _transport: &Transport, channel: &Channel) {
                self.0.lock().push((id, channel.name().to_string()));
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut catalog = catalog();
        catalog.set_monitor(Recorder(Arc::clone(&seen)));
        let ch = catalog.get_or_create_channel("News");

        let id = catalog.register_transport(transport(2), ch).unwrap();

        assert_eq!(catalog.transport_count(), 1);
        assert_eq!(catalog.transports().next().map(|(id, _)| id), Some(id));
        assert_eq!(seen.lock().as_slice(), &[(id, "News".to_string())]);
    }

    #[test]
    fn test_teletext_rundown() {
        let mut catalog = catalog();
        let ch = catalog.get_or_create_channel("News");
        catalog.set_teletext_rundown(ch, 192);
        assert_eq!(catalog.channel(ch).unwrap().teletext_rundown(), Some(192));
    }

    #[test]
    fn test_shared_catalog() {
        let shared = catalog().into_shared();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    let mut catalog = shared.lock();
                    catalog.get_or_create_channel(&format!("Channel {}", i % 2));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(shared.lock().channel_count(), 2);
    }

    struct CaptureLog {
        lines: Mutex<Vec<(std::thread::ThreadId, String)>>,
    }

    impl log::Log for CaptureLog {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.lines
                .lock()
                .push((std::thread::current().id(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLog = CaptureLog {
        lines: parking_lot::const_mutex(Vec::new()),
    };

    #[test]
    fn test_link_logs_service_and_streams() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Debug);

        let mut catalog = catalog();
        let ch = catalog.get_or_create_channel("T\u{e9}l\u{e9}\u{1}");
        let mut t = Transport::new(0);
        t.set_name("svc");
        t.add_stream(Stream::new(StreamType::H264, 0x100));
        t.add_stream(Stream::ca(0x0B00, 0x1FF));
        catalog.register_transport(t, ch).unwrap();

        // Other tests log from their own threads.
        let me = std::thread::current().id();
        let lines: Vec<String> = CAPTURE
            .lines
            .lock()
            .iter()
            .filter(|(thread, _)| *thread == me)
            .map(|(_, line)| line.clone())
            .filter(|line| line.starts_with("Added service") || line.starts_with("   Stream"))
            .collect();
        assert_eq!(
            lines,
            vec![
                "Added service \"svc\" for channel \"Tele?\"".to_string(),
                "   Stream [H264] - pid 256".to_string(),
                "   Stream [Conax] - pid 511".to_string(),
            ]
        );
    }
}
