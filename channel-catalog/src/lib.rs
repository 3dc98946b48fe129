//! In-memory channel catalog for broadcast servers.
//!
//! The catalog tracks three kinds of entities:
//!
//! - [`Channel`]: a user-facing outlet with a display name, a URL-safe
//!   sanitized name, a stable index and a unique [`Tag`]
//! - [`ChannelGroup`]: a named partition of channels; the protected
//!   `"Uncategorized"` group always exists
//! - [`Transport`]: a tunable service bound to a channel, ordered by priority
//!
//! Entities live in arenas owned by a [`Catalog`] and refer to each other by
//! identifier. [`Bootstrap`] fills a catalog from configuration entries,
//! delegating transports to registered [`BackendConfigurator`]s.
//!
//! # Example
//!
//! ```rust
//! use channel_catalog::{Catalog, TagAllocator, Transport};
//!
//! let mut catalog = Catalog::with_tags(TagAllocator::new(1));
//! let news = catalog.get_or_create_channel("BBC News");
//! assert_eq!(catalog.channel(news).unwrap().sanitized_name(), "bbc-news");
//!
//! for prio in [5, 1, 3] {
//!     catalog.register_transport(Transport::new(prio), news);
//! }
//! let prios: Vec<i32> = catalog
//!     .channel_transports(news)
//!     .map(Transport::priority)
//!     .collect();
//! assert_eq!(prios, vec![1, 3, 5]);
//! ```
//!
//! # Locking
//!
//! [`Catalog`] itself is not synchronized. Share it as a [`SharedCatalog`]
//! and hold the lock for the duration of every call.

pub mod bootstrap;
pub mod catalog;
pub mod channel;
pub mod config;
pub mod error;
pub mod group;
pub mod sanitize;
pub mod snapshot;
pub mod stream;
pub mod tag;
pub mod transport;

pub use bootstrap::{BackendConfigurator, Bootstrap, EntryOutcome, LoadReport, Registered};
pub use catalog::{Catalog, SharedCatalog};
pub use channel::{Channel, ChannelId, EpgEventId};
pub use config::{ConfigEntry, ConfigSource, CHANNEL_KIND, SERVICE_KIND};
pub use error::{BackendError, ConfigError, StreamParseError};
pub use group::{ChannelGroup, GroupId, DEFAULT_GROUP_NAME};
pub use snapshot::{CatalogSnapshot, ChannelSnapshot, GroupSnapshot, TransportSnapshot};
pub use stream::{caid_name, Stream, StreamType};
pub use tag::{Tag, TagAllocator, TagSource};
pub use transport::{NoopMonitor, Transport, TransportId, TransportMonitor};
