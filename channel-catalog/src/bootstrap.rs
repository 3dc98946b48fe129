//! Catalog bootstrap from configuration entries.
//!
//! Loading runs in two passes over the source: first every channel entry,
//! then every service entry. Each service entry is handed to the first
//! registered [`BackendConfigurator`] whose field it carries.
//!
//! Every processed entry ends up [`Skipped`](EntryOutcome::Skipped),
//! [`BackendFailed`](EntryOutcome::BackendFailed) or
//! [`Registered`](EntryOutcome::Registered). A failed entry leaves the
//! catalog untouched.

use log::{debug, info};

use crate::catalog::Catalog;
use crate::channel::ChannelId;
use crate::config::{ConfigEntry, ConfigSource, CHANNEL_KIND, SERVICE_KIND};
use crate::error::{BackendError, ConfigError};
use crate::transport::{Transport, TransportId};

/// A capture backend able to configure transports.
pub trait BackendConfigurator: Send + Sync {
    /// Backend name, for logs and reports.
    fn name(&self) -> &str;

    /// Entry field whose presence selects this backend.
    fn field(&self) -> &str;

    /// Configure `transport` from `entry`.
    ///
    /// `value` is the content of [`field`](Self::field). On error the
    /// transport is discarded.
    fn configure(
        &self,
        value: &str,
        entry: &ConfigEntry,
        transport: &mut Transport,
    ) -> Result<(), BackendError>;
}

/// What became of a configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The entry lacked a required field; nothing was created.
    Skipped(ConfigError),
    /// The backend refused the entry; the transport was discarded.
    BackendFailed {
        backend: Option<String>,
        error: BackendError,
    },
    /// The entry is now part of the catalog.
    Registered(Registered),
}

/// Catalog object produced by a registered entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registered {
    Channel(ChannelId),
    Transport(TransportId),
}

/// Per-entry results of a load, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub channels: Vec<EntryOutcome>,
    pub services: Vec<EntryOutcome>,
}

impl LoadReport {
    fn outcomes(&self) -> impl Iterator<Item = &EntryOutcome> + '_ {
        self.channels.iter().chain(self.services.iter())
    }

    pub fn registered(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o, EntryOutcome::Registered(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o, EntryOutcome::Skipped(_)))
            .count()
    }

    pub fn backend_failed(&self) -> usize {
        self.outcomes()
            .filter(|o| matches!(o, EntryOutcome::BackendFailed { .. }))
            .count()
    }
}

/// Loader that fills a catalog from a [`ConfigSource`].
#[derive(Default)]
pub struct Bootstrap {
    backends: Vec<Box<dyn BackendConfigurator>>,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend. Backends are probed in registration order.
    pub fn register_backend(&mut self, backend: impl BackendConfigurator + 'static) {
        self.backends.push(Box::new(backend));
    }

    /// Builder-style [`register_backend`](Self::register_backend).
    pub fn with_backend(mut self, backend: impl BackendConfigurator + 'static) -> Self {
        self.register_backend(backend);
        self
    }

    pub fn backends(&self) -> impl Iterator<Item = &(dyn BackendConfigurator + 'static)> + '_ {
        self.backends.iter().map(|b| b.as_ref())
    }

    /// Load every channel and service entry of `source` into `catalog`.
    pub fn load(&self, catalog: &mut Catalog, source: &ConfigSource) -> LoadReport {
        let default = catalog.default_group();
        debug!(
            "Default channel group \"{}\" ready",
            catalog.group(default).map(|g| g.name()).unwrap_or_default()
        );

        let channels = source
            .of_kind(CHANNEL_KIND)
            .map(|entry| self.load_channel(catalog, entry))
            .collect();
        let services = source
            .of_kind(SERVICE_KIND)
            .map(|entry| self.load_service(catalog, entry))
            .collect();

        let report = LoadReport { channels, services };
        info!(
            "Loaded {} channels and {} services ({} registered, {} skipped, {} failed)",
            catalog.channel_count(),
            catalog.transport_count(),
            report.registered(),
            report.skipped(),
            report.backend_failed()
        );
        report
    }

    /// Process one channel entry.
    pub fn load_channel(&self, catalog: &mut Catalog, entry: &ConfigEntry) -> EntryOutcome {
        let name = match entry.require("name") {
            Ok(name) => name,
            Err(e) => {
                debug!("Skipping channel entry: {}", e);
                return EntryOutcome::Skipped(e);
            }
        };

        let id = catalog.get_or_create_channel(name);
        debug!("Added channel \"{}\"", name);

        if let Some(rundown) = entry.get_int("teletext-rundown") {
            catalog.set_teletext_rundown(id, rundown);
        }
        if let Some(group) = entry.get("group") {
            let group = catalog.get_or_create_group(group);
            catalog.set_group(id, group);
        }

        EntryOutcome::Registered(Registered::Channel(id))
    }

    /// Process one service entry.
    pub fn load_service(&self, catalog: &mut Catalog, entry: &ConfigEntry) -> EntryOutcome {
        let channel_name = match entry.require("channel") {
            Ok(name) => name,
            Err(e) => {
                debug!("Skipping service entry: {}", e);
                return EntryOutcome::Skipped(e);
            }
        };

        let mut transport = Transport::new(entry.get_int("prio").unwrap_or(0));

        let Some((backend, value)) = self
            .backends
            .iter()
            .find_map(|b| entry.get(b.field()).map(|v| (b, v)))
        else {
            let tried = self
                .backends
                .iter()
                .map(|b| b.field())
                .collect::<Vec<_>>()
                .join(", ");
            debug!("No backend for service on channel \"{}\"", channel_name);
            return EntryOutcome::BackendFailed {
                backend: None,
                error: BackendError::NoBackend(tried),
            };
        };

        if let Err(error) = backend.configure(value, entry, &mut transport) {
            debug!(
                "{} backend rejected service \"{}\" for channel \"{}\": {}",
                backend.name(),
                value,
                channel_name,
                error
            );
            return EntryOutcome::BackendFailed {
                backend: Some(backend.name().to_string()),
                error,
            };
        }
        if transport.backend().is_empty() {
            transport.set_backend(backend.name());
        }

        if catalog.find_channel(channel_name).is_none() {
            debug!(
                "Service references undefined channel \"{}\", creating it",
                channel_name
            );
        }
        let channel = catalog.get_or_create_channel(channel_name);

        match catalog.register_transport(transport, channel) {
            Some(id) => EntryOutcome::Registered(Registered::Transport(id)),
            None => EntryOutcome::BackendFailed {
                backend: Some(backend.name().to_string()),
                error: BackendError::UnknownChannel(channel_name.to_string()),
            },
        }
    }
}
