//! Error types for catalog bootstrap and backend configuration.

use thiserror::Error;

/// Errors raised while reading a configuration entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field the entry kind requires is absent.
    #[error("Missing required field '{field}' in {kind} entry")]
    MissingField { kind: String, field: &'static str },
}

/// Errors reported by a backend configurator.
///
/// A transport whose configuration fails is dropped without touching the
/// catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// No registered backend recognised the entry.
    #[error("No backend field present (tried: {0})")]
    NoBackend(String),

    /// The backend needs a field the entry does not carry.
    #[error("Missing field '{0}'")]
    MissingField(String),

    /// A field is present but cannot be interpreted.
    #[error("Invalid value for '{field}': {value}")]
    InvalidField { field: String, value: String },

    /// The referenced mux is not known to any adapter.
    #[error("Unknown mux: {0}")]
    UnknownMux(String),

    /// The backend has no device able to carry the transport.
    #[error("No device available: {0}")]
    NoDevice(String),

    /// The backend is registered but disabled.
    #[error("Backend disabled: {0}")]
    Disabled(String),

    /// The transport's channel is not part of the catalog.
    #[error("Channel not in catalog: {0}")]
    UnknownChannel(String),

    /// The stream list could not be parsed.
    #[error("Invalid stream list: {0}")]
    Streams(#[from] StreamParseError),
}

/// Errors from parsing a stream list field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamParseError {
    /// An item is not of the form `label:pid`.
    #[error("Malformed stream item: {0}")]
    Malformed(String),

    /// The stream type label is not known.
    #[error("Unknown stream type: {0}")]
    UnknownType(String),

    /// A PID or CA identifier is not a valid number.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}
