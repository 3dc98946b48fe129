//! Configuration entries consumed by the bootstrap loader.
//!
//! The catalog does not care how entries are stored; a loader turns its own
//! file format into an ordered [`ConfigSource`].

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Entry kind for channel definitions.
pub const CHANNEL_KIND: &str = "channel";

/// Entry kind for service (transport) definitions.
pub const SERVICE_KIND: &str = "service";

/// One configuration block: a kind and its string-valued fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEntry {
    kind: String,
    fields: BTreeMap<String, String>,
}

impl ConfigEntry {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether the entry kind matches `kind`, ignoring case.
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Get a field the entry cannot do without.
    pub fn require(&self, key: &'static str) -> Result<&str, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::MissingField {
            kind: self.kind.clone(),
            field: key,
        })
    }

    /// Get a field as an integer, C `atoi` style.
    ///
    /// Returns `None` only when the field is absent; unparsable values read
    /// as 0.
    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key).map(atoi)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Ordered list of configuration entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    entries: Vec<ConfigEntry>,
}

impl ConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ConfigEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// Entries of the given kind, in source order.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ConfigEntry> + 'a {
        self.entries.iter().filter(move |e| e.is_kind(kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ConfigEntry> for ConfigSource {
    fn from_iter<I: IntoIterator<Item = ConfigEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<ConfigEntry> for ConfigSource {
    fn extend<I: IntoIterator<Item = ConfigEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

/// Parse the leading integer of `s`.
///
/// Leading whitespace and one sign are accepted, parsing stops at the first
/// non-digit, and anything unparsable yields 0. Out of range values
/// saturate.
pub fn atoi(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
