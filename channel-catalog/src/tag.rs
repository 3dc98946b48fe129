//! Process-lifetime unique identifiers.

use std::fmt;

use log::warn;
use serde::Serialize;

/// Opaque identifier handed out to channels and groups.
///
/// Tags carry no meaning across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Tag(pub u32);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A source of unique tags.
pub trait TagSource: Send {
    /// Return a tag never returned before by this source.
    fn next_tag(&mut self) -> Tag;
}

/// Monotonic tag counter.
///
/// Starts from an arbitrary seed and increments by one per call. Tags are
/// unique until the counter wraps past `u32::MAX` back to 0, which is logged;
/// a clock seed close to `u32::MAX` wraps early.
#[derive(Debug, Clone)]
pub struct TagAllocator {
    next: u32,
}

impl TagAllocator {
    /// Create an allocator starting at `seed`.
    pub fn new(seed: u32) -> Self {
        Self { next: seed }
    }

    /// Create an allocator seeded from the wall clock.
    pub fn from_clock() -> Self {
        Self::new(chrono::Utc::now().timestamp() as u32)
    }

    /// Allocate the next tag.
    pub fn next(&mut self) -> Tag {
        let tag = Tag(self.next);
        self.next = match self.next.checked_add(1) {
            Some(next) => next,
            None => {
                warn!("Tag counter wrapped, tags will repeat from 0");
                0
            }
        };
        tag
    }
}

impl Default for TagAllocator {
    fn default() -> Self {
        Self::from_clock()
    }
}

impl TagSource for TagAllocator {
    fn next_tag(&mut self) -> Tag {
        self.next()
    }
}
