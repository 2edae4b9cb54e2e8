use std::fmt;

use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a node stored in the widget arena.
    pub struct NodeId;
}

/// Caller-assigned widget identifier, unique within a context.
///
/// The value 0 is reserved: as a parent id it means "attach under the root",
/// and it is the id carried by the implicit root container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WidgetId(u64);

impl WidgetId {
    /// The reserved root id.
    pub const ROOT: Self = Self(0);

    /// Wrap a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Is this the reserved root id?
    pub fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for WidgetId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
