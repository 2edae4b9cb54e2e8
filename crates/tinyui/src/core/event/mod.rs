/// Keyboard events.
pub mod key;
/// Mouse events.
pub mod mouse;

use crate::geom::Point;

/// The kinds of event a callback can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The session is ending.
    Quit,
    /// A mouse button was pressed.
    MouseButtonDown,
    /// A mouse button was released.
    MouseButtonUp,
    /// The pointer moved.
    MouseMove,
    /// The pointer entered a widget.
    MouseHover,
    /// A key was pressed.
    KeyDown,
    /// A key was released.
    KeyUp,
    /// Once-per-frame tick.
    Update,
}

impl EventKind {
    /// Number of event kinds.
    pub const COUNT: usize = 8;

    /// All kinds, in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Quit,
        Self::MouseButtonDown,
        Self::MouseButtonUp,
        Self::MouseMove,
        Self::MouseHover,
        Self::KeyDown,
        Self::KeyUp,
        Self::Update,
    ];

    /// Index of this kind's slot in a callback record.
    pub fn slot(self) -> usize {
        self as usize
    }
}

/// Data handed to a callback along with the widget id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPayload {
    /// No data.
    None,
    /// Pointer location and button.
    Mouse {
        /// Pointer location.
        point: Point,
        /// Button involved, if any.
        button: mouse::Button,
    },
    /// A keystroke.
    Key(key::Key),
    /// The current tick count, in milliseconds.
    Tick {
        /// Milliseconds from the backend's monotonic clock.
        now_ms: u64,
    },
}

/// A native input event, as produced by an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The user asked to close the session.
    Quit,
    /// A mouse button changed state.
    MouseButton {
        /// Pointer location.
        point: Point,
        /// Button.
        button: mouse::Button,
        /// True for a press, false for a release.
        down: bool,
    },
    /// The pointer moved.
    MouseMove {
        /// Pointer location.
        point: Point,
        /// Held button, if any.
        button: mouse::Button,
    },
    /// A key changed state.
    Key {
        /// The key.
        key: key::Key,
        /// True for a press, false for a release.
        down: bool,
    },
}
