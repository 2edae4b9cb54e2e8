use std::fmt;

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Mods {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub ctrl: bool,
    /// Alt key held.
    pub alt: bool,
}

impl Mods {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
}

/// Key codes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Backspace.
    Backspace,
    /// Enter/return.
    Enter,
    /// Tab.
    Tab,
    /// Escape.
    Esc,
    /// Delete.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Function key.
    F(u8),
    /// Anything the backend could not map.
    Unknown,
}

/// A keystroke.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Key {
    /// Modifiers held during the keystroke.
    pub mods: Mods,
    /// The key itself.
    pub code: KeyCode,
}

impl Key {
    /// Construct a key with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            mods: Mods::NONE,
            code,
        }
    }

    /// The character this key inserts into a text field, if any. Control and
    /// alt chords insert nothing.
    pub fn text_char(&self) -> Option<char> {
        if self.mods.ctrl || self.mods.alt {
            return None;
        }
        match self.code {
            KeyCode::Char(c) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.mods.alt {
            write!(f, "Alt+")?;
        }
        if self.mods.shift {
            write!(f, "Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}
