use std::fmt;

use serde::Deserialize;

/// Text alignment inside a widget's rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// The closed set of widget kinds. Per-kind state lives in the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Grouping node with no visual of its own. The implicit root is one.
    Container,
    /// Clickable button, optionally with an image.
    Button,
    /// Plain text.
    Label,
    /// Bordered panel.
    Panel {
        /// Fill the panel instead of drawing its outline.
        filled: bool,
    },
    /// Plain box drawn in the foreground color.
    Box {
        /// Fill the box instead of drawing its outline.
        filled: bool,
    },
    /// Tree view frame.
    TreeView,
    /// Entry in a tree view.
    TreeItem,
    /// Progress bar.
    ProgressBar {
        /// Fill percentage, always within `0..=100`.
        fill: u32,
    },
    /// Editable single-line text field.
    InputField,
}

impl WidgetKind {
    /// A short lowercase name for the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Button => "button",
            Self::Label => "label",
            Self::Panel { .. } => "panel",
            Self::Box { .. } => "box",
            Self::TreeView => "treeview",
            Self::TreeItem => "treeitem",
            Self::ProgressBar { .. } => "progressbar",
            Self::InputField => "inputfield",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Clamp a requested fill rate into `0..=100`.
pub fn clamp_fill(rate: i32) -> u32 {
    rate.clamp(0, 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_clamp() {
        assert_eq!(clamp_fill(150), 100);
        assert_eq!(clamp_fill(-10), 0);
        assert_eq!(clamp_fill(42), 42);
    }
}
