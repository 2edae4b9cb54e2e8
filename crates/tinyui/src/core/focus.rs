use crate::core::{context::Context, error::Result, id::WidgetId};

/// Focus management. At most one widget holds focus, and only the focused
/// widget receives key events.
pub trait FocusManager {
    /// Give focus to a widget. An unknown id fails and leaves the current
    /// focus in place. The previously focused widget is not notified.
    fn set_focus(&mut self, id: impl Into<WidgetId>) -> Result<()>;

    /// Return the focused widget, if any.
    fn focused(&self) -> Option<WidgetId>;

    /// Is this widget focused?
    fn is_focused(&self, id: impl Into<WidgetId>) -> bool;

    /// Drop focus entirely.
    fn clear_focus(&mut self);
}

impl FocusManager for Context {
    fn set_focus(&mut self, id: impl Into<WidgetId>) -> Result<()> {
        let id = id.into();
        let node = self.node(id).inspect_err(|e| {
            tracing::warn!("focus rejected: {e}");
        })?;
        self.focus = Some(node);
        tracing::debug!(%id, "focus");
        Ok(())
    }

    fn focused(&self) -> Option<WidgetId> {
        self.focus
            .and_then(|n| self.tree.get(n))
            .map(|w| w.id)
    }

    fn is_focused(&self, id: impl Into<WidgetId>) -> bool {
        self.focused() == Some(id.into())
    }

    fn clear_focus(&mut self) {
        self.focus = None;
    }
}
