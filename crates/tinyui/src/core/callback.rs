use std::{array, cell::RefCell, fmt, rc::Rc};

use crate::core::{
    context::Context,
    error::{Error, Result},
    event::{EventKind, EventPayload},
    id::WidgetId,
};

/// A handler for one event kind. User data is whatever the closure captures.
pub type Handler = Box<dyn FnMut(WidgetId, &EventPayload, &mut Context) -> Result<()>>;

/// A callback record: one optional handler per event kind.
///
/// Records are owned by the application and shared with widgets through an
/// `Rc`; the toolkit only ever holds references. The same record may be
/// attached to several widgets, in which case the handler receives the id of
/// the widget the event was delivered to.
pub struct Callback {
    /// Handler slots indexed by `EventKind::slot`.
    slots: [RefCell<Option<Handler>>; EventKind::COUNT],
}

impl Default for Callback {
    fn default() -> Self {
        Self::new()
    }
}

impl Callback {
    /// Construct a record with every slot empty.
    pub fn new() -> Self {
        Self {
            slots: array::from_fn(|_| RefCell::new(None)),
        }
    }

    /// Set the handler for an event kind, returning the record.
    pub fn on<F>(self, kind: EventKind, handler: F) -> Self
    where
        F: FnMut(WidgetId, &EventPayload, &mut Context) -> Result<()> + 'static,
    {
        *self.slots[kind.slot()].borrow_mut() = Some(Box::new(handler));
        self
    }

    /// Replace or clear the handler for an event kind.
    pub fn set(&self, kind: EventKind, handler: Option<Handler>) -> Result<()> {
        let mut slot = self.slots[kind.slot()]
            .try_borrow_mut()
            .map_err(|_| Error::Internal(format!("{kind:?} slot is running")))?;
        *slot = handler;
        Ok(())
    }

    /// Is a handler installed for this event kind?
    pub fn has(&self, kind: EventKind) -> bool {
        self.slots[kind.slot()]
            .try_borrow()
            .map(|s| s.is_some())
            .unwrap_or(true)
    }

    /// Wrap the record for sharing with widgets.
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Invoke the handler for `kind`. An empty slot is a no-op and returns
    /// `Ok(false)`.
    pub(crate) fn invoke(
        &self,
        kind: EventKind,
        id: WidgetId,
        payload: &EventPayload,
        ctx: &mut Context,
    ) -> Result<bool> {
        let mut slot = self.slots[kind.slot()]
            .try_borrow_mut()
            .map_err(|_| Error::ReentrantCallback(id))?;
        match slot.as_mut() {
            Some(handler) => {
                handler(id, payload, ctx)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<EventKind> = EventKind::ALL
            .iter()
            .copied()
            .filter(|k| self.has(*k))
            .collect();
        f.debug_struct("Callback").field("slots", &set).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn empty_slot_is_noop() -> Result<()> {
        let mut ctx = Context::new("test");
        let cb = Callback::new();
        let ran = cb.invoke(
            EventKind::MouseButtonUp,
            WidgetId::new(1),
            &EventPayload::None,
            &mut ctx,
        )?;
        assert!(!ran);
        Ok(())
    }

    #[test]
    fn handler_receives_id() -> Result<()> {
        let mut ctx = Context::new("test");
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        let cb = Callback::new().on(EventKind::MouseButtonDown, move |id, _, _| {
            s.set(id.get());
            Ok(())
        });
        assert!(cb.has(EventKind::MouseButtonDown));
        assert!(!cb.has(EventKind::MouseButtonUp));
        let ran = cb.invoke(
            EventKind::MouseButtonDown,
            WidgetId::new(7),
            &EventPayload::None,
            &mut ctx,
        )?;
        assert!(ran);
        assert_eq!(seen.get(), 7);
        Ok(())
    }

    #[test]
    fn clear_slot() -> Result<()> {
        let cb = Callback::new().on(EventKind::Update, |_, _, _| Ok(()));
        cb.set(EventKind::Update, None)?;
        assert!(!cb.has(EventKind::Update));
        assert_eq!(format!("{cb:?}"), "Callback { slots: [] }");
        Ok(())
    }
}
