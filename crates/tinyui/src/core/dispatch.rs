use std::rc::Rc;

use crate::{
    core::{
        context::Context,
        error::{Error, Result},
        event::{
            Event, EventKind, EventPayload,
            key::{Key, KeyCode},
            mouse::Button,
        },
        id::{NodeId, WidgetId},
        kind::WidgetKind,
    },
    geom::Point,
};

/// Event routing on the [`Context`].
///
/// Handlers run inline and may mutate the context freely: the callback record
/// is cloned out of the tree before it is invoked.
pub trait Dispatch {
    /// Hit-test the point and deliver a button event to the widget under it.
    /// `kind` must be [`EventKind::MouseButtonDown`] or
    /// [`EventKind::MouseButtonUp`]. Returns the widget that was hit.
    fn on_mouse_button(
        &mut self,
        x: i32,
        y: i32,
        kind: EventKind,
        button: Button,
    ) -> Result<Option<WidgetId>>;

    /// Hit-test the point, deliver a move event and track hover changes.
    fn on_mouse_move(&mut self, x: i32, y: i32, button: Button) -> Result<Option<WidgetId>>;

    /// Deliver a key event to the focused widget. Returns the widget that
    /// received it.
    fn on_key(&mut self, key: Key, is_down: bool) -> Result<Option<WidgetId>>;

    /// Tick every registered update callback once. Returns the number of
    /// handlers that ran.
    fn run_updates(&mut self, now_ms: u64) -> Result<usize>;

    /// Route a native event. Returns `false` once the session should stop.
    fn dispatch(&mut self, event: &Event) -> Result<bool>;
}

/// Invoke one slot of a node's callback record. Nodes without a record, or
/// with an empty slot, are a no-op.
fn deliver(
    ctx: &mut Context,
    node: NodeId,
    kind: EventKind,
    payload: EventPayload,
) -> Result<bool> {
    let Some(w) = ctx.tree.get(node) else {
        return Ok(false);
    };
    let id = w.id;
    let Some(callback) = w.callback.clone() else {
        return Ok(false);
    };
    tracing::trace!(%id, ?kind, "deliver");
    callback.invoke(kind, id, &payload, ctx)
}

/// Apply a key press to an input field's text.
fn edit_text(text: &mut String, key: Key) {
    match key.code {
        KeyCode::Backspace => {
            text.pop();
        }
        _ => {
            if let Some(c) = key.text_char() {
                text.push(c);
            }
        }
    }
}

impl Dispatch for Context {
    fn on_mouse_button(
        &mut self,
        x: i32,
        y: i32,
        kind: EventKind,
        button: Button,
    ) -> Result<Option<WidgetId>> {
        if !matches!(kind, EventKind::MouseButtonDown | EventKind::MouseButtonUp) {
            return Err(Error::Internal(format!("{kind:?} is not a button event")));
        }
        let Some(root) = self.tree.root() else {
            return Ok(None);
        };
        let Some(node) = self.tree.find_selected_widget(root, x, y) else {
            return Ok(None);
        };
        let Some(w) = self.tree.get(node) else {
            return Ok(None);
        };
        let id = w.id;
        if kind == EventKind::MouseButtonDown && w.kind == WidgetKind::InputField {
            self.focus = Some(node);
            tracing::debug!(%id, "focus by click");
        }
        let payload = EventPayload::Mouse {
            point: Point::new(x, y),
            button,
        };
        deliver(self, node, kind, payload)?;
        Ok(Some(id))
    }

    fn on_mouse_move(&mut self, x: i32, y: i32, button: Button) -> Result<Option<WidgetId>> {
        let hit = self
            .tree
            .root()
            .and_then(|root| self.tree.find_selected_widget(root, x, y));
        let payload = EventPayload::Mouse {
            point: Point::new(x, y),
            button,
        };
        if let Some(node) = hit {
            deliver(self, node, EventKind::MouseMove, payload)?;
        }
        if hit != self.hovered {
            self.hovered = hit;
            if let Some(node) = hit {
                deliver(self, node, EventKind::MouseHover, payload)?;
            }
        }
        Ok(hit.and_then(|n| self.tree.get(n)).map(|w| w.id))
    }

    fn on_key(&mut self, key: Key, is_down: bool) -> Result<Option<WidgetId>> {
        let Some(node) = self.focus else {
            return Ok(None);
        };
        let Some(w) = self.tree.get_mut(node) else {
            self.focus = None;
            return Ok(None);
        };
        let id = w.id;
        if is_down && w.kind == WidgetKind::InputField {
            edit_text(&mut w.text, key);
        }
        let kind = if is_down {
            EventKind::KeyDown
        } else {
            EventKind::KeyUp
        };
        deliver(self, node, kind, EventPayload::Key(key))?;
        Ok(Some(id))
    }

    fn run_updates(&mut self, now_ms: u64) -> Result<usize> {
        let entries = self.updates.clone();
        let mut ran = 0;
        for entry in entries {
            // An earlier handler may have removed the widget or its record.
            if self.tree.lookup(entry.id).is_none()
                || !self
                    .updates
                    .iter()
                    .any(|u| u.id == entry.id && Rc::ptr_eq(&u.callback, &entry.callback))
            {
                continue;
            }
            let payload = EventPayload::Tick { now_ms };
            if entry
                .callback
                .invoke(EventKind::Update, entry.id, &payload, self)?
            {
                ran += 1;
            }
        }
        Ok(ran)
    }

    fn dispatch(&mut self, event: &Event) -> Result<bool> {
        match *event {
            Event::Quit => {
                tracing::info!("quit requested");
                if let Some(root) = self.tree.root() {
                    deliver(self, root, EventKind::Quit, EventPayload::None)?;
                }
                return Ok(false);
            }
            Event::MouseButton {
                point,
                button,
                down,
            } => {
                let kind = if down {
                    EventKind::MouseButtonDown
                } else {
                    EventKind::MouseButtonUp
                };
                self.on_mouse_button(point.x, point.y, kind, button)?;
            }
            Event::MouseMove { point, button } => {
                self.on_mouse_move(point.x, point.y, button)?;
            }
            Event::Key { key, down } => {
                self.on_key(key, down)?;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        core::{
            backend::test::TestRender, callback::Callback, focus::FocusManager,
            kind::Alignment, registry::WidgetFactory,
        },
        geom::Rect,
    };

    fn ctx() -> Context {
        let mut ctx = Context::new("test");
        let (_log, be) = TestRender::create();
        ctx.init_renderer(be).unwrap();
        ctx
    }

    /// A callback that records `(kind, id)` for every slot.
    fn recorder(log: &Rc<RefCell<Vec<(EventKind, WidgetId)>>>) -> Rc<Callback> {
        let mut cb = Callback::new();
        for kind in EventKind::ALL {
            let log = log.clone();
            cb = cb.on(kind, move |id, _, _| {
                log.borrow_mut().push((kind, id));
                Ok(())
            });
        }
        cb.shared()
    }

    #[test]
    fn click_reaches_only_its_slot() {
        let mut ctx = ctx();
        let log = Rc::new(RefCell::new(vec![]));
        let up_only = Callback::new()
            .on(EventKind::MouseButtonUp, {
                let log = log.clone();
                move |id, _, _| {
                    log.borrow_mut().push((EventKind::MouseButtonUp, id));
                    Ok(())
                }
            })
            .shared();
        ctx.create_button(1, 0, "ok", Rect::new(0, 0, 10, 10), Some(up_only))
            .unwrap();
        let hit = ctx
            .on_mouse_button(5, 5, EventKind::MouseButtonDown, Button::Left)
            .unwrap();
        assert_eq!(hit, Some(WidgetId::new(1)));
        assert!(log.borrow().is_empty());
        ctx.on_mouse_button(5, 5, EventKind::MouseButtonUp, Button::Left)
            .unwrap();
        assert_eq!(
            *log.borrow(),
            vec![(EventKind::MouseButtonUp, WidgetId::new(1))]
        );
    }

    #[test]
    fn miss_delivers_nothing() {
        let mut ctx = ctx();
        let log = Rc::new(RefCell::new(vec![]));
        ctx.create_button(1, 0, "ok", Rect::new(0, 0, 10, 10), Some(recorder(&log)))
            .unwrap();
        let hit = ctx
            .on_mouse_button(50, 50, EventKind::MouseButtonDown, Button::Left)
            .unwrap();
        assert_eq!(hit, None);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn rejects_non_button_kind() {
        let mut ctx = ctx();
        assert!(
            ctx.on_mouse_button(0, 0, EventKind::KeyDown, Button::Left)
                .is_err()
        );
    }

    #[test]
    fn payload_carries_point() {
        let mut ctx = ctx();
        let seen = Rc::new(RefCell::new(None));
        let cb = Callback::new()
            .on(EventKind::MouseButtonDown, {
                let seen = seen.clone();
                move |_, payload, _| {
                    *seen.borrow_mut() = Some(*payload);
                    Ok(())
                }
            })
            .shared();
        ctx.create_panel(1, 0, Rect::new(0, 0, 10, 10), true, Some(cb))
            .unwrap();
        ctx.on_mouse_button(3, 4, EventKind::MouseButtonDown, Button::Right)
            .unwrap();
        assert_eq!(
            *seen.borrow(),
            Some(EventPayload::Mouse {
                point: Point::new(3, 4),
                button: Button::Right
            })
        );
    }

    #[test]
    fn hover_fires_on_change_only() {
        let mut ctx = ctx();
        let log = Rc::new(RefCell::new(vec![]));
        ctx.create_panel(1, 0, Rect::new(0, 0, 10, 10), false, Some(recorder(&log)))
            .unwrap();
        ctx.create_panel(2, 0, Rect::new(20, 0, 10, 10), false, Some(recorder(&log)))
            .unwrap();
        ctx.on_mouse_move(1, 1, Button::None).unwrap();
        ctx.on_mouse_move(2, 2, Button::None).unwrap();
        ctx.on_mouse_move(21, 1, Button::None).unwrap();
        let hovers: Vec<WidgetId> = log
            .borrow()
            .iter()
            .filter(|(k, _)| *k == EventKind::MouseHover)
            .map(|(_, id)| *id)
            .collect();
        assert_eq!(hovers, vec![WidgetId::new(1), WidgetId::new(2)]);
        let moves = log
            .borrow()
            .iter()
            .filter(|(k, _)| *k == EventKind::MouseMove)
            .count();
        assert_eq!(moves, 3);
    }

    #[test]
    fn typing_into_focused_field() {
        let mut ctx = ctx();
        ctx.create_input_field(1, 0, "", Rect::new(0, 0, 40, 10), Alignment::Left)
            .unwrap();
        assert_eq!(ctx.on_key(Key::from('a'), true).unwrap(), None);
        ctx.on_mouse_button(5, 5, EventKind::MouseButtonDown, Button::Left)
            .unwrap();
        assert_eq!(ctx.focused(), Some(WidgetId::new(1)));
        for c in "hi!".chars() {
            ctx.on_key(Key::from(c), true).unwrap();
            ctx.on_key(Key::from(c), false).unwrap();
        }
        ctx.on_key(Key::from(KeyCode::Backspace), true).unwrap();
        assert_eq!(ctx.text(1), Some("hi"));
    }

    #[test]
    fn key_goes_to_focused_widget_only() {
        let mut ctx = ctx();
        let log = Rc::new(RefCell::new(vec![]));
        ctx.create_button(1, 0, "a", Rect::new(0, 0, 10, 10), Some(recorder(&log)))
            .unwrap();
        ctx.create_button(2, 0, "b", Rect::new(20, 0, 10, 10), Some(recorder(&log)))
            .unwrap();
        ctx.set_focus(2).unwrap();
        ctx.on_key(Key::from('x'), true).unwrap();
        assert_eq!(*log.borrow(), vec![(EventKind::KeyDown, WidgetId::new(2))]);
        assert_eq!(ctx.text(2), Some("b"));
    }

    #[test]
    fn updates_tick_registered_bars() {
        let mut ctx = ctx();
        let cb = Callback::new()
            .on(EventKind::Update, |id, payload, ctx| {
                if let EventPayload::Tick { now_ms } = payload {
                    ctx.set_progress(id, (*now_ms / 10) as i32)?;
                }
                Ok(())
            })
            .shared();
        ctx.create_progress_bar(1, 0, Rect::new(0, 0, 100, 5), 0, Some(cb))
            .unwrap();
        assert_eq!(ctx.run_updates(250).unwrap(), 1);
        assert_eq!(ctx.progress(1), Some(25));
        ctx.run_updates(5000).unwrap();
        assert_eq!(ctx.progress(1), Some(100));
    }

    #[test]
    fn updates_skip_widgets_removed_mid_tick() {
        let mut ctx = ctx();
        let log = Rc::new(RefCell::new(vec![]));
        let clearing = Callback::new()
            .on(EventKind::Update, |_, _, ctx| {
                ctx.clear();
                Ok(())
            })
            .shared();
        ctx.create_progress_bar(1, 0, Rect::new(0, 0, 10, 1), 0, Some(clearing))
            .unwrap();
        ctx.create_progress_bar(2, 0, Rect::new(0, 2, 10, 1), 0, Some(recorder(&log)))
            .unwrap();
        assert_eq!(ctx.run_updates(0).unwrap(), 1);
        assert!(log.borrow().is_empty());
        assert_eq!(ctx.update_count(), 0);
    }

    #[test]
    fn updates_skip_replaced_records() {
        let mut ctx = ctx();
        let log = Rc::new(RefCell::new(vec![]));
        let detaching = Callback::new()
            .on(EventKind::Update, |_, _, ctx| ctx.set_callback(2, None))
            .shared();
        ctx.create_progress_bar(1, 0, Rect::new(0, 0, 10, 1), 0, Some(detaching))
            .unwrap();
        ctx.create_progress_bar(2, 0, Rect::new(0, 2, 10, 1), 0, Some(recorder(&log)))
            .unwrap();
        assert_eq!(ctx.run_updates(0).unwrap(), 1);
        assert!(log.borrow().is_empty());
        assert_eq!(ctx.update_count(), 1);
    }

    #[test]
    fn handler_may_clear_tree() {
        let mut ctx = ctx();
        let cb = Callback::new()
            .on(EventKind::MouseButtonUp, |_, _, ctx| {
                ctx.clear();
                Ok(())
            })
            .shared();
        ctx.create_button(1, 0, "x", Rect::new(0, 0, 10, 10), Some(cb))
            .unwrap();
        ctx.on_mouse_button(1, 1, EventKind::MouseButtonUp, Button::Left)
            .unwrap();
        assert!(ctx.tree().is_empty());
    }

    #[test]
    fn reentrant_slot_errors() {
        let mut ctx = ctx();
        let cb = Callback::new()
            .on(EventKind::MouseButtonDown, |_, _, ctx| {
                ctx.on_mouse_button(1, 1, EventKind::MouseButtonDown, Button::Left)?;
                Ok(())
            })
            .shared();
        ctx.create_button(1, 0, "x", Rect::new(0, 0, 10, 10), Some(cb))
            .unwrap();
        assert_eq!(
            ctx.on_mouse_button(1, 1, EventKind::MouseButtonDown, Button::Left),
            Err(Error::ReentrantCallback(WidgetId::new(1)))
        );
    }

    #[test]
    fn quit_reaches_root_and_stops() {
        let mut ctx = ctx();
        let log = Rc::new(RefCell::new(vec![]));
        ctx.create_container(5, 0, "root", Rect::new(0, 0, 10, 10))
            .unwrap();
        ctx.create_button(1, 5, "x", Rect::new(0, 0, 10, 10), Some(recorder(&log)))
            .unwrap();
        assert!(!ctx.dispatch(&Event::Quit).unwrap());
        assert!(log.borrow().is_empty());
        assert!(
            ctx.dispatch(&Event::MouseMove {
                point: Point::new(1, 1),
                button: Button::None
            })
            .unwrap()
        );
        assert_eq!(log.borrow().len(), 2);
    }
}
