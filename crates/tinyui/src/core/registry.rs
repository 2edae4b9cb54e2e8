use std::rc::Rc;

use unicode_segmentation::UnicodeSegmentation;

use crate::{
    core::{
        callback::Callback,
        context::Context,
        error::{Error, Result},
        id::{NodeId, WidgetId},
        kind::{Alignment, WidgetKind, clamp_fill},
        node::Widget,
    },
    geom::{Point, Rect},
};

/// Widget creation operations on the [`Context`].
///
/// Every operation needs an attached renderer. Ids must be non-zero and
/// unique; a parent id of 0 attaches to the root, creating the implicit root
/// container on first use. On failure the tree is left untouched and the
/// failure is logged.
pub trait WidgetFactory {
    /// Create a container. With parent 0 and no root yet, the container
    /// becomes the root itself.
    fn create_container(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
        rect: Rect,
    ) -> Result<()>;

    /// Create a text label.
    fn create_label(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
        rect: Rect,
        alignment: Alignment,
    ) -> Result<()>;

    /// Create a button with a text caption.
    fn create_button(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
        rect: Rect,
        callback: Option<Rc<Callback>>,
    ) -> Result<()>;

    /// Create a button showing an image. The image is loaded through the
    /// image cache, so repeated file names share one decode.
    fn create_image_button(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        image: &str,
        rect: Rect,
        callback: Option<Rc<Callback>>,
    ) -> Result<()>;

    /// Create a panel drawn in the border color.
    fn create_panel(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        rect: Rect,
        filled: bool,
        callback: Option<Rc<Callback>>,
    ) -> Result<()>;

    /// Create a plain box drawn in the foreground color.
    fn create_box(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        rect: Rect,
        filled: bool,
    ) -> Result<()>;

    /// Create a tree view with a title.
    fn create_tree_view(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        title: &str,
        rect: Rect,
    ) -> Result<()>;

    /// Create a tree item. Its rectangle is computed from the parent's origin,
    /// the number of items already under the parent and the text length.
    fn create_tree_item(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
    ) -> Result<()>;

    /// Create a progress bar. The fill rate is clamped to `0..=100`; a
    /// callback is registered for update ticks.
    fn create_progress_bar(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        rect: Rect,
        fill: i32,
        callback: Option<Rc<Callback>>,
    ) -> Result<()>;

    /// Create an editable single-line text field.
    fn create_input_field(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
        rect: Rect,
        alignment: Alignment,
    ) -> Result<()>;
}

/// Reject rectangles with a negative size.
fn checked(rect: Rect) -> Result<Rect> {
    Ok(Rect::checked(
        rect.top.x,
        rect.top.y,
        rect.width,
        rect.height,
    )?)
}

/// Fail unless a renderer is attached.
fn require_renderer(ctx: &Context) -> Result<()> {
    if ctx.has_renderer() {
        Ok(())
    } else {
        Err(Error::InvalidRenderHandle)
    }
}

/// Log the outcome of a create call.
fn logged(id: WidgetId, kind: WidgetKind, result: Result<NodeId>) -> Result<()> {
    match result {
        Ok(_) => {
            tracing::debug!(%id, %kind, "created widget");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(%id, %kind, "failed to create widget: {e}");
            Err(e)
        }
    }
}

/// Validate and attach a widget, loading its image first if it has one.
fn attach(
    ctx: &mut Context,
    parent: WidgetId,
    mut widget: Widget,
    image: Option<&str>,
) -> Result<NodeId> {
    require_renderer(ctx)?;
    widget.rect = checked(widget.rect)?;
    ctx.tree.check_id(widget.id)?;
    ctx.tree.resolve_parent(parent)?;
    if let Some(filename) = image {
        let be = ctx
            .backend
            .as_deref_mut()
            .ok_or(Error::InvalidRenderHandle)?;
        widget.image = Some(ctx.images.load(be, filename)?);
    }
    ctx.tree.insert(widget, parent)
}

/// Install a container as the explicit root.
fn attach_root(ctx: &mut Context, mut widget: Widget) -> Result<NodeId> {
    require_renderer(ctx)?;
    widget.rect = checked(widget.rect)?;
    ctx.tree.insert_root(widget)
}

/// Build a tree item positioned under `parent` and attach it.
fn attach_tree_item(
    ctx: &mut Context,
    id: WidgetId,
    parent: WidgetId,
    text: &str,
) -> Result<NodeId> {
    require_renderer(ctx)?;
    let rect = tree_item_rect(ctx, parent, text)?;
    let mut w = Widget::new(id, WidgetKind::TreeItem, rect);
    w.text = text.to_string();
    attach(ctx, parent, w, None)
}

/// Compute a tree item's rectangle below the items already under `parent`.
fn tree_item_rect(ctx: &Context, parent: WidgetId, text: &str) -> Result<Rect> {
    let (origin, n) = match ctx.tree.resolve_parent(parent)? {
        Some(node) => {
            let p = ctx
                .tree
                .get(node)
                .ok_or_else(|| Error::Internal("index points at a released node".into()))?;
            let origin = if p.rect.is_unset() {
                Point::zero()
            } else {
                p.rect.top
            };
            (origin, p.children.len() as i32)
        }
        None => (Point::zero(), 0),
    };
    let margin = ctx.style.margin;
    let size = ctx.style.font.size;
    let glyphs = text.graphemes(true).count() as i32;
    Ok(Rect::checked(
        origin.x + margin,
        origin.y + margin + n * (size + margin),
        glyphs * size,
        size,
    )?)
}

impl WidgetFactory for Context {
    fn create_container(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
        rect: Rect,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::Container;
        let mut w = Widget::new(id, kind, rect);
        w.text = text.to_string();
        let r = if parent.is_root() && self.tree.root().is_none() {
            attach_root(self, w)
        } else {
            attach(self, parent, w, None)
        };
        logged(id, kind, r)
    }

    fn create_label(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
        rect: Rect,
        alignment: Alignment,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::Label;
        let mut w = Widget::new(id, kind, rect);
        w.text = text.to_string();
        w.alignment = alignment;
        let r = attach(self, parent, w, None);
        logged(id, kind, r)
    }

    fn create_button(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
        rect: Rect,
        callback: Option<Rc<Callback>>,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::Button;
        let mut w = Widget::new(id, kind, rect);
        w.text = text.to_string();
        w.alignment = Alignment::Center;
        w.callback = callback;
        let r = attach(self, parent, w, None);
        logged(id, kind, r)
    }

    fn create_image_button(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        image: &str,
        rect: Rect,
        callback: Option<Rc<Callback>>,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::Button;
        let mut w = Widget::new(id, kind, rect);
        w.callback = callback;
        let r = attach(self, parent, w, Some(image));
        logged(id, kind, r)
    }

    fn create_panel(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        rect: Rect,
        filled: bool,
        callback: Option<Rc<Callback>>,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::Panel { filled };
        let mut w = Widget::new(id, kind, rect);
        w.callback = callback;
        let r = attach(self, parent, w, None);
        logged(id, kind, r)
    }

    fn create_box(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        rect: Rect,
        filled: bool,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::Box { filled };
        let r = attach(self, parent, Widget::new(id, kind, rect), None);
        logged(id, kind, r)
    }

    fn create_tree_view(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        title: &str,
        rect: Rect,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::TreeView;
        let mut w = Widget::new(id, kind, rect);
        w.text = title.to_string();
        let r = attach(self, parent, w, None);
        logged(id, kind, r)
    }

    fn create_tree_item(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::TreeItem;
        let r = attach_tree_item(self, id, parent, text);
        logged(id, kind, r)
    }

    fn create_progress_bar(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        rect: Rect,
        fill: i32,
        callback: Option<Rc<Callback>>,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::ProgressBar {
            fill: clamp_fill(fill),
        };
        let mut w = Widget::new(id, kind, rect);
        w.callback = callback.clone();
        let r = attach(self, parent, w, None);
        if r.is_ok()
            && let Some(cb) = callback
        {
            self.register_update(id, cb);
        }
        logged(id, kind, r)
    }

    fn create_input_field(
        &mut self,
        id: impl Into<WidgetId>,
        parent: impl Into<WidgetId>,
        text: &str,
        rect: Rect,
        alignment: Alignment,
    ) -> Result<()> {
        let (id, parent) = (id.into(), parent.into());
        let kind = WidgetKind::InputField;
        let mut w = Widget::new(id, kind, rect);
        w.text = text.to_string();
        w.alignment = alignment;
        let r = attach(self, parent, w, None);
        logged(id, kind, r)
    }
}
