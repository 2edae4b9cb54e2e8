use crate::{
    core::{
        cache::{Font, Image, ImageCache},
        error::{Error, Result},
        id::NodeId,
        kind::{Alignment, WidgetKind},
        node::Widget,
        style::{Color4, Style},
        world::Tree,
    },
    geom::Rect,
};

/// The trait implemented by renderers.
///
/// Coordinates are in the backend's own units: pixels for a window, cells for
/// a terminal. The toolkit decides what to draw and where; how it ends up on
/// screen is entirely up to the backend.
pub trait RenderBackend {
    /// Start a frame, clearing the target to `bg`.
    fn begin(&mut self, bg: Color4) -> Result<()>;
    /// Draw a rectangle, either filled or as an outline.
    fn draw_rect(&mut self, rect: Rect, filled: bool, color: Color4) -> Result<()>;
    /// Blit an image scaled into a rectangle.
    fn draw_image(&mut self, rect: Rect, image: &Image) -> Result<()>;
    /// Draw text inside a rectangle with the given alignment.
    fn draw_text(
        &mut self,
        text: &str,
        font: &Font,
        rect: Rect,
        fg: Color4,
        bg: Color4,
        alignment: Alignment,
    ) -> Result<()>;
    /// Present the finished frame.
    fn present(&mut self) -> Result<()>;
    /// Decode an image file.
    fn load_image(&mut self, filename: &str) -> Result<Image>;
    /// Open a font. Backends without real fonts can keep the default, which
    /// just records the request.
    fn load_font(&mut self, name: &str, size: i32) -> Result<Font> {
        Ok(Font {
            name: name.to_string(),
            size,
        })
    }
}

/// Issues the draw calls for one pass over the widget tree.
pub(crate) struct Painter<'a> {
    /// Active style.
    style: &'a Style,
    /// Image cache the widgets' image ids point into.
    images: &'a ImageCache,
    /// Font for all text.
    font: &'a Font,
    /// Target backend.
    be: &'a mut dyn RenderBackend,
    /// Number of widgets drawn so far.
    drawn: usize,
}

impl<'a> Painter<'a> {
    /// Construct a painter for one pass.
    pub(crate) fn new(
        style: &'a Style,
        images: &'a ImageCache,
        font: &'a Font,
        be: &'a mut dyn RenderBackend,
    ) -> Self {
        Self {
            style,
            images,
            font,
            be,
            drawn: 0,
        }
    }

    /// Walk the tree from `start` in pre-order. A disabled widget is skipped
    /// together with its whole subtree. Returns the number of widgets drawn.
    pub(crate) fn paint(mut self, tree: &Tree, start: NodeId) -> Result<usize> {
        self.paint_node(tree, start)?;
        Ok(self.drawn)
    }

    /// Recursive step for `paint`.
    fn paint_node(&mut self, tree: &Tree, node_id: NodeId) -> Result<()> {
        let widget = tree
            .get(node_id)
            .ok_or_else(|| Error::Internal("missing node".into()))?;
        if !widget.enabled {
            return Ok(());
        }
        self.widget(widget)?;
        self.drawn += 1;
        for child in widget.children() {
            self.paint_node(tree, *child)?;
        }
        Ok(())
    }

    /// Draw text for a widget, if it has any.
    fn text(&mut self, w: &Widget, rect: Rect, bg: Color4) -> Result<()> {
        if w.text.is_empty() {
            return Ok(());
        }
        self.be.draw_text(
            &w.text,
            self.font,
            rect,
            self.style.text_color,
            bg,
            w.alignment,
        )
    }

    /// Issue the kind-specific draw calls for one widget.
    fn widget(&mut self, w: &Widget) -> Result<()> {
        let s = self.style;
        let r = w.rect;
        match w.kind {
            WidgetKind::Container => {}
            WidgetKind::Button => {
                self.be.draw_rect(r, true, s.fg)?;
                if let Some(id) = w.image {
                    match self.images.get(id) {
                        Some(image) => self.be.draw_image(r, image)?,
                        None => tracing::warn!(id = %w.id, "button image no longer cached"),
                    }
                }
                self.text(w, r, s.fg)?;
            }
            WidgetKind::Label => self.text(w, r, s.bg)?,
            WidgetKind::Panel { filled } => self.be.draw_rect(r, filled, s.border)?,
            WidgetKind::Box { filled } => self.be.draw_rect(r, filled, s.fg)?,
            WidgetKind::ProgressBar { fill } => {
                self.be.draw_rect(r, false, s.border)?;
                let width = (i64::from(r.width) * i64::from(fill) / 100) as i32;
                self.be
                    .draw_rect(Rect::new(r.top.x, r.top.y, width, r.height), true, s.fg)?;
            }
            WidgetKind::InputField => {
                self.be.draw_rect(r, true, s.border)?;
                let inner = r.inset(s.margin);
                self.be.draw_rect(inner, true, s.bg)?;
                self.text(w, inner, s.bg)?;
            }
            WidgetKind::TreeView | WidgetKind::TreeItem => {
                self.be.draw_rect(r, false, s.border)?;
                self.text(w, r, s.bg)?;
            }
        }
        Ok(())
    }
}
