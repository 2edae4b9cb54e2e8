use std::rc::Rc;

use crate::core::{
    cache::{FontCache, ImageCache},
    callback::Callback,
    error::{Error, Result},
    id::{NodeId, WidgetId},
    kind::{WidgetKind, clamp_fill},
    node::Widget,
    render::{Painter, RenderBackend},
    style::Style,
    world::Tree,
};

/// A callback registered for once-per-frame update ticks.
#[derive(Clone)]
pub(crate) struct UpdateEntry {
    /// Widget the callback belongs to.
    pub(crate) id: WidgetId,
    /// The shared record.
    pub(crate) callback: Rc<Callback>,
}

/// A UI session: the widget tree plus everything needed to draw it and route
/// input into it.
///
/// There is no global instance. Applications that want a single session per
/// process enforce that themselves.
pub struct Context {
    /// Window or session title.
    pub(crate) title: String,
    /// The widget arena.
    pub(crate) tree: Tree,
    /// Widget receiving keyboard input.
    pub(crate) focus: Option<NodeId>,
    /// Widget currently under the pointer.
    pub(crate) hovered: Option<NodeId>,
    /// Active style.
    pub(crate) style: Style,
    /// Images keyed by file name.
    pub(crate) images: ImageCache,
    /// Fonts keyed by name and size.
    pub(crate) fonts: FontCache,
    /// Callbacks ticked once per frame.
    pub(crate) updates: Vec<UpdateEntry>,
    /// Active renderer.
    pub(crate) backend: Option<Box<dyn RenderBackend>>,
}

impl Context {
    /// Create a session with the default style and no renderer.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tree: Tree::new(),
            focus: None,
            hovered: None,
            style: Style::default(),
            images: ImageCache::default(),
            fonts: FontCache::default(),
            updates: Vec::new(),
            backend: None,
        }
    }

    /// Return the session title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Attach a renderer. Widgets can only be created once one is attached.
    pub fn init_renderer(&mut self, backend: impl RenderBackend + 'static) -> Result<()> {
        if self.backend.is_some() {
            tracing::warn!("renderer already initialized");
            return Err(Error::RendererAlreadyInitialized);
        }
        self.backend = Some(Box::new(backend));
        tracing::debug!(title = %self.title, "renderer initialized");
        Ok(())
    }

    /// Detach and return the renderer. The image and font caches are dropped
    /// with it, since their contents belong to the renderer.
    pub fn release_renderer(&mut self) -> Result<Box<dyn RenderBackend>> {
        let backend = self.backend.take().ok_or_else(|| {
            tracing::warn!("release without renderer");
            Error::InvalidRenderHandle
        })?;
        self.images.clear();
        self.fonts.clear();
        Ok(backend)
    }

    /// Is a renderer attached?
    pub fn has_renderer(&self) -> bool {
        self.backend.is_some()
    }

    /// Borrow the renderer, failing if none is attached.
    pub(crate) fn renderer(&mut self) -> Result<&mut dyn RenderBackend> {
        match self.backend.as_deref_mut() {
            Some(be) => Ok(be),
            None => Err(Error::InvalidRenderHandle),
        }
    }

    /// Return the active style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replace the active style.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Borrow the widget tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Borrow the image cache.
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Search the tree from the root for a widget id.
    pub fn find_widget(&self, id: impl Into<WidgetId>) -> Option<&Widget> {
        let root = self.tree.root()?;
        let node = self.tree.find_widget(id.into(), root)?;
        self.tree.get(node)
    }

    /// Look a widget up through the id index.
    pub fn widget_by_id(&self, id: impl Into<WidgetId>) -> Option<&Widget> {
        self.tree.get(self.tree.lookup(id.into())?)
    }

    /// Resolve an id to a node, failing for unknown ids.
    pub(crate) fn node(&self, id: WidgetId) -> Result<NodeId> {
        self.tree.lookup(id).ok_or(Error::UnknownWidget(id))
    }

    /// Borrow a widget mutably by id.
    fn widget_mut(&mut self, id: WidgetId) -> Result<&mut Widget> {
        let node = self.node(id)?;
        self.tree
            .get_mut(node)
            .ok_or_else(|| Error::Internal("index points at a released node".into()))
    }

    /// Enable or disable a widget. Disabled widgets and their subtrees are not
    /// drawn, but are still hit-tested.
    pub fn set_enable_state(&mut self, id: impl Into<WidgetId>, enabled: bool) -> Result<()> {
        let id = id.into();
        self.widget_mut(id)?.enabled = enabled;
        tracing::debug!(%id, enabled, "enable state");
        Ok(())
    }

    /// Is the widget enabled? Unknown ids report `false`.
    pub fn is_enabled(&self, id: impl Into<WidgetId>) -> bool {
        self.widget_by_id(id).is_some_and(|w| w.enabled)
    }

    /// Return a widget's text.
    pub fn text(&self, id: impl Into<WidgetId>) -> Option<&str> {
        self.widget_by_id(id).map(|w| w.text.as_str())
    }

    /// Replace a widget's text.
    pub fn set_text(&mut self, id: impl Into<WidgetId>, text: impl Into<String>) -> Result<()> {
        self.widget_mut(id.into())?.text = text.into();
        Ok(())
    }

    /// Return a progress bar's fill rate.
    pub fn progress(&self, id: impl Into<WidgetId>) -> Option<u32> {
        self.widget_by_id(id)?.fill()
    }

    /// Set a progress bar's fill rate, clamped to `0..=100`. Returns the
    /// stored value.
    pub fn set_progress(&mut self, id: impl Into<WidgetId>, rate: i32) -> Result<u32> {
        let id = id.into();
        let widget = self.widget_mut(id)?;
        match &mut widget.kind {
            WidgetKind::ProgressBar { fill } => {
                *fill = clamp_fill(rate);
                Ok(*fill)
            }
            _ => Err(Error::WrongKind {
                id,
                expected: "progress bar",
            }),
        }
    }

    /// Replace a widget's callback record. A progress bar's update
    /// registration follows the new record.
    pub fn set_callback(
        &mut self,
        id: impl Into<WidgetId>,
        callback: Option<Rc<Callback>>,
    ) -> Result<()> {
        let id = id.into();
        let widget = self.widget_mut(id)?;
        widget.callback = callback.clone();
        let ticks = matches!(widget.kind, WidgetKind::ProgressBar { .. });
        self.updates.retain(|e| e.id != id);
        if ticks && let Some(cb) = callback {
            self.register_update(id, cb);
        }
        Ok(())
    }

    /// Register a callback for update ticks.
    pub(crate) fn register_update(&mut self, id: WidgetId, callback: Rc<Callback>) {
        self.updates.push(UpdateEntry { id, callback });
    }

    /// Number of callbacks registered for update ticks.
    pub fn update_count(&self) -> usize {
        self.updates.len()
    }

    /// Walk the tree and issue draw calls for every enabled widget. Returns
    /// the number of widgets drawn.
    pub fn render_widgets(&mut self) -> Result<usize> {
        let be = self
            .backend
            .as_deref_mut()
            .ok_or(Error::InvalidRenderHandle)?;
        let Some(root) = self.tree.root() else {
            return Ok(0);
        };
        let font = self.fonts.load(be, &self.style.font)?;
        let drawn = Painter::new(&self.style, &self.images, font, be).paint(&self.tree, root)?;
        tracing::trace!(drawn, "rendered widgets");
        Ok(drawn)
    }

    /// Tear the whole tree down. Focus, hover and update registrations go
    /// with it; the renderer, caches and style stay.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.focus = None;
        self.hovered = None;
        self.updates.clear();
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new("untitled")
    }
}
