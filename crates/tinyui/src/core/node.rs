use std::rc::Rc;

use crate::{
    core::{
        cache::ImageId,
        callback::Callback,
        id::{NodeId, WidgetId},
        kind::{Alignment, WidgetKind},
    },
    geom::Rect,
};

/// A widget node stored in the arena.
pub struct Widget {
    /// Caller-assigned identity.
    pub(crate) id: WidgetId,
    /// Kind and per-kind state.
    pub(crate) kind: WidgetKind,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree, in insertion order.
    pub(crate) children: Vec<NodeId>,

    /// Drawn and delivered to the renderer only when set.
    pub(crate) enabled: bool,
    /// Screen rectangle. Grows as children are merged in.
    pub(crate) rect: Rect,
    /// Text alignment.
    pub(crate) alignment: Alignment,
    /// Widget text. Empty when the widget has none.
    pub(crate) text: String,
    /// Image in the context cache.
    pub(crate) image: Option<ImageId>,
    /// Shared callback record.
    pub(crate) callback: Option<Rc<Callback>>,
}

impl Widget {
    /// Construct a detached widget.
    pub(crate) fn new(id: WidgetId, kind: WidgetKind, rect: Rect) -> Self {
        Self {
            id,
            kind,
            parent: None,
            children: Vec::new(),
            enabled: true,
            rect,
            alignment: Alignment::default(),
            text: String::new(),
            image: None,
            callback: None,
        }
    }

    /// Return the widget id.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Return the widget kind.
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return true if the widget is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Return the widget rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Return the text alignment.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Return the widget text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Return the cached image, if any.
    pub fn image(&self) -> Option<ImageId> {
        self.image
    }

    /// Return the callback record, if any.
    pub fn callback(&self) -> Option<&Rc<Callback>> {
        self.callback.as_ref()
    }

    /// Return the fill rate for progress bars.
    pub fn fill(&self) -> Option<u32> {
        match self.kind {
            WidgetKind::ProgressBar { fill } => Some(fill),
            _ => None,
        }
    }
}
