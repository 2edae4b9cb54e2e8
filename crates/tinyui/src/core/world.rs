use std::collections::HashMap;

use slotmap::SlotMap;

use crate::{
    core::{
        error::{Error, Result},
        id::{NodeId, WidgetId},
        kind::WidgetKind,
        node::Widget,
    },
    geom::Rect,
};

/// The widget arena and its root.
///
/// Every widget is owned by the arena; the parent-to-child edges in
/// `Widget::children` define the tree. A widget's rectangle always encloses
/// the rectangles of all its descendants, because every insertion merges the
/// new rectangle into each ancestor on the way up to the root.
#[derive(Default)]
pub struct Tree {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Widget>,
    /// Root node, created on the first insertion.
    pub(crate) root: Option<NodeId>,
    /// Widget id to node lookup.
    index: HashMap<WidgetId, NodeId>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the root node, if the tree has one.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of widgets in the tree, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the tree empty?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node.
    pub fn get(&self, node: NodeId) -> Option<&Widget> {
        self.nodes.get(node)
    }

    /// Borrow a node mutably.
    pub(crate) fn get_mut(&mut self, node: NodeId) -> Option<&mut Widget> {
        self.nodes.get_mut(node)
    }

    /// Resolve a widget id through the id index.
    pub fn lookup(&self, id: WidgetId) -> Option<NodeId> {
        self.index.get(&id).copied()
    }

    /// Search the subtree under `start` for a widget id, pre-order.
    pub fn find_widget(&self, id: WidgetId, start: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(start)?;
        if node.id == id {
            return Some(start);
        }
        node.children
            .iter()
            .find_map(|child| self.find_widget(id, *child))
    }

    /// Return the root, creating the implicit root container if needed.
    pub(crate) fn ensure_root(&mut self) -> NodeId {
        if let Some(root) = self.root {
            return root;
        }
        let root = self.nodes.insert(Widget::new(
            WidgetId::ROOT,
            WidgetKind::Container,
            Rect::UNSET,
        ));
        self.index.insert(WidgetId::ROOT, root);
        self.root = Some(root);
        tracing::debug!("created implicit root container");
        root
    }

    /// Install an explicit root. Fails if the tree already has one.
    pub(crate) fn insert_root(&mut self, widget: Widget) -> Result<NodeId> {
        self.check_id(widget.id)?;
        if self.root.is_some() {
            return Err(Error::Internal("tree already has a root".into()));
        }
        let id = widget.id;
        let root = self.nodes.insert(widget);
        self.index.insert(id, root);
        self.root = Some(root);
        Ok(root)
    }

    /// Check that an id is usable for a new widget.
    pub(crate) fn check_id(&self, id: WidgetId) -> Result<()> {
        if id.is_root() {
            return Err(Error::ReservedId);
        }
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }
        Ok(())
    }

    /// Resolve a parent id without mutating the tree. `None` means the parent
    /// is the implicit root, which does not exist yet.
    pub(crate) fn resolve_parent(&self, parent: WidgetId) -> Result<Option<NodeId>> {
        if parent.is_root() {
            return Ok(self.root);
        }
        self.lookup(parent)
            .map(Some)
            .ok_or(Error::UnknownParent(parent))
    }

    /// Attach a new widget as the last child of `parent` and merge its
    /// rectangle into every ancestor. Nothing is mutated on failure.
    pub(crate) fn insert(&mut self, mut widget: Widget, parent: WidgetId) -> Result<NodeId> {
        self.check_id(widget.id)?;
        let parent = match self.resolve_parent(parent)? {
            Some(p) => p,
            None => self.ensure_root(),
        };
        widget.parent = Some(parent);
        let rect = widget.rect;
        let id = widget.id;
        let node = self.nodes.insert(widget);
        self.index.insert(id, node);
        self.nodes[parent].children.push(node);

        let mut current = Some(parent);
        while let Some(ancestor) = current {
            let n = &mut self.nodes[ancestor];
            n.rect.merge(&rect);
            current = n.parent;
        }
        self.debug_assert_tree_invariants();
        Ok(node)
    }

    /// Locate the deepest node under `start` whose rectangle contains the
    /// point. Among overlapping siblings the last inserted wins.
    pub fn find_selected_widget(&self, start: NodeId, x: i32, y: i32) -> Option<NodeId> {
        let mut found = None;
        self.locate_recursive(start, x, y, &mut found);
        found
    }

    /// Recursive step for `find_selected_widget`.
    fn locate_recursive(&self, node_id: NodeId, x: i32, y: i32, found: &mut Option<NodeId>) {
        let Some(node) = self.nodes.get(node_id) else {
            return;
        };
        if !node.rect.contains(x, y) {
            return;
        }
        *found = Some(node_id);
        for child in &node.children {
            if self.nodes[*child].rect.contains(x, y) {
                self.locate_recursive(*child, x, y, found);
            }
        }
    }

    /// Visit the subtree under `start` in pre-order. The callback returns
    /// `false` to skip the node's children.
    pub fn preorder<F>(&self, start: NodeId, f: &mut F) -> Result<()>
    where
        F: FnMut(NodeId, &Widget, usize) -> Result<bool>,
    {
        self.preorder_inner(start, 0, f)
    }

    /// Recursive step for `preorder`.
    fn preorder_inner<F>(&self, node_id: NodeId, depth: usize, f: &mut F) -> Result<()>
    where
        F: FnMut(NodeId, &Widget, usize) -> Result<bool>,
    {
        let node = self
            .nodes
            .get(node_id)
            .ok_or_else(|| Error::Internal("missing node".into()))?;
        if f(node_id, node, depth)? {
            for child in &node.children {
                self.preorder_inner(*child, depth + 1, f)?;
            }
        }
        Ok(())
    }

    /// Release every node.
    pub(crate) fn clear(&mut self) {
        let released = self.nodes.len();
        self.nodes.clear();
        self.index.clear();
        self.root = None;
        tracing::debug!(released, "cleared widget tree");
    }

    #[cfg(debug_assertions)]
    /// Check parent/child links and rectangle containment.
    pub(crate) fn debug_assert_tree_invariants(&self) {
        for (id, node) in &self.nodes {
            if let Some(parent) = node.parent {
                let p = &self.nodes[parent];
                debug_assert!(p.children.contains(&id), "parent does not list child");
                debug_assert!(p.rect.encloses(&node.rect), "parent does not enclose child");
            } else {
                debug_assert_eq!(self.root, Some(id), "orphan node is not the root");
            }
        }
    }

    #[cfg(not(debug_assertions))]
    /// Check parent/child links and rectangle containment.
    pub(crate) fn debug_assert_tree_invariants(&self) {}
}
