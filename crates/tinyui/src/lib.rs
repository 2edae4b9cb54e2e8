//! tinyui: a small retained-mode widget toolkit.
//!
//! Widgets live in an arena-backed tree owned by a [`Context`]. Every widget
//! has a caller-assigned [`WidgetId`], a kind, a rectangle, and optionally a
//! shared [`Callback`] record with one slot per event kind. Parents grow to
//! the bounding box of their children, so hit-testing can prune whole
//! subtrees.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Context`] - The session: tree, focus, style, caches and renderer
//! - [`WidgetFactory`] - Widget creation
//! - [`Dispatch`] - Event routing into callbacks
//! - [`runloop::run_frame`] - One frame of updates, input and drawing
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Rect, Point)
//! - [`backend`] - Renderer and event source implementations

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

pub use geom;

#[cfg(any(test, feature = "testing"))]
pub use core::backend::test as testing;
pub use core::{
    Alignment, Callback, Context, Dispatch, FocusManager, Handler, NodeId, Tree, Widget,
    WidgetFactory, WidgetId, WidgetKind,
};
pub use core::{
    backend, cache, callback, dump, error, event, focus, kind, registry, render, runloop, style,
};

/// Commonly used traits and types.
pub mod prelude {
    pub use crate::{
        Alignment, Callback, Context, Dispatch, FocusManager, WidgetFactory, WidgetId,
        error::{Error, Result},
        event::{Event, EventKind, EventPayload, key::Key, mouse::Button},
        geom::{Point, Rect},
        style::{Color4, Style},
    };
}
