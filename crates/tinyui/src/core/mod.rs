//! Core types and traits for the tinyui widget toolkit.

// Core modules - public
/// Backend implementations.
pub mod backend;
/// Shared image and font caches.
pub mod cache;
/// Per-event-kind callback records.
pub mod callback;
/// The UI session object.
pub mod context;
/// Event routing.
pub mod dispatch;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Focus management.
pub mod focus;
/// Widget and node id types.
pub mod id;
/// Widget kinds and alignment.
pub mod kind;
/// Widget node data.
pub mod node;
/// Widget creation.
pub mod registry;
/// Rendering interfaces.
pub mod render;
/// The frame loop.
pub mod runloop;
/// Styling and configuration.
pub mod style;
/// The widget arena.
pub mod world;

// Public exports from internal modules
pub use callback::{Callback, Handler};
pub use context::Context;
pub use dispatch::Dispatch;
pub use focus::FocusManager;
pub use id::{NodeId, WidgetId};
pub use kind::{Alignment, WidgetKind};
pub use node::Widget;
pub use registry::WidgetFactory;
pub use world::Tree;
