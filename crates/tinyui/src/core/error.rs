use std::{io, result::Result as StdResult};

use thiserror::Error;

use crate::core::id::WidgetId;

/// Result type for tinyui operations.
pub type Result<T> = StdResult<T, Error>;

/// Flat status codes, as reported to applications that want a numeric result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// Success.
    ResultOk,
    /// Generic failure.
    ErrorCode,
    /// A handle was used before it was valid.
    InvalidHandle,
    /// The renderer has not been initialized.
    InvalidRenderHandle,
}

impl ResultCode {
    /// The numeric value of the code.
    pub fn value(self) -> i32 {
        match self {
            Self::ResultOk => 0,
            Self::ErrorCode => -1,
            Self::InvalidHandle => -2,
            Self::InvalidRenderHandle => -3,
        }
    }
}

impl<T> From<&Result<T>> for ResultCode {
    fn from(r: &Result<T>) -> Self {
        match r {
            Ok(_) => Self::ResultOk,
            Err(e) => e.code(),
        }
    }
}

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// No renderer is attached to the context.
    #[error("renderer not initialized")]
    InvalidRenderHandle,
    /// A backend handle was used in an invalid state.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),
    /// A renderer is already attached to the context.
    #[error("renderer already initialized")]
    RendererAlreadyInitialized,
    /// No widget with this id exists.
    #[error("unknown widget: {0}")]
    UnknownWidget(WidgetId),
    /// The requested parent does not exist.
    #[error("unknown parent: {0}")]
    UnknownParent(WidgetId),
    /// A widget with this id already exists.
    #[error("duplicate widget id: {0}")]
    DuplicateId(WidgetId),
    /// Id 0 is reserved for the root.
    #[error("widget id 0 is reserved")]
    ReservedId,
    /// The widget is not of the kind the operation needs.
    #[error("widget {id} is not a {expected}")]
    WrongKind {
        /// Offending widget.
        id: WidgetId,
        /// Kind the operation expected.
        expected: &'static str,
    },
    /// An image could not be loaded.
    #[error("image load: {0}")]
    ImageLoad(String),
    /// Geometry failure.
    #[error("geometry: {0}")]
    Geometry(String),
    /// Rendering or backend I/O failure.
    #[error("render: {0}")]
    Render(String),
    /// Style configuration failure.
    #[error("config: {0}")]
    Config(String),
    /// A callback slot was invoked while already running.
    #[error("callback for widget {0} re-entered")]
    ReentrantCallback(WidgetId),
    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}

impl Error {
    /// Map the error to its flat status code.
    pub fn code(&self) -> ResultCode {
        match self {
            Self::InvalidRenderHandle => ResultCode::InvalidRenderHandle,
            Self::InvalidHandle(_) => ResultCode::InvalidHandle,
            _ => ResultCode::ErrorCode,
        }
    }
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Render(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
