//! Error types for page construction, configuration and lookups.

use thiserror::Error;

/// Root error type for the `orgflow` crate.
#[derive(Error, Debug)]
pub enum OrgFlowError {
    /// A tab trigger or content panel was requested for a value the
    /// enclosing `Tabs` never registered.
    #[error("unknown tab: {0}")]
    UnknownTab(String),

    /// View name not one of `comparative`, `structureA`, `structureB`.
    #[error("unknown view: {0}")]
    UnknownView(String),

    /// Structure name not one of the two parameter sets.
    #[error("unknown structure: {0}")]
    UnknownStructure(String),

    /// Color string is not `#rrggbb` or `#rrggbbaa`.
    #[error("invalid color {0:?}: expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// Surface dimensions are zero or too large to address.
    #[error("invalid surface size {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OrgFlowError>;
