//! Top-level page access contracts.

use std::{cell::Cell, rc::Rc};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised when the layout reaches outside its own frame.
pub enum PageAccessError {
    /// The top-level window belongs to another origin.
    #[error("top-level window is cross-origin")]
    CrossOrigin,
    /// The host has no page to reload.
    #[error("page access unavailable")]
    Unavailable,
}

/// Host service for actions on the top-level page.
pub trait PageHost {
    /// Reloads the top-level window.
    fn reload_top_window(&self) -> Result<(), PageAccessError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op page service for headless composition.
pub struct NoopPageHost;

impl PageHost for NoopPageHost {
    fn reload_top_window(&self) -> Result<(), PageAccessError> {
        Err(PageAccessError::Unavailable)
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory page service counting reloads.
pub struct MemoryPageHost {
    cross_origin: bool,
    reloads: Rc<Cell<u32>>,
}

impl MemoryPageHost {
    /// Creates a page service whose top window is on another origin.
    pub fn cross_origin() -> Self {
        Self {
            cross_origin: true,
            reloads: Rc::default(),
        }
    }

    /// Returns the number of successful reloads.
    pub fn reloads(&self) -> u32 {
        self.reloads.get()
    }
}

impl PageHost for MemoryPageHost {
    fn reload_top_window(&self) -> Result<(), PageAccessError> {
        if self.cross_origin {
            return Err(PageAccessError::CrossOrigin);
        }
        self.reloads.set(self.reloads.get() + 1);
        Ok(())
    }
}
