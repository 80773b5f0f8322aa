//! Fallback rendering for failing descendant content.

use std::fmt;

use app_layout_contract::DrawerId;
use app_layout_host::{PageAccessError, PageHost};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Layout slot hosting descendant content.
pub enum ContentRegion {
    /// Main content.
    Content,
    /// Navigation slot.
    Navigation,
    /// A drawer's content.
    Drawer(DrawerId),
    /// Split panel content.
    SplitPanel,
    /// Breadcrumbs slot.
    Breadcrumbs,
    /// Notifications slot.
    Notifications,
}

impl fmt::Display for ContentRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => f.write_str("content"),
            Self::Navigation => f.write_str("navigation"),
            Self::Drawer(id) => write!(f, "drawer `{id}`"),
            Self::SplitPanel => f.write_str("split panel"),
            Self::Breadcrumbs => f.write_str("breadcrumbs"),
            Self::Notifications => f.write_str("notifications"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{region} failed to render: {message}")]
/// Failure raised by descendant content.
pub struct ContentError {
    /// Failing slot.
    pub region: ContentRegion,
    /// Failure description.
    pub message: String,
}

impl ContentError {
    /// Creates a content error.
    pub fn new(region: ContentRegion, message: impl Into<String>) -> Self {
        Self {
            region,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Action offered by the fallback panel.
pub enum FallbackAction {
    /// Render the content again.
    Retry,
    /// Reload the top-level page.
    RefreshPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Panel shown in place of failed content.
pub struct FallbackPanel {
    /// Error that triggered the fallback.
    pub error: ContentError,
    /// Offered actions.
    pub actions: Vec<FallbackAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Output of [`ErrorBoundary::guard`].
pub enum BoundaryOutput<T> {
    /// Content rendered normally.
    Rendered(T),
    /// Content failed; render the fallback.
    Fallback(FallbackPanel),
}

/// Callback receiving each content error once.
pub type ErrorReporter = Box<dyn Fn(&ContentError)>;

/// Catches content failures of one layout slot so the rest of the layout keeps running.
pub struct ErrorBoundary {
    failure: Option<ContentError>,
    reporter: Option<ErrorReporter>,
}

impl fmt::Debug for ErrorBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorBoundary")
            .field("failure", &self.failure)
            .field("reporter", &self.reporter.is_some())
            .finish()
    }
}

impl Default for ErrorBoundary {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self {
            failure: None,
            reporter: None,
        }
    }

    /// Sends every caught error to `reporter`.
    pub fn with_reporter(mut self, reporter: impl Fn(&ContentError) + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Renders through `render` unless the boundary already failed.
    pub fn guard<T>(
        &mut self,
        render: impl FnOnce() -> Result<T, ContentError>,
    ) -> BoundaryOutput<T> {
        if let Some(error) = &self.failure {
            return BoundaryOutput::Fallback(fallback(error.clone()));
        }
        match render() {
            Ok(output) => BoundaryOutput::Rendered(output),
            Err(error) => {
                if let Some(reporter) = &self.reporter {
                    reporter(&error);
                }
                self.failure = Some(error.clone());
                BoundaryOutput::Fallback(fallback(error))
            }
        }
    }

    /// Leaves the fallback state so the next [`ErrorBoundary::guard`] renders again.
    pub fn retry(&mut self) {
        self.failure = None;
    }

    /// Handles the fallback's refresh action. See [`refresh_top_page`].
    pub fn refresh_page(&self, page: &dyn PageHost) -> bool {
        refresh_top_page(page)
    }
}

/// Reloads the top-level page. Returns `false` when the page cannot be reached.
pub fn refresh_top_page(page: &dyn PageHost) -> bool {
    match page.reload_top_window() {
        Ok(()) => true,
        Err(PageAccessError::CrossOrigin) => {
            debug!("top-level window is cross-origin; refresh ignored");
            false
        }
        Err(error) => {
            debug!(%error, "page refresh unavailable");
            false
        }
    }
}

fn fallback(error: ContentError) -> FallbackPanel {
    FallbackPanel {
        error,
        actions: vec![FallbackAction::Retry, FallbackAction::RefreshPage],
    }
}
