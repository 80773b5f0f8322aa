//! Host service bundle injected into layout instances.

use std::rc::Rc;

use crate::{FocusHost, NoopFocusHost, NoopPageHost, NoopPointerHost, PageHost, PointerHost};

/// Runtime-selected host service bundle injected into every layout instance.
///
/// Environment-specific service selection happens before this bundle crosses into the runtime,
/// which keeps the layout engine decoupled from document details.
#[derive(Clone)]
pub struct HostServices {
    /// Document focus service.
    pub focus: Rc<dyn FocusHost>,
    /// Top-level page service.
    pub page: Rc<dyn PageHost>,
    /// Global pointer listener service.
    pub pointer: Rc<dyn PointerHost>,
}

impl HostServices {
    /// Bundle of no-op adapters.
    pub fn noop() -> Self {
        Self {
            focus: Rc::new(NoopFocusHost),
            page: Rc::new(NoopPageHost),
            pointer: Rc::new(NoopPointerHost),
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}
