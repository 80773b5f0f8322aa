//! Global pointer listener contracts for drag resizing.

use std::{cell::Cell, rc::Rc};

/// Scoped handle for a global pointer listener.
///
/// The teardown runs exactly once, when the guard is dropped.
pub struct PointerListenerGuard {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl PointerListenerGuard {
    /// Wraps a teardown callback.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Creates a guard with nothing to tear down.
    pub fn inert() -> Self {
        Self { teardown: None }
    }
}

impl Drop for PointerListenerGuard {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for PointerListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerListenerGuard")
            .field("armed", &self.teardown.is_some())
            .finish()
    }
}

/// Host service installing document-wide pointer move/up listeners.
pub trait PointerHost {
    /// Starts listening for pointer moves; listeners are removed when the guard drops.
    fn listen(&self) -> PointerListenerGuard;
}

#[derive(Debug, Clone, Copy, Default)]
/// Pointer service with no listeners.
pub struct NoopPointerHost;

impl PointerHost for NoopPointerHost {
    fn listen(&self) -> PointerListenerGuard {
        PointerListenerGuard::inert()
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory pointer service counting live listeners.
pub struct MemoryPointerHost {
    live: Rc<Cell<usize>>,
}

impl MemoryPointerHost {
    /// Returns the number of installed listeners that have not been torn down.
    pub fn live_listeners(&self) -> usize {
        self.live.get()
    }
}

impl PointerHost for MemoryPointerHost {
    fn listen(&self) -> PointerListenerGuard {
        self.live.set(self.live.get() + 1);
        let live = Rc::clone(&self.live);
        PointerListenerGuard::new(move || live.set(live.get().saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropping_guard_removes_listener() {
        let host = MemoryPointerHost::default();
        let guard = host.listen();
        assert_eq!(host.live_listeners(), 1);
        drop(guard);
        assert_eq!(host.live_listeners(), 0);
    }
}
