//! Explicit effect-queue executor for reducer-emitted side effects.

use app_layout_contract::FocusTarget;
use app_layout_host::{HostServices, PointerListenerGuard};
use tracing::{debug, trace};

use crate::{focus::FocusCommand, reducer::LayoutEffect};

/// Runs host-facing effects and hands notification effects back to the caller.
#[derive(Debug)]
pub struct EffectExecutor {
    host: HostServices,
    pointer_guard: Option<PointerListenerGuard>,
}

impl EffectExecutor {
    pub fn new(host: HostServices) -> Self {
        Self {
            host,
            pointer_guard: None,
        }
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    /// Whether a document pointer listener is installed.
    pub fn is_capturing(&self) -> bool {
        self.pointer_guard.is_some()
    }

    /// Drains `effects` in order. Returns the effects meant for the hosting page
    /// (visibility, size and preference notifications).
    pub fn run(&mut self, effects: Vec<LayoutEffect>) -> Vec<LayoutEffect> {
        let mut notifications = Vec::new();
        for effect in effects {
            match effect {
                LayoutEffect::Focus(command) => {
                    self.focus(&command);
                }
                LayoutEffect::CapturePointer(target) => {
                    trace!(?target, "capturing pointer");
                    // Replacing an armed guard tears the previous listener down first.
                    self.pointer_guard = None;
                    self.pointer_guard = Some(self.host.pointer.listen());
                }
                LayoutEffect::ReleasePointer => {
                    self.pointer_guard = None;
                }
                notification => {
                    trace!(?notification, "layout notification");
                    notifications.push(notification);
                }
            }
        }
        notifications
    }

    /// Moves focus through the host. Returns whether any element received focus.
    pub fn focus(&self, command: &FocusCommand) -> bool {
        let focused = match command {
            FocusCommand::Focus(target) => self.host.focus.focus(target),
            FocusCommand::Restore { element, fallback } => {
                if self.host.focus.is_connected(*element) {
                    self.host
                        .focus
                        .focus(&FocusTarget::Element { element: *element })
                } else {
                    fallback
                        .as_ref()
                        .map(|target| self.host.focus.focus(target))
                        .unwrap_or(false)
                }
            }
        };
        if !focused {
            debug!(?command, "focus target not rendered");
        }
        focused
    }

    /// Drops any pointer listener.
    pub fn release_pointer(&mut self) {
        self.pointer_guard = None;
    }
}
