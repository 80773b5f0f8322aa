//! Page-wide plugin registry shared by every layout instance on the page.
//!
//! Runtime drawers, widget implementation overrides and feature flags are published here by
//! the hosting application and discovered by layout instances when they mount.

use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    rc::Rc,
};

use app_layout_contract::{DrawerDescriptor, DrawerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::widgets::{WidgetImplementation, WidgetLoader};

/// Loader type stored for widget overrides.
pub type SharedWidgetLoader = Rc<dyn WidgetLoader<Implementation = WidgetImplementation>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Component part whose rendering can be overridden by a widget implementation.
pub enum WidgetPart {
    /// The consolidated toolbar.
    AppLayoutToolbar,
    /// Drawer chrome.
    AppLayoutDrawers,
    /// Split panel chrome.
    AppLayoutSplitPanel,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Plugin registry rejections.
pub enum PluginError {
    /// A widget implementation is already installed for this part.
    #[error("widget implementation already installed for {0:?}")]
    AlreadyInstalled(WidgetPart),
    /// A runtime drawer with this id is already registered.
    #[error("runtime drawer `{0}` is already registered")]
    DuplicateDrawer(DrawerId),
    /// No runtime drawer with this id is registered.
    #[error("runtime drawer `{0}` is not registered")]
    UnknownDrawer(DrawerId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Imperative request addressed to whichever layout hosts a runtime drawer.
pub enum DrawerMessage {
    /// Open a drawer.
    Open(DrawerId),
    /// Close a drawer.
    Close(DrawerId),
    /// Resize a drawer.
    Resize {
        /// Target drawer.
        id: DrawerId,
        /// Requested size.
        size: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Page-wide boolean toggles read once when a layout mounts.
pub struct FeatureFlags {
    /// Merged toolbar mode; enables multi-instance deduplication.
    pub toolbar: bool,
    /// Development-time delay before heavier widgets mount.
    pub simulate_widget_delay: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            toolbar: true,
            simulate_widget_delay: false,
        }
    }
}

#[derive(Default)]
struct PluginState {
    widgets: BTreeMap<WidgetPart, SharedWidgetLoader>,
    drawers: Vec<DrawerDescriptor>,
    revision: u64,
    messages: VecDeque<DrawerMessage>,
    flags: FeatureFlags,
}

#[derive(Clone, Default)]
/// Handle to the page-wide plugin registry.
pub struct PluginRegistry {
    inner: Rc<RefCell<PluginState>>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PluginRegistry")
            .field("widgets", &inner.widgets.keys().collect::<Vec<_>>())
            .field("drawers", &inner.drawers.len())
            .field("revision", &inner.revision)
            .field("flags", &inner.flags)
            .finish()
    }
}

impl PluginRegistry {
    /// Installs the single widget implementation for `part`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::AlreadyInstalled`] when `part` already has an implementation; the
    /// existing implementation is kept.
    pub fn install_widget(
        &self,
        part: WidgetPart,
        loader: SharedWidgetLoader,
    ) -> Result<(), PluginError> {
        let mut inner = self.inner.borrow_mut();
        if inner.widgets.contains_key(&part) {
            warn!(?part, "widget implementation already installed; ignoring");
            return Err(PluginError::AlreadyInstalled(part));
        }
        inner.widgets.insert(part, loader);
        Ok(())
    }

    /// Returns the installed loader for `part`.
    pub fn widget_loader(&self, part: WidgetPart) -> Option<SharedWidgetLoader> {
        self.inner.borrow().widgets.get(&part).cloned()
    }

    /// Registers a runtime drawer.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::DuplicateDrawer`] when the id is taken.
    pub fn register_drawer(&self, descriptor: DrawerDescriptor) -> Result<(), PluginError> {
        let mut inner = self.inner.borrow_mut();
        if inner.drawers.iter().any(|d| d.id == descriptor.id) {
            return Err(PluginError::DuplicateDrawer(descriptor.id));
        }
        inner.drawers.push(descriptor);
        inner.revision += 1;
        Ok(())
    }

    /// Replaces a registered runtime drawer.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::UnknownDrawer`] when the id is not registered.
    pub fn update_drawer(&self, descriptor: DrawerDescriptor) -> Result<(), PluginError> {
        let mut inner = self.inner.borrow_mut();
        let Some(slot) = inner.drawers.iter_mut().find(|d| d.id == descriptor.id) else {
            return Err(PluginError::UnknownDrawer(descriptor.id));
        };
        *slot = descriptor;
        inner.revision += 1;
        Ok(())
    }

    /// Removes a runtime drawer. Returns whether it was registered.
    pub fn unregister_drawer(&self, id: &DrawerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.drawers.len();
        inner.drawers.retain(|d| &d.id != id);
        let removed = inner.drawers.len() != before;
        if removed {
            inner.revision += 1;
        }
        removed
    }

    /// Returns registered runtime drawers in registration order.
    pub fn drawers(&self) -> Vec<DrawerDescriptor> {
        self.inner.borrow().drawers.clone()
    }

    /// Monotonic counter bumped on every runtime drawer change.
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    /// Queues a drawer message for the hosting layout.
    pub fn post_message(&self, message: DrawerMessage) {
        self.inner.borrow_mut().messages.push_back(message);
    }

    /// Drains queued drawer messages in posting order.
    pub fn drain_messages(&self) -> Vec<DrawerMessage> {
        self.inner.borrow_mut().messages.drain(..).collect()
    }

    /// Replaces the page-wide feature flags.
    pub fn set_feature_flags(&self, flags: FeatureFlags) {
        self.inner.borrow_mut().flags = flags;
    }

    /// Returns the page-wide feature flags.
    pub fn feature_flags(&self) -> FeatureFlags {
        self.inner.borrow().flags
    }

    /// Clears every registration.
    pub fn reset(&self) {
        *self.inner.borrow_mut() = PluginState::default();
    }
}

thread_local! {
    static GLOBAL_PLUGIN_REGISTRY: PluginRegistry = PluginRegistry::default();
}

/// Returns the page-wide plugin registry.
pub fn plugin_registry() -> PluginRegistry {
    GLOBAL_PLUGIN_REGISTRY.with(|registry| registry.clone())
}
