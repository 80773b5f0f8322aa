//! Shared contract types between the app layout runtime, its host adapters, and hosting pages.
//!
//! This crate is intentionally runtime-agnostic. It defines drawer descriptors, focus targets,
//! the props exchanged between cooperating layout instances, and the imperative instance API
//! without depending on the layout engine or any browser API.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier for a drawer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DrawerId(String);

impl DrawerId {
    /// Creates a drawer identifier from trusted caller input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DrawerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DrawerId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Identifier of one app layout instance on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layout-{}", self.0)
    }
}

/// Opaque handle to a focusable element owned by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementRef(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Where a drawer lives in the layout.
pub enum DrawerPlacement {
    /// The single side drawer historically called "tools".
    Local,
    /// Side drawer that can be open together with other drawers.
    Global,
    /// Global drawer docked at the bottom of the content area.
    BottomGlobal,
    /// Global side drawer with an expanded full-screen mode.
    Ai,
}

impl DrawerPlacement {
    /// Returns `true` for placements that may be active simultaneously.
    pub const fn is_global(self) -> bool {
        !matches!(self, Self::Local)
    }

    /// Returns `true` when the drawer is sized by height instead of width.
    pub const fn is_bottom(self) -> bool {
        matches!(self, Self::BottomGlobal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Trigger button shown in the toolbar for a drawer.
pub struct DrawerTrigger {
    /// Built-in icon name.
    pub icon_name: Option<String>,
    /// Custom SVG markup.
    pub icon_svg: Option<String>,
    /// Whether the trigger shows a badge.
    pub badge: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Accessible labels for a drawer's chrome.
pub struct DrawerAriaLabels {
    /// Label of the drawer landmark.
    pub drawer_name: Option<String>,
    /// Label of the close button.
    pub close_button: Option<String>,
    /// Label of the trigger button.
    pub trigger_button: Option<String>,
    /// Label of the resize handle.
    pub resize_handle: Option<String>,
    /// Label of the expanded-mode button.
    pub expanded_mode_button: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Drawer definition supplied by the hosting page or by a runtime plugin.
pub struct DrawerDescriptor {
    /// Unique drawer id.
    pub id: DrawerId,
    /// Drawer placement.
    pub placement: DrawerPlacement,
    /// Opaque drawer content.
    #[serde(default)]
    pub content: Value,
    /// Toolbar trigger, absent for programmatically opened drawers.
    #[serde(default)]
    pub trigger: Option<DrawerTrigger>,
    /// Accessible labels.
    #[serde(default)]
    pub aria_labels: DrawerAriaLabels,
    /// Whether the drawer exposes a resize handle.
    #[serde(default)]
    pub resizable: bool,
    /// Initial width (side) or height (bottom).
    #[serde(default)]
    pub default_size: Option<f64>,
    /// Minimum size; falls back to the configured drawer minimum.
    #[serde(default)]
    pub min_size: Option<f64>,
    /// Whether the drawer supports the expanded full-screen mode.
    #[serde(default)]
    pub is_expandable: bool,
    /// Keep content mounted while the drawer is inactive.
    #[serde(default)]
    pub preserve_inactive_content: bool,
}

impl DrawerDescriptor {
    /// Creates a descriptor with a trigger and default options.
    pub fn new(id: impl Into<String>, placement: DrawerPlacement) -> Self {
        Self {
            id: DrawerId::new(id),
            placement,
            content: Value::Null,
            trigger: Some(DrawerTrigger::default()),
            aria_labels: DrawerAriaLabels::default(),
            resizable: false,
            default_size: None,
            min_size: None,
            is_expandable: false,
            preserve_inactive_content: false,
        }
    }

    /// Marks the drawer as resizable.
    pub fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }

    /// Sets the default size.
    pub fn with_default_size(mut self, size: f64) -> Self {
        self.default_size = Some(size);
        self
    }

    /// Sets the minimum size.
    pub fn with_min_size(mut self, size: f64) -> Self {
        self.min_size = Some(size);
        self
    }

    /// Removes the trigger button.
    pub fn without_trigger(mut self) -> Self {
        self.trigger = None;
        self
    }

    /// Marks the drawer as expandable.
    pub fn expandable(mut self) -> Self {
        self.is_expandable = true;
        self
    }

    /// Keeps content mounted while inactive.
    pub fn preserving_inactive_content(mut self) -> Self {
        self.preserve_inactive_content = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Split panel placement.
pub enum SplitPanelPosition {
    /// Docked beside the content.
    Side,
    /// Docked below the content.
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// Element the focus coordinator can move focus to.
pub enum FocusTarget {
    /// Toolbar trigger for a drawer.
    DrawerTrigger {
        /// Drawer owning the trigger.
        id: DrawerId,
    },
    /// Close button inside a drawer.
    DrawerClose {
        /// Drawer owning the button.
        id: DrawerId,
    },
    /// Resize handle of a drawer.
    DrawerResizeHandle {
        /// Drawer owning the handle.
        id: DrawerId,
    },
    /// Toolbar toggle for navigation.
    NavigationToggle,
    /// Close button inside navigation.
    NavigationClose,
    /// Toolbar toggle for the split panel.
    SplitPanelToggle,
    /// Close button inside the split panel.
    SplitPanelClose,
    /// Resize handle of the split panel.
    SplitPanelResizeHandle,
    /// Arbitrary element captured from the document.
    Element {
        /// Element handle.
        element: ElementRef,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Role of a layout instance in the page-wide deduplication protocol.
pub enum DeduplicationType {
    /// Renders the merged toolbar.
    Primary,
    /// Contributes props to the primary and renders no toolbar of its own.
    Secondary,
    /// Registered but currently not visible; contributes nothing.
    Suspended,
    /// Opted out; always renders its own toolbar.
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Toolbar capability that exactly one instance may define.
pub enum Capability {
    /// Local drawers / tools.
    Drawers,
    /// Global drawers.
    GlobalDrawers,
    /// Navigation toggle.
    Navigation,
    /// Split panel toggle.
    SplitPanel,
    /// Breadcrumbs slot.
    Breadcrumbs,
    /// Expanded drawer mode.
    ExpandedDrawer,
}

impl Capability {
    /// Returns a stable token for diagnostics.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Drawers => "tools or drawers",
            Self::GlobalDrawers => "global drawers",
            Self::Navigation => "navigation",
            Self::SplitPanel => "split panel",
            Self::Breadcrumbs => "breadcrumbs",
            Self::ExpandedDrawer => "expanded drawer",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Toolbar aria labels, shallow-merged across contributing instances.
pub type AriaLabels = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Navigation state an instance exposes to the toolbar.
pub struct NavigationProps {
    /// Whether navigation is open.
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Local drawers an instance exposes to the toolbar.
pub struct DrawersProps {
    /// Registered local drawers.
    pub drawers: Vec<DrawerDescriptor>,
    /// Active local drawer.
    pub active_drawer_id: Option<DrawerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Global drawers an instance exposes to the toolbar.
pub struct GlobalDrawersProps {
    /// Registered global drawers.
    pub drawers: Vec<DrawerDescriptor>,
    /// Active global drawers, most recently opened first.
    pub active_drawer_ids: Vec<DrawerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Split panel toggle state an instance exposes to the toolbar.
pub struct SplitPanelToggleProps {
    /// Whether the split panel is open.
    pub open: bool,
    /// Rendered position.
    pub position: SplitPanelPosition,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Props one instance shares with the primary instance.
pub struct SharedProps {
    /// Navigation toggle.
    pub navigation: Option<NavigationProps>,
    /// Local drawers.
    pub drawers: Option<DrawersProps>,
    /// Global drawers.
    pub global_drawers: Option<GlobalDrawersProps>,
    /// Split panel toggle.
    pub split_panel: Option<SplitPanelToggleProps>,
    /// Breadcrumbs content.
    pub breadcrumbs: Option<Value>,
    /// Drawer shown in expanded mode.
    pub expanded_drawer_id: Option<DrawerId>,
    /// Toolbar aria labels.
    pub aria_labels: AriaLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A merged toolbar value and the instance that owns it.
pub struct Contribution<T> {
    /// Instance whose callbacks handle interactions with this value.
    pub owner: InstanceId,
    /// Contributed value.
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Consolidated toolbar rendered by the primary instance.
pub struct ToolbarProps {
    /// Local drawers.
    pub drawers: Option<Contribution<DrawersProps>>,
    /// Global drawers.
    pub global_drawers: Option<Contribution<GlobalDrawersProps>>,
    /// Navigation toggle.
    pub navigation: Option<Contribution<NavigationProps>>,
    /// Split panel toggle.
    pub split_panel: Option<Contribution<SplitPanelToggleProps>>,
    /// Breadcrumbs.
    pub breadcrumbs: Option<Contribution<Value>>,
    /// Expanded drawer.
    pub expanded_drawer_id: Option<Contribution<DrawerId>>,
    /// Merged aria labels.
    pub aria_labels: AriaLabels,
}

impl ToolbarProps {
    /// Returns `true` when any capability besides aria labels is defined.
    pub fn has_capabilities(&self) -> bool {
        self.drawers.is_some()
            || self.global_drawers.is_some()
            || self.navigation.is_some()
            || self.split_panel.is_some()
            || self.breadcrumbs.is_some()
            || self.expanded_drawer_id.is_some()
    }

    /// Returns the instance owning `capability`, if any.
    pub fn owner_of(&self, capability: Capability) -> Option<InstanceId> {
        match capability {
            Capability::Drawers => self.drawers.as_ref().map(|c| c.owner),
            Capability::GlobalDrawers => self.global_drawers.as_ref().map(|c| c.owner),
            Capability::Navigation => self.navigation.as_ref().map(|c| c.owner),
            Capability::SplitPanel => self.split_panel.as_ref().map(|c| c.owner),
            Capability::Breadcrumbs => self.breadcrumbs.as_ref().map(|c| c.owner),
            Capability::ExpandedDrawer => self.expanded_drawer_id.as_ref().map(|c| c.owner),
        }
    }
}

/// Imperative API exposed to parent code holding a reference to a layout instance.
pub trait AppLayoutApi {
    /// Closes navigation when the layout is in mobile mode.
    fn close_navigation_if_necessary(&mut self);
    /// Opens the local tools drawer.
    fn open_tools(&mut self);
    /// Focuses the close button of the active local drawer.
    fn focus_tools_close(&mut self);
    /// Focuses the most recently opened active drawer.
    fn focus_active_drawer(&mut self);
    /// Focuses the split panel.
    fn focus_split_panel(&mut self);
    /// Focuses navigation.
    fn focus_navigation(&mut self);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn drawer_descriptor_deserializes_with_defaults() {
        let descriptor: DrawerDescriptor = serde_json::from_value(json!({
            "id": "help",
            "placement": "bottom-global",
        }))
        .expect("descriptor");

        assert_eq!(descriptor.id, DrawerId::new("help"));
        assert!(descriptor.placement.is_bottom());
        assert!(descriptor.placement.is_global());
        assert_eq!(descriptor.trigger, None);
        assert!(!descriptor.resizable);
    }

    #[test]
    fn toolbar_without_capabilities_reports_empty() {
        let mut toolbar = ToolbarProps::default();
        toolbar
            .aria_labels
            .insert("navigationToggle".to_string(), "Open".to_string());
        assert!(!toolbar.has_capabilities());

        toolbar.breadcrumbs = Some(Contribution {
            owner: InstanceId(2),
            value: json!(["Home"]),
        });
        assert!(toolbar.has_capabilities());
        assert_eq!(
            toolbar.owner_of(Capability::Breadcrumbs),
            Some(InstanceId(2))
        );
        assert_eq!(toolbar.owner_of(Capability::Navigation), None);
    }
}
