use app_layout_contract::{DrawerId, ElementRef, SplitPanelPosition};
use serde::{Deserialize, Serialize};

use crate::{
    config::LayoutConfig,
    drawers::DrawerRegistry,
    focus::FocusControl,
    geometry::{compute_layout, HorizontalInputs, LayoutGeometry, LayoutInputs, VerticalInputs},
    resize::ResizeAxis,
    split_panel::SplitPanelPositionResolver,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    pub present: bool,
    pub open: bool,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPanelState {
    pub present: bool,
    pub open: bool,
    pub preference: Option<SplitPanelPosition>,
    pub side_size: f64,
    pub bottom_size: f64,
    /// Size the rendered panel reported for its current position. Drives the bottom offset
    /// of content and side drawers, and seeds pointer drags.
    pub reported_size: Option<f64>,
    pub forced_bottom: bool,
}

impl SplitPanelState {
    fn new(config: &LayoutConfig) -> Self {
        Self {
            present: false,
            open: false,
            preference: None,
            side_size: config.split_panel_default_side_size,
            bottom_size: config.split_panel_default_bottom_size,
            reported_size: None,
            forced_bottom: false,
        }
    }

    /// Size stored for `position`.
    pub fn size_for(&self, position: SplitPanelPosition) -> f64 {
        match position {
            SplitPanelPosition::Side => self.side_size,
            SplitPanelPosition::Bottom => self.bottom_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChromeHeights {
    pub top_offset: f64,
    pub toolbar_visible: bool,
    pub toolbar_height: f64,
    pub notifications_height: f64,
    pub sticky_notifications: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeTarget {
    Drawer(DrawerId),
    SplitPanel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub target: ResizeTarget,
    pub axis: ResizeAxis,
    pub pointer_start: PointerPosition,
    pub size_start: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub resizing: Option<ResizeSession>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Who initiated a visibility change. Only user changes move focus.
pub enum ChangeSource {
    /// Toolbar trigger, close button or keyboard. `focus_origin` is the element focused before
    /// the change, used when focus restoration is enabled.
    User { focus_origin: Option<ElementRef> },
    /// Parent code or a plugin message.
    Programmatic,
}

impl ChangeSource {
    /// User change with no captured origin.
    pub const USER: Self = Self::User { focus_origin: None };

    pub fn is_user(self) -> bool {
        matches!(self, Self::User { .. })
    }

    pub fn focus_origin(self) -> Option<ElementRef> {
        match self {
            Self::User { focus_origin } => focus_origin,
            Self::Programmatic => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    pub config: LayoutConfig,
    pub viewport: Viewport,
    pub navigation: NavigationState,
    pub drawers: DrawerRegistry,
    pub split_panel: SplitPanelState,
    pub chrome: ChromeHeights,
    pub expanded_drawer: Option<DrawerId>,
    pub focus: FocusControl,
    pub geometry: LayoutGeometry,
}

impl LayoutState {
    pub fn new(config: LayoutConfig, viewport: Viewport) -> Self {
        let mut state = Self {
            navigation: NavigationState {
                present: true,
                open: false,
                width: config.navigation_width,
            },
            split_panel: SplitPanelState::new(&config),
            drawers: DrawerRegistry::default(),
            chrome: ChromeHeights::default(),
            expanded_drawer: None,
            focus: FocusControl::default(),
            geometry: LayoutGeometry::default(),
            viewport,
            config,
        };
        state.refresh_geometry();
        state
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport.width < self.config.mobile_breakpoint
    }

    /// Rendered split panel position.
    pub fn split_panel_position(&self) -> SplitPanelPosition {
        self.geometry
            .horizontal
            .split_panel_position
            .unwrap_or(SplitPanelPosition::Bottom)
    }

    /// Resizable width before a side split panel is subtracted.
    pub fn base_resizable_space(&self) -> f64 {
        let navigation = if self.navigation.present && self.navigation.open {
            self.navigation.width
        } else {
            0.0
        };
        (self.viewport.width - self.config.min_content_width - self.config.content_padding - navigation)
            .max(0.0)
    }

    pub fn layout_inputs(&self) -> LayoutInputs {
        LayoutInputs {
            horizontal: HorizontalInputs {
                viewport_width: self.viewport.width,
                min_content_width: self.config.min_content_width,
                content_padding: self.config.content_padding,
                navigation_open: self.navigation.present && self.navigation.open,
                navigation_width: self.navigation.width,
                active_local_drawer_size: 0.0,
                split_panel_open: self.split_panel.present && self.split_panel.open,
                split_panel_preference: self.split_panel.preference,
                split_panel_size: self.split_panel.side_size,
                active_global_drawer_sizes: Default::default(),
                is_mobile: self.is_mobile(),
                split_panel_previously_forced: self.split_panel.forced_bottom,
                split_panel_resolver: SplitPanelPositionResolver::new(
                    self.config.split_panel_min_side_width,
                    self.config.split_panel_margin(),
                ),
            },
            vertical: VerticalInputs {
                top_offset: self.chrome.top_offset,
                toolbar_visible: self.chrome.toolbar_visible,
                toolbar_height: self.chrome.toolbar_height,
                notifications_height: self.chrome.notifications_height,
                sticky_notifications: self.chrome.sticky_notifications,
                viewport_height: self.viewport.height,
                min_visible_content_height: self.config.min_visible_content_height,
                bottom_split_panel_height: if self.split_panel.present && self.split_panel.open {
                    self.split_panel
                        .reported_size
                        .unwrap_or(self.split_panel.bottom_size)
                } else {
                    0.0
                },
            },
            active_drawers: self.drawers.active_bounds(&self.config),
        }
    }

    /// Recomputes the geometry snapshot and stores the new forced split panel state.
    ///
    /// A size reported for one split panel position is dropped when the panel moves.
    pub fn refresh_geometry(&mut self) {
        let previous = self.geometry.horizontal.split_panel_position;
        self.geometry = compute_layout(&self.layout_inputs());
        self.split_panel.forced_bottom = self.geometry.horizontal.split_panel_forced_position;
        let moved = previous.is_some() && previous != self.geometry.horizontal.split_panel_position;
        if moved && self.split_panel.reported_size.take().is_some() {
            self.geometry = compute_layout(&self.layout_inputs());
        }
    }

    /// Effective size of an active drawer.
    pub fn drawer_size(&self, id: &DrawerId) -> f64 {
        self.geometry
            .drawer_sizes
            .get(id)
            .copied()
            .unwrap_or_else(|| self.drawers.size(id, &self.config))
    }

    /// Width the split panel claims when open on the side, for space eviction.
    pub fn reserved_split_panel_width(&self) -> f64 {
        let open = self.split_panel.present && self.split_panel.open;
        if open && self.split_panel_position() == SplitPanelPosition::Side {
            self.config.split_panel_min_side_size
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mobile_breakpoint_is_exclusive() {
        let config = LayoutConfig::default();
        let state = LayoutState::new(config.clone(), Viewport { width: 687.0, height: 800.0 });
        assert!(state.is_mobile());
        assert!(state.split_panel.forced_bottom);

        let state = LayoutState::new(config, Viewport { width: 688.0, height: 800.0 });
        assert!(!state.is_mobile());
    }

    #[test]
    fn base_resizable_space_ignores_closed_navigation() {
        let mut state = LayoutState::new(
            LayoutConfig::default(),
            Viewport { width: 1200.0, height: 800.0 },
        );
        assert_eq!(state.base_resizable_space(), 1200.0 - 280.0 - 48.0);
        state.navigation.open = true;
        assert_eq!(state.base_resizable_space(), 592.0);
        state.navigation.present = false;
        assert_eq!(state.base_resizable_space(), 1200.0 - 280.0 - 48.0);
    }
}
