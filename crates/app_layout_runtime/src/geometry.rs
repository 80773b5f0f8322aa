//! Pure horizontal/vertical layout solver.
//!
//! Every function here is side-effect free: callers build a [`LayoutInputs`] snapshot from the
//! current state and receive a [`LayoutGeometry`] snapshot back. Nothing is computed
//! incrementally; the reducer recomputes the whole snapshot after every transition.

use std::collections::BTreeMap;

use app_layout_contract::{DrawerId, DrawerPlacement, SplitPanelPosition};

use crate::split_panel::{resolve_position, SplitPanelPositionResolver};

#[derive(Debug, Clone, PartialEq)]
/// Inputs of the horizontal solver.
pub struct HorizontalInputs {
    /// Viewport inline size.
    pub viewport_width: f64,
    /// Width reserved for main content.
    pub min_content_width: f64,
    /// Horizontal content padding.
    pub content_padding: f64,
    /// Whether navigation is open.
    pub navigation_open: bool,
    /// Navigation width.
    pub navigation_width: f64,
    /// Width of the active local drawer, zero when none.
    pub active_local_drawer_size: f64,
    /// Whether the split panel is open.
    pub split_panel_open: bool,
    /// Stored split panel position preference.
    pub split_panel_preference: Option<SplitPanelPosition>,
    /// Split panel width when docked on the side.
    pub split_panel_size: f64,
    /// Widths of active side global drawers.
    pub active_global_drawer_sizes: BTreeMap<DrawerId, f64>,
    /// Mobile layout.
    pub is_mobile: bool,
    /// Forced state from the previous snapshot.
    pub split_panel_previously_forced: bool,
    /// Forced-position thresholds.
    pub split_panel_resolver: SplitPanelPositionResolver,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Output of the horizontal solver.
pub struct HorizontalLayout {
    /// Width left for drawers after navigation, content and a side split panel.
    pub resizable_space_available: f64,
    /// Sum of active side global drawer widths.
    pub total_active_global_drawers_size: f64,
    /// Width the split panel could use beside the local drawer.
    pub available_width_for_split_panel: f64,
    /// Rendered split panel position.
    pub split_panel_position: Option<SplitPanelPosition>,
    /// Whether the position is forced to the bottom.
    pub split_panel_forced_position: bool,
    /// Width consumed by an open side split panel.
    pub side_split_panel_size: f64,
    /// Ceiling for the local drawer.
    pub max_drawer_size: f64,
    /// Ceiling for each active side global drawer.
    pub max_global_drawer_sizes: BTreeMap<DrawerId, f64>,
    /// Ceiling for a side split panel.
    pub max_split_panel_size: f64,
}

/// Solves the horizontal layout.
pub fn compute_horizontal_layout(inputs: &HorizontalInputs) -> HorizontalLayout {
    let navigation = if inputs.navigation_open {
        inputs.navigation_width
    } else {
        0.0
    };
    let mut resizable_space_available = (inputs.viewport_width
        - inputs.min_content_width
        - inputs.content_padding
        - navigation)
        .max(0.0);
    let total_active_global_drawers_size: f64 = inputs.active_global_drawer_sizes.values().sum();
    let local = inputs.active_local_drawer_size;
    let available_width_for_split_panel = (resizable_space_available - local).max(0.0);

    let split_panel_forced_position = inputs.split_panel_resolver.next_forced(
        inputs.split_panel_previously_forced,
        available_width_for_split_panel,
        inputs.is_mobile,
    );
    let position = resolve_position(split_panel_forced_position, inputs.split_panel_preference);
    let side_split_panel_size = if position == SplitPanelPosition::Side && inputs.split_panel_open {
        inputs.split_panel_size
    } else {
        0.0
    };

    let max_split_panel_size =
        (resizable_space_available - total_active_global_drawers_size - local).max(0.0);
    resizable_space_available = (resizable_space_available - side_split_panel_size).max(0.0);

    let max_drawer_size = (resizable_space_available - total_active_global_drawers_size).max(0.0);
    let max_global_drawer_sizes = inputs
        .active_global_drawer_sizes
        .iter()
        .map(|(id, size)| {
            let max = resizable_space_available - local - total_active_global_drawers_size + size;
            (id.clone(), max.max(0.0))
        })
        .collect();

    HorizontalLayout {
        resizable_space_available,
        total_active_global_drawers_size,
        available_width_for_split_panel,
        split_panel_position: Some(position),
        split_panel_forced_position,
        side_split_panel_size,
        max_drawer_size,
        max_global_drawer_sizes,
        max_split_panel_size,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Inputs of the vertical solver.
pub struct VerticalInputs {
    /// Offset of the layout from the top of the viewport (sticky page header).
    pub top_offset: f64,
    /// Whether the toolbar is rendered.
    pub toolbar_visible: bool,
    /// Toolbar height.
    pub toolbar_height: f64,
    /// Notifications height.
    pub notifications_height: f64,
    /// Whether notifications stick to the top while scrolling.
    pub sticky_notifications: bool,
    /// Viewport block size.
    pub viewport_height: f64,
    /// Content height bottom panels always leave visible.
    pub min_visible_content_height: f64,
    /// Height of the split panel when open at the bottom, as rendered by its content.
    pub bottom_split_panel_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Sticky offsets measured from the top of the viewport.
pub struct VerticalOffsets {
    /// Toolbar top.
    pub toolbar: f64,
    /// Notifications top.
    pub notifications: f64,
    /// Content header top.
    pub header: f64,
    /// Drawers top.
    pub drawers: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Output of the vertical solver.
pub struct VerticalLayout {
    /// Sticky offsets.
    pub offsets: VerticalOffsets,
    /// Ceiling for bottom drawers and a bottom split panel.
    pub max_bottom_panel_size: f64,
    /// Space a bottom split panel takes below content and side drawers.
    pub content_bottom_offset: f64,
    /// Height left for side drawers between their top offset and a bottom split panel.
    pub drawer_height: f64,
}

/// Solves the vertical stacking: `top_offset`, then toolbar, then sticky notifications.
pub fn compute_vertical_layout(inputs: &VerticalInputs) -> VerticalLayout {
    let toolbar = inputs.top_offset;
    let below_toolbar = if inputs.toolbar_visible {
        toolbar + inputs.toolbar_height
    } else {
        toolbar
    };
    let header = if inputs.sticky_notifications {
        below_toolbar + inputs.notifications_height
    } else {
        below_toolbar
    };
    let offsets = VerticalOffsets {
        toolbar,
        notifications: below_toolbar,
        header,
        drawers: below_toolbar,
    };
    let content_bottom_offset = inputs.bottom_split_panel_height.max(0.0);
    VerticalLayout {
        offsets,
        max_bottom_panel_size: (inputs.viewport_height
            - offsets.drawers
            - inputs.min_visible_content_height)
            .max(0.0),
        content_bottom_offset,
        drawer_height: (inputs.viewport_height - offsets.drawers - content_bottom_offset).max(0.0),
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Size and minimum of one active drawer.
pub struct DrawerBounds {
    /// Drawer id.
    pub id: DrawerId,
    /// Drawer placement.
    pub placement: DrawerPlacement,
    /// Stored size.
    pub size: f64,
    /// Minimum size.
    pub min_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
/// Full solver input snapshot.
pub struct LayoutInputs {
    /// Horizontal inputs without drawer sizes.
    pub horizontal: HorizontalInputs,
    /// Vertical inputs.
    pub vertical: VerticalInputs,
    /// Active drawers.
    pub active_drawers: Vec<DrawerBounds>,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Derived geometry snapshot. Never mutated independently of its inputs.
pub struct LayoutGeometry {
    /// Horizontal solution.
    pub horizontal: HorizontalLayout,
    /// Vertical solution.
    pub vertical: VerticalLayout,
    /// Rendered size of each active drawer, clamped into its range.
    pub drawer_sizes: BTreeMap<DrawerId, f64>,
}

impl LayoutGeometry {
    /// Returns the ceiling for a drawer with `placement`.
    pub fn max_drawer_size(&self, id: &DrawerId, placement: DrawerPlacement) -> f64 {
        match placement {
            DrawerPlacement::Local => self.horizontal.max_drawer_size,
            DrawerPlacement::BottomGlobal => self.vertical.max_bottom_panel_size,
            DrawerPlacement::Global | DrawerPlacement::Ai => self
                .horizontal
                .max_global_drawer_sizes
                .get(id)
                .copied()
                .unwrap_or(self.horizontal.max_drawer_size),
        }
    }

    /// Returns the ceiling for the split panel at `position`.
    pub fn max_split_panel_size(&self, position: SplitPanelPosition) -> f64 {
        match position {
            SplitPanelPosition::Side => self.horizontal.max_split_panel_size,
            SplitPanelPosition::Bottom => self.vertical.max_bottom_panel_size,
        }
    }
}

/// Solves the whole layout.
pub fn compute_layout(inputs: &LayoutInputs) -> LayoutGeometry {
    let mut horizontal_inputs = inputs.horizontal.clone();
    horizontal_inputs.active_local_drawer_size = 0.0;
    horizontal_inputs.active_global_drawer_sizes.clear();
    for drawer in &inputs.active_drawers {
        match drawer.placement {
            DrawerPlacement::Local => horizontal_inputs.active_local_drawer_size = drawer.size,
            DrawerPlacement::Global | DrawerPlacement::Ai => {
                horizontal_inputs
                    .active_global_drawer_sizes
                    .insert(drawer.id.clone(), drawer.size);
            }
            DrawerPlacement::BottomGlobal => {}
        }
    }

    let horizontal = compute_horizontal_layout(&horizontal_inputs);
    let mut vertical_inputs = inputs.vertical;
    let at_bottom = horizontal.split_panel_position == Some(SplitPanelPosition::Bottom);
    if !(horizontal_inputs.split_panel_open && at_bottom) {
        vertical_inputs.bottom_split_panel_height = 0.0;
    }

    let mut geometry = LayoutGeometry {
        horizontal,
        vertical: compute_vertical_layout(&vertical_inputs),
        drawer_sizes: BTreeMap::new(),
    };
    for drawer in &inputs.active_drawers {
        let max = geometry.max_drawer_size(&drawer.id, drawer.placement);
        let size = if max < drawer.min_size {
            drawer.min_size
        } else {
            drawer.size.clamp(drawer.min_size, max)
        };
        geometry.drawer_sizes.insert(drawer.id.clone(), size);
    }
    geometry
}
