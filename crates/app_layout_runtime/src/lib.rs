//! App layout engine: drawer registry, layout geometry, resizing, focus coordination and
//! page-wide toolbar deduplication, driven by a single reducer.

pub mod config;
pub mod dedup;
pub mod drawers;
pub mod effect_executor;
pub mod error_boundary;
pub mod focus;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod reducer;
pub mod resize;
pub mod split_panel;
pub mod widget;

pub use config::{ConfigError, LayoutConfig};
pub use dedup::{
    instance_registry, merge_props, InstanceRegistry, MergeConflict, MergeOutcome, Registration,
};
pub use drawers::{ContentState, DrawerRegistry};
pub use error_boundary::{
    BoundaryOutput, ContentError, ContentRegion, ErrorBoundary, FallbackAction, FallbackPanel,
};
pub use focus::{FocusCommand, FocusRegion, Interaction};
pub use geometry::{
    compute_horizontal_layout, compute_layout, compute_vertical_layout, LayoutGeometry,
};
pub use layout::{AppLayout, LayoutOptions};
pub use model::*;
pub use reducer::{reduce_layout, LayoutAction, LayoutEffect, LayoutError};
pub use resize::{ResizeAxis, ResizeKey};
pub use split_panel::SplitPanelPositionResolver;
pub use widget::{PendingWidget, WidgetSlot};
