//! Reducer actions, side-effect intents, and transition logic for the layout runtime.

use app_layout_contract::{DrawerDescriptor, DrawerId, SplitPanelPosition};
use thiserror::Error;
use tracing::trace;

use crate::{
    focus::{resolve_focus, FocusCommand, FocusRegion, Interaction},
    model::{
        ChangeSource, ChromeHeights, InteractionState, LayoutState, PointerPosition, ResizeSession,
        ResizeTarget, Viewport,
    },
    resize::{clamp_size, keyboard_resize, relative_size, ResizeAxis, ResizeKey},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_layout`] to mutate [`LayoutState`].
pub enum LayoutAction {
    /// Viewport was resized.
    SetViewport(Viewport),
    /// Heights of the sticky chrome above the content changed.
    SetChrome(ChromeHeights),
    /// Navigation slot was added to or removed from the layout.
    SetNavigationPresent {
        /// Whether the layout renders navigation.
        present: bool,
    },
    /// Open or close navigation.
    SetNavigationOpen {
        /// Requested state.
        open: bool,
        /// Initiator.
        source: ChangeSource,
    },
    /// Change navigation width.
    SetNavigationWidth {
        /// New width.
        width: f64,
    },
    /// Replace the declarative drawer list.
    SetDrawers {
        /// Drawers in toolbar order.
        drawers: Vec<DrawerDescriptor>,
    },
    /// Register a runtime drawer.
    RegisterDrawer(DrawerDescriptor),
    /// Replace a registered drawer definition.
    UpdateDrawer(DrawerDescriptor),
    /// Remove a runtime or declarative drawer.
    UnregisterDrawer {
        /// Drawer to remove.
        id: DrawerId,
    },
    /// Open a drawer.
    OpenDrawer {
        /// Drawer to open.
        id: DrawerId,
        /// Initiator.
        source: ChangeSource,
    },
    /// Close a drawer.
    CloseDrawer {
        /// Drawer to close.
        id: DrawerId,
        /// Initiator.
        source: ChangeSource,
    },
    /// Open a closed drawer or close an open one.
    ToggleDrawer {
        /// Drawer to toggle.
        id: DrawerId,
        /// Initiator.
        source: ChangeSource,
    },
    /// Set a drawer size, clamped into its current range.
    ResizeDrawer {
        /// Drawer to resize.
        id: DrawerId,
        /// Requested size.
        size: f64,
    },
    /// Show a drawer in expanded mode, or leave expanded mode.
    SetExpandedDrawer {
        /// Drawer to expand.
        id: Option<DrawerId>,
    },
    /// Split panel slot was added to or removed from the layout.
    SetSplitPanelPresent {
        /// Whether the layout renders a split panel.
        present: bool,
    },
    /// Open or close the split panel.
    SetSplitPanelOpen {
        /// Requested state.
        open: bool,
        /// Initiator.
        source: ChangeSource,
    },
    /// Change the split panel position preference.
    SetSplitPanelPosition {
        /// Preferred position.
        position: SplitPanelPosition,
        /// Initiator.
        source: ChangeSource,
    },
    /// Set the split panel size at its current position.
    ResizeSplitPanel {
        /// Requested size.
        size: f64,
    },
    /// Rendered split panel size measured by the host.
    ReportSplitPanelSize {
        /// Measured size.
        size: f64,
    },
    /// Pointer went down on a resize handle.
    BeginResize {
        /// Panel being resized.
        target: ResizeTarget,
        /// Pointer position.
        pointer: PointerPosition,
    },
    /// Pointer moved during a resize.
    UpdateResize {
        /// Pointer position.
        pointer: PointerPosition,
    },
    /// Pointer went up.
    EndResize,
    /// Key pressed on a focused resize handle.
    ResizeByKey {
        /// Panel owning the handle.
        target: ResizeTarget,
        /// Pressed key.
        key: ResizeKey,
    },
    /// Enable or disable returning focus to the element focused before a panel opened.
    SetRestoreFocus {
        /// New mode.
        enabled: bool,
    },
    /// The layout is being torn down.
    Unmount,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_layout`] for the effect executor.
pub enum LayoutEffect {
    /// Move focus.
    Focus(FocusCommand),
    /// A drawer became active.
    DrawerShown(DrawerId),
    /// A drawer stopped being active.
    DrawerHidden(DrawerId),
    /// A drawer size changed.
    DrawerResized {
        /// Drawer.
        id: DrawerId,
        /// New size.
        size: f64,
    },
    /// Navigation opened or closed.
    NavigationChanged {
        /// New state.
        open: bool,
    },
    /// Split panel opened or closed.
    SplitPanelChanged {
        /// New state.
        open: bool,
    },
    /// Split panel size changed.
    SplitPanelResized {
        /// New size.
        size: f64,
    },
    /// Split panel position preference changed.
    SplitPanelPreferencesChanged {
        /// New preference.
        position: SplitPanelPosition,
    },
    /// Start listening for pointer moves on the document.
    CapturePointer(ResizeTarget),
    /// Stop listening for pointer moves.
    ReleasePointer,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions.
pub enum LayoutError {
    /// No drawer is registered under the id.
    #[error("drawer `{0}` is not registered")]
    UnknownDrawer(DrawerId),
    /// A drawer with the id is already registered.
    #[error("drawer `{0}` is already registered")]
    DuplicateDrawer(DrawerId),
    /// The drawer does not support expanded mode.
    #[error("drawer `{0}` cannot be expanded")]
    NotExpandable(DrawerId),
    /// Expanded mode requires an active drawer.
    #[error("drawer `{0}` is not open")]
    DrawerNotActive(DrawerId),
    /// The layout has no split panel.
    #[error("layout has no split panel")]
    NoSplitPanel,
}

/// Applies a [`LayoutAction`] to the layout state and collects resulting side effects.
///
/// Within one call the registry is mutated first, then the geometry snapshot is recomputed
/// (updating the forced split panel state and evicting drawers that no longer fit), and finally
/// pending focus intents are resolved into at most one [`LayoutEffect::Focus`].
///
/// # Errors
///
/// Returns [`LayoutError`] when an action references a missing drawer or split panel, or would
/// break a registry invariant. The state is unchanged in that case.
pub fn reduce_layout(
    state: &mut LayoutState,
    interaction: &mut InteractionState,
    action: LayoutAction,
) -> Result<Vec<LayoutEffect>, LayoutError> {
    let mut effects = Vec::new();
    match action {
        LayoutAction::SetViewport(viewport) => {
            let was_mobile = state.is_mobile();
            state.viewport = viewport;
            if state.is_mobile() && !was_mobile {
                keep_one_panel_for_mobile(state, &mut effects);
            }
        }
        LayoutAction::SetChrome(chrome) => {
            state.chrome = chrome;
        }
        LayoutAction::SetNavigationPresent { present } => {
            state.navigation.present = present;
            if !present && state.navigation.open {
                state.navigation.open = false;
                state.focus.forget(&FocusRegion::Navigation);
                effects.push(LayoutEffect::NavigationChanged { open: false });
            }
        }
        LayoutAction::SetNavigationOpen { open, source } => {
            set_navigation_open(state, open, source, &mut effects);
        }
        LayoutAction::SetNavigationWidth { width } => {
            if width.is_finite() && width >= 0.0 {
                state.navigation.width = width;
            }
        }
        LayoutAction::SetDrawers { drawers } => {
            let closed = state.drawers.set_declarative(drawers)?;
            for id in closed {
                drawer_hidden(state, id, &mut effects);
            }
        }
        LayoutAction::RegisterDrawer(descriptor) => {
            state.drawers.register_runtime(descriptor)?;
        }
        LayoutAction::UpdateDrawer(descriptor) => {
            let id = descriptor.id.clone();
            if state.drawers.update(descriptor)? {
                drawer_hidden(state, id, &mut effects);
            }
        }
        LayoutAction::UnregisterDrawer { id } => {
            if state.drawers.unregister(&id)? {
                drawer_hidden(state, id, &mut effects);
            } else {
                state.focus.forget(&FocusRegion::Drawer(id));
            }
        }
        LayoutAction::OpenDrawer { id, source } => {
            open_drawer(state, &id, source, &mut effects)?;
        }
        LayoutAction::CloseDrawer { id, source } => {
            close_drawer(state, &id, source, &mut effects)?;
        }
        LayoutAction::ToggleDrawer { id, source } => {
            if state.drawers.is_active(&id) {
                close_drawer(state, &id, source, &mut effects)?;
            } else {
                open_drawer(state, &id, source, &mut effects)?;
            }
        }
        LayoutAction::ResizeDrawer { id, size } => {
            state
                .drawers
                .get(&id)
                .ok_or_else(|| LayoutError::UnknownDrawer(id.clone()))?;
            apply_size(state, &ResizeTarget::Drawer(id), size, &mut effects);
        }
        LayoutAction::SetExpandedDrawer { id } => {
            if let Some(id) = &id {
                let descriptor = state
                    .drawers
                    .get(id)
                    .ok_or_else(|| LayoutError::UnknownDrawer(id.clone()))?;
                if !descriptor.is_expandable {
                    return Err(LayoutError::NotExpandable(id.clone()));
                }
                if !state.drawers.is_active(id) {
                    return Err(LayoutError::DrawerNotActive(id.clone()));
                }
            }
            state.expanded_drawer = id;
        }
        LayoutAction::SetSplitPanelPresent { present } => {
            state.split_panel.present = present;
            if !present {
                state.focus.forget(&FocusRegion::SplitPanel);
            }
        }
        LayoutAction::SetSplitPanelOpen { open, source } => {
            require_split_panel(state)?;
            if state.split_panel.open != open {
                state.split_panel.open = open;
                if open && state.is_mobile() {
                    close_everything_for_mobile(state, None, &mut effects);
                }
                if let ChangeSource::User { focus_origin } = source {
                    let interaction = if open {
                        Interaction::Open
                    } else {
                        Interaction::Close
                    };
                    state
                        .focus
                        .record(FocusRegion::SplitPanel, interaction, focus_origin);
                }
                effects.push(LayoutEffect::SplitPanelChanged { open });
            }
        }
        LayoutAction::SetSplitPanelPosition { position, source } => {
            require_split_panel(state)?;
            if state.split_panel.preference != Some(position) {
                state.split_panel.preference = Some(position);
                if source.is_user() {
                    state
                        .focus
                        .record(FocusRegion::SplitPanel, Interaction::Position, None);
                }
                effects.push(LayoutEffect::SplitPanelPreferencesChanged { position });
            }
        }
        LayoutAction::ResizeSplitPanel { size } => {
            require_split_panel(state)?;
            apply_size(state, &ResizeTarget::SplitPanel, size, &mut effects);
        }
        LayoutAction::ReportSplitPanelSize { size } => {
            if size.is_finite() && size >= 0.0 {
                state.split_panel.reported_size = Some(size);
            }
        }
        LayoutAction::BeginResize { target, pointer } => {
            if let Some(bounds) = resize_bounds(state, &target) {
                let size_start = match &target {
                    ResizeTarget::SplitPanel => state.split_panel.reported_size.unwrap_or(bounds.current),
                    ResizeTarget::Drawer(_) => bounds.current,
                };
                interaction.resizing = Some(ResizeSession {
                    target: target.clone(),
                    axis: bounds.axis,
                    pointer_start: pointer,
                    size_start,
                });
                effects.push(LayoutEffect::CapturePointer(target));
            }
        }
        LayoutAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.clone() {
                apply_size(state, &session.target, session.size_at(pointer), &mut effects);
            }
        }
        LayoutAction::EndResize => {
            if interaction.resizing.take().is_some() {
                effects.push(LayoutEffect::ReleasePointer);
            }
        }
        LayoutAction::ResizeByKey { target, key } => {
            if let Some(bounds) = resize_bounds(state, &target) {
                if let Some(size) = keyboard_resize(
                    bounds.current,
                    key,
                    bounds.axis,
                    state.config.keyboard_step,
                    bounds.min,
                    bounds.max,
                ) {
                    apply_size(state, &target, size, &mut effects);
                }
            }
        }
        LayoutAction::SetRestoreFocus { enabled } => {
            state.config.restore_focus = enabled;
        }
        LayoutAction::Unmount => {
            if interaction.resizing.take().is_some() {
                effects.push(LayoutEffect::ReleasePointer);
            }
            state.focus.take_pending();
        }
    }

    state.refresh_geometry();
    if !state.is_mobile() && evict_for_space(state, &mut effects) {
        state.refresh_geometry();
    }
    if let Some(command) = resolve_focus(state) {
        effects.push(LayoutEffect::Focus(command));
    }
    trace!(effects = effects.len(), "layout transition applied");
    Ok(effects)
}

/// Position of a resize handle within its range, in percent, for `aria-valuenow`.
pub fn resize_handle_position(state: &LayoutState, target: &ResizeTarget) -> Option<f64> {
    let bounds = resize_bounds(state, target)?;
    Some(relative_size(bounds.current, bounds.min, bounds.max))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeBounds {
    axis: ResizeAxis,
    current: f64,
    min: f64,
    max: f64,
}

fn resize_bounds(state: &LayoutState, target: &ResizeTarget) -> Option<ResizeBounds> {
    match target {
        ResizeTarget::Drawer(id) => {
            let descriptor = state.drawers.get(id)?;
            if !state.drawers.is_active(id) {
                return None;
            }
            let axis = if descriptor.placement.is_bottom() {
                ResizeAxis::Bottom
            } else {
                ResizeAxis::Side
            };
            Some(ResizeBounds {
                axis,
                current: state.drawer_size(id),
                min: state.drawers.min_size(id, &state.config),
                max: state.geometry.max_drawer_size(id, descriptor.placement),
            })
        }
        ResizeTarget::SplitPanel => {
            if !(state.split_panel.present && state.split_panel.open) {
                return None;
            }
            let position = state.split_panel_position();
            let (axis, min) = match position {
                SplitPanelPosition::Side => (ResizeAxis::Side, state.config.split_panel_min_side_size),
                SplitPanelPosition::Bottom => {
                    (ResizeAxis::Bottom, state.config.split_panel_min_bottom_size)
                }
            };
            Some(ResizeBounds {
                axis,
                current: state.split_panel.size_for(position),
                min,
                max: state.geometry.max_split_panel_size(position),
            })
        }
    }
}

/// Clamps `requested` into the target's range and stores it. Inverted ranges and inactive
/// targets leave the size untouched.
fn apply_size(
    state: &mut LayoutState,
    target: &ResizeTarget,
    requested: f64,
    effects: &mut Vec<LayoutEffect>,
) {
    let Some(bounds) = resize_bounds(state, target) else {
        return;
    };
    let Some(size) = clamp_size(requested, bounds.min, bounds.max) else {
        return;
    };
    match target {
        ResizeTarget::Drawer(id) => {
            if state.drawers.size(id, &state.config) != size {
                state.drawers.set_size(id, size);
                effects.push(LayoutEffect::DrawerResized {
                    id: id.clone(),
                    size,
                });
            }
        }
        ResizeTarget::SplitPanel => {
            let slot = match state.split_panel_position() {
                SplitPanelPosition::Side => &mut state.split_panel.side_size,
                SplitPanelPosition::Bottom => &mut state.split_panel.bottom_size,
            };
            if *slot != size {
                *slot = size;
                effects.push(LayoutEffect::SplitPanelResized { size });
            }
        }
    }
}

fn require_split_panel(state: &LayoutState) -> Result<(), LayoutError> {
    if state.split_panel.present {
        Ok(())
    } else {
        Err(LayoutError::NoSplitPanel)
    }
}

fn set_navigation_open(
    state: &mut LayoutState,
    open: bool,
    source: ChangeSource,
    effects: &mut Vec<LayoutEffect>,
) {
    if !state.navigation.present || state.navigation.open == open {
        return;
    }
    state.navigation.open = open;
    if open && state.is_mobile() {
        for id in state.drawers.deactivate_all_except(None) {
            drawer_hidden(state, id, effects);
        }
    }
    if let ChangeSource::User { focus_origin } = source {
        let interaction = if open {
            Interaction::Open
        } else {
            Interaction::Close
        };
        state
            .focus
            .record(FocusRegion::Navigation, interaction, focus_origin);
    }
    effects.push(LayoutEffect::NavigationChanged { open });
}

/// Closes navigation and every drawer except `keep`. Mobile layouts show one panel at a time.
fn close_everything_for_mobile(
    state: &mut LayoutState,
    keep: Option<&DrawerId>,
    effects: &mut Vec<LayoutEffect>,
) {
    for id in state.drawers.deactivate_all_except(keep) {
        drawer_hidden(state, id, effects);
    }
    if state.navigation.open {
        state.navigation.open = false;
        state.focus.forget(&FocusRegion::Navigation);
        effects.push(LayoutEffect::NavigationChanged { open: false });
    }
}

/// Entering the mobile range keeps the most recently opened drawer, or navigation when no
/// drawer is open.
fn keep_one_panel_for_mobile(state: &mut LayoutState, effects: &mut Vec<LayoutEffect>) {
    if let Some(newest) = state.drawers.last_opened().cloned() {
        close_everything_for_mobile(state, Some(&newest), effects);
    }
}

/// Bookkeeping for a drawer that left the active set without a user close.
fn drawer_hidden(state: &mut LayoutState, id: DrawerId, effects: &mut Vec<LayoutEffect>) {
    if state.expanded_drawer.as_ref() == Some(&id) {
        state.expanded_drawer = None;
    }
    state.focus.forget(&FocusRegion::Drawer(id.clone()));
    effects.push(LayoutEffect::DrawerHidden(id));
}

fn open_drawer(
    state: &mut LayoutState,
    id: &DrawerId,
    source: ChangeSource,
    effects: &mut Vec<LayoutEffect>,
) -> Result<(), LayoutError> {
    state
        .drawers
        .get(id)
        .ok_or_else(|| LayoutError::UnknownDrawer(id.clone()))?;
    if state.drawers.is_active(id) {
        return Ok(());
    }
    if state.is_mobile() {
        close_everything_for_mobile(state, None, effects);
    }

    let activation = state.drawers.activate(id)?;
    if let Some(replaced) = activation.replaced {
        drawer_hidden(state, replaced, effects);
    }
    if let ChangeSource::User { focus_origin } = source {
        state
            .focus
            .record(FocusRegion::Drawer(id.clone()), Interaction::Open, focus_origin);
    }
    effects.push(LayoutEffect::DrawerShown(id.clone()));
    Ok(())
}

fn close_drawer(
    state: &mut LayoutState,
    id: &DrawerId,
    source: ChangeSource,
    effects: &mut Vec<LayoutEffect>,
) -> Result<(), LayoutError> {
    state
        .drawers
        .get(id)
        .ok_or_else(|| LayoutError::UnknownDrawer(id.clone()))?;
    if !state.drawers.deactivate(id) {
        return Ok(());
    }
    if state.expanded_drawer.as_ref() == Some(id) {
        state.expanded_drawer = None;
    }
    let region = FocusRegion::Drawer(id.clone());
    if source.is_user() {
        state.focus.record(region, Interaction::Close, None);
    } else {
        state.focus.forget(&region);
    }
    effects.push(LayoutEffect::DrawerHidden(id.clone()));
    Ok(())
}

/// Closes the least recently opened side drawers while their minimum sizes overflow the
/// resizable space. Returns `true` when a drawer was closed.
fn evict_for_space(state: &mut LayoutState, effects: &mut Vec<LayoutEffect>) -> bool {
    let available = state.base_resizable_space();
    let reserved = state.reserved_split_panel_width();
    let evicted = state
        .drawers
        .evict_until_fits(available, reserved, &state.config);
    let any = !evicted.is_empty();
    for id in evicted {
        drawer_hidden(state, id, effects);
    }
    any
}

#[cfg(test)]
mod tests {
    use app_layout_contract::{DrawerPlacement, ElementRef, FocusTarget};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::LayoutConfig;

    fn layout(width: f64) -> (LayoutState, InteractionState) {
        let state = LayoutState::new(
            LayoutConfig::default(),
            Viewport {
                width,
                height: 800.0,
            },
        );
        (state, InteractionState::default())
    }

    fn reduce(
        state: &mut LayoutState,
        interaction: &mut InteractionState,
        action: LayoutAction,
    ) -> Vec<LayoutEffect> {
        reduce_layout(state, interaction, action).expect("reduce")
    }

    fn with_tools(state: &mut LayoutState, interaction: &mut InteractionState) {
        reduce(
            state,
            interaction,
            LayoutAction::SetDrawers {
                drawers: vec![
                    DrawerDescriptor::new("tools", DrawerPlacement::Local)
                        .resizable()
                        .expandable(),
                    DrawerDescriptor::new("help", DrawerPlacement::Local),
                ],
            },
        );
    }

    fn open(id: &str, source: ChangeSource) -> LayoutAction {
        LayoutAction::OpenDrawer {
            id: DrawerId::new(id),
            source,
        }
    }

    fn close(id: &str, source: ChangeSource) -> LayoutAction {
        LayoutAction::CloseDrawer {
            id: DrawerId::new(id),
            source,
        }
    }

    #[test]
    fn navigation_and_drawer_leave_592_for_resizing() {
        let (mut state, mut interaction) = layout(1200.0);
        with_tools(&mut state, &mut interaction);
        reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetNavigationOpen {
                open: true,
                source: ChangeSource::Programmatic,
            },
        );
        let effects = reduce(&mut state, &mut interaction, open("tools", ChangeSource::USER));
        let tools = DrawerId::new("tools");
        assert_eq!(
            effects,
            vec![
                LayoutEffect::DrawerShown(tools.clone()),
                LayoutEffect::Focus(FocusCommand::Focus(FocusTarget::DrawerResizeHandle {
                    id: tools.clone()
                })),
            ]
        );
        assert_eq!(state.geometry.horizontal.resizable_space_available, 592.0);
        assert_eq!(state.geometry.horizontal.max_drawer_size, 592.0);

        let effects = reduce(
            &mut state,
            &mut interaction,
            LayoutAction::ResizeDrawer {
                id: tools.clone(),
                size: 5000.0,
            },
        );
        assert_eq!(
            effects,
            vec![LayoutEffect::DrawerResized {
                id: tools.clone(),
                size: 592.0
            }]
        );
        assert_eq!(state.drawer_size(&tools), 592.0);
        assert_eq!(
            resize_handle_position(&state, &ResizeTarget::Drawer(tools)),
            Some(100.0)
        );
    }

    #[test]
    fn opening_a_fourth_global_drawer_evicts_the_first() {
        let (mut state, mut interaction) = layout(1400.0);
        for id in ["g1", "g2", "g3", "g4"] {
            reduce(
                &mut state,
                &mut interaction,
                LayoutAction::RegisterDrawer(DrawerDescriptor::new(id, DrawerPlacement::Global)),
            );
        }
        for id in ["g1", "g2", "g3"] {
            reduce(&mut state, &mut interaction, open(id, ChangeSource::Programmatic));
        }

        let effects = reduce(&mut state, &mut interaction, open("g4", ChangeSource::Programmatic));
        assert_eq!(
            effects,
            vec![
                LayoutEffect::DrawerShown(DrawerId::new("g4")),
                LayoutEffect::DrawerHidden(DrawerId::new("g1")),
            ]
        );
        let queue: Vec<&str> = state.drawers.open_queue().map(DrawerId::as_str).collect();
        assert_eq!(queue, vec!["g4", "g3", "g2"]);
    }

    fn with_globals(state: &mut LayoutState, interaction: &mut InteractionState, ids: &[&str]) {
        for id in ids {
            reduce(
                state,
                interaction,
                LayoutAction::RegisterDrawer(DrawerDescriptor::new(*id, DrawerPlacement::Global)),
            );
            reduce(state, interaction, open(id, ChangeSource::Programmatic));
        }
    }

    fn active_min_total(state: &LayoutState) -> f64 {
        state
            .drawers
            .open_queue()
            .map(|id| state.drawers.min_size(id, &state.config))
            .sum()
    }

    #[test]
    fn shrinking_the_viewport_evicts_the_oldest_drawer() {
        let (mut state, mut interaction) = layout(1400.0);
        with_globals(&mut state, &mut interaction, &["g1", "g2"]);

        let effects = reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetViewport(Viewport {
                width: 900.0,
                height: 800.0,
            }),
        );
        assert_eq!(effects, vec![LayoutEffect::DrawerHidden(DrawerId::new("g1"))]);
        let queue: Vec<&str> = state.drawers.open_queue().map(DrawerId::as_str).collect();
        assert_eq!(queue, vec!["g2"]);
        assert!(active_min_total(&state) <= state.base_resizable_space());
    }

    #[test]
    fn opening_navigation_evicts_drawers_that_no_longer_fit() {
        let (mut state, mut interaction) = layout(1000.0);
        with_globals(&mut state, &mut interaction, &["g1", "g2"]);

        let effects = reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetNavigationOpen {
                open: true,
                source: ChangeSource::Programmatic,
            },
        );
        assert_eq!(
            effects,
            vec![
                LayoutEffect::NavigationChanged { open: true },
                LayoutEffect::DrawerHidden(DrawerId::new("g1")),
            ]
        );
        assert!(active_min_total(&state) <= state.base_resizable_space());
    }

    #[test]
    fn open_side_split_panel_reserves_its_minimum_width() {
        let (mut state, mut interaction) = layout(1150.0);
        with_globals(&mut state, &mut interaction, &["g1", "g2"]);
        for action in [
            LayoutAction::SetSplitPanelPresent { present: true },
            LayoutAction::SetSplitPanelPosition {
                position: SplitPanelPosition::Side,
                source: ChangeSource::Programmatic,
            },
        ] {
            reduce(&mut state, &mut interaction, action);
        }
        assert_eq!(state.drawers.open_queue().count(), 2);

        let effects = reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetSplitPanelOpen {
                open: true,
                source: ChangeSource::Programmatic,
            },
        );
        assert_eq!(
            effects,
            vec![
                LayoutEffect::SplitPanelChanged { open: true },
                LayoutEffect::DrawerHidden(DrawerId::new("g1")),
            ]
        );
        assert_eq!(state.split_panel_position(), SplitPanelPosition::Side);
        assert!(
            active_min_total(&state) + state.reserved_split_panel_width()
                <= state.base_resizable_space()
        );
    }

    #[test]
    fn entering_mobile_keeps_only_the_newest_drawer() {
        let (mut state, mut interaction) = layout(1400.0);
        with_tools(&mut state, &mut interaction);
        reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetNavigationOpen {
                open: true,
                source: ChangeSource::Programmatic,
            },
        );
        with_globals(&mut state, &mut interaction, &["g1"]);
        reduce(&mut state, &mut interaction, open("tools", ChangeSource::Programmatic));

        let effects = reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetViewport(Viewport {
                width: 600.0,
                height: 800.0,
            }),
        );
        assert_eq!(
            effects,
            vec![
                LayoutEffect::DrawerHidden(DrawerId::new("g1")),
                LayoutEffect::NavigationChanged { open: false },
            ]
        );
        let queue: Vec<&str> = state.drawers.open_queue().map(DrawerId::as_str).collect();
        assert_eq!(queue, vec!["tools"]);
    }

    #[test]
    fn resized_drawers_stay_within_their_range() {
        let (mut state, mut interaction) = layout(1600.0);
        with_tools(&mut state, &mut interaction);
        for descriptor in [
            DrawerDescriptor::new("g1", DrawerPlacement::Global),
            DrawerDescriptor::new("ai", DrawerPlacement::Ai),
            DrawerDescriptor::new("console", DrawerPlacement::BottomGlobal),
        ] {
            let id = descriptor.id.clone();
            reduce(&mut state, &mut interaction, LayoutAction::RegisterDrawer(descriptor));
            reduce(
                &mut state,
                &mut interaction,
                LayoutAction::OpenDrawer {
                    id,
                    source: ChangeSource::Programmatic,
                },
            );
        }
        reduce(&mut state, &mut interaction, open("tools", ChangeSource::Programmatic));

        let requests = [
            -50.0,
            0.0,
            150.0,
            290.0,
            333.5,
            600.0,
            1000.0,
            5000.0,
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        for id in ["tools", "g1", "ai", "console"] {
            let id = DrawerId::new(id);
            let placement = state.drawers.get(&id).expect("registered").placement;
            for size in requests {
                let min = state.drawers.min_size(&id, &state.config);
                let max = state.geometry.max_drawer_size(&id, placement);
                let before = state.drawers.size(&id, &state.config);
                let effects = reduce(
                    &mut state,
                    &mut interaction,
                    LayoutAction::ResizeDrawer {
                        id: id.clone(),
                        size,
                    },
                );
                let after = state.drawers.size(&id, &state.config);
                if size.is_finite() && max >= min {
                    assert!(
                        min <= after && after <= max,
                        "{id} resized to {size}: {after} outside [{min}, {max}]"
                    );
                } else {
                    assert_eq!(after, before, "{id} resized to {size}");
                    assert_eq!(effects, Vec::new());
                }
            }
        }
        assert_eq!(state.drawers.open_queue().count(), 4);
    }

    #[test]
    fn inverted_range_rejects_the_resize() {
        let (mut state, mut interaction) = layout(700.0);
        reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetNavigationOpen {
                open: true,
                source: ChangeSource::Programmatic,
            },
        );
        with_globals(&mut state, &mut interaction, &["g1"]);
        let g1 = DrawerId::new("g1");
        assert!(state.geometry.max_drawer_size(&g1, DrawerPlacement::Global) < 290.0);

        let effects = reduce(
            &mut state,
            &mut interaction,
            LayoutAction::ResizeDrawer {
                id: g1.clone(),
                size: 400.0,
            },
        );
        assert_eq!(effects, Vec::new());
        assert_eq!(state.drawers.size(&g1, &state.config), 290.0);
        assert!(state.drawers.is_active(&g1));
    }

    #[test]
    fn opening_a_local_drawer_replaces_the_active_one() {
        let (mut state, mut interaction) = layout(1400.0);
        with_tools(&mut state, &mut interaction);
        reduce(&mut state, &mut interaction, open("tools", ChangeSource::Programmatic));

        let effects = reduce(&mut state, &mut interaction, open("help", ChangeSource::Programmatic));
        assert_eq!(
            effects,
            vec![
                LayoutEffect::DrawerHidden(DrawerId::new("tools")),
                LayoutEffect::DrawerShown(DrawerId::new("help")),
            ]
        );
        assert_eq!(state.drawers.active_local(), Some(&DrawerId::new("help")));
    }

    #[test]
    fn closing_twice_is_idempotent_and_unknown_ids_fail() {
        let (mut state, mut interaction) = layout(1400.0);
        with_tools(&mut state, &mut interaction);
        reduce(&mut state, &mut interaction, open("tools", ChangeSource::Programmatic));

        let effects = reduce(&mut state, &mut interaction, close("tools", ChangeSource::USER));
        assert_eq!(
            effects,
            vec![
                LayoutEffect::DrawerHidden(DrawerId::new("tools")),
                LayoutEffect::Focus(FocusCommand::Focus(FocusTarget::DrawerTrigger {
                    id: DrawerId::new("tools")
                })),
            ]
        );
        assert_eq!(
            reduce(&mut state, &mut interaction, close("tools", ChangeSource::USER)),
            Vec::new()
        );
        assert_eq!(
            reduce_layout(&mut state, &mut interaction, close("nope", ChangeSource::USER)),
            Err(LayoutError::UnknownDrawer(DrawerId::new("nope")))
        );
    }

    #[test]
    fn toggle_opens_then_closes() {
        let (mut state, mut interaction) = layout(1400.0);
        with_tools(&mut state, &mut interaction);
        let toggle = LayoutAction::ToggleDrawer {
            id: DrawerId::new("help"),
            source: ChangeSource::USER,
        };

        let effects = reduce(&mut state, &mut interaction, toggle.clone());
        assert_eq!(
            effects,
            vec![
                LayoutEffect::DrawerShown(DrawerId::new("help")),
                LayoutEffect::Focus(FocusCommand::Focus(FocusTarget::DrawerClose {
                    id: DrawerId::new("help")
                })),
            ]
        );
        reduce(&mut state, &mut interaction, toggle);
        assert!(!state.drawers.is_active(&DrawerId::new("help")));
    }

    #[test]
    fn restore_mode_returns_focus_to_the_opening_element() {
        let (mut state, mut interaction) = layout(1400.0);
        with_tools(&mut state, &mut interaction);
        reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetRestoreFocus { enabled: true },
        );
        reduce(
            &mut state,
            &mut interaction,
            open(
                "tools",
                ChangeSource::User {
                    focus_origin: Some(ElementRef(3)),
                },
            ),
        );

        let effects = reduce(&mut state, &mut interaction, close("tools", ChangeSource::USER));
        assert_eq!(
            effects.last(),
            Some(&LayoutEffect::Focus(FocusCommand::Restore {
                element: ElementRef(3),
                fallback: Some(FocusTarget::DrawerTrigger {
                    id: DrawerId::new("tools")
                }),
            }))
        );
    }

    #[test]
    fn programmatic_changes_never_move_focus() {
        let (mut state, mut interaction) = layout(1400.0);
        with_tools(&mut state, &mut interaction);
        let effects = reduce(&mut state, &mut interaction, open("tools", ChangeSource::Programmatic));
        assert!(!effects
            .iter()
            .any(|effect| matches!(effect, LayoutEffect::Focus(_))));
        let effects = reduce(&mut state, &mut interaction, close("tools", ChangeSource::Programmatic));
        assert_eq!(effects, vec![LayoutEffect::DrawerHidden(DrawerId::new("tools"))]);
    }

    #[test]
    fn mobile_drawers_close_navigation_and_focus_the_close_button() {
        let (mut state, mut interaction) = layout(600.0);
        with_tools(&mut state, &mut interaction);
        reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetNavigationOpen {
                open: true,
                source: ChangeSource::USER,
            },
        );

        let effects = reduce(&mut state, &mut interaction, open("tools", ChangeSource::USER));
        let tools = DrawerId::new("tools");
        assert_eq!(
            effects,
            vec![
                LayoutEffect::NavigationChanged { open: false },
                LayoutEffect::DrawerShown(tools.clone()),
                LayoutEffect::Focus(FocusCommand::Focus(FocusTarget::DrawerClose { id: tools })),
            ]
        );
        assert!(!state.navigation.open);
    }

    #[test]
    fn pointer_drag_resizes_side_split_panel_and_releases_on_end() {
        let (mut state, mut interaction) = layout(1600.0);
        for action in [
            LayoutAction::SetSplitPanelPresent { present: true },
            LayoutAction::SetSplitPanelPosition {
                position: SplitPanelPosition::Side,
                source: ChangeSource::Programmatic,
            },
            LayoutAction::SetSplitPanelOpen {
                open: true,
                source: ChangeSource::Programmatic,
            },
        ] {
            reduce(&mut state, &mut interaction, action);
        }

        let effects = reduce(
            &mut state,
            &mut interaction,
            LayoutAction::BeginResize {
                target: ResizeTarget::SplitPanel,
                pointer: PointerPosition { x: 1000.0, y: 300.0 },
            },
        );
        assert_eq!(effects, vec![LayoutEffect::CapturePointer(ResizeTarget::SplitPanel)]);

        let effects = reduce(
            &mut state,
            &mut interaction,
            LayoutAction::UpdateResize {
                pointer: PointerPosition { x: 900.0, y: 280.0 },
            },
        );
        assert_eq!(effects, vec![LayoutEffect::SplitPanelResized { size: 420.0 }]);
        assert_eq!(state.geometry.horizontal.side_split_panel_size, 420.0);

        assert_eq!(
            reduce(&mut state, &mut interaction, LayoutAction::EndResize),
            vec![LayoutEffect::ReleasePointer]
        );
        assert_eq!(
            reduce(&mut state, &mut interaction, LayoutAction::EndResize),
            Vec::new()
        );
    }

    #[test]
    fn unmount_releases_an_active_drag() {
        let (mut state, mut interaction) = layout(1400.0);
        with_tools(&mut state, &mut interaction);
        reduce(&mut state, &mut interaction, open("tools", ChangeSource::Programmatic));
        reduce(
            &mut state,
            &mut interaction,
            LayoutAction::BeginResize {
                target: ResizeTarget::Drawer(DrawerId::new("tools")),
                pointer: PointerPosition { x: 700.0, y: 0.0 },
            },
        );

        let effects = reduce(&mut state, &mut interaction, LayoutAction::Unmount);
        assert_eq!(effects, vec![LayoutEffect::ReleasePointer]);
        assert_eq!(interaction.resizing, None);
    }

    #[test]
    fn keyboard_steps_resize_the_active_drawer() {
        let (mut state, mut interaction) = layout(1200.0);
        with_tools(&mut state, &mut interaction);
        reduce(&mut state, &mut interaction, open("tools", ChangeSource::Programmatic));
        let target = ResizeTarget::Drawer(DrawerId::new("tools"));

        let effects = reduce(
            &mut state,
            &mut interaction,
            LayoutAction::ResizeByKey {
                target: target.clone(),
                key: ResizeKey::ArrowLeft,
            },
        );
        assert_eq!(
            effects,
            vec![LayoutEffect::DrawerResized {
                id: DrawerId::new("tools"),
                size: 300.0
            }]
        );

        reduce(
            &mut state,
            &mut interaction,
            LayoutAction::ResizeByKey {
                target: target.clone(),
                key: ResizeKey::Home,
            },
        );
        assert_eq!(state.drawer_size(&DrawerId::new("tools")), 290.0);
        assert_eq!(
            reduce(
                &mut state,
                &mut interaction,
                LayoutAction::ResizeByKey {
                    target,
                    key: ResizeKey::ArrowRight,
                },
            ),
            Vec::new()
        );
    }

    #[test]
    fn split_panel_returns_to_side_only_past_the_margin() {
        let (mut state, mut interaction) = layout(1000.0);
        with_tools(&mut state, &mut interaction);
        for action in [
            LayoutAction::SetSplitPanelPresent { present: true },
            LayoutAction::SetSplitPanelPosition {
                position: SplitPanelPosition::Side,
                source: ChangeSource::Programmatic,
            },
            open("tools", ChangeSource::Programmatic),
        ] {
            reduce(&mut state, &mut interaction, action);
        }

        let mut positions = Vec::new();
        for width in [1000.0, 890.0, 920.0, 940.0] {
            reduce(
                &mut state,
                &mut interaction,
                LayoutAction::SetViewport(Viewport {
                    width,
                    height: 800.0,
                }),
            );
            positions.push(state.split_panel_position());
        }
        assert_eq!(
            positions,
            vec![
                SplitPanelPosition::Side,
                SplitPanelPosition::Bottom,
                SplitPanelPosition::Bottom,
                SplitPanelPosition::Side,
            ]
        );
        assert_eq!(state.split_panel.preference, Some(SplitPanelPosition::Side));
    }

    #[test]
    fn reported_bottom_height_offsets_content_until_the_panel_moves() {
        let (mut state, mut interaction) = layout(1400.0);
        for action in [
            LayoutAction::SetSplitPanelPresent { present: true },
            LayoutAction::SetSplitPanelOpen {
                open: true,
                source: ChangeSource::Programmatic,
            },
        ] {
            reduce(&mut state, &mut interaction, action);
        }
        assert_eq!(
            state.geometry.vertical.content_bottom_offset,
            state.split_panel.bottom_size
        );

        reduce(
            &mut state,
            &mut interaction,
            LayoutAction::ReportSplitPanelSize { size: 240.0 },
        );
        let drawers_top = state.geometry.vertical.offsets.drawers;
        assert_eq!(state.geometry.vertical.content_bottom_offset, 240.0);
        assert_eq!(state.geometry.vertical.drawer_height, 800.0 - drawers_top - 240.0);

        reduce(
            &mut state,
            &mut interaction,
            LayoutAction::SetSplitPanelPosition {
                position: SplitPanelPosition::Side,
                source: ChangeSource::Programmatic,
            },
        );
        assert_eq!(state.split_panel.reported_size, None);
        assert_eq!(state.geometry.vertical.content_bottom_offset, 0.0);
    }

    #[test]
    fn expanded_mode_requires_an_open_expandable_drawer() {
        let (mut state, mut interaction) = layout(1400.0);
        with_tools(&mut state, &mut interaction);
        let expand = |id: &str| LayoutAction::SetExpandedDrawer {
            id: Some(DrawerId::new(id)),
        };

        assert_eq!(
            reduce_layout(&mut state, &mut interaction, expand("help")),
            Err(LayoutError::NotExpandable(DrawerId::new("help")))
        );
        assert_eq!(
            reduce_layout(&mut state, &mut interaction, expand("tools")),
            Err(LayoutError::DrawerNotActive(DrawerId::new("tools")))
        );

        reduce(&mut state, &mut interaction, open("tools", ChangeSource::Programmatic));
        reduce(&mut state, &mut interaction, expand("tools"));
        assert_eq!(state.expanded_drawer, Some(DrawerId::new("tools")));

        reduce(&mut state, &mut interaction, close("tools", ChangeSource::Programmatic));
        assert_eq!(state.expanded_drawer, None);
    }

    #[test]
    fn split_panel_actions_require_a_split_panel() {
        let (mut state, mut interaction) = layout(1400.0);
        assert_eq!(
            reduce_layout(
                &mut state,
                &mut interaction,
                LayoutAction::SetSplitPanelOpen {
                    open: true,
                    source: ChangeSource::USER,
                },
            ),
            Err(LayoutError::NoSplitPanel)
        );
    }
}
