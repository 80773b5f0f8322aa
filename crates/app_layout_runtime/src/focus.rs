//! Focus coordination for panels opening, closing and moving.
//!
//! The reducer records an [`Interaction`] per [`FocusRegion`] for user-initiated changes only.
//! After the state and geometry of a transition settle, [`resolve_focus`] consumes the pending
//! interactions and produces at most one [`FocusCommand`].

use app_layout_contract::{DrawerId, ElementRef, FocusTarget};

use crate::model::LayoutState;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Independently focus-managed part of the layout.
pub enum FocusRegion {
    /// Side navigation.
    Navigation,
    /// A local or global drawer.
    Drawer(DrawerId),
    /// The split panel.
    SplitPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Last user interaction with a region.
pub enum Interaction {
    /// The region became visible.
    Open,
    /// The region was hidden.
    Close,
    /// The region moved (split panel side/bottom).
    Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Focus move the effect executor performs.
pub enum FocusCommand {
    /// Focus a layout control.
    Focus(FocusTarget),
    /// Focus `element` if it is still connected, otherwise `fallback`.
    Restore {
        /// Element focused before the region opened.
        element: ElementRef,
        /// Control used when the element is gone.
        fallback: Option<FocusTarget>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Pending interactions and captured focus origins.
pub struct FocusControl {
    pending: Vec<(FocusRegion, Interaction)>,
    origins: Vec<(FocusRegion, ElementRef)>,
}

impl FocusControl {
    /// Records a user interaction. Opening captures `origin` for later restoration.
    pub fn record(&mut self, region: FocusRegion, interaction: Interaction, origin: Option<ElementRef>) {
        if interaction == Interaction::Open {
            self.origins.retain(|(r, _)| r != &region);
            if let Some(origin) = origin {
                self.origins.push((region.clone(), origin));
            }
        }
        self.pending.retain(|(r, _)| r != &region);
        self.pending.push((region, interaction));
    }

    /// Drops any pending interaction and origin for `region`.
    pub fn forget(&mut self, region: &FocusRegion) {
        self.pending.retain(|(r, _)| r != region);
        self.origins.retain(|(r, _)| r != region);
    }

    /// Returns whether an interaction is waiting for resolution.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drains pending interactions in recording order.
    pub fn take_pending(&mut self) -> Vec<(FocusRegion, Interaction)> {
        std::mem::take(&mut self.pending)
    }

    fn take_origin(&mut self, region: &FocusRegion) -> Option<ElementRef> {
        let index = self.origins.iter().position(|(r, _)| r == region)?;
        Some(self.origins.remove(index).1)
    }
}

/// Consumes pending interactions and returns the focus command for the latest one.
pub fn resolve_focus(state: &mut LayoutState) -> Option<FocusCommand> {
    let mut command = None;
    for (region, interaction) in state.focus.take_pending() {
        let origin = match interaction {
            Interaction::Close => state.focus.take_origin(&region),
            Interaction::Open | Interaction::Position => None,
        };
        let restore = if state.config.restore_focus { origin } else { None };
        if let Some(next) = resolve_region(state, &region, interaction, restore) {
            command = Some(next);
        }
    }
    command
}

fn resolve_region(
    state: &LayoutState,
    region: &FocusRegion,
    interaction: Interaction,
    restore: Option<ElementRef>,
) -> Option<FocusCommand> {
    let target = match (region, interaction) {
        (FocusRegion::Drawer(id), Interaction::Open) => {
            let descriptor = state.drawers.get(id)?;
            if !state.drawers.is_active(id) {
                return None;
            }
            if descriptor.resizable && !state.is_mobile() {
                Some(FocusTarget::DrawerResizeHandle { id: id.clone() })
            } else {
                Some(FocusTarget::DrawerClose { id: id.clone() })
            }
        }
        (FocusRegion::Drawer(id), Interaction::Close) => state
            .drawers
            .get(id)
            .and_then(|descriptor| descriptor.trigger.as_ref())
            .map(|_| FocusTarget::DrawerTrigger { id: id.clone() }),
        (FocusRegion::Drawer(_), Interaction::Position) => None,
        (FocusRegion::Navigation, Interaction::Open) => Some(FocusTarget::NavigationClose),
        (FocusRegion::Navigation, Interaction::Close) => Some(FocusTarget::NavigationToggle),
        (FocusRegion::Navigation, Interaction::Position) => None,
        (FocusRegion::SplitPanel, Interaction::Open) if state.is_mobile() => {
            Some(FocusTarget::SplitPanelClose)
        }
        (FocusRegion::SplitPanel, Interaction::Open | Interaction::Position) => {
            state
                .split_panel
                .open
                .then_some(FocusTarget::SplitPanelResizeHandle)
        }
        (FocusRegion::SplitPanel, Interaction::Close) => Some(FocusTarget::SplitPanelToggle),
    };

    match (restore, interaction) {
        (Some(element), Interaction::Close) => Some(FocusCommand::Restore {
            element,
            fallback: target,
        }),
        _ => target.map(FocusCommand::Focus),
    }
}
