//! Split panel position resolution with hysteresis.

use app_layout_contract::SplitPanelPosition;
use tracing::debug;

/// Decides whether the split panel must be forced to the bottom.
///
/// The resolver is a two-state machine (`free` and `forced-bottom`). Entering the forced state
/// happens below `min_side_width`; leaving it requires exceeding `min_side_width + margin`, so a
/// width oscillating around the boundary never flips the panel back and forth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPanelPositionResolver {
    /// Minimum available width for a side split panel.
    pub min_side_width: f64,
    /// Extra width required before a forced panel returns to the side.
    pub margin: f64,
}

impl SplitPanelPositionResolver {
    /// Creates a resolver.
    pub fn new(min_side_width: f64, margin: f64) -> Self {
        Self {
            min_side_width,
            margin,
        }
    }

    /// Returns the next forced state given the previous one.
    pub fn next_forced(self, previously_forced: bool, available_width: f64, is_mobile: bool) -> bool {
        if is_mobile {
            return true;
        }
        let forced = if previously_forced {
            available_width <= self.min_side_width + self.margin
        } else {
            available_width < self.min_side_width
        };
        if forced != previously_forced {
            debug!(
                available_width,
                min_side_width = self.min_side_width,
                forced,
                "split panel forced position changed"
            );
        }
        forced
    }
}

/// Resolves the rendered position from the forced state and the stored preference.
///
/// The preference is never modified, so leaving the forced state restores it.
pub fn resolve_position(forced: bool, preference: Option<SplitPanelPosition>) -> SplitPanelPosition {
    if forced {
        SplitPanelPosition::Bottom
    } else {
        preference.unwrap_or(SplitPanelPosition::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::SCROLLBAR_THICKNESS;

    fn walk(resolver: SplitPanelPositionResolver, widths: &[f64]) -> Vec<SplitPanelPosition> {
        let mut forced = false;
        widths
            .iter()
            .map(|width| {
                forced = resolver.next_forced(forced, *width, false);
                resolve_position(forced, Some(SplitPanelPosition::Side))
            })
            .collect()
    }

    #[test]
    fn crossing_the_threshold_once_flips_side_bottom_side() {
        let resolver = SplitPanelPositionResolver::new(1030.0, SCROLLBAR_THICKNESS * 2.0);
        let positions = walk(resolver, &[1200.0, 1029.0, 1030.0, 1071.0]);

        assert_eq!(
            positions,
            vec![
                SplitPanelPosition::Side,
                SplitPanelPosition::Bottom,
                SplitPanelPosition::Bottom,
                SplitPanelPosition::Side,
            ]
        );
    }

    #[test]
    fn exact_margin_boundary_is_still_forced() {
        let resolver = SplitPanelPositionResolver::new(1030.0, 40.0);
        assert!(resolver.next_forced(true, 1070.0, false));
        assert!(!resolver.next_forced(true, 1070.5, false));
        assert!(!resolver.next_forced(false, 1030.0, false));
    }

    #[test]
    fn mobile_always_forces_bottom_without_touching_preference() {
        let resolver = SplitPanelPositionResolver::new(280.0, 40.0);
        let preference = Some(SplitPanelPosition::Side);

        let forced = resolver.next_forced(false, 5000.0, true);
        assert_eq!(resolve_position(forced, preference), SplitPanelPosition::Bottom);

        let forced = resolver.next_forced(forced, 5000.0, false);
        assert_eq!(resolve_position(forced, preference), SplitPanelPosition::Side);
    }

    #[test]
    fn missing_preference_defaults_to_bottom() {
        assert_eq!(resolve_position(false, None), SplitPanelPosition::Bottom);
    }
}
