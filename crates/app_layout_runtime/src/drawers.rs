//! Drawer registry: registered drawers, the active set, the open queue and stored sizes.

use std::collections::{BTreeMap, VecDeque};

use app_layout_contract::{DrawerDescriptor, DrawerId, DrawerPlacement};
use tracing::debug;

use crate::{config::LayoutConfig, geometry::DrawerBounds, reducer::LayoutError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a drawer was registered.
pub enum DrawerSource {
    /// Part of the hosting page's drawers list.
    Declarative,
    /// Registered at runtime through the plugin registry.
    Runtime,
}

#[derive(Debug, Clone, PartialEq)]
/// A registered drawer.
pub struct DrawerRecord {
    /// Drawer definition.
    pub descriptor: DrawerDescriptor,
    /// Registration path.
    pub source: DrawerSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Mount state of a drawer's content.
pub enum ContentState {
    /// Active: visible and reachable by focus.
    Active,
    /// Inactive but kept mounted; hidden and not focusable.
    Hidden,
    /// Inactive and not mounted.
    Unmounted,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Result of activating a drawer.
pub struct Activation {
    /// Local drawer replaced by this activation.
    pub replaced: Option<DrawerId>,
    /// Whether the drawer was already active.
    pub already_active: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Registered drawers and their open/close state.
pub struct DrawerRegistry {
    drawers: Vec<DrawerRecord>,
    active_local: Option<DrawerId>,
    active_global: Vec<DrawerId>,
    open_queue: VecDeque<DrawerId>,
    sizes: BTreeMap<DrawerId, f64>,
}

impl DrawerRegistry {
    /// Returns the descriptor registered under `id`.
    pub fn get(&self, id: &DrawerId) -> Option<&DrawerDescriptor> {
        self.drawers
            .iter()
            .find(|record| &record.descriptor.id == id)
            .map(|record| &record.descriptor)
    }

    fn require(&self, id: &DrawerId) -> Result<&DrawerDescriptor, LayoutError> {
        self.get(id)
            .ok_or_else(|| LayoutError::UnknownDrawer(id.clone()))
    }

    /// Returns every registered drawer in registration order.
    pub fn records(&self) -> &[DrawerRecord] {
        &self.drawers
    }

    /// Returns registered drawers matching `filter`.
    pub fn descriptors_where(
        &self,
        filter: impl Fn(&DrawerDescriptor) -> bool,
    ) -> Vec<DrawerDescriptor> {
        self.drawers
            .iter()
            .map(|record| &record.descriptor)
            .filter(|descriptor| filter(descriptor))
            .cloned()
            .collect()
    }

    /// Replaces the declarative drawers. Returns the ids that were active and disappeared.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateDrawer`] when an id repeats or collides with a runtime
    /// drawer; the registry is left unchanged.
    pub fn set_declarative(
        &mut self,
        drawers: Vec<DrawerDescriptor>,
    ) -> Result<Vec<DrawerId>, LayoutError> {
        for (index, descriptor) in drawers.iter().enumerate() {
            let repeated = drawers[..index].iter().any(|d| d.id == descriptor.id);
            let runtime_collision = self.drawers.iter().any(|record| {
                record.source == DrawerSource::Runtime && record.descriptor.id == descriptor.id
            });
            if repeated || runtime_collision {
                return Err(LayoutError::DuplicateDrawer(descriptor.id.clone()));
            }
        }

        let removed: Vec<DrawerId> = self
            .drawers
            .iter()
            .filter(|record| record.source == DrawerSource::Declarative)
            .map(|record| record.descriptor.id.clone())
            .filter(|id| !drawers.iter().any(|d| &d.id == id))
            .collect();
        let mut closed = Vec::new();
        for id in &removed {
            if self.deactivate(id) {
                closed.push(id.clone());
            }
            self.sizes.remove(id);
        }

        self.drawers
            .retain(|record| record.source != DrawerSource::Declarative);
        let declarative = drawers.into_iter().map(|descriptor| DrawerRecord {
            descriptor,
            source: DrawerSource::Declarative,
        });
        let runtime = std::mem::take(&mut self.drawers);
        self.drawers = declarative.chain(runtime).collect();
        Ok(closed)
    }

    /// Registers a runtime drawer.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateDrawer`] when the id is taken.
    pub fn register_runtime(&mut self, descriptor: DrawerDescriptor) -> Result<(), LayoutError> {
        if self.get(&descriptor.id).is_some() {
            return Err(LayoutError::DuplicateDrawer(descriptor.id));
        }
        self.drawers.push(DrawerRecord {
            descriptor,
            source: DrawerSource::Runtime,
        });
        Ok(())
    }

    /// Replaces a drawer definition. Returns `true` when an active drawer had to close because
    /// its placement changed.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownDrawer`] when the id is not registered.
    pub fn update(&mut self, descriptor: DrawerDescriptor) -> Result<bool, LayoutError> {
        let previous_placement = self.require(&descriptor.id)?.placement;
        let id = descriptor.id.clone();
        let closed = previous_placement != descriptor.placement && self.deactivate(&id);
        if let Some(record) = self
            .drawers
            .iter_mut()
            .find(|record| record.descriptor.id == id)
        {
            record.descriptor = descriptor;
        }
        Ok(closed)
    }

    /// Removes a drawer. Returns `true` when it was active.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownDrawer`] when the id is not registered.
    pub fn unregister(&mut self, id: &DrawerId) -> Result<bool, LayoutError> {
        self.require(id)?;
        let was_active = self.deactivate(id);
        self.drawers.retain(|record| &record.descriptor.id != id);
        self.sizes.remove(id);
        Ok(was_active)
    }

    /// Returns whether `id` is active.
    pub fn is_active(&self, id: &DrawerId) -> bool {
        self.active_local.as_ref() == Some(id) || self.active_global.contains(id)
    }

    /// Active local drawer.
    pub fn active_local(&self) -> Option<&DrawerId> {
        self.active_local.as_ref()
    }

    /// Active global drawers in activation order.
    pub fn active_global(&self) -> &[DrawerId] {
        &self.active_global
    }

    /// Active drawers, most recently opened first.
    pub fn open_queue(&self) -> impl Iterator<Item = &DrawerId> {
        self.open_queue.iter()
    }

    /// Most recently opened active drawer.
    pub fn last_opened(&self) -> Option<&DrawerId> {
        self.open_queue.front()
    }

    /// Mount state of `id`'s content.
    pub fn content_state(&self, id: &DrawerId) -> ContentState {
        if self.is_active(id) {
            ContentState::Active
        } else if self
            .get(id)
            .map(|descriptor| descriptor.preserve_inactive_content)
            .unwrap_or(false)
        {
            ContentState::Hidden
        } else {
            ContentState::Unmounted
        }
    }

    /// Activates `id`, replacing the active local drawer when `id` is local.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownDrawer`] when the id is not registered.
    pub fn activate(&mut self, id: &DrawerId) -> Result<Activation, LayoutError> {
        let placement = self.require(id)?.placement;
        if self.is_active(id) {
            return Ok(Activation {
                replaced: None,
                already_active: true,
            });
        }

        let mut activation = Activation::default();
        if placement.is_global() {
            self.active_global.push(id.clone());
        } else {
            activation.replaced = self.active_local.replace(id.clone());
            if let Some(replaced) = &activation.replaced {
                self.open_queue.retain(|queued| queued != replaced);
            }
        }
        self.open_queue.retain(|queued| queued != id);
        self.open_queue.push_front(id.clone());
        Ok(activation)
    }

    /// Deactivates `id`. Returns `false` when it was not active.
    pub fn deactivate(&mut self, id: &DrawerId) -> bool {
        let was_active = self.is_active(id);
        if self.active_local.as_ref() == Some(id) {
            self.active_local = None;
        }
        self.active_global.retain(|active| active != id);
        self.open_queue.retain(|queued| queued != id);
        was_active
    }

    /// Deactivates every active drawer except `keep`. Returns the closed ids.
    pub fn deactivate_all_except(&mut self, keep: Option<&DrawerId>) -> Vec<DrawerId> {
        let closing: Vec<DrawerId> = self
            .open_queue
            .iter()
            .filter(|id| Some(*id) != keep)
            .cloned()
            .collect();
        for id in &closing {
            self.deactivate(id);
        }
        closing
    }

    /// Minimum size of `id`, falling back to the configured minimum.
    pub fn min_size(&self, id: &DrawerId, config: &LayoutConfig) -> f64 {
        let Some(descriptor) = self.get(id) else {
            return config.min_drawer_size;
        };
        let fallback = if descriptor.placement.is_bottom() {
            config.min_bottom_drawer_size
        } else {
            config.min_drawer_size
        };
        descriptor
            .min_size
            .filter(|size| size.is_finite() && *size >= 0.0)
            .unwrap_or(fallback)
    }

    /// Stored size of `id`, or its default when never resized.
    pub fn size(&self, id: &DrawerId, config: &LayoutConfig) -> f64 {
        if let Some(size) = self.sizes.get(id) {
            return *size;
        }
        let Some(descriptor) = self.get(id) else {
            return config.default_drawer_size;
        };
        let fallback = if descriptor.placement.is_bottom() {
            config.default_bottom_drawer_size
        } else {
            config.default_drawer_size
        };
        descriptor
            .default_size
            .filter(|size| size.is_finite() && *size >= 0.0)
            .unwrap_or(fallback)
    }

    /// Stores a size for `id`.
    pub fn set_size(&mut self, id: &DrawerId, size: f64) {
        self.sizes.insert(id.clone(), size);
    }

    /// Size bounds of every active drawer, for the geometry solver.
    pub fn active_bounds(&self, config: &LayoutConfig) -> Vec<DrawerBounds> {
        self.open_queue
            .iter()
            .filter_map(|id| {
                let descriptor = self.get(id)?;
                Some(DrawerBounds {
                    id: id.clone(),
                    placement: descriptor.placement,
                    size: self.size(id, config),
                    min_size: self.min_size(id, config),
                })
            })
            .collect()
    }

    fn is_side(&self, id: &DrawerId) -> bool {
        self.get(id)
            .map(|descriptor| descriptor.placement != DrawerPlacement::BottomGlobal)
            .unwrap_or(false)
    }

    fn side_min_total(&self, config: &LayoutConfig) -> f64 {
        self.open_queue
            .iter()
            .filter(|id| self.is_side(id))
            .map(|id| self.min_size(id, config))
            .sum()
    }

    /// Closes the least recently opened side drawers until the minimum sizes of the remaining
    /// side drawers plus `reserved` fit into `available`. The most recently opened drawer is never
    /// evicted. Returns evicted ids, oldest first.
    pub fn evict_until_fits(
        &mut self,
        available: f64,
        reserved: f64,
        config: &LayoutConfig,
    ) -> Vec<DrawerId> {
        let mut evicted = Vec::new();
        while self.side_min_total(config) + reserved > available {
            let Some(oldest) = self
                .open_queue
                .iter()
                .skip(1)
                .rev()
                .find(|id| self.is_side(id))
                .cloned()
            else {
                break;
            };
            debug!(drawer = %oldest, available, "evicting least recently opened drawer");
            self.deactivate(&oldest);
            evicted.push(oldest);
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn registry() -> DrawerRegistry {
        let mut registry = DrawerRegistry::default();
        registry
            .set_declarative(vec![
                DrawerDescriptor::new("tools", DrawerPlacement::Local),
                DrawerDescriptor::new("help", DrawerPlacement::Local).preserving_inactive_content(),
            ])
            .expect("declarative drawers");
        for id in ["g1", "g2", "g3", "g4"] {
            registry
                .register_runtime(DrawerDescriptor::new(id, DrawerPlacement::Global))
                .expect("runtime drawer");
        }
        registry
    }

    fn queue(registry: &DrawerRegistry) -> Vec<&str> {
        registry.open_queue().map(DrawerId::as_str).collect()
    }

    #[test]
    fn opening_a_second_local_drawer_replaces_the_first() {
        let mut registry = registry();
        registry.activate(&DrawerId::new("tools")).expect("open tools");
        let activation = registry.activate(&DrawerId::new("help")).expect("open help");

        assert_eq!(activation.replaced, Some(DrawerId::new("tools")));
        assert_eq!(registry.active_local(), Some(&DrawerId::new("help")));
        assert_eq!(queue(&registry), vec!["help"]);
        assert_eq!(
            registry.content_state(&DrawerId::new("tools")),
            ContentState::Unmounted
        );
    }

    #[test]
    fn global_drawers_stack_and_queue_is_most_recent_first() {
        let mut registry = registry();
        for id in ["g1", "tools", "g2"] {
            registry.activate(&DrawerId::new(id)).expect("open");
        }
        registry.activate(&DrawerId::new("g1")).expect("reopen is a no-op");

        assert_eq!(queue(&registry), vec!["g2", "tools", "g1"]);
        assert_eq!(registry.last_opened(), Some(&DrawerId::new("g2")));
        assert!(registry.deactivate(&DrawerId::new("tools")));
        assert!(!registry.deactivate(&DrawerId::new("tools")));
        assert_eq!(queue(&registry), vec!["g2", "g1"]);
    }

    #[test]
    fn eviction_closes_the_oldest_drawer_first() {
        let config = LayoutConfig::default();
        let mut registry = registry();
        for id in ["g1", "g2", "g3", "g4"] {
            registry.activate(&DrawerId::new(id)).expect("open");
        }

        let evicted = registry.evict_until_fits(3.0 * 290.0 + 10.0, 0.0, &config);
        assert_eq!(evicted, vec![DrawerId::new("g1")]);
        assert_eq!(queue(&registry), vec!["g4", "g3", "g2"]);

        let evicted = registry.evict_until_fits(0.0, 0.0, &config);
        assert_eq!(evicted, vec![DrawerId::new("g2"), DrawerId::new("g3")]);
        assert_eq!(queue(&registry), vec!["g4"]);
    }

    #[test]
    fn preserved_content_stays_mounted_while_hidden() {
        let mut registry = registry();
        let help = DrawerId::new("help");
        registry.activate(&help).expect("open");
        assert_eq!(registry.content_state(&help), ContentState::Active);
        registry.deactivate(&help);
        assert_eq!(registry.content_state(&help), ContentState::Hidden);
    }

    #[test]
    fn declarative_update_closes_removed_active_drawer_and_rejects_duplicates() {
        let mut registry = registry();
        registry.activate(&DrawerId::new("help")).expect("open");

        let closed = registry
            .set_declarative(vec![DrawerDescriptor::new("tools", DrawerPlacement::Local)])
            .expect("update");
        assert_eq!(closed, vec![DrawerId::new("help")]);
        assert_eq!(registry.active_local(), None);
        assert_eq!(registry.records()[0].descriptor.id, DrawerId::new("tools"));

        assert_eq!(
            registry.set_declarative(vec![DrawerDescriptor::new("g1", DrawerPlacement::Local)]),
            Err(LayoutError::DuplicateDrawer(DrawerId::new("g1")))
        );
    }

    #[test]
    fn sizes_fall_back_to_descriptor_then_config() {
        let config = LayoutConfig::default();
        let mut registry = DrawerRegistry::default();
        registry
            .register_runtime(
                DrawerDescriptor::new("wide", DrawerPlacement::Global)
                    .with_default_size(400.0)
                    .with_min_size(f64::NAN),
            )
            .expect("register");
        registry
            .register_runtime(DrawerDescriptor::new("console", DrawerPlacement::BottomGlobal))
            .expect("register");

        let wide = DrawerId::new("wide");
        assert_eq!(registry.size(&wide, &config), 400.0);
        assert_eq!(registry.min_size(&wide, &config), config.min_drawer_size);
        assert_eq!(
            registry.size(&DrawerId::new("console"), &config),
            config.default_bottom_drawer_size
        );
        registry.set_size(&wide, 500.0);
        assert_eq!(registry.size(&wide, &config), 500.0);
    }
}
