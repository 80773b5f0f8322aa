//! Page-wide deduplication of layout toolbars.
//!
//! Several layouts may be nested on one page. The first visible one becomes primary and renders
//! a single toolbar merged from its own props and the props of every visible secondary. Each
//! toolbar capability is owned by exactly one instance; later definitions are dropped with a
//! warning.

use std::{
    cell::RefCell,
    collections::BTreeSet,
    rc::{Rc, Weak},
};

use app_layout_contract::{
    Capability, Contribution, DeduplicationType, InstanceId, SharedProps, ToolbarProps,
};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A capability defined by more than one instance.
pub struct MergeConflict {
    /// Instance whose definition was dropped.
    pub instance: InstanceId,
    /// Capability it tried to define.
    pub capability: Capability,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Result of [`merge_props`].
pub struct MergeOutcome {
    /// Merged toolbar, `None` when no capability is defined.
    pub toolbar: Option<ToolbarProps>,
    /// Dropped definitions in merge order.
    pub conflicts: Vec<MergeConflict>,
}

fn claim<T: Clone>(
    slot: &mut Option<Contribution<T>>,
    value: &Option<T>,
    owner: InstanceId,
    capability: Capability,
    conflicts: &mut Vec<MergeConflict>,
) {
    let Some(value) = value else {
        return;
    };
    if slot.is_some() {
        conflicts.push(MergeConflict {
            instance: owner,
            capability,
        });
    } else {
        *slot = Some(Contribution {
            owner,
            value: value.clone(),
        });
    }
}

/// Merges contributions in order; the first contributor of each capability wins.
///
/// Aria labels are shallow-merged with later keys overwriting earlier ones.
pub fn merge_props(contributors: &[(InstanceId, &SharedProps)]) -> MergeOutcome {
    let mut toolbar = ToolbarProps::default();
    let mut conflicts = Vec::new();
    for (owner, props) in contributors {
        let owner = *owner;
        claim(&mut toolbar.drawers, &props.drawers, owner, Capability::Drawers, &mut conflicts);
        claim(
            &mut toolbar.global_drawers,
            &props.global_drawers,
            owner,
            Capability::GlobalDrawers,
            &mut conflicts,
        );
        claim(
            &mut toolbar.navigation,
            &props.navigation,
            owner,
            Capability::Navigation,
            &mut conflicts,
        );
        claim(
            &mut toolbar.split_panel,
            &props.split_panel,
            owner,
            Capability::SplitPanel,
            &mut conflicts,
        );
        claim(
            &mut toolbar.breadcrumbs,
            &props.breadcrumbs,
            owner,
            Capability::Breadcrumbs,
            &mut conflicts,
        );
        claim(
            &mut toolbar.expanded_drawer_id,
            &props.expanded_drawer_id,
            owner,
            Capability::ExpandedDrawer,
            &mut conflicts,
        );
        toolbar.aria_labels.extend(
            props
                .aria_labels
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }

    MergeOutcome {
        toolbar: toolbar.has_capabilities().then_some(toolbar),
        conflicts,
    }
}

#[derive(Debug)]
struct InstanceEntry {
    id: InstanceId,
    forced: Option<DeduplicationType>,
    visible: bool,
    props: SharedProps,
}

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    entries: Vec<InstanceEntry>,
    warned: BTreeSet<MergeConflict>,
}

impl RegistryState {
    fn allocate_id(&mut self) -> InstanceId {
        self.next_id = self.next_id.saturating_add(1);
        InstanceId(self.next_id)
    }

    fn primary(&self) -> Option<InstanceId> {
        let visible = || self.entries.iter().filter(|entry| entry.visible);
        visible()
            .find(|entry| entry.forced == Some(DeduplicationType::Primary))
            .or_else(|| {
                visible().find(|entry| entry.forced != Some(DeduplicationType::Secondary))
            })
            .map(|entry| entry.id)
    }

    fn role(&self, id: InstanceId) -> DeduplicationType {
        match self.entries.iter().find(|entry| entry.id == id) {
            Some(entry) if !entry.visible => DeduplicationType::Suspended,
            Some(_) if self.primary() == Some(id) => DeduplicationType::Primary,
            Some(_) => DeduplicationType::Secondary,
            None => DeduplicationType::Off,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Handle to the page-wide layout instance registry.
pub struct InstanceRegistry {
    inner: Rc<RefCell<RegistryState>>,
}

impl InstanceRegistry {
    /// Registers a layout instance. `Off` instances are not stored and always render their own
    /// toolbar.
    pub fn register(&self, forced: Option<DeduplicationType>) -> Registration {
        let mut inner = self.inner.borrow_mut();
        let id = inner.allocate_id();
        if forced == Some(DeduplicationType::Off) {
            return Registration { id, registry: None };
        }
        inner.entries.push(InstanceEntry {
            id,
            forced,
            visible: true,
            props: SharedProps::default(),
        });
        Registration {
            id,
            registry: Some(Rc::downgrade(&self.inner)),
        }
    }

    /// Current role of `id`.
    pub fn role(&self, id: InstanceId) -> DeduplicationType {
        self.inner.borrow().role(id)
    }

    /// Records whether `id` intersects the viewport. Invisible instances are suspended.
    pub fn set_visible(&self, id: InstanceId, visible: bool) {
        if let Some(entry) = self
            .inner
            .borrow_mut()
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
        {
            entry.visible = visible;
        }
    }

    /// Publishes the latest props of `id`.
    pub fn update_props(&self, id: InstanceId, props: SharedProps) {
        if let Some(entry) = self
            .inner
            .borrow_mut()
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
        {
            entry.props = props;
        }
    }

    /// Merged toolbar for `id` when it is primary, `None` otherwise. Conflicts are logged once
    /// per instance and capability.
    pub fn merged_toolbar(&self, id: InstanceId) -> Option<ToolbarProps> {
        let mut inner = self.inner.borrow_mut();
        if inner.primary() != Some(id) {
            return None;
        }
        let own = inner.entries.iter().filter(|entry| entry.id == id);
        let secondaries = inner
            .entries
            .iter()
            .filter(|entry| entry.visible && entry.id != id);
        let contributors: Vec<(InstanceId, &SharedProps)> = own
            .chain(secondaries)
            .map(|entry| (entry.id, &entry.props))
            .collect();
        let outcome = merge_props(&contributors);

        for conflict in outcome.conflicts {
            if inner.warned.insert(conflict) {
                warn!(
                    instance = %conflict.instance,
                    capability = %conflict.capability,
                    "another app layout instance on this page already defined {}; this definition is ignored",
                    conflict.capability
                );
            }
        }
        outcome.toolbar
    }

    /// Number of distinct conflict warnings emitted so far.
    pub fn warning_count(&self) -> usize {
        self.inner.borrow().warned.len()
    }

    /// Number of stored instances.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns `true` when no instance is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every instance and warning.
    pub fn reset(&self) {
        *self.inner.borrow_mut() = RegistryState::default();
    }
}

fn deregister(inner: &RefCell<RegistryState>, id: InstanceId) {
    let mut inner = inner.borrow_mut();
    inner.entries.retain(|entry| entry.id != id);
    inner.warned.retain(|conflict| conflict.instance != id);
}

/// Registration of one layout instance. Dropping it deregisters the instance.
#[derive(Debug)]
pub struct Registration {
    id: InstanceId,
    registry: Option<Weak<RefCell<RegistryState>>>,
}

impl Registration {
    /// Instance id.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Whether the instance opted out of deduplication.
    pub fn is_off(&self) -> bool {
        self.registry.is_none()
    }

    fn registry(&self) -> Option<InstanceRegistry> {
        let inner = self.registry.as_ref()?.upgrade()?;
        Some(InstanceRegistry { inner })
    }

    /// Current role.
    pub fn role(&self) -> DeduplicationType {
        self.registry()
            .map(|registry| registry.role(self.id))
            .unwrap_or(DeduplicationType::Off)
    }

    /// See [`InstanceRegistry::set_visible`].
    pub fn set_visible(&self, visible: bool) {
        if let Some(registry) = self.registry() {
            registry.set_visible(self.id, visible);
        }
    }

    /// See [`InstanceRegistry::update_props`].
    pub fn update_props(&self, props: SharedProps) {
        if let Some(registry) = self.registry() {
            registry.update_props(self.id, props);
        }
    }

    /// Toolbar this instance renders given its own `props`: the merged toolbar when primary,
    /// its own toolbar when off, nothing otherwise.
    pub fn toolbar(&self, props: &SharedProps) -> Option<ToolbarProps> {
        match self.registry() {
            Some(registry) => registry.merged_toolbar(self.id),
            None => merge_props(&[(self.id, props)]).toolbar,
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.as_ref().and_then(Weak::upgrade) {
            deregister(&inner, self.id);
        }
    }
}

thread_local! {
    static GLOBAL_INSTANCE_REGISTRY: InstanceRegistry = InstanceRegistry::default();
}

/// Returns the page-wide instance registry.
pub fn instance_registry() -> InstanceRegistry {
    GLOBAL_INSTANCE_REGISTRY.with(|registry| registry.clone())
}
