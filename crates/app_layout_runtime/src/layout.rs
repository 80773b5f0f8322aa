//! A mounted layout instance: state, host effects, plugins and page-wide deduplication.

use std::{collections::HashMap, rc::Rc};

use app_layout_contract::{
    AppLayoutApi, AriaLabels, DeduplicationType, DrawerDescriptor, DrawerPlacement, DrawersProps,
    FocusTarget, GlobalDrawersProps, NavigationProps, SharedProps, SplitPanelToggleProps,
    ToolbarProps,
};
use app_layout_host::{
    plugin_registry, DelayedWidgetLoader, DrawerMessage, FeatureFlags, HostServices,
    PluginRegistry, WidgetImplementation, WidgetPart,
};
use serde_json::Value;
use tracing::warn;

use crate::{
    config::LayoutConfig,
    dedup::{instance_registry, Registration},
    drawers::DrawerSource,
    effect_executor::EffectExecutor,
    error_boundary::{refresh_top_page, BoundaryOutput, ContentError, ContentRegion, ErrorBoundary},
    focus::FocusCommand,
    geometry::LayoutGeometry,
    model::{ChangeSource, InteractionState, LayoutState, Viewport},
    reducer::{reduce_layout, LayoutAction, LayoutEffect},
    widget::PendingWidget,
};

/// Executor yields before a widget override mounts when delay simulation is on.
const SIMULATED_WIDGET_DELAY_YIELDS: u32 = 4;

/// Telemetry sink for content errors.
pub type ContentErrorReporter = Rc<dyn Fn(&ContentError)>;

#[derive(Clone)]
/// Mount-time options of an [`AppLayout`].
pub struct LayoutOptions {
    /// Numeric constants.
    pub config: LayoutConfig,
    /// Initial viewport.
    pub viewport: Viewport,
    /// Forced deduplication role; `None` lets the registry elect.
    pub deduplication: Option<DeduplicationType>,
    /// Whether the layout renders navigation.
    pub navigation: bool,
    /// Whether the layout renders a split panel.
    pub split_panel: bool,
    /// Declarative local drawers.
    pub drawers: Vec<DrawerDescriptor>,
    /// Breadcrumbs content shared with the toolbar.
    pub breadcrumbs: Option<Value>,
    /// Toolbar aria labels.
    pub aria_labels: AriaLabels,
    /// Receives content errors caught by the layout's error boundaries.
    pub error_reporter: Option<ContentErrorReporter>,
}

impl LayoutOptions {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            config: LayoutConfig::default(),
            viewport,
            deduplication: None,
            navigation: true,
            split_panel: false,
            drawers: Vec::new(),
            breadcrumbs: None,
            aria_labels: AriaLabels::new(),
            error_reporter: None,
        }
    }
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("config", &self.config)
            .field("viewport", &self.viewport)
            .field("deduplication", &self.deduplication)
            .field("navigation", &self.navigation)
            .field("split_panel", &self.split_panel)
            .field("drawers", &self.drawers.len())
            .finish_non_exhaustive()
    }
}

/// A mounted app layout.
pub struct AppLayout {
    state: LayoutState,
    interaction: InteractionState,
    executor: EffectExecutor,
    flags: FeatureFlags,
    plugins: PluginRegistry,
    registration: Registration,
    synced_revision: Option<u64>,
    breadcrumbs: Option<Value>,
    aria_labels: AriaLabels,
    boundaries: HashMap<ContentRegion, ErrorBoundary>,
    error_reporter: Option<ContentErrorReporter>,
}

impl std::fmt::Debug for AppLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppLayout")
            .field("instance", &self.registration.id())
            .field("state", &self.state)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl AppLayout {
    /// Mounts a layout. Feature flags are read once here.
    pub fn new(options: LayoutOptions, host: HostServices) -> Self {
        let plugins = plugin_registry();
        let flags = plugins.feature_flags();
        let deduplication = if flags.toolbar {
            options.deduplication
        } else {
            Some(DeduplicationType::Off)
        };
        let registration = instance_registry().register(deduplication);

        let mut layout = Self {
            state: LayoutState::new(options.config, options.viewport),
            interaction: InteractionState::default(),
            executor: EffectExecutor::new(host),
            flags,
            plugins,
            registration,
            synced_revision: None,
            breadcrumbs: options.breadcrumbs,
            aria_labels: options.aria_labels,
            boundaries: HashMap::new(),
            error_reporter: options.error_reporter,
        };
        layout.dispatch(LayoutAction::SetNavigationPresent {
            present: options.navigation,
        });
        layout.dispatch(LayoutAction::SetSplitPanelPresent {
            present: options.split_panel,
        });
        layout.dispatch(LayoutAction::SetDrawers {
            drawers: options.drawers,
        });
        layout
    }

    /// Applies `action`, runs host effects and returns the notifications for the hosting page.
    /// Rejected actions are logged and leave the layout unchanged.
    pub fn dispatch(&mut self, action: LayoutAction) -> Vec<LayoutEffect> {
        match reduce_layout(&mut self.state, &mut self.interaction, action) {
            Ok(effects) => {
                let notifications = self.executor.run(effects);
                self.publish();
                notifications
            }
            Err(error) => {
                warn!(%error, instance = %self.registration.id(), "layout action rejected");
                Vec::new()
            }
        }
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.state.geometry
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Feature flags read at mount.
    pub fn feature_flags(&self) -> FeatureFlags {
        self.flags
    }

    pub fn role(&self) -> DeduplicationType {
        self.registration.role()
    }

    /// Props this instance shares with the primary instance.
    pub fn shared_props(&self) -> SharedProps {
        let drawers = &self.state.drawers;
        let local = drawers.descriptors_where(|d| d.placement == DrawerPlacement::Local);
        let global = drawers.descriptors_where(|d| d.placement.is_global());
        let split_panel = &self.state.split_panel;

        SharedProps {
            navigation: self.state.navigation.present.then(|| NavigationProps {
                open: self.state.navigation.open,
            }),
            drawers: (!local.is_empty()).then(|| DrawersProps {
                drawers: local,
                active_drawer_id: drawers.active_local().cloned(),
            }),
            global_drawers: (!global.is_empty()).then(|| GlobalDrawersProps {
                drawers: global,
                active_drawer_ids: drawers
                    .open_queue()
                    .filter(|id| drawers.active_global().contains(*id))
                    .cloned()
                    .collect(),
            }),
            split_panel: split_panel.present.then(|| SplitPanelToggleProps {
                open: split_panel.open,
                position: self.state.split_panel_position(),
            }),
            breadcrumbs: self.breadcrumbs.clone(),
            expanded_drawer_id: self.state.expanded_drawer.clone(),
            aria_labels: self.aria_labels.clone(),
        }
    }

    fn publish(&self) {
        self.registration.update_props(self.shared_props());
    }

    /// Replaces the breadcrumbs shared with the toolbar.
    pub fn set_breadcrumbs(&mut self, breadcrumbs: Option<Value>) {
        self.breadcrumbs = breadcrumbs;
        self.publish();
    }

    /// Toolbar this instance renders, if any.
    pub fn toolbar(&self) -> Option<ToolbarProps> {
        self.registration.toolbar(&self.shared_props())
    }

    /// Reports whether the layout intersects the viewport.
    pub fn set_visible(&mut self, visible: bool) {
        self.registration.set_visible(visible);
    }

    /// Pulls runtime drawers and drawer messages from the plugin registry. Only the instance
    /// rendering a toolbar hosts runtime drawers.
    pub fn sync_plugins(&mut self) -> Vec<LayoutEffect> {
        if !matches!(
            self.role(),
            DeduplicationType::Primary | DeduplicationType::Off
        ) {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let revision = self.plugins.revision();
        if self.synced_revision != Some(revision) {
            let published = self.plugins.drawers();
            let registered: Vec<&DrawerDescriptor> = self
                .state
                .drawers
                .records()
                .iter()
                .filter(|record| record.source == DrawerSource::Runtime)
                .map(|record| &record.descriptor)
                .collect();
            for existing in &registered {
                if !published.iter().any(|d| d.id == existing.id) {
                    actions.push(LayoutAction::UnregisterDrawer {
                        id: existing.id.clone(),
                    });
                }
            }
            for descriptor in published {
                match registered.iter().find(|d| d.id == descriptor.id) {
                    None => actions.push(LayoutAction::RegisterDrawer(descriptor)),
                    Some(current) if **current != descriptor => {
                        actions.push(LayoutAction::UpdateDrawer(descriptor))
                    }
                    Some(_) => {}
                }
            }
            self.synced_revision = Some(revision);
        }

        for message in self.plugins.drain_messages() {
            actions.push(match message {
                DrawerMessage::Open(id) => LayoutAction::OpenDrawer {
                    id,
                    source: ChangeSource::Programmatic,
                },
                DrawerMessage::Close(id) => LayoutAction::CloseDrawer {
                    id,
                    source: ChangeSource::Programmatic,
                },
                DrawerMessage::Resize { id, size } => LayoutAction::ResizeDrawer { id, size },
            });
        }

        actions
            .into_iter()
            .flat_map(|action| self.dispatch(action))
            .collect()
    }

    /// Starts loading the override installed for `part`.
    pub fn load_widget(&self, part: WidgetPart) -> PendingWidget<WidgetImplementation> {
        match self.plugins.widget_loader(part) {
            None => PendingWidget::default_part(),
            Some(loader) if self.flags.simulate_widget_delay => PendingWidget::load(
                DelayedWidgetLoader::new(loader, SIMULATED_WIDGET_DELAY_YIELDS),
            ),
            Some(loader) => PendingWidget::load(loader),
        }
    }

    /// Renders descendant content of `region` behind its error boundary.
    pub fn render_content<T>(
        &mut self,
        region: ContentRegion,
        render: impl FnOnce() -> Result<T, ContentError>,
    ) -> BoundaryOutput<T> {
        let reporter = self.error_reporter.clone();
        self.boundaries
            .entry(region)
            .or_insert_with(|| match reporter {
                Some(reporter) => ErrorBoundary::new().with_reporter(move |error| (*reporter)(error)),
                None => ErrorBoundary::new(),
            })
            .guard(render)
    }

    /// Handles the fallback's retry action for `region`.
    pub fn retry_content(&mut self, region: &ContentRegion) {
        if let Some(boundary) = self.boundaries.get_mut(region) {
            boundary.retry();
        }
    }

    /// Handles the fallback's refresh action.
    pub fn refresh_page(&self) -> bool {
        refresh_top_page(self.executor.host().page.as_ref())
    }

    fn focus(&self, target: FocusTarget) {
        self.executor.focus(&FocusCommand::Focus(target));
    }
}

impl AppLayoutApi for AppLayout {
    fn close_navigation_if_necessary(&mut self) {
        if self.state.is_mobile() {
            self.dispatch(LayoutAction::SetNavigationOpen {
                open: false,
                source: ChangeSource::Programmatic,
            });
        }
    }

    fn open_tools(&mut self) {
        let tools = self
            .state
            .drawers
            .records()
            .iter()
            .find(|record| record.descriptor.placement == DrawerPlacement::Local)
            .map(|record| record.descriptor.id.clone());
        if let Some(id) = tools {
            self.dispatch(LayoutAction::OpenDrawer {
                id,
                source: ChangeSource::Programmatic,
            });
        }
    }

    fn focus_tools_close(&mut self) {
        if let Some(id) = self.state.drawers.active_local().cloned() {
            self.focus(FocusTarget::DrawerClose { id });
        }
    }

    fn focus_active_drawer(&mut self) {
        if let Some(id) = self.state.drawers.last_opened().cloned() {
            self.focus(FocusTarget::DrawerClose { id });
        }
    }

    fn focus_split_panel(&mut self) {
        let split_panel = &self.state.split_panel;
        if !(split_panel.present && split_panel.open) {
            return;
        }
        if self.state.is_mobile() {
            self.focus(FocusTarget::SplitPanelClose);
        } else {
            self.focus(FocusTarget::SplitPanelResizeHandle);
        }
    }

    fn focus_navigation(&mut self) {
        if !self.state.navigation.present {
            return;
        }
        if self.state.navigation.open {
            self.focus(FocusTarget::NavigationClose);
        } else {
            self.focus(FocusTarget::NavigationToggle);
        }
    }
}
