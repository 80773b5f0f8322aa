//! Loading state of overridable layout parts.

use app_layout_host::{Skeleton, WidgetFuture, WidgetLoader};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
/// What a widget slot renders.
pub enum WidgetSlot<T> {
    /// No override installed; render the built-in part.
    Default,
    /// Override is loading; render its skeleton.
    Loading(Skeleton),
    /// Override loaded.
    Ready(T),
    /// Override failed to load; render the skeleton with the failure attached.
    Failed {
        /// Skeleton kept on screen.
        skeleton: Skeleton,
        /// Loader error.
        error: String,
    },
}

impl<T> WidgetSlot<T> {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading(_))
    }
}

/// A slot in its loading state and the future resolving its final state.
pub struct PendingWidget<T> {
    /// State to render until `settled` completes.
    pub initial: WidgetSlot<T>,
    /// Final state.
    pub settled: WidgetFuture<'static, WidgetSlot<T>>,
}

impl<T> std::fmt::Debug for PendingWidget<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingWidget")
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> PendingWidget<T> {
    /// Slot with no override; settles immediately.
    pub fn default_part() -> Self {
        Self {
            initial: WidgetSlot::Default,
            settled: Box::pin(async { WidgetSlot::Default }),
        }
    }

    /// Starts loading through `loader`. The skeleton is available synchronously.
    pub fn load<L>(loader: L) -> Self
    where
        L: WidgetLoader<Implementation = T> + 'static,
    {
        let skeleton = loader.skeleton();
        let initial = WidgetSlot::Loading(skeleton.clone());
        let settled = Box::pin(async move {
            match loader.load().await {
                Ok(implementation) => WidgetSlot::Ready(implementation),
                Err(error) => {
                    warn!(skeleton = %skeleton.name, %error, "widget implementation failed to load");
                    WidgetSlot::Failed { skeleton, error }
                }
            }
        });
        Self { initial, settled }
    }
}

#[cfg(test)]
mod tests {
    use app_layout_host::{DelayedWidgetLoader, ReadyWidgetLoader, WidgetImplementation};
    use futures::{executor::block_on, FutureExt};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;

    struct FailingLoader;

    impl WidgetLoader for FailingLoader {
        type Implementation = WidgetImplementation;

        fn load(&self) -> WidgetFuture<'_, Result<WidgetImplementation, String>> {
            Box::pin(async { Err("chunk missing".to_string()) })
        }

        fn skeleton(&self) -> Skeleton {
            Skeleton {
                name: "toolbar-skeleton".into(),
            }
        }
    }

    fn implementation() -> WidgetImplementation {
        WidgetImplementation {
            name: "visual-refresh-toolbar".into(),
            options: Value::Null,
        }
    }

    #[test]
    fn skeleton_renders_until_the_delayed_loader_settles() {
        let loader = DelayedWidgetLoader::new(
            ReadyWidgetLoader::new(implementation(), "toolbar-skeleton"),
            2,
        );
        let mut pending = PendingWidget::load(loader);
        assert_eq!(
            pending.initial,
            WidgetSlot::Loading(Skeleton {
                name: "toolbar-skeleton".into()
            })
        );
        assert!(!pending.initial.is_settled());
        assert_eq!((&mut pending.settled).now_or_never(), None);
        assert_eq!(block_on(pending.settled), WidgetSlot::Ready(implementation()));
    }

    #[test]
    fn load_failures_keep_the_skeleton() {
        let pending = PendingWidget::load(FailingLoader);
        assert_eq!(
            block_on(pending.settled),
            WidgetSlot::Failed {
                skeleton: Skeleton {
                    name: "toolbar-skeleton".into()
                },
                error: "chunk missing".into(),
            }
        );
    }

    #[test]
    fn missing_override_renders_the_default_part() {
        let pending = PendingWidget::<WidgetImplementation>::default_part();
        assert!(pending.initial.is_settled());
        assert_eq!(block_on(pending.settled), WidgetSlot::Default);
    }
}
