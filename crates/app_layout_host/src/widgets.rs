//! Asynchronous widget implementation loading.

use std::{future::Future, pin::Pin, task::Poll};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Object-safe boxed future used by [`WidgetLoader`].
pub type WidgetFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Placeholder rendered synchronously while an implementation loads.
pub struct Skeleton {
    /// Stable placeholder name used for diagnostics and styling hooks.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A loaded widget implementation overriding the default rendering of a component part.
pub struct WidgetImplementation {
    /// Implementation name.
    pub name: String,
    /// Implementation-specific options.
    #[serde(default)]
    pub options: Value,
}

/// Strategy for loading a component part's implementation.
pub trait WidgetLoader {
    /// Loaded implementation type.
    type Implementation;

    /// Loads the implementation.
    fn load(&self) -> WidgetFuture<'_, Result<Self::Implementation, String>>;

    /// Returns the synchronous placeholder shown until loading completes.
    fn skeleton(&self) -> Skeleton;
}

impl<L: WidgetLoader + ?Sized> WidgetLoader for std::rc::Rc<L> {
    type Implementation = L::Implementation;

    fn load(&self) -> WidgetFuture<'_, Result<Self::Implementation, String>> {
        (**self).load()
    }

    fn skeleton(&self) -> Skeleton {
        (**self).skeleton()
    }
}

#[derive(Debug, Clone)]
/// Loader that resolves immediately with a fixed implementation.
pub struct ReadyWidgetLoader<T> {
    implementation: T,
    skeleton: Skeleton,
}

impl<T: Clone> ReadyWidgetLoader<T> {
    /// Creates a loader resolving to `implementation`.
    pub fn new(implementation: T, skeleton_name: impl Into<String>) -> Self {
        Self {
            implementation,
            skeleton: Skeleton {
                name: skeleton_name.into(),
            },
        }
    }
}

impl<T: Clone> WidgetLoader for ReadyWidgetLoader<T> {
    type Implementation = T;

    fn load(&self) -> WidgetFuture<'_, Result<T, String>> {
        let implementation = self.implementation.clone();
        Box::pin(async move { Ok(implementation) })
    }

    fn skeleton(&self) -> Skeleton {
        self.skeleton.clone()
    }
}

#[derive(Debug, Clone)]
/// Loader that yields to the executor a fixed number of times before delegating.
///
/// Used to simulate heavier implementations in development; zero yields disables the delay.
pub struct DelayedWidgetLoader<L> {
    inner: L,
    yields: u32,
}

impl<L> DelayedWidgetLoader<L> {
    /// Wraps `inner`, yielding `yields` times before loading.
    pub fn new(inner: L, yields: u32) -> Self {
        Self { inner, yields }
    }
}

impl<L: WidgetLoader> WidgetLoader for DelayedWidgetLoader<L> {
    type Implementation = L::Implementation;

    fn load(&self) -> WidgetFuture<'_, Result<L::Implementation, String>> {
        Box::pin(async move {
            for _ in 0..self.yields {
                yield_now().await;
            }
            self.inner.load().await
        })
    }

    fn skeleton(&self) -> Skeleton {
        self.inner.skeleton()
    }
}

async fn yield_now() {
    let mut yielded = false;
    futures::future::poll_fn(move |cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use futures::{executor::block_on, FutureExt};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn delayed_loader_is_pending_until_it_has_yielded() {
        let loader = DelayedWidgetLoader::new(ReadyWidgetLoader::new(7u32, "toolbar"), 2);
        let mut future = loader.load();

        assert!((&mut future).now_or_never().is_none());
        assert_eq!(block_on(future), Ok(7));
        assert_eq!(loader.skeleton().name, "toolbar");
    }

    #[test]
    fn zero_yields_resolves_immediately() {
        let loader = DelayedWidgetLoader::new(ReadyWidgetLoader::new("ready", "drawer"), 0);
        assert_eq!(loader.load().now_or_never(), Some(Ok("ready")));
    }
}
