//! Typed host-service contracts and page-wide registries used by the app layout runtime.
//!
//! This crate is the API-first boundary between the layout engine and the document it runs in.
//! It exposes focus, page-access and pointer-capture service traits with no-op and in-memory
//! adapters, the widget loading strategy, and the page-wide plugin registry through which
//! runtime drawers, widget overrides and feature flags are published.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod focus;
pub mod host;
pub mod page;
pub mod plugins;
pub mod pointer;
pub mod widgets;

pub use focus::{FocusHost, MemoryFocusHost, NoopFocusHost};
pub use host::HostServices;
pub use page::{MemoryPageHost, NoopPageHost, PageAccessError, PageHost};
pub use plugins::{
    plugin_registry, DrawerMessage, FeatureFlags, PluginError, PluginRegistry, SharedWidgetLoader,
    WidgetPart,
};
pub use pointer::{MemoryPointerHost, NoopPointerHost, PointerHost, PointerListenerGuard};
pub use widgets::{
    DelayedWidgetLoader, ReadyWidgetLoader, Skeleton, WidgetFuture, WidgetImplementation,
    WidgetLoader,
};
