//! Host-side glue for drape.
//!
//! Nothing in here is needed to present an overlay; this crate is what a
//! host binary wires around one. It answers "where am I running", keeps the
//! app-review counter, tracks windows, and provides a headless
//! [`HostWindow`](drape_core::HostWindow) for tests and scripted runs:
//!
//! ```
//! use drape_core::Size;
//! use drape_platform::headless::headless_host;
//!
//! let (_clock, window, host) = headless_host(Size::new(800.0, 600.0));
//! assert!(host.window.mount_overlay_container().is_some());
//! assert_eq!(window.containers().len(), 1);
//! ```

pub mod app_info;
pub mod error;
pub mod headless;
pub mod platform;
pub mod review;
pub mod windows;

pub use app_info::AppInfo;
pub use error::{PlatformError, Result};
pub use platform::{DeviceIdiom, Platform, is_preview_mode};
pub use review::{
    JsonFileReviewStore, MemoryReviewStore, RequestReview, ReviewOutcome, ReviewPolicy,
    ReviewRecord, ReviewStore,
};
pub use windows::{Activation, WindowId, WindowInfo, WindowRegistry};
