//! # Drape core
//!
//! The small runtime the drape helpers are built on:
//!
//! - `View`: an immutable description of a UI subtree with two child
//!   relations (structural `children` and logical accessibility `elements`).
//! - `Signal<T>`: observable value used as a presentation trigger.
//! - `Scope` / `Dispose`: run-once cleanups tied to a UI lifetime.
//! - `Timers`: "run this later" with cancel tokens, driven by the host loop.
//! - `AnimatedValue`: tweens sampled at explicit instants.
//! - `Host`: explicit handles to the window, timers and animation flag.
//!
//! ## Triggers
//!
//! ```rust
//! use drape_core::*;
//!
//! let presented = signal(false);
//! let seen = std::rc::Rc::new(std::cell::Cell::new(false));
//! let sub = presented.subscribe({
//!     let seen = seen.clone();
//!     move |v| seen.set(*v)
//! });
//! presented.set(true);
//! assert!(seen.get());
//! presented.unsubscribe(sub);
//! ```
//!
//! ## Cleanups
//!
//! ```rust
//! use drape_core::*;
//!
//! let scope = Scope::new();
//! scope.run(|| {
//!     scoped_effect(|| {
//!         log::info!("mounted");
//!         Box::new(|| log::info!("unmounted"))
//!     });
//! });
//! scope.dispose();
//! ```

pub mod animation;
pub mod color;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod host;
pub mod locals;
pub mod modifier;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod semantics;
pub mod signal;
pub mod timer;
pub mod view;

pub use animation::*;
pub use color::*;
pub use effects::*;
pub use error::{Error, Result};
pub use geometry::*;
pub use host::*;
pub use locals::*;
pub use modifier::*;
pub use runtime::*;
pub use scope::*;
pub use semantics::*;
pub use signal::*;
pub use timer::*;
pub use view::*;
