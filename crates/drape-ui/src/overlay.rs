//! # Overlay presentation
//!
//! An [`OverlayPresenter`] owns one modal surface and walks it through
//!
//! ```text
//! Closed -> Presenting -> Open -> Dismissing -> Closed
//! ```
//!
//! driven by a trigger: a `Signal<bool>` ([`present_overlay`]) or a
//! `Signal<Option<T>>` keyed by item identity ([`present_overlay_item`]).
//!
//! Presenting snapshots the overlay size against the host window, asks the
//! window for a backing container and mounts a [`BackgroundDimmer`] on it,
//! then builds the content inside a fresh [`Scope`]. Closing disposes that
//! scope, unmounts the dimmer and calls `on_dismiss` exactly once, whichever
//! path closed it: the trigger, [`DismissHandle::dismiss`] from inside the
//! content, or the platform dismiss gesture.
//!
//! If the trigger is asserted again while the overlay is still dismissing,
//! the request is kept (only the latest value counts) and the overlay is
//! presented again as soon as the dismissal completes.
//!
//! ```rust
//! use drape_core::*;
//! use drape_ui::*;
//! use std::rc::Rc;
//! use web_time::Duration;
//!
//! struct Window;
//! impl HostWindow for Window {
//!     fn size(&self) -> Size { Size::new(1000.0, 800.0) }
//!     fn mount_overlay_container(&self) -> Option<Rc<dyn Container>> { None }
//! }
//!
//! let clock = ManualClock::new();
//! let host = Host::new(Rc::new(Window), Timers::new(Rc::new(clock.clone())));
//! let show = signal(false);
//!
//! let sheet = present_overlay(
//!     &host,
//!     &show,
//!     OverlayConfig::default(),
//!     |close| Column(Modifier::new()).child(Button("Done", { let close = close.clone(); move || close.dismiss() })),
//!     None,
//! );
//!
//! show.set(true);
//! assert_eq!(sheet.state(), OverlayState::Presenting);
//! clock.advance(Duration::from_millis(300));
//! host.timers.run_due();
//! assert_eq!(sheet.state(), OverlayState::Open);
//! assert_eq!(sheet.resolved_size(), Some(Size::new(800.0, 720.0)));
//! ```

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use drape_core::*;
use web_time::Duration;

use crate::dimmer::{BackgroundDimmer, DimmerConfig, DimmerState};
use crate::{Box, Column, Stack, ViewExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Presenting,
    Open,
    Dismissing,
}

/// How big the overlay is, resolved once when it is presented.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlaySizing {
    /// Fractions of the host window, each in `(0, 1]`.
    Ratio { width: f32, height: f32 },
    Fixed(Size),
    /// Derived from the smallest size the app window may take.
    MinimalWindow,
}

impl Default for OverlaySizing {
    fn default() -> Self {
        OverlaySizing::Ratio {
            width: 0.8,
            height: 0.9,
        }
    }
}

fn check_ratio(axis: &'static str, value: f32) -> Result<f32> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(Error::RatioOutOfRange { axis, value })
    }
}

impl OverlaySizing {
    pub fn ratio(width: f32, height: f32) -> Result<Self> {
        Ok(OverlaySizing::Ratio {
            width: check_ratio("width", width)?,
            height: check_ratio("height", height)?,
        })
    }

    /// Width fraction with the default height.
    pub fn width_ratio(width: f32) -> Result<Self> {
        Self::ratio(width, 0.9)
    }

    pub fn fixed(width: f32, height: f32) -> Result<Self> {
        for (what, value) in [("width", width), ("height", height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::NonPositive { what, value });
            }
        }
        Ok(OverlaySizing::Fixed(Size::new(width, height)))
    }

    pub fn resolve(&self, window: &dyn HostWindow) -> Size {
        match *self {
            OverlaySizing::Ratio { width, height } => {
                let w = clamp_ratio("width", width);
                let h = clamp_ratio("height", height);
                window.size().scaled(w, h)
            }
            OverlaySizing::Fixed(size) => size,
            OverlaySizing::MinimalWindow => {
                let min = window.minimal_size();
                Size::new(min.width * 0.9, (min.height - 100.0).max(0.0))
            }
        }
    }
}

fn clamp_ratio(axis: &str, value: f32) -> f32 {
    if value > 0.0 && value <= 1.0 {
        return value;
    }
    let clamped = if value.is_nan() { 1.0 } else { value.clamp(f32::EPSILON, 1.0) };
    log::warn!("overlay {axis} ratio {value} out of range, using {clamped}");
    clamped
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayConfig {
    pub sizing: OverlaySizing,
    pub dimmer: DimmerConfig,
    /// Length of the enter and exit transitions. Zero switches synchronously.
    pub transition: Duration,
    pub corner_radius: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            sizing: OverlaySizing::default(),
            dimmer: DimmerConfig::default(),
            transition: Duration::from_millis(300),
            corner_radius: 10.0,
        }
    }
}

impl OverlayConfig {
    /// Fixed 300 pt card on a translucent backdrop.
    pub fn custom_alert() -> Self {
        Self {
            sizing: OverlaySizing::Fixed(Size::new(300.0, 300.0)),
            ..Self::default()
        }
    }

    pub fn sizing(mut self, sizing: OverlaySizing) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    pub fn dimmer(mut self, dimmer: DimmerConfig) -> Self {
        self.dimmer = dimmer;
        self
    }
}

/// Item with a stable identity. Changing identity while presented replaces
/// the overlay; same identity just refreshes its content.
pub trait Identifiable {
    type Id: PartialEq + Debug;
    fn id(&self) -> Self::Id;
}

impl Identifiable for () {
    type Id = ();
    fn id(&self) {}
}

/// Lets content close the overlay it is shown in.
#[derive(Clone)]
pub struct DismissHandle {
    dismiss: Rc<dyn Fn()>,
}

impl DismissHandle {
    pub fn dismiss(&self) {
        (self.dismiss)()
    }
}

impl Debug for DismissHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DismissHandle")
    }
}

type ContentBuilder<T> = dyn Fn(&T, &DismissHandle) -> View;

struct Core<T> {
    state: OverlayState,
    /// Bumped on every transition; stale timer callbacks compare against it.
    epoch: u64,
    /// Bumped once per presentation; dismiss handles are tied to one.
    presentation: u64,
    item: Option<T>,
    /// Latest trigger value, applied once a running dismissal completes.
    desired: Option<T>,
    size: Option<Size>,
    view: Option<View>,
    dimmer: Option<BackgroundDimmer>,
    /// Scope of the latest content build, replaced on refresh.
    scope: Option<Scope>,
    transition: Option<TimerToken>,
}

struct PresenterInner<T> {
    host: Host,
    config: OverlayConfig,
    content: Box<ContentBuilder<T>>,
    on_dismiss: Option<Callback>,
    clear_trigger: RefCell<Option<Callback>>,
    core: RefCell<Core<T>>,
}

enum Next<T> {
    Present(T),
    Refresh(T),
    Dismiss,
    Nothing,
}

/// Cloneable handle; clones drive the same overlay.
pub struct OverlayPresenter<T: Identifiable + Clone + 'static> {
    inner: Rc<PresenterInner<T>>,
}

impl<T: Identifiable + Clone + 'static> Clone for OverlayPresenter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Identifiable + Clone + 'static> OverlayPresenter<T> {
    pub fn new(
        host: &Host,
        config: OverlayConfig,
        content: impl Fn(&T, &DismissHandle) -> View + 'static,
        on_dismiss: Option<Callback>,
    ) -> Self {
        Self {
            inner: Rc::new(PresenterInner {
                host: host.clone(),
                config,
                content: std::boxed::Box::new(content),
                on_dismiss,
                clear_trigger: RefCell::new(None),
                core: RefCell::new(Core {
                    state: OverlayState::Closed,
                    epoch: 0,
                    presentation: 0,
                    item: None,
                    desired: None,
                    size: None,
                    view: None,
                    dimmer: None,
                    scope: None,
                    transition: None,
                }),
            }),
        }
    }

    fn downgrade(&self) -> Weak<PresenterInner<T>> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<PresenterInner<T>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// How internal closes write back to the caller's trigger.
    pub fn set_clear_trigger(&self, clear: impl Fn() + 'static) {
        *self.inner.clear_trigger.borrow_mut() = Some(Rc::new(clear));
    }

    /// Applies the trigger's current value.
    pub fn sync(&self, desired: Option<T>) {
        let next = {
            let mut core = self.inner.core.borrow_mut();
            core.desired = desired.clone();
            match (core.state, desired) {
                (OverlayState::Closed, Some(item)) => Next::Present(item),
                (OverlayState::Closed, None) | (OverlayState::Dismissing, _) => Next::Nothing,
                (OverlayState::Presenting | OverlayState::Open, None) => Next::Dismiss,
                (OverlayState::Presenting | OverlayState::Open, Some(item)) => {
                    let same = core.item.as_ref().is_some_and(|cur| cur.id() == item.id());
                    if same { Next::Refresh(item) } else { Next::Dismiss }
                }
            }
        };
        match next {
            Next::Present(item) => self.present(item),
            Next::Refresh(item) => self.refresh(item),
            Next::Dismiss => {
                self.begin_dismiss();
            }
            Next::Nothing => {}
        }
    }

    /// Closes the overlay and clears the trigger. No-op unless presented.
    pub fn dismiss(&self) {
        {
            let mut core = self.inner.core.borrow_mut();
            if !matches!(core.state, OverlayState::Presenting | OverlayState::Open) {
                return;
            }
            core.desired = None;
        }
        let clear = self.inner.clear_trigger.borrow().clone();
        if let Some(clear) = clear {
            // a bound trigger syncs back into begin_dismiss
            clear();
        }
        self.begin_dismiss();
    }

    /// The platform's dismiss gesture (swipe down, escape).
    pub fn dismiss_by_gesture(&self) {
        log::debug!("overlay dismissed by gesture");
        self.dismiss();
    }

    /// Closes immediately, skipping the exit transition. Used when the
    /// owning view goes away.
    pub fn teardown(&self) {
        let epoch = {
            let mut core = self.inner.core.borrow_mut();
            core.desired = None;
            if core.state == OverlayState::Closed {
                return;
            }
            if let Some(t) = core.transition.take() {
                t.cancel();
            }
            core.state = OverlayState::Dismissing;
            core.epoch += 1;
            core.epoch
        };
        self.finish_dismissing(epoch);
    }

    pub fn state(&self) -> OverlayState {
        self.inner.core.borrow().state
    }

    pub fn item(&self) -> Option<T> {
        self.inner.core.borrow().item.clone()
    }

    pub fn resolved_size(&self) -> Option<Size> {
        self.inner.core.borrow().size
    }

    pub fn dimmer_state(&self) -> Option<DimmerState> {
        self.inner
            .core
            .borrow()
            .dimmer
            .as_ref()
            .and_then(|d| d.state())
    }

    /// The overlay's framed content while it is on screen.
    pub fn content(&self) -> Option<View> {
        self.inner.core.borrow().view.clone()
    }

    /// `base` with the overlay stacked on top when presented.
    pub fn render(&self, base: View) -> View {
        match self.content() {
            Some(overlay) => Stack(Modifier::new().fill_max_size()).child((base, overlay)),
            None => base,
        }
    }

    fn animated(&self) -> bool {
        !self.inner.config.transition.is_zero() && self.inner.host.animations_enabled()
    }

    fn handle(&self, presentation: u64) -> DismissHandle {
        let weak = self.downgrade();
        DismissHandle {
            dismiss: Rc::new(move || {
                let Some(p) = Self::upgrade(&weak) else { return };
                if p.inner.core.borrow().presentation != presentation {
                    log::debug!("dismiss from presentation {presentation} ignored");
                    return;
                }
                p.dismiss();
            }),
        }
    }

    fn build(&self, scope: &Scope, presentation: u64, item: &T, size: Size) -> View {
        let handle = self.handle(presentation);
        let body = scope.run(|| (self.inner.content)(item, &handle));
        Box(Modifier::new()
            .size(size.width, size.height)
            .clip_rounded(self.inner.config.corner_radius))
        .identifier("overlay")
        .child(body)
    }

    fn present(&self, item: T) {
        let host = &self.inner.host;
        let size = self.inner.config.sizing.resolve(&*host.window);
        let container = host.window.mount_overlay_container();
        let dimmer = BackgroundDimmer::mount(container, host, self.inner.config.dimmer);
        let presentation = {
            let mut core = self.inner.core.borrow_mut();
            core.presentation += 1;
            core.presentation
        };
        let scope = Scope::new();
        let view = self.build(&scope, presentation, &item, size);

        let epoch = {
            let mut core = self.inner.core.borrow_mut();
            core.state = OverlayState::Presenting;
            core.epoch += 1;
            core.item = Some(item);
            core.size = Some(size);
            core.view = Some(view);
            core.dimmer = Some(dimmer);
            core.scope = Some(scope);
            core.epoch
        };
        log::debug!("overlay presenting at {}x{}", size.width, size.height);

        if self.animated() {
            let weak = self.downgrade();
            let token = host
                .timers
                .schedule_after(self.inner.config.transition, move || {
                    if let Some(p) = Self::upgrade(&weak) {
                        p.finish_presenting(epoch);
                    }
                });
            self.inner.core.borrow_mut().transition = Some(token);
        } else {
            self.finish_presenting(epoch);
        }
    }

    fn finish_presenting(&self, epoch: u64) {
        let mut core = self.inner.core.borrow_mut();
        if core.state != OverlayState::Presenting || core.epoch != epoch {
            return;
        }
        core.state = OverlayState::Open;
        core.transition = None;
        log::debug!("overlay open");
    }

    /// Rebuilds the content for the same item. Whatever the previous build
    /// registered is disposed first.
    fn refresh(&self, item: T) {
        let (old, size, presentation) = {
            let mut core = self.inner.core.borrow_mut();
            let Some(size) = core.size else { return };
            (core.scope.take(), size, core.presentation)
        };
        if let Some(old) = old {
            old.dispose();
        }
        let scope = Scope::new();
        let view = self.build(&scope, presentation, &item, size);
        let mut core = self.inner.core.borrow_mut();
        core.item = Some(item);
        core.view = Some(view);
        core.scope = Some(scope);
    }

    fn begin_dismiss(&self) -> bool {
        let (epoch, pending) = {
            let mut core = self.inner.core.borrow_mut();
            if !matches!(core.state, OverlayState::Presenting | OverlayState::Open) {
                return false;
            }
            core.state = OverlayState::Dismissing;
            core.epoch += 1;
            (core.epoch, core.transition.take())
        };
        if let Some(t) = pending {
            t.cancel();
        }
        log::debug!("overlay dismissing");

        if self.animated() {
            let weak = self.downgrade();
            let token = self
                .inner
                .host
                .timers
                .schedule_after(self.inner.config.transition, move || {
                    if let Some(p) = Self::upgrade(&weak) {
                        p.finish_dismissing(epoch);
                    }
                });
            self.inner.core.borrow_mut().transition = Some(token);
        } else {
            self.finish_dismissing(epoch);
        }
        true
    }

    fn finish_dismissing(&self, epoch: u64) {
        let (dimmer, scope) = {
            let mut core = self.inner.core.borrow_mut();
            if core.state != OverlayState::Dismissing || core.epoch != epoch {
                return;
            }
            core.state = OverlayState::Closed;
            core.epoch += 1;
            core.item = None;
            core.size = None;
            core.view = None;
            core.transition = None;
            (core.dimmer.take(), core.scope.take())
        };
        if let Some(dimmer) = dimmer {
            dimmer.unmount();
        }
        if let Some(scope) = scope {
            scope.dispose();
        }
        log::debug!("overlay closed");

        if let Some(on_dismiss) = &self.inner.on_dismiss {
            on_dismiss();
        }

        // on_dismiss may already have presented again
        let queued = {
            let core = self.inner.core.borrow();
            if core.state == OverlayState::Closed {
                core.desired.clone()
            } else {
                None
            }
        };
        if let Some(item) = queued {
            log::debug!("presenting queued overlay {:?}", item.id());
            self.present(item);
        }
    }
}

impl<T: Identifiable + Clone + 'static> Debug for OverlayPresenter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.inner.core.borrow();
        f.debug_struct("OverlayPresenter")
            .field("state", &core.state)
            .field("item", &core.item.as_ref().map(|i| i.id()))
            .field("size", &core.size)
            .finish()
    }
}

/// Keeps a presenter subscribed to its trigger. Dropping it unsubscribes and
/// tears the overlay down.
pub struct OverlayBinding<T: Identifiable + Clone + 'static> {
    presenter: OverlayPresenter<T>,
    subscription: Dispose,
}

impl<T: Identifiable + Clone + 'static> OverlayBinding<T> {
    pub fn presenter(&self) -> &OverlayPresenter<T> {
        &self.presenter
    }

    pub fn state(&self) -> OverlayState {
        self.presenter.state()
    }

    pub fn resolved_size(&self) -> Option<Size> {
        self.presenter.resolved_size()
    }

    pub fn render(&self, base: View) -> View {
        self.presenter.render(base)
    }
}

impl<T: Identifiable + Clone + 'static> Drop for OverlayBinding<T> {
    fn drop(&mut self) {
        self.subscription.run();
        self.presenter.teardown();
    }
}

impl<T: Identifiable + Clone + 'static> Debug for OverlayBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OverlayBinding").field(&self.presenter).finish()
    }
}

/// Presents `content` while `trigger` is true.
pub fn present_overlay(
    host: &Host,
    trigger: &Signal<bool>,
    config: OverlayConfig,
    content: impl Fn(&DismissHandle) -> View + 'static,
    on_dismiss: Option<Callback>,
) -> OverlayBinding<()> {
    let presenter =
        OverlayPresenter::<()>::new(host, config, move |_: &(), close| content(close), on_dismiss);
    presenter.set_clear_trigger({
        let trigger = trigger.clone();
        move || trigger.set(false)
    });
    let weak = presenter.downgrade();
    let id = trigger.subscribe(move |shown| {
        if let Some(p) = OverlayPresenter::upgrade(&weak) {
            p.sync(shown.then_some(()));
        }
    });
    let subscription = {
        let trigger = trigger.clone();
        Dispose::new(move || trigger.unsubscribe(id))
    };
    presenter.sync(trigger.get().then_some(()));
    OverlayBinding {
        presenter,
        subscription,
    }
}

/// Presents `content` for the item in `item`; clearing the item dismisses.
pub fn present_overlay_item<T: Identifiable + Clone + 'static>(
    host: &Host,
    item: &Signal<Option<T>>,
    config: OverlayConfig,
    content: impl Fn(&T, &DismissHandle) -> View + 'static,
    on_dismiss: Option<Callback>,
) -> OverlayBinding<T> {
    let presenter = OverlayPresenter::new(host, config, content, on_dismiss);
    presenter.set_clear_trigger({
        let item = item.clone();
        move || item.set(None)
    });
    let weak = presenter.downgrade();
    let id = item.subscribe(move |current| {
        if let Some(p) = OverlayPresenter::upgrade(&weak) {
            p.sync(current.clone());
        }
    });
    let subscription = {
        let item = item.clone();
        Dispose::new(move || item.unsubscribe(id))
    };
    presenter.sync(item.get());
    OverlayBinding {
        presenter,
        subscription,
    }
}

/// A fixed-width card on the thick material, for hand-built alerts.
pub fn custom_alert(
    host: &Host,
    trigger: &Signal<bool>,
    content: impl Fn(&DismissHandle) -> View + 'static,
) -> OverlayBinding<()> {
    present_overlay(
        host,
        trigger,
        OverlayConfig::custom_alert(),
        move |close| {
            Column(
                Modifier::new()
                    .padding(16.0)
                    .min_height(300.0)
                    .background(theme().thick_material),
            )
            .child(content(close))
        },
        None,
    )
}
