//! # Host handles
//!
//! Everything drape needs from the platform is passed in explicitly through a
//! [`Host`]: the window it presents into, the timer queue the event loop
//! drives, and whether animations are currently allowed. Nothing reaches for
//! a "current window" on its own.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::Duration;

use crate::{Color, Size, TimerToken, Timers};

/// Native surface whose background an overlay can tint.
pub trait Container {
    fn background(&self) -> Color;
    fn set_background(&self, color: Color);
}

pub trait HostWindow {
    /// Current window size, read at the moment of the call.
    fn size(&self) -> Size;

    /// Smallest size the app window is allowed to shrink to.
    fn minimal_size(&self) -> Size {
        Size::new(320.0, 480.0)
    }

    /// Creates the native container backing a newly presented overlay.
    /// `None` when the host has nothing to dim.
    fn mount_overlay_container(&self) -> Option<Rc<dyn Container>>;
}

const ANIMATIONS_REENABLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub struct Host {
    pub window: Rc<dyn HostWindow>,
    pub timers: Timers,
    animations: Rc<Cell<bool>>,
    /// Pending re-enable from the latest `with_no_animation`.
    reenable: Rc<RefCell<Option<TimerToken>>>,
}

impl Host {
    pub fn new(window: Rc<dyn HostWindow>, timers: Timers) -> Self {
        Self {
            window,
            timers,
            animations: Rc::new(Cell::new(true)),
            reenable: Rc::new(RefCell::new(None)),
        }
    }

    pub fn animations_enabled(&self) -> bool {
        self.animations.get()
    }

    pub fn set_animations_enabled(&self, enabled: bool) {
        self.animations.set(enabled);
    }

    /// Runs `action` with animations off; they come back 100 ms after the
    /// latest such block ends.
    pub fn with_no_animation(&self, action: impl FnOnce()) {
        if let Some(previous) = self.reenable.borrow_mut().take() {
            previous.cancel();
        }
        self.animations.set(false);
        action();
        let flag = Rc::downgrade(&self.animations);
        let token = self
            .timers
            .schedule_after(ANIMATIONS_REENABLE_DELAY, move || {
                if let Some(flag) = flag.upgrade() {
                    flag.set(true);
                }
            });
        if let Some(previous) = self.reenable.borrow_mut().replace(token) {
            // a nested block scheduled its own re-enable while `action` ran
            previous.cancel();
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("window_size", &self.window.size())
            .field("animations", &self.animations.get())
            .finish()
    }
}
