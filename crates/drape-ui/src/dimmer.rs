//! Scrim fade behind a presented overlay.
//!
//! Mounting writes a faint baseline tint to the overlay's container right
//! away, then after a short delay fades it to the full scrim. Every scheduled
//! step goes through the host's [`Timers`] and holds only a weak handle to the
//! dimmer, so after [`BackgroundDimmer::unmount`] nothing touches the
//! container again: the pending timer is cancelled, and a callback that
//! already fired finds the dimmer dead and returns.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use drape_core::*;
use web_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimmerConfig {
    pub scrim: Color,
    pub baseline_opacity: f32,
    pub target_opacity: f32,
    /// Time between mount and the start of the fade.
    pub settle_delay: Duration,
    pub fade_duration: Duration,
    pub easing: Easing,
    pub frame_interval: Duration,
}

impl Default for DimmerConfig {
    fn default() -> Self {
        Self {
            scrim: Color::BLACK,
            baseline_opacity: 0.05,
            target_opacity: 0.2,
            settle_delay: Duration::from_millis(250),
            fade_duration: Duration::from_millis(250),
            easing: Easing::EaseInOut,
            frame_interval: Duration::from_millis(16),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DimmerPhase {
    Mounted,
    Settling,
    Settled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimmerState {
    pub phase: DimmerPhase,
    pub target_alpha: f32,
    pub current_alpha: f32,
}

struct DimmerInner {
    container: Rc<dyn Container>,
    host: Host,
    config: DimmerConfig,
    state: DimmerState,
    fade: AnimatedValue<f32>,
    fade_start: Instant,
    pending: Option<TimerToken>,
    live: bool,
}

/// One scrim per presented overlay. A dimmer mounted without a container
/// does nothing.
pub struct BackgroundDimmer {
    inner: Option<Rc<RefCell<DimmerInner>>>,
}

impl BackgroundDimmer {
    pub fn mount(
        container: Option<Rc<dyn Container>>,
        host: &Host,
        config: DimmerConfig,
    ) -> BackgroundDimmer {
        let Some(container) = container else {
            log::debug!("dimmer: no container to dim");
            return BackgroundDimmer { inner: None };
        };

        // baseline first, synchronously, so the container never shows clear
        container.set_background(config.scrim.with_opacity(config.baseline_opacity));

        let now = host.timers.now();
        let spec = AnimationSpec::tween(config.fade_duration, config.easing);
        let inner = Rc::new(RefCell::new(DimmerInner {
            container,
            host: host.clone(),
            config,
            state: DimmerState {
                phase: DimmerPhase::Mounted,
                target_alpha: config.target_opacity,
                current_alpha: config.baseline_opacity,
            },
            fade: AnimatedValue::new(config.baseline_opacity, spec),
            fade_start: now + config.settle_delay,
            pending: None,
            live: true,
        }));

        let weak = Rc::downgrade(&inner);
        let token = host
            .timers
            .schedule_after(config.settle_delay, move || settle(&weak));
        inner.borrow_mut().pending = Some(token);
        log::debug!("dimmer mounted, settling in {:?}", config.settle_delay);

        BackgroundDimmer { inner: Some(inner) }
    }

    /// Cancels anything still scheduled. The container is left as it is.
    pub fn unmount(&self) {
        let Some(inner) = &self.inner else {
            return;
        };
        let token = {
            let mut d = inner.borrow_mut();
            if !d.live {
                return;
            }
            d.live = false;
            d.pending.take()
        };
        if let Some(token) = token {
            token.cancel();
        }
        log::debug!("dimmer unmounted");
    }

    pub fn state(&self) -> Option<DimmerState> {
        self.inner.as_ref().map(|d| d.borrow().state)
    }

    pub fn is_live(&self) -> bool {
        self.inner.as_ref().is_some_and(|d| d.borrow().live)
    }
}

impl Drop for BackgroundDimmer {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for BackgroundDimmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundDimmer")
            .field("state", &self.state())
            .field("live", &self.is_live())
            .finish()
    }
}

fn settle(weak: &Weak<RefCell<DimmerInner>>) {
    let Some(inner) = weak.upgrade() else { return };
    {
        let mut d = inner.borrow_mut();
        if !d.live {
            return;
        }
        d.pending = None;
        let target = d.config.target_opacity;
        if d.host.animations_enabled() {
            let start = d.fade_start;
            d.fade.set_target(target, start);
            d.state.phase = DimmerPhase::Settling;
        } else {
            d.fade.snap_to(target);
        }
    }
    step(&inner);
}

/// Samples the fade, writes it out and schedules the next frame if needed.
fn step(inner: &Rc<RefCell<DimmerInner>>) {
    let (container, color, running, host, frame) = {
        let mut d = inner.borrow_mut();
        let now = d.host.timers.now();
        let running = d.fade.update(now);
        let alpha = *d.fade.get();
        d.state.current_alpha = alpha;
        if !running {
            d.state.phase = DimmerPhase::Settled;
        }
        (
            d.container.clone(),
            d.config.scrim.with_opacity(alpha),
            running,
            d.host.clone(),
            d.config.frame_interval,
        )
    };

    container.set_background(color);

    if running {
        let weak = Rc::downgrade(inner);
        let token = host.timers.schedule_after(frame, move || {
            let Some(inner) = weak.upgrade() else { return };
            if !inner.borrow().live {
                return;
            }
            step(&inner);
        });
        inner.borrow_mut().pending = Some(token);
    } else {
        log::debug!("dimmer settled at {:.2}", color.opacity());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Recorder {
        color: Cell<Color>,
        writes: RefCell<Vec<(Duration, Color)>>,
        clock: ManualClock,
        t0: Instant,
    }

    impl Container for Recorder {
        fn background(&self) -> Color {
            self.color.get()
        }
        fn set_background(&self, color: Color) {
            self.color.set(color);
            self.writes
                .borrow_mut()
                .push((self.clock.now() - self.t0, color));
        }
    }

    struct NoWindow;
    impl HostWindow for NoWindow {
        fn size(&self) -> Size {
            Size::new(800.0, 600.0)
        }
        fn mount_overlay_container(&self) -> Option<Rc<dyn Container>> {
            None
        }
    }

    fn setup() -> (ManualClock, Host, Rc<Recorder>) {
        let clock = ManualClock::new();
        let timers = Timers::new(Rc::new(clock.clone()));
        let host = Host::new(Rc::new(NoWindow), timers);
        let rec = Rc::new(Recorder {
            color: Cell::new(Color::TRANSPARENT),
            writes: RefCell::new(Vec::new()),
            t0: clock.now(),
            clock: clock.clone(),
        });
        (clock, host, rec)
    }

    fn dims(rec: &Rc<Recorder>) -> Option<Rc<dyn Container>> {
        let c: Rc<dyn Container> = rec.clone();
        Some(c)
    }

    fn pump(clock: &ManualClock, host: &Host, total: Duration) {
        let step = Duration::from_millis(4);
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            clock.advance(step);
            elapsed += step;
            host.timers.run_due();
        }
    }

    #[test]
    fn baseline_is_written_during_mount() {
        let (_clock, host, rec) = setup();
        let dimmer = BackgroundDimmer::mount(dims(&rec), &host, DimmerConfig::default());
        assert_eq!(rec.background(), Color::BLACK.with_opacity(0.05));
        assert_eq!(rec.writes.borrow()[0].0, Duration::ZERO);
        assert_eq!(dimmer.state().map(|s| s.phase), Some(DimmerPhase::Mounted));
    }

    #[test]
    fn reaches_target_by_half_a_second() {
        let (clock, host, rec) = setup();
        let dimmer = BackgroundDimmer::mount(dims(&rec), &host, DimmerConfig::default());

        pump(&clock, &host, Duration::from_millis(240));
        assert_eq!(rec.writes.borrow().len(), 1, "nothing before the settle delay");

        pump(&clock, &host, Duration::from_millis(380));
        assert_eq!(rec.background(), Color::BLACK.with_opacity(0.2));
        let state = dimmer.state().expect("mounted with a container");
        assert_eq!(state.phase, DimmerPhase::Settled);
        assert_eq!(state.current_alpha, 0.2);

        let writes = rec.writes.borrow();
        let (settled_at, last) = *writes.last().expect("target written");
        assert_eq!(last, Color::BLACK.with_opacity(0.2));
        assert!(settled_at >= Duration::from_millis(500));
        assert!(settled_at <= Duration::from_millis(520));
        // monotonic fade
        assert!(writes.windows(2).all(|w| w[0].1.3 <= w[1].1.3));
        assert_eq!(host.timers.pending(), 0);
    }

    #[test]
    fn late_first_run_still_ends_on_time() {
        let (clock, host, rec) = setup();
        let dimmer = BackgroundDimmer::mount(dims(&rec), &host, DimmerConfig::default());
        clock.advance(Duration::from_millis(500));
        host.timers.run_due();
        assert_eq!(rec.background(), Color::BLACK.with_opacity(0.2));
        assert_eq!(dimmer.state().map(|s| s.phase), Some(DimmerPhase::Settled));
    }

    #[test]
    fn unmount_before_settle_stops_all_writes() {
        let (clock, host, rec) = setup();
        let dimmer = BackgroundDimmer::mount(dims(&rec), &host, DimmerConfig::default());
        pump(&clock, &host, Duration::from_millis(100));
        dimmer.unmount();
        assert_eq!(host.timers.pending(), 0);
        pump(&clock, &host, Duration::from_millis(900));
        assert_eq!(rec.writes.borrow().len(), 1);
        assert!(!dimmer.is_live());
    }

    #[test]
    fn unmount_mid_fade_stops_all_writes() {
        let (clock, host, rec) = setup();
        let dimmer = BackgroundDimmer::mount(dims(&rec), &host, DimmerConfig::default());
        pump(&clock, &host, Duration::from_millis(320));
        assert_eq!(dimmer.state().map(|s| s.phase), Some(DimmerPhase::Settling));
        let before = rec.writes.borrow().len();
        drop(dimmer);
        pump(&clock, &host, Duration::from_millis(500));
        assert_eq!(rec.writes.borrow().len(), before);
    }

    #[test]
    fn snaps_when_animations_are_off() {
        let (clock, host, rec) = setup();
        let _dimmer = BackgroundDimmer::mount(dims(&rec), &host, DimmerConfig::default());
        host.set_animations_enabled(false);
        pump(&clock, &host, Duration::from_millis(252));
        assert_eq!(rec.background(), Color::BLACK.with_opacity(0.2));
        assert_eq!(rec.writes.borrow().len(), 2);
    }

    #[test]
    fn missing_container_is_a_noop() {
        let (clock, host, _rec) = setup();
        let dimmer = BackgroundDimmer::mount(None, &host, DimmerConfig::default());
        assert!(dimmer.state().is_none());
        assert_eq!(host.timers.pending(), 0);
        pump(&clock, &host, Duration::from_millis(600));
        dimmer.unmount();
    }
}
