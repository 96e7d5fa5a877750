//! Scroll offset propagation
//!
//! A render pass reports where each tracked scroll area's content sits inside
//! its named coordinate space; observers of that space get the latest value
//! once the pass ends.
//!
//! - [`ScrollOffsetChannel::emit`] may be called any number of times per
//!   pass. Values for the same space overwrite each other (last wins).
//! - [`ScrollOffsetChannel::flush`] ends the pass and calls every observer
//!   whose space received a value different from the one it saw last.
//!
//! Two tracked areas must use different space names. Areas that share a name
//! overwrite each other's offset; [`report_scroll_offsets`] logs a warning
//! when it sees that happen but does not try to resolve it.
//!
//! ```rust
//! use drape_core::*;
//! use drape_ui::scroll::*;
//! use drape_ui::*;
//!
//! let channel = ScrollOffsetChannel::new();
//! let header_shift = signal(0.0f32);
//! let _tracking = channel.track("feed", {
//!     let header_shift = header_shift.clone();
//!     move |origin| header_shift.set(origin.y)
//! });
//!
//! let state = std::rc::Rc::new(ScrollState::new());
//! state.set_viewport(320.0, 480.0);
//! state.set_content(320.0, 2000.0);
//! state.set_offset(0.0, 120.0);
//!
//! let root = TrackedScrollArea(Modifier::new(), "feed", state, Column(Modifier::new()));
//! report_scroll_offsets(&root, &channel);
//! channel.flush();
//! assert_eq!(header_shift.get(), -120.0);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use drape_core::*;
use slotmap::{SlotMap, new_key_type};

/// Name of a reference frame scroll offsets are measured against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinateSpace(String);

impl CoordinateSpace {
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CoordinateSpace {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for CoordinateSpace {
    fn from(name: String) -> Self {
        Self(name)
    }
}

new_key_type! {
    struct ObserverKey;
}

struct Observer {
    space: CoordinateSpace,
    callback: Rc<dyn Fn(Vec2)>,
    last: Option<Vec2>,
}

#[derive(Default)]
struct ChannelInner {
    observers: SlotMap<ObserverKey, Observer>,
    pending: HashMap<CoordinateSpace, Vec2>,
}

/// Latest-value channel from the render pass to scroll observers.
#[derive(Clone, Default)]
pub struct ScrollOffsetChannel {
    inner: Rc<RefCell<ChannelInner>>,
}

impl ScrollOffsetChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for offsets in `space`. Running the returned
    /// `Dispose` stops delivery.
    pub fn track(
        &self,
        space: impl Into<CoordinateSpace>,
        callback: impl Fn(Vec2) + 'static,
    ) -> Dispose {
        let space = space.into();
        log::debug!("tracking scroll offset in {:?}", space.name());
        let key = self.inner.borrow_mut().observers.insert(Observer {
            space,
            callback: Rc::new(callback),
            last: None,
        });
        let inner = Rc::downgrade(&self.inner);
        Dispose::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.borrow_mut().observers.remove(key);
            }
        })
    }

    /// Records the offset for `space` in the current pass.
    pub fn emit(&self, space: impl Into<CoordinateSpace>, offset: Vec2) {
        self.inner.borrow_mut().pending.insert(space.into(), offset);
    }

    /// Ends the pass. Returns how many observers were called.
    pub fn flush(&self) -> usize {
        let due: Vec<(Rc<dyn Fn(Vec2)>, Vec2)> = {
            let mut inner = self.inner.borrow_mut();
            let pending = std::mem::take(&mut inner.pending);
            inner
                .observers
                .values_mut()
                .filter_map(|o| {
                    let offset = *pending.get(&o.space)?;
                    if o.last == Some(offset) {
                        return None;
                    }
                    o.last = Some(offset);
                    Some((o.callback.clone(), offset))
                })
                .collect()
        };
        // observers may emit or track again
        for (callback, offset) in &due {
            callback(*offset);
        }
        due.len()
    }

    /// Value waiting for the next flush, if any.
    pub fn pending(&self, space: &str) -> Option<Vec2> {
        self.inner
            .borrow()
            .pending
            .get(&CoordinateSpace::named(space))
            .copied()
    }

    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

impl std::fmt::Debug for ScrollOffsetChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ScrollOffsetChannel")
            .field("observers", &inner.observers.len())
            .field("pending", &inner.pending)
            .finish()
    }
}

/// Tracks `space` on `channel`. Inside a scope the tracking ends when the
/// scope is disposed.
pub fn track_scroll_offset(
    channel: &ScrollOffsetChannel,
    space: impl Into<CoordinateSpace>,
    callback: impl Fn(Vec2) + 'static,
) -> Dispose {
    let channel = channel.clone();
    let space = space.into();
    effect(move || channel.track(space, callback))
}

/// Remembered channel shared by everything composed under `key`.
pub fn remember_scroll_channel(key: impl Into<String>) -> Rc<ScrollOffsetChannel> {
    remember_with_key(key, ScrollOffsetChannel::new)
}

/// Clamped 2D scroll offset.
pub struct ScrollState {
    off_x: Signal<f32>,
    off_y: Signal<f32>,
    vp_w: Signal<f32>,
    vp_h: Signal<f32>,
    c_w: Signal<f32>,
    c_h: Signal<f32>,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            off_x: signal(0.0),
            off_y: signal(0.0),
            vp_w: signal(0.0),
            vp_h: signal(0.0),
            c_w: signal(0.0),
            c_h: signal(0.0),
        }
    }

    pub fn set_viewport(&self, w: f32, h: f32) {
        self.vp_w.set(w.max(0.0));
        self.vp_h.set(h.max(0.0));
        self.clamp();
    }

    pub fn set_content(&self, w: f32, h: f32) {
        self.c_w.set(w.max(0.0));
        self.c_h.set(h.max(0.0));
        self.clamp();
    }

    pub fn max_offset(&self) -> Vec2 {
        Vec2::new(
            (self.c_w.get() - self.vp_w.get()).max(0.0),
            (self.c_h.get() - self.vp_h.get()).max(0.0),
        )
    }

    pub fn set_offset(&self, x: f32, y: f32) {
        let max = self.max_offset();
        self.off_x.set(x.clamp(0.0, max.x));
        self.off_y.set(y.clamp(0.0, max.y));
    }

    pub fn get(&self) -> Vec2 {
        Vec2::new(self.off_x.get(), self.off_y.get())
    }

    /// Applies `d` and returns the part that could not be consumed.
    pub fn scroll_by(&self, d: Vec2) -> Vec2 {
        let before = self.get();
        self.set_offset(before.x + d.x, before.y + d.y);
        let after = self.get();
        Vec2::new(d.x - (after.x - before.x), d.y - (after.y - before.y))
    }

    fn clamp(&self) {
        let max = self.max_offset();
        self.off_x.update(|x| *x = x.clamp(0.0, max.x));
        self.off_y.update(|y| *y = y.clamp(0.0, max.y));
    }
}

pub fn remember_scroll_state(key: impl Into<String>) -> Rc<ScrollState> {
    remember_with_key(key, ScrollState::new)
}

/// Scroll container whose offset is reported in `space` during each pass.
pub fn TrackedScrollArea(
    modifier: Modifier,
    space: impl Into<CoordinateSpace>,
    state: Rc<ScrollState>,
    content: View,
) -> View {
    let space = space.into();
    let get_scroll = Rc::new(move || state.get());
    View::new(
        0,
        ViewKind::Scroll {
            space: space.0,
            get_scroll_offset: Some(get_scroll),
        },
    )
    .modifier(modifier)
    .with_children(vec![content])
}

/// Emits the content origin of every tracked scroll area under `root`.
/// Returns how many areas reported.
pub fn report_scroll_offsets(root: &View, channel: &ScrollOffsetChannel) -> usize {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    walk(root, channel, &mut seen);
    for (space, count) in &seen {
        if *count > 1 {
            log::warn!("{count} scroll areas share coordinate space {space:?}; offsets collide");
        }
    }
    seen.values().sum()
}

fn walk<'a>(view: &'a View, channel: &ScrollOffsetChannel, seen: &mut HashMap<&'a str, usize>) {
    if let ViewKind::Scroll {
        space,
        get_scroll_offset: Some(get),
    } = &view.kind
    {
        // content origin moves up as the area scrolls down
        channel.emit(space.as_str(), -get());
        *seen.entry(space.as_str()).or_default() += 1;
    }
    for child in &view.children {
        walk(child, channel, seen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, Text, ViewExt};
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<Vec2>>>, impl Fn(Vec2) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        (log, move |v: Vec2| l.borrow_mut().push(v))
    }

    #[test]
    fn last_value_in_pass_wins() {
        let channel = ScrollOffsetChannel::new();
        let (log, cb) = recorder();
        let _d = channel.track("list", cb);
        for y in [0.0, 12.0, 12.0, 40.0] {
            channel.emit("list", Vec2::new(0.0, y));
        }
        assert_eq!(channel.flush(), 1);
        assert_eq!(*log.borrow(), vec![Vec2::new(0.0, 40.0)]);
    }

    #[test]
    fn unchanged_value_is_not_redelivered() {
        let channel = ScrollOffsetChannel::new();
        let (log, cb) = recorder();
        let _d = channel.track("list", cb);
        channel.emit("list", Vec2::new(0.0, 5.0));
        channel.flush();
        channel.emit("list", Vec2::new(0.0, 5.0));
        assert_eq!(channel.flush(), 0);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn spaces_are_independent() {
        let channel = ScrollOffsetChannel::new();
        let (outer, cb_outer) = recorder();
        let (inner, cb_inner) = recorder();
        let _a = channel.track("outer", cb_outer);
        let _b = channel.track("inner", cb_inner);
        channel.emit("inner", Vec2::new(3.0, 0.0));
        channel.flush();
        assert!(outer.borrow().is_empty());
        assert_eq!(*inner.borrow(), vec![Vec2::new(3.0, 0.0)]);
    }

    #[test]
    fn dispose_stops_delivery() {
        let channel = ScrollOffsetChannel::new();
        let (log, cb) = recorder();
        let d = channel.track("list", cb);
        d.run();
        channel.emit("list", Vec2::new(0.0, 1.0));
        assert_eq!(channel.flush(), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(channel.observer_count(), 0);
    }

    #[test]
    fn scoped_tracking_ends_with_scope() {
        let channel = ScrollOffsetChannel::new();
        let scope = Scope::new();
        let (_log, cb) = recorder();
        scope.run(|| {
            track_scroll_offset(&channel, "list", cb);
        });
        assert_eq!(channel.observer_count(), 1);
        scope.dispose();
        assert_eq!(channel.observer_count(), 0);
    }

    #[test]
    fn scroll_state_clamps() {
        let st = ScrollState::new();
        st.set_viewport(100.0, 100.0);
        st.set_content(100.0, 250.0);
        let leftover = st.scroll_by(Vec2::new(10.0, 400.0));
        assert_eq!(st.get(), Vec2::new(0.0, 150.0));
        assert_eq!(leftover, Vec2::new(10.0, 250.0));
        st.set_content(100.0, 120.0);
        assert_eq!(st.get(), Vec2::new(0.0, 20.0));
    }

    #[test]
    fn render_pass_reports_negated_offsets() {
        let channel = ScrollOffsetChannel::new();
        let (log, cb) = recorder();
        let _d = channel.track("page", cb);
        let st = Rc::new(ScrollState::new());
        st.set_viewport(100.0, 100.0);
        st.set_content(100.0, 400.0);
        st.set_offset(0.0, 30.0);
        let root = Column(Modifier::new()).child((
            Text("header"),
            TrackedScrollArea(Modifier::new(), "page", st.clone(), Text("body")),
        ));
        assert_eq!(report_scroll_offsets(&root, &channel), 1);
        assert_eq!(channel.pending("page"), Some(Vec2::new(0.0, -30.0)));
        channel.flush();
        assert_eq!(*log.borrow(), vec![Vec2::new(0.0, -30.0)]);
    }

    #[test]
    fn remembered_channel_and_state_survive_recomposition() {
        let scope = Scope::new();
        let (log, cb) = recorder();
        let cb = Rc::new(cb);
        let pass = || {
            scope.run(|| {
                let channel = remember_scroll_channel("feed.channel");
                let state = remember_scroll_state("feed.state");
                state.set_viewport(100.0, 100.0);
                state.set_content(100.0, 500.0);
                if channel.observer_count() == 0 {
                    let cb = cb.clone();
                    let _tracking = track_scroll_offset(&channel, "feed", move |v: Vec2| cb(v));
                }
                let root = TrackedScrollArea(Modifier::new(), "feed", state.clone(), Text("rows"));
                (channel, state, root)
            })
        };

        let (channel, state, _) = pass();
        state.set_offset(0.0, 80.0);
        let (again, same_state, root) = pass();
        assert!(Rc::ptr_eq(&channel, &again));
        assert!(Rc::ptr_eq(&state, &same_state));
        assert_eq!(again.observer_count(), 1);

        report_scroll_offsets(&root, &again);
        again.flush();
        assert_eq!(*log.borrow(), vec![Vec2::new(0.0, -80.0)]);

        scope.dispose();
        assert_eq!(again.observer_count(), 0);
    }
}
