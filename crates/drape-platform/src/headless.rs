//! Windowless host used by tests and scripted runs.
//!
//! [`HeadlessWindow`] hands out a fresh [`SurfaceContainer`] for every
//! overlay it is asked to mount and keeps them all, so callers can inspect
//! the tint history after the overlay is gone.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use drape_core::{Clock, Color, Container, Host, HostWindow, ManualClock, Size, Timers};

/// In-memory container that records each background write.
#[derive(Debug)]
pub struct SurfaceContainer {
    color: Cell<Color>,
    writes: RefCell<Vec<Color>>,
}

impl Default for SurfaceContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceContainer {
    pub fn new() -> Self {
        Self {
            color: Cell::new(Color::TRANSPARENT),
            writes: RefCell::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<Color> {
        self.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl Container for SurfaceContainer {
    fn background(&self) -> Color {
        self.color.get()
    }

    fn set_background(&self, color: Color) {
        self.color.set(color);
        self.writes.borrow_mut().push(color);
    }
}

pub struct HeadlessWindow {
    size: Cell<Size>,
    minimal: Cell<Size>,
    mounts: bool,
    containers: RefCell<Vec<Rc<SurfaceContainer>>>,
}

impl HeadlessWindow {
    pub fn new(size: Size) -> Self {
        Self {
            size: Cell::new(size),
            minimal: Cell::new(Size::new(320.0, 480.0)),
            mounts: true,
            containers: RefCell::new(Vec::new()),
        }
    }

    pub fn with_minimal_size(self, minimal: Size) -> Self {
        self.minimal.set(minimal);
        self
    }

    /// A window that has nothing to dim; overlays present without a scrim.
    pub fn without_containers(mut self) -> Self {
        self.mounts = false;
        self
    }

    pub fn resize(&self, size: Size) {
        log::debug!("headless window resized to {}x{}", size.width, size.height);
        self.size.set(size);
    }

    pub fn containers(&self) -> Vec<Rc<SurfaceContainer>> {
        self.containers.borrow().clone()
    }

    pub fn last_container(&self) -> Option<Rc<SurfaceContainer>> {
        self.containers.borrow().last().cloned()
    }
}

impl HostWindow for HeadlessWindow {
    fn size(&self) -> Size {
        self.size.get()
    }

    fn minimal_size(&self) -> Size {
        self.minimal.get()
    }

    fn mount_overlay_container(&self) -> Option<Rc<dyn Container>> {
        if !self.mounts {
            return None;
        }
        let container = Rc::new(SurfaceContainer::new());
        self.containers.borrow_mut().push(container.clone());
        Some(container)
    }
}

/// Host over a [`HeadlessWindow`] whose timers run on a manual clock.
/// Advance the clock and call `host.timers.run_due()` to move time.
pub fn headless_host(size: Size) -> (ManualClock, Rc<HeadlessWindow>, Host) {
    let clock = ManualClock::new();
    let window = Rc::new(HeadlessWindow::new(size));
    let clock_handle: Rc<dyn Clock> = Rc::new(clock.clone());
    let host = Host::new(window.clone(), Timers::new(clock_handle));
    (clock, window, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mount_gets_its_own_container() {
        let (_clock, window, host) = headless_host(Size::new(640.0, 480.0));
        let a = host.window.mount_overlay_container().expect("mounts");
        a.set_background(Color::BLACK);
        let _b = host.window.mount_overlay_container().expect("mounts");
        assert_eq!(window.containers().len(), 2);
        assert_eq!(window.containers()[0].writes(), vec![Color::BLACK]);
        assert_eq!(window.last_container().map(|c| c.write_count()), Some(0));
    }

    #[test]
    fn resize_is_seen_through_the_host() {
        let (_clock, window, host) = headless_host(Size::new(640.0, 480.0));
        window.resize(Size::new(300.0, 200.0));
        assert_eq!(host.window.size(), Size::new(300.0, 200.0));
    }

    #[test]
    fn windows_without_containers_mount_nothing() {
        let window = HeadlessWindow::new(Size::new(640.0, 480.0)).without_containers();
        assert!(window.mount_overlay_container().is_none());
        assert!(window.containers().is_empty());
    }
}
