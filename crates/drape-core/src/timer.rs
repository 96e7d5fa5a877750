//! # Timers
//!
//! `Timers` is the "run this later on the UI thread" primitive. The host
//! event loop owns the driving side: call [`Timers::run_due`] once per loop
//! iteration and sleep until [`Timers::next_deadline`].
//!
//! ```rust
//! use drape_core::*;
//! use std::rc::Rc;
//! use web_time::Duration;
//!
//! let clock = ManualClock::new();
//! let timers = Timers::new(Rc::new(clock.clone()));
//!
//! let token = timers.schedule_after(Duration::from_millis(250), || log::info!("fired"));
//! clock.advance(Duration::from_millis(100));
//! token.cancel();
//! clock.advance(Duration::from_millis(200));
//! assert_eq!(timers.run_due(), 0);
//! ```
//!
//! Tokens are generation-checked: cancelling a timer that already fired (or
//! whose slot has since been reused) does nothing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

use crate::animation::Clock;

new_key_type! {
    pub struct TimerKey;
}

struct Timer {
    deadline: Instant,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

struct TimerQueue {
    clock: Rc<dyn Clock>,
    timers: SlotMap<TimerKey, Timer>,
    next_seq: u64,
}

impl TimerQueue {
    /// Earliest due timer scheduled before `seq_limit`.
    fn pop_due(&mut self, now: Instant, seq_limit: u64) -> Option<Timer> {
        let key = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline <= now && t.seq < seq_limit)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(k, _)| k)?;
        self.timers.remove(key)
    }
}

/// Shared handle to the timer queue. Clones refer to the same queue.
#[derive(Clone)]
pub struct Timers {
    inner: Rc<RefCell<TimerQueue>>,
}

impl Timers {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TimerQueue {
                clock,
                timers: SlotMap::with_key(),
                next_seq: 0,
            })),
        }
    }

    pub fn now(&self) -> Instant {
        self.inner.borrow().clock.now()
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        self.inner.borrow().clock.clone()
    }

    pub fn schedule_after(&self, delay: Duration, f: impl FnOnce() + 'static) -> TimerToken {
        let mut q = self.inner.borrow_mut();
        let deadline = q.clock.now() + delay;
        let seq = q.next_seq;
        q.next_seq += 1;
        let key = q.timers.insert(Timer {
            deadline,
            seq,
            callback: Box::new(f),
        });
        log::trace!("timer {key:?} scheduled in {delay:?}");
        TimerToken {
            key,
            queue: Rc::downgrade(&self.inner),
        }
    }

    /// Runs every callback whose deadline has passed, in deadline order (ties
    /// in scheduling order). Callbacks scheduled while this runs wait for the
    /// next call. Returns how many callbacks ran.
    pub fn run_due(&self) -> usize {
        let (now, seq_limit) = {
            let q = self.inner.borrow();
            (q.clock.now(), q.next_seq)
        };
        let mut ran = 0;
        loop {
            // borrow must end before the callback runs; it may schedule or cancel
            let next = self.inner.borrow_mut().pop_due(now, seq_limit);
            match next {
                Some(timer) => {
                    (timer.callback)();
                    ran += 1;
                }
                None => break,
            }
        }
        if ran > 0 {
            log::trace!("ran {ran} due timer(s)");
        }
        ran
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner
            .borrow()
            .timers
            .values()
            .map(|t| t.deadline)
            .min()
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().timers.len()
    }
}

/// Cancellation capability for one scheduled callback.
#[derive(Debug)]
pub struct TimerToken {
    key: TimerKey,
    queue: Weak<RefCell<TimerQueue>>,
}

impl TimerToken {
    /// Removes the callback if it has not run yet. Returns whether it was pending.
    pub fn cancel(&self) -> bool {
        let Some(queue) = self.queue.upgrade() else {
            return false;
        };
        let removed = queue.borrow_mut().timers.remove(self.key);
        if removed.is_some() {
            log::trace!("timer {:?} cancelled", self.key);
        }
        removed.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|q| q.borrow().timers.contains_key(self.key))
    }
}

impl std::fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.timers.len())
            .finish()
    }
}
