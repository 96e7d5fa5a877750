use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::View;
use crate::scope::Scope;

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// Runs one composition pass under `scope`, resetting the slot cursor first.
pub fn compose(scope: &Scope, build_root: impl FnOnce() -> View) -> View {
    COMPOSER.with(|c| c.borrow_mut().cursor = 0);
    scope.run(build_root)
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let (cursor, existing) = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;
        let existing = c
            .slots
            .get(cursor)
            .map(|slot| slot.downcast_ref::<Rc<T>>().cloned());
        if existing.is_none() {
            // reserve the slot; init may itself remember
            c.slots.push(Box::new(()));
        }
        (cursor, existing)
    });

    match existing {
        Some(Some(rc)) => rc,
        found => {
            if found.is_some() {
                log::warn!(
                    "remember: slot {} type changed; replacing. \
                     If this is due to conditional composition, prefer remember_with_key.",
                    cursor
                );
            }
            let rc: Rc<T> = Rc::new(init());
            COMPOSER.with(|c| c.borrow_mut().slots[cursor] = Box::new(rc.clone()));
            rc
        }
    }
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let existing = COMPOSER.with(|c| {
        c.borrow()
            .keyed_slots
            .get(&key)
            .map(|slot| slot.downcast_ref::<Rc<T>>().cloned())
    });

    match existing {
        Some(Some(rc)) => rc,
        found => {
            if found.is_some() {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
            }
            let rc: Rc<T> = Rc::new(init());
            COMPOSER.with(|c| c.borrow_mut().keyed_slots.insert(key, Box::new(rc.clone())));
            rc
        }
    }
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}

/// Drops every remembered slot. Hosts call this when tearing a window down.
pub fn forget_all() {
    let (slots, keyed) = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        c.cursor = 0;
        (
            std::mem::take(&mut c.slots),
            std::mem::take(&mut c.keyed_slots),
        )
    });
    // dropped outside the borrow; slot destructors may touch the composer
    drop(slots);
    drop(keyed);
}
