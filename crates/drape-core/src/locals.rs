//! # Theming
//!
//! Widgets read colours from `theme()`, a thread‑local composition local you
//! can override for a subtree:
//!
//! ```rust
//! use drape_core::*;
//!
//! let light = Theme {
//!     surface: Color::from_hex("#F5F5F5"),
//!     on_surface: Color::from_hex("#222222"),
//!     ..Theme::default()
//! };
//!
//! with_theme(light, || {
//!     assert_eq!(theme().on_surface, Color::from_hex("#222222"));
//! });
//! ```

use std::cell::RefCell;

use crate::Color;

thread_local! {
    static THEME_STACK: RefCell<Vec<Theme>> = const { RefCell::new(Vec::new()) };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Window background / app root.
    pub background: Color,
    /// Cards, sheets, dialogs.
    pub surface: Color,
    pub on_surface: Color,
    pub primary: Color,
    pub on_primary: Color,
    pub outline: Color,
    /// Placeholder and secondary text.
    pub muted: Color,
    /// Destructive actions.
    pub error: Color,
    /// Heavy translucent material behind custom alerts.
    pub thick_material: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::from_hex("#121212"),
            surface: Color::from_hex("#1E1E1E"),
            on_surface: Color::from_hex("#DDDDDD"),
            primary: Color::from_hex("#34AF82"),
            on_primary: Color::WHITE,
            outline: Color::from_hex("#555555"),
            muted: Color::GRAY,
            error: Color::from_hex("#ae3636"),
            thick_material: Color::from_hex("#2A2A2AF0"),
        }
    }
}

pub fn with_theme<R>(theme: Theme, f: impl FnOnce() -> R) -> R {
    // pops on unwind too
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            THEME_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    THEME_STACK.with(|st| st.borrow_mut().push(theme));
    let _guard = Guard;
    f()
}

pub fn theme() -> Theme {
    THEME_STACK.with(|st| st.borrow().last().copied().unwrap_or_default())
}
