//! Registry of the app's windows.
//!
//! Hosts report window lifecycle here; drape code asks it for the focused
//! window instead of reaching for a global.

use slotmap::{SlotMap, new_key_type};

use crate::{PlatformError, Result};

new_key_type! {
    pub struct WindowId;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activation {
    ForegroundActive,
    ForegroundInactive,
    #[default]
    Background,
    Detached,
}

#[derive(Clone, Debug)]
pub struct WindowInfo {
    pub title: String,
    pub activation: Activation,
    pub key: bool,
    pub user_interaction: bool,
    /// Identifier of the field holding keyboard focus.
    pub focused_field: Option<String>,
}

#[derive(Default, Debug)]
pub struct WindowRegistry {
    windows: SlotMap<WindowId, WindowInfo>,
    order: Vec<WindowId>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, title: impl Into<String>) -> WindowId {
        let title = title.into();
        log::debug!("window opened: {title}");
        let id = self.windows.insert(WindowInfo {
            title,
            activation: Activation::Background,
            key: false,
            user_interaction: true,
            focused_field: None,
        });
        self.order.push(id);
        id
    }

    pub fn close(&mut self, id: WindowId) -> Result<WindowInfo> {
        let info = self
            .windows
            .remove(id)
            .ok_or(PlatformError::UnknownWindow(id))?;
        self.order.retain(|w| *w != id);
        Ok(info)
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowInfo> {
        self.windows.get(id)
    }

    fn get_mut(&mut self, id: WindowId) -> Result<&mut WindowInfo> {
        self.windows
            .get_mut(id)
            .ok_or(PlatformError::UnknownWindow(id))
    }

    pub fn set_activation(&mut self, id: WindowId, activation: Activation) -> Result<()> {
        let w = self.get_mut(id)?;
        w.activation = activation;
        if activation != Activation::ForegroundActive {
            w.key = false;
        }
        Ok(())
    }

    /// Makes `id` the key window, activating it. At most one window is key.
    pub fn make_key(&mut self, id: WindowId) -> Result<()> {
        self.get_mut(id)?;
        for (wid, w) in self.windows.iter_mut() {
            w.key = wid == id;
            if wid == id {
                w.activation = Activation::ForegroundActive;
            }
        }
        Ok(())
    }

    pub fn focus_field(&mut self, id: WindowId, field: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.focused_field = Some(field.into());
        Ok(())
    }

    /// Every window, in the order they were opened.
    pub fn all_windows(&self) -> Vec<WindowId> {
        self.order.clone()
    }

    /// Windows in the foreground and active.
    pub fn active_windows(&self) -> Vec<WindowId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.windows[*id].activation == Activation::ForegroundActive)
            .collect()
    }

    /// The key window among the active ones.
    pub fn active_window(&self) -> Option<WindowId> {
        self.active_windows()
            .into_iter()
            .find(|id| self.windows[*id].key)
    }

    /// The window a prompt should attach to: the key window if there is one,
    /// otherwise the first active window.
    pub fn focused(&self) -> Option<WindowId> {
        self.active_window()
            .or_else(|| self.active_windows().into_iter().next())
    }

    /// Enables or disables input on every window.
    pub fn set_user_interaction_enabled(&mut self, enabled: bool) {
        log::debug!("user interaction on all windows: {enabled}");
        for (_, w) in self.windows.iter_mut() {
            w.user_interaction = enabled;
        }
    }

    /// True when every window accepts input. No windows counts as enabled.
    pub fn user_interaction_enabled(&self) -> bool {
        self.windows.values().all(|w| w.user_interaction)
    }

    /// Drops keyboard focus everywhere. Returns how many fields lost it.
    pub fn hide_keyboard(&mut self) -> usize {
        let mut n = 0;
        for (_, w) in self.windows.iter_mut() {
            if w.focused_field.take().is_some() {
                n += 1;
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> (WindowRegistry, WindowId, WindowId, WindowId) {
        let mut reg = WindowRegistry::new();
        let a = reg.open("main");
        let b = reg.open("inspector");
        let c = reg.open("hidden");
        (reg, a, b, c)
    }

    #[test]
    fn key_window_wins_focus() {
        let (mut reg, a, b, c) = three();
        assert_eq!(reg.focused(), None);

        reg.set_activation(a, Activation::ForegroundActive).unwrap();
        reg.set_activation(b, Activation::ForegroundActive).unwrap();
        assert_eq!(reg.active_windows(), vec![a, b]);
        assert_eq!(reg.active_window(), None);
        assert_eq!(reg.focused(), Some(a));

        reg.make_key(b).unwrap();
        assert_eq!(reg.active_window(), Some(b));
        assert_eq!(reg.focused(), Some(b));

        reg.make_key(c).unwrap();
        assert_eq!(reg.active_windows(), vec![a, b, c]);
        assert_eq!(reg.active_window(), Some(c));
        assert!(!reg.get(b).unwrap().key);
        assert_eq!(reg.all_windows(), vec![a, b, c]);
    }

    #[test]
    fn deactivating_drops_key() {
        let (mut reg, a, _, _) = three();
        reg.make_key(a).unwrap();
        reg.set_activation(a, Activation::Background).unwrap();
        assert_eq!(reg.active_window(), None);
        assert!(!reg.get(a).unwrap().key);
    }

    #[test]
    fn interaction_toggles_every_window() {
        let (mut reg, _, b, _) = three();
        assert!(reg.user_interaction_enabled());
        reg.set_user_interaction_enabled(false);
        assert!(!reg.user_interaction_enabled());
        assert!(!reg.get(b).unwrap().user_interaction);
        reg.set_user_interaction_enabled(true);
        assert!(reg.user_interaction_enabled());
    }

    #[test]
    fn hide_keyboard_clears_focus() {
        let (mut reg, a, b, _) = three();
        reg.focus_field(a, "search").unwrap();
        reg.focus_field(b, "notes").unwrap();
        assert_eq!(reg.hide_keyboard(), 2);
        assert!(reg.get(a).unwrap().focused_field.is_none());
        assert_eq!(reg.hide_keyboard(), 0);
    }

    #[test]
    fn stale_ids_are_errors() {
        let (mut reg, a, _, _) = three();
        reg.close(a).unwrap();
        assert!(matches!(
            reg.make_key(a),
            Err(PlatformError::UnknownWindow(id)) if id == a
        ));
        assert_eq!(reg.all_windows().len(), 2);
    }
}
