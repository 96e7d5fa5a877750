//! Alerts described as data.
//!
//! An [`AlertSpec`] is a title, an optional message and an ordered list of
//! role-tagged buttons. [`show_alert`] renders it over a base view while a
//! trigger is set. Every button clears the trigger after running its action,
//! so a button without an action simply dismisses.
//!
//! ```rust
//! use drape_core::*;
//! use drape_ui::*;
//! use drape_ui::search::trigger_view_by_id;
//!
//! let presented = signal(true);
//! let spec = AlertSpec::error("Network down");
//! let screen = show_alert(Text("Home"), &spec, &presented);
//!
//! assert!(trigger_view_by_id(&screen, "OK"));
//! assert!(!presented.get());
//! ```

use std::rc::Rc;

use drape_core::*;
use smallvec::SmallVec;

use crate::{Box, Button, Column, Row, SecureField, Stack, Surface, Text, TextField, ViewExt};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ButtonRole {
    #[default]
    Default,
    /// Also reachable through the platform dismiss gesture.
    Cancel,
    Destructive,
    None,
}

#[derive(Clone)]
pub struct AlertButtonSpec {
    pub title: String,
    pub role: ButtonRole,
    pub action: Option<Callback>,
}

impl AlertButtonSpec {
    pub fn new(title: impl Into<String>, role: ButtonRole) -> Self {
        Self {
            title: title.into(),
            role,
            action: None,
        }
    }

    pub fn ok() -> Self {
        Self::new("OK", ButtonRole::Default)
    }

    pub fn cancel() -> Self {
        Self::new("Cancel", ButtonRole::Cancel)
    }

    pub fn destructive(title: impl Into<String>, action: impl Fn() + 'static) -> Self {
        Self::new(title, ButtonRole::Destructive).action(action)
    }

    pub fn action(mut self, f: impl Fn() + 'static) -> Self {
        self.action = Some(Rc::new(f));
        self
    }

    /// Rendering identity. Titles must be unique within one alert.
    pub fn id(&self) -> &str {
        &self.title
    }
}

impl std::fmt::Debug for AlertButtonSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertButtonSpec")
            .field("title", &self.title)
            .field("role", &self.role)
            .field("action", &self.action.as_ref().map(|_| "..."))
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AlertSpec {
    pub title: String,
    pub message: Option<String>,
    pub buttons: SmallVec<[AlertButtonSpec; 2]>,
}

impl AlertSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// "Error" alert with `message` and a single OK button.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error")
            .message(message)
            .button(AlertButtonSpec::ok())
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn button(mut self, button: AlertButtonSpec) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn buttons(mut self, buttons: impl IntoIterator<Item = AlertButtonSpec>) -> Self {
        self.buttons.extend(buttons);
        self
    }

    pub fn cancel_button(&self) -> Option<&AlertButtonSpec> {
        self.buttons.iter().find(|b| b.role == ButtonRole::Cancel)
    }

    /// First title used by more than one button.
    pub fn duplicate_title(&self) -> Option<&str> {
        self.buttons
            .iter()
            .enumerate()
            .find(|(i, b)| self.buttons[..*i].iter().any(|p| p.title == b.title))
            .map(|(_, b)| b.title.as_str())
    }
}

/// Text input shown inside an alert.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertTextField {
    pub placeholder: String,
    pub secure: bool,
    pub keyboard: KeyboardKind,
}

impl Default for AlertTextField {
    fn default() -> Self {
        Self {
            placeholder: "Enter name".into(),
            secure: false,
            keyboard: KeyboardKind::Default,
        }
    }
}

/// The dialog surface for `spec`. Each button runs its action, then `dismiss`.
pub fn alert_view(spec: &AlertSpec, dismiss: Callback) -> View {
    alert_view_with_field(spec, dismiss, None)
}

fn alert_view_with_field(spec: &AlertSpec, dismiss: Callback, field: Option<View>) -> View {
    if let Some(dup) = spec.duplicate_title() {
        log::warn!("alert {:?}: duplicate button title {dup:?}", spec.title);
    }
    if spec.buttons.is_empty() {
        log::debug!("alert {:?} has no buttons", spec.title);
    }

    let th = theme();
    let buttons: Vec<View> = spec
        .buttons
        .iter()
        .map(|b| {
            let action = b.action.clone();
            let dismiss = dismiss.clone();
            Button(b.title.clone(), move || {
                if let Some(action) = &action {
                    action();
                }
                dismiss();
            })
            .identifier(b.id())
        })
        .collect();
    // two buttons sit side by side, anything else stacks
    let actions = if buttons.len() == 2 {
        Row(Modifier::new())
    } else {
        Column(Modifier::new())
    }
    .child(buttons);

    Surface(
        Modifier::new()
            .background(th.surface)
            .clip_rounded(14.0)
            .padding(16.0)
            .min_width(270.0),
        Column(Modifier::new()).child((
            Text(spec.title.clone())
                .semantics(Semantics::new(Role::Text).traits(Traits::STATIC_TEXT | Traits::HEADER)),
            spec.message.clone().map(|m| Text(m)),
            field,
            actions,
        )),
    )
    .identifier("alert")
}

fn over(base: View, dialog: View) -> View {
    Stack(Modifier::new().fill_max_size()).child((
        base,
        Box(Modifier::new()
            .fill_max_size()
            .background(Color::BLACK.with_opacity(0.2))),
        dialog,
    ))
}

/// Shows `spec` over `base` while `trigger` is true.
pub fn show_alert(base: View, spec: &AlertSpec, trigger: &Signal<bool>) -> View {
    if !trigger.get() {
        return base;
    }
    let trigger = trigger.clone();
    over(base, alert_view(spec, Rc::new(move || trigger.set(false))))
}

/// Shows the alert held in `item`; dismissing clears it.
pub fn show_alert_for(base: View, item: &Signal<Option<AlertSpec>>) -> View {
    let Some(spec) = item.with(|s| s.clone()) else {
        return base;
    };
    let item = item.clone();
    over(base, alert_view(&spec, Rc::new(move || item.set(None))))
}

/// Like [`show_alert`] with a text input above the buttons. Edits go to `text`.
pub fn show_text_field_alert(
    base: View,
    spec: &AlertSpec,
    field: &AlertTextField,
    trigger: &Signal<bool>,
    text: &Signal<String>,
) -> View {
    if !trigger.get() {
        return base;
    }
    let on_change = {
        let text = text.clone();
        move |s: String| text.set(s)
    };
    let input = if field.secure {
        SecureField(text.get(), field.placeholder.clone(), on_change)
    } else {
        TextField(text.get(), field.placeholder.clone(), on_change)
    };
    let input = crate::KeyboardExt::keyboard(input, field.keyboard);
    let trigger = trigger.clone();
    over(
        base,
        alert_view_with_field(spec, Rc::new(move || trigger.set(false)), Some(input)),
    )
}

/// The platform dismiss gesture (escape key, tap outside on some hosts).
///
/// Only available when the alert has a cancel button; runs its action and
/// clears the trigger. Returns whether the alert was dismissed.
pub fn dismiss_alert_by_gesture(spec: &AlertSpec, trigger: &Signal<bool>) -> bool {
    if !trigger.get() {
        return false;
    }
    let Some(cancel) = spec.cancel_button() else {
        return false;
    };
    if let Some(action) = &cancel.action {
        action();
    }
    trigger.set(false);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{find_by_identifier, trigger_view_by_id};
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        (hits, move || h.set(h.get() + 1))
    }

    #[test]
    fn hidden_when_trigger_false() {
        let trigger = signal(false);
        let v = show_alert(Text("Home"), &AlertSpec::error("x"), &trigger);
        assert_eq!(v.outline(), "Text \"Home\"");
    }

    #[test]
    fn error_alert_outline() {
        let trigger = signal(true);
        let v = show_alert(Text("Home"), &AlertSpec::error("Network down"), &trigger);
        insta::assert_snapshot!(v.outline(), @r#"
        Stack
          Text "Home"
          Box
          Surface #alert
            Column
              Text "Error"
              Text "Network down"
              Column
                Button "OK" #OK
        "#);
    }

    #[test]
    fn ok_clears_trigger() {
        let trigger = signal(true);
        let v = show_alert(Text("Home"), &AlertSpec::error("Network down"), &trigger);
        assert!(trigger_view_by_id(&v, "OK"));
        assert!(!trigger.get());
    }

    #[test]
    fn buttons_keep_order_and_run_action_before_dismiss() {
        let trigger = signal(true);
        let seen_trigger = Rc::new(Cell::new(false));
        let spec = AlertSpec::new("Delete?").buttons([
            AlertButtonSpec::cancel(),
            AlertButtonSpec::destructive("Delete", {
                let trigger = trigger.clone();
                let seen = seen_trigger.clone();
                move || seen.set(trigger.get())
            }),
        ]);
        let v = show_alert(Text("Home"), &spec, &trigger);
        let dialog = find_by_identifier(&v, "alert").map(|d| d.outline());
        assert_eq!(
            dialog.as_deref(),
            Some(
                "Surface #alert\n  Column\n    Text \"Delete?\"\n    Row\n      \
                 Button \"Cancel\" #Cancel\n      Button \"Delete\" #Delete"
            )
        );
        assert!(trigger_view_by_id(&v, "Delete"));
        assert!(seen_trigger.get(), "action runs while still presented");
        assert!(!trigger.get());
    }

    #[test]
    fn item_alert_clears_item() {
        let item = signal(Some(AlertSpec::error("oops")));
        let v = show_alert_for(Text("Home"), &item);
        assert!(trigger_view_by_id(&v, "OK"));
        assert!(item.with(|s| s.is_none()));
        let v = show_alert_for(Text("Home"), &item);
        assert_eq!(v.outline(), "Text \"Home\"");
    }

    #[test]
    fn gesture_runs_cancel_only() {
        let (hits, on_cancel) = counter();
        let trigger = signal(true);
        let spec = AlertSpec::new("Leave?")
            .button(AlertButtonSpec::ok())
            .button(AlertButtonSpec::cancel().action(on_cancel));
        assert!(dismiss_alert_by_gesture(&spec, &trigger));
        assert_eq!(hits.get(), 1);
        assert!(!trigger.get());
        assert!(!dismiss_alert_by_gesture(&spec, &trigger));

        let trigger = signal(true);
        assert!(!dismiss_alert_by_gesture(&AlertSpec::error("x"), &trigger));
        assert!(trigger.get());
    }

    #[test]
    fn text_field_alert_writes_back() {
        let trigger = signal(true);
        let text = signal(String::new());
        let field = AlertTextField {
            secure: true,
            keyboard: KeyboardKind::Email,
            ..Default::default()
        };
        let spec = AlertSpec::new("Sign in").button(AlertButtonSpec::ok());
        let v = show_text_field_alert(Text("Home"), &spec, &field, &trigger, &text);
        let dialog = find_by_identifier(&v, "alert").expect("alert shown");
        let input = &dialog.children[0].children[1];
        assert_eq!(input.outline(), "SecureField \"Enter name\"");
        match &input.kind {
            ViewKind::TextField {
                on_change: Some(cb),
                keyboard,
                ..
            } => {
                assert_eq!(*keyboard, KeyboardKind::Email);
                cb("hunter2".into());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(text.get(), "hunter2");
    }

    #[test]
    fn duplicate_titles_are_detected() {
        let spec = AlertSpec::new("t").buttons([AlertButtonSpec::ok(), AlertButtonSpec::ok()]);
        assert_eq!(spec.duplicate_title(), Some("OK"));
        assert_eq!(AlertSpec::error("x").duplicate_title(), None);
    }
}
