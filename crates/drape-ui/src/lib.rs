#![allow(non_snake_case)]
//! Widgets and presentation helpers.
//!
//! The interesting parts live in their own modules:
//!
//! - [`overlay`]: presenting a modal surface bound to a flag or an item.
//! - [`dimmer`]: the scrim that fades in behind a presented overlay.
//! - [`alert`]: role-tagged dialogs described as data.
//! - [`scroll`]: scroll offset propagation through named coordinate spaces.
//! - [`search`]: first-match queries over the view tree.

pub mod alert;
pub mod attributed;
pub mod dimmer;
pub mod editor;
pub mod navigation;
pub mod overlay;
pub mod placeholder;
pub mod scroll;
pub mod search;

use std::rc::Rc;

use drape_core::*;

pub use alert::{AlertButtonSpec, AlertSpec, ButtonRole, show_alert, show_alert_for};
pub use attributed::{AttributedString, AttributedText, TextSpan};
pub use dimmer::{BackgroundDimmer, DimmerConfig, DimmerPhase, DimmerState};
pub use editor::{BeginEditingExt, TextEditor, begin_editing};
pub use navigation::NavigationBarExt;
pub use overlay::{
    DismissHandle, Identifiable, OverlayBinding, OverlayConfig, OverlayPresenter, OverlaySizing,
    OverlayState, custom_alert, present_overlay, present_overlay_item,
};
pub use scroll::{CoordinateSpace, ScrollOffsetChannel, track_scroll_offset};
pub use search::{SearchNode, find_first, trigger_view_by_id};

pub fn Surface(modifier: Modifier, child: View) -> View {
    let mut v = View::new(0, ViewKind::Surface).modifier(modifier);
    v.children = vec![child];
    v
}

pub fn Box(modifier: Modifier) -> View {
    View::new(0, ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(0, ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(0, ViewKind::Column).modifier(modifier)
}

pub fn Stack(modifier: Modifier) -> View {
    View::new(0, ViewKind::Stack).modifier(modifier)
}

pub fn Spacer() -> View {
    View::new(0, ViewKind::Spacer)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Text {
            text: text.into(),
            color: theme().on_surface,
            font_size: 16.0,
            style: TextStyle::empty(),
        },
    )
    .semantics(Semantics::new(Role::Text))
}

pub fn Button(text: impl Into<String>, on_click: impl Fn() + 'static) -> View {
    let text = text.into();
    View::new(
        0,
        ViewKind::Button {
            text: text.clone(),
            on_click: Some(Rc::new(on_click)),
        },
    )
    .semantics(Semantics::new(Role::Button).label(text))
}

pub fn TextField(
    text: impl Into<String>,
    hint: impl Into<String>,
    on_change: impl Fn(String) + 'static,
) -> View {
    View::new(
        0,
        ViewKind::TextField {
            text: text.into(),
            hint: hint.into(),
            secure: false,
            keyboard: KeyboardKind::Default,
            on_change: Some(Rc::new(on_change)),
            on_begin_editing: None,
        },
    )
    .semantics(Semantics::new(Role::TextField))
}

pub fn SecureField(
    text: impl Into<String>,
    hint: impl Into<String>,
    on_change: impl Fn(String) + 'static,
) -> View {
    let mut v = TextField(text, hint, on_change);
    if let ViewKind::TextField { secure, .. } = &mut v.kind {
        *secure = true;
    }
    v
}

/// Named symbol image (platform icon set).
pub fn Image(symbol: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Image {
            symbol: symbol.into(),
            tint: Color::WHITE,
        },
    )
    .semantics(Semantics::new(Role::Image))
}

pub trait TextExt {
    fn color(self, c: Color) -> View;
    fn size(self, px: f32) -> View;
    fn style(self, style: TextStyle) -> View;
}

impl TextExt for View {
    fn color(mut self, c: Color) -> View {
        match &mut self.kind {
            ViewKind::Text { color, .. } => *color = c,
            ViewKind::Image { tint, .. } => *tint = c,
            _ => {}
        }
        self
    }
    fn size(mut self, px: f32) -> View {
        if let ViewKind::Text { font_size, .. } = &mut self.kind {
            *font_size = px;
        }
        self
    }
    fn style(mut self, s: TextStyle) -> View {
        if let ViewKind::Text { style, .. } = &mut self.kind {
            *style = s;
        }
        self
    }
}

pub trait KeyboardExt {
    fn keyboard(self, kind: KeyboardKind) -> View;
}

impl KeyboardExt for View {
    fn keyboard(mut self, kind: KeyboardKind) -> View {
        if let ViewKind::TextField { keyboard, .. } = &mut self.kind {
            *keyboard = kind;
        }
        self
    }
}

/// Extension trait for child building
pub trait ViewExt: Sized {
    fn child(self, children: impl IntoChildren) -> Self;
}

impl ViewExt for View {
    fn child(self, children: impl IntoChildren) -> Self {
        self.with_children(children.into_children())
    }
}

pub trait IntoChildren {
    fn into_children(self) -> Vec<View>;
}

impl IntoChildren for View {
    fn into_children(self) -> Vec<View> {
        vec![self]
    }
}

impl IntoChildren for Vec<View> {
    fn into_children(self) -> Vec<View> {
        self
    }
}

impl IntoChildren for Option<View> {
    fn into_children(self) -> Vec<View> {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoChildren for [View; N] {
    fn into_children(self) -> Vec<View> {
        self.into()
    }
}

// Tuple implementations
macro_rules! impl_into_children_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: IntoChildren),+> IntoChildren for ($($t,)+) {
            fn into_children(self) -> Vec<View> {
                let mut v = Vec::new();
                $(v.extend(self.$idx.into_children());)+
                v
            }
        }
    };
}

impl_into_children_tuple!(0 A, 1 B);
impl_into_children_tuple!(0 A, 1 B, 2 C);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
