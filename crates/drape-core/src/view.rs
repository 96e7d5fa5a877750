use std::fmt::Write as _;
use std::rc::Rc;

use bitflags::bitflags;

use crate::{Color, Modifier, Vec2};

pub type ViewId = u64;

pub type Callback = Rc<dyn Fn()>;

/// Soft keyboard hint for text inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyboardKind {
    #[default]
    Default,
    Email,
    Number,
    Phone,
    Url,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TextStyle: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
    }
}

#[derive(Clone)]
pub enum ViewKind {
    Surface,
    Box,
    Row,
    Column,
    Stack,
    Spacer,
    /// Scroll container tracked in the named coordinate space.
    Scroll {
        space: String,
        get_scroll_offset: Option<Rc<dyn Fn() -> Vec2>>,
    },
    Text {
        text: String,
        color: Color,
        font_size: f32,
        style: TextStyle,
    },
    Button {
        text: String,
        on_click: Option<Callback>,
    },
    TextField {
        text: String,
        hint: String,
        secure: bool,
        keyboard: KeyboardKind,
        on_change: Option<Rc<dyn Fn(String)>>,
        /// Runs when the field takes keyboard focus.
        on_begin_editing: Option<Callback>,
    },
    Image {
        symbol: String,
        tint: Color,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Surface => write!(f, "Surface"),
            ViewKind::Box => write!(f, "Box"),
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Stack => write!(f, "Stack"),
            ViewKind::Spacer => write!(f, "Spacer"),
            ViewKind::Scroll { space, .. } => f.debug_struct("Scroll").field("space", space).finish(),
            ViewKind::Text {
                text,
                color,
                font_size,
                style,
            } => f
                .debug_struct("Text")
                .field("text", text)
                .field("color", color)
                .field("font_size", font_size)
                .field("style", style)
                .finish(),
            ViewKind::Button { text, .. } => f
                .debug_struct("Button")
                .field("text", text)
                .field("on_click", &"<callback>")
                .finish(),
            ViewKind::TextField {
                text,
                hint,
                secure,
                keyboard,
                ..
            } => {
                let shown: &dyn std::fmt::Debug = if *secure { &"<secure>" } else { text };
                f.debug_struct("TextField")
                    .field("text", shown)
                    .field("hint", hint)
                    .field("keyboard", keyboard)
                    .finish()
            }
            ViewKind::Image { symbol, tint } => f
                .debug_struct("Image")
                .field("symbol", symbol)
                .field("tint", tint)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub modifier: Modifier,
    /// Structural children, in paint order.
    pub children: Vec<View>,
    /// Logical children exposed to assistive technology. When present they
    /// are consulted before `children` by tree queries.
    pub elements: Option<Vec<View>>,
    pub semantics: Option<crate::semantics::Semantics>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            modifier: Modifier::new(),
            children: vec![],
            elements: None,
            semantics: None,
        }
    }
    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn accessibility_elements(mut self, elements: Vec<View>) -> Self {
        self.elements = Some(elements);
        self
    }
    pub fn semantics(mut self, s: crate::semantics::Semantics) -> Self {
        self.semantics = Some(s);
        self
    }

    /// Sets (or adds) the automation identifier, keeping any existing semantics.
    pub fn identifier(mut self, id: impl Into<String>) -> Self {
        let sem = self
            .semantics
            .take()
            .unwrap_or_else(|| crate::Semantics::new(crate::Role::Container));
        self.semantics = Some(sem.identifier(id));
        self
    }

    pub fn identifier_str(&self) -> Option<&str> {
        self.semantics.as_ref()?.identifier.as_deref()
    }

    /// The action a tap on this node would run, if it is enabled.
    pub fn activation(&self) -> Option<Callback> {
        if self.modifier.disabled || self.semantics.as_ref().is_some_and(|s| !s.enabled) {
            return None;
        }
        match &self.kind {
            ViewKind::Button { on_click, .. } => on_click.clone(),
            _ => self.modifier.on_tap.clone(),
        }
    }

    /// Runs the node's tap action. Returns false when there is none.
    pub fn activate(&self) -> bool {
        match self.activation() {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }

    /// Indented one-line-per-node dump. Logical elements are marked with `~`.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0, false);
        out.truncate(out.trim_end().len());
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize, logical: bool) {
        let marker = if logical { "~" } else { "" };
        let _ = write!(out, "{:indent$}{marker}{}", "", self.describe(), indent = depth * 2);
        if let Some(id) = self.identifier_str() {
            let _ = write!(out, " #{id}");
        }
        out.push('\n');
        for e in self.elements.iter().flatten() {
            e.write_outline(out, depth + 1, true);
        }
        for c in &self.children {
            c.write_outline(out, depth + 1, false);
        }
    }

    fn describe(&self) -> String {
        match &self.kind {
            ViewKind::Scroll { space, .. } => format!("Scroll({space})"),
            ViewKind::Text { text, .. } => format!("Text {text:?}"),
            ViewKind::Button { text, .. } => format!("Button {text:?}"),
            ViewKind::TextField { hint, secure, .. } => {
                if *secure {
                    format!("SecureField {hint:?}")
                } else {
                    format!("TextField {hint:?}")
                }
            }
            ViewKind::Image { symbol, .. } => format!("Image {symbol:?}"),
            other => format!("{other:?}"),
        }
    }
}
