use std::rc::Rc;

use drape_core::*;

use crate::search::find_by_identifier;
use crate::{Column, Stack, Text, TextExt, TextField, ViewExt};

pub const DEFAULT_PLACEHOLDER: &str = "Optional";

pub trait BeginEditingExt {
    /// Runs `action` whenever the first text input in this subtree takes
    /// keyboard focus.
    fn on_begin_editing(self, action: impl Fn() + 'static) -> View;
}

impl BeginEditingExt for View {
    fn on_begin_editing(mut self, action: impl Fn() + 'static) -> View {
        if !attach_begin_editing(&mut self, Rc::new(action)) {
            log::warn!("on_begin_editing: no text input under {:?}", self.kind);
        }
        self
    }
}

fn attach_begin_editing(view: &mut View, action: Callback) -> bool {
    if let ViewKind::TextField {
        on_begin_editing, ..
    } = &mut view.kind
    {
        *on_begin_editing = Some(action);
        return true;
    }
    view.children
        .iter_mut()
        .any(|c| attach_begin_editing(c, action.clone()))
}

/// Host notification that the input identified by `id` took focus.
/// Returns whether a callback ran. Disabled inputs never begin editing.
pub fn begin_editing(root: &View, id: &str) -> bool {
    let Some(field) = find_by_identifier(root, id) else {
        log::debug!("begin_editing: no view {id:?}");
        return false;
    };
    if field.modifier.disabled {
        return false;
    }
    match &field.kind {
        ViewKind::TextField {
            on_begin_editing: Some(action),
            ..
        } => {
            action();
            true
        }
        _ => false,
    }
}

/// Multi-line text input bound to `text`, with a placeholder shown while it
/// is empty. The placeholder never receives pointer input.
pub fn TextEditor(text: &Signal<String>, placeholder: impl Into<String>, bordered: bool) -> View {
    let current = text.get();
    let input = TextField(current.clone(), "", {
        let text = text.clone();
        move |s| text.set(s)
    });

    let hint = current.is_empty().then(|| {
        Column(
            Modifier::new()
                .fill_max_size()
                .padding_values(PaddingValues {
                    left: 5.0,
                    top: 8.0,
                    ..Default::default()
                })
                .hit_testing(false),
        )
        .child(Text(placeholder).color(Color::GRAY))
    });

    let modifier = if bordered {
        Modifier::new().border(1.0, Color::GRAY, 5.0)
    } else {
        Modifier::new()
    };
    Stack(modifier).child((input, hint))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(view: &View, s: &str) {
        match &view.children[0].kind {
            ViewKind::TextField {
                on_change: Some(cb), ..
            } => cb(s.to_string()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn placeholder_only_while_empty() {
        let text = signal(String::new());
        let v = TextEditor(&text, DEFAULT_PLACEHOLDER, false);
        assert_eq!(v.children.len(), 2);
        assert!(!v.children[1].modifier.hit_testing);
        assert_eq!(v.children[1].children[0].outline(), "Text \"Optional\"");

        edit(&v, "hello");
        assert_eq!(text.get(), "hello");
        let v = TextEditor(&text, DEFAULT_PLACEHOLDER, false);
        assert_eq!(v.children.len(), 1);
    }

    #[test]
    fn begin_editing_reaches_the_editor_input() {
        let text = signal(String::new());
        let focused = Rc::new(std::cell::Cell::new(0));
        let mut editor = TextEditor(&text, "Notes", true).on_begin_editing({
            let focused = focused.clone();
            move || focused.set(focused.get() + 1)
        });
        editor.children[0] = editor.children[0].clone().identifier("notes");

        assert!(begin_editing(&editor, "notes"));
        assert!(begin_editing(&editor, "notes"));
        assert_eq!(focused.get(), 2);
        assert!(!begin_editing(&editor, "missing"));
    }

    #[test]
    fn plain_fields_without_callback_do_not_report() {
        let field = TextField("", "Name", |_| {}).identifier("name");
        assert!(!begin_editing(&field, "name"));

        let hits = Rc::new(std::cell::Cell::new(0));
        let mut field = field.on_begin_editing({
            let hits = hits.clone();
            move || hits.set(hits.get() + 1)
        });
        field.modifier = field.modifier.disabled(true);
        assert!(!begin_editing(&field, "name"));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn border_is_optional() {
        let text = signal(String::new());
        assert!(TextEditor(&text, "Notes", false).modifier.border.is_none());
        let bordered = TextEditor(&text, "Notes", true);
        let border = bordered.modifier.border.expect("bordered");
        assert_eq!((border.width, border.radius), (1.0, 5.0));
    }
}
