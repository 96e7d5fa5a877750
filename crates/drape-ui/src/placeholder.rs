//! Placeholder views: empty states, avatars and skeleton loading.

use drape_core::*;

use crate::{Column, Image, Text, TextExt, ViewExt};

pub const EMPTY_STATE_TEXT: &str = "Nothing to show.";
pub const EMPTY_STATE_SYMBOL: &str = "doc.text.magnifyingglass";
pub const AVATAR_PLACEHOLDER_SYMBOL: &str = "person.crop.circle.fill";

/// Full-size "nothing here" screen with an icon above `text`.
pub fn EmptyState(text: impl Into<String>) -> View {
    EmptyStateWith(Column(Modifier::new()).child((
        Image(EMPTY_STATE_SYMBOL)
            .color(Color::GRAY)
            .modifier(Modifier::new().size(50.0, 50.0)),
        Text(text).size(22.0),
    )))
}

/// Empty state around caller content.
pub fn EmptyStateWith(content: View) -> View {
    let th = theme();
    Column(Modifier::new().fill_max_size().background(th.surface)).child(content)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AvatarShape {
    #[default]
    Circle,
    Rounded,
}

/// Avatar slot showing the placeholder symbol. Sized 40 to 60 points.
pub fn AvatarView(shape: AvatarShape) -> View {
    let clip = match shape {
        AvatarShape::Circle => 30.0,
        AvatarShape::Rounded => 8.0,
    };
    Image(AVATAR_PLACEHOLDER_SYMBOL)
        .color(Color::GRAY.with_opacity(0.7))
        .modifier(
            Modifier::new()
                .min_size(40.0, 40.0)
                .max_size(60.0, 60.0)
                .clip_rounded(clip),
        )
}

/// While `visible`, draws `view` as placeholder blocks and disables it.
pub fn skeleton(mut view: View, visible: bool) -> View {
    if visible {
        view.modifier = view.modifier.redacted(true).disabled(true);
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Button;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn empty_state_layout() {
        insta::assert_snapshot!(EmptyState(EMPTY_STATE_TEXT).outline(), @r#"
        Column
          Column
            Image "doc.text.magnifyingglass"
            Text "Nothing to show."
        "#);
    }

    #[test]
    fn skeleton_blocks_taps_only_while_visible() {
        let hits = Rc::new(Cell::new(0));
        let button = {
            let hits = hits.clone();
            Button("Load", move || hits.set(hits.get() + 1))
        };
        let loading = skeleton(button.clone(), true);
        assert!(loading.modifier.redacted);
        assert!(!loading.activate());
        let loaded = skeleton(button, false);
        assert!(loaded.activate());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn avatar_is_bounded() {
        let v = AvatarView(AvatarShape::Circle);
        assert_eq!(v.modifier.max_width, Some(60.0));
        assert_eq!(v.modifier.min_height, Some(40.0));
        match v.kind {
            ViewKind::Image { tint, .. } => assert_eq!(tint, Color::GRAY.with_opacity(0.7)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
