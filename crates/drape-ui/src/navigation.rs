//! Navigation bar background.

use drape_core::*;

use crate::{Box, Column, ViewExt};

/// Height of the strip painted behind a navigation bar.
pub const NAVIGATION_BAR_HEIGHT: f32 = 44.0;

pub trait NavigationBarExt {
    /// Paints `color` behind the navigation bar above this content.
    fn navigation_bar_background(self, color: Color) -> View;
}

impl NavigationBarExt for View {
    fn navigation_bar_background(self, color: Color) -> View {
        let bar = Box(
            Modifier::new()
                .min_height(NAVIGATION_BAR_HEIGHT)
                .max_height(NAVIGATION_BAR_HEIGHT)
                .background(color)
                .hit_testing(false),
        )
        .identifier("navigation_bar");
        Column(Modifier::new().fill_max_size()).child((bar, self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Text;
    use crate::search::find_by_identifier;

    #[test]
    fn bar_sits_above_content() {
        let v = Text("Inbox").navigation_bar_background(Color::from_hex("#34AF82"));
        insta::assert_snapshot!(v.outline(), @r#"
        Column
          Box #navigation_bar
          Text "Inbox"
        "#);
        let bar = find_by_identifier(&v, "navigation_bar").expect("bar present");
        assert_eq!(bar.modifier.background, Some(Color::from_hex("#34AF82")));
        assert_eq!(bar.modifier.max_height, Some(NAVIGATION_BAR_HEIGHT));
        assert!(!bar.modifier.hit_testing);
    }
}
