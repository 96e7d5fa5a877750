//! Rich text made of styled runs.
//!
//! ```rust
//! use drape_core::*;
//! use drape_ui::attributed::{AttributedString, AttributedText};
//!
//! let terms = AttributedString::new()
//!     .push("By continuing you accept the ")
//!     .push_styled("terms", TextStyle::UNDERLINE)
//!     .push(".");
//! assert_eq!(terms.plain(), "By continuing you accept the terms.");
//! let view = AttributedText(&terms);
//! assert_eq!(view.children.len(), 1);
//! ```

use drape_core::*;
use smallvec::SmallVec;

use crate::{Column, Row, Text, TextExt};

#[derive(Clone, Debug, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub style: TextStyle,
    /// Theme text colour when `None`.
    pub color: Option<Color>,
    pub size: Option<f32>,
}

impl TextSpan {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::empty(),
            color: None,
            size: None,
        }
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributedString {
    spans: SmallVec<[TextSpan; 4]>,
}

impl AttributedString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn span(mut self, span: TextSpan) -> Self {
        if !span.text.is_empty() {
            self.spans.push(span);
        }
        self
    }

    pub fn push(self, text: impl Into<String>) -> Self {
        self.span(TextSpan::new(text))
    }

    pub fn push_styled(self, text: impl Into<String>, style: TextStyle) -> Self {
        self.span(TextSpan::new(text).style(style))
    }

    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }

    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Runs grouped by line. A `\n` inside a span starts a new line.
    pub fn lines(&self) -> Vec<Vec<TextSpan>> {
        let mut lines = vec![Vec::new()];
        for span in &self.spans {
            for (i, part) in span.text.split('\n').enumerate() {
                if i > 0 {
                    lines.push(Vec::new());
                }
                if !part.is_empty() {
                    let mut piece = span.clone();
                    piece.text = part.to_owned();
                    if let Some(line) = lines.last_mut() {
                        line.push(piece);
                    }
                }
            }
        }
        lines
    }
}

impl From<&str> for AttributedString {
    fn from(text: &str) -> Self {
        AttributedString::new().push(text)
    }
}

/// Multi-line label over styled runs, one row per line. Read as a single
/// label by assistive technology.
pub fn AttributedText(text: &AttributedString) -> View {
    let rows: Vec<View> = text
        .lines()
        .into_iter()
        .map(|line| {
            let runs = line.into_iter().map(|span| {
                let mut run = Text(span.text).style(span.style);
                if let Some(c) = span.color {
                    run = run.color(c);
                }
                if let Some(px) = span.size {
                    run = run.size(px);
                }
                run
            });
            Row(Modifier::new()).with_children(runs.collect())
        })
        .collect();
    Column(Modifier::new())
        .with_children(rows)
        .semantics(Semantics::new(Role::Text).label(text.plain()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lines_across_spans() {
        let text = AttributedString::new()
            .push("Total: ")
            .span(TextSpan::new("42\nitems").style(TextStyle::BOLD).color(Color::WHITE))
            .push(" left");
        let lines = text.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[1][0].text, "items");
        assert_eq!(lines[1][0].style, TextStyle::BOLD);

        insta::assert_snapshot!(AttributedText(&text).outline(), @r#"
        Column
          Row
            Text "Total: "
            Text "42"
          Row
            Text "items"
            Text " left"
        "#);
    }

    #[test]
    fn runs_keep_their_style() {
        let text = AttributedString::new()
            .push_styled("Warning", TextStyle::BOLD | TextStyle::UNDERLINE)
            .span(TextSpan::new(" read carefully").size(12.0));
        let v = AttributedText(&text);
        match &v.children[0].children[0].kind {
            ViewKind::Text { style, .. } => {
                assert!(style.contains(TextStyle::UNDERLINE));
            }
            other => panic!("unexpected {other:?}"),
        }
        match &v.children[0].children[1].kind {
            ViewKind::Text { font_size, style, .. } => {
                assert_eq!(*font_size, 12.0);
                assert!(style.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
        let label = v.semantics.as_ref().and_then(|s| s.label.clone());
        assert_eq!(label.as_deref(), Some("Warning read carefully"));
    }

    #[test]
    fn empty_runs_are_dropped() {
        let text = AttributedString::from("").push("x");
        assert_eq!(text.spans().len(), 1);
    }
}
