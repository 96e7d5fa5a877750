use std::rc::Rc;

use bitflags::bitflags;

use crate::{Color, Size};

#[derive(Clone, Debug, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PaddingValues {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

bitflags! {
    /// Which corners a rounded clip applies to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Corners: u8 {
        const TOP_LEFT = 1 << 0;
        const TOP_RIGHT = 1 << 1;
        const BOTTOM_LEFT = 1 << 2;
        const BOTTOM_RIGHT = 1 << 3;
        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        const BOTTOM = Self::BOTTOM_LEFT.bits() | Self::BOTTOM_RIGHT.bits();
        const ALL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedClip {
    pub radius: f32,
    pub corners: Corners,
}

#[derive(Clone)]
pub struct Modifier {
    pub size: Option<Size>,
    pub fill_max: bool,
    pub padding: Option<f32>,
    pub padding_values: Option<PaddingValues>,
    pub min_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub background: Option<Color>,
    pub border: Option<Border>,
    pub clip: Option<RoundedClip>,
    pub alpha: Option<f32>,
    /// Content drawn as placeholder blocks (skeleton loading).
    pub redacted: bool,
    pub disabled: bool,
    /// When false, pointer input passes through this node.
    pub hit_testing: bool,
    pub on_tap: Option<Rc<dyn Fn()>>,
}

impl std::fmt::Debug for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modifier")
            .field("size", &self.size)
            .field("fill_max", &self.fill_max)
            .field("padding", &self.padding)
            .field("padding_values", &self.padding_values)
            .field("min_width", &self.min_width)
            .field("min_height", &self.min_height)
            .field("max_width", &self.max_width)
            .field("max_height", &self.max_height)
            .field("background", &self.background)
            .field("border", &self.border)
            .field("clip", &self.clip)
            .field("alpha", &self.alpha)
            .field("redacted", &self.redacted)
            .field("disabled", &self.disabled)
            .field("hit_testing", &self.hit_testing)
            .field("on_tap", &self.on_tap.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for Modifier {
    fn default() -> Self {
        Self {
            size: None,
            fill_max: false,
            padding: None,
            padding_values: None,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            background: None,
            border: None,
            clip: None,
            alpha: None,
            redacted: false,
            disabled: false,
            hit_testing: true,
            on_tap: None,
        }
    }
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn size(mut self, w: f32, h: f32) -> Self {
        self.size = Some(Size {
            width: w,
            height: h,
        });
        self
    }
    pub fn fill_max_size(mut self) -> Self {
        self.fill_max = true;
        self
    }
    pub fn padding(mut self, v: f32) -> Self {
        self.padding = Some(v);
        self
    }
    pub fn padding_values(mut self, padding: PaddingValues) -> Self {
        self.padding_values = Some(padding);
        self
    }
    pub fn min_size(mut self, w: f32, h: f32) -> Self {
        self.min_width = Some(w);
        self.min_height = Some(h);
        self
    }
    pub fn max_size(mut self, w: f32, h: f32) -> Self {
        self.max_width = Some(w);
        self.max_height = Some(h);
        self
    }
    pub fn min_width(mut self, w: f32) -> Self {
        self.min_width = Some(w);
        self
    }
    pub fn min_height(mut self, h: f32) -> Self {
        self.min_height = Some(h);
        self
    }
    pub fn max_width(mut self, w: f32) -> Self {
        self.max_width = Some(w);
        self
    }
    pub fn max_height(mut self, h: f32) -> Self {
        self.max_height = Some(h);
        self
    }
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
    pub fn border(mut self, width: f32, color: Color, radius: f32) -> Self {
        self.border = Some(Border {
            width,
            color,
            radius,
        });
        self
    }
    pub fn clip_rounded(self, radius: f32) -> Self {
        self.clip_rounded_corners(radius, Corners::ALL)
    }
    /// Rounds only the selected corners.
    pub fn clip_rounded_corners(mut self, radius: f32, corners: Corners) -> Self {
        self.clip = Some(RoundedClip { radius, corners });
        self
    }
    pub fn alpha(mut self, a: f32) -> Self {
        self.alpha = Some(a.clamp(0.0, 1.0));
        self
    }
    pub fn redacted(mut self, redacted: bool) -> Self {
        self.redacted = redacted;
        self
    }
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
    pub fn hit_testing(mut self, enabled: bool) -> Self {
        self.hit_testing = enabled;
        self
    }
    pub fn on_tap(mut self, f: impl Fn() + 'static) -> Self {
        self.on_tap = Some(Rc::new(f));
        self
    }
}
