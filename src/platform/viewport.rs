//! Mapping between screen pixels and the logical pond canvas
//!
//! Mirrors SVG `preserveAspectRatio`: the canvas is scaled to cover or fit
//! the element box (or stretched), then aligned to the top-left or centre.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::canvas::Canvas;

/// How the canvas is scaled into the element box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitMode {
    /// Fill the box, cropping overflow (`slice`)
    #[default]
    Cover,
    /// Show the whole canvas, letterboxing the rest (`meet`)
    Contain,
    /// Scale each axis independently (`none`)
    Stretch,
}

/// Where the scaled canvas sits inside the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    #[default]
    Min,
    Mid,
}

/// A canvas placed in an on-screen box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen box size in CSS pixels
    pub screen: Vec2,
    pub canvas: Canvas,
    pub fit: FitMode,
    pub align: Align,
    /// Screen pixels per logical unit, per axis
    pub scale: Vec2,
    /// Screen position of the canvas origin
    pub offset: Vec2,
}

impl Viewport {
    pub fn new(screen_w: f32, screen_h: f32, canvas: Canvas, fit: FitMode, align: Align) -> Self {
        let screen = Vec2::new(screen_w, screen_h);
        let ratio = screen / canvas.size();
        let scale = match fit {
            FitMode::Cover => Vec2::splat(ratio.x.max(ratio.y)),
            FitMode::Contain => Vec2::splat(ratio.x.min(ratio.y)),
            FitMode::Stretch => ratio,
        };
        let offset = match align {
            Align::Min => Vec2::ZERO,
            Align::Mid => (screen - canvas.size() * scale) / 2.0,
        };
        Self {
            screen,
            canvas,
            fit,
            align,
            scale,
            offset,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.scale.x > 0.0 && self.scale.y > 0.0 && self.scale.is_finite()
    }

    /// Logical position under a screen point, `None` when the point is off
    /// the canvas (letterbox bars, cropped regions) or the box is empty
    pub fn screen_to_logical(&self, p: Vec2) -> Option<Vec2> {
        if !self.is_valid() {
            return None;
        }
        let logical = (p - self.offset) / self.scale;
        self.canvas.contains(logical).then_some(logical)
    }

    pub fn logical_to_screen(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }

    /// Matching SVG `preserveAspectRatio` attribute value
    pub fn preserve_aspect_ratio(fit: FitMode, align: Align) -> &'static str {
        match (fit, align) {
            (FitMode::Stretch, _) => "none",
            (FitMode::Cover, Align::Min) => "xMinYMin slice",
            (FitMode::Cover, Align::Mid) => "xMidYMid slice",
            (FitMode::Contain, Align::Min) => "xMinYMin meet",
            (FitMode::Contain, Align::Mid) => "xMidYMid meet",
        }
    }
}
