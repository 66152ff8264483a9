//! Lily pads: shapes, palette and non-overlapping placement
//!
//! Placement is rejection sampling. Each pad gets a fixed budget of position
//! draws; every pad that exhausts it burns one global attempt, and once half
//! the global budget is gone the target count shrinks toward a floor. A
//! crowded pond ends up with fewer pads instead of looping forever.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::canvas::Canvas;
use super::ease::Oscillator;
use super::outline::{Outline, smooth_closed};
use crate::consts::LILY_BASE_RADIUS;

/// Pad fill colors
pub const LILY_PALETTE: [&str; 17] = [
    "#f3722c", // orange
    "#f8961e", // light orange
    "#f9c74f", // yellow
    "#90be6d", // light green
    "#43aa8b", // teal
    "#4d908e", // dark teal
    "#577590", // blue
    "#277da1", // dark blue
    "#9d4edd", // purple
    "#ff9f1c", // orange
    "#ffbf69", // light orange
    "#2ec4b6", // turquoise
    "#ff595e", // coral
    "#ffca3a", // yellow
    "#8ac926", // green
    "#1982c4", // blue
    "#6a4c93", // purple
];

/// Tunables for the placement loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Outline radius before scaling
    pub base_radius: f32,
    pub base_scale: f32,
    pub scale_variation: f32,
    /// Extra clearance between neighbouring pads
    pub buffer: f32,
    /// Failed pads allowed before giving up
    pub max_attempts: u32,
    /// Position draws per pad
    pub max_position_attempts: u32,
    /// The target count never shrinks below this
    pub min_count: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            base_radius: LILY_BASE_RADIUS,
            base_scale: 0.8,
            scale_variation: 0.3,
            buffer: 40.0,
            max_attempts: 300,
            max_position_attempts: 50,
            min_count: 5,
        }
    }
}

/// An accepted disc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    pub scale: f32,
    /// Bounding radius after scaling
    pub radius: f32,
}

/// True when a disc at `pos` clears the canvas edge and every placed disc
pub fn fits(
    canvas: &Canvas,
    placed: &[Placement],
    pos: Vec2,
    radius: f32,
    buffer: f32,
) -> bool {
    canvas.contains_circle(pos, radius)
        && placed
            .iter()
            .all(|other| pos.distance(other.pos) >= radius + other.radius + buffer)
}

/// Place up to `target` non-overlapping discs
pub fn place_discs(
    canvas: &Canvas,
    config: &PlacementConfig,
    target: u32,
    rng: &mut impl Rng,
) -> Vec<Placement> {
    let mut target = target;
    let mut placed: Vec<Placement> = Vec::with_capacity(target as usize);
    let mut attempts = 0u32;

    let margin = config.base_radius;
    let span = (canvas.size() - Vec2::splat(margin * 2.0)).max(Vec2::ZERO);

    while (placed.len() as u32) < target && attempts < config.max_attempts {
        let scale = config.base_scale + rng.random::<f32>() * config.scale_variation;
        let radius = config.base_radius * scale;

        let mut found = None;
        for _ in 0..config.max_position_attempts {
            let pos = Vec2::new(
                margin + rng.random::<f32>() * span.x,
                margin + rng.random::<f32>() * span.y,
            );
            if fits(canvas, &placed, pos, radius, config.buffer) {
                found = Some(pos);
                break;
            }
        }

        match found {
            Some(pos) => placed.push(Placement { pos, scale, radius }),
            None => {
                attempts += 1;
                if attempts > config.max_attempts / 2 && target > config.min_count {
                    target -= 1;
                    log::debug!("Reducing lily pad count to avoid overcrowding: {}", target);
                }
            }
        }
    }

    if (placed.len() as u32) < target {
        log::info!(
            "Placed {} of {} lily pads before the attempt budget ran out",
            placed.len(),
            target
        );
    }

    placed
}

/// Silhouette of a pad, in unscaled local space
#[derive(Debug, Clone, PartialEq)]
pub enum LilyShape {
    Circle,
    /// Ellipse with ry = base * aspect (aspect <= 1 keeps it inside the bound)
    Oval { aspect: f32 },
    Blob { outline: Outline },
    RoundedRect { half: Vec2, corner: f32 },
    /// Circle with a wedge notch cut to the center
    BittenCircle { notch_angle: f32, notch_width: f32 },
}

impl LilyShape {
    /// Pick a random shape variant
    pub fn random(rng: &mut impl Rng) -> Self {
        let r = LILY_BASE_RADIUS;
        let roll = rng.random::<f32>();
        if roll < 0.3 {
            LilyShape::Circle
        } else if roll < 0.55 {
            LilyShape::Oval {
                aspect: 0.85 + rng.random::<f32>() * 0.15,
            }
        } else if roll < 0.7 {
            let lobes = 7 + rng.random_range(0..3);
            let points: Vec<Vec2> = (0..lobes)
                .map(|i| {
                    let jitter = (rng.random::<f32>() - 0.5) * 0.3;
                    let theta = (i as f32 + jitter) / lobes as f32 * TAU;
                    let radius = r * (0.78 + rng.random::<f32>() * 0.14);
                    Vec2::new(theta.cos(), theta.sin()) * radius
                })
                .collect();
            LilyShape::Blob {
                outline: smooth_closed(&points),
            }
        } else if roll < 0.8 {
            let aspect = 0.8 + rng.random::<f32>() * 0.2;
            LilyShape::RoundedRect {
                half: Vec2::new(r * 0.7, r * 0.7 * aspect),
                corner: r * 0.25,
            }
        } else {
            LilyShape::BittenCircle {
                notch_angle: rng.random::<f32>() * 360.0,
                notch_width: 20.0 + rng.random::<f32>() * 20.0,
            }
        }
    }

    /// Path outline for shapes that are not plain circles or ellipses
    pub fn outline(&self) -> Option<Outline> {
        let r = LILY_BASE_RADIUS;
        match self {
            LilyShape::Circle | LilyShape::Oval { .. } => None,
            LilyShape::Blob { outline } => Some(outline.clone()),
            LilyShape::RoundedRect { half, corner } => {
                let (hx, hy, c) = (half.x, half.y, corner.min(half.x).min(half.y));
                Some(
                    Outline::new()
                        .move_to(Vec2::new(-hx + c, -hy))
                        .line_to(Vec2::new(hx - c, -hy))
                        .arc_to(c, false, true, Vec2::new(hx, -hy + c))
                        .line_to(Vec2::new(hx, hy - c))
                        .arc_to(c, false, true, Vec2::new(hx - c, hy))
                        .line_to(Vec2::new(-hx + c, hy))
                        .arc_to(c, false, true, Vec2::new(-hx, hy - c))
                        .line_to(Vec2::new(-hx, -hy + c))
                        .arc_to(c, false, true, Vec2::new(-hx + c, -hy))
                        .close(),
                )
            }
            LilyShape::BittenCircle {
                notch_angle,
                notch_width,
            } => {
                let a0 = (notch_angle + notch_width / 2.0).to_radians();
                let a1 = (notch_angle - notch_width / 2.0).to_radians();
                Some(
                    Outline::new()
                        .move_to(Vec2::ZERO)
                        .line_to(Vec2::new(a0.cos(), a0.sin()) * r)
                        .arc_to(r, true, true, Vec2::new(a1.cos(), a1.sin()) * r)
                        .close(),
                )
            }
        }
    }
}

/// Gentle back-and-forth rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sway {
    pub elapsed: f32,
    pub osc: Oscillator,
}

impl Sway {
    /// 2-5 degrees over 5-8 seconds
    pub fn random(rng: &mut impl Rng) -> Self {
        let amount = 2.0 + rng.random::<f32>() * 3.0;
        let duration = 5.0 + rng.random::<f32>() * 3.0;
        Self {
            elapsed: 0.0,
            osc: Oscillator::new(0.0, amount, duration),
        }
    }

    /// Wraps at one full swing so the clock never loses precision
    pub fn advance(&mut self, dt: f32) {
        let period = 2.0 * self.osc.duration;
        self.elapsed += dt;
        if period > 0.0 {
            self.elapsed = self.elapsed.rem_euclid(period);
        }
    }

    pub fn offset(&self) -> f32 {
        self.osc.sample(self.elapsed)
    }
}

/// A decorative floating pad
#[derive(Debug, Clone, PartialEq)]
pub struct LilyPad {
    pub id: u32,
    pub pos: Vec2,
    /// Base rotation in degrees
    pub rotation: f32,
    pub scale: f32,
    pub shape: LilyShape,
    pub color: &'static str,
    pub sway: Option<Sway>,
}

impl LilyPad {
    /// Dress an accepted placement with rotation, shape and color
    pub fn from_placement(id: u32, placement: &Placement, rng: &mut impl Rng) -> Self {
        let rotation = rng.random::<f32>() * 360.0;
        let shape = LilyShape::random(rng);
        let color = LILY_PALETTE[rng.random_range(0..LILY_PALETTE.len())];
        Self {
            id,
            pos: placement.pos,
            rotation,
            scale: placement.scale,
            shape,
            color,
            sway: None,
        }
    }

    /// Bounding radius in canvas units
    pub fn radius(&self) -> f32 {
        LILY_BASE_RADIUS * self.scale
    }

    /// Rotation including the current sway
    pub fn current_rotation(&self) -> f32 {
        self.rotation + self.sway.map(|s| s.offset()).unwrap_or(0.0)
    }
}
