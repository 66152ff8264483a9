//! Closed curve outlines for patches, tails and lily pads
//!
//! An outline is a small list of path commands in the shape's local space.
//! It knows nothing about rendering; `renderer::svg` turns it into path data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single path command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo(Vec2, Vec2),
    CubicTo(Vec2, Vec2, Vec2),
    /// Circular arc to a point (radius, large-arc, sweep)
    ArcTo {
        radius: f32,
        large_arc: bool,
        sweep: bool,
        to: Vec2,
    },
    Close,
}

/// A path built from commands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub cmds: Vec<PathCmd>,
}

impl Outline {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn move_to(mut self, p: Vec2) -> Self {
        self.cmds.push(PathCmd::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Vec2) -> Self {
        self.cmds.push(PathCmd::LineTo(p));
        self
    }

    pub fn quad_to(mut self, c: Vec2, p: Vec2) -> Self {
        self.cmds.push(PathCmd::QuadTo(c, p));
        self
    }

    pub fn cubic_to(mut self, c1: Vec2, c2: Vec2, p: Vec2) -> Self {
        self.cmds.push(PathCmd::CubicTo(c1, c2, p));
        self
    }

    pub fn arc_to(mut self, radius: f32, large_arc: bool, sweep: bool, to: Vec2) -> Self {
        self.cmds.push(PathCmd::ArcTo {
            radius,
            large_arc,
            sweep,
            to,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.cmds.last(), Some(PathCmd::Close))
    }

    /// Every point mentioned by the path (end points and control points)
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.cmds.iter().flat_map(|cmd| {
            let pts: Vec<Vec2> = match *cmd {
                PathCmd::MoveTo(p) | PathCmd::LineTo(p) => vec![p],
                PathCmd::QuadTo(c, p) => vec![c, p],
                PathCmd::CubicTo(c1, c2, p) => vec![c1, c2, p],
                PathCmd::ArcTo { to, .. } => vec![to],
                PathCmd::Close => Vec::new(),
            };
            pts
        })
    }

    /// Axis-aligned bounds of the control polygon, `None` for an empty path
    pub fn control_bounds(&self) -> Option<(Vec2, Vec2)> {
        self.points().fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        })
    }
}

/// Smooth closed blob through `points` using Catmull-Rom tangents as cubic controls
pub fn smooth_closed(points: &[Vec2]) -> Outline {
    let n = points.len();
    if n < 3 {
        return Outline::new();
    }
    let mut outline = Outline::new().move_to(points[0]);
    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let p3 = points[(i + 2) % n];
        let c1 = p1 + (p2 - p0) / 6.0;
        let c2 = p2 - (p3 - p1) / 6.0;
        outline = outline.cubic_to(c1, c2, p2);
    }
    outline.close()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_bounds() {
        let o = Outline::new()
            .move_to(Vec2::new(-1.0, 0.0))
            .cubic_to(Vec2::new(0.0, 3.0), Vec2::new(2.0, -1.0), Vec2::new(1.0, 0.0))
            .close();
        assert!(o.is_closed());
        let (min, max) = o.control_bounds().unwrap();
        assert_eq!(min, Vec2::new(-1.0, -1.0));
        assert_eq!(max, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_empty_bounds() {
        assert!(Outline::new().control_bounds().is_none());
    }

    #[test]
    fn test_smooth_closed_passes_through_points() {
        let pts = [
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(-10.0, 0.0),
            Vec2::new(0.0, -10.0),
        ];
        let o = smooth_closed(&pts);
        // move + one cubic per point + close
        assert_eq!(o.cmds.len(), 6);
        assert_eq!(o.cmds[0], PathCmd::MoveTo(pts[0]));
        match o.cmds[4] {
            PathCmd::CubicTo(_, _, end) => assert_eq!(end, pts[0]),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
