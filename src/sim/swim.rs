//! Per-koi swim cycle
//!
//! A koi crosses the canvas along one primary axis through a list of eased
//! waypoints, then teleports back to the edge it came from and plans a fresh
//! path. `SwimCycle::advance` is the whole state machine; the caller owns the
//! clock.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::canvas::Canvas;
use super::ease::Ease;
use crate::consts::EDGE_MARGIN;
use crate::{heading_vector, normalize_degrees, shortest_degrees};

/// Position and heading of a koi in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub pos: Vec2,
    /// Degrees in [0, 360), 0 = facing +x
    pub heading: f32,
}

impl Pose {
    pub fn new(pos: Vec2, heading: f32) -> Self {
        Self {
            pos,
            heading: normalize_degrees(heading),
        }
    }

    /// Interpolate toward `to`, turning through the shortest arc
    pub fn lerp(&self, to: &Pose, t: f32) -> Pose {
        let turn = shortest_degrees(self.heading, to.heading);
        Pose::new(self.pos.lerp(to.pos, t), self.heading + turn * t)
    }
}

/// Which canvas axis a swim path mostly follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwimAxis {
    Horizontal,
    Vertical,
}

impl SwimAxis {
    /// Headings within 45 degrees of 0/180 swim horizontally
    pub fn classify(heading: f32) -> Self {
        let h = heading.rem_euclid(180.0);
        if !(45.0..=135.0).contains(&h) {
            SwimAxis::Horizontal
        } else {
            SwimAxis::Vertical
        }
    }
}

/// Tunables for path synthesis and loop restarts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimParams {
    pub waypoint_count: usize,
    /// Peak lateral offset of the S-curve
    pub amplitude: f32,
    /// Progress after which the koi starts turning toward the edge
    pub turn_start: f32,
    pub max_turn: f32,
    /// Limit on the heading wobble that follows the S-curve
    pub max_wobble: f32,
    pub pause_chance: f64,
    pub pause_secs: (f32, f32),
    pub cruise_secs: (f32, f32),
    pub margin: f32,
    /// Random heading offset applied on restart (degrees, either side)
    pub restart_jitter: f32,
}

impl Default for SwimParams {
    fn default() -> Self {
        Self {
            waypoint_count: 10,
            amplitude: 120.0,
            turn_start: 0.7,
            max_turn: 90.0,
            max_wobble: 15.0,
            pause_chance: 0.2,
            pause_secs: (8.0, 12.0),
            cruise_secs: (4.0, 6.0),
            margin: EDGE_MARGIN,
            restart_jitter: 30.0,
        }
    }
}

impl SwimParams {
    /// Jitter stays under 45 degrees so a restart never flips the swim axis
    pub fn jitter(&self) -> f32 {
        self.restart_jitter.clamp(0.0, 44.0)
    }
}

/// One stop on a swim path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub pose: Pose,
    /// Seconds to travel here from the previous stop
    pub duration: f32,
    pub ease: Ease,
    pub pause: bool,
}

fn uniform(rng: &mut impl Rng, (lo, hi): (f32, f32)) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

/// Usable range along one axis after the margin. Collapses to the middle
/// when the canvas is narrower than two margins.
fn inset(extent: f32, margin: f32) -> (f32, f32) {
    let lo = margin.min(extent / 2.0);
    (lo, (extent - margin).max(lo))
}

/// Plan one crossing of the canvas starting at `start`
pub fn plan_waypoints(
    start: Pose,
    canvas: Canvas,
    params: &SwimParams,
    rng: &mut impl Rng,
) -> Vec<Waypoint> {
    let axis = SwimAxis::classify(start.heading);
    let facing = heading_vector(start.heading);
    let (dir, extent, cross_extent, start_main, start_cross) = match axis {
        SwimAxis::Horizontal => (
            facing.x,
            canvas.width,
            canvas.height,
            start.pos.x,
            start.pos.y,
        ),
        SwimAxis::Vertical => (
            facing.y,
            canvas.height,
            canvas.width,
            start.pos.y,
            start.pos.x,
        ),
    };
    let dir = if dir > 0.0 { 1.0 } else { -1.0 };
    // Turn away from the nearer cross-axis wall
    let side = if start_cross > cross_extent / 2.0 { -1.0 } else { 1.0 };
    let (main_lo, main_hi) = inset(extent, params.margin);
    let (cross_lo, cross_hi) = inset(cross_extent, params.margin);
    let n = params.waypoint_count.max(1);

    (0..n)
        .map(|i| {
            let progress = (i + 1) as f32 / n as f32;
            let lateral = (progress * PI).sin() * params.amplitude;
            let main = (start_main + dir * progress * extent).clamp(main_lo, main_hi);
            let cross = (start_cross + lateral).clamp(cross_lo, cross_hi);

            let turn = if progress > params.turn_start {
                let t = (progress - params.turn_start) / (1.0 - params.turn_start);
                side * t * t * params.max_turn
            } else {
                (lateral / 8.0).clamp(-params.max_wobble, params.max_wobble)
            };

            let pos = match axis {
                SwimAxis::Horizontal => Vec2::new(main, cross),
                SwimAxis::Vertical => Vec2::new(cross, main),
            };
            let pause = i > 0 && i < n - 1 && rng.random_bool(params.pause_chance);
            let duration = if pause {
                uniform(rng, params.pause_secs)
            } else {
                uniform(rng, params.cruise_secs)
            };
            let ease = if i % 2 == 0 {
                Ease::SineInOut
            } else {
                Ease::QuadInOut
            };

            Waypoint {
                pose: Pose::new(pos, start.heading + turn),
                duration,
                ease,
                pause,
            }
        })
        .collect()
}

/// Where a koi reappears after finishing a crossing that ended at `last`
pub fn restart_pose(
    axis: SwimAxis,
    last: Vec2,
    canvas: Canvas,
    params: &SwimParams,
    rng: &mut impl Rng,
) -> Pose {
    let (x_lo, x_hi) = inset(canvas.width, params.margin);
    let (y_lo, y_hi) = inset(canvas.height, params.margin);
    let center = canvas.center();
    let jitter = params.jitter();
    let jitter = if jitter > 0.0 {
        rng.random_range(-jitter..=jitter)
    } else {
        0.0
    };

    match axis {
        SwimAxis::Horizontal => {
            let (x, heading) = if last.x > center.x {
                (x_lo, 0.0)
            } else {
                (x_hi, 180.0)
            };
            let y = uniform(rng, (y_lo, y_hi));
            Pose::new(Vec2::new(x, y), heading + jitter)
        }
        SwimAxis::Vertical => {
            let (y, heading) = if last.y > center.y {
                (y_lo, 90.0)
            } else {
                (y_hi, 270.0)
            };
            let x = uniform(rng, (x_lo, x_hi));
            Pose::new(Vec2::new(x, y), heading + jitter)
        }
    }
}

/// Emitted by `SwimCycle::advance` when a crossing completes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwimEvent {
    Restarted { pose: Pose, axis: SwimAxis },
}

/// Cruising state of an active koi
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimCycle {
    pub axis: SwimAxis,
    pub waypoints: Vec<Waypoint>,
    /// Waypoint currently being approached
    pub index: usize,
    /// Seconds spent on the current segment
    pub elapsed: f32,
    /// Pose at the start of the current segment
    pub from: Pose,
    pub loops: u32,
    pub params: SwimParams,
}

impl SwimCycle {
    pub fn start(pose: Pose, canvas: Canvas, params: SwimParams, rng: &mut impl Rng) -> Self {
        Self {
            axis: SwimAxis::classify(pose.heading),
            waypoints: plan_waypoints(pose, canvas, &params, rng),
            index: 0,
            elapsed: 0.0,
            from: pose,
            loops: 0,
            params,
        }
    }

    /// Seconds for one full crossing
    pub fn loop_duration(&self) -> f32 {
        self.waypoints.iter().map(|w| w.duration).sum()
    }

    /// Advance the cycle by `dt`, writing the new pose. Time left over at the
    /// end of a segment carries into the next one.
    pub fn advance(
        &mut self,
        pose: &mut Pose,
        dt: f32,
        canvas: Canvas,
        rng: &mut impl Rng,
    ) -> Option<SwimEvent> {
        if !(dt.is_finite() && dt > 0.0) {
            return None;
        }
        let mut remaining = dt;
        let mut event = None;

        loop {
            let Some(target) = self.waypoints.get(self.index).copied() else {
                // Empty path: plan one from where we are
                self.replan(*pose, canvas, rng);
                if self.waypoints.is_empty() {
                    return event;
                }
                continue;
            };

            let left = target.duration - self.elapsed;
            if remaining < left {
                self.elapsed += remaining;
                let t = target.ease.apply(self.elapsed / target.duration);
                *pose = self.from.lerp(&target.pose, t);
                return event;
            }

            remaining -= left.max(0.0);
            *pose = target.pose;
            self.from = target.pose;
            self.elapsed = 0.0;
            self.index += 1;

            if self.index >= self.waypoints.len() {
                let next = restart_pose(self.axis, target.pose.pos, canvas, &self.params, rng);
                *pose = next;
                self.replan(next, canvas, rng);
                self.loops += 1;
                event = Some(SwimEvent::Restarted {
                    pose: next,
                    axis: self.axis,
                });
            }
        }
    }

    fn replan(&mut self, pose: Pose, canvas: Canvas, rng: &mut impl Rng) {
        self.axis = SwimAxis::classify(pose.heading);
        self.waypoints = plan_waypoints(pose, canvas, &self.params, rng);
        self.index = 0;
        self.elapsed = 0.0;
        self.from = pose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_classify_axis() {
        assert_eq!(SwimAxis::classify(0.0), SwimAxis::Horizontal);
        assert_eq!(SwimAxis::classify(180.0), SwimAxis::Horizontal);
        assert_eq!(SwimAxis::classify(150.0), SwimAxis::Horizontal);
        assert_eq!(SwimAxis::classify(44.0), SwimAxis::Horizontal);
        assert_eq!(SwimAxis::classify(90.0), SwimAxis::Vertical);
        assert_eq!(SwimAxis::classify(270.0), SwimAxis::Vertical);
        assert_eq!(SwimAxis::classify(45.0), SwimAxis::Vertical);
        assert_eq!(SwimAxis::classify(-90.0), SwimAxis::Vertical);
    }

    #[test]
    fn test_narrow_canvas_keeps_path_centered() {
        let mut rng = Pcg32::seed_from_u64(9);
        let canvas = Canvas::new(400.0, 80.0);
        let params = SwimParams::default();
        let start = Pose::new(Vec2::new(200.0, 40.0), 0.0);
        let path = plan_waypoints(start, canvas, &params, &mut rng);
        assert!(path.iter().all(|w| w.pose.pos.y == 40.0));
        assert_eq!(path[path.len() - 1].pose.pos.x, 350.0);

        let pose = restart_pose(SwimAxis::Vertical, Vec2::new(200.0, 10.0), canvas, &params, &mut rng);
        assert_eq!(pose.pos.y, 40.0);
        assert!((50.0..=350.0).contains(&pose.pos.x));
    }

    #[test]
    fn test_plan_has_ten_stops_and_reaches_far_edge() {
        let mut rng = Pcg32::seed_from_u64(3);
        let start = Pose::new(Vec2::new(50.0, 200.0), 0.0);
        let path = plan_waypoints(start, Canvas::default(), &SwimParams::default(), &mut rng);
        assert_eq!(path.len(), 10);
        assert_eq!(path[9].pose.pos.x, 950.0);
        assert!(!path[0].pause);
        assert!(!path[9].pause);
        for (i, w) in path.iter().enumerate() {
            let expected = if i % 2 == 0 { Ease::SineInOut } else { Ease::QuadInOut };
            assert_eq!(w.ease, expected);
            if w.pause {
                assert!((8.0..=12.0).contains(&w.duration));
            } else {
                assert!((4.0..=6.0).contains(&w.duration));
            }
            assert!((50.0..=550.0).contains(&w.pose.pos.y));
        }
    }

    #[test]
    fn test_turn_eases_in() {
        let mut rng = Pcg32::seed_from_u64(3);
        // Top half: turn toward +90
        let start = Pose::new(Vec2::new(50.0, 200.0), 0.0);
        let path = plan_waypoints(start, Canvas::default(), &SwimParams::default(), &mut rng);
        let turns: Vec<f32> = path[7..]
            .iter()
            .map(|w| shortest_degrees(0.0, w.pose.heading))
            .collect();
        assert!(turns[0] > 0.0 && turns[0] < turns[1] && turns[1] < turns[2]);
        assert!((turns[2] - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_swimmer_moves_down() {
        let mut rng = Pcg32::seed_from_u64(9);
        let start = Pose::new(Vec2::new(300.0, 50.0), 90.0);
        let path = plan_waypoints(start, Canvas::default(), &SwimParams::default(), &mut rng);
        assert!(path.windows(2).all(|w| w[0].pose.pos.y <= w[1].pose.pos.y));
        assert_eq!(path[9].pose.pos.y, 550.0);
    }

    #[test]
    fn test_pose_lerp_takes_short_way() {
        let a = Pose::new(Vec2::ZERO, 350.0);
        let b = Pose::new(Vec2::new(10.0, 0.0), 10.0);
        let mid = a.lerp(&b, 0.5);
        assert!(mid.heading.abs() < 1e-3 || (mid.heading - 360.0).abs() < 1e-3);
        assert_eq!(mid.pos, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_full_loop_restarts_on_opposite_edge() {
        let mut rng = Pcg32::seed_from_u64(11);
        let canvas = Canvas::default();
        let mut pose = Pose::new(Vec2::new(50.0, 200.0), 0.0);
        let mut cycle = SwimCycle::start(pose, canvas, SwimParams::default(), &mut rng);
        let total = cycle.loop_duration();

        let event = cycle.advance(&mut pose, total + 1e-3, canvas, &mut rng);
        let Some(SwimEvent::Restarted { pose: restarted, axis }) = event else {
            panic!("expected a restart, got {event:?}");
        };
        assert_eq!(axis, SwimAxis::Horizontal);
        assert_eq!(restarted.pos.x, 50.0);
        assert!((50.0..=550.0).contains(&restarted.pos.y));
        assert!(shortest_degrees(0.0, restarted.heading).abs() <= 30.0 + 1e-3);
        assert_eq!(cycle.loops, 1);
        assert_eq!(cycle.index, 0);
        assert_eq!(cycle.waypoints.len(), 10);
    }

    #[test]
    fn test_segment_progress_and_carry_over() {
        let mut rng = Pcg32::seed_from_u64(5);
        let canvas = Canvas::default();
        let mut pose = Pose::new(Vec2::new(950.0, 350.0), 180.0);
        let mut cycle = SwimCycle::start(pose, canvas, SwimParams::default(), &mut rng);
        let first = cycle.waypoints[0].duration;
        let second = cycle.waypoints[1].duration;

        assert!(cycle.advance(&mut pose, first * 0.5, canvas, &mut rng).is_none());
        assert_eq!(cycle.index, 0);
        assert!(pose.pos.x < 950.0 && pose.pos.x > 850.0);

        // Finish the first segment and run a quarter into the second
        cycle.advance(&mut pose, first * 0.5 + second * 0.25, canvas, &mut rng);
        assert_eq!(cycle.index, 1);
        assert!((cycle.elapsed - second * 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let mut rng = Pcg32::seed_from_u64(5);
        let canvas = Canvas::default();
        let mut pose = Pose::new(Vec2::new(500.0, 300.0), 45.0);
        let mut cycle = SwimCycle::start(pose, canvas, SwimParams::default(), &mut rng);
        let before = cycle.clone();
        assert!(cycle.advance(&mut pose, f32::NAN, canvas, &mut rng).is_none());
        assert!(cycle.advance(&mut pose, -1.0, canvas, &mut rng).is_none());
        assert_eq!(cycle, before);
    }

    #[test]
    fn test_jitter_never_flips_axis() {
        let params = SwimParams {
            restart_jitter: 80.0,
            ..SwimParams::default()
        };
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..200 {
            let p = restart_pose(
                SwimAxis::Vertical,
                Vec2::new(400.0, 550.0),
                Canvas::default(),
                &params,
                &mut rng,
            );
            assert_eq!(p.pos.y, 50.0);
            assert_eq!(SwimAxis::classify(p.heading), SwimAxis::Vertical);
        }
    }

    proptest! {
        #[test]
        fn prop_restart_faces_inward(
            seed in any::<u64>(),
            x in 0.0f32..1000.0,
            y in 0.0f32..600.0,
            heading in 0.0f32..360.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let canvas = Canvas::default();
            let mut pose = Pose::new(Vec2::new(x, y), heading);
            let mut cycle = SwimCycle::start(pose, canvas, SwimParams::default(), &mut rng);
            let axis = cycle.axis;
            let last = cycle.waypoints[cycle.waypoints.len() - 1].pose.pos;
            let total = cycle.loop_duration();

            let event = cycle.advance(&mut pose, total + 1e-2, canvas, &mut rng);
            let restarted = matches!(event, Some(SwimEvent::Restarted { .. }));
            prop_assert!(restarted);
            if let Some(SwimEvent::Restarted { pose: p, .. }) = event {
                let (inward, edge) = match axis {
                    SwimAxis::Horizontal if last.x > 500.0 => (0.0, p.pos.x == 50.0),
                    SwimAxis::Horizontal => (180.0, p.pos.x == 950.0),
                    SwimAxis::Vertical if last.y > 300.0 => (90.0, p.pos.y == 50.0),
                    SwimAxis::Vertical => (270.0, p.pos.y == 550.0),
                };
                prop_assert!(edge);
                prop_assert!(shortest_degrees(inward, p.heading).abs() <= 30.0 + 1e-3);
            }
        }
    }
}
