//! Fixed timestep simulation tick
//!
//! Advances every clock in the pond by one step: fades, wiggles, swim cycles
//! and lily pad sway.

use glam::Vec2;

use super::state::Scene;
use super::swim::SwimEvent;
use crate::consts::SIM_DT;

/// Input collected between ticks
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Clicks already mapped to canvas coordinates
    pub spawns: Vec<Vec2>,
}

/// Advance the pond by `dt` seconds
pub fn tick(scene: &mut Scene, input: &TickInput, dt: f32) {
    for &pos in &input.spawns {
        scene.spawn_koi_at(pos);
    }

    let canvas = scene.canvas;
    for koi in scene.koi.iter_mut() {
        koi.advance_tweens(dt);

        let Some(swim) = koi.swim.as_mut() else {
            continue;
        };
        if let Some(SwimEvent::Restarted { pose, axis }) =
            swim.advance(&mut koi.pose, dt, canvas, &mut scene.rng)
        {
            if let Some(wiggle) = koi.wiggle.as_mut() {
                wiggle.reset();
            }
            log::debug!(
                "Koi {} restarted {:?} at ({:.0}, {:.0}) heading {:.0}",
                koi.id,
                axis,
                pose.pos.x,
                pose.pos.y,
                pose.heading
            );
        }
    }

    for pad in scene.lily_pads.iter_mut() {
        if let Some(sway) = pad.sway.as_mut() {
            sway.advance(dt);
        }
    }

    scene.time += f64::from(dt);
}

/// Run the pond forward `seconds` in fixed steps. Returns the number of ticks.
pub fn run_for(scene: &mut Scene, seconds: f32) -> u64 {
    let steps = (seconds.max(0.0) / SIM_DT).round() as u64;
    let input = TickInput::default();
    for _ in 0..steps {
        tick(scene, &input, SIM_DT);
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::NodeRef;

    #[test]
    fn test_tick_moves_koi() {
        let mut scene = Scene::new(12345, &Settings::default());
        let before: Vec<_> = scene.koi.iter().map(|k| k.pose).collect();
        run_for(&mut scene, 1.0);
        let moved = scene
            .koi
            .iter()
            .zip(&before)
            .filter(|(k, b)| k.pose.pos != b.pos)
            .count();
        assert_eq!(moved, scene.koi.len());
        assert!((scene.time - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_tick_spawns_from_input() {
        let mut scene = Scene::new(12345, &Settings::default());
        let input = TickInput {
            spawns: vec![Vec2::new(100.0, 100.0), Vec2::new(2000.0, 100.0)],
        };
        tick(&mut scene, &input, SIM_DT);
        assert_eq!(scene.koi.len(), 6);
        let spawned = scene.koi.last().unwrap();
        assert!(spawned.opacity > 0.0 && spawned.opacity < 1.0);
        assert!(scene.stack.contains(&NodeRef::Koi(spawned.id)));
    }

    #[test]
    fn test_restart_resets_wiggle() {
        let mut scene = Scene::new(2, &Settings::default());
        let loop_secs = scene.koi[0]
            .swim
            .as_ref()
            .map(|s| s.loop_duration())
            .unwrap();
        run_for(&mut scene, loop_secs + 0.5);

        let koi = &scene.koi[0];
        let swim = koi.swim.as_ref().unwrap();
        assert!(swim.loops >= 1);
        // The wiggle clock restarted with the loop, it must be behind the sim clock
        let wiggle = koi.wiggle.unwrap();
        assert!(f64::from(wiggle.elapsed) < scene.time - f64::from(loop_secs) + 0.1);
    }

    #[test]
    fn test_same_seed_same_motion() {
        let mut a = Scene::new(77, &Settings::default());
        let mut b = Scene::new(77, &Settings::default());
        run_for(&mut a, 30.0);
        run_for(&mut b, 30.0);
        assert_eq!(a.koi, b.koi);
        assert_eq!(a.lily_pads, b.lily_pads);
    }

    #[test]
    fn test_sway_advances() {
        let mut scene = Scene::new(4, &Settings::default());
        let Some(pad) = scene.lily_pads.first() else {
            return;
        };
        let base = pad.current_rotation();
        run_for(&mut scene, 2.0);
        assert!(scene.lily_pads[0].current_rotation() > base);
    }
}
