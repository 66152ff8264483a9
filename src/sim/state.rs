//! Pond scene state
//!
//! The scene owns every koi and lily pad plus the render stack. Generation
//! happens once in `Scene::new`; afterwards the only structural change is a
//! spawned koi being inserted below the pads.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::canvas::Canvas;
use super::koi::{Koi, KoiSpec, SPAWN_FADE_SECS};
use super::lily::{LilyPad, Sway, place_discs};
use super::patch::PatternRole;
use super::swim::{SwimCycle, SwimParams};
use super::wiggle::Wiggle;
use crate::settings::Settings;

/// Entry in the render stack (bottom first)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Koi(u32),
    LilyPad(u32),
}

/// Complete pond state
#[derive(Debug, Clone)]
pub struct Scene {
    /// Seed the scene was generated from
    pub seed: u64,
    pub canvas: Canvas,
    /// Koi in creation order (ascending id)
    pub koi: Vec<Koi>,
    pub lily_pads: Vec<LilyPad>,
    /// Draw order; every koi sits below every lily pad
    pub stack: Vec<NodeRef>,
    /// Seconds simulated so far
    pub time: f64,
    pub swim_params: SwimParams,
    /// Fixed pattern roles for every koi instead of random selection
    pub roles: Option<Vec<PatternRole>>,
    /// Disables wiggle and sway
    pub reduced_motion: bool,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl Scene {
    /// Generate a pond from `seed`: place pads, create the initial school and
    /// start every animation
    pub fn new(seed: u64, settings: &Settings) -> Self {
        let mut scene = Self {
            seed,
            canvas: settings.canvas(),
            koi: Vec::new(),
            lily_pads: Vec::new(),
            stack: Vec::new(),
            time: 0.0,
            swim_params: settings.swim_params(),
            roles: settings.pattern_roles(),
            reduced_motion: settings.reduced_motion,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        let target = settings.lily_target(&mut scene.rng);
        let placements = place_discs(&scene.canvas, &settings.placement, target, &mut scene.rng);

        for spec in &settings.initial_koi {
            scene.add_koi(spec);
        }
        if scene.koi.is_empty() {
            log::warn!("No koi generated, adding a fallback koi");
            let spec = KoiSpec::fallback(scene.canvas.center());
            scene.add_koi(&spec);
        }

        for placement in &placements {
            let id = scene.next_entity_id();
            let mut pad = LilyPad::from_placement(id, placement, &mut scene.rng);
            if !scene.reduced_motion {
                pad.sway = Some(Sway::random(&mut scene.rng));
            }
            scene.lily_pads.push(pad);
            scene.stack.push(NodeRef::LilyPad(id));
        }

        let ids: Vec<u32> = scene.koi.iter().map(|k| k.id).collect();
        for id in ids {
            scene.activate_swim(id);
        }

        log::info!(
            "Pond generated: seed={} koi={} lily_pads={}",
            seed,
            scene.koi.len(),
            scene.lily_pads.len()
        );
        scene
    }

    /// Generate a pond from a random seed
    pub fn from_entropy(settings: &Settings) -> Self {
        Self::new(rand::random(), settings)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a koi and put it below the lily pads. Does not start swimming.
    pub fn add_koi(&mut self, spec: &KoiSpec) -> u32 {
        let id = self.next_entity_id();
        let koi = Koi::new(id, spec, self.roles.as_deref(), &mut self.rng);
        self.insert_koi(koi);
        id
    }

    fn insert_koi(&mut self, koi: Koi) {
        let at = self
            .stack
            .iter()
            .position(|n| matches!(n, NodeRef::LilyPad(_)))
            .unwrap_or(self.stack.len());
        self.stack.insert(at, NodeRef::Koi(koi.id));
        self.koi.push(koi);
    }

    /// Spawn a random koi at a canvas position. It fades in and starts
    /// swimming right away. Points outside the canvas are ignored.
    pub fn spawn_koi_at(&mut self, pos: Vec2) -> Option<u32> {
        if !self.canvas.contains(pos) {
            log::debug!("Ignoring spawn outside the pond at {pos}");
            return None;
        }
        let spec = KoiSpec::random_at(pos, &mut self.rng);
        let id = self.next_entity_id();
        let koi = Koi::new(id, &spec, self.roles.as_deref(), &mut self.rng)
            .with_fade_in(SPAWN_FADE_SECS);
        self.insert_koi(koi);
        self.activate_swim(id);
        log::info!("Spawned koi {id} at ({:.0}, {:.0})", pos.x, pos.y);
        Some(id)
    }

    /// Start the swim cycle (and wiggle) of a koi. Returns false when the koi
    /// is unknown or already swimming.
    pub fn activate_swim(&mut self, id: u32) -> bool {
        let Some(koi) = self.koi.iter_mut().find(|k| k.id == id) else {
            return false;
        };
        if koi.swim.is_some() {
            return false;
        }
        koi.swim = Some(SwimCycle::start(
            koi.pose,
            self.canvas,
            self.swim_params,
            &mut self.rng,
        ));
        if !self.reduced_motion {
            if koi.tail.is_none() {
                log::debug!("Koi {id} has no tail, only the body will wiggle");
            }
            koi.wiggle = Some(Wiggle::new());
        }
        true
    }

    pub fn koi(&self, id: u32) -> Option<&Koi> {
        self.koi.iter().find(|k| k.id == id)
    }

    pub fn lily_pad(&self, id: u32) -> Option<&LilyPad> {
        self.lily_pads.iter().find(|p| p.id == id)
    }

    /// Number of active swim cycles
    pub fn swimming_count(&self) -> usize {
        self.koi.iter().filter(|k| k.is_swimming()).count()
    }
}
