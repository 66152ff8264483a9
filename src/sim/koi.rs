//! Koi actors
//!
//! A koi is an explicit record of its parts (body, tail, patches) plus the
//! pose the animation driver mutates. Nothing is rediscovered at render time.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ease::Fade;
use super::outline::Outline;
use super::patch::{Patch, PatternRole, generate_patches, repair_roles, select_roles_capped};
use super::swim::{Pose, SwimCycle};
use super::wiggle::Wiggle;
use crate::consts::{BODY_RX, BODY_RY};
use crate::normalize_degrees;

/// Fade-in duration for koi spawned by a click (seconds)
pub const SPAWN_FADE_SECS: f32 = 0.5;

/// Color scheme of a koi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KoiVariant {
    /// Red patches on white
    #[default]
    Kohaku,
    /// Bronze patches on grey
    Ochiba,
}

impl KoiVariant {
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.8) {
            KoiVariant::Kohaku
        } else {
            KoiVariant::Ochiba
        }
    }

    pub fn body_fill(self) -> &'static str {
        match self {
            KoiVariant::Kohaku => "white",
            KoiVariant::Ochiba => "#c9c5b9",
        }
    }

    pub fn patch_fill(self) -> &'static str {
        match self {
            KoiVariant::Kohaku => "#ff4d4d",
            KoiVariant::Ochiba => "#b5651d",
        }
    }
}

/// How to build a koi
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KoiSpec {
    pub x: f32,
    pub y: f32,
    /// Degrees, 0 = facing +x
    pub heading: f32,
    pub scale: f32,
    /// Upper bound on the number of patches (at least two are always drawn)
    pub patch_count: u32,
}

impl KoiSpec {
    pub const fn new(x: f32, y: f32, heading: f32, scale: f32, patch_count: u32) -> Self {
        Self {
            x,
            y,
            heading,
            scale,
            patch_count,
        }
    }

    /// Fallback fish used when generation produced none
    pub const fn fallback(center: Vec2) -> Self {
        Self::new(center.x, center.y, 0.0, 0.7, 3)
    }

    /// Random fish at `pos`, as spawned by a click
    pub fn random_at(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            heading: rng.random::<f32>() * 360.0,
            scale: 0.4 + rng.random::<f32>() * 0.3,
            patch_count: 2 + rng.random_range(0..3),
        }
    }
}

/// The initial school: one fish entering from each edge, one mid-pond
pub fn default_school() -> Vec<KoiSpec> {
    vec![
        KoiSpec::new(50.0, 200.0, 0.0, 0.7, 3),
        KoiSpec::new(700.0, 550.0, 270.0, 0.6, 2),
        KoiSpec::new(300.0, 50.0, 90.0, 0.5, 4),
        KoiSpec::new(950.0, 350.0, 180.0, 0.65, 3),
        KoiSpec::new(500.0, 300.0, 45.0, 0.55, 2),
    ]
}

/// Forked tail fin, attached at the back of the body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tail {
    /// Attachment point on the body (negative x)
    pub root: f32,
    /// Control point reach behind the root
    pub reach: f32,
    /// Fork tip behind the root
    pub tip: f32,
    /// Control point spread above/below the midline
    pub spread: f32,
}

impl Tail {
    pub fn for_body(rx: f32, ry: f32) -> Self {
        Self {
            root: -rx,
            reach: rx * 0.5,
            tip: rx * 0.3,
            spread: ry,
        }
    }

    /// Tail outline with control points shifted vertically by `swing`
    pub fn outline(&self, swing: f32) -> Outline {
        let root = Vec2::new(self.root, 0.0);
        let back = self.root - self.reach;
        Outline::new()
            .move_to(root)
            .quad_to(
                Vec2::new(back, self.spread + swing),
                Vec2::new(self.root - self.tip, swing * 0.5),
            )
            .quad_to(Vec2::new(back, -self.spread + swing), root)
    }
}

/// Ellipse silhouette that also clips the patches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub rx: f32,
    pub ry: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            rx: BODY_RX,
            ry: BODY_RY,
        }
    }
}

/// An animated fish
#[derive(Debug, Clone, PartialEq)]
pub struct Koi {
    pub id: u32,
    pub pose: Pose,
    pub scale: f32,
    pub variant: KoiVariant,
    pub body: Body,
    pub tail: Option<Tail>,
    pub patches: Vec<Patch>,
    pub opacity: f32,
    pub fade: Option<Fade>,
    /// Active swim cycle; doubles as the "already animated" marker
    pub swim: Option<SwimCycle>,
    pub wiggle: Option<Wiggle>,
}

impl Koi {
    /// Build a koi from a spec. `roles` overrides random pattern selection.
    pub fn new(id: u32, spec: &KoiSpec, roles: Option<&[PatternRole]>, rng: &mut impl Rng) -> Self {
        let body = Body::default();
        let roles = match roles {
            Some(roles) => {
                let mut roles = roles.to_vec();
                repair_roles(&mut roles);
                roles
            }
            None => select_roles_capped(rng, spec.patch_count as usize),
        };
        let patches = generate_patches(body.rx, body.ry, &roles, rng);

        Self {
            id,
            pose: Pose::new(Vec2::new(spec.x, spec.y), normalize_degrees(spec.heading)),
            scale: spec.scale,
            variant: KoiVariant::random(rng),
            body,
            tail: Some(Tail::for_body(body.rx, body.ry)),
            patches,
            opacity: 1.0,
            fade: None,
            swim: None,
            wiggle: None,
        }
    }

    /// Start invisible and fade in
    pub fn with_fade_in(mut self, duration: f32) -> Self {
        self.opacity = 0.0;
        self.fade = Some(Fade::new(duration));
        self
    }

    pub fn is_swimming(&self) -> bool {
        self.swim.is_some()
    }

    pub fn roles(&self) -> Vec<PatternRole> {
        self.patches.iter().map(|p| p.role).collect()
    }

    /// Body semi-minor axis including the wiggle squeeze
    pub fn current_body_ry(&self) -> f32 {
        match &self.wiggle {
            Some(w) => w.body_ry(self.body.ry),
            None => self.body.ry,
        }
    }

    /// Tail outline at the current wiggle phase; `None` for a tailless koi
    pub fn current_tail(&self) -> Option<Outline> {
        let tail = self.tail?;
        let swing = self.wiggle.map(|w| w.tail_swing()).unwrap_or(0.0);
        Some(tail.outline(swing))
    }

    /// Scale of patch `index` at the current wiggle phase
    pub fn current_patch_scale(&self, index: usize) -> f32 {
        self.wiggle.map(|w| w.patch_scale(index)).unwrap_or(1.0)
    }

    /// Advance fade and wiggle clocks
    pub fn advance_tweens(&mut self, dt: f32) {
        if let Some(fade) = &mut self.fade {
            fade.advance(dt);
            self.opacity = fade.value();
            if fade.is_done() {
                self.fade = None;
            }
        }
        if let Some(wiggle) = &mut self.wiggle {
            wiggle.advance(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::outline::PathCmd;
    use crate::sim::patch::is_unbalanced;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_tail_matches_classic_shape() {
        let tail = Tail::for_body(BODY_RX, BODY_RY);
        let outline = tail.outline(0.0);
        assert_eq!(outline.cmds[0], PathCmd::MoveTo(Vec2::new(-50.0, 0.0)));
        assert_eq!(
            outline.cmds[1],
            PathCmd::QuadTo(Vec2::new(-75.0, 25.0), Vec2::new(-65.0, 0.0))
        );
        assert_eq!(
            outline.cmds[2],
            PathCmd::QuadTo(Vec2::new(-75.0, -25.0), Vec2::new(-50.0, 0.0))
        );
    }

    #[test]
    fn test_new_koi_has_balanced_patches() {
        let mut rng = Pcg32::seed_from_u64(1);
        for spec in default_school() {
            let koi = Koi::new(1, &spec, None, &mut rng);
            let roles = koi.roles();
            assert!(roles.len() >= 2);
            assert!(roles.len() <= (spec.patch_count as usize).max(2));
            assert!(!is_unbalanced(&roles));
            assert!(!koi.is_swimming());
        }
    }

    #[test]
    fn test_role_override_is_repaired() {
        let mut rng = Pcg32::seed_from_u64(1);
        let spec = KoiSpec::new(0.0, 0.0, -90.0, 1.0, 4);
        let koi = Koi::new(1, &spec, Some(&[PatternRole::Tail, PatternRole::Belly]), &mut rng);
        assert_eq!(
            koi.roles(),
            vec![PatternRole::Tail, PatternRole::Belly, PatternRole::Back]
        );
        assert!((koi.pose.heading - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_fade_in_reaches_full_opacity() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut koi = Koi::new(1, &KoiSpec::fallback(Vec2::new(500.0, 300.0)), None, &mut rng)
            .with_fade_in(SPAWN_FADE_SECS);
        assert_eq!(koi.opacity, 0.0);
        for _ in 0..40 {
            koi.advance_tweens(1.0 / 60.0);
        }
        assert_eq!(koi.opacity, 1.0);
        assert!(koi.fade.is_none());
    }

    #[test]
    fn test_tailless_koi_still_squeezes() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut koi = Koi::new(1, &KoiSpec::fallback(Vec2::ZERO), None, &mut rng);
        koi.tail = None;
        koi.wiggle = Some(Wiggle::new());
        koi.advance_tweens(0.8);
        assert!(koi.current_tail().is_none());
        assert!(koi.current_body_ry() < BODY_RY);
    }

    #[test]
    fn test_random_spec_ranges() {
        let mut rng = Pcg32::seed_from_u64(8);
        for _ in 0..100 {
            let spec = KoiSpec::random_at(Vec2::new(10.0, 20.0), &mut rng);
            assert_eq!((spec.x, spec.y), (10.0, 20.0));
            assert!((0.0..360.0).contains(&spec.heading));
            assert!((0.4..0.7).contains(&spec.scale));
            assert!((2..=4).contains(&spec.patch_count));
        }
    }
}
