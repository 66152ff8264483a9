//! Kohaku-style color patches
//!
//! Each pattern role owns a placement zone on the body. Roles are sampled
//! independently, then repaired so the result always looks balanced:
//! - at least two roles
//! - never a lone tail + belly pair
//!
//! Outlines are expressed in the body's local space (head toward +x) and may
//! poke outside the body ellipse. The renderer clips them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::outline::Outline;

/// Placement zone of a patch on the koi body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternRole {
    Head,
    Back,
    Tail,
    Belly,
}

impl PatternRole {
    /// All roles in sampling order
    pub const ALL: [PatternRole; 4] = [
        PatternRole::Head,
        PatternRole::Back,
        PatternRole::Tail,
        PatternRole::Belly,
    ];

    /// Independent inclusion probability
    pub fn chance(self) -> f32 {
        match self {
            PatternRole::Head => 0.4,
            PatternRole::Back => 0.9,
            PatternRole::Tail => 0.6,
            PatternRole::Belly => 0.4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatternRole::Head => "head",
            PatternRole::Back => "back",
            PatternRole::Tail => "tail",
            PatternRole::Belly => "belly",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "head" | "headpatch" => Some(PatternRole::Head),
            "back" | "backpatch" => Some(PatternRole::Back),
            "tail" | "tailpatch" => Some(PatternRole::Tail),
            "belly" | "bellypatch" => Some(PatternRole::Belly),
            _ => None,
        }
    }

    /// Rank used when trimming to a patch budget (lower survives longer)
    fn keep_rank(self) -> u8 {
        match self {
            PatternRole::Back => 0,
            PatternRole::Head => 1,
            PatternRole::Tail => 2,
            PatternRole::Belly => 3,
        }
    }
}

/// A colored marking on a koi body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub role: PatternRole,
    pub outline: Outline,
}

/// Sample roles independently, then repair the selection
pub fn select_roles(rng: &mut impl Rng) -> Vec<PatternRole> {
    let mut roles: Vec<PatternRole> = PatternRole::ALL
        .into_iter()
        .filter(|role| rng.random::<f32>() < role.chance())
        .collect();
    repair_roles(&mut roles);
    roles
}

/// Like [`select_roles`], but keeps at most `max(cap, 2)` roles
pub fn select_roles_capped(rng: &mut impl Rng, cap: usize) -> Vec<PatternRole> {
    let mut roles = select_roles(rng);
    let cap = cap.max(2);
    while roles.len() > cap {
        let Some(drop_idx) = roles
            .iter()
            .enumerate()
            .max_by_key(|(_, role)| role.keep_rank())
            .map(|(i, _)| i)
        else {
            break;
        };
        roles.remove(drop_idx);
    }
    roles
}

/// Enforce the balance rules on a role list (duplicates are removed first)
pub fn repair_roles(roles: &mut Vec<PatternRole>) {
    let mut seen = Vec::with_capacity(roles.len());
    roles.retain(|r| {
        if seen.contains(r) {
            false
        } else {
            seen.push(*r);
            true
        }
    });

    if roles.len() < 2 {
        if !roles.contains(&PatternRole::Back) {
            roles.push(PatternRole::Back);
        }
        if roles.len() < 2 {
            // Most likely remaining role; ties keep sampling order
            let mut remaining: Vec<PatternRole> = PatternRole::ALL
                .into_iter()
                .filter(|r| !roles.contains(r))
                .collect();
            remaining.sort_by(|a, b| b.chance().total_cmp(&a.chance()));
            if let Some(&next) = remaining.first() {
                roles.push(next);
            }
        }
    }

    if is_unbalanced(roles) {
        roles.push(PatternRole::Back);
    }
}

/// Tail and belly alone read as a fish cut in half
pub fn is_unbalanced(roles: &[PatternRole]) -> bool {
    roles.len() == 2
        && roles.contains(&PatternRole::Tail)
        && roles.contains(&PatternRole::Belly)
        && !roles.contains(&PatternRole::Back)
        && !roles.contains(&PatternRole::Head)
}

/// Parse role names from configuration; unknown names are skipped
pub fn roles_from_names<S: AsRef<str>>(names: &[S]) -> Vec<PatternRole> {
    names
        .iter()
        .filter_map(|name| {
            let role = PatternRole::from_name(name.as_ref());
            if role.is_none() {
                log::warn!("Unknown pattern role {:?}, skipping", name.as_ref());
            }
            role
        })
        .collect()
}

/// Build one patch per role for a body with semi-axes (rx, ry)
pub fn generate_patches(
    rx: f32,
    ry: f32,
    roles: &[PatternRole],
    rng: &mut impl Rng,
) -> Vec<Patch> {
    roles
        .iter()
        .map(|&role| Patch {
            role,
            outline: role_outline(role, rx, ry, rng),
        })
        .collect()
}

/// Outline for a single role
pub fn role_outline(role: PatternRole, rx: f32, ry: f32, rng: &mut impl Rng) -> Outline {
    match role {
        PatternRole::Head => head_outline(rx, ry, rng),
        PatternRole::Back => back_outline(rx, ry, rng),
        PatternRole::Tail => tail_outline(rx, ry, rng),
        PatternRole::Belly => belly_outline(rx, ry, rng),
    }
}

#[inline]
fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

/// Cap over the snout covering 30-50% of the head length
fn head_outline(rx: f32, ry: f32, rng: &mut impl Rng) -> Outline {
    let coverage = 0.3 + rng.random::<f32>() * 0.2;
    let k = rx * (1.0 - coverage);

    Outline::new()
        .move_to(v(rx, 0.0))
        .cubic_to(v(rx, -ry * 0.7), v(k * 1.2, -ry * 0.9), v(k, -ry * 0.7))
        .cubic_to(v(k * 0.8, -ry * 0.5), v(k * 0.8, ry * 0.5), v(k, ry * 0.7))
        .cubic_to(v(k * 1.2, ry * 0.9), v(rx, ry * 0.7), v(rx, 0.0))
        .close()
}

/// Saddle over the back; half the time it wraps down to the underside
fn back_outline(rx: f32, ry: f32, rng: &mut impl Rng) -> Outline {
    let start = rx * (0.3 + rng.random::<f32>() * 0.2);
    let end = -rx * (0.1 + rng.random::<f32>() * 0.3);
    let mid = (start + end) / 2.0;

    if rng.random_bool(0.5) {
        Outline::new()
            .move_to(v(start, -ry))
            .cubic_to(v(mid, -ry * 1.1), v(end * 1.2, -ry * 0.9), v(end, -ry * 0.8))
            .cubic_to(v(end * 0.9, -ry * 0.4), v(end * 0.9, ry * 0.4), v(end, ry * 0.8))
            .cubic_to(v(end * 1.2, ry * 0.9), v(mid, ry * 1.1), v(start, ry))
            .cubic_to(v(start * 1.1, ry * 0.5), v(start * 1.1, -ry * 0.5), v(start, -ry))
            .close()
    } else {
        let bottom = -ry * (0.2 + rng.random::<f32>() * 0.3);
        Outline::new()
            .move_to(v(start, -ry))
            .cubic_to(
                v((start + end * 0.7) / 2.0, -ry * 1.1),
                v(end * 1.2, -ry * 0.9),
                v(end, -ry * 0.8),
            )
            .cubic_to(v(end * 0.9, -ry * 0.6), v(mid * 0.8, bottom * 1.2), v(mid, bottom))
            .cubic_to(v(mid * 1.2, bottom * 0.8), v(start * 0.9, -ry * 0.6), v(start, -ry))
            .close()
    }
}

/// Wedge toward the tail, tip up to 10 units past the body
fn tail_outline(rx: f32, ry: f32, rng: &mut impl Rng) -> Outline {
    let start = -rx * (0.3 + rng.random::<f32>() * 0.2);
    let tip = -rx - rng.random::<f32>() * 10.0;
    let shoulder = (start + tip) / 2.0 * 1.1;

    Outline::new()
        .move_to(v(start, -ry * 0.7))
        .cubic_to(v(shoulder, -ry * 0.5), v(tip * 0.9, -ry * 0.3), v(tip, 0.0))
        .cubic_to(v(tip * 0.9, ry * 0.3), v(shoulder, ry * 0.5), v(start, ry * 0.7))
        .cubic_to(v(start * 0.9, ry * 0.3), v(start * 0.9, -ry * 0.3), v(start, -ry * 0.7))
        .close()
}

/// Mound rising from the underside
fn belly_outline(rx: f32, ry: f32, rng: &mut impl Rng) -> Outline {
    let start = rx * (0.1 + rng.random::<f32>() * 0.2);
    let end = -rx * (0.2 + rng.random::<f32>() * 0.3);
    let peak_y = ry * (0.3 + rng.random::<f32>() * 0.3);
    let peak_x = start + (end - start) * (0.3 + rng.random::<f32>() * 0.4);

    Outline::new()
        .move_to(v(start, ry))
        .cubic_to(v(start * 0.9, ry * 0.8), v(peak_x * 0.8, peak_y * 1.2), v(peak_x, peak_y))
        .cubic_to(v(peak_x * 1.2, peak_y * 0.8), v(end * 1.1, ry * 0.8), v(end, ry))
        .cubic_to(v((start + end) / 2.0, ry * 1.1), v(start * 0.9, ry * 1.1), v(start, ry))
        .close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BODY_RX, BODY_RY};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_balanced(roles: &[PatternRole]) {
        assert!(roles.len() >= 2, "too few roles: {roles:?}");
        assert!(!is_unbalanced(roles), "unbalanced roles: {roles:?}");
    }

    #[test]
    fn test_repair_empty_adds_back_and_runner_up() {
        let mut roles = Vec::new();
        repair_roles(&mut roles);
        assert_eq!(roles, vec![PatternRole::Back, PatternRole::Tail]);
    }

    #[test]
    fn test_repair_single_back_adds_tail() {
        let mut roles = vec![PatternRole::Back];
        repair_roles(&mut roles);
        assert_eq!(roles, vec![PatternRole::Back, PatternRole::Tail]);
    }

    #[test]
    fn test_repair_single_belly_adds_back() {
        let mut roles = vec![PatternRole::Belly];
        repair_roles(&mut roles);
        assert_eq!(roles, vec![PatternRole::Belly, PatternRole::Back]);
    }

    #[test]
    fn test_repair_tail_belly_forces_back() {
        let mut roles = vec![PatternRole::Tail, PatternRole::Belly];
        repair_roles(&mut roles);
        assert!(roles.contains(&PatternRole::Back));
        assert_eq!(roles.len(), 3);
    }

    #[test]
    fn test_repair_removes_duplicates() {
        let mut roles = vec![PatternRole::Head, PatternRole::Head, PatternRole::Tail];
        repair_roles(&mut roles);
        assert_eq!(roles, vec![PatternRole::Head, PatternRole::Tail]);
    }

    #[test]
    fn test_roles_from_names_skips_unknown() {
        let roles = roles_from_names(&["head", "fin", "BellyPatch"]);
        assert_eq!(roles, vec![PatternRole::Head, PatternRole::Belly]);
    }

    #[test]
    fn test_generate_patches_one_per_role() {
        let mut rng = Pcg32::seed_from_u64(7);
        let roles = PatternRole::ALL.to_vec();
        let patches = generate_patches(BODY_RX, BODY_RY, &roles, &mut rng);
        assert_eq!(patches.len(), 4);
        for (patch, role) in patches.iter().zip(roles) {
            assert_eq!(patch.role, role);
            assert!(patch.outline.is_closed());
        }
    }

    #[test]
    fn test_tail_patch_reaches_past_body() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let outline = role_outline(PatternRole::Tail, BODY_RX, BODY_RY, &mut rng);
            let (min, _) = outline.control_bounds().unwrap();
            assert!(min.x <= -BODY_RX);
            assert!(min.x >= -BODY_RX - 10.0 - 1e-3);
        }
    }

    #[test]
    fn test_head_patch_stays_forward() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let outline = role_outline(PatternRole::Head, BODY_RX, BODY_RY, &mut rng);
            let (min, max) = outline.control_bounds().unwrap();
            // Coverage is at most 50%, so the rearmost control sits at 0.8 * 0.5 * rx
            assert!(min.x >= BODY_RX * 0.5 * 0.8 - 1e-3);
            assert_eq!(max.x, BODY_RX);
        }
    }

    #[test]
    fn test_belly_patch_stays_low() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            let outline = role_outline(PatternRole::Belly, BODY_RX, BODY_RY, &mut rng);
            let (min, _) = outline.control_bounds().unwrap();
            assert!(min.y > 0.0, "belly patch rose above the midline");
        }
    }

    proptest! {
        #[test]
        fn selected_roles_are_balanced(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..16 {
                let roles = select_roles(&mut rng);
                prop_assert!(roles.len() >= 2);
                prop_assert!(!is_unbalanced(&roles));
            }
        }

        #[test]
        fn capped_roles_are_balanced(seed in any::<u64>(), cap in 0usize..5) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let roles = select_roles_capped(&mut rng, cap);
            assert_balanced(&roles);
            prop_assert!(roles.len() <= cap.max(2));
        }

        #[test]
        fn repaired_arbitrary_lists_are_balanced(mask in 0u8..16) {
            let mut roles: Vec<PatternRole> = PatternRole::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, r)| r)
                .collect();
            repair_roles(&mut roles);
            assert_balanced(&roles);
        }
    }
}
