//! Deterministic pond simulation
//!
//! Everything that decides what the pond looks like lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod canvas;
pub mod ease;
pub mod koi;
pub mod lily;
pub mod outline;
pub mod patch;
pub mod state;
pub mod swim;
pub mod tick;
pub mod wiggle;

pub use canvas::Canvas;
pub use ease::{Ease, Fade, Oscillator};
pub use koi::{Koi, KoiSpec, KoiVariant, Tail, default_school};
pub use lily::{LilyPad, LilyShape, Placement, PlacementConfig, place_discs};
pub use outline::{Outline, PathCmd};
pub use patch::{Patch, PatternRole};
pub use state::{NodeRef, Scene};
pub use swim::{Pose, SwimAxis, SwimCycle, SwimEvent, SwimParams, Waypoint, plan_waypoints};
pub use tick::{TickInput, run_for, tick};
pub use wiggle::Wiggle;
