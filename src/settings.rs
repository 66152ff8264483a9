//! Pond settings
//!
//! Persisted in LocalStorage on the web, read from a JSON file on native.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PondResult;
use crate::platform::viewport::{Align, FitMode};
use crate::sim::canvas::Canvas;
use crate::sim::koi::{KoiSpec, default_school};
use crate::sim::lily::PlacementConfig;
use crate::sim::patch::{PatternRole, roles_from_names};
use crate::sim::swim::SwimParams;

/// How many lily pads to aim for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PondDensity {
    Sparse,
    #[default]
    Normal,
    Lush,
}

impl PondDensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            PondDensity::Sparse => "Sparse",
            PondDensity::Normal => "Normal",
            PondDensity::Lush => "Lush",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sparse" => Some(PondDensity::Sparse),
            "normal" | "default" => Some(PondDensity::Normal),
            "lush" | "dense" => Some(PondDensity::Lush),
            _ => None,
        }
    }

    /// Inclusive range the target pad count is drawn from
    pub fn count_range(&self) -> (u32, u32) {
        match self {
            PondDensity::Sparse => (8, 12),
            PondDensity::Normal => (15, 24),
            PondDensity::Lush => (20, 30),
        }
    }
}

/// Pond settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// How the canvas is fitted into the page
    pub fit_mode: FitMode,
    pub align: Align,

    // === Lily pads ===
    pub density: PondDensity,
    /// Exact target count, overrides `density`
    pub lily_pad_count: Option<u32>,
    pub placement: PlacementConfig,

    // === Koi ===
    /// Degrees of random heading change when a koi re-enters the pond
    pub restart_heading_jitter: f32,
    pub initial_koi: Vec<KoiSpec>,
    /// Pattern roles used for every koi (`"head"`, `"back"`, `"tail"`,
    /// `"belly"`); random selection when unset
    pub pattern_roles: Option<Vec<String>>,

    // === Accessibility ===
    /// Keep the koi swimming but stop wiggle and sway
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let canvas = Canvas::default();
        Self {
            canvas_width: canvas.width,
            canvas_height: canvas.height,
            fit_mode: FitMode::Cover,
            align: Align::Min,

            density: PondDensity::Normal,
            lily_pad_count: None,
            placement: PlacementConfig::default(),

            restart_heading_jitter: SwimParams::default().restart_jitter,
            initial_koi: default_school(),
            pattern_roles: None,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a density preset
    pub fn from_density(density: PondDensity) -> Self {
        Self {
            density,
            ..Self::default()
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    pub fn swim_params(&self) -> SwimParams {
        SwimParams {
            restart_jitter: self.restart_heading_jitter,
            ..SwimParams::default()
        }
    }

    /// Number of lily pads to try to place
    pub fn lily_target(&self, rng: &mut impl Rng) -> u32 {
        match self.lily_pad_count {
            Some(n) => n,
            None => {
                let (lo, hi) = self.density.count_range();
                rng.random_range(lo..=hi)
            }
        }
    }

    /// Configured pattern roles; unknown names are skipped
    pub fn pattern_roles(&self) -> Option<Vec<PatternRole>> {
        self.pattern_roles
            .as_deref()
            .map(roles_from_names)
    }

    pub fn from_json(json: &str) -> PondResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> PondResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> PondResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "koi_pond_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_density_names() {
        for d in [PondDensity::Sparse, PondDensity::Normal, PondDensity::Lush] {
            assert_eq!(PondDensity::from_name(d.as_str()), Some(d));
        }
        assert_eq!(PondDensity::from_name("swamp"), None);
    }

    #[test]
    fn test_lily_target_follows_density() {
        let mut rng = Pcg32::seed_from_u64(1);
        let settings = Settings::from_density(PondDensity::Sparse);
        for _ in 0..50 {
            assert!((8..=12).contains(&settings.lily_target(&mut rng)));
        }
        let settings = Settings {
            lily_pad_count: Some(10),
            ..settings
        };
        assert_eq!(settings.lily_target(&mut rng), 10);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "lily_pad_count": 7, "fit_mode": "Contain" }"#)
            .unwrap();
        assert_eq!(settings.lily_pad_count, Some(7));
        assert_eq!(settings.fit_mode, FitMode::Contain);
        assert_eq!(settings.initial_koi.len(), 5);
        assert_eq!(settings.canvas(), Canvas::default());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = Settings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, crate::PondError::Config(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            pattern_roles: Some(vec!["head".into(), "fin".into()]),
            reduced_motion: true,
            ..Settings::default()
        };
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
        assert_eq!(back.pattern_roles(), Some(vec![PatternRole::Head]));
    }

    #[test]
    fn test_jitter_feeds_swim_params() {
        let settings = Settings {
            restart_heading_jitter: 10.0,
            ..Settings::default()
        };
        assert_eq!(settings.swim_params().restart_jitter, 10.0);
    }
}
