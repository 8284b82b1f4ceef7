//! Game settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PARTICLES;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => MAX_PARTICLES,
        }
    }

    /// Fraction of the saber trail drawn (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 0.8,
            QualityPreset::High => 1.0,
        }
    }

    /// Shadow blur multiplier for neon glow
    pub fn glow_strength(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.0,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Saber trail behind the cursor
    pub trails: bool,
    /// Slice sparks
    pub particles: bool,
    /// Neon glow (canvas shadows)
    pub glow: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no pulsing hit-zone borders)
    pub reduced_motion: bool,

    // === Gameplay ===
    /// Built-in profile to play
    pub profile: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            // Visual effects - all on by default
            trails: true,
            particles: true,
            glow: true,

            // HUD
            show_fps: false,

            // Accessibility
            reduced_motion: false,

            profile: "dot-notes".to_string(),
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset disables glow for performance
        if preset == QualityPreset::Low {
            self.glow = false;
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective glow multiplier (0 disables shadows)
    pub fn glow_strength(&self) -> f32 {
        if self.glow {
            self.quality.glow_strength()
        } else {
            0.0
        }
    }

    /// Effective trail fraction (0 hides the trail)
    pub fn trail_fraction(&self) -> f32 {
        if self.trails {
            self.quality.trail_quality()
        } else {
            0.0
        }
    }

    /// Whether hit-zone borders pulse
    pub fn pulse_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "slice_beats_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("LocalStorage rejected settings");
                    } else {
                        log::info!("Settings saved");
                    }
                }
                Err(e) => log::warn!("Could not serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names() {
        assert_eq!(QualityPreset::from_name("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_name("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_low_preset_disables_glow() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(!settings.glow);
        assert_eq!(settings.glow_strength(), 0.0);
        assert_eq!(settings.max_particles(), 100);
    }

    #[test]
    fn test_toggles_override_preset() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), MAX_PARTICLES);
        settings.particles = false;
        settings.trails = false;
        settings.reduced_motion = true;
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.trail_fraction(), 0.0);
        assert!(!settings.pulse_enabled());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "profile": "arrows" }"#).unwrap();
        assert_eq!(settings.profile, "arrows");
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.trails);
    }

    #[test]
    fn test_saved_json_reloads() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.profile = "depth".to_string();
        settings.show_fps = true;
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.profile, "depth");
        assert_eq!(back.quality, QualityPreset::Low);
        assert!(back.show_fps);
        assert!(!back.glow);
    }
}
