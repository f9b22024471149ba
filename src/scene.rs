//! Scene configuration model
//!
//! The scene config is the whole external surface of the widget: particle
//! count, link distance, palette, sizing policy, and overlay options. These
//! types are mirrored in constella-viz::scene_types so the WASM crate stays
//! free of the native crate's dependencies; the normalized JSON emitted by
//! [`SceneConfig::embed_json`] is what crosses that boundary.

use serde::{Deserialize, Serialize};

/// Built-in palette used when a config supplies no usable colors
pub mod palette {
    /// Primary accent: cyan (#00D9FF)
    pub const ACCENT_CYAN: &str = "#00D9FF";

    /// Secondary accent: warm orange (#FF6B35)
    pub const ACCENT_ORANGE: &str = "#FF6B35";

    /// The default two-color palette
    pub fn default_colors() -> Vec<String> {
        vec![ACCENT_CYAN.to_string(), ACCENT_ORANGE.to_string()]
    }
}

/// Upper bound on the particle batch; the all-pairs link pass is O(n²) and
/// the effect is tuned for counts well under this.
pub const MAX_PARTICLE_COUNT: usize = 10_000;

/// How the widget sizes its drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimensions {
    /// Track the parent container's size
    FillParent,
    /// Fixed pixel dimensions
    Fixed { width: u32, height: u32 },
}

impl Default for Dimensions {
    fn default() -> Self {
        Dimensions::FillParent
    }
}

/// Rotating geometric overlay drawn above the particles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Master toggle for the overlay
    pub enabled: bool,
    /// Number of polygon sides
    pub sides: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sides: 6,
        }
    }
}

/// Complete scene configuration for one widget instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Page title for the generated demo page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Number of particles created at (re)initialization
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,

    /// Maximum pixel distance at which two particles are linked
    #[serde(default = "default_connection_distance")]
    pub connection_distance: f32,

    /// Colors assigned to particles and links
    #[serde(default = "palette::default_colors")]
    pub palette: Vec<String>,

    /// Sizing policy for the drawing surface
    #[serde(default)]
    pub dimensions: Dimensions,

    /// Optional speed clamp for pointer-accelerated particles. The original
    /// effect leaves velocity unbounded; hosts that find runaway particles
    /// objectionable can opt in here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f32>,

    /// Rotating geometric overlay
    #[serde(default)]
    pub overlay: OverlayConfig,
}

fn default_particle_count() -> usize {
    100
}

fn default_connection_distance() -> f32 {
    150.0
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: None,
            particle_count: default_particle_count(),
            connection_distance: default_connection_distance(),
            palette: palette::default_colors(),
            dimensions: Dimensions::default(),
            max_speed: None,
            overlay: OverlayConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Replace values the widget cannot work with, returning a warning for
    /// each substitution. The widget degrades silently; the CLI surfaces
    /// these so config mistakes are visible at generation time.
    pub fn normalize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        let before = self.palette.len();
        self.palette.retain(|c| parse_hex(c).is_some());
        if self.palette.len() < before {
            warnings.push(format!(
                "dropped {} palette entr{} that did not parse as #RRGGBB",
                before - self.palette.len(),
                if before - self.palette.len() == 1 {
                    "y"
                } else {
                    "ies"
                }
            ));
        }
        if self.palette.is_empty() {
            warnings.push("palette is empty; using the default two-color palette".to_string());
            self.palette = palette::default_colors();
        }

        if self.particle_count > MAX_PARTICLE_COUNT {
            warnings.push(format!(
                "particle_count {} exceeds {}; clamping",
                self.particle_count, MAX_PARTICLE_COUNT
            ));
            self.particle_count = MAX_PARTICLE_COUNT;
        }

        if !self.connection_distance.is_finite() || self.connection_distance < 0.0 {
            warnings.push(format!(
                "connection_distance {} is not usable; links disabled",
                self.connection_distance
            ));
            self.connection_distance = 0.0;
        }

        if let Some(max) = self.max_speed {
            if !max.is_finite() || max <= 0.0 {
                warnings.push(format!("max_speed {} is not positive; ignoring", max));
                self.max_speed = None;
            }
        }

        warnings
    }

    /// Compact JSON for the `<script type="application/json">` island the
    /// demo page hands to the widget.
    pub fn embed_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Title shown on the generated page
    pub fn page_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Constellation background")
    }
}

/// Parse a `#RRGGBB` hex color, returning the channels
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_tuned_effect() {
        let config = SceneConfig::default();
        assert_eq!(config.particle_count, 100);
        assert_eq!(config.connection_distance, 150.0);
        assert_eq!(config.palette, vec!["#00D9FF", "#FF6B35"]);
        assert_eq!(config.dimensions, Dimensions::FillParent);
        assert!(config.overlay.enabled);
        assert_eq!(config.overlay.sides, 6);
    }

    #[test]
    fn normalize_keeps_a_valid_config_untouched() {
        let mut config = SceneConfig::default();
        let warnings = config.normalize();
        assert!(warnings.is_empty());
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn normalize_drops_bad_colors_and_warns() {
        let mut config = SceneConfig {
            palette: vec!["#00D9FF".into(), "teal".into()],
            ..Default::default()
        };
        let warnings = config.normalize();
        assert_eq!(config.palette, vec!["#00D9FF"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("1 palette entry"));
    }

    #[test]
    fn normalize_restores_default_palette_when_empty() {
        let mut config = SceneConfig {
            palette: vec!["bogus".into()],
            ..Default::default()
        };
        let warnings = config.normalize();
        assert_eq!(config.palette, palette::default_colors());
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn normalize_clamps_excessive_particle_count() {
        let mut config = SceneConfig {
            particle_count: 1_000_000,
            ..Default::default()
        };
        let warnings = config.normalize();
        assert_eq!(config.particle_count, MAX_PARTICLE_COUNT);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn normalize_disables_negative_connection_distance() {
        let mut config = SceneConfig {
            connection_distance: -3.0,
            ..Default::default()
        };
        config.normalize();
        assert_eq!(config.connection_distance, 0.0);
    }

    #[test]
    fn normalize_rejects_nonpositive_max_speed() {
        let mut config = SceneConfig {
            max_speed: Some(-1.0),
            ..Default::default()
        };
        config.normalize();
        assert!(config.max_speed.is_none());
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex("#00D9FF"), Some((0, 217, 255)));
        assert_eq!(parse_hex("#ff6b35"), Some((255, 107, 53)));
        assert_eq!(parse_hex("nope"), None);
        assert_eq!(parse_hex("#12345"), None);
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let yaml = r##"
title: Night sky
particle_count: 80
connection_distance: 120
palette:
  - "#FFFFFF"
dimensions:
  fixed:
    width: 800
    height: 600
max_speed: 2.0
"##;
        let config: SceneConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title.as_deref(), Some("Night sky"));
        assert_eq!(config.particle_count, 80);
        assert_eq!(
            config.dimensions,
            Dimensions::Fixed {
                width: 800,
                height: 600
            }
        );
        assert_eq!(config.max_speed, Some(2.0));
        // Unspecified sections fall back to defaults
        assert_eq!(config.overlay, OverlayConfig::default());
    }

    #[test]
    fn embed_json_matches_the_boundary_format() {
        let config = SceneConfig::default();
        insta::assert_snapshot!(
            config.embed_json().unwrap(),
            @r###"{"particle_count":100,"connection_distance":150.0,"palette":["#00D9FF","#FF6B35"],"dimensions":"fill_parent","overlay":{"enabled":true,"sides":6}}"###
        );
    }

    #[test]
    fn embed_json_omits_absent_options() {
        let json = SceneConfig::default().embed_json().unwrap();
        assert!(!json.contains("title"));
        assert!(!json.contains("max_speed"));
    }
}
