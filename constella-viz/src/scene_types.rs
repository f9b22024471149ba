//! Scene configuration types for the widget
//!
//! These types mirror the ones in constella::scene but are defined here to
//! keep the WASM crate free of the native crate's dependencies. The host
//! page passes the normalized config across the boundary as JSON.

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

/// How the widget sizes its drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimensions {
    /// Track the parent container's size (the host calls `resize`)
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
    /// Parse a config from the JSON handed across the WASM boundary
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replace values the renderer cannot work with. The native crate warns
    /// about these during generation; the widget silently degrades.
    pub fn sanitized(mut self) -> Self {
        self.palette.retain(|c| parse_hex(c).is_some());
        if self.palette.is_empty() {
            self.palette = palette::default_colors();
        }
        if !self.connection_distance.is_finite() || self.connection_distance < 0.0 {
            self.connection_distance = 0.0;
        }
        if let Some(max) = self.max_speed {
            if !max.is_finite() || max <= 0.0 {
                self.max_speed = None;
            }
        }
        self
    }
}

/// An sRGB color parsed from a `#RRGGBB` palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// RGBA as normalized floats, for GPU instance buffers
    pub fn normalized(&self, alpha: f32) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            alpha.clamp(0.0, 1.0),
        ]
    }

    /// CSS `rgba()` string with the given alpha
    pub fn css(&self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.0,
            self.1,
            self.2,
            alpha.clamp(0.0, 1.0)
        )
    }
}

/// Parse a `#RRGGBB` hex color. Returns None for anything else.
pub fn parse_hex(color: &str) -> Option<Rgb> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb(r, g, b))
}

/// Resolve a palette of hex strings into drawable colors, dropping entries
/// that fail to parse.
pub fn resolve_palette(palette: &[String]) -> Vec<Rgb> {
    palette.iter().filter_map(|c| parse_hex(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_original_constants() {
        let config = SceneConfig::default();
        assert_eq!(config.particle_count, 100);
        assert_eq!(config.connection_distance, 150.0);
        assert_eq!(config.palette, vec!["#00D9FF", "#FF6B35"]);
        assert_eq!(config.dimensions, Dimensions::FillParent);
        assert!(config.max_speed.is_none());
        assert!(config.overlay.enabled);
        assert_eq!(config.overlay.sides, 6);
    }

    #[test]
    fn empty_json_object_uses_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn parses_full_config() {
        let json = r##"{
            "particle_count": 42,
            "connection_distance": 90.0,
            "palette": ["#FFFFFF"],
            "dimensions": {"fixed": {"width": 800, "height": 600}},
            "max_speed": 2.5,
            "overlay": {"enabled": false, "sides": 8}
        }"##;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.particle_count, 42);
        assert_eq!(config.connection_distance, 90.0);
        assert_eq!(
            config.dimensions,
            Dimensions::Fixed {
                width: 800,
                height: 600
            }
        );
        assert_eq!(config.max_speed, Some(2.5));
        assert!(!config.overlay.enabled);
    }

    #[test]
    fn sanitize_replaces_empty_palette() {
        let config = SceneConfig {
            palette: vec![],
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.palette, palette::default_colors());
    }

    #[test]
    fn sanitize_drops_unparseable_colors() {
        let config = SceneConfig {
            palette: vec!["#00D9FF".to_string(), "not-a-color".to_string()],
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.palette, vec!["#00D9FF"]);
    }

    #[test]
    fn sanitize_disables_negative_connection_distance() {
        let config = SceneConfig {
            connection_distance: -10.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.connection_distance, 0.0);
    }

    #[test]
    fn sanitize_rejects_nonpositive_speed_clamp() {
        let config = SceneConfig {
            max_speed: Some(0.0),
            ..Default::default()
        }
        .sanitized();
        assert!(config.max_speed.is_none());
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex("#00D9FF"), Some(Rgb(0, 217, 255)));
        assert_eq!(parse_hex("#ff6b35"), Some(Rgb(255, 107, 53)));
        assert_eq!(parse_hex("#000000"), Some(Rgb(0, 0, 0)));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(parse_hex("00D9FF"), None); // missing '#'
        assert_eq!(parse_hex("#00D9F"), None); // too short
        assert_eq!(parse_hex("#00D9FFAA"), None); // alpha not supported
        assert_eq!(parse_hex("#GGGGGG"), None);
        assert_eq!(parse_hex(""), None);
    }

    #[test]
    fn rgb_css_formats_with_alpha() {
        assert_eq!(Rgb(0, 217, 255).css(0.5), "rgba(0, 217, 255, 0.5)");
        assert_eq!(Rgb(255, 107, 53).css(1.0), "rgba(255, 107, 53, 1)");
    }

    #[test]
    fn rgb_css_clamps_alpha() {
        assert_eq!(Rgb(0, 0, 0).css(2.0), "rgba(0, 0, 0, 1)");
        assert_eq!(Rgb(0, 0, 0).css(-1.0), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn resolve_palette_skips_bad_entries() {
        let palette = vec![
            "#00D9FF".to_string(),
            "bogus".to_string(),
            "#FF6B35".to_string(),
        ];
        let resolved = resolve_palette(&palette);
        assert_eq!(resolved, vec![Rgb(0, 217, 255), Rgb(255, 107, 53)]);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SceneConfig {
            particle_count: 7,
            dimensions: Dimensions::Fixed {
                width: 320,
                height: 240,
            },
            max_speed: Some(1.5),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back = SceneConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }
}
