use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub nav: NavConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Smooth-scroll engine and scroll-to configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Try to construct the smooth-scroll engine at all
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Inertia: fraction of the remaining distance covered each frame
    #[serde(default = "default_lerp")]
    pub lerp: f64,
    /// Wheel multiplier on desktop-class viewports
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Touch multiplier on tablet-class viewports
    #[serde(default = "default_multiplier")]
    pub tablet_multiplier: f64,
    /// Touch multiplier on phone-class viewports
    #[serde(default = "default_multiplier")]
    pub phone_multiplier: f64,
    /// Accept scroll input from any point of the page, not only the container
    #[serde(default = "default_true")]
    pub scroll_from_anywhere: bool,
    /// Default offset applied to scroll targets, in pixels
    #[serde(default = "default_offset_px")]
    pub offset_px: i32,
    /// Default scroll-to animation duration
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Default scroll-to easing curve
    #[serde(default)]
    pub easing: EasingType,
    /// Quiet period before a layout recomputation runs
    #[serde(default = "default_update_debounce_ms")]
    pub update_debounce_ms: u64,
    /// Factor applied to raw engine speed before clamping to [0, 100]
    #[serde(default = "default_speed_scale")]
    pub speed_scale: f64,
    /// Mirror scroll state onto document root attributes for stylesheets
    #[serde(default = "default_true")]
    pub write_root_attributes: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            lerp: default_lerp(),
            multiplier: default_multiplier(),
            tablet_multiplier: default_multiplier(),
            phone_multiplier: default_multiplier(),
            scroll_from_anywhere: default_true(),
            offset_px: default_offset_px(),
            duration_ms: default_duration_ms(),
            easing: EasingType::default(),
            update_debounce_ms: default_update_debounce_ms(),
            speed_scale: default_speed_scale(),
            write_root_attributes: default_true(),
        }
    }
}

/// Easing curve for timed scroll animations
///
/// Deserializes from a name (`"linear"`, `"cubic"`, `"quintic"`, `"ease-out"`,
/// `"none"`), a CSS-style `"cubic-bezier(x1, y1, x2, y2)"` string, or a
/// four-element array of control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingType {
    None,
    Linear,
    Cubic,
    Quintic,
    EaseOut,
    CubicBezier(f64, f64, f64, f64),
}

impl Default for EasingType {
    fn default() -> Self {
        EasingType::CubicBezier(0.25, 0.0, 0.35, 1.0)
    }
}

impl fmt::Display for EasingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EasingType::None => f.write_str("none"),
            EasingType::Linear => f.write_str("linear"),
            EasingType::Cubic => f.write_str("cubic"),
            EasingType::Quintic => f.write_str("quintic"),
            EasingType::EaseOut => f.write_str("ease-out"),
            EasingType::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

impl std::str::FromStr for EasingType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        match s {
            "none" => return Ok(EasingType::None),
            "linear" => return Ok(EasingType::Linear),
            "cubic" => return Ok(EasingType::Cubic),
            "quintic" => return Ok(EasingType::Quintic),
            "ease-out" | "ease_out" => return Ok(EasingType::EaseOut),
            _ => {}
        }

        let inner = s
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| crate::Error::Config(format!("unknown easing: {}", s)))?;

        let points = inner
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| crate::Error::Config(format!("invalid cubic-bezier {}: {}", s, e)))?;

        match points.as_slice() {
            [x1, y1, x2, y2] => EasingType::bezier(*x1, *y1, *x2, *y2),
            _ => Err(crate::Error::Config(format!(
                "cubic-bezier needs 4 control points, got {}",
                points.len()
            ))),
        }
    }
}

impl EasingType {
    /// Build a cubic-bezier curve; x control points must lie in [0, 1]
    pub fn bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> crate::Result<Self> {
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(crate::Error::Config(format!(
                "cubic-bezier x control points must be within [0, 1], got {} and {}",
                x1, x2
            )));
        }
        Ok(EasingType::CubicBezier(x1, y1, x2, y2))
    }
}

impl Serialize for EasingType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

// Accept either a string (name or CSS function) or an array of control points
impl<'de> Deserialize<'de> for EasingType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, SeqAccess, Visitor};

        struct EasingVisitor;

        impl<'de> Visitor<'de> for EasingVisitor {
            type Value = EasingType;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an easing name, a \"cubic-bezier(..)\" string or 4 control points")
            }

            fn visit_str<E>(self, value: &str) -> Result<EasingType, E>
            where
                E: de::Error,
            {
                value.parse().map_err(E::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<EasingType, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut points = [0.0_f64; 4];
                for (i, slot) in points.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(5, &self));
                }
                EasingType::bezier(points[0], points[1], points[2], points[3])
                    .map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(EasingVisitor)
    }
}

/// Thresholds for navigation and visibility consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavConfig {
    /// Navbar hides on downward scroll past this offset
    #[serde(default = "default_hide_threshold")]
    pub hide_threshold_px: f64,
    /// Scroll-to-top shows once smooth progress exceeds this
    #[serde(default = "default_go_to_top_progress")]
    pub go_to_top_progress: f64,
    /// Scroll-to-top shows once native scrollY exceeds this share of the viewport
    #[serde(default = "default_go_to_top_viewport_ratio")]
    pub go_to_top_viewport_ratio: f64,
    /// Minimum visible share of a section to make it a candidate for active
    #[serde(default = "default_section_threshold")]
    pub section_threshold: f64,
    /// Share of the viewport trimmed from the top of the observation band
    #[serde(default = "default_section_margin_top")]
    pub section_margin_top: f64,
    /// Share of the viewport trimmed from the bottom of the observation band
    #[serde(default = "default_section_margin_bottom")]
    pub section_margin_bottom: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            hide_threshold_px: default_hide_threshold(),
            go_to_top_progress: default_go_to_top_progress(),
            go_to_top_viewport_ratio: default_go_to_top_viewport_ratio(),
            section_threshold: default_section_threshold(),
            section_margin_top: default_section_margin_top(),
            section_margin_bottom: default_section_margin_bottom(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Follow factor applied per frame while the cursor catches up with the pointer
    #[serde(default = "default_cursor_lerp")]
    pub lerp: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            lerp: default_cursor_lerp(),
        }
    }
}

/// Static asset server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port when neither --port nor PORT is given
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the built site
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            dist_dir: default_dist_dir(),
        }
    }
}

impl ServerConfig {
    /// Resolve the listen port: explicit value, then `PORT`, then config
    pub fn resolve_port(&self, explicit: Option<u16>) -> u16 {
        explicit
            .or_else(|| std::env::var("PORT").ok().and_then(|v| v.trim().parse().ok()))
            .unwrap_or(self.port)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_lerp() -> f64 {
    0.1
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_offset_px() -> i32 {
    -100
}

fn default_duration_ms() -> u64 {
    1500
}

fn default_update_debounce_ms() -> u64 {
    200
}

fn default_speed_scale() -> f64 {
    10.0
}

fn default_hide_threshold() -> f64 {
    150.0
}

fn default_go_to_top_progress() -> f64 {
    0.1
}

fn default_go_to_top_viewport_ratio() -> f64 {
    0.3
}

fn default_section_threshold() -> f64 {
    0.3
}

fn default_section_margin_top() -> f64 {
    0.2
}

fn default_section_margin_bottom() -> f64 {
    0.35
}

fn default_cursor_lerp() -> f64 {
    0.2
}

fn default_port() -> u16 {
    3000
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(config_path: &std::path::Path) -> crate::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/folio/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("folio")
            .join("config.toml")
    }

    /// Get the asset directory (with tilde expansion)
    pub fn dist_dir(&self) -> PathBuf {
        expand_tilde(&self.server.dist_dir)
    }
}
