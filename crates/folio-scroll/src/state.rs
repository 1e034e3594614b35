//! L4 Atomic Layer: Scroll records passed between engine, bridge and consumers

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use folio_core::{EasingType, ScrollConfig};

/// Vertical scroll direction of the latest tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    #[default]
    None,
}

impl ScrollDirection {
    /// Direction of travel from `from` to `to`
    pub fn between(from: f64, to: f64) -> Self {
        if to > from {
            ScrollDirection::Down
        } else if to < from {
            ScrollDirection::Up
        } else {
            ScrollDirection::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::None => "none",
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload emitted by the smooth-scroll engine on every frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawTick {
    #[serde(default)]
    pub direction: ScrollDirection,
    /// Signed pixels travelled since the previous frame
    #[serde(default)]
    pub speed: f64,
    /// Current scroll offset in pixels
    pub offset: f64,
    /// Maximum scrollable extent in pixels
    #[serde(default)]
    pub max_extent: f64,
}

/// Normalized scroll state published to consumers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollState {
    /// Position within the document, always in [0, 1]
    pub progress: f64,
    pub direction: ScrollDirection,
    /// Speed magnitude scaled to [0, 100]
    pub speed: f64,
    /// Offset in pixels the progress was derived from
    pub offset: f64,
}

/// Native window scroll metrics, the fallback channel when no engine runs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NativeScroll {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl NativeScroll {
    /// Simplified progress: `scroll_y / (document_height - viewport_height)`
    pub fn progress(&self) -> f64 {
        normalize_progress(self.scroll_y, self.document_height - self.viewport_height)
    }
}

/// `clamp(offset / max_extent, 0, 1)`, 0 for empty or non-finite extents
#[inline]
pub fn normalize_progress(offset: f64, max_extent: f64) -> f64 {
    if !max_extent.is_finite() || max_extent <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / max_extent).clamp(0.0, 1.0)
}

/// Raw speed magnitude scaled and clamped to [0, 100]
#[inline]
pub fn scaled_speed(speed: f64, scale: f64) -> f64 {
    let scaled = (speed * scale).abs();
    if scaled.is_finite() {
        scaled.min(100.0)
    } else if scaled.is_nan() {
        0.0
    } else {
        100.0
    }
}

/// Where a scroll-to request should land
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    /// Element id referenced as `#id`; also drives the URL fragment
    Anchor(String),
    /// Any other selector understood by the document
    Selector(String),
    /// Absolute document offset in pixels
    Position(f64),
}

impl ScrollTarget {
    pub fn parse(target: &str) -> Self {
        let target = target.trim();
        match target.strip_prefix('#') {
            Some(id) => ScrollTarget::Anchor(id.to_string()),
            None => match target {
                "top" => ScrollTarget::Position(0.0),
                _ => ScrollTarget::Selector(target.to_string()),
            },
        }
    }

    /// Fragment id when this target is an anchor reference
    pub fn fragment(&self) -> Option<&str> {
        match self {
            ScrollTarget::Anchor(id) => Some(id),
            _ => None,
        }
    }
}

impl From<&str> for ScrollTarget {
    fn from(target: &str) -> Self {
        ScrollTarget::parse(target)
    }
}

impl From<f64> for ScrollTarget {
    fn from(position: f64) -> Self {
        ScrollTarget::Position(position)
    }
}

/// Per-call overrides merged over the configured defaults
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOptions {
    pub offset: Option<i32>,
    pub duration_ms: Option<u64>,
    pub easing: Option<EasingType>,
}

impl ScrollOptions {
    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn easing(mut self, easing: EasingType) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn resolve(&self, config: &ScrollConfig) -> ResolvedScroll {
        ResolvedScroll {
            offset: self.offset.unwrap_or(config.offset_px) as f64,
            duration: Duration::from_millis(self.duration_ms.unwrap_or(config.duration_ms)),
            easing: self.easing.unwrap_or(config.easing),
        }
    }
}

/// Fully merged scroll-to parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedScroll {
    pub offset: f64,
    pub duration: Duration,
    pub easing: EasingType,
}
