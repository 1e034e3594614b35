//! Custom cursor: pointer follower and hover classification

use folio_core::CursorConfig;
use serde::Serialize;

use crate::timing::lerp;

/// Distance under which the follower snaps onto the pointer
const SETTLE_DISTANCE: f64 = 0.1;

/// What the pointer is hovering, which drives the cursor's styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverKind {
    #[default]
    Default,
    Link,
    Button,
    Text,
    Media,
}

/// The facts about a hovered element the classifier looks at
#[derive(Debug, Clone, Default)]
pub struct HoverTarget<'a> {
    pub tag: &'a str,
    pub role: Option<&'a str>,
    pub has_href: bool,
    /// Computed CSS `cursor` value
    pub cursor: Option<&'a str>,
}

/// Classify a hovered element
pub fn classify(target: &HoverTarget<'_>) -> HoverKind {
    let tag = target.tag.to_ascii_lowercase();

    if target.role == Some("button") || matches!(tag.as_str(), "button" | "summary") {
        return HoverKind::Button;
    }
    if target.has_href || tag == "a" || target.role == Some("link") {
        return HoverKind::Link;
    }
    match tag.as_str() {
        "img" | "video" | "picture" | "canvas" | "svg" => return HoverKind::Media,
        "input" | "textarea" => return HoverKind::Text,
        _ => {}
    }
    match target.cursor {
        Some("pointer") => HoverKind::Link,
        Some("text") => HoverKind::Text,
        _ => HoverKind::Default,
    }
}

/// Smoothed cursor position chasing the sampled pointer
#[derive(Debug, Clone)]
pub struct CursorTracker {
    lerp: f64,
    pointer: (f64, f64),
    position: (f64, f64),
    hover: HoverKind,
}

impl CursorTracker {
    pub fn new(lerp: f64) -> Self {
        Self {
            lerp: lerp.clamp(0.01, 1.0),
            pointer: (0.0, 0.0),
            position: (0.0, 0.0),
            hover: HoverKind::Default,
        }
    }

    pub fn from_config(config: &CursorConfig) -> Self {
        Self::new(config.lerp)
    }

    /// Sample a pointer move and what it is over
    pub fn on_pointer_move(&mut self, x: f64, y: f64, hover: HoverKind) {
        self.pointer = (x, y);
        self.hover = hover;
    }

    /// Advance the follower one frame; returns the drawn position
    pub fn frame(&mut self) -> (f64, f64) {
        let (px, py) = self.pointer;
        let (mut x, mut y) = self.position;
        x = lerp(x, px, self.lerp);
        y = lerp(y, py, self.lerp);
        if (px - x).abs() < SETTLE_DISTANCE && (py - y).abs() < SETTLE_DISTANCE {
            x = px;
            y = py;
        }
        self.position = (x, y);
        self.position
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    pub fn hover(&self) -> HoverKind {
        self.hover
    }

    /// Whether the follower still lags the pointer
    pub fn is_moving(&self) -> bool {
        self.position != self.pointer
    }
}
