//! Smooth-scroll engine seam
//!
//! The manager never talks to a concrete engine; it builds one through an
//! `EngineFactory` and drives it through `ScrollEngine`.

mod animated;

use std::time::Instant;

use folio_core::{Result, ScrollConfig};

use crate::state::{RawTick, ResolvedScroll};

pub use animated::{AnimatedEngine, AnimatedEngineFactory};

/// Viewport width below which the tablet multiplier applies
pub const TABLET_BREAKPOINT: f64 = 1024.0;
/// Viewport width below which the phone multiplier applies
pub const PHONE_BREAKPOINT: f64 = 768.0;

/// Device class derived from viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Tablet,
    Phone,
}

impl DeviceClass {
    pub fn from_width(width: f64) -> Self {
        if width < PHONE_BREAKPOINT {
            DeviceClass::Phone
        } else if width < TABLET_BREAKPOINT {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    /// Input multiplier configured for this class
    pub fn multiplier(&self, config: &ScrollConfig) -> f64 {
        match self {
            DeviceClass::Desktop => config.multiplier,
            DeviceClass::Tablet => config.tablet_multiplier,
            DeviceClass::Phone => config.phone_multiplier,
        }
    }
}

/// Construction parameters handed to an engine factory
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub lerp: f64,
    pub device: DeviceClass,
    pub multiplier: f64,
    pub scroll_from_anywhere: bool,
    pub max_extent: f64,
    /// Position the engine takes over from, usually the native scroll offset
    pub initial_offset: f64,
}

impl EngineSettings {
    pub fn new(config: &ScrollConfig, viewport_width: f64, max_extent: f64) -> Self {
        let device = DeviceClass::from_width(viewport_width);
        Self {
            lerp: config.lerp,
            device,
            multiplier: device.multiplier(config),
            scroll_from_anywhere: config.scroll_from_anywhere,
            max_extent,
            initial_offset: 0.0,
        }
    }

    pub fn with_initial_offset(mut self, offset: f64) -> Self {
        self.initial_offset = offset;
        self
    }
}

/// Operations the coordination layer needs from a smooth-scroll engine
pub trait ScrollEngine {
    /// Resume reacting to input
    fn start(&mut self);

    /// Pause; input is ignored and no ticks are emitted
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Animate to an absolute offset; a new call redirects the running one
    fn scroll_to(&mut self, top: f64, scroll: &ResolvedScroll, now: Instant);

    /// Feed a wheel/touch delta in pixels
    fn input(&mut self, delta_y: f64);

    /// Recompute layout measurements after the document changed size
    fn update(&mut self, max_extent: f64, device: DeviceClass, multiplier: f64);

    /// Whether motion is still pending (animation or unfinished glide)
    fn needs_frame(&self) -> bool;

    /// Advance one frame; returns a tick when the position moved
    fn frame(&mut self, now: Instant) -> Option<RawTick>;

    /// Current offset in pixels
    fn offset(&self) -> f64;

    /// Release engine resources
    fn destroy(&mut self);
}

/// Builds engines bound to a container element
pub trait EngineFactory {
    fn create(&self, container: &str, settings: &EngineSettings) -> Result<Box<dyn ScrollEngine>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_breakpoints() {
        assert_eq!(DeviceClass::from_width(1440.0), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_width(1024.0), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_width(900.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(390.0), DeviceClass::Phone);
    }

    #[test]
    fn test_settings_pick_device_multiplier() {
        let config = ScrollConfig {
            multiplier: 1.0,
            tablet_multiplier: 2.0,
            phone_multiplier: 3.0,
            ..Default::default()
        };
        assert_eq!(EngineSettings::new(&config, 1280.0, 100.0).multiplier, 1.0);
        assert_eq!(EngineSettings::new(&config, 800.0, 100.0).multiplier, 2.0);
        assert_eq!(EngineSettings::new(&config, 375.0, 100.0).multiplier, 3.0);
    }
}
