//! L3 Molecular Layer: Built-in inertia engine
//!
//! Combines easing functions and timing utilities: wheel input glides toward
//! its target by a lerp factor each frame, and `scroll_to` runs an eased,
//! timed animation from the current position.

use std::time::{Duration, Instant};

use folio_core::{Error, Result};
use tracing::debug;

use super::{DeviceClass, EngineFactory, EngineSettings, ScrollEngine};
use crate::easing::{EasingType, EasingTypeExt};
use crate::state::{RawTick, ResolvedScroll, ScrollDirection};
use crate::timing::{is_complete, lerp, progress};

/// Remaining distance under which the lerp glide snaps to its target
const SNAP_DISTANCE: f64 = 0.5;

/// Active scroll-to animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    /// Animation start time
    start: Instant,
    /// Starting scroll position
    from: f64,
    /// Target scroll position
    to: f64,
    /// Animation duration
    duration: Duration,
    /// Easing function
    easing: EasingType,
}

/// Inertia scroll engine
///
/// Feed input with `input()` or `scroll_to()`, then call `frame()` each
/// animation frame to advance and collect the tick.
#[derive(Debug, Clone)]
pub struct AnimatedEngine {
    /// Current scroll-to animation (if any)
    animation: Option<ActiveAnimation>,
    /// Current visible offset
    current: f64,
    /// Where the lerp glide is heading
    target: f64,
    /// Offset reported by the previous tick
    last_reported: f64,
    max_extent: f64,
    lerp: f64,
    multiplier: f64,
    device: DeviceClass,
    running: bool,
}

impl AnimatedEngine {
    pub fn new(settings: &EngineSettings) -> Self {
        let max_extent = settings.max_extent.max(0.0);
        let start = if settings.initial_offset.is_finite() {
            settings.initial_offset.clamp(0.0, max_extent)
        } else {
            0.0
        };
        Self {
            animation: None,
            current: start,
            target: start,
            last_reported: start,
            max_extent,
            lerp: settings.lerp,
            multiplier: settings.multiplier,
            device: settings.device,
            running: true,
        }
    }

    /// Check if a scroll-to animation is active
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Final position once motion settles
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.target)
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    #[inline]
    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_extent)
    }
}

impl ScrollEngine for AnimatedEngine {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
        self.animation = None;
        self.target = self.current;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn scroll_to(&mut self, top: f64, scroll: &ResolvedScroll, now: Instant) {
        if !self.running {
            return;
        }
        let to = self.clamp(top);

        if scroll.duration.is_zero() {
            self.animation = None;
            self.current = to;
            self.target = to;
            return;
        }

        // Skip animation if already at target
        if self.current == to {
            self.animation = None;
            self.target = to;
            return;
        }

        // Start from the visible position so a redirect has no jump
        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current,
            to,
            duration: scroll.duration,
            easing: scroll.easing,
        });
        self.target = to;
    }

    fn input(&mut self, delta_y: f64) {
        if !self.running || !delta_y.is_finite() {
            return;
        }
        // User input takes over from a running scroll-to
        if self.animation.take().is_some() {
            self.target = self.current;
        }
        self.target = self.clamp(self.target + delta_y * self.multiplier);
    }

    fn update(&mut self, max_extent: f64, device: DeviceClass, multiplier: f64) {
        self.max_extent = max_extent.max(0.0);
        self.device = device;
        self.multiplier = multiplier;
        self.current = self.clamp(self.current);
        self.target = self.clamp(self.target);
        if let Some(anim) = self.animation.as_mut() {
            anim.to = anim.to.clamp(0.0, self.max_extent);
        }
        debug!(max_extent = self.max_extent, ?device, "Engine layout updated");
    }

    fn needs_frame(&self) -> bool {
        self.running && (self.animation.is_some() || self.current != self.target)
    }

    fn frame(&mut self, now: Instant) -> Option<RawTick> {
        if !self.running {
            return None;
        }

        if let Some(ref anim) = self.animation {
            if is_complete(anim.start, now, anim.duration) {
                self.current = anim.to;
                self.animation = None;
            } else {
                let t = progress(anim.start, now, anim.duration);
                self.current = lerp(anim.from, anim.to, anim.easing.apply(t));
            }
        } else if self.current != self.target {
            self.current = lerp(self.current, self.target, self.lerp);
            if (self.target - self.current).abs() < SNAP_DISTANCE {
                self.current = self.target;
            }
        }

        let delta = self.current - self.last_reported;
        if delta == 0.0 {
            return None;
        }
        self.last_reported = self.current;

        Some(RawTick {
            direction: ScrollDirection::between(self.current - delta, self.current),
            speed: delta,
            offset: self.current,
            max_extent: self.max_extent,
        })
    }

    fn offset(&self) -> f64 {
        self.current
    }

    fn destroy(&mut self) {
        self.running = false;
        self.animation = None;
    }
}

/// Factory for `AnimatedEngine`
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimatedEngineFactory;

impl EngineFactory for AnimatedEngineFactory {
    fn create(&self, container: &str, settings: &EngineSettings) -> Result<Box<dyn ScrollEngine>> {
        if !(settings.lerp > 0.0 && settings.lerp <= 1.0) {
            return Err(Error::EngineInit(format!(
                "lerp must be within (0, 1], got {}",
                settings.lerp
            )));
        }
        if !settings.multiplier.is_finite() || settings.multiplier <= 0.0 {
            return Err(Error::EngineInit(format!(
                "multiplier must be positive, got {}",
                settings.multiplier
            )));
        }
        debug!(container, ?settings.device, "Creating animated engine");
        Ok(Box::new(AnimatedEngine::new(settings)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ScrollConfig;

    fn engine(max_extent: f64) -> AnimatedEngine {
        AnimatedEngine::new(&EngineSettings::new(&ScrollConfig::default(), 1280.0, max_extent))
    }

    fn scroll(duration_ms: u64) -> ResolvedScroll {
        ResolvedScroll {
            offset: 0.0,
            duration: Duration::from_millis(duration_ms),
            easing: EasingType::Linear,
        }
    }

    #[test]
    fn test_animation_reaches_target() {
        let mut engine = engine(1000.0);
        let t0 = Instant::now();
        engine.scroll_to(600.0, &scroll(100), t0);
        assert!(engine.is_animating());

        let mid = engine.frame(t0 + Duration::from_millis(50)).unwrap();
        assert!((mid.offset - 300.0).abs() < 0.001);
        assert_eq!(mid.direction, ScrollDirection::Down);

        let end = engine.frame(t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(end.offset, 600.0);
        assert!(!engine.is_animating());
        assert!(engine.frame(t0 + Duration::from_millis(116)).is_none());
    }

    #[test]
    fn test_redirect_starts_from_visible_position() {
        let mut engine = engine(1000.0);
        let t0 = Instant::now();
        engine.scroll_to(800.0, &scroll(100), t0);
        engine.frame(t0 + Duration::from_millis(50));
        let midway = engine.offset();

        // Last call wins
        engine.scroll_to(0.0, &scroll(100), t0 + Duration::from_millis(50));
        assert_eq!(engine.target(), 0.0);
        let tick = engine.frame(t0 + Duration::from_millis(60)).unwrap();
        assert!(tick.offset < midway);
        assert_eq!(tick.direction, ScrollDirection::Up);
    }

    #[test]
    fn test_input_glides_with_lerp() {
        let mut engine = engine(1000.0);
        let now = Instant::now();
        engine.input(100.0);
        let tick = engine.frame(now).unwrap();
        // Default lerp 0.1
        assert!((tick.offset - 10.0).abs() < 0.001);
        assert!((tick.speed - 10.0).abs() < 0.001);

        for _ in 0..200 {
            engine.frame(now);
        }
        assert_eq!(engine.offset(), 100.0);
        assert!(!engine.needs_frame());
    }

    #[test]
    fn test_positions_clamp_to_extent() {
        let mut engine = engine(500.0);
        engine.scroll_to(9000.0, &scroll(0), Instant::now());
        assert_eq!(engine.offset(), 500.0);
        engine.input(-9000.0);
        assert_eq!(engine.target(), 0.0);
    }

    #[test]
    fn test_stopped_engine_is_inert() {
        let mut engine = engine(1000.0);
        engine.stop();
        engine.input(100.0);
        engine.scroll_to(400.0, &scroll(0), Instant::now());
        assert!(engine.frame(Instant::now()).is_none());
        assert_eq!(engine.offset(), 0.0);

        engine.start();
        engine.input(100.0);
        assert!(engine.frame(Instant::now()).is_some());
    }

    #[test]
    fn test_update_shrinks_extent() {
        let mut engine = engine(1000.0);
        engine.scroll_to(900.0, &scroll(0), Instant::now());
        engine.update(400.0, DeviceClass::Tablet, 2.0);
        assert_eq!(engine.offset(), 400.0);
        assert_eq!(engine.device(), DeviceClass::Tablet);
    }

    #[test]
    fn test_starts_from_initial_offset() {
        let settings = EngineSettings::new(&ScrollConfig::default(), 1280.0, 1000.0)
            .with_initial_offset(600.0);
        let mut engine = AnimatedEngine::new(&settings);
        assert_eq!(engine.offset(), 600.0);
        assert!(!engine.needs_frame());
        assert!(engine.frame(Instant::now()).is_none());

        let past_end = EngineSettings::new(&ScrollConfig::default(), 1280.0, 1000.0)
            .with_initial_offset(5000.0);
        assert_eq!(AnimatedEngine::new(&past_end).offset(), 1000.0);
    }

    #[test]
    fn test_factory_rejects_bad_lerp() {
        let config = ScrollConfig {
            lerp: 0.0,
            ..Default::default()
        };
        let settings = EngineSettings::new(&config, 1280.0, 100.0);
        assert!(matches!(
            AnimatedEngineFactory.create("main", &settings),
            Err(Error::EngineInit(_))
        ));
    }
}
