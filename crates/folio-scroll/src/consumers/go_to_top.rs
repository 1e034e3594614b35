//! Scroll-to-top control visibility

use crate::state::NativeScroll;

/// Visible once either scroll source says the reader left the top
///
/// Each source keeps its own trigger because the two channels are not
/// ordered against each other and either may be silent.
#[derive(Debug, Clone)]
pub struct GoToTop {
    progress_threshold: f64,
    viewport_ratio: f64,
    smooth_trigger: bool,
    native_trigger: bool,
}

impl GoToTop {
    pub fn new(progress_threshold: f64, viewport_ratio: f64) -> Self {
        Self {
            progress_threshold,
            viewport_ratio,
            smooth_trigger: false,
            native_trigger: false,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.smooth_trigger || self.native_trigger
    }

    pub fn on_progress(&mut self, progress: f64) -> bool {
        self.smooth_trigger = progress > self.progress_threshold;
        self.is_visible()
    }

    pub fn on_native(&mut self, native: &NativeScroll) -> bool {
        self.native_trigger = native.scroll_y > native.viewport_height * self.viewport_ratio;
        self.is_visible()
    }
}
