//! Active-section highlighting by viewport intersection
//!
//! Independent of the scroll bridge: it only needs the viewport position and
//! the section landmarks.

use crate::document::Landmark;

/// Tracks which page section the reader is looking at
#[derive(Debug, Clone)]
pub struct ActiveSection {
    threshold: f64,
    margin_top: f64,
    margin_bottom: f64,
    landmarks: Vec<Landmark>,
    active: Option<String>,
}

impl ActiveSection {
    /// `margin_top`/`margin_bottom` are viewport shares trimmed off the
    /// observation band, pulling it toward the vertical center.
    pub fn new(threshold: f64, margin_top: f64, margin_bottom: f64) -> Self {
        Self {
            threshold,
            margin_top,
            margin_bottom,
            landmarks: Vec::new(),
            active: None,
        }
    }

    /// Replace the observed landmarks, e.g. after a layout change
    pub fn set_landmarks(&mut self, landmarks: Vec<Landmark>) {
        self.landmarks = landmarks;
        if let Some(active) = &self.active {
            if !self.landmarks.iter().any(|l| &l.id == active) {
                self.active = None;
            }
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Observation band in document coordinates
    fn band(&self, scroll_y: f64, viewport_height: f64) -> (f64, f64) {
        let top = scroll_y + viewport_height * self.margin_top;
        let bottom = scroll_y + viewport_height * (1.0 - self.margin_bottom);
        (top, bottom.max(top))
    }

    /// Share of a landmark inside the band
    ///
    /// Measured against the smaller of landmark and band so sections taller
    /// than the band can still reach the threshold.
    fn visible_ratio(landmark: &Landmark, band: (f64, f64)) -> f64 {
        let overlap = (landmark.top + landmark.height).min(band.1) - landmark.top.max(band.0);
        let basis = landmark.height.min(band.1 - band.0);
        if overlap <= 0.0 || basis <= 0.0 {
            return 0.0;
        }
        (overlap / basis).min(1.0)
    }

    /// Recompute for the current viewport; returns the id when it changed
    pub fn observe(&mut self, scroll_y: f64, viewport_height: f64) -> Option<&str> {
        let band = self.band(scroll_y, viewport_height);
        let center = (band.0 + band.1) / 2.0;

        let best = self
            .landmarks
            .iter()
            .filter(|l| Self::visible_ratio(l, band) >= self.threshold)
            .min_by(|a, b| {
                let da = (a.top + a.height / 2.0 - center).abs();
                let db = (b.top + b.height / 2.0 - center).abs();
                da.total_cmp(&db)
            })
            .map(|l| l.id.clone());

        // Nothing qualifies: keep the last highlight rather than flicker
        match best {
            Some(id) if self.active.as_deref() != Some(id.as_str()) => {
                self.active = Some(id);
                self.active.as_deref()
            }
            _ => None,
        }
    }
}
