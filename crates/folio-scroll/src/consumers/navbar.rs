//! Navigation bar auto-hide

/// Hides on downward scroll past a threshold, reappears on any upward delta
#[derive(Debug, Clone)]
pub struct Navbar {
    hide_threshold: f64,
    last_offset: f64,
    visible: bool,
}

impl Navbar {
    pub fn new(hide_threshold: f64) -> Self {
        Self {
            hide_threshold,
            last_offset: 0.0,
            visible: true,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Feed the latest offset from either scroll source; returns visibility
    pub fn on_offset(&mut self, offset: f64) -> bool {
        if offset > self.last_offset && offset > self.hide_threshold {
            self.visible = false;
        } else if offset < self.last_offset {
            self.visible = true;
        }
        self.last_offset = offset;
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_then_up() {
        let mut navbar = Navbar::new(150.0);
        let flags: Vec<bool> = [0.0, 200.0, 180.0].iter().map(|y| navbar.on_offset(*y)).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_stays_visible_below_threshold() {
        let mut navbar = Navbar::new(150.0);
        assert!(navbar.on_offset(100.0));
        assert!(navbar.on_offset(149.0));
        assert!(!navbar.on_offset(151.0));
        // Holding still keeps the current state
        assert!(!navbar.on_offset(151.0));
    }
}
