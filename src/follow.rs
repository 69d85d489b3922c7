/// Relative offsets at or past this count as "at the end".
const END_THRESHOLD: f32 = 0.999;

/// Autoscroll state: whether a reload should snap the view to the end.
///
/// Starts on. Scrolling away from the end turns it off, scrolling back to
/// the end turns it on again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Follow {
    enabled: bool,
}

impl Default for Follow {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Follow {
    pub fn enabled(self) -> bool {
        self.enabled
    }

    /// Update from the scrollable's vertical relative offset.
    ///
    /// NaN means the content fits without scrolling, so the end is visible.
    /// Returns true if the state flipped.
    pub fn observe(&mut self, relative_y: f32) -> bool {
        let at_end = relative_y.is_nan() || relative_y >= END_THRESHOLD;
        let flipped = at_end != self.enabled;
        self.enabled = at_end;
        flipped
    }

    pub fn resume(&mut self) {
        self.enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_following() {
        assert!(Follow::default().enabled());
    }

    #[test]
    fn scrolling_up_pauses() {
        let mut follow = Follow::default();
        assert!(follow.observe(0.4));
        assert!(!follow.enabled());
    }

    #[test]
    fn scrolling_back_to_end_resumes() {
        let mut follow = Follow::default();
        follow.observe(0.2);
        assert!(follow.observe(1.0));
        assert!(follow.enabled());
    }

    #[test]
    fn nearly_at_end_counts_as_end() {
        let mut follow = Follow::default();
        follow.observe(0.5);
        follow.observe(0.9995);
        assert!(follow.enabled());
    }

    #[test]
    fn content_that_fits_keeps_following() {
        let mut follow = Follow::default();
        assert!(!follow.observe(f32::NAN));
        assert!(follow.enabled());
    }

    #[test]
    fn repeated_scroll_in_same_region_does_not_flip() {
        let mut follow = Follow::default();
        assert!(follow.observe(0.3));
        assert!(!follow.observe(0.1));
        assert!(!follow.enabled());
    }

    #[test]
    fn resume_overrides_pause() {
        let mut follow = Follow::default();
        follow.observe(0.0);
        follow.resume();
        assert!(follow.enabled());
    }
}
