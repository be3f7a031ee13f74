//! Swipe-to-reply gesture tracking.

/// Release past this offset arms reply mode.
pub const REPLY_THRESHOLD_PX: f32 = 50.0;
/// Drag offsets at or beyond this are ignored.
pub const MAX_TRACKED_OFFSET_PX: f32 = 80.0;
/// The reply hint becomes visible past this offset.
pub const HINT_THRESHOLD_PX: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeRelease {
    /// Released past the threshold; the caller arms reply mode.
    Commit,
    /// Released short of the threshold; the bubble snaps back.
    SnapBack,
}

/// Horizontal drag state for a single message bubble.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwipeGesture {
    start_x: Option<f32>,
    offset: f32,
}

impl SwipeGesture {
    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
        self.offset = 0.0;
    }

    /// Updates the offset. Leftward drags and drags past the cap keep the
    /// last tracked offset.
    pub fn update(&mut self, x: f32) {
        let Some(start_x) = self.start_x else {
            return;
        };

        let diff = x - start_x;
        if diff > 0.0 && diff < MAX_TRACKED_OFFSET_PX {
            self.offset = diff;
        }
    }

    pub fn release(&mut self) -> SwipeRelease {
        let outcome = if self.offset > REPLY_THRESHOLD_PX {
            SwipeRelease::Commit
        } else {
            SwipeRelease::SnapBack
        };

        self.start_x = None;
        self.offset = 0.0;
        outcome
    }

    pub fn is_active(&self) -> bool {
        self.start_x.is_some()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn shows_reply_hint(&self) -> bool {
        self.offset > HINT_THRESHOLD_PX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe(to: f32) -> SwipeRelease {
        let mut gesture = SwipeGesture::default();
        gesture.begin(100.0);
        gesture.update(100.0 + to);
        gesture.release()
    }

    #[test]
    fn release_below_threshold_snaps_back() {
        assert_eq!(swipe(40.0), SwipeRelease::SnapBack);
    }

    #[test]
    fn release_past_threshold_commits() {
        assert_eq!(swipe(60.0), SwipeRelease::Commit);
    }

    #[test]
    fn release_exactly_at_threshold_snaps_back() {
        assert_eq!(swipe(50.0), SwipeRelease::SnapBack);
    }

    #[test]
    fn drag_past_cap_keeps_last_tracked_offset() {
        let mut gesture = SwipeGesture::default();
        gesture.begin(0.0);
        gesture.update(30.0);
        gesture.update(120.0);

        assert_eq!(gesture.offset(), 30.0);
        assert_eq!(gesture.release(), SwipeRelease::SnapBack);
    }

    #[test]
    fn leftward_drag_is_ignored() {
        let mut gesture = SwipeGesture::default();
        gesture.begin(100.0);
        gesture.update(40.0);

        assert_eq!(gesture.offset(), 0.0);
    }

    #[test]
    fn release_resets_offset() {
        let mut gesture = SwipeGesture::default();
        gesture.begin(0.0);
        gesture.update(60.0);
        assert!(gesture.shows_reply_hint());

        gesture.release();

        assert_eq!(gesture.offset(), 0.0);
        assert!(!gesture.is_active());
    }

    #[test]
    fn update_without_begin_is_ignored() {
        let mut gesture = SwipeGesture::default();
        gesture.update(70.0);

        assert_eq!(gesture.release(), SwipeRelease::SnapBack);
    }
}
