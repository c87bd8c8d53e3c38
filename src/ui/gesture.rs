/// Signed horizontal drag distance. No threshold applied here.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    pub fn end(&mut self, x: f32) -> Option<f32> {
        self.start_x.take().map(|start| x - start)
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leftward_swipe_is_negative() {
        let mut tracker = SwipeTracker::default();
        tracker.begin(300.0);
        assert_eq!(tracker.end(250.0), Some(-50.0));
    }

    #[test]
    fn end_without_begin_reports_nothing() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.end(10.0), None);
        tracker.begin(0.0);
        tracker.cancel();
        assert_eq!(tracker.end(10.0), None);
    }
}
