/// Fixed-step playback clock for headless runs.
///
/// Frame `n` is stamped at exactly `n * 1000 / frame_rate` ms, so results do
/// not depend on how fast the host actually loops.
pub struct FrameClock {
    frame_rate: u32,
    frame: u64,
    frames_since_last_report: u32,
}

impl FrameClock {
    pub fn new(frame_rate: u32) -> Self {
        FrameClock {
            frame_rate: frame_rate.max(1),
            frame: 0,
            frames_since_last_report: 0,
        }
    }

    #[inline(always)]
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.frame_rate as f64
    }

    #[inline(always)]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Playback time of the current frame.
    #[inline(always)]
    pub fn now_ms(&self) -> f64 {
        self.frame as f64 * 1000.0 / self.frame_rate as f64
    }

    /// Steps to the next frame. Returns `Some(frames)` once per second of
    /// playback time, carrying the number of frames in that second.
    pub fn tick(&mut self) -> Option<u32> {
        self.frame += 1;
        self.frames_since_last_report += 1;

        if self.frame % self.frame_rate as u64 == 0 {
            let frames = self.frames_since_last_report;
            self.frames_since_last_report = 0;
            Some(frames)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FrameClock;

    #[test]
    fn frames_are_evenly_spaced() {
        let mut clock = FrameClock::new(120);
        assert_eq!(clock.now_ms(), 0.0);
        for _ in 0..3 {
            clock.tick();
        }
        assert_eq!(clock.frame(), 3);
        assert!((clock.now_ms() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn reports_once_per_second() {
        let mut clock = FrameClock::new(60);
        let reports: Vec<u32> = (0..150).filter_map(|_| clock.tick()).collect();
        assert_eq!(reports, vec![60, 60]);
    }

    #[test]
    fn zero_rate_is_clamped() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.frame_ms(), 1000.0);
    }
}
