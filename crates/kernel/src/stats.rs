/// Frame rate averaged over one-second windows.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frames: u32,
    elapsed: f64,
    fps: f64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame that took `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.frames += 1;
        self.elapsed += f64::from(dt);
        if self.elapsed >= 1.0 {
            self.fps = f64::from(self.frames) / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    /// Average frames per second over the last completed window, 0 until one completes.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn ms_per_frame(&self) -> f64 {
        if self.fps > 0.0 { 1000.0 / self.fps } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_until_first_window() {
        let mut stats = FrameStats::new();
        stats.tick(0.1);
        assert_eq!(stats.fps(), 0.0);
        assert_eq!(stats.ms_per_frame(), 0.0);
    }

    #[test]
    fn averages_over_one_second() {
        let mut stats = FrameStats::new();
        for _ in 0..40 {
            stats.tick(0.025);
        }
        assert!((stats.fps() - 40.0).abs() < 0.5);
        assert!((stats.ms_per_frame() - 25.0).abs() < 0.5);
    }
}
