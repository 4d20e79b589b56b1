/// Fixed-timestep clock for the simulation.
/// Turns variable frame deltas into a bounded number of fixed ticks.
#[derive(Debug, Clone)]
pub struct SimClock {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Upper bound on ticks per frame (spiral-of-death guard).
    max_steps: u32,
    ticks: u64,
}

impl SimClock {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
            ticks: 0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        self.ticks += steps as u64;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Fixed ticks handed out so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds covered by those ticks.
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 * self.dt as f64
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut clock = SimClock::new(0.25, 10);
        assert_eq!(clock.accumulate(0.25), 1);
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut clock = SimClock::new(1.0 / 60.0, 10);
        assert_eq!(clock.accumulate(0.008), 0);
        assert_eq!(clock.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_max_steps() {
        let mut clock = SimClock::new(1.0 / 60.0, 4);
        assert_eq!(clock.accumulate(1.0), 4);
        assert_eq!(clock.ticks(), 4);
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut clock = SimClock::new(0.5, 10);
        assert_eq!(clock.accumulate(-3.0), 0);
        let a = clock.alpha();
        assert!((0.0..=1.0).contains(&a), "alpha was {}", a);
    }

    #[test]
    fn elapsed_tracks_ticks() {
        let mut clock = SimClock::new(0.5, 10);
        clock.accumulate(1.5);
        assert_eq!(clock.elapsed(), 1.5);
        clock.reset();
        assert_eq!(clock.ticks(), 0);
    }
}
