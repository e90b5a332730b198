/// Clock and randomness supplied by whatever runs the board.
pub trait Host {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> f64;
    /// Uniform sample in `[0, 1)`.
    fn random_unit(&mut self) -> f64;
}

/// Host with a hand-driven clock and a fixed random sample. Used by tests
/// and tooling that need reproducible boards.
#[derive(Clone, Debug)]
pub struct ManualHost {
    pub now: f64,
    pub sample: f64,
}

impl ManualHost {
    pub fn new(now: f64) -> Self {
        Self { now, sample: 0.5 }
    }

    pub fn advance(&mut self, millis: f64) {
        self.now += millis;
    }
}

impl Host for ManualHost {
    fn now_ms(&self) -> f64 {
        self.now
    }

    fn random_unit(&mut self) -> f64 {
        self.sample
    }
}
