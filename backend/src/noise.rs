use rand::{rngs::StdRng, rngs::ThreadRng, Rng, SeedableRng};

/// Half-width of the per-axis road jitter, in degrees.
pub const JITTER_DEGREES: f64 = 0.0005;
/// Upper bound (exclusive) of the traffic slack added to every duration.
pub const MAX_TRAFFIC_SLACK_MINUTES: f64 = 30.0;

/// Source of the random perturbations applied while synthesizing a route.
///
/// Production code uses [`RandomNoise`]; tests swap in [`NoNoise`] to make the
/// geometry and duration fully deterministic.
pub trait RoadNoise {
    /// Offset in degrees, within `±JITTER_DEGREES`.
    fn jitter(&mut self) -> f64;

    /// Extra minutes in `[0, MAX_TRAFFIC_SLACK_MINUTES)`.
    fn traffic_slack(&mut self) -> f64;
}

pub struct RandomNoise<R> {
    rng: R,
}

impl<R: Rng> RandomNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomNoise<ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RandomNoise<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RoadNoise for RandomNoise<R> {
    fn jitter(&mut self) -> f64 {
        self.rng.gen_range(-JITTER_DEGREES..JITTER_DEGREES)
    }

    fn traffic_slack(&mut self) -> f64 {
        self.rng.gen_range(0.0..MAX_TRAFFIC_SLACK_MINUTES)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoNoise;

impl RoadNoise for NoNoise {
    fn jitter(&mut self) -> f64 {
        0.0
    }

    fn traffic_slack(&mut self) -> f64 {
        0.0
    }
}
