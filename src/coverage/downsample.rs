use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Resolution of the keep/drop draw
const DRAW_RANGE: u32 = 10_000;

/// Keep/drop decisions with a fixed probability of keeping.
///
/// Each call draws in `[0, 10000)` and keeps when the draw falls below
/// `fraction * 10000`, so fractions finer than 1/10000 are truncated.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
    cutoff: u32,
}

impl Sampler {
    /// Keep roughly `fraction` of whatever is offered.
    ///
    /// A `seed` makes the selection reproducible; without one the generator is seeded
    /// from the operating system.
    #[must_use]
    pub fn new(fraction: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to 0..=10000
        let cutoff = (fraction.clamp(0.0, 1.0) * f64::from(DRAW_RANGE)) as u32;
        Self { rng, cutoff }
    }

    pub fn keep(&mut self) -> bool {
        self.rng.random_range(0..DRAW_RANGE) < self.cutoff
    }

    /// Thin a read stream. Errors are always passed through so they still surface.
    pub fn downsample<T, E, I>(mut self, items: I) -> impl Iterator<Item = Result<T, E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        items
            .into_iter()
            .filter(move |item| item.is_err() || self.keep())
    }
}
