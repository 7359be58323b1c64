//! Lock-protected random generator shared between sampling calls

use super::xoshiro256::Xoshiro256;
use parking_lot::{Mutex, MutexGuard};
use rand::Rng;
use std::sync::{Arc, OnceLock};

/// Source of uniform samples in `[0, 1)`
///
/// This is the only capability the sampling kernels need from a random
/// generator. Implementations must never return values outside `[0, 1]`.
pub trait UniformSource {
    /// Produce the next uniform value in `[0, 1)`
    fn next_uniform(&mut self) -> f64;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// Mutable state of a [`Generator`]
///
/// Only reachable through [`Generator::lock`], so every access is serialized.
#[derive(Clone, Debug)]
pub struct GeneratorState {
    engine: Xoshiro256,
    seed: u64,
}

impl GeneratorState {
    fn new(seed: u64) -> Self {
        Self {
            engine: Xoshiro256::from_seed(seed),
            seed,
        }
    }

    /// Seed the engine was last initialized with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from `seed`
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }
}

impl UniformSource for GeneratorState {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.engine.next_f64()
    }
}

/// Seedable random generator guarded by a mutex
///
/// Share it between callers with `Arc<Generator>`. Sampling calls hold the
/// lock for their whole duration, so concurrent calls serialize rather than
/// interleave draws.
///
/// # Example
///
/// ```
/// use catdraw::random::{Generator, UniformSource};
///
/// let generator = Generator::new(42);
/// let first = generator.lock().next_uniform();
///
/// generator.manual_seed(42);
/// assert_eq!(generator.lock().next_uniform(), first);
/// ```
#[derive(Debug)]
pub struct Generator {
    state: Mutex<GeneratorState>,
}

impl Generator {
    /// Create a generator with a fixed seed
    pub fn new(seed: u64) -> Self {
        Self {
            state: Mutex::new(GeneratorState::new(seed)),
        }
    }

    /// Create a generator seeded from the thread-local OS-seeded RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    /// Acquire exclusive access to the generator state
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, GeneratorState> {
        self.state.lock()
    }

    /// Acquire the state only if no other caller holds it
    pub fn try_lock(&self) -> Option<MutexGuard<'_, GeneratorState>> {
        self.state.try_lock()
    }

    /// Restart the sequence from `seed`
    pub fn manual_seed(&self, seed: u64) {
        self.state.lock().reseed(seed);
    }

    /// Seed the generator was last initialized with
    pub fn initial_seed(&self) -> u64 {
        self.state.lock().seed()
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

static DEFAULT_GENERATOR: OnceLock<Arc<Generator>> = OnceLock::new();

/// Process-wide generator used when no explicit generator is supplied
///
/// Seeded from OS entropy on first use. Every call returns a handle to the
/// same generator.
pub fn default_generator() -> Arc<Generator> {
    Arc::clone(DEFAULT_GENERATOR.get_or_init(|| Arc::new(Generator::from_entropy())))
}

/// Adapter exposing any `rand` RNG as a [`UniformSource`]
#[derive(Clone, Debug)]
pub struct RngSource<R>(pub R);

impl<R: Rng> UniformSource for RngSource<R> {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}
