//! Random number generation for sampling
//!
//! - [`Generator`]: seedable Xoshiro256++ engine behind a `parking_lot` mutex
//! - [`UniformSource`]: the `[0, 1)` draw capability kernels consume
//! - [`RngSource`]: adapter for plugging in any `rand` RNG

mod generator;
mod xoshiro256;

pub use generator::{Generator, GeneratorState, RngSource, UniformSource, default_generator};
pub use xoshiro256::Xoshiro256;
