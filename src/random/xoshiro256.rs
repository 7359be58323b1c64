//! Xoshiro256++ PRNG engine
//!
//! Shift-register generator from Blackman & Vigna "Scrambled Linear Pseudorandom Number Generators" (2018)

/// Xoshiro256++ state
#[derive(Clone, Debug)]
pub struct Xoshiro256 {
    s: [u64; 4],
}

impl Xoshiro256 {
    /// Create from seed using SplitMix64
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        let mut sm_state = seed;
        let mut splitmix = || {
            sm_state = sm_state.wrapping_add(0x9e3779b97f4a7c15);
            let mut z = sm_state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
            z ^ (z >> 31)
        };

        Self {
            s: [splitmix(), splitmix(), splitmix(), splitmix()],
        }
    }

    /// Generate next u64
    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        let result = self.s[0]
            .wrapping_add(self.s[3])
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform double in [0, 1)
    #[inline(always)]
    pub fn next_f64(&mut self) -> f64 {
        u64_to_uniform(self.next_u64())
    }
}

/// Convert u64 to uniform float in [0, 1)
#[inline(always)]
pub(crate) fn u64_to_uniform(u: u64) -> f64 {
    // 53 bits for full double precision
    (u >> 11) as f64 / (1u64 << 53) as f64
}
