//! Random sources used to seed and perturb entities.
//!
//! The browser build draws from `Math.random()`; tests inject a seeded
//! xorshift generator so entity placement is reproducible.

/// A source of uniformly distributed floats in `[0, 1)`.
pub trait RandomSource {
	/// Next sample in `[0, 1)`.
	fn next_f64(&mut self) -> f64;

	/// Uniform sample in `[low, high)`.
	fn range(&mut self, low: f64, high: f64) -> f64 {
		low + self.next_f64() * (high - low)
	}

	/// Uniform index in `0..len`. Returns 0 for an empty range.
	fn index(&mut self, len: usize) -> usize {
		if len == 0 {
			return 0;
		}
		((self.next_f64() * len as f64) as usize).min(len - 1)
	}
}

/// Ambient randomness from the host page (`Math.random()`).
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserRandom;

impl RandomSource for BrowserRandom {
	fn next_f64(&mut self) -> f64 {
		js_sys::Math::random()
	}
}

/// Seedable xorshift64 generator. Deterministic across platforms.
#[derive(Clone, Debug)]
pub struct SeededRandom {
	state: u64,
}

impl SeededRandom {
	/// A generator seeded with `seed`. Zero is replaced by a fixed constant.
	pub fn new(seed: u64) -> Self {
		Self {
			state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
		}
	}

	fn next_u64(&mut self) -> u64 {
		let mut x = self.state;
		x ^= x << 13;
		x ^= x >> 7;
		x ^= x << 17;
		self.state = x;
		x
	}
}

impl RandomSource for SeededRandom {
	fn next_f64(&mut self) -> f64 {
		// Top 53 bits give an exactly representable float in [0, 1).
		(self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
	}
}
