// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It drives galaxy jitter, star placement and drift so a seed reproduces a scene.

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    /// Derive an independent stream for chunk `salt` (splitmix64 of seed ^ salt).
    pub fn derive(seed: u64, salt: u64) -> Self {
        let mut z = seed ^ salt.wrapping_mul(0x9E3779B97F4A7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        Self::new(z ^ (z >> 31))
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    pub fn next_f32_01(&mut self) -> f32 {
        // 24 mantissa bits so the result is strictly below 1.0 after rounding.
        let x = self.next_u32() >> 8;
        (x as f32) / ((1u32 << 24) as f32)
    }

    #[inline]
    pub fn gen_range_f32(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_f32_01()
    }

    /// +1.0 or -1.0 with equal odds.
    #[inline]
    pub fn gen_sign(&mut self) -> f32 {
        if self.next_f32_01() < 0.5 {
            1.0
        } else {
            -1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_draws_stay_in_half_open_range() {
        let mut rng = Prng::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f32_01();
            assert!((0.0..1.0).contains(&v), "draw out of range: {v}");
        }
    }

    #[test]
    fn derived_streams_differ_per_salt() {
        let mut a = Prng::derive(42, 0);
        let mut b = Prng::derive(42, 1);
        assert_ne!(a.next_u32(), b.next_u32());

        let mut a2 = Prng::derive(42, 0);
        let mut a3 = Prng::derive(42, 0);
        assert_eq!(a2.next_u32(), a3.next_u32());
    }
}
