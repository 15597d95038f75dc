//! Seeded lattice value noise.
//!
//! [`ValueNoise`] owns its permutation table; sampling is `&self` and pure,
//! so a generator can hold several independent channels side by side.

/// Octave table: `(frequency, weight)`. Weights sum to 1.
pub const OCTAVES: [(f64, f64); 3] = [(0.05, 0.5), (0.1, 0.3), (0.2, 0.2)];

const TABLE_SIZE: usize = 256;

/// 2D value noise over the integer lattice.
#[derive(Clone, PartialEq, Eq)]
pub struct ValueNoise {
    perm: [u8; TABLE_SIZE],
}

impl ValueNoise {
    /// Builds a noise channel by shuffling the permutation table with `rng`.
    #[must_use]
    pub fn new(rng: &mut fastrand::Rng) -> Self {
        let mut perm = [0u8; TABLE_SIZE];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = i as u8;
        }
        rng.shuffle(&mut perm);
        Self { perm }
    }

    /// Builds a noise channel directly from a seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(&mut fastrand::Rng::with_seed(seed))
    }

    /// Lattice value in [0, 1].
    fn lattice(&self, x: i64, y: i64) -> f64 {
        let hx = self.perm[(x & 0xff) as usize] as usize;
        let h = self.perm[hx ^ (y & 0xff) as usize];
        f64::from(h) / 255.0
    }

    /// Samples the channel at `(x, y)`. Output lies in [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let fx = x.floor();
        let fy = y.floor();
        let ix = fx as i64;
        let iy = fy as i64;
        let wx = quintic(x - fx);
        let wy = quintic(y - fy);

        let v00 = self.lattice(ix, iy);
        let v10 = self.lattice(ix + 1, iy);
        let v01 = self.lattice(ix, iy + 1);
        let v11 = self.lattice(ix + 1, iy + 1);

        let top = lerp(v00, v10, wx);
        let bottom = lerp(v01, v11, wx);
        (lerp(top, bottom, wy) * 2.0 - 1.0).clamp(-1.0, 1.0)
    }

    /// Weighted sum of [`OCTAVES`] at tile `(x, y)`, scaled by `amplitude`
    /// and clamped to [-1, 1].
    #[must_use]
    pub fn octaves(&self, x: f64, y: f64, amplitude: f64) -> f64 {
        let sum: f64 = OCTAVES
            .iter()
            .map(|&(frequency, weight)| weight * self.sample(x * frequency, y * frequency))
            .sum();
        (sum * amplitude).clamp(-1.0, 1.0)
    }
}

impl std::fmt::Debug for ValueNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueNoise")
            .field("perm_head", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

fn quintic(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_seed_same_samples() {
        let a = ValueNoise::with_seed(42);
        let b = ValueNoise::with_seed(42);
        assert_eq!(a, b);
        for i in 0..50 {
            let x = f64::from(i) * 0.37;
            assert_eq!(a.sample(x, x * 1.3).to_bits(), b.sample(x, x * 1.3).to_bits());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = ValueNoise::with_seed(42);
        let b = ValueNoise::with_seed(999);
        let differs = (0..64).any(|i| {
            let x = f64::from(i) * 0.5;
            a.sample(x, 3.25) != b.sample(x, 3.25)
        });
        assert!(differs);
    }

    #[test]
    fn test_lattice_points_hit_table_values() {
        let noise = ValueNoise::with_seed(5);
        let v = noise.sample(3.0, 7.0);
        assert!((v - (noise.lattice(3, 7) * 2.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_octave_weights_sum_to_one() {
        let total: f64 = OCTAVES.iter().map(|&(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_sample_bounded(seed in any::<u64>(), x in -1.0e4f64..1.0e4, y in -1.0e4f64..1.0e4) {
            let noise = ValueNoise::with_seed(seed);
            let v = noise.sample(x, y);
            prop_assert!((-1.0..=1.0).contains(&v));
            let o = noise.octaves(x, y, 3.0);
            prop_assert!((-1.0..=1.0).contains(&o));
        }
    }
}
