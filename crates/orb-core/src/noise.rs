//! Four-dimensional simplex noise (three spatial axes plus time).
//!
//! Follows the classic skewed-simplex construction: skew the input onto a
//! lattice of 4-simplices, rank the offset components to pick the traversal
//! order, and sum five radially attenuated gradient contributions.

use rand::seq::SliceRandom;
use rand::Rng;

// (sqrt(5) - 1) / 4 and (5 - sqrt(5)) / 20
const F4: f32 = 0.309_017;
const G4: f32 = 0.138_196_6;

// Output scale that keeps the sum just inside [-1, 1]
const OUTPUT_SCALE: f32 = 27.0;

const GRAD4: [[f32; 4]; 32] = [
    [0.0, 1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0, -1.0],
    [0.0, 1.0, -1.0, 1.0],
    [0.0, 1.0, -1.0, -1.0],
    [0.0, -1.0, 1.0, 1.0],
    [0.0, -1.0, 1.0, -1.0],
    [0.0, -1.0, -1.0, 1.0],
    [0.0, -1.0, -1.0, -1.0],
    [1.0, 0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, -1.0],
    [1.0, 0.0, -1.0, 1.0],
    [1.0, 0.0, -1.0, -1.0],
    [-1.0, 0.0, 1.0, 1.0],
    [-1.0, 0.0, 1.0, -1.0],
    [-1.0, 0.0, -1.0, 1.0],
    [-1.0, 0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, -1.0],
    [1.0, -1.0, 0.0, 1.0],
    [1.0, -1.0, 0.0, -1.0],
    [-1.0, 1.0, 0.0, 1.0],
    [-1.0, 1.0, 0.0, -1.0],
    [-1.0, -1.0, 0.0, 1.0],
    [-1.0, -1.0, 0.0, -1.0],
    [1.0, 1.0, 1.0, 0.0],
    [1.0, 1.0, -1.0, 0.0],
    [1.0, -1.0, 1.0, 0.0],
    [1.0, -1.0, -1.0, 0.0],
    [-1.0, 1.0, 1.0, 0.0],
    [-1.0, 1.0, -1.0, 0.0],
    [-1.0, -1.0, 1.0, 0.0],
    [-1.0, -1.0, -1.0, 0.0],
];

#[derive(Clone)]
pub struct SimplexNoise {
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Build a generator from a shuffled permutation drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut p: Vec<u8> = (0..=255).collect();
        p.shuffle(rng);
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn gradient_index(&self, i: usize, j: usize, k: usize, l: usize) -> usize {
        let p = &self.perm;
        let a = p[l] as usize;
        let b = p[k + a] as usize;
        let c = p[j + b] as usize;
        p[i + c] as usize % 32
    }

    /// Sample the field. Output lies roughly in [-1, 1].
    pub fn noise4d(&self, x: f32, y: f32, z: f32, w: f32) -> f32 {
        let s = (x + y + z + w) * F4;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();
        let l = (w + s).floor();
        let t = (i + j + k + l) * G4;
        let d0 = [x - (i - t), y - (j - t), z - (k - t), w - (l - t)];

        // Rank each component against the others to choose the simplex
        let mut rank = [0u8; 4];
        for a in 0..4 {
            for b in (a + 1)..4 {
                if d0[a] > d0[b] {
                    rank[a] += 1;
                } else {
                    rank[b] += 1;
                }
            }
        }
        let step = |threshold: u8| -> [usize; 4] {
            [
                (rank[0] >= threshold) as usize,
                (rank[1] >= threshold) as usize,
                (rank[2] >= threshold) as usize,
                (rank[3] >= threshold) as usize,
            ]
        };
        let offsets = [[0; 4], step(3), step(2), step(1), [1; 4]];

        let cell = [
            ((i as i32) & 255) as usize,
            ((j as i32) & 255) as usize,
            ((k as i32) & 255) as usize,
            ((l as i32) & 255) as usize,
        ];

        let mut total = 0.0;
        for (corner, off) in offsets.iter().enumerate() {
            let g = G4 * corner as f32;
            let d = [
                d0[0] - off[0] as f32 + g,
                d0[1] - off[1] as f32 + g,
                d0[2] - off[2] as f32 + g,
                d0[3] - off[3] as f32 + g,
            ];
            let gi = self.gradient_index(
                cell[0] + off[0],
                cell[1] + off[1],
                cell[2] + off[2],
                cell[3] + off[3],
            );
            total += contribution(d, &GRAD4[gi]);
        }
        OUTPUT_SCALE * total
    }
}

#[inline]
fn contribution(d: [f32; 4], grad: &[f32; 4]) -> f32 {
    let t = 0.6 - d[0] * d[0] - d[1] * d[1] - d[2] * d[2] - d[3] * d[3];
    if t < 0.0 {
        return 0.0;
    }
    let t2 = t * t;
    t2 * t2 * (grad[0] * d[0] + grad[1] * d[1] + grad[2] * d[2] + grad[3] * d[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn noise_stays_in_range() {
        let noise = SimplexNoise::new(&mut StdRng::seed_from_u64(7));
        for i in 0..2000 {
            let f = i as f32 * 0.37;
            let n = noise.noise4d(f.sin() * 40.0, f * 0.11, -f * 0.07, f * 0.013);
            assert!(n.is_finite());
            assert!(n.abs() <= 1.1, "noise out of range: {n}");
        }
    }

    #[test]
    fn noise_is_deterministic_per_seed() {
        let a = SimplexNoise::new(&mut StdRng::seed_from_u64(99));
        let b = SimplexNoise::new(&mut StdRng::seed_from_u64(99));
        for i in 0..100 {
            let f = i as f32 * 0.21;
            assert_eq!(a.noise4d(f, f * 2.0, f * 3.0, f), b.noise4d(f, f * 2.0, f * 3.0, f));
        }
    }

    #[test]
    fn noise_is_continuous_in_time() {
        let noise = SimplexNoise::new(&mut StdRng::seed_from_u64(3));
        let mut prev = noise.noise4d(0.3, 1.2, -0.7, 0.0);
        for step in 1..500 {
            let w = step as f32 * 1e-3;
            let n = noise.noise4d(0.3, 1.2, -0.7, w);
            assert!((n - prev).abs() < 0.05, "jump at w={w}: {prev} -> {n}");
            prev = n;
        }
    }

    #[test]
    fn lattice_points_sample_to_zero() {
        let noise = SimplexNoise::new(&mut StdRng::seed_from_u64(11));
        assert!(noise.noise4d(0.0, 0.0, 0.0, 0.0).abs() < 1e-6);
    }
}
