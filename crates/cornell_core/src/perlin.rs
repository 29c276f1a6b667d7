//! Improved Perlin gradient noise.

use cornell_math::Vec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const PERM_SIZE: usize = 256;

/// Seeded 3D gradient noise.
///
/// The permutation table is built once at construction and never mutated,
/// so a `Perlin` can be shared freely between render threads.
#[derive(Clone, Debug)]
pub struct Perlin {
    perm: [u8; PERM_SIZE * 2],
}

impl Perlin {
    /// Build the permutation table from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..PERM_SIZE).map(|i| i as u8).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        table.shuffle(&mut rng);

        let mut perm = [0u8; PERM_SIZE * 2];
        perm[..PERM_SIZE].copy_from_slice(&table);
        perm[PERM_SIZE..].copy_from_slice(&table);

        Self { perm }
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// Noise value at `point`, roughly in [-1, 1].
    pub fn noise(&self, point: Vec3) -> f32 {
        let floor = point.floor();
        let xi = (floor.x as i32 & 255) as usize;
        let yi = (floor.y as i32 & 255) as usize;
        let zi = (floor.z as i32 & 255) as usize;

        let Vec3 { x, y, z } = point - floor;
        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let a = self.p(xi) + yi;
        let aa = self.p(a) + zi;
        let ab = self.p(a + 1) + zi;
        let b = self.p(xi + 1) + yi;
        let ba = self.p(b) + zi;
        let bb = self.p(b + 1) + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(self.p(aa), x, y, z), grad(self.p(ba), x - 1.0, y, z)),
                lerp(
                    u,
                    grad(self.p(ab), x, y - 1.0, z),
                    grad(self.p(bb), x - 1.0, y - 1.0, z),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(self.p(aa + 1), x, y, z - 1.0),
                    grad(self.p(ba + 1), x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(self.p(ab + 1), x, y - 1.0, z - 1.0),
                    grad(self.p(bb + 1), x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }

    /// Sum of `octaves` noise layers, each at double the frequency and
    /// `persistence` times the amplitude of the previous one, normalized by
    /// the total amplitude.
    pub fn octave_noise(&self, point: Vec3, octaves: u32, persistence: f32) -> f32 {
        let mut total = 0.0f32;
        let mut frequency = 1.0f32;
        let mut amplitude = 1.0f32;
        let mut max_value = 0.0f32;

        for _ in 0..octaves {
            total += self.noise(point * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        if max_value > 0.0 {
            total / max_value
        } else {
            0.0
        }
    }
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: usize, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
