//! Seeded 2D value noise used to roughen the tunnel rings.

use rand::Rng;
use rand::seq::SliceRandom;

const TABLE_SIZE: usize = 256;

/// Lattice values in [-1, 1] addressed through a shuffled permutation,
/// smoothly interpolated between lattice points.
#[derive(Debug, Clone)]
pub struct ValueNoise {
    perm: [u8; TABLE_SIZE],
    values: [f64; TABLE_SIZE],
}

fn fade(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

impl ValueNoise {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut perm = [0u8; TABLE_SIZE];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = i as u8;
        }
        perm.shuffle(rng);

        let mut values = [0.0; TABLE_SIZE];
        for v in values.iter_mut() {
            *v = rng.random::<f64>() * 2.0 - 1.0;
        }
        Self { perm, values }
    }

    fn lattice(&self, ix: i64, iy: i64) -> f64 {
        let x = (ix & 255) as usize;
        let y = (iy & 255) as usize;
        let h = self.perm[(self.perm[x] as usize + y) & 255];
        self.values[h as usize]
    }

    /// Sample the field. Continuous in both coordinates; output in [-1, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let u = fade(x - x0);
        let v = fade(y - y0);
        let (ix, iy) = (x0 as i64, y0 as i64);

        let a = self.lattice(ix, iy);
        let b = self.lattice(ix + 1, iy);
        let c = self.lattice(ix, iy + 1);
        let d = self.lattice(ix + 1, iy + 1);

        a * (1.0 - u) * (1.0 - v) + b * u * (1.0 - v) + c * (1.0 - u) * v + d * u * v
    }
}
