//! The precomputed Elo win-probability table and its forward FFT.
//!
//! `p(delta) = 1 / (1 + 10^(delta/400))` is tabulated over a cyclic axis of
//! length `2 * MAX` so that a circular convolution of a rating histogram
//! against `P` (this table's forward transform) computes, for every rating
//! `r`, the seed sum over all other contestants in one FFT pass instead of
//! one direct sum per rating.

use std::sync::LazyLock;

use num_complex::Complex64;

use super::fft::fft;

/// Half-length of the cyclic rating-difference axis. The full axis, and the
/// histogram/FFT buffers built over it, have length `2 * MAX`.
pub const MAX: usize = 8192;

pub struct EloTable {
    /// `p[i]` for `i` in `[0, 2*MAX)`, indexed by `(rating_diff) mod 2*MAX`.
    probability: Vec<f64>,
    /// Forward FFT of `probability`, reused by `calculator` on every call.
    pub(crate) fft: Vec<Complex64>,
}

static TABLE: LazyLock<EloTable> = LazyLock::new(EloTable::build);

impl EloTable {
    pub fn get() -> &'static EloTable {
        &TABLE
    }

    fn build() -> Self {
        let mut probability = vec![0.0f64; 2 * MAX];
        probability[0] = win_probability(0);

        for i in 1..=MAX {
            let p = win_probability(i as i64);
            probability[i] = p;
            probability[2 * MAX - i] = 1.0 - p;
        }

        let mut fft_buf: Vec<Complex64> = probability
            .iter()
            .map(|&p| Complex64::new(p, 0.0))
            .collect();
        fft(&mut fft_buf, false);

        EloTable {
            probability,
            fft: fft_buf,
        }
    }

    /// `p[delta mod 2*MAX]`. `index` is reduced modulo `2*MAX` so negative
    /// or wrap-around rating differences fold cleanly.
    pub fn win_probability_at(&self, index: i64) -> f64 {
        self.probability[rem(index)]
    }
}

/// `1 / (1 + 10^(delta/400))`, the probability a player rated `delta` below
/// another wins.
fn win_probability(delta: i64) -> f64 {
    1.0 / (1.0 + 10f64.powf(delta as f64 / 400.0))
}

/// Reduces `index` modulo `2*MAX`, tolerating negative inputs.
pub fn rem(index: i64) -> usize {
    let m = 2 * MAX as i64;
    (((index % m) + m) % m) as usize
}
