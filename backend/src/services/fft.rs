//! Iterative radix-2 Cooley-Tukey FFT, in place, forward and inverse.
//!
//! This is the sole numerical primitive `elo_table` and `calculator` build
//! on: a circular convolution over the rating axis, computed in
//! O(R log R) instead of the O(R^2) direct sum.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Transforms `buf` in place. `buf.len()` must be a power of two; this is a
/// caller precondition, not a recoverable error.
pub fn fft(buf: &mut [Complex64], inverse: bool) {
    let n = buf.len();
    assert!(
        n.is_power_of_two(),
        "fft: buffer length {n} is not a power of two"
    );

    let half = n >> 1;
    let sign = if inverse { -1.0 } else { 1.0 };
    let w: Vec<Complex64> = (0..half)
        .map(|k| {
            let theta = sign * 2.0 * PI * (k as f64) / (n as f64);
            Complex64::new(theta.cos(), theta.sin())
        })
        .collect();

    let mut rev = vec![0usize; n];
    for i in 1..n {
        rev[i] = (rev[i >> 1] >> 1) | if i & 1 == 1 { half } else { 0 };
        if i < rev[i] {
            buf.swap(i, rev[i]);
        }
    }

    let mut step = 2;
    while step <= n {
        let half_step = step >> 1;
        let diff = n / step;
        let mut i = 0;
        while i < n {
            let mut pw = 0;
            for j in i..i + half_step {
                let v = buf[j + half_step] * w[pw];
                buf[j + half_step] = buf[j] - v;
                buf[j] += v;
                pw += diff;
            }
            i += step;
        }
        step <<= 1;
    }

    if inverse {
        let n_f = n as f64;
        for x in buf.iter_mut() {
            *x /= n_f;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64, eps: f64) -> bool {
        (a - b).norm() < eps
    }

    #[test]
    fn round_trip_preserves_input() {
        for n in [2usize, 4, 8, 16, 64, 256] {
            let original: Vec<Complex64> = (0..n)
                .map(|i| Complex64::new(i as f64, (i as f64) * 0.5 - 1.0))
                .collect();

            let mut buf = original.clone();
            fft(&mut buf, false);
            fft(&mut buf, true);

            let eps = 1e-9 * n as f64;
            for (a, b) in buf.iter().zip(original.iter()) {
                assert!(approx_eq(*a, *b, eps), "{a:?} != {b:?} (n={n})");
            }
        }
    }

    #[test]
    fn forward_transform_of_impulse_is_flat() {
        let mut buf = vec![Complex64::new(0.0, 0.0); 8];
        buf[0] = Complex64::new(1.0, 0.0);
        fft(&mut buf, false);
        for x in &buf {
            assert!(approx_eq(*x, Complex64::new(1.0, 0.0), 1e-9));
        }
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn rejects_non_power_of_two_length() {
        let mut buf = vec![Complex64::new(0.0, 0.0); 3];
        fft(&mut buf, false);
    }
}
