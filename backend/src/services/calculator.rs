//! Given pre-contest ratings and a contest's final standings, computes each
//! contestant's integer rating delta.
//!
//! The algorithm: normalize ranks, compute every contestant's "seed"
//! (expected rank) via one FFT-based convolution over the whole field
//! rather than an O(n^2) pairwise sum, binary-search each contestant's
//! "need rating", then apply two passes of normalization so the field's
//! total delta stays within a small, bounded drift.

use std::collections::HashMap;

use num_complex::Complex64;

use crate::models::RanklistRow;

use super::elo_table::{rem, EloTable, MAX};
use super::fft::fft;
use super::team_compose::compose_team_rating;
use super::DEFAULT_RATING;

/// A standings row plus everything the algorithm derives from it. Not part
/// of the public API: `calculate_rating_changes` is the only entry point
/// callers need.
pub(crate) struct Contestant {
    handles: Vec<String>,
    rank: f64,
    points: f64,
    penalty: i64,
    rating: i32,
    need_rating: i32,
    delta: i32,
    seed: f64,
}

/// Computes each handle's integer rating delta for one contest's standings.
///
/// `previous_ratings` should already reflect the default rating (1400) for
/// any handle the cache has never seen; a handle absent from the map falls
/// back to that default here too, so this function is safe to call
/// directly in tests without going through the cache.
pub fn calculate_rating_changes(
    previous_ratings: &HashMap<String, i32>,
    standings: &[RanklistRow],
) -> HashMap<String, i32> {
    if standings.is_empty() {
        return HashMap::new();
    }

    let mut contestants: Vec<Contestant> = standings
        .iter()
        .map(|row| build_contestant(previous_ratings, row))
        .collect();

    reassign_ranks(&mut contestants);
    let seeds = calculate_seeds(&contestants);

    for c in contestants.iter_mut() {
        c.seed = seeds[rem(c.rating as i64)] - EloTable::get().win_probability_at(0);
        let mid_rank = (c.rank * c.seed).sqrt();

        let mut left: i64 = 1;
        let mut right: i64 = 8000;
        while right - left > 1 {
            let mid = (left + right) / 2;
            let predicate =
                seeds[mid as usize] - EloTable::get().win_probability_at(mid - c.rating as i64);
            if predicate < mid_rank {
                right = mid;
            } else {
                left = mid;
            }
        }
        c.need_rating = left as i32;
        c.delta = (c.need_rating - c.rating) / 2;
    }

    contestants.sort_by(|a, b| b.rating.cmp(&a.rating));
    normalize_global_drift(&mut contestants);
    normalize_top_band(&mut contestants);

    let mut deltas = HashMap::new();
    for c in &contestants {
        for handle in &c.handles {
            deltas.insert(handle.clone(), c.delta);
        }
    }
    deltas
}

fn build_contestant(previous_ratings: &HashMap<String, i32>, row: &RanklistRow) -> Contestant {
    let handles: Vec<String> = row.party.handles().map(str::to_owned).collect();
    debug_assert!(!handles.is_empty(), "calculator: party with no members");

    let member_ratings: Vec<i32> = handles
        .iter()
        .map(|h| previous_ratings.get(h).copied().unwrap_or(DEFAULT_RATING))
        .collect();

    let rating = compose_team_rating(&member_ratings);

    Contestant {
        handles,
        rank: row.rank as f64,
        points: row.points,
        penalty: row.penalty,
        rating,
        need_rating: 0,
        delta: 0,
        seed: 0.0,
    }
}

/// Dense-ranks contestants by (points desc, penalty asc), collapsing ties to
/// the worse (larger) rank via a tail sweep.
fn reassign_ranks(contestants: &mut [Contestant]) {
    contestants.sort_by(|a, b| {
        b.points
            .partial_cmp(&a.points)
            .unwrap()
            .then(a.penalty.cmp(&b.penalty))
    });

    let n = contestants.len();
    let mut points = contestants[n - 1].points;
    let mut penalty = contestants[n - 1].penalty;
    let mut rank = n as f64;

    for i in (0..n).rev() {
        if contestants[i].points != points || contestants[i].penalty != penalty {
            rank = (i + 1) as f64;
            points = contestants[i].points;
            penalty = contestants[i].penalty;
        }
        contestants[i].rank = rank;
    }
}

/// Builds a histogram of effective ratings over the cyclic axis, convolves
/// it against the precomputed Elo table via FFT, and returns `seeds[r] = 1 +
/// sum_j p(rating_j - r)` for every `r` in `[0, 2*MAX)`.
fn calculate_seeds(contestants: &[Contestant]) -> Vec<f64> {
    let mut count = vec![Complex64::new(0.0, 0.0); 2 * MAX];
    for c in contestants {
        let idx = rem(c.rating as i64);
        count[idx] += Complex64::new(1.0, 0.0);
    }

    fft(&mut count, false);

    let table = EloTable::get();
    let mut seed_fft: Vec<Complex64> = count
        .iter()
        .zip(table.fft.iter())
        .map(|(a, b)| a * b)
        .collect();

    fft(&mut seed_fft, true);

    seed_fft.iter().map(|v| 1.0 + v.re).collect()
}

/// Forces the field's total delta to be at most -1, a small negative bias
/// so the overall rating pool slowly deflates. `contestants` must already
/// be sorted by rating descending.
fn normalize_global_drift(contestants: &mut [Contestant]) {
    let sum: i32 = contestants.iter().map(|c| c.delta).sum();
    let n = contestants.len() as i32;
    let inc = -sum / n - 1;
    for c in contestants.iter_mut() {
        c.delta += inc;
    }
}

/// Caps the downward pull on the top-rated band of the field to at most
/// -10 and prevents it from inflating. `contestants` must already be
/// sorted by rating descending.
fn normalize_top_band(contestants: &mut [Contestant]) {
    let n = contestants.len();
    let z = std::cmp::min((4.0 * (n as f64).sqrt().round()) as usize, n).max(1);

    let sum_top: i32 = contestants[..z].iter().map(|c| c.delta).sum();
    let inc = (-sum_top / z as i32).clamp(-10, 0);

    for c in contestants.iter_mut() {
        c.delta += inc;
    }
}
