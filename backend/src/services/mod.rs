//! Business logic layer: `fft` and `elo_table` are the shared numerical
//! substrate, `team_compose` and `calculator` turn standings into deltas,
//! and `cache`/`upstream` drive the refresh policy that keeps predictions
//! fresh.

pub mod cache;
pub mod calculator;
pub mod elo_table;
pub mod fft;
pub mod team_compose;
pub mod upstream;

/// Rating assumed for a handle the cache has never observed. The source
/// project's default varies between 1400 and 1500 across revisions; this
/// implementation settles on the canonical Codeforces "unrated" baseline,
/// 1400.
pub const DEFAULT_RATING: i32 = 1400;
