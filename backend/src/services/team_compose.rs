//! Collapses a team's member ratings to one effective rating.
//!
//! The effective rating is the virtual rating `r` at which a player's
//! probability of beating the whole team is one half, found by bisection.
//! Single-member parties must bypass this and use the member's rating
//! directly — this function assumes `ratings` already represents a
//! genuine multi-member team.

const LEFT_BOUND: f64 = 100.0;
const RIGHT_BOUND: f64 = 4000.0;
const ITERATIONS: usize = 20;

/// `ratings` must be non-empty; an empty team is a programmer error — the
/// calculator rejects empty parties before this is ever reached.
pub fn compose_team_rating(ratings: &[i32]) -> i32 {
    debug_assert!(!ratings.is_empty(), "team_compose: empty party");

    if ratings.len() == 1 {
        return ratings[0];
    }

    let mut left = LEFT_BOUND;
    let mut right = RIGHT_BOUND;

    for _ in 0..ITERATIONS {
        let r = (left + right) / 2.0;

        let win_probability: f64 = ratings
            .iter()
            .map(|&member| win_probability(r, member as f64))
            .product();

        let candidate = (1.0 / win_probability - 1.0).log10() * 400.0 + r;

        if candidate > r {
            left = r;
        } else {
            right = r;
        }
    }

    ((left + right) / 2.0).round() as i32
}

fn win_probability(a: f64, b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((b - a) / 400.0))
}
