use serde::Deserialize;

use super::Party;

/// One row of a contest's standings as returned by the upstream client.
///
/// `rank` need not be dense — the calculator re-derives dense ranks from
/// `points`/`penalty` before computing seeds.
#[derive(Debug, Clone, Deserialize)]
pub struct RanklistRow {
    pub party: Party,
    pub rank: i64,
    pub points: f64,
    pub penalty: i64,
}
