use std::collections::HashMap;

use async_trait::async_trait;
use cf_rating_predictor_backend::error::Result;
use cf_rating_predictor_backend::models::party::Member;
use cf_rating_predictor_backend::models::{Contest, Party, RanklistRow, RatedUser};
use cf_rating_predictor_backend::services::upstream::UpstreamClient;

/// An in-memory stand-in for the real Codeforces client, so cache/HTTP
/// integration tests never touch the network.
#[derive(Default)]
pub struct FakeUpstream {
    pub contests: Vec<Contest>,
    pub standings: HashMap<i64, Vec<RanklistRow>>,
    pub users: Vec<RatedUser>,
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    async fn get_contest_list(&self) -> Result<Vec<Contest>> {
        Ok(self.contests.clone())
    }

    async fn get_contest_standings(&self, contest_id: i64) -> Result<Vec<RanklistRow>> {
        Ok(self.standings.get(&contest_id).cloned().unwrap_or_default())
    }

    async fn get_user_rated_list(&self) -> Result<Vec<RatedUser>> {
        Ok(self.users.clone())
    }
}

pub fn party_row(handles: &[&str], rank: i64, points: f64, penalty: i64) -> RanklistRow {
    RanklistRow {
        party: Party {
            members: handles
                .iter()
                .map(|h| Member {
                    handle: h.to_string(),
                })
                .collect(),
        },
        rank,
        points,
        penalty,
    }
}

pub fn rated_user(handle: &str, rating: i32) -> RatedUser {
    RatedUser {
        handle: handle.to_string(),
        rating,
    }
}
