//! Thread-safe store of (handle -> rating) and (contestId -> computed
//! rating changes), plus the refresh policy that keeps both current.
//!
//! Two independent `RwLock`s back the two resources: the rating table
//! (plus the timestamp of its last refresh) behind one lock, the
//! rating-changes store behind the other. Reads across the two locks are
//! not linearized with each other — that is a deliberate relaxation, not
//! an oversight.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use tracing::instrument;

use crate::error::Result;
use crate::models::{Contest, ContestPhase, RatingChange};

use super::calculator::calculate_rating_changes;
use super::upstream::UpstreamClient;
use super::DEFAULT_RATING;

/// The four durations injected into the refresh policy.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicyConfig {
    pub update_rating_before: Duration,
    pub update_rating_changes_after: Duration,
    pub clear_rating_changes_after: Duration,
}

struct RatingTable {
    ratings: HashMap<String, i32>,
    last_user_update: Option<i64>,
}

pub struct Cache {
    policy: RefreshPolicyConfig,
    rating_table: RwLock<RatingTable>,
    rating_changes: RwLock<HashMap<i64, Vec<RatingChange>>>,
}

impl Cache {
    pub fn new(policy: RefreshPolicyConfig) -> Self {
        Cache {
            policy,
            rating_table: RwLock::new(RatingTable {
                ratings: HashMap::new(),
                last_user_update: None,
            }),
            rating_changes: RwLock::new(HashMap::new()),
        }
    }

    /// Never fails; an unknown handle reads as the default rating.
    pub fn get_rating(&self, handle: &str) -> i32 {
        self.rating_table
            .read()
            .unwrap()
            .ratings
            .get(handle)
            .copied()
            .unwrap_or(DEFAULT_RATING)
    }

    /// Never fails; an absent contest reads as an empty sequence, same as
    /// a contest that has been computed with zero participants — the read
    /// contract collapses the two on purpose.
    pub fn get_rating_changes(&self, contest_id: i64) -> Vec<RatingChange> {
        self.rating_changes
            .read()
            .unwrap()
            .get(&contest_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Reloads the full rating table from upstream and stamps the refresh
    /// time. The upstream call happens before the lock is taken — only the
    /// swap-in is done under exclusive lock.
    #[instrument(level = "debug", skip(self, upstream))]
    pub async fn update_user_ratings(&self, upstream: &dyn UpstreamClient, now: i64) -> Result<()> {
        tracing::debug!("refreshing user ratings");
        let users = upstream.get_user_rated_list().await?;

        let mut table = self.rating_table.write().unwrap();
        table.ratings = users.into_iter().map(|u| (u.handle, u.rating)).collect();
        table.last_user_update = Some(now);
        Ok(())
    }

    /// Fetches standings and recomputes one contest's predicted rating
    /// changes. The FFT/calculator work and the upstream fetch both happen
    /// before the changes-lock is acquired; the lock is held only long
    /// enough to install the finished sequence.
    #[instrument(level = "debug", skip(self, upstream), fields(contest_id))]
    pub async fn update_contest_rating_changes(
        &self,
        upstream: &dyn UpstreamClient,
        contest_id: i64,
        now: i64,
    ) -> Result<()> {
        tracing::debug!("recomputing rating changes");
        let standings = upstream.get_contest_standings(contest_id).await?;

        let mut previous_ratings = HashMap::new();
        for row in &standings {
            for handle in row.party.handles() {
                previous_ratings.insert(handle.to_string(), self.get_rating(handle));
            }
        }

        let deltas = calculate_rating_changes(&previous_ratings, &standings);

        let changes: Vec<RatingChange> = deltas
            .into_iter()
            .map(|(handle, delta)| {
                let old_rating = previous_ratings.get(&handle).copied().unwrap_or(DEFAULT_RATING);
                RatingChange {
                    contest_id,
                    handle,
                    update_time_seconds: now,
                    old_rating,
                    new_rating: old_rating + delta,
                }
            })
            .collect();

        self.rating_changes
            .write()
            .unwrap()
            .insert(contest_id, changes);
        Ok(())
    }

    /// Removes a finalized contest's predictions once they're past their
    /// usefulness window.
    #[instrument(level = "debug", skip(self))]
    pub fn clear_contest_rating_changes(&self, contest_id: i64) {
        tracing::debug!("clearing finalized rating changes");
        self.rating_changes.write().unwrap().remove(&contest_id);
    }

    /// Runs one refresh pass: fetches the contest list and applies the
    /// three refresh predicates to every contest. Aborts the remainder of
    /// the pass on the first upstream failure; the next call starts over
    /// from a clean slate.
    #[instrument(level = "debug", skip(self, upstream))]
    pub async fn update(&self, upstream: &dyn UpstreamClient, now: i64) -> Result<()> {
        let contests = upstream.get_contest_list().await?;

        for contest in &contests {
            if self.should_refresh_user_ratings(contest, now) {
                self.update_user_ratings(upstream, now).await?;
            }

            if self.should_recompute_rating_changes(contest, now) {
                self.update_contest_rating_changes(upstream, contest.id, now)
                    .await?;
            }

            if self.should_clear_rating_changes(contest, now) {
                self.clear_contest_rating_changes(contest.id);
            }
        }

        Ok(())
    }

    fn should_refresh_user_ratings(&self, contest: &Contest, now: i64) -> bool {
        let threshold = contest.start_time_seconds - self.policy.update_rating_before.as_secs() as i64;
        let last_update = self.rating_table.read().unwrap().last_user_update;

        now >= threshold && last_update.map(|t| t < threshold).unwrap_or(true)
    }

    fn should_recompute_rating_changes(&self, contest: &Contest, now: i64) -> bool {
        let gated_out = matches!(contest.phase, ContestPhase::Before | ContestPhase::SystemTest);
        if gated_out {
            return false;
        }

        let after_deadline =
            now < contest.end_time_seconds() + self.policy.update_rating_changes_after.as_secs() as i64;
        after_deadline || contest.phase != ContestPhase::Finished
    }

    fn should_clear_rating_changes(&self, contest: &Contest, now: i64) -> bool {
        contest.phase == ContestPhase::Finished
            && now > contest.end_time_seconds() + self.policy.clear_rating_changes_after.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Party, RanklistRow};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeUpstream {
        contests: Vec<Contest>,
        standings: HashMap<i64, Vec<RanklistRow>>,
        users: Vec<crate::models::RatedUser>,
        standings_calls: Mutex<u32>,
    }

    #[async_trait]
    impl UpstreamClient for FakeUpstream {
        async fn get_contest_list(&self) -> Result<Vec<Contest>> {
            Ok(self.contests.clone())
        }

        async fn get_contest_standings(&self, contest_id: i64) -> Result<Vec<RanklistRow>> {
            *self.standings_calls.lock().unwrap() += 1;
            Ok(self.standings.get(&contest_id).cloned().unwrap_or_default())
        }

        async fn get_user_rated_list(&self) -> Result<Vec<crate::models::RatedUser>> {
            Ok(self.users.clone())
        }
    }

    fn policy() -> RefreshPolicyConfig {
        RefreshPolicyConfig {
            update_rating_before: Duration::from_secs(3600),
            update_rating_changes_after: Duration::from_secs(86400),
            clear_rating_changes_after: Duration::from_secs(86400),
        }
    }

    fn one_row(handle: &str) -> RanklistRow {
        RanklistRow {
            party: Party {
                members: vec![crate::models::party::Member {
                    handle: handle.to_string(),
                }],
            },
            rank: 1,
            points: 1.0,
            penalty: 0,
        }
    }

    #[test]
    fn unknown_handle_reads_as_default_rating() {
        let cache = Cache::new(policy());
        assert_eq!(cache.get_rating("nobody"), DEFAULT_RATING);
    }

    #[test]
    fn unknown_contest_reads_as_empty() {
        let cache = Cache::new(policy());
        assert!(cache.get_rating_changes(1).is_empty());
    }

    #[tokio::test]
    async fn phase_gating_runs_refresh_exactly_once_across_consecutive_ticks() {
        let cache = Cache::new(policy());
        let start = 10_000i64;
        let contest = Contest {
            id: 1,
            phase: ContestPhase::Before,
            start_time_seconds: start,
            duration_seconds: 7200,
        };
        let upstream = FakeUpstream {
            contests: vec![contest.clone()],
            standings: HashMap::new(),
            users: vec![],
            standings_calls: Mutex::new(0),
        };

        let enters_window = start - 1800; // 30 minutes before start, inside the 1h window
        cache.update(&upstream, enters_window).await.unwrap();
        let after_first = cache.rating_table.read().unwrap().last_user_update;
        assert_eq!(after_first, Some(enters_window));

        cache.update(&upstream, enters_window + 60).await.unwrap();
        let after_second = cache.rating_table.read().unwrap().last_user_update;
        assert_eq!(after_second, after_first, "should not refresh twice in one pre-window");
    }

    #[tokio::test]
    async fn finished_contest_past_clear_deadline_loses_its_entry() {
        let cache = Cache::new(policy());
        let contest = Contest {
            id: 7,
            phase: ContestPhase::Finished,
            start_time_seconds: 0,
            duration_seconds: 7200,
        };
        let upstream = FakeUpstream {
            contests: vec![contest.clone()],
            standings: HashMap::from([(7, vec![one_row("a")])]),
            users: vec![],
            standings_calls: Mutex::new(0),
        };

        cache
            .update_contest_rating_changes(&upstream, 7, 0)
            .await
            .unwrap();
        assert!(!cache.get_rating_changes(7).is_empty());

        let long_after_clear = contest.end_time_seconds() + policy().clear_rating_changes_after.as_secs() as i64 + 1;
        cache.update(&upstream, long_after_clear).await.unwrap();
        assert!(cache.get_rating_changes(7).is_empty());
    }

    #[tokio::test]
    async fn idempotent_recompute_with_identical_upstream_data() {
        let cache = Cache::new(policy());
        let upstream = FakeUpstream {
            contests: vec![],
            standings: HashMap::from([(5, vec![one_row("a"), one_row("b")])]),
            users: vec![],
            standings_calls: Mutex::new(0),
        };

        cache.update_contest_rating_changes(&upstream, 5, 100).await.unwrap();
        let first = cache.get_rating_changes(5);

        cache.update_contest_rating_changes(&upstream, 5, 200).await.unwrap();
        let second = cache.get_rating_changes(5);

        let strip_time = |v: &[RatingChange]| {
            let mut pairs: Vec<(String, i32, i32)> = v
                .iter()
                .map(|c| (c.handle.clone(), c.old_rating, c.new_rating))
                .collect();
            pairs.sort();
            pairs
        };
        assert_eq!(strip_time(&first), strip_time(&second));
    }
}
