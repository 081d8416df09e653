//! The upstream contest-data client .
//!
//! `Cache` depends on the `UpstreamClient` trait rather than a concrete
//! type, so tests can substitute an in-memory fake instead of hitting the
//! real API. `CodeforcesClient` below is the real implementation.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Contest, RanklistRow, RatedUser};

const BASE_URL: &str = "https://codeforces.com/api";

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn get_contest_list(&self) -> Result<Vec<Contest>>;
    async fn get_contest_standings(&self, contest_id: i64) -> Result<Vec<RanklistRow>>;
    async fn get_user_rated_list(&self) -> Result<Vec<RatedUser>>;
}

/// Codeforces wraps every API response in `{status, comment?, result?}`;
/// this is that envelope, not to be confused with the crate's own HTTP
/// response shape in `handlers::http` (happen to
/// share a convention, they are not the same wire contract).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfResponse<T> {
    status: String,
    comment: Option<String>,
    result: Option<T>,
}

impl<T> CfResponse<T> {
    fn into_result(self) -> Result<T> {
        if self.status == "OK" {
            self.result
                .ok_or_else(|| AppError::MalformedUpstreamResponse("missing result".into()))
        } else {
            Err(AppError::UpstreamStatus(
                self.comment.unwrap_or_else(|| self.status.clone()),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct StandingsResult {
    rows: Vec<RanklistRow>,
}

pub struct CodeforcesClient {
    http: reqwest::Client,
}

impl CodeforcesClient {
    pub fn new() -> Self {
        CodeforcesClient {
            http: reqwest::Client::new(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body: CfResponse<T> = self.http.get(url).send().await?.json().await?;
        body.into_result()
    }
}

impl Default for CodeforcesClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamClient for CodeforcesClient {
    async fn get_contest_list(&self) -> Result<Vec<Contest>> {
        self.get_json(&format!("{BASE_URL}/contest.list")).await
    }

    async fn get_contest_standings(&self, contest_id: i64) -> Result<Vec<RanklistRow>> {
        let url = format!("{BASE_URL}/contest.standings?contestId={contest_id}&from=1&count=0");
        let result: StandingsResult = self.get_json(&url).await?;
        Ok(result.rows)
    }

    async fn get_user_rated_list(&self) -> Result<Vec<RatedUser>> {
        self.get_json(&format!("{BASE_URL}/user.ratedList?activeOnly=false"))
            .await
    }
}
