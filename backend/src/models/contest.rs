use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestPhase {
    Before,
    Coding,
    PendingSystemTest,
    SystemTest,
    Finished,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contest {
    pub id: i64,
    pub phase: ContestPhase,
    #[serde(rename = "startTimeSeconds")]
    pub start_time_seconds: i64,
    #[serde(rename = "durationSeconds")]
    pub duration_seconds: i64,
}

impl Contest {
    pub fn end_time_seconds(&self) -> i64 {
        self.start_time_seconds + self.duration_seconds
    }
}
