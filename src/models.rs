use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated user together with the token the backend issued them.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

/// One row of `pushup_records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushupRecord {
    pub id: i64,
    pub user_id: String,
    pub count: u32,
    pub created_at: DateTime<Utc>,
}

/// One row of `goals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: String,
    pub daily_target: u32,
}

#[derive(Debug, Deserialize)]
pub struct AddPushupsForm {
    pub count: String,
}

#[derive(Debug, Deserialize)]
pub struct GoalForm {
    pub daily_target: String,
}

#[derive(Debug, Deserialize)]
pub struct PushupAction {
    pub action: String,
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    pub daily_target: u32,
}

/// Line chart input: one label per point, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub date: String,
    pub count: u32,
    pub goal: u32,
    pub streak: u32,
    pub progress_percent: u32,
    pub progress_width: u32,
    pub message: String,
    pub chart: ChartData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: String,
    pub day: u32,
    pub count: u32,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub name: String,
    pub leading_blanks: u32,
    pub days: Vec<CalendarCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub view: String,
    pub title: String,
    pub year: i32,
    pub month: u32,
    pub prev: String,
    pub next: String,
    pub months: Vec<CalendarMonth>,
}
