use crate::calendar::{self, CalendarView};
use crate::errors::AppError;
use crate::models::{CalendarResponse, DashboardResponse, PushupRecord, Session};
use crate::stats::{self, STREAK_WINDOW_DAYS};
use crate::storage::PushupStore;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::info;

fn day_bounds(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = today.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// History loaded for the dashboard: the `STREAK_WINDOW_DAYS` days ending with today.
pub fn dashboard_window(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let (_, end) = day_bounds(today);
    (end - Duration::days(STREAK_WINDOW_DAYS), end)
}

async fn todays_record(
    store: &dyn PushupStore,
    session: &Session,
    today: NaiveDate,
) -> Result<Option<PushupRecord>, AppError> {
    let (start, end) = day_bounds(today);
    let records = store.records_between(session, start, end).await?;
    Ok(records
        .into_iter()
        .find(|record| record.created_at.date_naive() == today))
}

/// Parses a user-entered count. Only positive whole numbers are accepted.
pub fn parse_count(raw: &str, field: &str) -> Result<u32, AppError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AppError::bad_request(format!(
            "{field} must be a positive whole number"
        ))),
    }
}

pub async fn add_pushups_at(
    store: &dyn PushupStore,
    session: &Session,
    now: DateTime<Utc>,
    amount: u32,
) -> Result<u32, AppError> {
    if amount == 0 {
        return Err(AppError::bad_request("count must be a positive whole number"));
    }

    let today = now.date_naive();
    let updated = match todays_record(store, session, today).await? {
        Some(record) => {
            let count = record.count.saturating_add(amount);
            store.update_record(session, record.id, count).await?;
            count
        }
        None => {
            store.insert_record(session, amount, now).await?;
            amount
        }
    };

    info!(user = %session.user.id, amount, total = updated, "logged pushups");
    Ok(updated)
}

pub async fn increment_at(
    store: &dyn PushupStore,
    session: &Session,
    now: DateTime<Utc>,
) -> Result<u32, AppError> {
    add_pushups_at(store, session, now, 1).await
}

pub async fn reset_at(
    store: &dyn PushupStore,
    session: &Session,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if let Some(record) = todays_record(store, session, now.date_naive()).await? {
        store.delete_record(session, record.id).await?;
        info!(user = %session.user.id, "reset today's pushups");
    }
    Ok(())
}

pub async fn set_goal(
    store: &dyn PushupStore,
    session: &Session,
    daily_target: u32,
) -> Result<(), AppError> {
    if daily_target == 0 {
        return Err(AppError::bad_request(
            "daily_target must be a positive whole number",
        ));
    }

    match store.goal(session).await? {
        Some(goal) => store.update_goal(session, goal.id, daily_target).await?,
        None => store.insert_goal(session, daily_target).await?,
    }
    info!(user = %session.user.id, daily_target, "updated goal");
    Ok(())
}

pub async fn load_dashboard_at(
    store: &dyn PushupStore,
    session: &Session,
    now: DateTime<Utc>,
    default_goal: u32,
) -> Result<DashboardResponse, AppError> {
    let today = now.date_naive();
    let goal = store
        .goal(session)
        .await?
        .map(|goal| goal.daily_target)
        .filter(|target| *target > 0)
        .unwrap_or(default_goal);

    let (start, end) = dashboard_window(today);
    let records = store.records_between(session, start, end).await?;

    Ok(stats::build_dashboard_at(today, goal, &records))
}

pub async fn load_calendar(
    store: &dyn PushupStore,
    session: &Session,
    view: CalendarView,
    year: i32,
    month: u32,
) -> Result<CalendarResponse, AppError> {
    let (start, end) = calendar::range(view, year, month)
        .ok_or_else(|| AppError::bad_request("year or month out of range"))?;
    let records = store.records_between(session, start, end).await?;
    let counts = stats::daily_counts(&records);

    calendar::build_calendar(view, year, month, &counts)
        .ok_or_else(|| AppError::bad_request("year or month out of range"))
}
