use crate::models::{ChartData, DashboardResponse, PushupRecord};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Days of history loaded for the dashboard; also the longest streak it can report.
pub const STREAK_WINDOW_DAYS: i64 = 366;

const CHART_DAYS: i64 = 7;

/// Buckets records by the UTC date of `created_at`. When a day has more than
/// one row, the earliest one wins.
pub fn daily_counts(records: &[PushupRecord]) -> BTreeMap<NaiveDate, u32> {
    let mut counts = BTreeMap::new();
    let mut ordered: Vec<&PushupRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.created_at);
    for record in ordered {
        counts
            .entry(record.created_at.date_naive())
            .or_insert(record.count);
    }
    counts
}

pub fn streak_at(today: NaiveDate, counts: &BTreeMap<NaiveDate, u32>) -> u32 {
    let mut streak = 0u32;
    let mut date = today;
    while i64::from(streak) < STREAK_WINDOW_DAYS {
        match counts.get(&date) {
            Some(count) if *count > 0 => {
                streak += 1;
                date -= Duration::days(1);
            }
            _ => break,
        }
    }
    streak
}

fn ratio(count: u32, goal: u32) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    f64::from(count) / f64::from(goal) * 100.0
}

pub fn progress_percent(count: u32, goal: u32) -> u32 {
    ratio(count, goal).round() as u32
}

/// Width of the progress bar, capped at 100.
pub fn progress_width(count: u32, goal: u32) -> u32 {
    ratio(count, goal).min(100.0).round() as u32
}

pub fn motivation_message(count: u32, goal: u32) -> &'static str {
    let progress = ratio(count, goal);
    if count == 0 {
        "Ready to start? Let's crush it!"
    } else if progress < 25.0 {
        "Great start! Keep pushing!"
    } else if progress < 50.0 {
        "You're making progress!"
    } else if progress < 75.0 {
        "More than halfway there!"
    } else if progress < 100.0 {
        "Almost there! Finish strong!"
    } else {
        "Daily goal achieved! You're amazing!"
    }
}

pub fn last_7_days_at(today: NaiveDate, counts: &BTreeMap<NaiveDate, u32>) -> ChartData {
    let mut labels = Vec::with_capacity(CHART_DAYS as usize);
    let mut series = Vec::with_capacity(CHART_DAYS as usize);
    for offset in (0..CHART_DAYS).rev() {
        let date = today - Duration::days(offset);
        labels.push(match offset {
            0 => "Today".to_string(),
            1 => "1 day ago".to_string(),
            n => format!("{n} days ago"),
        });
        series.push(counts.get(&date).copied().unwrap_or(0));
    }
    ChartData { labels, series }
}

pub fn build_dashboard_at(today: NaiveDate, goal: u32, records: &[PushupRecord]) -> DashboardResponse {
    let counts = daily_counts(records);
    let count = counts.get(&today).copied().unwrap_or(0);

    DashboardResponse {
        date: today.to_string(),
        count,
        goal,
        streak: streak_at(today, &counts),
        progress_percent: progress_percent(count, goal),
        progress_width: progress_width(count, goal),
        message: motivation_message(count, goal).to_string(),
        chart: last_7_days_at(today, &counts),
    }
}
