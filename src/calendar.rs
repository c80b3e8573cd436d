use crate::models::{CalendarCell, CalendarMonth, CalendarResponse};
use chrono::{DateTime, Datelike, Month, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    #[default]
    Month,
    Year,
}

impl CalendarView {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Heat legend: label shown next to each level, lowest first.
pub const HEAT_LEGEND: [(u8, &str); 5] = [
    (0, "No activity"),
    (1, "1-19 pushups"),
    (2, "20-39 pushups"),
    (3, "40-59 pushups"),
    (4, "60+ pushups"),
];

pub fn heat_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=19 => 1,
        20..=39 => 2,
        40..=59 => 3,
        _ => 4,
    }
}

pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn first_of_next_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        first_of_month(year + 1, 1)
    } else {
        first_of_month(year, month + 1)
    }
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = first_of_month(year, month)?;
    let next = first_of_next_month(year, month)?;
    Some((next - first).num_days() as u32)
}

/// Half-open UTC range covering the whole month or year on screen.
pub fn range(view: CalendarView, year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (start, end) = match view {
        CalendarView::Month => (first_of_month(year, month)?, first_of_next_month(year, month)?),
        CalendarView::Year => (first_of_month(year, 1)?, first_of_month(year + 1, 1)?),
    };
    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        end.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

pub fn month_grid(year: i32, month: u32, counts: &BTreeMap<NaiveDate, u32>) -> Option<CalendarMonth> {
    let first = first_of_month(year, month)?;
    let length = days_in_month(year, month)?;
    let name = Month::try_from(month as u8).ok()?.name().to_string();

    let days = first
        .iter_days()
        .take(length as usize)
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            CalendarCell {
                date: date.to_string(),
                day: date.day(),
                count,
                level: heat_level(count),
            }
        })
        .collect();

    Some(CalendarMonth {
        year,
        month,
        name,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}

fn calendar_link(view: CalendarView, year: i32, month: u32) -> String {
    format!("/calendar?view={}&year={year}&month={month}", view.as_str())
}

/// Links to the neighbouring month (wrapping years) or year.
pub fn neighbours(view: CalendarView, year: i32, month: u32) -> (String, String) {
    match view {
        CalendarView::Month => {
            let (prev_year, prev_month) = if month == 1 { (year - 1, 12) } else { (year, month - 1) };
            let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
            (
                calendar_link(view, prev_year, prev_month),
                calendar_link(view, next_year, next_month),
            )
        }
        CalendarView::Year => (
            calendar_link(view, year - 1, month),
            calendar_link(view, year + 1, month),
        ),
    }
}

pub fn build_calendar(
    view: CalendarView,
    year: i32,
    month: u32,
    counts: &BTreeMap<NaiveDate, u32>,
) -> Option<CalendarResponse> {
    let months = match view {
        CalendarView::Month => vec![month_grid(year, month, counts)?],
        CalendarView::Year => (1..=12)
            .map(|m| month_grid(year, m, counts))
            .collect::<Option<Vec<_>>>()?,
    };
    let title = match view {
        CalendarView::Month => format!("{} {year}", months[0].name),
        CalendarView::Year => year.to_string(),
    };
    let (prev, next) = neighbours(view, year, month);

    Some(CalendarResponse {
        view: view.as_str().to_string(),
        title,
        year,
        month,
        prev,
        next,
        months,
    })
}
