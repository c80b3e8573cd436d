use crate::calendar::HEAT_LEGEND;
use crate::models::{CalendarMonth, CalendarResponse, ChartData, DashboardResponse};
use std::fmt::Write;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn render_dashboard(dashboard: &DashboardResponse) -> String {
    DASHBOARD_HTML
        .replace("{{STYLE}}", SHARED_STYLE)
        .replace("{{DATE}}", &dashboard.date)
        .replace("{{COUNT}}", &dashboard.count.to_string())
        .replace("{{GOAL}}", &dashboard.goal.to_string())
        .replace("{{STREAK}}", &dashboard.streak.to_string())
        .replace("{{PERCENT}}", &dashboard.progress_percent.to_string())
        .replace("{{WIDTH}}", &dashboard.progress_width.to_string())
        .replace("{{MESSAGE}}", &escape(&dashboard.message))
        .replace("{{CHART_JSON}}", &chart_json(&dashboard.chart))
}

fn chart_json(chart: &ChartData) -> String {
    serde_json::to_string(chart).unwrap_or_else(|_| r#"{"labels":[],"series":[]}"#.to_string())
}

pub fn render_calendar(calendar: &CalendarResponse) -> String {
    let compact = calendar.view == "year";
    let mut grids = String::new();
    for month in &calendar.months {
        render_month(&mut grids, month, compact);
    }

    let mut legend = String::new();
    for (level, label) in HEAT_LEGEND {
        let _ = write!(
            legend,
            r#"<span class="legend-item"><i class="heat-{level}"></i>{label}</span>"#
        );
    }

    let (month_tab, year_tab) = if compact { ("", "active") } else { ("active", "") };

    CALENDAR_HTML
        .replace("{{STYLE}}", SHARED_STYLE)
        .replace("{{TITLE}}", &escape(&calendar.title))
        .replace("{{PREV}}", &escape(&calendar.prev))
        .replace("{{NEXT}}", &escape(&calendar.next))
        .replace(
            "{{MONTH_LINK}}",
            &escape(&format!(
                "/calendar?view=month&year={}&month={}",
                calendar.year, calendar.month
            )),
        )
        .replace(
            "{{YEAR_LINK}}",
            &escape(&format!(
                "/calendar?view=year&year={}&month={}",
                calendar.year, calendar.month
            )),
        )
        .replace("{{MONTH_TAB}}", month_tab)
        .replace("{{YEAR_TAB}}", year_tab)
        .replace("{{LAYOUT}}", if compact { "year-grid" } else { "month-grid" })
        .replace("{{GRIDS}}", &grids)
        .replace("{{LEGEND}}", &legend)
}

fn render_month(out: &mut String, month: &CalendarMonth, compact: bool) {
    out.push_str(r#"<div class="month">"#);
    if compact {
        let _ = write!(out, "<h3>{}</h3>", month.name);
    }
    out.push_str(r#"<div class="days">"#);
    if !compact {
        for day in WEEKDAYS {
            let _ = write!(out, r#"<div class="weekday">{day}</div>"#);
        }
    }
    for _ in 0..month.leading_blanks {
        out.push_str(r#"<div class="cell blank"></div>"#);
    }
    for cell in &month.days {
        let noun = if cell.count == 1 { "pushup" } else { "pushups" };
        if compact {
            let _ = write!(
                out,
                r#"<div class="cell heat-{}" title="{}: {} {noun}"></div>"#,
                cell.level, cell.date, cell.count
            );
        } else {
            let _ = write!(
                out,
                r#"<div class="cell heat-{}" title="{}"><strong>{}</strong>"#,
                cell.level, cell.date, cell.day
            );
            if cell.count > 0 {
                let _ = write!(out, "<span>{} {noun}</span>", cell.count);
            }
            out.push_str("</div>");
        }
    }
    out.push_str("</div></div>");
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const SHARED_STYLE: &str = r#"
    :root {
      --bg-1: #eef4ff;
      --ink: #1f2937;
      --muted: #6b7280;
      --accent: #2563eb;
      --accent-soft: #dbeafe;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 24px 60px rgba(37, 99, 235, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(180deg, var(--bg-1), #ffffff 70%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(880px, 100%);
      display: grid;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 16px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
      text-align: center;
    }

    h2, h3 {
      margin: 0;
    }

    a {
      color: var(--accent);
      text-decoration: none;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 12px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.ghost {
      background: transparent;
      color: var(--muted);
    }

    .heat-0 { background: #f3f4f6; }
    .heat-1 { background: #dbeafe; }
    .heat-2 { background: #93c5fd; }
    .heat-3 { background: #3b82f6; color: white; }
    .heat-4 { background: #1d4ed8; color: white; }
"#;

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Pushup Tracker</title>
  <meta name="description" content="Track your daily pushup progress" />
  <style>
{{STYLE}}
    .count {
      font-size: 4rem;
      font-weight: 700;
      color: var(--accent);
      text-align: center;
    }

    .bar {
      height: 16px;
      border-radius: 999px;
      background: #e5e7eb;
      overflow: hidden;
    }

    .bar div {
      height: 100%;
      border-radius: 999px;
      background: var(--accent);
      transition: width 500ms ease-out;
    }

    .goal-line, .message {
      text-align: center;
      color: var(--muted);
    }

    .message {
      color: var(--accent);
      font-weight: 600;
      min-height: 1.5rem;
    }

    form {
      display: flex;
      gap: 8px;
      justify-content: center;
    }

    input {
      flex: 1;
      max-width: 220px;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid #d1d5db;
      font-size: 1rem;
    }

    details summary {
      cursor: pointer;
      text-align: center;
      color: var(--accent);
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      text-align: center;
    }

    .stats strong {
      display: block;
      font-size: 1.6rem;
      color: var(--accent);
    }

    #chart {
      width: 100%;
      height: 260px;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: #e5e7eb;
    }

    .chart-label {
      fill: var(--muted);
      font-size: 11px;
    }

    footer {
      text-align: center;
      color: var(--muted);
      font-style: italic;
      display: grid;
      gap: 12px;
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>PushUp Tracker</h1>

    <section class="card">
      <div class="count" id="count">{{COUNT}}</div>
      <div class="bar"><div style="width: {{WIDTH}}%"></div></div>
      <div class="goal-line">Today's Goal ({{DATE}}): {{COUNT}}/{{GOAL}}</div>
      <details>
        <summary>Edit goal</summary>
        <form method="post" action="/goal">
          <input type="number" name="daily_target" min="1" placeholder="New goal" required />
          <button type="submit">Set</button>
        </form>
      </details>
      <div class="message">{{MESSAGE}}</div>
      <form method="post" action="/pushups/add">
        <input type="number" name="count" min="1" placeholder="Enter pushups" required />
        <button type="submit">Add</button>
      </form>
      <div style="display: flex; gap: 12px; justify-content: center;">
        <form method="post" action="/pushups/increment">
          <button type="submit">Add PushUp</button>
        </form>
        <form method="post" action="/pushups/reset">
          <button class="ghost" type="submit">Reset</button>
        </form>
      </div>
    </section>

    <section class="card">
      <h2>Progress Chart</h2>
      <svg id="chart" viewBox="0 0 600 260" aria-label="Past week progress" role="img"></svg>
    </section>

    <section class="card">
      <h2>Stats</h2>
      <div class="stats">
        <div><strong>{{STREAK}}</strong>Day Streak</div>
        <div><strong>{{COUNT}}</strong>Today's Total</div>
        <div><strong>{{PERCENT}}%</strong>Goal Progress</div>
      </div>
    </section>

    <footer>
      <a href="/calendar">View Calendar</a>
      <span>"Success is not final, failure is not fatal: it is the courage to continue that counts."</span>
    </footer>
  </main>

  <script>
    const chart = {{CHART_JSON}};
    const chartEl = document.getElementById('chart');

    const renderLineChart = ({ labels, series }) => {
      if (!series.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 24;

      const max = Math.max(...series, 1);
      const xStep = series.length > 1 ? (width - paddingX * 2) / (series.length - 1) : 0;
      const scaleY = (height - top - paddingY) / max;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - value * scaleY;

      const path = series
        .map((value, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(value).toFixed(2)}`)
        .join(' ');

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = Math.round((max * i) / 4);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${y(value)}" x2="${width - paddingX}" y2="${y(value)}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${y(value) + 4}" text-anchor="end">${value}</text>`;
      }

      const points = series
        .map((value, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(value)}" r="4"><title>${value}</title></circle>`)
        .join('');
      const xLabels = labels
        .map((label, index) => `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${label}</text>`)
        .join('');

      chartEl.innerHTML = `${grid}<path class="chart-line" d="${path}" />${points}${xLabels}`;
    };

    renderLineChart(chart);
  </script>
</body>
</html>
"#;

const CALENDAR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Progress Calendar</title>
  <style>
{{STYLE}}
    .top {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .tabs a {
      padding: 6px 12px;
      border-radius: 10px;
      color: var(--muted);
    }

    .tabs a.active {
      background: var(--accent);
      color: white;
    }

    .nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .month-grid .days {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 8px;
    }

    .month-grid .cell {
      height: 64px;
      border-radius: 10px;
      display: flex;
      flex-direction: column;
      align-items: center;
      justify-content: center;
      font-size: 0.85rem;
    }

    .year-grid {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 24px;
    }

    .year-grid .days {
      display: grid;
      grid-template-columns: repeat(7, 16px);
      gap: 3px;
    }

    .year-grid .cell {
      width: 16px;
      height: 16px;
      border-radius: 3px;
    }

    .weekday {
      text-align: center;
      font-size: 0.85rem;
      color: var(--muted);
    }

    .cell.blank {
      background: transparent;
    }

    .legend {
      display: flex;
      flex-wrap: wrap;
      gap: 16px;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .legend-item i {
      display: inline-block;
      width: 14px;
      height: 14px;
      border-radius: 4px;
      margin-right: 6px;
      vertical-align: middle;
    }
  </style>
</head>
<body>
  <main class="app">
    <div class="top">
      <a href="/">&larr; Back to Dashboard</a>
      <h1>Progress Calendar</h1>
      <div class="tabs">
        <a class="{{MONTH_TAB}}" href="{{MONTH_LINK}}">Month</a>
        <a class="{{YEAR_TAB}}" href="{{YEAR_LINK}}">Year</a>
      </div>
    </div>

    <section class="card">
      <div class="nav">
        <a href="{{PREV}}" aria-label="Previous">&larr;</a>
        <h2>{{TITLE}}</h2>
        <a href="{{NEXT}}" aria-label="Next">&rarr;</a>
      </div>
      <div class="{{LAYOUT}}">{{GRIDS}}</div>
    </section>

    <section class="card">
      <h3>Activity Legend</h3>
      <div class="legend">{{LEGEND}}</div>
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{build_calendar, CalendarView};
    use crate::models::ChartData;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[test]
    fn dashboard_fills_every_placeholder() {
        let html = render_dashboard(&DashboardResponse {
            date: "2026-10-17".to_string(),
            count: 30,
            goal: 40,
            streak: 3,
            progress_percent: 75,
            progress_width: 75,
            message: "Almost there! Finish strong!".to_string(),
            chart: ChartData {
                labels: vec!["Today".to_string()],
                series: vec![30],
            },
        });
        assert!(!html.contains("{{"));
        assert!(html.contains("30/40"));
        assert!(html.contains("width: 75%"));
        assert!(html.contains(r#"{"labels":["Today"],"series":[30]}"#));
    }

    #[test]
    fn month_calendar_shows_counts_and_legend() {
        let mut counts = BTreeMap::new();
        counts.insert(NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(), 25);
        let calendar = build_calendar(CalendarView::Month, 2026, 10, &counts).unwrap();
        let html = render_calendar(&calendar);

        assert!(!html.contains("{{"));
        assert!(html.contains("October 2026"));
        assert!(html.contains("25 pushups"));
        assert!(html.contains("60+ pushups"));
        assert_eq!(html.matches(r#"class="cell blank""#).count(), 4);
    }

    #[test]
    fn year_calendar_uses_compact_cells() {
        let calendar = build_calendar(CalendarView::Year, 2026, 1, &BTreeMap::new()).unwrap();
        let html = render_calendar(&calendar);
        assert!(html.contains("year-grid"));
        assert!(html.contains("<h3>December</h3>"));
        assert!(!html.contains(r#"class="weekday""#));
    }
}
