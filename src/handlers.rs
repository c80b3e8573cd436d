use crate::auth::resolve_session;
use crate::calendar::CalendarView;
use crate::errors::AppError;
use crate::models::{
    AddPushupsForm, CalendarResponse, DashboardResponse, GoalForm, GoalRequest, PushupAction,
    Session,
};
use crate::state::AppState;
use crate::tracker;
use crate::ui::{render_calendar, render_dashboard};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub view: Option<CalendarView>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl CalendarQuery {
    fn resolve(&self) -> Result<(CalendarView, i32, u32), AppError> {
        let today = Utc::now().date_naive();
        let month = self.month.unwrap_or_else(|| today.month());
        if !(1..=12).contains(&month) {
            return Err(AppError::bad_request("month must be between 1 and 12"));
        }
        Ok((
            self.view.unwrap_or_default(),
            self.year.unwrap_or_else(|| today.year()),
            month,
        ))
    }
}

fn to_auth(state: &AppState) -> Response {
    Redirect::to(&state.auth_redirect_url).into_response()
}

async fn require_session(state: &AppState, headers: &HeaderMap) -> Result<Session, AppError> {
    resolve_session(state, headers)
        .await?
        .ok_or_else(AppError::unauthorized)
}

async fn dashboard(state: &AppState, session: &Session) -> Result<DashboardResponse, AppError> {
    tracker::load_dashboard_at(
        state.store.as_ref(),
        session,
        Utc::now(),
        state.default_daily_goal,
    )
    .await
}

async fn calendar(
    state: &AppState,
    session: &Session,
    query: &CalendarQuery,
) -> Result<CalendarResponse, AppError> {
    let (view, year, month) = query.resolve()?;
    tracker::load_calendar(state.store.as_ref(), session, view, year, month).await
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let Some(session) = resolve_session(&state, &headers).await? else {
        return Ok(to_auth(&state));
    };
    let dashboard = dashboard(&state, &session).await?;
    Ok(Html(render_dashboard(&dashboard)).into_response())
}

pub async fn calendar_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, AppError> {
    let Some(session) = resolve_session(&state, &headers).await? else {
        return Ok(to_auth(&state));
    };
    let calendar = calendar(&state, &session, &query).await?;
    Ok(Html(render_calendar(&calendar)).into_response())
}

pub async fn add_pushups(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddPushupsForm>,
) -> Result<Response, AppError> {
    let Some(session) = resolve_session(&state, &headers).await? else {
        return Ok(to_auth(&state));
    };
    let amount = tracker::parse_count(&form.count, "count")?;
    tracker::add_pushups_at(state.store.as_ref(), &session, Utc::now(), amount).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn increment(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let Some(session) = resolve_session(&state, &headers).await? else {
        return Ok(to_auth(&state));
    };
    tracker::increment_at(state.store.as_ref(), &session, Utc::now()).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let Some(session) = resolve_session(&state, &headers).await? else {
        return Ok(to_auth(&state));
    };
    tracker::reset_at(state.store.as_ref(), &session, Utc::now()).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn update_goal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<GoalForm>,
) -> Result<Response, AppError> {
    let Some(session) = resolve_session(&state, &headers).await? else {
        return Ok(to_auth(&state));
    };
    let target = tracker::parse_count(&form.daily_target, "daily_target")?;
    tracker::set_goal(state.store.as_ref(), &session, target).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, AppError> {
    let session = require_session(&state, &headers).await?;
    Ok(Json(dashboard(&state, &session).await?))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let session = require_session(&state, &headers).await?;
    Ok(Json(calendar(&state, &session, &query).await?))
}

pub async fn post_pushups(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PushupAction>,
) -> Result<Json<DashboardResponse>, AppError> {
    let session = require_session(&state, &headers).await?;
    let store = state.store.as_ref();
    let now = Utc::now();

    match payload.action.trim() {
        "add" => {
            let amount = payload
                .count
                .ok_or_else(|| AppError::bad_request("count is required for 'add'"))?;
            tracker::add_pushups_at(store, &session, now, amount).await?;
        }
        "increment" => {
            tracker::increment_at(store, &session, now).await?;
        }
        "reset" => tracker::reset_at(store, &session, now).await?,
        _ => {
            return Err(AppError::bad_request(
                "action must be 'add', 'increment' or 'reset'",
            ));
        }
    }

    Ok(Json(dashboard(&state, &session).await?))
}

pub async fn post_goal(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<DashboardResponse>, AppError> {
    let session = require_session(&state, &headers).await?;
    tracker::set_goal(state.store.as_ref(), &session, payload.daily_target).await?;
    Ok(Json(dashboard(&state, &session).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::storage::InMemoryStore;
    use axum::http::{header, HeaderValue, StatusCode};
    use std::sync::Arc;

    async fn state_with_user() -> (AppState, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        store
            .add_user(
                "token-1",
                User {
                    id: "user-1".to_string(),
                    email: Some("me@example.com".to_string()),
                },
            )
            .await;
        let state = AppState {
            store: store.clone(),
            auth_redirect_url: "/auth".to_string(),
            session_cookie: "sb-access-token".to_string(),
            default_daily_goal: 50,
        };
        (state, store)
    }

    fn signed_in() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("sb-access-token=token-1"),
        );
        headers
    }

    fn location(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[tokio::test]
    async fn pages_redirect_to_auth_without_session() {
        let (state, _) = state_with_user().await;

        let response = index(State(state.clone()), HeaderMap::new()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/auth"));

        let response = calendar_page(
            State(state),
            HeaderMap::new(),
            Query(CalendarQuery::default()),
        )
        .await
        .unwrap();
        assert_eq!(location(&response), Some("/auth"));
    }

    #[tokio::test]
    async fn api_requires_session() {
        let (state, _) = state_with_user().await;
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer stale"));

        let err = get_dashboard(State(state), headers).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn form_posts_update_and_redirect_home() {
        let (state, store) = state_with_user().await;

        let response = add_pushups(
            State(state.clone()),
            signed_in(),
            Form(AddPushupsForm {
                count: "12".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(location(&response), Some("/"));

        increment(State(state.clone()), signed_in()).await.unwrap();
        let records = store.records_for("user-1").await;
        assert_eq!(records[0].count, 13);

        reset(State(state), signed_in()).await.unwrap();
        assert!(store.records_for("user-1").await.is_empty());
    }

    #[tokio::test]
    async fn invalid_form_count_is_bad_request() {
        let (state, _) = state_with_user().await;
        let err = add_pushups(
            State(state),
            signed_in(),
            Form(AddPushupsForm {
                count: "lots".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn api_actions_return_refreshed_dashboard() {
        let (state, _) = state_with_user().await;

        let Json(dashboard) = post_goal(
            State(state.clone()),
            signed_in(),
            Json(GoalRequest { daily_target: 20 }),
        )
        .await
        .unwrap();
        assert_eq!(dashboard.goal, 20);

        let Json(dashboard) = post_pushups(
            State(state.clone()),
            signed_in(),
            Json(PushupAction {
                action: "add".to_string(),
                count: Some(10),
            }),
        )
        .await
        .unwrap();
        assert_eq!(dashboard.count, 10);
        assert_eq!(dashboard.progress_percent, 50);
        assert_eq!(dashboard.streak, 1);

        let err = post_pushups(
            State(state),
            signed_in(),
            Json(PushupAction {
                action: "jump".to_string(),
                count: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn calendar_rejects_out_of_range_month() {
        let (state, _) = state_with_user().await;
        let err = get_calendar(
            State(state),
            signed_in(),
            Query(CalendarQuery {
                view: Some(CalendarView::Month),
                year: Some(2026),
                month: Some(13),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_page_renders_counts() {
        let (state, _) = state_with_user().await;
        let response = index(State(state), signed_in()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
