//! Hosted backend client: the GoTrue user endpoint for identity and the
//! PostgREST data API for the `pushup_records` and `goals` tables.

use crate::errors::BackendError;
use crate::models::{Goal, PushupRecord, Session, User};
use crate::storage::PushupStore;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const RECORDS_TABLE: &str = "pushup_records";
const GOALS_TABLE: &str = "goals";

#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseStore {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pushup-tracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn authed(&self, request: RequestBuilder, access_token: &str) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    fn write(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        self.authed(request, &session.access_token)
            .header("Prefer", "return=minimal")
    }
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(BackendError::Unauthorized);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            debug!("failed to read backend error body: {err}");
            format!("<unreadable body: {err}>")
        }
    };
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn rows<T: serde::de::DeserializeOwned>(response: Response) -> Result<Vec<T>, BackendError> {
    let bytes = check(response).await?.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| BackendError::Payload(err.to_string()))
}

#[async_trait]
impl PushupStore for SupabaseStore {
    async fn current_user(&self, access_token: &str) -> Result<Option<User>, BackendError> {
        let response = self
            .authed(
                self.client.get(format!("{}/auth/v1/user", self.base_url)),
                access_token,
            )
            .send()
            .await?;

        match check(response).await {
            Ok(response) => {
                let bytes = response.bytes().await?;
                let user = serde_json::from_slice::<User>(&bytes)
                    .map_err(|err| BackendError::Payload(err.to_string()))?;
                Ok(Some(user))
            }
            Err(BackendError::Unauthorized) => {
                debug!("access token rejected by backend");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn goal(&self, session: &Session) -> Result<Option<Goal>, BackendError> {
        let request = self.client.get(self.table_url(GOALS_TABLE)).query(&[
            ("select", "id,user_id,daily_target".to_string()),
            ("user_id", format!("eq.{}", session.user.id)),
            ("limit", "1".to_string()),
        ]);
        let response = self.authed(request, &session.access_token).send().await?;
        let goals: Vec<Goal> = rows(response).await?;
        Ok(goals.into_iter().next())
    }

    async fn insert_goal(&self, session: &Session, daily_target: u32) -> Result<(), BackendError> {
        let request = self
            .client
            .post(self.table_url(GOALS_TABLE))
            .json(&json!([{ "user_id": session.user.id, "daily_target": daily_target }]));
        check(self.write(request, session).send().await?).await?;
        Ok(())
    }

    async fn update_goal(
        &self,
        session: &Session,
        goal_id: i64,
        daily_target: u32,
    ) -> Result<(), BackendError> {
        let request = self
            .client
            .patch(self.table_url(GOALS_TABLE))
            .query(&[("id", format!("eq.{goal_id}"))])
            .json(&json!({ "daily_target": daily_target }));
        check(self.write(request, session).send().await?).await?;
        Ok(())
    }

    async fn records_between(
        &self,
        session: &Session,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PushupRecord>, BackendError> {
        let request = self.client.get(self.table_url(RECORDS_TABLE)).query(&[
            ("select", "id,user_id,count,created_at".to_string()),
            ("user_id", format!("eq.{}", session.user.id)),
            ("created_at", format!("gte.{}", timestamp(start))),
            ("created_at", format!("lt.{}", timestamp(end))),
            ("order", "created_at.asc".to_string()),
        ]);
        let response = self.authed(request, &session.access_token).send().await?;
        let mut records: Vec<PushupRecord> = rows(response).await?;
        if records.iter().any(|record| record.user_id != session.user.id) {
            warn!("backend returned rows belonging to another user");
            records.retain(|record| record.user_id == session.user.id);
        }
        Ok(records)
    }

    async fn insert_record(
        &self,
        session: &Session,
        count: u32,
        created_at: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        let request = self.client.post(self.table_url(RECORDS_TABLE)).json(&json!([{
            "user_id": session.user.id,
            "count": count,
            "created_at": timestamp(created_at),
        }]));
        check(self.write(request, session).send().await?).await?;
        Ok(())
    }

    async fn update_record(
        &self,
        session: &Session,
        record_id: i64,
        count: u32,
    ) -> Result<(), BackendError> {
        let request = self
            .client
            .patch(self.table_url(RECORDS_TABLE))
            .query(&[("id", format!("eq.{record_id}"))])
            .json(&json!({ "count": count }));
        check(self.write(request, session).send().await?).await?;
        Ok(())
    }

    async fn delete_record(&self, session: &Session, record_id: i64) -> Result<(), BackendError> {
        let request = self
            .client
            .delete(self.table_url(RECORDS_TABLE))
            .query(&[("id", format!("eq.{record_id}"))]);
        check(self.write(request, session).send().await?).await?;
        Ok(())
    }
}
