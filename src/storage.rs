use crate::errors::BackendError;
use crate::models::{Goal, PushupRecord, Session, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Remote data access used by both screens. Every call carries the caller's
/// session so the backend can apply row-level auth.
#[async_trait]
pub trait PushupStore: Send + Sync {
    /// Resolves the identity behind an access token; `None` when the token is
    /// rejected.
    async fn current_user(&self, access_token: &str) -> Result<Option<User>, BackendError>;

    async fn goal(&self, session: &Session) -> Result<Option<Goal>, BackendError>;

    async fn insert_goal(&self, session: &Session, daily_target: u32) -> Result<(), BackendError>;

    async fn update_goal(
        &self,
        session: &Session,
        goal_id: i64,
        daily_target: u32,
    ) -> Result<(), BackendError>;

    /// Records with `start <= created_at < end`, oldest first.
    async fn records_between(
        &self,
        session: &Session,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PushupRecord>, BackendError>;

    async fn insert_record(
        &self,
        session: &Session,
        count: u32,
        created_at: DateTime<Utc>,
    ) -> Result<(), BackendError>;

    async fn update_record(
        &self,
        session: &Session,
        record_id: i64,
        count: u32,
    ) -> Result<(), BackendError>;

    async fn delete_record(&self, session: &Session, record_id: i64) -> Result<(), BackendError>;
}

#[derive(Debug, Default)]
struct MemoryData {
    users: HashMap<String, User>,
    records: Vec<PushupRecord>,
    goals: Vec<Goal>,
    next_id: i64,
}

impl MemoryData {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local store with the same row semantics as the hosted backend.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Mutex<MemoryData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, access_token: &str, user: User) {
        let mut data = self.data.lock().await;
        data.users.insert(access_token.to_string(), user);
    }

    /// Seeds a record directly, bypassing the daily read-modify-write.
    pub async fn seed_record(&self, user_id: &str, count: u32, created_at: DateTime<Utc>) {
        let mut data = self.data.lock().await;
        let id = data.allocate_id();
        data.records.push(PushupRecord {
            id,
            user_id: user_id.to_string(),
            count,
            created_at,
        });
    }

    pub async fn records_for(&self, user_id: &str) -> Vec<PushupRecord> {
        let data = self.data.lock().await;
        data.records
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn goals_for(&self, user_id: &str) -> Vec<Goal> {
        let data = self.data.lock().await;
        data.goals
            .iter()
            .filter(|goal| goal.user_id == user_id)
            .cloned()
            .collect()
    }

    fn authorize(data: &MemoryData, session: &Session) -> Result<(), BackendError> {
        match data.users.get(&session.access_token) {
            Some(user) if user.id == session.user.id => Ok(()),
            _ => Err(BackendError::Unauthorized),
        }
    }
}

#[async_trait]
impl PushupStore for InMemoryStore {
    async fn current_user(&self, access_token: &str) -> Result<Option<User>, BackendError> {
        let data = self.data.lock().await;
        Ok(data.users.get(access_token).cloned())
    }

    async fn goal(&self, session: &Session) -> Result<Option<Goal>, BackendError> {
        let data = self.data.lock().await;
        Self::authorize(&data, session)?;
        Ok(data
            .goals
            .iter()
            .find(|goal| goal.user_id == session.user.id)
            .cloned())
    }

    async fn insert_goal(&self, session: &Session, daily_target: u32) -> Result<(), BackendError> {
        let mut data = self.data.lock().await;
        Self::authorize(&data, session)?;
        let id = data.allocate_id();
        data.goals.push(Goal {
            id,
            user_id: session.user.id.clone(),
            daily_target,
        });
        Ok(())
    }

    async fn update_goal(
        &self,
        session: &Session,
        goal_id: i64,
        daily_target: u32,
    ) -> Result<(), BackendError> {
        let mut data = self.data.lock().await;
        Self::authorize(&data, session)?;
        // Row-level auth: rows of other users are invisible, so the update is a no-op.
        if let Some(goal) = data
            .goals
            .iter_mut()
            .find(|goal| goal.id == goal_id && goal.user_id == session.user.id)
        {
            goal.daily_target = daily_target;
        }
        Ok(())
    }

    async fn records_between(
        &self,
        session: &Session,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PushupRecord>, BackendError> {
        let data = self.data.lock().await;
        Self::authorize(&data, session)?;
        let mut records: Vec<PushupRecord> = data
            .records
            .iter()
            .filter(|record| {
                record.user_id == session.user.id
                    && record.created_at >= start
                    && record.created_at < end
            })
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    async fn insert_record(
        &self,
        session: &Session,
        count: u32,
        created_at: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        let mut data = self.data.lock().await;
        Self::authorize(&data, session)?;
        let id = data.allocate_id();
        data.records.push(PushupRecord {
            id,
            user_id: session.user.id.clone(),
            count,
            created_at,
        });
        Ok(())
    }

    async fn update_record(
        &self,
        session: &Session,
        record_id: i64,
        count: u32,
    ) -> Result<(), BackendError> {
        let mut data = self.data.lock().await;
        Self::authorize(&data, session)?;
        if let Some(record) = data
            .records
            .iter_mut()
            .find(|record| record.id == record_id && record.user_id == session.user.id)
        {
            record.count = count;
        }
        Ok(())
    }

    async fn delete_record(&self, session: &Session, record_id: i64) -> Result<(), BackendError> {
        let mut data = self.data.lock().await;
        Self::authorize(&data, session)?;
        let user_id = session.user.id.clone();
        data.records
            .retain(|record| !(record.id == record_id && record.user_id == user_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn session(token: &str, user_id: &str) -> Session {
        Session {
            access_token: token.to_string(),
            user: User {
                id: user_id.to_string(),
                email: None,
            },
        }
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_no_user() {
        let store = InMemoryStore::new();
        assert!(store.current_user("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn records_between_is_half_open_and_scoped_to_user() {
        let store = InMemoryStore::new();
        let alice = session("a", "alice");
        store.add_user("a", alice.user.clone()).await;
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(1);

        store.seed_record("alice", 5, start + Duration::hours(2)).await;
        store.seed_record("alice", 7, end).await;
        store.seed_record("bob", 9, start + Duration::hours(3)).await;

        let records = store.records_between(&alice, start, end).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, 5);
    }

    #[tokio::test]
    async fn mismatched_session_is_unauthorized() {
        let store = InMemoryStore::new();
        store.add_user("a", session("a", "alice").user).await;
        let forged = session("a", "mallory");
        let err = store.goal(&forged).await.unwrap_err();
        assert!(matches!(err, BackendError::Unauthorized));
    }
}
