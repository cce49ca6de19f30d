//! Backends that never leave the process.
//!
//! [`InMemoryUserApi`] serves a fixed user list (demo mode and tests).
//! [`FixedCount`] wraps any backend and answers the count call with a
//! constant after a delay, for servers that have no count endpoint yet.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{Query, User, UserApi};
use crate::error::ApiError;
use crate::search;

/// Delay applied by [`FixedCount`] unless told otherwise.
pub const FIXED_COUNT_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, Default)]
pub struct InMemoryUserApi {
    users: Vec<User>,
    latency: Option<Duration>,
    failure: Option<String>,
}

impl InMemoryUserApi {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    /// The user set shown by `--demo`.
    pub fn sample() -> Self {
        let users = [
            ("Alice", 30),
            ("Bob", 25),
            ("Carol", 41),
            ("Dave", 30),
            ("Eve", 22),
            ("Frank", 35),
            ("Grace", 28),
            ("Heidi", 41),
            ("Ivan", 30),
            ("Judy", 19),
            ("Mallory", 33),
            ("Oscar", 25),
            ("Peggy", 52),
            ("Trent", 47),
        ]
        .into_iter()
        .zip(1u64..)
        .map(|((name, age), id)| User::new(id, name, age))
        .collect();
        Self::new(users).with_latency(Duration::from_millis(300))
    }

    /// Sleep this long before answering each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail every call with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    async fn respond(&self) -> Result<(), ApiError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.failure {
            Some(msg) => Err(ApiError::Backend(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserApi for InMemoryUserApi {
    async fn list_users(&self, query: &Query) -> Result<Vec<User>, ApiError> {
        self.respond().await?;
        Ok(search::filter_page(&self.users, query))
    }

    async fn count_users(&self, query: &Query) -> Result<u64, ApiError> {
        self.respond().await?;
        Ok(search::count_matching(&self.users, query))
    }
}

/// Delegates listing and reports a constant total regardless of filters.
pub struct FixedCount {
    inner: Arc<dyn UserApi>,
    count: u64,
    delay: Duration,
}

impl FixedCount {
    pub fn new(inner: Arc<dyn UserApi>, count: u64) -> Self {
        Self {
            inner,
            count,
            delay: FIXED_COUNT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl UserApi for FixedCount {
    async fn list_users(&self, query: &Query) -> Result<Vec<User>, ApiError> {
        self.inner.list_users(query).await
    }

    async fn count_users(&self, _query: &Query) -> Result<u64, ApiError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.count)
    }
}
