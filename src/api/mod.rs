//! Data model and the users API seam.
//!
//! The view talks to its backend only through [`UserApi`]. Two calls make up
//! a fetch cycle: one page of users and the total count for the same filters.

pub mod http;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::pagination::DEFAULT_PAGE_SIZE;

pub use http::HttpUserApi;
pub use memory::{FixedCount, InMemoryUserApi};

/// Filter and pagination parameters sent with every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub name: String,
    pub age: String,
    pub limit: usize,
    pub offset: usize,
}

impl Query {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    /// Non-empty filters as `(key, value)` pairs.
    pub fn filter_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if !self.name.is_empty() {
            params.push(("name", self.name.clone()));
        }
        if !self.age.is_empty() {
            params.push(("age", self.age.clone()));
        }
        params
    }

    /// Filters plus the `limit`/`offset` window.
    pub fn page_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filter_params();
        params.push(("limit", self.limit.to_string()));
        params.push(("offset", self.offset.to_string()));
        params
    }
}

impl Default for Query {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: String::new(),
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// User identifier as the API hands it out: numeric or opaque string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Num(u64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Num(n) => write!(f, "{n}"),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub age: serde_json::Value,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>, age: u32) -> Self {
        Self {
            id: UserId::Num(id),
            name: name.into(),
            age: serde_json::Value::from(age),
        }
    }

    /// Age as shown in the list: numbers and strings verbatim, null as empty.
    pub fn age_display(&self) -> String {
        match &self.age {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait UserApi: Send + Sync {
    /// One page of users matching the query's filters and window.
    async fn list_users(&self, query: &Query) -> Result<Vec<User>, ApiError>;

    /// Total number of users matching the query's filters.
    async fn count_users(&self, query: &Query) -> Result<u64, ApiError>;
}
