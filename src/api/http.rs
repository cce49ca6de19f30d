//! `UserApi` over plain HTTP + JSON.
//!
//! - `GET {base}/users?name=&age=&limit=&offset=` -> `[{"id", "name", "age"}, ...]`
//! - `GET {base}/users/count?name=&age=` -> `{"count": n}` or a bare `n`
//!
//! No retries. A request that exceeds the client timeout fails the cycle.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Query, User, UserApi};
use crate::error::ApiError;

/// Longest error body kept in a status error message.
const MAX_ERROR_BODY: usize = 200;

#[derive(Deserialize)]
#[serde(untagged)]
enum CountBody {
    Wrapped { count: u64 },
    Bare(u64),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone, Debug)]
pub struct HttpUserApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpUserApi {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("userlist-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, keeping any path prefix it has.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        debug!(%url, ?params, "GET");
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Prefer a JSON `{"message": ...}` body; fall back to the (truncated) raw text.
fn error_message(body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.message;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.chars().count() > MAX_ERROR_BODY {
        let cut: String = text.chars().take(MAX_ERROR_BODY).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn list_users(&self, query: &Query) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint(&["users"])?;
        self.get_json(url, &query.page_params()).await
    }

    async fn count_users(&self, query: &Query) -> Result<u64, ApiError> {
        let url = self.endpoint(&["users", "count"])?;
        let body: CountBody = self.get_json(url, &query.filter_params()).await?;
        Ok(match body {
            CountBody::Wrapped { count } => count,
            CountBody::Bare(count) => count,
        })
    }
}
