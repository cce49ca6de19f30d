//! Fetch cycles: run the list and count calls for a query off the UI thread
//! and post the outcome back over a channel.

use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

use crate::api::{Query, User, UserApi};
use crate::error::ApiError;

/// A query stamped with the sequence number of the cycle it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: Query,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchedPage {
    pub users: Vec<User>,
    pub total_count: u64,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<FetchedPage, ApiError>,
}

/// List and count concurrently; the first failure fails the cycle.
pub async fn fetch_page(api: &dyn UserApi, query: &Query) -> Result<FetchedPage, ApiError> {
    let (users, total_count) = tokio::try_join!(api.list_users(query), api.count_users(query))?;
    Ok(FetchedPage { users, total_count })
}

/// Spawns fetch cycles on a tokio runtime. In-flight cycles are never
/// cancelled; the receiver side decides which outcome is current.
#[derive(Clone)]
pub struct Fetcher {
    api: Arc<dyn UserApi>,
    handle: Handle,
    tx: UnboundedSender<FetchOutcome>,
}

impl Fetcher {
    pub fn new(api: Arc<dyn UserApi>, handle: Handle) -> (Self, UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = unbounded_channel();
        (Self { api, handle, tx }, rx)
    }

    pub fn spawn(&self, request: FetchRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        debug!(seq = request.seq, query = ?request.query, "fetch cycle started");
        self.handle.spawn(async move {
            let started = Instant::now();
            let result = fetch_page(api.as_ref(), &request.query).await;
            match &result {
                Ok(page) => info!(
                    seq = request.seq,
                    users = page.users.len(),
                    total = page.total_count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "fetch cycle finished"
                ),
                Err(err) => warn!(seq = request.seq, error = %err, "fetch cycle failed"),
            }
            let outcome = FetchOutcome {
                seq: request.seq,
                result,
            };
            if tx.send(outcome).is_err() {
                debug!(seq = request.seq, "ui loop gone; dropping fetch result");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryUserApi;
    use std::time::Duration;

    #[tokio::test]
    async fn fetch_page_combines_list_and_count() {
        let api = InMemoryUserApi::sample().with_latency(Duration::ZERO);
        let page = fetch_page(&api, &Query::default()).await.unwrap();
        assert_eq!(page.users.len(), 4);
        assert_eq!(page.total_count, 14);
    }

    #[tokio::test]
    async fn spawned_cycle_reports_back_with_its_seq() {
        let api: Arc<dyn UserApi> = Arc::new(InMemoryUserApi::new(vec![]).failing("network error"));
        let (fetcher, mut rx) = Fetcher::new(api, Handle::current());
        fetcher.spawn(FetchRequest {
            seq: 7,
            query: Query::default(),
        });
        let outcome = rx.recv().await.expect("outcome");
        assert_eq!(outcome.seq, 7);
        assert_eq!(outcome.result.unwrap_err().to_string(), "network error");
    }
}
