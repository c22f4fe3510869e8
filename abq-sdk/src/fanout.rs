use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::warn;

use crate::error::{Error, Result};

/// Executor for listings that span many parents.
///
/// Each parent is listed by an independent request, with at most
/// `concurrency` of them in flight. Results are joined in the order of the
/// parents. On timeout in-flight requests are dropped, not cancelled on the
/// server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    concurrency: usize,
    max_wait: Option<Duration>,
}

impl FanOut {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            max_wait: None,
        }
    }

    /// One request at a time and no time limit: a deterministic executor.
    pub fn sequential() -> Self {
        Self::new(1)
    }

    /// Aggregate budget of an operation run through [`within`](Self::within).
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// List the children of every parent and concatenate the results.
    ///
    /// The first error aborts the whole listing.
    pub async fn flat_map<P, T, F, Fut>(&self, parents: Vec<P>, list: F) -> Result<Vec<T>>
    where
        F: FnMut(P) -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        stream::iter(parents)
            .map(list)
            .buffered(self.concurrency)
            .try_concat()
            .await
    }

    /// Run `operation`, failing with [`Error::Timeout`] once the aggregate
    /// budget is exceeded.
    pub async fn within<T>(
        &self,
        operation: &str,
        work: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let Some(max_wait) = self.max_wait else {
            return work.await;
        };
        match tokio::time::timeout(max_wait, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, ?max_wait, "fan-out listing timed out");
                Err(Error::Timeout {
                    operation: operation.to_owned(),
                    timeout: max_wait,
                })
            }
        }
    }
}
