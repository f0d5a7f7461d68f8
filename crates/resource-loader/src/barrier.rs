//! Waiting for a group of loaders.

use crate::error::{LoaderError, LoaderResult};
use crate::loader::{load, ResourceLoader};
use crate::transport::Transport;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinSet;

/// A loaded value of any loader type.
pub type Loaded = Box<dyn Any + Send>;

type Job = Pin<Box<dyn Future<Output = LoaderResult<Loaded>> + Send>>;
type Callback<'a> = Box<dyn FnOnce(Result<&Loaded, &LoaderError>) + 'a>;

/// A successfully loaded resource.
#[derive(Debug)]
pub struct Success {
    /// URL of the resource.
    pub url: String,
    /// The value produced by the loader.
    pub value: Loaded,
}

impl Success {
    /// The value, if the loader produced a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

/// Results of an activated barrier, each list in completion order.
#[derive(Debug, Default)]
pub struct BarrierOutcome {
    /// Loaded resources.
    pub successes: Vec<Success>,
    /// Loaders that failed.
    pub failures: Vec<LoaderError>,
}

impl BarrierOutcome {
    /// Total number of finished loaders.
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Entry<'a> {
    url: String,
    job: Job,
    callback: Option<Callback<'a>>,
}

/// Runs a set of loaders concurrently and reports once all of them are done.
///
/// Loaders are added first, then [`activate`](LoaderBarrier::activate)
/// fetches every resource at once. Per-loader callbacks run as each loader
/// finishes. A barrier is activated at most once: adding a loader to an
/// activated barrier, or activating it again, panics.
pub struct LoaderBarrier<'a, T> {
    transport: Arc<T>,
    entries: Vec<Entry<'a>>,
    activated: bool,
}

impl<'a, T: Transport> LoaderBarrier<'a, T> {
    /// Create an empty barrier fetching through `transport`.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            entries: Vec::new(),
            activated: false,
        }
    }

    /// Number of registered loaders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether the barrier was activated.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Register a loader without callback.
    pub fn add<L: ResourceLoader>(&mut self, loader: L) -> &mut Self {
        self.push(loader, None)
    }

    /// Register a loader with a callback receiving its result.
    pub fn add_with<L, F>(&mut self, loader: L, callback: F) -> &mut Self
    where
        L: ResourceLoader,
        F: FnOnce(Result<&L::Output, &LoaderError>) + 'a,
    {
        let callback: Callback<'a> =
            Box::new(move |result: Result<&Loaded, &LoaderError>| match result {
                Ok(value) => match value.downcast_ref::<L::Output>() {
                    Some(value) => callback(Ok(value)),
                    None => warn!("loaded value has an unexpected type"),
                },
                Err(err) => callback(Err(err)),
            });
        self.push(loader, Some(callback))
    }

    fn push<L: ResourceLoader>(&mut self, loader: L, callback: Option<Callback<'a>>) -> &mut Self {
        self.check_activation();
        let url = loader.url().to_string();
        let transport = self.transport.clone();
        let job: Job = Box::pin(async move {
            load(&loader, transport.as_ref())
                .await
                .map(|value| Box::new(value) as Loaded)
        });
        self.entries.push(Entry { url, job, callback });
        self
    }

    fn check_activation(&self) {
        assert!(!self.activated, "the loader barrier is already activated");
    }

    /// Fetch every resource and wait until all loaders finished.
    ///
    /// Must run inside a tokio runtime.
    pub async fn activate(&mut self) -> BarrierOutcome {
        self.check_activation();
        self.activated = true;

        let total = self.entries.len();
        let mut urls = Vec::with_capacity(total);
        let mut callbacks = Vec::with_capacity(total);
        let mut ids = FxHashMap::default();
        let mut tasks = JoinSet::new();
        for (index, entry) in self.entries.drain(..).enumerate() {
            let job = entry.job;
            let handle = tasks.spawn(async move { (index, job.await) });
            ids.insert(handle.id(), index);
            urls.push(entry.url);
            callbacks.push(entry.callback);
        }
        debug!("barrier activated with {} loaders", total);

        let mut outcome = BarrierOutcome::default();
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = match joined {
                Ok(done) => done,
                Err(err) => {
                    let Some(&index) = ids.get(&err.id()) else {
                        continue;
                    };
                    let failure = LoaderError::Task {
                        url: urls[index].clone(),
                        message: err.to_string(),
                    };
                    (index, Err(failure))
                }
            };
            if let Some(callback) = callbacks[index].take() {
                callback(result.as_ref());
            }
            match result {
                Ok(value) => outcome.successes.push(Success {
                    url: urls[index].clone(),
                    value,
                }),
                Err(err) => outcome.failures.push(err),
            }
        }
        debug!(
            "barrier finished: {} loaded, {} failed",
            outcome.successes.len(),
            outcome.failures.len()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{RawLoader, TextLoader, XmlLoader};
    use crate::transport::{MemoryTransport, Response};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::time::Duration;

    fn transport() -> Arc<MemoryTransport> {
        let mut transport = MemoryTransport::new();
        transport
            .insert("slow", "s")
            .delay("slow", Duration::from_millis(200))
            .insert("fast", "f")
            .insert("doc", "<a/>")
            .insert_response("fail", Response::new(503, ""));
        Arc::new(transport)
    }

    #[tokio::test]
    async fn test_outcome_in_completion_order() {
        let mut barrier = LoaderBarrier::new(transport());
        barrier
            .add(TextLoader::new("slow"))
            .add(TextLoader::new("fail"))
            .add(TextLoader::new("fast"));
        let outcome = barrier.activate().await;

        assert_eq!(outcome.len(), 3);
        let urls: Vec<_> = outcome.successes.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["fast", "slow"]);
        assert_eq!(outcome.successes[0].downcast_ref::<String>().unwrap(), "f");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].url(), "fail");
    }

    #[tokio::test]
    async fn test_callbacks_run_per_loader() {
        let seen = RefCell::new(Vec::new());
        let mut barrier = LoaderBarrier::new(transport());
        barrier
            .add_with(XmlLoader::new("doc"), |result| {
                let name = result.map(|doc| doc.root.qname.to_string());
                seen.borrow_mut().push(name.map_err(|err| err.url().to_string()));
            })
            .add_with(RawLoader::new("fail"), |result| {
                seen.borrow_mut()
                    .push(result.map(|r| r.status.to_string()).map_err(|e| e.to_string()));
            })
            .add_with(TextLoader::new("fail"), |result| {
                seen.borrow_mut()
                    .push(result.cloned().map_err(|err| err.url().to_string()));
            });
        let outcome = barrier.activate().await;
        assert_eq!(outcome.len(), 3);
        drop(barrier);

        let mut seen = seen.into_inner();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                Ok("503".to_string()),
                Ok("a".to_string()),
                Err("fail".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_completes_first() {
        let order = RefCell::new(Vec::new());
        let mut barrier = LoaderBarrier::new(transport());
        barrier
            .add_with(TextLoader::new("slow"), |result| {
                order.borrow_mut().push(("slow", result.is_ok()));
            })
            .add_with(TextLoader::new("missing"), |result| {
                order.borrow_mut().push(("missing", result.is_ok()));
            });
        let outcome = barrier.activate().await;
        drop(barrier);

        assert_eq!(order.into_inner(), vec![("missing", false), ("slow", true)]);
        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].url(), "missing");
        assert_eq!(
            outcome.failures[0].response().map(|response| response.status),
            Some(404)
        );
        assert_eq!(outcome.successes.len(), 1);
        assert_eq!(outcome.successes[0].downcast_ref::<String>().unwrap(), "s");
    }

    #[tokio::test]
    async fn test_empty_barrier_finishes() {
        let mut barrier = LoaderBarrier::new(transport());
        let outcome = barrier.activate().await;
        assert!(outcome.is_empty());
        assert!(barrier.is_activated());
    }

    #[tokio::test]
    #[should_panic(expected = "already activated")]
    async fn test_reactivation_panics() {
        let mut barrier = LoaderBarrier::new(transport());
        barrier.add(TextLoader::new("fast"));
        barrier.activate().await;
        barrier.activate().await;
    }

    #[tokio::test]
    #[should_panic(expected = "already activated")]
    async fn test_add_after_activation_panics() {
        let mut barrier = LoaderBarrier::new(transport());
        barrier.activate().await;
        barrier.add(TextLoader::new("fast"));
    }
}
