//! Fetching raw resources.

use log::trace;
use rustc_hash::FxHashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A response to a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code, HTTP style.
    pub status: u16,
    /// Body text.
    pub text: String,
}

impl Response {
    /// Create a response.
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    /// A `200` response.
    pub fn ok(text: impl Into<String>) -> Self {
        Self::new(200, text)
    }

    /// An empty `404` response.
    pub fn not_found() -> Self {
        Self::new(404, "")
    }

    /// Check whether the status is 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Delivers the resource behind a URL.
///
/// Missing resources are responses with status 404; errors are reserved for
/// failures to produce any response.
pub trait Transport: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = io::Result<Response>> + Send;
}

/// Serves files below a root directory; URLs are relative paths.
#[derive(Debug, Clone)]
pub struct FileTransport {
    root: PathBuf,
}

impl FileTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Transport for FileTransport {
    fn fetch(&self, url: &str) -> impl Future<Output = io::Result<Response>> + Send {
        let path = self.root.join(url);
        async move {
            trace!("reading {}", path.display());
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => Ok(Response::ok(text)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Response::not_found()),
                Err(err) => Err(err),
            }
        }
    }
}

/// Serves canned responses, optionally after a delay.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    entries: FxHashMap<String, (Response, Option<Duration>)>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` with status 200 at `url`.
    pub fn insert(&mut self, url: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.insert_response(url, Response::ok(text))
    }

    /// Serve `response` at `url`.
    pub fn insert_response(&mut self, url: impl Into<String>, response: Response) -> &mut Self {
        self.entries.insert(url.into(), (response, None));
        self
    }

    /// Delay the response served at `url`.
    pub fn delay(&mut self, url: &str, delay: Duration) -> &mut Self {
        if let Some((_, slot)) = self.entries.get_mut(url) {
            *slot = Some(delay);
        }
        self
    }
}

impl Transport for MemoryTransport {
    fn fetch(&self, url: &str) -> impl Future<Output = io::Result<Response>> + Send {
        let entry = self.entries.get(url).cloned();
        async move {
            match entry {
                Some((response, delay)) => {
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    Ok(response)
                }
                None => Ok(Response::not_found()),
            }
        }
    }
}
