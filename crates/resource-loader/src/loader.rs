//! Typed resource loaders.

use crate::error::{LoaderError, LoaderResult};
use crate::transport::{Response, Transport};
use log::debug;
use template_xml::{parse_document, Document};

/// Turns the response for one URL into a value.
pub trait ResourceLoader: Send + Sync + 'static {
    /// The loaded value.
    type Output: Send + 'static;

    /// URL to fetch.
    fn url(&self) -> &str;

    /// Convert the response.
    fn result(&self, response: Response) -> LoaderResult<Self::Output>;
}

/// Fetch the resource of `loader` through `transport`.
pub async fn load<L, T>(loader: &L, transport: &T) -> LoaderResult<L::Output>
where
    L: ResourceLoader,
    T: Transport,
{
    let url = loader.url();
    debug!("loading {}", url);
    let response = transport
        .fetch(url)
        .await
        .map_err(|source| LoaderError::Transport {
            url: url.to_string(),
            source,
        })?;
    loader.result(response)
}

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base, path)
}

/// Accepts any response.
#[derive(Debug, Clone)]
pub struct RawLoader {
    url: String,
}

impl RawLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Load `path` relative to `base`; the two are concatenated.
    pub fn with_base(base: &str, path: &str) -> Self {
        Self::new(join(base, path))
    }
}

impl ResourceLoader for RawLoader {
    type Output = Response;

    fn url(&self) -> &str {
        &self.url
    }

    fn result(&self, response: Response) -> LoaderResult<Response> {
        Ok(response)
    }
}

/// Loads the body of a `200` response.
#[derive(Debug, Clone)]
pub struct TextLoader {
    url: String,
}

impl TextLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Load `path` relative to `base`; the two are concatenated.
    pub fn with_base(base: &str, path: &str) -> Self {
        Self::new(join(base, path))
    }
}

impl ResourceLoader for TextLoader {
    type Output = String;

    fn url(&self) -> &str {
        &self.url
    }

    fn result(&self, response: Response) -> LoaderResult<String> {
        if !response.is_ok() {
            return Err(LoaderError::Status {
                url: self.url.clone(),
                response,
            });
        }
        Ok(response.text)
    }
}

/// Parses the body of a `200` response as XML.
#[derive(Debug, Clone)]
pub struct XmlLoader {
    url: String,
}

impl XmlLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Load `path` relative to `base`; the two are concatenated.
    pub fn with_base(base: &str, path: &str) -> Self {
        Self::new(join(base, path))
    }
}

impl ResourceLoader for XmlLoader {
    type Output = Document;

    fn url(&self) -> &str {
        &self.url
    }

    fn result(&self, response: Response) -> LoaderResult<Document> {
        if !response.is_ok() {
            return Err(LoaderError::Status {
                url: self.url.clone(),
                response,
            });
        }
        match parse_document(&response.text) {
            Ok(document) => Ok(document),
            Err(source) => Err(LoaderError::Xml {
                url: self.url.clone(),
                response,
                source,
            }),
        }
    }
}
