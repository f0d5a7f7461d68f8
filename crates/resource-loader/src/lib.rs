//! Asynchronous resource loading.
//!
//! A [`Transport`] fetches raw responses, a [`ResourceLoader`] turns a
//! response into a typed value and a [`LoaderBarrier`] waits for a group of
//! loaders, collecting successes and failures in the order they finish.
//! [`TemplateLoader`] uses them to fill a template builder.

pub mod barrier;
pub mod error;
pub mod loader;
pub mod templates;
pub mod transport;

pub use barrier::{BarrierOutcome, Loaded, LoaderBarrier, Success};
pub use error::{LoaderError, LoaderResult};
pub use loader::{load, RawLoader, ResourceLoader, TextLoader, XmlLoader};
pub use templates::TemplateLoader;
pub use transport::{FileTransport, MemoryTransport, Response, Transport};
