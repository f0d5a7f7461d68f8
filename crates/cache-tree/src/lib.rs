//! Template caches.
//!
//! A cache is the compiled form of a tree whose nodes are either static
//! markup or "dynamic" elements. Static runs are collapsed into single
//! [`TextNode`]s and every dynamic element becomes a [`CompositeNode`]
//! holding its own compiled children. A cache is built once with a
//! [`CacheBuilder`] and replayed as many times as needed.

pub mod builder;
pub mod node;

pub use builder::{CacheBuilder, CacheSource, Children};
pub use node::{CacheNode, CompositeNode, TextNode};
