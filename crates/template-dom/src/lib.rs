//! Document capability.
//!
//! Template panels never touch a concrete DOM: they go through the
//! [`Document`] trait. [`MemoryDocument`] implements it over an arena and is
//! what tests and the command line use.

pub mod document;
pub mod error;
pub mod memory;

pub use document::{Document, NodeId};
pub use error::{DomError, DomErrorCode, DomResult};
pub use memory::MemoryDocument;
