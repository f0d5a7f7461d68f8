//! XML form templates.
//!
//! A [`TemplatePanelBuilder`] compiles every template once into a cache of
//! static markup runs and field elements. Building a panel replays the cache
//! through a [`TemplatePanelGenerator`], which creates the fields, merges
//! the markup of each container with placeholder markers and finally
//! splices the widgets into the document.
//!
//! ```ignore
//! let mut builder = TemplatePanelBuilder::new(FieldRegistry::new());
//! builder.add_templates(&template_xml::parse_document(xml)?);
//! let mut doc = MemoryDocument::new();
//! let panel = builder.build_panel("login", &mut doc)?;
//! ```

mod builder;
mod error;
mod generator;
mod source;
mod splice;

pub use builder::{TemplateCache, TemplatePanelBuilder};
pub use error::{PanelError, PanelErrorCode, PanelResult};
pub use generator::TemplatePanelGenerator;
pub use source::{element_attributes, ElementCache, TemplateSource};
pub use splice::splice;
