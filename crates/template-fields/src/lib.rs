//! Field model of form templates.
//!
//! A [`TopPanel`] owns the fields created while a template is built. Each
//! field wraps a widget made of DOM nodes, realized on first access. The
//! [`FieldRegistry`] maps template tags to the [`FieldFactory`] that creates
//! their fields.

mod attributes;
mod counters;
mod error;
mod field;
mod kind;
mod messages;
pub mod namespaces;
mod panel;
mod registry;
mod widget;

pub use attributes::{widget_attribute_name, Attributes};
pub use counters::Counters;
pub use error::{FieldError, FieldErrorCode, FieldResult};
pub use field::{Field, FieldId, Registration, Widget};
pub use kind::FieldKind;
pub use messages::{MessageBundle, Messages, NoMessages};
pub use panel::{Listener, TopPanel};
pub use registry::{FieldFactory, FieldRegistry};
pub use widget::{TabPage, WidgetParts};
