//! Field records.

use crate::attributes::Attributes;
use crate::kind::FieldKind;
use crate::messages::Messages;
use crate::namespaces::{ATTR_LABEL, ATTR_LABEL_KEY, ATTR_TITLE, ATTR_VALUE, TAG_URI};
use crate::widget::WidgetParts;
use smol_str::SmolStr;
use std::fmt;
use template_dom::NodeId;

/// Handle to a field of a [`crate::TopPanel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u32);

impl FieldId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Widget lifecycle. Realization happens once and is never undone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Widget {
    /// No widget created yet.
    #[default]
    Unrealized,
    /// The widget exists and its attributes were applied.
    Realized(WidgetParts),
}

/// Outcome of a container's pre-registration hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The child is ordinary content and gets a placeholder.
    Accepted,
    /// The container took the child for a special role.
    Intercepted,
}

/// A field: configuration, widget and position in the field tree.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) id: FieldId,
    pub(crate) kind: FieldKind,
    pub(crate) name: SmolStr,
    pub(crate) attributes: Attributes,
    pub(crate) parent: Option<FieldId>,
    pub(crate) children: Vec<FieldId>,
    pub(crate) attached: Vec<FieldId>,
    pub(crate) widget: Widget,
}

impl Field {
    pub(crate) fn new(id: FieldId, kind: FieldKind, name: SmolStr, attributes: Attributes) -> Self {
        Self {
            id,
            kind,
            name,
            attributes,
            parent: None,
            children: Vec::new(),
            attached: Vec::new(),
            widget: Widget::Unrealized,
        }
    }

    /// Get the field id.
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// Get the field variant.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Get the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the attributes of the source tag.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Get an attribute by URI.
    pub fn attribute(&self, uri: &str) -> Option<&str> {
        self.attributes.get(uri)
    }

    /// URI of the tag the field was created from.
    pub fn tag_uri(&self) -> Option<&str> {
        self.attributes.get(TAG_URI)
    }

    /// The `value` attribute.
    pub fn default_value(&self) -> Option<&str> {
        self.attributes.get(ATTR_VALUE)
    }

    /// Resolve the label: localized `labelKey`, then `label`, then `title`.
    pub fn label(&self, messages: &dyn Messages) -> Option<String> {
        self.attributes
            .get(ATTR_LABEL_KEY)
            .and_then(|key| messages.message(key))
            .or_else(|| self.attributes.get(ATTR_LABEL))
            .or_else(|| self.attributes.get(ATTR_TITLE))
            .map(str::to_string)
    }

    /// Get the parent field.
    pub fn parent(&self) -> Option<FieldId> {
        self.parent
    }

    /// Children registered as content, in document order.
    pub fn children(&self) -> &[FieldId] {
        &self.children
    }

    /// Children intercepted by this container (tab pages, disclosure header).
    pub fn attached(&self) -> &[FieldId] {
        &self.attached
    }

    /// All children, content first.
    pub fn contents(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.children.iter().chain(&self.attached).copied()
    }

    /// Check whether the widget exists.
    pub fn is_realized(&self) -> bool {
        matches!(self.widget, Widget::Realized(_))
    }

    /// Root element of the widget, once realized.
    pub fn widget(&self) -> Option<NodeId> {
        self.parts().map(WidgetParts::root)
    }

    /// Widget parts, once realized.
    pub fn parts(&self) -> Option<&WidgetParts> {
        match &self.widget {
            Widget::Realized(parts) => Some(parts),
            Widget::Unrealized => None,
        }
    }

    pub(crate) fn parts_mut(&mut self) -> Option<&mut WidgetParts> {
        match &mut self.widget {
            Widget::Realized(parts) => Some(parts),
            Widget::Unrealized => None,
        }
    }
}
