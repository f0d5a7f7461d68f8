//! Tag-to-factory registry.

use crate::attributes::Attributes;
use crate::kind::FieldKind;
use crate::namespaces::NS_TEMPLATES;
use crate::panel::TopPanel;
use crate::FieldId;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;
use std::rc::Rc;
use template_xml::make_uri;

/// Creates fields for a template tag.
pub trait FieldFactory: fmt::Debug {
    /// Create and register a field in `panel`.
    ///
    /// Returning `None` makes the tag behave as if it were not registered.
    fn new_field(&self, panel: &mut TopPanel, attributes: Attributes) -> Option<FieldId>;
}

impl FieldFactory for FieldKind {
    fn new_field(&self, panel: &mut TopPanel, attributes: Attributes) -> Option<FieldId> {
        Some(panel.create_field(*self, attributes))
    }
}

/// Maps tag URIs to field factories.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    factories: FxHashMap<SmolStr, Rc<dyn FieldFactory>>,
}

impl FieldRegistry {
    /// Create a registry holding the built-in vocabulary.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (local, kind) in FieldKind::BUILTIN_TAGS {
            registry.register(Some(NS_TEMPLATES), local, Rc::new(kind));
        }
        registry
    }

    /// Create a registry with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one for the same tag.
    pub fn register(&mut self, namespace: Option<&str>, local: &str, factory: Rc<dyn FieldFactory>) {
        self.factories
            .insert(make_uri(namespace, local), factory);
    }

    /// Find the factory of a tag.
    pub fn lookup(&self, namespace: Option<&str>, local: &str) -> Option<Rc<dyn FieldFactory>> {
        self.lookup_uri(&make_uri(namespace, local))
    }

    /// Find the factory of a tag URI.
    pub fn lookup_uri(&self, uri: &str) -> Option<Rc<dyn FieldFactory>> {
        self.factories.get(uri).cloned()
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if no tag is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
