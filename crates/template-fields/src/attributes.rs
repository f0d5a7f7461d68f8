//! Field attributes.

use crate::namespaces::NS_XHTML;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// Attributes captured from a template tag, keyed by attribute URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    map: IndexMap<SmolStr, String>,
}

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value.
    pub fn get(&self, uri: &str) -> Option<&str> {
        self.map.get(uri).map(String::as_str)
    }

    /// Get a boolean attribute; `true`, `yes`, `1` and `checked` are true.
    pub fn get_bool(&self, uri: &str, default: bool) -> bool {
        match self.get(uri) {
            Some(value) => matches!(value, "true" | "yes" | "1" | "checked"),
            None => default,
        }
    }

    /// Set an attribute, returning the previous value.
    pub fn insert(&mut self, uri: impl Into<SmolStr>, value: impl Into<String>) -> Option<String> {
        self.map.insert(uri.into(), value.into())
    }

    /// Check whether an attribute is present.
    pub fn contains(&self, uri: &str) -> bool {
        self.map.contains_key(uri)
    }

    /// Iterate over `(uri, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Attributes that are copied onto the widget element, by DOM name.
    pub fn widget_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter_map(|(uri, value)| widget_attribute_name(uri).map(|name| (name, value)))
    }
}

impl<K: Into<SmolStr>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// DOM attribute name of an attribute URI, `None` when it must not reach
/// the widget.
///
/// XHTML attributes keep their local name, any other namespaced URI
/// (reserved attributes included) is dropped, plain names pass through.
pub fn widget_attribute_name(uri: &str) -> Option<&str> {
    if let Some(local) = uri.strip_prefix(NS_XHTML) {
        return Some(local);
    }
    if uri.contains('#') || uri.contains('/') {
        return None;
    }
    Some(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{ATTR_NAME, ATTR_OPEN};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_bool() {
        let attrs: Attributes = [(ATTR_OPEN, "yes"), ("a", "no")].into_iter().collect();
        assert!(attrs.get_bool(ATTR_OPEN, false));
        assert!(!attrs.get_bool("a", true));
        assert!(attrs.get_bool("missing", true));
    }

    #[test]
    fn test_widget_attributes() {
        let attrs: Attributes = [
            (ATTR_NAME, "x"),
            ("class", "wide"),
            ("http://www.w3.org/1999/xhtml/style", "color: red"),
            ("urn:other#foo", "bar"),
            ("http://www.w3.org/2000/xmlns/t", "urn:t"),
        ]
        .into_iter()
        .collect();
        let passed: Vec<_> = attrs.widget_attributes().collect();
        assert_eq!(passed, vec![("class", "wide"), ("style", "color: red")]);
    }
}
