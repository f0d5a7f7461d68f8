//! Compilation of template elements into caches.

use cache_tree::{CacheSource, Children, CompositeNode};
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use smol_str::SmolStr;
use template_fields::namespaces::{is_reserved, TAG_URI};
use template_fields::{Attributes, FieldFactory, FieldRegistry};
use template_xml::{escape, serialize_close_tag, serialize_open_tag, Element, Node};

/// Payload of a composite cache node: one template element bound to the
/// factory of its tag.
///
/// The synthetic root of a template has no factory.
#[derive(Clone)]
pub struct ElementCache {
    /// Factory creating the field, `None` for the template root.
    pub factory: Option<Rc<dyn FieldFactory>>,
    /// URI of the element tag.
    pub tag: SmolStr,
    /// Field attributes: the element attributes by URI plus the tag URI.
    pub attributes: Attributes,
}

impl ElementCache {
    fn new(factory: Option<Rc<dyn FieldFactory>>, element: &Element) -> Self {
        let mut attributes = element_attributes(element);
        attributes.insert(TAG_URI, element.uri.as_str());
        Self {
            factory,
            tag: element.uri.clone(),
            attributes,
        }
    }
}

impl fmt::Debug for ElementCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementCache")
            .field("tag", &self.tag)
            .field("dynamic", &self.factory.is_some())
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl PartialEq for ElementCache {
    fn eq(&self, other: &Self) -> bool {
        let same_factory = match (&self.factory, &other.factory) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_factory && self.tag == other.tag && self.attributes == other.attributes
    }
}

impl Eq for ElementCache {}

impl Hash for ElementCache {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        for (uri, value) in self.attributes.iter() {
            uri.hash(state);
            value.hash(state);
        }
    }
}

/// Attributes of an element keyed by URI.
pub fn element_attributes(element: &Element) -> Attributes {
    element
        .attributes
        .iter()
        .map(|attribute| (attribute.uri.clone(), attribute.value.clone()))
        .collect()
}

/// Cache hooks over template XML.
///
/// Registered tags become composites. Reserved tags that are not registered
/// are transparent, every other element is serialized around its content.
#[derive(Debug, Clone, Copy)]
pub struct TemplateSource<'r> {
    registry: &'r FieldRegistry,
}

impl<'r> TemplateSource<'r> {
    /// Create a source resolving tags through `registry`.
    pub fn new(registry: &'r FieldRegistry) -> Self {
        Self { registry }
    }
}

impl CacheSource for TemplateSource<'_> {
    type Node = Node;
    type Payload = ElementCache;
    type Error = Infallible;

    fn new_root(&self, root: &Node) -> Result<CompositeNode<ElementCache>, Infallible> {
        let payload = match root {
            Node::Element(element) => ElementCache::new(None, element),
            Node::Text(_) => ElementCache {
                factory: None,
                tag: SmolStr::default(),
                attributes: Attributes::new(),
            },
        };
        Ok(CompositeNode::new(payload))
    }

    fn composite(&self, node: &Node) -> Result<Option<CompositeNode<ElementCache>>, Infallible> {
        let Node::Element(element) = node else {
            return Ok(None);
        };
        Ok(self
            .registry
            .lookup_uri(&element.uri)
            .map(|factory| CompositeNode::new(ElementCache::new(Some(factory), element))))
    }

    fn text_prefix(
        &self,
        node: &Node,
        composite: Option<&CompositeNode<ElementCache>>,
    ) -> Result<Option<String>, Infallible> {
        if composite.is_some() {
            return Ok(None);
        }
        let mut out = String::new();
        match node {
            Node::Element(element) if is_reserved(&element.uri) => return Ok(None),
            Node::Element(element) => serialize_open_tag(element, &mut out),
            Node::Text(text) => escape(text, &mut out),
        }
        Ok(Some(out))
    }

    fn text_suffix(
        &self,
        node: &Node,
        composite: Option<&CompositeNode<ElementCache>>,
    ) -> Result<Option<String>, Infallible> {
        match node {
            Node::Element(element) if composite.is_none() && !is_reserved(&element.uri) => {
                let mut out = String::new();
                serialize_close_tag(element, &mut out);
                Ok(Some(out))
            }
            _ => Ok(None),
        }
    }

    fn children<'a>(
        &self,
        node: &'a Node,
        _composite: Option<&CompositeNode<ElementCache>>,
    ) -> Option<Children<'a, Node>> {
        match node {
            Node::Element(element) => Some(Box::new(element.children.iter())),
            Node::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache_tree::{CacheBuilder, CacheNode};
    use pretty_assertions::assert_eq;
    use template_xml::parse_document;

    const NS: &str = "xmlns:t='http://www.adnotatio.org/ns/templates#'";

    fn compile(registry: &FieldRegistry, xml: &str) -> CompositeNode<ElementCache> {
        let document = parse_document(xml).unwrap();
        let builder = CacheBuilder::new(TemplateSource::new(registry));
        let root = Node::Element(document.root);
        builder.build(&root).unwrap_or_else(|never| match never {})
    }

    fn local(node: &CacheNode<ElementCache>) -> &str {
        let composite = node.as_composite().unwrap();
        template_xml::local_name_of(&composite.payload.tag).unwrap()
    }

    #[test]
    fn test_scenario_cache_shape() {
        let registry = FieldRegistry::new();
        let xml = format!(
            "<t:template {NS} t:name='form'><t:panel><t:input t:name='x'/> hello <t:button t:label='Go'/></t:panel></t:template>"
        );
        let cache = compile(&registry, &xml);
        assert!(cache.payload.factory.is_none());
        assert_eq!(cache.len(), 1);

        let panel = cache.children()[0].as_composite().unwrap();
        assert_eq!(local(&cache.children()[0]), "panel");
        let children = panel.children();
        assert_eq!(children.len(), 3);
        assert_eq!(local(&children[0]), "input");
        assert_eq!(children[1].as_text().map(|t| t.as_str()), Some(" hello "));
        assert_eq!(local(&children[2]), "button");
        assert_eq!(
            children[0].as_composite().unwrap().payload.attributes.get(TAG_URI),
            Some("http://www.adnotatio.org/ns/templates#input")
        );
    }

    #[test]
    fn test_passthrough_markup() {
        let registry = FieldRegistry::new();
        let xml = format!(
            "<t:template {NS}><div class='a&amp;b'>x &lt; y<t:unknown>in</t:unknown><my:tag xmlns:my='urn:my'/></div></t:template>"
        );
        let cache = compile(&registry, &xml);
        insta::assert_snapshot!(cache.text(), @"<div class='a&amp;b'>x &lt; yin<my:tag xmlns:my='urn:my'></my:tag></div>");
    }

    #[test]
    fn test_rebuild_is_equal() {
        let registry = FieldRegistry::new();
        let xml = format!(
            "<t:template {NS}><p>a</p><t:panel><t:tabs><t:tab t:label='One'>b</t:tab></t:tabs></t:panel>c</t:template>"
        );
        let first = compile(&registry, &xml);
        let second = compile(&registry, &xml);
        assert_eq!(first, second);
        assert_eq!(first.depth(), 3);
    }
}
