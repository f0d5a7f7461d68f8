//! Template registry and panel construction.

use crate::error::{PanelError, PanelResult};
use crate::generator::TemplatePanelGenerator;
use crate::source::{element_attributes, ElementCache, TemplateSource};
use cache_tree::{CacheBuilder, CacheNode, CompositeNode};
use indexmap::IndexMap;
use log::{debug, warn};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::rc::Rc;
use template_dom::Document;
use template_fields::namespaces::{ATTR_NAME, ATTR_TEMPLATE, TAG_TEMPLATE};
use template_fields::{
    Attributes, Counters, FieldKind, FieldRegistry, Messages, NoMessages, TopPanel,
};
use template_xml::{Element, Node};

/// A compiled template.
pub type TemplateCache = CompositeNode<ElementCache>;

/// Compiles named templates once and builds panels from them on demand.
pub struct TemplatePanelBuilder {
    registry: FieldRegistry,
    messages: Rc<dyn Messages>,
    counters: Rc<Counters>,
    templates: IndexMap<SmolStr, Rc<TemplateCache>>,
    attributes: IndexMap<SmolStr, Attributes>,
}

impl std::fmt::Debug for TemplatePanelBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplatePanelBuilder")
            .field("registry", &self.registry)
            .field("counters", &self.counters)
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl TemplatePanelBuilder {
    /// Create a builder creating fields from `registry`.
    pub fn new(registry: FieldRegistry) -> Self {
        Self {
            registry,
            messages: Rc::new(NoMessages),
            counters: Rc::new(Counters::new()),
            templates: IndexMap::new(),
            attributes: IndexMap::new(),
        }
    }

    /// Use `messages` for label resolution.
    pub fn with_messages(mut self, messages: Rc<dyn Messages>) -> Self {
        self.messages = messages;
        self
    }

    /// Share `counters` with other builders.
    pub fn with_counters(mut self, counters: Rc<Counters>) -> Self {
        self.counters = counters;
        self
    }

    /// Replace the messages used by panels built from now on.
    pub fn set_messages(&mut self, messages: Rc<dyn Messages>) {
        self.messages = messages;
    }

    /// Messages used for label resolution.
    pub fn messages(&self) -> &Rc<dyn Messages> {
        &self.messages
    }

    /// Counters shared by every panel this builder builds.
    pub fn counters(&self) -> &Rc<Counters> {
        &self.counters
    }

    /// Registry resolving template tags to field factories.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Registry used by templates added from now on.
    pub fn registry_mut(&mut self) -> &mut FieldRegistry {
        &mut self.registry
    }

    /// Compile and register a template under `name`.
    ///
    /// `attributes` is the template metadata; `None` removes metadata left
    /// by an earlier template of the same name.
    pub fn add_template(&mut self, name: &str, element: &Element, attributes: Option<Attributes>) {
        let builder = CacheBuilder::new(TemplateSource::new(&self.registry));
        let root = Node::Element(element.clone());
        let cache = builder.build(&root).unwrap_or_else(|never| match never {});
        debug!(
            "compiled template '{}' ({} nodes, depth {})",
            name,
            cache.len(),
            cache.depth()
        );
        self.templates.insert(SmolStr::new(name), Rc::new(cache));
        match attributes {
            Some(attributes) => {
                self.attributes.insert(SmolStr::new(name), attributes);
            }
            None => {
                self.attributes.shift_remove(name);
            }
        }
    }

    /// Register every `template` element directly below the document root.
    ///
    /// Templates without a `name` are skipped. Returns the number of
    /// templates added.
    pub fn add_templates(&mut self, document: &template_xml::Document) -> usize {
        let mut added = 0;
        for element in document.root.elements() {
            if element.uri != TAG_TEMPLATE {
                continue;
            }
            match element.attribute(ATTR_NAME) {
                Some(name) => {
                    let name = name.to_string();
                    self.add_template(&name, element, Some(element_attributes(element)));
                    added += 1;
                }
                None => warn!("skipping template without a name"),
            }
        }
        added
    }

    /// Compiled template registered under `name`.
    pub fn template(&self, name: &str) -> Option<&TemplateCache> {
        self.templates.get(name).map(|cache| cache.as_ref())
    }

    /// Metadata of the template registered under `name`.
    pub fn template_attributes(&self, name: &str) -> Option<&Attributes> {
        self.attributes.get(name)
    }

    /// Names of the registered templates, in registration order.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(SmolStr::as_str)
    }

    /// Drop the template and its metadata.
    pub fn remove_template(&mut self, name: &str) -> bool {
        self.attributes.shift_remove(name);
        self.templates.shift_remove(name).is_some()
    }

    /// Instantiate the template `name` in `doc`.
    ///
    /// Returns `Ok(None)` for unknown templates. Views inside the template
    /// are filled with the templates they name.
    pub fn build_panel(&self, name: &str, doc: &mut dyn Document) -> PanelResult<Option<TopPanel>> {
        let mut building = FxHashSet::default();
        self.build_nested(name, doc, &mut building)
    }

    fn build_nested(
        &self,
        name: &str,
        doc: &mut dyn Document,
        building: &mut FxHashSet<SmolStr>,
    ) -> PanelResult<Option<TopPanel>> {
        let Some(template) = self.templates.get(name).cloned() else {
            return Ok(None);
        };
        if !building.insert(SmolStr::new(name)) {
            return Err(PanelError::recursive_template(name));
        }

        let mut panel = TopPanel::new(doc, self.counters.clone(), self.messages.clone());
        let mut generator = TemplatePanelGenerator::new(&mut panel, doc);
        replay(&template, &mut generator)?;
        generator.finish()?;
        self.fill_views(&mut panel, doc, building)?;

        building.remove(name);
        debug!("built panel '{}' with {} fields", name, panel.len());
        Ok(Some(panel))
    }

    fn fill_views(
        &self,
        panel: &mut TopPanel,
        doc: &mut dyn Document,
        building: &mut FxHashSet<SmolStr>,
    ) -> PanelResult<()> {
        let views: Vec<_> = panel
            .iter()
            .filter(|field| field.kind() == FieldKind::View)
            .map(|field| (field.id(), field.attribute(ATTR_TEMPLATE).map(SmolStr::new)))
            .collect();
        for (id, template) in views {
            let Some(template) = template else {
                warn!("view {} names no template", id);
                continue;
            };
            match self.build_nested(&template, doc, building)? {
                Some(view) => panel.set_view_panel(id, view, doc)?,
                None => warn!("view {} renders unknown template '{}'", id, template),
            }
        }
        Ok(())
    }
}

/// Replay a cache into the generator.
fn replay(node: &TemplateCache, generator: &mut TemplatePanelGenerator<'_>) -> PanelResult<()> {
    generator.begin_field(
        node.payload.factory.as_deref(),
        node.payload.attributes.clone(),
    )?;
    for child in node {
        match child {
            CacheNode::Text(text) => generator.add_text(text.as_str()),
            CacheNode::Composite(composite) => replay(composite, generator)?,
        }
    }
    generator.end_field()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanelErrorCode;
    use pretty_assertions::assert_eq;
    use template_dom::MemoryDocument;
    use template_fields::MessageBundle;
    use template_xml::parse_document;

    fn builder(xml: &str) -> TemplatePanelBuilder {
        let mut builder = TemplatePanelBuilder::new(FieldRegistry::new());
        let document = parse_document(xml).unwrap();
        builder.add_templates(&document);
        builder
    }

    fn templates(body: &str) -> String {
        format!(
            "<t:templates xmlns:t='http://www.adnotatio.org/ns/templates#'>{}</t:templates>",
            body
        )
    }

    #[test]
    fn test_scenario_panel() {
        let builder = builder(&templates(
            "<t:template t:name='form'><t:panel><t:input t:name='x'/> hello <t:button t:label='Go'/></t:panel></t:template>",
        ));
        let mut doc = MemoryDocument::new();
        let mut panel = builder.build_panel("form", &mut doc).unwrap().unwrap();

        let names: Vec<_> = panel.field_names().collect();
        assert_eq!(names, vec!["field0", "x", "Button-0"]);
        let container = panel.field_ids("field0")[0];
        let children = panel.field(container).unwrap().children().to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], panel.field_ids("x")[0]);
        assert_eq!(panel.field(children[1]).unwrap().kind(), FieldKind::Button);

        insta::assert_snapshot!(doc.outer_html(panel.root()), @r#"<div><div><div><input type="text" name="x"></input> hello <button>Go</button></div></div></div>"#);
        assert!(panel.set_field_value("x", Some("typed"), &mut doc).unwrap());
        assert_eq!(panel.field_value("x", &mut doc).unwrap().as_deref(), Some("typed"));
    }

    #[test]
    fn test_passthrough_markup_and_attributes() {
        let builder = builder(&templates(
            "<t:template t:name='t'><p class='intro'>Fill <b>all</b></p><t:input t:name='a' size='10' t:value='v'/></t:template>",
        ));
        let mut doc = MemoryDocument::new();
        let panel = builder.build_panel("t", &mut doc).unwrap().unwrap();
        insta::assert_snapshot!(doc.inner_html(panel.root()), @r#"<p class="intro">Fill <b>all</b></p><input type="text" name="a" value="v" size="10"></input>"#);
    }

    #[test]
    fn test_disclosure_and_tabs() {
        let builder = builder(&templates(concat!(
            "<t:template t:name='t'>",
            "<t:disclosure t:label='More' t:open='true'><t:header>Head</t:header>body</t:disclosure>",
            "<t:tabs><t:tab t:label='A'>first</t:tab><t:tab t:label='B' t:selected='yes'>second</t:tab></t:tabs>",
            "</t:template>"
        )));
        let mut doc = MemoryDocument::new();
        let panel = builder.build_panel("t", &mut doc).unwrap().unwrap();
        insta::assert_snapshot!(doc.inner_html(panel.root()), @r#"<details open="open"><summary><div><div><div>Head</div></div></div></summary><div><div>body</div></div></details><div><div class="tab-bar"><span class="tab">A</span><span class="tab tab-selected">B</span></div><div class="tab-deck"><div hidden="hidden"><div>first</div></div><div><div>second</div></div></div></div>"#);
    }

    #[test]
    fn test_views_render_named_templates() {
        let builder = builder(&templates(concat!(
            "<t:template t:name='outer'>[<t:view t:template='inner'/>]</t:template>",
            "<t:template t:name='inner'><t:label t:name='l' t:label='in'/></t:template>",
        )));
        let mut doc = MemoryDocument::new();
        let panel = builder.build_panel("outer", &mut doc).unwrap().unwrap();
        insta::assert_snapshot!(doc.inner_html(panel.root()), @"[<div><div><span>in</span></div></div>]");

        let view = panel.iter().find(|f| f.kind() == FieldKind::View).unwrap();
        let nested = panel.view_panel(view.id()).unwrap();
        assert_eq!(nested.field_count("l"), 1);
        assert_eq!(panel.field_count("l"), 0);
    }

    #[test]
    fn test_recursive_view_is_an_error() {
        let builder = builder(&templates(
            "<t:template t:name='loop'><t:view t:template='loop'/></t:template>",
        ));
        let mut doc = MemoryDocument::new();
        let err = builder.build_panel("loop", &mut doc).unwrap_err();
        assert_eq!(err.code, PanelErrorCode::RecursiveTemplate);
    }

    #[test]
    fn test_sibling_views_share_a_template() {
        let builder = builder(&templates(concat!(
            "<t:template t:name='page'><t:view t:template='row'/><t:view t:template='row'/></t:template>",
            "<t:template t:name='row'><t:label t:label='r'/></t:template>",
        )));
        let mut doc = MemoryDocument::new();
        let panel = builder.build_panel("page", &mut doc).unwrap().unwrap();
        let nested: Vec<_> = panel
            .iter()
            .filter_map(|field| panel.view_panel(field.id()))
            .map(|view| view.len())
            .collect();
        assert_eq!(nested, vec![1, 1]);
    }

    #[test]
    fn test_template_registry() {
        let mut builder = builder(&templates(concat!(
            "<t:template t:name='a' title='A'/>",
            "<t:template>no name</t:template>",
            "<other t:name='c'/>",
            "<t:template t:name='b'/>",
        )));
        assert_eq!(builder.template_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            builder.template_attributes("a").and_then(|a| a.get("title")),
            Some("A")
        );
        assert!(builder.template("a").unwrap().is_empty());

        let mut doc = MemoryDocument::new();
        assert!(builder.build_panel("missing", &mut doc).unwrap().is_none());
        assert!(builder.remove_template("a"));
        assert!(builder.template("a").is_none());
        assert!(builder.template_attributes("a").is_none());
        assert!(!builder.remove_template("a"));
    }

    #[test]
    fn test_localized_labels_and_shared_counters() {
        let messages = MessageBundle::parse("go = Los\n");
        let counters = Rc::new(Counters::new());
        let xml = templates("<t:template t:name='t'><t:submit t:labelKey='go'/></t:template>");
        let document = parse_document(&xml).unwrap();

        let mut first = TemplatePanelBuilder::new(FieldRegistry::new())
            .with_messages(Rc::new(messages))
            .with_counters(counters.clone());
        first.add_templates(&document);
        let mut second = TemplatePanelBuilder::new(FieldRegistry::new()).with_counters(counters);
        second.add_templates(&document);

        let mut doc = MemoryDocument::new();
        let a = first.build_panel("t", &mut doc).unwrap().unwrap();
        let b = second.build_panel("t", &mut doc).unwrap().unwrap();
        assert_eq!(a.field_names().collect::<Vec<_>>(), vec!["Button-0"]);
        assert_eq!(b.field_names().collect::<Vec<_>>(), vec!["Button-1"]);
        insta::assert_snapshot!(doc.inner_html(a.root()), @"<button>Los</button>");
        insta::assert_snapshot!(doc.inner_html(b.root()), @"<button></button>");
    }
}
