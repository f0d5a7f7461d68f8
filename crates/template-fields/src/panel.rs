//! The panel context owning every field of a built template.

use crate::attributes::Attributes;
use crate::counters::Counters;
use crate::error::{FieldError, FieldResult};
use crate::field::{Field, FieldId, Registration, Widget};
use crate::kind::FieldKind;
use crate::messages::Messages;
use crate::namespaces::{ATTR_CHILDREN, ATTR_FOR, ATTR_NAME, ATTR_SELECTED, TAG_HEADER};
use crate::widget::{set_flag, TabPage, WidgetParts, WidgetSpec};
use indexmap::IndexMap;
use log::{debug, trace, warn};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;
use std::rc::Rc;
use template_dom::{Document, NodeId};

/// Callback notified with the button that fired it.
pub type Listener = Box<dyn FnMut(FieldId)>;

/// Owner of the fields of one built template.
///
/// Fields live in an arena addressed by [`FieldId`] and are indexed by name;
/// several fields may share a name. Operations that touch widgets take the
/// document the panel was built in.
pub struct TopPanel {
    root: NodeId,
    fields: Vec<Option<Field>>,
    names: IndexMap<SmolStr, Vec<FieldId>>,
    counters: Rc<Counters>,
    messages: Rc<dyn Messages>,
    views: FxHashMap<FieldId, TopPanel>,
    submit_listeners: Vec<Listener>,
    cancel_listeners: Vec<Listener>,
    click_listeners: FxHashMap<SmolStr, Vec<Listener>>,
}

impl fmt::Debug for TopPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopPanel")
            .field("root", &self.root)
            .field("fields", &self.fields)
            .field("names", &self.names)
            .field("views", &self.views)
            .finish_non_exhaustive()
    }
}

impl TopPanel {
    /// Create an empty panel whose root is a new `<div>` of `doc`.
    pub fn new(
        doc: &mut dyn Document,
        counters: Rc<Counters>,
        messages: Rc<dyn Messages>,
    ) -> Self {
        Self {
            root: doc.create_element("div"),
            fields: Vec::new(),
            names: IndexMap::new(),
            counters,
            messages,
            views: FxHashMap::default(),
            submit_listeners: Vec::new(),
            cancel_listeners: Vec::new(),
            click_listeners: FxHashMap::default(),
        }
    }

    /// Root element of the panel.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Counters used for generated names.
    pub fn counters(&self) -> &Rc<Counters> {
        &self.counters
    }

    /// Messages used for label resolution.
    pub fn messages(&self) -> &Rc<dyn Messages> {
        &self.messages
    }

    // Registration

    /// Create and register a field.
    ///
    /// The name is the `name` attribute, or a generated `Button-<N>` for
    /// buttons and `field<N>` for everything else.
    pub fn create_field(&mut self, kind: FieldKind, attributes: Attributes) -> FieldId {
        let name = match attributes.get(ATTR_NAME) {
            Some(name) => SmolStr::new(name),
            None if kind.is_button() => SmolStr::from(self.counters.next_button_name()),
            None => SmolStr::from(self.counters.next_field_name()),
        };
        let id = FieldId::new(self.fields.len());
        debug!("register {} field '{}' as {}", kind, name, id);
        self.names.entry(name.clone()).or_default().push(id);
        self.fields
            .push(Some(Field::new(id, kind, name, attributes)));
        id
    }

    /// Unregister a field and its descendants, detaching their widgets.
    pub fn remove_field(&mut self, id: FieldId, doc: &mut dyn Document) -> FieldResult<()> {
        self.get(id)?;
        self.unlink(id);
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(field) = self.fields[current.index()].take() else {
                continue;
            };
            pending.extend(field.contents());
            if let Some(list) = self.names.get_mut(field.name.as_str()) {
                list.retain(|f| *f != current);
                if list.is_empty() {
                    self.names.shift_remove(field.name.as_str());
                }
            }
            if let Some(root) = field.widget() {
                doc.detach(root);
            }
            self.views.remove(&current);
            debug!("unregister field '{}' ({})", field.name, current);
        }
        Ok(())
    }

    /// Detach `id` from its parent's child lists.
    fn unlink(&mut self, id: FieldId) {
        let parent = self.fields[id.index()].as_mut().and_then(|f| f.parent.take());
        if let Some(parent) = parent.and_then(|p| self.fields[p.index()].as_mut()) {
            parent.children.retain(|c| *c != id);
            parent.attached.retain(|c| *c != id);
        }
    }

    /// Register `child` under `parent`.
    ///
    /// The child is first removed from its previous parent. Returns `false`
    /// when the parent intercepted the child for a special role (tab page,
    /// disclosure header); such children get no placeholder.
    pub fn add_child(
        &mut self,
        parent: FieldId,
        child: FieldId,
        doc: &mut dyn Document,
    ) -> FieldResult<bool> {
        let registration = self.pre_register(parent, child, doc)?;
        self.unlink(child);
        let container = self.get_mut(parent)?;
        match registration {
            Registration::Accepted => container.children.push(child),
            Registration::Intercepted => container.attached.push(child),
        }
        self.get_mut(child)?.parent = Some(parent);
        Ok(registration == Registration::Accepted)
    }

    /// Container hook run before a child is registered.
    fn pre_register(
        &mut self,
        parent: FieldId,
        child: FieldId,
        doc: &mut dyn Document,
    ) -> FieldResult<Registration> {
        let parent_kind = self.get(parent)?.kind;
        let candidate = self.get(child)?;
        match parent_kind {
            FieldKind::Tabs if candidate.kind == FieldKind::Panel => {
                let caption = candidate.label(&*self.messages).unwrap_or_default();
                let selected = candidate.attributes.get_bool(ATTR_SELECTED, false);
                self.widget(parent, doc)?;
                let page = self.widget(child, doc)?;
                let caption_node = doc.create_element("span");
                doc.set_attribute(caption_node, "class", "tab");
                doc.set_text_content(caption_node, &caption);
                set_flag(doc, page, "hidden", true);

                let mut index = None;
                if let Some(WidgetParts::Tabs {
                    bar, deck, pages, ..
                }) = self.get_mut(parent)?.parts_mut()
                {
                    doc.append_child(*bar, caption_node)?;
                    doc.append_child(*deck, page)?;
                    pages.push(TabPage {
                        field: child,
                        caption: caption_node,
                        page,
                    });
                    index = Some(pages.len() - 1);
                }
                if let (true, Some(index)) = (selected, index) {
                    self.select_tab(parent, index, doc)?;
                }
                Ok(Registration::Intercepted)
            }
            FieldKind::Disclosure if candidate.tag_uri() == Some(TAG_HEADER) => {
                self.widget(parent, doc)?;
                let has_header = matches!(
                    self.get(parent)?.parts(),
                    Some(WidgetParts::Disclosure {
                        header_field: Some(_),
                        ..
                    })
                );
                if has_header {
                    warn!(
                        "disclosure {} already has a header, {} is ordinary content",
                        parent, child
                    );
                    return Ok(Registration::Accepted);
                }
                let header_root = self.widget(child, doc)?;
                if let Some(WidgetParts::Disclosure {
                    header,
                    header_field,
                    ..
                }) = self.get_mut(parent)?.parts_mut()
                {
                    doc.remove_children(*header);
                    doc.append_child(*header, header_root)?;
                    *header_field = Some(child);
                }
                Ok(Registration::Intercepted)
            }
            _ => Ok(Registration::Accepted),
        }
    }

    // Lookup

    /// Get a field.
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.index()).and_then(Option::as_ref)
    }

    fn get(&self, id: FieldId) -> FieldResult<&Field> {
        self.field(id).ok_or_else(|| FieldError::unknown_field(id))
    }

    fn get_mut(&mut self, id: FieldId) -> FieldResult<&mut Field> {
        self.fields
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or_else(|| FieldError::unknown_field(id))
    }

    /// Fields registered under `name`, in registration order.
    pub fn field_ids(&self, name: &str) -> &[FieldId] {
        self.names.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Registered names, in first-registration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(SmolStr::as_str)
    }

    /// Number of fields registered under `name`.
    pub fn field_count(&self, name: &str) -> usize {
        self.field_ids(name).len()
    }

    /// Iterate over every registered field, grouped by name.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.names
            .values()
            .flatten()
            .filter_map(move |id| self.field(*id))
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.names.values().map(Vec::len).sum()
    }

    /// Check if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Attribute of the first field named `name`.
    pub fn field_attribute(&self, name: &str, uri: &str) -> Option<&str> {
        let id = self.field_ids(name).first()?;
        self.field(*id)?.attribute(uri)
    }

    /// Field whose widget root is `node`.
    pub fn field_by_widget(&self, node: NodeId) -> Option<FieldId> {
        self.iter()
            .find(|field| field.widget() == Some(node))
            .map(Field::id)
    }

    // Widgets

    /// Get the widget root of a field, realizing it on first access.
    ///
    /// Realization builds the widget and copies the pass-through attributes
    /// onto its root exactly once.
    pub fn widget(&mut self, id: FieldId, doc: &mut dyn Document) -> FieldResult<NodeId> {
        let field = self.get(id)?;
        if let Some(root) = field.widget() {
            return Ok(root);
        }
        let label = field.label(&*self.messages);
        let spec = WidgetSpec {
            kind: field.kind,
            name: &field.name,
            label: label.as_deref(),
            default_value: field.default_value(),
            attributes: &field.attributes,
        };
        let parts = WidgetParts::create(&spec, doc)?;
        let root = parts.root();
        for (name, value) in field.attributes.widget_attributes() {
            doc.set_attribute(root, name, value);
        }
        trace!("realized {} as {}", id, root);
        self.get_mut(id)?.widget = Widget::Realized(parts);
        Ok(root)
    }

    /// Widget of the first field named `name`.
    pub fn field_widget(&mut self, name: &str, doc: &mut dyn Document) -> FieldResult<Option<NodeId>> {
        match self.field_ids(name).first().copied() {
            Some(id) => self.widget(id, doc).map(Some),
            None => Ok(None),
        }
    }

    /// Widgets of every field named `name`.
    pub fn field_widgets(&mut self, name: &str, doc: &mut dyn Document) -> FieldResult<Vec<NodeId>> {
        let ids = self.field_ids(name).to_vec();
        ids.into_iter().map(|id| self.widget(id, doc)).collect()
    }

    /// Install a nested template panel as the content of a container.
    ///
    /// Returns `false` when the field cannot take a panel.
    pub fn set_template_panel(
        &mut self,
        id: FieldId,
        panel: NodeId,
        doc: &mut dyn Document,
    ) -> FieldResult<bool> {
        if !self.get(id)?.kind.accepts_panel() {
            return Ok(false);
        }
        self.widget(id, doc)?;
        let slot = self.get(id)?.parts().and_then(WidgetParts::content_slot);
        match slot {
            Some(slot) => {
                doc.append_child(slot, panel)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Render another panel inside a view field.
    pub fn set_view_panel(
        &mut self,
        id: FieldId,
        panel: TopPanel,
        doc: &mut dyn Document,
    ) -> FieldResult<()> {
        let root = self.widget(id, doc)?;
        doc.append_child(root, panel.root())?;
        self.views.insert(id, panel);
        Ok(())
    }

    /// Panel rendered by a view field.
    pub fn view_panel(&self, id: FieldId) -> Option<&TopPanel> {
        self.views.get(&id)
    }

    /// Mutable panel rendered by a view field.
    pub fn view_panel_mut(&mut self, id: FieldId) -> Option<&mut TopPanel> {
        self.views.get_mut(&id)
    }

    /// Select a tab of a tab container.
    pub fn select_tab(
        &mut self,
        id: FieldId,
        index: usize,
        doc: &mut dyn Document,
    ) -> FieldResult<bool> {
        self.widget(id, doc)?;
        let Some(WidgetParts::Tabs {
            pages, selected, ..
        }) = self.get_mut(id)?.parts_mut()
        else {
            return Ok(false);
        };
        if index >= pages.len() {
            return Ok(false);
        }
        for (i, tab) in pages.iter().enumerate() {
            let class = if i == index { "tab tab-selected" } else { "tab" };
            doc.set_attribute(tab.caption, "class", class);
            set_flag(doc, tab.page, "hidden", i != index);
        }
        *selected = Some(index);
        Ok(true)
    }

    /// Open or close a disclosure.
    pub fn set_open(&mut self, id: FieldId, open: bool, doc: &mut dyn Document) -> FieldResult<bool> {
        if self.get(id)?.kind != FieldKind::Disclosure {
            return Ok(false);
        }
        let root = self.widget(id, doc)?;
        set_flag(doc, root, "open", open);
        Ok(true)
    }

    // Values

    /// Value of a field.
    pub fn value(&mut self, id: FieldId, doc: &mut dyn Document) -> FieldResult<Option<String>> {
        if !self.get(id)?.kind.has_value() {
            return Ok(None);
        }
        self.widget(id, doc)?;
        Ok(self.get(id)?.parts().and_then(|p| p.value(&*doc)))
    }

    /// Values of a field: its value as a one-element list when present.
    pub fn values(&mut self, id: FieldId, doc: &mut dyn Document) -> FieldResult<Vec<String>> {
        Ok(self.value(id, doc)?.into_iter().collect())
    }

    /// Store a value; returns whether the field accepted it.
    pub fn set_value(
        &mut self,
        id: FieldId,
        value: Option<&str>,
        doc: &mut dyn Document,
    ) -> FieldResult<bool> {
        let field = self.get(id)?;
        if !field.kind.has_value() && field.kind != FieldKind::Disclosure {
            return Ok(false);
        }
        let label = field.label(&*self.messages);
        self.widget(id, doc)?;
        match self.get_mut(id)?.parts_mut() {
            Some(parts) => Ok(parts.set_value(value, label.as_deref(), doc)?),
            None => Ok(false),
        }
    }

    /// Consume the head of `values` and return the rest.
    ///
    /// An empty list stores `None`.
    pub fn set_values(
        &mut self,
        id: FieldId,
        mut values: Vec<String>,
        doc: &mut dyn Document,
    ) -> FieldResult<Vec<String>> {
        let head = if values.is_empty() {
            None
        } else {
            Some(values.remove(0))
        };
        self.set_value(id, head.as_deref(), doc)?;
        Ok(values)
    }

    /// Reset the value of a field.
    pub fn clear_value(&mut self, id: FieldId, doc: &mut dyn Document) -> FieldResult<()> {
        let field = self.get(id)?;
        if !field.kind.has_value() {
            return Ok(());
        }
        let default = field.default_value().map(str::to_string);
        self.widget(id, doc)?;
        if let Some(parts) = self.get_mut(id)?.parts_mut() {
            parts.clear(default.as_deref(), doc);
        }
        Ok(())
    }

    /// First non-null value among the fields named `name`.
    pub fn field_value(&mut self, name: &str, doc: &mut dyn Document) -> FieldResult<Option<String>> {
        for id in self.field_ids(name).to_vec() {
            if let Some(value) = self.value(id, doc)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Values of every field named `name`, flattened.
    pub fn field_values(&mut self, name: &str, doc: &mut dyn Document) -> FieldResult<Vec<String>> {
        let mut out = Vec::new();
        for id in self.field_ids(name).to_vec() {
            out.extend(self.values(id, doc)?);
        }
        Ok(out)
    }

    /// Offer a value to the fields named `name` until one accepts it.
    pub fn set_field_value(
        &mut self,
        name: &str,
        value: Option<&str>,
        doc: &mut dyn Document,
    ) -> FieldResult<bool> {
        for id in self.field_ids(name).to_vec() {
            if self.set_value(id, value, doc)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Thread `values` through every field named `name`, returning what is
    /// left.
    pub fn set_field_values(
        &mut self,
        name: &str,
        mut values: Vec<String>,
        doc: &mut dyn Document,
    ) -> FieldResult<Vec<String>> {
        for id in self.field_ids(name).to_vec() {
            values = self.set_values(id, values, doc)?;
        }
        Ok(values)
    }

    /// Reset every field.
    pub fn clear(&mut self, doc: &mut dyn Document) -> FieldResult<()> {
        for id in self.registered() {
            self.clear_value(id, doc)?;
        }
        Ok(())
    }

    /// Reset the fields named `name`, with their descendants if `children`.
    pub fn clear_field(
        &mut self,
        name: &str,
        children: bool,
        doc: &mut dyn Document,
    ) -> FieldResult<()> {
        for id in self.field_ids(name).to_vec() {
            if children {
                for current in self.subtree(id)? {
                    self.clear_value(current, doc)?;
                }
            } else {
                self.clear_value(id, doc)?;
            }
        }
        Ok(())
    }

    /// `id` and its descendants in depth-first order.
    fn subtree(&self, id: FieldId) -> FieldResult<Vec<FieldId>> {
        let mut out = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let field = self.get(current)?;
            out.push(current);
            let contents: Vec<FieldId> = field.contents().collect();
            pending.extend(contents.into_iter().rev());
        }
        Ok(out)
    }

    fn registered(&self) -> Vec<FieldId> {
        self.names.values().flatten().copied().collect()
    }

    // State

    /// Enable or disable every field.
    pub fn set_enabled(&mut self, enabled: bool, doc: &mut dyn Document) -> FieldResult<()> {
        for id in self.registered() {
            self.set_field_tree_enabled(id, enabled, doc)?;
        }
        Ok(())
    }

    /// Enable or disable the fields named `name`.
    pub fn set_field_enabled(
        &mut self,
        name: &str,
        enabled: bool,
        doc: &mut dyn Document,
    ) -> FieldResult<()> {
        for id in self.field_ids(name).to_vec() {
            self.set_field_tree_enabled(id, enabled, doc)?;
        }
        Ok(())
    }

    /// Form controls toggle themselves; other fields recurse into children.
    fn set_field_tree_enabled(
        &mut self,
        id: FieldId,
        enabled: bool,
        doc: &mut dyn Document,
    ) -> FieldResult<()> {
        let field = self.get(id)?;
        if field.kind.toggles_enabled() {
            self.widget(id, doc)?;
            if let Some(parts) = self.get(id)?.parts() {
                parts.set_enabled(enabled, doc);
            }
            return Ok(());
        }
        let contents: Vec<FieldId> = field.contents().collect();
        for child in contents {
            self.set_field_tree_enabled(child, enabled, doc)?;
        }
        Ok(())
    }

    /// Show or hide the fields named `name`; `false` when there are none.
    pub fn set_field_visible(
        &mut self,
        name: &str,
        visible: bool,
        doc: &mut dyn Document,
    ) -> FieldResult<bool> {
        let ids = self.field_ids(name).to_vec();
        for id in &ids {
            let root = self.widget(*id, doc)?;
            set_flag(doc, root, "hidden", !visible);
        }
        Ok(!ids.is_empty())
    }

    // Buttons

    /// Register a listener for submit buttons.
    pub fn add_submit_listener(&mut self, listener: impl FnMut(FieldId) + 'static) {
        self.submit_listeners.push(Box::new(listener));
    }

    /// Register a listener for cancel buttons.
    pub fn add_cancel_listener(&mut self, listener: impl FnMut(FieldId) + 'static) {
        self.cancel_listeners.push(Box::new(listener));
    }

    /// Register a listener for the buttons named `name`.
    pub fn add_click_listener(&mut self, name: &str, listener: impl FnMut(FieldId) + 'static) {
        self.click_listeners
            .entry(SmolStr::new(name))
            .or_default()
            .push(Box::new(listener));
    }

    /// Press a button.
    ///
    /// Click listeners of the button name run first. Then clear buttons
    /// clear the field named by `for` (with descendants unless
    /// `children="false"`) or the whole panel, submit and cancel buttons
    /// notify their listeners. Returns `false` for fields that are not
    /// buttons.
    pub fn activate(&mut self, id: FieldId, doc: &mut dyn Document) -> FieldResult<bool> {
        let field = self.get(id)?;
        if !field.kind.is_button() {
            return Ok(false);
        }
        let kind = field.kind;
        let name = field.name.clone();
        let target = field.attribute(ATTR_FOR).map(str::to_string);
        let children = field.attributes.get_bool(ATTR_CHILDREN, true);
        if let Some(listeners) = self.click_listeners.get_mut(name.as_str()) {
            for listener in listeners.iter_mut() {
                listener(id);
            }
        }
        debug!("activate {} button {}", kind, id);
        match kind {
            FieldKind::Clear => match target {
                Some(name) => self.clear_field(&name, children, doc)?,
                None => self.clear(doc)?,
            },
            FieldKind::Submit => self.submit_listeners.iter_mut().for_each(|l| l(id)),
            FieldKind::Cancel => self.cancel_listeners.iter_mut().for_each(|l| l(id)),
            _ => {}
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::NoMessages;
    use crate::namespaces::{ATTR_CHECKED, ATTR_LABEL, ATTR_VALUE, TAG_URI};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use template_dom::MemoryDocument;

    fn panel(doc: &mut MemoryDocument) -> TopPanel {
        TopPanel::new(doc, Rc::new(Counters::new()), Rc::new(NoMessages))
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_generated_names_increase() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let a = panel.create_field(FieldKind::TextInput, Attributes::new());
        let b = panel.create_field(FieldKind::Label, Attributes::new());
        let c = panel.create_field(FieldKind::Submit, Attributes::new());
        assert_eq!(panel.field(a).unwrap().name(), "field0");
        assert_eq!(panel.field(b).unwrap().name(), "field1");
        assert_eq!(panel.field(c).unwrap().name(), "Button-0");
    }

    #[test]
    fn test_checkbox_value() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let id = panel.create_field(
            FieldKind::Checkbox,
            attrs(&[(ATTR_NAME, "agree"), (ATTR_VALUE, "yes")]),
        );
        assert_eq!(panel.value(id, &mut doc).unwrap(), None);
        assert!(!panel.set_value(id, Some("no"), &mut doc).unwrap());
        assert_eq!(panel.value(id, &mut doc).unwrap(), None);
        assert!(panel.set_value(id, Some("yes"), &mut doc).unwrap());
        assert_eq!(panel.value(id, &mut doc).unwrap().as_deref(), Some("yes"));
        assert_eq!(panel.field_values("agree", &mut doc).unwrap(), vec!["yes"]);
    }

    #[test]
    fn test_checkbox_clear_restores_default() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let id = panel.create_field(
            FieldKind::Checkbox,
            attrs(&[(ATTR_LABEL, "Remember"), (ATTR_CHECKED, "true")]),
        );
        assert_eq!(panel.value(id, &mut doc).unwrap().as_deref(), Some("Remember"));
        panel.clear(&mut doc).unwrap();
        assert_eq!(panel.value(id, &mut doc).unwrap().as_deref(), Some("Remember"));
    }

    #[test]
    fn test_widget_is_realized_once() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let id = panel.create_field(
            FieldKind::TextInput,
            attrs(&[(ATTR_NAME, "x"), (ATTR_VALUE, "v"), ("class", "wide")]),
        );
        assert!(!panel.field(id).unwrap().is_realized());
        let first = panel.widget(id, &mut doc).unwrap();
        let second = panel.widget(id, &mut doc).unwrap();
        assert_eq!(first, second);
        insta::assert_snapshot!(doc.outer_html(first), @r#"<input type="text" name="x" value="v" class="wide"></input>"#);
        assert_eq!(panel.field_by_widget(first), Some(id));
    }

    #[test]
    fn test_text_values_thread_remainder() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        panel.create_field(FieldKind::TextInput, attrs(&[(ATTR_NAME, "t")]));
        panel.create_field(FieldKind::TextArea, attrs(&[(ATTR_NAME, "t")]));
        let rest = panel
            .set_field_values("t", vec!["a".into(), "b".into(), "c".into()], &mut doc)
            .unwrap();
        assert_eq!(rest, vec!["c"]);
        assert_eq!(panel.field_values("t", &mut doc).unwrap(), vec!["a", "b"]);
        assert_eq!(panel.field_value("t", &mut doc).unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_set_field_value_stops_at_first_acceptor() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let label = panel.create_field(FieldKind::Label, attrs(&[(ATTR_NAME, "n")]));
        let input = panel.create_field(FieldKind::TextInput, attrs(&[(ATTR_NAME, "n")]));
        let other = panel.create_field(FieldKind::TextInput, attrs(&[(ATTR_NAME, "n")]));
        assert!(panel.set_field_value("n", Some("v"), &mut doc).unwrap());
        assert_eq!(panel.value(label, &mut doc).unwrap(), None);
        assert_eq!(panel.value(input, &mut doc).unwrap().as_deref(), Some("v"));
        assert_eq!(panel.value(other, &mut doc).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_reparenting_moves_child() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let a = panel.create_field(FieldKind::Panel, Attributes::new());
        let b = panel.create_field(FieldKind::Panel, Attributes::new());
        let child = panel.create_field(FieldKind::Label, Attributes::new());
        assert!(panel.add_child(a, child, &mut doc).unwrap());
        assert!(panel.add_child(b, child, &mut doc).unwrap());
        assert!(panel.field(a).unwrap().children().is_empty());
        assert_eq!(panel.field(b).unwrap().children(), &[child]);
        assert_eq!(panel.field(child).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_tabs_intercept_panels() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let tabs = panel.create_field(FieldKind::Tabs, Attributes::new());
        let first = panel.create_field(FieldKind::Panel, attrs(&[(ATTR_LABEL, "One")]));
        let second = panel.create_field(
            FieldKind::Panel,
            attrs(&[(ATTR_LABEL, "Two"), (ATTR_SELECTED, "true")]),
        );
        let label = panel.create_field(FieldKind::Label, Attributes::new());
        assert!(!panel.add_child(tabs, first, &mut doc).unwrap());
        assert!(!panel.add_child(tabs, second, &mut doc).unwrap());
        assert!(panel.add_child(tabs, label, &mut doc).unwrap());

        let field = panel.field(tabs).unwrap();
        assert_eq!(field.children(), &[label]);
        assert_eq!(field.attached(), &[first, second]);
        let root = field.widget().unwrap();
        insta::assert_snapshot!(doc.outer_html(root), @r#"<div><div class="tab-bar"><span class="tab">One</span><span class="tab tab-selected">Two</span></div><div class="tab-deck"><div hidden="hidden"></div><div></div></div></div>"#);
    }

    #[test]
    fn test_disclosure_takes_first_header_only() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let disclosure = panel.create_field(
            FieldKind::Disclosure,
            attrs(&[(ATTR_LABEL, "More"), (crate::namespaces::ATTR_OPEN, "true")]),
        );
        let header_tag = [(TAG_URI, TAG_HEADER)];
        let first = panel.create_field(FieldKind::Header, attrs(&header_tag));
        let second = panel.create_field(FieldKind::Header, attrs(&header_tag));

        let root = panel.widget(disclosure, &mut doc).unwrap();
        assert_eq!(
            doc.outer_html(root),
            r#"<details open="open"><summary><span>More</span></summary><div></div></details>"#
        );

        assert!(!panel.add_child(disclosure, first, &mut doc).unwrap());
        assert!(panel.add_child(disclosure, second, &mut doc).unwrap());
        assert_eq!(
            doc.outer_html(root),
            r#"<details open="open"><summary><div><div></div></div></summary><div></div></details>"#
        );
        assert_eq!(panel.field(disclosure).unwrap().children(), &[second]);

        assert!(panel.set_value(disclosure, None, &mut doc).unwrap());
        assert_eq!(doc.inner_html(doc.first_child(root).unwrap()), "<span>More</span>");
    }

    #[test]
    fn test_clear_button() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let group = panel.create_field(FieldKind::Panel, attrs(&[(ATTR_NAME, "group")]));
        let input = panel.create_field(FieldKind::TextInput, attrs(&[(ATTR_VALUE, "d")]));
        panel.add_child(group, input, &mut doc).unwrap();
        let outside = panel.create_field(FieldKind::TextArea, Attributes::new());
        let clear = panel.create_field(FieldKind::Clear, attrs(&[(ATTR_FOR, "group")]));

        panel.set_value(input, Some("typed"), &mut doc).unwrap();
        panel.set_value(outside, Some("kept"), &mut doc).unwrap();
        assert!(panel.activate(clear, &mut doc).unwrap());
        assert_eq!(panel.value(input, &mut doc).unwrap().as_deref(), Some("d"));
        assert_eq!(panel.value(outside, &mut doc).unwrap().as_deref(), Some("kept"));
        assert!(!panel.activate(input, &mut doc).unwrap());
    }

    #[test]
    fn test_submit_and_click_listeners() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let submit = panel.create_field(FieldKind::Submit, attrs(&[(ATTR_NAME, "ok")]));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        panel.add_click_listener("ok", move |id| log.borrow_mut().push(("click", id)));
        let log = seen.clone();
        panel.add_submit_listener(move |id| log.borrow_mut().push(("submit", id)));
        let log = seen.clone();
        panel.add_cancel_listener(move |id| log.borrow_mut().push(("cancel", id)));

        panel.activate(submit, &mut doc).unwrap();
        assert_eq!(*seen.borrow(), vec![("click", submit), ("submit", submit)]);
    }

    #[test]
    fn test_select_tab_switches_pages() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let tabs = panel.create_field(FieldKind::Tabs, Attributes::new());
        let pages: Vec<_> = ["One", "Two"]
            .into_iter()
            .map(|label| panel.create_field(FieldKind::Panel, attrs(&[(ATTR_LABEL, label)])))
            .collect();
        for page in &pages {
            panel.add_child(tabs, *page, &mut doc).unwrap();
        }
        let root = panel.widget(tabs, &mut doc).unwrap();

        assert!(panel.select_tab(tabs, 1, &mut doc).unwrap());
        insta::assert_snapshot!(doc.outer_html(root), @r#"<div><div class="tab-bar"><span class="tab">One</span><span class="tab tab-selected">Two</span></div><div class="tab-deck"><div hidden="hidden"></div><div></div></div></div>"#);
        assert!(panel.select_tab(tabs, 0, &mut doc).unwrap());
        insta::assert_snapshot!(doc.outer_html(root), @r#"<div><div class="tab-bar"><span class="tab tab-selected">One</span><span class="tab">Two</span></div><div class="tab-deck"><div></div><div hidden="hidden"></div></div></div>"#);

        assert!(!panel.select_tab(tabs, 2, &mut doc).unwrap());
        assert!(!panel.select_tab(pages[0], 0, &mut doc).unwrap());
    }

    #[test]
    fn test_clear_button_without_children() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let group = panel.create_field(FieldKind::Panel, attrs(&[(ATTR_NAME, "group")]));
        let nested = panel.create_field(FieldKind::TextInput, attrs(&[(ATTR_NAME, "nested")]));
        panel.add_child(group, nested, &mut doc).unwrap();
        let note = panel.create_field(FieldKind::TextArea, attrs(&[(ATTR_NAME, "group")]));
        let clear = panel.create_field(
            FieldKind::Clear,
            attrs(&[(ATTR_FOR, "group"), (ATTR_CHILDREN, "false")]),
        );

        panel.set_value(nested, Some("typed"), &mut doc).unwrap();
        panel.set_value(note, Some("note"), &mut doc).unwrap();
        assert!(panel.activate(clear, &mut doc).unwrap());
        assert_eq!(panel.value(nested, &mut doc).unwrap().as_deref(), Some("typed"));
        assert_eq!(panel.value(note, &mut doc).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_cancel_listener() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let cancel = panel.create_field(FieldKind::Cancel, Attributes::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        panel.add_submit_listener(move |id| log.borrow_mut().push(("submit", id)));
        let log = seen.clone();
        panel.add_cancel_listener(move |id| log.borrow_mut().push(("cancel", id)));

        assert!(panel.activate(cancel, &mut doc).unwrap());
        assert!(panel.activate(cancel, &mut doc).unwrap());
        assert_eq!(*seen.borrow(), vec![("cancel", cancel), ("cancel", cancel)]);
    }

    #[test]
    fn test_field_attribute() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        panel.create_field(
            FieldKind::TextInput,
            attrs(&[(ATTR_NAME, "email"), ("placeholder", "you@example.org")]),
        );
        panel.create_field(
            FieldKind::TextInput,
            attrs(&[(ATTR_NAME, "email"), ("placeholder", "second")]),
        );
        assert_eq!(
            panel.field_attribute("email", "placeholder"),
            Some("you@example.org")
        );
        assert_eq!(panel.field_attribute("email", ATTR_NAME), Some("email"));
        assert_eq!(panel.field_attribute("email", "size"), None);
        assert_eq!(panel.field_attribute("missing", "placeholder"), None);
    }

    #[test]
    fn test_enabled_and_visible() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let group = panel.create_field(FieldKind::Panel, attrs(&[(ATTR_NAME, "g")]));
        let check = panel.create_field(FieldKind::Checkbox, Attributes::new());
        panel.add_child(group, check, &mut doc).unwrap();

        panel.set_field_enabled("g", false, &mut doc).unwrap();
        let parts = panel.field(check).unwrap().parts().cloned();
        let Some(WidgetParts::Check { input, .. }) = parts else {
            panic!("checkbox not realized");
        };
        assert_eq!(doc.attribute(input, "disabled"), Some("disabled"));
        panel.set_enabled(true, &mut doc).unwrap();
        assert_eq!(doc.attribute(input, "disabled"), None);

        assert!(panel.set_field_visible("g", false, &mut doc).unwrap());
        assert!(!panel.set_field_visible("missing", false, &mut doc).unwrap());
    }

    #[test]
    fn test_remove_field_unregisters_subtree() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let group = panel.create_field(FieldKind::Panel, attrs(&[(ATTR_NAME, "g")]));
        let child = panel.create_field(FieldKind::Label, attrs(&[(ATTR_NAME, "c")]));
        panel.add_child(group, child, &mut doc).unwrap();
        let root = panel.widget(group, &mut doc).unwrap();
        let parent = panel.root();
        doc.append_child(parent, root).unwrap();

        panel.remove_field(group, &mut doc).unwrap();
        assert_eq!(panel.field_count("g"), 0);
        assert_eq!(panel.field_count("c"), 0);
        assert!(panel.is_empty());
        assert_eq!(doc.first_child(parent), None);
        assert!(panel.remove_field(group, &mut doc).is_err());
    }
}
