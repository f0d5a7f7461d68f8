//! Widget construction and values.
//!
//! A realized widget is a small DOM subtree. [`WidgetParts`] remembers the
//! nodes a field needs afterwards; the value itself always lives in the
//! document (attributes, text or markup).

use crate::attributes::Attributes;
use crate::field::FieldId;
use crate::kind::FieldKind;
use crate::namespaces::{ATTR_CHECKED, ATTR_INLINE, ATTR_OPEN, ATTR_SWITCH, ATTR_TOKEN};
use log::warn;
use template_dom::{Document, DomResult, NodeId};

/// Everything needed to build a widget.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WidgetSpec<'a> {
    pub kind: FieldKind,
    pub name: &'a str,
    pub label: Option<&'a str>,
    pub default_value: Option<&'a str>,
    pub attributes: &'a Attributes,
}

/// A tab of a tab container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPage {
    /// The panel field shown by the tab.
    pub field: FieldId,
    /// Caption element in the tab bar.
    pub caption: NodeId,
    /// Root element of the panel.
    pub page: NodeId,
}

/// The nodes of a realized widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetParts {
    /// Element showing text or inert markup.
    Plain { root: NodeId },
    /// Element whose content is the value, as markup.
    Markup { root: NodeId },
    /// `<input>` whose `value` attribute is the value.
    Input { root: NodeId },
    /// `<textarea>` whose text is the value.
    TextArea { root: NodeId },
    /// `<button>`.
    Button { root: NodeId },
    /// Checkbox or radio button.
    Check {
        root: NodeId,
        input: NodeId,
        value: Option<String>,
        default_checked: bool,
    },
    /// Hidden input mirrored by a markup view.
    ReadOnly {
        root: NodeId,
        hidden: NodeId,
        view: NodeId,
    },
    /// Element taking a nested panel in `content`.
    Container { root: NodeId, content: NodeId },
    /// `<details>` with a header slot and a content slot.
    Disclosure {
        root: NodeId,
        header: NodeId,
        content: NodeId,
        header_field: Option<FieldId>,
    },
    /// Tab bar and deck of pages.
    Tabs {
        root: NodeId,
        bar: NodeId,
        deck: NodeId,
        pages: Vec<TabPage>,
        selected: Option<usize>,
    },
}

impl WidgetParts {
    /// Root element of the widget.
    pub fn root(&self) -> NodeId {
        match self {
            Self::Plain { root }
            | Self::Markup { root }
            | Self::Input { root }
            | Self::TextArea { root }
            | Self::Button { root }
            | Self::Check { root, .. }
            | Self::ReadOnly { root, .. }
            | Self::Container { root, .. }
            | Self::Disclosure { root, .. }
            | Self::Tabs { root, .. } => *root,
        }
    }

    /// Build the widget of `spec.kind`.
    pub(crate) fn create(spec: &WidgetSpec<'_>, doc: &mut dyn Document) -> DomResult<Self> {
        let label = spec.label.unwrap_or_default();
        let parts = match spec.kind {
            FieldKind::Html => Self::Markup {
                root: doc.create_element("div"),
            },
            FieldKind::InlineHtml => Self::Markup {
                root: doc.create_element("span"),
            },
            FieldKind::TextInput | FieldKind::Password | FieldKind::Hidden => {
                let kind = match spec.kind {
                    FieldKind::Password => "password",
                    FieldKind::Hidden => "hidden",
                    _ => "text",
                };
                let root = input(doc, kind, spec.name);
                if let Some(value) = spec.default_value {
                    doc.set_attribute(root, "value", value);
                }
                Self::Input { root }
            }
            FieldKind::FileUpload => Self::Plain {
                root: input(doc, "file", spec.name),
            },
            FieldKind::TextArea => {
                let root = doc.create_element("textarea");
                doc.set_attribute(root, "name", spec.name);
                doc.set_text_content(root, spec.default_value.unwrap_or_default());
                Self::TextArea { root }
            }
            FieldKind::Checkbox | FieldKind::Radio => {
                let kind = if spec.kind == FieldKind::Radio {
                    "radio"
                } else {
                    "checkbox"
                };
                let root = doc.create_element("span");
                let input = input(doc, kind, spec.name);
                let caption = doc.create_element("label");
                set_markup(doc, caption, label);
                doc.append_child(root, input)?;
                doc.append_child(root, caption)?;
                let default_checked = spec.attributes.get_bool(ATTR_CHECKED, false);
                set_flag(doc, input, "checked", default_checked);
                Self::Check {
                    root,
                    input,
                    value: spec.default_value.or(spec.label).map(str::to_string),
                    default_checked,
                }
            }
            FieldKind::ReadOnly => {
                let root = doc.create_element("div");
                let hidden = input(doc, "hidden", spec.name);
                let view = doc.create_element("div");
                doc.append_child(root, hidden)?;
                doc.append_child(root, view)?;
                Self::ReadOnly { root, hidden, view }
            }
            FieldKind::Button | FieldKind::Submit | FieldKind::Clear | FieldKind::Cancel => {
                let root = doc.create_element("button");
                doc.set_text_content(root, spec.label.or(spec.default_value).unwrap_or_default());
                Self::Button { root }
            }
            FieldKind::Panel | FieldKind::View => {
                let root = doc.create_element("div");
                Self::Container { root, content: root }
            }
            FieldKind::InlinePanel => {
                let root = doc.create_element("span");
                Self::Container { root, content: root }
            }
            FieldKind::Header => {
                let root = doc.create_element("div");
                if let Some(style) = spec.attributes.get(ATTR_SWITCH) {
                    doc.set_attribute(root, "class", style);
                }
                let content = doc.create_element("div");
                doc.append_child(root, content)?;
                Self::Container { root, content }
            }
            FieldKind::Disclosure => {
                let root = doc.create_element("details");
                let header = doc.create_element("summary");
                let content = doc.create_element("div");
                doc.append_child(root, header)?;
                doc.append_child(root, content)?;
                set_flag(doc, root, "open", spec.attributes.get_bool(ATTR_OPEN, false));
                let caption = doc.create_element("span");
                doc.set_text_content(caption, label);
                doc.append_child(header, caption)?;
                Self::Disclosure {
                    root,
                    header,
                    content,
                    header_field: None,
                }
            }
            FieldKind::Tabs => {
                let root = doc.create_element("div");
                let bar = doc.create_element("div");
                let deck = doc.create_element("div");
                doc.set_attribute(bar, "class", "tab-bar");
                doc.set_attribute(deck, "class", "tab-deck");
                doc.append_child(root, bar)?;
                doc.append_child(root, deck)?;
                Self::Tabs {
                    root,
                    bar,
                    deck,
                    pages: Vec::new(),
                    selected: None,
                }
            }
            FieldKind::BlockLabel | FieldKind::Label => {
                let tag = if spec.kind == FieldKind::BlockLabel {
                    "div"
                } else {
                    "span"
                };
                let root = doc.create_element(tag);
                doc.set_text_content(root, label);
                Self::Plain { root }
            }
            FieldKind::HtmlLabel => {
                let root = doc.create_element("span");
                set_markup(doc, root, label);
                Self::Plain { root }
            }
            FieldKind::Link => {
                let link = doc.create_element("a");
                let token = spec.attributes.get(ATTR_TOKEN).unwrap_or_default();
                doc.set_attribute(link, "href", &format!("#{}", token));
                doc.set_text_content(link, label);
                let root = if spec.attributes.get_bool(ATTR_INLINE, true) {
                    link
                } else {
                    let block = doc.create_element("div");
                    doc.append_child(block, link)?;
                    block
                };
                Self::Plain { root }
            }
        };
        Ok(parts)
    }

    /// Current value.
    pub(crate) fn value(&self, doc: &dyn Document) -> Option<String> {
        match self {
            Self::Markup { root } => Some(doc.inner_html(*root)),
            Self::Input { root } => Some(doc.attribute(*root, "value").unwrap_or_default().to_string()),
            Self::TextArea { root } => Some(doc.text_content(*root)),
            Self::Check { input, value, .. } => {
                if doc.attribute(*input, "checked").is_some() {
                    value.clone()
                } else {
                    None
                }
            }
            Self::ReadOnly { hidden, .. } => {
                Some(doc.attribute(*hidden, "value").unwrap_or_default().to_string())
            }
            _ => None,
        }
    }

    /// Store a value, returning whether it was accepted.
    ///
    /// `label` is the header shown by a disclosure when `value` is `None`.
    pub(crate) fn set_value(
        &mut self,
        value: Option<&str>,
        label: Option<&str>,
        doc: &mut dyn Document,
    ) -> DomResult<bool> {
        let text = value.unwrap_or_default();
        match self {
            Self::Markup { root } => set_markup(doc, *root, text),
            Self::Input { root } => doc.set_attribute(*root, "value", text),
            Self::TextArea { root } => doc.set_text_content(*root, text),
            Self::Check {
                input,
                value: checked_value,
                ..
            } => {
                if checked_value.as_deref() != value {
                    return Ok(false);
                }
                set_flag(doc, *input, "checked", true);
            }
            Self::ReadOnly { hidden, view, .. } => {
                doc.set_attribute(*hidden, "value", text);
                set_markup(doc, *view, text);
            }
            Self::Disclosure { header, .. } => {
                let caption = doc.create_element("span");
                set_markup(doc, caption, value.or(label).unwrap_or_default());
                doc.remove_children(*header);
                doc.append_child(*header, caption)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Reset the value to its initial state.
    pub(crate) fn clear(&mut self, default_value: Option<&str>, doc: &mut dyn Document) {
        match self {
            Self::Markup { root } => doc.remove_children(*root),
            Self::Input { root } => {
                doc.set_attribute(*root, "value", default_value.unwrap_or_default())
            }
            Self::TextArea { root } => {
                doc.set_text_content(*root, default_value.unwrap_or_default())
            }
            Self::Check {
                input,
                default_checked,
                ..
            } => set_flag(doc, *input, "checked", *default_checked),
            Self::ReadOnly { hidden, view, .. } => {
                doc.set_attribute(*hidden, "value", "");
                doc.remove_children(*view);
            }
            _ => {}
        }
    }

    /// Toggle the `disabled` state of a form control.
    pub(crate) fn set_enabled(&self, enabled: bool, doc: &mut dyn Document) {
        let target = match self {
            Self::Check { input, .. } => *input,
            other => other.root(),
        };
        set_flag(doc, target, "disabled", !enabled);
    }

    /// Element receiving a nested template panel.
    pub(crate) fn content_slot(&self) -> Option<NodeId> {
        match self {
            Self::Container { content, .. } | Self::Disclosure { content, .. } => Some(*content),
            _ => None,
        }
    }
}

fn input(doc: &mut dyn Document, kind: &str, name: &str) -> NodeId {
    let node = doc.create_element("input");
    doc.set_attribute(node, "type", kind);
    doc.set_attribute(node, "name", name);
    node
}

/// Set or remove a boolean HTML attribute.
pub(crate) fn set_flag(doc: &mut dyn Document, node: NodeId, name: &str, on: bool) {
    if on {
        doc.set_attribute(node, name, name);
    } else {
        doc.remove_attribute(node, name);
    }
}

/// Replace the content of `node` with markup, as text when it does not parse.
pub(crate) fn set_markup(doc: &mut dyn Document, node: NodeId, html: &str) {
    if let Err(err) = doc.set_inner_html(node, html) {
        warn!("showing markup as text: {}", err);
        doc.set_text_content(node, html);
    }
}
