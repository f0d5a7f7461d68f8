//! Placeholder stack driving panel instantiation.
//!
//! The generator receives a replay of a template cache as a balanced
//! sequence of [`begin_field`](TemplatePanelGenerator::begin_field),
//! [`add_text`](TemplatePanelGenerator::add_text) and
//! [`end_field`](TemplatePanelGenerator::end_field) calls. Every open field
//! owns a frame:
//!
//! - a *template* frame (containers, and the template root) merges the
//!   markup of its content with `<span id='…'></span>` markers standing for
//!   child fields, and splices the widgets in when it closes;
//! - an *inert* frame (self-rendering widgets) drops markup and only
//!   registers child fields;
//! - a *passthrough* frame (a factory that declined to create a field)
//!   forwards everything to the enclosing frame.

use crate::error::{PanelError, PanelResult};
use crate::splice::splice;
use indexmap::IndexMap;
use log::trace;
use smol_str::SmolStr;
use template_dom::Document;
use template_fields::{Attributes, FieldFactory, FieldId, TopPanel};

/// Builds the content of a [`TopPanel`] from begin/text/end events.
pub struct TemplatePanelGenerator<'a> {
    panel: &'a mut TopPanel,
    doc: &'a mut dyn Document,
    stack: Vec<Frame>,
    finished_root: bool,
}

#[derive(Debug)]
struct Frame {
    field: Option<FieldId>,
    kind: FrameKind,
}

#[derive(Debug)]
enum FrameKind {
    Template {
        buffer: String,
        placeholders: IndexMap<SmolStr, FieldId>,
    },
    Inert,
    Passthrough,
}

impl<'a> TemplatePanelGenerator<'a> {
    pub fn new(panel: &'a mut TopPanel, doc: &'a mut dyn Document) -> Self {
        Self {
            panel,
            doc,
            stack: Vec::new(),
            finished_root: false,
        }
    }

    /// Open a field.
    ///
    /// The first call opens the template root; `factory` is then usually
    /// `None`. Later calls create the field, register it with the enclosing
    /// frame and push its frame.
    pub fn begin_field(
        &mut self,
        factory: Option<&dyn FieldFactory>,
        attributes: Attributes,
    ) -> PanelResult<()> {
        if self.stack.is_empty() && self.finished_root {
            return Err(PanelError::unbalanced(
                "begin_field called after the template root was closed",
            ));
        }
        let field = factory.and_then(|factory| factory.new_field(self.panel, attributes));
        let id = SmolStr::from(self.panel.counters().next_placeholder_id());
        let root = self.stack.is_empty();

        let kind = match field {
            Some(field) if !self.accepts_panel(field) => FrameKind::Inert,
            None if !root => FrameKind::Passthrough,
            _ => FrameKind::Template {
                buffer: String::new(),
                placeholders: IndexMap::new(),
            },
        };
        if let Some(field) = field {
            self.register(id.clone(), field)?;
        }
        trace!("push frame {} for {:?} ({:?})", id, field, kind);
        self.stack.push(Frame { field, kind });
        Ok(())
    }

    /// Close the innermost open field.
    pub fn end_field(&mut self) -> PanelResult<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| PanelError::unbalanced("end_field called without an open field"))?;
        let root = self.stack.is_empty();
        trace!("pop frame for {:?}", frame.field);
        if root {
            self.finished_root = true;
        }
        let FrameKind::Template {
            buffer,
            placeholders,
        } = frame.kind
        else {
            return Ok(());
        };
        if buffer.is_empty() {
            return Ok(());
        }
        if root {
            let container = self.panel.root();
            return splice(self.panel, container, &buffer, &placeholders, self.doc);
        }
        if let Some(field) = frame.field {
            let container = self.doc.create_element("div");
            splice(self.panel, container, &buffer, &placeholders, self.doc)?;
            self.panel.set_template_panel(field, container, self.doc)?;
        }
        Ok(())
    }

    /// Append static markup to the innermost template.
    pub fn add_text(&mut self, text: &str) {
        if let Some(Frame {
            kind: FrameKind::Template { buffer, .. },
            ..
        }) = self.target_mut()
        {
            buffer.push_str(text);
        }
    }

    /// Check that every opened field was closed.
    pub fn finish(self) -> PanelResult<()> {
        match self.stack.len() {
            0 => Ok(()),
            open => Err(PanelError::unbalanced(format!(
                "{} field(s) left open",
                open
            ))),
        }
    }

    fn accepts_panel(&self, field: FieldId) -> bool {
        self.panel
            .field(field)
            .is_some_and(|field| field.kind().accepts_panel())
    }

    /// The innermost frame that is not a passthrough.
    fn target_mut(&mut self) -> Option<&mut Frame> {
        self.stack
            .iter_mut()
            .rev()
            .find(|frame| !matches!(frame.kind, FrameKind::Passthrough))
    }

    /// Register `child` with the target frame, emitting its marker when
    /// the frame merges markup and its field accepted the child.
    fn register(&mut self, id: SmolStr, child: FieldId) -> PanelResult<()> {
        let Some(index) = self
            .stack
            .iter()
            .rposition(|frame| !matches!(frame.kind, FrameKind::Passthrough))
        else {
            return Ok(());
        };
        let accepted = match self.stack[index].field {
            Some(parent) => self.panel.add_child(parent, child, self.doc)?,
            None => true,
        };
        if let FrameKind::Template {
            buffer,
            placeholders,
        } = &mut self.stack[index].kind
        {
            if accepted {
                buffer.push_str("<span id='");
                buffer.push_str(&id);
                buffer.push_str("'></span>");
                placeholders.insert(id, child);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanelErrorCode;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;
    use template_dom::MemoryDocument;
    use template_fields::namespaces::{ATTR_LABEL, ATTR_NAME};
    use template_fields::{Counters, FieldKind, NoMessages};

    fn panel(doc: &mut MemoryDocument) -> TopPanel {
        TopPanel::new(doc, Rc::new(Counters::new()), Rc::new(NoMessages))
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_nested_containers() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let mut generator = TemplatePanelGenerator::new(&mut panel, &mut doc);
        generator.begin_field(None, Attributes::new()).unwrap();
        generator.add_text("<h1>Title</h1>");
        generator
            .begin_field(Some(&FieldKind::Panel), attrs(&[(ATTR_NAME, "outer")]))
            .unwrap();
        generator.add_text("a");
        generator
            .begin_field(Some(&FieldKind::InlinePanel), Attributes::new())
            .unwrap();
        generator
            .begin_field(Some(&FieldKind::Label), attrs(&[(ATTR_LABEL, "L")]))
            .unwrap();
        generator.add_text("dropped");
        generator.end_field().unwrap();
        generator.end_field().unwrap();
        generator.add_text("b");
        generator.end_field().unwrap();
        generator.end_field().unwrap();
        generator.finish().unwrap();

        insta::assert_snapshot!(doc.outer_html(panel.root()), @"<div><h1>Title</h1><div><div>a<span><div><span>L</span></div></span>b</div></div></div>");
        let outer = panel.field_ids("outer")[0];
        let inline = panel.field(outer).unwrap().children()[0];
        assert_eq!(panel.field(inline).unwrap().kind(), FieldKind::InlinePanel);
        assert_eq!(panel.field(inline).unwrap().children().len(), 1);
    }

    #[test]
    fn test_empty_container_keeps_widget_empty() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let mut generator = TemplatePanelGenerator::new(&mut panel, &mut doc);
        generator.begin_field(None, Attributes::new()).unwrap();
        generator
            .begin_field(Some(&FieldKind::Panel), Attributes::new())
            .unwrap();
        generator.end_field().unwrap();
        generator.end_field().unwrap();
        generator.finish().unwrap();
        assert_eq!(doc.outer_html(panel.root()), "<div><div></div></div>");
    }

    #[test]
    fn test_unbalanced_calls() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);

        let mut generator = TemplatePanelGenerator::new(&mut panel, &mut doc);
        let err = generator.end_field().unwrap_err();
        assert_eq!(err.code, PanelErrorCode::UnbalancedFields);

        generator.begin_field(None, Attributes::new()).unwrap();
        generator
            .begin_field(Some(&FieldKind::Panel), Attributes::new())
            .unwrap();
        generator.end_field().unwrap();
        let err = generator.finish().unwrap_err();
        assert_eq!(err.code, PanelErrorCode::UnbalancedFields);
        assert_eq!(err.code.as_str(), "unbalanced-fields");
    }

    #[test]
    fn test_second_root_rejected() {
        let mut doc = MemoryDocument::new();
        let mut panel = panel(&mut doc);
        let mut generator = TemplatePanelGenerator::new(&mut panel, &mut doc);
        generator.begin_field(None, Attributes::new()).unwrap();
        generator.end_field().unwrap();
        assert!(generator.begin_field(None, Attributes::new()).is_err());
    }
}
