//! Replacement of placeholder markers by widgets.

use crate::error::PanelResult;
use indexmap::IndexMap;
use smol_str::SmolStr;
use template_dom::{Document, NodeId};
use template_fields::{FieldId, TopPanel};

/// Fill `container` with `html`, then swap every placeholder element whose
/// `id` is mapped for the widget of its field.
///
/// Unmapped markers stay in place as empty elements.
pub fn splice(
    panel: &mut TopPanel,
    container: NodeId,
    html: &str,
    placeholders: &IndexMap<SmolStr, FieldId>,
    doc: &mut dyn Document,
) -> PanelResult<()> {
    doc.set_inner_html(container, html)?;
    replace_markers(panel, container, placeholders, doc)
}

fn replace_markers(
    panel: &mut TopPanel,
    node: NodeId,
    placeholders: &IndexMap<SmolStr, FieldId>,
    doc: &mut dyn Document,
) -> PanelResult<()> {
    let mut child = doc.first_child(node);
    while let Some(current) = child {
        let next = doc.next_sibling(current);
        let field = doc
            .attribute(current, "id")
            .and_then(|id| placeholders.get(id))
            .copied();
        match field {
            Some(field) => {
                let widget = panel.widget(field, doc)?;
                doc.insert_before(node, widget, current)?;
                doc.remove_child(node, current)?;
            }
            None => replace_markers(panel, current, placeholders, doc)?,
        }
        child = next;
    }
    Ok(())
}
