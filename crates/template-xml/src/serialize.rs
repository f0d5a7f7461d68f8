//! Markup serialization.
//!
//! Elements are written back with their qualified names; attribute values
//! are quoted with `'`.

use crate::ast::{Element, Node};

/// Append `text` to `out`, escaping `&`, `<` and `>`.
pub fn escape(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Append an attribute value to `out`, escaping the quote as well.
pub fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("&apos;"),
            _ => escape(ch.encode_utf8(&mut [0; 4]), out),
        }
    }
}

/// Write the start tag of `element`.
pub fn serialize_open_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.qname);
    for attribute in &element.attributes {
        out.push(' ');
        out.push_str(&attribute.qname);
        out.push_str("='");
        escape_attribute(&attribute.value, out);
        out.push('\'');
    }
    out.push('>');
}

/// Write the end tag of `element`.
pub fn serialize_close_tag(element: &Element, out: &mut String) {
    out.push_str("</");
    out.push_str(&element.qname);
    out.push('>');
}

/// Write the children of `element`.
pub fn serialize_content(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Element(e) => serialize_element(e, out),
            Node::Text(text) => escape(text, out),
        }
    }
}

/// Write `element` with its content.
pub fn serialize_element(element: &Element, out: &mut String) {
    serialize_open_tag(element, out);
    serialize_content(element, out);
    serialize_close_tag(element, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Attribute;
    use crate::parser::parse_document;

    #[test]
    fn test_escape_only_markup_characters() {
        let mut out = String::new();
        escape("a<b>&\"c'", &mut out);
        assert_eq!(out, "a&lt;b&gt;&amp;\"c'");
    }

    #[test]
    fn test_open_tag_quotes_values() {
        let mut element = Element::new("input");
        element.push_attribute(Attribute::new("title", "it's <b>"));
        let mut out = String::new();
        serialize_open_tag(&element, &mut out);
        assert_eq!(out, "<input title='it&apos;s &lt;b&gt;'>");
    }

    #[test]
    fn test_round_trip() {
        let source = "<h:div xmlns:h='http://www.w3.org/1999/xhtml/' class='x'>a &amp; <h:b>b</h:b></h:div>";
        let doc = parse_document(source).unwrap();
        let mut out = String::new();
        serialize_element(&doc.root, &mut out);
        insta::assert_snapshot!(out, @"<h:div xmlns:h='http://www.w3.org/1999/xhtml/' class='x'>a &amp; <h:b>b</h:b></h:div>");
    }
}
