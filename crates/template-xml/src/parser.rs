//! XML parser built on the `xmlparser` tokenizer.

use crate::ast::{Attribute, Document, Element, Node};
use crate::error::{XmlError, XmlErrorCode, XmlResult};
use crate::uri::{make_uri, XMLNS_NAMESPACE, XML_NAMESPACE};
use smol_str::SmolStr;
use xmlparser::{ElementEnd, StrSpan, Token, Tokenizer};

/// Parse a complete XML document, resolving namespaces.
pub fn parse_document(source: &str) -> XmlResult<Document> {
    let mut parser = Parser::new(source, true);
    parser.run(Tokenizer::from(source))?;
    let root = parser.roots.into_iter().find_map(|node| match node {
        Node::Element(e) => Some(e),
        Node::Text(_) => None,
    });
    match root {
        Some(root) => Ok(Document::new(root)),
        None => Err(XmlError::at(
            source,
            source.len(),
            "Document has no root element",
            XmlErrorCode::MissingRoot,
        )),
    }
}

/// Parse markup with any number of top-level nodes.
///
/// Namespace declarations are not interpreted: element and attribute URIs
/// are their qualified names.
pub fn parse_fragment(source: &str) -> XmlResult<Vec<Node>> {
    let mut parser = Parser::new(source, false);
    parser.run(Tokenizer::from_fragment(source, 0..source.len()))?;
    Ok(parser.roots)
}

/// An element whose start tag is still being read.
struct PendingElement<'a> {
    prefix: &'a str,
    local: &'a str,
    start: usize,
    attributes: Vec<(&'a str, &'a str, String)>,
}

/// An open element and the number of namespace bindings it declared.
struct OpenElement {
    element: Element,
    bindings: usize,
}

struct Parser<'a> {
    source: &'a str,
    resolve: bool,
    pending: Option<PendingElement<'a>>,
    stack: Vec<OpenElement>,
    /// In-scope `(prefix, namespace)` bindings, innermost last.
    bindings: Vec<(SmolStr, SmolStr)>,
    roots: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, resolve: bool) -> Self {
        Self {
            source,
            resolve,
            pending: None,
            stack: Vec::new(),
            bindings: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn run(&mut self, tokenizer: Tokenizer<'a>) -> XmlResult<()> {
        for token in tokenizer {
            match token.map_err(XmlError::syntax)? {
                Token::ElementStart { prefix, local, span } => {
                    self.pending = Some(PendingElement {
                        prefix: prefix.as_str(),
                        local: local.as_str(),
                        start: span.start(),
                        attributes: Vec::new(),
                    });
                }
                Token::Attribute {
                    prefix,
                    local,
                    value,
                    ..
                } => {
                    let decoded = self.unescape(value)?;
                    if let Some(pending) = self.pending.as_mut() {
                        pending
                            .attributes
                            .push((prefix.as_str(), local.as_str(), decoded));
                    }
                }
                Token::ElementEnd { end, span } => self.element_end(end, span)?,
                Token::Text { text } => {
                    let decoded = self.unescape(text)?;
                    self.push_text(decoded);
                }
                Token::Cdata { text, .. } => self.push_text(text.as_str().to_string()),
                _ => {}
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(XmlError::at(
                self.source,
                self.source.len(),
                format!("Unclosed element <{}>", open.element.qname),
                XmlErrorCode::UnclosedElement,
            ));
        }
        Ok(())
    }

    fn element_end(&mut self, end: ElementEnd<'a>, span: StrSpan<'a>) -> XmlResult<()> {
        match end {
            ElementEnd::Open => {
                let open = self.open_pending()?;
                self.stack.push(open);
            }
            ElementEnd::Empty => {
                let open = self.open_pending()?;
                self.close(open);
            }
            ElementEnd::Close(prefix, local) => {
                let qname = qualified_name(prefix.as_str(), local.as_str());
                let Some(open) = self.stack.pop() else {
                    return Err(XmlError::at(
                        self.source,
                        span.start(),
                        format!("Unexpected close tag </{}>", qname),
                        XmlErrorCode::MismatchedTag,
                    ));
                };
                if open.element.qname != qname {
                    return Err(XmlError::at(
                        self.source,
                        span.start(),
                        format!(
                            "Expected </{}>, found </{}>",
                            open.element.qname, qname
                        ),
                        XmlErrorCode::MismatchedTag,
                    ));
                }
                self.close(open);
            }
        }
        Ok(())
    }

    /// Turn the pending start tag into an element, binding its namespaces.
    fn open_pending(&mut self) -> XmlResult<OpenElement> {
        let Some(pending) = self.pending.take() else {
            return Err(XmlError::at(
                self.source,
                0,
                "Element end without start",
                XmlErrorCode::Syntax,
            ));
        };

        let mut bindings = 0;
        if self.resolve {
            for (prefix, local, value) in &pending.attributes {
                let declared = match (*prefix, *local) {
                    ("", "xmlns") => Some(""),
                    ("xmlns", local) => Some(local),
                    _ => None,
                };
                if let Some(declared) = declared {
                    self.bindings
                        .push((SmolStr::new(declared), SmolStr::new(value)));
                    bindings += 1;
                }
            }
        }

        let qname = qualified_name(pending.prefix, pending.local);
        let uri = if self.resolve {
            let ns = self.lookup(pending.prefix, pending.start)?;
            make_uri(ns.as_deref(), pending.local)
        } else {
            qname.clone()
        };

        let mut element = Element::with_uri(uri, qname);
        for (prefix, local, value) in pending.attributes {
            let qname = qualified_name(prefix, local);
            let uri = if !self.resolve {
                qname.clone()
            } else if prefix == "xmlns" || (prefix.is_empty() && local == "xmlns") {
                make_uri(Some(XMLNS_NAMESPACE), local)
            } else if prefix.is_empty() {
                SmolStr::new(local)
            } else {
                let ns = self.lookup(prefix, pending.start)?;
                make_uri(ns.as_deref(), local)
            };
            element.push_attribute(Attribute { uri, qname, value });
        }

        Ok(OpenElement { element, bindings })
    }

    /// Resolve a prefix against the bindings in scope.
    fn lookup(&self, prefix: &str, offset: usize) -> XmlResult<Option<SmolStr>> {
        if prefix == "xml" {
            return Ok(Some(SmolStr::new(XML_NAMESPACE)));
        }
        let found = self
            .bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == prefix)
            .map(|(_, ns)| ns.clone());
        match found {
            Some(ns) if ns.is_empty() => Ok(None),
            Some(ns) => Ok(Some(ns)),
            None if prefix.is_empty() => Ok(None),
            None => Err(XmlError::at(
                self.source,
                offset,
                format!("Unbound namespace prefix '{}'", prefix),
                XmlErrorCode::UnboundPrefix,
            )),
        }
    }

    fn close(&mut self, open: OpenElement) {
        let len = self.bindings.len();
        self.bindings.truncate(len - open.bindings);
        self.push_node(Node::Element(open.element));
    }

    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if self.stack.is_empty() && self.resolve && text.trim().is_empty() {
            return;
        }
        self.push_node(Node::Text(text));
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.element.push_child(node),
            None => match (self.roots.last_mut(), node) {
                (Some(Node::Text(last)), Node::Text(text)) => last.push_str(&text),
                (_, node) => self.roots.push(node),
            },
        }
    }

    fn unescape(&self, span: StrSpan<'a>) -> XmlResult<String> {
        unescape(span.as_str()).map_err(|(offset, reference)| {
            XmlError::at(
                self.source,
                span.start() + offset,
                format!("Invalid entity reference '&{};'", reference),
                XmlErrorCode::InvalidEntity,
            )
        })
    }
}

fn qualified_name(prefix: &str, local: &str) -> SmolStr {
    if prefix.is_empty() {
        SmolStr::new(local)
    } else {
        SmolStr::from(format!("{}:{}", prefix, local))
    }
}

/// Decode entity and character references.
///
/// On failure returns the offset of the `&` and the reference text.
fn unescape(raw: &str) -> Result<String, (usize, String)> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    let mut offset = 0;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let Some(semi) = after.find(';') else {
            return Err((offset + amp, after.to_string()));
        };
        let reference = &after[..semi];
        let decoded = match reference {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => reference.strip_prefix('#').and_then(|code| {
                let value = match code.strip_prefix('x') {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => code.parse::<u32>().ok(),
                };
                value.and_then(char::from_u32)
            }),
        };
        match decoded {
            Some(ch) => out.push(ch),
            None => return Err((offset + amp, reference.to_string())),
        }
        let consumed = amp + 1 + semi + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NS: &str = "http://www.adnotatio.org/ns/templates#";

    #[test]
    fn test_resolves_namespaces() {
        let doc = parse_document(
            r#"<t:templates xmlns:t="http://www.adnotatio.org/ns/templates#" xmlns="http://www.w3.org/1999/xhtml">
                <t:template t:name="login" class="c"><div/></t:template>
            </t:templates>"#,
        )
        .unwrap();
        assert_eq!(doc.root.uri, format!("{}templates", NS));
        assert_eq!(doc.root.qname, "t:templates");

        let template = doc.root.elements().next().unwrap();
        assert_eq!(template.attribute(&format!("{}name", NS)), Some("login"));
        assert_eq!(template.attribute("class"), Some("c"));

        let div = template.elements().next().unwrap();
        assert_eq!(div.uri, "http://www.w3.org/1999/xhtml#div");
        assert_eq!(div.qname, "div");
    }

    #[test]
    fn test_xmlns_declarations_are_kept() {
        let doc = parse_document(r#"<a xmlns:p="urn:p" p:x="1"/>"#).unwrap();
        let uris: Vec<&str> = doc.root.attributes.iter().map(|a| a.uri.as_str()).collect();
        assert_eq!(uris, vec!["http://www.w3.org/2000/xmlns/p", "urn:p#x"]);
        assert_eq!(doc.root.attributes[0].qname, "xmlns:p");
    }

    #[test]
    fn test_scope_ends_with_element() {
        let err = parse_document(r#"<a><b xmlns:p="urn:p"/><p:c/></a>"#).unwrap_err();
        assert_eq!(err.code, XmlErrorCode::UnboundPrefix);
    }

    #[test]
    fn test_decodes_references() {
        let doc = parse_document("<a v='&lt;&#65;&#x42;'>x &amp; y<![CDATA[ <z> ]]></a>").unwrap();
        assert_eq!(doc.root.attribute("v"), Some("<AB"));
        assert_eq!(doc.root.children, vec![Node::Text("x & y <z> ".into())]);
    }

    #[test]
    fn test_invalid_entity() {
        let err = parse_document("<a>&nope;</a>").unwrap_err();
        assert_eq!(err.code, XmlErrorCode::InvalidEntity);
        assert_eq!((err.line, err.column), (1, 4));
    }

    #[test]
    fn test_mismatched_tag() {
        let err = parse_document("<a>\n<b></c></a>").unwrap_err();
        assert_eq!(err.code, XmlErrorCode::MismatchedTag);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_comments_are_dropped() {
        let doc = parse_document("<?xml version='1.0'?><!-- c --><a><!-- d -->x</a>").unwrap();
        assert_eq!(doc.root.text(), "x");
        assert_eq!(doc.root.children.len(), 1);
    }

    #[test]
    fn test_fragment() {
        let nodes = parse_fragment("a<span id='s'></span>b<p:x/>").unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].as_text(), Some("a"));
        let span = nodes[1].as_element().unwrap();
        assert_eq!(span.attribute("id"), Some("s"));
        assert_eq!(nodes[3].as_element().unwrap().uri, "p:x");
    }

    #[test]
    fn test_fragment_unclosed() {
        let err = parse_fragment("<div>").unwrap_err();
        assert_eq!(err.code, XmlErrorCode::UnclosedElement);
    }
}
