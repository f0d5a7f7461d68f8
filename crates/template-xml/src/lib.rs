//! XML documents for form templates.
//!
//! Templates are plain XML where element and attribute names are identified
//! by *URIs*: the namespace URI followed by the local name. The parser
//! resolves `xmlns` declarations into those URIs while keeping the qualified
//! names around, so elements can be written back exactly as they were
//! declared.

pub mod ast;
pub mod error;
pub mod parser;
pub mod serialize;
pub mod uri;

pub use ast::{Attribute, Document, Element, Node};
pub use error::{XmlError, XmlErrorCode, XmlResult};
pub use parser::{parse_document, parse_fragment};
pub use serialize::{
    escape, escape_attribute, serialize_close_tag, serialize_content, serialize_element,
    serialize_open_tag,
};
pub use uri::{local_name_of, make_uri, namespace_of, XMLNS_NAMESPACE, XML_NAMESPACE};
