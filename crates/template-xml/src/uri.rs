//! Name URIs.
//!
//! A URI is a namespace followed by a local name. Namespaces that end in
//! neither `#` nor `/` get a `#` separator, so
//! `xmlns:t="http://example.org/ns"` and `t:input` give
//! `http://example.org/ns#input`.

use smol_str::SmolStr;

/// Namespace bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of `xmlns` declarations.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Build a URI from an optional namespace and a local name.
pub fn make_uri(namespace: Option<&str>, local: &str) -> SmolStr {
    match namespace {
        None | Some("") => SmolStr::new(local),
        Some(ns) if ns.ends_with('#') || ns.ends_with('/') => {
            SmolStr::from(format!("{}{}", ns, local))
        }
        Some(ns) => SmolStr::from(format!("{}#{}", ns, local)),
    }
}

fn separator(uri: &str) -> Option<usize> {
    let idx = uri.rfind('#').or_else(|| uri.rfind('/'))?;
    (idx > 0).then_some(idx)
}

/// Namespace part of `uri`, separator included.
pub fn namespace_of(uri: &str) -> Option<&str> {
    separator(uri).map(|idx| &uri[..=idx])
}

/// Local part of `uri`.
pub fn local_name_of(uri: &str) -> Option<&str> {
    separator(uri).map(|idx| &uri[idx + 1..])
}
