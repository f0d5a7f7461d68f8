//! Reserved namespaces and attribute keys.

/// Namespace of template elements and reserved attributes.
pub const NS_TEMPLATES: &str = "http://www.adnotatio.org/ns/templates#";

/// XHTML namespace; attributes in it are passed to widgets by local name.
pub const NS_XHTML: &str = "http://www.w3.org/1999/xhtml/";

macro_rules! reserved {
    ($($(#[$doc:meta])* $name:ident = $local:literal;)*) => {
        $(
            $(#[$doc])*
            pub const $name: &str = concat!("http://www.adnotatio.org/ns/templates#", $local);
        )*
    };
}

reserved! {
    /// URI of the source tag, filled in when a field is created.
    TAG_URI = "tag";
    /// Field name.
    ATTR_NAME = "name";
    /// Default value.
    ATTR_VALUE = "value";
    /// Literal label.
    ATTR_LABEL = "label";
    /// Message key of a localized label.
    ATTR_LABEL_KEY = "labelKey";
    /// Title, the last label fallback.
    ATTR_TITLE = "title";
    /// Target field of a clear button.
    ATTR_FOR = "for";
    /// Initial state of checkboxes and radio buttons.
    ATTR_CHECKED = "checked";
    /// Initial state of disclosure panels.
    ATTR_OPEN = "open";
    /// Style class of header panels.
    ATTR_SWITCH = "switch";
    /// Selects a tab when it is added.
    ATTR_SELECTED = "selected";
    /// Inline hyperlinks.
    ATTR_INLINE = "inline";
    /// History token of hyperlinks.
    ATTR_TOKEN = "token";
    /// Whether a clear button also clears descendants.
    ATTR_CHILDREN = "children";
    /// Template rendered by a view.
    ATTR_TEMPLATE = "template";
    /// The template element.
    TAG_TEMPLATE = "template";
    /// Disclosure header element.
    TAG_HEADER = "header";
}

/// Build the reserved URI of a local name.
pub fn reserved(local: &str) -> String {
    format!("{}{}", NS_TEMPLATES, local)
}

/// Check whether `uri` lives in the reserved namespace.
pub fn is_reserved(uri: &str) -> bool {
    uri.starts_with(NS_TEMPLATES)
}
