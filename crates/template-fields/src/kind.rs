//! Field variants.

use std::fmt;

/// The closed set of field variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Block of markup.
    Html,
    /// Inline markup.
    InlineHtml,
    /// Single-line text box.
    TextInput,
    /// Password box.
    Password,
    /// Hidden form value.
    Hidden,
    /// File chooser.
    FileUpload,
    /// Multi-line text box.
    TextArea,
    /// Checkbox with a label.
    Checkbox,
    /// Radio button with a label.
    Radio,
    /// Value shown as markup and mirrored in a hidden input.
    ReadOnly,
    /// Push button.
    Button,
    /// Button notifying submit listeners.
    Submit,
    /// Button clearing fields.
    Clear,
    /// Button notifying cancel listeners.
    Cancel,
    /// Block container; also used for tabs.
    Panel,
    /// Inline container.
    InlinePanel,
    /// Another template rendered in place.
    View,
    /// Collapsible section with a header.
    Disclosure,
    /// Clickable header of a disclosure.
    Header,
    /// Tab container.
    Tabs,
    /// Block text label.
    BlockLabel,
    /// Inline text label.
    Label,
    /// Inline markup label.
    HtmlLabel,
    /// History hyperlink.
    Link,
}

impl FieldKind {
    /// Tags of the built-in vocabulary, in the reserved namespace.
    pub const BUILTIN_TAGS: [(&'static str, FieldKind); 25] = [
        ("html", Self::Html),
        ("inlineHTML", Self::InlineHtml),
        ("input", Self::TextInput),
        ("checkbox", Self::Checkbox),
        ("radio", Self::Radio),
        ("hidden", Self::Hidden),
        ("readonly", Self::ReadOnly),
        ("password", Self::Password),
        ("button", Self::Button),
        ("submit", Self::Submit),
        ("clear", Self::Clear),
        ("cancel", Self::Cancel),
        ("file", Self::FileUpload),
        ("textarea", Self::TextArea),
        ("panel", Self::Panel),
        ("inlinePanel", Self::InlinePanel),
        ("view", Self::View),
        ("disclosure", Self::Disclosure),
        ("header", Self::Header),
        ("tabs", Self::Tabs),
        ("tab", Self::Panel),
        ("blockLabel", Self::BlockLabel),
        ("label", Self::Label),
        ("htmlLabel", Self::HtmlLabel),
        ("link", Self::Link),
    ];

    /// Whether the field takes a nested template panel as its content.
    pub fn accepts_panel(self) -> bool {
        matches!(
            self,
            Self::Panel | Self::InlinePanel | Self::Disclosure | Self::Header
        )
    }

    /// Whether the field is a button.
    pub fn is_button(self) -> bool {
        matches!(self, Self::Button | Self::Submit | Self::Clear | Self::Cancel)
    }

    /// Whether the field holds editable text.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Self::TextInput | Self::Password | Self::Hidden | Self::TextArea
        )
    }

    /// Whether the field has a value that can be read and cleared.
    pub fn has_value(self) -> bool {
        self.is_text()
            || matches!(
                self,
                Self::Html | Self::InlineHtml | Self::Checkbox | Self::Radio | Self::ReadOnly
            )
    }

    /// Whether the field toggles its own `disabled` state instead of its
    /// children's.
    pub fn toggles_enabled(self) -> bool {
        self.is_text() || self.is_button() || matches!(self, Self::Checkbox | Self::Radio)
    }

    /// Get the variant name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::InlineHtml => "inline-html",
            Self::TextInput => "text-input",
            Self::Password => "password",
            Self::Hidden => "hidden",
            Self::FileUpload => "file-upload",
            Self::TextArea => "text-area",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::ReadOnly => "read-only",
            Self::Button => "button",
            Self::Submit => "submit",
            Self::Clear => "clear",
            Self::Cancel => "cancel",
            Self::Panel => "panel",
            Self::InlinePanel => "inline-panel",
            Self::View => "view",
            Self::Disclosure => "disclosure",
            Self::Header => "header",
            Self::Tabs => "tabs",
            Self::BlockLabel => "block-label",
            Self::Label => "label",
            Self::HtmlLabel => "html-label",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
