//! Localized messages.

use rustc_hash::FxHashMap;

/// Source of localized strings.
pub trait Messages {
    /// Look up a message by key.
    fn message(&self, key: &str) -> Option<&str>;
}

/// Messages that resolve nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMessages;

impl Messages for NoMessages {
    fn message(&self, _key: &str) -> Option<&str> {
        None
    }
}

/// Messages parsed from a key/value text file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBundle {
    entries: FxHashMap<String, String>,
}

impl MessageBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bundle.
    ///
    /// One entry per line, split on the first `=`, or on the first space or
    /// tab when there is no `=`. Blank lines and `#` comments are skipped; a
    /// line without separator is a key with an empty value. Later keys win.
    pub fn parse(text: &str) -> Self {
        let mut bundle = Self::new();
        bundle.load(text);
        bundle
    }

    /// Replace the content of the bundle with parsed `text`.
    pub fn load(&mut self, text: &str) {
        self.entries.clear();
        for line in text.split(['\n', '\r']) {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let split = line
                .find('=')
                .or_else(|| line.find(' '))
                .or_else(|| line.find('\t'));
            let (key, value) = match split {
                Some(idx) => (line[..idx].trim(), line[idx + 1..].trim()),
                None => (line, ""),
            };
            self.entries.insert(key.to_string(), value.to_string());
        }
    }

    /// Set a message.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get a message.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bundle is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Messages for MessageBundle {
    fn message(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let bundle = MessageBundle::parse(
            "# comment\n\nlogin.title = Sign in\r\nlogin.go Go now\nflag\nlogin.title=Log in\nk\tv",
        );
        assert_eq!(bundle.get("login.title"), Some("Log in"));
        assert_eq!(bundle.get("login.go"), Some("Go now"));
        assert_eq!(bundle.get("flag"), Some(""));
        assert_eq!(bundle.get("k"), Some("v"));
        assert_eq!(bundle.len(), 4);
        assert_eq!(NoMessages.message("login.title"), None);
    }
}
