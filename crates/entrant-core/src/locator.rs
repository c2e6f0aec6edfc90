use serde::Serialize;
use std::fmt;

/// One strategy for finding an element on the page.
///
/// Call sites build ordered slices of these; the interaction layer tries
/// them left to right and the first one that resolves wins. The serde
/// representation (`kind` tag, snake_case) is what the DOM glue script
/// dispatches on, so the backend stays agnostic to the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// Raw CSS selector.
    Css { selector: String },
    /// CSS selector narrowed to the first match whose visible text
    /// contains `text`.
    CssText { selector: String, text: String },
    /// Accessibility role plus accessible name.
    Role { role: String, name: String },
    /// Any clickable element whose visible text contains `text`.
    Text { text: String },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css {
            selector: selector.into(),
        }
    }

    pub fn css_text(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Locator::CssText {
            selector: selector.into(),
            text: text.into(),
        }
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Locator::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Locator::Text { text: text.into() }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css { selector } => write!(f, "css:{selector}"),
            Locator::CssText { selector, text } => write!(f, "css:{selector}~\"{text}\""),
            Locator::Role { role, name } => write!(f, "role:{role}[{name}]"),
            Locator::Text { text } => write!(f, "text:\"{text}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let value = serde_json::to_value(Locator::css("#send2")).unwrap();
        assert_eq!(value["kind"], "css");
        assert_eq!(value["selector"], "#send2");

        let value = serde_json::to_value(Locator::role("button", "Yes")).unwrap();
        assert_eq!(value["kind"], "role");
        assert_eq!(value["name"], "Yes");
    }
}
