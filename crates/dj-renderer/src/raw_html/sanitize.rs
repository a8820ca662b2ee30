//! Conversion of a parsed fragment into sanitized output nodes.

use std::sync::LazyLock;

use regex::Regex;

use super::tree::{RawElement, RawNode};
use crate::element::{Element, Html, Props};
use crate::util::parse_style;

/// Elements dropped together with their subtree.
const BLOCKED_TAGS: &[&str] = &["base", "embed", "form", "iframe", "meta", "object", "script"];

/// Attributes that become `true` when present with an empty value.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "default",
    "defer",
    "disabled",
    "hidden",
    "loop",
    "multiple",
    "muted",
    "novalidate",
    "open",
    "playsinline",
    "readonly",
    "required",
    "reversed",
    "selected",
];

/// Attributes holding a URL that is checked against [`UNSAFE_SCHEME`].
const URL_ATTRIBUTES: &[&str] = &["action", "formaction", "href", "poster", "src", "xlink:href"];

/// Matched against a URL after [`normalize_url`].
static UNSAFE_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:javascript|vbscript|data):").expect("invalid unsafe scheme regex")
});

/// Whether `name` is an event handler attribute such as `onclick`.
pub(crate) fn is_event_handler(name: &str) -> bool {
    name.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

/// Whether `name` holds a URL whose scheme must not reach the output.
pub(crate) fn is_unsafe_url(name: &str, value: &str) -> bool {
    URL_ATTRIBUTES.contains(&name.to_ascii_lowercase().as_str())
        && UNSAFE_SCHEME.is_match(&normalize_url(value))
}

/// Strip what browsers ignore when reading a URL scheme: leading control
/// characters and spaces, and tabs or newlines anywhere.
fn normalize_url(value: &str) -> String {
    value
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Convert parsed nodes to output nodes keyed `{prefix}-{index}`.
pub fn to_html(nodes: &[RawNode], key_prefix: &str) -> Vec<Html> {
    nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| match node {
            RawNode::Text(text) => Some(Html::text(text.as_str())),
            RawNode::Element(element) => element_to_html(element, format!("{key_prefix}-{index}")),
        })
        .collect()
}

fn element_to_html(element: &RawElement, key: String) -> Option<Html> {
    if BLOCKED_TAGS.contains(&element.tag.as_str()) {
        tracing::debug!(tag = %element.tag, "Dropped blocked raw HTML element");
        return None;
    }

    let children = to_html(&element.children, &key);
    Some(
        Element::new(element.tag.as_str())
            .with_key(key)
            .with_props(sanitize_attributes(&element.attributes))
            .with_children(children)
            .into(),
    )
}

/// Turn raw attributes into props, dropping anything unsafe.
pub fn sanitize_attributes(attributes: &[(String, String)]) -> Props {
    let mut props = Props::new();

    for (name, value) in attributes {
        if is_event_handler(name) {
            tracing::trace!(attribute = %name, "Dropped event handler attribute");
            continue;
        }

        if is_unsafe_url(name, value) {
            tracing::trace!(attribute = %name, "Dropped unsafe URL attribute");
            continue;
        }

        match name.as_str() {
            "class" => props.insert("className", value.as_str()),
            "for" => props.insert("htmlFor", value.as_str()),
            "style" => {
                if let Some(style) = parse_style(value) {
                    props.insert("style", style);
                }
            }
            _ if value.is_empty() && BOOLEAN_ATTRIBUTES.contains(&name.as_str()) => {
                props.insert(name.as_str(), true);
            }
            _ => props.insert(name.as_str(), value.as_str()),
        }
    }

    props
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::element::{PropValue, Style};

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_event_handlers_dropped() {
        let props = sanitize_attributes(&attrs(&[("onclick", "x()"), ("title", "t")]));
        assert_eq!(props, Props::new().with("title", "t"));
    }

    #[test]
    fn test_unsafe_urls_dropped() {
        let props = sanitize_attributes(&attrs(&[
            ("href", "  JavaScript:alert(1)"),
            ("src", "data:image/png;base64,xx"),
            ("poster", "vbscript:x"),
            ("title", "javascript:fine-here"),
        ]));
        assert_eq!(props, Props::new().with("title", "javascript:fine-here"));

        let safe = sanitize_attributes(&attrs(&[("href", "https://example.com")]));
        assert_eq!(safe.get_str("href"), Some("https://example.com"));
    }

    #[test]
    fn test_control_characters_do_not_hide_scheme() {
        let props = sanitize_attributes(&attrs(&[
            ("href", "java\tscript:alert(1)"),
            ("src", "java\nscript:alert(2)"),
            ("action", "\u{1}javascript:alert(3)"),
            ("poster", "\r\n data:text/html,x"),
            ("formaction", "vb\r\nscript:x"),
        ]));
        assert!(props.is_empty());
    }

    #[test]
    fn test_url_checks_ignore_case_of_name() {
        assert!(is_unsafe_url("HREF", "javascript:x"));
        assert!(!is_unsafe_url("href", "/java script:x"));
        assert!(!is_unsafe_url("alt", "javascript:x"));
        assert!(is_event_handler("OnLoad"));
        assert!(!is_event_handler("o"));
    }

    #[test]
    fn test_renamed_and_parsed_attributes() {
        let props = sanitize_attributes(&attrs(&[
            ("class", "a b"),
            ("for", "field"),
            ("style", "color: red; font-weight: bold"),
        ]));
        assert_eq!(props.get_str("className"), Some("a b"));
        assert_eq!(props.get_str("htmlFor"), Some("field"));
        assert_eq!(
            props.get("style"),
            Some(&PropValue::Style(
                Style::new().with("color", "red").with("fontWeight", "bold")
            ))
        );

        let empty_style = sanitize_attributes(&attrs(&[("style", ";")]));
        assert!(empty_style.is_empty());
    }

    #[test]
    fn test_boolean_attributes() {
        let props = sanitize_attributes(&attrs(&[
            ("controls", ""),
            ("disabled", "disabled"),
            ("title", ""),
        ]));
        assert_eq!(
            props,
            Props::new()
                .with("controls", true)
                .with("disabled", "disabled")
                .with("title", "")
        );
    }
}
