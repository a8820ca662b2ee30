//! Output node model and static markup serialization.
//!
//! Rendering produces a tree of [`Html`] nodes rather than a string so that
//! callers can post-process it (or hand it to another serializer).
//! [`Html::to_markup`] produces the same markup a static server-side
//! renderer would: void elements self-close, boolean `true` props become
//! empty attributes, and `className`/`htmlFor` map back to `class`/`for`.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

/// Elements that never have children and serialize as `<tag/>`.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Attribute names the serializer writes; anything else is skipped.
static ATTRIBUTE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_:][-A-Za-z0-9_:.]*$").expect("invalid attribute name regex")
});

/// Check whether `tag` is a void element.
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// A presentation node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Html {
    Text(TextNode),
    Element(Element),
    Fragment(Fragment),
}

/// Literal text. Escaped on serialization.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextNode {
    pub text: String,
}

/// An element with a tag name, props and children.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Element {
    pub tag: String,
    /// Identity among siblings. Never serialized to markup.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub key: Option<String>,
    pub props: Props,
    pub children: Vec<Html>,
}

/// A keyed group of nodes with no wrapper element.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Fragment {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub key: Option<String>,
    pub children: Vec<Html>,
}

/// A prop value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropValue {
    Str(String),
    Bool(bool),
    Int(u64),
    Style(Style),
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for PropValue {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<Style> for PropValue {
    fn from(value: Style) -> Self {
        Self::Style(value)
    }
}

/// Insertion-ordered map of camelCase CSS property names to values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Style(Vec<(String, String)>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing an earlier value in place.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(name, _)| *name == property) {
            slot.1 = value;
        } else {
            self.0.push((property, value));
        }
    }

    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Overlay `other` on top of `self`.
    pub fn extend(&mut self, other: Style) {
        for (property, value) in other.0 {
            self.set(property, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as a CSS declaration list (`text-align:left;color:red`).
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (i, (property, value)) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            out.push_str(&hyphenate(property));
            out.push(':');
            out.push_str(value.trim());
        }
        out
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Style {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Insertion-ordered prop map.
///
/// Order is kept so serialized attributes appear in the order they were set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props(Vec<(String, PropValue)>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prop, replacing an earlier value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// String value of a prop, if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        let pos = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Props {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_key_opt(mut self, key: Option<String>) -> Self {
        self.key = key;
        self
    }

    #[must_use]
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    #[must_use]
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Html>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<Html>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl Fragment {
    pub fn new(children: Vec<Html>) -> Self {
        Self {
            key: None,
            children,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_key_opt(mut self, key: Option<String>) -> Self {
        self.key = key;
        self
    }
}

impl From<Element> for Html {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<Fragment> for Html {
    fn from(fragment: Fragment) -> Self {
        Self::Fragment(fragment)
    }
}

impl From<&str> for Html {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Html {
    fn from(text: String) -> Self {
        Self::Text(TextNode { text })
    }
}

impl Html {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextNode { text: text.into() })
    }

    /// Unkeyed fragment.
    pub fn fragment(children: Vec<Html>) -> Self {
        Self::Fragment(Fragment::new(children))
    }

    /// An empty unkeyed fragment. Renders to nothing.
    pub fn empty() -> Self {
        Self::fragment(Vec::new())
    }

    /// Whether this node serializes to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(t) => t.text.is_empty(),
            Self::Element(_) => false,
            Self::Fragment(f) => f.children.iter().all(Html::is_empty),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Serialize to static markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    /// Append static markup to `out`.
    pub fn write_markup(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(&escape_html(&t.text)),
            Self::Fragment(f) => {
                for child in &f.children {
                    child.write_markup(out);
                }
            }
            Self::Element(e) => e.write_markup(out),
        }
    }
}

impl Element {
    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in self.props.iter() {
            write_attribute(name, value, out);
        }

        if is_void_tag(&self.tag) {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn write_attribute(name: &str, value: &PropValue, out: &mut String) {
    let name = match name {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    };
    if !ATTRIBUTE_NAME.is_match(name) {
        tracing::debug!(attribute = %name, "Skipped invalid attribute name");
        return;
    }

    match value {
        PropValue::Str(s) => {
            let _ = write!(out, r#" {name}="{}""#, escape_html(s));
        }
        PropValue::Bool(true) => {
            let _ = write!(out, r#" {name}="""#);
        }
        PropValue::Bool(false) => {}
        PropValue::Int(n) => {
            let _ = write!(out, r#" {name}="{n}""#);
        }
        PropValue::Style(style) => {
            if !style.is_empty() {
                let _ = write!(out, r#" {name}="{}""#, escape_html(&style.to_css()));
            }
        }
    }
}

/// Convert a camelCase CSS property to its hyphenated form.
///
/// Vendor prefixes keep their leading dash (`WebkitTransition` →
/// `-webkit-transition`).
fn hyphenate(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape special HTML characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
