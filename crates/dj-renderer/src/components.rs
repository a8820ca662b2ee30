//! Override map: per-kind replacement renderers.
//!
//! An [`Override`] is either a plain element tag name, which receives only
//! attribute props, or a [`Component`], which also receives the source node,
//! kind-specific [`Inputs`] and the rendered children.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dj_ast::{Alignment, Checkbox, Node};

use crate::RenderError;
use crate::element::{Html, Props};

/// Kind names accepted in an override map.
///
/// Every node kind has one, plus [`ComponentKind::Endnotes`] for the
/// synthesized endnotes section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Doc,
    Section,
    Div,
    Para,
    Heading,
    Emph,
    Strong,
    Mark,
    Highlighted,
    Superscript,
    Supe,
    Subscript,
    Insert,
    Delete,
    Span,
    Table,
    Caption,
    Row,
    Cell,
    FootnoteReference,
    Footnote,
    Endnotes,
    DoubleQuoted,
    SingleQuoted,
    SmartPunctuation,
    InlineMath,
    DisplayMath,
    Code,
    Verbatim,
    CodeBlock,
    RawBlock,
    RawInline,
    Symb,
    Url,
    Email,
    Link,
    Image,
    BulletList,
    OrderedList,
    ListItem,
    DefinitionList,
    DefinitionListItem,
    Term,
    Definition,
    TaskList,
    TaskListItem,
    Blockquote,
    BlockQuote,
    ThematicBreak,
    Str,
    NonBreakingSpace,
    SoftBreak,
    Softbreak,
    HardBreak,
    Hardbreak,
}

impl ComponentKind {
    pub const ALL: &'static [ComponentKind] = &[
        Self::Doc,
        Self::Section,
        Self::Div,
        Self::Para,
        Self::Heading,
        Self::Emph,
        Self::Strong,
        Self::Mark,
        Self::Highlighted,
        Self::Superscript,
        Self::Supe,
        Self::Subscript,
        Self::Insert,
        Self::Delete,
        Self::Span,
        Self::Table,
        Self::Caption,
        Self::Row,
        Self::Cell,
        Self::FootnoteReference,
        Self::Footnote,
        Self::Endnotes,
        Self::DoubleQuoted,
        Self::SingleQuoted,
        Self::SmartPunctuation,
        Self::InlineMath,
        Self::DisplayMath,
        Self::Code,
        Self::Verbatim,
        Self::CodeBlock,
        Self::RawBlock,
        Self::RawInline,
        Self::Symb,
        Self::Url,
        Self::Email,
        Self::Link,
        Self::Image,
        Self::BulletList,
        Self::OrderedList,
        Self::ListItem,
        Self::DefinitionList,
        Self::DefinitionListItem,
        Self::Term,
        Self::Definition,
        Self::TaskList,
        Self::TaskListItem,
        Self::Blockquote,
        Self::BlockQuote,
        Self::ThematicBreak,
        Self::Str,
        Self::NonBreakingSpace,
        Self::SoftBreak,
        Self::Softbreak,
        Self::HardBreak,
        Self::Hardbreak,
    ];

    /// Snake_case name, identical to the node tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Section => "section",
            Self::Div => "div",
            Self::Para => "para",
            Self::Heading => "heading",
            Self::Emph => "emph",
            Self::Strong => "strong",
            Self::Mark => "mark",
            Self::Highlighted => "highlighted",
            Self::Superscript => "superscript",
            Self::Supe => "supe",
            Self::Subscript => "subscript",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Span => "span",
            Self::Table => "table",
            Self::Caption => "caption",
            Self::Row => "row",
            Self::Cell => "cell",
            Self::FootnoteReference => "footnote_reference",
            Self::Footnote => "footnote",
            Self::Endnotes => "endnotes",
            Self::DoubleQuoted => "double_quoted",
            Self::SingleQuoted => "single_quoted",
            Self::SmartPunctuation => "smart_punctuation",
            Self::InlineMath => "inline_math",
            Self::DisplayMath => "display_math",
            Self::Code => "code",
            Self::Verbatim => "verbatim",
            Self::CodeBlock => "code_block",
            Self::RawBlock => "raw_block",
            Self::RawInline => "raw_inline",
            Self::Symb => "symb",
            Self::Url => "url",
            Self::Email => "email",
            Self::Link => "link",
            Self::Image => "image",
            Self::BulletList => "bullet_list",
            Self::OrderedList => "ordered_list",
            Self::ListItem => "list_item",
            Self::DefinitionList => "definition_list",
            Self::DefinitionListItem => "definition_list_item",
            Self::Term => "term",
            Self::Definition => "definition",
            Self::TaskList => "task_list",
            Self::TaskListItem => "task_list_item",
            Self::Blockquote => "blockquote",
            Self::BlockQuote => "block_quote",
            Self::ThematicBreak => "thematic_break",
            Self::Str => "str",
            Self::NonBreakingSpace => "non_breaking_space",
            Self::SoftBreak => "soft_break",
            Self::Softbreak => "softbreak",
            Self::HardBreak => "hard_break",
            Self::Hardbreak => "hardbreak",
        }
    }

    /// Kind that shares an override with this one when this one has none.
    pub fn alias(self) -> Option<Self> {
        Some(match self {
            Self::Mark => Self::Highlighted,
            Self::Highlighted => Self::Mark,
            Self::Superscript => Self::Supe,
            Self::Supe => Self::Superscript,
            Self::Code => Self::Verbatim,
            Self::Verbatim => Self::Code,
            Self::Blockquote => Self::BlockQuote,
            Self::BlockQuote => Self::Blockquote,
            Self::SoftBreak => Self::Softbreak,
            Self::Softbreak => Self::SoftBreak,
            Self::HardBreak => Self::Hardbreak,
            Self::Hardbreak => Self::HardBreak,
            Self::DoubleQuoted => Self::SingleQuoted,
            Self::SingleQuoted => Self::DoubleQuoted,
            _ => return None,
        })
    }

    /// Kind of a node. `None` for unknown nodes.
    pub fn of(node: &Node) -> Option<Self> {
        if matches!(node, Node::Unknown) {
            return None;
        }
        node.tag().parse().ok()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RenderError::UnknownKind(s.to_owned()))
    }
}

/// Kind-specific values handed to a [`Component`].
///
/// Only the fields meaningful for the rendered kind are set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    /// Clamped heading level.
    pub level: Option<u32>,
    pub align: Option<Alignment>,
    /// Header row or header cell.
    pub head: Option<bool>,
    pub checkbox: Option<Checkbox>,
    /// Tightness of the list (for lists) or of the parent list (for items).
    pub tight: Option<bool>,
    /// Text payload: code, math, raw text, glyphs, autolink text.
    pub value: Option<String>,
    /// Raw block/inline format.
    pub format: Option<String>,
    /// Code block language.
    pub language: Option<String>,
    /// Symbol alias.
    pub alias: Option<String>,
    pub href: Option<String>,
    pub alt: Option<String>,
    /// Smart punctuation type.
    pub kind: Option<String>,
    /// Footnote display index.
    pub index: Option<usize>,
    /// Footnote label.
    pub label: Option<String>,
    /// Footnote labels in endnote order.
    pub order: Vec<String>,
    /// Ordered list start number.
    pub start: Option<u64>,
}

/// Everything a [`Component`] receives.
#[derive(Debug)]
pub struct ComponentProps<'a> {
    pub kind: ComponentKind,
    /// Source node. For endnotes this is the document root.
    pub node: &'a Node,
    /// Positional identity among siblings.
    pub key: Option<String>,
    /// Attribute props the default element would get.
    pub props: Props,
    pub inputs: Inputs,
    pub children: Vec<Html>,
}

/// A caller-supplied renderer for one node kind.
pub trait Component: Send + Sync {
    fn render(&self, props: ComponentProps<'_>) -> Html;
}

impl<F> Component for F
where
    F: Fn(ComponentProps<'_>) -> Html + Send + Sync,
{
    fn render(&self, props: ComponentProps<'_>) -> Html {
        self(props)
    }
}

/// Replacement for a kind's default rendering.
#[derive(Clone)]
pub enum Override {
    /// Render as this element tag with attribute props only.
    Tag(String),
    /// Render through a component.
    Component(Arc<dyn Component>),
}

impl fmt::Debug for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            Self::Component(_) => f.write_str("Component(..)"),
        }
    }
}

/// Override map keyed by [`ComponentKind`].
#[derive(Debug, Clone, Default)]
pub struct Components {
    overrides: HashMap<ComponentKind, Override>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `kind` as a plain `tag` element.
    #[must_use]
    pub fn with_tag(mut self, kind: ComponentKind, tag: impl Into<String>) -> Self {
        self.insert(kind, Override::Tag(tag.into()));
        self
    }

    /// Render `kind` through `component`.
    #[must_use]
    pub fn with_component(mut self, kind: ComponentKind, component: impl Component + 'static) -> Self {
        self.insert(kind, Override::Component(Arc::new(component)));
        self
    }

    pub fn insert(&mut self, kind: ComponentKind, value: Override) {
        self.overrides.insert(kind, value);
    }

    /// Override registered for exactly `kind`.
    pub fn get(&self, kind: ComponentKind) -> Option<&Override> {
        self.overrides.get(&kind)
    }

    /// Override for `kind`, falling back to its alias.
    pub fn pick(&self, kind: ComponentKind) -> Option<&Override> {
        self.get(kind)
            .or_else(|| kind.alias().and_then(|alias| self.get(alias)))
    }

    /// Whether `kind` (or its alias) is overridden by a component.
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        matches!(self.pick(kind), Some(Override::Component(_)))
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Build a map of plain tag overrides from `(kind name, tag)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownKind`] for unknown kind names and
    /// [`RenderError::InvalidTag`] for tags that are empty or contain
    /// characters other than ASCII alphanumerics and `-`.
    pub fn from_tag_overrides<I, K, T>(overrides: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
        T: Into<String>,
    {
        let mut components = Self::new();
        for (kind, tag) in overrides {
            let kind: ComponentKind = kind.as_ref().parse()?;
            let tag = tag.into();
            if !is_valid_tag(&tag) {
                return Err(RenderError::InvalidTag {
                    kind: kind.as_str().to_owned(),
                    tag,
                });
            }
            components.insert(kind, Override::Tag(tag));
        }
        Ok(components)
    }
}

/// Check that a string is usable as an element tag name.
pub fn is_valid_tag(tag: &str) -> bool {
    tag.starts_with(|c: char| c.is_ascii_alphabetic())
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
