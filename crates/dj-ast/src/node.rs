//! Node kinds of the djot document tree.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::AstError;

/// Attribute dictionary attached to a node (`{#id .class key=value}`).
pub type Attributes = BTreeMap<String, String>;

/// Label-keyed reference dictionary used for link/image indirection.
pub type References = BTreeMap<String, Reference>;

/// A node of the document tree.
///
/// Variant names map to the parser's snake_case tags. The historically
/// aliased spellings (`mark`/`highlighted`, `superscript`/`supe`,
/// `blockquote`/`block_quote`, `soft_break`/`softbreak`,
/// `hard_break`/`hardbreak`) are kept as distinct variants so overrides can
/// tell them apart.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Node {
    Doc(Box<Doc>),
    Section(Container),
    Div(Container),
    Para(Container),
    Heading(Heading),
    Emph(Container),
    Strong(Container),
    Mark(Container),
    Highlighted(Container),
    Superscript(Container),
    Supe(Container),
    Subscript(Container),
    Insert(Container),
    Delete(Container),
    Span(Container),
    Table(Container),
    Caption(Container),
    Row(Row),
    Cell(Cell),
    FootnoteReference(Literal),
    Footnote(Footnote),
    DoubleQuoted(Container),
    SingleQuoted(Container),
    SmartPunctuation(SmartPunctuation),
    InlineMath(Literal),
    DisplayMath(Literal),
    Code(Literal),
    Verbatim(Literal),
    CodeBlock(CodeBlock),
    RawBlock(Raw),
    RawInline(Raw),
    Symb(Symb),
    Url(Literal),
    Email(Literal),
    Link(Link),
    Image(Link),
    BulletList(List),
    OrderedList(OrderedList),
    ListItem(Container),
    DefinitionList(Container),
    DefinitionListItem(Container),
    Term(Container),
    Definition(Container),
    TaskList(List),
    TaskListItem(TaskListItem),
    Blockquote(Container),
    BlockQuote(Container),
    ThematicBreak(Leaf),
    Str(Literal),
    NonBreakingSpace(Leaf),
    SoftBreak(Leaf),
    Softbreak(Leaf),
    HardBreak(Leaf),
    Hardbreak(Leaf),
    /// Any tag this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// Document root.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Doc {
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
    /// Explicitly authored link/image references.
    #[serde(default)]
    pub references: References,
    /// References generated from headings.
    #[serde(default, rename = "autoReferences")]
    pub auto_references: References,
    /// Footnote bodies keyed by label.
    #[serde(default)]
    pub footnotes: BTreeMap<String, Footnote>,
}

/// Generic container: ordered children plus attributes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, rename = "autoAttributes")]
    pub auto_attributes: Attributes,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Heading {
    pub level: u32,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, rename = "autoAttributes")]
    pub auto_attributes: Attributes,
}

/// Table row. `head` marks a header row.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub head: bool,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub head: bool,
    #[serde(default)]
    pub align: Alignment,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Column alignment of a table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
    Center,
    /// No explicit alignment; also used for unrecognized values.
    #[default]
    #[serde(other)]
    Default,
}

impl Alignment {
    /// Name as written in the tree.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

/// Footnote body. Usually found in [`Doc::footnotes`] rather than inline.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Footnote {
    pub label: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Leaf carrying text: `str`, `code`, `verbatim`, math, autolinks and
/// footnote references (where `text` is the label).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Literal {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SmartPunctuation {
    /// Punctuation type, e.g. `left_double_quote` or `em_dash`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Source text, used when the type is not recognized.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Raw content in a named format (`` `<b>`{=html} ``).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Raw {
    pub format: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Symbol such as `:smile:`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Symb {
    pub alias: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Link or image. Either a direct `destination` or a `reference` label.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Bullet or task list.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct List {
    #[serde(default)]
    pub tight: bool,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct OrderedList {
    #[serde(default)]
    pub tight: bool,
    /// Numbering style token, e.g. `1.`, `(a)`, `i)`.
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TaskListItem {
    #[serde(default)]
    pub checkbox: Checkbox,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Task list checkbox state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkbox {
    Checked,
    #[default]
    Unchecked,
}

impl Checkbox {
    #[must_use]
    pub fn is_checked(self) -> bool {
        self == Self::Checked
    }
}

/// Leaf without content: breaks, rules, non-breaking space.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Leaf {
    #[serde(default)]
    pub attributes: Attributes,
}

/// Target of a reference-style link or image.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Node {
    /// Decode a tree from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::Json`] if the input is not valid JSON or does not
    /// match the tree shape.
    pub fn from_json(json: &str) -> Result<Self, AstError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a tree from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::Json`] if the value does not match the tree shape.
    pub fn from_value(value: serde_json::Value) -> Result<Self, AstError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The node's tag as written by the parser.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Doc(_) => "doc",
            Self::Section(_) => "section",
            Self::Div(_) => "div",
            Self::Para(_) => "para",
            Self::Heading(_) => "heading",
            Self::Emph(_) => "emph",
            Self::Strong(_) => "strong",
            Self::Mark(_) => "mark",
            Self::Highlighted(_) => "highlighted",
            Self::Superscript(_) => "superscript",
            Self::Supe(_) => "supe",
            Self::Subscript(_) => "subscript",
            Self::Insert(_) => "insert",
            Self::Delete(_) => "delete",
            Self::Span(_) => "span",
            Self::Table(_) => "table",
            Self::Caption(_) => "caption",
            Self::Row(_) => "row",
            Self::Cell(_) => "cell",
            Self::FootnoteReference(_) => "footnote_reference",
            Self::Footnote(_) => "footnote",
            Self::DoubleQuoted(_) => "double_quoted",
            Self::SingleQuoted(_) => "single_quoted",
            Self::SmartPunctuation(_) => "smart_punctuation",
            Self::InlineMath(_) => "inline_math",
            Self::DisplayMath(_) => "display_math",
            Self::Code(_) => "code",
            Self::Verbatim(_) => "verbatim",
            Self::CodeBlock(_) => "code_block",
            Self::RawBlock(_) => "raw_block",
            Self::RawInline(_) => "raw_inline",
            Self::Symb(_) => "symb",
            Self::Url(_) => "url",
            Self::Email(_) => "email",
            Self::Link(_) => "link",
            Self::Image(_) => "image",
            Self::BulletList(_) => "bullet_list",
            Self::OrderedList(_) => "ordered_list",
            Self::ListItem(_) => "list_item",
            Self::DefinitionList(_) => "definition_list",
            Self::DefinitionListItem(_) => "definition_list_item",
            Self::Term(_) => "term",
            Self::Definition(_) => "definition",
            Self::TaskList(_) => "task_list",
            Self::TaskListItem(_) => "task_list_item",
            Self::Blockquote(_) => "blockquote",
            Self::BlockQuote(_) => "block_quote",
            Self::ThematicBreak(_) => "thematic_break",
            Self::Str(_) => "str",
            Self::NonBreakingSpace(_) => "non_breaking_space",
            Self::SoftBreak(_) => "soft_break",
            Self::Softbreak(_) => "softbreak",
            Self::HardBreak(_) => "hard_break",
            Self::Hardbreak(_) => "hardbreak",
            Self::Unknown => "unknown",
        }
    }

    /// Ordered children. Empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Doc(doc) => &doc.children,
            Self::Section(c)
            | Self::Div(c)
            | Self::Para(c)
            | Self::Emph(c)
            | Self::Strong(c)
            | Self::Mark(c)
            | Self::Highlighted(c)
            | Self::Superscript(c)
            | Self::Supe(c)
            | Self::Subscript(c)
            | Self::Insert(c)
            | Self::Delete(c)
            | Self::Span(c)
            | Self::Table(c)
            | Self::Caption(c)
            | Self::DoubleQuoted(c)
            | Self::SingleQuoted(c)
            | Self::ListItem(c)
            | Self::DefinitionList(c)
            | Self::DefinitionListItem(c)
            | Self::Term(c)
            | Self::Definition(c)
            | Self::Blockquote(c)
            | Self::BlockQuote(c) => &c.children,
            Self::Heading(h) => &h.children,
            Self::Row(r) => &r.children,
            Self::Cell(c) => &c.children,
            Self::Footnote(f) => &f.children,
            Self::Link(l) | Self::Image(l) => &l.children,
            Self::BulletList(l) | Self::TaskList(l) => &l.children,
            Self::OrderedList(l) => &l.children,
            Self::TaskListItem(t) => &t.children,
            Self::FootnoteReference(_)
            | Self::SmartPunctuation(_)
            | Self::InlineMath(_)
            | Self::DisplayMath(_)
            | Self::Code(_)
            | Self::Verbatim(_)
            | Self::CodeBlock(_)
            | Self::RawBlock(_)
            | Self::RawInline(_)
            | Self::Symb(_)
            | Self::Url(_)
            | Self::Email(_)
            | Self::ThematicBreak(_)
            | Self::Str(_)
            | Self::NonBreakingSpace(_)
            | Self::SoftBreak(_)
            | Self::Softbreak(_)
            | Self::HardBreak(_)
            | Self::Hardbreak(_)
            | Self::Unknown => &[],
        }
    }

    /// Explicit attributes, if the node kind carries them.
    #[must_use]
    pub fn attributes(&self) -> Option<&Attributes> {
        let attributes = match self {
            Self::Doc(doc) => &doc.attributes,
            Self::Section(c)
            | Self::Div(c)
            | Self::Para(c)
            | Self::Emph(c)
            | Self::Strong(c)
            | Self::Mark(c)
            | Self::Highlighted(c)
            | Self::Superscript(c)
            | Self::Supe(c)
            | Self::Subscript(c)
            | Self::Insert(c)
            | Self::Delete(c)
            | Self::Span(c)
            | Self::Table(c)
            | Self::Caption(c)
            | Self::DoubleQuoted(c)
            | Self::SingleQuoted(c)
            | Self::ListItem(c)
            | Self::DefinitionList(c)
            | Self::DefinitionListItem(c)
            | Self::Term(c)
            | Self::Definition(c)
            | Self::Blockquote(c)
            | Self::BlockQuote(c) => &c.attributes,
            Self::Heading(h) => &h.attributes,
            Self::Row(r) => &r.attributes,
            Self::Cell(c) => &c.attributes,
            Self::Footnote(f) => &f.attributes,
            Self::FootnoteReference(l)
            | Self::InlineMath(l)
            | Self::DisplayMath(l)
            | Self::Code(l)
            | Self::Verbatim(l)
            | Self::Url(l)
            | Self::Email(l)
            | Self::Str(l) => &l.attributes,
            Self::SmartPunctuation(s) => &s.attributes,
            Self::CodeBlock(c) => &c.attributes,
            Self::RawBlock(r) | Self::RawInline(r) => &r.attributes,
            Self::Symb(s) => &s.attributes,
            Self::Link(l) | Self::Image(l) => &l.attributes,
            Self::BulletList(l) | Self::TaskList(l) => &l.attributes,
            Self::OrderedList(l) => &l.attributes,
            Self::TaskListItem(t) => &t.attributes,
            Self::ThematicBreak(l)
            | Self::NonBreakingSpace(l)
            | Self::SoftBreak(l)
            | Self::Softbreak(l)
            | Self::HardBreak(l)
            | Self::Hardbreak(l) => &l.attributes,
            Self::Unknown => return None,
        };
        Some(attributes)
    }

    /// Auto-generated attributes (e.g. heading-derived section ids).
    #[must_use]
    pub fn auto_attributes(&self) -> Option<&Attributes> {
        match self {
            Self::Section(c)
            | Self::Div(c)
            | Self::Para(c)
            | Self::Emph(c)
            | Self::Strong(c)
            | Self::Mark(c)
            | Self::Highlighted(c)
            | Self::Superscript(c)
            | Self::Supe(c)
            | Self::Subscript(c)
            | Self::Insert(c)
            | Self::Delete(c)
            | Self::Span(c)
            | Self::Table(c)
            | Self::Caption(c)
            | Self::DoubleQuoted(c)
            | Self::SingleQuoted(c)
            | Self::ListItem(c)
            | Self::DefinitionList(c)
            | Self::DefinitionListItem(c)
            | Self::Term(c)
            | Self::Definition(c)
            | Self::Blockquote(c)
            | Self::BlockQuote(c) => Some(&c.auto_attributes),
            Self::Heading(h) => Some(&h.auto_attributes),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_doc_with_dictionaries() {
        let node = Node::from_value(json!({
            "tag": "doc",
            "references": {
                "foo": {"tag": "reference", "label": "foo", "destination": "/foo"}
            },
            "autoReferences": {
                "Intro": {"tag": "reference", "label": "Intro", "destination": "#Intro"}
            },
            "footnotes": {
                "a": {"tag": "footnote", "label": "a", "children": [
                    {"tag": "para", "children": [{"tag": "str", "text": "note"}]}
                ]}
            },
            "children": [
                {"tag": "para", "children": [{"tag": "footnote_reference", "text": "a"}]}
            ]
        }))
        .unwrap();

        let Node::Doc(doc) = node else {
            panic!("expected doc");
        };
        assert_eq!(doc.references["foo"].destination, "/foo");
        assert_eq!(doc.auto_references["Intro"].destination, "#Intro");
        assert_eq!(doc.footnotes["a"].children.len(), 1);
        assert_eq!(doc.children[0].children()[0].tag(), "footnote_reference");
    }

    #[test]
    fn test_decode_unknown_tag() {
        let node = Node::from_json(r#"{"tag":"future_thing","children":[]}"#).unwrap();
        assert_eq!(node, Node::Unknown);
        assert!(node.attributes().is_none());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_alias_tags_stay_distinct() {
        let soft = Node::from_json(r#"{"tag":"softbreak"}"#).unwrap();
        let soft_underscore = Node::from_json(r#"{"tag":"soft_break"}"#).unwrap();
        assert_eq!(soft.tag(), "softbreak");
        assert_eq!(soft_underscore.tag(), "soft_break");

        let quote = Node::from_json(r#"{"tag":"block_quote","children":[]}"#).unwrap();
        assert_eq!(quote.tag(), "block_quote");
    }

    #[test]
    fn test_decode_cell_alignment_and_checkbox() {
        let cell = Node::from_json(r#"{"tag":"cell","head":true,"align":"right","children":[]}"#)
            .unwrap();
        let Node::Cell(cell) = cell else {
            panic!("expected cell");
        };
        assert!(cell.head);
        assert_eq!(cell.align, Alignment::Right);

        let odd = Node::from_json(r#"{"tag":"cell","align":"justify","children":[]}"#).unwrap();
        let Node::Cell(odd) = odd else {
            panic!("expected cell");
        };
        assert_eq!(odd.align, Alignment::Default);

        let item = Node::from_json(r#"{"tag":"task_list_item","checkbox":"checked","children":[]}"#)
            .unwrap();
        let Node::TaskListItem(item) = item else {
            panic!("expected task list item");
        };
        assert!(item.checkbox.is_checked());
    }

    #[test]
    fn test_attributes_and_auto_attributes() {
        let node = Node::from_value(json!({
            "tag": "section",
            "attributes": {"class": "intro"},
            "autoAttributes": {"id": "Intro"},
            "children": []
        }))
        .unwrap();
        assert_eq!(node.attributes().unwrap()["class"], "intro");
        assert_eq!(node.auto_attributes().unwrap()["id"], "Intro");
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_smart_punctuation_type_field() {
        let node = Node::from_json(r#"{"tag":"smart_punctuation","type":"em_dash","text":"---"}"#)
            .unwrap();
        let Node::SmartPunctuation(punct) = node else {
            panic!("expected smart punctuation");
        };
        assert_eq!(punct.kind, "em_dash");
        assert_eq!(punct.text, "---");
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = Node::from_json("{not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid document tree"));
    }

    #[test]
    fn test_ignores_source_positions() {
        let node = Node::from_json(
            r#"{"tag":"str","text":"x","pos":{"start":{"line":1,"col":1,"offset":0}}}"#,
        )
        .unwrap();
        assert_eq!(node.tag(), "str");
        assert!(node.children().is_empty());
        assert!(node.attributes().unwrap().is_empty());
    }
}
