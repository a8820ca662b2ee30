//! Render dispatcher.
//!
//! [`DocumentRenderer`] walks a document tree depth-first and produces one
//! [`Html`] node per tree node, consulting the override map for every kind.
//! Rendering a `doc` node builds a fresh [`ResolverState`] for footnote
//! numbering and link references and appends the endnotes section.

use std::mem;

use dj_ast::{Checkbox, Doc, Footnote, Node};

use crate::components::{ComponentKind, ComponentProps, Components, Inputs, Override};
use crate::element::{Element, Fragment, Html, Props, Style};
use crate::grouping::{TableGrouper, item_content};
use crate::raw_html::sanitize_fragment;
use crate::resolver::ResolverState;
use crate::util::{
    DOUBLE_QUOTES, SINGLE_QUOTES, alt_text, apply_attributes, clamp_heading_level, merge_props,
    ordered_list_type, smart_punctuation, text_align,
};

/// Text of the endnote backlink: a leftwards hooked arrow in text
/// presentation.
const BACKLINK_TEXT: &str = "\u{21a9}\u{fe0e}";

/// Renders document trees to [`Html`].
///
/// # Example
///
/// ```
/// use dj_ast::Node;
/// use dj_renderer::{ComponentKind, Components, DocumentRenderer};
///
/// let doc = Node::from_json(
///     r#"{"tag":"doc","children":[{"tag":"para","children":[{"tag":"mark","children":[{"tag":"str","text":"hi"}]}]}]}"#,
/// )
/// .unwrap();
///
/// let renderer = DocumentRenderer::new()
///     .with_components(Components::new().with_tag(ComponentKind::Highlighted, "span"));
/// assert_eq!(renderer.render_to_string(&doc), "<p><span>hi</span></p>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    components: Components,
}

impl DocumentRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `components` as the override map.
    #[must_use]
    pub fn with_components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Render a node. Returns `None` when the node renders to nothing
    /// (unknown kinds, non-HTML raw content, empty captions).
    pub fn render(&self, node: &Node) -> Option<Html> {
        let mut walker = Walker {
            components: &self.components,
            state: ResolverState::default(),
        };
        walker.render(node, None, None)
    }

    /// Render a node straight to markup.
    pub fn render_to_string(&self, node: &Node) -> String {
        self.render(node)
            .as_ref()
            .map(Html::to_markup)
            .unwrap_or_default()
    }
}

/// Output of one node before the override decision.
struct Emit<'a> {
    kind: ComponentKind,
    node: &'a Node,
    key: Option<String>,
    props: Props,
    inputs: Inputs,
    children: Vec<Html>,
}

impl<'a> Emit<'a> {
    fn new(kind: ComponentKind, node: &'a Node, key: Option<String>) -> Self {
        Self {
            kind,
            node,
            key,
            props: merge_props(node, Props::new()),
            inputs: Inputs::default(),
            children: Vec::new(),
        }
    }

    /// Kind-specific props; node attributes are merged on top.
    fn extra(mut self, extra: Props) -> Self {
        self.props = merge_props(self.node, extra);
        self
    }

    fn inputs(mut self, inputs: Inputs) -> Self {
        self.inputs = inputs;
        self
    }

    fn children(mut self, children: Vec<Html>) -> Self {
        self.children = children;
        self
    }

    fn into_element(self, tag: &str) -> Html {
        Element::new(tag)
            .with_key_opt(self.key)
            .with_props(self.props)
            .with_children(self.children)
            .into()
    }

    fn into_fragment(self) -> Html {
        Fragment::new(self.children).with_key_opt(self.key).into()
    }
}

/// Attach `key` to a component result that did not set its own.
fn with_default_key(mut html: Html, key: Option<String>) -> Html {
    match &mut html {
        Html::Element(el) if el.key.is_none() => el.key = key,
        Html::Fragment(f) if f.key.is_none() => f.key = key,
        _ => {}
    }
    html
}

/// Append the backlink into the last rendered child, or as the only child.
fn append_backlink(content: &mut Vec<Html>, backlink: Html) {
    match content.last_mut() {
        Some(Html::Element(el)) => el.children.push(backlink),
        Some(Html::Fragment(f)) => f.children.push(backlink),
        _ => content.push(backlink),
    }
}

/// Recursive render pass over one tree.
struct Walker<'r, 'n> {
    components: &'r Components,
    state: ResolverState<'n>,
}

impl<'n> Walker<'_, 'n> {
    /// Render `node`. `tight` is the tightness of the parent list when the
    /// node is a list item.
    #[allow(clippy::too_many_lines)]
    fn render(&mut self, node: &'n Node, key: Option<String>, tight: Option<bool>) -> Option<Html> {
        let Some(kind) = ComponentKind::of(node) else {
            tracing::trace!(tag = node.tag(), "Skipped unknown node kind");
            return None;
        };

        match node {
            Node::Doc(doc) => Some(self.render_doc(node, doc, key)),
            Node::Section(_) | Node::DefinitionListItem(_) => {
                let children = self.render_children(node.children(), None);
                let emit = Emit::new(kind, node, key).children(children);
                Some(match self.components.pick(kind) {
                    Some(o) => self.apply(o, emit),
                    None => emit.into_fragment(),
                })
            }
            Node::Div(_) => self.container(kind, node, key, "div"),
            Node::Para(_) => self.container(kind, node, key, "p"),
            Node::Heading(heading) => {
                let level = clamp_heading_level(heading.level);
                let children = self.render_children(node.children(), None);
                let emit = Emit::new(kind, node, key)
                    .inputs(Inputs {
                        level: Some(level),
                        ..Inputs::default()
                    })
                    .children(children);
                Some(self.emit(emit, &format!("h{level}")))
            }
            Node::Emph(_) => self.container(kind, node, key, "em"),
            Node::Strong(_) => self.container(kind, node, key, "strong"),
            Node::Mark(_) | Node::Highlighted(_) => self.container(kind, node, key, "mark"),
            Node::Superscript(_) | Node::Supe(_) => self.container(kind, node, key, "sup"),
            Node::Subscript(_) => self.container(kind, node, key, "sub"),
            Node::Insert(_) => self.container(kind, node, key, "ins"),
            Node::Delete(_) => self.container(kind, node, key, "del"),
            Node::Span(_) => self.container(kind, node, key, "span"),
            Node::Blockquote(_) | Node::BlockQuote(_) => {
                self.container(kind, node, key, "blockquote")
            }
            Node::DefinitionList(_) => self.container(kind, node, key, "dl"),
            Node::Term(_) => self.container(kind, node, key, "dt"),
            Node::Definition(_) => self.container(kind, node, key, "dd"),
            Node::Table(_) => {
                let mut grouper = TableGrouper::new();
                for (index, child) in node.children().iter().enumerate() {
                    let rendered = self.render(child, Some(index.to_string()), None);
                    grouper.push(child, rendered);
                }
                let emit = Emit::new(kind, node, key).children(grouper.finish());
                Some(self.emit(emit, "table"))
            }
            Node::Caption(_) => {
                let children = self.render_children(node.children(), None);
                let overridden = self.components.pick(kind);
                if overridden.is_none() && children.is_empty() {
                    return None;
                }
                let emit = Emit::new(kind, node, key).children(children);
                Some(self.emit(emit, "caption"))
            }
            Node::Row(row) => {
                let children = self.render_children(node.children(), None);
                let emit = Emit::new(kind, node, key)
                    .inputs(Inputs {
                        head: Some(row.head),
                        ..Inputs::default()
                    })
                    .children(children);
                Some(self.emit(emit, "tr"))
            }
            Node::Cell(cell) => {
                let children = self.render_children(node.children(), None);
                let mut extra = Props::new();
                if let Some(align) = text_align(cell.align) {
                    extra.insert("style", Style::new().with("textAlign", align));
                }
                let emit = Emit::new(kind, node, key)
                    .extra(extra)
                    .inputs(Inputs {
                        align: Some(cell.align),
                        head: Some(cell.head),
                        ..Inputs::default()
                    })
                    .children(children);
                Some(self.emit(emit, if cell.head { "th" } else { "td" }))
            }
            Node::FootnoteReference(reference) => {
                let label = &reference.text;
                let anchor = self.state.record_reference(label);
                let sup = Element::new("sup").with_child(anchor.index.to_string());
                let emit = Emit::new(kind, node, key)
                    .extra(
                        Props::new()
                            .with("href", anchor.href)
                            .with("id", anchor.id)
                            .with("role", "doc-noteref"),
                    )
                    .inputs(Inputs {
                        index: Some(anchor.index),
                        label: Some(label.clone()),
                        ..Inputs::default()
                    })
                    .children(vec![sup.into()]);
                Some(self.emit(emit, "a"))
            }
            Node::Footnote(footnote) => {
                let index = self.state.index_of(&footnote.label).unwrap_or(0);
                let children = self.render_children(node.children(), None);
                let emit = Emit::new(kind, node, key)
                    .inputs(Inputs {
                        index: Some(index),
                        label: Some(footnote.label.clone()),
                        ..Inputs::default()
                    })
                    .children(children);
                Some(self.emit(emit, "li"))
            }
            Node::DoubleQuoted(_) | Node::SingleQuoted(_) => {
                let (open, close) = if matches!(node, Node::DoubleQuoted(_)) {
                    DOUBLE_QUOTES
                } else {
                    SINGLE_QUOTES
                };
                let mut children = vec![Html::text(open)];
                children.extend(self.render_children(node.children(), None));
                children.push(Html::text(close));
                let emit = Emit::new(kind, node, key).children(children);
                Some(match self.components.pick(kind) {
                    Some(o) => self.apply(o, emit),
                    None => emit.into_fragment(),
                })
            }
            Node::SmartPunctuation(punct) => {
                let value = smart_punctuation(&punct.kind, &punct.text).to_owned();
                let inputs = Inputs {
                    kind: Some(punct.kind.clone()),
                    value: Some(value.clone()),
                    ..Inputs::default()
                };
                Some(self.text_like(kind, node, key, value, inputs))
            }
            Node::InlineMath(math) => Some(self.math(kind, node, key, &math.text, false)),
            Node::DisplayMath(math) => Some(self.math(kind, node, key, &math.text, true)),
            Node::Code(code) | Node::Verbatim(code) => {
                let emit = Emit::new(kind, node, key)
                    .inputs(Inputs {
                        value: Some(code.text.clone()),
                        ..Inputs::default()
                    })
                    .children(vec![Html::text(code.text.as_str())]);
                Some(self.emit(emit, "code"))
            }
            Node::CodeBlock(block) => {
                let mut code = Element::new("code");
                if let Some(lang) = block.lang.as_deref().filter(|l| !l.is_empty()) {
                    code = code.with_prop("className", format!("language-{lang}"));
                }
                let emit = Emit::new(kind, node, key)
                    .inputs(Inputs {
                        language: block.lang.clone(),
                        value: Some(block.text.clone()),
                        ..Inputs::default()
                    })
                    .children(vec![code.with_child(block.text.as_str()).into()]);
                Some(self.emit(emit, "pre"))
            }
            Node::RawBlock(raw) | Node::RawInline(raw) => {
                let prefix = if matches!(node, Node::RawBlock(_)) {
                    "raw-block"
                } else {
                    "raw-inline"
                };
                let html_children = (raw.format == "html").then(|| {
                    sanitize_fragment(
                        &raw.text,
                        &format!("{prefix}-{}", key.as_deref().unwrap_or("node")),
                    )
                });

                match self.components.pick(kind) {
                    Some(o) => {
                        let children =
                            html_children.unwrap_or_else(|| vec![Html::text(raw.text.as_str())]);
                        let emit = Emit::new(kind, node, key)
                            .inputs(Inputs {
                                format: Some(raw.format.clone()),
                                value: Some(raw.text.clone()),
                                ..Inputs::default()
                            })
                            .children(children);
                        Some(self.apply(o, emit))
                    }
                    None => {
                        html_children.map(|children| Fragment::new(children).with_key_opt(key).into())
                    }
                }
            }
            Node::Symb(symb) => {
                let value = format!(":{}:", symb.alias);
                let inputs = Inputs {
                    alias: Some(symb.alias.clone()),
                    value: Some(value.clone()),
                    ..Inputs::default()
                };
                Some(self.text_like(kind, node, key, value, inputs))
            }
            Node::Url(url) => Some(self.autolink(kind, node, key, &url.text, url.text.clone())),
            Node::Email(email) => {
                let href = format!("mailto:{}", email.text);
                Some(self.autolink(kind, node, key, &email.text, href))
            }
            Node::Link(link) | Node::Image(link) => {
                let reference = if link.destination.is_none() {
                    link.reference
                        .as_deref()
                        .and_then(|label| self.state.lookup(label))
                } else {
                    None
                };
                let href = self
                    .state
                    .resolve_destination(link.destination.as_deref(), link.reference.as_deref())
                    .map(str::to_owned);

                let mut extra = Props::new();
                let emit = if matches!(node, Node::Image(_)) {
                    let alt = alt_text(&link.children);
                    if !alt.is_empty() {
                        extra.insert("alt", alt.as_str());
                    }
                    if let Some(src) = &href {
                        extra.insert("src", src.as_str());
                    }
                    if let Some(reference) = reference {
                        apply_attributes(&mut extra, &reference.attributes);
                    }
                    Emit::new(kind, node, key).extra(extra).inputs(Inputs {
                        alt: (!alt.is_empty()).then_some(alt),
                        href,
                        ..Inputs::default()
                    })
                } else {
                    if let Some(href) = &href {
                        extra.insert("href", href.as_str());
                    }
                    if let Some(reference) = reference {
                        apply_attributes(&mut extra, &reference.attributes);
                    }
                    let children = self.render_children(&link.children, None);
                    Emit::new(kind, node, key)
                        .extra(extra)
                        .inputs(Inputs {
                            href,
                            ..Inputs::default()
                        })
                        .children(children)
                };
                let tag = if matches!(node, Node::Image(_)) { "img" } else { "a" };
                Some(self.emit(emit, tag))
            }
            Node::BulletList(list) => {
                let children = self.render_children(&list.children, Some(list.tight));
                let emit = Emit::new(kind, node, key)
                    .inputs(Inputs {
                        tight: Some(list.tight),
                        ..Inputs::default()
                    })
                    .children(children);
                Some(self.emit(emit, "ul"))
            }
            Node::TaskList(list) => {
                let children = self.render_children(&list.children, Some(list.tight));
                let emit = Emit::new(kind, node, key)
                    .extra(Props::new().with("className", "task-list"))
                    .inputs(Inputs {
                        tight: Some(list.tight),
                        ..Inputs::default()
                    })
                    .children(children);
                Some(self.emit(emit, "ul"))
            }
            Node::OrderedList(list) => {
                let mut extra = Props::new();
                if let Some(start) = list.start.filter(|&start| start != 1) {
                    extra.insert("start", start);
                }
                if let Some(list_type) = ordered_list_type(list.style.as_deref()) {
                    extra.insert("type", list_type);
                }
                let children = self.render_children(&list.children, Some(list.tight));
                let emit = Emit::new(kind, node, key)
                    .extra(extra)
                    .inputs(Inputs {
                        start: list.start,
                        tight: Some(list.tight),
                        ..Inputs::default()
                    })
                    .children(children);
                Some(self.emit(emit, "ol"))
            }
            Node::ListItem(_) => Some(self.list_item(kind, node, key, tight, None)),
            Node::TaskListItem(item) => {
                Some(self.list_item(kind, node, key, tight, Some(item.checkbox)))
            }
            Node::ThematicBreak(_) => Some(self.emit(Emit::new(kind, node, key), "hr")),
            Node::HardBreak(_) | Node::Hardbreak(_) => {
                Some(self.emit(Emit::new(kind, node, key), "br"))
            }
            Node::Str(text) => {
                let inputs = Inputs {
                    value: Some(text.text.clone()),
                    ..Inputs::default()
                };
                Some(self.text_like(kind, node, key, text.text.clone(), inputs))
            }
            Node::NonBreakingSpace(_) => {
                let value = "\u{a0}".to_owned();
                let inputs = Inputs {
                    value: Some(value.clone()),
                    ..Inputs::default()
                };
                Some(self.text_like(kind, node, key, value, inputs))
            }
            Node::SoftBreak(_) | Node::Softbreak(_) => {
                Some(self.text_like(kind, node, key, "\n".to_owned(), Inputs::default()))
            }
            Node::Unknown => None,
        }
    }

    /// Render children with positional keys, dropping those that render to
    /// nothing.
    fn render_children(&mut self, children: &'n [Node], tight: Option<bool>) -> Vec<Html> {
        children
            .iter()
            .enumerate()
            .filter_map(|(index, child)| self.render(child, Some(index.to_string()), tight))
            .collect()
    }

    /// Plain container rendered as `tag` by default.
    fn container(
        &mut self,
        kind: ComponentKind,
        node: &'n Node,
        key: Option<String>,
        tag: &str,
    ) -> Option<Html> {
        let children = self.render_children(node.children(), None);
        let emit = Emit::new(kind, node, key).children(children);
        Some(self.emit(emit, tag))
    }

    /// Leaf that renders as bare text unless overridden.
    fn text_like(
        &self,
        kind: ComponentKind,
        node: &Node,
        key: Option<String>,
        value: String,
        inputs: Inputs,
    ) -> Html {
        match self.components.pick(kind) {
            Some(o) => {
                let emit = Emit::new(kind, node, key)
                    .inputs(inputs)
                    .children(vec![Html::text(value)]);
                self.apply(o, emit)
            }
            None => Html::text(value),
        }
    }

    fn math(
        &self,
        kind: ComponentKind,
        node: &Node,
        key: Option<String>,
        value: &str,
        display: bool,
    ) -> Html {
        let (class, text) = if display {
            ("math display", format!("\\[{value}\\]"))
        } else {
            ("math inline", format!("\\({value}\\)"))
        };
        let emit = Emit::new(kind, node, key)
            .extra(Props::new().with("className", class))
            .inputs(Inputs {
                value: Some(value.to_owned()),
                ..Inputs::default()
            })
            .children(vec![Html::text(text)]);
        self.emit(emit, "span")
    }

    fn autolink(
        &self,
        kind: ComponentKind,
        node: &Node,
        key: Option<String>,
        text: &str,
        href: String,
    ) -> Html {
        let emit = Emit::new(kind, node, key)
            .extra(Props::new().with("href", href.as_str()))
            .inputs(Inputs {
                href: Some(href),
                value: Some(text.to_owned()),
                ..Inputs::default()
            })
            .children(vec![Html::text(text)]);
        self.emit(emit, "a")
    }

    /// List or task list item. Tight-list unwrapping is skipped when the
    /// item kind is rendered by a component, which gets `tight` instead.
    fn list_item(
        &mut self,
        kind: ComponentKind,
        node: &'n Node,
        key: Option<String>,
        tight: Option<bool>,
        checkbox: Option<Checkbox>,
    ) -> Html {
        let component = self.components.has_component(kind);
        let content = if component {
            node.children()
        } else {
            item_content(node.children(), tight == Some(true))
        };

        let mut children = Vec::with_capacity(content.len() + 1);
        if let Some(checkbox) = checkbox
            && !component
        {
            let mut input = Element::new("input")
                .with_key("checkbox")
                .with_prop("type", "checkbox");
            if checkbox.is_checked() {
                input = input.with_prop("checked", true);
            }
            children.push(input.with_prop("disabled", true).into());
        }
        children.extend(self.render_children(content, None));

        let emit = Emit::new(kind, node, key)
            .inputs(Inputs {
                checkbox,
                tight,
                ..Inputs::default()
            })
            .children(children);
        self.emit(emit, "li")
    }

    fn render_doc(&mut self, node: &'n Node, doc: &'n Doc, key: Option<String>) -> Html {
        let outer = mem::replace(&mut self.state, ResolverState::build(doc));
        tracing::debug!(footnotes = self.state.order().len(), "Rendering document");

        let mut children = self.render_children(&doc.children, None);
        children.extend(self.render_endnotes(node, doc));
        self.state = outer;

        let emit = Emit::new(ComponentKind::Doc, node, key).children(children);
        match self.components.pick(ComponentKind::Doc) {
            Some(o) => self.apply(o, emit),
            None => emit.into_fragment(),
        }
    }

    /// Endnotes section: one item per footnote label in index order.
    ///
    /// Footnotes referenced only from other footnote bodies get indices while
    /// the bodies render and are picked up by the same loop. Defined but
    /// unreferenced footnotes follow in label order.
    fn render_endnotes(&mut self, node: &'n Node, doc: &'n Doc) -> Option<Html> {
        let mut items = Vec::new();
        let mut next = 0;
        let mut defined_added = false;
        loop {
            while next < self.state.order().len() {
                let label = self.state.order()[next].clone();
                next += 1;
                items.push(self.render_endnote(doc, &label, next));
            }
            if defined_added {
                break;
            }
            defined_added = true;
            for label in doc.footnotes.keys() {
                self.state.ensure_index(label);
            }
        }

        if items.is_empty() {
            return None;
        }
        tracing::debug!(count = items.len(), "Synthesized endnotes");

        let children = vec![
            Element::new("hr").with_key("hr").into(),
            Element::new("ol")
                .with_key("ol")
                .with_children(items)
                .into(),
        ];
        let emit = Emit {
            kind: ComponentKind::Endnotes,
            node,
            key: Some("endnotes".to_owned()),
            props: Props::new().with("role", "doc-endnotes"),
            inputs: Inputs {
                order: self.state.order().to_vec(),
                ..Inputs::default()
            },
            children,
        };
        Some(self.emit(emit, "section"))
    }

    fn render_endnote(&mut self, doc: &'n Doc, label: &str, index: usize) -> Html {
        let body: &'n [Node] = doc
            .footnotes
            .get(label)
            .map_or(&[][..], |f| f.children.as_slice());
        let mut content = self.render_children(body, None);

        let target = self.state.backlink_target(label, index);
        let backlink = Element::new("a")
            .with_prop("href", format!("#{target}"))
            .with_prop("role", "doc-backlink")
            .with_child(BACKLINK_TEXT);
        append_backlink(&mut content, backlink.into());

        let footnote = doc.footnotes.get(label).cloned().unwrap_or_else(|| Footnote {
            label: label.to_owned(),
            ..Footnote::default()
        });
        let footnote = Node::Footnote(footnote);
        let emit = Emit::new(ComponentKind::Footnote, &footnote, Some(label.to_owned()))
            .extra(Props::new().with("id", format!("fn{index}")))
            .inputs(Inputs {
                index: Some(index),
                label: Some(label.to_owned()),
                ..Inputs::default()
            })
            .children(content);
        self.emit(emit, "li")
    }

    /// Render through the override for the kind, or as `default_tag`.
    fn emit(&self, emit: Emit<'_>, default_tag: &str) -> Html {
        match self.components.pick(emit.kind) {
            Some(o) => self.apply(o, emit),
            None => emit.into_element(default_tag),
        }
    }

    fn apply(&self, o: &Override, emit: Emit<'_>) -> Html {
        match o {
            Override::Tag(tag) => emit.into_element(tag),
            Override::Component(component) => {
                let key = emit.key.clone();
                let html = component.render(ComponentProps {
                    kind: emit.kind,
                    node: emit.node,
                    key: emit.key,
                    props: emit.props,
                    inputs: emit.inputs,
                    children: emit.children,
                });
                with_default_key(html, key)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn render(value: serde_json::Value) -> String {
        DocumentRenderer::new().render_to_string(&Node::from_value(value).unwrap())
    }

    fn render_with(value: serde_json::Value, components: Components) -> String {
        DocumentRenderer::new()
            .with_components(components)
            .render_to_string(&Node::from_value(value).unwrap())
    }

    fn str_node(text: &str) -> serde_json::Value {
        json!({"tag": "str", "text": text})
    }

    #[test]
    fn test_basic_blocks() {
        assert_eq!(
            render(json!({"tag": "para", "children": [str_node("paragraph")]})),
            "<p>paragraph</p>"
        );
        assert_eq!(
            render(json!({"tag": "heading", "level": 2, "children": [str_node("title")]})),
            "<h2>title</h2>"
        );
        assert_eq!(
            render(json!({"tag": "heading", "level": 12, "children": []})),
            "<h6></h6>"
        );
        assert_eq!(render(json!({"tag": "thematic_break"})), "<hr/>");
        assert_eq!(
            render(json!({"tag": "blockquote", "children": [
                {"tag": "para", "children": [str_node("quote")]}
            ]})),
            "<blockquote><p>quote</p></blockquote>"
        );
    }

    #[test]
    fn test_inline_containers() {
        let cases = [
            ("emph", "em"),
            ("strong", "strong"),
            ("mark", "mark"),
            ("highlighted", "mark"),
            ("superscript", "sup"),
            ("supe", "sup"),
            ("subscript", "sub"),
            ("insert", "ins"),
            ("delete", "del"),
            ("span", "span"),
        ];
        for (tag, element) in cases {
            assert_eq!(
                render(json!({"tag": tag, "children": [str_node("x")]})),
                format!("<{element}>x</{element}>")
            );
        }
    }

    #[test]
    fn test_code_and_math() {
        assert_eq!(
            render(json!({"tag": "code", "text": "x < y"})),
            "<code>x &lt; y</code>"
        );
        assert_eq!(
            render(json!({"tag": "verbatim", "text": "v"})),
            "<code>v</code>"
        );
        assert_eq!(
            render(json!({"tag": "code_block", "lang": "ts", "text": "const x = 1;"})),
            r#"<pre><code class="language-ts">const x = 1;</code></pre>"#
        );
        assert_eq!(
            render(json!({"tag": "code_block", "text": "plain"})),
            "<pre><code>plain</code></pre>"
        );
        assert_eq!(
            render(json!({"tag": "inline_math", "text": "x^2"})),
            r#"<span class="math inline">\(x^2\)</span>"#
        );
        assert_eq!(
            render(json!({"tag": "display_math", "text": "y"})),
            r#"<span class="math display">\[y\]</span>"#
        );
    }

    #[test]
    fn test_text_leaves() {
        assert_eq!(
            render(json!({"tag": "para", "children": [
                str_node("A"),
                {"tag": "non_breaking_space"},
                str_node("B"),
                {"tag": "softbreak"},
                {"tag": "symb", "alias": "smile"},
                {"tag": "hard_break"},
                {"tag": "smart_punctuation", "type": "em_dash", "text": "---"},
                {"tag": "smart_punctuation", "type": "mystery", "text": "?!"}
            ]})),
            "<p>A\u{a0}B\n:smile:<br/>\u{2014}?!</p>"
        );
    }

    #[test]
    fn test_quoted() {
        assert_eq!(
            render(json!({"tag": "double_quoted", "children": [
                str_node("a"),
                {"tag": "single_quoted", "children": [str_node("b")]}
            ]})),
            "\u{201c}a\u{2018}b\u{2019}\u{201d}"
        );
    }

    #[test]
    fn test_autolinks() {
        assert_eq!(
            render(json!({"tag": "para", "children": [
                {"tag": "url", "text": "https://pandoc.org/lua-filters"},
                {"tag": "softbreak"},
                {"tag": "email", "text": "me@example.com"}
            ]})),
            "<p><a href=\"https://pandoc.org/lua-filters\">https://pandoc.org/lua-filters</a>\n<a href=\"mailto:me@example.com\">me@example.com</a></p>"
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            render(json!({"tag": "link", "destination": "https://example.com",
                "children": [str_node("example")]})),
            r#"<a href="https://example.com">example</a>"#
        );
        assert_eq!(
            render(json!({"tag": "image", "destination": "/logo.png",
                "children": [str_node("logo")]})),
            r#"<img alt="logo" src="/logo.png"/>"#
        );
        assert_eq!(
            render(json!({"tag": "link", "reference": "missing", "children": [str_node("x")]})),
            "<a>x</a>"
        );
        assert_eq!(
            render(json!({"tag": "image", "children": []})),
            "<img/>"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render(json!({"tag": "bullet_list", "tight": true, "children": [
                {"tag": "list_item", "children": [str_node("one")]},
                {"tag": "list_item", "children": [str_node("two")]}
            ]})),
            "<ul><li>one</li><li>two</li></ul>"
        );
        assert_eq!(
            render(json!({"tag": "ordered_list", "start": 3, "children": [
                {"tag": "list_item", "children": [str_node("step")]}
            ]})),
            r#"<ol start="3"><li>step</li></ol>"#
        );
        assert_eq!(
            render(json!({"tag": "ordered_list", "start": 1, "style": "a)", "children": []})),
            r#"<ol type="a"></ol>"#
        );
    }

    #[test]
    fn test_definition_list() {
        assert_eq!(
            render(json!({"tag": "definition_list", "children": [
                {"tag": "definition_list_item", "children": [
                    {"tag": "term", "children": [str_node("orange")]},
                    {"tag": "definition", "children": [
                        {"tag": "para", "children": [str_node("A citrus fruit.")]}
                    ]}
                ]}
            ]})),
            "<dl><dt>orange</dt><dd><p>A citrus fruit.</p></dd></dl>"
        );
    }

    #[test]
    fn test_task_lists() {
        let loose = json!({"tag": "task_list", "tight": false, "children": [
            {"tag": "task_list_item", "checkbox": "unchecked", "children": [
                {"tag": "para", "children": [str_node("one")]}
            ]},
            {"tag": "task_list_item", "checkbox": "checked", "children": [
                {"tag": "para", "children": [str_node("two")]}
            ]}
        ]});
        assert_eq!(
            render(loose),
            r#"<ul class="task-list"><li><input type="checkbox" disabled=""/><p>one</p></li><li><input type="checkbox" checked="" disabled=""/><p>two</p></li></ul>"#
        );
    }

    #[test]
    fn test_raw_nodes() {
        assert_eq!(
            render(json!({"tag": "raw_inline", "format": "html", "text": "<b onclick=\"x\">b</b>"})),
            "<b>b</b>"
        );
        assert_eq!(
            render(json!({"tag": "raw_block", "format": "latex", "text": "\\LaTeX"})),
            ""
        );
        assert!(
            DocumentRenderer::new()
                .render(&Node::from_value(json!({"tag": "raw_block", "format": "latex", "text": "x"})).unwrap())
                .is_none()
        );
    }

    #[test]
    fn test_raw_tag_override_gets_text() {
        let components = Components::new().with_tag(ComponentKind::RawBlock, "pre");
        assert_eq!(
            render_with(
                json!({"tag": "raw_block", "format": "latex", "text": "\\LaTeX"}),
                components.clone()
            ),
            "<pre>\\LaTeX</pre>"
        );
        assert_eq!(
            render_with(
                json!({"tag": "raw_block", "format": "html", "text": "<i>i</i>"}),
                components
            ),
            "<pre><i>i</i></pre>"
        );
    }

    #[test]
    fn test_unknown_node_renders_nothing() {
        assert_eq!(
            render(json!({"tag": "para", "children": [
                str_node("a"),
                {"tag": "some_future_node", "children": [str_node("lost")]},
                str_node("b")
            ]})),
            "<p>ab</p>"
        );
    }

    #[test]
    fn test_attributes_are_merged() {
        assert_eq!(
            render(json!({
                "tag": "heading",
                "level": 1,
                "autoAttributes": {"id": "Title"},
                "attributes": {"class": "big"},
                "children": [str_node("Title")]
            })),
            r#"<h1 id="Title" class="big">Title</h1>"#
        );
        assert_eq!(
            render(json!({
                "tag": "cell",
                "head": false,
                "align": "right",
                "attributes": {"style": "color: red"},
                "children": [str_node("1")]
            })),
            r#"<td style="text-align:right;color:red">1</td>"#
        );
    }

    #[test]
    fn test_unsafe_node_attributes_are_dropped() {
        assert_eq!(
            render(json!({
                "tag": "span",
                "attributes": {
                    "onclick": "alert(1)",
                    "x\"><script>alert(2)</script><i a": "1",
                    "class": "c"
                },
                "children": [str_node("x")]
            })),
            r#"<span class="c">x</span>"#
        );
        assert_eq!(
            render(json!({
                "tag": "para",
                "attributes": {"href": "java\tscript:alert(1)", "id": "p"},
                "children": [str_node("x")]
            })),
            r#"<p id="p">x</p>"#
        );
    }

    #[test]
    fn test_section_is_transparent() {
        assert_eq!(
            render(json!({"tag": "section", "autoAttributes": {"id": "Intro"}, "children": [
                {"tag": "para", "children": [str_node("x")]}
            ]})),
            "<p>x</p>"
        );
        let components = Components::new().with_tag(ComponentKind::Section, "section");
        assert_eq!(
            render_with(
                json!({"tag": "section", "autoAttributes": {"id": "Intro"}, "children": []}),
                components
            ),
            r#"<section id="Intro"></section>"#
        );
    }

    #[test]
    fn test_component_override_receives_inputs() {
        let components = Components::new().with_component(
            ComponentKind::Heading,
            |props: ComponentProps<'_>| {
                let level = props.inputs.level.unwrap_or_default();
                Element::new("div")
                    .with_prop("data-level", level.to_string())
                    .with_children(props.children)
                    .into()
            },
        );
        assert_eq!(
            render_with(
                json!({"tag": "heading", "level": 0, "children": [str_node("t")]}),
                components
            ),
            r#"<div data-level="1">t</div>"#
        );
    }

    #[test]
    fn test_component_key_defaults_to_position() {
        let components = Components::new().with_component(
            ComponentKind::Emph,
            |props: ComponentProps<'_>| Element::new("i").with_children(props.children).into(),
        );
        let renderer = DocumentRenderer::new().with_components(components);
        let node = Node::from_value(json!({"tag": "para", "children": [
            str_node("a"),
            {"tag": "emph", "children": [str_node("b")]}
        ]}))
        .unwrap();
        let html = renderer.render(&node).unwrap();
        let para = html.as_element().unwrap();
        assert_eq!(para.children[1].as_element().unwrap().key.as_deref(), Some("1"));
    }

    #[test]
    fn test_append_backlink() {
        let backlink: Html = Element::new("a").into();

        let mut empty = Vec::new();
        append_backlink(&mut empty, backlink.clone());
        assert_eq!(empty.len(), 1);

        let mut text = vec![Html::text("t")];
        append_backlink(&mut text, backlink.clone());
        assert_eq!(text.len(), 2);

        let mut element = vec![Element::new("p").with_child("p").into()];
        append_backlink(&mut element, backlink);
        assert_eq!(Html::fragment(element).to_markup(), "<p>p<a></a></p>");
    }

    fn para(children: serde_json::Value) -> serde_json::Value {
        json!({"tag": "para", "children": children})
    }

    fn footnote_ref(label: &str) -> serde_json::Value {
        json!({"tag": "footnote_reference", "text": label})
    }

    fn footnote(label: &str, text: &str) -> serde_json::Value {
        json!({"tag": "footnote", "label": label, "children": [para(json!([str_node(text)]))]})
    }

    #[test]
    fn test_footnotes_and_endnotes() {
        let doc = json!({
            "tag": "doc",
            "children": [para(json!([
                str_node("A"),
                footnote_ref("b"),
                str_node("B"),
                footnote_ref("a"),
                footnote_ref("b")
            ]))],
            "footnotes": {
                "a": footnote("a", "Alpha"),
                "b": footnote("b", "Beta"),
                "c": footnote("c", "Unused")
            }
        });
        assert_eq!(
            render(doc),
            concat!(
                r##"<p>A<a href="#fn1" id="fnref1" role="doc-noteref"><sup>1</sup></a>B"##,
                r##"<a href="#fn2" id="fnref2" role="doc-noteref"><sup>2</sup></a>"##,
                r##"<a href="#fn1" id="fnref1-2" role="doc-noteref"><sup>1</sup></a></p>"##,
                r#"<section role="doc-endnotes"><hr/><ol>"#,
                "<li id=\"fn1\"><p>Beta<a href=\"#fnref1\" role=\"doc-backlink\">\u{21a9}\u{fe0e}</a></p></li>",
                "<li id=\"fn2\"><p>Alpha<a href=\"#fnref2\" role=\"doc-backlink\">\u{21a9}\u{fe0e}</a></p></li>",
                "<li id=\"fn3\"><p>Unused<a href=\"#fnref3\" role=\"doc-backlink\">\u{21a9}\u{fe0e}</a></p></li>",
                "</ol></section>"
            )
        );
    }

    #[test]
    fn test_footnote_referenced_from_footnote_body() {
        let doc = json!({
            "tag": "doc",
            "children": [para(json!([footnote_ref("outer")]))],
            "footnotes": {
                "outer": {"tag": "footnote", "label": "outer", "children": [
                    para(json!([str_node("see"), footnote_ref("inner")]))
                ]},
                "inner": footnote("inner", "nested")
            }
        });
        let markup = render(doc);
        let outer = markup.find(r#"<li id="fn1">"#).unwrap();
        let inner = markup.find(r#"<li id="fn2">"#).unwrap();
        assert!(outer < inner);
        assert!(markup.contains(r##"<a href="#fn2" id="fnref2" role="doc-noteref"><sup>2</sup></a>"##));
        assert!(markup.contains(r##"<p>nested<a href="#fnref2" role="doc-backlink">"##));
    }

    #[test]
    fn test_undefined_footnote_gets_bare_backlink() {
        let doc = json!({
            "tag": "doc",
            "children": [para(json!([footnote_ref("missing")]))]
        });
        assert!(render(doc).ends_with(
            "<ol><li id=\"fn1\"><a href=\"#fnref1\" role=\"doc-backlink\">\u{21a9}\u{fe0e}</a></li></ol></section>"
        ));
    }

    #[test]
    fn test_no_footnotes_no_endnotes() {
        let doc = json!({"tag": "doc", "children": [para(json!([str_node("x")]))]});
        assert_eq!(render(doc), "<p>x</p>");
    }

    #[test]
    fn test_endnotes_override_receives_order() {
        let doc = json!({
            "tag": "doc",
            "children": [para(json!([footnote_ref("b"), footnote_ref("a")]))],
            "footnotes": {"a": footnote("a", "A"), "b": footnote("b", "B")}
        });
        let components = Components::new().with_component(
            ComponentKind::Endnotes,
            |props: ComponentProps<'_>| {
                Element::new("aside")
                    .with_prop("data-order", props.inputs.order.join(","))
                    .into()
            },
        );
        let html = DocumentRenderer::new()
            .with_components(components)
            .render(&Node::from_value(doc).unwrap())
            .unwrap();
        let Html::Fragment(root) = &html else {
            panic!("expected fragment");
        };
        let aside = root.children.last().and_then(Html::as_element).unwrap();
        assert_eq!(aside.key.as_deref(), Some("endnotes"));
        assert!(html.to_markup().ends_with(r#"<aside data-order="b,a"></aside>"#));
    }

    #[test]
    fn test_reference_links() {
        let doc = json!({
            "tag": "doc",
            "references": {
                "ref": {"label": "ref", "destination": "/target", "attributes": {"title": "T"}}
            },
            "autoReferences": {
                "Intro": {"label": "Intro", "destination": "#Intro"}
            },
            "children": [para(json!([
                {"tag": "link", "reference": "ref", "children": [str_node("r")]},
                {"tag": "link", "reference": "Intro", "children": [str_node("i")]},
                {"tag": "link", "destination": "/d", "reference": "ref", "children": [str_node("d")]},
                {"tag": "image", "reference": "ref", "children": [str_node("pic")]}
            ]))]
        });
        assert_eq!(
            render(doc),
            concat!(
                r#"<p><a href="/target" title="T">r</a>"#,
                r##"<a href="#Intro">i</a>"##,
                r#"<a href="/d">d</a>"#,
                r#"<img alt="pic" src="/target" title="T"/></p>"#
            )
        );
    }

    #[test]
    fn test_table_groups() {
        let cell = |head: bool, text: &str| {
            json!({"tag": "cell", "head": head, "children": [str_node(text)]})
        };
        let table = json!({"tag": "table", "children": [
            {"tag": "caption", "children": [str_node("Cap")]},
            {"tag": "row", "head": true, "children": [cell(true, "H")]},
            {"tag": "row", "head": false, "children": [cell(false, "1")]},
            {"tag": "row", "head": true, "children": [cell(true, "late")]}
        ]});
        assert_eq!(
            render(table),
            concat!(
                "<table><caption>Cap</caption>",
                "<thead><tr><th>H</th></tr></thead>",
                "<tbody><tr><td>1</td></tr><tr><th>late</th></tr></tbody></table>"
            )
        );
    }

    #[test]
    fn test_empty_caption() {
        let table = json!({"tag": "table", "children": [
            {"tag": "caption", "children": []},
            {"tag": "row", "children": [{"tag": "cell", "children": [str_node("x")]}]}
        ]});
        assert_eq!(
            render(table.clone()),
            "<table><tbody><tr><td>x</td></tr></tbody></table>"
        );

        let components = Components::new().with_tag(ComponentKind::Caption, "figcaption");
        assert_eq!(
            render_with(table, components),
            "<table><figcaption></figcaption><tbody><tr><td>x</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_tight_and_loose_items() {
        let list = |tight: bool| {
            json!({"tag": "bullet_list", "tight": tight, "children": [
                {"tag": "list_item", "children": [para(json!([str_node("a")]))]}
            ]})
        };
        assert_eq!(render(list(true)), "<ul><li>a</li></ul>");
        assert_eq!(render(list(false)), "<ul><li><p>a</p></li></ul>");

        let tag = Components::new().with_tag(ComponentKind::ListItem, "div");
        assert_eq!(render_with(list(true), tag), "<ul><div>a</div></ul>");

        let component = Components::new().with_component(
            ComponentKind::ListItem,
            |props: ComponentProps<'_>| {
                let tight = props.inputs.tight.unwrap_or_default();
                Element::new("li")
                    .with_prop("data-tight", tight.to_string())
                    .with_children(props.children)
                    .into()
            },
        );
        assert_eq!(
            render_with(list(true), component),
            r#"<ul><li data-tight="true"><p>a</p></li></ul>"#
        );
    }

    #[test]
    fn test_task_item_component_gets_checkbox_state() {
        let list = json!({"tag": "task_list", "tight": true, "children": [
            {"tag": "task_list_item", "checkbox": "checked", "children": [para(json!([str_node("a")]))]}
        ]});
        let components = Components::new().with_component(
            ComponentKind::TaskListItem,
            |props: ComponentProps<'_>| {
                let checked = props.inputs.checkbox.is_some_and(Checkbox::is_checked);
                Element::new("li")
                    .with_prop("data-checked", checked.to_string())
                    .with_children(props.children)
                    .into()
            },
        );
        assert_eq!(
            render_with(list, components),
            r#"<ul class="task-list"><li data-checked="true"><p>a</p></li></ul>"#
        );
    }

    #[test]
    fn test_alias_override() {
        let components = Components::new().with_tag(ComponentKind::Mark, "span");
        assert_eq!(
            render_with(
                json!({"tag": "highlighted", "children": [str_node("x")]}),
                components.clone()
            ),
            "<span>x</span>"
        );
        assert_eq!(
            render_with(json!({"tag": "mark", "children": [str_node("y")]}), components),
            "<span>y</span>"
        );
    }

    #[test]
    fn test_component_sees_kind_and_node() {
        let components = Components::new().with_component(
            ComponentKind::Para,
            |props: ComponentProps<'_>| {
                Element::new("div")
                    .with_prop("data-node", props.node.tag())
                    .with_children(props.children)
                    .into()
            },
        );
        assert_eq!(
            render_with(para(json!([str_node("x")])), components),
            r#"<div data-node="para">x</div>"#
        );
    }

    #[test]
    fn test_doc_tag_override() {
        let components = Components::new().with_tag(ComponentKind::Doc, "article");
        assert_eq!(
            render_with(
                json!({"tag": "doc", "children": [para(json!([str_node("x")]))]}),
                components
            ),
            "<article><p>x</p></article>"
        );
    }

    #[test]
    fn test_raw_html_keys_extend_node_key() {
        let doc = json!({"tag": "doc", "children": [
            {"tag": "raw_block", "format": "html", "text": "<p>a</p><script>s</script><p>b</p>"}
        ]});
        let html = DocumentRenderer::new()
            .render(&Node::from_value(doc).unwrap())
            .unwrap();
        let Html::Fragment(root) = &html else {
            panic!("expected fragment");
        };
        let Html::Fragment(raw) = &root.children[0] else {
            panic!("expected raw fragment");
        };
        assert_eq!(raw.key.as_deref(), Some("0"));
        let keys: Vec<_> = raw
            .children
            .iter()
            .filter_map(Html::as_element)
            .map(|el| el.key.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(keys, ["raw-block-0-0", "raw-block-0-2"]);
        assert_eq!(html.to_markup(), "<p>a</p><p>b</p>");
    }
}
