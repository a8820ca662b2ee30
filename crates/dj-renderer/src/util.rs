//! Attribute and value helpers shared by the dispatcher and the raw HTML
//! sub-parser.

use dj_ast::{Alignment, Attributes, Node};

use crate::element::{PropValue, Props, Style};
use crate::raw_html::{is_event_handler, is_unsafe_url};

/// Curly quote pairs for quoted inline content.
pub const DOUBLE_QUOTES: (&str, &str) = ("\u{201c}", "\u{201d}");
pub const SINGLE_QUOTES: (&str, &str) = ("\u{2018}", "\u{2019}");

/// Glyph for a smart punctuation type, or `fallback` for unknown types.
pub fn smart_punctuation<'a>(kind: &str, fallback: &'a str) -> &'a str {
    match kind {
        "left_double_quote" => "\u{201c}",
        "right_double_quote" => "\u{201d}",
        "left_single_quote" => "\u{2018}",
        "right_single_quote" => "\u{2019}",
        "em_dash" => "\u{2014}",
        "en_dash" => "\u{2013}",
        "ellipses" => "\u{2026}",
        _ => fallback,
    }
}

/// Clamp a heading level into `1..=6`.
pub fn clamp_heading_level(level: u32) -> u32 {
    level.clamp(1, 6)
}

/// Flatten inline content into plain text for `alt` attributes.
///
/// Breaks become whitespace, symbols keep their `:alias:` form and quoted
/// content gets curly quotes. The result is trimmed.
pub fn alt_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_alt_text(nodes, &mut out);
    out.trim().to_owned()
}

fn collect_alt_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Str(l)
            | Node::Code(l)
            | Node::Verbatim(l)
            | Node::InlineMath(l)
            | Node::DisplayMath(l)
            | Node::Url(l)
            | Node::Email(l) => out.push_str(&l.text),
            Node::CodeBlock(c) => out.push_str(&c.text),
            Node::RawBlock(r) | Node::RawInline(r) => out.push_str(&r.text),
            Node::Symb(s) => {
                out.push(':');
                out.push_str(&s.alias);
                out.push(':');
            }
            Node::NonBreakingSpace(_) => out.push('\u{a0}'),
            Node::SmartPunctuation(p) => out.push_str(smart_punctuation(&p.kind, &p.text)),
            Node::DoubleQuoted(c) => quoted_alt_text(&c.children, DOUBLE_QUOTES, out),
            Node::SingleQuoted(c) => quoted_alt_text(&c.children, SINGLE_QUOTES, out),
            Node::SoftBreak(_) | Node::Softbreak(_) => out.push(' '),
            Node::HardBreak(_) | Node::Hardbreak(_) => out.push('\n'),
            other => collect_alt_text(other.children(), out),
        }
    }
}

fn quoted_alt_text(children: &[Node], (open, close): (&str, &str), out: &mut String) {
    out.push_str(open);
    out.push_str(&alt_text(children));
    out.push_str(close);
}

/// Numbering type for an ordered list style token.
///
/// Decimal styles (anything containing `1`) map to `None`; otherwise the
/// delimiters `(`, `)` and `.` are stripped (`(a)` → `a`, `I.` → `I`).
pub fn ordered_list_type(style: Option<&str>) -> Option<String> {
    let style = style?;
    if style.contains('1') {
        return None;
    }
    let kind: String = style.chars().filter(|c| !matches!(c, '(' | ')' | '.')).collect();
    (!kind.is_empty()).then_some(kind)
}

/// CSS `text-align` value for a table cell alignment.
pub fn text_align(align: Alignment) -> Option<&'static str> {
    match align {
        Alignment::Left => Some("left"),
        Alignment::Right => Some("right"),
        Alignment::Center => Some("center"),
        Alignment::Default => None,
    }
}

/// Convert a hyphenated CSS property to camelCase, dropping leading dashes.
pub fn camel_case_property(name: &str) -> String {
    let name = name.trim().trim_start_matches('-');
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-'
            && let Some(&next) = chars.peek()
            && next.is_ascii_lowercase()
        {
            out.push(next.to_ascii_uppercase());
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse an inline `style` attribute into a [`Style`].
///
/// Declarations are split on `;` and then on the first `:`. Declarations
/// with an empty property or value are skipped. Returns `None` when nothing
/// survives.
pub fn parse_style(value: &str) -> Option<Style> {
    let mut style = Style::new();
    for declaration in value.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = camel_case_property(property);
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }
        style.set(property, value);
    }
    (!style.is_empty()).then_some(style)
}

/// Join non-empty class lists with a space.
fn join_classes(a: Option<&str>, b: &str) -> String {
    match a {
        Some(a) if !a.is_empty() && !b.is_empty() => format!("{a} {b}"),
        Some(a) if b.is_empty() => a.to_owned(),
        _ => b.to_owned(),
    }
}

/// Apply a node attribute dictionary on top of `props`.
///
/// `class` is appended to any existing `className`, `style` is parsed and
/// merged property by property, everything else overwrites. Event handlers
/// and URL attributes with a script or data scheme are dropped.
pub fn apply_attributes(props: &mut Props, attributes: &Attributes) {
    for (name, value) in attributes {
        if is_event_handler(name) || is_unsafe_url(name, value) {
            tracing::debug!(attribute = %name, "Dropped unsafe node attribute");
            continue;
        }

        match name.as_str() {
            "class" => {
                let joined = join_classes(props.get_str("className"), value);
                if !joined.is_empty() {
                    props.insert("className", joined);
                }
            }
            "style" => {
                let Some(parsed) = parse_style(value) else {
                    continue;
                };
                match props.remove("style") {
                    Some(PropValue::Style(mut existing)) => {
                        existing.extend(parsed);
                        props.insert("style", existing);
                    }
                    _ => props.insert("style", parsed),
                }
            }
            _ => props.insert(name.as_str(), value.as_str()),
        }
    }
}

/// Merge a node's attributes over the kind's own props.
///
/// Order: `extra`, then auto-generated attributes, then explicit attributes,
/// so explicit wins on collisions while class lists and styles accumulate.
pub fn merge_props(node: &Node, extra: Props) -> Props {
    let mut props = extra;
    if let Some(auto) = node.auto_attributes() {
        apply_attributes(&mut props, auto);
    }
    if let Some(attributes) = node.attributes() {
        apply_attributes(&mut props, attributes);
    }
    props
}
