//! Line-breaking decisions.

use crate::ast::{ElementNode, Node, OpaqueKind, StartTag};
use crate::options::FormatOptions;

use super::attributes::{ordered, render_attribute, single_line_tag};

/// HTML elements that always start on their own line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "blockquote", "body", "canvas", "dd", "details",
    "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "head", "header", "hr", "html", "iframe", "li", "link", "main", "meta",
    "nav", "noscript", "ol", "optgroup", "option", "p", "pre", "script", "section", "select",
    "style", "summary", "table", "tbody", "td", "template", "tfoot", "th", "thead", "title", "tr",
    "ul", "video",
];

pub(crate) fn is_block_tag(name: &str) -> bool {
    BLOCK_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// A start tag prepared for printing.
pub(crate) struct RenderedTag {
    pub(crate) attributes: Vec<String>,
    pub(crate) single_line: String,
    pub(crate) broken: bool,
}

pub(crate) fn render_tag(start: &StartTag, level: usize, options: &FormatOptions) -> RenderedTag {
    let attributes: Vec<String> = ordered(&start.attributes, options)
        .into_iter()
        .map(render_attribute)
        .collect();
    let single_line = single_line_tag(&start.name, &attributes, start.self_closing);
    let multi_line_value = attributes.iter().any(|a| a.contains('\n'));
    let too_long = options.indent_width(level) + single_line.chars().count()
        > options.max_line_length;
    RenderedTag {
        broken: !attributes.is_empty() && (multi_line_value || too_long),
        attributes,
        single_line,
    }
}

/// Whether `node` is placed on lines of its own when printed at `level`.
pub(crate) fn is_block_level(node: &Node, level: usize, options: &FormatOptions) -> bool {
    match node {
        Node::Block(_) | Node::Slot(_) => true,
        Node::Opaque(span) => match span.kind {
            OpaqueKind::Verbatim => true,
            OpaqueKind::RawCode => span.raw.starts_with('@'),
            OpaqueKind::Comment | OpaqueKind::HtmlComment | OpaqueKind::RawText => false,
        },
        Node::Element(el) => {
            is_block_tag(&el.start.name)
                || element_is_multiline(el, level, options)
                || tag_breaks(&el.start, level, options)
        }
        Node::Component(c) => {
            !c.slots.is_empty()
                || is_multiline(&c.default_slot_children, level, options)
                || tag_breaks(&c.start, level, options)
        }
        Node::Text(_) | Node::Echo(_) | Node::Directive(_) | Node::StrayEndTag(_) => false,
    }
}

/// Whether an element's children are laid out one per line.
///
/// Block-level elements also break when they contain other tags.
pub(crate) fn element_is_multiline(el: &ElementNode, level: usize, options: &FormatOptions) -> bool {
    if is_block_tag(&el.start.name)
        && el
            .children
            .iter()
            .any(|c| matches!(c, Node::Element(_) | Node::Component(_)))
    {
        return true;
    }
    is_multiline(&el.children, level, options)
}

/// Whether a container's children are laid out one per line.
pub(crate) fn is_multiline(children: &[Node], level: usize, options: &FormatOptions) -> bool {
    children.iter().any(|child| match child {
        Node::Text(text) => text.raw.contains('\n'),
        other => is_block_level(other, level + 1, options),
    })
}

fn tag_breaks(start: &StartTag, level: usize, options: &FormatOptions) -> bool {
    render_tag(start, level, options).broken
}
