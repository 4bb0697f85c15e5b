//! Pretty printer.
//!
//! Walks a [`Document`] and writes normalized text. Layout decisions live
//! in [`layout`], attribute rendering in [`attributes`] and line handling in
//! [`writer`].

mod attributes;
mod layout;
mod writer;

use crate::ast::{
    BlockNode, ComponentNode, DirectiveNode, DirectiveRole, Document, EchoNode, ElementNode,
    EndTag, Node, OpaqueKind, OpaqueSpan, SlotNode, StartTag,
};
use crate::options::{DirectiveClosingStyle, FormatOptions};
use crate::registry::Pairing;

pub(crate) use attributes::{ordered as ordered_attributes, render_echo};
use attributes::render_end_tag;
use writer::{Gap, Writer};

/// Print `doc`, which was parsed from `src`.
pub(crate) fn print(src: &str, doc: &Document, options: &FormatOptions) -> String {
    let mut printer = Printer {
        src,
        options,
        w: Writer::new(options.indent_unit(), options.preserve_blank_lines),
    };
    printer.nodes(&doc.root, 0);
    printer.w.finish()
}

struct Printer<'a> {
    src: &'a str,
    options: &'a FormatOptions,
    w: Writer,
}

impl Printer<'_> {
    fn nodes(&mut self, nodes: &[Node], level: usize) {
        for node in nodes {
            self.node(node, level);
        }
    }

    fn node(&mut self, node: &Node, level: usize) {
        let own_lines = layout::is_block_level(node, level, self.options);
        if own_lines {
            self.w.gap(Gap::Lines(0));
        }
        match node {
            Node::Text(text) => self.text(&text.raw, level),
            Node::Echo(echo) => self.echo(echo, level),
            Node::Opaque(span) => self.w.opaque(level, &span.raw),
            Node::Directive(directive) => self.directive(directive, level),
            Node::Block(block) => self.block(block, level),
            Node::Element(element) => self.element(element, level),
            Node::Component(component) => self.component(component, level),
            Node::Slot(slot) => self.slot(slot, level),
            Node::StrayEndTag(end) => self.w.put(level, &render_end_tag(end)),
        }
        if own_lines {
            self.w.gap(Gap::Lines(0));
        }
    }

    /// Words separated by whitespace runs; a run with line breaks keeps
    /// them, any other run becomes one space.
    fn text(&mut self, raw: &str, level: usize) {
        let mut rest = raw;
        while !rest.is_empty() {
            let blank = rest
                .find(|c: char| !c.is_ascii_whitespace())
                .unwrap_or(rest.len());
            if blank > 0 {
                let breaks = rest[..blank].matches('\n').count();
                self.w.gap(match breaks {
                    0 => Gap::Space,
                    n => Gap::Lines(n - 1),
                });
                rest = &rest[blank..];
            }
            let word = rest
                .find(|c: char| c.is_ascii_whitespace())
                .unwrap_or(rest.len());
            self.w.put(level, &rest[..word]);
            rest = &rest[word..];
        }
    }

    fn echo(&mut self, echo: &EchoNode, level: usize) {
        self.multiline_aware(level, &render_echo(echo));
    }

    fn multiline_aware(&mut self, level: usize, text: &str) {
        if text.contains('\n') {
            self.w.opaque(level, text);
        } else {
            self.w.put(level, text);
        }
    }

    // Directives

    fn render_directive(&self, directive: &DirectiveNode) -> String {
        let name = match (directive.role, self.options.directive_closing_style) {
            (DirectiveRole::Close, DirectiveClosingStyle::AsWritten) => directive.name.as_str(),
            _ => directive.canonical_name(),
        };
        let mut out = format!("@{name}");
        if let Some(args) = &directive.args {
            if directive.descriptor.is_some_and(|d| d.space_before_args) {
                out.push(' ');
            }
            out.push_str(args);
        }
        out
    }

    fn directive(&mut self, directive: &DirectiveNode, level: usize) {
        let rendered = self.render_directive(directive);
        self.multiline_aware(level, &rendered);
    }

    fn block(&mut self, block: &BlockNode, level: usize) {
        let Some(close) = &block.close else {
            // Unclosed blocks keep their source text.
            if let Some(raw) = self.src.get(block.open.span.start..block.span.end) {
                self.w.opaque(level, raw.trim_end());
                return;
            }
            self.block_body(block, level);
            return;
        };
        self.block_body(block, level);
        self.w.close_container();
        self.directive(&close.directive, level);
    }

    fn block_body(&mut self, block: &BlockNode, level: usize) {
        self.directive(&block.open, level);
        let switch = block.family == "switch";
        let body = if switch { level + 2 } else { level + 1 };
        self.w.open_container();
        for child in &block.children {
            match child {
                Node::Directive(marker) if marker.role == DirectiveRole::Middle => {
                    self.middle(marker, level, body, switch);
                }
                other => self.node(other, body),
            }
        }
    }

    fn middle(&mut self, marker: &DirectiveNode, level: usize, body: usize, switch: bool) {
        let dedent = marker
            .descriptor
            .is_some_and(|d| matches!(d.pairing, Pairing::Middle { dedent: true, .. }));
        self.w.gap(Gap::Lines(0));
        if dedent {
            let marker_level = if switch { level + 1 } else { level };
            self.directive(marker, marker_level);
            self.w.open_container();
        } else {
            self.directive(marker, body);
            self.w.gap(Gap::Lines(0));
        }
    }

    // Tags

    fn start_tag(&mut self, start: &StartTag, level: usize) {
        let tag = layout::render_tag(start, level, self.options);
        if !tag.broken {
            self.w.put(level, &tag.single_line);
            return;
        }
        self.w.put(level, &format!("<{}", start.name));
        for attribute in &tag.attributes {
            self.w.gap(Gap::Lines(0));
            self.w.opaque(level + 1, attribute);
        }
        self.w.gap(Gap::Lines(0));
        self.w.put(level, if start.self_closing { "/>" } else { ">" });
    }

    fn end_tag(&mut self, end: Option<&EndTag>, level: usize) {
        if let Some(end) = end {
            self.w.put(level, &render_end_tag(end));
        }
    }

    fn element(&mut self, element: &ElementNode, level: usize) {
        self.start_tag(&element.start, level);
        if element.void || element.start.self_closing {
            return;
        }
        if let [Node::Opaque(body)] = element.children.as_slice()
            && body.kind == OpaqueKind::RawText
        {
            self.raw_text(element, body, level);
            return;
        }
        let multiline = layout::element_is_multiline(element, level, self.options);
        self.children(&element.children, multiline, level);
        self.end_tag(element.end.as_ref(), level);
    }

    /// Body of `<script>`, `<style>`, `<pre>` or `<textarea>`.
    fn raw_text(&mut self, element: &ElementNode, body: &OpaqueSpan, level: usize) {
        let reindent_close = ["script", "style"]
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&element.start.name));
        let trailing = body
            .raw
            .rfind('\n')
            .filter(|&i| body.raw[i + 1..].trim().is_empty());
        match trailing {
            Some(i) if reindent_close => {
                self.w.append_raw(&body.raw[..i]);
                self.w.close_container();
            }
            _ => self.w.append_raw(&body.raw),
        }
        self.end_tag(element.end.as_ref(), level);
    }

    fn children(&mut self, children: &[Node], multiline: bool, level: usize) {
        if multiline {
            self.w.open_container();
            self.nodes(children, level + 1);
            self.w.close_container();
        } else {
            self.nodes(children, level + 1);
        }
    }

    fn component(&mut self, component: &ComponentNode, level: usize) {
        self.start_tag(&component.start, level);
        if component.self_closing() {
            return;
        }
        let multiline = !component.slots.is_empty()
            || layout::is_multiline(&component.default_slot_children, level, self.options);
        if multiline {
            self.w.open_container();
        }
        for slot in &component.slots {
            self.w.gap(Gap::Lines(0));
            self.slot(slot, level + 1);
            self.w.gap(Gap::Lines(0));
        }
        let mut previous_end = None;
        for child in &component.default_slot_children {
            let span = child.span();
            // Content separated by a slot in the source stays separated.
            if previous_end.is_some_and(|end| end != span.start) {
                self.w.gap(Gap::Space);
            }
            self.node(child, level + 1);
            previous_end = Some(span.end);
        }
        if multiline {
            self.w.close_container();
        }
        self.end_tag(component.end.as_ref(), level);
    }

    fn slot(&mut self, slot: &SlotNode, level: usize) {
        self.start_tag(&slot.start, level);
        if slot.start.self_closing {
            return;
        }
        let multiline = layout::is_multiline(&slot.children, level, self.options);
        self.children(&slot.children, multiline, level);
        self.end_tag(slot.end.as_ref(), level);
    }
}
