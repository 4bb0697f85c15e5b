//! Idempotence guard.
//!
//! Re-reads the candidate output and checks that it describes the same
//! document as the input, and that printing it again changes nothing.

use crate::ast::{
    Attribute, DirectiveNode, Document, EndTag, Node, OpaqueKind, SlotNode, StartTag, ValuePart,
};
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::options::FormatOptions;
use crate::parser::parse;
use crate::printer::{self, ordered_attributes, render_echo};
use crate::scanner::scan;
use crate::span::Span;

/// Structural item tagged with the index of the top-level node it belongs to.
type Signature = Vec<(usize, String)>;

/// Verify that `candidate`, printed from `doc`, is a safe replacement.
///
/// Returns the diagnostic explaining the first divergence.
pub(crate) fn check(
    doc: &Document,
    candidate: &str,
    options: &FormatOptions,
) -> Result<(), Diagnostic> {
    let reparsed = match scan(candidate) {
        Ok(scanned) => parse(scanned.tokens, scanned.diagnostics),
        Err(err) => {
            let message = format!("formatted output no longer scans: {err}");
            return Err(violation(doc, first_node_at(doc, err.line), message));
        }
    };

    let before = signature(doc, options);
    let after = signature(&reparsed, options);
    if let Some(index) = first_divergence(&before, &after) {
        return Err(violation(
            doc,
            index,
            "formatting would change the document structure".to_owned(),
        ));
    }

    let second = printer::print(candidate, &reparsed, options);
    if second != candidate {
        let line = first_differing_line(candidate, &second);
        let index = first_node_at(&reparsed, line);
        return Err(violation(
            &reparsed,
            index,
            format!("formatting is not stable from output line {line}"),
        ));
    }
    Ok(())
}

fn violation(doc: &Document, index: usize, message: String) -> Diagnostic {
    let (span, what) = doc
        .root
        .get(index)
        .or_else(|| doc.root.last())
        .map_or((Span::default(), "end of file".to_owned()), |node| {
            (node.span(), node.describe())
        });
    let span = Span {
        line: span.line.max(1),
        column: span.column.max(1),
        ..span
    };
    Diagnostic::error(
        span,
        DiagnosticCode::IdempotenceViolation,
        format!("{message} (near {what}); file left unformatted"),
    )
}

fn first_divergence(before: &Signature, after: &Signature) -> Option<usize> {
    let position = before.iter().zip(after).position(|(a, b)| a.1 != b.1);
    match position {
        Some(i) => Some(before[i].0),
        None if before.len() == after.len() => None,
        None => Some(
            before
                .get(after.len())
                .map_or_else(|| before.last().map_or(0, |item| item.0), |item| item.0),
        ),
    }
}

fn first_differing_line(a: &str, b: &str) -> usize {
    a.lines()
        .zip(b.lines())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.lines().count().min(b.lines().count()))
        + 1
}

/// Index of the last top-level node starting at or before `line`.
fn first_node_at(doc: &Document, line: usize) -> usize {
    doc.root
        .iter()
        .rposition(|node| node.span().line <= line)
        .unwrap_or(0)
}

fn signature(doc: &Document, options: &FormatOptions) -> Signature {
    let mut out = Vec::new();
    for (index, node) in doc.root.iter().enumerate() {
        let mut items = Vec::new();
        node_items(node, options, &mut items);
        out.extend(items.into_iter().map(|item| (index, item)));
    }
    out
}

/// Whitespace-insensitive description of `node`, in printer order.
fn node_items(node: &Node, options: &FormatOptions, out: &mut Vec<String>) {
    match node {
        Node::Text(text) => {
            out.extend(text.raw.split_ascii_whitespace().map(|w| format!("t:{w}")));
        }
        Node::Echo(echo) => out.push(format!("e:{}", render_echo(echo))),
        Node::Opaque(span) => {
            let raw = if span.kind == OpaqueKind::RawText {
                without_trailing_indent(&span.raw)
            } else {
                &span.raw
            };
            out.push(format!("o:{:?}:{raw}", span.kind));
        }
        Node::Directive(directive) => out.push(directive_item(directive)),
        Node::Block(block) => {
            out.push(format!("b:{}", block.family));
            out.push(directive_item(&block.open));
            children_items(&block.children, options, out);
            out.push(match &block.close {
                Some(close) => format!("/b:{:?}", close.kind),
                None => "/b:unclosed".to_owned(),
            });
        }
        Node::Element(element) => {
            tag_items(&element.start, options, out);
            children_items(&element.children, options, out);
            end_items(element.end.as_ref(), out);
        }
        Node::Component(component) => {
            tag_items(&component.start, options, out);
            for slot in &component.slots {
                slot_items(slot, options, out);
            }
            children_items(&component.default_slot_children, options, out);
            end_items(component.end.as_ref(), out);
        }
        Node::Slot(slot) => slot_items(slot, options, out),
        Node::StrayEndTag(end) => out.push(format!("stray:</{} {}>", end.name, end.trailing)),
    }
}

fn children_items(children: &[Node], options: &FormatOptions, out: &mut Vec<String>) {
    for child in children {
        node_items(child, options, out);
    }
}

fn directive_item(directive: &DirectiveNode) -> String {
    format!(
        "d:{:?}:{}:{}",
        directive.role,
        directive.canonical_name().to_ascii_lowercase(),
        directive.args.as_deref().unwrap_or_default()
    )
}

fn slot_items(slot: &SlotNode, options: &FormatOptions, out: &mut Vec<String>) {
    out.push(format!("slot:{}", slot.name));
    tag_items(&slot.start, options, out);
    children_items(&slot.children, options, out);
    end_items(slot.end.as_ref(), out);
}

fn tag_items(start: &StartTag, options: &FormatOptions, out: &mut Vec<String>) {
    out.push(format!("<{}", start.name));
    for attribute in ordered_attributes(&start.attributes, options) {
        let item = match attribute {
            Attribute::Named(named) => {
                let mut item = format!("a:{:?}:{}", named.class, named.name);
                if let Some(value) = &named.value {
                    item.push_str(&format!("={:?}:", value.quote));
                    for part in &value.parts {
                        match part {
                            ValuePart::Literal(text) => item.push_str(text),
                            ValuePart::Echo(echo) => item.push_str(&render_echo(echo)),
                        }
                    }
                }
                item
            }
            Attribute::Echo(echo) => format!("a:{}", render_echo(echo)),
            Attribute::Comment(comment) => format!("a:{}", comment.raw),
        };
        out.push(item);
    }
    out.push(if start.self_closing { "/>" } else { ">" }.to_owned());
}

fn end_items(end: Option<&EndTag>, out: &mut Vec<String>) {
    out.push(match end {
        Some(end) => format!("</{} {}>", end.name, end.trailing),
        None => "</>".to_owned(),
    });
}

/// Drop a whitespace-only last line, which the printer re-indents.
fn without_trailing_indent(raw: &str) -> &str {
    match raw.rfind('\n') {
        Some(i) if raw[i + 1..].trim().is_empty() => &raw[..=i],
        _ => raw,
    }
}
