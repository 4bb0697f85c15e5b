//! Attribute rendering and ordering.

use crate::ast::{Attribute, AttributeValue, EchoNode, EndTag, NamedAttribute, ValuePart};
use crate::attribute::AttributeClass;
use crate::options::FormatOptions;

/// Render an echo with single spaces inside the delimiters.
pub(crate) fn render_echo(echo: &EchoNode) -> String {
    let body = echo.body.trim();
    if body.is_empty() {
        format!("{} {}", echo.kind.open(), echo.kind.close())
    } else {
        format!("{} {body} {}", echo.kind.open(), echo.kind.close())
    }
}

pub(crate) fn render_attribute(attribute: &Attribute) -> String {
    match attribute {
        Attribute::Named(named) => render_named(named),
        Attribute::Echo(echo) => render_echo(echo),
        Attribute::Comment(comment) => comment.raw.clone(),
    }
}

fn render_named(attribute: &NamedAttribute) -> String {
    let mut out = attribute.name.clone();
    if let Some(value) = &attribute.value {
        out.push('=');
        render_value(value, &mut out);
    }
    out
}

fn render_value(value: &AttributeValue, out: &mut String) {
    if let Some(q) = value.quote {
        out.push(q);
    }
    for part in &value.parts {
        match part {
            ValuePart::Literal(text) => out.push_str(text),
            ValuePart::Echo(echo) => out.push_str(&render_echo(echo)),
        }
    }
    if let Some(q) = value.quote {
        out.push(q);
    }
}

pub(crate) fn render_end_tag(end: &EndTag) -> String {
    if end.trailing.is_empty() {
        format!("</{}>", end.name)
    } else {
        format!("</{} {}>", end.name, end.trailing)
    }
}

/// Attributes in the order they are printed.
///
/// With `sort_attributes`, each run between barriers (echoes, comments and
/// directive-like names) is stable-sorted by class, then by name.
pub(crate) fn ordered<'a>(attributes: &'a [Attribute], options: &FormatOptions) -> Vec<&'a Attribute> {
    let mut ordered: Vec<&Attribute> = attributes.iter().collect();
    if !options.sort_attributes {
        return ordered;
    }
    for run in ordered.split_mut(|a| is_barrier(a)) {
        run.sort_by_cached_key(|a| sort_key(a));
    }
    ordered
}

fn is_barrier(attribute: &Attribute) -> bool {
    match attribute {
        Attribute::Named(named) => {
            named.class == AttributeClass::Plain && named.name.starts_with('@')
        }
        Attribute::Echo(_) | Attribute::Comment(_) => true,
    }
}

fn sort_key(attribute: &Attribute) -> (u8, String) {
    match attribute {
        Attribute::Named(named) => (named.class.sort_group(), named.name.to_ascii_lowercase()),
        Attribute::Echo(_) | Attribute::Comment(_) => (u8::MAX, String::new()),
    }
}

/// Render a start tag on one line.
pub(crate) fn single_line_tag(name: &str, rendered: &[String], self_closing: bool) -> String {
    let mut out = format!("<{name}");
    for attribute in rendered {
        out.push(' ');
        out.push_str(attribute);
    }
    out.push_str(if self_closing { " />" } else { ">" });
    out
}
