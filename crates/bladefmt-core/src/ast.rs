//! Document tree.
//!
//! Built fresh for every call by the block matcher and never mutated after
//! that; the printer and the idempotence guard only read it.

use crate::attribute::AttributeClass;
use crate::diagnostic::Diagnostic;
use crate::registry::{CloseKind, DirectiveDescriptor};
use crate::span::Span;
use crate::token::EchoKind;

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Vec<Node>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(TextNode),
    Echo(EchoNode),
    Opaque(OpaqueSpan),
    Directive(DirectiveNode),
    Block(BlockNode),
    Element(ElementNode),
    Component(ComponentNode),
    Slot(SlotNode),
    /// An end tag with no open element to close.
    StrayEndTag(EndTag),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Self::Text(n) => n.span,
            Self::Echo(n) => n.span,
            Self::Opaque(n) => n.span,
            Self::Directive(n) => n.span,
            Self::Block(n) => n.span,
            Self::Element(n) => n.span,
            Self::Component(n) => n.span,
            Self::Slot(n) => n.span,
            Self::StrayEndTag(n) => n.span,
        }
    }

    /// Short human-readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Text(_) => "text".to_owned(),
            Self::Echo(_) => "echo".to_owned(),
            Self::Opaque(n) => n.kind.describe().to_owned(),
            Self::Directive(n) => format!("@{}", n.name),
            Self::Block(n) => format!("@{} block", n.open.name),
            Self::Element(n) => format!("<{}>", n.start.name),
            Self::Component(n) => format!("<{}> component", n.start.name),
            Self::Slot(n) => format!("<{}> slot", n.start.name),
            Self::StrayEndTag(n) => format!("</{}>", n.name),
        }
    }
}

/// Literal text between constructs, whitespace included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub raw: String,
    pub span: Span,
}

/// `{{ expr }}`, `{!! expr !!}` or `{{{ expr }}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoNode {
    pub kind: EchoKind,
    /// Expression text exactly as written, surrounding spaces included.
    pub body: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    /// `{{-- ... --}}`
    Comment,
    /// `<!-- ... -->`
    HtmlComment,
    /// `@verbatim ... @endverbatim`
    Verbatim,
    /// `@php ... @endphp` and `<?php ... ?>`
    RawCode,
    /// Body of a raw-text element.
    RawText,
}

impl OpaqueKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::HtmlComment => "HTML comment",
            Self::Verbatim => "@verbatim block",
            Self::RawCode => "PHP block",
            Self::RawText => "raw text",
        }
    }
}

/// A region reproduced byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueSpan {
    pub kind: OpaqueKind,
    pub raw: String,
    pub span: Span,
}

/// Where a directive sits in the block structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveRole {
    Standalone,
    /// Opening directive of a [`BlockNode`].
    Open,
    /// Separator inside a block (`@else`, `@case`, `@empty`).
    Middle,
    /// Closing directive of a [`BlockNode`].
    Close,
    /// Middle or closer found outside a matching block.
    Stray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveNode {
    /// Name as written, without the `@`.
    pub name: String,
    /// Argument group including the parentheses, verbatim.
    pub args: Option<String>,
    pub role: DirectiveRole,
    /// `None` for directives missing from the registry.
    pub descriptor: Option<&'static DirectiveDescriptor>,
    pub span: Span,
}

impl DirectiveNode {
    /// Registry spelling, or the written name for unknown directives.
    pub fn canonical_name(&self) -> &str {
        self.descriptor.map_or(self.name.as_str(), |d| d.name)
    }
}

/// An opening directive, its children, and the directive that closed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub open: DirectiveNode,
    pub family: &'static str,
    /// Children in source order; middle directives appear inline.
    pub children: Vec<Node>,
    /// `None` when the block was never closed.
    pub close: Option<BlockClose>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockClose {
    pub directive: DirectiveNode,
    pub kind: CloseKind,
}

/// `<name attr...>` or `<name ... />`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
    pub span: Span,
}

/// `</name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTag {
    pub name: String,
    /// Anything written between the name and `>`, trimmed.
    pub trailing: String,
    pub span: Span,
}

/// Plain markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub start: StartTag,
    pub children: Vec<Node>,
    /// `None` for void elements and for elements closed implicitly.
    pub end: Option<EndTag>,
    pub void: bool,
    pub span: Span,
}

/// `<x-name ...>` component invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNode {
    pub start: StartTag,
    /// Named slots in source order.
    pub slots: Vec<SlotNode>,
    pub default_slot_children: Vec<Node>,
    pub end: Option<EndTag>,
    pub span: Span,
}

impl ComponentNode {
    pub fn tag_name(&self) -> &str {
        &self.start.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.start.attributes
    }

    pub fn self_closing(&self) -> bool {
        self.start.self_closing
    }

    pub fn slot(&self, name: &str) -> Option<&SlotNode> {
        self.slots.iter().find(|s| s.name == name)
    }
}

/// `<x-slot:name>` or `<x-slot name="...">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotNode {
    pub name: String,
    pub start: StartTag,
    pub children: Vec<Node>,
    pub end: Option<EndTag>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Named(NamedAttribute),
    /// `{{ $attributes }}` in attribute position.
    Echo(EchoNode),
    /// `{{-- ... --}}` in attribute position.
    Comment(OpaqueSpan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAttribute {
    /// Name as written, modifiers and call group included.
    pub name: String,
    pub class: AttributeClass,
    pub value: Option<AttributeValue>,
    pub span: Span,
}

impl NamedAttribute {
    /// Whether the attribute belongs to a client-side framework.
    pub fn is_foreign_binding(&self) -> bool {
        self.class.is_foreign()
    }

    /// Value text when it contains no echoes.
    pub fn literal_value(&self) -> Option<&str> {
        match self.value.as_ref()?.parts.as_slice() {
            [] => Some(""),
            [ValuePart::Literal(s)] => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    pub quote: Option<char>,
    pub parts: Vec<ValuePart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuePart {
    Literal(String),
    Echo(EchoNode),
}
