//! Block matcher.
//!
//! Turns the token stream into a [`Document`]. A single stack of frames
//! tracks open directive blocks and open tags; the registry pairing of each
//! directive decides whether it pushes, separates, pops or is a leaf.
//! Nothing here fails: mismatches become diagnostics and the tree keeps
//! every byte of content.

use crate::ast::{
    Attribute, AttributeValue, BlockClose, BlockNode, ComponentNode, DirectiveNode,
    DirectiveRole, Document, EchoNode, ElementNode, EndTag, NamedAttribute, Node, OpaqueKind,
    OpaqueSpan, SlotNode, StartTag, TextNode, ValuePart,
};
use crate::attribute::is_component_tag;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::registry::{self, CloseKind, Pairing};
use crate::span::Span;
use crate::token::{EchoKind, Token, TokenKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Element,
    Component,
    Slot,
}

impl TagKind {
    fn of(name: &str) -> Self {
        if is_slot_tag(name) {
            Self::Slot
        } else if is_component_tag(name) {
            Self::Component
        } else {
            Self::Element
        }
    }
}

fn is_slot_tag(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "x-slot" || lower.starts_with("x-slot:")
}

#[derive(Debug)]
enum FrameKind {
    Root,
    Block {
        open: DirectiveNode,
        family: &'static str,
    },
    Tag {
        start: StartTag,
        kind: TagKind,
    },
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    children: Vec<Node>,
}

/// Build a document from scanned tokens.
pub(crate) fn parse(tokens: Vec<Token>, diagnostics: Vec<Diagnostic>) -> Document {
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
        stack: vec![Frame {
            kind: FrameKind::Root,
            children: Vec::new(),
        }],
        diagnostics,
    };
    parser.run();
    parser.finish()
}

struct Parser {
    tokens: std::iter::Peekable<std::vec::IntoIter<Token>>,
    stack: Vec<Frame>,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    fn run(&mut self) {
        while let Some(token) = self.tokens.next() {
            match token.kind {
                TokenKind::Text => self.append(Node::Text(TextNode {
                    raw: token.text,
                    span: token.span,
                })),
                TokenKind::EchoOpen(kind) => {
                    let echo = self.echo(kind, token.span);
                    self.append(Node::Echo(echo));
                }
                TokenKind::CommentOpen => {
                    let comment = self.comment(token);
                    self.append(Node::Opaque(comment));
                }
                TokenKind::HtmlComment => self.opaque(OpaqueKind::HtmlComment, token),
                TokenKind::VerbatimSpan => self.opaque(OpaqueKind::Verbatim, token),
                TokenKind::RawCodeSpan => self.opaque(OpaqueKind::RawCode, token),
                TokenKind::RawText => self.opaque(OpaqueKind::RawText, token),
                TokenKind::DirectiveName => {
                    let node = self.directive_node(token);
                    self.directive(node);
                }
                TokenKind::TagOpen { closing: false } => self.start_tag(token),
                TokenKind::TagOpen { closing: true } => self.end_tag(token),
                // Only reachable on malformed streams; keep the text.
                TokenKind::DirectiveArgsOpen
                | TokenKind::Expression
                | TokenKind::DirectiveArgsClose
                | TokenKind::EchoClose(_)
                | TokenKind::CommentBody
                | TokenKind::CommentClose
                | TokenKind::TagClose { .. }
                | TokenKind::AttributeName(_)
                | TokenKind::AttributeValue { .. } => self.append(Node::Text(TextNode {
                    raw: token.text,
                    span: token.span,
                })),
            }
        }
    }

    fn finish(mut self) -> Document {
        while self.stack.len() > 1 {
            self.close_top(None);
        }
        let root = self.stack.pop().map(|f| f.children).unwrap_or_default();
        Document {
            root,
            diagnostics: self.diagnostics,
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn opaque(&mut self, kind: OpaqueKind, token: Token) {
        self.append(Node::Opaque(OpaqueSpan {
            kind,
            raw: token.text,
            span: token.span,
        }));
    }

    fn next_if(&mut self, pred: impl FnOnce(&TokenKind) -> bool) -> Option<Token> {
        self.tokens.next_if(|t| pred(&t.kind))
    }

    fn echo(&mut self, kind: EchoKind, open: Span) -> EchoNode {
        let body = self
            .next_if(|k| *k == TokenKind::Expression)
            .map(|t| t.text)
            .unwrap_or_default();
        let end = self
            .next_if(|k| matches!(k, TokenKind::EchoClose(_)))
            .map_or(open.end, |t| t.span.end);
        EchoNode {
            kind,
            body,
            span: Span { end, ..open },
        }
    }

    fn comment(&mut self, open: Token) -> OpaqueSpan {
        let mut raw = open.text;
        let mut end = open.span.end;
        for token in [
            self.next_if(|k| *k == TokenKind::CommentBody),
            self.next_if(|k| *k == TokenKind::CommentClose),
        ]
        .into_iter()
        .flatten()
        {
            raw.push_str(&token.text);
            end = token.span.end;
        }
        OpaqueSpan {
            kind: OpaqueKind::Comment,
            raw,
            span: Span { end, ..open.span },
        }
    }

    // Directives

    fn directive_node(&mut self, name: Token) -> DirectiveNode {
        let bare = name.text.trim_start_matches('@').to_owned();
        let mut span = name.span;
        let mut args = None;
        if self
            .next_if(|k| *k == TokenKind::DirectiveArgsOpen)
            .is_some()
        {
            let mut group = String::from("(");
            if let Some(expr) = self.next_if(|k| *k == TokenKind::Expression) {
                group.push_str(&expr.text);
            }
            if let Some(close) = self.next_if(|k| *k == TokenKind::DirectiveArgsClose) {
                group.push(')');
                span.end = close.span.end;
            }
            args = Some(group);
        }
        DirectiveNode {
            descriptor: registry::lookup(&bare),
            name: bare,
            args,
            role: DirectiveRole::Standalone,
            span,
        }
    }

    fn directive(&mut self, mut node: DirectiveNode) {
        let Some(descriptor) = node.descriptor else {
            self.diagnostics.push(Diagnostic::info(
                node.span,
                DiagnosticCode::UnknownDirective,
                format!("unknown directive @{}, left unchanged", node.name),
            ));
            self.append(Node::Directive(node));
            return;
        };

        match descriptor.pairing_for(node.args.as_deref()) {
            Pairing::None | Pairing::Raw { .. } => self.append(Node::Directive(node)),
            Pairing::Opens { family } => {
                node.role = DirectiveRole::Open;
                self.stack.push(Frame {
                    kind: FrameKind::Block { open: node, family },
                    children: Vec::new(),
                });
            }
            Pairing::Middle {
                families, optional, ..
            } => self.middle(node, families, optional),
            Pairing::Closes { family, kind } => self.close_block(node, family, kind),
        }
    }

    fn middle(&mut self, mut node: DirectiveNode, families: &[&str], optional: bool) {
        let block = self
            .stack
            .iter()
            .rposition(|f| matches!(f.kind, FrameKind::Block { .. } | FrameKind::Root));
        let matches_family = block.is_some_and(|i| {
            matches!(&self.stack[i].kind, FrameKind::Block { family, .. } if families.contains(family))
        });

        if let (Some(index), true) = (block, matches_family) {
            self.unwind_to(index);
            node.role = DirectiveRole::Middle;
            self.append(Node::Directive(node));
        } else if optional {
            self.append(Node::Directive(node));
        } else {
            node.role = DirectiveRole::Stray;
            self.diagnostics.push(Diagnostic::warning(
                node.span,
                DiagnosticCode::UnmatchedDirective,
                format!(
                    "@{} outside of a matching block, left as is",
                    node.canonical_name()
                ),
            ));
            self.append(Node::Directive(node));
        }
    }

    fn close_block(&mut self, mut node: DirectiveNode, family: &str, kind: CloseKind) {
        let found = self
            .stack
            .iter()
            .rposition(|f| matches!(&f.kind, FrameKind::Block { family: open, .. } if *open == family));
        match found {
            Some(index) => {
                self.unwind_to(index);
                node.role = DirectiveRole::Close;
                self.close_top(Some(Closer::Directive(BlockClose {
                    directive: node,
                    kind,
                })));
            }
            None => {
                node.role = DirectiveRole::Stray;
                self.diagnostics.push(Diagnostic::warning(
                    node.span,
                    DiagnosticCode::UnmatchedDirective,
                    format!("@{} has no matching opening directive", node.name),
                ));
                self.append(Node::Directive(node));
            }
        }
    }

    /// Implicitly close every frame above `index`.
    fn unwind_to(&mut self, index: usize) {
        while self.stack.len() > index + 1 {
            self.close_top(None);
        }
    }

    // Tags

    fn start_tag(&mut self, open: Token) {
        let name = open.text.trim_start_matches('<').to_owned();
        let mut attributes = Vec::new();
        let mut self_closing = false;
        let mut end = open.span.end;

        while let Some(token) = self.tokens.next() {
            match token.kind {
                TokenKind::TagClose { self_closing: sc } => {
                    self_closing = sc;
                    end = token.span.end;
                    break;
                }
                TokenKind::AttributeName(class) => {
                    let value = self.attribute_value();
                    let attr_end = value.as_ref().map_or(token.span.end, |(_, e)| *e);
                    attributes.push(Attribute::Named(NamedAttribute {
                        name: token.text,
                        class,
                        value: value.map(|(v, _)| v),
                        span: Span {
                            end: attr_end,
                            ..token.span
                        },
                    }));
                }
                TokenKind::EchoOpen(kind) => {
                    let echo = self.echo(kind, token.span);
                    attributes.push(Attribute::Echo(echo));
                }
                TokenKind::CommentOpen => {
                    let comment = self.comment(token);
                    attributes.push(Attribute::Comment(comment));
                }
                _ => {}
            }
        }

        let start = StartTag {
            span: Span { end, ..open.span },
            name,
            attributes,
            self_closing,
        };
        let kind = TagKind::of(&start.name);
        let void = kind == TagKind::Element && is_void_element(&start.name);
        if start.self_closing || void {
            let node = build_tag(start, kind, Vec::new(), None, void);
            self.append(node);
        } else {
            self.stack.push(Frame {
                kind: FrameKind::Tag { start, kind },
                children: Vec::new(),
            });
        }
    }

    /// Read value pieces following an attribute name.
    fn attribute_value(&mut self) -> Option<(AttributeValue, usize)> {
        let mut parts = Vec::new();
        let mut quote = None;
        let mut end = 0;
        let mut seen = false;
        while let Some(token) = self.next_if(|k| matches!(k, TokenKind::AttributeValue { .. })) {
            seen = true;
            let TokenKind::AttributeValue { quote: q, last } = token.kind else {
                break;
            };
            quote = q;
            end = token.span.end + usize::from(q.is_some() && last);
            if !token.text.is_empty() {
                parts.push(ValuePart::Literal(token.text));
            }
            if last {
                break;
            }
            if let Some(open) = self.next_if(|k| matches!(k, TokenKind::EchoOpen(_))) {
                let TokenKind::EchoOpen(kind) = open.kind else {
                    break;
                };
                let echo = self.echo(kind, open.span);
                end = echo.span.end;
                parts.push(ValuePart::Echo(echo));
            }
        }
        seen.then_some((AttributeValue { quote, parts }, end))
    }

    fn end_tag(&mut self, open: Token) {
        let name = open.text.trim_start_matches("</").to_owned();
        let (trailing, end) = self
            .next_if(|k| matches!(k, TokenKind::TagClose { .. }))
            .map_or((String::new(), open.span.end), |t| {
                (
                    t.text.trim_end_matches('>').trim().to_owned(),
                    t.span.end,
                )
            });
        let end_tag = EndTag {
            name,
            trailing,
            span: Span { end, ..open.span },
        };

        let closes_any_slot = end_tag.name.eq_ignore_ascii_case("x-slot");
        let found = self.stack.iter().rposition(|f| match &f.kind {
            FrameKind::Tag { start, kind } => {
                start.name.eq_ignore_ascii_case(&end_tag.name)
                    || (closes_any_slot && *kind == TagKind::Slot)
            }
            _ => false,
        });

        match found {
            Some(index) => {
                self.unwind_to(index);
                self.close_top(Some(Closer::Tag(end_tag)));
            }
            None => {
                self.diagnostics.push(Diagnostic::warning(
                    end_tag.span,
                    DiagnosticCode::UnmatchedTag,
                    format!("</{}> has no matching start tag", end_tag.name),
                ));
                self.append(Node::StrayEndTag(end_tag));
            }
        }
    }

    /// Pop the top frame and attach it to its parent.
    ///
    /// With `closer == None` the frame is closed implicitly: blocks keep
    /// `close = None` and tags keep `end = None`.
    fn close_top(&mut self, closer: Option<Closer>) {
        // The root frame stays at the bottom of the stack.
        if self.stack.len() < 2 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let node = match frame.kind {
            FrameKind::Root => return,
            FrameKind::Block { open, family } => {
                let close = if let Some(Closer::Directive(close)) = closer {
                    Some(close)
                } else {
                    self.diagnostics.push(Diagnostic::warning(
                        open.span,
                        DiagnosticCode::UnmatchedDirective,
                        format!("@{} is never closed", open.name),
                    ));
                    None
                };
                let end = close
                    .as_ref()
                    .map(|c| c.directive.span.end)
                    .or_else(|| frame.children.last().map(|c| c.span().end))
                    .unwrap_or(open.span.end);
                Node::Block(BlockNode {
                    span: Span { end, ..open.span },
                    open,
                    family,
                    children: frame.children,
                    close,
                })
            }
            FrameKind::Tag { start, kind } => {
                let end = if let Some(Closer::Tag(end)) = closer {
                    Some(end)
                } else {
                    self.diagnostics.push(Diagnostic::info(
                        start.span,
                        DiagnosticCode::UnclosedTag,
                        format!("<{}> is closed implicitly", start.name),
                    ));
                    None
                };
                build_tag(start, kind, frame.children, end, false)
            }
        };
        self.append(node);
    }
}

/// What explicitly closed a frame.
enum Closer {
    Directive(BlockClose),
    Tag(EndTag),
}

fn build_tag(
    start: StartTag,
    kind: TagKind,
    children: Vec<Node>,
    end: Option<EndTag>,
    void: bool,
) -> Node {
    let span = Span {
        end: end
            .as_ref()
            .map(|e| e.span.end)
            .or_else(|| children.last().map(|c| c.span().end))
            .unwrap_or(start.span.end),
        ..start.span
    };
    match kind {
        TagKind::Element => Node::Element(ElementNode {
            start,
            children,
            end,
            void,
            span,
        }),
        TagKind::Slot => Node::Slot(SlotNode {
            name: slot_name(&start),
            start,
            children,
            end,
            span,
        }),
        TagKind::Component => {
            let mut slots = Vec::new();
            let mut default_slot_children = Vec::new();
            for child in children {
                match child {
                    Node::Slot(slot) => slots.push(slot),
                    other => default_slot_children.push(other),
                }
            }
            Node::Component(ComponentNode {
                start,
                slots,
                default_slot_children,
                end,
                span,
            })
        }
    }
}

/// Slot name from `x-slot:name` or the `name` attribute.
fn slot_name(start: &StartTag) -> String {
    if let Some((_, suffix)) = start.name.split_once(':') {
        return suffix.to_owned();
    }
    start
        .attributes
        .iter()
        .find_map(|a| match a {
            Attribute::Named(named) if named.name == "name" => named.literal_value(),
            _ => None,
        })
        .unwrap_or_default()
        .to_owned()
}
