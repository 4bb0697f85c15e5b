//! Directive registry.
//!
//! A static table describing every known `@directive`: its canonical
//! spelling, how it pairs with other directives to form blocks, and how its
//! arguments are printed. The table is built once and never mutated.
//! Lookup is case-insensitive.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Which closing directive ended a block.
///
/// Several closers can end the same family (`@section` accepts
/// `@endsection`, `@show`, `@overwrite` and the legacy `@stop` and
/// `@append`). They have different runtime meaning and are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseKind {
    End,
    EndSection,
    Show,
    Overwrite,
    Stop,
    Append,
}

/// Kind of opaque region opened by a raw directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// `@verbatim ... @endverbatim`
    Verbatim,
    /// `@php ... @endphp`
    RawCode,
}

/// How a directive participates in block structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Standalone leaf.
    None,
    /// Opens a block of the given family.
    Opens { family: &'static str },
    /// Separates sections inside an open block of one of `families`.
    ///
    /// An `optional` middle outside its families is a standalone directive
    /// rather than an error. `dedent` markers print at the block's level.
    Middle {
        families: &'static [&'static str],
        optional: bool,
        dedent: bool,
    },
    /// Closes the nearest open block of `family`.
    Closes {
        family: &'static str,
        kind: CloseKind,
    },
    /// Opens an opaque region ending at the literal `@closer`.
    Raw {
        closer: &'static str,
        kind: RawKind,
    },
}

/// Argument-dependent pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineForm {
    /// Pairing never depends on arguments.
    Fixed,
    /// A top-level comma in the arguments makes it standalone
    /// (`@section('title', 'Home')`).
    StandaloneWithComma,
    /// Any arguments make it standalone (`@php($x = 1)`).
    StandaloneWithArgs,
    /// With arguments it opens `family` (`@empty($items)`).
    OpensWithArgs { family: &'static str },
}

/// Static description of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveDescriptor {
    /// Canonical spelling without the `@`.
    pub name: &'static str,
    pub pairing: Pairing,
    /// Whether a `( ... )` group after the name belongs to the directive.
    pub accepts_paren_args: bool,
    /// Arguments are a bare condition that must directly follow the name
    /// (`@break($i > 3)`).
    pub allows_inline_condition: bool,
    /// Print a space between the name and its arguments (`@if ($x)`).
    pub space_before_args: bool,
    pub inline_form: InlineForm,
}

impl DirectiveDescriptor {
    const fn new(name: &'static str, pairing: Pairing) -> Self {
        Self {
            name,
            pairing,
            accepts_paren_args: true,
            allows_inline_condition: false,
            space_before_args: false,
            inline_form: InlineForm::Fixed,
        }
    }

    const fn no_args(mut self) -> Self {
        self.accepts_paren_args = false;
        self
    }

    const fn spaced(mut self) -> Self {
        self.space_before_args = true;
        self
    }

    const fn inline_condition(mut self) -> Self {
        self.allows_inline_condition = true;
        self
    }

    const fn form(mut self, form: InlineForm) -> Self {
        self.inline_form = form;
        self
    }

    /// Pairing after taking the arguments into account.
    ///
    /// `args` is the full argument group including parentheses.
    #[must_use]
    pub fn pairing_for(&self, args: Option<&str>) -> Pairing {
        let Some(args) = args else {
            return self.pairing;
        };
        match self.inline_form {
            InlineForm::Fixed => self.pairing,
            InlineForm::StandaloneWithComma if has_top_level_comma(args) => Pairing::None,
            InlineForm::StandaloneWithComma => self.pairing,
            InlineForm::StandaloneWithArgs => Pairing::None,
            InlineForm::OpensWithArgs { family } => Pairing::Opens { family },
        }
    }
}

/// Whether a parenthesized argument group contains a comma at depth one.
fn has_top_level_comma(args: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in args.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 1 => return true,
            _ => {}
        }
    }
    false
}

const IF_LIKE: &[&str] = &[
    "if",
    "unless",
    "isset",
    "empty",
    "auth",
    "guest",
    "can",
    "cannot",
    "canany",
    "env",
    "production",
    "error",
    "session",
];
const AUTH_LIKE: &[&str] = &["auth", "guest"];
const CAN_LIKE: &[&str] = &["can", "cannot", "canany"];
const SWITCH: &[&str] = &["switch"];
const FORELSE: &[&str] = &["forelse"];

const fn standalone(name: &'static str) -> DirectiveDescriptor {
    DirectiveDescriptor::new(name, Pairing::None)
}

const fn opens(name: &'static str, family: &'static str) -> DirectiveDescriptor {
    DirectiveDescriptor::new(name, Pairing::Opens { family })
}

const fn middle(name: &'static str, families: &'static [&'static str]) -> DirectiveDescriptor {
    DirectiveDescriptor::new(
        name,
        Pairing::Middle {
            families,
            optional: false,
            dedent: true,
        },
    )
}

const fn end(name: &'static str, family: &'static str) -> DirectiveDescriptor {
    closes(name, family, CloseKind::End)
}

const fn closes(name: &'static str, family: &'static str, kind: CloseKind) -> DirectiveDescriptor {
    DirectiveDescriptor::new(name, Pairing::Closes { family, kind }).no_args()
}

static DIRECTIVES: &[DirectiveDescriptor] = &[
    // Conditionals
    opens("if", "if").spaced(),
    middle("elseif", IF_LIKE).spaced(),
    middle("else", IF_LIKE).no_args(),
    end("endif", "if"),
    opens("unless", "unless").spaced(),
    end("endunless", "unless"),
    opens("isset", "isset"),
    end("endisset", "isset"),
    middle("empty", FORELSE)
        .form(InlineForm::OpensWithArgs { family: "empty" }),
    end("endempty", "empty"),
    opens("hasSection", "if"),
    opens("sectionMissing", "if"),
    opens("env", "env"),
    end("endenv", "env"),
    opens("production", "production").no_args(),
    end("endproduction", "production"),
    opens("error", "error"),
    end("enderror", "error"),
    opens("session", "session"),
    end("endsession", "session"),
    // Authentication and authorization
    opens("auth", "auth"),
    middle("elseauth", AUTH_LIKE),
    end("endauth", "auth"),
    opens("guest", "guest"),
    middle("elseguest", AUTH_LIKE),
    end("endguest", "guest"),
    opens("can", "can"),
    middle("elsecan", CAN_LIKE),
    end("endcan", "can"),
    opens("cannot", "cannot"),
    middle("elsecannot", CAN_LIKE),
    end("endcannot", "cannot"),
    opens("canany", "canany"),
    middle("elsecanany", CAN_LIKE),
    end("endcanany", "canany"),
    // Switch
    opens("switch", "switch"),
    middle("case", SWITCH),
    middle("default", SWITCH).no_args(),
    DirectiveDescriptor::new(
        "break",
        Pairing::Middle {
            families: SWITCH,
            optional: true,
            dedent: false,
        },
    )
    .inline_condition(),
    end("endswitch", "switch"),
    // Loops
    opens("for", "for").spaced(),
    end("endfor", "for"),
    opens("foreach", "foreach").spaced(),
    end("endforeach", "foreach"),
    opens("forelse", "forelse").spaced(),
    end("endforelse", "forelse"),
    opens("while", "while").spaced(),
    end("endwhile", "while"),
    standalone("continue").inline_condition(),
    // Template inheritance
    standalone("extends"),
    standalone("extendsFirst"),
    opens("section", "section").form(InlineForm::StandaloneWithComma),
    closes("endsection", "section", CloseKind::EndSection),
    closes("show", "section", CloseKind::Show),
    closes("overwrite", "section", CloseKind::Overwrite),
    closes("stop", "section", CloseKind::Stop),
    closes("append", "section", CloseKind::Append),
    standalone("yield"),
    standalone("parent").no_args(),
    // Stacks
    opens("push", "push").form(InlineForm::StandaloneWithComma),
    end("endpush", "push"),
    opens("pushOnce", "pushOnce"),
    end("endPushOnce", "pushOnce"),
    opens("pushIf", "pushIf"),
    end("endPushIf", "pushIf"),
    opens("prepend", "prepend").form(InlineForm::StandaloneWithComma),
    end("endprepend", "prepend"),
    opens("prependOnce", "prependOnce"),
    end("endPrependOnce", "prependOnce"),
    standalone("stack"),
    opens("once", "once"),
    end("endonce", "once"),
    // Components
    opens("component", "component"),
    end("endcomponent", "component"),
    opens("componentFirst", "componentFirst"),
    end("endComponentFirst", "componentFirst"),
    opens("slot", "slot").form(InlineForm::StandaloneWithComma),
    end("endslot", "slot"),
    standalone("props"),
    standalone("aware"),
    opens("fragment", "fragment"),
    end("endfragment", "fragment"),
    // Includes
    standalone("include"),
    standalone("includeIf"),
    standalone("includeWhen"),
    standalone("includeUnless"),
    standalone("includeFirst"),
    standalone("includeIsolated"),
    standalone("each"),
    // Forms and attributes
    standalone("csrf").no_args(),
    standalone("method"),
    standalone("class"),
    standalone("style"),
    standalone("checked"),
    standalone("selected"),
    standalone("disabled"),
    standalone("readonly"),
    standalone("required"),
    // Raw regions
    DirectiveDescriptor::new(
        "verbatim",
        Pairing::Raw {
            closer: "endverbatim",
            kind: RawKind::Verbatim,
        },
    )
    .no_args(),
    end("endverbatim", "verbatim"),
    DirectiveDescriptor::new(
        "php",
        Pairing::Raw {
            closer: "endphp",
            kind: RawKind::RawCode,
        },
    )
    .form(InlineForm::StandaloneWithArgs),
    end("endphp", "php"),
    // Utilities
    standalone("json"),
    standalone("js"),
    standalone("dd"),
    standalone("dump"),
    standalone("lang"),
    standalone("choice"),
    standalone("inject"),
    standalone("use"),
    standalone("unset"),
    standalone("vite"),
    standalone("viteReactRefresh").no_args(),
    // Livewire
    standalone("livewire"),
    standalone("livewireStyles").no_args(),
    standalone("livewireScripts").no_args(),
    standalone("livewireScriptConfig").no_args(),
    standalone("entangle"),
    standalone("this"),
    opens("teleport", "teleport"),
    end("endteleport", "teleport"),
    opens("persist", "persist"),
    end("endpersist", "persist"),
    opens("script", "script").no_args(),
    end("endscript", "script"),
    opens("assets", "assets").no_args(),
    end("endassets", "assets"),
];

static REGISTRY: LazyLock<HashMap<String, &'static DirectiveDescriptor>> = LazyLock::new(|| {
    DIRECTIVES
        .iter()
        .map(|d| (d.name.to_ascii_lowercase(), d))
        .collect()
});

/// Look up a directive by name (without the `@`), ignoring case.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static DirectiveDescriptor> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        REGISTRY.get(&name.to_ascii_lowercase()).copied()
    } else {
        REGISTRY.get(name).copied()
    }
}

/// Whether `name` is a registered directive.
#[must_use]
pub fn is_registered(name: &str) -> bool {
    lookup(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_case_insensitive() {
        let descriptor = lookup("ENDIF").unwrap();
        assert_eq!(descriptor.name, "endif");
        assert_eq!(lookup("endpushonce").unwrap().name, "endPushOnce");
    }

    #[test]
    fn test_unknown_directive() {
        assert!(lookup("click").is_none());
        assert!(!is_registered("mycustom"));
    }

    #[test]
    fn test_no_duplicate_names() {
        assert_eq!(REGISTRY.len(), DIRECTIVES.len());
    }

    #[test]
    fn test_section_closers_are_distinct() {
        let kinds: Vec<_> = ["endsection", "show", "overwrite", "stop", "append"]
            .iter()
            .map(|name| match lookup(name).unwrap().pairing {
                Pairing::Closes { family, kind } => {
                    assert_eq!(family, "section");
                    kind
                }
                other => panic!("unexpected pairing {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                CloseKind::EndSection,
                CloseKind::Show,
                CloseKind::Overwrite,
                CloseKind::Stop,
                CloseKind::Append,
            ]
        );
    }

    #[test]
    fn test_has_section_joins_if_family() {
        assert_eq!(
            lookup("hasSection").unwrap().pairing,
            Pairing::Opens { family: "if" }
        );
    }

    #[test]
    fn test_section_with_two_args_is_standalone() {
        let section = lookup("section").unwrap();
        assert_eq!(section.pairing_for(Some("('title', 'Home')")), Pairing::None);
        assert_eq!(
            section.pairing_for(Some("('content')")),
            Pairing::Opens { family: "section" }
        );
        assert_eq!(
            section.pairing_for(Some("('title', fn($a, $b) => 1)")),
            Pairing::None
        );
    }

    #[test]
    fn test_comma_inside_string_is_not_top_level() {
        let section = lookup("section").unwrap();
        assert_eq!(
            section.pairing_for(Some("('a, b')")),
            Pairing::Opens { family: "section" }
        );
    }

    #[test]
    fn test_empty_with_args_opens_block() {
        let empty = lookup("empty").unwrap();
        assert_eq!(
            empty.pairing_for(Some("($items)")),
            Pairing::Opens { family: "empty" }
        );
        assert!(matches!(empty.pairing_for(None), Pairing::Middle { .. }));
    }

    #[test]
    fn test_php_with_args_is_standalone() {
        let php = lookup("php").unwrap();
        assert_eq!(php.pairing_for(Some("($x = 1)")), Pairing::None);
        assert!(matches!(php.pairing_for(None), Pairing::Raw { .. }));
    }

    #[test]
    fn test_break_is_optional_middle() {
        let descriptor = lookup("break").unwrap();
        assert!(matches!(
            descriptor.pairing,
            Pairing::Middle {
                optional: true,
                dedent: false,
                ..
            }
        ));
        assert!(descriptor.allows_inline_condition);
    }

    #[test]
    fn test_control_structures_are_spaced() {
        for name in ["if", "elseif", "unless", "foreach", "forelse", "for", "while"] {
            assert!(lookup(name).unwrap().space_before_args, "{name}");
        }
        assert!(!lookup("include").unwrap().space_before_args);
        assert!(!lookup("switch").unwrap().space_before_args);
    }
}
