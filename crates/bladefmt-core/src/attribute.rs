//! Attribute-context disambiguation.
//!
//! Inside a tag, a leading `@` or `:` belongs to a client-side framework
//! (Alpine, Livewire, Vue), never to a Blade directive. This module decides
//! what an attribute name is so the scanner can keep it opaque.

use crate::registry;

/// Classification of an attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeClass {
    /// `@click`, `x-on:click`, `v-on:click`
    ForeignEventBinding,
    /// `:class` on plain tags, `::class`, `x-bind:class`, `v-bind:class`
    ForeignPropertyBinding,
    /// `x-data`, `x-show`, `wire:model`, `v-if`
    ForeignDirective,
    /// `:prop` on a `<x-...>` component: a PHP expression passed to it.
    HostShorthandEcho,
    Plain,
}

impl AttributeClass {
    /// Whether the attribute belongs to a client-side framework.
    pub fn is_foreign(self) -> bool {
        matches!(
            self,
            Self::ForeignEventBinding | Self::ForeignPropertyBinding | Self::ForeignDirective
        )
    }

    /// Position of the class when attributes are sorted.
    pub(crate) fn sort_group(self) -> u8 {
        match self {
            Self::Plain => 0,
            Self::HostShorthandEcho => 1,
            Self::ForeignDirective => 2,
            Self::ForeignPropertyBinding => 3,
            Self::ForeignEventBinding => 4,
        }
    }
}

/// Result of classifying an attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Classified {
    pub(crate) class: AttributeClass,
    /// Set when the name could be read more than one way; the attribute is
    /// then passed through as [`AttributeClass::Plain`].
    pub(crate) ambiguity: Option<String>,
}

impl Classified {
    fn clear(class: AttributeClass) -> Self {
        Self {
            class,
            ambiguity: None,
        }
    }

    fn ambiguous(message: String) -> Self {
        Self {
            class: AttributeClass::Plain,
            ambiguity: Some(message),
        }
    }
}

/// Whether a tag name invokes a component.
pub(crate) fn is_component_tag(tag_name: &str) -> bool {
    tag_name.len() > 2
        && tag_name
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("x-"))
}

/// Classify an attribute `name` found on `tag_name`.
///
/// `has_value` tells whether the name is followed by `=`.
pub(crate) fn classify(name: &str, tag_name: &str, has_value: bool) -> Classified {
    if let Some(rest) = name.strip_prefix('@') {
        return classify_at(name, rest, has_value);
    }
    if name.starts_with("::") {
        return Classified::clear(AttributeClass::ForeignPropertyBinding);
    }
    if let Some(rest) = name.strip_prefix(':') {
        if !rest.starts_with(is_binding_start) {
            return Classified::ambiguous(format!("`{name}` has no binding name after `:`"));
        }
        let class = if is_component_tag(tag_name) {
            AttributeClass::HostShorthandEcho
        } else {
            AttributeClass::ForeignPropertyBinding
        };
        return Classified::clear(class);
    }

    let lower = name.to_ascii_lowercase();
    let class = if lower.starts_with("x-on:") || lower.starts_with("v-on:") {
        AttributeClass::ForeignEventBinding
    } else if lower.starts_with("x-bind:") || lower.starts_with("v-bind:") {
        AttributeClass::ForeignPropertyBinding
    } else if lower.starts_with("x-") || lower.starts_with("wire:") || lower.starts_with("v-") {
        AttributeClass::ForeignDirective
    } else {
        AttributeClass::Plain
    };
    Classified::clear(class)
}

fn classify_at(name: &str, rest: &str, has_value: bool) -> Classified {
    let base_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    let base = &rest[..base_len];
    if base.is_empty() || !base.starts_with(is_binding_start) {
        return Classified::ambiguous(format!("`{name}` has no event name after `@`"));
    }
    let has_parens = rest[base_len..].starts_with('(');
    if registry::is_registered(base) && (!has_value || has_parens) {
        return Classified::ambiguous(format!(
            "`{name}` in a tag could be the @{base} directive or an event binding; left unchanged"
        ));
    }
    Classified::clear(AttributeClass::ForeignEventBinding)
}

fn is_binding_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || c == '['
}
