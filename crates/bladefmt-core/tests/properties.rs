//! Behavioral properties of `format` over whole templates.

use std::fs;
use std::path::{Path, PathBuf};

use bladefmt_core::{
    Attribute, DiagnosticCode, DirectiveRole, FormatOptions, FormatResult, Node, OpaqueKind,
    Severity, format, parse, registry::CloseKind,
};
use pretty_assertions::assert_eq;

fn fixtures() -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|p| p.to_string_lossy().ends_with(".blade.php"))
        .collect();
    paths.sort();
    paths
}

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(path).unwrap()
}

fn fmt(source: &str) -> FormatResult {
    format(source, &FormatOptions::default(), None)
}

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

#[test]
fn test_fixtures_are_idempotent() {
    let paths = fixtures();
    assert!(!paths.is_empty());
    for path in paths {
        let source = fs::read_to_string(&path).unwrap();
        let first = format(&source, &FormatOptions::default(), Some(&path));
        let second = format(&first.formatted_text, &FormatOptions::default(), Some(&path));
        assert_eq!(
            second.formatted_text,
            first.formatted_text,
            "{} is not idempotent",
            path.display()
        );
    }
}

#[test]
fn test_fixtures_idempotent_with_every_option() {
    let options = FormatOptions::default()
        .with_tabs(true)
        .with_max_line_length(60)
        .with_sorted_attributes(true)
        .with_preserve_blank_lines(0);
    for path in fixtures() {
        let source = fs::read_to_string(&path).unwrap();
        let first = format(&source, &options, Some(&path));
        let second = format(&first.formatted_text, &options, Some(&path));
        assert_eq!(second.formatted_text, first.formatted_text, "{}", path.display());
    }
}

#[test]
fn test_valid_fixtures_format_cleanly() {
    for name in [
        "deep-nesting-if.blade.php",
        "mixed-nesting.blade.php",
        "switch-case.blade.php",
        "verbatim-blade-syntax.blade.php",
    ] {
        let result = fmt(&fixture(name));
        assert!(
            !result.has_errors(),
            "{name}: {:?}",
            result.diagnostics
        );
    }
}

#[test]
fn test_opaque_regions_byte_identical() {
    let comment = "{{--   keep   this\n      spacing   --}}";
    let verbatim = "@verbatim\n  @if($x)   {{ raw }}\n     @endif\n@endverbatim";
    let php = "@php\n    $a  =  1;\n  $b=2;\n@endphp";
    let source = format!("{comment}\n{verbatim}\n<div>\n{php}\n<?php   echo   $b;   ?>\n</div>\n");
    let result = fmt(&source);
    assert!(!result.has_errors(), "{:?}", result.diagnostics);
    let out = &result.formatted_text;
    assert!(out.contains(comment), "{out}");
    assert!(out.contains(verbatim), "{out}");
    assert!(out.contains("    $a  =  1;\n  $b=2;\n@endphp"), "{out}");
    assert!(out.contains("<?php   echo   $b;   ?>"), "{out}");
}

#[test]
fn test_foreign_bindings_never_become_directives() {
    let source = concat!(
        "<div x-data=\"{ open: false }\" @click.outside=\"open = false\" ",
        "@foreach.window=\"reload()\" wire:model.live=\"search\" :class=\"{ 'hidden': !open }\">",
        "<input x-on:keydown.enter=\"submit\" ::value=\"query\" @if=\"ready\">",
        "</div>"
    );
    let document = parse(source).unwrap();
    assert!(document.diagnostics.is_empty(), "{:?}", document.diagnostics);
    let Node::Element(div) = &document.root[0] else {
        panic!("expected element");
    };
    assert!(
        div.start
            .attributes
            .iter()
            .all(|a| matches!(a, Attribute::Named(named) if named.class.is_foreign()))
    );
    assert!(!div.children.iter().any(|n| matches!(n, Node::Block(_))));

    let out = fmt(source).formatted_text;
    for attribute in [
        "x-data=\"{ open: false }\"",
        "@click.outside=\"open = false\"",
        "@foreach.window=\"reload()\"",
        "wire:model.live=\"search\"",
        ":class=\"{ 'hidden': !open }\"",
        "x-on:keydown.enter=\"submit\"",
        "::value=\"query\"",
        "@if=\"ready\"",
    ] {
        assert!(out.contains(attribute), "missing {attribute} in {out}");
    }
    assert!(!out.contains("@endif"));
    assert!(!out.contains("@endforeach"));
}

#[test]
fn test_unclosed_if_loses_nothing() {
    let source = fixture("unclosed-if.blade.php");
    let result = fmt(&source);
    let unclosed: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::UnmatchedDirective)
        .collect();
    assert_eq!(unclosed.len(), 1, "{:?}", result.diagnostics);
    assert_eq!(unclosed[0].severity, Severity::Warning);
    assert!(unclosed[0].message.contains("@if"));
    assert_eq!(words(&result.formatted_text), words(&source));
    assert!(!result.formatted_text.contains("@endif"));
}

#[test]
fn test_unclosed_foreach_loses_nothing() {
    let source = fixture("unclosed-foreach.blade.php");
    let result = fmt(&source);
    assert!(
        result
            .diagnostics
            .iter()
            .any(|d| d.code == DiagnosticCode::UnmatchedDirective && d.message.contains("@foreach"))
    );
    assert_eq!(words(&result.formatted_text), words(&source));
}

#[test]
fn test_ten_nested_ifs() {
    let mut source = String::new();
    for depth in 0..10 {
        source.push_str(&format!("@if($level{depth})\n"));
    }
    source.push_str("deepest\n");
    for _ in 0..10 {
        source.push_str("@endif\n");
    }

    let mut expected = String::new();
    for depth in 0..10 {
        expected.push_str(&format!("{}@if ($level{depth})\n", "    ".repeat(depth)));
    }
    expected.push_str(&format!("{}deepest\n", "    ".repeat(10)));
    for depth in (0..10).rev() {
        expected.push_str(&format!("{}@endif\n", "    ".repeat(depth)));
    }

    let result = fmt(&source);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.formatted_text, expected);
}

#[test]
fn test_switch_fallthrough() {
    let source = "@switch($size)\n@case('s')\n@case('m')\nsmall\n@break\n@default\nlarge\n@endswitch";
    let result = fmt(source);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(
        result.formatted_text,
        "@switch($size)\n    @case('s')\n    @case('m')\n        small\n        @break\n    @default\n        large\n@endswitch\n"
    );

    let document = parse(source).unwrap();
    assert_eq!(document.root.len(), 1);
    let Node::Block(switch) = &document.root[0] else {
        panic!("expected switch block");
    };
    assert_eq!(switch.family, "switch");
    let markers: Vec<&str> = switch
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Directive(d) if d.role == DirectiveRole::Middle => Some(d.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(markers, vec!["case", "case", "break", "default"]);
}

#[test]
fn test_section_closers_kept_apart() {
    let source = "@section('a')\nA\n@show\n@section('b')\nB\n@stop\n@section('c')\nC\n@append";
    let result = fmt(source);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(
        result.formatted_text,
        "@section('a')\n    A\n@show\n@section('b')\n    B\n@stop\n@section('c')\n    C\n@append\n"
    );

    let source = "@section('a')\nA\n@show\n@section('b')\nB\n@endsection\n@section('c')\nC\n@overwrite\n";
    let document = parse(source).unwrap();
    let kinds: Vec<CloseKind> = document
        .root
        .iter()
        .filter_map(|n| match n {
            Node::Block(b) if b.family == "section" => b.close.as_ref().map(|c| c.kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![CloseKind::Show, CloseKind::EndSection, CloseKind::Overwrite]
    );
}

#[test]
fn test_verbatim_is_literal() {
    let source = "@verbatim\n<div>{{$raw}}</div>\n  @if($nope)\n@endverbatim\n";
    let result = fmt(source);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.formatted_text, source);

    let document = parse(source).unwrap();
    assert!(matches!(
        &document.root[0],
        Node::Opaque(span) if span.kind == OpaqueKind::Verbatim
    ));
    assert!(
        !document
            .root
            .iter()
            .any(|n| matches!(n, Node::Directive(_) | Node::Block(_)))
    );
}

#[test]
fn test_alpine_dropdown() {
    let source = r#"<div x-data="{ open: false }"><button @click="open = !open">Toggle</button></div>"#;
    let result = fmt(source);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(
        result.formatted_text,
        "<div x-data=\"{ open: false }\">\n    <button @click=\"open = !open\">Toggle</button>\n</div>\n"
    );
}

#[test]
fn test_stray_closer_reported_and_kept() {
    let source = "<p>a</p>\n@endif\n";
    let result = fmt(source);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, DiagnosticCode::UnmatchedDirective);
    assert_eq!(result.diagnostics[0].line, 2);
    assert!(result.formatted_text.contains("@endif"));
}

#[test]
fn test_mixed_line_endings_keep_opaque_bytes() {
    let result = fmt("<div>\r\n{{-- a\nb --}}\r\n</div>\r\n");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert!(result.formatted_text.contains("{{-- a\nb --}}"));
    assert_eq!(result.formatted_text, "<div>\n    {{-- a\nb --}}\n</div>\n");

    let verbatim = "@verbatim\r\none\ntwo\r\n@endverbatim";
    let result = fmt(&format!("{verbatim}\r\n<p>x</p>\n"));
    assert!(result.formatted_text.starts_with(verbatim), "{:?}", result.formatted_text);
}
