//! Benchmarks for template formatting.

use std::hint::black_box;

use bladefmt_core::{FormatOptions, format, parse};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

const CARD: &str = r#"<div class="card" x-data="{ open: false }">
@if($user->isAdmin())
<x-button wire:click="save({{ $item->id }})" @click.prevent="open = !open">Save</x-button>
@elseif($user->can('edit'))
<span>{{$item->name}}</span>
@else
<p>Read only</p>
@endif
@foreach($item->tags as $tag)
<a href="{{ route('tags.show', $tag) }}" :class="{ active: open }">{{ $tag->label }}</a>
@endforeach
</div>
"#;

/// Create a template of `cards` repeated cards inside a layout section.
fn create_template(cards: usize) -> String {
    let mut template = String::from("@extends('layouts.app')\n@section('content')\n");
    for _ in 0..cards {
        template.push_str(CARD);
    }
    template.push_str("@endsection\n");
    template
}

fn bench_parse(c: &mut Criterion) {
    let template = create_template(10);
    c.bench_function("parse_10_cards", |b| b.iter(|| parse(black_box(&template))));
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    let options = FormatOptions::default();
    let unchecked = FormatOptions::default().with_idempotence_check(false);

    for cards in [1, 10, 100] {
        let template = create_template(cards);
        group.throughput(Throughput::Bytes(template.len() as u64));

        group.bench_with_input(BenchmarkId::new("checked", cards), &template, |b, t| {
            b.iter(|| format(black_box(t), &options, None));
        });
        group.bench_with_input(BenchmarkId::new("unchecked", cards), &template, |b, t| {
            b.iter(|| format(black_box(t), &unchecked, None));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_format);
criterion_main!(benches);
