use std::fmt::Write;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use tui_trace_tree::{
    extract_details, flatten, parse_str, resolve, toggle_by_label, view, TraceNode,
};

/// A sitemap with `pipelines` pipelines of `invocations` invocations each.
fn generated_trace(pipelines: usize, invocations: usize) -> String {
    let mut markup = String::from(r#"<cocoon-profiling><node name="Sitemap" executionTime="100">"#);
    for pipeline in 0..pipelines {
        write!(markup, r#"<node name="pipeline-{pipeline}" executionTime="10"><invocations>"#).unwrap();
        for invocation in 0..invocations {
            write!(
                markup,
                r#"<invocation name="Component{invocation}" executionTime="1">
                    <arguments><java.lang.String name="src">file-{invocation}.xml</java.lang.String></arguments>
                    <properties><java.lang.Boolean name="cached">false</java.lang.Boolean></properties>
                    <result><java.lang.Integer name="size">{invocation}</java.lang.Integer></result>
                    <profiler>org.apache.cocoon.profiling.profiler.PipelineComponentProfiler</profiler>
                </invocation>"#
            )
            .unwrap();
        }
        markup.push_str("</invocations></node>");
    }
    markup.push_str("</node></cocoon-profiling>");
    markup
}

fn parse(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("parse");
    group.throughput(Throughput::Elements(1));

    let small = generated_trace(1, 5);
    group.bench_function("small", |bencher| {
        bencher.iter(|| black_box(parse_str(black_box(&small), true).unwrap()));
    });

    let large = generated_trace(50, 40);
    group.bench_function("large", |bencher| {
        bencher.iter(|| black_box(parse_str(black_box(&large), true).unwrap()));
    });

    group.finish();
}

fn select(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("select");
    group.throughput(Throughput::Elements(1));

    let root = parse_str(&generated_trace(50, 40), true).unwrap();
    let last = root.visible_len() - 1;

    group.bench_function("resolve-last", |bencher| {
        bencher.iter(|| black_box(resolve(black_box(&root), black_box(last))));
    });

    group.bench_function("resolve-and-extract", |bencher| {
        bencher.iter(|| black_box(resolve(&root, black_box(last)).map(extract_details)));
    });

    group.bench_function("flatten", |bencher| {
        bencher.iter(|| black_box(flatten(black_box(&root))));
    });

    let symbols = view::Symbols::default();
    group.bench_function("tree-lines", |bencher| {
        bencher.iter(|| black_box(view::tree_lines(black_box(&root), &symbols)));
    });

    group.finish();
}

fn toggle(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("toggle");
    group.throughput(Throughput::Elements(1));

    let root = parse_str(&generated_trace(50, 40), true).unwrap();
    group.bench_function("invocations", |bencher| {
        bencher.iter_batched(
            || root.clone(),
            |mut root: TraceNode| {
                black_box(toggle_by_label(&mut root, "invocations", false));
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Create flamegraphs with `cargo bench --bench bench -- --profile-time=5`
#[cfg(unix)]
fn profiled() -> Criterion {
    use pprof::criterion::{Output, PProfProfiler};
    Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}
#[cfg(not(unix))]
fn profiled() -> Criterion {
    Criterion::default()
}

criterion_group! {
    name = benches;
    config = profiled();
    targets = parse, select, toggle
}
criterion_main!(benches);
