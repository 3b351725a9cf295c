use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use inidoc::{from_str, parse, parse_with_options, serialize, ParseOptions, SerializeOptions};
use serde::Deserialize;

#[derive(Deserialize)]
#[allow(dead_code)]
struct Server {
    host: String,
    port: u16,
    workers: u32,
    tls: bool,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct Config {
    name: String,
    debug: bool,
    server: Server,
}

const CONFIG: &str = "\
; service configuration
name = inventory
debug = off

[server]
host = 0.0.0.0   ; listen everywhere
port = 8080
workers = 16
tls = yes
";

/// A document with `sections` sections of ten keys each.
fn generated(sections: usize) -> String {
    let mut text = String::from("; generated\nversion = 1\n");
    for s in 0..sections {
        text.push_str(&format!("\n# section {s}\n[section-{s}]\n"));
        for k in 0..10 {
            text.push_str(&format!("key{k} = value {s}.{k} ; note\n"));
        }
    }
    text
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [10, 100, 1000].iter() {
        let text = generated(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| parse(black_box(text)))
        });
    }

    group.finish();
}

fn benchmark_parse_lenient(c: &mut Criterion) {
    let mut text = generated(100);
    text.push_str("broken line\n[unterminated\n= no key\n");
    let options = ParseOptions::lenient();

    c.bench_function("parse_lenient_with_errors", |b| {
        b.iter(|| parse_with_options(black_box(&text), &options))
    });
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let doc = parse(&generated(100)).unwrap();

    group.bench_function("round_trip", |b| {
        b.iter(|| serialize(black_box(&doc), &SerializeOptions::round_trip()))
    });

    group.bench_function("canonical", |b| {
        b.iter(|| serialize(black_box(&doc), &SerializeOptions::canonical()))
    });

    let mut edited = doc.clone();
    for s in (0..100).step_by(2) {
        edited.set(&format!("section-{s}"), "key0", "changed");
    }
    group.bench_function("round_trip_edited", |b| {
        b.iter(|| serialize(black_box(&edited), &SerializeOptions::round_trip()))
    });

    group.finish();
}

fn benchmark_deserialize(c: &mut Criterion) {
    c.bench_function("deserialize_config", |b| {
        b.iter(|| from_str::<Config>(black_box(CONFIG)))
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_parse_lenient,
    benchmark_render,
    benchmark_deserialize
);
criterion_main!(benches);
