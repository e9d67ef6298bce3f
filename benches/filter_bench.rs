use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docfilter::*;

fn bench_compile_serialize(c: &mut Criterion) {
    let catalog = FieldCatalogBuilder::new()
        .field("age", FieldType::new("age", ValueType::Int))
        .field("open", FieldType::nested_in("map_events", "open", ValueType::Int))
        .field("visits", FieldType::new("timebucket_visits", ValueType::Unknown))
        .build();
    let compiler = FilterCompiler::new(&catalog);
    let range = Node::binary(Node::ident("age"), Operator::Ge, Node::string("21"));
    let between = Node::between(Node::ident("open"), Node::int(7), Node::int(15));
    let window = Node::func(
        "timewindow",
        vec![Node::ident("visits"), Node::int(1), Node::int(3), Node::int(16916)],
    );

    c.bench_function("compile_range", |b| {
        b.iter(|| {
            let _ = compiler.compile(black_box(&range));
        })
    });
    c.bench_function("compile_nested_between", |b| {
        b.iter(|| {
            let _ = compiler.compile(black_box(&between));
        })
    });
    let compiled = compiler.compile(&window).unwrap();
    c.bench_function("serialize_time_window", |b| {
        b.iter(|| {
            let _ = black_box(&compiled).to_json_string();
        })
    });
}

criterion_group!(benches, bench_compile_serialize);
criterion_main!(benches);
