use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ditto_codegen::{generate_page_code, Framework, GenerationOptions};
use ditto_schema::PageDocument;
use serde_json::json;

fn generate_orders_page(c: &mut Criterion) {
    let source = include_str!("../tests/fixtures/orders_page.ditto");
    let doc = PageDocument::from_json(source).unwrap();
    let options = GenerationOptions::default();

    c.bench_function("generate_orders_page", |b| {
        b.iter(|| generate_page_code(black_box(&doc), &options))
    });

    let vue = GenerationOptions::default().with_framework(Framework::Vue);
    c.bench_function("generate_orders_page_vue", |b| {
        b.iter(|| generate_page_code(black_box(&doc), &vue))
    });
}

fn generate_wide_page(c: &mut Criterion) {
    let mut indexes = serde_json::Map::new();
    let mut props = serde_json::Map::new();
    let mut children = Vec::new();
    for i in 0..200 {
        let id = format!("btn{}", i);
        children.push(json!({ "current": id, "isText": false }));
        indexes.insert(
            id.clone(),
            json!({ "id": id, "name": "Button", "packageName": "antd" }),
        );
        props.insert(
            id,
            json!({
                "title": { "value": format!("Button {}", i) },
                "disabled": { "value": false, "valueSource": "state", "valueType": "boolean" }
            }),
        );
    }
    indexes.insert(
        "root".to_string(),
        json!({ "id": "root", "name": "div", "children": children }),
    );

    let source = json!({
        "id": "wide",
        "name": "wide",
        "child": { "current": "root", "isText": false },
        "componentIndexes": indexes,
        "props": props
    });
    let doc = PageDocument::from_json(&source.to_string()).unwrap();
    let options = GenerationOptions::default();

    c.bench_function("generate_wide_page", |b| {
        b.iter(|| generate_page_code(black_box(&doc), &options))
    });
}

criterion_group!(benches, generate_orders_page, generate_wide_page);
criterion_main!(benches);
