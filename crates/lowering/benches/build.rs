// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Lowering performance benchmarks
//!
//! Measures a full build of synthetic projects of growing size, and the
//! catalog load it depends on.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mobile_datamodel_catalog::JsonCatalog;
use mobile_datamodel_lowering::build_data_models;
use mobile_datamodel_test_utils::{
    CatalogDocumentBuilder, CatalogTableDef, ProjectDocumentBuilder, ProjectTableDef,
};
use serde_json::Value;

fn table_name(number: i64) -> String {
    format!("Table{number}")
}

/// `tables` tables, each linking to the next and aliasing a field two hops away
fn synthetic_documents(tables: i64) -> (Value, Value) {
    let mut catalog = CatalogDocumentBuilder::new();
    let mut project = ProjectDocumentBuilder::new();

    for number in 1..=tables {
        let name = table_name(number);
        let next = number % tables + 1;
        let next_name = table_name(next);

        catalog = catalog.table(
            CatalogTableDef::new(name.clone(), number)
                .storage("name", 0)
                .storage("amount", 1)
                .to_one("next", &next_name, next, "previous")
                .to_many("previous", &next_name, next, "next")
                .alias("nextNextName", "next.next.name", 0),
        );
        project = project.table(
            number,
            ProjectTableDef::new(&name)
                .storage("1", "name", 0)
                .storage("2", "amount", 1)
                .to_one("next", &next_name, next, "previous")
                .to_many("previous", &next_name, next, "next")
                .alias("nextNextName", "next.next.name", 0),
        );
    }
    (catalog.build(), project.build())
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("lowering/build");
    for tables in [10, 40, 160] {
        let (catalog, project) = synthetic_documents(tables);
        let catalog = JsonCatalog::from_value(&catalog).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(tables), &project, |b, project| {
            b.iter(|| {
                let schema = build_data_models(black_box(project), &catalog).unwrap();
                black_box(schema.models().len());
            });
        });
    }
    group.finish();
}

fn bench_catalog_load(c: &mut Criterion) {
    let (catalog, _) = synthetic_documents(40);
    c.bench_function("lowering/catalog_load", |b| {
        b.iter(|| {
            let loaded = JsonCatalog::from_value(black_box(&catalog)).unwrap();
            black_box(loaded);
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(30);
    targets =
        bench_build,
        bench_catalog_load
);

criterion_main!(benches);
