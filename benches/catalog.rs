//! Benchmarks for catalog insert, lookup, genre search and import

use bookshelf::import::load_reader;
use bookshelf::{Book, BookDraft, Catalog, IdGenerator, ImportSchema};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::seq::SliceRandom;
use rand::SeedableRng;

const GENRES: [&str; 5] = ["SciFi", "Romance", "History", "Poetry", "Essay"];

fn book(id: u32) -> Book {
    Book::from_draft(
        id,
        BookDraft::new(
            format!("Title {}", id),
            "Author",
            GENRES[id as usize % GENRES.len()],
            "Publisher",
            2000,
            id,
        ),
    )
}

fn shuffled_ids(size: u32) -> Vec<u32> {
    let mut ids: Vec<u32> = (0..size).collect();
    ids.shuffle(&mut rand::rngs::StdRng::seed_from_u64(1));
    ids
}

fn populated(ids: &[u32]) -> Catalog {
    let mut catalog = Catalog::with_id_generator(IdGenerator::seeded(0, u32::MAX, 1).unwrap());
    for &id in ids {
        catalog.insert(book(id)).unwrap();
    }
    catalog
}

fn benchmark_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_insert");

    for size in [100u32, 1000, 10000].iter() {
        let ids = shuffled_ids(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &ids, |b, ids| {
            b.iter(|| black_box(populated(ids)));
        });
    }

    group.finish();
}

fn benchmark_exists(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_exists");

    for size in [100u32, 1000, 10000].iter() {
        let catalog = populated(&shuffled_ids(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                for id in (0..size).step_by(7) {
                    black_box(catalog.exists(black_box(id)));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_search_by_genre(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_search_by_genre");

    for size in [100u32, 1000, 10000].iter() {
        let catalog = populated(&shuffled_ids(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(catalog.search_by_genre(black_box("poetry")).count()));
        });
    }

    group.finish();
}

fn benchmark_generate_unique_id(c: &mut Criterion) {
    c.bench_function("catalog_generate_unique_id_half_full", |b| {
        let mut catalog = Catalog::with_id_generator(IdGenerator::seeded(0, 2000, 3).unwrap());
        for id in (0..2000).step_by(2) {
            catalog.insert(book(id)).unwrap();
        }
        b.iter(|| black_box(catalog.generate_unique_id().unwrap()));
    });
}

fn benchmark_import(c: &mut Criterion) {
    let mut csv = String::new();
    for id in shuffled_ids(5000) {
        csv.push_str(&format!(
            "{},Title {},Author,{},Publisher,2000,{}\n",
            id,
            id,
            GENRES[id as usize % GENRES.len()],
            id
        ));
    }

    c.bench_function("catalog_import_5000_lines", |b| {
        b.iter(|| {
            let mut catalog = Catalog::new();
            let report = load_reader(csv.as_bytes(), &mut catalog, ImportSchema::WithId).unwrap();
            black_box(report.imported)
        });
    });
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_exists,
    benchmark_search_by_genre,
    benchmark_generate_unique_id,
    benchmark_import
);
criterion_main!(benches);
