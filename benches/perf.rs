use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use squad_matrix::demo_source::DemoMatrixSource;
use squad_matrix::matrix::CoOccurrenceMatrix;
use squad_matrix::matrix_fetch::{MatrixSource, Scope, parse_matrix_json};
use squad_matrix::matrix_html::render_table_html;
use squad_matrix::scale::{BandedScale, ContinuousScale};
use squad_matrix::table::{NameStyle, build_table};

fn sample_json(players: usize) -> String {
    let roster = (0..players)
        .map(|i| format!(r#"{{"id":{i},"first_name":"Player{i}","last_name":"Surname"}}"#))
        .collect::<Vec<_>>()
        .join(",");
    let rows = (0..players)
        .map(|i| {
            let cells = (0..players)
                .map(|j| ((i + j) % 9).to_string())
                .collect::<Vec<_>>()
                .join(",");
            format!("[{cells}]")
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"players":[{roster}],"matrix":[{rows}],"max_value":8}}"#)
}

fn bench_parse(c: &mut Criterion) {
    let raw = sample_json(40);
    c.bench_function("matrix_parse_40", |b| {
        b.iter(|| {
            let matrix = parse_matrix_json(black_box(&raw)).unwrap();
            black_box(matrix.len());
        })
    });
}

fn bench_build_table(c: &mut Criterion) {
    let matrix = DemoMatrixSource::new(1).fetch(&Scope::AllPlayers).unwrap();
    c.bench_function("table_continuous_all_players", |b| {
        b.iter(|| {
            let table = build_table(black_box(&matrix), &ContinuousScale, NameStyle::FirstName);
            black_box(table.size());
        })
    });
    c.bench_function("table_banded_all_players", |b| {
        b.iter(|| {
            let table = build_table(
                black_box(&matrix),
                &BandedScale,
                NameStyle::FirstNameInitial,
            );
            black_box(table.size());
        })
    });
}

fn bench_from_appearances(c: &mut Criterion) {
    let source = DemoMatrixSource::new(9);
    let template = source.fetch(&Scope::Team(1)).unwrap();
    let players = template.players().to_vec();
    let appearances: Vec<(u64, u32)> = (0..200u32)
        .flat_map(|m| {
            players
                .iter()
                .filter(move |p| (p.id + u64::from(m)) % 3 != 0)
                .map(move |p| (p.id, m))
        })
        .collect();
    c.bench_function("from_appearances_200_matches", |b| {
        b.iter(|| {
            let matrix =
                CoOccurrenceMatrix::from_appearances(players.clone(), black_box(&appearances));
            black_box(matrix.max_value());
        })
    });
}

fn bench_html(c: &mut Criterion) {
    let matrix = parse_matrix_json(&sample_json(40)).unwrap();
    let table = build_table(&matrix, &BandedScale, NameStyle::FirstName);
    c.bench_function("html_render_40", |b| {
        b.iter(|| black_box(render_table_html(black_box(&table)).len()))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_build_table,
    bench_from_appearances,
    bench_html
);
criterion_main!(benches);
