//! Benchmarks for neighbor selection
//!
//! Run with: cargo bench --package neighbors
//!
//! Uses a synthetic catalog so it runs without the MovieLens files.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{DataIndex, Movie, Rating};
use factor_model::{FactorRow, RatingScale, SvdModel, SvdParameters};
use neighbors::{NeighborSelector, UserUniverse};
use std::sync::Arc;

const USERS: u32 = 2_000;
const MOVIES: u32 = 500;
const FACTORS: usize = 32;

fn factor_row(id: u32, salt: u32) -> FactorRow {
    FactorRow {
        id,
        bias: ((id * 7 + salt) % 11) as f32 / 20.0 - 0.25,
        factors: (0..FACTORS as u32)
            .map(|k| ((id * 31 + k * 17 + salt) % 13) as f32 / 26.0 - 0.25)
            .collect(),
    }
}

fn build_fixture() -> (Arc<DataIndex>, Arc<SvdModel>) {
    let movies = (1..=MOVIES)
        .map(|id| Movie {
            id,
            title: format!("Synthetic {id} (2000)"),
            year: Some(2000),
            genres: Vec::new(),
        })
        .collect();
    let ratings = (1..=USERS)
        .flat_map(|user_id| {
            (0..10).map(move |k| Rating {
                user_id,
                movie_id: (user_id * 13 + k * 29) % MOVIES + 1,
                rating: ((user_id + k) % 10) as f32 / 2.0 + 0.5,
                timestamp: 0,
            })
        })
        .collect();
    let index = DataIndex::from_records(movies, ratings).expect("valid synthetic data");

    let model = SvdModel::new(SvdParameters {
        rating_scale: RatingScale::default(),
        global_mean: 3.5,
        n_factors: FACTORS,
        users: (1..=USERS).map(|id| factor_row(id, 1)).collect(),
        items: (1..=MOVIES).map(|id| factor_row(id, 2)).collect(),
    })
    .expect("valid synthetic model");

    (Arc::new(index), Arc::new(model))
}

fn bench_predict_item(c: &mut Criterion) {
    let (index, model) = build_fixture();
    let selector = NeighborSelector::new(index, model, UserUniverse::Full);

    c.bench_function("predict_item_full_universe", |b| {
        b.iter(|| black_box(selector.predict_item(black_box(42))))
    });
}

fn bench_select(c: &mut Criterion) {
    let (index, model) = build_fixture();
    let selector = NeighborSelector::new(index, model, UserUniverse::default());

    c.bench_function("select_three_favourites", |b| {
        b.iter(|| black_box(selector.select(black_box(&[1, 250, 499])).unwrap()))
    });
}

criterion_group!(benches, bench_predict_item, bench_select);
criterion_main!(benches);
