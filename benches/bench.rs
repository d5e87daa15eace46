// Criterion benchmarks for MRT Food

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mrt_food::core::{calculate_smart_score, filter_candidates, meters_between, ResultRanker};
use mrt_food::models::{
    BusinessStatus, Candidate, Coordinates, FilterCriteria, PriceFilterRange, ScoringWeights,
    SortMode,
};

const STATION: Coordinates = Coordinates { lat: 25.0478, lng: 121.5170 };

fn create_candidate(id: usize) -> Candidate {
    let lat_offset = (id as f64 * 0.0001) % 0.01;
    let lng_offset = (id as f64 * 0.00013) % 0.01;

    Candidate {
        id: format!("place_{}", id),
        name: format!("Place {}", id),
        coordinates: (id % 7 != 0)
            .then(|| Coordinates::new(STATION.lat + lat_offset, STATION.lng + lng_offset)),
        rating: Some(3.0 + (id % 20) as f64 / 10.0),
        review_count: Some((id * 37 % 2000) as u32),
        price_tier: (id % 5 != 0).then_some((id % 4 + 1) as u8),
        business_status: Some(if id % 13 == 0 {
            BusinessStatus::ClosedPermanently
        } else {
            BusinessStatus::Operational
        }),
        open_now: Some(id % 3 != 0),
        types: vec!["restaurant".to_string()],
        ..Default::default()
    }
}

fn bench_meters_between(c: &mut Criterion) {
    let other = Coordinates::new(25.0527, 121.5203);
    c.bench_function("meters_between", |b| {
        b.iter(|| meters_between(black_box(STATION), black_box(other)));
    });
}

fn bench_smart_score(c: &mut Criterion) {
    let candidate = create_candidate(42);
    let weights = ScoringWeights::default();
    c.bench_function("smart_score", |b| {
        b.iter(|| calculate_smart_score(black_box(&candidate), black_box(STATION), &weights));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let ranker = ResultRanker::with_default_weights();
    let criteria = FilterCriteria {
        price_range: Some(PriceFilterRange::from_level(3)),
        ..Default::default()
    };

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [20, 60, 200, 1000].iter() {
        let candidates: Vec<Candidate> = (0..*candidate_count).map(create_candidate).collect();

        for sort_mode in [SortMode::Smart, SortMode::Distance] {
            group.bench_with_input(
                BenchmarkId::new(format!("rank_{}", sort_mode), candidate_count),
                candidate_count,
                |b, _| {
                    b.iter(|| {
                        ranker.rank(
                            black_box(&candidates),
                            black_box(STATION),
                            &criteria,
                            sort_mode,
                            black_box(12),
                        )
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_filtering_pipeline(c: &mut Criterion) {
    let candidates: Vec<Candidate> = (0..200).map(create_candidate).collect();
    let criteria = FilterCriteria {
        price_range: Some(PriceFilterRange::from_level(2)),
        open_now_only: true,
        min_rating: 3.5,
        ..Default::default()
    };

    c.bench_function("filtering_pipeline_200_candidates", |b| {
        b.iter(|| black_box(filter_candidates(black_box(&candidates), &criteria)));
    });
}

criterion_group!(
    benches,
    bench_meters_between,
    bench_smart_score,
    bench_ranking,
    bench_filtering_pipeline
);

criterion_main!(benches);
