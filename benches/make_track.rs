use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hifitime::{Duration, Epoch};

use solrace::geodesy::{MercatorGeodesy, Position};
use solrace::providers::{ConstantWind, GridPolar};
use solrace::race::Race;

fn bench_race(legs: usize) -> Race {
    let polar = GridPolar::new(
        vec![0.0, 10.0, 20.0, 30.0],
        vec![0.0, 45.0, 90.0, 135.0, 180.0],
        vec![
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 6.0, 9.0, 11.0],
            vec![0.0, 8.0, 12.0, 15.0],
            vec![0.0, 7.0, 11.0, 14.0],
            vec![0.0, 5.0, 9.0, 12.0],
        ],
    );
    let mut race = Race::new(
        "bench",
        "Benchmark leg",
        Box::new(ConstantWind::new(12.0, 0.0)),
        Box::new(polar),
        Box::new(MercatorGeodesy),
    );

    // A zigzag of hour-long legs alternating between two reaching courses.
    let start = Epoch::from_gregorian_utc_at_midnight(2026, 3, 1);
    let points: Vec<(Epoch, Position)> = (0..=legs)
        .map(|i| {
            let lat = if i % 2 == 0 { 0.0 } else { 0.1 };
            (
                start + Duration::from_seconds(i as f64 * 3600.0),
                Position::new(lat, 0.2 * i as f64),
            )
        })
        .collect();
    race.set_dcs_from_track(&points).unwrap();
    race.enrich_dcs();
    race
}

fn benchmark_make_track(c: &mut Criterion) {
    let race = bench_race(48);
    c.bench_function("make_track_48_legs", |b| {
        b.iter(|| black_box(&race).make_track().unwrap())
    });
}

fn benchmark_replan(c: &mut Criterion) {
    c.bench_function("replan_48_legs", |b| {
        b.iter(|| {
            let mut race = bench_race(48);
            race.replan().unwrap();
            race
        })
    });
}

criterion_group!(benches, benchmark_make_track, benchmark_replan);
criterion_main!(benches);
