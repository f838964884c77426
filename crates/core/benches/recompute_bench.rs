use bloomscope::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geo::Point;

const FAMILIES: [&str; 5] = ["Apocynaceae", "Asteraceae", "Fabaceae", "Lamiaceae", "Rosaceae"];

fn dataset(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let family = FAMILIES[i % FAMILIES.len()];
            let genus = format!("{}-{}", family, i % 40);
            let season = Season::ALL[i % 4];
            let year = 2000 + (i % 10) as i32;
            let lon = -118.0 + (i % 300) as f64 * 0.1;
            let lat = 14.5 + (i % 180) as f64 * 0.1;
            Record::new(family, genus, year, season, (i % 500) as f64, Point::new(lon, lat))
        })
        .collect()
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_recompute");

    for size in [1_000usize, 10_000, 50_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("unfiltered", size), size, |b, &n| {
            let mut session = SessionBuilder::new().build(ManualScheduler::new()).unwrap();
            session.load_dataset(dataset(n)).unwrap();

            b.iter(|| {
                session.dispatch(Command::Step(Direction::Forward)).unwrap();
                session.dispatch(Command::Step(Direction::Backward)).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("spatial_and_area", size), size, |b, &n| {
            let records = dataset(n);
            let mut session = SessionBuilder::new().build(ManualScheduler::new()).unwrap();
            session.load_dataset(records.clone()).unwrap();
            session
                .dispatch(Command::SetSpatialSelection(Some(records[..n / 2].to_vec())))
                .unwrap();
            session
                .dispatch(Command::SetAreaSelection(Some(records[n / 4..].to_vec())))
                .unwrap();
            session
                .dispatch(Command::ToggleFamily {
                    family: "Rosaceae".to_string(),
                    checked: false,
                })
                .unwrap();

            b.iter(|| {
                session.dispatch(Command::Step(Direction::Forward)).unwrap();
                session.dispatch(Command::Step(Direction::Backward)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_dataset");
    let records = dataset(10_000);
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("10k_records", |b| {
        let mut session = SessionBuilder::new().build(ManualScheduler::new()).unwrap();
        b.iter(|| session.load_dataset(records.clone()).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_load);
criterion_main!(benches);
