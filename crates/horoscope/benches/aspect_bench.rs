use criterion::{black_box, criterion_group, criterion_main, Criterion};
use horoscope::aspects::{AspectCalculator, AspectSettings, ChartPoint, PointPosition};
use horoscope::ephemeris::Body;

fn bench_detect(c: &mut Criterion) {
    let calculator = AspectCalculator::new();
    let settings = AspectSettings::default();

    c.bench_function("detect_aspect", |b| {
        b.iter(|| calculator.detect(black_box(100.0), black_box(222.0), black_box(&settings)))
    });
}

fn bench_natal_aspects(c: &mut Criterion) {
    let calculator = AspectCalculator::new();
    let settings = AspectSettings::default();

    let mut points: Vec<PointPosition> = Body::ALL
        .iter()
        .enumerate()
        .map(|(i, &body)| PointPosition {
            point: ChartPoint::Body(body),
            longitude: (i as f64) * 30.0,
            speed: Some(1.0),
        })
        .collect();
    points.push(PointPosition {
        point: ChartPoint::Ascendant,
        longitude: 95.0,
        speed: None,
    });
    points.push(PointPosition {
        point: ChartPoint::Midheaven,
        longitude: 5.0,
        speed: None,
    });

    c.bench_function("natal_aspects", |b| {
        b.iter(|| calculator.natal_aspects(black_box(&points), black_box(&settings)))
    });
}

criterion_group!(benches, bench_detect, bench_natal_aspects);
criterion_main!(benches);
