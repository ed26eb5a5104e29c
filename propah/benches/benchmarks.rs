use criterion::{criterion_group, criterion_main, Criterion};
use propah::{intermod, Component, HeatmapRequest, Kind, RejectionCurve, Tone};

fn transmitters(n: usize) -> Vec<Component> {
    (0..n)
        .map(|i| {
            let i = i as f64;
            Component::new(format!("FM_{i}"), Kind::Tower, 44.25 + i * 1e-3, -71.30 + i * 1e-3)
                .radio(117.9 + i * 0.025, 50.0)
        })
        .collect()
}

fn heatmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("Heatmap");

    let request = HeatmapRequest {
        center_lat: 44.28309806603165,
        center_lon: -71.30830716441369,
        radius_km: 3.0,
        step_m: 200.0,
        f_rx_mhz: 118.0,
        window_khz: 150.0,
        max_order: 3,
        filter: RejectionCurve::standard(),
        transmitters: transmitters(16),
    };

    group.bench_with_input("3km/200m", &request, |b, r| b.iter(|| r.sample()));
}

fn intermod_products(c: &mut Criterion) {
    let mut group = c.benchmark_group("Intermod");

    let components = transmitters(32);
    let tones: Vec<Tone> = components
        .iter()
        .filter_map(Component::emitter)
        .map(Tone::from)
        .collect();

    for order in [2_u8, 3, 5] {
        group.bench_with_input(format!("32 tones, order {order}"), &tones, |b, t| {
            b.iter(|| intermod::products(t, order))
        });
    }
}

criterion_group!(benches, heatmap, intermod_products);
criterion_main!(benches);
