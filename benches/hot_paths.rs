use criterion::{black_box, criterion_group, criterion_main, Criterion};
use globe_maps::map::{walk_great_circle, Basemap, GlobeViewport, MapRenderer, RenderSettings, Shape};
use globe_maps::resolver::CountryBoundaries;

/// Jagged ring approximating a continent-sized coastline
fn coastline(lon: f64, lat: f64, radius: f64, vertices: usize) -> Shape {
    let ring = (0..=vertices)
        .map(|i| {
            let a = i as f64 / vertices as f64 * std::f64::consts::TAU;
            let r = radius * (1.0 + 0.1 * (a * 17.0).sin());
            (lon + r * a.cos(), lat + r * a.sin())
        })
        .collect();
    Shape::new(vec![ring]).unwrap()
}

fn bench_projection(c: &mut Criterion) {
    let globe = GlobeViewport::new(2.0, 46.0, 693.0, 1800, 1800);
    c.bench_function("project_clamped_1k", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let lon = (i as f64 * 0.36) - 180.0;
                black_box(globe.project_clamped(black_box(lon), 10.0));
            }
        })
    });

    c.bench_function("walk_great_circle_long_arc", |b| {
        b.iter(|| {
            let mut n = 0usize;
            walk_great_circle(black_box(-170.0), 10.0, black_box(170.0), -40.0, |_, _| n += 1);
            n
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let land = (0..24)
        .map(|i| coastline(-165.0 + i as f64 * 15.0, (i % 5) as f64 * 15.0 - 30.0, 6.0, 2000))
        .collect();
    let boundaries = CountryBoundaries::new([("FRA".to_string(), coastline(2.0, 46.0, 4.0, 500))]);
    let renderer = MapRenderer::new(Basemap::new(land, Vec::new()), boundaries, RenderSettings::new(3.0, 150));

    c.bench_function("render_450px_globe", |b| {
        b.iter(|| renderer.render(black_box("FRA"), 46.0, 2.0))
    });
}

criterion_group!(benches, bench_projection, bench_render);
criterion_main!(benches);
