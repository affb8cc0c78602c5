use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use divquant::{Color, QuantizeConfig, NearestMapper, Palette, quantize_and_map};
use std::hint::black_box;

fn synthetic_image(rows: usize, cols: usize) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let red = ((r * 13 + c * 7) % 256) as u8;
            let green = ((r * 31 + c * 3) % 256) as u8;
            let blue = ((r * 5 + c * 17) % 256) as u8;
            pixels.push(Color::from_rgb(red, green, blue));
        }
    }
    pixels
}

/// Benchmark the Full Pipeline
fn bench_quantize_and_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quantize And Map");
    let pixels = synthetic_image(128, 128);

    for max_colors in [4usize, 16, 64] {
        group.bench_with_input(
            BenchmarkId::new("256x Colors", max_colors),
            &max_colors,
            |b, &k| {
                let config = QuantizeConfig::builder().max_colors(k).build();
                b.iter(|| quantize_and_map(black_box(&pixels), 128, 128, &config).unwrap());
            },
        );
    }
    group.finish();
}

/// Benchmark Deduplication And Clustering Alone (No Final Mapping Pass)
fn bench_clustering_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("Clustering Only");
    let pixels = synthetic_image(256, 256);

    for decimation in [1i64, 2, 4] {
        group.bench_with_input(
            BenchmarkId::new("Decimation", decimation),
            &decimation,
            |b, &d| {
                let config = QuantizeConfig::builder()
                    .max_colors(32)
                    .decimation(d)
                    .build();
                b.iter(|| quantize_and_map(black_box(&pixels), 256, 256, &config).unwrap());
            },
        );
    }
    group.finish();
}

/// Benchmark Nearest-Palette Mapping In Isolation
fn bench_nearest_mapping(c: &mut Criterion) {
    let palette = Palette {
        colors: (0..64)
            .map(|i| Color::from_rgb((i * 4) as u8, (i * 3) as u8, (i * 5) as u8))
            .collect(),
    };
    let mapper = NearestMapper::new(&palette).unwrap();
    let pixels = synthetic_image(64, 64);

    c.bench_function("Map 4096 Pixels Against 64-Color Palette", |b| {
        b.iter(|| {
            for &p in &pixels {
                black_box(mapper.nearest(p));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_quantize_and_map,
    bench_clustering_only,
    bench_nearest_mapping
);
criterion_main!(benches);
