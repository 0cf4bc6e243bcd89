//! Benchmarks for scale-bar removal
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use scalebar_clean::cleanup::{RegionPlanes, TeleaInpainter};
use scalebar_clean::{inpaint_scale_bar, ScaleBarOptions};

/// Textured micrograph with a white bar and label in the corner
fn synthetic_micrograph(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_fn(width, height, |x, y| {
        let v = (30 + (x * 7 + y * 3) % 90) as u8;
        Rgb([v, v, v])
    });
    let bar_y = height - height / 30 - 2;
    for x in width * 88 / 100..width * 97 / 100 {
        for y in bar_y..bar_y + 2u32.max(height / 200) {
            img.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    img
}

/// Benchmark the Telea core on a region with a horizontal bar mask
fn bench_telea(c: &mut Criterion) {
    let mut group = c.benchmark_group("telea");

    for size in [32u32, 64, 128, 256].iter() {
        let (w, h) = (*size, *size / 2);
        let data: Vec<f32> = (0..w * h).map(|i| (i % 97) as f32).collect();
        let mask = GrayImage::from_fn(w, h, |x, y| {
            if y >= h / 3 && y < h / 3 + h / 8 + 1 && x > 2 && x < w - 2 {
                Luma([255])
            } else {
                Luma([0])
            }
        });

        group.throughput(Throughput::Elements((w * h) as u64));
        group.bench_with_input(
            BenchmarkId::new("inpaint", format!("{}x{}", w, h)),
            &(w, h),
            |b, &(w, h)| {
                let inpainter = TeleaInpainter::default();
                b.iter(|| {
                    let mut planes = RegionPlanes::from_samples(w, h, 1, 255.0, data.clone());
                    inpainter.inpaint(black_box(&mut planes), black_box(&mask))
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the full per-image removal
fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("inpaint_scale_bar");
    group.sample_size(20);

    for (w, h) in [(1024u32, 768u32), (2048, 1536)].iter() {
        let image = DynamicImage::ImageRgb8(synthetic_micrograph(*w, *h));
        let options = ScaleBarOptions::default();

        group.throughput(Throughput::Elements((*w as u64) * (*h as u64)));
        group.bench_with_input(
            BenchmarkId::new("rgb8", format!("{}x{}", w, h)),
            &image,
            |b, image| {
                b.iter(|| inpaint_scale_bar(black_box(image.clone()), &options));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_telea, bench_remove);
criterion_main!(benches);
