use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use preprocess::{CpuPreProcessor, Preprocess};

/// Create an RGB image with a gradient pattern
fn create_test_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

fn benchmark_cpu_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_preprocess");

    // Typical radiograph exports plus a phone photo
    let resolutions = [(224, 224), (512, 512), (1024, 1280), (3024, 4032)];

    let mut preprocessor = CpuPreProcessor::default();

    for (width, height) in resolutions.iter() {
        let image = create_test_image(*width, *height);

        group.bench_with_input(
            BenchmarkId::new("stretch", format!("{}x{}", width, height)),
            &image,
            |b, image| {
                b.iter(|| preprocessor.preprocess(black_box(image)).unwrap());
            },
        );
    }

    group.finish();
}

fn benchmark_rgba_conversion(c: &mut Criterion) {
    let img = RgbaImage::from_pixel(1024, 1024, Rgba([90, 120, 200, 128]));
    let image = DynamicImage::ImageRgba8(img);
    let mut preprocessor = CpuPreProcessor::default();

    c.bench_function("cpu_preprocess_rgba_1024", |b| {
        b.iter(|| preprocessor.preprocess(black_box(&image)).unwrap());
    });
}

criterion_group!(benches, benchmark_cpu_preprocess, benchmark_rgba_conversion);
criterion_main!(benches);
