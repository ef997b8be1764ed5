use colortag::{classify, histogram, mean_brightness, Metric, ReferencePalette};
use criterion::{
	black_box, criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, BenchmarkId, Criterion,
	SamplingMode,
};
use image::{Rgb, RgbImage};
use std::time::Duration;

const METRICS: [(&str, Metric); 4] = [
	("perceptual-rgb", Metric::PerceptualRgb),
	("normalized-rgb", Metric::NormalizedRgb),
	("hsb", Metric::Hsb),
	("lab", Metric::Lab),
];

/// Deterministic images with many distinct colors
#[allow(clippy::cast_possible_truncation)]
fn test_images() -> Vec<(String, RgbImage)> {
	[(480, 270), (1920, 1080)]
		.into_iter()
		.map(|(width, height)| {
			let image = RgbImage::from_fn(width, height, |x, y| {
				Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, ((x ^ y) & 0xFF) as u8])
			});
			(format!("{width}x{height}"), image)
		})
		.collect()
}

fn create_group<'a>(c: &'a mut Criterion, name: &'a str) -> BenchmarkGroup<'a, WallTime> {
	let mut group = c.benchmark_group(name);
	group
		.sample_size(30)
		.noise_threshold(0.05)
		.sampling_mode(SamplingMode::Flat)
		.warm_up_time(Duration::from_millis(500));
	group
}

fn histograms(c: &mut Criterion) {
	let mut group = create_group(c, "histogram");
	let palette = ReferencePalette::default();

	for (size, image) in test_images() {
		for (name, metric) in METRICS {
			group.bench_with_input(BenchmarkId::new(name, &size), &image, |b, image| {
				b.iter(|| histogram(image, &palette, black_box(metric)).expect("non-empty image"));
			});
		}
	}
}

#[cfg(feature = "threads")]
fn histograms_par(c: &mut Criterion) {
	let mut group = create_group(c, "histogram_par");
	let palette = ReferencePalette::default();

	for (size, image) in test_images() {
		for (name, metric) in METRICS {
			group.bench_with_input(BenchmarkId::new(name, &size), &image, |b, image| {
				b.iter(|| colortag::histogram_par(image, &palette, black_box(metric)).expect("non-empty image"));
			});
		}
	}
}

fn quantize(c: &mut Criterion) {
	let mut group = create_group(c, "quantize");
	let palette = ReferencePalette::default();

	for (size, image) in test_images() {
		group.bench_with_input(BenchmarkId::from_parameter(&size), &image, |b, image| {
			b.iter_batched_ref(
				|| image.clone(),
				|image| classify(image, &palette, black_box(Metric::PerceptualRgb), true).expect("non-empty image"),
				criterion::BatchSize::LargeInput,
			);
		});
	}
}

fn brightness(c: &mut Criterion) {
	let mut group = create_group(c, "mean_brightness");

	for (size, image) in test_images() {
		group.bench_with_input(BenchmarkId::from_parameter(&size), &image, |b, image| {
			b.iter(|| mean_brightness(image).expect("non-empty image"));
		});
	}
}

#[cfg(feature = "threads")]
criterion_group!(benches, histograms, histograms_par, quantize, brightness);
#[cfg(not(feature = "threads"))]
criterion_group!(benches, histograms, quantize, brightness);
criterion_main!(benches);
