//! Per-pixel classification of an image into a histogram of reference colors

use crate::{
	convert::{pack_rgb, unpack_rgb},
	distance::{dispatch, DistanceMetric},
	error::{Error, Result},
	matcher::PaletteMatcher,
	reference::{ReferenceColor, ReferencePalette},
	Metric,
};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use palette::Srgb;
use std::collections::HashMap;

/// A 2D buffer of packed `0xRRGGBB` pixels that can be read
pub trait PixelSource {
	/// Width and height in pixels
	fn size(&self) -> (u32, u32);

	/// The packed `0xRRGGBB` color at `(x, y)`, where `x < width` and `y < height`
	fn packed_pixel(&self, x: u32, y: u32) -> u32;

	/// Total number of pixels
	fn pixel_count(&self) -> u64 {
		let (width, height) = self.size();
		u64::from(width) * u64::from(height)
	}
}

/// A [`PixelSource`] whose pixels can also be replaced
pub trait PixelSink: PixelSource {
	/// Replace the color at `(x, y)` with a packed `0xRRGGBB` value
	fn put_packed_pixel(&mut self, x: u32, y: u32, rgb: u32);
}

impl PixelSource for RgbImage {
	fn size(&self) -> (u32, u32) {
		self.dimensions()
	}

	fn packed_pixel(&self, x: u32, y: u32) -> u32 {
		let Rgb([r, g, b]) = *self.get_pixel(x, y);
		pack_rgb(Srgb::new(r, g, b))
	}
}

impl PixelSink for RgbImage {
	fn put_packed_pixel(&mut self, x: u32, y: u32, rgb: u32) {
		let color = unpack_rgb(rgb);
		self.put_pixel(x, y, Rgb([color.red, color.green, color.blue]));
	}
}

impl PixelSource for RgbaImage {
	fn size(&self) -> (u32, u32) {
		self.dimensions()
	}

	fn packed_pixel(&self, x: u32, y: u32) -> u32 {
		let Rgba([r, g, b, _]) = *self.get_pixel(x, y);
		pack_rgb(Srgb::new(r, g, b))
	}
}

impl PixelSink for RgbaImage {
	/// Alpha is left unchanged
	fn put_packed_pixel(&mut self, x: u32, y: u32, rgb: u32) {
		let color = unpack_rgb(rgb);
		let alpha = self.get_pixel(x, y)[3];
		self.put_pixel(x, y, Rgba([color.red, color.green, color.blue, alpha]));
	}
}

/// The size of `image`, or [`Error::EmptyImage`] if it has no pixels
pub(crate) fn checked_size(image: &impl PixelSource) -> Result<(u32, u32)> {
	match image.size() {
		(0, height) => Err(Error::EmptyImage { width: 0, height }),
		(width, 0) => Err(Error::EmptyImage { width, height: 0 }),
		size => Ok(size),
	}
}

/// The number of pixels matched to each reference color
///
/// Only colors matched by at least one pixel are present, in palette order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Histogram {
	/// Matched colors and their pixel counts, in palette order
	entries: Vec<(ReferenceColor, u64)>,
}

impl Histogram {
	/// Build a histogram from counts indexed by palette entry, dropping zero counts
	fn from_counts(palette: &ReferencePalette, counts: &[u64]) -> Self {
		Self {
			entries: palette
				.iter()
				.zip(counts)
				.filter(|&(_, &count)| count > 0)
				.map(|(color, &count)| (color.clone(), count))
				.collect(),
		}
	}

	/// The pixel count for the color with the given name, if any pixel matched it
	#[must_use]
	pub fn get(&self, name: &str) -> Option<u64> {
		self.entries
			.iter()
			.find_map(|(color, count)| (color.name == name).then_some(*count))
	}

	/// Iterate over the matched colors and their counts in palette order
	pub fn iter(&self) -> impl Iterator<Item = (&ReferenceColor, u64)> + '_ {
		self.entries.iter().map(|(color, count)| (color, *count))
	}

	/// The number of distinct colors that were matched
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether no pixel was classified
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The sum of all counts, i.e., the number of classified pixels
	#[must_use]
	pub fn total(&self) -> u64 {
		self.entries.iter().map(|&(_, count)| count).sum()
	}
}

/// Classify every pixel of `image`, optionally rewriting it to its matched reference color.
///
/// Pixels are visited in row-major order. With `rewrite` set, each pixel is replaced
/// by the packed color of its match, so classifying the result again gives the same histogram
/// and leaves the image unchanged.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
pub fn classify(
	image: &mut impl PixelSink,
	palette: &ReferencePalette,
	metric: Metric,
	rewrite: bool,
) -> Result<Histogram> {
	dispatch!(metric, classify_with(image, palette, rewrite))
}

/// [`classify`] for a known metric
fn classify_with<D: DistanceMetric>(
	image: &mut impl PixelSink,
	palette: &ReferencePalette,
	rewrite: bool,
) -> Result<Histogram> {
	let (width, height) = checked_size(image)?;
	let matcher = PaletteMatcher::<D>::new(palette);
	let mut counts = vec![0_u64; palette.len()];

	// Color conversion dominates for HSB and Lab.
	// Images usually repeat colors, so memoize the match for each packed color.
	let mut memo: HashMap<u32, usize> = HashMap::new();

	for y in 0..height {
		for x in 0..width {
			let rgb = image.packed_pixel(x, y);
			let index = *memo.entry(rgb).or_insert_with(|| matcher.nearest(rgb).index);
			counts[index] += 1;

			if rewrite {
				image.put_packed_pixel(x, y, palette[index].rgb);
			}
		}
	}

	tracing::debug!(
		width,
		height,
		unique_colors = memo.len(),
		space = %D::COLOR_SPACE,
		rewrite,
		"classified image"
	);

	Ok(Histogram::from_counts(palette, &counts))
}

/// Classify every pixel of `image` without modifying it.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
pub fn histogram(image: &impl PixelSource, palette: &ReferencePalette, metric: Metric) -> Result<Histogram> {
	dispatch!(metric, histogram_with(image, palette))
}

/// [`histogram`] for a known metric
fn histogram_with<D: DistanceMetric>(image: &impl PixelSource, palette: &ReferencePalette) -> Result<Histogram> {
	let (width, height) = checked_size(image)?;
	let matcher = PaletteMatcher::<D>::new(palette);
	let mut counts = vec![0_u64; palette.len()];
	let mut memo: HashMap<u32, usize> = HashMap::new();

	for y in 0..height {
		for x in 0..width {
			let rgb = image.packed_pixel(x, y);
			counts[*memo.entry(rgb).or_insert_with(|| matcher.nearest(rgb).index)] += 1;
		}
	}

	tracing::debug!(width, height, unique_colors = memo.len(), space = %D::COLOR_SPACE, "counted image colors");

	Ok(Histogram::from_counts(palette, &counts))
}

/// Classify every pixel of `image` in parallel, without modifying it.
///
/// Rows are split across threads and the per-thread counts are summed,
/// giving the same result as [`histogram`].
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
#[cfg(feature = "threads")]
pub fn histogram_par(
	image: &(impl PixelSource + Sync),
	palette: &ReferencePalette,
	metric: Metric,
) -> Result<Histogram> {
	dispatch!(metric, histogram_par_with(image, palette))
}

/// [`histogram_par`] for a known metric
#[cfg(feature = "threads")]
fn histogram_par_with<D: DistanceMetric>(
	image: &(impl PixelSource + Sync),
	palette: &ReferencePalette,
) -> Result<Histogram> {
	use rayon::prelude::*;

	let (width, height) = checked_size(image)?;
	let matcher = PaletteMatcher::<D>::new(palette);
	let k = palette.len();

	let counts = (0..height)
		.into_par_iter()
		.fold(
			|| vec![0_u64; k],
			|mut counts, y| {
				for x in 0..width {
					counts[matcher.nearest(image.packed_pixel(x, y)).index] += 1;
				}
				counts
			},
		)
		.reduce(
			|| vec![0_u64; k],
			|mut total, counts| {
				for (total, count) in total.iter_mut().zip(counts) {
					*total += count;
				}
				total
			},
		);

	tracing::debug!(width, height, threads = rayon::current_num_threads(), space = %D::COLOR_SPACE, "counted image colors");

	Ok(Histogram::from_counts(palette, &counts))
}
