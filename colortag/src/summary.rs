//! Percentages, dominant colors, and brightness tags derived from a classification

use crate::{
	classify::{checked_size, histogram, Histogram, PixelSource},
	convert::{rgb_to_hsb, unpack_rgb},
	error::{Error, Result},
	reference::{ReferenceColor, ReferencePalette},
	tags::TagSet,
	Metric,
};
use std::fmt::{self, Display};

/// The default minimum percentage of pixels for a color to be tagged
pub const DEFAULT_THRESHOLD: f64 = 20.0;

/// Mean brightness at or above which an image is tagged [`Brightness::Light`]
pub const LIGHT_THRESHOLD: f64 = 0.70;

/// Mean brightness at or below which an image is tagged [`Brightness::Dark`]
pub const DARK_THRESHOLD: f64 = 0.55;

/// A matched reference color and its share of the image
#[derive(Debug, Clone, PartialEq)]
pub struct ColorShare {
	/// The reference color
	pub color: ReferenceColor,
	/// Number of pixels matched to the color
	pub count: u64,
	/// `100 × count / total pixels`
	pub percent: f64,
}

impl Display for ColorShare {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}: {:.2}%", self.color.name, self.percent)
	}
}

/// Convert a histogram to the percentage of `total_pixels` covered by each color, in histogram order.
///
/// `total_pixels` should be the width × height of the classified image,
/// so it is never less than [`Histogram::total`].
///
/// # Errors
/// Returns [`Error::NoPixels`] if `total_pixels` is zero.
///
/// # Panics
/// In debug builds, if `total_pixels` is less than the number of pixels in `histogram`.
pub fn percentages(histogram: &Histogram, total_pixels: u64) -> Result<Vec<ColorShare>> {
	if total_pixels == 0 {
		return Err(Error::NoPixels);
	}
	debug_assert!(
		histogram.total() <= total_pixels,
		"histogram counts {} pixels but the total is {total_pixels}",
		histogram.total()
	);

	// u64 -> f64 is exact for any realistic pixel count
	#[allow(clippy::cast_precision_loss)]
	let total = total_pixels as f64;

	Ok(histogram
		.iter()
		.map(|(color, count)| {
			#[allow(clippy::cast_precision_loss)]
			let percent = 100.0 * count as f64 / total;
			ColorShare { color: color.clone(), count, percent }
		})
		.collect())
}

/// Names of the colors covering at least `threshold` percent of the image, in histogram order
#[must_use]
pub fn dominant_colors(shares: &[ColorShare], threshold: f64) -> Vec<&str> {
	shares
		.iter()
		.filter(|share| share.percent >= threshold)
		.map(|share| share.color.name.as_str())
		.collect()
}

/// A global brightness label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Brightness {
	/// Mean brightness of at least [`LIGHT_THRESHOLD`]
	Light,
	/// Mean brightness of at most [`DARK_THRESHOLD`]
	Dark,
}

impl Brightness {
	/// The tag for this label
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Light => "Light",
			Self::Dark => "Dark",
		}
	}
}

impl Display for Brightness {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The brightness label for a mean brightness in `0.0..=1.0`.
///
/// Means strictly between [`DARK_THRESHOLD`] and [`LIGHT_THRESHOLD`] get no label.
#[must_use]
pub fn brightness_tag(mean_brightness: f64) -> Option<Brightness> {
	// compare fractions directly, since e.g. 0.55 * 100.0 > 55.0
	if mean_brightness >= LIGHT_THRESHOLD {
		Some(Brightness::Light)
	} else if mean_brightness <= DARK_THRESHOLD {
		Some(Brightness::Dark)
	} else {
		None
	}
}

/// HSB brightness of a packed pixel
fn pixel_brightness(rgb: u32) -> f64 {
	let color = unpack_rgb(rgb);
	rgb_to_hsb(color.red, color.green, color.blue).brightness
}

/// The mean HSB brightness over every pixel of `image`.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
pub fn mean_brightness(image: &impl PixelSource) -> Result<f64> {
	let (width, height) = checked_size(image)?;

	let mut sum = 0.0;
	for y in 0..height {
		for x in 0..width {
			sum += pixel_brightness(image.packed_pixel(x, y));
		}
	}

	#[allow(clippy::cast_precision_loss)]
	let mean = sum / image.pixel_count() as f64;
	tracing::debug!(width, height, mean, "computed mean brightness");
	Ok(mean)
}

/// The mean HSB brightness over every pixel of `image`, summing rows in parallel.
///
/// The result may differ from [`mean_brightness`] by floating point rounding.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
#[cfg(feature = "threads")]
pub fn mean_brightness_par(image: &(impl PixelSource + Sync)) -> Result<f64> {
	use rayon::prelude::*;

	let (width, height) = checked_size(image)?;

	let sum = (0..height)
		.into_par_iter()
		.map(|y| (0..width).map(|x| pixel_brightness(image.packed_pixel(x, y))).sum::<f64>())
		.sum::<f64>();

	#[allow(clippy::cast_precision_loss)]
	let mean = sum / image.pixel_count() as f64;
	tracing::debug!(width, height, mean, "computed mean brightness");
	Ok(mean)
}

/// Settings for a tagging run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagConfig {
	/// Distance used to match pixels to reference colors
	pub metric: Metric,
	/// Minimum percentage for a color to be tagged
	pub threshold: f64,
	/// Whether to add a `Light`/`Dark` tag
	pub brightness: bool,
}

impl Default for TagConfig {
	fn default() -> Self {
		Self {
			metric: Metric::default(),
			threshold: DEFAULT_THRESHOLD,
			brightness: true,
		}
	}
}

/// Everything derived from tagging one image
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
	/// Pixel counts per matched color
	pub histogram: Histogram,
	/// Percentage per matched color, in histogram order
	pub shares: Vec<ColorShare>,
	/// Mean HSB brightness, if it was computed
	pub mean_brightness: Option<f64>,
	/// Dominant colors followed by the brightness label, if any
	pub tags: TagSet,
}

impl Summary {
	/// Derive percentages and tags from an already computed histogram and mean brightness.
	///
	/// # Errors
	/// Returns [`Error::NoPixels`] if `total_pixels` is zero.
	pub fn new(histogram: Histogram, mean_brightness: Option<f64>, total_pixels: u64, threshold: f64) -> Result<Self> {
		let shares = percentages(&histogram, total_pixels)?;

		let mut tags = dominant_colors(&shares, threshold).into_iter().collect::<TagSet>();
		if let Some(label) = mean_brightness.and_then(brightness_tag) {
			tags.push(label.as_str());
		}

		Ok(Self { histogram, shares, mean_brightness, tags })
	}

	/// The share of the color named `name`, if any pixel matched it
	#[must_use]
	pub fn share(&self, name: &str) -> Option<&ColorShare> {
		self.shares.iter().find(|share| share.color.name == name)
	}
}

/// Tag an image with its dominant colors and, if enabled, its brightness.
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
pub fn tag_image(image: &impl PixelSource, palette: &ReferencePalette, config: &TagConfig) -> Result<Summary> {
	let histogram = histogram(image, palette, config.metric)?;
	let mean = if config.brightness { Some(mean_brightness(image)?) } else { None };
	Summary::new(histogram, mean, image.pixel_count(), config.threshold)
}

/// [`tag_image`], with the histogram and brightness passes run in parallel
///
/// # Errors
/// Returns [`Error::EmptyImage`] if the image has no pixels.
#[cfg(feature = "threads")]
pub fn tag_image_par(
	image: &(impl PixelSource + Sync),
	palette: &ReferencePalette,
	config: &TagConfig,
) -> Result<Summary> {
	let histogram = crate::classify::histogram_par(image, palette, config.metric)?;
	let mean = if config.brightness { Some(mean_brightness_par(image)?) } else { None };
	Summary::new(histogram, mean, image.pixel_count(), config.threshold)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;
	use image::{Rgb, RgbImage};

	fn shares(percents: &[(&str, f64)]) -> Vec<ColorShare> {
		percents
			.iter()
			.map(|&(name, percent)| ColorShare {
				color: ReferenceColor::new(0, name),
				count: 0,
				percent,
			})
			.collect()
	}

	#[test]
	fn brightness_boundaries() {
		assert_eq!(brightness_tag(0.70), Some(Brightness::Light));
		assert_eq!(brightness_tag(1.0), Some(Brightness::Light));
		assert_eq!(brightness_tag(0.55), Some(Brightness::Dark));
		assert_eq!(brightness_tag(0.0), Some(Brightness::Dark));
		assert_eq!(brightness_tag(0.60), None);
		assert_eq!(brightness_tag(0.5501), None);
		assert_eq!(brightness_tag(0.6999), None);
	}

	#[test]
	fn dominant_threshold_is_inclusive() {
		let shares = shares(&[("a", 20.0), ("b", 19.999), ("c", 60.001)]);
		assert_eq!(dominant_colors(&shares, 20.0), ["a", "c"]);
		assert_eq!(dominant_colors(&shares, 0.0), ["a", "b", "c"]);
		assert!(dominant_colors(&shares, 100.0).is_empty());
	}

	#[test]
	fn one_in_five_pixels_is_exactly_twenty_percent() {
		let palette = ReferencePalette::default();
		let image = RgbImage::from_fn(5, 2, |x, _| if x == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
		let histogram = histogram(&image, &palette, Metric::PerceptualRgb).unwrap();

		let shares = percentages(&histogram, image.pixel_count()).unwrap();

		assert_eq!(shares[0].color.name, "white");
		assert_eq!(shares[0].percent, 80.0);
		assert_eq!(shares[1].color.name, "black");
		assert_eq!(shares[1].percent, 20.0);
		assert_eq!(dominant_colors(&shares, DEFAULT_THRESHOLD), ["white", "black"]);
	}

	#[test]
	fn percentages_need_pixels() {
		assert!(matches!(percentages(&Histogram::default(), 0), Err(Error::NoPixels)));
	}

	#[test]
	fn percentages_over_a_larger_total() {
		let palette = ReferencePalette::default();
		let image = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
		let histogram = histogram(&image, &palette, Metric::PerceptualRgb).unwrap();

		let shares = percentages(&histogram, 8).unwrap();
		assert_eq!(shares[0].percent, 50.0);
	}

	#[test]
	#[cfg(debug_assertions)]
	#[should_panic(expected = "histogram counts 4 pixels but the total is 3")]
	fn percentages_reject_a_total_below_the_histogram() {
		let palette = ReferencePalette::default();
		let image = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
		let histogram = histogram(&image, &palette, Metric::PerceptualRgb).unwrap();

		let _ = percentages(&histogram, 3);
	}

	#[test]
	fn mean_brightness_of_mixed_image() {
		// half black, half white
		let image = RgbImage::from_fn(4, 4, |_, y| if y < 2 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
		assert_abs_diff_eq!(mean_brightness(&image).unwrap(), 0.5, epsilon = 1e-12);

		// brightness is the max channel
		let image = RgbImage::from_pixel(3, 3, Rgb([51, 204, 102]));
		assert_abs_diff_eq!(mean_brightness(&image).unwrap(), 0.8, epsilon = 1e-12);
	}

	#[test]
	fn mean_brightness_needs_pixels() {
		assert!(matches!(mean_brightness(&RgbImage::new(0, 3)), Err(Error::EmptyImage { .. })));
	}

	#[test]
	fn summary_appends_brightness_after_colors() {
		let palette = ReferencePalette::default();
		let image = RgbImage::from_pixel(3, 3, Rgb([0, 0, 0]));

		let summary = tag_image(&image, &palette, &TagConfig::default()).unwrap();
		assert_eq!(summary.tags.to_string(), "black, Dark");
		assert_eq!(summary.mean_brightness, Some(0.0));

		let config = TagConfig { brightness: false, ..TagConfig::default() };
		let summary = tag_image(&image, &palette, &config).unwrap();
		assert_eq!(summary.tags.to_string(), "black");
		assert_eq!(summary.mean_brightness, None);
	}

	#[test]
	fn share_display() {
		let share = ColorShare {
			color: ReferenceColor::new(0xFF0000, "red"),
			count: 1,
			percent: 12.345,
		};
		assert_eq!(share.to_string(), "red: 12.35%");
	}

	#[test]
	#[cfg(feature = "threads")]
	fn parallel_tagging_matches_sequential() {
		let palette = ReferencePalette::default();
		#[allow(clippy::cast_possible_truncation)]
		let image = RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, (x + y) as u8]));
		let config = TagConfig { metric: Metric::Hsb, ..TagConfig::default() };

		let sequential = tag_image(&image, &palette, &config).unwrap();
		let parallel = tag_image_par(&image, &palette, &config).unwrap();

		assert_eq!(parallel.histogram, sequential.histogram);
		assert_eq!(parallel.tags, sequential.tags);
		assert_abs_diff_eq!(
			parallel.mean_brightness.unwrap(),
			sequential.mean_brightness.unwrap(),
			epsilon = 1e-9
		);
	}
}
