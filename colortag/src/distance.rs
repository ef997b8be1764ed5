//! Color difference metrics, one per color space

use crate::convert::{rgb_to_hsb, rgb_to_lab, unpack_rgb, Hsb, Lab};
use std::fmt::{self, Display};

/// The color space a run compares colors in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
	/// sRGB channels
	Rgb,
	/// Hue, saturation, and brightness
	Hsb,
	/// CIE L\*a\*b\*
	Lab,
}

impl Display for ColorSpace {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Rgb => f.write_str("RGB"),
			Self::Hsb => f.write_str("HSB"),
			Self::Lab => f.write_str("LAB"),
		}
	}
}

/// The distance strategy used for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
	/// [`PerceptualRgb`]
	#[default]
	PerceptualRgb,
	/// [`NormalizedRgb`]
	NormalizedRgb,
	/// [`HsbDistance`]
	Hsb,
	/// [`LabDistance`]
	Lab,
}

impl Metric {
	/// The color space samples are converted into for this metric
	#[must_use]
	pub const fn color_space(self) -> ColorSpace {
		match self {
			Self::PerceptualRgb | Self::NormalizedRgb => ColorSpace::Rgb,
			Self::Hsb => ColorSpace::Hsb,
			Self::Lab => ColorSpace::Lab,
		}
	}
}

impl From<ColorSpace> for Metric {
	fn from(space: ColorSpace) -> Self {
		match space {
			ColorSpace::Rgb => Self::PerceptualRgb,
			ColorSpace::Hsb => Self::Hsb,
			ColorSpace::Lab => Self::Lab,
		}
	}
}

/// A color difference in one color space
///
/// Colors are first converted to a [`DistanceMetric::Sample`] so that palette
/// entries only need to be converted once per run.
pub trait DistanceMetric {
	/// The representation colors are compared in
	type Sample: Copy + Send + Sync;

	/// The color space of [`DistanceMetric::Sample`]
	const COLOR_SPACE: ColorSpace;

	/// Convert a packed `0xRRGGBB` color into a sample
	fn sample(rgb: u32) -> Self::Sample;

	/// Distance between two samples, where lower is closer and identical samples give `0.0`
	fn distance(x: Self::Sample, y: Self::Sample) -> f64;
}

/// Weighted RGB difference over unscaled (`0..=255`) channels
///
/// `2·ΔR² + 4·ΔG² + 3·ΔB² + R̄·(ΔR² − ΔB²)/256` where `R̄` is the mean red value.
/// The result is left squared; see [`perceptual_distance`] for the rooted form.
pub struct PerceptualRgb;

impl DistanceMetric for PerceptualRgb {
	type Sample = [f64; 3];

	const COLOR_SPACE: ColorSpace = ColorSpace::Rgb;

	fn sample(rgb: u32) -> Self::Sample {
		let color = unpack_rgb(rgb);
		[f64::from(color.red), f64::from(color.green), f64::from(color.blue)]
	}

	fn distance(x: Self::Sample, y: Self::Sample) -> f64 {
		let mean_red = (x[0] + y[0]) / 2.0;
		let dr2 = (x[0] - y[0]).powi(2);
		let dg2 = (x[1] - y[1]).powi(2);
		let db2 = (x[2] - y[2]).powi(2);
		2.0 * dr2 + 4.0 * dg2 + 3.0 * db2 + (mean_red * (dr2 - db2)) / 256.0
	}
}

/// Plain squared Euclidean distance over channels scaled to `0.0..=1.0`
pub struct NormalizedRgb;

impl DistanceMetric for NormalizedRgb {
	type Sample = [f64; 3];

	const COLOR_SPACE: ColorSpace = ColorSpace::Rgb;

	fn sample(rgb: u32) -> Self::Sample {
		let color = unpack_rgb(rgb).into_format::<f64>();
		[color.red, color.green, color.blue]
	}

	fn distance(x: Self::Sample, y: Self::Sample) -> f64 {
		(x[0] - y[0]).powi(2) + (x[1] - y[1]).powi(2) + (x[2] - y[2]).powi(2)
	}
}

/// Squared HSB distance where hue wraps around at 360°
pub struct HsbDistance;

impl DistanceMetric for HsbDistance {
	type Sample = Hsb;

	const COLOR_SPACE: ColorSpace = ColorSpace::Hsb;

	fn sample(rgb: u32) -> Self::Sample {
		let color = unpack_rgb(rgb);
		rgb_to_hsb(color.red, color.green, color.blue)
	}

	fn distance(x: Self::Sample, y: Self::Sample) -> f64 {
		let dh = (x.hue - y.hue).abs();
		let dh = f64::min(dh, 360.0 - dh);
		dh * dh + (x.saturation - y.saturation).powi(2) + (x.brightness - y.brightness).powi(2)
	}
}

/// Squared Euclidean distance in L\*a\*b\*
pub struct LabDistance;

impl DistanceMetric for LabDistance {
	type Sample = Lab;

	const COLOR_SPACE: ColorSpace = ColorSpace::Lab;

	fn sample(rgb: u32) -> Self::Sample {
		rgb_to_lab(rgb)
	}

	fn distance(x: Self::Sample, y: Self::Sample) -> f64 {
		let dl = x.l - y.l;
		let da = x.a - y.a;
		let db = x.b - y.b;
		dl * dl + da * da + db * db
	}
}

/// The square-rooted [`PerceptualRgb`] difference between two packed colors
///
/// Matching compares the squared form directly; this is for reporting a single difference.
#[must_use]
pub fn perceptual_distance(x: u32, y: u32) -> f64 {
	// the correction term is always smaller than 2·ΔR² + 3·ΔB², so this is never negative
	PerceptualRgb::distance(PerceptualRgb::sample(x), PerceptualRgb::sample(y)).sqrt()
}

/// Call a function generic over [`DistanceMetric`] with the strategy selected by a [`Metric`]
macro_rules! dispatch {
	($metric: expr, $func: ident($($arg: expr),* $(,)?)) => {
		match $metric {
			$crate::Metric::PerceptualRgb => $func::<$crate::PerceptualRgb>($($arg),*),
			$crate::Metric::NormalizedRgb => $func::<$crate::NormalizedRgb>($($arg),*),
			$crate::Metric::Hsb => $func::<$crate::HsbDistance>($($arg),*),
			$crate::Metric::Lab => $func::<$crate::LabDistance>($($arg),*),
		}
	};
}

pub(crate) use dispatch;
