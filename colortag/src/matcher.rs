//! Nearest reference color lookup

use crate::{
	distance::{dispatch, DistanceMetric},
	reference::{ReferenceColor, ReferencePalette},
	Metric,
};
use std::marker::PhantomData;

/// The reference color closest to a pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
	/// Index of the entry in the palette
	pub index: usize,
	/// The matched entry
	pub color: &'a ReferenceColor,
	/// Distance between the pixel and the entry under the active metric
	pub distance: f64,
}

/// Finds the closest palette entry to a pixel under the metric `D`
///
/// Every reference color is converted into `D`'s color space once, when the matcher is created.
pub struct PaletteMatcher<'a, D: DistanceMetric> {
	/// The palette being matched against
	palette: &'a ReferencePalette,
	/// Each palette entry converted to a sample, in palette order
	samples: Vec<D::Sample>,
	/// The metric is only used through associated functions
	metric: PhantomData<fn() -> D>,
}

impl<'a, D: DistanceMetric> PaletteMatcher<'a, D> {
	/// Create a matcher for the given palette
	#[must_use]
	pub fn new(palette: &'a ReferencePalette) -> Self {
		let samples = palette.iter().map(|color| D::sample(color.rgb)).collect();
		tracing::trace!(colors = palette.len(), space = %D::COLOR_SPACE, "prepared palette matcher");
		Self { palette, samples, metric: PhantomData }
	}

	/// The palette being matched against
	#[must_use]
	pub const fn palette(&self) -> &'a ReferencePalette {
		self.palette
	}

	/// Find the closest entry to a packed `0xRRGGBB` pixel
	#[must_use]
	pub fn nearest(&self, rgb: u32) -> Match<'a> {
		self.nearest_sample(D::sample(rgb))
	}

	/// Find the closest entry to an already converted sample
	///
	/// An entry only replaces the current best if it is strictly closer,
	/// so ties go to the entry that comes first in the palette.
	#[must_use]
	pub fn nearest_sample(&self, sample: D::Sample) -> Match<'a> {
		// palettes are never empty, so the first entry is always a valid starting point
		let mut min_index = 0;
		let mut min_dist = D::distance(sample, self.samples[0]);

		for (i, &reference) in self.samples.iter().enumerate().skip(1) {
			let dist = D::distance(sample, reference);
			if dist < min_dist {
				min_dist = dist;
				min_index = i;
			}
		}

		Match {
			index: min_index,
			color: &self.palette[min_index],
			distance: min_dist,
		}
	}
}

/// Typed entry point for [`nearest_color`]
fn nearest_with<D: DistanceMetric>(rgb: u32, palette: &ReferencePalette) -> Match<'_> {
	PaletteMatcher::<D>::new(palette).nearest(rgb)
}

/// Find the closest palette entry to a single packed `0xRRGGBB` pixel.
///
/// To match many pixels, create a [`PaletteMatcher`] once instead.
#[must_use]
pub fn nearest_color(rgb: u32, palette: &ReferencePalette, metric: Metric) -> Match<'_> {
	dispatch!(metric, nearest_with(rgb, palette))
}
