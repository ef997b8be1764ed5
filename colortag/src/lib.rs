//! Classify every pixel of an image against a palette of named reference colors.
//!
//! From the resulting histogram, derive the share of each color,
//! tag the colors that cover enough of the image, and label the image as `Light` or `Dark`
//! based on its mean brightness. Images can also be rewritten into the reference palette.
//!
//! # Examples
//!
//! ## Tag an image file
//!
//! ```no_run
//! use colortag::{tag_file_path, save_tags, tag_image, ReferencePalette, TagConfig};
//! use std::path::Path;
//!
//! let path = Path::new("some image.png");
//! let image = image::open(path).unwrap().into_rgb8();
//!
//! let summary = tag_image(&image, &ReferencePalette::default(), &TagConfig::default())?;
//! save_tags(&tag_file_path(path)?, &summary.tags)?;
//! # Ok::<(), colortag::Error>(())
//! ```
//!
//! ## Quantize an image to the reference palette
//!
//! ```
//! use colortag::{classify, Metric, ReferencePalette};
//! use image::{Rgb, RgbImage};
//!
//! let mut image = RgbImage::from_pixel(10, 10, Rgb([250, 10, 5]));
//! let histogram = classify(&mut image, &ReferencePalette::default(), Metric::PerceptualRgb, true)?;
//!
//! assert_eq!(histogram.get("red"), Some(100));
//! assert_eq!(image.get_pixel(0, 0), &Rgb([255, 0, 0]));
//! # Ok::<(), colortag::Error>(())
//! ```
//!
//! # Arguments
//!
//! ## Metric
//!
//! The [`Metric`] decides which color space pixels are compared in and how differences are measured.
//! It is chosen once per run; see [`DistanceMetric`] for the available strategies.
//!
//! [`Metric::PerceptualRgb`] is the default.
//! It weights the RGB channels to approximate perceived differences and needs no color space conversion.
//! [`Metric::Hsb`] and [`Metric::Lab`] convert every pixel,
//! so they are slower but can match more closely by hue or by perceived lightness.
//!
//! ## Palette
//!
//! A [`ReferencePalette`] is an ordered list of named colors.
//! When a pixel is exactly as close to two entries, the earlier entry wins,
//! so the order of the palette matters for borderline pixels.
//!
//! ## Threshold
//!
//! The minimum percentage of the image a color must cover to be tagged. Defaults to `20.0`.
//! The comparison is inclusive, so a color covering exactly the threshold is tagged.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unreadable_literal)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod classify;
mod convert;
mod distance;
mod error;
mod matcher;
mod reference;
mod summary;
mod tags;

#[cfg(feature = "threads")]
pub use classify::histogram_par;
pub use classify::{classify, histogram, Histogram, PixelSink, PixelSource};
pub use convert::{pack_rgb, rgb_to_hsb, rgb_to_lab, unpack_rgb, Hsb, Lab};
pub use distance::{
	perceptual_distance, ColorSpace, DistanceMetric, HsbDistance, LabDistance, Metric, NormalizedRgb, PerceptualRgb,
};
pub use error::{Error, Result};
pub use matcher::{nearest_color, Match, PaletteMatcher};
pub use reference::{ReferenceColor, ReferencePalette};
#[cfg(feature = "threads")]
pub use summary::{mean_brightness_par, tag_image_par};
pub use summary::{
	brightness_tag, dominant_colors, mean_brightness, percentages, tag_image, Brightness, ColorShare, Summary,
	TagConfig, DARK_THRESHOLD, DEFAULT_THRESHOLD, LIGHT_THRESHOLD,
};
pub use tags::{save_tags, tag_file_path, TagSet, TAG_SEPARATOR};
