//! Conversions from 8-bit sRGB into the color spaces used for matching

use palette::{white_point::D65, FromColor, Hsv, Srgb};

/// CIE L\*a\*b\* under the D65 reference white, in double precision
pub type Lab = palette::Lab<D65, f64>;

/// Hue, saturation, and brightness of an sRGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
	/// Hue in degrees, in `0.0..360.0`
	pub hue: f64,
	/// Saturation in `0.0..=1.0`
	pub saturation: f64,
	/// Brightness (the HSV value component) in `0.0..=1.0`
	pub brightness: f64,
}

/// Split a packed `0xRRGGBB` value into its channels. Bits above the blue,
/// green, and red bytes (e.g. alpha) are ignored.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn unpack_rgb(rgb: u32) -> Srgb<u8> {
	Srgb::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Pack sRGB channels into `0xRRGGBB`
#[must_use]
pub fn pack_rgb(color: Srgb<u8>) -> u32 {
	u32::from(color.red) << 16 | u32::from(color.green) << 8 | u32::from(color.blue)
}

/// Convert an sRGB triple to [`Hsb`]
#[must_use]
pub fn rgb_to_hsb(r: u8, g: u8, b: u8) -> Hsb {
	let hsv = Hsv::<palette::encoding::Srgb, f64>::from_color(Srgb::new(r, g, b).into_format::<f64>());
	Hsb {
		hue: hsv.hue.into_positive_degrees(),
		saturation: hsv.saturation,
		brightness: hsv.value,
	}
}

/// Convert a packed `0xRRGGBB` color to [`Lab`]
#[must_use]
pub fn rgb_to_lab(rgb: u32) -> Lab {
	Lab::from_color(unpack_rgb(rgb).into_format::<f64>())
}
