//! Named reference colors that pixels are classified into

use crate::error::{Error, Result};
use std::{
	collections::HashSet,
	fmt::{self, Display},
	ops::Index,
	slice,
};

/// A palette entry: a packed `0xRRGGBB` color and its name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceColor {
	/// Packed `0xRRGGBB` value
	pub rgb: u32,
	/// Human readable name, also used as the tag for this color
	pub name: String,
}

impl ReferenceColor {
	/// Create a reference color
	#[must_use]
	pub fn new(rgb: u32, name: impl Into<String>) -> Self {
		Self { rgb: rgb & 0x00FF_FFFF, name: name.into() }
	}
}

impl Display for ReferenceColor {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} (#{:06X})", self.name, self.rgb)
	}
}

/// The default palette, in matching order
const DEFAULT_COLORS: [(u32, &str); 9] = [
	(0xFF0000, "red"),
	(0xFFFF00, "yellow"),
	(0x3A9D23, "green"),
	(0x0091FE, "blue"),
	(0xFFFFFF, "white"),
	(0x000000, "black"),
	(0x4A2D0D, "brown"),
	(0xD3D3D3, "gray"),
	(0xFFA500, "orange"),
];

/// An ordered, non-empty list of reference colors with unique names
///
/// The order is significant: when a pixel is equally close to several entries,
/// the earliest one wins.
///
/// ```
/// use colortag::{ReferenceColor, ReferencePalette};
///
/// let palette = ReferencePalette::new(vec![
/// 	ReferenceColor::new(0x000000, "black"),
/// 	ReferenceColor::new(0xFFFFFF, "white"),
/// ])?;
/// assert_eq!(palette.len(), 2);
/// # Ok::<(), colortag::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePalette {
	/// Entries in matching order
	colors: Vec<ReferenceColor>,
}

impl ReferencePalette {
	/// Create a palette from the given colors.
	///
	/// # Errors
	/// - [`Error::EmptyPalette`] if `colors` is empty
	/// - [`Error::DuplicateColorName`] if two colors share a name
	pub fn new(colors: Vec<ReferenceColor>) -> Result<Self> {
		if colors.is_empty() {
			return Err(Error::EmptyPalette);
		}

		let mut names = HashSet::with_capacity(colors.len());
		for (index, color) in colors.iter().enumerate() {
			if !names.insert(color.name.as_str()) {
				return Err(Error::DuplicateColorName { name: color.name.clone(), index });
			}
		}

		Ok(Self { colors })
	}

	/// The number of reference colors
	#[must_use]
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Always `false`, since a palette cannot be empty
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// The entries in matching order
	#[must_use]
	pub fn colors(&self) -> &[ReferenceColor] {
		&self.colors
	}

	/// Iterate over the entries in matching order
	pub fn iter(&self) -> slice::Iter<'_, ReferenceColor> {
		self.colors.iter()
	}

	/// Find an entry by name
	#[must_use]
	pub fn get(&self, name: &str) -> Option<&ReferenceColor> {
		self.colors.iter().find(|color| color.name == name)
	}
}

impl Default for ReferencePalette {
	/// red, yellow, green, blue, white, black, brown, gray, and orange
	fn default() -> Self {
		Self {
			colors: DEFAULT_COLORS
				.iter()
				.map(|&(rgb, name)| ReferenceColor::new(rgb, name))
				.collect(),
		}
	}
}

impl Index<usize> for ReferencePalette {
	type Output = ReferenceColor;

	fn index(&self, index: usize) -> &Self::Output {
		&self.colors[index]
	}
}

impl<'a> IntoIterator for &'a ReferencePalette {
	type Item = &'a ReferenceColor;
	type IntoIter = slice::Iter<'a, ReferenceColor>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_palette_is_rejected() {
		assert!(matches!(ReferencePalette::new(Vec::new()), Err(Error::EmptyPalette)));
	}

	#[test]
	fn duplicate_names_are_rejected() {
		let result = ReferencePalette::new(vec![
			ReferenceColor::new(0x000000, "dark"),
			ReferenceColor::new(0xFFFFFF, "light"),
			ReferenceColor::new(0x101010, "dark"),
		]);

		match result {
			Err(Error::DuplicateColorName { name, index }) => {
				assert_eq!(name, "dark");
				assert_eq!(index, 2);
			},
			other => panic!("unexpected result {other:?}"),
		}
	}

	#[test]
	fn default_palette_keeps_order() {
		let palette = ReferencePalette::default();
		let names = palette.iter().map(|color| color.name.as_str()).collect::<Vec<_>>();
		assert_eq!(
			names,
			["red", "yellow", "green", "blue", "white", "black", "brown", "gray", "orange"]
		);
		assert_eq!(palette.get("blue").map(|color| color.rgb), Some(0x0091FE));
		assert_eq!(palette[7].rgb, 0xD3D3D3);
	}

	#[test]
	fn default_palette_is_valid() {
		let palette = ReferencePalette::default();
		assert_eq!(ReferencePalette::new(palette.colors().to_vec()).ok(), Some(palette));
	}

	#[test]
	fn alpha_is_stripped_from_references() {
		assert_eq!(ReferenceColor::new(0xFF12_3456, "x").rgb, 0x123456);
	}
}
