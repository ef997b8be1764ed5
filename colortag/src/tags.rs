//! Tag lists and the tag file written next to a source image

use crate::error::{Error, Result};
use std::{
	fmt::{self, Display},
	fs,
	path::{Path, PathBuf},
	slice,
};

/// Separator placed between tags when displayed or saved
pub const TAG_SEPARATOR: &str = ", ";

/// An ordered list of tags: dominant color names, then optionally `Light` or `Dark`
///
/// Displays as the tags joined by `", "`, which is also the tag file format.
///
/// ```
/// let tags = ["red", "Dark"].into_iter().collect::<colortag::TagSet>();
/// assert_eq!(tags.to_string(), "red, Dark");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(Vec<String>);

impl TagSet {
	/// Create an empty tag set
	#[must_use]
	pub const fn new() -> Self {
		Self(Vec::new())
	}

	/// Append a tag
	pub fn push(&mut self, tag: impl Into<String>) {
		self.0.push(tag.into());
	}

	/// The number of tags
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether there are no tags
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Whether `tag` is present
	#[must_use]
	pub fn contains(&self, tag: &str) -> bool {
		self.0.iter().any(|t| t == tag)
	}

	/// Iterate over the tags in order
	pub fn iter(&self) -> slice::Iter<'_, String> {
		self.0.iter()
	}

	/// The tags as a slice
	#[must_use]
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}

impl Display for TagSet {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0.join(TAG_SEPARATOR))
	}
}

impl<S: Into<String>> FromIterator<S> for TagSet {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

impl<S: Into<String>> Extend<S> for TagSet {
	fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
		self.0.extend(iter.into_iter().map(Into::into));
	}
}

impl<'a> IntoIterator for &'a TagSet {
	type Item = &'a String;
	type IntoIter = slice::Iter<'a, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// The tag file for an image: same directory and base name, with a `.txt` extension.
///
/// # Errors
/// Returns [`Error::MissingSourceFile`] if `image_path` has no file name (e.g. it is empty or ends in `..`).
pub fn tag_file_path(image_path: &Path) -> Result<PathBuf> {
	if image_path.file_name().is_none() {
		return Err(Error::MissingSourceFile { path: image_path.to_path_buf() });
	}
	Ok(image_path.with_extension("txt"))
}

/// Write `tags` to `path` as a single line with no trailing separator or newline.
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be written.
pub fn save_tags(path: &Path, tags: &TagSet) -> Result<()> {
	fs::write(path, tags.to_string()).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
	tracing::debug!(path = %path.display(), tags = tags.len(), "saved tags");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tags_are_comma_separated() {
		let mut tags = TagSet::new();
		assert_eq!(tags.to_string(), "");

		tags.push("red");
		assert_eq!(tags.to_string(), "red");

		tags.push("Dark");
		assert_eq!(tags.to_string(), "red, Dark");
		assert!(tags.contains("Dark"));
		assert!(!tags.contains("Light"));
	}

	#[test]
	fn tag_file_replaces_extension() {
		assert_eq!(
			tag_file_path(Path::new("/photos/beach.jpg")).unwrap(),
			PathBuf::from("/photos/beach.txt")
		);
		assert_eq!(tag_file_path(Path::new("relative/cat.png")).unwrap(), PathBuf::from("relative/cat.txt"));
		assert_eq!(tag_file_path(Path::new("noext")).unwrap(), PathBuf::from("noext.txt"));
	}

	#[test]
	fn tag_file_needs_a_file_name() {
		for path in ["", "..", "/"] {
			assert!(matches!(
				tag_file_path(Path::new(path)),
				Err(Error::MissingSourceFile { .. })
			));
		}
	}

	#[test]
	fn saved_file_has_no_trailing_separator() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("image.txt");
		let tags = ["red", "white", "Light"].into_iter().collect::<TagSet>();

		save_tags(&path, &tags).unwrap();

		assert_eq!(fs::read_to_string(&path).unwrap(), "red, white, Light");
	}

	#[test]
	fn save_failure_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing").join("image.txt");

		let err = save_tags(&path, &TagSet::new()).unwrap_err();

		assert!(matches!(&err, Error::Io { path: p, .. } if *p == path));
		assert!(!err.is_configuration());
	}
}
