//! Error type shared by every fallible operation in the crate

use std::{io, path::PathBuf};
use thiserror::Error;

/// Result alias for `colortag` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or finishing a classification run
#[derive(Debug, Error)]
pub enum Error {
	/// A reference palette was built from no colors
	#[error("the reference palette must contain at least one color")]
	EmptyPalette,

	/// Two reference colors share a name
	#[error("reference color name {name:?} is used more than once (entry {index})")]
	DuplicateColorName {
		/// The repeated name
		name: String,
		/// Palette index of the second occurrence
		index: usize,
	},

	/// The image has a width or height of zero
	#[error("the image has no pixels ({width}x{height})")]
	EmptyImage {
		/// Image width
		width: u32,
		/// Image height
		height: u32,
	},

	/// Percentages were requested over a total of zero pixels
	#[error("cannot compute color percentages over zero pixels")]
	NoPixels,

	/// The tag file location could not be derived from the source image path
	#[error("cannot derive a tag file from {}: the path has no file name", .path.display())]
	MissingSourceFile {
		/// The offending source path
		path: PathBuf,
	},

	/// Writing the tag file failed
	#[error("failed to write tags to {}: {source}", .path.display())]
	Io {
		/// Destination of the write
		path: PathBuf,
		/// Underlying I/O failure
		#[source]
		source: io::Error,
	},
}

impl Error {
	/// Whether this error comes from invalid run inputs rather than the environment
	#[must_use]
	pub const fn is_configuration(&self) -> bool {
		!matches!(self, Self::Io { .. })
	}
}
