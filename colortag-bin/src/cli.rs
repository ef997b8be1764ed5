//! Specifies the CLI and handles arg parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use colortag::{Metric, DEFAULT_THRESHOLD};
use std::{
	fmt::{Debug, Display},
	num::ParseFloatError,
	ops::RangeBounds,
	path::PathBuf,
	str::FromStr,
};

/// Distance metrics selectable from the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
	/// Weighted RGB difference approximating perceived color difference
	PerceptualRgb,
	/// Euclidean RGB difference on channels scaled to [0, 1]
	NormalizedRgb,
	/// HSB difference with hue wraparound
	Hsb,
	/// Euclidean CIELAB difference
	Lab,
}

impl From<MetricArg> for Metric {
	fn from(arg: MetricArg) -> Self {
		match arg {
			MetricArg::PerceptualRgb => Metric::PerceptualRgb,
			MetricArg::NormalizedRgb => Metric::NormalizedRgb,
			MetricArg::Hsb => Metric::Hsb,
			MetricArg::Lab => Metric::Lab,
		}
	}
}

/// Tag images by their dominant named colors and brightness.
///
/// Every pixel is matched to the nearest color of a fixed palette
/// (red, yellow, green, blue, white, black, brown, gray, orange).
#[derive(Parser)]
#[command(version)]
pub struct Options {
	/// What to do with the image
	#[command(subcommand)]
	pub command: Command,

	/// Options shared by every command
	#[command(flatten)]
	pub common: Common,
}

/// Options shared by every command
#[derive(Args)]
pub struct Common {
	/// How color differences are measured when matching pixels to the palette
	#[arg(short, long, global = true, default_value = "perceptual-rgb")]
	pub metric: MetricArg,

	/// The number of threads to use
	///
	/// A value of 0 indicates to automatically choose the number of threads.
	#[cfg(feature = "threads")]
	#[arg(short = 'j', long, global = true, default_value_t = 0)]
	pub threads: u8,

	/// Log the time taken by each step and other details
	#[arg(short, long, global = true)]
	pub verbose: bool,
}

/// The subcommands of the CLI
#[derive(Subcommand)]
pub enum Command {
	/// Tag an image with its dominant colors and a Light or Dark label
	///
	/// The tags are printed and saved next to the image in a file with the same name and a .txt extension.
	Tag {
		/// The path to the input image
		image: PathBuf,

		/// Do not add a Light or Dark tag
		#[arg(long)]
		no_brightness: bool,

		/// Print the tags without saving them
		#[arg(long, conflicts_with = "output")]
		no_save: bool,

		/// Save the tags to this file instead of next to the image
		#[arg(short, long)]
		output: Option<PathBuf>,

		/// The minimum percentage of the image a color must cover to be tagged
		///
		/// Provided values should be in the range [0.0, 100.0].
		#[arg(short, long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_valid_threshold)]
		threshold: f64,
	},

	/// Print the share of each palette color in an image
	Extract {
		/// The path to the input image
		image: PathBuf,

		/// Also write the image with every pixel replaced by its palette color
		#[arg(short, long)]
		quantized: Option<PathBuf>,

		/// Print a swatch of each palette color next to its share
		#[arg(short, long)]
		colorize: bool,
	},

	/// Print the mean brightness of an image
	Brightness {
		/// The path to the input image
		image: PathBuf,
	},
}

impl Command {
	/// The input image of the command
	pub fn image(&self) -> &PathBuf {
		match self {
			Command::Tag { image, .. } | Command::Extract { image, .. } | Command::Brightness { image } => image,
		}
	}
}

/// Parse a float value and ensure it in the provided, valid range
fn parse_float_in_range<T>(s: &str, range: impl RangeBounds<T> + Debug) -> Result<T, String>
where
	T: FromStr<Err = ParseFloatError> + Display + PartialOrd,
{
	let value: T = s.parse().map_err(|e| format!("{e}"))?;
	if range.contains(&value) {
		Ok(value)
	} else {
		Err(format!("{value} is not in {range:?}"))
	}
}

/// Parse the tag threshold and ensure it is in `0.0..=100.0`
fn parse_valid_threshold(s: &str) -> Result<f64, String> {
	parse_float_in_range(s, 0.0..=100.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;

	#[test]
	fn tag_defaults() {
		let options = Options::try_parse_from(["colortag", "tag", "photo.jpg"]).unwrap();

		assert_eq!(options.common.metric, MetricArg::PerceptualRgb);
		assert!(!options.common.verbose);
		assert!(matches!(
			options.command,
			Command::Tag { no_brightness: false, no_save: false, output: None, threshold, .. }
				if (threshold - DEFAULT_THRESHOLD).abs() < f64::EPSILON
		));
		assert_eq!(options.command.image(), &PathBuf::from("photo.jpg"));
	}

	#[test]
	fn shared_options_after_subcommand() {
		let options =
			Options::try_parse_from(["colortag", "extract", "a.png", "--metric", "lab", "--colorize"]).unwrap();

		assert_eq!(Metric::from(options.common.metric), Metric::Lab);
		assert!(matches!(options.command, Command::Extract { colorize: true, quantized: None, .. }));
	}

	#[test]
	fn threshold_only_applies_to_tag() {
		let options = Options::try_parse_from(["colortag", "tag", "a.png", "-t", "12.5"]).unwrap();
		assert!(matches!(
			options.command,
			Command::Tag { threshold, .. } if (threshold - 12.5).abs() < f64::EPSILON
		));

		assert!(Options::try_parse_from(["colortag", "extract", "a.png", "-t", "12.5"]).is_err());
		assert!(Options::try_parse_from(["colortag", "brightness", "a.png", "--threshold", "12.5"]).is_err());
	}

	#[test]
	fn every_metric_name_parses() {
		for (name, metric) in [
			("perceptual-rgb", Metric::PerceptualRgb),
			("normalized-rgb", Metric::NormalizedRgb),
			("hsb", Metric::Hsb),
			("lab", Metric::Lab),
		] {
			let options = Options::try_parse_from(["colortag", "brightness", "a.png", "-m", name]).unwrap();
			assert_eq!(Metric::from(options.common.metric), metric);
		}
	}

	#[test]
	fn threshold_out_of_range_is_rejected() {
		assert!(Options::try_parse_from(["colortag", "tag", "a.png", "-t", "100.5"]).is_err());
		assert!(Options::try_parse_from(["colortag", "tag", "a.png", "-t", "-1"]).is_err());
		assert!(Options::try_parse_from(["colortag", "tag", "a.png", "-t", "abc"]).is_err());
	}

	#[test]
	fn no_save_conflicts_with_output() {
		assert!(Options::try_parse_from(["colortag", "tag", "a.png", "--no-save", "-o", "tags.txt"]).is_err());
	}

	#[test]
	fn unknown_metric_is_rejected() {
		assert!(Options::try_parse_from(["colortag", "tag", "a.png", "--metric", "cmyk"]).is_err());
	}
}
