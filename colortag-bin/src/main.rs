//! Tag images by their dominant named colors and brightness.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::unreadable_literal
)]

mod cli;

#[allow(clippy::wildcard_imports)]
use cli::*;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use colored::Colorize;
use colortag::{
    classify, percentages, save_tags, tag_file_path, unpack_rgb, Histogram, Metric,
    ReferencePalette, Summary, TagConfig,
};
use image::{DynamicImage, RgbImage};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Record the running time of an expression and log the elapsed time
macro_rules! time {
    ($name: literal, $func_call: expr) => {{
        let start = Instant::now();
        let result = $func_call;
        tracing::debug!("{} took {}ms", $name, start.elapsed().as_millis());
        result
    }};
}

/// Error cases for a single run of the CLI
#[derive(Debug, Error)]
enum CliError {
    /// Failed to read or decode the image file
    #[error("Failed to load the image file {}: {source}", .path.display())]
    ImageLoad {
        /// The input image
        path: PathBuf,
        /// Decoding or I/O failure
        #[source]
        source: image::ImageError,
    },
    /// Failed to encode or write the quantized image
    #[error("Failed to save the quantized image {}: {source}", .path.display())]
    ImageSave {
        /// The output image
        path: PathBuf,
        /// Encoding or I/O failure
        #[source]
        source: image::ImageError,
    },
    /// Classification or tagging failed
    #[error(transparent)]
    Tagging(#[from] colortag::Error),
    /// The rayon thread pool could not be built
    #[cfg(feature = "threads")]
    #[error("Failed to initialize the thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn main() -> ExitCode {
    let options = Options::parse();

    init_logging(options.common.verbose);

    match run(&options) {
        Ok(code) => code,
        // Returning Result<_> uses Debug printing instead of Display
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, keeping stdout for results
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "colortag=debug"
    } else {
        "colortag=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Builds a thread pool and then runs `execute`
#[cfg(feature = "threads")]
fn run(options: &Options) -> Result<ExitCode, CliError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(usize::from(options.common.threads))
        .build()?;

    pool.install(|| execute(options))
}

/// Runs `execute` on a single thread
#[cfg(not(feature = "threads"))]
fn run(options: &Options) -> Result<ExitCode, CliError> {
    execute(options)
}

/// Load the input image and run the chosen command on it
fn execute(options: &Options) -> Result<ExitCode, CliError> {
    let metric = Metric::from(options.common.metric);
    let image = time!("Image loading", load_image(options.command.image()))?;

    match &options.command {
        Command::Tag {
            image: path,
            no_brightness,
            no_save,
            output,
            threshold,
        } => {
            let config = TagConfig {
                metric,
                threshold: *threshold,
                brightness: !no_brightness,
            };
            let destination = if *no_save {
                None
            } else if let Some(output) = output {
                Some(output.clone())
            } else {
                Some(tag_file_path(path)?)
            };
            tag(
                &image.into_rgb8(),
                path,
                &config,
                destination.as_deref(),
                options,
            )
        }

        Command::Extract {
            quantized,
            colorize,
            ..
        } => {
            extract(image, metric, quantized.as_deref(), *colorize, options)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Brightness { .. } => {
            let image = image.into_rgb8();
            let mean = time!("Brightness", get_mean_brightness(&image, options))?;
            println!("Mean brightness = {mean}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load the image at the given path
fn load_image(path: &Path) -> Result<DynamicImage, CliError> {
    image::open(path).map_err(|source| CliError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Tag an image, print the tags, and save them to `destination` if provided.
///
/// A failed save is logged and turned into a failure exit code after the tags are printed.
fn tag(
    image: &RgbImage,
    path: &Path,
    config: &TagConfig,
    destination: Option<&Path>,
    options: &Options,
) -> Result<ExitCode, CliError> {
    let title = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    tracing::info!("Tagging has started working... on {title}");

    let palette = ReferencePalette::default();
    let summary = time!("Tagging", get_summary(image, &palette, config, options))?;

    for share in &summary.shares {
        tracing::debug!("{share}");
    }
    if let Some(mean) = summary.mean_brightness {
        tracing::debug!("Mean brightness = {mean}");
    }

    println!("{}", summary.tags);

    let code = match destination {
        Some(destination) => match save_tags(destination, &summary.tags) {
            Ok(()) => {
                tracing::info!("Saved tags to {}", destination.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{e}");
                ExitCode::FAILURE
            }
        },
        None => ExitCode::SUCCESS,
    };

    tracing::info!("Tagging finished its work.");

    Ok(code)
}

/// Print the share of each palette color, optionally writing the quantized image
///
/// The quantized image keeps the alpha channel of the input.
fn extract(
    image: DynamicImage,
    metric: Metric,
    quantized: Option<&Path>,
    colorize: bool,
    options: &Options,
) -> Result<(), CliError> {
    let palette = ReferencePalette::default();
    let total = u64::from(image.width()) * u64::from(image.height());

    let histogram = if let Some(path) = quantized {
        let mut image = image.into_rgba8();
        let histogram = time!("Quantization", classify(&mut image, &palette, metric, true))?;
        time!("Image saving", image.save(path)).map_err(|source| CliError::ImageSave {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved quantized image to {}", path.display());
        histogram
    } else {
        let image = image.into_rgb8();
        time!("Classification", get_histogram(&image, &palette, metric, options))?
    };

    for share in percentages(&histogram, total)? {
        if colorize {
            let color = unpack_rgb(share.color.rgb);
            println!(
                "{} {share}",
                "   ".on_truecolor(color.red, color.green, color.blue)
            );
        } else {
            println!("{share}");
        }
    }

    Ok(())
}

/// Count the palette colors of an image
#[cfg(not(feature = "threads"))]
fn get_histogram(
    image: &RgbImage,
    palette: &ReferencePalette,
    metric: Metric,
    _options: &Options,
) -> colortag::Result<Histogram> {
    colortag::histogram(image, palette, metric)
}

/// Count the palette colors of an image, in parallel unless a single thread was requested
#[cfg(feature = "threads")]
fn get_histogram(
    image: &RgbImage,
    palette: &ReferencePalette,
    metric: Metric,
    options: &Options,
) -> colortag::Result<Histogram> {
    if options.common.threads == 1 {
        colortag::histogram(image, palette, metric)
    } else {
        colortag::histogram_par(image, palette, metric)
    }
}

/// Tag an image
#[cfg(not(feature = "threads"))]
fn get_summary(
    image: &RgbImage,
    palette: &ReferencePalette,
    config: &TagConfig,
    _options: &Options,
) -> colortag::Result<Summary> {
    colortag::tag_image(image, palette, config)
}

/// Tag an image, in parallel unless a single thread was requested
#[cfg(feature = "threads")]
fn get_summary(
    image: &RgbImage,
    palette: &ReferencePalette,
    config: &TagConfig,
    options: &Options,
) -> colortag::Result<Summary> {
    if options.common.threads == 1 {
        colortag::tag_image(image, palette, config)
    } else {
        colortag::tag_image_par(image, palette, config)
    }
}

/// Compute the mean brightness of an image
#[cfg(not(feature = "threads"))]
fn get_mean_brightness(image: &RgbImage, _options: &Options) -> colortag::Result<f64> {
    colortag::mean_brightness(image)
}

/// Compute the mean brightness of an image, in parallel unless a single thread was requested
#[cfg(feature = "threads")]
fn get_mean_brightness(image: &RgbImage, options: &Options) -> colortag::Result<f64> {
    if options.common.threads == 1 {
        colortag::mean_brightness(image)
    } else {
        colortag::mean_brightness_par(image)
    }
}
