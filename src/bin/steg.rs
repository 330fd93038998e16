//! # Steganography CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin steg -- hide --image elephant.png --token hello123
//! cargo run --bin steg -- reveal --image elephant.png
//! cargo run --bin steg -- capacity --image elephant.png --token hello123
//! ```
//!
//! Image names that are not existing paths are looked up in the pictures
//! directory from the configuration (`test_pictures` by default).

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use token_steg::cli::{capacity_of_file, default_output, hide_file, reveal_file, Args, Command};
use token_steg::common::config::AppConfig;
use token_steg::common::logging::init_logger;
use token_steg::common::paths::resolve_image;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;

    let level = if args.verbose {
        LevelFilter::Trace
    } else {
        config.logging.level_filter()
    };
    init_logger(level);

    let pictures = &config.images.directory;

    match args.command {
        Command::Hide {
            image,
            token,
            output,
        } => {
            let input = resolve_image(&image, pictures)?;
            let output = output
                .map(PathBuf::from)
                .unwrap_or_else(|| default_output(&input));
            let summary = hide_file(&input, &token, &output, args.verbose)?;
            println!("{}", summary.output.display());
        }
        Command::Reveal { image } => {
            let input = resolve_image(&image, pictures)?;
            println!("{}", reveal_file(&input, args.verbose)?);
        }
        Command::Capacity { image, token } => {
            let input = resolve_image(&image, pictures)?;
            let summary = capacity_of_file(&input, token.as_deref())?;
            println!(
                "{}x{}x{}: {} bits, up to {} bytes",
                summary.shape.rows,
                summary.shape.cols,
                summary.shape.channels,
                summary.capacity_bits,
                summary.max_payload_bytes
            );
            if let Some(fits) = summary.fits {
                println!("token fits: {}", fits);
            }
        }
    }

    Ok(())
}
