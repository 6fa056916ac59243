use crate::processing::ConversionOptions;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-mini",
    about = "Batch-convert every image under a directory into resized .mini copies",
    long_about = "img-mini walks a directory tree, resizes each image to fit a bounding box, \
                  re-encodes it into the target format and quality, and writes it as \
                  <name>.mini.<ext> beside the original or into an output directory. \
                  Files already named *.mini.* are never converted again.",
    version,
    disable_help_flag = true,
    after_help = "EXAMPLES:\n  \
    img-mini /path/to/images -w 800 -h 600 -f jpeg -q 0.7\n  \
    img-mini /path/to/images -f webp -q 0.5\n  \
    img-mini . -o ./mini -f png"
)]
pub struct Args {
    #[arg(help = "Image directory (default: current directory)")]
    pub directory: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIRECTORY",
        help = "Output directory (default: beside each original)",
        long_help = "Write all outputs into this directory instead of next to their originals. \
                     Created if it does not exist."
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'w',
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Target width in pixels",
        long_help = "Maximum output width. The image is scaled to fit inside the width/height box \
                     while preserving its aspect ratio; an unset side uses the source dimension."
    )]
    pub width: Option<u32>,

    #[arg(
        short = 'h',
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Target height in pixels",
        long_help = "Maximum output height. The image is scaled to fit inside the width/height box \
                     while preserving its aspect ratio; an unset side uses the source dimension."
    )]
    pub height: Option<u32>,

    #[arg(
        short = 'f',
        long,
        help = "Target format (jpg, jpeg, png, webp, gif, bmp, tiff)",
        long_help = "Output format. Defaults to each source image's own format. \
                     Unsupported names fail on the first image."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'q',
        long,
        allow_hyphen_values = true,
        help = "Quality threshold 0~1 (default: 0.7)",
        long_help = "Quality threshold between 0 and 1, mapped to an encoder quality of 0-100. \
                     Values outside the range are clamped, non-numeric values use 0.7, \
                     and 1 selects lossless encoding where the format supports it."
    )]
    pub quality: Option<String>,

    #[arg(long, help = "Print debug diagnostics to stderr")]
    pub verbose: bool,

    #[arg(long, help = "Only print errors")]
    pub quiet: bool,

    #[arg(long, action = ArgAction::Help, help = "Print help")]
    pub help: Option<bool>,
}

impl Args {
    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions::new(
            self.output.clone(),
            self.width,
            self.height,
            self.format.clone(),
            self.quality.as_deref(),
        )
    }
}
