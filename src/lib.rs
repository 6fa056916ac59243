pub mod constants;
pub mod logger;

pub mod batch;
pub mod cleanup;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod formats;
pub mod processing;
pub mod quality;
pub mod report;
pub mod utils;

pub use batch::{convert_all, run, run_batch, RunSummary};
pub use cleanup::cleanup;
pub use discovery::{discover, is_image_file, is_prior_output, ImageFile};
pub use error::{ConvertError, Result};
pub use formats::TargetFormat;
pub use processing::{
    convert_file, encode_target, output_path_for, resize_image, resize_to_fit,
    to_lossless_intermediate, ConversionOptions, ConversionResult,
};
pub use quality::Quality;
pub use report::RunStatus;
