//! File sinks

pub mod error_mirror;
pub mod rotating_file;

pub use error_mirror::{error_file_name, error_path, ErrorMirror, ERROR_FILE_SUFFIX};
pub use rotating_file::{Backup, RotatingFileSink, RotationPolicy};

pub use crate::core::Sink;
