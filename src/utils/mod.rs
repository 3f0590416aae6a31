//! Utility functions for time handling and filesystem-safe naming

pub mod path;
pub mod time;

pub use path::{
    estimate_file_size, human_readable_size, sanitize_filename, DEFAULT_MAX_FILENAME_LEN,
};
pub use time::{format_duration, parse_time_expression};
