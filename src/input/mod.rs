//! Log input: plain and gzip files read line by line.

pub mod reader;

pub use reader::{is_gzip_path, open_log, LogLines};
