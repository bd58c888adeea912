//! Open plain or gzip-compressed logs and iterate over their lines.

use crate::utils::error::InputError;
use flate2::bufread::MultiGzDecoder;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether `path` is read through the gzip decoder
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open a log file, decompressing `.gz` files on the fly
///
/// # Errors
/// * `InputError::OpenFailed` - the file cannot be opened
/// * `InputError::DecompressFailed` - a `.gz` file has no gzip header
pub fn open_log(path: impl AsRef<Path>) -> Result<LogLines<Box<dyn BufRead>>, InputError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| InputError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    if !is_gzip_path(path) {
        debug!("Reading plain log: {}", path.display());
        let plain: Box<dyn BufRead> = Box::new(reader);
        return Ok(LogLines::new(plain));
    }

    let header = reader
        .fill_buf()
        .map_err(|e| InputError::DecompressFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if !header.starts_with(&GZIP_MAGIC) {
        return Err(InputError::DecompressFailed {
            path: path.to_path_buf(),
            reason: "not in gzip format".to_string(),
        });
    }

    debug!("Reading gzip log: {}", path.display());
    let decoded: Box<dyn BufRead> = Box::new(BufReader::new(MultiGzDecoder::new(reader)));
    Ok(LogLines::new(decoded))
}

/// Line iterator tolerant of invalid UTF-8
///
/// Invalid sequences are replaced rather than failing the run, line
/// terminators (`\n`, `\r\n`) are stripped, and a last line without a
/// terminator is still yielded.
pub struct LogLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = Result<String, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(InputError::ReadFailed(e))),
        }
    }
}
