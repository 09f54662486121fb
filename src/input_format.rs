// src/input_format.rs - Decompression and line-stream setup

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Smallest read buffer; a zero-capacity `BufReader` reports end of input immediately
pub const MIN_BUFFER_SIZE: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Compression {
    /// Detect gzip from the leading magic bytes
    #[default]
    #[value(name = "auto")]
    Auto,
    #[value(name = "gzip")]
    Gzip,
    #[value(name = "none")]
    None,
}

/// Open a local file as a line stream. `-` reads stdin.
pub fn open_input(
    path: &Path,
    compression: Compression,
    buffer_size: usize,
) -> io::Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return decode_reader(io::stdin(), compression, buffer_size);
    }
    let file = File::open(path)?;
    decode_reader(file, compression, buffer_size)
}

/// Wrap any reader in the requested decompression layer.
///
/// Gzip input is read as a multi-member stream, since WARC files are a
/// concatenation of independently compressed records. `buffer_size` is raised
/// to [`MIN_BUFFER_SIZE`] when smaller.
pub fn decode_reader<R: Read + 'static>(
    reader: R,
    compression: Compression,
    buffer_size: usize,
) -> io::Result<Box<dyn BufRead>> {
    let buffer_size = buffer_size.max(MIN_BUFFER_SIZE);
    let mut buffered = BufReader::with_capacity(buffer_size, reader);
    let gzip = match compression {
        Compression::Gzip => true,
        Compression::None => false,
        Compression::Auto => buffered.fill_buf()?.starts_with(&GZIP_MAGIC),
    };

    if gzip {
        Ok(Box::new(BufReader::with_capacity(
            buffer_size,
            MultiGzDecoder::new(buffered),
        )))
    } else {
        Ok(Box::new(buffered))
    }
}
