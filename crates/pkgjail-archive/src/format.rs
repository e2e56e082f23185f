use std::io::{self, Read, Seek};

use crate::error::{Error, Result};

/// Number of leading bytes inspected to recognise a container.
const SNIFF_LEN: u64 = 512;

/// Compression wrapped around a tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Xz,
    Zstd,
}

impl Compression {
    /// Create a decoder for this compression codec.
    pub fn decoder<R: Read>(self, reader: R) -> Result<Decoder<R>> {
        match self {
            Self::None => Ok(Decoder::Passthrough(reader)),
            // apk packages are several gzip members back to back.
            Self::Gzip => Ok(Decoder::Gzip(Box::new(flate2::read::MultiGzDecoder::new(
                reader,
            )))),
            #[cfg(feature = "xz")]
            Self::Xz => Ok(Decoder::Xz(Box::new(xz2::read::XzDecoder::new_multi_decoder(
                reader,
            )))),
            #[cfg(not(feature = "xz"))]
            Self::Xz => Err(Error::UnsupportedFormat),
            #[cfg(feature = "zstd")]
            Self::Zstd => {
                let decoder = zstd::stream::read::Decoder::new(reader).map_err(Error::Corrupted)?;
                Ok(Decoder::Zstd(Box::new(decoder)))
            }
            #[cfg(not(feature = "zstd"))]
            Self::Zstd => Err(Error::UnsupportedFormat),
        }
    }
}

/// Decoder wrapper for tar decompression.
pub enum Decoder<R: Read> {
    Passthrough(R),
    Gzip(Box<flate2::read::MultiGzDecoder<R>>),
    #[cfg(feature = "xz")]
    Xz(Box<xz2::read::XzDecoder<R>>),
    #[cfg(feature = "zstd")]
    Zstd(Box<zstd::stream::read::Decoder<'static, io::BufReader<R>>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            #[cfg(feature = "xz")]
            Self::Xz(d) => d.read(buf),
            #[cfg(feature = "zstd")]
            Self::Zstd(d) => d.read(buf),
        }
    }
}

/// Recognise a tar container from its leading bytes.
///
/// Returns `None` for anything that is not tar-compatible, zip included.
pub fn detect_format(data: &[u8]) -> Option<Compression> {
    match data {
        [0x1F, 0x8B, ..] => Some(Compression::Gzip),
        [0x28, 0xB5, 0x2F, 0xFD, ..] => Some(Compression::Zstd),
        [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => Some(Compression::Xz),
        _ => {
            if is_tar_header(data) {
                Some(Compression::None)
            } else {
                None
            }
        }
    }
}

// Covers both POSIX "ustar\0" and GNU "ustar  \0".
fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= 512 && data[257..262] == *b"ustar"
}

pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<Option<Compression>> {
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    reader.by_ref().take(SNIFF_LEN).read_to_end(&mut header)?;
    reader.rewind()?;
    Ok(detect_format(&header))
}
