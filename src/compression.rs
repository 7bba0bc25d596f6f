//! Compression handling for input and output files
//!
//! Input-side detection is purely based on the file-name suffix (`.gz`,
//! `.bz2`); the byte content is never inspected. The stripped name is reused
//! downstream for format inference, so `data.nt.gz` is recognized as
//! gzip-compressed N-Triples. Output-side compression is always an explicit
//! caller choice.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::error::SpliceError;

/// Supported compression schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    /// Detect the compression of a file from its name
    pub fn from_file_name(name: &str) -> Self {
        if name.ends_with(".gz") {
            Compression::Gzip
        } else if name.ends_with(".bz2") {
            Compression::Bzip2
        } else {
            Compression::None
        }
    }

    /// File-name suffix appended for this compression (empty for none)
    pub fn suffix(&self) -> &'static str {
        match self {
            Compression::None => "",
            Compression::Gzip => ".gz",
            Compression::Bzip2 => ".bz2",
        }
    }

    /// Strip a known compression suffix from a file name, returning the
    /// stripped name together with the detected compression
    pub fn strip_suffix(name: &str) -> (&str, Self) {
        match Self::from_file_name(name) {
            Compression::Gzip => (&name[..name.len() - 3], Compression::Gzip),
            Compression::Bzip2 => (&name[..name.len() - 4], Compression::Bzip2),
            Compression::None => (name, Compression::None),
        }
    }
}

/// Reader with transparent decompression
///
/// Malformed compressed content is not pre-validated; it surfaces as a read
/// error at the first inconsistency.
pub enum CompressedReader {
    Plain(BufReader<File>),
    Gzip(GzDecoder<BufReader<File>>),
    Bzip2(BzDecoder<BufReader<File>>),
}

impl Read for CompressedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            CompressedReader::Plain(r) => r.read(buf),
            CompressedReader::Gzip(r) => r.read(buf),
            CompressedReader::Bzip2(r) => r.read(buf),
        }
    }
}

/// Open an input file for reading, unwrapping a compression layer detected
/// from its name. Returns the reader together with the file name with the
/// compression suffix stripped (for downstream format inference).
pub fn open_input(path: &Path) -> Result<(CompressedReader, String), SpliceError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let (stripped, compression) = Compression::strip_suffix(&name);
    let stripped = stripped.to_string();

    let file = BufReader::new(File::open(path)?);
    let reader = match compression {
        Compression::None => CompressedReader::Plain(file),
        Compression::Gzip => CompressedReader::Gzip(GzDecoder::new(file)),
        Compression::Bzip2 => CompressedReader::Bzip2(BzDecoder::new(file)),
    };
    Ok((reader, stripped))
}

/// Writer with transparent compression
///
/// Must be finished explicitly so that gzip/bzip2 trailers are written;
/// dropping an unfinished writer produces a truncated stream.
pub enum CompressedWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Bzip2(BzEncoder<BufWriter<File>>),
}

impl CompressedWriter {
    /// Create the output file and wrap it with the chosen compression
    pub fn create(path: &Path, compression: Compression) -> Result<Self, SpliceError> {
        let file = BufWriter::new(File::create(path)?);
        Ok(match compression {
            Compression::None => CompressedWriter::Plain(file),
            Compression::Gzip => {
                CompressedWriter::Gzip(GzEncoder::new(file, flate2::Compression::default()))
            }
            Compression::Bzip2 => {
                CompressedWriter::Bzip2(BzEncoder::new(file, bzip2::Compression::best()))
            }
        })
    }

    /// Finish the compression stream and flush the underlying file
    pub fn finish(self) -> io::Result<()> {
        match self {
            CompressedWriter::Plain(mut w) => w.flush(),
            CompressedWriter::Gzip(enc) => enc.finish()?.flush(),
            CompressedWriter::Bzip2(enc) => enc.finish()?.flush(),
        }
    }
}

impl Write for CompressedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CompressedWriter::Plain(w) => w.write(buf),
            CompressedWriter::Gzip(w) => w.write(buf),
            CompressedWriter::Bzip2(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CompressedWriter::Plain(w) => w.flush(),
            CompressedWriter::Gzip(w) => w.flush(),
            CompressedWriter::Bzip2(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_from_file_name() {
        assert_eq!(Compression::from_file_name("data.nt.gz"), Compression::Gzip);
        assert_eq!(
            Compression::from_file_name("data.ttl.bz2"),
            Compression::Bzip2
        );
        assert_eq!(Compression::from_file_name("data.nt"), Compression::None);
        // Detection only looks at the suffix, not at embedded markers
        assert_eq!(
            Compression::from_file_name("gz-data.nt"),
            Compression::None
        );
    }

    #[test]
    fn test_strip_suffix() {
        assert_eq!(
            Compression::strip_suffix("data.nt.gz"),
            ("data.nt", Compression::Gzip)
        );
        assert_eq!(
            Compression::strip_suffix("data.ttl.bz2"),
            ("data.ttl", Compression::Bzip2)
        );
        assert_eq!(
            Compression::strip_suffix("data.trig"),
            ("data.trig", Compression::None)
        );
    }

    #[test]
    fn test_suffix() {
        assert_eq!(Compression::None.suffix(), "");
        assert_eq!(Compression::Gzip.suffix(), ".gz");
        assert_eq!(Compression::Bzip2.suffix(), ".bz2");
    }
}
