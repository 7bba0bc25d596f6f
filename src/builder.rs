//! Building a ready-to-use transformator from a one-shot configuration
//!
//! The builder resolves the requested output format into one of the two
//! strategies, computes the output file name, creates the output directory,
//! opens and wraps the output stream and hands everything to the chosen
//! strategy. Configuration errors are reported before any file is created.

use std::fs;
use std::path::PathBuf;

use crate::compression::{CompressedWriter, Compression};
use crate::error::SpliceError;
use crate::format::OutputFormat;
use crate::ontology::OntologyTransformator;
use crate::streaming::StreamingTransformator;
use crate::transform::Transformator;

/// One-shot configuration for a single output file
///
/// `build` consumes the builder; rebuilding with a fresh builder produces an
/// independent transformator.
#[derive(Debug, Default)]
pub struct TransformatorBuilder {
    output_format: Option<String>,
    output_directory: Option<PathBuf>,
    output_file_name: Option<String>,
    compression: Compression,
}

impl TransformatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The requested output format, as content type or IANA media-type IRI
    pub fn with_output_format(mut self, identifier: impl Into<String>) -> Self {
        self.output_format = Some(identifier.into());
        self
    }

    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(directory.into());
        self
    }

    /// Base name of the output file; a random digit token is used when absent
    pub fn with_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = Some(name.into());
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Resolve the configuration into an open transformator
    pub fn build(self) -> Result<Box<dyn Transformator>, SpliceError> {
        let identifier = self.output_format.ok_or(SpliceError::MissingOutputFormat)?;
        let format = OutputFormat::resolve(&identifier)
            .ok_or(SpliceError::UnsupportedFormat(identifier))?;

        let output_file = output_file_path(
            self.output_directory.as_deref(),
            self.output_file_name.as_deref(),
            format,
            self.compression,
        );

        if let Some(directory) = &self.output_directory {
            fs::create_dir_all(directory)?;
        }

        // From here on the open stream is owned by a value that releases it
        // on drop, so an error on any later path cannot leak the handle
        let out = CompressedWriter::create(&output_file, self.compression)?;
        Ok(match format {
            OutputFormat::Streaming(f) => Box::new(StreamingTransformator::new(f, out, output_file)),
            OutputFormat::Ontology(f) => Box::new(OntologyTransformator::new(f, out, output_file)),
        })
    }
}

/// `[dir/](name|<random digits>).<format extension>[.gz|.bz2]`
fn output_file_path(
    directory: Option<&std::path::Path>,
    name: Option<&str>,
    format: OutputFormat,
    compression: Compression,
) -> PathBuf {
    let base = match name {
        Some(name) => name.to_string(),
        None => rand::random::<u32>().to_string(),
    };
    let file_name = format!(
        "{base}.{ext}{comp}",
        ext = format.file_extension(),
        comp = compression.suffix()
    );
    match directory {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
