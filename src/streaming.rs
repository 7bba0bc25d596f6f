//! Streaming concatenation of RDF files
//!
//! Each input is parsed as a lazy sequence of statements that are forwarded
//! one by one into an open, format-bound serializer over the (possibly
//! compressed) output file. Nothing is buffered beyond what the parser and
//! serializer need internally, and nothing is deduplicated. Input and output
//! serializations are independent; a named-graph statement fed into a
//! triples-only output format surfaces as a write error rather than being
//! silently projected onto the default graph.

use std::fs;
use std::path::{Path, PathBuf};

use oxrdf::Quad;
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer, WriterQuadSerializer};
use tracing::info;
use url::Url;

use crate::compression::{open_input, CompressedWriter};
use crate::error::SpliceError;
use crate::format::{identifier_to_rdf_format, rdf_format_from_file_name};
use crate::transform::Transformator;

/// Transformator that streams statements directly into the output writer
pub struct StreamingTransformator {
    writer: WriterQuadSerializer<CompressedWriter>,
    output_file: PathBuf,
}

impl StreamingTransformator {
    /// Bind a streaming serializer for `format` to the given output stream.
    /// The transformator takes ownership of the stream and closes it in
    /// [`Transformator::finish`].
    pub fn new(format: RdfFormat, out: CompressedWriter, output_file: PathBuf) -> Self {
        StreamingTransformator {
            writer: RdfSerializer::from_format(format).for_writer(out),
            output_file,
        }
    }
}

impl Transformator for StreamingTransformator {
    fn add_file(&mut self, path: &Path, content_type: Option<&str>) -> Result<(), SpliceError> {
        let output_file = self.output_file.clone();
        let writer = &mut self.writer;
        parse_quads(path, content_type, |quad| {
            writer.serialize_quad(&quad).map_err(|e| SpliceError::Write {
                path: output_file.clone(),
                reason: e.to_string(),
            })
        })
    }

    fn output_file(&self) -> &Path {
        &self.output_file
    }

    fn finish(self: Box<Self>) -> Result<(), SpliceError> {
        let out = self.writer.finish().map_err(SpliceError::Io)?;
        out.finish()?;
        Ok(())
    }
}

/// Parse one input file as a quad stream and feed every statement to `sink`
///
/// The compression suffix is stripped first; the explicit content type, if
/// any, takes precedence over inference from the stripped file name. Blank
/// node labels are renamed per file so that labels from independent inputs
/// never collide in the output.
pub(crate) fn parse_quads<F>(
    path: &Path,
    content_type: Option<&str>,
    mut sink: F,
) -> Result<(), SpliceError>
where
    F: FnMut(Quad) -> Result<(), SpliceError>,
{
    let (reader, stripped_name) = open_input(path)?;
    let format = match content_type {
        Some(ct) => identifier_to_rdf_format(ct)
            .ok_or_else(|| SpliceError::UnsupportedFormat(ct.to_string()))?,
        None => rdf_format_from_file_name(&stripped_name)
            .ok_or_else(|| SpliceError::UnknownInputFormat(path.to_path_buf()))?,
    };

    let mut parser = RdfParser::from_format(format).rename_blank_nodes();
    if let Ok(absolute) = fs::canonicalize(path) {
        if let Ok(base) = Url::from_file_path(&absolute) {
            parser = parser
                .with_base_iri(base.as_str().to_owned())
                .map_err(|e| SpliceError::Parse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
        }
    }

    info!("Adding file {} ...", path.display());
    for quad in parser.for_reader(reader) {
        let quad = quad.map_err(|e| SpliceError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        sink(quad)?;
    }
    Ok(())
}
