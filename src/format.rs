//! Media-type resolution for RDF and ontology document formats
//!
//! External format identifiers are accepted both as bare content types
//! (`text/turtle`) and as IANA media-type IRIs
//! (`https://www.iana.org/assignments/media-types/text/turtle`). RDF
//! serializations map onto [`oxrdfio::RdfFormat`]; the two ontology document
//! formats are kept in a separate table since they cannot be streamed and
//! select a different output strategy.

use oxrdfio::RdfFormat;

/// Prefixes of IANA media-type IRIs from which the content type is taken
const IANA_PREFIXES: [&str; 2] = [
    "https://www.iana.org/assignments/media-types/",
    "http://www.iana.org/assignments/media-types/",
];

/// Ontology document formats that require buffering the whole axiom set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OntologyFormat {
    /// OWL/XML (`application/owl+xml`)
    OwlXml,
    /// Manchester syntax (`text/owl-manchester`)
    Manchester,
}

impl OntologyFormat {
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match base_content_type(media_type) {
            "application/owl+xml" => Some(OntologyFormat::OwlXml),
            "text/owl-manchester" => Some(OntologyFormat::Manchester),
            _ => None,
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            OntologyFormat::OwlXml => "application/owl+xml",
            OntologyFormat::Manchester => "text/owl-manchester",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            OntologyFormat::OwlXml => "owl",
            OntologyFormat::Manchester => "omn",
        }
    }
}

/// A resolved output format, determining the transformation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Written statement-by-statement through a streaming serializer
    Streaming(RdfFormat),
    /// Buffered as an axiom set and serialized once on finalization
    Ontology(OntologyFormat),
}

impl OutputFormat {
    /// Resolve an external identifier (content type or IANA IRI) against the
    /// streamable-format table first, then the ontology-format table.
    /// Unknown identifiers are a recoverable `None`, to be rejected by the
    /// builder with the offending identifier in the error.
    pub fn resolve(identifier: &str) -> Option<Self> {
        if let Some(format) = identifier_to_rdf_format(identifier) {
            if is_streamable(format) {
                return Some(OutputFormat::Streaming(format));
            }
            // Parseable but not writable as a stream (e.g. RDF/XML output)
            return None;
        }
        OntologyFormat::from_media_type(identifier).map(OutputFormat::Ontology)
    }

    /// Canonical file extension; total over the supported formats
    pub fn file_extension(&self) -> &'static str {
        match self {
            OutputFormat::Streaming(f) => f.file_extension(),
            OutputFormat::Ontology(f) => f.file_extension(),
        }
    }

    /// Canonical content-type string
    pub fn media_type(&self) -> &'static str {
        match self {
            OutputFormat::Streaming(f) => f.media_type(),
            OutputFormat::Ontology(f) => f.media_type(),
        }
    }

    /// The IANA media-type IRI identifying this format externally
    pub fn media_type_iri(&self) -> String {
        format!("{}{}", IANA_PREFIXES[0], self.media_type())
    }
}

/// Strip an IANA media-type IRI prefix, leaving the bare content type
fn strip_iana_prefix(identifier: &str) -> &str {
    for prefix in IANA_PREFIXES {
        if let Some(rest) = identifier.strip_prefix(prefix) {
            return rest;
        }
    }
    identifier
}

/// Bare content type without IRI prefix or parameters (`; charset=...`)
fn base_content_type(identifier: &str) -> &str {
    let ct = strip_iana_prefix(identifier);
    ct.split(';').next().unwrap_or(ct).trim()
}

/// Resolve an external identifier to an RDF serialization (input side:
/// everything the parser understands, streamable or not)
pub fn identifier_to_rdf_format(identifier: &str) -> Option<RdfFormat> {
    RdfFormat::from_media_type(base_content_type(identifier))
}

/// True for the serializations that can be written as an unbounded statement
/// stream without global buffering
pub fn is_streamable(format: RdfFormat) -> bool {
    matches!(
        format,
        RdfFormat::NTriples | RdfFormat::Turtle | RdfFormat::NQuads | RdfFormat::TriG
    )
}

/// Infer an input RDF serialization from a file name (after the compression
/// suffix has been stripped)
pub fn rdf_format_from_file_name(name: &str) -> Option<RdfFormat> {
    let extension = name.rsplit('.').next()?;
    if extension.len() == name.len() {
        // No dot in the name at all
        return None;
    }
    RdfFormat::from_extension(extension)
}
