//! RDF Splicing Library
//!
//! This library concatenates and re-serializes multiple RDF documents into a
//! single output document, potentially changing serialization format and
//! compression along the way, without loading the whole dataset into memory.
//!
//! # Overview
//!
//! Inputs may be independently compressed (gzip, bzip2) and may each use a
//! different serialization. The output format decides between two mutually
//! exclusive strategies:
//!
//! 1. Streamable RDF formats (N-Triples, Turtle, N-Quads, TriG) are written
//!    statement-by-statement by [`StreamingTransformator`]; no statement is
//!    buffered and nothing is deduplicated.
//! 2. Ontology document formats (OWL/XML, Manchester syntax) cannot be
//!    written incrementally; [`OntologyTransformator`] merges all axioms in
//!    memory and serializes once on finalization. Duplicate axioms collapse
//!    since axioms are compared by logical equality.
//!
//! # Usage
//!
//! ```ignore
//! use rdf_splice::{Compression, TransformatorBuilder};
//!
//! let mut transformator = TransformatorBuilder::new()
//!     .with_output_format("application/n-triples")
//!     .with_output_directory("/tmp/out")
//!     .with_compression(Compression::Gzip)
//!     .build()?;
//!
//! transformator.add_path("a.ttl".as_ref(), None)?;
//! transformator.add_path("b.rdf.gz".as_ref(), Some("application/rdf+xml"))?;
//!
//! let output = transformator.output_file().to_path_buf();
//! transformator.finish()?;
//! println!("{}", output.display());
//! ```

pub mod builder;
pub mod compression;
pub mod error;
pub mod format;
pub mod job;
pub mod ontology;
pub mod owl;
pub mod streaming;
pub mod transform;
pub mod vocab;

// Re-export main types for convenience
pub use crate::builder::TransformatorBuilder;
pub use crate::compression::Compression;
pub use crate::error::SpliceError;
pub use crate::format::{OntologyFormat, OutputFormat};
pub use crate::job::{
    describe_result, run_job, send_result, InputSpec, JobConfig, JobParameters, JobResult,
};
pub use crate::ontology::OntologyTransformator;
pub use crate::owl::{Axiom, EntityKind, Ontology};
pub use crate::streaming::StreamingTransformator;
pub use crate::transform::Transformator;
