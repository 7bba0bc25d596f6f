//! Job-level driver glue
//!
//! Wraps the transformation core into a batch job: configuration is read
//! once from the environment into an explicit [`JobConfig`], input locations
//! follow the shared-storage path convention (`shared://<relative path>`)
//! and are translated to local paths before processing, and a small RDF
//! description of the produced artifact is sent to the coordination service
//! afterwards. No retries are performed here; retry policy belongs to the
//! surrounding orchestration.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, GraphName, Literal, NamedNode, Quad};
use oxrdfio::{RdfFormat, RdfSerializer};
use tracing::{info, warn};

use crate::builder::TransformatorBuilder;
use crate::compression::Compression;
use crate::error::SpliceError;
use crate::format::OutputFormat;
use crate::vocab;

/// Scheme prefix of shared-storage paths
pub const SHARED_SCHEME: &str = "shared://";

/// Process-level configuration, read once at startup
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Local mount point of the shared directory
    pub shared_dir: PathBuf,
    /// Directory (inside the shared directory) for the output file
    pub output_dir: PathBuf,
    /// Base URL of the coordination service
    pub service_url: String,
    /// IRI identifying this job towards the service
    pub job_iri: String,
}

impl JobConfig {
    /// Read the configuration from the environment; every variable is
    /// required and a missing one is a fatal configuration error
    pub fn from_env() -> Result<Self, SpliceError> {
        Ok(JobConfig {
            shared_dir: PathBuf::from(env_var("SPLICE_SHARED_DIRECTORY")?),
            output_dir: PathBuf::from(env_var("SPLICE_OUTPUT_DIRECTORY")?),
            service_url: env_var("SPLICE_SERVICE_URL")?,
            job_iri: env_var("SPLICE_JOB_IRI")?,
        })
    }
}

fn env_var(key: &str) -> Result<String, SpliceError> {
    env::var(key).map_err(|_| SpliceError::MissingEnv(key.to_string()))
}

/// One input file of a job
#[derive(Debug, Clone)]
pub struct InputSpec {
    /// Shared-storage location (`shared://...`)
    pub location: String,
    /// Optional explicit format identifier for this input
    pub media_type: Option<String>,
}

/// Parameters of one transformation job
#[derive(Debug, Clone)]
pub struct JobParameters {
    /// Ordered, non-empty list of inputs
    pub inputs: Vec<InputSpec>,
    /// Target format identifier (content type or IANA media-type IRI)
    pub output_format: String,
    pub compression: Compression,
    /// Explicit output base name; random digits when absent
    pub output_file_name: Option<String>,
}

/// Description of the produced artifact
#[derive(Debug, Clone)]
pub struct JobResult {
    pub output_file: PathBuf,
    /// Shared-storage location of the output
    pub shared_location: String,
    /// Resolved media-type IRI of the output
    pub media_type_iri: String,
    /// Byte size; `None` if the lookup failed (non-fatal)
    pub byte_size: Option<u64>,
}

/// Translate a shared-storage path to a local filesystem path
pub fn shared_to_local(shared: &str, shared_dir: &Path) -> Result<PathBuf, SpliceError> {
    let relative = shared
        .strip_prefix(SHARED_SCHEME)
        .ok_or_else(|| SpliceError::InvalidSharedPath(shared.to_string()))?;
    if relative.is_empty() || relative.starts_with('/') || relative.split('/').any(|c| c == "..") {
        return Err(SpliceError::InvalidSharedPath(shared.to_string()));
    }
    Ok(shared_dir.join(relative))
}

/// Translate a local path below the shared directory back into the
/// shared-storage convention
pub fn local_to_shared(local: &Path, shared_dir: &Path) -> Result<String, SpliceError> {
    let relative = local
        .strip_prefix(shared_dir)
        .map_err(|_| SpliceError::OutsideSharedDirectory(local.to_path_buf()))?;
    let mut location = String::from(SHARED_SCHEME);
    for (i, component) in relative.components().enumerate() {
        if i > 0 {
            location.push('/');
        }
        location.push_str(&component.as_os_str().to_string_lossy());
    }
    Ok(location)
}

/// Run one transformation job: build the transformator, feed every input in
/// the given order, finalize, and describe the produced artifact
pub fn run_job(config: &JobConfig, params: &JobParameters) -> Result<JobResult, SpliceError> {
    if params.inputs.is_empty() {
        return Err(SpliceError::NoInputFiles);
    }
    let mut builder = TransformatorBuilder::new()
        .with_output_format(&params.output_format)
        .with_output_directory(&config.output_dir)
        .with_compression(params.compression);
    if let Some(name) = &params.output_file_name {
        builder = builder.with_output_file_name(name);
    }
    let mut transformator = builder.build()?;

    for input in &params.inputs {
        let local = shared_to_local(&input.location, &config.shared_dir)?;
        transformator.add_path(&local, input.media_type.as_deref())?;
    }

    let output_file = transformator.output_file().to_path_buf();
    transformator.finish()?;
    info!("Wrote output file {}", output_file.display());

    // Cannot fail at this point; build already rejected the identifier
    let format = OutputFormat::resolve(&params.output_format)
        .ok_or_else(|| SpliceError::UnsupportedFormat(params.output_format.clone()))?;

    let byte_size = match fs::metadata(&output_file) {
        Ok(metadata) => Some(metadata.len()),
        Err(e) => {
            warn!(
                "Couldn't determine the size of {}: {e}",
                output_file.display()
            );
            None
        }
    };

    Ok(JobResult {
        shared_location: local_to_shared(&output_file, &config.shared_dir)?,
        media_type_iri: format.media_type_iri(),
        output_file,
        byte_size,
    })
}

/// Build the RDF description of the produced artifact
pub fn describe_result(result: &JobResult, job_iri: &str) -> Result<Vec<Quad>, SpliceError> {
    let job = NamedNode::new(job_iri).map_err(|e| SpliceError::Service {
        url: job_iri.to_string(),
        reason: format!("invalid job IRI: {e}"),
    })?;
    let file = BlankNode::default();
    let media_type = NamedNode::new(result.media_type_iri.clone()).map_err(|e| {
        SpliceError::Service {
            url: result.media_type_iri.clone(),
            reason: format!("invalid media-type IRI: {e}"),
        }
    })?;

    let mut quads = vec![
        Quad::new(
            file.clone(),
            rdf::TYPE,
            vocab::PROV_ENTITY,
            GraphName::DefaultGraph,
        ),
        Quad::new(
            file.clone(),
            vocab::LOCATION,
            Literal::new_simple_literal(&result.shared_location),
            GraphName::DefaultGraph,
        ),
        Quad::new(
            file.clone(),
            vocab::PROV_WAS_GENERATED_BY,
            job.clone(),
            GraphName::DefaultGraph,
        ),
        Quad::new(
            file.clone(),
            vocab::DCAT_MEDIA_TYPE,
            media_type,
            GraphName::DefaultGraph,
        ),
        Quad::new(job, vocab::OUTPUT, file.clone(), GraphName::DefaultGraph),
    ];
    if let Some(size) = result.byte_size {
        quads.push(Quad::new(
            file,
            vocab::DCAT_BYTE_SIZE,
            Literal::new_typed_literal(size.to_string(), xsd::INTEGER),
            GraphName::DefaultGraph,
        ));
    }
    Ok(quads)
}

/// POST the result description, serialized as Turtle, to the service's
/// `add-resource` endpoint
pub fn send_result(service_url: &str, record: &[Quad]) -> Result<(), SpliceError> {
    let url = format!("{}/add-resource", service_url.trim_end_matches('/'));

    let mut writer = RdfSerializer::from_format(RdfFormat::Turtle).for_writer(Vec::new());
    for quad in record {
        writer.serialize_quad(quad).map_err(|e| SpliceError::Service {
            url: url.clone(),
            reason: e.to_string(),
        })?;
    }
    let body = writer.finish().map_err(|e| SpliceError::Service {
        url: url.clone(),
        reason: e.to_string(),
    })?;

    let response = reqwest::blocking::Client::new()
        .post(&url)
        .header(reqwest::header::CONTENT_TYPE, RdfFormat::Turtle.media_type())
        .body(body)
        .send()
        .map_err(|e| SpliceError::Service {
            url: url.clone(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(SpliceError::Service {
            url,
            reason: format!("unexpected status {}", response.status()),
        });
    }
    info!("Result record accepted by {url}");
    Ok(())
}
