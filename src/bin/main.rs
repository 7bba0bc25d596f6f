//! RDF Splicing CLI
//!
//! Command-line tool for concatenating RDF files into a single output
//! document, either with explicit arguments (`splice`) or as an
//! environment-configured batch job that reports its result to a
//! coordination service (`job`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use rdf_splice::{
    describe_result, run_job, send_result, Compression, InputSpec, JobConfig, JobParameters,
    SpliceError, TransformatorBuilder,
};

#[derive(Parser)]
#[command(name = "rdf-splice")]
#[command(about = "Concatenate and re-serialize RDF files into a single output document")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Concatenate local files or directories into one output file
    Splice(SpliceArgs),
    /// Run as a batch job: paths follow the shared-storage convention and
    /// the result is reported to the coordination service
    Job(JobArgs),
}

#[derive(Args)]
struct SpliceArgs {
    /// Input RDF files or directories (processed in the given order)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output format: content type or IANA media-type IRI
    #[arg(short, long)]
    format: String,

    /// Content types for the inputs, by position (inferred from file names
    /// when omitted). Can be repeated.
    #[arg(long = "content-type", value_name = "CONTENT_TYPE")]
    content_types: Vec<String>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file base name (default: random digits)
    #[arg(short, long)]
    name: Option<String>,

    /// Output compression
    #[arg(short, long, value_enum, default_value_t = CompressionArg::None)]
    compression: CompressionArg,
}

#[derive(Args)]
struct JobArgs {
    /// Input locations (shared://...), processed in the given order.
    /// Can be repeated.
    #[arg(long = "input", value_name = "LOCATION", required = true)]
    inputs: Vec<String>,

    /// Content types for the inputs, by position
    #[arg(long = "input-type", value_name = "CONTENT_TYPE")]
    input_types: Vec<String>,

    /// Output format: content type or IANA media-type IRI
    #[arg(short, long)]
    format: String,

    /// Output file base name (default: random digits)
    #[arg(short, long)]
    name: Option<String>,

    /// Output compression
    #[arg(short, long, value_enum, default_value_t = CompressionArg::None)]
    compression: CompressionArg,

    /// Skip reporting the result to the coordination service
    #[arg(long)]
    no_report: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CompressionArg {
    None,
    Gzip,
    Bzip2,
}

impl From<CompressionArg> for Compression {
    fn from(value: CompressionArg) -> Self {
        match value {
            CompressionArg::None => Compression::None,
            CompressionArg::Gzip => Compression::Gzip,
            CompressionArg::Bzip2 => Compression::Bzip2,
        }
    }
}

fn run_splice(args: SpliceArgs) -> Result<(), SpliceError> {
    let mut builder = TransformatorBuilder::new()
        .with_output_format(&args.format)
        .with_compression(args.compression.into());
    if let Some(dir) = &args.output_dir {
        builder = builder.with_output_directory(dir);
    }
    if let Some(name) = &args.name {
        builder = builder.with_output_file_name(name);
    }
    let mut transformator = builder.build()?;

    for (i, input) in args.inputs.iter().enumerate() {
        let content_type = args.content_types.get(i).map(String::as_str);
        transformator.add_path(input, content_type)?;
    }

    let output = transformator.output_file().to_path_buf();
    transformator.finish()?;
    eprintln!("Wrote {}", output.display());
    println!("{}", output.display());
    Ok(())
}

fn run_batch_job(args: JobArgs) -> Result<(), SpliceError> {
    let config = JobConfig::from_env()?;

    let inputs = args
        .inputs
        .iter()
        .enumerate()
        .map(|(i, location)| InputSpec {
            location: location.clone(),
            media_type: args.input_types.get(i).cloned(),
        })
        .collect();
    let params = JobParameters {
        inputs,
        output_format: args.format,
        compression: args.compression.into(),
        output_file_name: args.name,
    };

    let result = run_job(&config, &params)?;
    eprintln!(
        "Wrote {} ({})",
        result.shared_location,
        match result.byte_size {
            Some(size) => format!("{size} bytes"),
            None => "size unknown".to_string(),
        }
    );

    if !args.no_report {
        let record = describe_result(&result, &config.job_iri)?;
        send_result(&config.service_url, &record)?;
    }

    println!("{}", result.shared_location);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Splice(args) => run_splice(args),
        Commands::Job(args) => run_batch_job(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
