use crate::config::{Config, SinkKind};
use crate::error::FormatError;
use crate::loaders::Format;
use crate::model::BucketMetadata;
use crate::parser::{ParseReport, ParserOptions};
use crate::sinks::{DatabaseSink, HttpSink, UploadSession};
use clap::{Parser, Subcommand};
use eyre::{WrapErr, eyre};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::Level;

mod annotate;
mod checks;
mod config;
mod display;
mod error;
mod loaders;
mod model;
mod parser;
mod sinks;
mod stats;
mod template;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Use FILE instead of projingest.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Set verbosity level
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file of projects and submit it as a bucket
    Upload {
        #[command(flatten)]
        input: Input,
        /// Do not submit the bucket
        #[arg(short = 'n', long)]
        dry_run: bool,
        /// Write the submission payload as JSON to FILE
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        #[command(flatten)]
        bucket: BucketArgs,
    },
    /// Parse a file of projects and show one page of the result
    Preview {
        #[command(flatten)]
        input: Input,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },
    /// Write a CSV template with the expected columns
    Template {
        /// Destination file (standard output if absent)
        file: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct Input {
    /// CSV or XLSX file, or `-` to read pasted CSV from standard input
    file: PathBuf,
    /// Force the input format instead of using the file extension
    #[arg(long, value_enum)]
    format: Option<Format>,
}

#[derive(clap::Args, Default)]
struct BucketArgs {
    #[arg(long)]
    version_name: Option<String>,
    #[arg(long)]
    semester: Option<String>,
    #[arg(long)]
    department: Option<String>,
    /// Bucket tag (can be repeated)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

impl BucketArgs {
    fn apply(self, metadata: &mut BucketMetadata) {
        if let Some(version_name) = self.version_name {
            metadata.version_name = version_name;
        }
        if let Some(semester) = self.semester {
            metadata.semester = semester;
        }
        if let Some(department) = self.department {
            metadata.department = department;
        }
        metadata.tags.extend(
            self.tags
                .into_iter()
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty()),
        );
    }
}

/// Load and parse an upload. An upload without any data row is a failure.
fn ingest(
    file: &Path,
    format: Option<Format>,
    options: &ParserOptions,
) -> Result<ParseReport, FormatError> {
    let loaded = if file.as_os_str() == "-" {
        loaders::load_pasted(std::io::stdin().lock(), options.max_upload_bytes)?
    } else {
        loaders::load_file(file, format, options.max_upload_bytes)?
    };
    if loaded.rows.is_empty() {
        return Err(FormatError::NoDataRows);
    }
    Ok(parser::parse_rows(&loaded, options))
}

async fn upload(
    config: Config,
    input: Input,
    dry_run: bool,
    output: Option<PathBuf>,
    bucket: BucketArgs,
) -> color_eyre::Result<()> {
    let report = ingest(&input.file, input.format, &config.parser).wrap_err("upload failed")?;
    display::display_report(&report);
    let drafts = checks::ensure_complete(report.drafts).wrap_err("batch rejected")?;
    display::display_stats(&drafts);
    let mut metadata = config.bucket;
    bucket.apply(&mut metadata);
    metadata.validate().wrap_err("invalid bucket metadata")?;
    let mut session = UploadSession::new(metadata);
    session.stage(drafts);
    display::display_bucket(session.metadata());
    if let Some(output) = output {
        let payload = session.payload()?;
        let file = File::create(&output)
            .wrap_err_with(|| format!("cannot create {}", output.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &payload)
            .wrap_err("cannot write payload")?;
    }
    if dry_run {
        println!("Dry run, {} projects not submitted", session.batch().len());
        return Ok(());
    }
    let submission = config.submission;
    let created = match submission.sink {
        SinkKind::Http => {
            session
                .submit(&mut HttpSink::new(submission.url, submission.token))
                .await
        }
        SinkKind::Database => {
            let url = submission
                .database_url
                .ok_or_else(|| eyre!("submission.database_url is required by the database sink"))?;
            let mut sink = DatabaseSink::new(&url).await?;
            sink.ensure_schema().await?;
            session.submit(&mut sink).await
        }
    }
    .wrap_err("submission failed")?;
    println!("Created {created} projects");
    Ok(())
}

fn preview(config: &Config, input: &Input, page: usize, page_size: usize) -> color_eyre::Result<()> {
    let report = ingest(&input.file, input.format, &config.parser).wrap_err("upload failed")?;
    display::display_report(&report);
    display::display_page(&report.drafts, page, page_size);
    display::display_stats(&report.drafts);
    checks::ensure_complete(report.drafts).wrap_err("batch rejected")?;
    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let config = Config::load_or_default(args.config.as_deref())?;
    match args.command {
        Command::Upload {
            input,
            dry_run,
            output,
            bucket,
        } => upload(config, input, dry_run, output, bucket).await,
        Command::Preview {
            input,
            page,
            page_size,
        } => preview(&config, &input, page, page_size),
        Command::Template { file: Some(file) } => {
            let out = File::create(&file)
                .wrap_err_with(|| format!("cannot create {}", file.display()))?;
            template::write_template(out).wrap_err("cannot write template")?;
            Ok(())
        }
        Command::Template { file: None } => {
            template::write_template(std::io::stdout().lock()).wrap_err("cannot write template")?;
            Ok(())
        }
    }
}
