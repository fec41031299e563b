use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::{error, info};

use segment_export::logging::LOG_ENV_VAR;
use segment_export::opts::DEFAULT_MAX_FILE_BYTES;
use segment_export::{
    AudioFile, ExportOpts, OutputType, SettingsBundle, ValidationOpts, ValidationResult,
    validate_audio_file, validate_settings, write_artifact,
};

#[derive(Parser, Debug)]
#[command(name = "segment-export")]
#[command(about = "Export transcription segments and pre-flight transcription requests")]
#[command(after_help = format!(
    "Log verbosity is read from {LOG_ENV_VAR} (e.g. {LOG_ENV_VAR}=debug)."
))]
struct Params {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a JSON array of segments into a caption or data artifact.
    Encode {
        #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputType::Vtt)]
        format: OutputType,

        /// Segments file (JSON array). Use `-` for stdin.
        #[arg(short = 'i', long = "input", default_value = "-")]
        input: String,

        /// JSON object merged into the JSON document's metadata.
        #[arg(short = 'm', long = "metadata")]
        metadata: Option<PathBuf>,

        /// Output file. Defaults to stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Validate a settings bundle (JSON object) and print the verdict.
    Validate {
        /// Settings file. Use `-` for stdin.
        #[arg(short = 's', long = "settings", default_value = "-")]
        settings: String,
    },

    /// Check whether a file is acceptable for upload.
    CheckFile {
        #[arg(long = "name")]
        name: String,

        /// Declared media type, e.g. `audio/mpeg`.
        #[arg(long = "type")]
        media_type: Option<String>,

        /// Size in bytes.
        #[arg(long = "size")]
        size: Option<u64>,

        /// Size above which a warning is attached.
        #[arg(long = "max-bytes", default_value_t = DEFAULT_MAX_FILE_BYTES)]
        max_bytes: u64,
    },
}

fn main() {
    segment_export::init_logging();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            error!(error = ?err, "segment-export failed");
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when a validation verdict was negative.
fn run() -> Result<bool> {
    match Params::parse().command {
        Command::Encode {
            format,
            input,
            metadata,
            output,
        } => {
            encode(format, &input, metadata.as_deref(), output.as_deref())?;
            Ok(true)
        }
        Command::Validate { settings } => {
            let raw = read_input(&settings)?;
            let bundle: SettingsBundle =
                serde_json::from_str(&raw).context("settings must be a JSON object")?;
            print_verdict(&validate_settings(&bundle))
        }
        Command::CheckFile {
            name,
            media_type,
            size,
            max_bytes,
        } => {
            let file = AudioFile {
                name: Some(name),
                media_type,
                size,
            };
            let opts = ValidationOpts {
                max_file_bytes: max_bytes,
            };
            print_verdict(&validate_audio_file(Some(&file), &opts))
        }
    }
}

fn encode(
    format: OutputType,
    input: &str,
    metadata: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let raw = read_input(input)?;
    let value: Value = serde_json::from_str(&raw).context("segments input is not valid JSON")?;

    let mut opts = ExportOpts::default();
    if let Some(path) = metadata {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read metadata from '{}'", path.display()))?;
        let extra: Map<String, Value> =
            serde_json::from_str(&text).context("metadata must be a JSON object")?;
        opts = opts.with_metadata(extra);
    }

    // Check the whole list before opening the output so a bad segment never leaves a
    // truncated artifact behind.
    let segments = segment_export::segment_check::parse_segments(&value)?;
    info!(format = %format, count = segments.len(), "encoding");

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            write_artifact(format, &segments, BufWriter::new(file), &opts)?;
        }
        None => {
            let stdout = io::stdout();
            write_artifact(format, &segments, BufWriter::new(stdout.lock()), &opts)?;
        }
    }

    Ok(())
}

fn read_input(source: &str) -> Result<String> {
    let mut buf = String::new();
    if source == "-" {
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
    } else {
        File::open(source)
            .with_context(|| format!("failed to open '{source}'"))?
            .read_to_string(&mut buf)
            .with_context(|| format!("failed to read '{source}'"))?;
    }

    if buf.trim().is_empty() {
        bail!("input is empty");
    }
    Ok(buf)
}

fn print_verdict(result: &ValidationResult) -> Result<bool> {
    let stdout = io::stdout();
    let mut w = stdout.lock();
    serde_json::to_writer_pretty(&mut w, result)?;
    writeln!(w)?;
    Ok(result.is_valid)
}
