//! dsconv CLI - Command-line tool for training-data normalization
//!
//! This binary provides command-line interfaces for:
//! - inspect: show the schema and a sample record of an input
//! - convert: project records onto the `sft` or `pt` schema
//! - split: keep the first N records, optionally longest first

use clap::{Parser, Subcommand, ValueEnum};
use dsconv_core::{JobConfig, KeyMapping, OutputType, SplitMode};
use dsconv_io::{
    execute_convert, execute_inspect, execute_split, ConvertRequest, ConvertSummary,
    InputSource, InspectRequest, ReadOptions, SourceKind, SplitRequest, SplitSummary,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dsconv")]
#[command(about = "Training-data format normalization tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the keys, a sample record, and the record count of an input
    ///
    /// Examples:
    ///   dsconv inspect train.parquet
    ///   dsconv inspect data.jsonl --report json
    Inspect {
        /// Input file or dataset directory
        input: PathBuf,
        /// Input format (json, jsonl, csv, parquet, arrow); detected from the path by default
        #[arg(long)]
        format: Option<String>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        report: ReportFormat,
        /// Fail on unparsable JSON Lines instead of skipping them
        #[arg(long)]
        strict_lines: bool,
    },
    /// Convert records to the sft or pt schema
    ///
    /// Examples:
    ///   dsconv convert qa.parquet -o alpaca.json
    ///   dsconv convert qa.jsonl -o out.json --key-map Query:instruction Answer:output
    ///   dsconv convert corpus.csv -o pt.jsonl --output-type pt
    Convert {
        /// Input file or dataset directory
        input: PathBuf,
        /// Output file (.json array, or .jsonl lines)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output data type, sft or pt (default: sft)
        #[arg(long)]
        output_type: Option<String>,
        /// Key map entries source:target, e.g. Query:instruction input:input Answer:output
        #[arg(long, num_args = 1..)]
        key_map: Option<Vec<String>>,
        /// TOML job file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Input format (json, jsonl, csv, parquet, arrow); detected from the path by default
        #[arg(long)]
        format: Option<String>,
        /// Fail on unparsable JSON Lines instead of skipping them
        #[arg(long)]
        strict_lines: bool,
        /// Show progress spinner while converting
        #[arg(long)]
        progress: bool,
    },
    /// Keep the first N records of an input
    ///
    /// Examples:
    ///   dsconv split alpaca.json -o head.json --count 100
    ///   dsconv split alpaca.json -o longest.json --count 100 --mode SORT_BY_LEN
    Split {
        /// Input file or dataset directory
        input: PathBuf,
        /// Output file (.json array, or .jsonl lines)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of records to keep
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
        /// Ordering applied before truncation, e.g. SORT_BY_LEN
        #[arg(long)]
        mode: Option<String>,
        /// TOML job file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Input format (json, jsonl, csv, parquet, arrow); detected from the path by default
        #[arg(long)]
        format: Option<String>,
        /// Fail on unparsable JSON Lines instead of skipping them
        #[arg(long)]
        strict_lines: bool,
        /// Show progress spinner while splitting
        #[arg(long)]
        progress: bool,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Job settings given on the command line, layered over an optional job file
#[derive(Debug, Default)]
struct JobFlags {
    config: Option<PathBuf>,
    output_type: Option<String>,
    key_map: Option<Vec<String>>,
    mode: Option<String>,
    count: Option<i64>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Inspect {
            input,
            format,
            report,
            strict_lines,
        } => {
            handle_inspect(input, format, report, strict_lines)?;
        }
        Commands::Convert {
            input,
            output,
            output_type,
            key_map,
            config,
            format,
            strict_lines,
            progress,
        } => {
            let flags = JobFlags {
                config,
                output_type,
                key_map,
                ..JobFlags::default()
            };
            handle_convert(input, output, flags, format, strict_lines, progress)?;
        }
        Commands::Split {
            input,
            output,
            count,
            mode,
            config,
            format,
            strict_lines,
            progress,
        } => {
            let flags = JobFlags {
                config,
                mode,
                count,
                ..JobFlags::default()
            };
            handle_split(input, output, flags, format, strict_lines, progress)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries reports; diagnostics go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_inspect(
    input: PathBuf,
    format: Option<String>,
    report_format: ReportFormat,
    strict_lines: bool,
) -> Result<(), Box<dyn Error>> {
    let request = InspectRequest {
        input: resolve_input(input, format)?,
        read: ReadOptions { strict_lines },
    };
    let report = execute_inspect(request)?;

    let mut stdout = std::io::stdout().lock();
    match report_format {
        ReportFormat::Text => writeln!(&mut stdout, "{}", report)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(&mut stdout)?;
        }
    }
    Ok(())
}

fn handle_convert(
    input: PathBuf,
    output: Option<PathBuf>,
    flags: JobFlags,
    format: Option<String>,
    strict_lines: bool,
    show_progress: bool,
) -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let request = ConvertRequest {
        input: resolve_input(input, format)?,
        output: output.clone(),
        job: build_job(flags)?,
        read: ReadOptions { strict_lines },
    };

    let mut progress_bar = show_progress.then(|| create_spinner("Converting records"));
    let summary = execute_convert(request)?;
    let elapsed = start.elapsed();
    if let Some(pb) = progress_bar.take() {
        pb.finish_with_message(format!(
            "Converted {} -> {} records in {:.2?}",
            summary.records_read, summary.records_written, elapsed
        ));
    }
    if let Some(output) = output {
        report_convert_summary(&summary, &output, elapsed)?;
    }
    Ok(())
}

fn handle_split(
    input: PathBuf,
    output: Option<PathBuf>,
    flags: JobFlags,
    format: Option<String>,
    strict_lines: bool,
    show_progress: bool,
) -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let request = SplitRequest {
        input: resolve_input(input, format)?,
        output: output.clone(),
        job: build_job(flags)?,
        read: ReadOptions { strict_lines },
    };

    let mut progress_bar = show_progress.then(|| create_spinner("Splitting records"));
    let summary = execute_split(request)?;
    let elapsed = start.elapsed();
    if let Some(pb) = progress_bar.take() {
        pb.finish_with_message(format!(
            "Kept {} of {} records in {:.2?}",
            summary.records_written, summary.records_read, elapsed
        ));
    }
    if let Some(output) = output {
        report_split_summary(&summary, &output, elapsed)?;
    }
    Ok(())
}

fn resolve_input(path: PathBuf, format: Option<String>) -> Result<InputSource, Box<dyn Error>> {
    let kind = format
        .map(|name| name.parse::<SourceKind>())
        .transpose()?;
    Ok(InputSource { path, kind })
}

fn load_job_file(path: &Path) -> Result<JobConfig, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Error reading job file '{}': {}", path.display(), e))?;
    let job: JobConfig = toml::from_str(&text)
        .map_err(|e| format!("Invalid job file '{}': {}", path.display(), e))?;
    debug!(path = %path.display(), ?job, "loaded job file");
    Ok(job)
}

/// Merge the job file (if any) with command-line flags. Flags win.
fn build_job(flags: JobFlags) -> Result<JobConfig, Box<dyn Error>> {
    let mut job = match &flags.config {
        Some(path) => load_job_file(path)?,
        None => JobConfig::default(),
    };

    if let Some(name) = flags.output_type {
        job.output_type = name.parse::<OutputType>()?;
    }
    if let Some(entries) = flags.key_map {
        job.key_map = Some(KeyMapping::parse(&entries)?);
    }
    if let Some(name) = flags.mode {
        job.split_mode = SplitMode::parse(Some(&name))?;
    }
    if let Some(count) = flags.count {
        job.split = Some(count);
    }
    Ok(job)
}

fn report_convert_summary(
    summary: &ConvertSummary,
    output: &Path,
    elapsed: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut stderr = std::io::stderr().lock();
    writeln!(
        &mut stderr,
        "Converted to {} (records read: {}, records written: {}, key map: {}{}, elapsed: {:.2?})",
        output.display(),
        summary.records_read,
        summary.records_written,
        summary.mapping,
        if summary.default_mapping { " (default)" } else { "" },
        elapsed
    )?;
    Ok(())
}

fn report_split_summary(
    summary: &SplitSummary,
    output: &Path,
    elapsed: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut stderr = std::io::stderr().lock();
    writeln!(
        &mut stderr,
        "Split into {} (records read: {}, records written: {}, mode: {}, elapsed: {:.2?})",
        output.display(),
        summary.records_read,
        summary.records_written,
        summary.mode,
        elapsed
    )?;
    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn build_job_defaults_to_sft() {
        let job = build_job(JobFlags::default()).unwrap();
        assert_eq!(job, JobConfig::default());
        assert_eq!(
            job.mapping().entries(),
            vec!["instruction:instruction", "input:input", "output:output"]
        );
    }

    #[test]
    fn build_job_rejects_unknown_values() {
        let err = build_job(JobFlags {
            output_type: Some("chat".into()),
            ..JobFlags::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("unsupported output type"));

        let err = build_job(JobFlags {
            mode: Some("SHUFFLE".into()),
            ..JobFlags::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("unsupported split mode"));

        let err = build_job(JobFlags {
            key_map: Some(vec!["Query-instruction".into()]),
            ..JobFlags::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("Query-instruction"));
    }

    #[test]
    fn flags_override_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        fs::write(
            &path,
            "output_type = \"pt\"\nkey_map = [\"content:text\"]\nsplit_mode = \"SORT_BY_LEN\"\nsplit = 10\n",
        )
        .unwrap();

        let job = build_job(JobFlags {
            config: Some(path.clone()),
            count: Some(3),
            ..JobFlags::default()
        })
        .unwrap();
        assert_eq!(job.output_type, OutputType::Pt);
        assert_eq!(job.mapping().entries(), vec!["content:text"]);
        assert_eq!(job.split_mode, SplitMode::SortByLen);
        assert_eq!(job.split, Some(3));
    }

    #[test]
    fn invalid_job_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        fs::write(&path, "key_map = [\"broken\"]\n").unwrap();

        let err = build_job(JobFlags {
            config: Some(path),
            ..JobFlags::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("job.toml"));
    }

    #[test]
    fn resolve_input_validates_format_name() {
        let input = resolve_input(PathBuf::from("x.txt"), Some("jsonl".into())).unwrap();
        assert_eq!(input.kind, Some(SourceKind::Jsonl));
        assert!(resolve_input(PathBuf::from("x.txt"), Some("xml".into())).is_err());
    }

    #[test]
    fn convert_then_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.jsonl");
        let output = dir.path().join("out.json");
        fs::write(&input, "{\"content\": \"hello\"}\n{\"content\": \"\"}\n").unwrap();

        handle_convert(
            input,
            Some(output.clone()),
            JobFlags {
                output_type: Some("pt".into()),
                key_map: Some(vec!["content:text".into()]),
                ..JobFlags::default()
            },
            None,
            false,
            false,
        )
        .unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!([{"text": "hello"}]));
    }
}
