//! Batch processing command for multiple intake forms.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use intake_core::models::record::PatientRecord;
use intake_core::ocr::TesseractEngine;
use intake_core::pdf::PdftoppmRasterizer;
use intake_core::pipeline::DocumentProcessor;
use intake_core::store::SqliteRecordStore;

use super::load_config;
use super::process::{format_record, OutputFormat};

/// Extensions picked up from the glob.
const SUPPORTED_EXTENSIONS: [&str; 9] =
    ["pdf", "png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Do not save records to the database
    #[arg(long)]
    no_store: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<PatientRecord>,
    patient_id: Option<i64>,
    page_count: usize,
    recovered_fields: usize,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let processor = DocumentProcessor::from_config(&config);
    let store = if args.no_store {
        None
    } else {
        Some(SqliteRecordStore::open(&config.store.database_path)?)
    };

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Files are processed one at a time, in glob order.
    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let outcome = process_single_file(&path, &processor, store.as_ref());
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => results.push(ProcessResult {
                processing_time_ms,
                ..result
            }),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path: path.clone(),
                        record: None,
                        patient_id: None,
                        page_count: 0,
                        recovered_fields: 0,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(record) = &result.record {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("record");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn process_single_file(
    path: &Path,
    processor: &DocumentProcessor<TesseractEngine, PdftoppmRasterizer>,
    store: Option<&SqliteRecordStore>,
) -> anyhow::Result<ProcessResult> {
    let document = processor.process(path)?;
    let page_count = document.page_count;
    let recovered_fields = document.form.recovered_count();

    let (record, patient_id) = match store {
        Some(store) => {
            let stored = processor.store(document, store)?;
            (stored.document.form.record, Some(stored.patient_id))
        }
        None => (document.form.record, None),
    };

    Ok(ProcessResult {
        path: path.to_path_buf(),
        record: Some(record),
        patient_id,
        page_count,
        recovered_fields,
        error: None,
        processing_time_ms: 0,
    })
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "patient_id",
        "patient_name",
        "dob",
        "date",
        "pages",
        "fields_recovered",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(record) = &result.record {
            wtr.write_record([
                filename,
                "success",
                &result.patient_id.map(|id| id.to_string()).unwrap_or_default(),
                &record.patient_name,
                &record.dob,
                &record.date,
                &result.page_count.to_string(),
                &result.recovered_fields.to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported(Path::new("scan.PDF")));
        assert!(is_supported(Path::new("scan.jpeg")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("README")));
    }

    #[test]
    fn test_summary_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let results = vec![
            ProcessResult {
                path: PathBuf::from("a.pdf"),
                record: Some(PatientRecord::default()),
                patient_id: Some(4),
                page_count: 2,
                recovered_fields: 0,
                error: None,
                processing_time_ms: 12,
            },
            ProcessResult {
                path: PathBuf::from("b.png"),
                record: None,
                patient_id: None,
                page_count: 0,
                recovered_fields: 0,
                error: Some("OCR error".to_string()),
                processing_time_ms: 3,
            },
        ];

        write_summary(&path, &results).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "a.pdf,success,4,Unknown,Unknown,Unknown,2,0,12,");
        assert_eq!(lines[2], "b.png,error,,,,,,,3,OCR error");
    }
}
