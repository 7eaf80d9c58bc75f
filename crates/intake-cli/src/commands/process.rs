//! Process command - extract a patient record from a single intake form.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use intake_core::models::record::PatientRecord;
use intake_core::pipeline::{DocumentProcessor, ProcessedDocument};
use intake_core::store::SqliteRecordStore;

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Do not save the record to the database
    #[arg(long)]
    no_store: bool,

    /// Print the sanitized OCR text to stderr
    #[arg(long)]
    show_text: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let processor = DocumentProcessor::from_config(&config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );
    pb.set_message(format!("Reading {}", args.input.display()));

    let document = processor.process_with_progress(&args.input, &mut |page, total| {
        pb.set_length(total as u64);
        pb.set_position(page as u64);
        pb.set_message(format!("OCR page {}/{}", page, total));
    });
    let document = match document {
        Ok(document) => document,
        Err(e) => {
            pb.abandon_with_message("Failed");
            return Err(e.into());
        }
    };

    let patient_id = if args.no_store {
        None
    } else {
        pb.set_message("Saving record...");
        let store = SqliteRecordStore::open(&config.store.database_path)?;
        let stored = processor.store(document.clone(), &store)?;
        Some(stored.patient_id)
    };

    pb.finish_and_clear();

    if args.show_text {
        eprintln!("{}", style("OCR text:").bold());
        eprintln!("{}", document.text);
        eprintln!();
    }

    let output = format_record(&document.form.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    report(&document, patient_id, &config.store.database_path);

    Ok(())
}

fn report(document: &ProcessedDocument, patient_id: Option<i64>, database: &std::path::Path) {
    let form = &document.form;
    eprintln!(
        "{} {} fields recovered from {} page(s) in {}ms",
        style("ℹ").blue(),
        form.recovered_count(),
        document.page_count,
        document.processing_time_ms
    );
    if !form.missing_fields.is_empty() {
        let missing: Vec<&str> = form.missing_fields.iter().map(|f| f.key()).collect();
        debug!("Defaulted fields: {}", missing.join(", "));
    }
    if let Some(id) = patient_id {
        eprintln!(
            "{} Saved as patient {} in {}",
            style("✓").green(),
            id,
            database.display()
        );
    }
}

/// Render a record in the requested output format.
pub fn format_record(record: &PatientRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

/// Column names of the flat CSV layout.
pub const CSV_COLUMNS: [&str; 18] = [
    "patient_name",
    "dob",
    "date",
    "injection",
    "exercise_therapy",
    "pain",
    "numbness",
    "tingling",
    "burning",
    "tightness",
    "blood_pressure",
    "hr",
    "weight",
    "height",
    "spo2",
    "temperature",
    "blood_glucose",
    "respirations",
];

/// Record values in [`CSV_COLUMNS`] order; nulls become empty cells.
pub fn csv_row(record: &PatientRecord) -> Vec<String> {
    fn opt<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    let symptoms = &record.pain_symptoms;
    let vitals = &record.medical_assistant_data;

    vec![
        record.patient_name.clone(),
        record.dob.clone(),
        record.date.clone(),
        record.injection.to_string(),
        record.exercise_therapy.to_string(),
        opt(&symptoms.pain),
        opt(&symptoms.numbness),
        opt(&symptoms.tingling),
        opt(&symptoms.burning),
        opt(&symptoms.tightness),
        opt(&vitals.blood_pressure),
        opt(&vitals.hr),
        opt(&vitals.weight),
        opt(&vitals.height),
        opt(&vitals.spo2),
        opt(&vitals.temperature),
        opt(&vitals.blood_glucose),
        opt(&vitals.respirations),
    ]
}

fn format_csv(record: &PatientRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_COLUMNS)?;
    wtr.write_record(csv_row(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Human-readable summary of a record.
pub fn format_text(record: &PatientRecord) -> String {
    fn show<T: ToString>(value: &Option<T>) -> String {
        value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string())
    }

    let vitals = &record.medical_assistant_data;
    let mut output = String::new();

    output.push_str(&format!("Patient: {}\n", record.patient_name));
    output.push_str(&format!("DOB:     {}\n", record.dob));
    output.push_str(&format!("Visit:   {}\n", record.date));
    output.push('\n');

    output.push_str(&format!("Injection:        {}\n", record.injection));
    output.push_str(&format!("Exercise therapy: {}\n", record.exercise_therapy));
    output.push('\n');

    output.push_str("Symptoms:\n");
    for (name, score) in record.pain_symptoms.iter() {
        output.push_str(&format!("  {:<10} {}\n", name, show(&score)));
    }
    output.push('\n');

    output.push_str("Vitals:\n");
    output.push_str(&format!("  Blood pressure: {}\n", show(&vitals.blood_pressure)));
    output.push_str(&format!("  Heart rate:     {}\n", show(&vitals.hr)));
    output.push_str(&format!("  Weight:         {}\n", show(&vitals.weight)));
    output.push_str(&format!("  Height:         {}\n", show(&vitals.height)));
    output.push_str(&format!("  SpO2:           {}\n", show(&vitals.spo2)));
    output.push_str(&format!("  Temperature:    {}\n", show(&vitals.temperature)));
    output.push_str(&format!("  Blood glucose:  {}\n", show(&vitals.blood_glucose)));
    output.push_str(&format!("  Respirations:   {}\n", show(&vitals.respirations)));

    output
}
