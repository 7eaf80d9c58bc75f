//! Records command - inspect stored patient records.

use clap::{Args, Subcommand};
use console::style;

use intake_core::store::SqliteRecordStore;

use super::load_config;
use super::process::{format_record, OutputFormat};

/// Arguments for the records command.
#[derive(Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    command: RecordsCommand,
}

#[derive(Subcommand)]
enum RecordsCommand {
    /// List stored patients
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the stored record of a patient
    Show {
        /// Patient id
        id: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

pub fn run(args: RecordsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = SqliteRecordStore::open(&config.store.database_path)?;

    match args.command {
        RecordsCommand::List { json } => {
            let patients = store.list_patients()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&patients)?);
            } else if patients.is_empty() {
                println!(
                    "{} No records in {}",
                    style("ℹ").blue(),
                    config.store.database_path.display()
                );
            } else {
                println!("{:>6}  {:<30} {:<12} {}", "ID", "NAME", "DOB", "CREATED");
                for patient in &patients {
                    println!(
                        "{:>6}  {:<30} {:<12} {}",
                        patient.id, patient.name, patient.dob, patient.created_at
                    );
                }
            }
        }
        RecordsCommand::Show { id, format } => {
            let record = store.load_record(id)?;
            println!("{}", format_record(&record, format)?);
        }
    }

    Ok(())
}
