use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use labref_core::{
    auto_convert_lab_value, calculate_risk_level, group_lab_tests, inspect_conversion, LabConfig,
    LabValue,
};
use labref_records::{
    accept_reviewed_labs, export_labs_csv, lab_trend, load_patient_str, review_extracted_labs,
    ExtractedLab, Patient,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "labref",
    about = "Classify, convert and export lab results against the reference catalog."
)]
struct Args {
    /// Minimum points before a trend is considered chartable.
    #[arg(long, global = true, default_value_t = 2)]
    trend_min_points: usize,

    /// Date format for CSV export columns.
    #[arg(long, global = true, default_value = "%-m/%-d/%Y")]
    date_format: String,

    /// Convert extracted lab values to the standard unit on intake.
    #[arg(long, global = true)]
    convert_on_intake: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one value against its reference range.
    Classify { test: String, value: String },
    /// Convert a value to the test's standard unit.
    Convert {
        test: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
        unit: String,
    },
    /// List catalog entries grouped by category.
    Catalog {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print the trend series of one test from a patient record.
    Trend {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        test: String,
    },
    /// Pivot a patient's lab results to CSV.
    Export {
        #[arg(short, long)]
        input: PathBuf,
        /// Write to this path instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Append extracted lab rows (a JSON array) to a patient record.
    Intake {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        labs: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Recompute stored risk levels of a patient record.
    Reclassify {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("labref=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = LabConfig {
        trend_min_points: args.trend_min_points,
        export_date_format: args.date_format,
        convert_on_intake: args.convert_on_intake,
    };

    match args.command {
        Command::Classify { test, value } => {
            let level = calculate_risk_level(&test, LabValue::Text(&value));
            println!("{test}: {value} -> {level}");
        }
        Command::Convert { test, value, unit } => {
            let converted = auto_convert_lab_value(&test, value, &unit);
            tracing::debug!(status = ?inspect_conversion(&test, &unit), "conversion");
            if converted.is_converted {
                println!("{test}: {value} {unit} -> {}", converted.converted_value);
            } else {
                println!("{test}: {value} {unit} (not converted)");
            }
        }
        Command::Catalog { query } => {
            for (category, tests) in group_lab_tests(&query) {
                println!("{category}");
                for test in tests {
                    println!(
                        "  {:<20} {:>8} - {:<8} {}",
                        test.name, test.normal_range.min, test.normal_range.max, test.standard_unit
                    );
                }
            }
        }
        Command::Trend { input, test } => {
            let patient = read_patient(&input)?;
            let trend = lab_trend(&patient, &test, &config);
            println!("{}", serde_json::to_string_pretty(&trend)?);
        }
        Command::Export { input, output } => {
            let patient = read_patient(&input)?;
            let export = export_labs_csv(&patient, &config)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &export.content)
                        .with_context(|| format!("Could not write {:?}", path))?;
                    tracing::info!(file = %path.display(), suggested = %export.file_name, "csv written");
                }
                None => println!("{}", export.content),
            }
        }
        Command::Intake {
            input,
            labs,
            output,
        } => {
            let mut patient = read_patient(&input)?;
            let data = std::fs::read_to_string(&labs)
                .with_context(|| format!("Could not read file {:?}", labs))?;
            let extracted: Vec<ExtractedLab> = serde_json::from_str(&data)
                .with_context(|| format!("Could not parse extracted labs in {:?}", labs))?;
            let added = accept_reviewed_labs(&mut patient, &review_extracted_labs(extracted), &config);
            tracing::info!(patient = %patient.id, added = added.len(), "extracted labs accepted");
            write_patient(&patient, output)?;
        }
        Command::Reclassify { input, output } => {
            let mut patient = read_patient(&input)?;
            let changed = patient.reclassify_labs();
            tracing::info!(patient = %patient.id, changed, "labs reclassified");
            write_patient(&patient, output)?;
        }
    }

    Ok(())
}

fn read_patient(path: &Path) -> anyhow::Result<Patient> {
    let data =
        std::fs::read_to_string(path).with_context(|| format!("Could not read file {:?}", path))?;
    Ok(load_patient_str(&data)?)
}

fn write_patient(patient: &Patient, output: Option<PathBuf>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(patient)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("Could not write {:?}", path))?
        }
        None => println!("{json}"),
    }
    Ok(())
}
