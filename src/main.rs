use std::{error::Error, path::PathBuf};

use binconf::{load_parquet, BinaryConfusionMatrix, RowTable};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Computes a binary confusion matrix from a labeled, pre-aggregated table.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Parquet file, or JSON array of row objects
    path: PathBuf,
    /// Column holding the predicted label
    #[arg(long, default_value = "Predicted")]
    predicted: String,
    /// Column holding the actual label
    #[arg(long, default_value = "Actual")]
    actual: String,
    /// Label of the positive class
    #[arg(long)]
    positive: String,
    /// Print the metrics as JSON
    #[arg(long)]
    json: bool,
    /// Also write the loaded table to this path as JSON
    #[arg(long, value_name = "PATH")]
    save_table: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Parse the whole dataset and store it in memory
    let table = match args.path.extension().and_then(|ext| ext.to_str()) {
        Some("parquet") => load_parquet(&args.path)?,
        _ => RowTable::load_from_file(&mut std::fs::File::open(&args.path)?)?,
    };

    if let Some(out) = &args.save_table {
        table.save_to_file(&mut std::fs::File::create(out)?)?;
    }

    let matrix = BinaryConfusionMatrix::new(&table, &args.predicted, &args.actual, &args.positive)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matrix.report())?);
        return Ok(());
    }

    print!("{matrix}");
    println!("Accuracy: {}", matrix.accuracy());
    println!("Precision: {}", matrix.precision());
    println!("Recall: {}", matrix.recall());
    println!("F1 score: {}", matrix.f1_score());

    Ok(())
}
