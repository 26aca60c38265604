//! CLI argument parsing for sleepscore

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sleepscore")]
#[command(version)]
#[command(about = "Predict sleep quality from lifestyle inputs with a linear regression model", long_about = None)]
pub struct Cli {
    /// Configuration file (default: sleepscore.toml if present)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Training dataset CSV (overrides config)
    #[arg(long = "dataset", value_name = "FILE", global = true)]
    pub dataset: Option<PathBuf>,

    /// History CSV that predictions are appended to (overrides config)
    #[arg(long = "history", value_name = "FILE", global = true)]
    pub history: Option<PathBuf>,

    /// Use a model exported with `train --output` instead of fitting the dataset
    #[arg(long = "model", value_name = "FILE", global = true)]
    pub model: Option<PathBuf>,

    /// Clamp out-of-range inputs instead of rejecting them
    #[arg(long = "clamp", global = true)]
    pub clamp: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable debug tracing on stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a single set of inputs and record it
    Predict(PredictArgs),

    /// Score one submission per stdin line ("duration stress caffeine exercise"),
    /// then chart the session
    Session,

    /// Fit the model and print its coefficients
    Train {
        /// Write the fitted model as JSON
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the persisted prediction history
    History,
}

/// The four lifestyle inputs
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PredictArgs {
    /// Sleep duration in hours (4-10)
    #[arg(short = 'd', long = "duration", default_value = "7", allow_negative_numbers = true)]
    pub duration: i64,

    /// Stress level (1-10)
    #[arg(short = 's', long = "stress", default_value = "5", allow_negative_numbers = true)]
    pub stress: i64,

    /// Caffeine units per day (0-5)
    #[arg(short = 'c', long = "caffeine", default_value = "2", allow_negative_numbers = true)]
    pub caffeine: i64,

    /// Exercise sessions per week (0-7)
    #[arg(short = 'e', long = "exercise", default_value = "3", allow_negative_numbers = true)]
    pub exercise: i64,
}

/// Parse one `session` line: four integers separated by whitespace or commas
pub fn parse_input_line(line: &str) -> Result<[i64; 4], String> {
    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();

    if fields.len() != 4 {
        return Err(format!(
            "expected 4 values (duration stress caffeine exercise), got {}",
            fields.len()
        ));
    }

    let mut values = [0i64; 4];
    for (slot, field) in values.iter_mut().zip(fields.iter()) {
        *slot = field
            .parse()
            .map_err(|_| format!("'{}' is not an integer", field))?;
    }
    Ok(values)
}
