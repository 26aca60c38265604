use anyhow::{Context, Result};
use clap::Parser;
use sleepscore::cli::{parse_input_line, Cli, Command, OutputFormat, PredictArgs};
use sleepscore::config::AppConfig;
use sleepscore::dataset;
use sleepscore::history::{load_history, HistoryRecorder, SessionHistory, SystemClock};
use sleepscore::model::{train, InputPolicy, SleepModel};
use sleepscore::output::{self, JsonModel, JsonSession, JsonSubmission};
use sleepscore::scoring::{ScoringService, Submission};
use std::io::BufRead;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Resolve configuration: file (or defaults) first, then command-line overrides
fn resolve_config(args: &Cli) -> Result<AppConfig> {
    let mut config =
        AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(dataset) = &args.dataset {
        config.dataset_path = dataset.clone();
    }
    if let Some(history) = &args.history {
        config.history_path = history.clone();
    }
    if args.clamp {
        config.input_policy = InputPolicy::Clamp;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Fit the model from the configured dataset
fn fit_model(config: &AppConfig) -> Result<SleepModel> {
    let rows =
        dataset::load_dataset(&config.dataset_path).context("Cannot start without a dataset")?;
    let model = train(&rows).context("Cannot start without a trained model")?;
    Ok(model)
}

/// Use an exported model when given, otherwise fit one
fn obtain_model(args: &Cli, config: &AppConfig) -> Result<SleepModel> {
    match &args.model {
        Some(path) => {
            let model = SleepModel::load_json(path).context("Failed to load exported model")?;
            tracing::info!(path = %path.display(), "using exported model");
            Ok(model)
        }
        None => fit_model(config),
    }
}

fn build_service(args: &Cli, config: &AppConfig) -> Result<ScoringService> {
    let model = obtain_model(args, config)?;
    Ok(ScoringService::new(
        model,
        HistoryRecorder::new(&config.history_path),
        config.input_policy,
    ))
}

fn report_warning(submission: &Submission) {
    if let Some(warning) = &submission.warning {
        eprintln!("Warning: prediction not saved to history: {}", warning);
    }
}

fn run_predict(service: &ScoringService, inputs: PredictArgs, format: OutputFormat) -> Result<()> {
    let input = service
        .input(inputs.duration, inputs.stress, inputs.caffeine, inputs.exercise)
        .context("Invalid input")?;

    let mut session = SessionHistory::new();
    let submission = service.submit(&mut session, &input, &SystemClock);
    report_warning(&submission);

    match format {
        OutputFormat::Text => {
            print!("{}", output::format_submission(&submission));
            println!();
            print!("{}", output::format_chart(&session.render_series()));
        }
        OutputFormat::Json => {
            println!("{}", output::to_json(&JsonSubmission::from(&submission)));
        }
    }
    Ok(())
}

/// Score one session line, reporting bad input on stderr
fn score_line(
    service: &ScoringService,
    session: &mut SessionHistory,
    line: &str,
    line_no: usize,
) -> Option<Submission> {
    let values = match parse_input_line(line) {
        Ok(values) => values,
        Err(e) => {
            eprintln!("line {}: {}", line_no, e);
            return None;
        }
    };
    let input = match service.input(values[0], values[1], values[2], values[3]) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("line {}: {}", line_no, e);
            return None;
        }
    };

    let submission = service.submit(session, &input, &SystemClock);
    report_warning(&submission);
    Some(submission)
}

/// One submission per stdin line until a blank line or EOF
///
/// Undecodable lines are skipped like any other bad input. A read error ends
/// the session, but the series collected so far is still printed.
fn run_session(service: &ScoringService, format: OutputFormat) -> Result<()> {
    let mut session = SessionHistory::new();
    let mut submissions = Vec::new();

    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let mut buf = Vec::new();
    let mut line_no = 0;

    let read_result = loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break Ok(()),
            Ok(_) => line_no += 1,
            Err(e) => break Err(e),
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                eprintln!("line {}: not valid UTF-8: {}", line_no, e);
                continue;
            }
        };
        if line.is_empty() {
            break Ok(());
        }

        if let Some(submission) = score_line(service, &mut session, line, line_no) {
            if format == OutputFormat::Text {
                print!("{}", output::format_submission(&submission));
                println!();
            }
            submissions.push(submission);
        }
    };

    let series = session.render_series();
    match format {
        OutputFormat::Text => {
            if series.is_empty() {
                println!("No predictions this session");
            } else {
                print!("{}", output::format_chart(&series));
            }
        }
        OutputFormat::Json => {
            println!("{}", output::to_json(&JsonSession::new(&submissions, &series)));
        }
    }
    read_result.context("Failed to read input")
}

fn run_train(config: &AppConfig, output_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let model = fit_model(config)?;

    if let Some(path) = output_path {
        model
            .save_json(path)
            .with_context(|| format!("Failed to export model to {}", path.display()))?;
    }

    match format {
        OutputFormat::Text => {
            print!("{}", output::format_model(&model));
            if let Some(path) = output_path {
                println!("Model written to {}", path.display());
            }
        }
        OutputFormat::Json => println!("{}", output::to_json(&JsonModel::from(&model))),
    }
    Ok(())
}

fn run_history(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let records = load_history(&config.history_path).context("Failed to read history")?;
    match format {
        OutputFormat::Text => print!("{}", output::format_history(&records)),
        OutputFormat::Json => println!("{}", output::to_json(&records)),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = resolve_config(&args)?;
    tracing::debug!(?config, "resolved configuration");

    match &args.command {
        Command::Predict(inputs) => {
            let service = build_service(&args, &config)?;
            run_predict(&service, *inputs, args.format)
        }
        Command::Session => {
            let service = build_service(&args, &config)?;
            run_session(&service, args.format)
        }
        Command::Train { output } => run_train(&config, output.as_deref(), args.format),
        Command::History => run_history(&config, args.format),
    }
}
