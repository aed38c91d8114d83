mod app;
mod state;
mod ui;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::DataStoryApp;
use data_story::ai;
use data_story::cli::{Cli, ReportFormat};
use data_story::config::Settings;
use data_story::data::loader::load_file;
use data_story::logging::init_logger;
use data_story::report::Report;
use state::AppState;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let outcome = Settings::load(cli.config.as_deref())
        .context("loading configuration")
        .and_then(|settings| match cli.report {
            Some(format) => print_report(&cli, &settings, format),
            None => run_viewer(&cli, settings),
        });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Headless mode: analyse the file and print the report.
fn print_report(cli: &Cli, settings: &Settings, format: ReportFormat) -> Result<()> {
    let path = cli.file.as_deref().context("a dataset file is required")?;
    let dataset = load_file(path, settings.loader.max_bytes())
        .with_context(|| format!("loading {}", path.display()))?;
    let mut report = Report::generate(&dataset, chrono::Local::now());
    if cli.ai {
        report.ai_summary = Some(ai::generate_summary(
            &dataset.column_names(),
            &dataset.head(ai::SAMPLE_ROWS),
            settings.ai.api_key.as_deref(),
            &settings.ai,
        ));
    }

    match format {
        ReportFormat::Markdown => println!("{}", report.to_markdown()),
        ReportFormat::Json => println!("{}", report.to_json().context("serialising report")?),
    }
    Ok(())
}

fn run_viewer(cli: &Cli, settings: Settings) -> Result<()> {
    let title = settings.app.title.clone();
    let mut state = AppState::new(settings);
    if let Some(path) = &cli.file {
        state.open(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(DataStoryApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
