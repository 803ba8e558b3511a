use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, Command};
use tabular_profile::execution::{ExecutionEngine, ExecutionOptions, LogExecutionObserver};
use tabular_profile::ingestion::{IngestionFormat, IngestionOptions, LogObserver};
use tabular_profile::processing::CleanOptions;
use tabular_profile::{IngestionResult, SummaryOptions, SummaryReport, Upload};

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let matches = Command::new("tabprof")
        .about("Profile CSV, TSV, JSON and JSON-Lines files")
        .arg(
            Arg::new("path")
                .required(true)
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("content-type")
                .long("content-type")
                .help("Declared content type, e.g. text/csv"),
        )
        .arg(Arg::new("format").long("format").help("Force a format: csv, tsv, json or jsonl"))
        .arg(
            Arg::new("preview")
                .long("preview")
                .help("Number of preview rows")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("clean")
                .long("clean")
                .help("Trim strings and drop blank rows before profiling")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print the JSON output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let format = match matches.get_one::<String>("format") {
        Some(name) => match IngestionFormat::from_extension(name) {
            Some(f) => Some(f),
            None => bail!("unknown format {name:?}; expected csv, tsv, json or jsonl"),
        },
        None => None,
    };

    let mut options = SummaryOptions {
        ingestion: IngestionOptions {
            format,
            observer: Some(Arc::new(LogObserver)),
            ..Default::default()
        },
        clean: matches.get_flag("clean").then(CleanOptions::default),
        ..Default::default()
    };
    if let Some(n) = matches.get_one::<usize>("preview") {
        options.preview_rows = *n;
    }

    let content_type = matches.get_one::<String>("content-type");
    let mut uploads = Vec::new();
    for path in matches.get_many::<PathBuf>("path").into_iter().flatten() {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut upload = Upload::new(bytes, filename);
        if let Some(ct) = content_type {
            upload = upload.with_content_type(ct.as_str());
        }
        uploads.push(upload);
    }

    let results = if uploads.len() == 1 {
        vec![uploads[0].run(&options)]
    } else {
        let engine = ExecutionEngine::new(ExecutionOptions::default())
            .context("building worker pool")?
            .with_observer(Arc::new(LogExecutionObserver));
        engine.summarize_batch(&uploads, &options)
    };

    let pretty = matches.get_flag("pretty");
    let mut failed = false;
    for result in &results {
        failed |= result.is_err();
        println!("{}", render(result, pretty)?);
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn render(result: &IngestionResult<SummaryReport>, pretty: bool) -> anyhow::Result<String> {
    let out = match (result, pretty) {
        (Ok(report), true) => serde_json::to_string_pretty(report)?,
        (Ok(report), false) => serde_json::to_string(report)?,
        (Err(e), true) => serde_json::to_string_pretty(&e.to_report())?,
        (Err(e), false) => serde_json::to_string(&e.to_report())?,
    };
    Ok(out)
}
