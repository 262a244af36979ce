//! `webjars-extract` entrypoint.
//!
//! Builds a search path from flags and configuration, then either extracts
//! the requested packages or lists what is available. Progress goes to
//! stderr; `list` output goes to stdout.

use std::io::Write;

use camino::Utf8Path;
use clap::Parser;
use webjars_extractor::{
    Cache, ExtractionRequest, ExtractionSummary, Extractor, ExtractorConfig, FileCache,
    MemoryCache, SearchPathLocator,
};
use webjars_extractor_cli::cli::{Cli, Command, ExtractArgs, ListArgs, SourceArgs};
use webjars_extractor_cli::error::{CliError, Result};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.log_level()).parse_default_env();
    if builder.try_init().is_err() {
        // A logger is already installed; keep it.
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Extract(args) => run_extract(args, cli.quiet, stderr),
        Command::List(args) => run_list(args, stdout),
    }
}

/// Loads the configuration file named on the command line, if any.
fn load_config(source: &SourceArgs) -> Result<ExtractorConfig> {
    source.config.as_deref().map_or_else(
        || Ok(ExtractorConfig::default()),
        |path| ExtractorConfig::load(path).map_err(CliError::from),
    )
}

/// Search roots from flags come first, followed by the configured ones.
fn build_locator(source: &SourceArgs, config: &ExtractorConfig) -> Result<SearchPathLocator> {
    let mut locator = SearchPathLocator::default();
    for value in &source.classpath {
        locator.extend_search_path(value);
    }
    for dir in &source.lib_dirs {
        locator.discover(dir)?;
    }
    config.extend_locator(&mut locator)?;
    if locator.roots().is_empty() {
        log::warn!("no search roots given; nothing will be found");
    }
    Ok(locator)
}

fn run_extract(args: &ExtractArgs, quiet: bool, stderr: &mut dyn Write) -> Result<()> {
    let config = load_config(&args.source)?;
    let locator = build_locator(&args.source, &config)?;

    let summary = match args.cache.as_ref().or(config.cache_file.as_ref()) {
        Some(path) => {
            let cache = FileCache::open(path.clone())?;
            if cache.recovered_from_corrupt_file() && !quiet {
                write_stderr_line(
                    stderr,
                    format!("Cache file {path} was unreadable; rebuilding it."),
                );
            }
            let extractor = config.configure(Extractor::with_cache(locator, cache));
            extract_and_save(extractor, args)?
        }
        None => {
            let extractor = config.configure(Extractor::with_cache(locator, MemoryCache::new()));
            extract_and_save(extractor, args)?
        }
    };

    if !quiet {
        write_stderr_line(stderr, summary_message(&summary, &args.dest));
    }
    Ok(())
}

/// Runs every requested scope, then persists the cache even when a request
/// failed so that files already written are remembered.
fn extract_and_save<C: Cache>(
    mut extractor: Extractor<SearchPathLocator, C>,
    args: &ExtractArgs,
) -> Result<ExtractionSummary> {
    let outcome = extract_requested(&mut extractor, args);
    extractor.cache().save()?;
    outcome
}

fn extract_requested<C: Cache>(
    extractor: &mut Extractor<SearchPathLocator, C>,
    args: &ExtractArgs,
) -> Result<ExtractionSummary> {
    let mut summary = ExtractionSummary::default();
    for request in requests_for(args) {
        summary.merge(extractor.extract(&request)?);
    }
    Ok(summary)
}

fn requests_for(args: &ExtractArgs) -> Vec<ExtractionRequest> {
    let mut requests: Vec<ExtractionRequest> = args
        .packages
        .iter()
        .map(|name| ExtractionRequest::package(name.as_str(), args.dest.clone()))
        .collect();
    if args.all {
        requests.push(ExtractionRequest::all(args.dest.clone()));
    }
    if args.node_modules {
        requests.push(ExtractionRequest::node_modules(args.dest.clone()));
    }
    if let Some(filter) = args.filter.as_deref() {
        requests = requests
            .into_iter()
            .map(|request| request.with_filter(filter))
            .collect();
    }
    requests
}

fn summary_message(summary: &ExtractionSummary, dest: &Utf8Path) -> String {
    format!(
        "Extracted {} file(s) to {dest} ({} already up to date).",
        summary.written().len(),
        summary.skipped().len()
    )
}

fn run_list(args: &ListArgs, stdout: &mut dyn Write) -> Result<()> {
    let config = load_config(&args.source)?;
    let locator = build_locator(&args.source, &config)?;
    let extractor = config.configure(Extractor::new(locator));

    for package in extractor.list_packages()? {
        writeln!(stdout, "{package}").map_err(|source| CliError::Output { source })?;
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
