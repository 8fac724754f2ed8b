//! PharmaGuard — pharmacogenomic risk analysis from the terminal.
//! Entry point for the `pharmaguard` binary.

mod render;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pharmaguard_client::{AnalysisService, HttpAnalysisService};
use pharmaguard_common::CandidateFile;
use pharmaguard_config::Config;
use pharmaguard_workflow::{
    export, AnalysisOrchestrator, ExportFormat, InputCollector, ResultSet, ResultsView,
    UploadCandidate, WorkflowError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pharmaguard")]
#[command(version)]
#[command(about = "Pharmacogenomic risk analysis for a patient VCF against selected drugs")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (TOML or YAML); defaults to $PHARMAGUARD_CONFIG or ./pharmaguard.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config and $PHARMAGUARD_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a VCF and analyze it for one or more drugs
    Analyze(AnalyzeArgs),
    /// List the supported drugs
    Drugs,
    /// Check that the analysis backend is reachable
    Health,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Patient VCF file (.vcf, at most 5 MB)
    #[arg(long)]
    vcf: PathBuf,

    /// Drug to analyze; repeat or comma-separate for several
    #[arg(short, long = "drug", required = true, num_args = 1.., value_delimiter = ',')]
    drugs: Vec<String>,

    /// Export the results after a successful analysis
    #[arg(long, value_enum)]
    export: Option<ExportArg>,

    /// Directory for exported files
    #[arg(long)]
    out: Option<PathBuf>,

    /// Show the raw JSON results
    #[arg(long)]
    json: bool,

    /// Expand the details of result N (1-based)
    #[arg(long, conflicts_with = "expand_all")]
    expand: Option<usize>,

    /// Expand the details of every result
    #[arg(long)]
    expand_all: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportArg {
    Json,
    Pdf,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Json => ExportFormat::Json,
            ExportArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let (mut config, config_error) = match load_config(&cli) {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Logs go to stderr so stdout stays clean for the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config_error {
        warn!("Could not load configuration, using defaults: {e:#}");
    }
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    info!(version = env!("CARGO_PKG_VERSION"), backend = %config.api.base_url, "PharmaGuard starting");

    match cli.command {
        Command::Drugs => {
            println!("{}", style("Supported drugs").bold());
            print!("{}", render::drug_list());
            Ok(ExitCode::SUCCESS)
        }
        Command::Health => health(&config).await,
        Command::Analyze(args) => analyze(&config, args).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            Ok(config)
        }
        None => Ok(Config::load()?),
    }
}

async fn health(config: &Config) -> anyhow::Result<ExitCode> {
    let service = HttpAnalysisService::new(&config.api).context("Failed to build HTTP client")?;
    let (healthy, line) = check_backend(&service).await;
    println!("{line}");
    Ok(if healthy { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Whether the backend is healthy, plus the line to show for it.
async fn check_backend(service: &dyn AnalysisService) -> (bool, String) {
    let url = service.base_url();
    match service.health_check().await {
        Ok(true) => (true, format!("{} backend reachable at {url}", style("✓").green())),
        Ok(false) => (
            false,
            format!("{} backend at {url} answered but is not healthy", style("!").yellow()),
        ),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (false, format!("{} backend unreachable at {url}", style("✗").red()))
        }
    }
}

/// Stage the file and drugs the same way the interactive form does.
fn collect_input(args: &AnalyzeArgs) -> anyhow::Result<UploadCandidate> {
    let mut input = InputCollector::new();
    let file = CandidateFile::from_path(&args.vcf)
        .with_context(|| format!("Cannot read {}", args.vcf.display()))?;
    input.select_file(file)?;
    for code in &args.drugs {
        input.add_drug(code)?;
    }
    Ok(input.submit()?)
}

async fn analyze(config: &Config, args: AnalyzeArgs) -> anyhow::Result<ExitCode> {
    let candidate = match collect_input(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {e:#}", style("✗").red());
            return Ok(ExitCode::FAILURE);
        }
    };

    let service: Arc<dyn AnalysisService> =
        Arc::new(HttpAnalysisService::new(&config.api).context("Failed to build HTTP client")?);
    let mut orchestrator = AnalysisOrchestrator::new(service.clone(), config.progress.clone());

    let results = match run_with_spinner(&mut orchestrator, candidate).await {
        Ok(results) => results,
        Err(WorkflowError::Request(e)) => {
            eprintln!("{} {}", style("Analysis failed:").red().bold(), e.message());
            eprintln!("{}", style("Fix the input or start the backend, then run the command again.").dim());
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    match ResultsView::from_results(results.clone()) {
        ResultsView::Empty => println!("{}", style("The backend returned no results.").yellow()),
        ResultsView::Report(mut view) => {
            if let Some(n) = args.expand {
                if n == 0 || !view.toggle_expanded(n - 1) {
                    warn!(index = n, total = view.results().len(), "No such result to expand");
                }
            }
            if args.json {
                view.toggle_json();
            }
            print!("{}", render::report(&view, args.expand_all));
        }
    }

    if let Some(format) = args.export {
        let out_dir = args.out.as_deref().unwrap_or(config.export.output_dir.as_path());
        export_results(config, service.as_ref(), &results, format.into(), out_dir).await;
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_with_spinner(
    orchestrator: &mut AnalysisOrchestrator,
    candidate: UploadCandidate,
) -> Result<ResultSet, WorkflowError> {
    let mut progress = orchestrator.progress();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(render::progress_message(&progress.borrow()));

    let submit = orchestrator.submit(candidate);
    tokio::pin!(submit);
    let outcome = loop {
        tokio::select! {
            outcome = &mut submit => break outcome,
            changed = progress.changed() => match changed {
                Ok(()) => spinner.set_message(render::progress_message(&progress.borrow_and_update())),
                Err(_) => break (&mut submit).await,
            },
        }
    };

    spinner.finish_and_clear();
    outcome
}

/// Export failures are reported and logged but never fail the run.
async fn export_results(
    config: &Config,
    service: &dyn AnalysisService,
    results: &ResultSet,
    format: ExportFormat,
    out_dir: &std::path::Path,
) {
    let file_name = match format {
        ExportFormat::Json => &config.export.json_file_name,
        ExportFormat::Pdf => &config.export.pdf_file_name,
    };

    let written = match export(format, service, results).await {
        Ok(artifact) => artifact.with_file_name(file_name.as_str()).write_to(out_dir).await,
        Err(e) => Err(e),
    };

    match written {
        Ok(path) => println!("{} exported {}", style("✓").green(), path.display()),
        Err(e) => {
            warn!(format = format.as_str(), error = %e, "Export failed");
            eprintln!("{} {}", style("!").yellow(), e.user_message());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmaguard_common::Drug;
    use pharmaguard_client::ServiceError;
    use pharmaguard_test_utils::{fixtures, ScriptedService};
    use pretty_assertions::assert_eq;

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Analyze(args) => args,
            other => panic!("expected analyze, got {other:?}"),
        }
    }

    fn vcf_on_disk(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("patient.vcf");
        std::fs::write(&path, fixtures::SAMPLE_VCF).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_drug_named_twice_stays_selected() {
        let dir = tempfile::tempdir().unwrap();
        let vcf = vcf_on_disk(&dir);

        let args = analyze_args(&[
            "pharmaguard", "analyze", "--vcf", &vcf, "--drug", "WARFARIN,CLOPIDOGREL,warfarin",
        ]);
        let candidate = collect_input(&args).unwrap();
        assert_eq!(candidate.drugs(), &[Drug::Warfarin, Drug::Clopidogrel]);

        let args = analyze_args(&[
            "pharmaguard", "analyze", "--vcf", &vcf, "-d", "codeine", "-d", "CODEINE",
        ]);
        assert_eq!(collect_input(&args).unwrap().drugs(), &[Drug::Codeine]);
    }

    #[test]
    fn test_unsupported_drug_argument_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let vcf = vcf_on_disk(&dir);
        let args = analyze_args(&["pharmaguard", "analyze", "--vcf", &vcf, "--drug", "ASPIRIN"]);
        let err = collect_input(&args).unwrap_err();
        assert!(err.to_string().starts_with("Supported drugs: CODEINE"));
    }

    #[tokio::test]
    async fn test_check_backend_outcomes() {
        let service = ScriptedService::new()
            .with_base_url("http://lab:8000")
            .with_health(Ok(true))
            .with_health(Ok(false))
            .with_health(Err(ServiceError::Network("connection refused".to_string())));

        let (ok, line) = check_backend(&service).await;
        assert!(ok);
        assert_eq!(console::strip_ansi_codes(&line), "✓ backend reachable at http://lab:8000");

        let (ok, line) = check_backend(&service).await;
        assert!(!ok);
        assert!(line.contains("not healthy"));

        let (ok, line) = check_backend(&service).await;
        assert!(!ok);
        assert_eq!(console::strip_ansi_codes(&line), "✗ backend unreachable at http://lab:8000");
    }
}
