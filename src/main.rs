/*!
 * Freightyard CLI - Command Line Interface
 *
 * Resolves which Freight origin provides a commit, image, or chart for a
 * promotion, using a Warehouse catalog and a promotion document.
 */

use clap::{Parser, Subcommand, ValueEnum};
use freightyard::{
    config::{CliConfig, LogLevel, OutputFormat},
    directory::CatalogDirectory,
    error::{FreightyardError, Result, EXIT_ABSENT, EXIT_SUCCESS},
    logging,
    output::{AmbiguityReport, ArtifactRef, OutputWriter, ResolutionReport},
    resolve::{
        match_chart, match_commit, match_freight, match_image, ArtifactSelector, Resolver,
    },
    Origin, PromotionDocument,
};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[derive(Parser)]
#[command(name = "freightyard")]
#[command(
    version,
    about = "Resolve which Freight origin supplies an artifact for a promotion",
    long_about = None
)]
struct Cli {
    /// Configuration file (defaults to <config dir>/freightyard/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project (namespace) to look Warehouses up in
    #[arg(short = 'p', long, global = true)]
    project: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, global = true)]
    output: Option<OutputArg>,

    /// Log level
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Log file path (JSON lines)
    #[arg(long, global = true, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find an artifact in the promotion's Freight
    #[command(subcommand)]
    Resolve(ResolveCommands),

    /// Fail if two requested origins subscribe to the same image repository
    CheckAmbiguity {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ResolveCommands {
    /// Find a Git commit
    Commit {
        #[command(flatten)]
        target: Target,
    },

    /// Find a container image
    Image {
        #[command(flatten)]
        target: Target,
    },

    /// Find a Helm chart
    Chart {
        #[command(flatten)]
        target: Target,

        /// Chart name (empty matches any chart from the repository)
        #[arg(long, default_value = "")]
        chart: String,
    },
}

#[derive(clap::Args)]
struct Inputs {
    /// Warehouse catalog (JSON or TOML)
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,

    /// Promotion document with requirements and Freight (JSON or TOML)
    #[arg(long, value_name = "FILE")]
    promotion: PathBuf,
}

#[derive(clap::Args)]
struct Target {
    #[command(flatten)]
    inputs: Inputs,

    /// Repository URL of the artifact
    #[arg(long = "repo", value_name = "URL")]
    repo_url: String,

    /// Explicit origin Warehouse (skips disambiguation)
    #[arg(long, value_name = "WAREHOUSE")]
    origin: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputArg {
    Text,
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Text => OutputFormat::Text,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let format = cli.output.map(OutputFormat::from).unwrap_or_default();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            OutputWriter::new(format).error(&e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    if let Commands::Completions { shell } = cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "freightyard", &mut std::io::stdout());
        return Ok(EXIT_SUCCESS);
    }

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if let Some(output) = cli.output {
        config.output = output.into();
    }
    if cli.log.is_some() {
        config.log_file = cli.log.clone();
    }
    config.verbose |= cli.verbose;
    logging::init_logging(&config)?;

    let out = OutputWriter::new(config.output);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    match cli.command {
        Commands::Resolve(cmd) => runtime.block_on(handle_resolve(cmd, cli.project, &config, &out)),
        Commands::CheckAmbiguity { inputs } => {
            runtime.block_on(handle_check_ambiguity(inputs, cli.project, &config, &out))
        }
        Commands::Completions { .. } => Ok(EXIT_SUCCESS),
    }
}

/// Documents and directory shared by every command
struct Session {
    project: String,
    promotion: PromotionDocument,
    directory: CatalogDirectory,
}

impl Session {
    fn open(inputs: &Inputs, explicit_project: Option<&str>, config: &CliConfig) -> Result<Self> {
        let promotion = PromotionDocument::load(&inputs.promotion)?;
        let project = resolve_project(config, explicit_project, &promotion)?;
        let directory = CatalogDirectory::load(&inputs.catalog, &project)?;
        debug!(
            project = %project,
            requirements = promotion.requirements.len(),
            freight = promotion.freight.len(),
            "opened promotion"
        );
        Ok(Self {
            project,
            promotion,
            directory,
        })
    }

    fn resolver(&self) -> Resolver<'_, CatalogDirectory> {
        Resolver::new(&self.directory, &self.project, &self.promotion.requirements)
    }
}

/// Project precedence: flag, environment, config file, promotion document
fn resolve_project(
    config: &CliConfig,
    explicit: Option<&str>,
    promotion: &PromotionDocument,
) -> Result<String> {
    config.resolve_project(explicit).or_else(|err| {
        promotion
            .project
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .ok_or(err)
    })
}

/// Accepts `name` or `Warehouse/name`
fn parse_origin(value: &str) -> Origin {
    Origin::warehouse(value.strip_prefix("Warehouse/").unwrap_or(value))
}

async fn with_deadline<T, F>(timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, freightyard::ResolveError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(FreightyardError::Timeout(timeout)),
    }
}

async fn handle_resolve(
    cmd: ResolveCommands,
    explicit_project: Option<String>,
    config: &CliConfig,
    out: &OutputWriter,
) -> Result<i32> {
    let (target, selector, operation) = match &cmd {
        ResolveCommands::Commit { target } => (
            target,
            ArtifactSelector::commit(target.repo_url.as_str()),
            "resolve-commit",
        ),
        ResolveCommands::Image { target } => (
            target,
            ArtifactSelector::image(target.repo_url.as_str()),
            "resolve-image",
        ),
        ResolveCommands::Chart { target, chart } => (
            target,
            ArtifactSelector::chart(target.repo_url.as_str(), chart.as_str()),
            "resolve-chart",
        ),
    };

    let session = Session::open(&target.inputs, explicit_project.as_deref(), config)?;
    out.info(&format!(
        "Resolving {} in project {} against {} Warehouses",
        selector,
        session.project,
        session.directory.len()
    ));
    let desired = target.origin.as_deref().map(parse_origin);
    let resolver = session.resolver();

    let origin = with_deadline(
        config.lookup_timeout(),
        resolver.resolve_origin(desired.as_ref(), &selector),
    )
    .await?;

    let freight = session.promotion.freight.as_slice();
    let artifact = origin.as_ref().and_then(|origin| match &selector {
        ArtifactSelector::Commit { .. } => {
            match_commit(origin, freight, &selector).map(ArtifactRef::Commit)
        }
        ArtifactSelector::Image { .. } => {
            match_image(origin, freight, &selector).map(ArtifactRef::Image)
        }
        ArtifactSelector::Chart { .. } => {
            match_chart(origin, freight, &selector).map(ArtifactRef::Chart)
        }
    });

    let mut report = ResolutionReport::new(
        operation,
        &session.project,
        &target.repo_url,
        origin.as_ref(),
        artifact,
    );
    if let ResolveCommands::Chart { chart, .. } = &cmd {
        report = report.with_chart(chart);
    }
    if let Some(source) = origin
        .as_ref()
        .filter(|_| report.found)
        .and_then(|origin| match_freight(origin, freight, &selector))
    {
        report = report.with_freight(source);
    }
    out.resolution(&report);

    Ok(if report.found { EXIT_SUCCESS } else { EXIT_ABSENT })
}

async fn handle_check_ambiguity(
    inputs: Inputs,
    explicit_project: Option<String>,
    config: &CliConfig,
    out: &OutputWriter,
) -> Result<i32> {
    let session = Session::open(&inputs, explicit_project.as_deref(), config)?;
    let resolver = session.resolver();

    let ambiguity = with_deadline(
        config.lookup_timeout(),
        resolver.check_ambiguous_image_requests(),
    )
    .await?;

    out.ambiguity(&AmbiguityReport::new(&session.project, ambiguity.as_ref()));
    Ok(match ambiguity {
        Some(ambiguity) => freightyard::ResolveError::from(ambiguity).exit_code(),
        None => EXIT_SUCCESS,
    })
}
