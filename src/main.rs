// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use humanizer::app_config::{self, Config, FeedbackMode};
use humanizer::app_controller::{Controller, HumanizeRequest, ReviewAction, RunMode};
use humanizer::transforms::Preset;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite a document to read less like machine text (default command)
    Humanize(HumanizeArgs),

    /// Track reviewer recommendations for a document
    Review(ReviewArgs),

    /// Generate shell completions for humanizer
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct HumanizeArgs {
    /// Input text or Markdown file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    options: HumanizeOptions,
}

#[derive(Args, Debug, Clone)]
struct HumanizeOptions {
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of iterations
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Starting intensity between 0 and 1
    #[arg(short, long, visible_alias = "intensity")]
    noise: Option<f64>,

    /// Stop once the score falls below this value
    #[arg(short, long)]
    target: Option<f64>,

    /// Stop when the score changes less than this between iterations
    #[arg(long)]
    threshold: Option<f64>,

    /// Use the detector score as feedback
    #[arg(long)]
    detector: bool,

    /// Apply every transform with the wider aggressive intensity schedule
    #[arg(long)]
    aggressive: bool,

    /// Seed of the random generator
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSON report of every iteration to this file
    #[arg(long, value_name = "PATH")]
    history: Option<PathBuf>,

    /// Only log warnings and errors, hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Print the metrics of the input and exit
    #[arg(long, conflicts_with = "detect_only")]
    metrics_only: bool,

    /// Print the detector verdict of the input and exit
    #[arg(long)]
    detect_only: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "humanizer.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct ReviewArgs {
    /// Document under review
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,

    /// Create or refresh the document context
    #[arg(long)]
    init: bool,

    /// Purpose of the document (with --init)
    #[arg(long, requires = "init")]
    purpose: Option<String>,

    /// Target audience (with --init)
    #[arg(long, requires = "init")]
    audience: Option<String>,

    /// Add a constraint (with --init, repeatable)
    #[arg(long = "add-constraint", requires = "init")]
    constraints: Vec<String>,

    /// Add something that must not change (with --init, repeatable)
    #[arg(long = "add-non-negotiable", requires = "init")]
    non_negotiables: Vec<String>,

    /// Print recommendation counts
    #[arg(long)]
    status: bool,

    /// Merge recommendations from a JSON array (inline or @file)
    #[arg(long, value_name = "JSON")]
    import: Option<String>,

    /// Apply evaluation results (inline JSON or @file)
    #[arg(long, value_name = "JSON")]
    apply_evaluation: Option<String>,

    /// List recommendations approved for application
    #[arg(long)]
    list_approved: bool,

    /// List recommendations needing human judgment
    #[arg(long)]
    list_uncertain: bool,

    /// Mark a recommendation as applied
    #[arg(long, value_name = "ID")]
    mark_applied: Option<String>,

    /// Mark a recommendation as failed
    #[arg(long, value_name = "ID")]
    mark_failed: Option<String>,

    /// Notes for --mark-applied and --mark-failed
    #[arg(long)]
    notes: Option<String>,

    /// Read answers from the pending questions file
    #[arg(long)]
    collect_answers: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "humanizer.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl ReviewArgs {
    fn action(&self) -> ReviewAction {
        if self.init {
            ReviewAction::Init {
                purpose: self.purpose.clone(),
                audience: self.audience.clone(),
                constraints: self.constraints.clone(),
                non_negotiables: self.non_negotiables.clone(),
            }
        } else if let Some(payload) = &self.import {
            ReviewAction::Import(payload.clone())
        } else if let Some(payload) = &self.apply_evaluation {
            ReviewAction::ApplyEvaluation(payload.clone())
        } else if self.list_approved {
            ReviewAction::ListApproved
        } else if self.list_uncertain {
            ReviewAction::ListUncertain
        } else if let Some(id) = &self.mark_applied {
            ReviewAction::MarkApplied {
                id: id.clone(),
                notes: self.notes.clone(),
            }
        } else if let Some(id) = &self.mark_failed {
            ReviewAction::MarkFailed {
                id: id.clone(),
                notes: self.notes.clone(),
            }
        } else if self.collect_answers && !self.status {
            ReviewAction::CollectAnswers
        } else {
            ReviewAction::Status
        }
    }
}

/// humanizer - iterative rewriting of machine-sounding prose
///
/// Applies probabilistic rewrites to a document and re-scores it until the
/// score stops improving, reaches a target, or the iteration budget runs out.
#[derive(Parser, Debug)]
#[command(name = "humanizer")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Iterative text humanization with score feedback")]
#[command(long_about = "humanizer rewrites a document in rounds of probabilistic transforms and \
re-scores it after each round, using a lexical heuristic or an AI-text detector as feedback.

EXAMPLES:
    humanizer paper.md -o paper.human.md        # Heuristic feedback, default settings
    humanizer paper.md --detector -t 0.3        # Detector feedback with a 30% target
    humanizer paper.md --aggressive --seed 42   # Every transform, reproducible run
    humanizer paper.md --metrics-only           # Print the lexical metrics
    humanizer paper.md --detect-only            # Print the detector verdict
    humanizer review paper.md --status          # Review recommendation counts
    humanizer completions bash > humanizer.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in humanizer.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input text or Markdown file
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    #[command(flatten)]
    options: HumanizeOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Filtering is left to log::max_level so it can be changed later
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    let outcome = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "humanizer", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Humanize(args)) => run_humanize(args).await,
        Some(Commands::Review(args)) => run_review(args),
        None => match cli.input {
            // Default behavior - top-level args run the humanize command
            Some(input) => {
                run_humanize(HumanizeArgs {
                    input,
                    options: cli.options,
                })
                .await
            }
            None => {
                let _ = CommandLineOptions::command().print_help();
                std::process::exit(2);
            }
        },
    };

    if let Err(e) = outcome {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn apply_log_level(config: &Config, cli_level: Option<&CliLogLevel>, quiet: bool) {
    let level = match cli_level {
        Some(level) => app_config::LogLevel::from(level.clone()).to_level_filter(),
        None if quiet => LevelFilter::Warn,
        None => config.log_level.to_level_filter(),
    };
    log::set_max_level(level);
}

fn load_config(config_path: &str, create_missing: bool) -> Result<Config> {
    if create_missing {
        Config::load_or_create(Path::new(config_path))
    } else {
        Config::load_or_default(Path::new(config_path))
    }
}

async fn run_humanize(args: HumanizeArgs) -> Result<()> {
    let options = args.options;

    if !args.input.is_file() {
        eprintln!("Error: File not found: {}", args.input.display());
        std::process::exit(1);
    }

    let mode = if options.metrics_only {
        RunMode::MetricsOnly
    } else if options.detect_only {
        RunMode::DetectOnly
    } else {
        RunMode::Humanize
    };

    let mut config = load_config(&options.config_path, !mode.is_read_only())?;

    // Override config with CLI options if provided
    let humanize = &mut config.humanize;
    if let Some(iterations) = options.iterations {
        humanize.max_iterations = iterations;
    }
    if options.detector {
        humanize.feedback = FeedbackMode::Detector;
    }
    if let Some(noise) = options.noise {
        humanize.noise = Some(noise);
    }
    if let Some(target) = options.target {
        humanize.target = Some(target);
    }
    if let Some(threshold) = options.threshold {
        humanize.convergence_threshold = threshold;
    }
    if options.aggressive {
        humanize.preset = Preset::Aggressive;
        humanize.transforms.clear();
    }
    if options.seed.is_some() {
        humanize.seed = options.seed;
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }

    apply_log_level(&config, options.log_level.as_ref(), options.quiet);

    let controller = Controller::with_config(config)?;
    controller
        .run(&HumanizeRequest {
            input: args.input,
            output: options.output,
            history: options.history,
            quiet: options.quiet,
            mode,
        })
        .await
}

fn run_review(args: ReviewArgs) -> Result<()> {
    if !args.document.is_file() {
        eprintln!("Error: Document not found: {}", args.document.display());
        std::process::exit(1);
    }

    let config = load_config(&args.config_path, true)?;
    apply_log_level(&config, args.log_level.as_ref(), false);

    let controller = Controller::with_config(config)?;
    controller.run_review(&args.document, args.action())
}
