use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lead_scout::config::Config;
use lead_scout::pipeline::{RescoreError, ScoredProspect, Selection, SortKey};
use lead_scout::scoring::OpportunityTag;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_OUTPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// List prospects ranked by score (default if no subcommand)
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show the full scoring breakdown of a prospect by its index number
    Show {
        /// Index number of the prospect (1-based, as shown in list)
        index: usize,
    },
    /// Open a prospect's website in the browser by its index number
    Open {
        /// Index number of the prospect (1-based, as shown in list)
        index: usize,
    },
    /// Re-score every input prospect and write the results as JSON
    Rescore {
        /// Output file for the scored prospects
        #[arg(short, long)]
        output: PathBuf,

        /// Records per parallel scoring batch
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "lead-scout")]
#[command(about = "Rank business prospects by high-ticket, opportunity and lead-gen scores", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/lead-scout/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Prospect export path or glob pattern (repeatable; overrides config inputs)
    #[arg(short, long = "input", global = true)]
    inputs: Vec<String>,

    /// Score used for ranking
    #[arg(short, long, global = true, value_enum)]
    sort: Option<SortKey>,

    /// Only keep prospects carrying this tag (repeatable)
    #[arg(short, long = "tag", global = true)]
    tags: Vec<String>,

    /// Maximum number of prospects
    #[arg(short, long, global = true)]
    limit: Option<usize>,

    /// Minimum score on the sort key
    #[arg(long, global = true)]
    min_score: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "lead_scout=debug"
    } else {
        "lead_scout=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Command-line flags take precedence over the config file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.inputs.is_empty() {
        config.inputs = cli.inputs.clone();
    }
    if cli.sort.is_some() {
        config.sort_by = cli.sort;
    }
    if !cli.tags.is_empty() {
        config.tags = Some(cli.tags.clone());
    }
    if cli.limit.is_some() {
        config.limit = cli.limit;
    }
    if cli.min_score.is_some() {
        config.min_score = cli.min_score;
    }
}

fn build_selection(config: &Config) -> Selection {
    Selection {
        sort_by: config.sort_by.unwrap_or_default(),
        min_score: config.min_score,
        tags: config
            .tags
            .iter()
            .flatten()
            .filter_map(|t| t.parse::<OpportunityTag>().ok())
            .collect(),
        limit: config.limit,
    }
}

/// Resolve a 1-based index from the list, exiting on out-of-range values
fn pick(selected: &[ScoredProspect], index: usize) -> &ScoredProspect {
    match lead_scout::pipeline::pick(selected, index) {
        Ok(scored) => scored,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.clone().unwrap_or(Commands::List {
        format: OutputFormat::Table,
    });
    let start_time = Instant::now();
    let config_path = cli.config.clone().map(PathBuf::from);

    if let Commands::Init = command {
        if let Err(e) = lead_scout::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let mut config = match lead_scout::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    apply_overrides(&mut config, &cli);
    if let Commands::Rescore {
        batch_size: Some(size),
        ..
    } = command
    {
        config.batch_size = Some(size);
    }

    // Validate config at startup
    if let Err(errors) = lead_scout::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    info!("Using {} input pattern(s)", config.inputs.len());

    if let Commands::Rescore { ref output, .. } = command {
        match lead_scout::pipeline::rescore(&config.inputs, output, config.effective_batch_size())
            .await
        {
            Ok(summary) => {
                println!(
                    "Scored {} prospects ({} duplicates merged, {} skipped) -> {}",
                    summary.scored,
                    summary.duplicates,
                    summary.skipped,
                    output.display()
                );
                info!("Rescore finished in {:?}", start_time.elapsed());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(RescoreError::Input(e)) => {
                eprintln!("Input error: {:#}", e);
                std::process::exit(EXIT_INPUT);
            }
            Err(RescoreError::Output(e)) => {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_OUTPUT);
            }
        }
    }

    let run = match lead_scout::pipeline::load_and_score(
        &config.inputs,
        config.effective_batch_size(),
    )
    .await
    {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    if run.skipped() > 0 {
        warn!("{} records could not be scored and were skipped", run.skipped());
    }

    let total = run.scored.len();
    let selection = build_selection(&config);
    let selected = lead_scout::pipeline::select(run.scored, &selection);
    info!(
        "{} of {} prospects selected in {:?}",
        selected.len(),
        total,
        start_time.elapsed()
    );

    let use_colors = lead_scout::output::should_use_colors();

    match command {
        Commands::List { format } => match format {
            OutputFormat::Table => {
                println!(
                    "{}",
                    lead_scout::output::format_scored_table(&selected, selection.sort_by, use_colors)
                );
            }
            OutputFormat::Tsv => {
                let tsv = lead_scout::output::format_tsv(&selected);
                if !tsv.is_empty() {
                    println!("{}", tsv);
                }
            }
            OutputFormat::Json => match lead_scout::output::format_json(&selected) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Output error: {:#}", e);
                    std::process::exit(EXIT_OUTPUT);
                }
            },
        },
        Commands::Show { index } => {
            let scored = pick(&selected, index);
            println!(
                "{}",
                lead_scout::output::format_prospect_detail(scored, use_colors)
            );
        }
        Commands::Open { index } => {
            let scored = pick(&selected, index);
            match lead_scout::browser::open_website(&scored.prospect) {
                Ok(url) => println!(
                    "Opening {} in browser: {}",
                    scored.prospect.display_name(),
                    url
                ),
                Err(e) => {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_OUTPUT);
                }
            }
        }
        Commands::Rescore { .. } | Commands::Init => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}
