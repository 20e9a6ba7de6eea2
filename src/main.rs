use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use bank_recon::external::{AnthropicScorer, ExternalScoringError, SemanticScorer};
use bank_recon::output::OutputFormat;
use bank_recon::reconcile::ReconcileOptions;
use bank_recon::records::{BankRecord, CustomerIndex};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_RATE_LIMIT: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every bank record and print verdicts (default if no subcommand)
    Run,
    /// Load inputs and report lookup problems without calling the scorer
    Check,
}

#[derive(Parser, Debug)]
#[command(name = "bank-recon")]
#[command(
    about = "Reconcile third-party bank accounts against customer records",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and per-record score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/bank-recon/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Bank records JSON file (overrides config)
    #[arg(long, global = true)]
    banks: Option<PathBuf>,

    /// Customer records JSON file (overrides config)
    #[arg(long, global = true)]
    customers: Option<PathBuf>,

    /// Per-record output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Write a JSON report of all verdicts to this path
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bank_recon={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code_for(error: &ExternalScoringError) -> i32 {
    match error {
        ExternalScoringError::Auth(_) => EXIT_AUTH,
        ExternalScoringError::RateLimited(_) => EXIT_RATE_LIMIT,
        _ => EXIT_NETWORK,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    bank_recon::credentials::load_dotenv();

    let command = cli.command.unwrap_or(Commands::Run);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match bank_recon::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = bank_recon::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let banks_path = cli.banks.unwrap_or(config.inputs.banks.clone());
    let customers_path = cli.customers.unwrap_or(config.inputs.customers.clone());

    let banks: Vec<BankRecord> = match bank_recon::records::load_banks(&banks_path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    let customers = match bank_recon::records::load_customers(&customers_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };
    let customer_count = customers.len();

    let index = match CustomerIndex::build(customers, config.duplicate_ids) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Input error: {}", e);
            eprintln!(
                "Set `duplicate_ids: last_write_wins` in the config to keep the later record."
            );
            std::process::exit(EXIT_INPUT);
        }
    };

    tracing::info!(
        banks = banks.len(),
        customers = customer_count,
        indexed = index.len(),
        "inputs loaded"
    );

    match command {
        Commands::Check => {
            let unresolved = index.unresolved(&banks);
            println!("Bank records: {}", banks.len());
            println!("Customers: {} ({} indexed)", customer_count, index.len());
            println!("Unresolved companyIds: {}", unresolved.len());
            for bank in unresolved {
                println!("  Link: {} companyId: {}", bank.link_id, bank.company_id);
            }
        }
        Commands::Run => {
            let api_key = match bank_recon::credentials::require_api_key() {
                Ok(k) => k,
                Err(e) => {
                    eprintln!("Credential error: {}", e);
                    std::process::exit(EXIT_AUTH);
                }
            };

            let scorer = match AnthropicScorer::new(api_key, &config.scorer) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Failed to create scorer client: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            tracing::debug!(model = scorer.model_name(), "scorer ready");

            let options = ReconcileOptions {
                scoring: config.scoring.clone().unwrap_or_default(),
                on_scorer_failure: config.scorer.on_failure,
            };

            let use_colors = !cli.no_color && bank_recon::output::should_use_colors();
            let format = cli.format;
            let verbose = cli.verbose;

            let on_verdict = |verdict: &bank_recon::reconcile::Verdict| {
                println!("{}", bank_recon::output::format_verdict(verdict, format, use_colors));
                if verbose {
                    println!("{}", bank_recon::output::format_verdict_detail(verdict));
                }
            };
            let result = bank_recon::reconcile::reconcile(
                &banks,
                &index,
                &scorer,
                &options,
                on_verdict,
            )
            .await;

            let reconciliation = match result {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("External scoring failed: {}", e);
                    eprintln!(
                        "Set `scorer.on_failure: skip` in the config to continue past failed records."
                    );
                    std::process::exit(exit_code_for(&e));
                }
            };

            let summary = bank_recon::output::format_summary(&reconciliation.tally, use_colors);
            match format {
                OutputFormat::Text => println!("{}", summary),
                OutputFormat::Tsv => eprintln!("{}", summary),
            }

            if let Some(ref report_path) = cli.report {
                if let Err(e) = bank_recon::output::write_report(report_path, &reconciliation) {
                    eprintln!("Report error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                tracing::info!(path = %report_path.display(), "report written");
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Total: {} records in {:?}",
                    reconciliation.tally.total,
                    start_time.elapsed()
                );
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
