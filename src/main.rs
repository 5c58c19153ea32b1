use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use smoke_tester::{report, runner, utils::config::SuiteConfig};

#[derive(Parser)]
#[command(name = "smoke-tester")]
#[command(version = "0.1.0")]
#[command(about = "Backend API smoke testing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the smoke-test suite against a backend
    Run {
        /// Backend base URL (falls back to SMOKE_BASE_URL, then the default)
        #[arg(short, long)]
        base_url: Option<String>,

        /// Output directory for reports
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Write JSON and JUnit reports
        #[arg(long, default_value = "false")]
        report: bool,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "10")]
        timeout_secs: u64,

        /// Settle delay before the persistence read, in milliseconds
        #[arg(long, default_value = "1000")]
        settle_ms: u64,
    },

    /// Generate report from saved suite results
    Report {
        /// Path to suite results JSON
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            base_url,
            output,
            report,
            timeout_secs,
            settle_ms,
        }) => run(base_url, output, report, timeout_secs, settle_ms).await,

        Some(Commands::Report {
            results,
            format,
            output,
        }) => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref()).await
        }

        // Bare invocation runs the full suite with defaults
        None => run(None, PathBuf::from("./output"), false, 10, 1_000).await,
    }
}

async fn run(
    base_url: Option<String>,
    output: PathBuf,
    write_reports: bool,
    timeout_secs: u64,
    settle_ms: u64,
) -> anyhow::Result<()> {
    let mut config = SuiteConfig::from_env();
    if let Some(url) = base_url {
        config = config.with_base_url(&url);
    }
    config.request_timeout_ms = timeout_secs * 1000;
    config.settle_delay_ms = settle_ms;

    println!("{}", "=".repeat(60));
    println!("{}", "Backend API Smoke Test Suite".white().bold());
    println!("{}", "=".repeat(60));
    println!("  Testing backend at: {}", config.base_url.cyan());
    if write_reports {
        println!("  Reports: {}", "Enabled".green());
    }

    let suite_report = runner::run_suite(config).await?;

    if write_reports {
        std::fs::create_dir_all(&output)?;

        let results = report::types::SuiteResults {
            session_id: suite_report.session_id.clone(),
            results: suite_report.results.clone(),
            summary: suite_report.summary.clone(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        let json_path = output.join("suite-results.json");
        std::fs::write(&json_path, serde_json::to_string_pretty(&results)?)?;
        println!(
            "\n{} JSON report saved to: {}",
            "📄".to_string().blue(),
            json_path.display().to_string().cyan()
        );

        report::junit::write_report(&results, &output)?;
    }

    if suite_report.summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
