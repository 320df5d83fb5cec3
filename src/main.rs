use clap::Parser;
use colored::Colorize;
use tracing::{error, info};

use trafficsheet::cli::Cli;
use trafficsheet::config::{StaticConfig, validate};
use trafficsheet::errors::TrafficError;
use trafficsheet::runtime;
use trafficsheet::system::logging::init_logging;

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.generate_config {
        println!("{}", StaticConfig::generate_sample_config());
        return;
    }

    if let Err(e) = run(&cli) {
        report_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let Some(target) = cli.target() else {
        anyhow::bail!("--spreadsheet-id, --github-owner-name and --github-project-name are required");
    };

    let config = StaticConfig::load()?;
    validate(&config)?;
    // 必须在整个运行期间持有，保证日志刷新
    let _guard = init_logging(&config.logging)?;

    let today = chrono::Utc::now().date_naive();
    info!("trafficsheet {} starting, today is {}", env!("CARGO_PKG_VERSION"), today);

    match runtime::run(&config, &target, today) {
        Ok(_) => {
            info!("Run completed");
            Ok(())
        }
        Err(e) => {
            error!("Run aborted: {:#}", e);
            Err(e)
        }
    }
}

fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<TrafficError>() {
        Some(err) => {
            eprintln!("{}", err.format_colored());
            let context = e.to_string();
            if context != err.to_string() {
                eprintln!("{} {}", "Context:".dimmed(), context);
            }
        }
        None => eprintln!("{} {:#}", "Error:".red().bold(), e),
    }
}
