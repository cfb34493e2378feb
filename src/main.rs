use clap::Parser;
use std::io::{BufRead, Write};
use subhunt::core::ConfigProvider;
use subhunt::utils::logger;
use subhunt::{CliConfig, CrtShPipeline, HarvestEngine, HarvestError, LocalStorage};

fn prompt_for_domain() -> subhunt::Result<String> {
    print!("Enter the domain (e.g., netflix.com): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let input = match &cli.domain {
        Some(domain) => domain.clone(),
        None => match prompt_for_domain() {
            Ok(line) => line,
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                return;
            }
        },
    };

    let storage = LocalStorage::new(config.output_dir());
    let pipeline = match CrtShPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("❌ Unable to build HTTP client: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            return;
        }
    };

    let engine = HarvestEngine::new(pipeline);
    match engine.run(&input).await {
        Ok(report) => {
            tracing::info!(
                "✅ Finished {}: {} subdomains{}",
                report.domain,
                report.subdomains.len(),
                if report.is_upstream_failure() { " (lookup failed)" } else { "" }
            );
        }
        Err(e @ HarvestError::InvalidDomain { .. }) => {
            tracing::warn!("{}", e);
            println!("{}", e.user_friendly_message());
        }
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
        }
    }
}
