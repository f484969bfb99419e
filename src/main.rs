mod commands;

use clap::Parser;
use gradebook::config::cli::Command;
use gradebook::utils::{logger, validation::Validate};
use gradebook::{AppConfig, CliConfig, GradebookError, GradebookService, JsonFileRepository};

fn fail(e: &GradebookError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let app_config = match AppConfig::discover(config.config.as_deref()) {
        Ok(app_config) => app_config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    let json_logs = app_config.logging.json
        || std::env::var("GRADEBOOK_LOG_FORMAT").is_ok_and(|format| format == "json");
    if json_logs {
        logger::init_json_logger(config.verbose, app_config.logging.level.as_deref());
    } else {
        logger::init_cli_logger(config.verbose, app_config.logging.level.as_deref());
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
        tracing::debug!("App config: {:?}", app_config);
    }

    if let Err(e) = app_config.validate() {
        fail(&e);
    }

    let data_file = config
        .data_file
        .clone()
        .unwrap_or_else(|| app_config.storage.data_file.clone().into());
    let repository = JsonFileRepository::new(data_file).with_pretty(app_config.storage.pretty);

    let mut service = match GradebookService::open(repository).await {
        Ok(service) => {
            let grading = &app_config.grading;
            service.with_score_range(grading.min_score, grading.max_score)
        }
        Err(e) => fail(&e),
    };

    let command = config.command.unwrap_or(Command::Console);
    let mut stdout = std::io::stdout();
    if let Err(e) = commands::run(&mut service, command, config.json, &mut stdout).await {
        fail(&e);
    }

    Ok(())
}
