use anyhow::Context;
use clap::Parser;
use movie_digest::core::date_key::today_previous_day_key;
use movie_digest::core::formatter::print_report;
use movie_digest::utils::error::INTERRUPTED_EXIT_CODE;
use movie_digest::utils::logger;
use movie_digest::utils::validation::{validate_date_key, Validate};
use movie_digest::{AppConfig, AppError, BoxOfficeService, CliConfig, Command, MovieSearchService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting movie-digest");

    // 驗證配置
    let config = match AppConfig::load(&cli).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let command = cli.command.clone().unwrap_or(Command::All {
        date: None,
        query: None,
    });

    // Ctrl-C 時直接丟棄尚未完成的請求
    let outcome = tokio::select! {
        outcome = run(&config, command) => outcome,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            tracing::warn!("⚠️ Interrupted, in-flight requests cancelled");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    };

    if let Err(e) = outcome {
        exit_with(&e);
    }

    Ok(())
}

async fn run(config: &AppConfig, command: Command) -> Result<(), AppError> {
    match command {
        Command::BoxOffice { date } => box_office(config, date).await,
        Command::Search { query } => search(config, &query).await,
        Command::All { date, query } => {
            let query = query.unwrap_or_else(|| config.default_query.clone());

            // 兩個請求同時送出，先完成的先印
            let (box_office_result, search_result) =
                tokio::join!(box_office(config, date), search(config, &query));

            match (box_office_result, search_result) {
                (Ok(()), Ok(())) => Ok(()),
                (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
                (Err(first), Err(second)) => {
                    tracing::error!("❌ Box office lookup failed: {}", first);
                    Err(second)
                }
            }
        }
    }
}

async fn box_office(config: &AppConfig, date: Option<String>) -> Result<(), AppError> {
    let target_dt = match date {
        Some(date) => {
            validate_date_key("date", &date)?;
            date
        }
        None => today_previous_day_key()?,
    };

    let service = BoxOfficeService::from_config(&config.box_office);
    let report = service.daily(&target_dt).await?;
    print_report(&report, &mut std::io::stdout().lock())
}

async fn search(config: &AppConfig, query: &str) -> Result<(), AppError> {
    let service = MovieSearchService::from_config(&config.movie_search);
    let report = service.search(query).await?;
    print_report(&report, &mut std::io::stdout().lock())
}

fn exit_with(e: &AppError) -> ! {
    tracing::error!(
        "❌ movie-digest failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code())
}
