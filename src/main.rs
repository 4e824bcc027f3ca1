use clap::Parser;
use dev_finder::app::render::{self, ResultView};
use dev_finder::config::cli::{CliConfig, Command, OutputFormat, SearchArgs};
use dev_finder::core::{AddressBar, ConfigProvider};
use dev_finder::utils::error::{ErrorSeverity, FinderError};
use dev_finder::utils::logger;
use dev_finder::{
    ApiClient, AuthContext, AuthPhase, MemoryAddressBar, PaginationControls, Result,
    SearchOutcome, SearchSession, TomlConfig,
};
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 載入配置並套用命令列覆蓋設定
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };

    // 初始化日誌
    if config.log_format() == "json" {
        logger::init_json_logger(config.verbose());
    } else {
        logger::init_cli_logger(config.verbose());
    }
    tracing::debug!("Resolved config: {:?}", config);

    match run(&cli.command, &config).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }
}

/// 根據錯誤嚴重程度決定退出碼
fn exit_code(e: &FinderError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2, // 可重試
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn run(command: &Command, config: &TomlConfig) -> Result<i32> {
    match command {
        Command::Search(args) => search(args, config).await,
        Command::Lookups { format } => lookups(*format, config).await,
        Command::Window { current, last } => {
            match PaginationControls::new(*current, *last) {
                Some(controls) => println!("{}", render::render_window(&controls)),
                None => println!("Single page, no pagination controls"),
            }
            Ok(0)
        }
        Command::Whoami => whoami(config).await,
    }
}

async fn search(args: &SearchArgs, config: &TomlConfig) -> Result<i32> {
    let query = args.to_query()?;
    tracing::info!("🔍 Searching developers with query '{}'", query);

    let api = Arc::new(ApiClient::from_config(config)?);
    let address_bar = Arc::new(MemoryAddressBar::new(&query));
    let session = SearchSession::with_debounce(api, address_bar.clone(), config.debounce());

    match session.bootstrap().await? {
        SearchOutcome::Applied(result) => {
            let filter = session.filter();
            let lookups = session.lookups();
            let view = ResultView::new(&filter, &lookups, &result);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            render::render_results(&mut out, &view, args.format, config.skill_label_limit())?;
            out.flush()?;

            tracing::info!(
                "✅ Page {} of {} ({} total), address bar: ?{}",
                result.current_page,
                result.last_page,
                result.total,
                address_bar.current_query()
            );
            Ok(0)
        }
        SearchOutcome::Failed(message) => {
            eprintln!("❌ {}", message);
            Ok(2)
        }
        SearchOutcome::Stale { ticket, latest } => {
            tracing::warn!("⚠️ Search response {} superseded by {}", ticket, latest);
            Ok(2)
        }
    }
}

async fn lookups(format: OutputFormat, config: &TomlConfig) -> Result<i32> {
    let api = Arc::new(ApiClient::from_config(config)?);
    let session = SearchSession::new(api, Arc::new(MemoryAddressBar::default()));
    let tables = session.load_lookups().await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::render_lookups(&mut out, &tables, format)?;
    out.flush()?;
    Ok(0)
}

async fn whoami(config: &TomlConfig) -> Result<i32> {
    let api = ApiClient::from_config(config)?;
    let mut auth = AuthContext::new();

    match auth.check(&api).await {
        AuthPhase::Authenticated(user) => {
            println!("👤 {} (@{})", user.full_name(), user.username);
        }
        _ => println!("Anonymous session"),
    }
    if let Some(error) = auth.error() {
        eprintln!("⚠️ {}", error);
        return Ok(2);
    }
    Ok(0)
}
