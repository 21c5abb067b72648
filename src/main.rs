use clap::Parser;
use pokeview::adapters::{FixedCalendar, LocalCalendar, PokeApiClient, SystemRandom};
use pokeview::app::report::{render_json, render_text};
use pokeview::app::Session;
use pokeview::core::{Calendar, ConfigProvider, PokemonQuery};
use pokeview::utils::{logger, validation::Validate};
use pokeview::{AppError, CliConfig, Command, Result, Snapshot, TomlConfig, ViewModelStore};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

type CliSession<K> = Session<PokeApiClient, SystemRandom, K>;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &CliConfig) -> Result<()> {
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading settings from {}", path);
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            cli.command.validate()?;
            run_with(cli, &config).await
        }
        None => {
            cli.validate()?;
            run_with(cli, cli).await
        }
    }
}

async fn run_with(cli: &CliConfig, config: &impl ConfigProvider) -> Result<()> {
    let catalog = Arc::new(PokeApiClient::new(config.api_base())?);
    let store = ViewModelStore::new(catalog, config.fetch_timeout());

    match &cli.command {
        Command::Daily { date } => {
            let today = date.unwrap_or_else(|| LocalCalendar.today());
            let session = build_session(store, FixedCalendar(today), config);
            session.request_of_the_day().await?;
            print_settled(&session, cli.json).await
        }
        Command::Session => {
            let session = build_session(store, LocalCalendar, config);
            run_interactive(session, cli.json).await
        }
        Command::Random => {
            let session = build_session(store, LocalCalendar, config);
            session.request_random().await?;
            print_settled(&session, cli.json).await
        }
        Command::Favorite => {
            let session = build_session(store, LocalCalendar, config);
            session.request_favorite().await?;
            print_settled(&session, cli.json).await
        }
        Command::Show { name_or_id } => {
            let query = parse_query(name_or_id)?;
            let session = build_session(store, LocalCalendar, config);
            session.request_named(query).await?;
            print_settled(&session, cli.json).await
        }
    }
}

fn build_session<K: Calendar>(
    store: ViewModelStore<PokeApiClient>,
    calendar: K,
    config: &impl ConfigProvider,
) -> CliSession<K> {
    Session::new(
        store,
        SystemRandom::from_os(),
        calendar,
        config.species_count(),
        config.favorite_id(),
        config.fetch_timeout(),
    )
}

fn parse_query(input: &str) -> Result<PokemonQuery> {
    PokemonQuery::parse(input).ok_or_else(|| AppError::InvalidConfigValueError {
        field: "name_or_id".to_string(),
        value: input.to_string(),
        reason: "expected a pokemon name or a positive id".to_string(),
    })
}

fn print_snapshot(snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", render_json(snapshot)?);
    } else {
        println!("{}", render_text(snapshot));
    }
    Ok(())
}

async fn print_settled<K: Calendar>(session: &CliSession<K>, json: bool) -> Result<()> {
    let snapshot = session.store().settled().await;
    print_snapshot(&snapshot, json)
}

/// 互動模式：每行一個動作，畫面由訂閱快照的任務負責輸出
async fn run_interactive(session: CliSession<LocalCalendar>, json: bool) -> Result<()> {
    let mut receiver = session.store().subscribe();
    let renderer = tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let snapshot = receiver.borrow_and_update().clone();
            if let Err(e) = print_snapshot(&snapshot, json) {
                tracing::error!("❌ Rendering failed: {}", e);
            }
            if !json {
                println!("----");
            }
        }
    });

    eprintln!("Commands: random | daily | favorite | <name or id> | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        let outcome = match command {
            "" => continue,
            "quit" | "exit" => break,
            "random" => session.request_random().await,
            "daily" => session.request_of_the_day().await,
            "favorite" => session.request_favorite().await,
            other => match PokemonQuery::parse(other) {
                Some(query) => session.request_named(query).await,
                None => continue,
            },
        };

        // 失敗已記錄在日誌，畫面保持原樣
        if let Err(e) = outcome {
            eprintln!("❌ {}", AppError::from(e).user_friendly_message());
        }
    }

    session.store().settled().await;
    drop(session);
    if let Err(e) = renderer.await {
        tracing::debug!("Renderer stopped: {}", e);
    }
    Ok(())
}
