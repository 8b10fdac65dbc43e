use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use boxshelf::adapters::{InMemoryCatalog, InMemoryRoster, LeaderboardSort, SystemClock};
use boxshelf::config::cli::{Board, Command, ReadMode};
use boxshelf::core::RandomSource;
use boxshelf::utils::{logger, validation::Validate};
use boxshelf::{BoxshelfError, CliConfig, ReadingList, Ring, TomlConfig};

fn main() {
    let cli = CliConfig::parse();

    let config = match &cli.config {
        Some(path) => TomlConfig::from_file(path),
        None => TomlConfig::from_toml_str(""),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    let format = cli.log_format.unwrap_or(config.logging.format);
    logger::init_logger(format, cli.verbose || config.logging.verbose);

    tracing::info!("Starting boxshelf CLI");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate().and_then(|_| config.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if let Err(e) = run(&cli, &config) {
        tracing::error!("❌ Command failed: {:#}", e);
        eprintln!("❌ {:#}", e);
        let domain_error = e.downcast_ref::<BoxshelfError>();
        if let Some(suggestion) = domain_error.map(BoxshelfError::recovery_suggestion) {
            eprintln!("💡 Suggestion: {}", suggestion);
        }
        let exit_code = domain_error.map(BoxshelfError::exit_code).unwrap_or(1);
        std::process::exit(exit_code);
    }
}

fn run(cli: &CliConfig, config: &TomlConfig) -> anyhow::Result<()> {
    let catalog = Arc::new(InMemoryCatalog::new());
    let roster = Arc::new(InMemoryRoster::new());
    config.seed_catalog(&catalog).context("seeding book catalog")?;
    config.seed_roster(&roster).context("seeding boxer roster")?;
    let random = config.build_random_source()?;

    match &cli.command {
        Command::Fight { first, second } => run_fight(&roster, random, first, second),
        Command::Read {
            books,
            mode,
            start,
            random_start,
        } => {
            let mut list = ReadingList::from_config(catalog.clone(), random, SystemClock, config);
            for id in books {
                list.add(*id).with_context(|| format!("adding book {} to the reading list", id))?;
            }

            if *random_start {
                list.go_to_random_position()?;
            } else if let Some(start) = start {
                list.go_to_position(*start)?;
            }

            let read = match mode {
                ReadMode::All => list.read_all()?,
                ReadMode::Rest => list.read_remainder()?,
                ReadMode::Current => vec![list.read_current()?],
            };

            for book in &read {
                println!("📖 {}", book);
            }
            println!(
                "✅ Read {} book(s), {} pages in list, cursor at {}",
                read.len(),
                list.total_pages()?,
                list.current_position()
            );
            print_books(&catalog.leaderboard())
        }
        Command::RandomBook => {
            let book = catalog.random_book(random.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&book)?);
            Ok(())
        }
        Command::Leaderboard { board, sort } => match board {
            Board::Books => print_books(&catalog.leaderboard()),
            Board::Boxers => {
                let sort: LeaderboardSort = sort.parse()?;
                let entries = roster.leaderboard(sort)?;
                println!("{}", serde_json::to_string_pretty(&entries)?);
                Ok(())
            }
        },
    }
}

fn run_fight(
    roster: &Arc<InMemoryRoster>,
    random: Arc<dyn RandomSource>,
    first: &str,
    second: &str,
) -> anyhow::Result<()> {
    let mut ring = Ring::new(roster.clone(), random);
    for name in [first, second] {
        let boxer = roster
            .get_by_name(name.trim())
            .with_context(|| format!("looking up boxer '{}'", name))?;
        ring.enter(boxer.to_competitor())?;
    }

    let winner = ring.resolve_fight()?;
    println!("🥊 Winner: {}", winner);

    let entries = roster.leaderboard(LeaderboardSort::Wins)?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn print_books(books: &[boxshelf::core::Book]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(books)?);
    Ok(())
}
