use clap::Parser;
use craft_calc::core::{items, prices, report};
use craft_calc::domain::model::{ItemId, ItemIndex};
use craft_calc::utils::error::{CraftError, ErrorSeverity};
use craft_calc::utils::{logger, validation::Validate};
use craft_calc::{AppConfig, CliConfig, Command, CraftEngine, LocalStorage, WikiClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: CliConfig) -> craft_calc::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;
    tracing::debug!("Configuration: {:?}", config);

    let engine = CraftEngine::from_config(&config, LocalStorage::new(".".to_string()))?;

    match cli.command {
        Command::Profit {
            username,
            csv,
            no_log,
        } => {
            let engine = if no_log {
                engine.without_session_log()
            } else {
                engine
            };
            let craft_report = engine.run(&username).await?;

            println!(
                "\n{}'s Crafting level: {}\n",
                craft_report.username, craft_report.stats.level
            );
            for result in craft_report.ranked() {
                println!("🧪 {}", report::format_result(result));
            }
            for name in &craft_report.skipped {
                println!("⚠️ Skipped: {} (missing materials or prices)", name);
            }

            if let Some(path) = csv {
                let file = std::fs::File::create(&path)?;
                report::write_csv(file, craft_report.ranked())?;
                println!("📁 Results saved to: {}", path);
            }
        }
        Command::Level { username } => {
            let stats = engine.crafting_stats(&username).await?;
            println!("{}'s Crafting level: {}", username, stats.level);
            println!("XP: {}", stats.experience);
            println!("Rank: {}", stats.rank);
        }
        Command::Unlocked { username } => {
            let stats = engine.crafting_stats(&username).await?;
            let unlocked = engine.unlocked_methods(stats.level);
            println!("Unlocked at level {} ({}):", stats.level, unlocked.len());
            for method in unlocked {
                println!(" - {} (lvl {})", method.name, method.level);
            }
        }
        Command::Materials { item } => {
            let resolution = engine.resolve_materials(&item).await;
            match resolution.source() {
                Some(source) => {
                    println!("Materials for {} (via {}):", item, source);
                    for (name, quantity) in resolution.materials() {
                        println!(" - {} × {}", quantity, name);
                    }
                }
                None => println!("No materials found for {}", item),
            }
        }
        Command::Price { item } => {
            let ids = item_index_for(engine.client(), &[item.as_str()]).await?;
            let (id, name) = parse_item(&item, &ids)?;
            let quote = prices::get_price(engine.client(), id).await?;
            println!(
                "🪙 {} ({}): high {} | low {}",
                name,
                id,
                display_price(quote.high),
                display_price(quote.low)
            );
        }
        Command::Compare { first, second } => {
            let ids = item_index_for(engine.client(), &[first.as_str(), second.as_str()]).await?;
            let first = parse_item(&first, &ids)?;
            let second = parse_item(&second, &ids)?;
            let comparison = prices::compare_prices(
                engine.client(),
                (first.0, &first.1),
                (second.0, &second.1),
            )
            .await?;

            println!("🪙 {}: {} gp", comparison.first.name, comparison.first.high);
            println!("🪙 {}: {} gp", comparison.second.name, comparison.second.high);
            println!(
                "Price difference: {} gp ({} is more)",
                comparison.difference.abs(),
                comparison.more_expensive().name
            );
        }
    }

    Ok(())
}

/// Only fetches the catalog when some argument is a name rather than an id.
async fn item_index_for(client: &WikiClient, args: &[&str]) -> craft_calc::Result<ItemIndex> {
    if args.iter().all(|arg| arg.parse::<ItemId>().is_ok()) {
        return Ok(ItemIndex::new());
    }
    items::fetch_item_index(client).await
}

fn parse_item(arg: &str, ids: &ItemIndex) -> craft_calc::Result<(ItemId, String)> {
    if let Ok(id) = arg.parse::<ItemId>() {
        return Ok((id, format!("Item {}", id)));
    }
    ids.get(arg)
        .map(|id| (id, arg.to_string()))
        .ok_or_else(|| CraftError::parse("item mapping", format!("unknown item '{}'", arg)))
}

fn display_price(price: Option<i64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| format!("{} gp", p))
}
