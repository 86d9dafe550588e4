use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use storefront_cart::utils::{logger, validation::Validate};
use storefront_cart::{
    CartCli, CartObserver, CartSession, CatalogItem, CatalogSource, CliConfig, InMemoryCatalog,
    LineItem, LocalStorage, SystemClock, UndoOutcome,
};

struct LogObserver;

impl CartObserver for LogObserver {
    fn cart_changed(&self, items: &[LineItem]) {
        tracing::debug!("cart changed, {} lines", items.len());
    }
}

fn money(currency: &str, amount: Decimal) -> String {
    format!("{} {:.2}", currency, amount.round_dp(2))
}

fn print_product(item: &CatalogItem) {
    let mut line = format!("[{}] {} ({})  {}", item.id, item.name, item.category, money(&item.currency, item.price));
    if let (Some(percent), Some(original)) = (item.discount_percent(), item.original_price) {
        line.push_str(&format!("  was {}, {}% OFF", money(&item.currency, original), percent));
    }
    if item.is_new {
        line.push_str("  NEW");
    }
    println!("{}", line);
}

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let catalog = config.load_catalog().context("loading catalog")?;

    // 商品查詢不需要開啟購物車
    match &cli.command {
        CartCli::Products { category } => {
            let items = match category {
                Some(category) => catalog.by_category(category),
                None => catalog.list(),
            };
            if items.is_empty() {
                println!("No products found");
            }
            items.iter().for_each(print_product);
            return Ok(());
        }
        CartCli::Product { id } => {
            let item = require(&catalog, id)?;
            print_product(&item);
            if let Some(description) = &item.description {
                println!("    {}", description);
            }
            println!("    rating {:.1} ({} reviews)", item.rating, item.reviews_count);
            return Ok(());
        }
        _ => {}
    }

    let storage = LocalStorage::new(config.data_dir());
    let settings = config.session_settings().context("building session settings")?;
    let mut session = CartSession::open(storage, SystemClock, settings);
    session.subscribe(Box::new(LogObserver));

    match cli.command {
        CartCli::Add { id } => {
            let item = require(&catalog, &id)?;
            println!("🛒 Added {}", item.name);
            session.add(item);
        }
        CartCli::Remove { id } => match session.remove(&id) {
            Some(line) => println!(
                "🗑️ Removed {}; run `undo {}` within the next minutes to restore it",
                line.item.name, id
            ),
            None => println!("{} is not in the cart", id),
        },
        CartCli::Set { id, quantity } => {
            if session.set_quantity(&id, quantity).is_some() {
                println!("🗑️ Removed {}", id);
            }
        }
        CartCli::Clear => {
            session.clear();
            println!("Cart cleared");
        }
        CartCli::Undo { id } => match session.undo_remove(&id) {
            UndoOutcome::Restored(line) => {
                println!("↩️ Restored {} x{}", line.item.name, line.quantity)
            }
            UndoOutcome::NotFound => println!("Nothing to restore for {}", id),
        },
        CartCli::Removed => {
            let entries = session.recently_removed();
            if entries.is_empty() {
                println!("Nothing recently removed");
            }
            for entry in entries {
                println!(
                    "[{}] {} x{}  removed {}",
                    entry.id(),
                    entry.line_item.item.name,
                    entry.line_item.quantity,
                    entry.removed_at.format("%H:%M:%S")
                );
            }
            return Ok(());
        }
        CartCli::Cart | CartCli::Products { .. } | CartCli::Product { .. } => {}
    }

    print_cart(&session);
    Ok(())
}

fn require(catalog: &InMemoryCatalog, id: &str) -> anyhow::Result<CatalogItem> {
    catalog.require(id).map_err(|e| {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        anyhow::Error::new(e)
    })
}

fn print_cart<S, C>(session: &CartSession<S, C>)
where
    S: storefront_cart::KeyValueStore,
    C: storefront_cart::Clock,
{
    let items = session.items();
    if items.is_empty() {
        println!("Your cart is empty");
        return;
    }

    let currency = items[0].item.currency.as_str();
    println!("Shopping Cart ({})", session.total_quantity());
    for line in items {
        println!(
            "  [{}] {} x{}  {}",
            line.id(),
            line.item.name,
            line.quantity,
            money(&line.item.currency, session.cart().line_total(line))
        );
    }
    let savings = session.savings();
    if savings > Decimal::ZERO {
        println!("Volume discount: -{}", money(currency, savings));
    }
    println!("Total: {}", money(currency, session.total_price()));
}
