//! gramwatch - Jetton Holder Concentration Analytics
//!
//! CLI entry point: wires the configuration, credential store, TonAPI
//! client and price feed together and renders the holder analytics.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use gramwatch::adapters::annotations::{load_distribution, TagDirectory};
use gramwatch::adapters::cli::{
    CliApp, Command, HoldersCmd, MetaCmd, PriceCmd, ReportCmd, SetKeyCmd,
};
use gramwatch::adapters::market_data::{CoingeckoClient, PricePoller};
use gramwatch::adapters::{FileCredentialStore, TonapiClient};
use gramwatch::application::{build_view, HolderAnalytics, HolderSnapshot, ViewQuery};
use gramwatch::config::{load_config, Config};
use gramwatch::domain::{scaled_amount, HolderRow, SortDirection, SortField};
use gramwatch::ports::credentials::{CredentialStorePort, API_KEY_STORAGE_KEY};
use gramwatch::ports::PriceFeedPort;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in config files)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug)?;

    match app.command {
        Command::Report(cmd) => report_command(cmd).await,
        Command::Holders(cmd) => holders_command(cmd).await,
        Command::Meta(cmd) => meta_command(cmd).await,
        Command::Price(cmd) => price_command(cmd).await,
        Command::SetKey(cmd) => set_key_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

/// Build the TonAPI client, preferring a stored credential over the
/// config/env one.
fn build_client(config: &Config, store: &FileCredentialStore) -> Result<TonapiClient> {
    let stored = match store.get(API_KEY_STORAGE_KEY) {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!("credential store unreadable, continuing without it: {}", e);
            None
        }
    };
    let api_key = stored.or_else(|| config.tonapi.get_api_key());

    TonapiClient::with_config(config.tonapi.client_config(api_key))
        .context("Failed to create TonAPI client")
}

/// Persist a demotion: when the server rejected the credential mid-run,
/// drop it from the store so the next run starts anonymous.
async fn sync_demoted_credential(
    client: &TonapiClient,
    store: &FileCredentialStore,
    started_with_key: bool,
) {
    if started_with_key && !client.has_credential().await {
        if let Err(e) = store.set(API_KEY_STORAGE_KEY, None) {
            tracing::warn!("failed to clear rejected credential: {}", e);
        } else {
            tracing::warn!("stored credential was rejected by the API and has been cleared");
        }
    }
}

fn load_tags(config: &Config) -> TagDirectory {
    let Some(path) = config.annotations.tags_path.as_deref() else {
        return TagDirectory::default();
    };
    match TagDirectory::load(path) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!("tag document unavailable ({}), holders will be untagged", e);
            TagDirectory::default()
        }
    }
}

async fn fetch_price(config: &Config) -> Option<f64> {
    let client = match CoingeckoClient::new((&config.price).into()) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("price client unavailable: {}", e);
            return None;
        }
    };
    match client.usd_price().await {
        Ok(price) => price,
        Err(e) => {
            tracing::warn!("price lookup failed: {}", e);
            None
        }
    }
}

async fn report_command(cmd: ReportCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let store = FileCredentialStore::new(config.data_dir());
    let client = build_client(&config, &store)?;
    let started_with_key = client.has_credential().await;

    let analytics = HolderAnalytics::with_config(
        client,
        config.tonapi.master.clone(),
        config.tonapi.snapshot_config(),
    );
    let snapshot = analytics
        .fetch_snapshot()
        .await
        .context("Failed to fetch holder snapshot")?;
    sync_demoted_credential(analytics.ledger(), &store, started_with_key).await;

    let price = if cmd.no_price {
        None
    } else {
        fetch_price(&config).await
    };
    let tags = load_tags(&config);

    if cmd.json {
        print_report_json(&snapshot, &tags, price, cmd.top)?;
    } else {
        print_report(&snapshot, &tags, price, cmd.top);
        print_distribution(&config, snapshot.meta.decimals);
    }
    Ok(())
}

fn print_report(snapshot: &HolderSnapshot, tags: &TagDirectory, price: Option<f64>, top: usize) {
    let meta = &snapshot.meta;
    let decimals = meta.decimals;
    let supply = &meta.total_supply;

    println!(
        "{} ({}) \u{2022} decimals: {} \u{2022} {}",
        meta.name,
        meta.symbol,
        decimals,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "Total supply: {} {}",
        scaled_amount::to_display(supply, decimals),
        meta.symbol
    );
    match price {
        Some(p) => {
            let usd = scaled_amount::to_number(supply, decimals) * p;
            println!("Price: ${:.6} \u{2022} supply value: ${:.2}", p, usd);
        }
        None => println!("Price: unavailable"),
    }

    println!();
    println!("Concentration (of {} ingested holders):", snapshot.holders.len());
    for (label, sum) in [
        ("top 10", &snapshot.stats.top10),
        ("top 100", &snapshot.stats.top100),
        ("top 1000", &snapshot.stats.top1000),
    ] {
        println!(
            "  {:<9} {:>26} {} ({})",
            label,
            scaled_amount::to_display(sum, decimals),
            meta.symbol,
            scaled_amount::percent_of(sum, supply)
        );
    }

    println!();
    println!(
        "{:>5}  {:<48} {:>22} {:>10} {:>14}  {}",
        "Rank", "Address", "Balance", "Share", "Value (USD)", "Tag"
    );
    for holder in snapshot.holders.iter().take(top) {
        let tag = tags.label_for(&holder.address).unwrap_or("");
        let value = match price {
            Some(p) => format!(
                "${:.2}",
                scaled_amount::to_number(&holder.balance, decimals) * p
            ),
            None => scaled_amount::UNAVAILABLE.to_string(),
        };
        println!(
            "{:>5}  {:<48} {:>22} {:>10} {:>14}  {}",
            holder.rank,
            holder.address.to_friendly(),
            scaled_amount::to_display(&holder.balance, decimals),
            snapshot.share_of(holder),
            value,
            tag
        );
    }
}

fn print_report_json(
    snapshot: &HolderSnapshot,
    tags: &TagDirectory,
    price: Option<f64>,
    top: usize,
) -> Result<()> {
    let decimals = snapshot.meta.decimals;
    let holders: Vec<serde_json::Value> = snapshot
        .holders
        .iter()
        .take(top)
        .map(|holder| {
            serde_json::json!({
                "rank": holder.rank,
                "address": holder.address.to_friendly(),
                "balance": scaled_amount::to_display(&holder.balance, decimals),
                "share": snapshot.share_of(holder),
                "change_24h": scaled_amount::signed_display(&holder.balance_change_24h, decimals),
                "value_usd": price.map(|p| scaled_amount::to_number(&holder.balance, decimals) * p),
                "tag": tags.label_for(&holder.address),
            })
        })
        .collect();

    let report = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "meta": snapshot.meta,
        "price_usd": price,
        "concentration": snapshot.stats,
        "holders": holders,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_distribution(config: &Config, decimals: u32) {
    let Some(path) = config.annotations.distribution_path.as_deref() else {
        return;
    };
    match load_distribution(path) {
        Ok(buckets) => {
            println!();
            println!("Distribution (precomputed):");
            println!("{:<16} {:>10} {:>26}", "Range", "Holders", "Total");
            for bucket in buckets {
                println!(
                    "{:<16} {:>10} {:>26}",
                    bucket.range,
                    bucket.holders,
                    scaled_amount::display_from_str(&bucket.total, decimals)
                );
            }
        }
        Err(e) => tracing::warn!("distribution report unavailable: {}", e),
    }
}

async fn holders_command(cmd: HoldersCmd) -> Result<()> {
    let Some(field) = SortField::from_name(&cmd.sort) else {
        bail!(
            "Unknown sort field '{}' (expected rank, address, tag, balance, change or share)",
            cmd.sort
        );
    };
    let Some(direction) = SortDirection::from_name(&cmd.direction) else {
        bail!("Unknown direction '{}' (expected asc or desc)", cmd.direction);
    };
    if cmd.page_size == 0 {
        bail!("page-size must be > 0");
    }

    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let store = FileCredentialStore::new(config.data_dir());
    let client = build_client(&config, &store)?;
    let started_with_key = client.has_credential().await;

    let analytics = HolderAnalytics::with_config(
        client,
        config.tonapi.master.clone(),
        config.tonapi.snapshot_config(),
    );
    let snapshot = analytics
        .fetch_snapshot()
        .await
        .context("Failed to fetch holder snapshot")?;
    sync_demoted_credential(analytics.ledger(), &store, started_with_key).await;

    let tags = load_tags(&config);
    let query = ViewQuery {
        field,
        direction,
        search: cmd.search,
        page_index: cmd.page,
        page_size: cmd.page_size,
    };
    let page = build_view(&snapshot, &tags, &query);

    if page.rows.is_empty() {
        println!("No holders on page {} (of {})", page.page_index + 1, page.total_pages);
        return Ok(());
    }

    let decimals = snapshot.meta.decimals;
    println!(
        "{:>5}  {:<48} {:>22} {:>14} {:>10}  {}",
        "Rank", "Address", "Balance", "Change 24h", "Share", "Tag"
    );
    for row in &page.rows {
        print_holder_row(row, &snapshot, decimals);
    }
    println!();
    println!("Page {} of {}", page.page_index + 1, page.total_pages);
    Ok(())
}

fn print_holder_row(row: &HolderRow, snapshot: &HolderSnapshot, decimals: u32) {
    println!(
        "{:>5}  {:<48} {:>22} {:>14} {:>10}  {}",
        row.record.rank,
        row.record.address.to_friendly(),
        scaled_amount::to_display(&row.record.balance, decimals),
        scaled_amount::signed_display(&row.record.balance_change_24h, decimals),
        snapshot.share_of(&row.record),
        row.tag.as_deref().unwrap_or("")
    );
}

async fn meta_command(cmd: MetaCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let store = FileCredentialStore::new(config.data_dir());
    let client = build_client(&config, &store)?;
    let started_with_key = client.has_credential().await;

    let analytics = HolderAnalytics::new(client, config.tonapi.master.clone());
    let meta = analytics
        .token_meta()
        .await
        .context("Failed to fetch jetton metadata")?;
    sync_demoted_credential(analytics.ledger(), &store, started_with_key).await;

    println!("Name:         {}", meta.name);
    println!("Symbol:       {}", meta.symbol);
    println!("Decimals:     {}", meta.decimals);
    println!(
        "Total supply: {} {}",
        scaled_amount::to_display(&meta.total_supply, meta.decimals),
        meta.symbol
    );
    Ok(())
}

async fn price_command(cmd: PriceCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let client =
        CoingeckoClient::new((&config.price).into()).context("Failed to create price client")?;

    if !cmd.watch {
        match client.fetch_price().await {
            Ok(Some(price)) => println!("{}: ${:.6}", config.price.coin_id, price),
            Ok(None) => println!("{}: price unavailable", config.price.coin_id),
            Err(e) => bail!("Price lookup failed: {}", e),
        }
        return Ok(());
    }

    let (mut rx, handle) = PricePoller::new(client).spawn();
    println!(
        "Watching {} every {}s (Ctrl+C to stop)",
        config.price.coin_id, config.price.poll_interval_secs
    );
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                match *rx.borrow() {
                    Some(price) => println!("{}: ${:.6}", config.price.coin_id, price),
                    None => println!("{}: price unavailable", config.price.coin_id),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }
    handle.abort();
    Ok(())
}

async fn set_key_command(cmd: SetKeyCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let store = FileCredentialStore::new(config.data_dir());

    if cmd.clear {
        store
            .set(API_KEY_STORAGE_KEY, None)
            .context("Failed to clear credential")?;
        println!("Credential cleared.");
    } else {
        let key = cmd.key.as_deref().unwrap_or_default();
        store
            .set(API_KEY_STORAGE_KEY, Some(key))
            .context("Failed to store credential")?;
        println!("Credential stored in {}", store.path().display());
    }
    Ok(())
}
