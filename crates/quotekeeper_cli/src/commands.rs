//! Command handlers: the console presentation layer over `QuoteService`.

use crate::args::{Command, SyncArgs};
use anyhow::{Context, Result};
use log::info;
use quotekeeper_core::{
    share, CategoryFilter, HttpQuoteTransport, ImportMode, MergeReport, Quote, QuoteService,
    ServiceError, SqliteQuoteRepository, StoreEvent, StoreListener, SyncReconciler,
    SyncScheduler,
};
use std::path::Path;
use std::sync::Arc;

const MSG_NO_QUOTES: &str = "No quotes available!";
const MSG_NO_QUOTES_IN_CATEGORY: &str = "No quotes available in this category!";
const MSG_SYNC_OK: &str = "Quotes synced with server!";
const MSG_SYNC_FAILED: &str = "Failed to sync with server!";

type Service = QuoteService<SqliteQuoteRepository>;

/// Prints store notifications while `watch` runs.
struct ConsoleListener;

impl StoreListener for ConsoleListener {
    fn on_event(&self, event: &StoreEvent) {
        if let StoreEvent::Merged(report) = event {
            print_merge_report(report);
        }
    }
}

pub async fn run(command: Command, db_path: &Path) -> Result<()> {
    let repo = SqliteQuoteRepository::open(db_path)
        .with_context(|| format!("failed to open quote database `{}`", db_path.display()))?;
    let mut service = QuoteService::bootstrap(repo).context("failed to load quotes")?;

    match command {
        Command::Add { text, category } => add(&mut service, &text, &category),
        Command::List { category } => {
            let filter = category
                .as_deref()
                .map(CategoryFilter::parse)
                .unwrap_or_default();
            for quote in service.filtered(&filter) {
                println!("{}", quote.display_line());
            }
            Ok(())
        }
        Command::Categories => {
            for category in service.categories() {
                println!("{category}");
            }
            Ok(())
        }
        Command::Random => {
            let shown = service.show_random()?;
            print_shown(shown.as_ref(), MSG_NO_QUOTES);
            Ok(())
        }
        Command::Filter { category } => {
            let filter = CategoryFilter::parse(&category);
            let empty_message = if filter.is_all() {
                MSG_NO_QUOTES
            } else {
                MSG_NO_QUOTES_IN_CATEGORY
            };
            service.set_filter(filter)?;
            let shown = service.show_featured()?;
            print_shown(shown.as_ref(), empty_message);
            Ok(())
        }
        Command::Last => {
            match service.last_shown()? {
                Some(line) => println!("{line}"),
                None => println!("{MSG_NO_QUOTES}"),
            }
            Ok(())
        }
        Command::Export { out } => {
            let json = service.export_json()?;
            match out {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("failed to write `{}`", path.display()))?,
                None => println!("{json}"),
            }
            Ok(())
        }
        Command::Import { path, append } => {
            let payload = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            let mode = if append {
                ImportMode::Append
            } else {
                ImportMode::Merge
            };
            match service.import_json(&payload, mode) {
                Ok(report) => {
                    print_merge_report(&report);
                    println!("Quotes imported successfully!");
                    Ok(())
                }
                Err(ServiceError::Format(err)) => {
                    anyhow::bail!("Invalid JSON format! ({err})")
                }
                Err(err) => Err(err.into()),
            }
        }
        Command::Sync(args) => sync(service, &args).await,
        Command::Watch(args) => watch(service, &args).await,
    }
}

fn add(service: &mut Service, text: &str, category: &str) -> Result<()> {
    match service.add(text, category) {
        Ok(_) => {
            println!("Quote added successfully!");
            Ok(())
        }
        Err(ServiceError::Validation(_)) => {
            anyhow::bail!("Please enter both a quote and a category!")
        }
        Err(err) => Err(err.into()),
    }
}

async fn sync(service: Service, args: &SyncArgs) -> Result<()> {
    let transport = HttpQuoteTransport::new(&args.to_config())?;
    let shared = share(service);

    match SyncReconciler::new().sync_once(&transport, &shared).await {
        Ok(report) => {
            print_merge_report(&report);
            println!("{MSG_SYNC_OK}");
            Ok(())
        }
        Err(err) => anyhow::bail!("{MSG_SYNC_FAILED} ({err})"),
    }
}

async fn watch(mut service: Service, args: &SyncArgs) -> Result<()> {
    let config = args.to_config();
    let transport = Arc::new(HttpQuoteTransport::new(&config)?);
    service.subscribe(Box::new(ConsoleListener));
    let shared = share(service);

    let scheduler = SyncScheduler::start(
        transport,
        shared,
        Arc::new(SyncReconciler::new()),
        config.interval,
    );
    let mut status = scheduler.status();
    info!(
        "event=watch module=cli status=start interval_secs={}",
        config.interval.as_secs()
    );

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                break;
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let message = status.borrow_and_update().message();
                println!("{message}");
            }
        }
    }

    scheduler.stop().await;
    Ok(())
}

fn print_shown(quote: Option<&Quote>, empty_message: &str) {
    match quote {
        Some(quote) => println!("{}", quote.display_line()),
        None => println!("{empty_message}"),
    }
}

fn print_merge_report(report: &MergeReport) {
    for quote in &report.added {
        println!("+ {}", quote.display_line());
    }
    for conflict in &report.conflicts {
        println!(
            "Conflict resolved: \"{}\" ({} -> {})",
            conflict.local.text, conflict.local.category, conflict.server.category
        );
    }
}
