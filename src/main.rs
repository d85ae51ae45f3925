//! # Cafe Orders
//!
//! Terminal front end: the customer chats with the assistant while staff
//! commands (`/pending`, `/approve`, ...) act on the same order store.
//! Status updates are printed as they happen.

use cafe_orders::assistant::gemini::GeminiAssistant;
use cafe_orders::catalog::Catalog;
use cafe_orders::config::CafeConfig;
use cafe_orders::console::{parse_command, Command, HELP};
use cafe_orders::lifecycle::{setup_tracing, CafeSystem};
use cafe_orders::model::Order;
use cafe_orders::notification::ChatEntry;
use cafe_orders::persistence::FileSnapshotStore;
use cafe_orders::session::ConversationSession;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cafe-orders")]
#[command(about = "Conversational order intake for a cafe")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Snapshot file, overriding the configured one
    #[arg(short, long)]
    snapshot: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let args = Args::parse();

    let mut config = CafeConfig::load(args.config.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    if let Some(snapshot) = args.snapshot {
        config.snapshot_path = snapshot;
    }
    let api_key = config.assistant.api_key().map_err(|e| e.to_string())?;

    let store = Arc::new(FileSnapshotStore::new(config.snapshot_path.clone()));
    let mut system = CafeSystem::start(&config, store).await;
    let assistant = GeminiAssistant::new(
        &config.assistant,
        api_key,
        &system.settings.cafe_name,
        &system.catalog,
    )
    .map_err(|e| e.to_string())?;

    let mut feed = system
        .take_status_feed()
        .ok_or_else(|| "status feed already taken".to_string())?;
    let mut session = system.new_session(Arc::new(assistant));

    println!("{} ({})", system.settings.cafe_name, system.settings.operating_hours);
    println!("BOT: {}", session.greeting());
    println!("Type /help for staff commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!(error = %e, "Failed to read input");
                        break;
                    }
                };
                match parse_command(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => run_command(command, &system, &mut session).await,
                    Ok(None) => {}
                    Err(message) => println!("{}", message),
                }
            }
            Some(entry) = feed.recv() => print_entry(&entry),
        }
    }

    drop(session);
    drop(feed);
    system.shutdown().await?;

    info!("Goodbye");
    Ok(())
}

async fn run_command(command: Command, system: &CafeSystem, session: &mut ConversationSession) {
    let orders = &system.order_client;
    match command {
        Command::Chat(text) => {
            let reply = session.handle_user_message(&text).await;
            println!("{}: {}", reply.sender, reply.display_text);
        }
        Command::Menu => print_menu(&system.catalog),
        Command::List(filter) => match orders.query(filter).await {
            Ok(list) if list.is_empty() => println!("No orders."),
            Ok(list) => list.iter().for_each(print_order),
            Err(e) => println!("Error: {}", e),
        },
        Command::Approve {
            id,
            tracking_number,
        } => {
            if let Err(e) = orders.approve(&id, &tracking_number).await {
                println!("Error: {}", e);
            }
        }
        Command::Reject { id } => {
            if let Err(e) = orders.reject(&id).await {
                println!("Error: {}", e);
            }
        }
        Command::Manual {
            tracking_number,
            items,
        } => match orders.create_manual(&items, &tracking_number).await {
            Ok(order) => println!("Recorded order {}", order.id),
            Err(e) => println!("Error: {}", e),
        },
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

fn print_menu(catalog: &Catalog) {
    for item in catalog.items() {
        println!(
            "  {:<14} {:<14} {:>7}  {}",
            item.id,
            item.name,
            format!("${:.2}", item.unit_price),
            item.description
        );
    }
}

fn print_order(order: &Order) {
    println!(
        "  {}  #{}  {:<8}  {:>8}  {}  {}",
        order.id,
        order.id.short(),
        order.status,
        format!("${:.2}", order.total),
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.tracking_number.as_deref().unwrap_or("-")
    );
}

fn print_entry(entry: &ChatEntry) {
    println!("{}: {}", entry.sender, entry.message);
}
