use anyhow::{Result, anyhow};
use giveaway_bot::config::Config;
use giveaway_bot::drafts::sqlite::{database_file, SqliteDraftStore};
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_store().await,
        "reset" => reset_store().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

/// URL of the SQLite draft store; the in-memory store has nothing to migrate.
fn sqlite_url() -> Result<String> {
    let url = Config::draft_store_url_from_env();
    if url.starts_with("memory:") {
        return Err(anyhow!("DRAFT_STORE_URL selects the in-memory store, nothing to migrate"));
    }
    if !url.starts_with("sqlite:") {
        return Err(anyhow!("DRAFT_STORE_URL must be a sqlite: URL, got '{}'", url));
    }
    Ok(url)
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Giveaway Bot - Draft Store Migration Tool");
    println!("============================================");

    let url = sqlite_url()?;
    println!("📊 Draft store: {}", mask_url(&url));
    println!("🚀 Running migrations...");

    let store = SqliteDraftStore::new(&url)
        .await
        .map_err(|e| anyhow!("Failed to open draft store: {}", e))?;

    match store.run_migrations().await {
        Ok(_) => println!("✅ Migrations completed successfully!"),
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_store() -> Result<()> {
    println!("🔍 Checking draft store connection and schema...");

    let url = sqlite_url()?;
    println!("📊 Draft store: {}", mask_url(&url));

    let store = SqliteDraftStore::new(&url)
        .await
        .map_err(|e| anyhow!("Failed to open draft store: {}", e))?;

    match store.table_names().await {
        Ok(tables) if tables.iter().any(|t| t == "draft_values") => {
            println!("✅ Draft store is ready. Tables:");
            for table in tables {
                println!("  • {table}");
            }
        }
        Ok(_) => {
            println!("⚠️  Draft tables are missing");
            println!("💡 Run 'migrate up' to create the schema");
        }
        Err(e) => println!("⚠️  Draft store check failed: {e}"),
    }

    Ok(())
}

async fn reset_store() -> Result<()> {
    println!("⚠️  WARNING: This deletes every unfinished draft!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let url = sqlite_url()?;
    let path = database_file(&url).ok_or_else(|| anyhow!("Reset needs a file-backed SQLite store"))?;
    if path.exists() {
        std::fs::remove_file(path)?;
        println!("🗑️  Deleted draft store file: {}", path.display());
    }

    println!("🔄 Recreating schema...");
    run_migrations().await?;

    println!("✅ Draft store reset completed!");
    Ok(())
}

fn mask_url(url: &str) -> String {
    match database_file(url).and_then(Path::file_name) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🎁 Giveaway Bot - Draft Store Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Run draft store migrations (default)");
    println!("    check          Check draft store connection and schema");
    println!("    reset          Delete all drafts and recreate the schema - DESTRUCTIVE!");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DRAFT_STORE_URL   Draft store URL (default: sqlite:./data/drafts.db)");
    println!();
}
